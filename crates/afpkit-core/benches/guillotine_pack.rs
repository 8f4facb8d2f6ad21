use afpkit_core::afp::decode_swaps;
use afpkit_core::prelude::*;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

fn generate_textures(count: usize, min_size: u32, max_size: u32) -> Vec<(String, u32, u32)> {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|i| {
            let w = rng.gen_range(min_size..=max_size);
            let h = rng.gen_range(min_size..=max_size);
            (format!("tex_{}", i), w, h)
        })
        .collect()
}

fn bench_pack_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("pack_layout");

    for count in [50, 200, 1000] {
        let textures = generate_textures(count, 16, 256);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(
            BenchmarkId::new("guillotine_1024", count),
            &textures,
            |b, textures| {
                b.iter(|| {
                    let cfg = PackerConfig::default();
                    black_box(pack_layout(textures.clone(), cfg).expect("pack"))
                });
            },
        );
    }

    group.finish();
}

fn bench_swaps(c: &mut Criterion) {
    let mut group = c.benchmark_group("bsi_swaps");
    let buf = vec![0u8; 1 << 20];
    // u32 swaps, 64 per instruction, no gaps
    let word: u16 = (2 << 13) | (0x3f << 7);
    let bsi: Vec<u8> = std::iter::repeat_n(word.to_le_bytes(), 4096)
        .flatten()
        .collect();
    group.throughput(Throughput::Bytes(buf.len() as u64));
    group.bench_function("u32_runs", |b| {
        b.iter(|| black_box(decode_swaps(&buf, &bsi).expect("decode")))
    });
    group.finish();
}

criterion_group!(benches, bench_pack_layout, bench_swaps);
criterion_main!(benches);
