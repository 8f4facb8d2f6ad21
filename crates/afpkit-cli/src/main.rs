use std::fs;
use std::path::{Path, PathBuf};

use afpkit_core::afp::{AfpHeader, string_table_entries};
use afpkit_core::config::SortOrder;
use afpkit_core::{
    LayoutItem, PackerConfig, decode_afp, pack_layout_items, parse_geo, to_json_hash,
    to_texturelist_xml,
};
use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use globset::{Glob, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "afpkit",
    about = "Decode AFP buffers and build texturelist atlases",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --progress false or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply BSI swaps and unmask the string table of an AFP file
    Decode(DecodeArgs),
    /// Print the AFP header fields as JSON
    Header(HeaderArgs),
    /// Pack a folder of images into pages and write the texturelist descriptor
    Texturelist(TexturelistArgs),
    /// Dump a GE2D geometry file as JSON
    Geo(GeoArgs),
}

#[derive(Parser, Debug, Clone)]
struct DecodeArgs {
    /// Input AFP file
    #[arg(long)]
    input_afp: PathBuf,
    /// Input BSI file
    #[arg(long)]
    input_bsi: PathBuf,
    /// Output filename
    #[arg(long)]
    output: PathBuf,
}

#[derive(Parser, Debug, Clone)]
struct HeaderArgs {
    /// AFP file (already decoded, or pass --input-bsi to decode first)
    #[arg(long)]
    input: PathBuf,
    /// BSI file; when set the buffer is decoded before reading the header
    #[arg(long)]
    input_bsi: Option<PathBuf>,
    /// Also list the string-table entries
    #[arg(long, default_value_t = false)]
    strings: bool,
}

#[derive(Parser, Debug, Clone)]
struct TexturelistArgs {
    // Input/Output
    /// Input file or directory
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Output directory
    #[arg(short, long, default_value = "out", help_heading = "Input/Output")]
    out_dir: PathBuf,
    /// YAML config file path (overrides layout options)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,
    /// Include patterns (glob). If set, only files matching any pattern are considered
    #[arg(long, help_heading = "Input/Output")]
    include: Vec<String>,
    /// Exclude patterns (glob). Files matching any pattern will be ignored
    #[arg(long, help_heading = "Input/Output")]
    exclude: Vec<String>,

    // Layout
    /// Page width
    #[arg(long, default_value_t = 1024, help_heading = "Layout")]
    page_width: u32,
    /// Page height
    #[arg(long, default_value_t = 1024, help_heading = "Layout")]
    page_height: u32,
    /// Sort order: area_desc|max_side_desc|height_desc|width_desc|name_asc|none
    #[arg(long, default_value = "none", help_heading = "Layout")]
    sort_order: String,

    // Export
    /// Descriptor format: xml | json
    #[arg(long, value_parser = ["xml", "json"], default_value = "xml", help_heading = "Export")]
    metadata: String,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: compute layout and stats but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
struct GeoArgs {
    /// Input GE2D file
    #[arg(long)]
    input_geo: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Decode(args) => run_decode(args),
        Commands::Header(args) => run_header(args),
        Commands::Texturelist(args) => run_texturelist(args, cli.progress && !cli.quiet),
        Commands::Geo(args) => run_geo(args),
    }
}

fn run_decode(args: &DecodeArgs) -> anyhow::Result<()> {
    let afp = fs::read(&args.input_afp)
        .with_context(|| format!("read AFP {}", args.input_afp.display()))?;
    let bsi = fs::read(&args.input_bsi)
        .with_context(|| format!("read BSI {}", args.input_bsi.display()))?;
    let decoded = decode_afp(&afp, &bsi)
        .with_context(|| format!("decode {}", args.input_afp.display()))?;
    fs::write(&args.output, &decoded.data)
        .with_context(|| format!("write {}", args.output.display()))?;
    info!(output = ?args.output, swaps = decoded.swaps, "decoded AFP written");
    Ok(())
}

#[derive(Serialize)]
struct HeaderReport {
    magic_text: String,
    #[serde(flatten)]
    header: AfpHeader,
    #[serde(skip_serializing_if = "Option::is_none")]
    strings: Option<Vec<String>>,
}

fn run_header(args: &HeaderArgs) -> anyhow::Result<()> {
    let mut data =
        fs::read(&args.input).with_context(|| format!("read {}", args.input.display()))?;
    if let Some(bsi_path) = &args.input_bsi {
        let bsi =
            fs::read(bsi_path).with_context(|| format!("read BSI {}", bsi_path.display()))?;
        data = decode_afp(&data, &bsi)?.data;
    }
    let header = AfpHeader::parse(&data)?;
    let strings = if args.strings {
        Some(string_table_entries(&data, &header)?)
    } else {
        None
    };
    let report = HeaderReport {
        magic_text: header.magic_display(),
        header,
        strings,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_geo(args: &GeoArgs) -> anyhow::Result<()> {
    let data = fs::read(&args.input_geo)
        .with_context(|| format!("read {}", args.input_geo.display()))?;
    let geo = parse_geo(&data).with_context(|| format!("parse {}", args.input_geo.display()))?;
    println!("{}", serde_json::to_string_pretty(&geo)?);
    Ok(())
}

fn run_texturelist(cli: &TexturelistArgs, show_progress: bool) -> anyhow::Result<()> {
    let base = PackerConfig {
        page_width: cli.page_width,
        page_height: cli.page_height,
        sort_order: parse_sort_order(&cli.sort_order)?,
        ..Default::default()
    };
    // Config file sets layout options en bloc
    let cfg = if let Some(path) = &cli.config {
        let file = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)?;
        y.into_packer_config(base)
    } else {
        base
    };

    if cli.print_config {
        match cli.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }

    let paths = gather_paths(&cli.input, &cli.include, &cli.exclude)?;
    let items = read_dimensions_with_progress(&paths, show_progress)?;
    info!(count = items.len(), "read image dimensions");

    let atlas = pack_layout_items(items, cfg.clone())?;
    let stats = atlas.stats();
    info!("{}", stats.summary());

    if cli.dry_run {
        return Ok(());
    }

    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("create out_dir {}", cli.out_dir.display()))?;
    match cli.metadata.as_str() {
        "json" => {
            let json_path = cli.out_dir.join("texturelist.json");
            let v = to_json_hash(&atlas);
            fs::write(&json_path, serde_json::to_vec_pretty(&v)?)
                .with_context(|| format!("write {}", json_path.display()))?;
            info!(?json_path, pages = atlas.pages.len(), "texturelist written");
        }
        _ => {
            let xml_path = cli.out_dir.join("texturelist.xml");
            fs::write(&xml_path, to_texturelist_xml(&atlas, &cfg)?)
                .with_context(|| format!("write {}", xml_path.display()))?;
            info!(?xml_path, pages = atlas.pages.len(), "texturelist written");
        }
    }
    Ok(())
}

fn gather_paths(
    path: &Path,
    include: &[String],
    exclude: &[String],
) -> anyhow::Result<Vec<PathBuf>> {
    // Build glob matchers
    let mut inc_set = None;
    if !include.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in include {
            b.add(Glob::new(pat)?);
        }
        inc_set = Some(b.build()?);
    }
    let mut exc_set = None;
    if !exclude.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in exclude {
            b.add(Glob::new(pat)?);
        }
        exc_set = Some(b.build()?);
    }
    let mut list: Vec<PathBuf> = Vec::new();
    if path.is_file() {
        if !should_skip(path, inc_set.as_ref(), exc_set.as_ref()) && is_image(path) {
            list.push(path.to_path_buf());
        }
    } else {
        for entry in WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let p = entry.path();
            if p.is_file() && !should_skip(p, inc_set.as_ref(), exc_set.as_ref()) && is_image(p) {
                list.push(p.to_path_buf());
            }
        }
    }
    Ok(list)
}

fn should_skip(
    p: &Path,
    include: Option<&globset::GlobSet>,
    exclude: Option<&globset::GlobSet>,
) -> bool {
    let s = p.to_string_lossy().replace('\\', "/");
    if let Some(ex) = exclude {
        if ex.is_match(&s) {
            return true;
        }
    }
    if let Some(inc) = include {
        if !inc.is_match(&s) {
            return true;
        }
    }
    false
}

fn is_image(p: &Path) -> bool {
    matches!(
        p.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if matches!(ext.as_str(), "png" | "jpg" | "jpeg")
    )
}

fn read_dimensions_with_progress(
    paths: &[PathBuf],
    progress: bool,
) -> anyhow::Result<Vec<LayoutItem>> {
    use indicatif::{ProgressBar, ProgressStyle};
    let bar = if progress {
        let b = ProgressBar::new(paths.len() as u64);
        b.set_style(ProgressStyle::with_template(
            "{spinner:.green} reading {pos}/{len} [{elapsed_precise}] {wide_msg}",
        )?);
        Some(b)
    } else {
        None
    };
    let mut list = Vec::with_capacity(paths.len());
    for p in paths {
        let msg = p.file_name().and_then(|s| s.to_str()).unwrap_or("");
        if let Some(b) = &bar {
            b.set_message(msg.to_string());
        }
        let key = p.to_string_lossy().replace('\\', "/");
        match LayoutItem::<String>::from_path(key, p) {
            Ok(item) => list.push(item),
            Err(e) => {
                error!(?p, error = %e, "skip image");
            }
        }
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok(list)
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

/// Layout options accepted from a YAML file. Absent fields keep the CLI value.
#[derive(Debug, Default, Deserialize)]
struct YamlConfig {
    page_width: Option<u32>,
    page_height: Option<u32>,
    sort_order: Option<SortOrder>,
    format: Option<String>,
    mag_filter: Option<String>,
    min_filter: Option<String>,
    wrap_s: Option<String>,
    wrap_t: Option<String>,
    compress: Option<String>,
}

impl YamlConfig {
    fn into_packer_config(self, mut cfg: PackerConfig) -> PackerConfig {
        if let Some(v) = self.page_width {
            cfg.page_width = v;
        }
        if let Some(v) = self.page_height {
            cfg.page_height = v;
        }
        if let Some(v) = self.sort_order {
            cfg.sort_order = v;
        }
        if let Some(v) = self.format {
            cfg.format = v;
        }
        if let Some(v) = self.mag_filter {
            cfg.mag_filter = v;
        }
        if let Some(v) = self.min_filter {
            cfg.min_filter = v;
        }
        if let Some(v) = self.wrap_s {
            cfg.wrap_s = v;
        }
        if let Some(v) = self.wrap_t {
            cfg.wrap_t = v;
        }
        if let Some(v) = self.compress {
            cfg.compress = v;
        }
        cfg
    }
}

fn parse_sort_order(s: &str) -> anyhow::Result<SortOrder> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("invalid sort order: {s}"))
}
