use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Page size used by the reference asset pipeline.
pub const DEFAULT_PAGE_SIZE: u32 = 1024;

/// Input orderings applied before packing. Sorting is stable with a key tie-break.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    AreaDesc,
    MaxSideDesc,
    HeightDesc,
    WidthDesc,
    NameAsc,
    /// Keep caller order.
    None,
}

impl FromStr for SortOrder {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "area_desc" => Ok(Self::AreaDesc),
            "max_side_desc" => Ok(Self::MaxSideDesc),
            "height_desc" => Ok(Self::HeightDesc),
            "width_desc" => Ok(Self::WidthDesc),
            "name_asc" => Ok(Self::NameAsc),
            "none" => Ok(Self::None),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackerConfig {
    /// Page width in pixels.
    pub page_width: u32,
    /// Page height in pixels.
    pub page_height: u32,
    #[serde(default = "default_sort_order")]
    pub sort_order: SortOrder,

    // texturelist descriptor attributes
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_filter")]
    pub mag_filter: String,
    #[serde(default = "default_filter")]
    pub min_filter: String,
    #[serde(default = "default_wrap")]
    pub wrap_s: String,
    #[serde(default = "default_wrap")]
    pub wrap_t: String,
    #[serde(default = "default_compress")]
    pub compress: String,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            page_width: DEFAULT_PAGE_SIZE,
            page_height: DEFAULT_PAGE_SIZE,
            sort_order: default_sort_order(),
            format: default_format(),
            mag_filter: default_filter(),
            min_filter: default_filter(),
            wrap_s: default_wrap(),
            wrap_t: default_wrap(),
            compress: default_compress(),
        }
    }
}

impl PackerConfig {
    /// Validates the configuration parameters.
    ///
    /// Returns an error if either page dimension is zero or a descriptor
    /// attribute is empty.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::AfpKitError;

        if self.page_width == 0 || self.page_height == 0 {
            return Err(AfpKitError::InvalidDimensions {
                width: self.page_width,
                height: self.page_height,
            });
        }

        for (name, value) in [
            ("format", &self.format),
            ("mag_filter", &self.mag_filter),
            ("min_filter", &self.min_filter),
            ("wrap_s", &self.wrap_s),
            ("wrap_t", &self.wrap_t),
        ] {
            if value.trim().is_empty() {
                return Err(AfpKitError::InvalidConfig(format!("{name} must not be empty")));
            }
        }

        Ok(())
    }

    /// Create a fluent builder for `PackerConfig`.
    pub fn builder() -> PackerConfigBuilder {
        PackerConfigBuilder::new()
    }
}

fn default_sort_order() -> SortOrder {
    SortOrder::None
}
fn default_format() -> String {
    "argb8888rev".into()
}
fn default_filter() -> String {
    "nearest".into()
}
fn default_wrap() -> String {
    "clamp".into()
}
fn default_compress() -> String {
    "avslz".into()
}

/// Builder for `PackerConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct PackerConfigBuilder {
    cfg: PackerConfig,
}

impl PackerConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: PackerConfig::default(),
        }
    }
    pub fn with_page_size(mut self, w: u32, h: u32) -> Self {
        self.cfg.page_width = w;
        self.cfg.page_height = h;
        self
    }
    pub fn sort_order(mut self, v: SortOrder) -> Self {
        self.cfg.sort_order = v;
        self
    }
    pub fn format(mut self, v: impl Into<String>) -> Self {
        self.cfg.format = v.into();
        self
    }
    pub fn filter(mut self, v: impl Into<String>) -> Self {
        let v = v.into();
        self.cfg.mag_filter = v.clone();
        self.cfg.min_filter = v;
        self
    }
    pub fn wrap(mut self, v: impl Into<String>) -> Self {
        let v = v.into();
        self.cfg.wrap_s = v.clone();
        self.cfg.wrap_t = v;
        self
    }
    pub fn build(self) -> PackerConfig {
        self.cfg
    }
}
