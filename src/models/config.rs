use crush_dither::{parse_hex_list, ProcessConfig, DEFAULT_BLUE_NOISE_SEED};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Application configuration loaded from a YAML file
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Address the HTTP server listens on
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Largest accepted image, in pixels
    #[serde(default = "default_max_pixels")]
    pub max_pixels: u64,

    /// Largest accepted request body, in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Seed of the blue-noise texture
    #[serde(default = "default_blue_noise_seed")]
    pub blue_noise_seed: u64,

    /// Settings used when a request does not override them
    #[serde(default)]
    pub defaults: ProcessConfig,

    /// Named palettes available from startup, as hex color lists
    #[serde(default)]
    pub palettes: HashMap<String, Vec<String>>,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_max_pixels() -> u64 {
    4096 * 4096
}

fn default_max_body_bytes() -> usize {
    32 * 1024 * 1024
}

fn default_blue_noise_seed() -> u64 {
    DEFAULT_BLUE_NOISE_SEED
}

impl AppConfig {
    /// Load configuration from a YAML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse(&content).unwrap_or_else(|e| {
                tracing::warn!(%e, path = %path.display(), "Failed to parse config, using defaults");
                Self::default()
            }),
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Parse configuration from YAML text.
    pub fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        let config: Self = serde_yaml::from_str(content)?;
        tracing::info!(
            palettes = config.palettes.len(),
            palette = %config.defaults.palette,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Load from `CONFIG_FILE` if set, then apply the `BIND_ADDR` override.
    pub fn from_env() -> Self {
        let mut config = match std::env::var("CONFIG_FILE") {
            Ok(path) => Self::load(Path::new(&path)),
            Err(_) => Self::default(),
        };
        if let Ok(addr) = std::env::var("BIND_ADDR") {
            config.bind_addr = addr;
        }
        config
    }

    /// Configured palettes with their colors parsed.
    ///
    /// Entries without a single valid color are skipped with a warning.
    pub fn named_palettes(&self) -> Vec<(String, Vec<[u8; 3]>)> {
        let mut named: Vec<_> = self
            .palettes
            .iter()
            .filter_map(|(name, hexes)| match parse_hex_list(&hexes.join("\n")) {
                Ok(colors) => Some((name.clone(), colors)),
                Err(e) => {
                    tracing::warn!(palette = %name, %e, "Skipping configured palette");
                    None
                }
            })
            .collect();
        named.sort_by(|a, b| a.0.cmp(&b.0));
        named
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_pixels: default_max_pixels(),
            max_body_bytes: default_max_body_bytes(),
            blue_noise_seed: default_blue_noise_seed(),
            defaults: ProcessConfig::default(),
            palettes: HashMap::new(),
        }
    }
}
