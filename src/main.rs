use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use crush_dither::{
    builtin, parse_hex_list, resolve_palette, sample_image_colors, DistanceMetric, DitherKind,
    Engine, Palette, ProceduralMode, ProcessConfig, ResolvedPalette, BUILTIN_IDS,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use pixelcrush::api::ProcessQuery;
use pixelcrush::models::AppConfig;
use pixelcrush::server::{self, ApiDoc};
use pixelcrush::services::{decode_png, encode_png};

#[derive(Parser)]
#[command(name = "pixelcrush")]
#[command(about = "Pixelcrush - color quantization and dithering")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Quantize a PNG file
    Process {
        /// Input PNG file
        input: PathBuf,

        /// Output PNG file
        output: PathBuf,

        #[command(flatten)]
        options: ProcessOptions,
    },
    /// Parse a palette file and print its colors as hex
    Import {
        /// Hex list (.hex, .txt) or image (PNG) to sample
        file: PathBuf,
    },
    /// List palettes, procedural modes and dither strategies
    List,
}

/// Overrides of the configured processing defaults
#[derive(Args)]
struct ProcessOptions {
    /// Palette id (built-in, auto{N} or math_*)
    #[arg(short, long)]
    palette: Option<String>,

    /// Load the palette from a hex list or image instead
    #[arg(long, conflicts_with = "palette")]
    palette_file: Option<PathBuf>,

    /// Primary dither strategy
    #[arg(long)]
    primary: Option<String>,

    /// Secondary dither strategy
    #[arg(long)]
    secondary: Option<String>,

    /// Weight of the secondary strategy (0..1)
    #[arg(short, long)]
    mix: Option<f32>,

    /// Dither strength (0..1)
    #[arg(short, long)]
    amount: Option<f32>,

    /// Contrast (-255..255)
    #[arg(long, allow_hyphen_values = true)]
    contrast: Option<f32>,

    /// Brightness offset
    #[arg(long, allow_hyphen_values = true)]
    brightness: Option<f32>,

    /// Saturation percent (100 = unchanged)
    #[arg(long)]
    saturation: Option<f32>,

    /// First procedural mode parameter
    #[arg(long)]
    axis1: Option<f32>,

    /// Second procedural mode parameter
    #[arg(long)]
    axis2: Option<f32>,

    /// Third procedural mode parameter
    #[arg(long)]
    axis3: Option<f32>,

    /// Use Euclidean instead of Redmean color distance
    #[arg(long)]
    euclidean: bool,
}

impl ProcessOptions {
    /// The same overrides the HTTP API takes as query parameters
    fn to_query(&self) -> ProcessQuery {
        ProcessQuery {
            palette: self.palette.clone(),
            primary: self.primary.clone(),
            secondary: self.secondary.clone(),
            mix: self.mix,
            amount: self.amount,
            contrast: self.contrast,
            brightness: self.brightness,
            saturation: self.saturation,
            axis1: self.axis1,
            axis2: self.axis2,
            axis3: self.axis3,
            distance: self
                .euclidean
                .then(|| DistanceMetric::Euclidean.id().to_string()),
        }
    }

    fn apply(&self, defaults: &ProcessConfig) -> ProcessConfig {
        self.to_query().apply(defaults)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve) => run_server().await,
        Some(Commands::Process {
            input,
            output,
            options,
        }) => run_process_command(&input, &output, &options),
        Some(Commands::Import { file }) => run_import_command(&file),
        Some(Commands::List) => {
            run_list_command();
            Ok(())
        }
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Minimal logging for CLI commands
fn init_cli_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixelcrush=warn,crush_dither=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

/// Read palette colors from a hex list or by sampling an image.
fn load_palette_file(path: &Path, max_pixels: u64) -> anyhow::Result<Vec<[u8; 3]>> {
    let is_text = path
        .extension()
        .map(|ext| ext == "hex" || ext == "txt")
        .unwrap_or(false);

    if is_text {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(parse_hex_list(&text)?)
    } else {
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let image = decode_png(&bytes, max_pixels)?;
        Ok(sample_image_colors(
            image.data(),
            image.width(),
            image.height(),
        )?)
    }
}

/// Quantize a PNG file (no server needed)
fn run_process_command(input: &Path, output: &Path, options: &ProcessOptions) -> anyhow::Result<()> {
    init_cli_tracing();

    let app_config = AppConfig::from_env();
    let config = options.apply(&app_config.defaults);

    let custom = match options.palette_file {
        Some(ref path) => {
            let colors = load_palette_file(path, app_config.max_pixels)?;
            Some(Palette::new("custom_1", colors)?)
        }
        None => None,
    };

    let bytes =
        std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let image = decode_png(&bytes, app_config.max_pixels)?;
    let (width, height) = (image.width(), image.height());

    let engine = Engine::with_blue_noise_seed(app_config.blue_noise_seed);
    let result = engine.process(image, &config, custom.as_ref())?;
    let png = encode_png(&result)?;

    std::fs::write(output, &png)?;
    println!(
        "Processed {} ({width}x{height}, palette {}, {} + {} mix {}) -> {} ({} bytes)",
        input.display(),
        custom.as_ref().map(|p| p.id()).unwrap_or(&config.palette),
        config.primary,
        config.secondary,
        config.mix,
        output.display(),
        png.len()
    );

    Ok(())
}

/// Print the colors of a palette file as a hex list
fn run_import_command(file: &Path) -> anyhow::Result<()> {
    init_cli_tracing();

    let app_config = AppConfig::from_env();
    let colors = load_palette_file(file, app_config.max_pixels)?;
    let palette = Palette::new("custom_1", colors)?;

    println!("; {} colors from {}", palette.len(), file.display());
    for hex in palette.to_hex_strings() {
        println!("{hex}");
    }
    Ok(())
}

/// Print palettes, procedural modes and strategies
fn run_list_command() {
    println!("Palettes:");
    for id in BUILTIN_IDS {
        if let Some(p) = builtin(id) {
            println!("  {id:<10} {:>3} colors", p.len());
        }
    }
    for id in ["auto8", "auto16", "auto32"] {
        if let ResolvedPalette::Palette(p) = resolve_palette(id, None) {
            println!("  {id:<10} {:>3} colors", p.len());
        }
    }

    let config = AppConfig::from_env();
    for (name, colors) in config.named_palettes() {
        println!("  {name:<10} {:>3} colors (config)", colors.len());
    }

    println!("\nProcedural modes:");
    for mode in ProceduralMode::ALL {
        println!("  {}", mode.id());
    }

    println!("\nDither strategies:");
    for kind in DitherKind::ALL {
        println!("  {:<12} {}", kind.id(), kind.family());
    }
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    // Read environment variables
    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();

    // Header
    println!("Pixelcrush v{VERSION}");
    println!("Color quantization and dithering\n");

    // Environment variables section
    println!("Environment Variables:");
    println!(
        "  BIND_ADDR   = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:3000 (default)")
    );
    println!(
        "  CONFIG_FILE = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );

    // Config section
    let config_source = match config_file {
        Some(ref path) if Path::new(path).exists() => path.to_string(),
        Some(_) => "defaults (file not found)".to_string(),
        None => "defaults".to_string(),
    };
    let config = AppConfig::from_env();
    println!("\nConfiguration:");
    println!("  Source:     {config_source}");
    println!("  Max pixels: {}", config.max_pixels);
    println!("  Palette:    {}", config.defaults.palette);
    println!(
        "  Strategies: {} + {} (mix {}, amount {})",
        config.defaults.primary, config.defaults.secondary, config.defaults.mix, config.defaults.amount
    );
    println!("  Named palettes: {}", config.palettes.len());

    // Commands section
    println!("\nCommands:");
    println!("  pixelcrush serve     Start the HTTP server");
    println!("  pixelcrush process   Quantize a PNG file");
    println!("  pixelcrush import    Print the colors of a palette file");
    println!("  pixelcrush list      List palettes and strategies");
    println!("\nRun 'pixelcrush --help' for more details.");
}

/// Run the HTTP server
async fn run_server() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pixelcrush=info,crush_dither=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    let bind_addr = config.bind_addr.clone();

    tracing::info!(
        max_pixels = config.max_pixels,
        palettes = config.palettes.len(),
        palette = %config.defaults.palette,
        "Configuration loaded"
    );

    let state = server::create_app_state(config);

    // Build router: shared API routes plus production-only documentation
    let app = server::build_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Pixelcrush server listening");
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn process_options(args: &[&str]) -> ProcessOptions {
        let argv = ["pixelcrush", "process", "in.png", "out.png"]
            .iter()
            .chain(args)
            .copied();
        match Cli::try_parse_from(argv).unwrap().command {
            Some(Commands::Process { options, .. }) => options,
            _ => panic!("expected the process command"),
        }
    }

    #[test]
    fn test_options_override_defaults() {
        let options = process_options(&[
            "-p", "pico8", "--primary", "atkinson", "-m", "0.25", "--contrast", "-40",
            "--euclidean",
        ]);
        let config = options.apply(&ProcessConfig::default());

        assert_eq!(config.palette, "pico8");
        assert_eq!(config.primary, DitherKind::Atkinson);
        assert_eq!(config.mix, 0.25);
        assert_eq!(config.contrast, -40.0);
        assert_eq!(config.distance, DistanceMetric::Euclidean);
    }

    #[test]
    fn test_non_finite_options_keep_defaults() {
        let options = process_options(&["--contrast", "NaN", "--amount", "inf"]);
        let config = options.apply(&ProcessConfig::default());

        assert_eq!(config.contrast, 0.0);
        assert_eq!(config.amount, 0.5);
    }
}
