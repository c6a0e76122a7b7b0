use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use keycap_mapper::assets::AssetLoader;
use keycap_mapper::models::AppConfig;
use keycap_mapper::services::{self, generate, parse_overlay, GenerateRequest};
use keycap_match::{build_bounding_boxes, Overlay, ReducerMode};

#[derive(Parser)]
#[command(name = "keycap-mapper")]
#[command(about = "Keycap Mapper - map photographs onto manufacturable keycap color palettes")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Assign a palette color to every key from an image
    Generate {
        /// Source image (PNG, JPEG, BMP, WebP, ...)
        #[arg(short, long)]
        image: PathBuf,

        /// Area the keyboard covers, as x,y,width,height (default: whole image)
        #[arg(long, value_parser = parse_overlay)]
        overlay: Option<Overlay>,

        /// Region reducer: "simple" or "quantize"
        #[arg(short, long)]
        mode: Option<ReducerMode>,

        /// Palette JSON (overrides config)
        #[arg(long)]
        palette: Option<PathBuf>,

        /// Layout registry JSON (overrides config)
        #[arg(long)]
        layout: Option<PathBuf>,

        /// Template JSON (overrides config)
        #[arg(long)]
        template: Option<PathBuf>,

        /// Color-code document to write
        #[arg(short, long)]
        output: PathBuf,

        /// Also write key -> { code, rgb } preview JSON
        #[arg(long)]
        preview: Option<PathBuf>,

        /// Also render a preview PNG of the board
        #[arg(long)]
        preview_png: Option<PathBuf>,

        /// Also write the accent/foreground theme JSON
        #[arg(long)]
        theme: Option<PathBuf>,
    },
    /// Print the pixel bounding boxes of every key for a canvas size
    Boxes {
        #[arg(long)]
        width: f64,

        #[arg(long)]
        height: f64,

        /// Layout registry JSON (overrides config)
        #[arg(long)]
        layout: Option<PathBuf>,
    },
    /// Build a normalized layout registry from raw key positions
    NormalizeLayout {
        /// Raw positions JSON (array of { id, x_u, y_u, width_u, height_u, label })
        raw: PathBuf,
        /// Registry JSON to write
        output: PathBuf,
    },
    /// Compare the keys a template references with the layout
    CheckTemplate {
        /// Template JSON (overrides config)
        #[arg(long)]
        template: Option<PathBuf>,

        /// Layout registry JSON (overrides config)
        #[arg(long)]
        layout: Option<PathBuf>,
    },
    /// Write a "#rrggbb" -> code index of a palette
    HexIndex {
        palette: PathBuf,
        output: PathBuf,
    },
    /// Extract the embedded config.yaml for customization
    Init {
        /// Overwrite an existing file
        #[arg(long, short)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "keycap_mapper=info,keycap_match=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let loader = AssetLoader::from_env();

    match cli.command {
        Some(Commands::Generate {
            image,
            overlay,
            mode,
            palette,
            layout,
            template,
            output,
            preview,
            preview_png,
            theme,
        }) => {
            let config = AppConfig::load_from_assets(&loader);
            let mut options = config.reducer.to_options()?;
            if let Some(mode) = mode {
                options.mode = mode;
            }
            let request = GenerateRequest {
                image,
                overlay,
                palette: palette.unwrap_or(config.palette),
                layout: layout.unwrap_or(config.layout),
                template: template.unwrap_or(config.template),
                output_field: config.output_field,
                options,
                output,
                preview,
                preview_png,
                theme,
            };
            run_generate_command(&request)
        }
        Some(Commands::Boxes {
            width,
            height,
            layout,
        }) => {
            let config = AppConfig::load_from_assets(&loader);
            run_boxes_command(width, height, &layout.unwrap_or(config.layout))
        }
        Some(Commands::NormalizeLayout { raw, output }) => {
            let layout = services::normalize_layout(&raw, &output)?;
            println!("Wrote {} keys to {}", layout.len(), output.display());
            Ok(())
        }
        Some(Commands::CheckTemplate { template, layout }) => {
            let config = AppConfig::load_from_assets(&loader);
            run_check_template_command(
                &layout.unwrap_or(config.layout),
                &template.unwrap_or(config.template),
            )
        }
        Some(Commands::HexIndex { palette, output }) => {
            let count = services::write_hex_index(&palette, &output)?;
            println!("Wrote {count} colors to {}", output.display());
            Ok(())
        }
        Some(Commands::Init { force }) => run_init_command(&loader, force),
        None => {
            run_status_command(&loader);
            Ok(())
        }
    }
}

fn run_generate_command(request: &GenerateRequest) -> anyhow::Result<()> {
    let summary = generate(request)?;

    println!(
        "Assigned {} keys ({} warnings)",
        summary.assignment.len(),
        summary.warning_count()
    );
    for (key, color) in summary.assignment.warnings() {
        println!("  ! {key}: {} ({:?})", color.code, color.source);
    }
    for path in &summary.written {
        println!("  + {}", path.display());
    }
    Ok(())
}

fn run_boxes_command(width: f64, height: f64, layout: &Path) -> anyhow::Result<()> {
    let layout = services::load_layout(layout)?;
    let boxes = build_bounding_boxes(width, height, &layout)?;
    let document: BTreeMap<_, _> = boxes
        .into_iter()
        .map(|(key, bbox)| (key, bbox.to_array()))
        .collect();
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

fn run_check_template_command(
    layout: &Path,
    template: &Path,
) -> anyhow::Result<()> {
    let report = services::check_template(layout, template)?;

    if report.is_complete() {
        println!("Template and layout reference the same keys.");
        return Ok(());
    }
    if !report.missing_from_layout.is_empty() {
        println!(
            "Referenced by template, missing from layout ({}):",
            report.missing_from_layout.len()
        );
        for key in &report.missing_from_layout {
            println!("  - {key}");
        }
    }
    if !report.unreferenced.is_empty() {
        println!(
            "In layout, not referenced by template ({}):",
            report.unreferenced.len()
        );
        for key in &report.unreferenced {
            println!("  - {key}");
        }
    }
    Ok(())
}

fn run_init_command(loader: &AssetLoader, force: bool) -> anyhow::Result<()> {
    let report = loader.init(force)?;

    for f in &report.written {
        println!("  + {f}");
    }
    if !report.skipped.is_empty() {
        println!("Skipped existing files (use --force to overwrite):");
        for f in &report.skipped {
            println!("  - {f}");
        }
    }
    Ok(())
}

/// Display status and configuration information
fn run_status_command(loader: &AssetLoader) {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    println!("Keycap Mapper v{VERSION}\n");

    println!("Environment Variables:");
    println!(
        "  CONFIG_FILE = {}",
        loader
            .config_file()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not set)".to_string())
    );

    let config_source = match loader.config_file() {
        Some(path) if loader.uses_external_config() => path.display().to_string(),
        Some(_) => "embedded (file not found)".to_string(),
        None => "embedded".to_string(),
    };
    println!("\nConfig:  {config_source}");

    let config = AppConfig::load_from_assets(loader);
    println!("  palette      = {}", config.palette.display());
    println!("  layout       = {}", config.layout.display());
    println!("  template     = {}", config.template.display());
    println!("  output_field = {}", config.output_field);
    println!("  reducer      = {}", config.reducer.mode);

    println!("\nRun 'keycap-mapper --help' for available commands.");
}
