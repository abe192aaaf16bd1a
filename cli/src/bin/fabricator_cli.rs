use clap::{Parser, Subcommand};
use cli::{report, run_batch, FabricatorConfig};
use color_eyre::eyre::Result;
use fabricator_common::{Precision, ShapeHint, ShapeRecord};
use serde::Serialize;
use sketch::{samples, SketchPipeline};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML or JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Infer a shape from a text description
    Text {
        /// Description such as "Rectangle 100mm by 50mm"
        text: String,
        /// Expected shape (auto, circle, rectangle, triangle, hexagon, polygon)
        #[arg(long, default_value = "auto")]
        hint: ShapeHint,
    },
    /// Infer a shape from a sketch image
    Sketch {
        image: PathBuf,
        #[arg(long, default_value = "auto")]
        hint: ShapeHint,
        /// Precision level 1-10 (defaults to the configured precision)
        #[arg(short, long)]
        precision: Option<Precision>,
    },
    /// Process several sketches in parallel
    Batch {
        #[arg(required = true)]
        images: Vec<PathBuf>,
        #[arg(long, default_value = "auto")]
        hint: ShapeHint,
        #[arg(short, long)]
        precision: Option<Precision>,
    },
    /// Write the synthetic sample sketches as PNG files
    Samples {
        /// Output directory (defaults to the configured samples directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Print the JSON schema of the shape record
    Schema {
        /// Print the configuration file schema instead
        #[arg(long)]
        settings: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = FabricatorConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Text { text, hint } => {
            let record = description::describe(&text, hint);
            report(&config, &record);
            print_json(&record)?;
        }
        Commands::Sketch { image, hint, precision } => {
            let precision = precision.unwrap_or(config.default_precision);
            let record = process_sketch(&config, &image, hint, precision)?;
            print_json(&record)?;
        }
        Commands::Batch { images, hint, precision } => {
            let precision = precision.unwrap_or(config.default_precision);
            let entries = run_batch(&config, images, hint, precision).await;
            print_json(&entries)?;
        }
        Commands::Samples { output_dir } => {
            let dir = output_dir.unwrap_or_else(|| config.samples_dir.clone());
            write_samples(&dir)?;
        }
        Commands::Schema { settings } => {
            if settings {
                print_json(&schemars::schema_for!(FabricatorConfig))?;
            } else {
                print_json(&ShapeRecord::schema())?;
            }
        }
    }

    Ok(())
}

fn process_sketch(config: &FabricatorConfig, image: &Path, hint: ShapeHint, precision: Precision) -> Result<ShapeRecord> {
    let bytes = config.read_image(image)?;
    info!("Processing sketch {:?} (precision {}, hint {})", image, precision, hint);

    let record = SketchPipeline::new(precision, hint).process_bytes(&bytes)?;
    report(config, &record);
    Ok(record)
}

fn write_samples(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    for sample in samples::sample_sketches() {
        let path = sample.save_to(dir)?;
        info!("Created {:?}", path);
    }
    info!("✅ Sample sketches written to {:?}", dir);
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
