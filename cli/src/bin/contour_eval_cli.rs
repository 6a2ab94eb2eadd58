use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::Result;
use contour_eval::{load_image, save_overlay, write_report, GroundTruthStore, Pipeline};
use contour_eval_cli::{RunConfig, RunOverrides};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{self, EnvFilter};

#[derive(Parser)]
#[command(author, version, about = "Score contour detections against ground-truth outlines", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect contours in an image and score them against annotations
    Run(RunArgs),
    /// Print the JSON schema of the run configuration file
    Schema,
    /// Write a configuration file with default settings
    InitConfig {
        /// Where to write the TOML configuration
        #[arg(short, long, default_value = "contour_eval.toml")]
        output: PathBuf,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Path to a .toml or .json run configuration
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[command(flatten)]
    overrides: RunOverrides,
}

impl RunArgs {
    /// Start from the config file (or defaults) and apply command-line overrides
    fn into_config(self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_file(path)?,
            None => RunConfig::default(),
        };
        config.apply_overrides(self.overrides);
        Ok(config)
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            let config = args.into_config()?;
            run_evaluation(&config)?;
        }
        Commands::Schema => {
            println!("{}", serde_json::to_string_pretty(&RunConfig::schema())?);
        }
        Commands::InitConfig { output } => {
            init_config(&output)?;
        }
    }

    Ok(())
}

fn run_evaluation(config: &RunConfig) -> Result<()> {
    // Build first so a bad configuration fails before any file is touched
    let pipeline = Pipeline::from_config(&config.evaluation)?;
    info!("{}", pipeline.info());

    let image_path = config.image_path()?;
    let ground_truth_path = config.ground_truth_path()?;

    let image = load_image(image_path)?;
    let ground_truth = GroundTruthStore::load(&ground_truth_path)?;

    let evaluation = pipeline.evaluate(&image, ground_truth.objects())?;

    if let Some(overlay_path) = &config.overlay_path {
        save_overlay(overlay_path, &image, &evaluation.detections)?;
    }
    let report_path = config.report_path();
    write_report(&report_path, config.report_format, &evaluation.records)?;

    let summary = evaluation.summary;
    info!(
        "{} detections, {} overlapping ground truth, mean detection percentage {:.2}",
        summary.detections, summary.matched_detections, summary.mean_detection_percentage
    );
    info!("Report saved to: {:?}", report_path);
    Ok(())
}

fn init_config(output: &Path) -> Result<()> {
    let config = RunConfig {
        image_path: Some(PathBuf::from("image.jpg")),
        ..RunConfig::default()
    };
    config.to_toml_file(output)?;
    info!("Default configuration written to: {:?}", output);
    Ok(())
}
