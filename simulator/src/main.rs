use anyhow::Context;
use clap::{Parser, Subcommand};
use generator::scene::{write_scene, SceneConfig};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use workflow::config::{ProductKind, WorkflowConfig};
use workflow::runner::Runner;

mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Offline RCS scene synthesizer and imaging workflow driver")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Synthesize a point-scatterer solution: metadata JSON plus sample CSV
    Generate {
        /// Scene description in YAML; the built-in three-point scene otherwise
        #[arg(long)]
        scene: Option<PathBuf>,
        #[arg(long, default_value = "tools/data/scene")]
        output: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Form products from a solution and export them as CSV
    Run {
        /// Load a workflow config from YAML
        #[arg(long)]
        workflow: Option<PathBuf>,
        /// Metadata file, required without --workflow
        #[arg(long)]
        metadata: Option<PathBuf>,
        #[arg(long)]
        output: Option<PathBuf>,
        /// Comma-separated products: rcs, range_profile, waterfall, isar_2d, isar_3d
        #[arg(long, value_delimiter = ',')]
        products: Vec<ProductKind>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Generate {
            scene,
            output,
            seed,
        } => {
            let mut config = match scene {
                Some(path) => SceneConfig::load(path)?,
                None => SceneConfig::default(),
            };
            if let Some(seed) = seed {
                config.seed = seed;
            }
            let metadata = write_scene(&config, &output)?;
            println!(
                "Scene '{}' -> {} ({} scatterers)",
                config.solution,
                metadata.display(),
                config.scatterers.len()
            );
        }
        Command::Run {
            workflow,
            metadata,
            output,
            products,
        } => {
            let mut workflow_config = if let Some(path) = workflow {
                WorkflowConfig::load(path)?
            } else {
                let metadata = metadata.context("--metadata is required without --workflow")?;
                WorkflowConfig::from_args(metadata, None, Vec::new())
            };
            if let Some(output) = output {
                workflow_config.output_dir = output;
            }
            if !products.is_empty() {
                workflow_config.products = products;
            }

            let output_dir = workflow_config.output_dir.clone();
            let result = Runner::new(workflow_config).execute()?;

            println!(
                "Run '{}' channel {} -> {} products, {} failed",
                result.solution,
                result.channel,
                result.metrics.0,
                result.metrics.1
            );
            for report in &result.reports {
                println!("  {:<14} {:>8} rows  {}", report.kind, report.rows, report.path.display());
            }
            for (kind, reason) in &result.failures {
                println!("  {kind:<14} failed: {reason}");
            }
            if !result.rejected.is_empty() {
                println!("  rejected overrides: {}", result.rejected.join(", "));
            }

            let summary = format!(
                "solution={} channel={} formed={} failed={} rejected={:?}\n",
                result.solution, result.channel, result.metrics.0, result.metrics.1, result.rejected
            );
            fs::create_dir_all(&output_dir)?;
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(output_dir.join("run.log"))
                .context("opening run log")?;
            file.write_all(summary.as_bytes())?;
        }
    }

    Ok(())
}
