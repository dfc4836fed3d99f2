pub mod apportionment;
pub mod config;
pub mod data;
pub mod output;
pub mod processing;
pub mod projection;
pub mod sampling;
pub mod seed;
pub mod triangulation;
pub mod types;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the per-language polygon map
    Generate {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Generate { config } => {
            println!("Generating language polygons with config: {:?}", config);
            let app_config = config::AppConfig::load_from_file(config)?;

            // 1. Load Inputs
            let features = data::load_boundaries(&app_config)?;
            let distribution =
                data::load_language_distribution(&app_config.input.language_distribution)?;

            // 2. Subdivide countries into polygons
            println!("Creating country polygons...");
            let (country_polygons, outcomes) =
                processing::build_country_polygons(&app_config, features)?;
            let skipped: usize = outcomes.iter().map(|o| o.skipped_outlines.len()).sum();
            println!(
                "Created polygons for {} countries ({} outlines skipped).",
                outcomes.len(),
                skipped
            );
            for outcome in outcomes.iter().filter(|o| !o.skipped_outlines.is_empty()) {
                println!(
                    "  {} ({}): skipped {} outline(s)",
                    outcome.name,
                    outcome.code,
                    outcome.skipped_outlines.len()
                );
            }

            // 3. Apportion polygons to languages
            println!("Assigning country polygons based on language distribution...");
            let language_polygons =
                apportionment::assign_language_polygons(&app_config, country_polygons, &distribution);

            // 4. Write the artifact
            output::write_language_polygons(&app_config.output.file, &language_polygons)?;
            println!(
                "Wrote {} languages to {:?}",
                language_polygons.len(),
                app_config.output.file
            );
        }
    }

    Ok(())
}
