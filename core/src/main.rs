use clap::Parser;
use log::{error, info};
use petpair_core::cli::{Cli, OutputFormat};
use petpair_core::{DatasetIndex, PathsReport, TextReport};
use std::process;

fn main() {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose);

    // Verify directory exists
    if !cli.directory.is_dir() {
        eprintln!("Error: {} is not a directory", cli.directory.display());
        process::exit(1);
    }

    info!("Processing dataset: {}", cli.directory.display());

    let config = cli.pairing_config();
    info!("Using pairing configuration: {:?}", config);

    let index = match DatasetIndex::scan_with_config(&cli.directory, &config) {
        Ok(index) => index,
        Err(e) => {
            error!("Failed to index dataset: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    output_index(&index, cli.format);
}

fn setup_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }
}

fn output_index(index: &DatasetIndex, format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            println!("{}", TextReport::new(index));
        }
        OutputFormat::Paths => {
            print!("{}", PathsReport::new(index));
        }
        OutputFormat::Json => {
            #[cfg(feature = "json")]
            {
                match output_json(index) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        error!("Failed to serialize to JSON: {}", e);
                        eprintln!("Error: Failed to serialize to JSON: {}", e);
                        process::exit(1);
                    }
                }
            }
            #[cfg(not(feature = "json"))]
            {
                eprintln!("Error: JSON output requires the 'json' feature");
                eprintln!("Rebuild with: cargo build --features json");
                process::exit(1);
            }
        }
    }
}

#[cfg(feature = "json")]
fn output_json(index: &DatasetIndex) -> Result<String, serde_json::Error> {
    use petpair_core::{MatchRule, RunGroup};
    use serde::Serialize;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    struct IndexJson<'a> {
        root: String,
        pairings: BTreeMap<&'a str, Vec<PairJson>>,
        run_groups: Vec<&'a RunGroup>,
    }

    #[derive(Serialize)]
    struct PairJson {
        pet: String,
        anat: String,
        rule: MatchRule,
        runs: usize,
    }

    let pairings = index
        .pairings()
        .iter()
        .map(|(subject, pairing)| {
            let pairs = pairing
                .iter()
                .map(|(pet, paired)| PairJson {
                    pet: pet.path.display().to_string(),
                    anat: paired.anat.path.display().to_string(),
                    rule: paired.rule,
                    runs: index.run_group_for(pet).map(|g| g.len()).unwrap_or(1),
                })
                .collect();
            (subject.as_str(), pairs)
        })
        .collect();

    let output = IndexJson {
        root: index.root().display().to_string(),
        pairings,
        run_groups: index.run_groups().iter().collect(),
    };

    serde_json::to_string_pretty(&output)
}
