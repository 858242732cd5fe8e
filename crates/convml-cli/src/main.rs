use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Arg, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use convml_cli::experiments::{load_experiment_config, run_experiments, ExperimentConfig};
use convml_cli::update::{load_update_config, run_update, UpdateConfig};

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("CONVML_LOG", "error,convml=info"))
        .init();

    let matches = Command::new("convml")
        .version(clap::crate_version!())
        .about("Conversion-prediction experiments and incremental model updates")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("experiments")
                .about("Run classifier evaluation experiments")
                .subcommand(
                    Command::new("run")
                        .about("Cross-validate all model/subset/scaling combinations")
                        .arg(
                            Arg::new("config")
                                .help("Path to experiment configuration file (JSON)")
                                .required(false)
                                .value_parser(clap::value_parser!(PathBuf))
                                .value_hint(ValueHint::FilePath),
                        )
                        .arg(
                            Arg::new("dataset")
                                .short('d')
                                .long("dataset")
                                .help(
                                    "Path to the dataset CSV. Overrides the dataset \
                                     specified in the configuration file.",
                                )
                                .value_parser(clap::value_parser!(PathBuf))
                                .value_hint(ValueHint::FilePath),
                        )
                        .arg(
                            Arg::new("output")
                                .short('o')
                                .long("output")
                                .help(
                                    "Path the ranked leaderboard CSV is written to. \
                                     Overrides the configuration file.",
                                )
                                .value_parser(clap::value_parser!(PathBuf))
                                .value_hint(ValueHint::FilePath),
                        )
                        .arg(
                            Arg::new("folds")
                                .short('k')
                                .long("folds")
                                .help("Number of cross-validation folds.")
                                .value_parser(clap::value_parser!(usize)),
                        ),
                ),
        )
        .subcommand(
            Command::new("model")
                .about("Manage the deployed model artifact")
                .subcommand(
                    Command::new("update")
                        .about("Partial-fit the persisted model on the trailing data window")
                        .arg(
                            Arg::new("config")
                                .help("Path to update configuration file (JSON)")
                                .required(false)
                                .value_parser(clap::value_parser!(PathBuf))
                                .value_hint(ValueHint::FilePath),
                        )
                        .arg(
                            Arg::new("data")
                                .short('d')
                                .long("data")
                                .help(
                                    "Path to the labeled-rows CSV. Overrides the \
                                     configuration file.",
                                )
                                .value_parser(clap::value_parser!(PathBuf))
                                .value_hint(ValueHint::FilePath),
                        )
                        .arg(
                            Arg::new("artifact")
                                .short('m')
                                .long("artifact")
                                .help(
                                    "Path to the serialized model artifact. Overrides \
                                     the configuration file.",
                                )
                                .value_parser(clap::value_parser!(PathBuf))
                                .value_hint(ValueHint::FilePath),
                        )
                        .arg(
                            Arg::new("as_of")
                                .long("as-of")
                                .help(
                                    "Reference date (YYYY-MM-DD) the trailing window is \
                                     computed from. Defaults to today.",
                                )
                                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                                .value_hint(ValueHint::Other),
                        ),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("experiments", sub_m)) => handle_experiments(sub_m),
        Some(("model", sub_m)) => handle_model(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn handle_experiments(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("run", run_matches)) => {
            let mut config = if let Some(config_path) = run_matches.get_one::<PathBuf>("config") {
                log::info!("[convml::experiments] Using config: {:?}", config_path);
                load_experiment_config(config_path)?
            } else {
                eprintln!("[convml::experiments] No config provided; using defaults.");
                ExperimentConfig::default()
            };

            if let Some(dataset) = run_matches.get_one::<PathBuf>("dataset") {
                config.dataset_path = dataset.clone();
            }
            if let Some(output) = run_matches.get_one::<PathBuf>("output") {
                config.output_path = output.clone();
            }
            if let Some(folds) = run_matches.get_one::<usize>("folds") {
                config.folds = *folds;
            }

            match run_experiments(&config) {
                Ok(()) => Ok(()),
                Err(e) => {
                    log::error!("Experiment run failed: {:#}", e);
                    std::process::exit(1)
                }
            }
        }
        _ => unreachable!(),
    }
}

fn handle_model(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("update", update_matches)) => {
            let mut config = if let Some(config_path) = update_matches.get_one::<PathBuf>("config")
            {
                log::info!("[convml::model] Using config: {:?}", config_path);
                load_update_config(config_path)?
            } else {
                eprintln!("[convml::model] No config provided; using defaults.");
                UpdateConfig::default()
            };

            if let Some(data) = update_matches.get_one::<PathBuf>("data") {
                config.data_path = data.clone();
            }
            if let Some(artifact) = update_matches.get_one::<PathBuf>("artifact") {
                config.artifact_path = artifact.clone();
            }

            let as_of_date = match update_matches.get_one::<String>("as_of") {
                Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
                    .map_err(|e| anyhow::anyhow!("Invalid --as-of date '{}': {}", value, e))?,
                None => Local::now().date_naive(),
            };

            match run_update(&config, as_of_date) {
                Ok(()) => Ok(()),
                Err(e) => {
                    log::error!("Incremental update failed: {:#}", e);
                    std::process::exit(1)
                }
            }
        }
        _ => unreachable!(),
    }
}
