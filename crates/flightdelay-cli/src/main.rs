use anyhow::Result;
use clap::{Arg, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;

use flightdelay_classifiers::render::describe;
use flightdelay_classifiers::{Carrier, DepartureTimeBlock, FlightQuery};
use flightdelay_cli::choices::render_choices;
use flightdelay_cli::config::AppConfig;
use flightdelay_cli::predict::{build_pipeline, check_year, predict_one, run_batch};
use flightdelay_cli::serve::run_server;

const QUERY_FIELDS: [&str; 5] = ["year", "month", "day", "dep_time_block", "carrier"];

fn parse_block(s: &str) -> Result<DepartureTimeBlock, String> {
    s.parse().map_err(|e: flightdelay_classifiers::PredictionError| e.to_string())
}

fn parse_carrier(s: &str) -> Result<Carrier, String> {
    s.parse().map_err(|e: flightdelay_classifiers::PredictionError| e.to_string())
}

fn config_arg() -> Arg {
    Arg::new("config")
        .help("Path to JSON configuration file")
        .required(false)
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

fn artifact_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("preprocessor")
                .short('p')
                .long("preprocessor")
                .help(
                    "Path or http(s) URL of the preprocessor artifact. \
                     Overrides the preprocessor specified in the configuration file.",
                )
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .value_hint(ValueHint::FilePath),
        )
        .arg(
            Arg::new("model")
                .short('m')
                .long("model")
                .help(
                    "Path or http(s) URL of the model artifact. \
                     Overrides the model specified in the configuration file.",
                )
                .value_parser(clap::builder::NonEmptyStringValueParser::new())
                .value_hint(ValueHint::FilePath),
        )
}

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("FLIGHTDELAY_LOG", "error,flightdelay=info"))
        .init();

    let matches = Command::new("flightdelay")
        .version(clap::crate_version!())
        .about("\u{2708} Flight delay prediction from a pre-trained classifier")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(artifact_args(
            Command::new("predict")
                .about("Predict whether a flight arrives 15 minutes late or more")
                .arg(config_arg())
                .arg(
                    Arg::new("year")
                        .short('y')
                        .long("year")
                        .help("Year of the flight")
                        .value_parser(clap::value_parser!(i32))
                        .required_unless_present("batch"),
                )
                .arg(
                    Arg::new("month")
                        .long("month")
                        .help("Month, 1 (January) to 12 (December)")
                        .value_parser(clap::value_parser!(u32).range(1..=12))
                        .required_unless_present("batch"),
                )
                .arg(
                    Arg::new("day")
                        .short('d')
                        .long("day")
                        .help("Day of the month; must exist in the chosen month and year")
                        .value_parser(clap::value_parser!(u32).range(1..=31))
                        .required_unless_present("batch"),
                )
                .arg(
                    Arg::new("dep_time_block")
                        .short('t')
                        .long("dep-time-block")
                        .help("Departure time block, e.g. 'Early Morning' or early-morning. See `flightdelay choices`.")
                        .value_parser(parse_block)
                        .required_unless_present("batch"),
                )
                .arg(
                    Arg::new("carrier")
                        .short('c')
                        .long("carrier")
                        .help("Operating carrier, e.g. 'Delta Air Lines Inc.'. See `flightdelay choices`.")
                        .value_parser(parse_carrier)
                        .required_unless_present("batch"),
                )
                .arg(
                    Arg::new("batch")
                        .short('b')
                        .long("batch")
                        .help("CSV or TSV file with one query per row instead of the single-query flags")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath)
                        .conflicts_with_all(QUERY_FIELDS),
                )
                .arg(
                    Arg::new("output_file")
                        .short('o')
                        .long("output")
                        .help("Path to write batch predictions (*.csv or *.tsv). Defaults to stdout.")
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath)
                        .requires("batch"),
                ),
        ))
        .subcommand(
            Command::new("choices")
                .about("List the values each form field accepts")
                .arg(config_arg()),
        )
        .subcommand(artifact_args(
            Command::new("serve")
                .about("Serve the prediction form over HTTP")
                .arg(config_arg())
                .arg(
                    Arg::new("host")
                        .long("host")
                        .help("Address to bind. Overrides the host in the configuration file.")
                        .value_parser(clap::builder::NonEmptyStringValueParser::new()),
                )
                .arg(
                    Arg::new("port")
                        .long("port")
                        .help("Port to bind. Overrides the port in the configuration file.")
                        .value_parser(clap::value_parser!(u16)),
                ),
        ))
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Version {version}\n\n\
             {all-args}{after-help}",
        )
        .get_matches();

    match matches.subcommand() {
        Some(("predict", sub_m)) => handle_predict(sub_m),
        Some(("choices", sub_m)) => {
            let config = AppConfig::from_arguments(sub_m)?;
            print!("{}", render_choices(&config.years));
            Ok(())
        }
        Some(("serve", sub_m)) => {
            let config = AppConfig::from_arguments(sub_m)?;
            match run_server(&config) {
                Ok(_) => Ok(()),
                Err(e) => {
                    log::error!("Server failed: {:#}", e);
                    std::process::exit(1)
                }
            }
        }
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn handle_predict(matches: &ArgMatches) -> Result<()> {
    let config = AppConfig::from_arguments(matches)?;

    if let Some(batch_path) = matches.get_one::<PathBuf>("batch") {
        eprintln!("[FlightDelay::Predict] Scoring batch file: {:?}", batch_path);
        let pipeline = build_pipeline(&config)?;
        let output_path: Option<&PathBuf> = matches.get_one("output_file");
        return match run_batch(&pipeline, &config, batch_path, output_path) {
            Ok(summary) => {
                eprintln!(
                    "[FlightDelay::Predict] Completed {} rows: {} delayed, {} not delayed, {} failed.",
                    summary.rows, summary.delayed, summary.not_delayed, summary.failed
                );
                Ok(())
            }
            Err(e) => {
                log::error!("Batch prediction failed: {:#}", e);
                std::process::exit(1)
            }
        };
    }

    // clap enforces presence of every query field when --batch is absent.
    let year = *matches.get_one::<i32>("year").unwrap();
    let month = *matches.get_one::<u32>("month").unwrap();
    let day = *matches.get_one::<u32>("day").unwrap();
    let block = *matches.get_one::<DepartureTimeBlock>("dep_time_block").unwrap();
    let carrier = *matches.get_one::<Carrier>("carrier").unwrap();

    // Reject an impossible date or an unoffered year before touching the artifacts.
    let query = match FlightQuery::new(year, month, day, block, carrier)
        .and_then(|query| check_year(&config.years, &query).map(|_| query))
    {
        Ok(query) => query,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1)
        }
    };

    let pipeline = build_pipeline(&config)?;
    match predict_one(&pipeline, &config.years, &query) {
        Ok(prediction) => {
            println!("{}", describe(&prediction));
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1)
        }
    }
}
