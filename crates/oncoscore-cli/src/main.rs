use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use log::LevelFilter;
use std::path::PathBuf;
use std::str::FromStr;

use oncoscore_classifiers::config::ModelKind;
use oncoscore_cli::commands::config::from_arguments;
use oncoscore_cli::commands::diagnose::run_diagnose;
use oncoscore_cli::commands::evaluate::run_evaluate;
use oncoscore_cli::commands::tree::run_tree;

const DEFAULT_REPORT: &str = "oncoscore_report.html";

fn genes_arg() -> Arg {
    Arg::new("genes")
        .help("Path to the genes CSV file (Gene_ID,Mutation_Score,Label)")
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

fn config_arg() -> Arg {
    Arg::new("config")
        .help("Path to a JSON diagnosis configuration file")
        .required(false)
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

fn no_standardize_arg() -> Arg {
    Arg::new("no_standardize")
        .long("no-standardize")
        .help("Train on raw mutation scores instead of standardized ones.")
        .action(ArgAction::SetTrue)
}

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("ONCOSCORE_LOG", "error,oncoscore=info"))
        .init();

    let matches = Command::new("oncoscore")
        .version(clap::crate_version!())
        .about("Cancer risk classification from genetic mutation scores")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("evaluate")
                .about("Train every configured model on a training split and evaluate it on the held-out split")
                .arg(genes_arg())
                .arg(config_arg())
                .arg(
                    Arg::new("test_fraction")
                        .long("test-fraction")
                        .help("Fraction of records held out for evaluation. Overrides the config file.")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .help("Seed of the train/test shuffle. Overrides the config file.")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(no_standardize_arg())
                .arg(
                    Arg::new("report")
                        .short('r')
                        .long("report")
                        .help("Path of the HTML report.")
                        .default_value(DEFAULT_REPORT)
                        .value_parser(clap::value_parser!(PathBuf))
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("no_report")
                        .long("no-report")
                        .help("Disable HTML report generation.")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("diagnose")
                .about("Train on all records and report the risk of one patient")
                .arg(genes_arg())
                .arg(config_arg())
                .arg(
                    Arg::new("score")
                        .short('s')
                        .long("score")
                        .help("Mutation score of the patient. May be repeated.")
                        .num_args(1..)
                        .action(ArgAction::Append)
                        .allow_negative_numbers(true)
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    Arg::new("gene")
                        .short('g')
                        .long("gene")
                        .help("Gene of the patient; its score is taken from the genes file. May be repeated.")
                        .num_args(1..)
                        .action(ArgAction::Append)
                        .value_parser(clap::builder::NonEmptyStringValueParser::new()),
                )
                .arg(
                    Arg::new("model")
                        .short('m')
                        .long("model")
                        .help("Query a single model instead of all configured ones.")
                        .value_parser(["logistic", "knn", "tree", "bayes"])
                        .value_hint(ValueHint::Other),
                )
                .arg(no_standardize_arg()),
        )
        .subcommand(
            Command::new("tree")
                .about("Train on all records and print the fitted decision tree")
                .arg(genes_arg())
                .arg(config_arg())
                .arg(no_standardize_arg()),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Version {version}\n\n\
             {all-args}{after-help}",
        )
        .get_matches();

    match matches.subcommand() {
        Some(("evaluate", sub_m)) => handle_evaluate(sub_m),
        Some(("diagnose", sub_m)) => handle_diagnose(sub_m),
        Some(("tree", sub_m)) => handle_tree(sub_m),
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn genes_path(matches: &ArgMatches) -> &PathBuf {
    matches
        .get_one::<PathBuf>("genes")
        .expect("genes is a required argument")
}

fn handle_evaluate(matches: &ArgMatches) -> Result<()> {
    let genes = genes_path(matches);
    log::info!("[oncoscore::evaluate] Evaluating models on {:?}", genes);

    let config = from_arguments(matches)?;
    let report = if matches.get_flag("no_report") {
        None
    } else {
        matches.get_one::<PathBuf>("report")
    };

    let evaluations = run_evaluate(genes, &config, report.map(|p| p.as_path()))?;
    eprintln!(
        "[oncoscore::evaluate] Completed evaluation of {} models.",
        evaluations.len()
    );
    Ok(())
}

fn handle_diagnose(matches: &ArgMatches) -> Result<()> {
    let genes = genes_path(matches);
    let config = from_arguments(matches)?;

    let scores: Vec<f64> = matches
        .get_many::<f64>("score")
        .map(|values| values.copied().collect())
        .unwrap_or_default();
    let gene_ids: Vec<String> = matches
        .get_many::<String>("gene")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let model = matches
        .get_one::<String>("model")
        .map(|name| ModelKind::from_str(name).map_err(anyhow::Error::msg))
        .transpose()?;

    run_diagnose(genes, &config, &scores, &gene_ids, model)?;
    Ok(())
}

fn handle_tree(matches: &ArgMatches) -> Result<()> {
    let genes = genes_path(matches);
    let config = from_arguments(matches)?;
    run_tree(genes, &config)?;
    Ok(())
}
