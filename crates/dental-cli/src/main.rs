//! `dental-rules` command-line harness.

use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::{ColorChoice, Parser};
use dental_cli::commands::{
    load_catalog, run_additions, run_catalog, run_classify, run_disease_check, run_search,
    run_suggest, run_validate,
};
use dental_cli::logging::{LogConfig, LogFormat, init_logging};
use dental_cli::requests::read_json;
use dental_model::{QuestionDefinition, ResponseData};
use dental_standards::RuleCatalog;
use tracing::level_filters::LevelFilter;

mod cli;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::summary::{
    print_additions, print_catalog_report, print_classification, print_compatibility,
    print_disease_check, print_search, print_suggestions,
};

/// Exit status when a validation request is blocked by an exclusion rule.
const EXIT_BLOCKED: i32 = 2;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<i32> {
    let json = cli.json;
    match &cli.command {
        Command::Catalog => {
            let report = run_catalog(cli.catalog.as_deref())?;
            print_catalog_report(&report, json)?;
            Ok(0)
        }
        Command::Validate(args) => {
            let catalog = catalog(cli)?;
            let result = run_validate(&catalog, &read_json(&args.request)?)?;
            print_compatibility(&result, json)?;
            Ok(if result.can_add { 0 } else { EXIT_BLOCKED })
        }
        Command::Additions(args) => {
            let catalog = catalog(cli)?;
            let entries = run_additions(&catalog, &read_json(&args.request)?)?;
            print_additions(&entries, json)?;
            Ok(0)
        }
        Command::Suggest(args) => {
            let catalog = catalog(cli)?;
            let entries = run_suggest(&catalog, &read_json(&args.request)?);
            print_suggestions(&entries, json)?;
            Ok(0)
        }
        Command::DiseaseCheck(args) => {
            let catalog = catalog(cli)?;
            let result = run_disease_check(&catalog, &read_json(&args.request)?);
            print_disease_check(&result, json)?;
            Ok(0)
        }
        Command::Classify(args) => {
            let catalog = catalog(cli)?;
            let responses: ResponseData = read_json(&args.responses)?;
            let questions: Vec<QuestionDefinition> = read_json(&args.questions)?;
            let outcome =
                run_classify(&catalog, &responses, &questions, args.mappings.as_deref())?;
            print_classification(&outcome, json)?;
            Ok(0)
        }
        Command::Search(args) => {
            let catalog = catalog(cli)?;
            let codes = run_search(&catalog, &args.keyword, args.category.as_deref());
            print_search(&codes, json)?;
            Ok(0)
        }
    }
}

fn catalog(cli: &Cli) -> Result<RuleCatalog> {
    let (catalog, _) = load_catalog(cli.catalog.as_deref(), cli.as_of)?;
    Ok(catalog)
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file.clone_from(&cli.log_file);
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
