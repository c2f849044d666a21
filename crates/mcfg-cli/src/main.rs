//! `mcfgctl`: upgrade, validate and report on model configuration documents
//!
//! Logging goes to stderr, filtered by `MCFG_LOG` (default `info`).

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use mcfg_cli::{create_metrics_report, format_summary, has_kind, CliSettings, DocumentFormat};
use mcfg_schema::{model_config_schema, ConfigValidator, FeatureTypeRegistry, SchemaError};
use mcfg_upgrade::{ConfigDocument, NoticeCollector, NoticeKind, NoticeSink, TracingSink};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("mcfgctl")
        .version(mcfg_cli::VERSION)
        .about("Upgrade and validate model configuration documents")
        .subcommand_required(true)
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Suppress the upgrade summary"),
        )
        .arg(
            Arg::new("log")
                .long("log")
                .global(true)
                .default_value("info")
                .help("Log filter used when MCFG_LOG is unset"),
        )
        .subcommand(
            Command::new("upgrade")
                .about("Rewrite deprecated fields into the current shape")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Config file (.json, .yaml or .yml)"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_parser(value_parser!(PathBuf))
                        .help("Write the upgraded config here instead of stdout"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .value_parser(DocumentFormat::NAMES)
                        .help("Output format, defaults to the input's"),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Upgrade and validate a config, listing every violation")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Config file (.json, .yaml or .yml)"),
                ),
        )
        .subcommand(Command::new("schema").about("Print the JSON schema of the current config shape"))
        .subcommand(
            Command::new("report")
                .about("Merge experiment metrics into metrics_report/full_report.json")
                .arg(
                    Arg::new("experiment_dir")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Experiment directory"),
                ),
        )
}

fn settings_from(matches: &ArgMatches) -> Result<CliSettings> {
    let mut settings = CliSettings::new().with_quiet(matches.get_flag("quiet"));
    if let Ok(Some(filter)) = matches.try_get_one::<String>("log") {
        settings = settings.with_log_filter(filter.clone());
    }
    if let Ok(Some(format)) = matches.try_get_one::<String>("format") {
        settings = settings.with_format(format.parse()?);
    }
    Ok(settings)
}

fn init_tracing(settings: &CliSettings) {
    let filter = EnvFilter::try_from_env(CliSettings::LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn path_arg<'a>(matches: &'a ArgMatches, name: &str) -> Result<&'a PathBuf> {
    matches
        .get_one::<PathBuf>(name)
        .with_context(|| format!("missing argument <{name}>"))
}

fn read_document(path: &Path) -> Result<ConfigDocument> {
    let text = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    DocumentFormat::from_path(path)
        .parse(&text)
        .with_context(|| format!("failed to parse {}", path.display()))
}

fn upgrade(matches: &ArgMatches, settings: &CliSettings) -> Result<ExitCode> {
    let input = path_arg(matches, "file")?;
    let mut document = read_document(input)?;

    let notices = NoticeCollector::new();
    document.upgrade(&FeatureTypeRegistry::with_defaults(), &notices)?;
    let notices = notices.drain();
    for notice in &notices {
        TracingSink.emit(notice.clone());
    }

    let rendered = settings.output_format(input).render(&document)?;
    match matches.get_one::<PathBuf>("output") {
        Some(output) => {
            fs::write(output, rendered).with_context(|| format!("failed to write {}", output.display()))?;
        }
        None => println!("{rendered}"),
    }

    if has_kind(&notices, NoticeKind::PreprocessingMovedToDefaults) {
        tracing::info!("type-level preprocessing now lives under `defaults`; review merged values");
    }
    if !settings.quiet {
        eprintln!("{}", format_summary(&notices));
    }
    Ok(ExitCode::SUCCESS)
}

fn validate(matches: &ArgMatches) -> Result<ExitCode> {
    let input = path_arg(matches, "file")?;
    let document = read_document(input)?;
    let validator = ConfigValidator::new()?;

    match validator.load(document.into_inner(), &FeatureTypeRegistry::with_defaults(), &TracingSink) {
        Ok(model) => {
            println!(
                "{}: valid ({} input, {} output feature(s))",
                input.display(),
                model.input_features.len(),
                model.output_features.len()
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(SchemaError::Invalid(violations)) => {
            println!("{}: {} violation(s)", input.display(), violations.len());
            for violation in violations {
                println!("  {violation}");
            }
            Ok(ExitCode::FAILURE)
        }
        Err(err) => {
            println!("{}: {err}", input.display());
            Ok(ExitCode::FAILURE)
        }
    }
}

fn schema() -> Result<ExitCode> {
    let schema = model_config_schema()?;
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(ExitCode::SUCCESS)
}

fn report(matches: &ArgMatches, settings: &CliSettings) -> Result<ExitCode> {
    let dir = path_arg(matches, "experiment_dir")?;
    let (report, path) = create_metrics_report(dir)?;
    if !settings.quiet {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    eprintln!("report written to {}", path.display());
    Ok(ExitCode::SUCCESS)
}

fn run(matches: &ArgMatches) -> Result<ExitCode> {
    let sub = matches.subcommand();
    let settings = match sub {
        Some((_, args)) => settings_from(args)?,
        None => settings_from(matches)?,
    };
    init_tracing(&settings);

    match sub {
        Some(("upgrade", args)) => upgrade(args, &settings),
        Some(("validate", args)) => validate(args),
        Some(("schema", _)) => schema(),
        Some(("report", args)) => report(args, &settings),
        _ => Ok(ExitCode::FAILURE),
    }
}

fn main() -> ExitCode {
    let matches = cli().get_matches();
    match run(&matches) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
