//! scribelint CLI
//!
//! A syntax-aware prose linter driven by user-authored style rules.

mod output;

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use scribelint_core::{Config, Linter, Severity};

use output::OutputFormat;

/// scribelint - a syntax-aware prose linter
#[derive(Parser)]
#[command(name = "sblint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Treat configuration errors as fatal
    #[arg(long, global = true)]
    strict: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint files, globs, or standard input
    Lint {
        /// Files or glob patterns; reads stdin when omitted
        inputs: Vec<String>,

        /// Output format (human, line, JSON)
        #[arg(short, long, default_value = "human")]
        format: String,

        /// Override the configured minimum alert level
        #[arg(long)]
        min_alert_level: Option<String>,

        /// Extension used to pick a format for stdin input
        #[arg(long, default_value = ".txt")]
        ext: String,

        /// Number of parallel workers (default: logical CPUs)
        #[arg(long)]
        jobs: Option<usize>,

        /// Always exit 0, even when alerts are found
        #[arg(long)]
        no_exit: bool,
    },

    /// Print the path of the configuration file in use
    LsConfig,

    /// List the styles enabled by the configuration
    LsStyles,

    /// Dump one compiled rule by its fully-qualified name
    DumpRule {
        /// The rule to dump, as Style.Rule
        name: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Lint {
            inputs,
            format,
            min_alert_level,
            ext,
            jobs,
            no_exit,
        } => run_lint(
            config,
            inputs,
            format,
            min_alert_level.as_deref(),
            ext,
            *jobs,
            *no_exit,
        ),
        Commands::LsConfig => {
            match config_path(&cli) {
                Some(path) => println!("{}", path.display()),
                None => println!("(no configuration file found, using defaults)"),
            }
            Ok(ExitCode::from(1))
        }
        Commands::LsStyles => {
            for style in config.all_styles() {
                println!("{style}");
            }
            Ok(ExitCode::from(1))
        }
        Commands::DumpRule { name } => {
            let linter = Linter::new(config).into_diagnostic()?;
            match linter.ruleset().get(name) {
                Some(rule) => {
                    println!("{rule:#?}");
                    Ok(ExitCode::from(1))
                }
                None => Err(miette::miette!("no rule named '{name}'")),
            }
        }
    }
}

fn config_path(cli: &Cli) -> Option<PathBuf> {
    cli.config.clone().or_else(|| Config::discover("."))
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match config_path(cli) {
        Some(path) => {
            info!("using config: {}", path.display());
            Config::from_file(&path).into_diagnostic()?
        }
        None => {
            info!("no config file found, using defaults");
            Config::default()
        }
    };
    if cli.strict {
        config.strict = true;
    }
    Ok(config)
}

fn run_lint(
    mut config: Config,
    inputs: &[String],
    format: &str,
    min_alert_level: Option<&str>,
    ext: &str,
    jobs: Option<usize>,
    no_exit: bool,
) -> Result<ExitCode> {
    let format: OutputFormat = format.parse().map_err(|e: String| miette::miette!(e))?;

    if let Some(level) = min_alert_level {
        config.min_alert_level = level
            .parse::<Severity>()
            .map_err(|e| miette::miette!("--min-alert-level: {e}"))?;
    }
    if jobs.is_some() {
        config.jobs = jobs;
    }

    let linter = Linter::new(config).into_diagnostic()?;

    for err in linter.config_errors() {
        eprintln!("configuration error: {err}");
    }

    let (results, failures) = if inputs.is_empty() {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .into_diagnostic()?;
        let name = format!("stdin{}", normalize_ext(ext));
        let result = linter.lint_string(&name, &source).into_diagnostic()?;
        (vec![result], Vec::new())
    } else {
        let files = linter.discover(inputs).into_diagnostic()?;
        linter.lint_files(&files)
    };

    for (path, err) in &failures {
        eprintln!("{}: {}", path.display(), err);
    }

    print!("{}", output::render(&results, format));

    let has_alerts = results.iter().any(|r| !r.alerts.is_empty());
    if !failures.is_empty() {
        return Ok(ExitCode::from(2));
    }
    if has_alerts && !no_exit {
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}

fn normalize_ext(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{ext}")
    }
}
