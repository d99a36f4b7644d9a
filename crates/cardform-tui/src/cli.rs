#![forbid(unsafe_code)]

//! Command-line argument parsing for the `cardform` binary.
//!
//! Parses args by hand in `--flag=value` style. `CARDFORM_*` environment
//! variables override the defaults and are themselves overridden by flags.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::process;

use cardform_core::form::RevalidateMode;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit status for bad arguments.
pub const USAGE_EXIT_CODE: i32 = 2;

pub const HELP_TEXT: &str = "\
cardform - enter credit card details with a live card preview

USAGE:
    cardform [OPTIONS]

OPTIONS:
    --log-file=PATH         Write logs to PATH (default: no logging)
    --log-level=LEVEL       Log filter, e.g. 'debug' or 'cardform_core=trace' (default: info)
    --log-json              Write logs as JSON lines
    --revalidate=MODE       After the first submit, re-check edited fields:
                            'submit' (default, only on submit) or 'change'
    --no-echo               Do not print submitted card details on exit
    --help, -h              Show this help message
    --version, -V           Show version

KEYBINDINGS:
    Tab / Down              Next input
    Shift+Tab / Up          Previous input
    Enter                   Confirm (or go back after confirming)
    Space                   Press the focused button
    Esc / Ctrl+C            Quit

ENVIRONMENT VARIABLES:
    CARDFORM_LOG_FILE       Override --log-file
    CARDFORM_LOG_LEVEL      Override --log-level
    CARDFORM_REVALIDATE     Override --revalidate";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Log destination. `None` disables logging.
    pub log_file: Option<PathBuf>,
    /// `EnvFilter` directive string.
    pub log_level: String,
    /// JSON log lines instead of plain text.
    pub log_json: bool,
    /// When edited fields are re-validated after the first submit.
    pub revalidate: RevalidateMode,
    /// Print submitted field-sets to stdout on exit.
    pub echo: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            log_file: None,
            log_level: "info".into(),
            log_json: false,
            revalidate: RevalidateMode::OnSubmit,
            echo: true,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the form.
    Run(Opts),
    /// Print help and exit.
    Help,
    /// Print the version and exit.
    Version,
}

/// Bad command-line input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    /// An argument that is not recognised.
    UnknownArgument(String),
    /// A recognised option with an unusable value.
    InvalidValue {
        /// Flag or environment variable name.
        option: &'static str,
        /// The rejected value.
        value: String,
    },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::UnknownArgument(arg) => write!(f, "unknown argument: {arg}"),
            CliError::InvalidValue { option, value } => {
                write!(f, "invalid {option} value: {value}")
            }
        }
    }
}

impl std::error::Error for CliError {}

impl Opts {
    /// Parse the process arguments and environment.
    ///
    /// Prints help/version and exits for `--help`/`--version`; prints the
    /// error and exits with [`USAGE_EXIT_CODE`] on bad input.
    pub fn parse() -> Self {
        match Self::try_parse_from(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(Command::Run(opts)) => opts,
            Ok(Command::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Command::Version) => {
                println!("cardform {VERSION}");
                process::exit(0);
            }
            Err(err) => {
                eprintln!("cardform: {err}");
                eprintln!("Run with --help for usage information.");
                process::exit(USAGE_EXIT_CODE);
            }
        }
    }

    /// Parse `args` (without the program name) with `env` as the variable
    /// lookup.
    pub fn try_parse_from<I, F>(args: I, env: F) -> Result<Command, CliError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        // Environment first; flags override below.
        if let Some(val) = env("CARDFORM_LOG_FILE")
            && !val.is_empty()
        {
            opts.log_file = Some(PathBuf::from(val));
        }
        if let Some(val) = env("CARDFORM_LOG_LEVEL") {
            opts.log_level = parse_level("CARDFORM_LOG_LEVEL", &val)?;
        }
        if let Some(val) = env("CARDFORM_REVALIDATE") {
            opts.revalidate = parse_revalidate("CARDFORM_REVALIDATE", &val)?;
        }

        for arg in args {
            let arg: String = arg.into();
            match arg.as_str() {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                "--log-json" => opts.log_json = true,
                "--no-echo" => opts.echo = false,
                other => {
                    if let Some(val) = other.strip_prefix("--log-file=") {
                        if val.is_empty() {
                            return Err(CliError::InvalidValue {
                                option: "--log-file",
                                value: String::new(),
                            });
                        }
                        opts.log_file = Some(PathBuf::from(val));
                    } else if let Some(val) = other.strip_prefix("--log-level=") {
                        opts.log_level = parse_level("--log-level", val)?;
                    } else if let Some(val) = other.strip_prefix("--revalidate=") {
                        opts.revalidate = parse_revalidate("--revalidate", val)?;
                    } else {
                        return Err(CliError::UnknownArgument(other.to_string()));
                    }
                }
            }
        }

        Ok(Command::Run(opts))
    }
}

fn parse_level(option: &'static str, value: &str) -> Result<String, CliError> {
    match EnvFilter::try_new(value) {
        Ok(_) if !value.trim().is_empty() => Ok(value.to_string()),
        _ => Err(CliError::InvalidValue {
            option,
            value: value.to_string(),
        }),
    }
}

fn parse_revalidate(option: &'static str, value: &str) -> Result<RevalidateMode, CliError> {
    value.parse().map_err(|_| CliError::InvalidValue {
        option,
        value: value.to_string(),
    })
}
