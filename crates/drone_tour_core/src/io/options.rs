use std::{env, path::Path};

use drone_tour_derive::{CliOptions, CliValue, KvDisplay};
use log::LevelFilter;

use crate::{Error, Result};

const MAX_PRECISION: usize = 12;

/// Runtime options for a solve.
#[derive(Clone, Debug, CliOptions, KvDisplay)]
pub struct SolverOptions {
    /// What to compute: `MST`, `FASTTSP` or `OPTTSP`.
    #[cli(long = "mode", short = "m", parse_with = "SolveMode::parse")]
    #[kv(fmt = "opt")]
    pub mode: Option<SolveMode>,
    /// Decimal places used for costs in the report.
    #[cli(long = "precision")]
    pub precision: usize,
    /// Input file with the site count and coordinates. Empty means stdin.
    #[cli(long = "input")]
    #[kv(empty = "stdin")]
    pub input: String,
    /// Report destination. Empty means stdout.
    #[cli(long = "output")]
    #[kv(empty = "stdout")]
    pub output: String,
    #[cli(long = "log-level", parse_with = "LogLevel::parse")]
    pub log_level: LogLevel,
    #[cli(long = "log-format", parse_with = "LogFormat::parse")]
    pub log_format: LogFormat,
    /// Prefix log lines with a millisecond timestamp.
    #[cli(long = "log-timestamp")]
    pub log_timestamp: bool,
    /// Log file. Empty means stderr.
    #[cli(long = "log-output")]
    #[kv(empty = "stderr")]
    pub log_output: String,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "mode")]
pub enum SolveMode {
    /// Campus-aware minimum spanning network.
    #[cli(name = "MST")]
    Mst,
    /// Cheapest-insertion tour.
    #[cli(name = "FASTTSP", alias = "fast-tsp")]
    FastTsp,
    /// Exact branch-and-bound tour.
    #[cli(name = "OPTTSP", alias = "opt-tsp")]
    OptTsp,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-level")]
pub enum LogLevel {
    Error,
    #[cli(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
    Off,
}

impl LogLevel {
    pub fn to_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
            Self::Off => LevelFilter::Off,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, CliValue)]
#[cli_value(option = "log-format")]
pub enum LogFormat {
    Compact,
    Pretty,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            mode: None,
            precision: 2,
            input: String::new(),
            output: String::new(),
            log_level: LogLevel::Warn,
            log_format: LogFormat::Compact,
            log_timestamp: false,
            log_output: String::new(),
        }
    }
}

impl SolverOptions {
    pub fn from_args() -> Result<Self> {
        Self::parse_from_iter(env::args().skip(1))
    }

    pub fn parse_from_iter<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        let mut args = args
            .into_iter()
            .map(|arg| arg.as_ref().to_owned())
            .peekable();

        while let Some(arg) = args.next() {
            if arg == "--help" || arg == "-h" {
                return Err(Error::Help(Self::usage().to_owned()));
            }

            let (name, value) = if let Some(raw_name) = arg.strip_prefix("--") {
                if raw_name.is_empty() {
                    return Err(unexpected("Invalid option name", &arg));
                }
                Self::split_arg(raw_name, &mut args)
            } else if let Some(raw_short) = arg.strip_prefix('-')
                && let Some(first) = raw_short.chars().next()
            {
                let (short, attached) = raw_short.split_at(first.len_utf8());
                let Some(long) = Self::long_for_short(short) else {
                    return Err(unexpected("Unknown option", &arg));
                };
                // getopt style: `-m MST`, `-mMST` and `-m=MST` all work.
                let attached = attached.strip_prefix('=').unwrap_or(attached);
                if attached.is_empty() {
                    Self::split_arg(long, &mut args)
                } else {
                    (long.to_owned(), Some(attached.to_owned()))
                }
            } else {
                return Err(unexpected("Unexpected argument", &arg));
            };

            if !options.apply_cli_option(&name, value)? {
                return Err(unexpected("Unknown option", &arg));
            }
        }

        options.validate()?;
        Ok(options)
    }

    pub fn usage() -> &'static str {
        concat!(
            "Usage: drone-tour -m {MST|FASTTSP|OPTTSP} [options] < sites.txt\n",
            "\n",
            "Options:\n",
            "  -m, --mode <mode>          MST, FASTTSP or OPTTSP\n",
            "  -h, --help                 Print this help\n",
            "      --precision <n>        Decimal places for costs (default 2)\n",
            "      --input <path>         Read sites from a file instead of stdin\n",
            "      --output <path>        Write the report to a file instead of stdout\n",
            "      --log-level <level>    error|warn|info|debug|trace|off (default warn)\n",
            "      --log-format <format>  compact|pretty (default compact)\n",
            "      --log-timestamp        Prefix log lines with a millisecond timestamp\n",
            "      --log-output <path>    Write logs to a file instead of stderr\n",
        )
    }

    /// The selected mode, required for every run.
    pub fn mode(&self) -> Result<SolveMode> {
        self.mode
            .ok_or_else(|| Error::invalid_input("Invalid / missing mode"))
    }

    pub fn input_path(&self) -> Option<&Path> {
        non_empty_path(&self.input)
    }

    pub fn output_path(&self) -> Option<&Path> {
        non_empty_path(&self.output)
    }

    pub fn log_output_path(&self) -> Option<&Path> {
        non_empty_path(&self.log_output)
    }

    fn validate(&self) -> Result<()> {
        if self.precision > MAX_PRECISION {
            return Err(Error::invalid_input(format!(
                "--precision must be at most {MAX_PRECISION}, got {}",
                self.precision
            )));
        }
        Ok(())
    }
}

fn unexpected(what: &str, arg: &str) -> Error {
    Error::invalid_input(format!("{what}: {arg}\n\n{}", SolverOptions::usage()))
}

fn non_empty_path(raw: &str) -> Option<&Path> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| Path::new(trimmed))
}
