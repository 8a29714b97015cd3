// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::File;
use std::io::BufReader;
use std::io::Write;
use std::path::Path;

use inexfreq::app_config::{self, Config};
use inexfreq::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for inexfreq
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// inexfreq - word frequency measurement over a query server
///
/// Runs one full-text query per word against every selected database and
/// writes the summed hit counts as `word;total` lines.
#[derive(Parser, Debug)]
#[command(name = "inexfreq")]
#[command(version = "1.0.0")]
#[command(about = "Word frequency collector for query server databases")]
#[command(long_about = "inexfreq queries every word of a word list against a set of databases on a
running query server and writes the summed hit count of each word.

EXAMPLES:
    inexfreq                                  # Scan all databases starting with 'inex'
    inexfreq -d inex1 -d inex2                # Scan two explicit databases
    inexfreq -w words.txt -o words.freq       # Use other input/output files
    inexfreq --host db.local --port 1984      # Connect to a remote server
    inexfreq completions bash > inexfreq.bash # Generate bash completions

CONFIGURATION:
    Settings are read from conf.json by default. You can specify a different
    file with --config. Command line options override the file.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Database to scan (repeatable); default is discovery by prefix
    #[arg(short = 'd', long = "database", value_name = "DATABASE")]
    databases: Vec<String>,

    /// Word list, one word per line
    #[arg(short, long)]
    words: Option<String>,

    /// Frequency output file
    #[arg(short, long)]
    output: Option<String>,

    /// Server host
    #[arg(long)]
    host: Option<String>,

    /// Server port
    #[arg(long)]
    port: Option<u16>,

    /// User name
    #[arg(long)]
    user: Option<String>,

    /// Password
    #[arg(long, env = "INEXFREQ_PASSWORD")]
    password: Option<String>,

    /// Name prefix of databases to discover
    #[arg(long)]
    prefix: Option<String>,

    /// Configuration file path
    #[arg(short, long = "config", default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and tag for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN "),
            Level::Info => ("1;32", "INFO "),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (colour, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                colour, now, tag, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() {
    // The logger accepts everything; the effective level is set via max_level
    if CustomLogger::init(LevelFilter::Trace).is_ok() {
        log::set_max_level(LevelFilter::Info);
    }

    // Parse command line arguments using clap; unknown flags exit here
    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "inexfreq", &mut std::io::stdout());
        return;
    }

    if let Err(e) = run_measurement(cli).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run_measurement(options: CommandLineOptions) -> Result<()> {
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config = load_config(&options)?;

    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let controller = Controller::with_config(config)?;
    controller.run().await?;
    Ok(())
}

// @loads: Configuration file merged with command line overrides
fn load_config(options: &CommandLineOptions) -> Result<Config> {
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        if config_path != "conf.json" {
            warn!("Config file not found at '{}', using defaults.", config_path);
        }
        Config::default()
    };

    if !options.databases.is_empty() {
        config.harness.databases = options.databases.clone();
    }
    if let Some(words) = &options.words {
        config.harness.words_file = words.clone();
    }
    if let Some(output) = &options.output {
        config.harness.output_file = output.clone();
    }
    if let Some(prefix) = &options.prefix {
        config.harness.database_prefix = prefix.clone();
    }
    if let Some(host) = &options.host {
        config.server.host = host.clone();
    }
    if let Some(port) = options.port {
        config.server.port = port;
    }
    if let Some(user) = &options.user {
        config.server.username = user.clone();
    }
    if let Some(password) = &options.password {
        config.server.password = password.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    Ok(config)
}
