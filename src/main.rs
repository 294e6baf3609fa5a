// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use log::{error, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use subcefr::app_config::{self, Config, OutputFormat, ParseMode};
use subcefr::app_controller::Controller;
use subcefr::errors::GENERIC_FAILURE_MESSAGE;

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

/// CLI Wrapper for OutputFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliOutputFormat {
    Text,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(cli_format: CliOutputFormat) -> Self {
        match cli_format {
            CliOutputFormat::Text => OutputFormat::Text,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Estimate the CEFR level of subtitle files (default command)
    Analyze(AnalyzeArgs),

    /// Generate shell completions for subcefr
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug, Clone)]
struct AnalyzeArgs {
    /// Subtitle file or directory to analyse
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Lexicon JSON file (overrides the config)
    #[arg(long)]
    lexicon: Option<String>,

    /// Model JSON file (overrides the config)
    #[arg(short, long)]
    model: Option<String>,

    /// Lemmatizer exceptions file (overrides the config)
    #[arg(long)]
    exceptions: Option<String>,

    /// Report format
    #[arg(short, long, value_enum)]
    format: Option<CliOutputFormat>,

    /// Number of leading cues to ignore
    #[arg(short, long)]
    skip_cues: Option<usize>,

    /// Skip malformed subtitle blocks instead of failing
    #[arg(long)]
    lenient: bool,

    /// Write the JSON report to this file
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// subcefr - CEFR difficulty levels for English subtitles
///
/// Estimates how hard the English of a film or series is from its SRT file.
#[derive(Parser, Debug)]
#[command(name = "subcefr")]
#[command(version)]
#[command(about = "Estimate the CEFR level of English subtitles")]
#[command(long_about = "subcefr reads SRT subtitle files, counts the distinct words of each CEFR level
they use and predicts the level of the dialogue (A2, B1, B2 or C1).

EXAMPLES:
    subcefr movie.srt                           # Analyse using default config
    subcefr -f json movie.srt                   # Print the report as JSON
    subcefr --skip-cues 0 movie.srt             # Keep the first cue
    subcefr --lenient -r report.json /subs/     # Analyse a folder, write a summary
    subcefr completions bash > subcefr.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Subtitle file or directory to analyse
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Lexicon JSON file (overrides the config)
    #[arg(long)]
    lexicon: Option<String>,

    /// Model JSON file (overrides the config)
    #[arg(short, long)]
    model: Option<String>,

    /// Lemmatizer exceptions file (overrides the config)
    #[arg(long)]
    exceptions: Option<String>,

    /// Report format
    #[arg(short, long, value_enum)]
    format: Option<CliOutputFormat>,

    /// Number of leading cues to ignore
    #[arg(short, long)]
    skip_cues: Option<usize>,

    /// Skip malformed subtitle blocks instead of failing
    #[arg(long)]
    lenient: bool,

    /// Write the JSON report to this file
    #[arg(short, long)]
    report: Option<PathBuf>,

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

    // @returns: Tag and ANSI colour for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("ERROR", "1;31"),
            Level::Warn => ("WARN ", "1;33"),
            Level::Info => ("INFO ", "1;32"),
            Level::Debug => ("DEBUG", "1;36"),
            Level::Trace => ("TRACE", "1;35"),
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
            let (tag, colour) = Self::style_for_level(record.level());

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
    // Initialize the logger once with trace so later max-level changes take effect
    if let Err(e) = CustomLogger::init(LevelFilter::Trace) {
        eprintln!("Failed to initialize logger: {}", e);
    }
    log::set_max_level(LevelFilter::Info);

    if let Err(e) = run_cli().await {
        // Details go to the log, the user only sees the generic message
        error!("{:#}", e);
        eprintln!("{}", GENERIC_FAILURE_MESSAGE);
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<()> {
    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subcefr", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Analyze(args)) => run_analyze(args).await,
        None => {
            // Default behavior - use top-level args
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            let analyze_args = AnalyzeArgs {
                input_path,
                config_path: cli.config_path,
                lexicon: cli.lexicon,
                model: cli.model,
                exceptions: cli.exceptions,
                format: cli.format,
                skip_cues: cli.skip_cues,
                lenient: cli.lenient,
                report: cli.report,
                log_level: cli.log_level,
            };
            run_analyze(analyze_args).await
        }
    }
}

async fn run_analyze(options: AnalyzeArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(&options.config_path)?;
    apply_overrides(&mut config, &options);

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let controller = Controller::with_config(config)?;
    controller.run(options.input_path, options.report).await
}

// @modifies: Config with the CLI options that were given
fn apply_overrides(config: &mut Config, options: &AnalyzeArgs) {
    if let Some(lexicon) = &options.lexicon {
        config.resources.lexicon_path = lexicon.clone();
    }

    if let Some(model) = &options.model {
        config.resources.model_path = model.clone();
    }

    if let Some(exceptions) = &options.exceptions {
        config.resources.exceptions_path = Some(exceptions.clone());
    }

    if let Some(format) = &options.format {
        config.output_format = format.clone().into();
    }

    if let Some(skip) = options.skip_cues {
        config.subtitles.skip_leading_cues = skip;
    }

    if options.lenient {
        config.subtitles.parse_mode = ParseMode::Lenient;
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}
