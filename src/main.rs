// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use hebdoc::app_config::{self, Config, TranslationStyle};
use hebdoc::app_controller::Controller;
use hebdoc::errors::AppError;
use hebdoc::file_utils::FileManager;
use hebdoc::translation::{TranslationOptions, TranslationService};
use hebdoc::web::{self, AppState};

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

/// CLI Wrapper for TranslationStyle to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationStyle {
    Clear,
    Literal,
    Warm,
    Academic,
}

impl From<CliTranslationStyle> for TranslationStyle {
    fn from(cli_style: CliTranslationStyle) -> Self {
        match cli_style {
            CliTranslationStyle::Clear => TranslationStyle::Clear,
            CliTranslationStyle::Literal => TranslationStyle::Literal,
            CliTranslationStyle::Warm => TranslationStyle::Warm,
            CliTranslationStyle::Academic => TranslationStyle::Academic,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the web page (default command)
    Serve {
        /// Address to listen on, overrides server.bind_addr
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Translate local PDF files or directories into one Word document
    Translate(TranslateArgs),

    /// Generate shell completions for hebdoc
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct TranslateArgs {
    /// PDF files or directories to process, in order
    #[arg(value_name = "PATHS", required = true)]
    paths: Vec<PathBuf>,

    /// Where to write the .docx (defaults to document.output_file_name)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Translation style
    #[arg(short, long, value_enum)]
    style: Option<CliTranslationStyle>,

    /// Extra instructions for the translator
    #[arg(short, long)]
    instructions: Option<String>,
}

/// hebdoc - Hebrew PDF to English Word
///
/// Extracts the text of each page of one or more Hebrew PDFs, translates it
/// page by page and combines everything into one Word document.
#[derive(Parser, Debug)]
#[command(name = "hebdoc")]
#[command(version)]
#[command(about = "Translate Hebrew PDFs into one English Word document")]
#[command(long_about = "hebdoc extracts the text layer of Hebrew PDFs, translates every page and writes one .docx.

EXAMPLES:
    hebdoc                                      # Start the web page on 127.0.0.1:8501
    hebdoc serve --bind 0.0.0.0:8080            # Listen on another address
    hebdoc translate a.pdf b.pdf -o out.docx    # Translate files from the terminal
    hebdoc translate ./scans --style literal    # Every PDF under a directory
    hebdoc completions bash > hebdoc.bash       # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.

CREDENTIALS:
    The API key is read from the OPENAI_API_KEY environment variable (the name
    is configurable with translation.api_key_env). It is never read from flags.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long = "config", default_value = "conf.json", global = true)]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
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
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
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
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the config says otherwise
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "hebdoc", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli.config_path, cli.log_level.clone())?;

    match cli.command {
        Some(Commands::Translate(args)) => run_translate(config, args).await,
        Some(Commands::Serve { bind }) => run_serve(config, bind).await,
        None => run_serve(config, None).await,
        Some(Commands::Completions { .. }) => Ok(()),
    }
}

fn load_config(path: &Path, cli_log_level: Option<CliLogLevel>) -> Result<Config> {
    let mut config = Config::load_or_create(path)?;

    if let Some(log_level) = cli_log_level {
        config.log_level = log_level.into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

async fn run_serve(mut config: Config, bind: Option<String>) -> Result<()> {
    if let Some(bind) = bind {
        config.server.bind_addr = bind;
    }
    let addr = config.server.bind_addr.clone();

    // A missing key still serves the page, with a banner instead of a working form
    let state = match TranslationService::from_env(&config) {
        Ok(service) => {
            info!("Translator ready: {} - {}", config.translation.model, config.translation.endpoint);
            AppState::new(config, Arc::new(service))?
        }
        Err(e) => {
            let banner = match &e {
                AppError::Credential(credential) => credential.to_string(),
                other => other.to_string(),
            };
            error!("{}", banner);
            AppState::unconfigured(config, banner)
        }
    };

    web::start_server(&addr, state)
        .await
        .with_context(|| format!("Web server on {} failed", addr))
}

async fn run_translate(config: Config, args: TranslateArgs) -> Result<()> {
    let service = TranslationService::from_env(&config)?;
    let controller = Controller::with_translator(config.clone(), Arc::new(service))?;

    let pdfs = FileManager::collect_pdfs(&args.paths)?;
    if pdfs.is_empty() {
        return Err(anyhow!("No PDF files found in {:?}", args.paths));
    }
    info!("Found {} PDF file(s)", pdfs.len());

    let mut options: TranslationOptions = controller.default_options();
    if let Some(style) = args.style {
        options.style = style.into();
    }
    if let Some(instructions) = args.instructions {
        options.extra_instructions = instructions;
    }

    let progress_bar = ProgressBar::new(0);
    let template_result = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} pages ({percent}%) {msg} {eta}")
        .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress_bar.set_style(template_result.progress_chars("█▓▒░"));
    progress_bar.set_message("Translating");

    let output_name = args
        .output
        .as_ref()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_string());

    let pb = progress_bar.clone();
    let outcome = controller
        .run_paths(&pdfs, options, output_name, move |done, total| {
            pb.set_length(total as u64);
            pb.set_position(done as u64);
        })
        .await?;
    progress_bar.finish_and_clear();

    if let Some(fatal) = outcome.fatal {
        return Err(anyhow!(fatal));
    }

    let prepared = outcome
        .document
        .ok_or_else(|| anyhow!("The run produced no document"))?;

    // Keep the directory of -o but use the sanitized file name
    let output_path = match args.output.as_ref().and_then(|p| p.parent()) {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(&prepared.file_name),
        _ => PathBuf::from(&prepared.file_name),
    };
    FileManager::write_bytes(&output_path, &prepared.bytes)?;

    if outcome.report.has_errors() {
        warn!("Finished with errors; see the messages above.");
    }
    info!("Success: {:?}", output_path);
    Ok(())
}
