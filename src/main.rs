use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use plugin_market::config::LogFormat;
use plugin_market::MarketConfig;

mod cli;

use cli::build::cmd_build;
use cli::validate::cmd_validate;
use cli::{cmd_categories, ReportFormat};

/// Exit status for configuration and I/O failures.
const EXIT_FATAL: u8 = 2;

#[derive(Parser)]
#[command(name = "plugin-market")]
#[command(version)]
#[command(about = "Validate IRC panel plugins and build the marketplace index", long_about = None)]
struct Cli {
    /// Config file (defaults to ./plugin-market.json when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log output format: pretty or json
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every plugin and write the marketplace index
    Build {
        /// Plugins root directory
        #[arg(long)]
        plugins_dir: Option<PathBuf>,

        /// Index output path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Summary format on stdout
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
    /// Validate plugins without writing anything
    Validate {
        /// Plugin ids to check (all plugins when empty)
        ids: Vec<String>,

        /// Plugins root directory
        #[arg(long)]
        plugins_dir: Option<PathBuf>,

        /// Run review checks and fail on warnings
        #[arg(long)]
        strict: bool,

        /// Report format on stdout
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
    /// List marketplace categories
    Categories {
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
}

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match MarketConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_FATAL);
        }
    };
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }

    init_logging(config.log_format);

    let result = match cli.command {
        Commands::Build {
            plugins_dir,
            output,
            format,
        } => {
            if let Some(dir) = plugins_dir {
                config.plugins_dir = dir;
            }
            if let Some(output) = output {
                config.output = output;
            }
            cmd_build(&config, format)
        }
        Commands::Validate {
            ids,
            plugins_dir,
            strict,
            format,
        } => {
            if let Some(dir) = plugins_dir {
                config.plugins_dir = dir;
            }
            config.strict |= strict;
            cmd_validate(&config, &ids, format)
        }
        Commands::Categories { format } => cmd_categories(format).map(|_| 0),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_FATAL)
        }
    }
}
