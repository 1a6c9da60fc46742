//! Rule engine command-line interface

use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;
use rule_engine::cli::check::{self, CheckConfig};
use rule_engine::cli::evaluate::{self, EvaluateConfig};
use rule_engine::cli::expr::{self, ExprConfig};
use rule_engine::cli::output::{self, ColorMode, OutputFormat};
use std::path::PathBuf;

/// Program rule engine command-line tool
#[derive(Parser)]
#[command(name = "rule-engine")]
#[command(author, version, about = "Evaluate tracker program rules", long_about = None)]
struct Cli {
    /// Log verbosity (-v warn, -vv info, -vvv debug, -vvvv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Color output
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    color: ColorMode,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate the rules of a JSON context document
    Evaluate {
        /// Context document (JSON)
        file: PathBuf,

        /// Evaluate only this event
        #[arg(short, long)]
        target: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
        format: OutputFormat,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse every rule expression of a context document
    Check {
        /// Context document (JSON)
        file: PathBuf,
    },

    /// Evaluate one expression against an empty enrollment
    Expr {
        /// Expression to evaluate
        expression: String,

        /// Constants (name=value)
        #[arg(short, long = "constant")]
        constants: Vec<String>,

        /// Calculated values (name=value)
        #[arg(long = "value")]
        values: Vec<String>,

        /// Supplementary data (key=v1,v2)
        #[arg(short, long)]
        supplementary: Vec<String>,

        /// Date used as V{current_date} (yyyy-MM-dd)
        #[arg(long)]
        current_date: Option<NaiveDate>,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Error,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        3 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    output::setup_colors(cli.color);
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Evaluate {
            file,
            target,
            format,
            output,
        } => evaluate::evaluate(&EvaluateConfig {
            file,
            target,
            format,
            output_file: output,
        }),

        Commands::Check { file } => check::check(&CheckConfig { file }),

        Commands::Expr {
            expression,
            constants,
            values,
            supplementary,
            current_date,
        } => expr::expr(&ExprConfig {
            expression,
            constants,
            values,
            supplementary,
            current_date,
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", output::format_error(&e));
        std::process::exit(1);
    }
}
