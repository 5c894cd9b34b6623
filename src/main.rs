use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::PipelineArgs;

#[derive(Parser)]
#[command(name = "survey-analyzer")]
#[command(version)]
#[command(about = "Descriptive statistics, composite scores and X/Y association for survey data")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Preview a dataset and the default column classification
    Inspect {
        /// Survey data file (.csv, .tsv, .xlsx)
        file: PathBuf,
        /// Number of rows to preview
        #[arg(long, default_value_t = 5)]
        rows: usize,
    },
    /// Run the analysis and print the results
    Analyze {
        #[command(flatten)]
        pipeline: PipelineArgs,
        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Run the analysis and export a PDF report
    Report {
        #[command(flatten)]
        pipeline: PipelineArgs,
        /// Output path of the PDF
        #[arg(long, short = 'o', default_value = "survey_report.pdf")]
        output: PathBuf,
        /// Also print the PDF as a data URI to stdout
        #[arg(long)]
        inline: bool,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the merged configuration
    Show {
        /// Explicit config file layered last
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the default configuration template
    Defaults,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("survey_analyzer=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Inspect { file, rows } => commands::inspect::run(&file, rows),
        Commands::Analyze { pipeline, format } => {
            let format = format.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            commands::analyze::run(&pipeline, format)
        }
        Commands::Report {
            pipeline,
            output,
            inline,
        } => commands::report::run(&pipeline, &output, inline),
        Commands::Config { action } => match action {
            ConfigAction::Show { config } => commands::config::show(config.as_deref()),
            ConfigAction::Defaults => commands::config::defaults(),
        },
    }
}
