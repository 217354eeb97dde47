use std::str::FromStr;

use clap::{Parser, Subcommand};
use whatif_report::commands::{FormatJsonCommand, RenderCommand};
use whatif_report::context::Context;
use whatif_report::diff::ChangeKind;
use whatif_report::output::{self, color::ColorMode};

#[derive(Parser)]
#[command(name = "whatif")]
#[command(about = "Render deployment what-if previews as text reports", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a what-if preview result
    Render {
        /// Preview result JSON file (reads standard input when omitted or '-')
        file: Option<String>,

        /// How colors are encoded in the report
        #[arg(short, long, value_enum, env = "WHATIF_COLOR", default_value_t = ColorMode::Ansii)]
        color: ColorMode,

        /// Resource change types to leave out of the report (comma separated)
        #[arg(short = 'x', long = "exclude-change-types", value_delimiter = ',')]
        exclude_change_types: Vec<ChangeKind>,

        /// Write the report to a file instead of standard output
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Pretty print a JSON document with aligned property paths
    FormatJson {
        /// JSON file (reads standard input when omitted or '-')
        file: Option<String>,

        /// How colors are encoded in the output
        #[arg(short, long, value_enum, env = "WHATIF_COLOR", default_value_t = ColorMode::Ansii)]
        color: ColorMode,

        /// Write the output to a file instead of standard output
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn init_tracing() {
    let env = std::env::var("WHATIF_LOG").unwrap_or_else(|_| "warn".to_string());
    let filter = tracing_subscriber::EnvFilter::from_str(&env)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let ctx = Context::new();

    let result = match cli.command {
        Commands::Render {
            file,
            color,
            exclude_change_types,
            output,
        } => RenderCommand::execute(
            &ctx,
            file.as_deref(),
            color,
            &exclude_change_types,
            output.as_deref(),
        ),
        Commands::FormatJson {
            file,
            color,
            output,
        } => FormatJsonCommand::execute(&ctx, file.as_deref(), color, output.as_deref()),
    };

    if let Err(err) = result {
        output::error(&format!("{:#}", err));
        std::process::exit(1);
    }
}
