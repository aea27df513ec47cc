mod codes_cmd;
mod list_cmd;
mod run_cmd;
mod settings;
mod terminal_output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use a11yscore_core::CodeKind;

#[derive(Parser)]
#[command(name = "a11yscore")]
#[command(about = "Scores a browser's accessibility tree against HTML element test pages")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the conformance suite, or the single test case named
    Run(run_cmd::RunArgs),
    /// List the test cases in the catalog
    List {
        /// YAML catalog to use instead of the built-in one
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Look up a platform code by name or number
    Codes {
        /// Canonical name such as `Button`, or a numeric code such as `50000`
        query: String,
        /// Restrict the lookup to one namespace
        #[arg(long, value_enum)]
        kind: Option<KindArg>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    ControlType,
    Property,
    Landmark,
}

impl From<KindArg> for CodeKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::ControlType => CodeKind::ControlType,
            KindArg::Property => CodeKind::Property,
            KindArg::Landmark => CodeKind::Landmark,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => run_cmd::run(args).await,
        Commands::List { catalog } => list_cmd::run(catalog.as_deref()),
        Commands::Codes { query, kind } => codes_cmd::run(&query, kind.map(Into::into)),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            terminal_output::note_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
