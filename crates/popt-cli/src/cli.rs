use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "popt",
    about = "Prompt optimizer: rewrite, score, and track prompts",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (TOML). Defaults apply when it does not exist.
    #[arg(long, global = true, env = "POPT_CONFIG", default_value = "popt.toml")]
    pub config: PathBuf,

    /// Override the data directory from the configuration file.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Optimize a prompt and record the result
    Optimize(OptimizeArgs),
    /// Browse and manage the optimization history
    History(HistoryArgs),
    /// Manage reusable prompt templates
    Template(TemplateArgs),
    /// Start the HTTP API server
    Serve(ServeArgs),
    /// Print the effective configuration
    Config,
}

#[derive(Args)]
pub struct OptimizeArgs {
    /// Prompt text. May be omitted when --template is given.
    pub prompt: Option<String>,
    /// Re-optimize an existing entry (id or unique id prefix)
    #[arg(short, long)]
    pub entry: Option<String>,
    /// Tag to attach; repeat for several
    #[arg(short, long = "tag")]
    pub tags: Vec<String>,
    /// Template id to start from
    #[arg(long)]
    pub template: Option<String>,
}

#[derive(Args)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub action: HistoryAction,
}

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List entries, most recent first
    List {
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },
    /// Case-insensitive search over prompts, results, tags and related prompts
    Search {
        query: String,
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },
    /// Show one entry with its version chain
    Show { id: String },
    /// Delete an entry
    Delete { id: String },
    /// Write the history to a JSON file
    Export {
        /// Output path; defaults to a dated file name in the current directory
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print to stdout instead of writing a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
    },
    /// Merge an exported JSON file into the history
    Import { file: PathBuf },
    /// Word diff between two versions of an entry
    Compare {
        id: String,
        /// Version index to compare from (0 is the oldest)
        #[arg(long, requires = "to")]
        from: Option<usize>,
        /// Version index to compare to
        #[arg(long, requires = "from")]
        to: Option<usize>,
    },
}

#[derive(Args)]
pub struct TemplateArgs {
    #[command(subcommand)]
    pub action: TemplateAction,
}

#[derive(Subcommand)]
pub enum TemplateAction {
    /// List templates
    List,
    /// Print a template's content
    Show { id: String },
    /// Save a new template
    Add {
        content: String,
        /// Name; defaults to "Template <n>"
        #[arg(long)]
        name: Option<String>,
    },
    /// Delete a template
    Delete { id: String },
}

#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind; overrides the configuration file
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}
