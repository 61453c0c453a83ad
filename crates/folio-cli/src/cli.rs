use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "folio",
    about = "Folio: versioned, content-addressed hosting for projects of pages",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Store root; `serve` keeps its store in memory when neither this nor
    /// the config file names one
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
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Import directories of HTML files as projects
    Import(ImportArgs),
    /// List projects
    Projects,
    /// Show a project's version history
    Versions(VersionsArgs),
    /// Show a project's pages at one version
    Show(ShowArgs),
    /// Print a page body
    Cat(CatArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Override the listen address
    #[arg(long)]
    pub bind: Option<String>,
    /// Directories to import before serving
    #[arg(long = "import")]
    pub import: Vec<PathBuf>,
}

#[derive(Args)]
pub struct ImportArgs {
    #[arg(required = true)]
    pub dirs: Vec<PathBuf>,
}

#[derive(Args)]
pub struct VersionsArgs {
    pub name: String,
}

#[derive(Args)]
pub struct ShowArgs {
    pub name: String,
    #[arg(long)]
    pub version: Option<String>,
}

#[derive(Args)]
pub struct CatArgs {
    pub project: String,
    /// Defaults to `index`
    pub page: Option<String>,
    #[arg(long)]
    pub version: Option<String>,
}
