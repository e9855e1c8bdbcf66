use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "orc",
    about = "Reconcile declared objects against an object store",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Root directory of the local object store
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an object and print its identity
    Create(WriteArgs),
    /// Replace an object's content
    Update(WriteArgs),
    /// Print an object's content
    Read(ObjectArgs),
    /// Check whether an object exists
    Exists(ExistsArgs),
    /// Delete an object
    Delete(ObjectArgs),
    /// Create every object declared in a manifest
    Apply(ApplyArgs),
    /// Create a container in the local store
    Container(ContainerArgs),
}

#[derive(Args)]
pub struct ObjectArgs {
    #[arg(long)]
    pub container: String,
    #[arg(long)]
    pub name: String,
}

#[derive(Args)]
pub struct WriteArgs {
    #[command(flatten)]
    pub object: ObjectArgs,
    /// File whose bytes become the object's content
    #[arg(long)]
    pub source: Option<PathBuf>,
    /// Literal content
    #[arg(long)]
    pub contents: Option<String>,
}

#[derive(Args)]
pub struct ExistsArgs {
    #[command(flatten)]
    pub object: ObjectArgs,
    /// Report read failures other than "not found" instead of treating them
    /// as absence
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// Manifest file with `[[object]]` entries
    pub manifest: PathBuf,
}

#[derive(Args)]
pub struct ContainerArgs {
    pub name: String,
}
