use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tablet",
    about = "Tablet: a content-addressed object store",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Store root (overrides the config file)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Keep buckets in `objects/` instead of a separate `sets/` tree
    #[arg(long, global = true)]
    pub consolidated: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize a new store
    Init,
    /// Store a value as a content blob and print its digest
    HashObject(HashObjectArgs),
    /// Show a content blob by digest
    CatObject(CatObjectArgs),
    /// Append a JSON value to the bucket for a key
    Push(PushArgs),
    /// Print every value in the bucket for a key
    Get(GetArgs),
    /// Print the effective configuration
    Config,
}

#[derive(Args)]
pub struct HashObjectArgs {
    /// Text to store
    pub value: String,
}

#[derive(Args)]
pub struct CatObjectArgs {
    /// 40-character hex digest
    pub digest: String,
}

#[derive(Args)]
pub struct PushArgs {
    /// JSON value to append
    pub value: String,
    /// Explicit key
    #[arg(short, long, conflicts_with = "field")]
    pub key: Option<String>,
    /// Take the key from this top-level field of the value
    #[arg(short, long)]
    pub field: Option<String>,
}

#[derive(Args)]
pub struct GetArgs {
    /// Key to look up
    pub key: String,
}
