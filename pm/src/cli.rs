//! CLI argument parsing for promptmerge

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pm")]
#[command(author, version, about = "Merge a child prompt template over base.yml", long_about = None)]
pub struct Cli {
    /// Template to merge over the base (e.g. bugfix), without extension
    pub template_name: String,

    /// File to write the merged result to (default: stdout)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}
