use std::path::PathBuf;

use vault_core::{Backend, StatusFilter};

#[derive(clap::Parser, Debug)]
#[command(name = "manga-vault", version, about = "Track which manga volumes you own")]
pub struct Cli {
    /// Directory holding collection documents (file backend)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
    /// Where collections are stored: file, memory or firestore
    #[arg(long, global = true)]
    pub backend: Option<Backend>,
    /// Print views as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,
    /// Echo debug logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// List the series in the catalog
    Series,
    /// Show a series' volumes and completion
    Show {
        /// Series id, e.g. "naruto"
        series: String,
        /// Status filter: all, owned or missing
        #[arg(long, default_value_t = StatusFilter::All)]
        filter: StatusFilter,
        /// Match against titles (any case) or volume numbers
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Show details for one volume
    Volume { series: String, number: u32 },
    /// Flip the owned flag of one or more volumes (admin only)
    Toggle {
        series: String,
        #[arg(required = true)]
        numbers: Vec<u32>,
        /// Admin passphrase; prompted for when omitted
        #[arg(long)]
        passphrase: Option<String>,
    },
}
