use std::path::PathBuf;

use clap::Parser;

/// Command-line arguments of the Carta server.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(about, version)]
pub struct Args {
    /// Path to the preprocessed binary map file.
    #[arg(short, long)]
    pub map_file: PathBuf,

    /// The socket address to bind.
    #[arg(short, long, default_value = "0.0.0.0:3000")]
    pub listen: String,

    /// TTF/OTF font used for place-name labels. Without it labels are
    /// not drawn.
    #[arg(short, long)]
    pub font: Option<PathBuf>,
}
