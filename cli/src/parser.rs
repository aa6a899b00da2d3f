use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "enumgen collection generator CLI",
    long_about = "The 'enumgen' command compiles annotated C# sources, discovers marker-annotated \
collection declarations, and generates one .g.cs collection source per declaration. \
'check' prints diagnostics without generating; 'index' writes the module index artifact \
other compilations can reference."
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Compile a source directory and write the generated units
    Generate {
        /// Directory scanned recursively for .cs sources
        dir: PathBuf,
        /// Output directory for the generated units
        #[clap(long = "out")]
        out: Option<PathBuf>,
        /// Module index files of referenced compilations
        #[clap(long = "reference")]
        references: Vec<PathBuf>,
    },
    /// Compile and print diagnostics, exit 1 when any are errors
    Check {
        dir: PathBuf,
        #[clap(long = "reference")]
        references: Vec<PathBuf>,
    },
    /// Compile and write the module index artifact
    Index {
        dir: PathBuf,
        /// Index file to write
        #[clap(short = 'o')]
        output: PathBuf,
        #[clap(long = "reference")]
        references: Vec<PathBuf>,
    },
}
