use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the ambient binary.
#[derive(Parser, Debug)]
#[command(
    name = "ambient",
    version,
    about = "Merge ambient declaration records into a symbol table"
)]
pub struct CliArgs {
    /// Declaration record files (JSON arrays), registered in the order given.
    pub files: Vec<PathBuf>,

    /// Path to a JSON options file.
    #[arg(short = 'p', long = "options")]
    pub options: Option<PathBuf>,

    /// Embedded libraries to register before the input files.
    #[arg(long, value_delimiter = ',')]
    pub lib: Option<Vec<String>>,

    /// Do not register any embedded library.
    #[arg(long = "noLib", alias = "no-lib")]
    pub no_lib: bool,

    /// Suppress the informational diagnostic for members that become overloads.
    #[arg(long = "noOverloadReport", alias = "no-overload-report")]
    pub no_overload_report: bool,

    /// Only resolve type references in their own scope and the global scope.
    #[arg(long = "noCrossModule", alias = "no-cross-module")]
    pub no_cross_module: bool,

    /// List the available embedded libraries and exit.
    #[arg(long = "listLibs", alias = "list-libs")]
    pub list_libs: bool,

    /// Print one global declaration instead of the whole table.
    #[arg(long)]
    pub global: Vec<String>,

    /// Print one ambient module instead of the whole table.
    #[arg(long)]
    pub module: Vec<String>,

    /// Output format for the table.
    #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
    pub format: OutputFormat,

    /// Colorize diagnostics.
    #[arg(long)]
    pub pretty: Option<bool>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per declaration and member.
    Summary,
    /// The canonical JSON encoding of the table.
    Json,
    /// Diagnostics only.
    None,
}
