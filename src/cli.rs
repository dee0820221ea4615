use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(author, version, about = "Clean client and sales sheets and load them into SQLite", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create tables, then extract, clean and load clients followed by sales
    Run(RunArgs),
    /// Create the clientes and vendas tables if they do not exist
    InitDb(InitDbArgs),
    /// Clean one sheet and print the first rows as a table
    Preview(PreviewArgs),
    /// Clean both sheets and write them as CSV files
    Export(ExportArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// JSON configuration file; flags below override its values
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
    /// Input workbook (xlsx, xls, xlsb, ods)
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,
    /// SQLite database file to load into
    #[arg(short = 'd', long = "database")]
    pub database: Option<PathBuf>,
    /// Sheet holding client rows
    #[arg(long = "clients-sheet")]
    pub clients_sheet: Option<String>,
    /// Sheet holding sales rows
    #[arg(long = "sales-sheet")]
    pub sales_sheet: Option<String>,
    /// Enforce the vendas -> clientes foreign key while loading
    #[arg(long = "enforce-foreign-keys")]
    pub enforce_foreign_keys: bool,
    /// Exit with an error when any stage fails instead of only logging it
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Args)]
pub struct InitDbArgs {
    /// SQLite database file to initialize
    #[arg(short = 'd', long = "database", default_value = crate::config::DEFAULT_DATABASE)]
    pub database: PathBuf,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
#[value(rename_all = "kebab-case")]
pub enum SheetKind {
    #[default]
    Clients,
    Sales,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Input workbook (xlsx, xls, xlsb, ods)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Which sheet to clean and display
    #[arg(long, value_enum, default_value = "clients")]
    pub sheet: SheetKind,
    /// Override the sheet name in the workbook
    #[arg(long = "sheet-name")]
    pub sheet_name: Option<String>,
    /// Number of rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Input workbook (xlsx, xls, xlsb, ods)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Directory receiving clientes.csv and vendas.csv
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
}
