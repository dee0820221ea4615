pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod normalize;
pub mod pipeline;
pub mod store;
pub mod table;
pub mod transform;
pub mod workbook;

use std::{env, path::Path, sync::OnceLock};

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::{Cli, Commands, SheetKind},
    config::{DEFAULT_CLIENTS_SHEET, DEFAULT_SALES_SHEET, DatabaseConfig, EtlConfig},
    transform::SaleRecord,
    workbook::RawClientRow,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("sales_etl", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => handle_run(&args),
        Commands::InitDb(args) => handle_init_db(&args),
        Commands::Preview(args) => handle_preview(&args),
        Commands::Export(args) => handle_export(&args),
    }
}

fn handle_run(args: &cli::RunArgs) -> Result<()> {
    let config = resolve_run_config(args)?;
    debug!("Resolved configuration: {:?}", config);
    let report = pipeline::run_pipeline(&config)
        .with_context(|| format!("Running ETL for {:?}", config.workbook))?;
    info!(
        "Loaded {} client(s) and {} sale(s); {} orphan sale(s), {} invalid email(s)",
        report.clients_loaded,
        report.sales_loaded,
        report.sales.orphans,
        report.clients.invalid_emails
    );
    let failures = report.failures();
    if args.strict && !failures.is_empty() {
        let stages = failures.iter().map(|err| err.stage()).collect::<Vec<_>>();
        bail!("{} stage(s) failed: {}", failures.len(), stages.join(", "));
    }
    Ok(())
}

fn resolve_run_config(args: &cli::RunArgs) -> Result<EtlConfig> {
    let mut config = match &args.config {
        Some(path) => EtlConfig::load(path)
            .with_context(|| format!("Loading configuration from {path:?}"))?,
        None => EtlConfig::default(),
    };
    if let Some(input) = &args.input {
        config.workbook = input.clone();
    }
    if let Some(database) = &args.database {
        config.database.path = database.clone();
    }
    if let Some(sheet) = &args.clients_sheet {
        config.clients_sheet = sheet.clone();
    }
    if let Some(sheet) = &args.sales_sheet {
        config.sales_sheet = sheet.clone();
    }
    if args.enforce_foreign_keys {
        config.database.enforce_foreign_keys = true;
    }
    Ok(config)
}

fn handle_init_db(args: &cli::InitDbArgs) -> Result<()> {
    let db = DatabaseConfig {
        path: args.database.clone(),
        ..DatabaseConfig::default()
    };
    store::ensure_schema(&db).context("Initializing database")?;
    info!("Tables ready in {:?}", args.database);
    Ok(())
}

fn handle_preview(args: &cli::PreviewArgs) -> Result<()> {
    match args.sheet {
        SheetKind::Clients => {
            let sheet = args.sheet_name.as_deref().unwrap_or(DEFAULT_CLIENTS_SHEET);
            let raw_clients = read_clients(&args.input, sheet)?;
            let (clients, _) = transform::transform_clients(&raw_clients);
            let rows = clients
                .iter()
                .take(args.rows)
                .map(table::client_cells)
                .collect::<Vec<_>>();
            table::print_table(&table::CLIENT_HEADERS, &rows);
        }
        SheetKind::Sales => {
            let raw_clients = read_clients(&args.input, DEFAULT_CLIENTS_SHEET)?;
            let sheet = args.sheet_name.as_deref().unwrap_or(DEFAULT_SALES_SHEET);
            let sales = clean_sales(&args.input, sheet, &raw_clients)?;
            let rows = sales
                .iter()
                .take(args.rows)
                .map(table::sale_cells)
                .collect::<Vec<_>>();
            table::print_table(&table::SALE_HEADERS, &rows);
        }
    }
    Ok(())
}

fn handle_export(args: &cli::ExportArgs) -> Result<()> {
    let raw_clients = read_clients(&args.input, DEFAULT_CLIENTS_SHEET)?;
    let (clients, _) = transform::transform_clients(&raw_clients);
    let sales = clean_sales(&args.input, DEFAULT_SALES_SHEET, &raw_clients)?;
    export::write_tables(&args.output, &clients, &sales)
        .with_context(|| format!("Exporting cleaned tables to {:?}", args.output))
}

fn read_clients(input: &Path, sheet: &str) -> Result<Vec<RawClientRow>> {
    Ok(workbook::read_sheet(input, sheet)?.client_rows())
}

fn clean_sales(input: &Path, sheet: &str, raw_clients: &[RawClientRow]) -> Result<Vec<SaleRecord>> {
    let known_ids = transform::known_client_ids(raw_clients);
    let raw_sales = workbook::read_sheet(input, sheet)?.sale_rows();
    let (records, _) = transform::transform_sales(&raw_sales, &known_ids);
    Ok(records)
}
