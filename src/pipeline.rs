//! The extract → transform → load driver.
//!
//! Stage policy: schema creation and table loads are allowed to fail without
//! stopping the run (the failure is logged and recorded in the [`RunReport`]),
//! while extraction failures abort it since nothing downstream can proceed.

use log::{error, info, warn};

use crate::{
    config::EtlConfig,
    error::StageError,
    store::{self, CLIENTS_TABLE, SALES_TABLE},
    transform::{self, ClientReport, SalesReport},
    workbook,
};

#[derive(Debug)]
pub enum StageOutcome {
    Succeeded,
    Failed(StageError),
}

impl StageOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, StageOutcome::Succeeded)
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub schema: StageOutcome,
    pub clients_load: StageOutcome,
    pub sales_load: StageOutcome,
    pub clients_loaded: usize,
    pub sales_loaded: usize,
    pub clients: ClientReport,
    pub sales: SalesReport,
}

impl RunReport {
    pub fn failures(&self) -> Vec<&StageError> {
        [&self.schema, &self.clients_load, &self.sales_load]
            .into_iter()
            .filter_map(|outcome| match outcome {
                StageOutcome::Failed(err) => Some(err),
                StageOutcome::Succeeded => None,
            })
            .collect()
    }

    pub fn is_clean(&self) -> bool {
        self.failures().is_empty()
    }
}

pub fn run_pipeline(config: &EtlConfig) -> Result<RunReport, StageError> {
    info!(
        "Running ETL from {:?} into {:?}",
        config.workbook, config.database.path
    );

    let schema = match store::ensure_schema(&config.database) {
        Ok(()) => StageOutcome::Succeeded,
        Err(err) => {
            error!("{}: {}", err, error_chain(&err));
            StageOutcome::Failed(err)
        }
    };

    let client_table = workbook::read_sheet(&config.workbook, &config.clients_sheet)?;
    let raw_clients = client_table.client_rows();
    let known_ids = transform::known_client_ids(&raw_clients);
    let (clients, client_report) = transform::transform_clients(&raw_clients);
    info!(
        "Cleaned {} client row(s): {} invalid email(s), {} unknown document(s)",
        client_report.rows, client_report.invalid_emails, client_report.unknown_documents
    );
    let (clients_load, clients_loaded) =
        load_stage(CLIENTS_TABLE, store::load_clients(&config.database, &clients));

    let sales_table = workbook::read_sheet(&config.workbook, &config.sales_sheet)?;
    let raw_sales = sales_table.sale_rows();
    let (sales, sales_report) = transform::transform_sales(&raw_sales, &known_ids);
    if sales_report.orphans > 0 {
        warn!(
            "{} of {} sale(s) reference unknown clients",
            sales_report.orphans, sales_report.rows
        );
    }
    let (sales_load, sales_loaded) =
        load_stage(SALES_TABLE, store::load_sales(&config.database, &sales));

    Ok(RunReport {
        schema,
        clients_load,
        sales_load,
        clients_loaded,
        sales_loaded,
        clients: client_report,
        sales: sales_report,
    })
}

fn load_stage(table: &str, result: Result<usize, StageError>) -> (StageOutcome, usize) {
    match result {
        Ok(rows) => {
            info!("Inserted {} row(s) into '{}'", rows, table);
            (StageOutcome::Succeeded, rows)
        }
        Err(err) => {
            error!("{}: {}", err, error_chain(&err));
            (StageOutcome::Failed(err), 0)
        }
    }
}

fn error_chain(err: &StageError) -> String {
    let mut causes = Vec::new();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        causes.push(cause.to_string());
        source = cause.source();
    }
    causes.join(": ")
}
