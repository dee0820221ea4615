use std::{fs, path::Path};

use anyhow::{Context, Result};
use log::info;
use serde::Serialize;

use crate::{
    store::{CLIENTS_TABLE, SALES_TABLE},
    transform::{ClientRecord, SaleRecord},
};

/// Writes cleaned records as `<table>.csv` files under `dir`, creating it when needed.
pub fn write_tables(dir: &Path, clients: &[ClientRecord], sales: &[SaleRecord]) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Creating output directory {dir:?}"))?;
    write_csv(&dir.join(format!("{CLIENTS_TABLE}.csv")), clients)?;
    write_csv(&dir.join(format!("{SALES_TABLE}.csv")), sales)?;
    Ok(())
}

pub fn write_csv<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("Creating output file {path:?}"))?;
    for (idx, record) in records.iter().enumerate() {
        writer
            .serialize(record)
            .with_context(|| format!("Writing row {} to {path:?}", idx + 1))?;
    }
    writer.flush().context("Flushing output writer")?;
    info!("Wrote {} row(s) to {:?}", records.len(), path);
    Ok(())
}
