use std::collections::BTreeSet;

use log::{debug, warn};

use crate::{
    normalize::{epoch_date, normalize_amount, normalize_date},
    transform::{SaleRecord, SalesReport},
    workbook::RawSaleRow,
};

/// Cleans one sales row, flagging it as orphaned when its client id is unknown.
pub fn clean_sale_row(row: &RawSaleRow, known_client_ids: &BTreeSet<i64>) -> SaleRecord {
    let sale_date = normalize_date(&row.sale_date);
    let client_id = row.client_id.as_integer();
    let client_is_orphan = client_id.is_none_or(|id| !known_client_ids.contains(&id));
    let amount = normalize_amount(&row.amount);

    SaleRecord {
        id: row.id.as_integer(),
        client_id,
        client_is_orphan,
        amount,
        sale_date,
    }
}

pub fn transform_sales(
    rows: &[RawSaleRow],
    known_client_ids: &BTreeSet<i64>,
) -> (Vec<SaleRecord>, SalesReport) {
    let mut report = SalesReport::default();
    let records = rows
        .iter()
        .map(|row| {
            let record = clean_sale_row(row, known_client_ids);
            tally(&mut report, row, &record);
            record
        })
        .collect::<Vec<_>>();
    if report.unrepresentable_amounts > 0 {
        warn!(
            "{} sale amount(s) were numeric but out of range and were loaded as 0.00",
            report.unrepresentable_amounts
        );
    }
    debug!(
        "Cleaned {} sales row(s) against {} known client id(s): {:?}",
        records.len(),
        known_client_ids.len(),
        report
    );
    (records, report)
}

fn tally(report: &mut SalesReport, row: &RawSaleRow, record: &SaleRecord) {
    report.rows += 1;
    if record.client_is_orphan {
        report.orphans += 1;
    }
    if record.sale_date == epoch_date() {
        report.defaulted_dates += 1;
    }
    match row.amount.as_decimal() {
        None if row.amount.is_numeric() => report.unrepresentable_amounts += 1,
        None => report.zeroed_amounts += 1,
        Some(value) if value.is_sign_negative() && !value.is_zero() => {
            report.sign_flipped_amounts += 1
        }
        Some(_) => {}
    }
}
