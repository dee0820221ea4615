use std::collections::BTreeSet;

use log::debug;

use crate::{
    normalize::{
        self, INVALID_EMAIL, PERSON_COMPANY, PERSON_INDIVIDUAL, UNKNOWN, clean_document,
        clean_name, resolve_contact_type, resolve_person_type,
    },
    transform::{ClientRecord, ClientReport},
    workbook::RawClientRow,
};

/// Cleans one client row.
///
/// The document is cleaned before the person type is resolved, and the contact
/// type is inferred from the raw email before that email is validated.
pub fn clean_client_row(row: &RawClientRow) -> ClientRecord {
    let name = clean_name(&row.name);
    let document = clean_document(&row.document);
    let person_type = resolve_person_type(&row.person_type, &document);
    let contact_type = resolve_contact_type(&row.contact_type, &row.email);
    let email = row
        .email
        .as_text()
        .filter(|address| normalize::is_valid_email(address))
        .map(str::to_string)
        .unwrap_or_else(|| INVALID_EMAIL.to_string());

    ClientRecord {
        id: row.id.as_integer(),
        name: name.unwrap_or_else(|| UNKNOWN.to_string()),
        email,
        document,
        person_type,
        contact_type,
    }
}

pub fn transform_clients(rows: &[RawClientRow]) -> (Vec<ClientRecord>, ClientReport) {
    let mut report = ClientReport::default();
    let records = rows
        .iter()
        .map(|row| {
            let record = clean_client_row(row);
            tally(&mut report, row, &record);
            record
        })
        .collect::<Vec<_>>();
    debug!("Cleaned {} client row(s): {:?}", records.len(), report);
    (records, report)
}

/// Identifiers present in the client rows as extracted, before any cleaning.
pub fn known_client_ids(rows: &[RawClientRow]) -> BTreeSet<i64> {
    rows.iter().filter_map(|row| row.id.as_integer()).collect()
}

fn tally(report: &mut ClientReport, row: &RawClientRow, record: &ClientRecord) {
    report.rows += 1;
    if record.email == INVALID_EMAIL {
        report.invalid_emails += 1;
    }
    if record.document == UNKNOWN {
        report.unknown_documents += 1;
    }
    if row.person_type.as_text().is_none()
        && (record.person_type == PERSON_INDIVIDUAL || record.person_type == PERSON_COMPANY)
    {
        report.inferred_person_types += 1;
    }
    if record.contact_type == UNKNOWN {
        report.unknown_contact_types += 1;
    }
    if record.name == UNKNOWN {
        report.filled_missing += 1;
    }
}
