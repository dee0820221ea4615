use std::fmt::Write as _;

use crate::transform::{ClientRecord, SaleRecord};

pub const CLIENT_HEADERS: [&str; 6] = [
    "id_cliente",
    "nome",
    "email",
    "documento",
    "tipo_pessoa",
    "tipo_contato",
];
pub const SALE_HEADERS: [&str; 5] = [
    "id_venda",
    "id_cliente",
    "id_cliente_orfao",
    "valor",
    "data_venda",
];

pub fn client_cells(record: &ClientRecord) -> Vec<String> {
    vec![
        optional_id(record.id),
        record.name.clone(),
        record.email.clone(),
        record.document.clone(),
        record.person_type.clone(),
        record.contact_type.clone(),
    ]
}

pub fn sale_cells(record: &SaleRecord) -> Vec<String> {
    vec![
        optional_id(record.id),
        optional_id(record.client_id),
        record.client_is_orphan.to_string(),
        record.amount.to_string(),
        record.sale_date.to_string(),
    ]
}

fn optional_id(id: Option<i64>) -> String {
    id.map(|value| value.to_string()).unwrap_or_default()
}

/// Renders rows as left-aligned columns separated by two spaces, under a dashed rule.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths = headers
        .iter()
        .map(|header| header.chars().count().max(3))
        .collect::<Vec<_>>();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(sanitize(cell).chars().count());
        }
    }

    let mut output = String::new();
    let header_cells = headers.iter().map(|h| h.to_string()).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&header_cells, &widths));
    let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&rule, &widths));
    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths));
    }
    output
}

pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, rows));
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    let line = widths
        .iter()
        .enumerate()
        .map(|(idx, width)| {
            let cell = cells.get(idx).map(|c| sanitize(c)).unwrap_or_default();
            format!("{cell:<width$}")
        })
        .collect::<Vec<_>>()
        .join("  ");
    line.trim_end().to_string()
}

fn sanitize(value: &str) -> String {
    value.replace(['\n', '\r', '\t'], " ")
}
