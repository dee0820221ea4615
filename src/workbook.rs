use std::path::Path;

use calamine::{Reader, open_workbook_auto};
use log::{debug, warn};

use crate::{data::Cell, error::StageError};

pub const CLIENT_ID_COLUMN: &str = "id_cliente";
pub const CLIENT_COLUMNS: [&str; 6] = [
    CLIENT_ID_COLUMN,
    "nome",
    "email",
    "documento",
    "tipo_pessoa",
    "tipo_contato",
];
pub const SALE_COLUMNS: [&str; 4] = ["id_venda", CLIENT_ID_COLUMN, "valor", "data_venda"];

#[derive(Debug, Clone, PartialEq)]
pub struct RawClientRow {
    pub id: Cell,
    pub name: Cell,
    pub email: Cell,
    pub document: Cell,
    pub person_type: Cell,
    pub contact_type: Cell,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawSaleRow {
    pub id: Cell,
    pub client_id: Cell,
    pub amount: Cell,
    pub sale_date: Cell,
}

/// A sheet held in memory as header names plus rows of cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub sheet: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new(sheet: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            sheet: sheet.into(),
            headers,
            rows,
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|header| header.trim().eq_ignore_ascii_case(name))
    }

    /// Whether the sheet carries the client id column that orphan detection reads.
    pub fn has_client_ids(&self) -> bool {
        self.column_index(CLIENT_ID_COLUMN).is_some()
    }

    pub fn client_rows(&self) -> Vec<RawClientRow> {
        if !self.has_client_ids() {
            warn!(
                "Sheet '{}' has no '{}' column; every sale will be flagged as orphan",
                self.sheet, CLIENT_ID_COLUMN
            );
        }
        let [id, name, email, document, person_type, contact_type] = self.locate(CLIENT_COLUMNS);
        self.rows
            .iter()
            .map(|row| RawClientRow {
                id: cell_at(row, id),
                name: cell_at(row, name),
                email: cell_at(row, email),
                document: cell_at(row, document),
                person_type: cell_at(row, person_type),
                contact_type: cell_at(row, contact_type),
            })
            .collect()
    }

    pub fn sale_rows(&self) -> Vec<RawSaleRow> {
        let [id, client_id, amount, sale_date] = self.locate(SALE_COLUMNS);
        self.rows
            .iter()
            .map(|row| RawSaleRow {
                id: cell_at(row, id),
                client_id: cell_at(row, client_id),
                amount: cell_at(row, amount),
                sale_date: cell_at(row, sale_date),
            })
            .collect()
    }

    fn locate<const N: usize>(&self, columns: [&str; N]) -> [Option<usize>; N] {
        let ignored = self
            .headers
            .iter()
            .filter(|header| {
                !columns
                    .iter()
                    .any(|column| header.trim().eq_ignore_ascii_case(column))
            })
            .collect::<Vec<_>>();
        if !ignored.is_empty() {
            debug!("Sheet '{}' ignores column(s): {:?}", self.sheet, ignored);
        }
        columns.map(|column| {
            let index = self.column_index(column);
            if index.is_none() {
                debug!("Sheet '{}' has no '{}' column", self.sheet, column);
            }
            index
        })
    }
}

fn cell_at(row: &[Cell], index: Option<usize>) -> Cell {
    index
        .and_then(|idx| row.get(idx))
        .cloned()
        .unwrap_or(Cell::Empty)
}

/// Reads one named sheet. The first row is the header; fully empty rows are dropped.
///
/// Columns are later looked up by trimmed, case-insensitive header name, so
/// column order is free and unknown columns are ignored.
pub fn read_sheet(path: &Path, sheet: &str) -> Result<RawTable, StageError> {
    let mut workbook = open_workbook_auto(path).map_err(|source| StageError::Extract {
        sheet: sheet.to_string(),
        source,
    })?;
    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        return Err(StageError::MissingSheet {
            sheet: sheet.to_string(),
            path: path.to_path_buf(),
        });
    }
    let range = workbook
        .worksheet_range(sheet)
        .map_err(|source| StageError::Extract {
            sheet: sheet.to_string(),
            source,
        })?;

    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|header| {
            header
                .iter()
                .map(|cell| Cell::from(cell).to_text().unwrap_or_default().trim().to_string())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    let body = rows
        .map(|row| row.iter().map(Cell::from).collect::<Vec<_>>())
        .filter(|cells| cells.iter().any(|cell| !cell.is_empty()))
        .collect::<Vec<_>>();

    debug!(
        "Extracted {} row(s) across {} column(s) from sheet '{}'",
        body.len(),
        headers.len(),
        sheet
    );
    Ok(RawTable::new(sheet, headers, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RawTable {
        RawTable::new(
            "clientes",
            vec![
                " Nome ".into(),
                "email".into(),
                "ID_CLIENTE".into(),
                "extra".into(),
            ],
            vec![
                vec![
                    Cell::text("Ana"),
                    Cell::text("ana@x.com"),
                    Cell::Int(1),
                    Cell::text("ignored"),
                ],
                vec![Cell::text("Bia")],
            ],
        )
    }

    #[test]
    fn client_rows_are_addressed_by_header_name() {
        let rows = table().client_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, Cell::text("Ana"));
        assert_eq!(rows[0].id, Cell::Int(1));
        assert_eq!(rows[0].document, Cell::Empty);
        assert_eq!(rows[1].email, Cell::Empty);
    }

    #[test]
    fn client_id_column_is_detected_case_insensitively() {
        assert!(table().has_client_ids());
        let no_ids = RawTable::new(
            "clientes",
            vec!["nome".into(), "email".into()],
            vec![vec![Cell::text("Ana"), Cell::text("ana@x.com")]],
        );
        assert!(!no_ids.has_client_ids());
        assert!(no_ids.client_rows().iter().all(|row| row.id.is_empty()));
    }

    #[test]
    fn sale_rows_fill_missing_columns_with_empty() {
        let sales = RawTable::new(
            "vendas",
            vec!["id_cliente".into(), "valor".into()],
            vec![vec![Cell::Int(3), Cell::Float(10.0)]],
        )
        .sale_rows();
        assert_eq!(sales[0].client_id, Cell::Int(3));
        assert_eq!(sales[0].amount, Cell::Float(10.0));
        assert_eq!(sales[0].id, Cell::Empty);
        assert_eq!(sales[0].sale_date, Cell::Empty);
    }

    #[test]
    fn missing_workbook_is_an_extract_error() {
        let err = read_sheet(Path::new("does/not/exist.xlsx"), "clientes").unwrap_err();
        assert!(matches!(err, StageError::Extract { .. }));
    }
}
