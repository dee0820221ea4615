#![allow(dead_code)]

use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook};
use sales_etl::config::{DatabaseConfig, EtlConfig};
use tempfile::{TempDir, tempdir};

#[derive(Debug, Clone, Copy)]
pub enum XCell<'a> {
    Text(&'a str),
    Number(f64),
    /// Excel serial rendered with a date number format.
    Date(f64),
    Blank,
}

pub struct SheetSpec<'a> {
    pub name: &'a str,
    pub headers: &'a [&'a str],
    pub rows: Vec<Vec<XCell<'a>>>,
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Writes an xlsx workbook with the given sheets and returns its path.
    pub fn write_workbook(&self, name: &str, sheets: &[SheetSpec<'_>]) -> PathBuf {
        let path = self.join(name);
        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        let mut workbook = Workbook::new();
        for spec in sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(spec.name).expect("sheet name");
            for (col, header) in spec.headers.iter().enumerate() {
                worksheet
                    .write_string(0, col as u16, *header)
                    .expect("write header");
            }
            for (row_idx, row) in spec.rows.iter().enumerate() {
                let row_num = (row_idx + 1) as u32;
                for (col, cell) in row.iter().enumerate() {
                    let col = col as u16;
                    match cell {
                        XCell::Text(value) => {
                            worksheet.write_string(row_num, col, *value).expect("write text");
                        }
                        XCell::Number(value) => {
                            worksheet.write_number(row_num, col, *value).expect("write number");
                        }
                        XCell::Date(serial) => {
                            worksheet
                                .write_number_with_format(row_num, col, *serial, &date_format)
                                .expect("write date");
                        }
                        XCell::Blank => {}
                    }
                }
            }
        }
        workbook.save(&path).expect("save workbook");
        path
    }

    /// The client/sales workbook shared by the end-to-end tests.
    pub fn sample_workbook(&self) -> PathBuf {
        self.write_workbook("data.xlsx", &[sample_clients(), sample_sales()])
    }

    pub fn config_for(&self, workbook: &Path) -> EtlConfig {
        EtlConfig {
            workbook: workbook.to_path_buf(),
            database: DatabaseConfig {
                path: self.join("etl.db"),
                enforce_foreign_keys: false,
            },
            ..EtlConfig::default()
        }
    }
}

pub const CLIENT_HEADERS: &[&str] = &[
    "id_cliente",
    "nome",
    "email",
    "documento",
    "tipo_pessoa",
    "tipo_contato",
];

pub const SALE_HEADERS: &[&str] = &["id_cliente", "valor", "data_venda"];

pub fn sample_clients() -> SheetSpec<'static> {
    use XCell::*;
    SheetSpec {
        name: "clientes",
        headers: CLIENT_HEADERS,
        rows: vec![
            vec![
                Number(1.0),
                Text("Dra. Ana Lima"),
                Text("ana@@bad"),
                Text("123.456.789-01"),
                Blank,
                Blank,
            ],
            vec![
                Number(2.0),
                Text("Sr. Bruno Souza"),
                Text("bruno@loja.com.br"),
                Text("12.345.678/0001-95"),
                Blank,
                Text("TELEFONE"),
            ],
            vec![
                Number(3.0),
                Text("Carla"),
                Text("carla@x.com"),
                Text("123"),
                Text("fisica"),
                Blank,
            ],
        ],
    }
}

pub fn sample_sales() -> SheetSpec<'static> {
    use XCell::*;
    SheetSpec {
        name: "vendas",
        headers: SALE_HEADERS,
        rows: vec![
            vec![Number(1.0), Number(-150.5), Text("2024-01-15")],
            vec![Number(4.0), Number(99.999), Text("15/01/2024")],
            vec![Number(2.0), Text("abc"), Date(45292.0)],
            vec![Number(3.0), Number(10.0), Blank],
        ],
    }
}
