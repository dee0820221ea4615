pub mod clients;
pub mod sales;
pub mod string_ops;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

pub use clients::{clean_client_row, known_client_ids, transform_clients};
pub use sales::{clean_sale_row, transform_sales};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientRecord {
    #[serde(rename = "id_cliente")]
    pub id: Option<i64>,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "documento")]
    pub document: String,
    #[serde(rename = "tipo_pessoa")]
    pub person_type: String,
    #[serde(rename = "tipo_contato")]
    pub contact_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleRecord {
    #[serde(rename = "id_venda")]
    pub id: Option<i64>,
    #[serde(rename = "id_cliente")]
    pub client_id: Option<i64>,
    #[serde(rename = "id_cliente_orfao")]
    pub client_is_orphan: bool,
    #[serde(rename = "valor")]
    pub amount: Decimal,
    #[serde(rename = "data_venda")]
    pub sale_date: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientReport {
    pub rows: usize,
    pub invalid_emails: usize,
    pub unknown_documents: usize,
    pub inferred_person_types: usize,
    pub unknown_contact_types: usize,
    pub filled_missing: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalesReport {
    pub rows: usize,
    pub orphans: usize,
    pub defaulted_dates: usize,
    pub zeroed_amounts: usize,
    /// Numeric amounts outside the decimal range, loaded as `0.00`.
    pub unrepresentable_amounts: usize,
    pub sign_flipped_amounts: usize,
}
