use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One ingested document. The file name is provisional until the canonical rename.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Upload {
    pub id: i64,
    pub file_name: String,
    pub disclosure_type_id: i64,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUpload {
    pub file_name: String,
    pub disclosure_type_id: i64,
}

/// A fund's holdings as reported on one sheet of one upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub id: i64,
    pub fund_id: i64,
    pub upload_id: i64,
    pub as_on_date: NaiveDate,
    pub sheet_name: String,
    pub grand_total: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSnapshot {
    pub fund_id: i64,
    pub upload_id: i64,
    pub as_on_date: NaiveDate,
    pub sheet_name: String,
}

/// Named grouping of holdings ("Equity & Equity Related"). Global, unique by exact name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentHeader {
    pub id: i64,
    pub name: String,
}

/// Global, unique by exact name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Industry {
    pub id: i64,
    pub name: String,
}

/// Global instrument dictionary, unique by the `(isin, name)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentMaster {
    pub id: i64,
    pub name: String,
    pub isin: Option<String>,
    pub industry_id: Option<i64>,
    pub rating: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInstrument {
    pub name: String,
    pub isin: Option<String>,
    pub industry_id: Option<i64>,
    pub rating: Option<String>,
}

/// One instrument's position within a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub id: i64,
    pub snapshot_id: i64,
    pub header_id: Option<i64>,
    pub instrument_id: i64,
    pub qty: Option<Decimal>,
    pub market_value: Option<Decimal>,
    pub pct_of_net_assets: Option<Decimal>,
    pub ytm: Option<Decimal>,
    pub ytc: Option<Decimal>,
    /// JSON array of the source cells, kept verbatim for audit.
    pub raw_row: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHolding {
    pub snapshot_id: i64,
    pub header_id: Option<i64>,
    pub instrument_id: i64,
    pub qty: Option<Decimal>,
    pub market_value: Option<Decimal>,
    pub pct_of_net_assets: Option<Decimal>,
    pub ytm: Option<Decimal>,
    pub ytc: Option<Decimal>,
    pub raw_row: String,
}
