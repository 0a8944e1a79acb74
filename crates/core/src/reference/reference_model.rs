use serde::{Deserialize, Serialize};

/// Asset Management Company operating one or more funds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Amc {
    pub id: i64,
    pub name: String,
}

/// Kind of disclosure an upload carries (monthly, half-yearly, ...). Chosen by the uploader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisclosureType {
    pub id: i64,
    pub type_name: String,
}

/// A scheme of an AMC, identified by its canonical name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fund {
    pub id: i64,
    pub amc_id: i64,
    pub canonical_name: String,
}
