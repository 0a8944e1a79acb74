use serde::{Deserialize, Serialize};

/// Column roles a holding row can fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnRole {
    Name,
    Isin,
    IndustryOrRating,
    Quantity,
    MarketValue,
    PctOfNetAssets,
    Ytm,
    Ytc,
}

impl ColumnRole {
    pub const ALL: [ColumnRole; 8] = [
        ColumnRole::Name,
        ColumnRole::Isin,
        ColumnRole::IndustryOrRating,
        ColumnRole::Quantity,
        ColumnRole::MarketValue,
        ColumnRole::PctOfNetAssets,
        ColumnRole::Ytm,
        ColumnRole::Ytc,
    ];

    fn slot(self) -> usize {
        self as usize
    }
}

/// Keyword table, checked in order for each header cell; the first role whose keyword
/// the cell contains wins the cell. Specific phrases come before generic ones so that
/// "Yield to Maturity of the instrument" is not read as the name column.
const ROLE_KEYWORDS: &[(ColumnRole, &[&str])] = &[
    (ColumnRole::Isin, &["isin"]),
    (ColumnRole::Ytm, &["ytm", "yield to maturity"]),
    (ColumnRole::Ytc, &["ytc", "yield to call"]),
    (ColumnRole::PctOfNetAssets, &["% to net assets", "% to nav", "% of net assets", "% to aum"]),
    (ColumnRole::Quantity, &["quantity", "no. of shares", "units"]),
    (ColumnRole::MarketValue, &["market", "fair value"]),
    (ColumnRole::IndustryOrRating, &["industry", "rating"]),
    (
        ColumnRole::Name,
        &[
            "name of the instrument",
            "name of instrument",
            "instrument name",
            "name of security",
            "name of the security",
            "company name",
            "instrument",
            "issuer",
        ],
    ),
];

/// Role to column index mapping built from a header row. Unmapped roles read as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnMap {
    indices: [Option<usize>; 8],
}

impl ColumnMap {
    pub fn index_of(&self, role: ColumnRole) -> Option<usize> {
        self.indices[role.slot()]
    }

    pub fn set(&mut self, role: ColumnRole, index: usize) {
        self.indices[role.slot()] = Some(index);
    }

    pub fn is_mapped(&self, role: ColumnRole) -> bool {
        self.index_of(role).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.iter().all(Option::is_none)
    }

    /// Trimmed cell value for `role`; `None` when the role is unmapped, the row is
    /// shorter than the mapped index, or the cell is blank.
    pub fn value<'a>(&self, role: ColumnRole, row: &'a [Option<String>]) -> Option<&'a str> {
        let index = self.index_of(role)?;
        row.get(index)?
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }
}

/// Maps each header cell to at most one role. A later cell claiming the same role replaces
/// an earlier one.
pub fn map_columns(header_cells: &[Option<String>]) -> ColumnMap {
    let mut map = ColumnMap::default();

    for (index, cell) in header_cells.iter().enumerate() {
        let Some(cell) = cell.as_deref() else {
            continue;
        };
        let lower = cell.trim().to_lowercase();
        if lower.is_empty() {
            continue;
        }

        let role = ROLE_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(role, _)| *role);

        if let Some(role) = role {
            map.set(role, index);
        }
    }

    map
}
