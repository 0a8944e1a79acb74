/// Section banners recognised in publisher sheets (matched case-insensitively as substrings of a cell).
pub const SECTION_LABELS: &[&str] = &[
    "equity & equity related",
    "debt instrument",
    "money market instrument",
    "government securities",
    "mutual fund units",
    "exchange traded fund",
    "reit/invit instrument",
    "others",
    "commodities related",
    "interest rate swaps",
    "corporate debt market development fund",
    "reverse repo",
    "certificate of deposit",
    "commercial paper",
    "treasury bill",
    "securitised debt",
];

/// A row needs at least `HEADER_MIN_MATCHES` cells containing one of these to be a header row.
pub const HEADER_KEYWORDS: &[&str] = &[
    "isin",
    "quantity",
    "market",
    "fair value",
    "instrument",
    "rating",
    "industry",
    "yield",
    "nav",
    "rounded % to net assets",
];

pub const HEADER_MIN_MATCHES: usize = 3;

/// Footer and annotation markers. Rows containing any of these are never holdings.
pub const STOP_WORDS: &[&str] = &[
    "total",
    "sub total",
    "subtotal",
    "riskometer",
    "note",
    "notes",
    "disclaimer",
    "footnote",
    "net receivable",
];

/// Phrases that introduce the as-on date line.
pub const AS_ON_MARKERS: &[&str] = &["as on", "ended", "date"];

pub const GRAND_TOTAL_MARKER: &str = "grand total";

/// A fund banner has at most this many non-empty cells.
pub const FUND_BANNER_MAX_CELLS: usize = 3;

/// Data rows need at least this many non-empty cells.
pub const DATA_MIN_CELLS: usize = 3;

/// Data rows need at least this many numeric cells.
pub const DATA_MIN_NUMERIC_CELLS: usize = 2;

/// The instrument-name cell of a data row is longer than this (in characters).
pub const INSTRUMENT_NAME_MIN_LEN: usize = 3;

/// Industry/rating cells of this length or shorter are ignored.
pub const INDUSTRY_MIN_LEN: usize = 2;

/// A value in the industry/rating column containing this is a credit rating, not an industry.
pub const RATING_MARKER: &str = "AA";
