//! Fund-name resolution against an AMC's catalog.

mod fund_resolver;

pub use fund_resolver::{resolve_fund, FundMatch, FundResolver};
