use std::collections::HashSet;

use log::debug;

use crate::reference::Fund;
use crate::utils::normalize_name;

/// Result of matching banner text against an AMC's fund catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FundMatch {
    Found(Fund),
    NotFound,
}

/// Resolves banner text to one of an AMC's funds by normalized containment.
#[derive(Debug, Clone)]
pub struct FundResolver {
    catalog: Vec<(String, Fund)>,
}

impl FundResolver {
    /// Funds belonging to other AMCs are ignored.
    pub fn new(amc_id: i64, funds: Vec<Fund>) -> Self {
        let catalog = funds
            .into_iter()
            .filter(|f| f.amc_id == amc_id)
            .map(|f| (normalize_name(&f.canonical_name), f))
            .filter(|(key, _)| !key.is_empty())
            .collect();
        Self { catalog }
    }

    /// Canonical keys of the catalog, for the row classifier.
    pub fn known_keys(&self) -> HashSet<String> {
        self.catalog.iter().map(|(key, _)| key.clone()).collect()
    }

    /// A fund matches when either normalized name contains the other. Among several
    /// matches the longest normalized canonical name wins, so "Axis Bond Plus Fund" is
    /// not absorbed by "Axis Bond". Ties keep catalog order.
    pub fn resolve(&self, candidate_text: &str) -> FundMatch {
        let candidate = normalize_name(candidate_text);
        if candidate.is_empty() {
            return FundMatch::NotFound;
        }

        let mut best: Option<&(String, Fund)> = None;
        for entry in &self.catalog {
            let key = &entry.0;
            if !(key.contains(candidate.as_str()) || candidate.contains(key.as_str())) {
                continue;
            }
            if best.map_or(true, |(best_key, _)| key.len() > best_key.len()) {
                best = Some(entry);
            }
        }

        match best {
            Some((key, fund)) => {
                debug!("Resolved '{}' to fund {} ('{}')", candidate_text, fund.id, key);
                FundMatch::Found(fund.clone())
            }
            None => FundMatch::NotFound,
        }
    }
}

/// One-shot form of [`FundResolver::resolve`].
pub fn resolve_fund(amc_id: i64, candidate_text: &str, fund_catalog: &[Fund]) -> FundMatch {
    FundResolver::new(amc_id, fund_catalog.to_vec()).resolve(candidate_text)
}
