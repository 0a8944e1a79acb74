//! Per-sheet state machine.
//!
//! Every row goes through [`SheetIngestor::apply`], which classifies it and applies the
//! transition for its kind to an explicit [`SheetState`]. Rows must be applied in source
//! order: fund, date, section and snapshot boundaries are tracked across rows.

use std::sync::Arc;

use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;

use super::canonical_name::canonical_file_name;
use super::ingestion_model::{IngestionStats, SkippedRow};
use super::workbook::SheetSource;
use crate::classifier::{is_data_row, RowClassifier, RowKind};
use crate::columns::{map_columns, ColumnMap, ColumnRole};
use crate::constants::{INDUSTRY_MIN_LEN, RATING_MARKER};
use crate::disclosures::{
    DisclosureTransaction, InstrumentHeader, NewHolding, NewInstrument, NewSnapshot, Snapshot,
};
use crate::errors::Result;
use crate::events::{IngestionEvent, IngestionEventSink};
use crate::funds::{FundMatch, FundResolver};
use crate::reference::Fund;
use crate::utils::{parse_date_fragment, parse_number};

/// Whether the caller should keep feeding rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowFlow {
    Continue,
    /// The file is a duplicate; no further rows or sheets should be applied.
    Halt,
}

/// State of the sheet being read. A fresh one is used for every sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetState {
    pub sheet_name: String,
    pub fund: Option<Fund>,
    pub snapshot: Option<Snapshot>,
    pub section: Option<InstrumentHeader>,
    /// Set by the first parseable as-on date of the sheet, never replaced.
    pub as_on_date: Option<NaiveDate>,
    pub column_map: Option<ColumnMap>,
}

impl SheetState {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            ..Default::default()
        }
    }
}

/// What the ingestor needs to know about the file it is reading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContext {
    /// Provisional upload, excluded from the duplicate check.
    pub upload_id: i64,
    pub amc_name: String,
    pub disclosure_type_name: String,
    pub retain_skipped_rows: bool,
}

/// Everything accumulated over the sheets of one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileProgress {
    /// Canonical name from the first as-on date resolved in the file.
    pub canonical_name: Option<String>,
    pub as_on_date: Option<NaiveDate>,
    pub duplicate: bool,
    pub stats: IngestionStats,
    pub events: Vec<IngestionEvent>,
    pub skipped_rows: Vec<SkippedRow>,
}

pub struct SheetIngestor {
    context: FileContext,
    resolver: FundResolver,
    classifier: RowClassifier,
    sink: Arc<dyn IngestionEventSink>,
    progress: FileProgress,
}

impl SheetIngestor {
    pub fn new(
        context: FileContext,
        resolver: FundResolver,
        classifier: RowClassifier,
        sink: Arc<dyn IngestionEventSink>,
    ) -> Self {
        Self {
            context,
            resolver,
            classifier,
            sink,
            progress: FileProgress::default(),
        }
    }

    pub fn progress(&self) -> &FileProgress {
        &self.progress
    }

    pub fn into_progress(self) -> FileProgress {
        self.progress
    }

    /// Reads one sheet to the end, or until the file turns out to be a duplicate.
    pub async fn ingest_sheet(
        &mut self,
        tx: &mut dyn DisclosureTransaction,
        sheet: &mut dyn SheetSource,
    ) -> Result<RowFlow> {
        let mut state = SheetState::new(sheet.name());
        self.progress.stats.sheets += 1;
        debug!("Ingesting sheet '{}'", state.sheet_name);

        let mut row_index = 0;
        while let Some(cells) = sheet.next_row()? {
            if self.apply(tx, &mut state, row_index, &cells).await? == RowFlow::Halt {
                return Ok(RowFlow::Halt);
            }
            row_index += 1;
        }

        self.finish_sheet(&state);
        Ok(RowFlow::Continue)
    }

    /// Classifies one row and applies its transition.
    pub async fn apply(
        &mut self,
        tx: &mut dyn DisclosureTransaction,
        state: &mut SheetState,
        row_index: usize,
        cells: &[Option<String>],
    ) -> Result<RowFlow> {
        let classified = self.classifier.classify(cells);
        let kind = effective_kind(state, classified.kind, cells);
        self.progress.stats.record_row(kind);
        let value = classified.value.as_deref();

        match kind {
            RowKind::FundBanner => self.on_fund_banner(state, row_index, value.unwrap_or_default()),
            RowKind::AsOnDate => return self.on_as_on_date(tx, state, row_index, value).await,
            RowKind::Section => self.on_section(tx, state, row_index, value).await?,
            RowKind::Header => state.column_map = Some(map_columns(cells)),
            RowKind::Data => self.on_data(tx, state, row_index, cells).await?,
            RowKind::GrandTotal => self.on_grand_total(tx, state, row_index, cells).await?,
            RowKind::Skip => self.retain(state, row_index, cells),
            RowKind::Empty => {}
        }

        Ok(RowFlow::Continue)
    }

    /// End-of-sheet diagnostics. Never fatal.
    pub fn finish_sheet(&mut self, state: &SheetState) {
        let Some(fund) = &state.fund else {
            debug!("No fund found in sheet '{}'", state.sheet_name);
            return;
        };

        match (state.as_on_date, &state.snapshot) {
            (None, _) => {
                let message = format!("Fund '{}' found but no as-on date", fund.canonical_name);
                self.record(IngestionEvent::warning(message).at(&state.sheet_name, None));
            }
            (Some(date), None) => {
                let message = format!(
                    "Fund '{}' and date {} found but no snapshot was created",
                    fund.canonical_name, date
                );
                self.record(IngestionEvent::warning(message).at(&state.sheet_name, None));
            }
            (Some(_), Some(_)) => {}
        }
    }

    fn on_fund_banner(&mut self, state: &mut SheetState, row_index: usize, text: &str) {
        match self.resolver.resolve(text) {
            FundMatch::Found(fund) => {
                debug!("Sheet '{}': fund '{}'", state.sheet_name, fund.canonical_name);
                state.fund = Some(fund);
            }
            FundMatch::NotFound => {
                self.warn(state, row_index, format!("Fund '{}' not found for this AMC", text));
            }
        }
    }

    async fn on_as_on_date(
        &mut self,
        tx: &mut dyn DisclosureTransaction,
        state: &mut SheetState,
        row_index: usize,
        fragment: Option<&str>,
    ) -> Result<RowFlow> {
        if state.as_on_date.is_some() {
            return Ok(RowFlow::Continue);
        }

        let Some(date) = fragment.and_then(parse_date_fragment) else {
            let message = format!("Could not parse as-on date '{}'", fragment.unwrap_or_default());
            self.warn(state, row_index, message);
            return Ok(RowFlow::Continue);
        };

        let canonical_name = canonical_file_name(
            &self.context.amc_name,
            date,
            &self.context.disclosure_type_name,
        );
        if tx
            .upload_name_exists(&canonical_name, self.context.upload_id)
            .await?
        {
            self.progress.duplicate = true;
            let message = format!("'{}' has already been uploaded", canonical_name);
            self.record(IngestionEvent::abort(message).at(&state.sheet_name, Some(row_index)));
            return Ok(RowFlow::Halt);
        }

        state.as_on_date = Some(date);
        match self.progress.canonical_name.clone() {
            None => {
                self.progress.canonical_name = Some(canonical_name);
                self.progress.as_on_date = Some(date);
            }
            Some(existing) if existing != canonical_name => {
                let message = format!(
                    "Sheet is dated {} but the file is named after an earlier date ('{}')",
                    date, existing
                );
                self.warn(state, row_index, message);
            }
            Some(_) => {}
        }

        if let Some(fund) = &state.fund {
            let snapshot = tx
                .create_snapshot(NewSnapshot {
                    fund_id: fund.id,
                    upload_id: self.context.upload_id,
                    as_on_date: date,
                    sheet_name: state.sheet_name.clone(),
                })
                .await?;
            self.progress.stats.snapshots += 1;
            state.snapshot = Some(snapshot);
        }

        Ok(RowFlow::Continue)
    }

    async fn on_section(
        &mut self,
        tx: &mut dyn DisclosureTransaction,
        state: &mut SheetState,
        row_index: usize,
        label: Option<&str>,
    ) -> Result<()> {
        let label = label.unwrap_or_default().trim();
        state.section = tx.find_instrument_header(label).await?;

        if state.section.is_some() {
            self.progress.stats.sections_resolved += 1;
        } else {
            self.progress.stats.sections_unresolved += 1;
            self.warn(state, row_index, format!("Section '{}' not found", label));
        }
        Ok(())
    }

    async fn on_data(
        &mut self,
        tx: &mut dyn DisclosureTransaction,
        state: &mut SheetState,
        row_index: usize,
        cells: &[Option<String>],
    ) -> Result<()> {
        let (Some(snapshot_id), Some(map)) = (
            state.snapshot.as_ref().map(|s| s.id),
            state.column_map.clone(),
        ) else {
            self.retain(state, row_index, cells);
            return Ok(());
        };

        let Some(name) = map.value(ColumnRole::Name, cells) else {
            self.warn(state, row_index, "Holding row has no instrument name");
            self.retain(state, row_index, cells);
            return Ok(());
        };

        let industry_or_rating = map
            .value(ColumnRole::IndustryOrRating, cells)
            .filter(|v| v.chars().count() > INDUSTRY_MIN_LEN);
        let (industry_id, rating) = match industry_or_rating {
            Some(v) if v.contains(RATING_MARKER) => (None, Some(v.to_string())),
            Some(v) => (Some(tx.get_or_create_industry(v).await?.id), None),
            None => (None, None),
        };

        let instrument = tx
            .get_or_create_instrument(NewInstrument {
                name: name.to_string(),
                isin: map.value(ColumnRole::Isin, cells).map(str::to_string),
                industry_id,
                rating,
            })
            .await?;

        let holding = NewHolding {
            snapshot_id,
            header_id: state.section.as_ref().map(|s| s.id),
            instrument_id: instrument.id,
            qty: self.numeric(state, row_index, &map, ColumnRole::Quantity, cells),
            market_value: self.numeric(state, row_index, &map, ColumnRole::MarketValue, cells),
            pct_of_net_assets: self.numeric(state, row_index, &map, ColumnRole::PctOfNetAssets, cells),
            ytm: self.numeric(state, row_index, &map, ColumnRole::Ytm, cells),
            ytc: self.numeric(state, row_index, &map, ColumnRole::Ytc, cells),
            raw_row: serde_json::to_string(cells)?,
        };
        tx.create_holding(holding).await?;
        self.progress.stats.holdings += 1;
        Ok(())
    }

    async fn on_grand_total(
        &mut self,
        tx: &mut dyn DisclosureTransaction,
        state: &mut SheetState,
        row_index: usize,
        cells: &[Option<String>],
    ) -> Result<()> {
        let (Some(snapshot), Some(map)) = (&state.snapshot, &state.column_map) else {
            return Ok(());
        };
        if snapshot.grand_total.is_some() {
            debug!("Ignoring repeated grand total in sheet '{}'", state.sheet_name);
            return Ok(());
        }

        let snapshot_id = snapshot.id;
        match map.value(ColumnRole::MarketValue, cells).and_then(parse_number) {
            Some(total) => {
                state.snapshot = Some(tx.set_snapshot_grand_total(snapshot_id, total).await?);
            }
            None => self.warn(state, row_index, "Grand total has no readable market value"),
        }
        Ok(())
    }

    fn numeric(
        &mut self,
        state: &SheetState,
        row_index: usize,
        map: &ColumnMap,
        role: ColumnRole,
        cells: &[Option<String>],
    ) -> Option<Decimal> {
        let raw = map.value(role, cells)?;
        let parsed = parse_number(raw);
        if parsed.is_none() {
            self.warn(state, row_index, format!("Unreadable {:?} value '{}'", role, raw));
        }
        parsed
    }

    fn retain(&mut self, state: &SheetState, row_index: usize, cells: &[Option<String>]) {
        if self.context.retain_skipped_rows {
            self.progress.skipped_rows.push(SkippedRow {
                sheet: state.sheet_name.clone(),
                row: row_index,
                cells: cells.to_vec(),
            });
        }
    }

    fn warn(&mut self, state: &SheetState, row_index: usize, message: impl Into<String>) {
        self.record(IngestionEvent::warning(message).at(&state.sheet_name, Some(row_index)));
    }

    fn record(&mut self, event: IngestionEvent) {
        self.sink.emit(event.clone());
        self.progress.events.push(event);
    }
}

/// A banner-shaped row after the fund is known is read as data when it has the shape of a
/// holding, otherwise as a section label.
fn effective_kind(state: &SheetState, kind: RowKind, cells: &[Option<String>]) -> RowKind {
    if kind != RowKind::FundBanner || state.fund.is_none() {
        return kind;
    }
    if is_data_row(cells) {
        RowKind::Data
    } else {
        RowKind::Section
    }
}
