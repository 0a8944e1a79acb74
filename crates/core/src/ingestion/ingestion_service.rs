use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, error, info, warn};

use super::ingestion_config::{IngestionConfig, MissingDatePolicy};
use super::ingestion_model::{IngestionOutcome, IngestionReport, IngestionRequest};
use super::sheet_ingestor::{FileContext, FileProgress, RowFlow, SheetIngestor};
use super::source_file_store::SourceFileStoreTrait;
use super::workbook::WorkbookSource;
use crate::classifier::RowClassifier;
use crate::disclosures::{DisclosureStoreTrait, DisclosureTransaction, NewUpload, Upload};
use crate::errors::{Error, IngestionError, Result};
use crate::events::{IngestionEvent, IngestionEventSink};
use crate::funds::FundResolver;
use crate::reference::ReferenceDataRepositoryTrait;

/// Ingests uploaded disclosure files, one transaction per file.
#[async_trait]
pub trait IngestionServiceTrait: Send + Sync {
    /// Never fails: every problem is reported through the returned outcome.
    async fn ingest(&self, request: IngestionRequest, workbook: Box<dyn WorkbookSource>) -> IngestionReport;
}

pub struct IngestionService {
    reference_repository: Arc<dyn ReferenceDataRepositoryTrait>,
    store: Arc<dyn DisclosureStoreTrait>,
    file_store: Arc<dyn SourceFileStoreTrait>,
    event_sink: Arc<dyn IngestionEventSink>,
    config: IngestionConfig,
}

impl IngestionService {
    pub fn new(
        reference_repository: Arc<dyn ReferenceDataRepositoryTrait>,
        store: Arc<dyn DisclosureStoreTrait>,
        file_store: Arc<dyn SourceFileStoreTrait>,
        event_sink: Arc<dyn IngestionEventSink>,
        config: IngestionConfig,
    ) -> Self {
        Self {
            reference_repository,
            store,
            file_store,
            event_sink,
            config,
        }
    }

    /// Resolves reference data and creates the provisional upload.
    async fn prepare(
        &self,
        tx: &mut dyn DisclosureTransaction,
        request: &IngestionRequest,
    ) -> Result<(Upload, SheetIngestor)> {
        let amc = self
            .reference_repository
            .get_amc(request.amc_id)
            .await?
            .ok_or(IngestionError::AmcNotFound(request.amc_id))?;
        let disclosure_type = self
            .reference_repository
            .get_disclosure_type(request.disclosure_type_id)
            .await?
            .ok_or(IngestionError::DisclosureTypeNotFound(request.disclosure_type_id))?;
        let funds = self.reference_repository.list_funds(amc.id).await?;

        let resolver = FundResolver::new(amc.id, funds);
        let classifier = RowClassifier::new(resolver.known_keys())
            .with_extra_section_labels(&self.config.extra_section_labels);

        let upload = tx
            .create_upload(NewUpload {
                file_name: request.file_name.clone(),
                disclosure_type_id: disclosure_type.id,
            })
            .await?;
        debug!("Provisional upload {} for '{}'", upload.id, request.file_name);

        let context = FileContext {
            upload_id: upload.id,
            amc_name: amc.name,
            disclosure_type_name: disclosure_type.type_name,
            retain_skipped_rows: self.config.retain_skipped_rows,
        };
        let ingestor = SheetIngestor::new(context, resolver, classifier, self.event_sink.clone());
        Ok((upload, ingestor))
    }

    /// Keeps the provisional name of a dateless upload unless another upload already has it.
    async fn settle_provisional_name(
        &self,
        tx: &mut dyn DisclosureTransaction,
        upload: Upload,
        progress: &mut FileProgress,
    ) -> Result<Upload> {
        if !tx.upload_name_exists(&upload.file_name, upload.id).await? {
            return Ok(upload);
        }
        let unique_name = format!("{}-{}", upload.id, upload.file_name);
        self.record(
            progress,
            IngestionEvent::warning(format!(
                "Upload name '{}' is already taken; stored as '{}'",
                upload.file_name, unique_name
            )),
        );
        tx.rename_upload(upload.id, &unique_name).await
    }

    async fn complete(
        &self,
        mut tx: Box<dyn DisclosureTransaction>,
        request: &IngestionRequest,
        upload: Upload,
        mut progress: FileProgress,
    ) -> IngestionReport {
        if progress.duplicate {
            info!("'{}' is a duplicate, discarding", request.file_name);
            self.rollback_and_discard(tx, &request.source_path).await;
            return report(IngestionOutcome::Duplicate, None, None, progress);
        }

        let Some(canonical_name) = progress.canonical_name.clone() else {
            error!("No as-on date found in '{}'", request.file_name);
            self.record(
                &mut progress,
                IngestionEvent::error("No as-on date found; the upload keeps its provisional name"),
            );

            if self.config.missing_date_policy == MissingDatePolicy::Rollback {
                return self
                    .fail(tx, request, Error::from(IngestionError::MissingAsOnDate), progress)
                    .await;
            }
            let upload = match self.settle_provisional_name(tx.as_mut(), upload, &mut progress).await {
                Ok(upload) => upload,
                Err(err) => return self.fail(tx, request, err, progress).await,
            };
            if let Err(err) = tx.commit().await {
                return self.fail_after_commit(request, err, None, progress).await;
            }
            return success(upload.id, upload.file_name, progress);
        };

        if let Err(err) = tx.rename_upload(upload.id, &canonical_name).await {
            return self.fail(tx, request, err, progress).await;
        }
        let promoted = match self
            .file_store
            .promote(&request.source_path, &canonical_name)
            .await
        {
            Ok(path) => path,
            Err(err) => return self.fail(tx, request, err, progress).await,
        };
        if let Err(err) = tx.commit().await {
            return self
                .fail_after_commit(request, err, Some(promoted.as_path()), progress)
                .await;
        }

        info!(
            "Ingested '{}' as '{}' ({} snapshots, {} holdings)",
            request.file_name, canonical_name, progress.stats.snapshots, progress.stats.holdings
        );
        success(upload.id, canonical_name, progress)
    }

    /// Rolls back, discards the source file and reports the user-facing reason.
    async fn fail(
        &self,
        tx: Box<dyn DisclosureTransaction>,
        request: &IngestionRequest,
        err: Error,
        mut progress: FileProgress,
    ) -> IngestionReport {
        error!("Ingestion of '{}' failed: {}", request.file_name, err);
        self.rollback_and_discard(tx, &request.source_path).await;
        self.abort_report(err, &mut progress)
    }

    /// A failed commit leaves nothing to roll back; only the file needs cleaning up.
    async fn fail_after_commit(
        &self,
        request: &IngestionRequest,
        err: Error,
        promoted: Option<&Path>,
        mut progress: FileProgress,
    ) -> IngestionReport {
        error!("Commit of '{}' failed: {}", request.file_name, err);
        self.discard(promoted.unwrap_or(request.source_path.as_path())).await;
        self.abort_report(err, &mut progress)
    }

    fn abort_report(&self, err: Error, progress: &mut FileProgress) -> IngestionReport {
        let reason = err.user_message();
        self.record(progress, IngestionEvent::abort(reason.clone()));
        report(
            IngestionOutcome::Failed { reason },
            None,
            None,
            std::mem::take(progress),
        )
    }

    async fn rollback_and_discard(&self, tx: Box<dyn DisclosureTransaction>, source: &Path) {
        if let Err(err) = tx.rollback().await {
            error!("Rollback failed: {}", err);
        }
        self.discard(source).await;
    }

    async fn discard(&self, source: &Path) {
        if let Err(err) = self.file_store.discard(source).await {
            warn!("Could not discard {}: {}", source.display(), err);
        }
    }

    fn record(&self, progress: &mut FileProgress, event: IngestionEvent) {
        self.event_sink.emit(event.clone());
        progress.events.push(event);
    }
}

#[async_trait]
impl IngestionServiceTrait for IngestionService {
    async fn ingest(&self, request: IngestionRequest, mut workbook: Box<dyn WorkbookSource>) -> IngestionReport {
        info!(
            "Ingesting '{}' (AMC {}, disclosure type {})",
            request.file_name, request.amc_id, request.disclosure_type_id
        );

        let mut tx = match self.store.begin().await {
            Ok(tx) => tx,
            Err(err) => {
                error!("Could not start a transaction for '{}': {}", request.file_name, err);
                self.discard(&request.source_path).await;
                let mut progress = FileProgress::default();
                return self.abort_report(err, &mut progress);
            }
        };

        let (upload, mut ingestor) = match self.prepare(tx.as_mut(), &request).await {
            Ok(prepared) => prepared,
            Err(err) => return self.fail(tx, &request, err, FileProgress::default()).await,
        };

        let result = ingest_sheets(&mut ingestor, tx.as_mut(), workbook.as_mut()).await;
        let progress = ingestor.into_progress();
        match result {
            Ok(()) => self.complete(tx, &request, upload, progress).await,
            Err(err) => self.fail(tx, &request, err, progress).await,
        }
    }
}

/// Runs every sheet through the state machine until the workbook ends or a sheet halts the file.
async fn ingest_sheets(
    ingestor: &mut SheetIngestor,
    tx: &mut dyn DisclosureTransaction,
    workbook: &mut dyn WorkbookSource,
) -> Result<()> {
    while let Some(mut sheet) = workbook.next_sheet()? {
        if ingestor.ingest_sheet(tx, sheet.as_mut()).await? == RowFlow::Halt {
            break;
        }
    }
    Ok(())
}

fn success(upload_id: i64, file_name: String, progress: FileProgress) -> IngestionReport {
    let outcome = if progress.events.is_empty() {
        IngestionOutcome::Success
    } else {
        IngestionOutcome::SuccessWithWarnings {
            warnings: progress.events.clone(),
        }
    };
    report(outcome, Some(upload_id), Some(file_name), progress)
}

fn report(
    outcome: IngestionOutcome,
    upload_id: Option<i64>,
    file_name: Option<String>,
    progress: FileProgress,
) -> IngestionReport {
    IngestionReport {
        outcome,
        upload_id,
        file_name,
        stats: progress.stats,
        warnings: progress.events,
        skipped_rows: progress.skipped_rows,
    }
}
