#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use crate::events::{EventSeverity, MockIngestionEventSink};
    use crate::ingestion::test_mocks::*;
    use crate::ingestion::{
        InMemorySheet, InMemoryWorkbook, IngestionConfig, IngestionOutcome, IngestionReport,
        IngestionRequest, IngestionService, IngestionServiceTrait, MissingDatePolicy,
    };

    const SOURCE: &str = "/tmp/upload-1.xlsx";

    fn request() -> IngestionRequest {
        IngestionRequest {
            amc_id: 1,
            disclosure_type_id: 7,
            source_path: PathBuf::from(SOURCE),
            file_name: "november.xlsx".to_string(),
        }
    }

    fn portfolio_sheet(name: &str) -> InMemorySheet {
        InMemorySheet::from_strings(
            name,
            vec![
                vec!["Example Fund"],
                vec!["Monthly Portfolio Statement as on 30-Nov-2025"],
                vec!["Equity & Equity Related"],
                vec![
                    "Name of Instrument",
                    "ISIN",
                    "Industry / Rating",
                    "Quantity",
                    "Market Value",
                    "% to Net Assets",
                ],
                vec!["Acme Ltd", "INE000A01010", "AAA", "1,000", "50,000", "5.00%"],
                vec!["Grand Total", "", "", "", "1,000,000", "100.00%"],
            ],
        )
    }

    struct Harness {
        store: MockDisclosureStore,
        files: MockSourceFileStore,
        sink: MockIngestionEventSink,
        service: IngestionService,
    }

    fn harness(store: MockDisclosureStore, files: MockSourceFileStore, config: IngestionConfig) -> Harness {
        let sink = MockIngestionEventSink::new();
        let service = IngestionService::new(
            Arc::new(MockReferenceData::new()),
            Arc::new(store.clone()),
            Arc::new(files.clone()),
            Arc::new(sink.clone()),
            config,
        );
        Harness {
            store,
            files,
            sink,
            service,
        }
    }

    fn default_harness(store: MockDisclosureStore) -> Harness {
        harness(store, MockSourceFileStore::default(), IngestionConfig::default())
    }

    async fn ingest(h: &Harness, workbook: InMemoryWorkbook) -> IngestionReport {
        h.service.ingest(request(), Box::new(workbook)).await
    }

    fn discarded(h: &Harness) -> Vec<PathBuf> {
        h.files.discarded.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn test_success_renames_promotes_and_commits() {
        let h = default_harness(MockDisclosureStore::new().with_header(5, "Equity & Equity Related"));

        let report = ingest(&h, InMemoryWorkbook::new(vec![portfolio_sheet("Equity")])).await;

        assert_eq!(report.outcome, IngestionOutcome::Success);
        assert_eq!(report.upload_id, Some(1));
        assert_eq!(report.file_name.as_deref(), Some("ExampleFund_2025-11-30_Monthly"));
        assert_eq!(report.stats.snapshots, 1);
        assert_eq!(report.stats.holdings, 1);

        let tables = h.store.tables.lock().unwrap();
        assert!(tables.committed);
        assert!(!tables.rolled_back);
        assert_eq!(tables.uploads[0].file_name, "ExampleFund_2025-11-30_Monthly");
        drop(tables);

        assert_eq!(
            h.files.promoted.lock().unwrap().clone(),
            vec![(PathBuf::from(SOURCE), "ExampleFund_2025-11-30_Monthly".to_string())]
        );
        assert!(discarded(&h).is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_rolls_back_and_discards() {
        let h = default_harness(
            MockDisclosureStore::new().with_existing_upload("ExampleFund_2025-11-30_Monthly"),
        );

        let workbook = InMemoryWorkbook::new(vec![portfolio_sheet("First"), portfolio_sheet("Second")]);
        let report = ingest(&h, workbook).await;

        assert_eq!(report.outcome, IngestionOutcome::Duplicate);
        assert_eq!(report.upload_id, None);
        // The second sheet is never opened.
        assert_eq!(report.stats.sheets, 1);

        let tables = h.store.tables.lock().unwrap();
        assert!(tables.rolled_back);
        assert!(!tables.committed);
        drop(tables);

        assert_eq!(discarded(&h), vec![PathBuf::from(SOURCE)]);
        assert!(h.files.promoted.lock().unwrap().is_empty());
        assert_eq!(h.sink.with_severity(EventSeverity::Abort).len(), 1);
    }

    #[tokio::test]
    async fn test_missing_date_commits_without_rename_by_default() {
        let h = default_harness(MockDisclosureStore::new());
        let sheet = InMemorySheet::from_strings("Sheet1", vec![vec!["Example Fund"]]);

        let report = ingest(&h, InMemoryWorkbook::new(vec![sheet])).await;

        let IngestionOutcome::SuccessWithWarnings { warnings } = &report.outcome else {
            panic!("unexpected outcome {:?}", report.outcome);
        };
        assert!(warnings.iter().any(|w| w.severity == EventSeverity::Error));
        assert_eq!(report.file_name.as_deref(), Some("november.xlsx"));

        let tables = h.store.tables.lock().unwrap();
        assert!(tables.committed);
        assert_eq!(tables.uploads[0].file_name, "november.xlsx");
        drop(tables);

        assert!(h.files.promoted.lock().unwrap().is_empty());
        assert!(discarded(&h).is_empty());
    }

    #[tokio::test]
    async fn test_missing_date_with_taken_name_gets_unique_name() {
        let h = default_harness(MockDisclosureStore::new().with_existing_upload("november.xlsx"));
        let sheet = InMemorySheet::from_strings("Sheet1", vec![vec!["Example Fund"]]);

        let report = ingest(&h, InMemoryWorkbook::new(vec![sheet])).await;

        assert!(report.outcome.is_committed());
        assert_eq!(report.file_name.as_deref(), Some("1-november.xlsx"));
        assert_eq!(h.store.tables.lock().unwrap().uploads[0].file_name, "1-november.xlsx");
        assert!(report
            .warnings
            .iter()
            .any(|w| w.message == "Upload name 'november.xlsx' is already taken; stored as '1-november.xlsx'"));
    }

    #[tokio::test]
    async fn test_missing_date_rollback_policy() {
        let config = IngestionConfig {
            missing_date_policy: MissingDatePolicy::Rollback,
            ..Default::default()
        };
        let h = harness(MockDisclosureStore::new(), MockSourceFileStore::default(), config);
        let sheet = InMemorySheet::from_strings("Sheet1", vec![vec!["Example Fund"]]);

        let report = ingest(&h, InMemoryWorkbook::new(vec![sheet])).await;

        assert_eq!(
            report.outcome,
            IngestionOutcome::Failed {
                reason: "No as-on date was found in any sheet".to_string()
            }
        );
        assert!(h.store.tables.lock().unwrap().rolled_back);
        assert_eq!(discarded(&h), vec![PathBuf::from(SOURCE)]);
    }

    #[tokio::test]
    async fn test_storage_failure_rolls_back_with_generic_reason() {
        let store = MockDisclosureStore::new();
        store.tables.lock().unwrap().fail_create_holding = true;
        let h = default_harness(store);

        let report = ingest(&h, InMemoryWorkbook::new(vec![portfolio_sheet("Equity")])).await;

        assert_eq!(
            report.outcome,
            IngestionOutcome::Failed {
                reason: "A storage operation failed while ingesting the file".to_string()
            }
        );
        assert!(!report.outcome.is_committed());
        let tables = h.store.tables.lock().unwrap();
        assert!(tables.rolled_back);
        assert!(!tables.committed);
        drop(tables);
        assert_eq!(discarded(&h), vec![PathBuf::from(SOURCE)]);
    }

    #[tokio::test]
    async fn test_storage_failure_keeps_earlier_warnings() {
        let store = MockDisclosureStore::new();
        store.tables.lock().unwrap().fail_create_holding = true;
        let h = default_harness(store);

        let report = ingest(&h, InMemoryWorkbook::new(vec![portfolio_sheet("Equity")])).await;

        assert!(matches!(report.outcome, IngestionOutcome::Failed { .. }));
        assert_eq!(report.stats.sheets, 1);
        assert!(report
            .warnings
            .iter()
            .any(|w| w.severity == EventSeverity::Warning
                && w.message == "Section 'Equity & Equity Related' not found"));
        assert_eq!(report.warnings.last().map(|w| w.severity), Some(EventSeverity::Abort));
    }

    #[tokio::test]
    async fn test_unknown_amc_fails() {
        let h = default_harness(MockDisclosureStore::new());
        let request = IngestionRequest {
            amc_id: 9,
            ..request()
        };

        let report = h
            .service
            .ingest(request, Box::new(InMemoryWorkbook::default()))
            .await;

        assert_eq!(
            report.outcome,
            IngestionOutcome::Failed {
                reason: "AMC 9 does not exist".to_string()
            }
        );
        assert!(h.store.tables.lock().unwrap().uploads.is_empty());
    }

    #[tokio::test]
    async fn test_promote_failure_rolls_back() {
        let files = MockSourceFileStore {
            fail_promote: true,
            ..Default::default()
        };
        let h = harness(MockDisclosureStore::new(), files, IngestionConfig::default());

        let report = ingest(&h, InMemoryWorkbook::new(vec![portfolio_sheet("Equity")])).await;

        assert_eq!(
            report.outcome,
            IngestionOutcome::Failed {
                reason: "Source file operation failed: read-only volume".to_string()
            }
        );
        let tables = h.store.tables.lock().unwrap();
        assert!(tables.rolled_back);
        assert!(!tables.committed);
    }

    #[tokio::test]
    async fn test_commit_failure_discards_promoted_file() {
        let store = MockDisclosureStore::new();
        store.tables.lock().unwrap().fail_commit = true;
        let h = default_harness(store);

        let report = ingest(&h, InMemoryWorkbook::new(vec![portfolio_sheet("Equity")])).await;

        assert!(matches!(report.outcome, IngestionOutcome::Failed { .. }));
        assert_eq!(
            discarded(&h),
            vec![PathBuf::from("/uploads/ExampleFund_2025-11-30_Monthly")]
        );
    }

    #[tokio::test]
    async fn test_recoverable_problems_are_reported_as_warnings() {
        // "Equity & Equity Related" is not seeded, so the section is unresolved.
        let config = IngestionConfig {
            retain_skipped_rows: true,
            ..Default::default()
        };
        let h = harness(MockDisclosureStore::new(), MockSourceFileStore::default(), config);

        let report = ingest(&h, InMemoryWorkbook::new(vec![portfolio_sheet("Equity")])).await;

        let IngestionOutcome::SuccessWithWarnings { warnings } = &report.outcome else {
            panic!("unexpected outcome {:?}", report.outcome);
        };
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].message, "Section 'Equity & Equity Related' not found");
        assert_eq!(report.warnings, *warnings);
        assert_eq!(report.stats.sections_unresolved, 1);
        assert!(report.skipped_rows.is_empty());
        assert!(h.store.tables.lock().unwrap().committed);
    }
}
