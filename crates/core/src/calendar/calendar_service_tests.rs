//! Tests for CalendarRefreshService and the calendar diff/reload rules.

#[cfg(test)]
mod tests {
    use crate::calendar::{
        find_new_entries, needs_statement_reload, CalendarRefreshService, CalendarStore,
        EarningsCalendarEntry,
    };
    use crate::errors::{Error, Result};
    use crate::quotes::Quote;
    use crate::source::{DataSource, SourceError};
    use crate::statements::{FinancialAggregate, StatementEntry, StatementSynchronizerTrait};
    use async_trait::async_trait;
    use chrono::{Duration, NaiveDate};
    use std::collections::{HashMap, HashSet};
    use std::sync::{Arc, Mutex};

    // =========================================================================
    // Mocks
    // =========================================================================

    #[derive(Clone, Default)]
    struct MockCalendarStore {
        entries: Arc<Mutex<Vec<EarningsCalendarEntry>>>,
        save_calls: Arc<Mutex<usize>>,
    }

    #[async_trait]
    impl CalendarStore for MockCalendarStore {
        fn find_all_calendar_entries(&self) -> Result<Vec<EarningsCalendarEntry>> {
            Ok(self.entries.lock().unwrap().clone())
        }

        async fn save_calendar_entries(
            &self,
            entries: Vec<EarningsCalendarEntry>,
        ) -> Result<usize> {
            *self.save_calls.lock().unwrap() += 1;
            let count = entries.len();
            self.entries.lock().unwrap().extend(entries);
            Ok(count)
        }
    }

    struct MockCalendarSource {
        response: Mutex<std::result::Result<Vec<EarningsCalendarEntry>, SourceError>>,
    }

    impl MockCalendarSource {
        fn returning(entries: Vec<EarningsCalendarEntry>) -> Self {
            Self {
                response: Mutex::new(Ok(entries)),
            }
        }

        fn failing(err: SourceError) -> Self {
            Self {
                response: Mutex::new(Err(err)),
            }
        }
    }

    #[async_trait]
    impl DataSource for MockCalendarSource {
        async fn fetch_statements(
            &self,
            _ticker: &str,
            _exchange_hint: Option<&str>,
        ) -> std::result::Result<Option<FinancialAggregate>, SourceError> {
            Ok(None)
        }

        async fn fetch_calendar_since(
            &self,
            _since: NaiveDate,
        ) -> std::result::Result<Vec<EarningsCalendarEntry>, SourceError> {
            self.response.lock().unwrap().clone()
        }

        async fn fetch_historical_quotes(
            &self,
            _tickers: &[String],
            _since: NaiveDate,
        ) -> std::result::Result<HashMap<String, Vec<Quote>>, SourceError> {
            Ok(HashMap::new())
        }
    }

    #[derive(Default)]
    struct MockSynchronizer {
        stored: HashMap<String, FinancialAggregate>,
        failing: HashSet<String>,
        calls: Mutex<Vec<String>>,
    }

    impl MockSynchronizer {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl StatementSynchronizerTrait for MockSynchronizer {
        async fn synchronize(&self, ticker: &str) -> Result<FinancialAggregate> {
            self.calls.lock().unwrap().push(ticker.to_string());
            if self.failing.contains(ticker) {
                return Err(Error::Unexpected(format!("sync failed for {}", ticker)));
            }
            self.load_stored(ticker)
        }

        fn load_stored(&self, ticker: &str) -> Result<FinancialAggregate> {
            Ok(self
                .stored
                .get(ticker)
                .cloned()
                .unwrap_or_else(|| FinancialAggregate::new(ticker)))
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(ticker: &str, announcement_date: NaiveDate) -> EarningsCalendarEntry {
        EarningsCalendarEntry::new(ticker, announcement_date)
    }

    fn released(ticker: &str, release_date: NaiveDate) -> FinancialAggregate {
        let mut aggregate = FinancialAggregate::new(ticker);
        aggregate.balance_sheet.quarterly.insert(
            release_date - Duration::days(30),
            StatementEntry {
                release_date: Some(release_date),
                ..Default::default()
            },
        );
        aggregate
    }

    fn service(
        store: &MockCalendarStore,
        source: MockCalendarSource,
        synchronizer: &Arc<MockSynchronizer>,
    ) -> CalendarRefreshService {
        CalendarRefreshService::new(
            Arc::new(store.clone()),
            Arc::new(source),
            synchronizer.clone(),
        )
    }

    // =========================================================================
    // Dedupe
    // =========================================================================

    #[test]
    fn test_entry_is_new_unless_same_ticker_and_date_is_stored() {
        let stored = vec![entry("XYZ", date(2024, 1, 10))];
        let incoming = vec![
            entry("XYZ", date(2024, 1, 10)),
            entry("XYZ", date(2024, 4, 10)),
            entry("ABC", date(2024, 1, 10)),
        ];

        let (new_entries, reached_known) = find_new_entries(&stored, incoming);

        assert_eq!(
            new_entries,
            vec![entry("XYZ", date(2024, 4, 10)), entry("ABC", date(2024, 1, 10))]
        );
        assert!(reached_known);
    }

    #[test]
    fn test_repeats_within_batch_collapse() {
        let incoming = vec![
            entry("XYZ", date(2024, 4, 10)),
            entry("XYZ", date(2024, 4, 10)),
        ];

        let (new_entries, reached_known) = find_new_entries(&[], incoming);

        assert_eq!(new_entries.len(), 1);
        assert!(!reached_known);
    }

    // =========================================================================
    // Reload decision
    // =========================================================================

    #[test]
    fn test_reload_without_stored_balance_sheet() {
        assert!(needs_statement_reload(
            &FinancialAggregate::new("ACME"),
            date(2024, 4, 25)
        ));
    }

    #[test]
    fn test_reload_decision_by_gap() {
        let announcement = date(2024, 4, 25);
        let cases = [(40, true), (59, true), (60, false), (90, false)];

        for (gap_days, expected) in cases {
            let stored = released("ACME", announcement - Duration::days(gap_days));
            assert_eq!(
                needs_statement_reload(&stored, announcement),
                expected,
                "gap of {} days",
                gap_days
            );
        }
    }

    #[test]
    fn test_reload_falls_back_to_end_date() {
        let mut stored = FinancialAggregate::new("ACME");
        stored
            .balance_sheet
            .annual
            .insert(date(2023, 12, 31), StatementEntry::default());

        assert!(needs_statement_reload(&stored, date(2024, 2, 15)));
        assert!(!needs_statement_reload(&stored, date(2024, 4, 15)));
    }

    // =========================================================================
    // Refresh
    // =========================================================================

    #[tokio::test]
    async fn test_refresh_loads_and_persists_new_entries() {
        let store = MockCalendarStore::default();
        store
            .entries
            .lock()
            .unwrap()
            .push(entry("OLD", date(2024, 4, 20)));

        let announcement = date(2024, 4, 25);
        let synchronizer = Arc::new(MockSynchronizer {
            stored: HashMap::from([
                (
                    "RECENT".to_string(),
                    released("RECENT", announcement - Duration::days(40)),
                ),
                (
                    "QUIET".to_string(),
                    released("QUIET", announcement - Duration::days(90)),
                ),
            ]),
            ..Default::default()
        });
        let source = MockCalendarSource::returning(vec![
            entry("OLD", date(2024, 4, 20)),
            entry("NEW", announcement),
            entry("RECENT", announcement),
            entry("QUIET", announcement),
        ]);

        let outcome = service(&store, source, &synchronizer)
            .refresh(date(2024, 4, 18))
            .await
            .unwrap();

        assert!(!outcome.exhausted);
        assert!(outcome.reached_known_entry);
        assert_eq!(outcome.new_entries.len(), 3);
        assert_eq!(outcome.loaded_count(), 2);
        assert_eq!(synchronizer.calls(), vec!["NEW", "RECENT"]);

        let persisted = store.entries.lock().unwrap().clone();
        assert_eq!(persisted.len(), 4);
        let flag = |ticker: &str| {
            persisted
                .iter()
                .find(|e| e.ticker == ticker)
                .map(|e| e.statements_loaded)
                .unwrap()
        };
        assert!(flag("NEW"));
        assert!(flag("RECENT"));
        assert!(!flag("QUIET"));
    }

    #[tokio::test]
    async fn test_exhaustion_is_a_normal_stop() {
        let store = MockCalendarStore::default();
        let synchronizer = Arc::new(MockSynchronizer::default());

        let outcome = service(
            &store,
            MockCalendarSource::failing(SourceError::Exhausted),
            &synchronizer,
        )
        .refresh(date(2024, 4, 18))
        .await
        .unwrap();

        assert!(outcome.exhausted);
        assert!(outcome.new_entries.is_empty());
        assert_eq!(*store.save_calls.lock().unwrap(), 0);
        assert!(synchronizer.calls().is_empty());
    }

    #[tokio::test]
    async fn test_other_source_errors_propagate() {
        let store = MockCalendarStore::default();
        let synchronizer = Arc::new(MockSynchronizer::default());

        let result = service(
            &store,
            MockCalendarSource::failing(SourceError::Unavailable("503".into())),
            &synchronizer,
        )
        .refresh(date(2024, 4, 18))
        .await;

        assert!(matches!(result, Err(Error::Source(SourceError::Unavailable(_)))));
    }

    #[tokio::test]
    async fn test_failed_synchronization_leaves_flag_unset() {
        let store = MockCalendarStore::default();
        let synchronizer = Arc::new(MockSynchronizer {
            failing: HashSet::from(["BROKEN".to_string()]),
            ..Default::default()
        });
        let source = MockCalendarSource::returning(vec![
            entry("BROKEN", date(2024, 4, 25)),
            entry("FINE", date(2024, 4, 25)),
        ]);

        let outcome = service(&store, source, &synchronizer)
            .refresh(date(2024, 4, 18))
            .await
            .unwrap();

        assert_eq!(synchronizer.calls(), vec!["BROKEN", "FINE"]);
        let persisted = store.entries.lock().unwrap().clone();
        assert_eq!(persisted.len(), 2);
        assert!(!persisted[0].statements_loaded);
        assert!(persisted[1].statements_loaded);
        assert_eq!(outcome.loaded_count(), 1);
    }

    #[tokio::test]
    async fn test_ticker_synchronized_once_per_batch() {
        let store = MockCalendarStore::default();
        let synchronizer = Arc::new(MockSynchronizer::default());
        let source = MockCalendarSource::returning(vec![
            entry("ACME", date(2024, 4, 25)),
            entry("ACME", date(2024, 7, 25)),
        ]);

        let outcome = service(&store, source, &synchronizer)
            .refresh(date(2024, 4, 18))
            .await
            .unwrap();

        assert_eq!(synchronizer.calls(), vec!["ACME"]);
        assert!(outcome.new_entries.iter().all(|e| e.statements_loaded));
    }
}
