#[cfg(test)]
mod tests {
    use crate::calendar::EarningsCalendarEntry;
    use crate::errors::{Error, Result};
    use crate::quotes::{Quote, QuoteCatchUpService, QuoteStore};
    use crate::source::{DataSource, SourceError, SymbolUniverse};
    use crate::statements::FinancialAggregate;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::collections::{HashMap, HashSet};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct MockQuoteStore {
        quotes: Arc<Mutex<Vec<Quote>>>,
        saved_tickers: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl QuoteStore for MockQuoteStore {
        fn find_all_quotes(&self) -> Result<Vec<Quote>> {
            Ok(self.quotes.lock().unwrap().clone())
        }

        async fn save_quotes(&self, ticker: &str, quotes: Vec<Quote>) -> Result<usize> {
            self.saved_tickers.lock().unwrap().push(ticker.to_string());
            let mut stored = self.quotes.lock().unwrap();
            let count = quotes.len();
            for quote in quotes {
                stored.retain(|q| q.id() != quote.id());
                stored.push(quote);
            }
            Ok(count)
        }
    }

    #[derive(Default)]
    struct MockQuoteSource {
        quotes: Mutex<HashMap<String, Vec<Quote>>>,
        requests: Mutex<Vec<(Vec<String>, NaiveDate)>>,
        fail: Mutex<bool>,
    }

    #[async_trait]
    impl DataSource for MockQuoteSource {
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
            Ok(Vec::new())
        }

        async fn fetch_historical_quotes(
            &self,
            tickers: &[String],
            since: NaiveDate,
        ) -> std::result::Result<HashMap<String, Vec<Quote>>, SourceError> {
            self.requests.lock().unwrap().push((tickers.to_vec(), since));
            if *self.fail.lock().unwrap() {
                return Err(SourceError::Unavailable("quotes endpoint down".into()));
            }
            Ok(self.quotes.lock().unwrap().clone())
        }
    }

    struct StaticUniverse(Vec<&'static str>);

    impl SymbolUniverse for StaticUniverse {
        fn get_tickers(&self) -> Result<HashSet<String>> {
            Ok(self.0.iter().map(|t| t.to_string()).collect())
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn quote(ticker: &str, date: NaiveDate) -> Quote {
        Quote {
            ticker: ticker.to_string(),
            date,
            open: dec!(10),
            high: dec!(11),
            low: dec!(9.5),
            close: dec!(10.5),
            adj_close: dec!(10.5),
            volume: dec!(120000),
        }
    }

    fn service(
        store: &MockQuoteStore,
        source: &Arc<MockQuoteSource>,
        tickers: Vec<&'static str>,
    ) -> QuoteCatchUpService {
        QuoteCatchUpService::new(
            Arc::new(store.clone()),
            source.clone(),
            Arc::new(StaticUniverse(tickers)),
        )
    }

    #[tokio::test]
    async fn test_empty_store_starts_from_epoch() {
        let store = MockQuoteStore::default();
        let source = Arc::new(MockQuoteSource::default());

        let report = service(&store, &source, vec!["MSFT", "ACME"])
            .catch_up()
            .await
            .unwrap();

        assert_eq!(report.since, date(1962, 1, 2));
        let requests = source.requests.lock().unwrap();
        assert_eq!(
            requests[0],
            (
                vec!["ACME".to_string(), "MSFT".to_string()],
                date(1962, 1, 2)
            )
        );
    }

    #[tokio::test]
    async fn test_resumes_from_latest_stored_date() {
        let store = MockQuoteStore::default();
        store.quotes.lock().unwrap().extend([
            quote("ACME", date(2024, 1, 10)),
            quote("MSFT", date(2024, 1, 12)),
            quote("ACME", date(2024, 1, 11)),
        ]);
        let source = Arc::new(MockQuoteSource::default());

        let report = service(&store, &source, vec!["ACME"]).catch_up().await.unwrap();

        assert_eq!(report.since, date(2024, 1, 12));
    }

    #[tokio::test]
    async fn test_saves_per_ticker_and_skips_empty_results() {
        let store = MockQuoteStore::default();
        let source = Arc::new(MockQuoteSource::default());
        source.quotes.lock().unwrap().extend([
            (
                "ACME".to_string(),
                vec![quote("ACME", date(2024, 1, 2)), quote("ACME", date(2024, 1, 3))],
            ),
            ("MSFT".to_string(), Vec::new()),
        ]);

        let report = service(&store, &source, vec!["ACME", "MSFT"])
            .catch_up()
            .await
            .unwrap();

        assert_eq!(report.tickers_requested, 2);
        assert_eq!(report.tickers_saved, 1);
        assert_eq!(report.quotes_saved, 2);
        assert_eq!(*store.saved_tickers.lock().unwrap(), vec!["ACME".to_string()]);
    }

    #[tokio::test]
    async fn test_source_failure_saves_nothing() {
        let store = MockQuoteStore::default();
        let source = Arc::new(MockQuoteSource::default());
        *source.fail.lock().unwrap() = true;

        let result = service(&store, &source, vec!["ACME"]).catch_up().await;

        assert!(matches!(result, Err(Error::Source(_))));
        assert!(store.saved_tickers.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_universe_does_not_fetch() {
        let store = MockQuoteStore::default();
        let source = Arc::new(MockQuoteSource::default());

        let report = service(&store, &source, vec![]).catch_up().await.unwrap();

        assert_eq!(report.tickers_requested, 0);
        assert!(source.requests.lock().unwrap().is_empty());
    }
}
