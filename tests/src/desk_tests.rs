//! Refresh cycle tests: mocked sources and end-to-end over scripted exchanges

use crate::support::*;
use async_trait::async_trait;
use fxdesk_core::fixed;
use fxdesk_core::prelude::*;
use fxdesk_exchanges::prelude::*;
use fxdesk_rates::prelude::*;
use mockall::mock;
use rstest::*;

mock! {
    pub Source {}

    #[async_trait(?Send)]
    impl QuoteSource for Source {
        fn name(&self) -> &'static str;
        async fn fetch_quote(&self) -> fxdesk_exchanges::Result<RawQuote>;
    }
}

fn quote(venue: Venue, price: Fixed) -> RawQuote {
    let pair = match venue {
        Venue::Bitkub => "THB_USDT",
        Venue::Rapira => "USDT/RUB",
    };
    RawQuote::new(price, venue, pair, FetchMode::Public)
}

fn mock_source(venue: Venue, price: Fixed) -> MockSource {
    let mut source = MockSource::new();
    source.expect_name().return_const("mock");
    source
        .expect_fetch_quote()
        .times(1)
        .returning(move || Ok(quote(venue, price)));
    source
}

// ============================================================================
// MOCKED SOURCES
// ============================================================================

#[cfg(test)]
mod mocked_cycle {
    use super::*;

    #[monoio::test(timer_enabled = true)]
    async fn test_cycle_publishes_both_quotes() {
        let desk = RateDesk::new(
            mock_source(Venue::Bitkub, fixed!(32.10)),
            mock_source(Venue::Rapira, fixed!(79.50)),
            &DeskConfig::default(),
        );

        let snapshot = desk.refresh().await.unwrap();
        assert_eq!(snapshot.primary.price, fixed!(32.10));
        assert_eq!(snapshot.secondary.price, fixed!(79.50));
        assert_eq!(snapshot.rates.conversion_rate_base(), fixed!(2.576));
    }

    #[rstest]
    #[case(ExchangeError::SourceUnavailable("Bitkub signed ticker failed".into()))]
    #[case(ExchangeError::ConfigurationError("no credentials".into()))]
    #[case(ExchangeError::Timeout("request exceeded 10000ms".into()))]
    #[monoio::test(timer_enabled = true)]
    async fn test_primary_error_halts_cycle(#[case] error: ExchangeError) {
        let mut primary = MockSource::new();
        primary.expect_name().return_const("primary");
        let returned = error.clone();
        primary
            .expect_fetch_quote()
            .times(1)
            .returning(move || Err(returned.clone()));

        let mut secondary = MockSource::new();
        secondary.expect_name().return_const("secondary");
        secondary.expect_fetch_quote().times(0);

        let desk = RateDesk::new(primary, secondary, &DeskConfig::default());
        assert_eq!(desk.refresh().await.unwrap_err(), RateError::Source(error));
    }

    #[monoio::test(timer_enabled = true)]
    async fn test_secondary_error_is_verbatim() {
        let mut secondary = MockSource::new();
        secondary.expect_name().return_const("secondary");
        secondary
            .expect_fetch_quote()
            .times(1)
            .returning(|| Err(ExchangeError::SymbolNotFound("USDT/RUB not in Rapira rates".into())));

        let desk = RateDesk::new(mock_source(Venue::Bitkub, fixed!(32.10)), secondary, &DeskConfig::default());
        let err = desk.refresh().await.unwrap_err();
        assert_eq!(err.to_string(), "Symbol not found: USDT/RUB not in Rapira rates");
    }

    #[monoio::test(timer_enabled = true)]
    async fn test_zero_primary_publishes_nothing() {
        let desk = RateDesk::new(
            mock_source(Venue::Bitkub, Fixed::ZERO),
            mock_source(Venue::Rapira, fixed!(79.50)),
            &DeskConfig::default(),
        );
        assert!(matches!(desk.refresh().await, Err(RateError::InvalidQuote(_))));
    }

    #[monoio::test(timer_enabled = true)]
    async fn test_cycle_ids_are_distinct() {
        let mut primary = MockSource::new();
        primary
            .expect_fetch_quote()
            .times(2)
            .returning(|| Ok(quote(Venue::Bitkub, fixed!(32.10))));
        let mut secondary = MockSource::new();
        secondary
            .expect_fetch_quote()
            .times(2)
            .returning(|| Ok(quote(Venue::Rapira, fixed!(79.50))));

        let desk = RateDesk::new(primary, secondary, &DeskConfig::default());
        let first = desk.refresh().await.unwrap();
        let second = desk.refresh().await.unwrap();

        assert_ne!(first.cycle_id, second.cycle_id);
        assert!(second.cycle_id.sequence() > first.cycle_id.sequence());
        assert_eq!(first.rates, second.rates);
    }
}

// ============================================================================
// END TO END OVER SCRIPTED EXCHANGES
// ============================================================================

#[cfg(test)]
mod end_to_end {
    use super::*;

    fn desk(
        bitkub_config: BitkubConfig,
        primary: &ScriptedTransport,
        secondary: &ScriptedTransport,
    ) -> RateDesk<BitkubClient<ScriptedTransport>, RapiraClient<ScriptedTransport>> {
        let config = DeskConfig::default();
        RateDesk::new(
            BitkubClient::with_transport(bitkub_config, primary.clone()).unwrap(),
            RapiraClient::with_transport(config.rapira.clone(), secondary.clone()),
            &config,
        )
    }

    #[monoio::test(timer_enabled = true)]
    async fn test_reference_scenario() {
        let primary = ScriptedTransport::new().on(TICKER_URL, ok(&ticker_body("32.10")));
        let secondary = ScriptedTransport::new().on(RAPIRA_URL, ok(&rapira_body("79.50")));
        let desk = desk(BitkubConfig::default(), &primary, &secondary);

        let snapshot = desk.refresh().await.unwrap();
        assert_eq!(snapshot.rates.usd_rub_base(), fixed!(82.68));
        assert_eq!(snapshot.rates.conversion_rate_base(), fixed!(2.576));

        let query = ConversionQuery::new(Direction::ThbToRub, fixed!(30000), fixed!(3.5));
        let result = desk.convert(&snapshot, &query).unwrap();
        assert_eq!(result.amount, fixed!(79976));

        let export = desk.export(&snapshot).unwrap().to_json().unwrap();
        assert_eq!(export["usdt_margin_percent"].as_f64(), Some(2.5));
        assert!((export["rub_thb_with_margin"].as_f64().unwrap() - 2.666).abs() < 1e-9);
    }

    #[monoio::test(timer_enabled = true)]
    async fn test_signed_fallback_end_to_end() {
        let primary = ScriptedTransport::new()
            .on(TICKER_URL, status(403, r#"{"error":52}"#))
            .on(SERVER_TIME_URL, ok("1707220534359"))
            .on_signed(TICKER_URL, ok(&ticker_body("\"32.10\"")));
        let secondary = ScriptedTransport::new().on(RAPIRA_URL, ok(&rapira_body("\"79.50\"")));
        let config = BitkubConfig::default().with_credentials("btk-test-key-0123456789", "btk-test-secret");
        let desk = desk(config, &primary, &secondary);

        let snapshot = desk.refresh().await.unwrap();
        assert_eq!(snapshot.primary.mode, FetchMode::Signed);
        assert_eq!(snapshot.rates.thb_usd(), fixed!(32.10));
        assert_eq!(primary.request_count(), 3);
        assert_eq!(secondary.request_count(), 1);
    }

    #[monoio::test(timer_enabled = true)]
    async fn test_missing_credentials_surface_actionable_error() {
        let primary = ScriptedTransport::new().on(TICKER_URL, status(403, r#"{"error":52}"#));
        let secondary = ScriptedTransport::new().on(RAPIRA_URL, ok(&rapira_body("79.50")));
        let desk = desk(BitkubConfig::default(), &primary, &secondary);

        let err = desk.refresh().await.unwrap_err();
        assert!(matches!(err, RateError::Source(ExchangeError::ConfigurationError(_))));
        assert!(err.to_string().contains("BITKUB_API_KEY"));
        assert_eq!(secondary.request_count(), 0);
    }
}
