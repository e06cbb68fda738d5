//! Quote source tests over scripted exchange responses

use crate::support::*;
use fxdesk_core::prelude::*;
use fxdesk_core::fixed;
use fxdesk_exchanges::bitkub::auth::{HEADER_API_KEY, HEADER_SIGN, HEADER_TIMESTAMP};
use fxdesk_exchanges::bitkub::BitkubSigner;
use fxdesk_exchanges::prelude::*;
use rstest::*;

const API_KEY: &str = "btk-test-key-0123456789";
const API_SECRET: &str = "btk-test-secret";

#[fixture]
fn anonymous() -> BitkubConfig {
    BitkubConfig::default()
}

#[fixture]
fn credentialed() -> BitkubConfig {
    BitkubConfig::default().with_credentials(API_KEY, API_SECRET)
}

fn bitkub(config: BitkubConfig, transport: &ScriptedTransport) -> BitkubClient<ScriptedTransport> {
    BitkubClient::with_transport(config, transport.clone()).unwrap()
}

// ============================================================================
// PRIMARY SOURCE: PUBLIC PATH
// ============================================================================

#[cfg(test)]
mod primary_public {
    use super::*;

    #[rstest]
    #[case("32.10", "32.10")]
    #[case("\"32.10\"", "32.10")]
    #[case("31.987", "31.987")]
    #[monoio::test(timer_enabled = true)]
    async fn test_public_ticker(anonymous: BitkubConfig, #[case] last: &str, #[case] expected: &str) {
        let transport = ScriptedTransport::new().on(TICKER_URL, ok(&ticker_body(last)));
        let client = bitkub(anonymous, &transport);

        let quote = client.fetch_quote().await.unwrap();
        assert_eq!(quote.price, Fixed::from_str_exact(expected).unwrap());
        assert_eq!(quote.mode, FetchMode::Public);
        assert_eq!(quote.venue, Venue::Bitkub);
        assert_eq!(quote.pair, "THB_USDT");

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].headers.is_empty());
    }

    #[rstest]
    #[monoio::test(timer_enabled = true)]
    async fn test_public_success_never_signs(credentialed: BitkubConfig) {
        let transport = ScriptedTransport::new()
            .on(TICKER_URL, ok(&ticker_body("32.10")))
            .on_signed(TICKER_URL, ok(&ticker_body("99.99")));
        let client = bitkub(credentialed, &transport);

        assert_eq!(client.fetch_last().await.unwrap(), (fixed!(32.10), FetchMode::Public));
        assert_eq!(transport.request_count(), 1);
    }
}

// ============================================================================
// PRIMARY SOURCE: SIGNED FALLBACK
// ============================================================================

#[cfg(test)]
mod primary_fallback {
    use super::*;

    fn failed_public() -> Vec<Result<HttpResponse>> {
        vec![
            status(401, r#"{"error":52}"#),
            status(503, "maintenance"),
            Err(ExchangeError::Timeout("request exceeded 10000ms".into())),
            Err(ExchangeError::NetworkError("connection reset".into())),
            ok("<html>blocked</html>"),
            ok(r#"{"THB_BTC":{"last":1}}"#),
            ok(r#"{"error":5}"#),
        ]
    }

    #[rstest]
    #[monoio::test(timer_enabled = true)]
    async fn test_any_public_failure_falls_back(credentialed: BitkubConfig) {
        for public in failed_public() {
            let transport = ScriptedTransport::new()
                .on(TICKER_URL, public)
                .on(SERVER_TIME_URL, ok("1707220534359"))
                .on_signed(TICKER_URL, ok(&ticker_body("32.15")));
            let client = bitkub(credentialed.clone(), &transport);

            let quote = client.fetch_quote().await.unwrap();
            assert_eq!(quote.price, fixed!(32.15));
            assert_eq!(quote.mode, FetchMode::Signed);
        }
    }

    #[rstest]
    #[monoio::test(timer_enabled = true)]
    async fn test_signed_request_shape(credentialed: BitkubConfig) {
        let transport = ScriptedTransport::new()
            .on(TICKER_URL, status(403, "forbidden"))
            .on(SERVER_TIME_URL, ok("1707220534359\n"))
            .on_signed(TICKER_URL, ok(&ticker_body("32.10")));
        let client = bitkub(credentialed, &transport);
        client.fetch_last().await.unwrap();

        let requests = transport.requests();
        let urls: Vec<&str> = requests.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, [TICKER_URL, SERVER_TIME_URL, TICKER_URL]);

        let signed = &requests[2];
        let names: Vec<&str> = signed.headers.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, ["Accept", "Content-type", HEADER_API_KEY, HEADER_TIMESTAMP, HEADER_SIGN]);
        assert_eq!(signed.header(HEADER_API_KEY), Some(API_KEY));
        assert_eq!(signed.header(HEADER_TIMESTAMP), Some("1707220534359"));

        let signer = BitkubSigner::new(BitkubCredentials::new(API_KEY, API_SECRET)).unwrap();
        let payload = "1707220534359GET/api/market/ticker?sym=THB_USDT";
        let signature = signed.header(HEADER_SIGN).unwrap();
        assert!(signer.validate_signature(payload, signature));
        assert_eq!(signature, signer.sign("1707220534359", "GET", "/api/market/ticker?sym=THB_USDT").unwrap());
    }

    #[rstest]
    #[monoio::test(timer_enabled = true)]
    async fn test_no_credentials_is_configuration_error(anonymous: BitkubConfig) {
        let transport = ScriptedTransport::new()
            .on(TICKER_URL, status(403, "forbidden"))
            .on(SERVER_TIME_URL, ok("1707220534359"))
            .on_signed(TICKER_URL, ok(&ticker_body("32.10")));
        let client = bitkub(anonymous, &transport);

        let err = client.fetch_quote().await.unwrap_err();
        assert!(matches!(err, ExchangeError::ConfigurationError(_)), "{err}");
        assert!(err.to_string().contains("no credentials"));
        // no server time call, no signed call
        assert_eq!(transport.request_count(), 1);
    }

    #[rstest]
    #[case("", "")]
    #[case(API_KEY, "")]
    #[case("", API_SECRET)]
    #[monoio::test(timer_enabled = true)]
    async fn test_empty_credentials_mean_public_only(#[case] api_key: &str, #[case] api_secret: &str) {
        let config = BitkubConfig {
            credentials: Some(BitkubCredentials::new(api_key, api_secret)),
            ..BitkubConfig::default()
        };

        let transport = ScriptedTransport::new().on(TICKER_URL, ok(&ticker_body("32.10")));
        let client = bitkub(config.clone(), &transport);
        assert_eq!(client.fetch_last().await.unwrap(), (fixed!(32.10), FetchMode::Public));

        let transport = ScriptedTransport::new()
            .on(TICKER_URL, status(403, "forbidden"))
            .on(SERVER_TIME_URL, ok("1707220534359"));
        let client = bitkub(config, &transport);
        let err = client.fetch_quote().await.unwrap_err();
        assert!(matches!(err, ExchangeError::ConfigurationError(_)), "{err}");
        assert_eq!(transport.request_count(), 1);
    }

    #[rstest]
    #[case::signed_rejected(ok("1707220534359"), status(401, r#"{"error":52}"#))]
    #[case::signed_garbage(ok("1707220534359"), ok("not json"))]
    #[case::server_time_down(status(500, ""), ok(&ticker_body("32.10")))]
    #[case::server_time_empty(ok("  "), ok(&ticker_body("32.10")))]
    #[monoio::test(timer_enabled = true)]
    async fn test_signed_failure_is_source_unavailable(
        credentialed: BitkubConfig,
        #[case] server_time: Result<HttpResponse>,
        #[case] signed: Result<HttpResponse>,
    ) {
        let transport = ScriptedTransport::new()
            .on(TICKER_URL, status(403, "forbidden"))
            .on(SERVER_TIME_URL, server_time)
            .on_signed(TICKER_URL, signed);
        let client = bitkub(credentialed, &transport);

        let err = client.fetch_quote().await.unwrap_err();
        assert!(matches!(err, ExchangeError::SourceUnavailable(_)), "{err}");
        assert_eq!(err.class(), ErrorClass::SourceUnavailable);
    }

    #[rstest]
    #[monoio::test(timer_enabled = true)]
    async fn test_at_most_one_fallback(credentialed: BitkubConfig) {
        let transport = ScriptedTransport::new()
            .on(TICKER_URL, status(403, "forbidden"))
            .on(SERVER_TIME_URL, ok("1707220534359"))
            .on_signed(TICKER_URL, status(500, "down"));
        let client = bitkub(credentialed, &transport);

        assert!(client.fetch_last().await.is_err());
        assert_eq!(transport.request_count(), 3);
    }
}

// ============================================================================
// SECONDARY SOURCE
// ============================================================================

#[cfg(test)]
mod secondary {
    use super::*;

    fn rapira(transport: &ScriptedTransport) -> RapiraClient<ScriptedTransport> {
        RapiraClient::with_transport(RapiraConfig::default(), transport.clone())
    }

    #[monoio::test(timer_enabled = true)]
    async fn test_bid_price() {
        let transport = ScriptedTransport::new().on(RAPIRA_URL, ok(&rapira_body("79.50")));
        let quote = rapira(&transport).fetch_quote().await.unwrap();

        assert_eq!(quote.price, fixed!(79.50));
        assert_eq!(quote.venue, Venue::Rapira);
        assert_eq!(quote.pair, "USDT/RUB");
        assert_eq!(transport.request_count(), 1);
    }

    #[rstest]
    #[case::missing(ok(r#"{"data":[{"symbol":"BTC/USDT","bidPrice":1}]}"#), ErrorClass::SymbolNotFound)]
    #[case::empty(ok(r#"{"data":[]}"#), ErrorClass::SymbolNotFound)]
    #[case::no_data(ok(r#"{"code":1}"#), ErrorClass::SymbolNotFound)]
    #[case::malformed(ok("{"), ErrorClass::Parse)]
    #[case::no_bid(ok(r#"{"data":[{"symbol":"USDT/RUB"}]}"#), ErrorClass::Parse)]
    #[case::http(status(502, "bad gateway"), ErrorClass::Network)]
    #[case::timeout(Err(ExchangeError::Timeout("request exceeded 10000ms".into())), ErrorClass::Network)]
    #[monoio::test(timer_enabled = true)]
    async fn test_failures_are_surfaced(#[case] response: Result<HttpResponse>, #[case] class: ErrorClass) {
        let transport = ScriptedTransport::new().on(RAPIRA_URL, response);
        let err = rapira(&transport).fetch_quote().await.unwrap_err();

        assert_eq!(err.class(), class, "{err}");
        // no retry
        assert_eq!(transport.request_count(), 1);
    }
}
