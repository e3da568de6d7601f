//! Feed adapter tests against mock HTTP servers.

#[cfg(test)]
mod tests {
    use std::net::IpAddr;
    use std::time::Duration;

    use pricing_types::{CurrencyCode, FeedError, GeolocationProvider, RateSource};
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    use crate::{ExchangeRateApiClient, IpApiClient, build_feeds, build_http_client};

    fn short_timeout_client() -> reqwest::Client {
        build_http_client(Duration::from_millis(200)).unwrap()
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Geolocation
    // ─────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_lookup_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/81.2.69.142"))
            .and(query_param("fields", "status,message,countryCode,currency"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success",
                "countryCode": "GB",
                "currency": "GBP",
                "city": "London"
            })))
            .mount(&server)
            .await;

        let client = IpApiClient::new(server.uri()).unwrap();
        let ip: IpAddr = "81.2.69.142".parse().unwrap();
        let geo = client.lookup(Some(ip)).await.unwrap();

        assert_eq!(geo.country_code, "GB");
        assert_eq!(geo.currency.as_deref(), Some("GBP"));
    }

    #[tokio::test]
    async fn test_lookup_without_ip_uses_auto_detection() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success",
                "countryCode": "PK",
                "currency": "PKR"
            })))
            .mount(&server)
            .await;

        let client = IpApiClient::new(format!("{}/", server.uri())).unwrap();
        let geo = client.lookup(None).await.unwrap();

        assert_eq!(geo.country_code, "PK");
    }

    #[tokio::test]
    async fn test_lookup_fail_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "fail",
                "message": "private range"
            })))
            .mount(&server)
            .await;

        let client = IpApiClient::new(server.uri()).unwrap();
        let err = client
            .lookup(Some("10.0.0.1".parse().unwrap()))
            .await
            .unwrap_err();

        assert_eq!(err, FeedError::LocationLookup("private range".into()));
    }

    #[tokio::test]
    async fn test_lookup_missing_country_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success",
                "currency": "USD"
            })))
            .mount(&server)
            .await;

        let client = IpApiClient::new(server.uri()).unwrap();
        let result = client.lookup(None).await;

        assert!(matches!(result, Err(FeedError::LocationLookup(_))));
    }

    #[tokio::test]
    async fn test_lookup_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = IpApiClient::new(server.uri()).unwrap();
        let result = client.lookup(None).await;

        assert!(matches!(result, Err(FeedError::LocationLookup(msg)) if msg.contains("malformed")));
    }

    #[tokio::test]
    async fn test_lookup_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = IpApiClient::new(server.uri()).unwrap();
        let result = client.lookup(None).await;

        assert!(matches!(result, Err(FeedError::LocationLookup(msg)) if msg.contains("503")));
    }

    #[tokio::test]
    async fn test_lookup_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(2))
                    .set_body_json(serde_json::json!({
                        "status": "success",
                        "countryCode": "GB",
                        "currency": "GBP"
                    })),
            )
            .mount(&server)
            .await;

        let client = IpApiClient::with_client(server.uri(), short_timeout_client());
        let result = client.lookup(None).await;

        assert!(matches!(result, Err(FeedError::LocationLookup(_))));
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Exchange rates
    // ─────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_latest_rates_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v6/latest/PKR"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "result": "success",
                "base_code": "PKR",
                "rates": {
                    "PKR": 1,
                    "USD": 0.00357,
                    "GBP": 0.00281,
                    "JPY": 0.53
                }
            })))
            .mount(&server)
            .await;

        let client = ExchangeRateApiClient::new(server.uri()).unwrap();
        let rates = client.latest_rates(CurrencyCode::PKR).await.unwrap();

        assert_eq!(rates.get("USD"), Some(&0.00357));
        assert_eq!(rates.get("PKR"), Some(&1.0));
        // Unsupported codes are passed through; the table merge drops them.
        assert!(rates.contains_key("JPY"));
    }

    #[tokio::test]
    async fn test_latest_rates_error_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "result": "error",
                "error-type": "unsupported-code"
            })))
            .mount(&server)
            .await;

        let client = ExchangeRateApiClient::new(server.uri()).unwrap();
        let err = client.latest_rates(CurrencyCode::PKR).await.unwrap_err();

        assert_eq!(err, FeedError::RateFetch("unsupported-code".into()));
    }

    #[tokio::test]
    async fn test_latest_rates_empty_rates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "result": "success",
                "rates": {}
            })))
            .mount(&server)
            .await;

        let client = ExchangeRateApiClient::new(server.uri()).unwrap();
        let result = client.latest_rates(CurrencyCode::PKR).await;

        assert!(matches!(result, Err(FeedError::RateFetch(_))));
    }

    #[tokio::test]
    async fn test_latest_rates_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = ExchangeRateApiClient::new(server.uri()).unwrap();
        let result = client.latest_rates(CurrencyCode::PKR).await;

        assert!(matches!(result, Err(FeedError::RateFetch(msg)) if msg.contains("500")));
    }

    #[tokio::test]
    async fn test_latest_rates_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_secs(2))
                    .set_body_json(serde_json::json!({"result": "success", "rates": {"USD": 0.0036}})),
            )
            .mount(&server)
            .await;

        let client = ExchangeRateApiClient::with_client(server.uri(), short_timeout_client());
        let result = client.latest_rates(CurrencyCode::PKR).await;

        assert!(matches!(result, Err(FeedError::RateFetch(_))));
    }

    #[tokio::test]
    async fn test_build_feeds_shares_configuration() {
        let geo = MockServer::start().await;
        let rates = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success",
                "countryCode": "AE",
                "currency": "AED"
            })))
            .mount(&geo)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "result": "success",
                "rates": {"AED": 0.013}
            })))
            .mount(&rates)
            .await;

        let feeds = build_feeds(&geo.uri(), &rates.uri(), Duration::from_secs(1)).unwrap();

        assert_eq!(feeds.geolocation.lookup(None).await.unwrap().country_code, "AE");
        assert_eq!(
            feeds.rates.latest_rates(CurrencyCode::PKR).await.unwrap().get("AED"),
            Some(&0.013)
        );
    }
}
