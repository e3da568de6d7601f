//! Client example demonstrating the pricing flows against an in-process server.
//!
//! Run with: cargo run -p pricing-app --example client_example

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use async_trait::async_trait;
use pricing_client::PricingClient;
use pricing_hex::{PricingService, inbound::HttpServer};
use pricing_types::{
    CurrencyCode, FeedError, GeoLocation, GeolocationProvider, QuoteRequest, RateSource, Timeline,
};
use tokio::net::TcpListener;

/// Places callers by the first octet of their address so the demo needs no network.
struct DemoGeo;

#[async_trait]
impl GeolocationProvider for DemoGeo {
    async fn lookup(&self, ip: Option<IpAddr>) -> Result<GeoLocation, FeedError> {
        let (country, currency) = match ip {
            Some(IpAddr::V4(v4)) if v4.octets()[0] == 81 => ("GB", "GBP"),
            Some(IpAddr::V4(v4)) if v4.octets()[0] == 5 => ("AE", "AED"),
            Some(_) => ("PK", "PKR"),
            None => return Err(FeedError::LocationLookup("no client address".into())),
        };
        Ok(GeoLocation {
            country_code: country.to_string(),
            currency: Some(currency.to_string()),
        })
    }
}

struct DemoRates;

#[async_trait]
impl RateSource for DemoRates {
    async fn latest_rates(&self, _base: CurrencyCode) -> Result<HashMap<String, f64>, FeedError> {
        Ok(HashMap::from([
            ("USD".to_string(), 0.0036),
            ("GBP".to_string(), 0.0028),
            ("AED".to_string(), 0.013),
        ]))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Bind on an ephemeral port
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr: SocketAddr = listener.local_addr()?;

    println!("🚀 Starting server on {addr}...");

    let service = Arc::new(PricingService::new(DemoGeo, DemoRates));
    service.refresh_exchange_rates().await;
    let router = HttpServer::new(service).router();

    tokio::spawn(async move {
        if let Err(e) = axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        {
            eprintln!("server error: {e}");
        }
    });

    let base_url = format!("http://{addr}");
    let client = PricingClient::new(&base_url);

    // Health check
    let health = client.health().await?;
    println!("✅ Server health: {health}");

    let rates = client.rates().await?;
    println!("✅ Rates ({:?}): USD {}", rates.origin, rates.rates["USD"]);

    // Same amount, three visitors
    for ip in ["39.32.0.1", "81.2.69.142", "5.1.2.3"] {
        let client = PricingClient::new(&base_url).with_client_ip(ip);
        let location = client.location().await?;
        let quote = client
            .quote(&QuoteRequest {
                base_price: 38_500.0,
                currency: None,
                timeline: Timeline::Normal,
                plan_title: Some("Starter Website".into()),
            })
            .await?;
        println!(
            "✅ {ip} ({}): {} (markup: {})",
            location.country_code, quote.display, quote.markup_applied
        );
    }

    // Full catalog for a UK visitor, urgent delivery, in USD
    let uk = PricingClient::new(&base_url).with_client_ip("81.2.69.142");
    let plans = uk
        .plans(Some(CurrencyCode::USD), Some(Timeline::Urgent))
        .await?;
    println!("\n📋 Plans ({}, {}):", plans.currency, plans.timeline);
    for plan in plans.plans {
        println!("   - {}: {}", plan.title, plan.display);
    }

    println!("\n🎉 Example completed successfully!");

    Ok(())
}
