//! Pricing CLI
//!
//! Command-line interface for the Pricing API, plus an offline price calculator.

use anyhow::Result;
use clap::{Parser, Subcommand};

use pricing_client::PricingClient;
use pricing_types::{
    CurrencyCode, ExchangeRateTable, PricingPlan, QuoteRequest, Timeline, compute_price,
    get_timeline_adjusted_price,
};

#[derive(Parser)]
#[command(name = "pricing")]
#[command(author, version, about = "Regional pricing CLI", long_about = None)]
struct Cli {
    /// Base URL of the Pricing API
    #[arg(long, env = "PRICING_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    /// Price as if calling from this IP (sent as X-Forwarded-For)
    #[arg(long, env = "PRICING_CLIENT_IP")]
    client_ip: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check API health
    Health,
    /// Show the server's exchange rate table
    Rates,
    /// Show the location profile the server detects
    Location,
    /// Price the plan catalog
    Plans {
        /// Display currency (defaults to the detected one)
        #[arg(long)]
        currency: Option<String>,
        /// relaxed, normal or urgent
        #[arg(long)]
        timeline: Option<String>,
    },
    /// Price an arbitrary PKR amount through the API
    Quote {
        /// Base price in PKR
        #[arg(long)]
        price: f64,
        #[arg(long)]
        currency: Option<String>,
        #[arg(long, default_value = "normal")]
        timeline: String,
        /// Catalog plan title
        #[arg(long)]
        plan: Option<String>,
    },
    /// Compute a price locally without contacting the API
    Compute {
        /// Base price in PKR
        #[arg(long)]
        price: f64,
        #[arg(long, default_value = "USD")]
        currency: String,
        /// Units of currency per PKR (defaults to the built-in fallback rate)
        #[arg(long)]
        rate: Option<f64>,
        /// Apply the international markup
        #[arg(long)]
        non_exempt: bool,
        #[arg(long, default_value = "normal")]
        timeline: String,
        /// Treat the price as a coming-soon plan
        #[arg(long)]
        coming_soon: bool,
    },
}

fn parse_currency(s: &str) -> Result<CurrencyCode> {
    s.parse().map_err(|_| {
        let supported: Vec<&str> = CurrencyCode::all().iter().map(|c| c.code()).collect();
        anyhow::anyhow!("Unknown currency: {}. Supported: {}", s, supported.join(", "))
    })
}

fn parse_timeline(s: &str) -> Result<Timeline> {
    s.parse().map_err(|e: String| anyhow::anyhow!(e))
}

fn compute_locally(
    price: f64,
    currency: CurrencyCode,
    rate: Option<f64>,
    non_exempt: bool,
    timeline: Timeline,
    coming_soon: bool,
) -> Result<String> {
    if !price.is_finite() || price < 0.0 {
        anyhow::bail!("Price must be a non-negative number");
    }
    let rate = rate.unwrap_or_else(|| ExchangeRateTable::fallback().rate(currency));
    if !rate.is_finite() || rate <= 0.0 {
        anyhow::bail!("Rate must be a positive number");
    }

    let plan = coming_soon.then(|| PricingPlan::coming_soon("Custom"));
    let adjusted = get_timeline_adjusted_price(price, timeline.multiplier());
    Ok(compute_price(
        adjusted,
        currency,
        rate,
        !non_exempt,
        plan.as_ref(),
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut client = PricingClient::new(&cli.api_url);
    if let Some(ip) = cli.client_ip {
        client = client.with_client_ip(ip);
    }

    match cli.command {
        Commands::Health => {
            let healthy = client.health().await?;
            if healthy {
                println!("✓ API is healthy");
            } else {
                println!("✗ API is not healthy");
                std::process::exit(1);
            }
        }

        Commands::Rates => {
            let rates = client.rates().await?;
            println!("{}", serde_json::to_string_pretty(&rates)?);
        }

        Commands::Location => {
            let location = client.location().await?;
            println!("{}", serde_json::to_string_pretty(&location)?);
        }

        Commands::Plans { currency, timeline } => {
            let currency = currency.as_deref().map(parse_currency).transpose()?;
            let timeline = timeline.as_deref().map(parse_timeline).transpose()?;
            let plans = client.plans(currency, timeline).await?;
            println!("{}", serde_json::to_string_pretty(&plans)?);
        }

        Commands::Quote {
            price,
            currency,
            timeline,
            plan,
        } => {
            let req = QuoteRequest {
                base_price: price,
                currency: currency.as_deref().map(parse_currency).transpose()?,
                timeline: parse_timeline(&timeline)?,
                plan_title: plan,
            };
            let quote = client.quote(&req).await?;
            println!("{}", serde_json::to_string_pretty(&quote)?);
        }

        Commands::Compute {
            price,
            currency,
            rate,
            non_exempt,
            timeline,
            coming_soon,
        } => {
            let display = compute_locally(
                price,
                parse_currency(&currency)?,
                rate,
                non_exempt,
                parse_timeline(&timeline)?,
                coming_soon,
            )?;
            println!("{}", display);
        }
    }

    Ok(())
}
