//! Pricing plans and delivery timelines.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A sellable package. Base prices are always in PKR whole units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PricingPlan {
    #[schema(example = "Starter Website")]
    pub title: String,
    #[schema(example = 38500)]
    pub base_price: u64,
    /// Plans that are announced but not yet sold show "SOON" instead of a price.
    #[serde(default)]
    pub coming_soon: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PricingPlan {
    pub fn new(title: impl Into<String>, base_price: u64) -> Self {
        Self {
            title: title.into(),
            base_price,
            coming_soon: false,
            description: None,
        }
    }

    pub fn coming_soon(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            base_price: 0,
            coming_soon: true,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The packages listed on the pricing and chatbot pages.
    pub fn default_catalog() -> Vec<PricingPlan> {
        vec![
            PricingPlan::new("Starter Website", 38_500)
                .with_description("Up to 5 pages, responsive design, contact form"),
            PricingPlan::new("Business Website", 85_000)
                .with_description("Up to 15 pages, CMS, SEO setup, analytics"),
            PricingPlan::new("E-Commerce Store", 150_000)
                .with_description("Product catalog, cart, checkout and payment gateway"),
            PricingPlan::new("Custom Chatbot", 65_000)
                .with_description("Trained on your content, embeddable on any site"),
            PricingPlan::coming_soon("AI Voice Agent")
                .with_description("Inbound call handling with a custom voice"),
        ]
    }
}

/// Delivery speed chosen by the customer. Applied to the PKR base price
/// before any currency conversion.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Timeline {
    /// Flexible deadline, 20% discount.
    Relaxed,
    #[default]
    Normal,
    /// Rush delivery, 20% surcharge.
    Urgent,
}

impl Timeline {
    pub fn multiplier(&self) -> f64 {
        match self {
            Timeline::Relaxed => 0.8,
            Timeline::Normal => 1.0,
            Timeline::Urgent => 1.2,
        }
    }

    pub fn all() -> &'static [Timeline] {
        &[Timeline::Relaxed, Timeline::Normal, Timeline::Urgent]
    }
}

impl fmt::Display for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Timeline::Relaxed => "relaxed",
            Timeline::Normal => "normal",
            Timeline::Urgent => "urgent",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Timeline {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "relaxed" => Ok(Timeline::Relaxed),
            "normal" => Ok(Timeline::Normal),
            "urgent" => Ok(Timeline::Urgent),
            _ => Err(format!("Unknown timeline: {}", s)),
        }
    }
}
