//! Insight adapter: summarize sales through an external text provider.
//!
//! The only asynchronous external call in the system. Invoices are
//! projected down to a compact summary (date, total, customer, item
//! count) before leaving the process, the provider's reply is treated as
//! opaque prose, and every provider failure degrades to a fixed fallback
//! message - callers never see a hard error from this module's public
//! entry point.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::Invoice;

/// Returned when there are no invoices to summarize; the provider is not
/// called.
pub const NO_DATA_MESSAGE: &str =
    "No sales data available yet. Create some invoices to get AI insights!";

/// Returned in place of any provider error.
pub const FALLBACK_MESSAGE: &str =
    "Unable to generate insights at this time. Please try again later.";

const SYSTEM_INSTRUCTION: &str = "You are a helpful financial analyst for a small business.";

const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Insight provider configuration.
#[derive(Debug, Clone)]
pub struct InsightConfig {
    /// Provider base URL.
    pub api_url: String,
    /// Provider API key.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
}

impl InsightConfig {
    /// Create an InsightConfig from environment variables.
    ///
    /// # Environment Variables
    /// - `INSIGHT_API_KEY`: provider API key (required)
    /// - `INSIGHT_API_URL`: provider base URL (default: Google generative
    ///   language endpoint)
    /// - `INSIGHT_MODEL`: model identifier (default: `gemini-2.5-flash`)
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("INSIGHT_API_KEY").map_err(|_| {
            Error::ConfigError("INSIGHT_API_KEY environment variable not set".to_string())
        })?;
        let api_url =
            std::env::var("INSIGHT_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let model = std::env::var("INSIGHT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Ok(InsightConfig {
            api_url,
            api_key,
            model,
        })
    }
}

/// Compact per-invoice projection sent to the provider.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesPoint {
    pub date: DateTime<Utc>,
    pub total: f64,
    pub customer: String,
    pub item_count: usize,
}

/// Project invoices down to the summary the provider sees.
pub fn sales_projection(invoices: &[Invoice]) -> Vec<SalesPoint> {
    invoices
        .iter()
        .map(|invoice| SalesPoint {
            date: invoice.date,
            total: invoice.total,
            customer: invoice.customer_name.clone(),
            item_count: invoice.items.len(),
        })
        .collect()
}

/// Build the analysis prompt for a set of invoices.
pub fn build_prompt(invoices: &[Invoice]) -> Result<String> {
    let summary = serde_json::to_string(&sales_projection(invoices))
        .map_err(|e| Error::SerializationError(format!("sales projection: {}", e)))?;
    Ok(format!(
        "Analyze the following sales invoice data and provide a brief, actionable \
         executive summary (max 3 bullet points) highlighting trends, top performers, \
         or anomalies. Format the output as Markdown.\n\nData: {}",
        summary
    ))
}

/// Client for the external insight provider.
#[derive(Clone)]
pub struct InsightClient {
    http: reqwest::Client,
    config: InsightConfig,
}

impl InsightClient {
    /// Create a client with the given configuration.
    pub fn new(config: InsightConfig) -> Self {
        InsightClient {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Create a client configured from the environment.
    ///
    /// # Errors
    /// Returns `Error::ConfigError` if required variables are missing.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(InsightConfig::from_env()?))
    }

    /// Summarize a set of invoices as short prose.
    ///
    /// Empty input returns [`NO_DATA_MESSAGE`] without calling the
    /// provider; any provider failure returns [`FALLBACK_MESSAGE`]. This
    /// method never fails hard. Callers should avoid re-invoking while a
    /// previous call is still pending; nothing here guards against it.
    pub async fn summarize_sales(&self, invoices: &[Invoice]) -> String {
        if invoices.is_empty() {
            return NO_DATA_MESSAGE.to_string();
        }

        match self.request_summary(invoices).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Insight provider error: {}", e);
                FALLBACK_MESSAGE.to_string()
            }
        }
    }

    async fn request_summary(&self, invoices: &[Invoice]) -> Result<String> {
        let prompt = build_prompt(invoices)?;
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.api_url, self.config.model, self.config.api_key
        );

        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
            "generationConfig": { "temperature": 0.7 },
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::ProviderError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::ProviderError(format!(
                "provider returned {}",
                response.status()
            )));
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::ProviderError(e.to_string()))?;

        payload
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(|text| text.as_str())
            .map(|text| text.to_string())
            .ok_or_else(|| Error::ProviderError("malformed provider response".to_string()))
    }
}
