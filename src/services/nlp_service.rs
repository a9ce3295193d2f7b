//! NLP service - intent detection and slot extraction via Groq.
//!
//! Every method is fail-soft by contract: a provider error, a missing
//! API key, or an unparseable reply yields the fallback value (UNKNOWN
//! intent or no filter), never an `Err`. There is no local classifier
//! to fall back to, so the chat feature depends on this degradation to
//! stay available.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::config::{
    EXTRACTION_MAX_TOKENS, EXTRACTION_TEMPERATURE, INTENT_MAX_TOKENS, INTENT_TEMPERATURE,
};
use crate::domain::{Intent, OrderFilters, OrderStatus, PriceRange};
use crate::infra::{ChatPrompt, LlmClient};

const INTENT_SYSTEM: &str = "You are an intent detection system. When a message contains both a \
greeting and an action request, ALWAYS prioritize the action intent (DEALS, ORDERS, PAYMENT, \
SUPPORT) over GREETING. Only return GREETING if the message is purely a greeting with no action. \
Return THANKS for expressions of gratitude. Return OTHERS for general messages. Always respond \
with only one word: DEALS, ORDERS, PAYMENT, SUPPORT, THANKS, GREETING, OTHERS, or UNKNOWN.";

const PRICE_SYSTEM: &str = "You are a JSON-only response system. Extract price range information \
from user messages. CRITICAL RULES: 'below', 'under', 'less than', 'up to' indicate MAXIMUM \
price (set maxPrice, minPrice=null). 'above', 'over', 'more than', 'at least' indicate MINIMUM \
price (set minPrice, maxPrice=null). Return ONLY valid JSON in the format {\"minPrice\": number \
or null, \"maxPrice\": number or null}. Never write code or explanations, only JSON.";

const ORDER_FILTER_SYSTEM: &str = "You are a JSON-only response system. Extract order filtering \
from user messages including status, this-month flag, and recent flag. Return ONLY valid JSON in \
the format {\"status\": \"pending\"|\"confirmed\"|\"shipped\"|\"delivered\"|\"cancelled\" or \
null, \"thisMonthOnly\": true or null, \"recentOnly\": true or null}. Never write code or \
explanations, only JSON.";

/// NLP service trait for dependency injection.
#[async_trait]
pub trait NlpService: Send + Sync {
    /// Classify a chat message into one of the eight intents.
    /// Falls back to [`Intent::Unknown`] on any failure.
    async fn classify(&self, message: &str) -> Intent;

    /// Pull inclusive price bounds out of free text.
    /// `None` means "no filter extracted", including on failure.
    async fn extract_price_range(&self, message: &str) -> Option<PriceRange>;

    /// Pull order status/date/recency filters out of free text.
    /// `None` means "no filter extracted", including on failure.
    async fn extract_order_filters(&self, message: &str) -> Option<OrderFilters>;
}

/// Groq-backed implementation of [`NlpService`].
pub struct GroqNlp {
    llm: Arc<dyn LlmClient>,
}

impl GroqNlp {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl NlpService for GroqNlp {
    async fn classify(&self, message: &str) -> Intent {
        let prompt = ChatPrompt {
            system: INTENT_SYSTEM.to_string(),
            user: intent_prompt(message),
            temperature: INTENT_TEMPERATURE,
            max_tokens: INTENT_MAX_TOKENS,
        };

        match self.llm.complete(prompt).await {
            Ok(reply) => {
                let intent = Intent::parse_lenient(&reply);
                if intent == Intent::Unknown && reply.trim().to_uppercase() != "UNKNOWN" {
                    tracing::warn!(reply = %reply.trim(), "unexpected intent reply, defaulting to UNKNOWN");
                }
                intent
            }
            Err(e) => {
                tracing::warn!("intent detection failed: {}", e);
                Intent::Unknown
            }
        }
    }

    async fn extract_price_range(&self, message: &str) -> Option<PriceRange> {
        let prompt = ChatPrompt {
            system: PRICE_SYSTEM.to_string(),
            user: price_prompt(message),
            temperature: EXTRACTION_TEMPERATURE,
            max_tokens: EXTRACTION_MAX_TOKENS,
        };

        let reply = match self.llm.complete(prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("price extraction failed: {}", e);
                return None;
            }
        };

        let raw: RawPriceRange = parse_reply(&reply)?;
        raw.validated()
    }

    async fn extract_order_filters(&self, message: &str) -> Option<OrderFilters> {
        let prompt = ChatPrompt {
            system: ORDER_FILTER_SYSTEM.to_string(),
            user: order_filter_prompt(message),
            temperature: EXTRACTION_TEMPERATURE,
            max_tokens: EXTRACTION_MAX_TOKENS,
        };

        let reply = match self.llm.complete(prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!("order filter extraction failed: {}", e);
                return None;
            }
        };

        let raw: RawOrderFilters = parse_reply(&reply)?;
        Some(raw.validated())
    }
}

/// User prompt for intent classification
fn intent_prompt(message: &str) -> String {
    format!(
        "Analyze the user's message and determine their PRIMARY intent. If the message contains \
both a greeting AND an action request, prioritize the ACTION intent.

Available intents (in priority order):
1. DEALS: User wants to see deals, discounts, offers, promotions, or sales
2. ORDERS: User wants to check their orders, order history, order status, or track orders
3. PAYMENT: User wants to check payment status, payment history, bills, or invoices
4. SUPPORT: User needs help, support, assistance, has questions, problems, issues, or wants to \
contact support
5. THANKS: User is expressing gratitude, appreciation, or saying thank you
6. GREETING: User is ONLY greeting with no action request (hello, hi, hey, good morning, etc.)
7. OTHERS: User's message doesn't fit into any specific category but is a general message
8. UNKNOWN: If the message doesn't clearly match any of the above intents

CRITICAL RULES:
- If message contains action words (deals, orders, payment, help, support) even with a greeting, \
return the ACTION intent
- Examples: \"hello, show me deals\" -> DEALS, \"hi, I need help\" -> SUPPORT
- Only return GREETING if the message is purely a greeting with no action request

User message: \"{message}\"

Respond with ONLY the intent name (one word: DEALS, ORDERS, PAYMENT, SUPPORT, THANKS, GREETING, \
OTHERS, or UNKNOWN)."
    )
}

/// User prompt for price-range extraction
fn price_prompt(message: &str) -> String {
    format!(
        "Extract price range information from the following message.

User message: \"{message}\"

CRITICAL: Return ONLY a valid JSON object in this format:
{{\"minPrice\": number or null, \"maxPrice\": number or null}}

IMPORTANT PRICE EXTRACTION RULES:
- MAXIMUM PRICE (user wants deals BELOW/UNDER a price):
  \"below X\", \"under X\", \"less than X\", \"up to X\", \"maximum X\" -> set maxPrice to X, \
minPrice to null
- MINIMUM PRICE (user wants deals ABOVE/OVER a price):
  \"above X\", \"more than X\", \"at least X\", \"over X\", \"greater than X\" -> set minPrice \
to X, maxPrice to null
- PRICE RANGE: \"between X and Y\", \"from X to Y\", \"X-Y\" -> set minPrice to the smaller \
value, maxPrice to the larger value
- If no price information is found, return {{\"minPrice\": null, \"maxPrice\": null}}

CRITICAL: Do NOT confuse \"below/under\" with \"above/over\". \"Below\" means maximum price \
(price <= X), \"Above\" means minimum price (price >= X).

Extract numeric values only, ignore currency symbols."
    )
}

/// User prompt for order-filter extraction
fn order_filter_prompt(message: &str) -> String {
    format!(
        "Extract order filtering information from the following message.

User message: \"{message}\"

CRITICAL: Return ONLY a valid JSON object in this format:
{{\"status\": \"pending\" | \"confirmed\" | \"shipped\" | \"delivered\" | \"cancelled\" or null, \
\"thisMonthOnly\": true or null, \"recentOnly\": true or null}}

Rules:
- \"order\", \"my orders\", \"past orders\" -> all null (no filters)
- \"my recent order\", \"recent order\" -> {{\"recentOnly\": true}}
- \"this month orders\", \"orders this month\" -> {{\"thisMonthOnly\": true}}
- \"pending orders\", \"shipped orders\", etc. -> the matching status value
- Combinations like \"pending orders this month\" -> BOTH status AND thisMonthOnly

If the message doesn't match any of these patterns, return all null."
    )
}

/// Raw price payload as the model emits it
#[derive(Debug, Deserialize)]
struct RawPriceRange {
    #[serde(rename = "minPrice")]
    min_price: Option<f64>,
    #[serde(rename = "maxPrice")]
    max_price: Option<f64>,
}

impl RawPriceRange {
    /// Drop negative bounds, reorder an inverted pair, and collapse to
    /// `None` when nothing remains
    fn validated(self) -> Option<PriceRange> {
        let mut min = self.min_price.filter(|p| *p >= 0.0);
        let mut max = self.max_price.filter(|p| *p >= 0.0);

        // "between 700 and 300" must still come out as 300..=700
        if let (Some(lo), Some(hi)) = (min, max) {
            if lo > hi {
                (min, max) = (Some(hi), Some(lo));
            }
        }

        let range = PriceRange {
            min_price: min,
            max_price: max,
        };
        if range.is_empty() {
            None
        } else {
            Some(range)
        }
    }
}

/// Raw order-filter payload as the model emits it
#[derive(Debug, Deserialize)]
struct RawOrderFilters {
    status: Option<String>,
    #[serde(rename = "thisMonthOnly")]
    this_month_only: Option<bool>,
    #[serde(rename = "recentOnly")]
    recent_only: Option<bool>,
}

impl RawOrderFilters {
    /// Out-of-vocabulary statuses are ignored, not rejected
    fn validated(self) -> OrderFilters {
        OrderFilters {
            status: self.status.as_deref().and_then(OrderStatus::parse),
            this_month_only: self.this_month_only.filter(|b| *b),
            recent_only: self.recent_only.filter(|b| *b),
        }
    }
}

/// Parse a model reply into `T`, tolerating prose and code fences.
fn parse_reply<T: serde::de::DeserializeOwned>(reply: &str) -> Option<T> {
    let json = extract_json_object(reply)?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(reply = %reply.trim(), "failed to parse extraction reply: {}", e);
            None
        }
    }
}

/// Locate the first balanced `{...}` substring in a reply that may wrap
/// its JSON in prose or markdown code fences.
fn extract_json_object(text: &str) -> Option<String> {
    // Strip ``` fences (with or without a language tag) before scanning
    let cleaned: String = text
        .lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n");

    let bytes = cleaned.as_bytes();
    let start = cleaned.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if escaped {
            escaped = false;
            continue;
        }
        match b {
            b'\\' if in_string => escaped = true,
            b'"' => in_string = !in_string,
            b'{' if !in_string => depth += 1,
            b'}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(cleaned[start..=i].to_string());
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_bare_json() {
        let json = extract_json_object(r#"{"minPrice": null, "maxPrice": 500}"#).unwrap();
        assert_eq!(json, r#"{"minPrice": null, "maxPrice": 500}"#);
    }

    #[test]
    fn strips_code_fences() {
        let reply = "```json\n{\"minPrice\": 100, \"maxPrice\": null}\n```";
        let json = extract_json_object(reply).unwrap();
        assert_eq!(json, "{\"minPrice\": 100, \"maxPrice\": null}");
    }

    #[test]
    fn tolerates_surrounding_prose() {
        let reply = "Sure! Here is the filter you asked for: {\"status\": \"shipped\", \
                     \"thisMonthOnly\": null, \"recentOnly\": null} Let me know if that helps.";
        let json = extract_json_object(reply).unwrap();
        assert!(json.starts_with('{') && json.ends_with('}'));
        let raw: RawOrderFilters = serde_json::from_str(&json).unwrap();
        assert_eq!(raw.status.as_deref(), Some("shipped"));
    }

    #[test]
    fn stops_at_first_balanced_object() {
        let reply = r#"{"a": {"nested": 1}} trailing {"b": 2}"#;
        assert_eq!(extract_json_object(reply).unwrap(), r#"{"a": {"nested": 1}}"#);
    }

    #[test]
    fn braces_inside_strings_do_not_confuse_the_scan() {
        let reply = r#"{"status": "shipped}", "recentOnly": null}"#;
        assert_eq!(extract_json_object(reply).unwrap(), reply);
    }

    #[test]
    fn no_object_yields_none() {
        assert!(extract_json_object("no json here").is_none());
        assert!(extract_json_object("{ unterminated").is_none());
    }

    #[test]
    fn negative_prices_are_dropped() {
        let raw = RawPriceRange {
            min_price: Some(-5.0),
            max_price: Some(300.0),
        };
        let range = raw.validated().unwrap();
        assert_eq!(range.min_price, None);
        assert_eq!(range.max_price, Some(300.0));
    }

    #[test]
    fn inverted_bounds_are_reordered() {
        let raw = RawPriceRange {
            min_price: Some(700.0),
            max_price: Some(300.0),
        };
        let range = raw.validated().unwrap();
        assert_eq!(range.min_price, Some(300.0));
        assert_eq!(range.max_price, Some(700.0));
    }

    #[test]
    fn empty_price_payload_collapses_to_none() {
        let raw = RawPriceRange {
            min_price: None,
            max_price: None,
        };
        assert!(raw.validated().is_none());
    }

    #[test]
    fn unknown_status_is_ignored_not_rejected() {
        let raw = RawOrderFilters {
            status: Some("returned".to_string()),
            this_month_only: Some(true),
            recent_only: None,
        };
        let filters = raw.validated();
        assert_eq!(filters.status, None);
        assert_eq!(filters.this_month_only, Some(true));
    }

    #[test]
    fn us_spelling_normalizes_in_extraction_too() {
        let raw = RawOrderFilters {
            status: Some("canceled".to_string()),
            this_month_only: None,
            recent_only: None,
        };
        assert_eq!(raw.validated().status, Some(OrderStatus::Cancelled));
    }
}
