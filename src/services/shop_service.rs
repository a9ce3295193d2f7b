//! Catalog lookup services - deals, orders and payments.
//!
//! These are the read-only "action handlers" the chat orchestrator and
//! the REST endpoints share. Each lookup returns the structured rows
//! plus the rendered chat message, so both callers answer identically.

use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    DealResponse, OrderFilters, OrderResponse, OrderStatus, PaymentRecord, PriceRange,
};
use crate::errors::AppResult;
use crate::infra::{DealRepository, OrderQuery, OrderRepository, PaymentRepository};
use crate::services::NlpService;

/// Deals lookup result: rows plus the rendered reply
#[derive(Debug)]
pub struct DealsLookup {
    pub message: String,
    pub deals: Vec<DealResponse>,
}

/// Orders lookup result: rows plus the rendered reply
#[derive(Debug)]
pub struct OrdersLookup {
    pub message: String,
    pub orders: Vec<OrderResponse>,
}

/// Deal lookup trait for dependency injection.
#[async_trait]
pub trait DealService: Send + Sync {
    /// Deals within the bounds, newest first, with the reply text
    async fn find_deals(&self, range: PriceRange) -> AppResult<DealsLookup>;
}

/// Order lookup trait for dependency injection.
#[async_trait]
pub trait OrderService: Send + Sync {
    /// A user's orders under the given plan, newest first
    async fn find_orders(&self, user_id: Uuid, plan: &OrderLookupPlan) -> AppResult<OrdersLookup>;
}

/// Payment lookup trait for dependency injection.
#[async_trait]
pub trait PaymentService: Send + Sync {
    /// A user's payments joined with their orders, newest first
    async fn find_payments(&self, user_id: Uuid) -> AppResult<Vec<PaymentRecord>>;
}

// =============================================================================
// Deals
// =============================================================================

/// Concrete implementation of [`DealService`].
pub struct DealFinder {
    deals: Arc<dyn DealRepository>,
}

impl DealFinder {
    pub fn new(deals: Arc<dyn DealRepository>) -> Self {
        Self { deals }
    }
}

#[async_trait]
impl DealService for DealFinder {
    async fn find_deals(&self, range: PriceRange) -> AppResult<DealsLookup> {
        let deals: Vec<DealResponse> = self
            .deals
            .find_in_range(range)
            .await?
            .into_iter()
            .map(DealResponse::from)
            .collect();

        let message = render_deals_message(&deals, range);
        Ok(DealsLookup { message, deals })
    }
}

/// Reply text for a deals lookup, parameterized by which bounds applied
fn render_deals_message(deals: &[DealResponse], range: PriceRange) -> String {
    if deals.is_empty() {
        return match (range.min_price, range.max_price) {
            (Some(min), Some(max)) => {
                format!("No deals found in the price range ₹{} - ₹{}.", min, max)
            }
            (Some(min), None) => format!("No deals found above ₹{}.", min),
            (None, Some(max)) => format!("No deals found under ₹{}.", max),
            (None, None) => "No deals available at the moment.".to_string(),
        };
    }

    let header = match (range.min_price, range.max_price) {
        (Some(min), Some(max)) => {
            format!("Here are deals in the price range ₹{} - ₹{}! 🎉", min, max)
        }
        (Some(min), None) => format!("Here are deals above ₹{}! 🎉", min),
        (None, Some(max)) => format!("Here are deals under ₹{}! 🎉", max),
        (None, None) => "Here are our latest deals! 🎉".to_string(),
    };

    let items = deals
        .iter()
        .map(|deal| format!("• {} - ₹{}\n  {}", deal.title, deal.price, deal.description))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("{}\n\n{}", header, items)
}

// =============================================================================
// Orders
// =============================================================================

/// Resolved inputs for one orders lookup.
///
/// `filters` echoes what the extractor produced (for the response
/// payload); the remaining fields are what the query actually uses
/// after fallbacks and window resolution.
#[derive(Debug, Clone, Default)]
pub struct OrderLookupPlan {
    pub filters: Option<OrderFilters>,
    pub status: Option<OrderStatus>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub recent_only: bool,
}

impl OrderLookupPlan {
    /// Both ends of the date window are set (the "this month" phrasing)
    fn windowed(&self) -> bool {
        self.start_date.is_some() && self.end_date.is_some()
    }
}

/// Build an orders lookup plan from free text: LLM extraction first,
/// then the keyword fallbacks the extractor may have missed.
pub async fn plan_orders_from_message(nlp: &dyn NlpService, message: &str) -> OrderLookupPlan {
    let filters = nlp.extract_order_filters(message).await;

    let mut status = filters.as_ref().and_then(|f| f.status);
    let recent_only = filters
        .as_ref()
        .and_then(|f| f.recent_only)
        .unwrap_or(false);
    let mut window = filters
        .as_ref()
        .and_then(|f| f.this_month_only)
        .filter(|flag| *flag)
        .map(|_| current_month_window(Utc::now()));

    // Keyword fallbacks over the raw message
    if status.is_none() {
        status = scan_status_keyword(message);
    }
    if window.is_none() && message.to_lowercase().contains("this month") {
        window = Some(current_month_window(Utc::now()));
    }

    let (start_date, end_date) = window.map_or((None, None), |(s, e)| (Some(s), Some(e)));

    OrderLookupPlan {
        filters,
        status,
        start_date,
        end_date,
        recent_only,
    }
}

static STATUS_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(shipped|cancelled|canceled|pending|delivered|confirmed)\b")
        .expect("status keyword pattern is valid")
});

/// First order-status keyword in the message, normalized
pub fn scan_status_keyword(message: &str) -> Option<OrderStatus> {
    let lowered = message.to_lowercase();
    STATUS_KEYWORD
        .find(&lowered)
        .and_then(|m| OrderStatus::parse(m.as_str()))
}

/// Concrete implementation of [`OrderService`].
pub struct OrderFinder {
    orders: Arc<dyn OrderRepository>,
}

impl OrderFinder {
    pub fn new(orders: Arc<dyn OrderRepository>) -> Self {
        Self { orders }
    }
}

#[async_trait]
impl OrderService for OrderFinder {
    async fn find_orders(&self, user_id: Uuid, plan: &OrderLookupPlan) -> AppResult<OrdersLookup> {
        let query = OrderQuery {
            user_id,
            status: plan.status,
            start_date: plan.start_date,
            end_date: plan.end_date,
            recent_only: plan.recent_only,
        };

        let orders: Vec<OrderResponse> = self
            .orders
            .find_filtered(query)
            .await?
            .into_iter()
            .map(OrderResponse::from)
            .collect();

        let message = render_orders_message(&orders, plan);
        Ok(OrdersLookup { message, orders })
    }
}

/// Reply text for an orders lookup, parameterized by the active filters
fn render_orders_message(orders: &[OrderResponse], plan: &OrderLookupPlan) -> String {
    let windowed = plan.windowed();

    if orders.is_empty() {
        return match (plan.status, windowed) {
            (Some(status), true) => format!(
                "You don't have any {} orders this month. Would you like to browse our deals?",
                status
            ),
            (Some(status), false) => format!(
                "You don't have any {} orders at the moment. Would you like to browse our deals?",
                status
            ),
            (None, true) => {
                "You don't have any orders this month. Would you like to browse our deals?"
                    .to_string()
            }
            (None, false) => {
                "You don't have any orders yet. Would you like to browse our deals?".to_string()
            }
        };
    }

    let header = if plan.recent_only {
        "Here is your most recent order:".to_string()
    } else {
        match (plan.status, windowed) {
            (Some(status), true) => format!("Here are your {} orders from this month:", status),
            (Some(status), false) => format!("Here are your {} orders:", status),
            (None, true) => "Here are your orders from this month:".to_string(),
            (None, false) => "Here are your orders:".to_string(),
        }
    };

    let items = orders
        .iter()
        .map(|order| {
            format!(
                "• {} - Status: {}\n Date: {}",
                order.product_name,
                order.status,
                format_order_date(order.created_at)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("{}\n\n{}", header, items)
}

/// M/D/YYYY, matching the original card layout
fn format_order_date(date: DateTime<Utc>) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

// =============================================================================
// Payments
// =============================================================================

/// Concrete implementation of [`PaymentService`].
pub struct PaymentFinder {
    payments: Arc<dyn PaymentRepository>,
}

impl PaymentFinder {
    pub fn new(payments: Arc<dyn PaymentRepository>) -> Self {
        Self { payments }
    }
}

#[async_trait]
impl PaymentService for PaymentFinder {
    async fn find_payments(&self, user_id: Uuid) -> AppResult<Vec<PaymentRecord>> {
        let rows = self.payments.find_for_user(user_id).await?;

        Ok(rows
            .into_iter()
            .map(|(payment, order)| PaymentRecord::from_join(payment, order))
            .collect())
    }
}

// =============================================================================
// Date windows
// =============================================================================

/// Start of day (00:00:00.000) in UTC
pub fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .expect("00:00:00 is a valid time")
        .and_utc()
}

/// End of day (23:59:59.999) in UTC, so date filters are inclusive
pub fn day_end(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_milli_opt(23, 59, 59, 999)
        .expect("23:59:59.999 is a valid time")
        .and_utc()
}

/// Inclusive window covering the month containing `now`
pub fn current_month_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let first = NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .expect("first of the month is a valid date");
    let next_month_first = if now.month() == 12 {
        NaiveDate::from_ymd_opt(now.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(now.year(), now.month() + 1, 1)
    }
    .expect("first of the next month is a valid date");
    let last = next_month_first
        .pred_opt()
        .expect("month has a last day");

    (day_start(first), day_end(last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    fn deal(title: &str, price: f64) -> DealResponse {
        DealResponse {
            deal_id: Uuid::new_v4(),
            title: title.to_string(),
            description: "A great offer".to_string(),
            price,
            image_url: "https://cdn.example.com/deal.png".to_string(),
        }
    }

    fn order(product: &str, status: OrderStatus) -> OrderResponse {
        OrderResponse {
            order_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            product_name: product.to_string(),
            image_url: "https://cdn.example.com/order.png".to_string(),
            status,
            created_at: Utc.with_ymd_and_hms(2025, 3, 15, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn deals_message_mentions_the_applied_bound() {
        let deals = vec![deal("Earbuds", 1499.0)];
        let max_only = PriceRange {
            min_price: None,
            max_price: Some(2000.0),
        };
        let message = render_deals_message(&deals, max_only);
        assert!(message.contains("under ₹2000"));
        assert!(message.contains("• Earbuds - ₹1499"));
    }

    #[test]
    fn empty_deals_message_varies_by_bounds() {
        let none = PriceRange::default();
        assert_eq!(
            render_deals_message(&[], none),
            "No deals available at the moment."
        );

        let both = PriceRange {
            min_price: Some(300.0),
            max_price: Some(700.0),
        };
        assert_eq!(
            render_deals_message(&[], both),
            "No deals found in the price range ₹300 - ₹700."
        );

        let min_only = PriceRange {
            min_price: Some(500.0),
            max_price: None,
        };
        assert_eq!(render_deals_message(&[], min_only), "No deals found above ₹500.");
    }

    #[test]
    fn empty_orders_message_varies_by_filters() {
        let plain = OrderLookupPlan::default();
        assert!(render_orders_message(&[], &plain).contains("don't have any orders yet"));

        let with_status = OrderLookupPlan {
            status: Some(OrderStatus::Shipped),
            ..Default::default()
        };
        assert!(
            render_orders_message(&[], &with_status).contains("don't have any shipped orders")
        );
    }

    #[test]
    fn recent_only_header_wins_over_filters() {
        let orders = vec![order("Bluetooth speaker", OrderStatus::Delivered)];
        let plan = OrderLookupPlan {
            status: Some(OrderStatus::Delivered),
            recent_only: true,
            ..Default::default()
        };
        let message = render_orders_message(&orders, &plan);
        assert!(message.starts_with("Here is your most recent order:"));
        assert!(message.contains("Date: 3/15/2025"));
    }

    #[test]
    fn status_keyword_scan_normalizes_us_spelling() {
        assert_eq!(
            scan_status_keyword("show my canceled orders"),
            Some(OrderStatus::Cancelled)
        );
        assert_eq!(
            scan_status_keyword("SHIPPED orders please"),
            Some(OrderStatus::Shipped)
        );
        assert_eq!(scan_status_keyword("all my orders"), None);
    }

    #[test]
    fn day_bounds_are_inclusive() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let start = day_start(date);
        let end = day_end(date);

        assert_eq!((start.hour(), start.minute(), start.second()), (0, 0, 0));
        assert_eq!((end.hour(), end.minute(), end.second()), (23, 59, 59));
        assert_eq!(end.timestamp_subsec_millis(), 999);
    }

    #[test]
    fn month_window_covers_december_rollover() {
        let now = Utc.with_ymd_and_hms(2025, 12, 20, 8, 30, 0).unwrap();
        let (start, end) = current_month_window(now);

        assert_eq!((start.year(), start.month(), start.day()), (2025, 12, 1));
        assert_eq!((end.year(), end.month(), end.day()), (2025, 12, 31));
    }
}
