//! Integration tests for API endpoints.
//!
//! Real router, real services, mocked repositories and a stubbed NLP
//! layer - no database or network involved.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use shopbot_api::domain::{
    Deal, Intent, Order, OrderFilters, OrderStatus, Password, PriceRange, User,
};
use shopbot_api::infra::{
    Database, LlmError, MockDealRepository, MockLlmClient, MockOrderRepository,
    MockPaymentRepository, MockUserRepository,
};
use shopbot_api::services::{
    AuthService, Authenticator, ChatOrchestrator, ChatService, DealFinder, DealService, GroqNlp,
    NlpService, OrderFinder, OrderService, PaymentFinder, PaymentService,
};
use shopbot_api::{api::create_router, AppState, Config};

const TEST_SECRET: &str = "test-secret-key-for-testing-only-32chars";
const TEST_PASSWORD: &str = "SecurePass123!";

// =============================================================================
// Test fixtures and helpers
// =============================================================================

fn seeded_user(id: Uuid) -> User {
    User {
        id,
        name: "Asha Rao".to_string(),
        phone: "+91-9876543210".to_string(),
        address: "12 MG Road, Bengaluru".to_string(),
        email: "asha@example.com".to_string(),
        password_hash: Password::new(TEST_PASSWORD).unwrap().into_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn seeded_order(user_id: Uuid, product: &str, status: OrderStatus) -> Order {
    Order {
        id: Uuid::new_v4(),
        user_id,
        product_name: product.to_string(),
        image_url: "https://cdn.example.com/p.png".to_string(),
        status,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn seeded_deal(title: &str, price: f64) -> Deal {
    Deal {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: "A great offer".to_string(),
        price,
        image_url: "https://cdn.example.com/deal.png".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// NLP stub with canned answers
struct StubNlp {
    intent: Intent,
}

#[async_trait]
impl NlpService for StubNlp {
    async fn classify(&self, _message: &str) -> Intent {
        self.intent
    }

    async fn extract_price_range(&self, _message: &str) -> Option<PriceRange> {
        None
    }

    async fn extract_order_filters(&self, _message: &str) -> Option<OrderFilters> {
        None
    }
}

/// Build the full router over mocked repositories
fn app(
    users: MockUserRepository,
    deals: MockDealRepository,
    orders: MockOrderRepository,
    payments: MockPaymentRepository,
    nlp: Arc<dyn NlpService>,
) -> Router {
    let auth: Arc<dyn AuthService> = Arc::new(Authenticator::new(
        Arc::new(users),
        Config::for_tests(TEST_SECRET),
    ));
    let deal_service: Arc<dyn DealService> = Arc::new(DealFinder::new(Arc::new(deals)));
    let order_service: Arc<dyn OrderService> = Arc::new(OrderFinder::new(Arc::new(orders)));
    let payment_service: Arc<dyn PaymentService> =
        Arc::new(PaymentFinder::new(Arc::new(payments)));
    let chat: Arc<dyn ChatService> = Arc::new(ChatOrchestrator::new(
        nlp.clone(),
        deal_service.clone(),
        order_service.clone(),
        payment_service.clone(),
    ));

    let state = AppState::new(
        auth,
        nlp,
        deal_service,
        order_service,
        payment_service,
        chat,
        Arc::new(Database::from_connection(DatabaseConnection::default())),
    );

    create_router(state)
}

/// Issue a real signed token for the seeded user
async fn token_for(user: &User) -> String {
    let mut users = MockUserRepository::new();
    let found = user.clone();
    users
        .expect_find_by_email()
        .returning(move |_| Ok(Some(found.clone())));

    let auth = Authenticator::new(Arc::new(users), Config::for_tests(TEST_SECRET));
    auth.login(user.email.clone(), TEST_PASSWORD.to_string())
        .await
        .unwrap()
        .token
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn json_post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn authed_get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn register_body() -> Value {
    json!({
        "name": "Asha Rao",
        "phone": "+91-9876543210",
        "address": "12 MG Road, Bengaluru",
        "email": "asha@example.com",
        "password": TEST_PASSWORD,
    })
}

// =============================================================================
// Auth endpoints
// =============================================================================

#[tokio::test]
async fn register_with_taken_phone_or_email_is_conflict() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_phone_or_email()
        .returning(|_, _| Ok(Some(seeded_user(Uuid::new_v4()))));
    users.expect_create().times(0);

    let router = app(
        users,
        MockDealRepository::new(),
        MockOrderRepository::new(),
        MockPaymentRepository::new(),
        Arc::new(StubNlp {
            intent: Intent::Unknown,
        }),
    );

    let (status, body) = send(&router, json_post("/api/auth/register", register_body())).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("CONFLICT"));
}

#[tokio::test]
async fn register_returns_public_user_and_token() {
    let user_id = Uuid::new_v4();

    let mut users = MockUserRepository::new();
    users
        .expect_find_by_phone_or_email()
        .returning(|_, _| Ok(None));
    users.expect_create().returning(move |new| {
        let mut user = seeded_user(user_id);
        user.password_hash = new.password_hash;
        Ok(user)
    });

    let router = app(
        users,
        MockDealRepository::new(),
        MockOrderRepository::new(),
        MockPaymentRepository::new(),
        Arc::new(StubNlp {
            intent: Intent::Unknown,
        }),
    );

    let (status, body) = send(&router, json_post("/api/auth/register", register_body())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["user"]["email"], json!("asha@example.com"));
    assert_eq!(body["data"]["user"]["userId"], json!(user_id.to_string()));
    assert!(body["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));
    // The hash must never leave the server
    assert!(body["data"]["user"].get("password").is_none());
    assert!(body["data"]["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn register_with_missing_field_is_validation_error() {
    let router = app(
        MockUserRepository::new(),
        MockDealRepository::new(),
        MockOrderRepository::new(),
        MockPaymentRepository::new(),
        Arc::new(StubNlp {
            intent: Intent::Unknown,
        }),
    );

    let mut body = register_body();
    body.as_object_mut().unwrap().remove("email");

    let (status, response) = send(&router, json_post("/api/auth/register", body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], json!("VALIDATION_ERROR"));
}

#[tokio::test]
async fn login_with_unknown_email_is_not_found() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_email().returning(|_| Ok(None));

    let router = app(
        users,
        MockDealRepository::new(),
        MockOrderRepository::new(),
        MockPaymentRepository::new(),
        Arc::new(StubNlp {
            intent: Intent::Unknown,
        }),
    );

    let (status, body) = send(
        &router,
        json_post(
            "/api/auth/login",
            json!({"email": "ghost@example.com", "password": "whatever123"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], json!("NOT_FOUND"));
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .returning(|_| Ok(Some(seeded_user(Uuid::new_v4()))));

    let router = app(
        users,
        MockDealRepository::new(),
        MockOrderRepository::new(),
        MockPaymentRepository::new(),
        Arc::new(StubNlp {
            intent: Intent::Unknown,
        }),
    );

    let (status, body) = send(
        &router,
        json_post(
            "/api/auth/login",
            json!({"email": "asha@example.com", "password": "WrongPass123!"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], json!("INVALID_CREDENTIALS"));
}

#[tokio::test]
async fn me_distinguishes_missing_from_invalid_token() {
    let user = seeded_user(Uuid::new_v4());
    let token = token_for(&user).await;

    let mut users = MockUserRepository::new();
    let found = user.clone();
    users
        .expect_find_by_id()
        .returning(move |_| Ok(Some(found.clone())));

    let router = app(
        users,
        MockDealRepository::new(),
        MockOrderRepository::new(),
        MockPaymentRepository::new(),
        Arc::new(StubNlp {
            intent: Intent::Unknown,
        }),
    );

    // No token at all
    let bare = Request::builder()
        .method("GET")
        .uri("/api/auth/me")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&router, bare).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Token present but garbage
    let (status, _) = send(&router, authed_get("/api/auth/me", "junk-token")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Valid token
    let (status, body) = send(&router, authed_get("/api/auth/me", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], json!("asha@example.com"));
}

// =============================================================================
// Orders endpoint
// =============================================================================

#[tokio::test]
async fn empty_order_history_answers_with_the_no_orders_message() {
    let user = seeded_user(Uuid::new_v4());
    let token = token_for(&user).await;

    let mut orders = MockOrderRepository::new();
    orders.expect_find_filtered().returning(|_| Ok(vec![]));

    let router = app(
        MockUserRepository::new(),
        MockDealRepository::new(),
        orders,
        MockPaymentRepository::new(),
        Arc::new(StubNlp {
            intent: Intent::Unknown,
        }),
    );

    let (status, body) = send(&router, authed_get("/api/app/orders", &token)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("don't have any orders yet"));
    assert_eq!(body["data"]["orders"], json!([]));
}

#[tokio::test]
async fn status_filter_returns_only_matching_orders() {
    let user = seeded_user(Uuid::new_v4());
    let user_id = user.id;
    let token = token_for(&user).await;

    let seeded = vec![
        seeded_order(user_id, "Speaker", OrderStatus::Shipped),
        seeded_order(user_id, "Lamp", OrderStatus::Delivered),
    ];

    let mut orders = MockOrderRepository::new();
    orders.expect_find_filtered().returning(move |query| {
        Ok(seeded
            .iter()
            .filter(|o| query.status.map_or(true, |s| s == o.status))
            .cloned()
            .collect())
    });

    let router = app(
        MockUserRepository::new(),
        MockDealRepository::new(),
        orders,
        MockPaymentRepository::new(),
        Arc::new(StubNlp {
            intent: Intent::Unknown,
        }),
    );

    let (status, body) = send(&router, authed_get("/api/app/orders?status=shipped", &token)).await;

    assert_eq!(status, StatusCode::OK);
    let listed = body["data"]["orders"].as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["productName"], json!("Speaker"));
    assert_eq!(listed[0]["status"], json!("shipped"));
}

#[tokio::test]
async fn out_of_vocabulary_status_is_ignored_not_rejected() {
    let user = seeded_user(Uuid::new_v4());
    let user_id = user.id;
    let token = token_for(&user).await;

    let seeded = vec![
        seeded_order(user_id, "Speaker", OrderStatus::Shipped),
        seeded_order(user_id, "Lamp", OrderStatus::Delivered),
    ];

    let mut orders = MockOrderRepository::new();
    orders
        .expect_find_filtered()
        .withf(|query| query.status.is_none())
        .returning(move |_| Ok(seeded.clone()));

    let router = app(
        MockUserRepository::new(),
        MockDealRepository::new(),
        orders,
        MockPaymentRepository::new(),
        Arc::new(StubNlp {
            intent: Intent::Unknown,
        }),
    );

    let (status, body) = send(
        &router,
        authed_get("/api/app/orders?status=returned", &token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["orders"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn malformed_start_date_is_validation_error() {
    let user = seeded_user(Uuid::new_v4());
    let token = token_for(&user).await;

    let router = app(
        MockUserRepository::new(),
        MockDealRepository::new(),
        MockOrderRepository::new(),
        MockPaymentRepository::new(),
        Arc::new(StubNlp {
            intent: Intent::Unknown,
        }),
    );

    let (status, body) = send(
        &router,
        authed_get("/api/app/orders?startDate=March-1st", &token),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("VALIDATION_ERROR"));
}

// =============================================================================
// Deals endpoint
// =============================================================================

#[tokio::test]
async fn unfiltered_deals_are_idempotent() {
    let user = seeded_user(Uuid::new_v4());
    let token = token_for(&user).await;

    let seeded = vec![seeded_deal("Earbuds", 1499.0), seeded_deal("Charger", 699.0)];

    let mut deals = MockDealRepository::new();
    deals
        .expect_find_in_range()
        .returning(move |_| Ok(seeded.clone()));

    let router = app(
        MockUserRepository::new(),
        deals,
        MockOrderRepository::new(),
        MockPaymentRepository::new(),
        Arc::new(StubNlp {
            intent: Intent::Unknown,
        }),
    );

    let (first_status, first) = send(&router, authed_get("/api/app/deals", &token)).await;
    let (second_status, second) = send(&router, authed_get("/api/app/deals", &token)).await;

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first["data"], second["data"]);
    assert_eq!(first["data"]["deals"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn non_numeric_price_parameter_is_rejected() {
    let user = seeded_user(Uuid::new_v4());
    let token = token_for(&user).await;

    let router = app(
        MockUserRepository::new(),
        MockDealRepository::new(),
        MockOrderRepository::new(),
        MockPaymentRepository::new(),
        Arc::new(StubNlp {
            intent: Intent::Unknown,
        }),
    );

    let (status, body) = send(&router, authed_get("/api/app/deals?minPrice=cheap", &token)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("VALIDATION_ERROR"));
}

// =============================================================================
// Payments endpoint
// =============================================================================

#[tokio::test]
async fn payments_are_joined_with_their_order_details() {
    let user = seeded_user(Uuid::new_v4());
    let user_id = user.id;
    let token = token_for(&user).await;

    let mut payments = MockPaymentRepository::new();
    payments.expect_find_for_user().returning(move |_| {
        let order = seeded_order(user_id, "Monitor", OrderStatus::Confirmed);
        let payment = shopbot_api::domain::Payment {
            id: Uuid::new_v4(),
            order_id: order.id,
            amount_paid: 300.0,
            pending_amount: 200.0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        Ok(vec![(payment, Some(order))])
    });

    let router = app(
        MockUserRepository::new(),
        MockDealRepository::new(),
        MockOrderRepository::new(),
        payments,
        Arc::new(StubNlp {
            intent: Intent::Unknown,
        }),
    );

    let (status, body) = send(&router, authed_get("/api/app/payments", &token)).await;

    assert_eq!(status, StatusCode::OK);
    let records = body["data"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["status"], json!("pending"));
    assert_eq!(records[0]["amountPaid"], json!(300.0));
    assert_eq!(records[0]["orderDetails"]["productName"], json!("Monitor"));
}

// =============================================================================
// Chat endpoint
// =============================================================================

#[tokio::test]
async fn greeting_with_action_request_resolves_to_deals_data() {
    let user = seeded_user(Uuid::new_v4());
    let token = token_for(&user).await;

    let seeded = vec![seeded_deal("Earbuds", 1499.0)];
    let mut deals = MockDealRepository::new();
    deals
        .expect_find_in_range()
        .returning(move |_| Ok(seeded.clone()));

    // The classifier resolves "hello, show me deals" to DEALS (action
    // precedence); the stub plays that role here
    let router = app(
        MockUserRepository::new(),
        deals,
        MockOrderRepository::new(),
        MockPaymentRepository::new(),
        Arc::new(StubNlp {
            intent: Intent::Deals,
        }),
    );

    let request = Request::builder()
        .method("POST")
        .uri("/api/app/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(
            json!({"message": "hello, show me deals"}).to_string(),
        ))
        .unwrap();

    let (status, body) = send(&router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["intent"], json!("DEALS"));
    assert_eq!(body["data"]["deals"].as_array().unwrap().len(), 1);
    assert!(body["data"]["sessionId"]
        .as_str()
        .is_some_and(|s| s.starts_with("session_")));
}

#[tokio::test]
async fn provider_failure_never_escapes_the_chat_boundary() {
    let user = seeded_user(Uuid::new_v4());
    let token = token_for(&user).await;

    // Real NLP service over a provider that always errors
    let mut llm = MockLlmClient::new();
    llm.expect_complete().returning(|_| {
        Err(LlmError::Api {
            status: 500,
            message: "provider exploded".to_string(),
        })
    });
    let nlp = Arc::new(GroqNlp::new(Arc::new(llm)));

    let router = app(
        MockUserRepository::new(),
        MockDealRepository::new(),
        MockOrderRepository::new(),
        MockPaymentRepository::new(),
        nlp,
    );

    let request = Request::builder()
        .method("POST")
        .uri("/api/app/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(json!({"message": "show me deals"}).to_string()))
        .unwrap();

    let (status, body) = send(&router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["intent"], json!("UNKNOWN"));
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
}

#[tokio::test]
async fn empty_chat_message_is_validation_error() {
    let user = seeded_user(Uuid::new_v4());
    let token = token_for(&user).await;

    let router = app(
        MockUserRepository::new(),
        MockDealRepository::new(),
        MockOrderRepository::new(),
        MockPaymentRepository::new(),
        Arc::new(StubNlp {
            intent: Intent::Unknown,
        }),
    );

    let request = Request::builder()
        .method("POST")
        .uri("/api/app/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(json!({"message": ""}).to_string()))
        .unwrap();

    let (status, body) = send(&router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("VALIDATION_ERROR"));
}

#[tokio::test]
async fn protected_routes_require_a_bearer_token() {
    let router = app(
        MockUserRepository::new(),
        MockDealRepository::new(),
        MockOrderRepository::new(),
        MockPaymentRepository::new(),
        Arc::new(StubNlp {
            intent: Intent::Unknown,
        }),
    );

    for uri in ["/api/app/deals", "/api/app/orders", "/api/app/payments"] {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&router, request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["error"], json!("UNAUTHORIZED"), "{uri}");
    }
}
