use billflow::config::BackendConfig;
use billflow::domain::analytics::AnalyticsPeriod;
use billflow::domain::money::MinorUnits;
use billflow::domain::order::{Customer, OrderRequest};
use billflow::domain::payment::VerificationPayload;
use billflow::domain::plan::Plan;
use billflow::domain::ports::BillingBackend;
use billflow::domain::transaction::TransactionStatus;
use billflow::error::BillingError;
use billflow::infrastructure::http::HttpBackend;
use chrono::Utc;
use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn backend(server: &MockServer) -> HttpBackend {
    HttpBackend::new(&BackendConfig::new(format!("{}/api/payments/", server.uri()))).unwrap()
}

#[tokio::test]
async fn test_history_passes_limit_and_keeps_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/payments/history"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "history": [
                {"created_at": 1700000100, "order_id": "order_b", "amount": 149900,
                 "currency": "INR", "status": "captured", "method": "upi"},
                {"created_at": 1700000000, "order_id": "order_a", "amount": 49900,
                 "currency": "INR", "status": "authorized"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let history = backend(&server).await.fetch_history(2).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].order_id, "order_b");
    assert_eq!(history[0].amount, MinorUnits(149_900));
    assert_eq!(history[1].status, TransactionStatus::Unknown);
}

#[tokio::test]
async fn test_analytics_passes_period() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/payments/analytics"))
        .and(query_param("period", "week"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_transactions": 4,
            "successful_transactions": 3,
            "failed_transactions": 1,
            "total_amount": 299700,
            "period": "week",
            "currency": "INR"
        })))
        .mount(&server)
        .await;

    let summary = backend(&server)
        .await
        .fetch_analytics(AnalyticsPeriod::Week)
        .await
        .unwrap();
    assert_eq!(summary.successful_transactions, 3);
    assert_eq!(summary.pending_transactions, 0);
    assert_eq!(summary.total_amount, dec!(299700));
}

#[tokio::test]
async fn test_read_failure_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/payments/history"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "database offline"})))
        .mount(&server)
        .await;

    let err = backend(&server).await.fetch_history(10).await.unwrap_err();
    assert!(matches!(
        err,
        BillingError::Network { ref message } if message == "database offline"
    ));
}

#[tokio::test]
async fn test_create_order_sends_paise_and_notes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/payments/order"))
        .and(body_partial_json(json!({
            "amount": 149900,
            "currency": "INR",
            "notes": {"plan_id": "pro", "customer_email": "asha@example.com"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "order_42", "amount": 149900, "currency": "INR"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let plan = Plan::find("pro").unwrap();
    let request = OrderRequest::for_plan(plan, Customer::new("Asha", "asha@example.com"), Utc::now());
    let order = backend(&server).await.create_order(&request).await.unwrap();
    assert_eq!(order.id, "order_42");
    assert_eq!(order.amount, MinorUnits(149_900));
}

#[tokio::test]
async fn test_create_order_surfaces_backend_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/payments/order"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"error": {"description": "Amount exceeds limit"}})),
        )
        .mount(&server)
        .await;

    let plan = Plan::find("enterprise").unwrap();
    let request = OrderRequest::for_plan(plan, Customer::new("Asha", "asha@example.com"), Utc::now());
    let err = backend(&server).await.create_order(&request).await.unwrap_err();
    assert_eq!(err.to_string(), "Amount exceeds limit");
    assert!(matches!(err, BillingError::OrderCreation { .. }));
}

#[tokio::test]
async fn test_create_order_falls_back_on_opaque_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/payments/order"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let plan = Plan::find("basic").unwrap();
    let request = OrderRequest::for_plan(plan, Customer::new("Asha", "asha@example.com"), Utc::now());
    let err = backend(&server).await.create_order(&request).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to create order");
}

#[tokio::test]
async fn test_verify_sends_camel_case_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/payments/verify"))
        .and(body_json(json!({
            "orderId": "order_42",
            "paymentId": "pay_7",
            "signature": "sig",
            "planId": "pro"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"verified": true})))
        .expect(1)
        .mount(&server)
        .await;

    let payload = VerificationPayload {
        order_id: "order_42".to_string(),
        payment_id: "pay_7".to_string(),
        signature: "sig".to_string(),
        plan_id: Some("pro".to_string()),
    };
    let result = backend(&server).await.verify_payment(&payload).await.unwrap();
    assert!(result.verified);
    assert_eq!(result.message, None);
}

#[tokio::test]
async fn test_verify_error_uses_message_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/payments/verify"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid signature"})))
        .mount(&server)
        .await;

    let payload = VerificationPayload {
        order_id: "order_42".to_string(),
        payment_id: "pay_7".to_string(),
        signature: "forged".to_string(),
        plan_id: None,
    };
    let err = backend(&server).await.verify_payment(&payload).await.unwrap_err();
    assert!(matches!(
        err,
        BillingError::Verification { ref message } if message == "Invalid signature"
    ));
}
