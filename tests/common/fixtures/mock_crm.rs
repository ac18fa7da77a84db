//! Mock CRM GraphQL endpoint for testing.
//!
//! Responds to the engine's operations without a real backend. Operations are
//! matched on the query text inside the POST body.

use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct MockCrmServer {
    pub server: MockServer,
}

impl MockCrmServer {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/graphql", self.server.uri())
    }

    /// Heartbeat query answered with `{"hello": "ok"}`.
    pub async fn mock_heartbeat_ok(&self) {
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_string_contains("hello"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "hello": "ok" }
            })))
            .mount(&self.server)
            .await;
    }

    /// Low-stock mutation that updated the given (name, stock) pairs.
    pub async fn mock_low_stock_updates(&self, message: &str, products: &[(&str, i64)]) {
        let updated: Vec<_> = products
            .iter()
            .enumerate()
            .map(|(i, (name, stock))| {
                json!({ "id": format!("{}", i + 1), "name": name, "stock": stock })
            })
            .collect();

        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_string_contains("updateLowStockProducts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "updateLowStockProducts": {
                        "message": message,
                        "updatedProducts": updated
                    }
                }
            })))
            .mount(&self.server)
            .await;
    }

    /// Low-stock mutation with nothing under threshold and no server message.
    pub async fn mock_low_stock_nothing_to_do(&self) {
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_string_contains("updateLowStockProducts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "updateLowStockProducts": {
                        "message": null,
                        "updatedProducts": []
                    }
                }
            })))
            .mount(&self.server)
            .await;
    }

    /// Orders query; each entry is (id, Option<email>).
    pub async fn mock_orders(&self, orders: &[(&str, Option<&str>)]) {
        let orders: Vec<_> = orders
            .iter()
            .map(|(id, email)| {
                json!({
                    "id": id,
                    "customer": email.map(|e| json!({ "email": e }))
                })
            })
            .collect();

        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_string_contains("orders"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "orders": orders }
            })))
            .mount(&self.server)
            .await;
    }

    /// Report query with customer/order counts and per-order amounts.
    pub async fn mock_report(&self, customers: u64, amounts: &[f64]) {
        let nodes: Vec<_> = amounts
            .iter()
            .enumerate()
            .map(|(i, amount)| json!({ "id": format!("{}", i + 1), "totalAmount": amount }))
            .collect();

        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_string_contains("allCustomers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "allCustomers": { "totalCount": customers },
                    "allOrders": {
                        "totalCount": amounts.len(),
                        "nodes": nodes
                    }
                }
            })))
            .mount(&self.server)
            .await;
    }

    /// Every request gets a 5xx. Transient: the client retries these.
    pub async fn mock_server_error(&self) {
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&self.server)
            .await;
    }

    /// Every request stalls past the client timeout.
    pub async fn mock_stall(&self, delay: Duration) {
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(delay)
                    .set_body_json(json!({ "data": { "hello": "too late" } })),
            )
            .mount(&self.server)
            .await;
    }

    /// GraphQL validation error payload (HTTP 200). Non-transient: the client
    /// must not retry these.
    pub async fn mock_validation_error(&self, message: &str) {
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errors": [{ "message": message }]
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn request_count(&self) -> usize {
        self.server.received_requests().await.unwrap_or_default().len()
    }
}
