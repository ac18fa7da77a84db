//! Order-reminder scan.
//!
//! Read-only: finds orders placed in the last seven days and records one
//! reminder line per order. Trivially idempotent, so transport retries are
//! harmless here.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;

use super::{JobResult, JobSpec};
use crate::remote::{Operation, RemoteClient};
use crate::window::TimeWindow;

pub const ORDER_REMINDERS_JOB: &str = "order-reminders";

const REMINDER_WINDOW_DAYS: i64 = 7;

const RECENT_ORDERS_QUERY: &str = r#"
query RecentOrders($since: Date!) {
    orders(orderDate_Gte: $since) {
        id
        customer {
            email
        }
    }
}
"#;

pub struct OrderRemindersJob;

#[async_trait]
impl JobSpec for OrderRemindersJob {
    fn name(&self) -> &str {
        ORDER_REMINDERS_JOB
    }

    async fn run(&self, now: DateTime<Utc>, client: &RemoteClient) -> JobResult {
        // Window is recomputed from the execution instant on every run; a
        // delayed tick shifts it rather than catching up.
        let window = TimeWindow::last_days(now, REMINDER_WINDOW_DAYS);
        let since = window.start.format("%Y-%m-%d").to_string();

        let operation = Operation::with_variables(RECENT_ORDERS_QUERY, json!({ "since": since }));

        let data = match client.execute(&operation).await {
            Ok(data) => data,
            Err(e) => return JobResult::from_remote_error(ORDER_REMINDERS_JOB, now, e),
        };

        let mut detail_lines = Vec::new();
        if let Some(orders) = data.get("orders").and_then(|v| v.as_array()) {
            for order in orders {
                let id = order
                    .get("id")
                    .map(|v| match v.as_str() {
                        Some(s) => s.to_string(),
                        None => v.to_string(),
                    })
                    .unwrap_or_else(|| "?".to_string());
                // Orders without a contact still get a line; the reminder is
                // about the order, not the address.
                let email = order
                    .pointer("/customer/email")
                    .and_then(|v| v.as_str())
                    .unwrap_or("N/A");
                detail_lines.push(format!("Order ID: {}, Customer Email: {}", id, email));
            }
        }

        let summary = format!("orders={} (since {})", detail_lines.len(), since);
        JobResult::success(ORDER_REMINDERS_JOB, now, summary, detail_lines)
    }
}
