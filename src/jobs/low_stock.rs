//! Low-stock reconciliation.
//!
//! Asks the CRM to restock every product under its own threshold; the engine
//! never recomputes the threshold locally. The mutation is idempotent on the
//! server side: a second run with no intervening sales simply updates zero
//! products, which is still a Success.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{JobResult, JobSpec};
use crate::remote::{Operation, RemoteClient};

pub const LOW_STOCK_JOB: &str = "low-stock";

const UPDATE_LOW_STOCK_MUTATION: &str = r#"
mutation {
    updateLowStockProducts {
        message
        updatedProducts {
            id
            name
            stock
        }
    }
}
"#;

pub struct LowStockJob;

#[async_trait]
impl JobSpec for LowStockJob {
    fn name(&self) -> &str {
        LOW_STOCK_JOB
    }

    async fn run(&self, now: DateTime<Utc>, client: &RemoteClient) -> JobResult {
        let operation = Operation::query(UPDATE_LOW_STOCK_MUTATION);

        // No business-level retry here: the transport already retried, and
        // re-issuing a mutation past that point risks double application.
        let data = match client.execute(&operation).await {
            Ok(data) => data,
            Err(e) => return JobResult::from_remote_error(LOW_STOCK_JOB, now, e),
        };

        let updates = &data["updateLowStockProducts"];
        let message = updates
            .get("message")
            .and_then(|v| v.as_str())
            .unwrap_or("No message returned");

        let mut detail_lines = Vec::new();
        if let Some(products) = updates.get("updatedProducts").and_then(|v| v.as_array()) {
            for product in products {
                let name = product.get("name").and_then(|v| v.as_str()).unwrap_or("?");
                let stock = product.get("stock").and_then(|v| v.as_i64()).unwrap_or(0);
                detail_lines.push(format!("{} → Stock: {}", name, stock));
            }
        }

        let summary = format!("{} (updated_count={})", message, detail_lines.len());
        JobResult::success(LOW_STOCK_JOB, now, summary, detail_lines)
    }
}
