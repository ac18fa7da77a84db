//! Weekly CRM report.
//!
//! Aggregates customer count, order count and total revenue. Revenue is
//! always summed from the returned order amounts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{JobResult, JobSpec};
use crate::remote::{Operation, RemoteClient};

pub const WEEKLY_REPORT_JOB: &str = "weekly-report";

const REPORT_QUERY: &str = r#"
{
    allCustomers {
        totalCount
    }
    allOrders {
        totalCount
        nodes {
            id
            totalAmount
        }
    }
}
"#;

pub struct WeeklyReportJob;

#[async_trait]
impl JobSpec for WeeklyReportJob {
    fn name(&self) -> &str {
        WEEKLY_REPORT_JOB
    }

    async fn run(&self, now: DateTime<Utc>, client: &RemoteClient) -> JobResult {
        let operation = Operation::query(REPORT_QUERY);

        let data = match client.execute(&operation).await {
            Ok(data) => data,
            Err(e) => return JobResult::from_remote_error(WEEKLY_REPORT_JOB, now, e),
        };

        let total_customers = data
            .pointer("/allCustomers/totalCount")
            .and_then(|v| v.as_u64())
            .unwrap_or(0);
        let total_orders = data
            .pointer("/allOrders/totalCount")
            .and_then(|v| v.as_u64())
            .unwrap_or(0);

        let total_revenue: f64 = data
            .pointer("/allOrders/nodes")
            .and_then(|v| v.as_array())
            .map(|orders| {
                orders
                    .iter()
                    .filter_map(|order| order.get("totalAmount").and_then(|v| v.as_f64()))
                    .sum()
            })
            .unwrap_or(0.0);

        let summary = format!(
            "Report: {} customers, {} orders, {} total revenue",
            total_customers, total_orders, total_revenue
        );
        JobResult::success(WEEKLY_REPORT_JOB, now, summary, Vec::new())
    }
}
