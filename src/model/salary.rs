use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct SalarySlip {
    pub id: u64,
    pub employee_id: u64,
    #[schema(example = "2026-03-01", value_type = String, format = "date")]
    pub month: NaiveDate,
    pub base_salary: f64,
    /// Sum of approved bonus requests for the month
    pub bonus_total: f64,
    pub deductions: f64,
    pub net_salary: f64,
}
