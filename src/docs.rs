use crate::api::attendance::{
    AttendanceListResponse, AttendancePayload, AttendanceQuery, CheckInResponse,
};
use crate::api::bonus::{BonusFilter, BonusListResponse, BonusResponse, CreateBonus};
use crate::api::employee::{CreateEmployee, EmployeeListResponse, RegisterDevice};
use crate::api::office::{AddWifi, CreateOffice, UpdateOffice};
use crate::api::review::{RejectReview, ReviewFilter, ReviewListResponse};
use crate::api::salary::{CreateSalarySlip, SalaryListResponse, SalaryQuery};
use crate::engine::rules::RuleOutcomes;
use crate::engine::score::{Decision, ReviewPriority, ValidationResult};
use crate::model::attendance::AttendanceRecord;
use crate::model::employee::{Employee, RegisteredDevice};
use crate::model::office::{ApprovedWifi, OfficeLocation};
use crate::model::review::ReviewTask;
use utoipa::OpenApi;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Geofenced Attendance API",
        version = "1.0.0",
        description = r#"
## Geofenced Attendance System

This API powers an employee attendance system with geofence validation.

### 🔹 Key Features
- **Attendance**
  - GPS + selfie check-in/check-out inside an office geofence
  - Weighted validation score over location, wifi, device and work-hour signals
  - Auto-approval at or above the score threshold, manual review below it
- **Review Queue**
  - Priority-banded queue of sub-threshold attempts for HR/Admin decisions
- **Employee & Device Management**
  - Employee profiles and per-employee registered device fingerprints
- **Bonus & Salary**
  - Bonus request workflow and salary slip generation

### 🔐 Security
All endpoints are protected using **JWT Bearer authentication** issued by the
company identity service. Admin/HR roles gate the management operations.

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::my_attendance,

        crate::api::review::review_list,
        crate::api::review::approve_review,
        crate::api::review::reject_review,

        crate::api::office::create_office,
        crate::api::office::update_office,
        crate::api::office::get_office,
        crate::api::office::list_offices,
        crate::api::office::add_wifi,
        crate::api::office::list_wifi,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::register_device,
        crate::api::employee::list_devices,
        crate::api::employee::revoke_device,

        crate::api::bonus::create_bonus,
        crate::api::bonus::bonus_list,
        crate::api::bonus::approve_bonus,
        crate::api::bonus::reject_bonus,

        crate::api::salary::create_salary_slip,
        crate::api::salary::get_salary_slip,
        crate::api::salary::list_salary_slips
    ),
    components(
        schemas(
            AttendancePayload,
            AttendanceQuery,
            AttendanceListResponse,
            AttendanceRecord,
            CheckInResponse,
            RuleOutcomes,
            Decision,
            ReviewPriority,
            ValidationResult,
            ReviewFilter,
            ReviewListResponse,
            ReviewTask,
            RejectReview,
            CreateOffice,
            UpdateOffice,
            AddWifi,
            OfficeLocation,
            ApprovedWifi,
            CreateEmployee,
            Employee,
            EmployeeListResponse,
            RegisterDevice,
            RegisteredDevice,
            CreateBonus,
            BonusResponse,
            BonusFilter,
            BonusListResponse,
            CreateSalarySlip,
            SalaryQuery,
            SalaryListResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Attendance", description = "Check-in/check-out with geofence validation"),
        (name = "Review", description = "Manual review queue APIs"),
        (name = "Office", description = "Office geofence management APIs"),
        (name = "Employee", description = "Employee and device management APIs"),
        (name = "Bonus", description = "Bonus request workflow APIs"),
        (name = "Salary", description = "Salary slip APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
