use crate::api::attendance::{ClockInRequest, ClockOutRequest};
use crate::error::ErrorBody;
use crate::model::attendance::Attendance;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance API",
        version = "0.1.0",
        description = r#"
## Employee Attendance

Records employee **clock-in** and **clock-out** events and computes worked hours.

### 🔹 Operations
- List all attendance records, newest date first
- List the records of one employee (an empty list when there are none)
- Fetch one record by id
- Clock in: creates the day's record for an employee
- Clock out: closes the day's record and derives `total_hours`

### 📦 Response Format
- JSON bodies with snake_case field names
- Every error is `{"error": "<message>"}`

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::list_attendance,
        crate::api::attendance::list_by_employee,
        crate::api::attendance::get_attendance,
        crate::api::attendance::clock_in,
        crate::api::attendance::clock_out,

        crate::api::health::health
    ),
    components(
        schemas(
            Attendance,
            ClockInRequest,
            ClockOutRequest,
            ErrorBody
        )
    ),
    tags(
        (name = "Attendance", description = "Clock-in / clock-out APIs"),
        (name = "Health", description = "Service health"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_attendance_route_is_documented() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/api/attendance",
            "/api/attendance/by-employee/{employee_id}",
            "/api/attendance/{id}",
            "/api/attendance/clock-in",
            "/api/attendance/clock-out/{employee_id}",
        ] {
            assert!(paths.contains_key(path), "missing {path}");
        }
    }
}
