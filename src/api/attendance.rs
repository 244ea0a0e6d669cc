use std::future::Future;
use std::time::{Duration, Instant};

use actix_web::rt::time::timeout;
use actix_web::{HttpResponse, web};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use utoipa::ToSchema;

use crate::config::Config;
use crate::error::{ApiError, ApiResult, ErrorBody};
use crate::hours::{whole_seconds, worked_hours};
use crate::model::attendance::{Attendance, ClockOut, NewClockIn};
use crate::store::{AttendanceStore, StoreResult};

#[derive(Deserialize, Serialize, ToSchema)]
pub struct ClockInRequest {
    #[schema(example = "2024-05-01", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "09:00:00", format = "time", value_type = String)]
    pub in_time: NaiveTime,
    #[schema(example = 7)]
    pub employee_id: u64,
    #[schema(example = "https://cdn.example.com/in/7-20240501.jpg")]
    pub in_photo: Option<String>,
    #[schema(example = "23.8103,90.4125")]
    pub in_latlong: Option<String>,
}

#[derive(Deserialize, Serialize, ToSchema)]
pub struct ClockOutRequest {
    #[schema(example = "2024-05-01", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "17:30:00", format = "time", value_type = String)]
    pub out_time: NaiveTime,
    pub out_photo: Option<String>,
    #[schema(example = "23.8103,90.4125")]
    pub out_latlong: Option<String>,
    /// Free text, e.g. "present" or "half-day"
    #[schema(example = "present")]
    pub status: Option<String>,
}

/// One request's time budget, shared by every store call the handler makes.
struct Deadline {
    started: Instant,
    budget: Duration,
}

impl Deadline {
    fn start(config: &Config) -> Self {
        Self {
            started: Instant::now(),
            budget: config.request_timeout,
        }
    }

    /// Runs one store call in what is left of the budget and logs failures.
    async fn run<T>(
        &self,
        op: &'static str,
        call: impl Future<Output = StoreResult<T>>,
    ) -> ApiResult<T> {
        let remaining = self.budget.saturating_sub(self.started.elapsed());

        match timeout(remaining, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                let e = ApiError::from(e);
                if let ApiError::Store(inner) = &e {
                    error!(error = %inner, op, "Store call failed");
                }
                Err(e)
            }
            Err(_) => {
                warn!(op, timeout = ?self.budget, "Request deadline exceeded");
                Err(ApiError::Timeout)
            }
        }
    }
}

/// List all attendance records
#[utoipa::path(
    get,
    path = "/api/attendance",
    responses(
        (status = 200, description = "All records, newest date first", body = [Attendance]),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    store: web::Data<dyn AttendanceStore>,
    config: web::Data<Config>,
) -> ApiResult<HttpResponse> {
    let records = Deadline::start(&config).run("list_all", store.list_all()).await?;

    debug!(count = records.len(), "Fetched attendances");
    Ok(HttpResponse::Ok().json(records))
}

/// List attendance records of one employee
#[utoipa::path(
    get,
    path = "/api/attendance/by-employee/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Records of the employee, possibly empty", body = [Attendance]),
        (status = 400, description = "Invalid employee ID", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Attendance"
)]
pub async fn list_by_employee(
    store: web::Data<dyn AttendanceStore>,
    config: web::Data<Config>,
    path: web::Path<u64>,
) -> ApiResult<HttpResponse> {
    let employee_id = path.into_inner();

    let records = Deadline::start(&config)
        .run("list_by_employee", store.list_by_employee(employee_id))
        .await?;

    // no records is a valid answer, not a 404
    debug!(employee_id, count = records.len(), "Fetched attendances by employee");
    Ok(HttpResponse::Ok().json(records))
}

/// Get one attendance record
#[utoipa::path(
    get,
    path = "/api/attendance/{id}",
    params(
        ("id", Path, description = "Attendance ID")
    ),
    responses(
        (status = 200, description = "Attendance found", body = Attendance),
        (status = 404, description = "Attendance not found", body = ErrorBody, example = json!({
            "error": "Attendance not found"
        })),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Attendance"
)]
pub async fn get_attendance(
    store: web::Data<dyn AttendanceStore>,
    config: web::Data<Config>,
    path: web::Path<u64>,
) -> ApiResult<HttpResponse> {
    let id = path.into_inner();

    match Deadline::start(&config).run("get", store.get(id)).await? {
        Some(record) => Ok(HttpResponse::Ok().json(record)),
        None => Err(ApiError::NotFound("Attendance not found".to_string())),
    }
}

/// Clock in
#[utoipa::path(
    post,
    path = "/api/attendance/clock-in",
    request_body = ClockInRequest,
    responses(
        (status = 201, description = "Clocked in", body = Attendance),
        (status = 400, description = "Missing or malformed field", body = ErrorBody),
        (status = 409, description = "Open session already exists on this date", body = ErrorBody, example = json!({
            "error": "Employee already has an open session on this date"
        })),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Attendance"
)]
pub async fn clock_in(
    store: web::Data<dyn AttendanceStore>,
    config: web::Data<Config>,
    payload: web::Json<ClockInRequest>,
) -> ApiResult<HttpResponse> {
    let ClockInRequest {
        date,
        in_time,
        employee_id,
        in_photo,
        in_latlong,
    } = payload.into_inner();

    let (in_photo, in_latlong) = if config.extended_fields {
        (in_photo, in_latlong)
    } else {
        (None, None)
    };

    // TIME columns hold whole seconds
    let in_time = whole_seconds(in_time);

    let record = Deadline::start(&config)
        .run(
            "clock_in",
            store.clock_in(NewClockIn {
                employee_id,
                date,
                in_time,
                in_photo,
                in_latlong,
            }),
        )
        .await?;

    info!(id = record.id, employee_id, %date, "Clocked in");
    Ok(HttpResponse::Created().json(record))
}

/// Clock out
#[utoipa::path(
    put,
    path = "/api/attendance/clock-out/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    request_body = ClockOutRequest,
    responses(
        (status = 200, description = "Clocked out", body = Attendance),
        (status = 400, description = "Missing field or out_time before in_time", body = ErrorBody),
        (status = 404, description = "No clock-in for that date", body = ErrorBody, example = json!({
            "error": "No clock-in record found for this employee on the given date."
        })),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "Attendance"
)]
pub async fn clock_out(
    store: web::Data<dyn AttendanceStore>,
    config: web::Data<Config>,
    path: web::Path<u64>,
    payload: web::Json<ClockOutRequest>,
) -> ApiResult<HttpResponse> {
    let employee_id = path.into_inner();
    let ClockOutRequest {
        date,
        out_time,
        out_photo,
        out_latlong,
        status,
    } = payload.into_inner();

    // TIME columns hold whole seconds; hours must agree with what is stored
    let out_time = whole_seconds(out_time);
    let deadline = Deadline::start(&config);

    let existing = deadline
        .run("find_for_day", store.find_for_day(employee_id, date))
    .await?
    .ok_or_else(|| {
        ApiError::NotFound(
            "No clock-in record found for this employee on the given date.".to_string(),
        )
    })?;

    if !existing.is_open() {
        debug!(id = existing.id, employee_id, "Overwriting earlier clock-out");
    }

    // always from the stored in_time
    let total_hours = worked_hours(existing.in_time, out_time, config.overnight_policy)?;

    let change = if config.extended_fields {
        ClockOut {
            out_time,
            total_hours: Some(total_hours),
            out_photo,
            out_latlong,
            status,
        }
    } else {
        ClockOut {
            out_time,
            total_hours: Some(total_hours),
            out_photo: None,
            out_latlong: None,
            status: None,
        }
    };

    let record = deadline
        .run("clock_out", store.clock_out(existing.id, change))
        .await?;

    info!(id = record.id, employee_id, %date, total_hours, "Clocked out");
    Ok(HttpResponse::Ok().json(record))
}
