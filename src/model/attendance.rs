use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One row of the `attendances` table: a single work session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_id": 7,
        "date": "2024-05-01",
        "in_time": "09:00:00",
        "out_time": "17:30:00",
        "total_hours": 8.5,
        "status": "present",
        "in_photo": null,
        "out_photo": null,
        "in_latlong": "23.8103,90.4125",
        "out_latlong": "23.8103,90.4125"
    })
)]
pub struct Attendance {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 7)]
    pub employee_id: u64,

    #[schema(example = "2024-05-01", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "09:00:00", value_type = String, format = "time")]
    pub in_time: NaiveTime,

    #[schema(example = "17:30:00", value_type = Option<String>, format = "time")]
    pub out_time: Option<NaiveTime>,

    #[schema(example = 8.5)]
    pub total_hours: Option<f64>,

    #[schema(example = "present")]
    pub status: Option<String>,

    pub in_photo: Option<String>,
    pub out_photo: Option<String>,
    pub in_latlong: Option<String>,
    pub out_latlong: Option<String>,
}

impl Attendance {
    pub fn is_open(&self) -> bool {
        self.out_time.is_none()
    }
}

/// Fields written by a clock-in.
#[derive(Debug, Clone, PartialEq)]
pub struct NewClockIn {
    pub employee_id: u64,
    pub date: NaiveDate,
    pub in_time: NaiveTime,
    pub in_photo: Option<String>,
    pub in_latlong: Option<String>,
}

/// Fields written by a clock-out. `None` keeps the stored value.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockOut {
    pub out_time: NaiveTime,
    pub total_hours: Option<f64>,
    pub out_photo: Option<String>,
    pub out_latlong: Option<String>,
    pub status: Option<String>,
}
