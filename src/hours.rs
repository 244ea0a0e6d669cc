use chrono::{Duration, NaiveTime, Timelike};
use strum::{Display, EnumString};
use thiserror::Error;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// What to do when a clock-out time is earlier than the stored clock-in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum OvernightPolicy {
    /// Refuse the clock-out; nothing is written.
    #[default]
    Reject,
    /// The shift ended on the following calendar day.
    NextDay,
}

#[derive(Debug, Error, PartialEq)]
pub enum HoursError {
    #[error("out_time {out_time} is earlier than in_time {in_time}")]
    EndsBeforeStart {
        in_time: NaiveTime,
        out_time: NaiveTime,
    },
}

/// Drops the sub-second part, matching what a `TIME` column keeps.
pub fn whole_seconds(time: NaiveTime) -> NaiveTime {
    time.with_nanosecond(0).unwrap_or(time)
}

/// Fractional hours between two wall-clock times of one shift.
pub fn worked_hours(
    in_time: NaiveTime,
    out_time: NaiveTime,
    policy: OvernightPolicy,
) -> Result<f64, HoursError> {
    let mut elapsed = out_time.signed_duration_since(in_time);

    if elapsed < Duration::zero() {
        match policy {
            OvernightPolicy::Reject => {
                return Err(HoursError::EndsBeforeStart { in_time, out_time });
            }
            OvernightPolicy::NextDay => elapsed = elapsed + Duration::days(1),
        }
    }

    Ok(elapsed.num_milliseconds() as f64 / MILLIS_PER_HOUR)
}
