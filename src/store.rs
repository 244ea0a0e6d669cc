//! Persistence boundary for attendance records.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::model::attendance::{Attendance, ClockOut, NewClockIn};

pub mod memory;
pub mod mysql;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The employee already has an open session on that date.
    #[error("open attendance already exists for this employee and date")]
    Duplicate,

    /// The record vanished between lookup and update.
    #[error("attendance {0} does not exist")]
    Missing(u64),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait AttendanceStore: Send + Sync + 'static {
    /// Every record, newest date first.
    async fn list_all(&self) -> StoreResult<Vec<Attendance>>;

    /// Records of one employee, newest date first. Empty when there are none.
    async fn list_by_employee(&self, employee_id: u64) -> StoreResult<Vec<Attendance>>;

    async fn get(&self, id: u64) -> StoreResult<Option<Attendance>>;

    /// Inserts a new open record and returns it with its generated id.
    async fn clock_in(&self, new: NewClockIn) -> StoreResult<Attendance>;

    /// The record a clock-out applies to: the open session of that day if
    /// there is one, otherwise the latest closed one.
    async fn find_for_day(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> StoreResult<Option<Attendance>>;

    /// Closes record `id` and returns it as stored afterwards.
    async fn clock_out(&self, id: u64, change: ClockOut) -> StoreResult<Attendance>;

    async fn ping(&self) -> StoreResult<()>;
}
