#![allow(dead_code)]
use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use attendance_api::config::Config;
use attendance_api::model::attendance::{Attendance, ClockOut, NewClockIn};
use attendance_api::store::{AttendanceStore, MemoryStore, StoreError, StoreResult};
use chrono::NaiveDate;

/// Config with a placeholder database URL plus the given overrides.
pub fn test_config(overrides: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert("DATABASE_URL".into(), "mysql://test@localhost/unused".into());
    for (k, v) in overrides {
        vars.insert(k.to_string(), v.to_string());
    }
    Config::from_lookup(|key| vars.get(key).cloned()).expect("test config")
}

/// Builds the routed service over `$store` (any `Arc<impl AttendanceStore>`).
macro_rules! test_app {
    ($store:expr, $config:expr) => {{
        let store: std::sync::Arc<dyn attendance_api::store::AttendanceStore> = $store;
        let config: attendance_api::config::Config = $config;
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(attendance_api::routes::cors())
                .app_data(actix_web::web::Data::from(store))
                .app_data(actix_web::web::Data::new(config.clone()))
                .configure(|cfg| attendance_api::routes::configure(cfg, &config)),
        )
        .await
    }};
}
pub(crate) use test_app;

/// Delays every call, for deadline tests.
pub struct SlowStore {
    pub inner: MemoryStore,
    pub delay: Duration,
}

impl SlowStore {
    async fn nap(&self) {
        actix_web::rt::time::sleep(self.delay).await;
    }
}

#[async_trait]
impl AttendanceStore for SlowStore {
    async fn list_all(&self) -> StoreResult<Vec<Attendance>> {
        self.nap().await;
        self.inner.list_all().await
    }

    async fn list_by_employee(&self, employee_id: u64) -> StoreResult<Vec<Attendance>> {
        self.nap().await;
        self.inner.list_by_employee(employee_id).await
    }

    async fn get(&self, id: u64) -> StoreResult<Option<Attendance>> {
        self.nap().await;
        self.inner.get(id).await
    }

    async fn clock_in(&self, new: NewClockIn) -> StoreResult<Attendance> {
        self.nap().await;
        self.inner.clock_in(new).await
    }

    async fn find_for_day(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> StoreResult<Option<Attendance>> {
        self.nap().await;
        self.inner.find_for_day(employee_id, date).await
    }

    async fn clock_out(&self, id: u64, change: ClockOut) -> StoreResult<Attendance> {
        self.nap().await;
        self.inner.clock_out(id, change).await
    }

    async fn ping(&self) -> StoreResult<()> {
        self.nap().await;
        self.inner.ping().await
    }
}

/// Every call fails as if the pool were exhausted.
pub struct BrokenStore;

fn unavailable<T>() -> StoreResult<T> {
    Err(StoreError::Database(sqlx::Error::PoolTimedOut))
}

#[async_trait]
impl AttendanceStore for BrokenStore {
    async fn list_all(&self) -> StoreResult<Vec<Attendance>> {
        unavailable()
    }

    async fn list_by_employee(&self, _employee_id: u64) -> StoreResult<Vec<Attendance>> {
        unavailable()
    }

    async fn get(&self, _id: u64) -> StoreResult<Option<Attendance>> {
        unavailable()
    }

    async fn clock_in(&self, _new: NewClockIn) -> StoreResult<Attendance> {
        unavailable()
    }

    async fn find_for_day(
        &self,
        _employee_id: u64,
        _date: NaiveDate,
    ) -> StoreResult<Option<Attendance>> {
        unavailable()
    }

    async fn clock_out(&self, _id: u64, _change: ClockOut) -> StoreResult<Attendance> {
        unavailable()
    }

    async fn ping(&self) -> StoreResult<()> {
        unavailable()
    }
}
