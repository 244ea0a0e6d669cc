use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::NaiveDate;

use super::{AttendanceStore, StoreError, StoreResult};
use crate::model::attendance::{Attendance, ClockOut, NewClockIn};

/// In-process store with the same semantics as the `attendances` table,
/// including at most one open session per employee and date.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    last_id: u64,
    rows: BTreeMap<u64, Attendance>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn newest_first(mut rows: Vec<Attendance>) -> Vec<Attendance> {
    rows.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    rows
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn list_all(&self) -> StoreResult<Vec<Attendance>> {
        Ok(newest_first(self.read().rows.values().cloned().collect()))
    }

    async fn list_by_employee(&self, employee_id: u64) -> StoreResult<Vec<Attendance>> {
        let rows = self
            .read()
            .rows
            .values()
            .filter(|a| a.employee_id == employee_id)
            .cloned()
            .collect();
        Ok(newest_first(rows))
    }

    async fn get(&self, id: u64) -> StoreResult<Option<Attendance>> {
        Ok(self.read().rows.get(&id).cloned())
    }

    async fn clock_in(&self, new: NewClockIn) -> StoreResult<Attendance> {
        let mut inner = self.write();

        if inner
            .rows
            .values()
            .any(|a| a.employee_id == new.employee_id && a.date == new.date && a.is_open())
        {
            return Err(StoreError::Duplicate);
        }

        inner.last_id += 1;
        let record = Attendance {
            id: inner.last_id,
            employee_id: new.employee_id,
            date: new.date,
            in_time: new.in_time,
            out_time: None,
            total_hours: None,
            status: None,
            in_photo: new.in_photo,
            out_photo: None,
            in_latlong: new.in_latlong,
            out_latlong: None,
        };
        inner.rows.insert(record.id, record.clone());

        Ok(record)
    }

    async fn find_for_day(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> StoreResult<Option<Attendance>> {
        let inner = self.read();
        let mut same_day = inner
            .rows
            .values()
            .rev()
            .filter(|a| a.employee_id == employee_id && a.date == date);

        let open = same_day.clone().find(|a| a.is_open());
        Ok(open.or_else(|| same_day.next()).cloned())
    }

    async fn clock_out(&self, id: u64, change: ClockOut) -> StoreResult<Attendance> {
        let mut inner = self.write();
        let record = inner.rows.get_mut(&id).ok_or(StoreError::Missing(id))?;

        record.out_time = Some(change.out_time);
        if change.total_hours.is_some() {
            record.total_hours = change.total_hours;
        }
        if change.out_photo.is_some() {
            record.out_photo = change.out_photo;
        }
        if change.out_latlong.is_some() {
            record.out_latlong = change.out_latlong;
        }
        if change.status.is_some() {
            record.status = change.status;
        }

        Ok(record.clone())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn nine() -> NaiveTime {
        NaiveTime::from_hms_opt(9, 0, 0).unwrap()
    }

    fn clock_in_for(employee_id: u64, date: &str) -> NewClockIn {
        NewClockIn {
            employee_id,
            date: day(date),
            in_time: nine(),
            in_photo: None,
            in_latlong: None,
        }
    }

    #[actix_web::test]
    async fn ids_are_assigned_in_sequence() {
        let store = MemoryStore::new();
        let a = store.clock_in(clock_in_for(1, "2024-01-01")).await.unwrap();
        let b = store.clock_in(clock_in_for(2, "2024-01-01")).await.unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert!(a.is_open());
    }

    #[actix_web::test]
    async fn second_open_session_same_day_is_duplicate() {
        let store = MemoryStore::new();
        store.clock_in(clock_in_for(1, "2024-01-01")).await.unwrap();

        let err = store.clock_in(clock_in_for(1, "2024-01-01")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate));
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn new_session_allowed_after_clock_out() {
        let store = MemoryStore::new();
        let morning = store.clock_in(clock_in_for(1, "2024-01-01")).await.unwrap();
        let change = ClockOut {
            out_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
            total_hours: Some(3.0),
            out_photo: None,
            out_latlong: None,
            status: None,
        };
        store.clock_out(morning.id, change).await.unwrap();

        let afternoon = store.clock_in(clock_in_for(1, "2024-01-01")).await.unwrap();
        assert_ne!(afternoon.id, morning.id);

        let target = store.find_for_day(1, day("2024-01-01")).await.unwrap().unwrap();
        assert_eq!(target.id, afternoon.id);
    }

    #[actix_web::test]
    async fn clock_out_keeps_fields_it_was_not_given() {
        let store = MemoryStore::new();
        let rec = store.clock_in(clock_in_for(1, "2024-01-01")).await.unwrap();

        let first = ClockOut {
            out_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            total_hours: Some(8.0),
            out_photo: Some("out.jpg".into()),
            out_latlong: None,
            status: Some("present".into()),
        };
        store.clock_out(rec.id, first).await.unwrap();

        let second = ClockOut {
            out_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            total_hours: Some(9.0),
            out_photo: None,
            out_latlong: None,
            status: None,
        };
        let updated = store.clock_out(rec.id, second).await.unwrap();

        assert_eq!(updated.total_hours, Some(9.0));
        assert_eq!(updated.out_photo.as_deref(), Some("out.jpg"));
        assert_eq!(updated.status.as_deref(), Some("present"));
    }

    #[actix_web::test]
    async fn clock_out_of_unknown_id_is_missing() {
        let store = MemoryStore::new();
        let change = ClockOut {
            out_time: nine(),
            total_hours: None,
            out_photo: None,
            out_latlong: None,
            status: None,
        };

        let err = store.clock_out(42, change).await.unwrap_err();
        assert!(matches!(err, StoreError::Missing(42)));
    }
}
