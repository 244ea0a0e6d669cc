use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::MySqlPool;

use super::{AttendanceStore, StoreError, StoreResult};
use crate::model::attendance::{Attendance, ClockOut, NewClockIn};

/// `attendances` table on MySQL. Every statement is parameterized.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

#[async_trait]
impl AttendanceStore for MySqlStore {
    async fn list_all(&self) -> StoreResult<Vec<Attendance>> {
        let rows = sqlx::query_as::<_, Attendance>(
            r#"
            SELECT *
            FROM attendances
            ORDER BY date DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn list_by_employee(&self, employee_id: u64) -> StoreResult<Vec<Attendance>> {
        let rows = sqlx::query_as::<_, Attendance>(
            r#"
            SELECT *
            FROM attendances
            WHERE employee_id = ?
            ORDER BY date DESC, id DESC
            "#,
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn get(&self, id: u64) -> StoreResult<Option<Attendance>> {
        let row = sqlx::query_as::<_, Attendance>(r#"SELECT * FROM attendances WHERE id = ?"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn clock_in(&self, new: NewClockIn) -> StoreResult<Attendance> {
        let result = sqlx::query(
            r#"
            INSERT INTO attendances (employee_id, date, in_time, in_photo, in_latlong)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.employee_id)
        .bind(new.date)
        .bind(new.in_time)
        .bind(new.in_photo)
        .bind(new.in_latlong)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            // unique (employee_id, date, open_flag): one open session per day
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return StoreError::Duplicate;
                }
            }
            StoreError::Database(e)
        })?;

        // No RETURNING on MySQL
        let id = result.last_insert_id();
        self.get(id).await?.ok_or(StoreError::Missing(id))
    }

    async fn find_for_day(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> StoreResult<Option<Attendance>> {
        let row = sqlx::query_as::<_, Attendance>(
            r#"
            SELECT *
            FROM attendances
            WHERE employee_id = ?
            AND date = ?
            ORDER BY out_time IS NULL DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(employee_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn clock_out(&self, id: u64, change: ClockOut) -> StoreResult<Attendance> {
        // Dropping `tx` on an early return rolls back and frees the connection.
        let mut tx = self.pool.begin().await?;

        let locked: Option<u64> =
            sqlx::query_scalar(r#"SELECT id FROM attendances WHERE id = ? FOR UPDATE"#)
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        if locked.is_none() {
            return Err(StoreError::Missing(id));
        }

        sqlx::query(
            r#"
            UPDATE attendances
            SET out_time = ?,
                total_hours = COALESCE(?, total_hours),
                out_photo = COALESCE(?, out_photo),
                out_latlong = COALESCE(?, out_latlong),
                status = COALESCE(?, status)
            WHERE id = ?
            "#,
        )
        .bind(change.out_time)
        .bind(change.total_hours)
        .bind(change.out_photo)
        .bind(change.out_latlong)
        .bind(change.status)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let updated =
            sqlx::query_as::<_, Attendance>(r#"SELECT * FROM attendances WHERE id = ?"#)
                .bind(id)
                .fetch_one(&mut *tx)
                .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
