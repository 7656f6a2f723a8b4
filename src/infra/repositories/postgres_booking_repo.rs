use crate::domain::{
    models::booking::{Booking, BookingFilter},
    ports::{BookingDetail, BookingRepository},
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

const DETAIL_SELECT: &str = "SELECT b.*, c.name AS cabin_name, u.username AS therapist_username \
     FROM bookings b \
     JOIN cabins c ON c.id = b.cabin_id \
     LEFT JOIN users u ON u.id = b.therapist_id";

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &BookingFilter) {
    qb.push(" WHERE 1 = 1");
    if filter.open_slots_only {
        qb.push(" AND b.status = 'available' AND b.therapist_id IS NULL");
    }
    if let Some(cabin_id) = &filter.cabin_id {
        qb.push(" AND b.cabin_id = ").push_bind(cabin_id.clone());
    }
    if let Some(therapist_id) = &filter.therapist_id {
        qb.push(" AND b.therapist_id = ").push_bind(therapist_id.clone());
    }
    if let Some(status) = &filter.status {
        qb.push(" AND b.status = ").push_bind(status.clone());
    }
    if let Some(start_from) = filter.start_from {
        qb.push(" AND b.start_time >= ").push_bind(start_from);
    }
    if let Some(start_before) = filter.start_before {
        qb.push(" AND b.start_time < ").push_bind(start_before);
    }
    if let Some(end_before) = filter.end_before {
        qb.push(" AND b.end_time < ").push_bind(end_before);
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn create(&self, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, cabin_id, therapist_id, start_time, end_time, status, price_cents, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *"
        )
            .bind(&booking.id)
            .bind(&booking.cabin_id)
            .bind(&booking.therapist_id)
            .bind(booking.start_time)
            .bind(booking.end_time)
            .bind(&booking.status)
            .bind(booking.price_cents)
            .bind(booking.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_open_slot(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE id = $1 AND status = 'available' AND therapist_id IS NULL"
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_detail(&self, id: &str) -> Result<Option<BookingDetail>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(DETAIL_SELECT);
        qb.push(" WHERE b.id = ").push_bind(id.to_string());
        qb.build_query_as::<BookingDetail>()
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_details(&self, filter: &BookingFilter) -> Result<Vec<BookingDetail>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new(DETAIL_SELECT);
        push_filter(&mut qb, filter);
        qb.push(" ORDER BY b.start_time ASC");
        qb.build_query_as::<BookingDetail>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn claim(&self, id: &str, therapist_id: &str) -> Result<Option<Booking>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let claimed = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET therapist_id = $1, status = 'booked'
             WHERE id = $2 AND status = 'available' AND therapist_id IS NULL
             RETURNING *"
        )
            .bind(therapist_id)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(claimed)
    }

    async fn cancel_by_therapist(&self, id: &str, therapist_id: &str) -> Result<Option<Booking>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let cancelled = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = 'cancelled'
             WHERE id = $1 AND status = 'booked' AND therapist_id = $2
             RETURNING *"
        )
            .bind(id)
            .bind(therapist_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(cancelled)
    }

    async fn cancel_by_admin(&self, id: &str) -> Result<Option<Booking>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let cancelled = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status = 'cancelled'
             WHERE id = $1 AND status IN ('available', 'booked')
             RETURNING *"
        )
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(cancelled)
    }

    async fn delete_open_slot(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM bookings WHERE id = $1 AND status = 'available' AND therapist_id IS NULL"
        )
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        Ok(result.rows_affected() > 0)
    }
}
