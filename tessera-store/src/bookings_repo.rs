use async_trait::async_trait;
use sqlx::PgPool;
use tessera_core::repository::{BookingRepository, RepoError};
use tessera_shared::{Booking, BookingStatus, Ticket};
use uuid::Uuid;

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying; the ticket list lives in a
// JSONB column, mirroring the document shape of the upstream store.
#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    user_id: Uuid,
    ticket_count: i32,
    total_price: f64,
    tickets: serde_json::Value,
    status: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl BookingRow {
    fn into_booking(self) -> Result<Booking, RepoError> {
        let status = match self.status.as_str() {
            "CONFIRMED" => BookingStatus::Confirmed,
            "CANCELLED" => BookingStatus::Cancelled,
            other => return Err(format!("Unknown booking status: {}", other).into()),
        };

        let tickets: Vec<Ticket> = serde_json::from_value(self.tickets)?;

        Ok(Booking {
            id: self.id,
            user_id: self.user_id,
            ticket_count: self.ticket_count,
            total_price: self.total_price,
            tickets,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn create_booking(&self, booking: &Booking) -> Result<Uuid, RepoError> {
        sqlx::query(
            r#"
            INSERT INTO bookings (id, user_id, ticket_count, total_price, tickets, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(booking.id)
        .bind(booking.user_id)
        .bind(booking.ticket_count)
        .bind(booking.total_price)
        .bind(serde_json::to_value(&booking.tickets)?)
        .bind(booking.status.as_str())
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(booking.id)
    }

    async fn get_booking(&self, id: Uuid) -> Result<Option<Booking>, RepoError> {
        let row = sqlx::query_as::<_, BookingRow>(
            "SELECT id, user_id, ticket_count, total_price, tickets, status, created_at, updated_at FROM bookings WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(BookingRow::into_booking).transpose()
    }

    async fn update_booking(&self, booking: &Booking) -> Result<(), RepoError> {
        sqlx::query(
            "UPDATE bookings SET ticket_count = $2, total_price = $3, tickets = $4, status = $5, updated_at = $6 WHERE id = $1",
        )
        .bind(booking.id)
        .bind(booking.ticket_count)
        .bind(booking.total_price)
        .bind(serde_json::to_value(&booking.tickets)?)
        .bind(booking.status.as_str())
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_confirmed_by_user(&self, user_id: Uuid) -> Result<Vec<Booking>, RepoError> {
        let rows = sqlx::query_as::<_, BookingRow>(
            "SELECT id, user_id, ticket_count, total_price, tickets, status, created_at, updated_at FROM bookings WHERE user_id = $1 AND status = 'CONFIRMED' ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(BookingRow::into_booking).collect()
    }
}
