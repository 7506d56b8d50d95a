use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Booking lifecycle: one-way CONFIRMED → CANCELLED, no re-confirmation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }
}

/// One admission unit within a booking, never shared across bookings.
///
/// Ids are `"T"` plus eight uuid hex chars: unique in practice, not by
/// construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub price: f64,
    pub event_id: Uuid,
    pub qr_payload: Option<String>,
}

impl Ticket {
    /// Mint a ticket with a fresh identifier; the QR payload is the id
    pub fn issue(event_id: Uuid, price: f64) -> Self {
        let id = format!("T{}", &Uuid::new_v4().simple().to_string()[..8]);
        Self {
            qr_payload: Some(id.clone()),
            id,
            price,
            event_id,
        }
    }
}

/// A purchase of one or more tickets for one event by one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub ticket_count: i32,
    pub total_price: f64,
    pub tickets: Vec<Ticket>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Create a CONFIRMED booking atomically with its ticket list
    pub fn new(user_id: Uuid, tickets: Vec<Ticket>, total_price: f64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            ticket_count: tickets.len() as i32,
            total_price,
            tickets,
            status: BookingStatus::Confirmed,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn cancel(&mut self) {
        self.status = BookingStatus::Cancelled;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_id_shape() {
        let ticket = Ticket::issue(Uuid::new_v4(), 25.0);
        assert!(ticket.id.starts_with('T'));
        assert_eq!(ticket.id.len(), 9);
        assert_eq!(ticket.qr_payload.as_deref(), Some(ticket.id.as_str()));
    }

    #[test]
    fn test_booking_starts_confirmed() {
        let event_id = Uuid::new_v4();
        let tickets = vec![Ticket::issue(event_id, 10.0), Ticket::issue(event_id, 10.0)];
        let mut booking = Booking::new(Uuid::new_v4(), tickets, 20.0);

        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.ticket_count, 2);

        booking.cancel();
        assert_eq!(booking.status, BookingStatus::Cancelled);
    }
}
