use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tessera_catalog::geocode::map_search_url;
use tessera_catalog::inventory::{self, InventoryError};
use tessera_core::notify::{InlineQr, Notification, NotificationSender};
use tessera_core::repository::{BookingRepository, EventRepository, RepoError, UserRepository};
use tessera_shared::{Booking, BookingStatus, Event, Ticket, User};
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("Event not found: {0}")]
    EventNotFound(Uuid),

    #[error("Booking not found: {0}")]
    BookingNotFound(Uuid),

    #[error("Only {available} tickets available, but {requested} requested")]
    Capacity { requested: i32, available: i32 },

    #[error("Payment was not successful, booking aborted")]
    PaymentFailed,

    #[error("This booking does not belong to the user: {0}")]
    Forbidden(Uuid),

    #[error("Booking is already cancelled")]
    AlreadyCancelled,

    #[error("{0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Store(String),
}

impl From<RepoError> for BookingError {
    fn from(e: RepoError) -> Self {
        BookingError::Store(e.to_string())
    }
}

/// The `/api/bookEvent` request body. The payment flag is supplied by
/// the client after the gateway redirect; the orchestrator only checks
/// it, it does not verify the payment itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub ticket_count: i32,
    pub ticket_price: f64,
    pub total_ticket_price: f64,
    pub payment_status: bool,
}

/// Booking plus the user and event snapshots taken while booking
#[derive(Debug, Clone, Serialize)]
pub struct BookingConfirmation {
    pub booking: Booking,
    pub user: User,
    pub event: Event,
}

/// Coordinates a booking across the record store, the inventory
/// counters, and the notification dispatcher.
///
/// The booking write and the event write-back are two independent
/// persistence calls with no shared transaction; a crash between them
/// leaves a skewed availability count (a known property of the
/// upstream system, preserved here).
pub struct BookingOrchestrator {
    users: Arc<dyn UserRepository>,
    events: Arc<dyn EventRepository>,
    bookings: Arc<dyn BookingRepository>,
    mailer: Arc<dyn NotificationSender>,
}

impl BookingOrchestrator {
    pub fn new(
        users: Arc<dyn UserRepository>,
        events: Arc<dyn EventRepository>,
        bookings: Arc<dyn BookingRepository>,
        mailer: Arc<dyn NotificationSender>,
    ) -> Self {
        Self {
            users,
            events,
            bookings,
            mailer,
        }
    }

    pub async fn book_event(
        &self,
        request: BookingRequest,
    ) -> Result<BookingConfirmation, BookingError> {
        if request.ticket_count < 1 {
            return Err(BookingError::Validation(
                "Ticket count must be positive".to_string(),
            ));
        }

        let user = self
            .users
            .get_user(request.user_id)
            .await?
            .ok_or(BookingError::UserNotFound(request.user_id))?;

        let mut event = self
            .events
            .get_event(request.event_id)
            .await?
            .ok_or(BookingError::EventNotFound(request.event_id))?;

        if request.ticket_count > event.available_tickets {
            return Err(BookingError::Capacity {
                requested: request.ticket_count,
                available: event.available_tickets,
            });
        }

        if !request.payment_status {
            return Err(BookingError::PaymentFailed);
        }

        let tickets: Vec<Ticket> = (0..request.ticket_count)
            .map(|_| Ticket::issue(event.id, request.ticket_price))
            .collect();
        let booking = Booking::new(user.id, tickets, request.total_ticket_price);

        self.bookings.create_booking(&booking).await?;

        inventory::reserve(&mut event, request.ticket_count).map_err(|e| match e {
            InventoryError::Insufficient {
                requested,
                available,
            } => BookingError::Capacity {
                requested,
                available,
            },
            InventoryError::InvalidCount(_) => BookingError::Validation(e.to_string()),
        })?;
        self.events.update_event(&event).await?;

        // Confirmation email is best-effort: log the failure, keep the booking
        if let Err(e) = self
            .mailer
            .send(&confirmation_email(&booking, &user, &event))
            .await
        {
            warn!("Failed to send confirmation email to {}: {}", user.email, e);
        }

        Ok(BookingConfirmation {
            booking,
            user,
            event,
        })
    }

    pub async fn cancel_booking(
        &self,
        booking_id: Uuid,
        user_id: Uuid,
    ) -> Result<Booking, BookingError> {
        let mut booking = self
            .bookings
            .get_booking(booking_id)
            .await?
            .ok_or(BookingError::BookingNotFound(booking_id))?;

        if booking.user_id != user_id {
            return Err(BookingError::Forbidden(user_id));
        }

        if booking.status == BookingStatus::Cancelled {
            return Err(BookingError::AlreadyCancelled);
        }

        let user = self
            .users
            .get_user(user_id)
            .await?
            .ok_or(BookingError::UserNotFound(user_id))?;

        // The booking's event is reachable only through its tickets
        let event_id = booking
            .tickets
            .first()
            .map(|t| t.event_id)
            .ok_or_else(|| BookingError::Store(format!("Booking {} has no tickets", booking.id)))?;
        let mut event = self
            .events
            .get_event(event_id)
            .await?
            .ok_or(BookingError::EventNotFound(event_id))?;

        booking.cancel();
        self.bookings.update_booking(&booking).await?;

        inventory::release(&mut event, booking.ticket_count)
            .map_err(|e| BookingError::Store(e.to_string()))?;
        self.events.update_event(&event).await?;

        // Cancellation email is best-effort as well
        if let Err(e) = self
            .mailer
            .send(&cancellation_email(&booking, &user, &event))
            .await
        {
            warn!("Failed to send cancellation email to {}: {}", user.email, e);
        }

        Ok(booking)
    }
}

fn event_vars(user: &User, event: &Event) -> HashMap<String, String> {
    let mut vars = HashMap::new();
    vars.insert("userName".to_string(), user.full_name());
    vars.insert("eventName".to_string(), event.name.clone());
    vars.insert(
        "eventDate".to_string(),
        event.starts_at.format("%b %d, %Y at %I:%M %p").to_string(),
    );
    vars.insert("eventAddress".to_string(), event.street_address());
    vars.insert(
        "eventInstruction".to_string(),
        event
            .instructions
            .clone()
            .unwrap_or_else(|| "No specific instructions provided.".to_string()),
    );
    vars.insert("mapUrl".to_string(), map_search_url(&event.street_address()));
    vars
}

fn confirmation_email(booking: &Booking, user: &User, event: &Event) -> Notification {
    let qr_codes = booking
        .tickets
        .iter()
        .filter_map(|ticket| {
            ticket.qr_payload.clone().map(|payload| InlineQr {
                content_id: format!("qr-{}", ticket.id),
                payload,
            })
        })
        .collect();

    Notification {
        to: user.email.clone(),
        subject: format!("Booking Confirmation - {}", event.name),
        template: "booking-confirmation".to_string(),
        vars: event_vars(user, event),
        qr_codes,
    }
}

fn cancellation_email(_booking: &Booking, user: &User, event: &Event) -> Notification {
    Notification {
        to: user.email.clone(),
        subject: format!("Booking Cancelled - {}", event.name),
        template: "booking-cancellation".to_string(),
        vars: event_vars(user, event),
        qr_codes: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Mutex;
    use tessera_store::MemoryStore;

    /// Captures outbound notifications; optionally fails every send
    struct RecordingSender {
        sent: Mutex<Vec<Notification>>,
        fail: bool,
    }

    impl RecordingSender {
        fn new(fail: bool) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    #[async_trait::async_trait]
    impl NotificationSender for RecordingSender {
        async fn send(
            &self,
            notification: &Notification,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            if self.fail {
                return Err("smtp unreachable".into());
            }
            self.sent.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }

    struct Fixture {
        orchestrator: BookingOrchestrator,
        store: Arc<MemoryStore>,
        sender: Arc<RecordingSender>,
        user: User,
        event: Event,
    }

    async fn fixture(available: i32, failing_mailer: bool) -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let sender = Arc::new(RecordingSender::new(failing_mailer));

        let user = User {
            id: Uuid::new_v4(),
            first_name: "Casey".to_string(),
            last_name: "Customer".to_string(),
            email: "casey@example.com".to_string(),
            phone: None,
            role: tessera_shared::UserRole::Customer,
            password_hash: String::new(),
            created_at: Utc::now(),
        };
        store.create_user(&user).await.unwrap();

        let event = Event {
            id: Uuid::new_v4(),
            name: "Orchestra Night".to_string(),
            description: None,
            organizer_id: Uuid::new_v4(),
            capacity: available,
            available_tickets: available,
            ticket_price: 40.0,
            starts_at: Utc::now(),
            address: "12 Concert Hall Way".to_string(),
            city: "Portland".to_string(),
            state: "OR".to_string(),
            zip_code: "97201".to_string(),
            instructions: None,
            category: None,
            attendees: 0,
            banner_image: None,
            location: None,
        };
        store.create_event(&event).await.unwrap();

        let orchestrator = BookingOrchestrator::new(
            store.clone(),
            store.clone(),
            store.clone(),
            sender.clone(),
        );

        Fixture {
            orchestrator,
            store,
            sender,
            user,
            event,
        }
    }

    fn request(fx: &Fixture, count: i32, payment_status: bool) -> BookingRequest {
        BookingRequest {
            user_id: fx.user.id,
            event_id: fx.event.id,
            ticket_count: count,
            ticket_price: 40.0,
            total_ticket_price: 40.0 * count as f64,
            payment_status,
        }
    }

    #[tokio::test]
    async fn test_book_event_moves_inventory() {
        let fx = fixture(5, false).await;

        let confirmation = fx
            .orchestrator
            .book_event(request(&fx, 3, true))
            .await
            .unwrap();

        assert_eq!(confirmation.booking.tickets.len(), 3);
        assert_eq!(confirmation.booking.status, BookingStatus::Confirmed);
        assert_eq!(confirmation.event.available_tickets, 2);
        assert_eq!(confirmation.event.attendees, 3);

        // And the store agrees with the snapshot
        let stored = fx.store.get_event(fx.event.id).await.unwrap().unwrap();
        assert_eq!(stored.available_tickets, 2);
        assert_eq!(stored.attendees, 3);

        let sent = fx.sender.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Booking Confirmation - Orchestra Night");
        assert_eq!(sent[0].qr_codes.len(), 3);
    }

    #[tokio::test]
    async fn test_book_event_rejects_oversubscription() {
        let fx = fixture(2, false).await;

        let err = fx
            .orchestrator
            .book_event(request(&fx, 3, true))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            BookingError::Capacity {
                requested: 3,
                available: 2
            }
        ));

        let stored = fx.store.get_event(fx.event.id).await.unwrap().unwrap();
        assert_eq!(stored.available_tickets, 2);
        assert_eq!(stored.attendees, 0);
    }

    #[tokio::test]
    async fn test_failed_payment_creates_nothing() {
        let fx = fixture(5, false).await;

        let err = fx
            .orchestrator
            .book_event(request(&fx, 2, false))
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::PaymentFailed));

        let stored = fx.store.get_event(fx.event.id).await.unwrap().unwrap();
        assert_eq!(stored.available_tickets, 5);
        assert!(fx
            .store
            .list_confirmed_by_user(fx.user.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_unknown_user_and_event_are_not_found() {
        let fx = fixture(5, false).await;

        let mut bad_user = request(&fx, 1, true);
        bad_user.user_id = Uuid::new_v4();
        assert!(matches!(
            fx.orchestrator.book_event(bad_user).await.unwrap_err(),
            BookingError::UserNotFound(_)
        ));

        let mut bad_event = request(&fx, 1, true);
        bad_event.event_id = Uuid::new_v4();
        assert!(matches!(
            fx.orchestrator.book_event(bad_event).await.unwrap_err(),
            BookingError::EventNotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_mailer_failure_does_not_fail_booking() {
        let fx = fixture(5, true).await;

        let confirmation = fx
            .orchestrator
            .book_event(request(&fx, 1, true))
            .await
            .unwrap();
        assert_eq!(confirmation.event.available_tickets, 4);
    }

    #[tokio::test]
    async fn test_cancel_restores_inventory_and_rejects_repeat() {
        let fx = fixture(5, false).await;
        let confirmation = fx
            .orchestrator
            .book_event(request(&fx, 3, true))
            .await
            .unwrap();
        let booking_id = confirmation.booking.id;

        let cancelled = fx
            .orchestrator
            .cancel_booking(booking_id, fx.user.id)
            .await
            .unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);

        let stored = fx.store.get_event(fx.event.id).await.unwrap().unwrap();
        assert_eq!(stored.available_tickets, 5);
        assert_eq!(stored.attendees, 0);

        // Second cancel is rejected and leaves state unchanged
        let err = fx
            .orchestrator
            .cancel_booking(booking_id, fx.user.id)
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::AlreadyCancelled));

        let stored = fx.store.get_event(fx.event.id).await.unwrap().unwrap();
        assert_eq!(stored.available_tickets, 5);

        let sent = fx.sender.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].subject, "Booking Cancelled - Orchestra Night");
    }

    #[tokio::test]
    async fn test_cancel_requires_owning_user() {
        let fx = fixture(5, false).await;
        let confirmation = fx
            .orchestrator
            .book_event(request(&fx, 1, true))
            .await
            .unwrap();

        let err = fx
            .orchestrator
            .cancel_booking(confirmation.booking.id, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_zero_ticket_request_is_rejected_up_front() {
        let fx = fixture(5, false).await;

        let err = fx
            .orchestrator
            .book_event(request(&fx, 0, true))
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));
    }
}
