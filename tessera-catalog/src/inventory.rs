use tessera_shared::Event;

/// Seat-counter adjustments for bookings and cancellations.
///
/// Callers read the event, adjust it here, and write it back through
/// the repository; there is no locking between the read and the
/// write-back, so two concurrent reservations can both observe stale
/// availability. That race exists in the upstream system and is kept.

#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("Only {available} tickets available, but {requested} requested")]
    Insufficient { requested: i32, available: i32 },

    #[error("Ticket count must be positive, got {0}")]
    InvalidCount(i32),
}

/// Take `count` tickets off the event's availability.
///
/// Fails without touching either counter when `count` exceeds
/// `available_tickets`.
pub fn reserve(event: &mut Event, count: i32) -> Result<(), InventoryError> {
    if count < 1 {
        return Err(InventoryError::InvalidCount(count));
    }

    if count > event.available_tickets {
        return Err(InventoryError::Insufficient {
            requested: count,
            available: event.available_tickets,
        });
    }

    event.available_tickets -= count;
    event.attendees += count;

    Ok(())
}

/// Return `count` tickets to the event's availability.
///
/// `available_tickets` is capped at capacity and `attendees` floored at
/// zero, so a double release cannot invert the counters.
pub fn release(event: &mut Event, count: i32) -> Result<(), InventoryError> {
    if count < 1 {
        return Err(InventoryError::InvalidCount(count));
    }

    event.available_tickets = (event.available_tickets + count).min(event.capacity);
    event.attendees = (event.attendees - count).max(0);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn event_with_availability(capacity: i32, available: i32) -> Event {
        Event {
            id: Uuid::new_v4(),
            name: "Test Event".to_string(),
            description: None,
            organizer_id: Uuid::new_v4(),
            capacity,
            available_tickets: available,
            ticket_price: 25.0,
            starts_at: Utc::now(),
            address: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: "62701".to_string(),
            instructions: None,
            category: None,
            attendees: capacity - available,
            banner_image: None,
            location: None,
        }
    }

    #[test]
    fn test_reserve_moves_counters() {
        let mut event = event_with_availability(10, 10);

        reserve(&mut event, 3).unwrap();
        assert_eq!(event.available_tickets, 7);
        assert_eq!(event.attendees, 3);

        reserve(&mut event, 7).unwrap();
        assert_eq!(event.available_tickets, 0);
        assert_eq!(event.attendees, 10);
    }

    #[test]
    fn test_reserve_rejects_oversubscription() {
        let mut event = event_with_availability(10, 2);

        let err = reserve(&mut event, 3).unwrap_err();
        assert!(matches!(
            err,
            InventoryError::Insufficient {
                requested: 3,
                available: 2
            }
        ));

        // Counters untouched after a failed reservation
        assert_eq!(event.available_tickets, 2);
        assert_eq!(event.attendees, 8);
    }

    #[test]
    fn test_release_restores_counters() {
        let mut event = event_with_availability(10, 10);

        reserve(&mut event, 4).unwrap();
        release(&mut event, 4).unwrap();

        assert_eq!(event.available_tickets, 10);
        assert_eq!(event.attendees, 0);
    }

    #[test]
    fn test_release_never_inverts_counters() {
        let mut event = event_with_availability(10, 10);

        // Nothing reserved; a stray release must not push availability
        // past capacity or attendees below zero.
        release(&mut event, 5).unwrap();
        assert_eq!(event.available_tickets, 10);
        assert_eq!(event.attendees, 0);
    }

    #[test]
    fn test_non_positive_counts_rejected() {
        let mut event = event_with_availability(10, 10);

        assert!(reserve(&mut event, 0).is_err());
        assert!(release(&mut event, -2).is_err());
        assert_eq!(event.available_tickets, 10);
        assert_eq!(event.attendees, 0);
    }
}
