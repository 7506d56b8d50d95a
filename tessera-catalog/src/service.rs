use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tessera_core::repository::{BookingRepository, EventRepository, RepoError, UserRepository};
use tessera_shared::{Event, EventPatch};
use uuid::Uuid;

use crate::geocode::Geocoder;

/// Decoded banner limit; estimated from the base64 length without
/// actually decoding the payload.
const MAX_BANNER_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Event not found: {0}")]
    EventNotFound(Uuid),

    #[error("Organizer not found: {0}")]
    OrganizerNotFound(Uuid),

    #[error("{0}")]
    Validation(String),

    #[error("User {0} is not authorized to update this event")]
    Forbidden(Uuid),

    #[error("Storage error: {0}")]
    Store(String),
}

impl From<RepoError> for CatalogError {
    fn from(e: RepoError) -> Self {
        CatalogError::Store(e.to_string())
    }
}

/// Organizer-supplied fields for a new listing
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDraft {
    pub name: String,
    pub description: Option<String>,
    pub organizer_id: Uuid,
    pub capacity: i32,
    pub ticket_price: f64,
    pub starts_at: DateTime<Utc>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub instructions: Option<String>,
    pub category: Option<String>,
    pub banner_image: Option<String>,
}

/// Event CRUD plus the derived lookups the frontend needs
pub struct EventCatalog {
    users: Arc<dyn UserRepository>,
    events: Arc<dyn EventRepository>,
    bookings: Arc<dyn BookingRepository>,
    geocoder: Geocoder,
}

impl EventCatalog {
    pub fn new(
        users: Arc<dyn UserRepository>,
        events: Arc<dyn EventRepository>,
        bookings: Arc<dyn BookingRepository>,
        geocoder: Geocoder,
    ) -> Self {
        Self {
            users,
            events,
            bookings,
            geocoder,
        }
    }

    /// Publish a new event with a full, untouched capacity
    pub async fn create_event(&self, draft: EventDraft) -> Result<Event, CatalogError> {
        if self.users.get_user(draft.organizer_id).await?.is_none() {
            return Err(CatalogError::OrganizerNotFound(draft.organizer_id));
        }

        if draft.capacity < 1 {
            return Err(CatalogError::Validation(
                "Event capacity must be positive".to_string(),
            ));
        }

        let address_fields = [&draft.address, &draft.city, &draft.state, &draft.zip_code];
        if address_fields.iter().any(|f| f.trim().is_empty()) {
            return Err(CatalogError::Validation(
                "Address, city, state, and zip code are required".to_string(),
            ));
        }

        if let Some(banner) = &draft.banner_image {
            if banner.len() * 3 / 4 > MAX_BANNER_BYTES {
                return Err(CatalogError::Validation(
                    "Event banner image is too large. Max size allowed is 2MB".to_string(),
                ));
            }
        }

        let mut event = Event {
            id: Uuid::new_v4(),
            name: draft.name,
            description: draft.description,
            organizer_id: draft.organizer_id,
            capacity: draft.capacity,
            available_tickets: draft.capacity,
            ticket_price: draft.ticket_price,
            starts_at: draft.starts_at,
            address: draft.address,
            city: draft.city,
            state: draft.state,
            zip_code: draft.zip_code,
            instructions: draft.instructions,
            category: draft.category,
            attendees: 0,
            banner_image: draft.banner_image,
            location: None,
        };

        self.geocoder.annotate(&mut event).await;
        self.events.create_event(&event).await?;

        Ok(event)
    }

    pub async fn list_events(&self) -> Result<Vec<Event>, CatalogError> {
        Ok(self.events.list_events().await?)
    }

    pub async fn get_event(&self, id: Uuid) -> Result<Event, CatalogError> {
        self.events
            .get_event(id)
            .await?
            .ok_or(CatalogError::EventNotFound(id))
    }

    pub async fn list_by_organizer(&self, organizer_id: Uuid) -> Result<Vec<Event>, CatalogError> {
        Ok(self.events.list_by_organizer(organizer_id).await?)
    }

    /// Events the user holds a CONFIRMED booking for, deduplicated via
    /// the bookings' ticket references
    pub async fn events_by_user(&self, user_id: Uuid) -> Result<Vec<Event>, CatalogError> {
        let bookings = self.bookings.list_confirmed_by_user(user_id).await?;

        let mut event_ids: Vec<Uuid> = Vec::new();
        for booking in &bookings {
            for ticket in &booking.tickets {
                if !event_ids.contains(&ticket.event_id) {
                    event_ids.push(ticket.event_id);
                }
            }
        }

        let mut events = Vec::new();
        for id in event_ids {
            if let Some(event) = self.events.get_event(id).await? {
                events.push(event);
            }
        }

        Ok(events)
    }

    /// Apply an organizer's edits. A capacity change shifts
    /// `available_tickets` by the same delta, floored at zero so a
    /// shrink below the sold count cannot go negative.
    pub async fn update_event(
        &self,
        event_id: Uuid,
        patch: EventPatch,
        user_id: Uuid,
    ) -> Result<Event, CatalogError> {
        let mut event = self
            .events
            .get_event(event_id)
            .await?
            .ok_or(CatalogError::EventNotFound(event_id))?;

        if event.organizer_id != user_id {
            return Err(CatalogError::Forbidden(user_id));
        }

        if let Some(description) = patch.description {
            event.description = Some(description);
        }
        if let Some(price) = patch.ticket_price {
            event.ticket_price = price;
        }
        if let Some(starts_at) = patch.starts_at {
            event.starts_at = starts_at;
        }
        if let Some(address) = patch.address {
            event.address = address;
        }
        if let Some(city) = patch.city {
            event.city = city;
        }
        if let Some(state) = patch.state {
            event.state = state;
        }
        if let Some(zip_code) = patch.zip_code {
            event.zip_code = zip_code;
        }
        if let Some(instructions) = patch.instructions {
            event.instructions = Some(instructions);
        }
        if let Some(capacity) = patch.capacity {
            let diff = capacity - event.capacity;
            event.capacity = capacity;
            event.available_tickets = (event.available_tickets + diff).max(0);
        }

        self.geocoder.annotate(&mut event).await;
        self.events.update_event(&event).await?;

        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tessera_shared::{User, UserRole};
    use tessera_store::MemoryStore;

    fn catalog_with_store() -> (EventCatalog, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let catalog = EventCatalog::new(
            store.clone(),
            store.clone(),
            store.clone(),
            Geocoder::disabled(),
        );
        (catalog, store)
    }

    async fn seeded_organizer(store: &Arc<MemoryStore>) -> User {
        let organizer = User {
            id: Uuid::new_v4(),
            first_name: "Olive".to_string(),
            last_name: "Organizer".to_string(),
            email: "olive@example.com".to_string(),
            phone: None,
            role: UserRole::Manager,
            password_hash: String::new(),
            created_at: Utc::now(),
        };
        UserRepository::create_user(store.as_ref(), &organizer)
            .await
            .unwrap();
        organizer
    }

    fn draft(organizer_id: Uuid, capacity: i32) -> EventDraft {
        EventDraft {
            name: "Rust Meetup".to_string(),
            description: Some("Talks and pizza".to_string()),
            organizer_id,
            capacity,
            ticket_price: 15.0,
            starts_at: Utc::now(),
            address: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: "62701".to_string(),
            instructions: None,
            category: Some("Tech".to_string()),
            banner_image: None,
        }
    }

    #[tokio::test]
    async fn test_create_event_initializes_counters() {
        let (catalog, store) = catalog_with_store();
        let organizer = seeded_organizer(&store).await;

        let event = catalog.create_event(draft(organizer.id, 50)).await.unwrap();

        assert_eq!(event.capacity, 50);
        assert_eq!(event.available_tickets, 50);
        assert_eq!(event.attendees, 0);
        assert!(event.location.is_none());
    }

    #[tokio::test]
    async fn test_create_event_requires_known_organizer() {
        let (catalog, _store) = catalog_with_store();

        let result = catalog.create_event(draft(Uuid::new_v4(), 50)).await;
        assert!(matches!(result, Err(CatalogError::OrganizerNotFound(_))));
    }

    #[tokio::test]
    async fn test_create_event_rejects_oversized_banner() {
        let (catalog, store) = catalog_with_store();
        let organizer = seeded_organizer(&store).await;

        let mut oversized = draft(organizer.id, 50);
        oversized.banner_image = Some("A".repeat(3 * 1024 * 1024));

        let result = catalog.create_event(oversized).await;
        assert!(matches!(result, Err(CatalogError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_event_rejects_non_organizer() {
        let (catalog, store) = catalog_with_store();
        let organizer = seeded_organizer(&store).await;
        let event = catalog.create_event(draft(organizer.id, 50)).await.unwrap();

        let result = catalog
            .update_event(event.id, EventPatch::default(), Uuid::new_v4())
            .await;
        assert!(matches!(result, Err(CatalogError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_capacity_change_shifts_availability() {
        let (catalog, store) = catalog_with_store();
        let organizer = seeded_organizer(&store).await;
        let event = catalog.create_event(draft(organizer.id, 50)).await.unwrap();

        let grown = catalog
            .update_event(
                event.id,
                EventPatch {
                    capacity: Some(60),
                    ..EventPatch::default()
                },
                organizer.id,
            )
            .await
            .unwrap();
        assert_eq!(grown.capacity, 60);
        assert_eq!(grown.available_tickets, 60);

        // Shrinking far below the current availability floors at zero
        let shrunk = catalog
            .update_event(
                event.id,
                EventPatch {
                    capacity: Some(5),
                    ..EventPatch::default()
                },
                organizer.id,
            )
            .await
            .unwrap();
        assert_eq!(shrunk.capacity, 5);
        assert_eq!(shrunk.available_tickets, 5);
    }
}
