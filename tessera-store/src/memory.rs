use std::collections::HashMap;

use async_trait::async_trait;
use tessera_core::repository::{
    BookingRepository, EventRepository, RepoError, UserRepository,
};
use tessera_shared::{Booking, BookingStatus, Event, User};
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory record store, the default when no database is configured.
/// Also what the test suites run against.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Uuid, User>>,
    events: RwLock<HashMap<Uuid, Event>>,
    bookings: RwLock<HashMap<Uuid, Booking>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, user: &User) -> Result<Uuid, RepoError> {
        self.users.write().await.insert(user.id, user.clone());
        Ok(user.id)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, RepoError> {
        Ok(self.users.read().await.values().cloned().collect())
    }
}

#[async_trait]
impl EventRepository for MemoryStore {
    async fn create_event(&self, event: &Event) -> Result<Uuid, RepoError> {
        self.events.write().await.insert(event.id, event.clone());
        Ok(event.id)
    }

    async fn get_event(&self, id: Uuid) -> Result<Option<Event>, RepoError> {
        Ok(self.events.read().await.get(&id).cloned())
    }

    async fn list_events(&self) -> Result<Vec<Event>, RepoError> {
        Ok(self.events.read().await.values().cloned().collect())
    }

    async fn list_by_organizer(&self, organizer_id: Uuid) -> Result<Vec<Event>, RepoError> {
        Ok(self
            .events
            .read()
            .await
            .values()
            .filter(|event| event.organizer_id == organizer_id)
            .cloned()
            .collect())
    }

    async fn update_event(&self, event: &Event) -> Result<(), RepoError> {
        self.events.write().await.insert(event.id, event.clone());
        Ok(())
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn create_booking(&self, booking: &Booking) -> Result<Uuid, RepoError> {
        self.bookings
            .write()
            .await
            .insert(booking.id, booking.clone());
        Ok(booking.id)
    }

    async fn get_booking(&self, id: Uuid) -> Result<Option<Booking>, RepoError> {
        Ok(self.bookings.read().await.get(&id).cloned())
    }

    async fn update_booking(&self, booking: &Booking) -> Result<(), RepoError> {
        self.bookings
            .write()
            .await
            .insert(booking.id, booking.clone());
        Ok(())
    }

    async fn list_confirmed_by_user(&self, user_id: Uuid) -> Result<Vec<Booking>, RepoError> {
        Ok(self
            .bookings
            .read()
            .await
            .values()
            .filter(|booking| {
                booking.user_id == user_id && booking.status == BookingStatus::Confirmed
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tessera_shared::{Ticket, UserRole};

    #[tokio::test]
    async fn test_user_roundtrip_and_email_lookup() {
        let store = MemoryStore::new();
        let user = User {
            id: Uuid::new_v4(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: Some("555-0100".to_string()),
            role: UserRole::Manager,
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
        };

        store.create_user(&user).await.unwrap();

        let by_id = store.get_user(user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "ada@example.com");

        let by_email = store.find_by_email("ada@example.com").await.unwrap();
        assert!(by_email.is_some());
        assert!(store.find_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_confirmed_filter_excludes_cancelled() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let event_id = Uuid::new_v4();

        let confirmed = Booking::new(user_id, vec![Ticket::issue(event_id, 10.0)], 10.0);
        let mut cancelled = Booking::new(user_id, vec![Ticket::issue(event_id, 10.0)], 10.0);
        cancelled.cancel();

        store.create_booking(&confirmed).await.unwrap();
        store.create_booking(&cancelled).await.unwrap();

        let listed = store.list_confirmed_by_user(user_id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, confirmed.id);
    }
}
