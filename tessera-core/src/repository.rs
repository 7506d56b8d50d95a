use async_trait::async_trait;
use tessera_shared::{Booking, Event, User};
use uuid::Uuid;

/// Storage failures are opaque to the domain layer; orchestrators wrap
/// them into their own error types at the call site.
pub type RepoError = Box<dyn std::error::Error + Send + Sync>;

/// Repository trait for user records
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: &User) -> Result<Uuid, RepoError>;

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn list_users(&self) -> Result<Vec<User>, RepoError>;
}

/// Repository trait for event records
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create_event(&self, event: &Event) -> Result<Uuid, RepoError>;

    async fn get_event(&self, id: Uuid) -> Result<Option<Event>, RepoError>;

    async fn list_events(&self) -> Result<Vec<Event>, RepoError>;

    async fn list_by_organizer(&self, organizer_id: Uuid) -> Result<Vec<Event>, RepoError>;

    /// Full-record write-back; there is no partial update or locking
    async fn update_event(&self, event: &Event) -> Result<(), RepoError>;
}

/// Repository trait for booking records
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create_booking(&self, booking: &Booking) -> Result<Uuid, RepoError>;

    async fn get_booking(&self, id: Uuid) -> Result<Option<Booking>, RepoError>;

    async fn update_booking(&self, booking: &Booking) -> Result<(), RepoError>;

    async fn list_confirmed_by_user(&self, user_id: Uuid) -> Result<Vec<Booking>, RepoError>;
}
