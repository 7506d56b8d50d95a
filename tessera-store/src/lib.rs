pub mod app_config;
pub mod bookings_repo;
pub mod database;
pub mod events_repo;
pub mod memory;
pub mod users_repo;

pub use bookings_repo::PgBookingRepository;
pub use database::PgDatabase;
pub use events_repo::PgEventRepository;
pub use memory::MemoryStore;
pub use users_repo::PgUserRepository;
