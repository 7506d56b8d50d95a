pub mod models;

pub use models::booking::{Booking, BookingStatus, Ticket};
pub use models::event::{Event, EventPatch, GeoPoint};
pub use models::user::{User, UserRole};
