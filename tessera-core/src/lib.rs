pub mod notify;
pub mod payment;
pub mod repository;

pub use notify::{InlineQr, Notification, NotificationSender};
pub use payment::{PaymentAdapter, PaymentError, PaymentOrder};
pub use repository::{BookingRepository, EventRepository, RepoError, UserRepository};
