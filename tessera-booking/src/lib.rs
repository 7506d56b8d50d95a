pub mod gateway;
pub mod orchestrator;

pub use gateway::{MockPaymentAdapter, PaypalAdapter, PaymentService};
pub use orchestrator::{BookingConfirmation, BookingError, BookingOrchestrator, BookingRequest};
