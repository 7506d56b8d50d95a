use std::sync::Arc;

use tessera_booking::{BookingOrchestrator, PaymentService};
use tessera_catalog::EventCatalog;
use tessera_core::repository::{BookingRepository, EventRepository, UserRepository};
use tessera_render::TicketRenderer;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub events: Arc<dyn EventRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub catalog: Arc<EventCatalog>,
    pub orchestrator: Arc<BookingOrchestrator>,
    pub payments: Arc<PaymentService>,
    pub renderer: Arc<TicketRenderer>,
    pub auth: AuthConfig,
}
