pub mod geocode;
pub mod inventory;
pub mod service;

pub use geocode::Geocoder;
pub use service::{CatalogError, EventCatalog, EventDraft};
