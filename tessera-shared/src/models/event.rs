use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Geocoded venue coordinates plus a shareable map link
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub map_url: String,
}

/// A bookable event listing.
///
/// `available_tickets` and `attendees` are mutable counters kept in the
/// range `0 ≤ available_tickets ≤ capacity`; bookings move tickets from
/// one counter to the other, cancellations move them back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub organizer_id: Uuid,
    pub capacity: i32,
    pub available_tickets: i32,
    pub ticket_price: f64,
    pub starts_at: DateTime<Utc>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub instructions: Option<String>,
    pub category: Option<String>,
    pub attendees: i32,
    pub banner_image: Option<String>,
    pub location: Option<GeoPoint>,
}

impl Event {
    /// Single-line postal address, used for emails and geocoding
    pub fn street_address(&self) -> String {
        format!(
            "{}, {}, {} {}",
            self.address, self.city, self.state, self.zip_code
        )
    }
}

/// Fields an organizer may change after publishing an event
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    pub description: Option<String>,
    pub ticket_price: Option<f64>,
    pub starts_at: Option<DateTime<Utc>>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub instructions: Option<String>,
    pub capacity: Option<i32>,
}
