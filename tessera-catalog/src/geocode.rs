use reqwest::Client;
use tessera_shared::{Event, GeoPoint};
use tracing::warn;

/// Forward-geocodes event addresses against a Google-Maps-style HTTP
/// API. Every failure is logged and swallowed: events keep
/// `location: None` and the calling operation proceeds.
pub struct Geocoder {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl Geocoder {
    pub fn new(endpoint: String, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            api_key,
        }
    }

    /// Geocoder with no API key; `annotate` becomes a no-op
    pub fn disabled() -> Self {
        Self::new(String::new(), None)
    }

    /// Best-effort: fills `event.location` when the lookup succeeds
    pub async fn annotate(&self, event: &mut Event) {
        let Some(key) = self.api_key.clone() else {
            return;
        };

        let address = event.street_address();
        match self.lookup(&address, &key).await {
            Ok(Some(point)) => event.location = Some(point),
            Ok(None) => warn!("No geocoding result for address: {}", address),
            Err(e) => warn!("Geocoding lookup failed for {}: {}", address, e),
        }
    }

    async fn lookup(&self, address: &str, key: &str) -> Result<Option<GeoPoint>, reqwest::Error> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("address", address), ("key", key)])
            .send()
            .await?
            .error_for_status()?;

        let body: serde_json::Value = response.json().await?;

        let location = &body["results"][0]["geometry"]["location"];
        let (Some(latitude), Some(longitude)) = (location["lat"].as_f64(), location["lng"].as_f64())
        else {
            return Ok(None);
        };

        Ok(Some(GeoPoint {
            latitude,
            longitude,
            map_url: map_search_url(address),
        }))
    }
}

/// Shareable map link for a postal address
pub fn map_search_url(address: &str) -> String {
    format!(
        "https://www.google.com/maps/search/?api=1&query={}",
        address.replace(' ', "+")
    )
}
