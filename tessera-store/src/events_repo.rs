use async_trait::async_trait;
use sqlx::PgPool;
use tessera_core::repository::{EventRepository, RepoError};
use tessera_shared::{Event, GeoPoint};
use uuid::Uuid;

pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const EVENT_COLUMNS: &str = "id, name, description, organizer_id, capacity, available_tickets, \
     ticket_price, starts_at, address, city, state, zip_code, instructions, category, \
     attendees, banner_image, latitude, longitude, map_url";

// Internal struct for type-safe querying; the geo point is flattened
// into three nullable columns.
#[derive(sqlx::FromRow)]
struct EventRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    organizer_id: Uuid,
    capacity: i32,
    available_tickets: i32,
    ticket_price: f64,
    starts_at: chrono::DateTime<chrono::Utc>,
    address: String,
    city: String,
    state: String,
    zip_code: String,
    instructions: Option<String>,
    category: Option<String>,
    attendees: i32,
    banner_image: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    map_url: Option<String>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        let location = match (row.latitude, row.longitude, row.map_url) {
            (Some(latitude), Some(longitude), Some(map_url)) => Some(GeoPoint {
                latitude,
                longitude,
                map_url,
            }),
            _ => None,
        };

        Event {
            id: row.id,
            name: row.name,
            description: row.description,
            organizer_id: row.organizer_id,
            capacity: row.capacity,
            available_tickets: row.available_tickets,
            ticket_price: row.ticket_price,
            starts_at: row.starts_at,
            address: row.address,
            city: row.city,
            state: row.state,
            zip_code: row.zip_code,
            instructions: row.instructions,
            category: row.category,
            attendees: row.attendees,
            banner_image: row.banner_image,
            location,
        }
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn create_event(&self, event: &Event) -> Result<Uuid, RepoError> {
        sqlx::query(
            r#"
            INSERT INTO events (id, name, description, organizer_id, capacity, available_tickets,
                ticket_price, starts_at, address, city, state, zip_code, instructions, category,
                attendees, banner_image, latitude, longitude, map_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            "#,
        )
        .bind(event.id)
        .bind(&event.name)
        .bind(&event.description)
        .bind(event.organizer_id)
        .bind(event.capacity)
        .bind(event.available_tickets)
        .bind(event.ticket_price)
        .bind(event.starts_at)
        .bind(&event.address)
        .bind(&event.city)
        .bind(&event.state)
        .bind(&event.zip_code)
        .bind(&event.instructions)
        .bind(&event.category)
        .bind(event.attendees)
        .bind(&event.banner_image)
        .bind(event.location.as_ref().map(|l| l.latitude))
        .bind(event.location.as_ref().map(|l| l.longitude))
        .bind(event.location.as_ref().map(|l| l.map_url.clone()))
        .execute(&self.pool)
        .await?;

        Ok(event.id)
    }

    async fn get_event(&self, id: Uuid) -> Result<Option<Event>, RepoError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {} FROM events WHERE id = $1",
            EVENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Event::from))
    }

    async fn list_events(&self) -> Result<Vec<Event>, RepoError> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {} FROM events ORDER BY starts_at",
            EVENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn list_by_organizer(&self, organizer_id: Uuid) -> Result<Vec<Event>, RepoError> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {} FROM events WHERE organizer_id = $1 ORDER BY starts_at",
            EVENT_COLUMNS
        ))
        .bind(organizer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Event::from).collect())
    }

    async fn update_event(&self, event: &Event) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            UPDATE events SET name = $2, description = $3, capacity = $4, available_tickets = $5,
                ticket_price = $6, starts_at = $7, address = $8, city = $9, state = $10,
                zip_code = $11, instructions = $12, category = $13, attendees = $14,
                banner_image = $15, latitude = $16, longitude = $17, map_url = $18
            WHERE id = $1
            "#,
        )
        .bind(event.id)
        .bind(&event.name)
        .bind(&event.description)
        .bind(event.capacity)
        .bind(event.available_tickets)
        .bind(event.ticket_price)
        .bind(event.starts_at)
        .bind(&event.address)
        .bind(&event.city)
        .bind(&event.state)
        .bind(&event.zip_code)
        .bind(&event.instructions)
        .bind(&event.category)
        .bind(event.attendees)
        .bind(&event.banner_image)
        .bind(event.location.as_ref().map(|l| l.latitude))
        .bind(event.location.as_ref().map(|l| l.longitude))
        .bind(event.location.as_ref().map(|l| l.map_url.clone()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
