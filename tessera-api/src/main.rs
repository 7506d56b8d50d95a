use std::net::SocketAddr;
use std::sync::Arc;

use tessera_api::{
    app,
    state::{AppState, AuthConfig},
};
use tessera_booking::{BookingOrchestrator, MockPaymentAdapter, PaymentService, PaypalAdapter};
use tessera_catalog::{EventCatalog, Geocoder};
use tessera_core::notify::NotificationSender;
use tessera_core::payment::PaymentAdapter;
use tessera_core::repository::{BookingRepository, EventRepository, UserRepository};
use tessera_notify::{LogMailer, SmtpMailer};
use tessera_render::TicketRenderer;
use tessera_store::{
    MemoryStore, PgBookingRepository, PgDatabase, PgEventRepository, PgUserRepository,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tessera_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = tessera_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Tessera API on port {}", config.server.port);

    // Record store: Postgres when configured, in-memory otherwise
    let (users, events, bookings): (
        Arc<dyn UserRepository>,
        Arc<dyn EventRepository>,
        Arc<dyn BookingRepository>,
    ) = match &config.database {
        Some(db) => {
            let database = PgDatabase::connect(&db.url)
                .await
                .expect("Failed to connect to Postgres");
            database.migrate().await.expect("Failed to run migrations");
            (
                Arc::new(PgUserRepository::new(database.pool.clone())),
                Arc::new(PgEventRepository::new(database.pool.clone())),
                Arc::new(PgBookingRepository::new(database.pool.clone())),
            )
        }
        None => {
            tracing::warn!("No database configured; records live in memory only");
            let store = Arc::new(MemoryStore::new());
            (store.clone() as _, store.clone() as _, store as _)
        }
    };

    let mailer: Arc<dyn NotificationSender> = match &config.smtp {
        Some(smtp) => Arc::new(SmtpMailer::new(
            smtp.server.clone(),
            smtp.port,
            smtp.username.clone(),
            smtp.password.clone(),
            smtp.from_email.clone(),
            smtp.from_name.clone(),
            config.branding.logo_path.clone(),
        )),
        None => {
            tracing::warn!("No SMTP configured; notifications will only be logged");
            Arc::new(LogMailer)
        }
    };

    let adapter: Arc<dyn PaymentAdapter> = match &config.paypal {
        Some(paypal) => Arc::new(PaypalAdapter::new(
            paypal.base_url.clone(),
            paypal.client_id.clone(),
            paypal.client_secret.clone(),
            paypal.return_url.clone(),
            paypal.cancel_url.clone(),
            paypal.brand_name.clone(),
        )),
        None => {
            tracing::warn!("No PayPal credentials configured; using the mock gateway");
            Arc::new(MockPaymentAdapter)
        }
    };

    let geocoder = Geocoder::new(
        config.geocoding.endpoint.clone(),
        config.geocoding.api_key.clone(),
    );

    let app_state = AppState {
        catalog: Arc::new(EventCatalog::new(
            users.clone(),
            events.clone(),
            bookings.clone(),
            geocoder,
        )),
        orchestrator: Arc::new(BookingOrchestrator::new(
            users.clone(),
            events.clone(),
            bookings.clone(),
            mailer,
        )),
        payments: Arc::new(PaymentService::new(adapter)),
        renderer: Arc::new(TicketRenderer::new(config.branding.logo_path.clone())),
        users,
        events,
        bookings,
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
