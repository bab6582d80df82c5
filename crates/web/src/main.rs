use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use storage::Database;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod clients;
mod config;
mod error;
mod features;
mod qr;
mod spreadsheet;
mod state;

use clients::blob::{ObjectStore, SupabaseStorage};
use clients::mailer::{Mailer, SmtpMailer};
use config::Config;
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::import::handlers::upload,
        features::checkin::handlers::check_in,
        features::checkin::handlers::checkin_status,
        features::dashboard::handlers::get_dashboard,
        features::scoreboard::handlers::get_scoreboard,
        features::scoreboard::handlers::submit_score,
        features::attendees::handlers::list_attendees,
        features::attendees::handlers::register_attendee,
        features::attendees::handlers::manual_check_in,
    ),
    components(
        schemas(
            storage::dto::import::UploadResult,
            storage::dto::import::RowFailure,
            storage::dto::checkin::CheckinRequest,
            storage::dto::checkin::CheckinData,
            storage::dto::checkin::CheckinResponse,
            storage::dto::dashboard::DashboardStats,
            storage::dto::scoreboard::ScoreSubmission,
            storage::dto::scoreboard::TeamTotal,
            storage::dto::scoreboard::ScoreboardResponse,
            storage::dto::scoreboard::SubmitScoreResponse,
            storage::dto::attendee::RegisterAttendeeRequest,
            storage::dto::attendee::AttendeeResponse,
            storage::dto::attendee::RegisterAttendeeResponse,
            storage::models::Attendee,
            storage::models::Score,
        )
    ),
    tags(
        (name = "import", description = "Bulk roster import"),
        (name = "checkin", description = "QR check-in"),
        (name = "dashboard", description = "Live attendance counters"),
        (name = "scoreboard", description = "Event scoreboard"),
        (name = "attendees", description = "Roster administration"),
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting attendance API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let blob: Arc<dyn ObjectStore> = Arc::new(SupabaseStorage::from_config(&config));
    let mailer: Arc<dyn Mailer> =
        Arc::new(SmtpMailer::from_config(&config).context("Failed to configure SMTP mailer")?);

    let bind_address = format!("{}:{}", config.host, config.port);

    let state = AppState {
        db,
        blob,
        mailer,
        config: Arc::new(config),
    };

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api/import", features::import::routes::routes())
        .nest("/api/checkin", features::checkin::routes::routes())
        .nest("/api/dashboard", features::dashboard::routes::routes())
        .nest("/api/scoreboard", features::scoreboard::routes::routes())
        .nest("/api/attendees", features::attendees::routes::routes())
        .layer(CorsLayer::permissive())
        .with_state(state);

    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", bind_address);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .context("Failed to bind server address")?;
    axum::serve(listener, app).await?;

    Ok(())
}
