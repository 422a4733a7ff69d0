use std::net::SocketAddr;
use std::sync::Arc;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::{self, TraceLayer};
use tracing::{Level, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use appointment_cell::{AppointmentBook, SupabaseAppointmentRepository};
use auth_cell::{AuthService, SupabaseAdminCredentialRepository};
use department_cell::{DepartmentBoard, SupabaseDepartmentRepository};
use shared_config::AppConfig;
use sync_cell::ToastLog;
use weekly_slot_cell::{SupabaseWeeklySlotRepository, WeeklyPlanner};

#[tokio::main]
async fn main() {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting dental admin API server");

    // Load configuration
    let config = Arc::new(AppConfig::from_env());
    let toasts = Arc::new(ToastLog::new());

    let departments = Arc::new(DepartmentBoard::new(
        Arc::new(SupabaseDepartmentRepository::new(&config)),
        toasts.clone(),
    ));
    let appointments = Arc::new(AppointmentBook::new(
        Arc::new(SupabaseAppointmentRepository::new(&config)),
        toasts.clone(),
    ));
    let weekly_slots = Arc::new(WeeklyPlanner::new(
        Arc::new(SupabaseWeeklySlotRepository::new(&config)),
        toasts.clone(),
    ));
    let auth = Arc::new(AuthService::new(
        Arc::new(SupabaseAdminCredentialRepository::new(&config)),
        config.clone(),
    ));

    // Initial loads; a failure leaves the board empty until the next load.
    if let Err(e) = departments.load().await {
        warn!("Initial department load failed: {}", e);
    }
    if let Err(e) = appointments.load().await {
        warn!("Initial appointment load failed: {}", e);
    }
    if let Err(e) = weekly_slots.load(None).await {
        warn!("Initial weekly slot load failed: {}", e);
    }
    // Startup load failures were already logged; don't replay them as toasts.
    toasts.drain().await;

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let port = config.port;
    let services = router::Services {
        config,
        toasts,
        auth,
        departments,
        appointments,
        weekly_slots,
    };

    // Build the application router
    let app = router::create_router(services)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new()
                    .level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new()
                    .level(Level::INFO)),
        )
        .layer(cors);

    // Run the server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);

    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            return;
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
    }
}
