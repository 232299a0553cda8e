use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::{self, TraceLayer};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use acme_birthday::config::Config;
use acme_birthday::form::NameGuard;
use acme_birthday::notify::{LogNotifier, Notifier, SmtpNotifier};
use acme_birthday::sqlite_repo::SqliteRepository;
use acme_birthday::{build_app, db, local_today, AppState};

fn build_cors(config: &Config) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::any())
        .allow_headers(AllowHeaders::any())
}

fn build_notifier(config: &Config) -> Arc<dyn Notifier> {
    match &config.smtp {
        Some(settings) => match SmtpNotifier::new(settings) {
            Ok(notifier) => Arc::new(notifier),
            Err(e) => {
                tracing::error!(error = %e, "SMTP setup failed, falling back to log notifications");
                Arc::new(LogNotifier)
            }
        },
        None => {
            tracing::info!("SMTP_HOST not set, notifications go to the log");
            Arc::new(LogNotifier)
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();

    let pool = db::init_pool(&config.database_url)
        .await
        .expect("Failed to initialize database");

    tracing::info!("Database initialized at {}", config.database_url);

    let cors = build_cors(&config);
    let notifier = build_notifier(&config);

    tracing::info!(
        denylisted = config.denylist.names.len(),
        page_size = config.page_size,
        "Birthday form configured"
    );

    let state = AppState {
        repo: Arc::new(SqliteRepository::new(pool)),
        guard: NameGuard::new(config.denylist.clone(), notifier),
        page_size: config.page_size,
        today: local_today,
    };

    let app = build_app(state)
        .layer(RequestBodyLimitLayer::new(config.max_payload_bytes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_request(trace::DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    trace::DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(tower_http::LatencyUnit::Millis),
                ),
        )
        .layer(cors);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutting down...");
}
