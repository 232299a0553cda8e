pub mod config;
pub mod countdown;
pub mod db;
pub mod error;
pub mod form;
pub mod handlers;
pub mod models;
pub mod notify;
pub mod pagination;
pub mod repository;
pub mod sqlite_repo;

use axum::{routing::get, Router};
use chrono::NaiveDate;
use form::NameGuard;
use repository::BirthdayRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn BirthdayRepository>,
    pub guard: NameGuard,
    pub page_size: u64,
    /// Source of "today" for countdowns and ages.
    pub today: fn() -> NaiveDate,
}

pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn birthday_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/birthdays",
            get(handlers::birthdays::list).post(handlers::birthdays::create),
        )
        .route(
            "/api/v1/birthdays/:id",
            get(handlers::birthdays::detail)
                .put(handlers::birthdays::update)
                .delete(handlers::birthdays::delete),
        )
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health_check))
}

/// Build the full application router (used by main and tests).
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(birthday_routes())
        .merge(health_routes())
        .with_state(state)
}
