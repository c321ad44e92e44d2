//! # Yatube
//!
//! A blog where users publish posts, file them under groups, comment on
//! each other's posts and subscribe to authors.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod telemetry;
pub mod views;

use actix_web::web;

use state::AppState;

/// Register state, extractor limits and routes on an `App`.
///
/// ```ignore
/// App::new().configure(yatube::configure_app(state))
/// ```
pub fn configure_app(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let limit = state.settings.max_upload_bytes;
        cfg.app_data(web::Data::new(state))
            .app_data(web::FormConfig::default().limit(limit))
            .app_data(web::PayloadConfig::new(limit))
            .configure(handlers::configure_routes);
    }
}
