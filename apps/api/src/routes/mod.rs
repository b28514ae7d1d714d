pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::state::AppState;
use crate::{admin, auth, export, feedback, wizard};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Wizard
        .route(
            "/api/v1/wizard/:session",
            get(wizard::handlers::handle_get_wizard),
        )
        .route(
            "/api/v1/wizard/:session/init",
            post(wizard::handlers::handle_init),
        )
        .route(
            "/api/v1/wizard/:session/advance",
            post(wizard::handlers::handle_advance),
        )
        .route(
            "/api/v1/wizard/:session/jump",
            post(wizard::handlers::handle_jump),
        )
        .route(
            "/api/v1/wizard/:session/reset",
            post(wizard::handlers::handle_reset),
        )
        .route(
            "/api/v1/wizard/:session/sections/:step/entries",
            post(wizard::handlers::handle_add_entry),
        )
        .route(
            "/api/v1/wizard/:session/sections/:step/entries/:id",
            delete(wizard::handlers::handle_remove_entry),
        )
        // Preview / export
        .route(
            "/api/v1/wizard/:session/preview",
            get(export::handlers::handle_preview),
        )
        .route(
            "/api/v1/wizard/:session/preview/markdown",
            get(export::handlers::handle_preview_markdown),
        )
        .route(
            "/api/v1/wizard/:session/export",
            get(export::handlers::handle_export),
        )
        // Auth
        .route(
            "/api/v1/auth/:session/register",
            post(auth::handlers::handle_register),
        )
        .route(
            "/api/v1/auth/:session/login",
            post(auth::handlers::handle_login),
        )
        .route(
            "/api/v1/auth/:session/logout",
            post(auth::handlers::handle_logout),
        )
        .route("/api/v1/auth/:session/me", get(auth::handlers::handle_me))
        // Feedback
        .route(
            "/api/v1/feedback/:session",
            post(feedback::handlers::handle_submit_feedback),
        )
        // Admin
        .route(
            "/api/v1/admin/:session/users",
            get(admin::handlers::handle_list_users),
        )
        .route(
            "/api/v1/admin/:session/feedback",
            get(admin::handlers::handle_list_feedback),
        )
        .route(
            "/api/v1/admin/:session/overview",
            get(admin::handlers::handle_overview),
        )
        .with_state(state)
}
