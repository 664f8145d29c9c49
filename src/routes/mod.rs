use axum::Router;

use crate::state::SharedState;

/// Swagger UI and the OpenAPI document.
pub mod docs;
/// Event endpoints, attendance included.
pub mod event;
pub mod extract;
/// Game catalog endpoints.
pub mod game;
/// Game type directory endpoints.
pub mod game_type;
/// Health check endpoint.
pub mod health;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(game::router())
        .merge(event::router())
        .merge(game_type::router());

    api_router.merge(docs::router()).with_state(state)
}
