use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    dto::directory::GameTypeSummary, error::AppError, services::directory_service,
    state::SharedState,
};

/// Read-only routes over the game type directory.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/gametypes", get(list_game_types))
        .route("/gametypes/{id}", get(retrieve_game_type))
}

#[utoipa::path(
    get,
    path = "/gametypes",
    tag = "gametypes",
    responses((status = 200, description = "Known game types", body = [GameTypeSummary]))
)]
/// List the game types games can be filed under.
pub async fn list_game_types(
    State(state): State<SharedState>,
) -> Result<Json<Vec<GameTypeSummary>>, AppError> {
    Ok(Json(directory_service::list_game_types(&state).await?))
}

/// Retrieve one game type.
#[utoipa::path(
    get,
    path = "/gametypes/{id}",
    tag = "gametypes",
    params(("id" = i64, Path, description = "Identifier of the game type")),
    responses(
        (status = 200, description = "Game type", body = GameTypeSummary),
        (status = 404, description = "Game type not found")
    )
)]
pub async fn retrieve_game_type(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Json<GameTypeSummary>, AppError> {
    Ok(Json(directory_service::retrieve_game_type(&state, id).await?))
}
