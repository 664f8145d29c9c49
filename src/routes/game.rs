use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::game::{CreatedGame, GameDetail, GameListQuery, GameRequest},
    error::AppError,
    routes::extract::{Caller, JsonBody, QueryParams},
    services::game_service,
    state::SharedState,
};

/// Routes of the game catalog.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/games", get(list_games).post(create_game))
        .route(
            "/games/{id}",
            get(retrieve_game).put(update_game).delete(delete_game),
        )
}

/// List games with event counts relative to the caller.
#[utoipa::path(
    get,
    path = "/games",
    tag = "games",
    params(
        ("Authorization" = String, Header, description = "Caller gamer uid"),
        GameListQuery,
    ),
    responses(
        (status = 200, description = "Games in storage order", body = [GameDetail]),
        (status = 401, description = "Missing caller"),
        (status = 404, description = "Unknown caller")
    )
)]
pub async fn list_games(
    State(state): State<SharedState>,
    Caller(uid): Caller,
    QueryParams(query): QueryParams<GameListQuery>,
) -> Result<Json<Vec<GameDetail>>, AppError> {
    let games = game_service::list(&state, &uid, query.game_type).await?;
    Ok(Json(games))
}

/// Retrieve a single game with its creator and type.
#[utoipa::path(
    get,
    path = "/games/{id}",
    tag = "games",
    params(("id" = i64, Path, description = "Identifier of the game")),
    responses(
        (status = 200, description = "Game", body = GameDetail),
        (status = 404, description = "Game not found")
    )
)]
pub async fn retrieve_game(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Json<GameDetail>, AppError> {
    Ok(Json(game_service::retrieve(&state, id).await?))
}

/// Create a game owned by the caller.
#[utoipa::path(
    post,
    path = "/games",
    tag = "games",
    params(("Authorization" = String, Header, description = "Caller gamer uid")),
    request_body = GameRequest,
    responses(
        (status = 201, description = "Game created", body = CreatedGame),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Unknown caller")
    )
)]
pub async fn create_game(
    State(state): State<SharedState>,
    Caller(uid): Caller,
    JsonBody(payload): JsonBody<GameRequest>,
) -> Result<(StatusCode, Json<CreatedGame>), AppError> {
    let game = game_service::create(&state, &uid, payload).await?;
    Ok((StatusCode::CREATED, Json(game)))
}

/// Replace the mutable fields of a game.
#[utoipa::path(
    put,
    path = "/games/{id}",
    tag = "games",
    params(("id" = i64, Path, description = "Identifier of the game")),
    request_body = GameRequest,
    responses(
        (status = 204, description = "Game updated"),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Game or game type not found")
    )
)]
pub async fn update_game(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    JsonBody(payload): JsonBody<GameRequest>,
) -> Result<StatusCode, AppError> {
    game_service::update(&state, id, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a game and every event scheduled for it.
#[utoipa::path(
    delete,
    path = "/games/{id}",
    tag = "games",
    params(("id" = i64, Path, description = "Identifier of the game")),
    responses(
        (status = 204, description = "Game deleted"),
        (status = 404, description = "Game not found")
    )
)]
pub async fn delete_game(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    game_service::destroy(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
