//! Game catalog: CRUD on games and the per-caller event counts of the listing.

use tracing::{debug, info};

use crate::{
    dao::{
        models::GameQuery,
        storage::{EntityKind, StorageError},
    },
    dto::{
        game::{CreatedGame, GameDetail, GameRequest},
        validation::invalid_pk,
    },
    error::ServiceError,
    services::directory_service::{self, game_types_by_id, gamers_by_id, related},
    state::SharedState,
};

/// Fetch one game with its creator and type expanded.
pub async fn retrieve(state: &SharedState, id: i64) -> Result<GameDetail, ServiceError> {
    let store = state.require_store().await?;
    let Some(game) = store.find_game(id).await? else {
        return Err(StorageError::not_found(EntityKind::Game).into());
    };

    let gamers = gamers_by_id(&store, [game.gamer_id]).await?;
    let game_types = game_types_by_id(&store, [game.game_type_id]).await?;
    let gamer = related(&gamers, game.gamer_id, EntityKind::Gamer)?;
    let game_type = related(&game_types, game.game_type_id, EntityKind::GameType)?;

    Ok(GameDetail::new(game, gamer, game_type))
}

/// List games, optionally restricted to one game type, with event counts for the caller.
pub async fn list(
    state: &SharedState,
    caller_uid: &str,
    game_type_id: Option<i64>,
) -> Result<Vec<GameDetail>, ServiceError> {
    let store = state.require_store().await?;
    let caller = directory_service::resolve_caller(&store, caller_uid).await?;

    let rows = store
        .list_games(GameQuery {
            viewer_id: caller.id,
            game_type_id,
        })
        .await?;

    let gamers = gamers_by_id(&store, rows.iter().map(|row| row.game.gamer_id)).await?;
    let game_types =
        game_types_by_id(&store, rows.iter().map(|row| row.game.game_type_id)).await?;

    rows.into_iter()
        .map(|row| {
            let gamer = related(&gamers, row.game.gamer_id, EntityKind::Gamer)?;
            let game_type = related(&game_types, row.game.game_type_id, EntityKind::GameType)?;
            Ok(GameDetail::with_stats(row, gamer, game_type))
        })
        .collect()
}

/// Register a game created by the caller.
pub async fn create(
    state: &SharedState,
    caller_uid: &str,
    payload: GameRequest,
) -> Result<CreatedGame, ServiceError> {
    let store = state.require_store().await?;
    let caller = directory_service::resolve_caller(&store, caller_uid).await?;
    let fields = payload.into_fields()?;
    let game_type_id = fields.game_type_id;

    let game = store
        .create_game(caller.id, fields)
        .await
        .map_err(|err| match err.missing_entity() {
            Some(EntityKind::GameType) => invalid_pk("game_type", game_type_id).into(),
            _ => ServiceError::from(err),
        })?;

    info!(game_id = game.id, gamer_id = caller.id, "game created");
    Ok(game.into())
}

/// Replace every mutable column of a game.
pub async fn update(
    state: &SharedState,
    id: i64,
    payload: GameRequest,
) -> Result<(), ServiceError> {
    let fields = payload.into_fields()?;
    let store = state.require_store().await?;
    store.update_game(id, fields).await?;

    debug!(game_id = id, "game updated");
    Ok(())
}

/// Delete a game together with its events and their attendance.
pub async fn destroy(state: &SharedState, id: i64) -> Result<(), ServiceError> {
    let store = state.require_store().await?;
    store.delete_game(id).await?;

    info!(game_id = id, "game deleted");
    Ok(())
}
