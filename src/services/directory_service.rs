//! Read access to the gamer and game type directories, plus their seeding.
//!
//! Both directories are owned by an external system; this backend only
//! resolves callers, expands relations and lists game types.

use std::{collections::HashMap, sync::Arc};

use tracing::{debug, info};

use crate::{
    config::AppConfig,
    dao::{
        models::{GameTypeEntity, GamerEntity},
        storage::{EntityKind, StorageError, StorageResult},
        store::LevelUpStore,
    },
    dto::directory::GameTypeSummary,
    error::ServiceError,
    state::SharedState,
};

/// Rows keyed by id, used to expand relations without one query per row.
pub type Lookup<T> = HashMap<i64, T>;

/// Resolve the gamer behind a caller identifier.
pub(crate) async fn resolve_caller(
    store: &Arc<dyn LevelUpStore>,
    uid: &str,
) -> Result<GamerEntity, ServiceError> {
    match store.find_gamer_by_uid(uid.to_owned()).await? {
        Some(gamer) => Ok(gamer),
        None => {
            debug!("unknown caller uid");
            Err(StorageError::not_found(EntityKind::Gamer).into())
        }
    }
}

/// Every game type of the directory, in id order.
pub async fn list_game_types(state: &SharedState) -> Result<Vec<GameTypeSummary>, ServiceError> {
    let store = state.require_store().await?;
    let game_types = store.list_game_types().await?;
    Ok(game_types.into_iter().map(Into::into).collect())
}

/// One game type, or NotFound.
pub async fn retrieve_game_type(
    state: &SharedState,
    id: i64,
) -> Result<GameTypeSummary, ServiceError> {
    let store = state.require_store().await?;
    store
        .find_game_type(id)
        .await?
        .map(Into::into)
        .ok_or_else(|| StorageError::not_found(EntityKind::GameType).into())
}

/// Register the configured gamers and game types in a freshly connected store.
pub async fn seed_directories(store: &dyn LevelUpStore, config: &AppConfig) -> StorageResult<()> {
    for game_type in config.game_types() {
        store.save_game_type(game_type.clone()).await?;
    }
    for gamer in config.gamers() {
        store.save_gamer(gamer.clone()).await?;
    }

    info!(
        gamers = config.gamers().len(),
        game_types = config.game_types().len(),
        "directories seeded"
    );
    Ok(())
}

pub(crate) async fn gamers_by_id(
    store: &Arc<dyn LevelUpStore>,
    ids: impl IntoIterator<Item = i64>,
) -> Result<Lookup<GamerEntity>, ServiceError> {
    let gamers = store.find_gamers(dedup(ids)).await?;
    Ok(gamers.into_iter().map(|gamer| (gamer.id, gamer)).collect())
}

pub(crate) async fn game_types_by_id(
    store: &Arc<dyn LevelUpStore>,
    ids: impl IntoIterator<Item = i64>,
) -> Result<Lookup<GameTypeEntity>, ServiceError> {
    let game_types = store.find_game_types(dedup(ids)).await?;
    Ok(game_types
        .into_iter()
        .map(|game_type| (game_type.id, game_type))
        .collect())
}

/// Borrow a related row, which must exist since references are enforced on write.
pub(crate) fn related<T>(
    lookup: &Lookup<T>,
    id: i64,
    entity: EntityKind,
) -> Result<&T, ServiceError> {
    lookup
        .get(&id)
        .ok_or_else(|| ServiceError::Internal(format!("{entity} `{id}` is referenced but missing")))
}

fn dedup(ids: impl IntoIterator<Item = i64>) -> Vec<i64> {
    let mut ids: Vec<i64> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dao::store::memory::MemoryStore, state::AppState};

    fn config() -> AppConfig {
        AppConfig::new(
            vec![GamerEntity {
                id: 1,
                uid: "uid-1".into(),
                bio: "Likes chess".into(),
            }],
            AppConfig::builtin().game_types().to_vec(),
        )
    }

    async fn seeded_state() -> SharedState {
        let store = MemoryStore::new();
        seed_directories(&store, &config()).await.unwrap();
        AppState::with_store(Arc::new(store)).await
    }

    #[tokio::test]
    async fn resolves_known_callers_only() {
        let state = seeded_state().await;

        let store = state.require_store().await.unwrap();

        let gamer = resolve_caller(&store, "uid-1").await.unwrap();
        assert_eq!(gamer.id, 1);

        let err = resolve_caller(&store, "nobody").await.unwrap_err();
        assert!(
            matches!(err, ServiceError::NotFound(ref message) if message == "Gamer matching query does not exist.")
        );
    }

    #[tokio::test]
    async fn lists_seeded_game_types() {
        let state = seeded_state().await;

        let game_types = list_game_types(&state).await.unwrap();
        assert_eq!(game_types.len(), 4);
        assert_eq!(retrieve_game_type(&state, 2).await.unwrap().label, "Card game");
        assert!(matches!(
            retrieve_game_type(&state, 99).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn dedup_sorts_ids() {
        assert_eq!(dedup([3, 1, 3, 2, 1]), vec![1, 2, 3]);
    }
}
