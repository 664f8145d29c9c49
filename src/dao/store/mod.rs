pub mod memory;
/// MongoDB backend running each mutation in a transaction.
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use crate::dao::models::{
    EventEntity, EventFields, EventStatsEntity, GameEntity, GameFields, GameQuery,
    GameStatsEntity, GameTypeEntity, GamerEntity,
};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;

/// Abstraction over the persistence layer for the game catalog and events.
///
/// Every method is a single unit of work: backends execute the lookups and
/// writes of one call atomically, and a [`StorageError::NotFound`] aborts the
/// call without side effects.
///
/// [`StorageError::NotFound`]: crate::dao::storage::StorageError::NotFound
pub trait LevelUpStore: Send + Sync {
    /// Insert or replace a gamer of the external directory.
    fn save_gamer(&self, gamer: GamerEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Insert or replace a game type of the external directory.
    fn save_game_type(&self, game_type: GameTypeEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Gamer whose `uid` matches the caller header.
    fn find_gamer_by_uid(&self, uid: String)
    -> BoxFuture<'static, StorageResult<Option<GamerEntity>>>;
    /// Gamers among `ids`; unknown ids are skipped.
    fn find_gamers(&self, ids: Vec<i64>) -> BoxFuture<'static, StorageResult<Vec<GamerEntity>>>;
    /// Game type by id.
    fn find_game_type(&self, id: i64)
    -> BoxFuture<'static, StorageResult<Option<GameTypeEntity>>>;
    /// Game types among `ids`; unknown ids are skipped.
    fn find_game_types(
        &self,
        ids: Vec<i64>,
    ) -> BoxFuture<'static, StorageResult<Vec<GameTypeEntity>>>;
    /// Every game type in id order.
    fn list_game_types(&self) -> BoxFuture<'static, StorageResult<Vec<GameTypeEntity>>>;

    /// Game by id.
    fn find_game(&self, id: i64) -> BoxFuture<'static, StorageResult<Option<GameEntity>>>;
    /// Games among `ids`; unknown ids are skipped.
    fn find_games(&self, ids: Vec<i64>) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>>;
    /// Games in storage order, annotated with event counts for the viewer.
    fn list_games(&self, query: GameQuery)
    -> BoxFuture<'static, StorageResult<Vec<GameStatsEntity>>>;
    /// Fails with `NotFound(GameType)` when the referenced type is missing.
    fn create_game(
        &self,
        gamer_id: i64,
        fields: GameFields,
    ) -> BoxFuture<'static, StorageResult<GameEntity>>;
    /// Fails with `NotFound(Game)` first, then `NotFound(GameType)`.
    fn update_game(&self, id: i64, fields: GameFields) -> BoxFuture<'static, StorageResult<()>>;
    /// Removes the game, its events and their attendance rows.
    fn delete_game(&self, id: i64) -> BoxFuture<'static, StorageResult<()>>;

    /// Event annotated with attendance; `joined` is only filled for a viewer.
    fn find_event(
        &self,
        id: i64,
        viewer_id: Option<i64>,
    ) -> BoxFuture<'static, StorageResult<Option<EventStatsEntity>>>;
    /// Events in storage order, annotated for the viewer.
    fn list_events(&self, viewer_id: i64)
    -> BoxFuture<'static, StorageResult<Vec<EventStatsEntity>>>;
    /// Fails with `NotFound(Game)` when the referenced game is missing.
    fn create_event(
        &self,
        organizer_id: i64,
        fields: EventFields,
    ) -> BoxFuture<'static, StorageResult<EventEntity>>;
    /// Fails with `NotFound(Event)` first, then `NotFound(Game)`.
    fn update_event(&self, id: i64, fields: EventFields) -> BoxFuture<'static, StorageResult<()>>;
    /// Removes the event and its attendance rows.
    fn delete_event(&self, id: i64) -> BoxFuture<'static, StorageResult<()>>;
    /// Records one more attendance row; repeated signups are kept.
    fn add_attendee(&self, event_id: i64, gamer_id: i64) -> BoxFuture<'static, StorageResult<()>>;
    /// Deletes a single attendance row of the gamer for the event.
    fn remove_attendee(
        &self,
        event_id: i64,
        gamer_id: i64,
    ) -> BoxFuture<'static, StorageResult<()>>;

    /// Cheap round trip to the backend.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Rebuild the backend connection in place.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
