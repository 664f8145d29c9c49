//! Process-local store used when no database is configured and by the test suites.

use std::{collections::BTreeMap, sync::Arc};

use futures::future::BoxFuture;
use tokio::sync::RwLock;

use crate::dao::{
    models::{
        EventEntity, EventFields, EventGamerEntity, EventStatsEntity, GameEntity, GameFields,
        GameQuery, GameStatsEntity, GameTypeEntity, GamerEntity,
    },
    storage::{EntityKind, StorageError, StorageResult},
    store::LevelUpStore,
};

/// In-memory [`LevelUpStore`]; each call runs under one lock guard.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    gamers: BTreeMap<i64, GamerEntity>,
    game_types: BTreeMap<i64, GameTypeEntity>,
    games: BTreeMap<i64, GameEntity>,
    events: BTreeMap<i64, EventEntity>,
    attendance: BTreeMap<i64, EventGamerEntity>,
    last_game_id: i64,
    last_event_id: i64,
    last_attendance_id: i64,
}

impl MemoryState {
    fn event_stats(&self, event: &EventEntity, viewer_id: Option<i64>) -> EventStatsEntity {
        let rows = self
            .attendance
            .values()
            .filter(|row| row.event_id == event.id);
        let (attendees_count, joined) =
            rows.fold((0, false), |(count, joined), row| {
                (count + 1, joined || Some(row.gamer_id) == viewer_id)
            });

        EventStatsEntity {
            event: event.clone(),
            attendees_count,
            joined: viewer_id.map(|_| joined),
        }
    }

    fn remove_events_where(&mut self, predicate: impl Fn(&EventEntity) -> bool) {
        let removed: Vec<i64> = self
            .events
            .values()
            .filter(|event| predicate(event))
            .map(|event| event.id)
            .collect();
        for id in &removed {
            self.events.remove(id);
        }
        self.attendance
            .retain(|_, row| !removed.contains(&row.event_id));
    }
}

impl MemoryStore {
    /// Empty store; ids start at 1.
    pub fn new() -> Self {
        Self::default()
    }

    async fn save_gamer(&self, gamer: GamerEntity) -> StorageResult<()> {
        let mut state = self.inner.write().await;
        state.gamers.insert(gamer.id, gamer);
        Ok(())
    }

    async fn save_game_type(&self, game_type: GameTypeEntity) -> StorageResult<()> {
        let mut state = self.inner.write().await;
        state.game_types.insert(game_type.id, game_type);
        Ok(())
    }

    async fn find_gamer_by_uid(&self, uid: String) -> StorageResult<Option<GamerEntity>> {
        let state = self.inner.read().await;
        Ok(state.gamers.values().find(|gamer| gamer.uid == uid).cloned())
    }

    async fn find_gamers(&self, ids: Vec<i64>) -> StorageResult<Vec<GamerEntity>> {
        let state = self.inner.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| state.gamers.get(id).cloned())
            .collect())
    }

    async fn find_game_type(&self, id: i64) -> StorageResult<Option<GameTypeEntity>> {
        let state = self.inner.read().await;
        Ok(state.game_types.get(&id).cloned())
    }

    async fn find_game_types(&self, ids: Vec<i64>) -> StorageResult<Vec<GameTypeEntity>> {
        let state = self.inner.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| state.game_types.get(id).cloned())
            .collect())
    }

    async fn list_game_types(&self) -> StorageResult<Vec<GameTypeEntity>> {
        let state = self.inner.read().await;
        Ok(state.game_types.values().cloned().collect())
    }

    async fn find_game(&self, id: i64) -> StorageResult<Option<GameEntity>> {
        let state = self.inner.read().await;
        Ok(state.games.get(&id).cloned())
    }

    async fn find_games(&self, ids: Vec<i64>) -> StorageResult<Vec<GameEntity>> {
        let state = self.inner.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| state.games.get(id).cloned())
            .collect())
    }

    async fn list_games(&self, query: GameQuery) -> StorageResult<Vec<GameStatsEntity>> {
        let state = self.inner.read().await;
        let games = state
            .games
            .values()
            .filter(|game| {
                query
                    .game_type_id
                    .is_none_or(|type_id| game.game_type_id == type_id)
            })
            .map(|game| {
                let events = state.events.values().filter(|event| event.game_id == game.id);
                let (event_count, user_event_count) =
                    events.fold((0, 0), |(all, mine), event| {
                        let organized = i64::from(event.organizer_id == query.viewer_id);
                        (all + 1, mine + organized)
                    });
                GameStatsEntity {
                    game: game.clone(),
                    event_count,
                    user_event_count,
                }
            })
            .collect();
        Ok(games)
    }

    async fn create_game(&self, gamer_id: i64, fields: GameFields) -> StorageResult<GameEntity> {
        let mut state = self.inner.write().await;
        if !state.gamers.contains_key(&gamer_id) {
            return Err(StorageError::not_found(EntityKind::Gamer));
        }
        if !state.game_types.contains_key(&fields.game_type_id) {
            return Err(StorageError::not_found(EntityKind::GameType));
        }

        state.last_game_id += 1;
        let game = GameEntity::new(state.last_game_id, gamer_id, fields);
        state.games.insert(game.id, game.clone());
        Ok(game)
    }

    async fn update_game(&self, id: i64, fields: GameFields) -> StorageResult<()> {
        let mut state = self.inner.write().await;
        if !state.games.contains_key(&id) {
            return Err(StorageError::not_found(EntityKind::Game));
        }
        if !state.game_types.contains_key(&fields.game_type_id) {
            return Err(StorageError::not_found(EntityKind::GameType));
        }

        if let Some(game) = state.games.get_mut(&id) {
            game.apply(fields);
        }
        Ok(())
    }

    async fn delete_game(&self, id: i64) -> StorageResult<()> {
        let mut state = self.inner.write().await;
        if state.games.remove(&id).is_none() {
            return Err(StorageError::not_found(EntityKind::Game));
        }
        state.remove_events_where(|event| event.game_id == id);
        Ok(())
    }

    async fn find_event(
        &self,
        id: i64,
        viewer_id: Option<i64>,
    ) -> StorageResult<Option<EventStatsEntity>> {
        let state = self.inner.read().await;
        Ok(state
            .events
            .get(&id)
            .map(|event| state.event_stats(event, viewer_id)))
    }

    async fn list_events(&self, viewer_id: i64) -> StorageResult<Vec<EventStatsEntity>> {
        let state = self.inner.read().await;
        Ok(state
            .events
            .values()
            .map(|event| state.event_stats(event, Some(viewer_id)))
            .collect())
    }

    async fn create_event(
        &self,
        organizer_id: i64,
        fields: EventFields,
    ) -> StorageResult<EventEntity> {
        let mut state = self.inner.write().await;
        if !state.gamers.contains_key(&organizer_id) {
            return Err(StorageError::not_found(EntityKind::Gamer));
        }
        if !state.games.contains_key(&fields.game_id) {
            return Err(StorageError::not_found(EntityKind::Game));
        }

        state.last_event_id += 1;
        let event = EventEntity::new(state.last_event_id, organizer_id, fields);
        state.events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn update_event(&self, id: i64, fields: EventFields) -> StorageResult<()> {
        let mut state = self.inner.write().await;
        if !state.events.contains_key(&id) {
            return Err(StorageError::not_found(EntityKind::Event));
        }
        if !state.games.contains_key(&fields.game_id) {
            return Err(StorageError::not_found(EntityKind::Game));
        }

        if let Some(event) = state.events.get_mut(&id) {
            event.apply(fields);
        }
        Ok(())
    }

    async fn delete_event(&self, id: i64) -> StorageResult<()> {
        let mut state = self.inner.write().await;
        if !state.events.contains_key(&id) {
            return Err(StorageError::not_found(EntityKind::Event));
        }
        state.remove_events_where(|event| event.id == id);
        Ok(())
    }

    async fn add_attendee(&self, event_id: i64, gamer_id: i64) -> StorageResult<()> {
        let mut state = self.inner.write().await;
        if !state.gamers.contains_key(&gamer_id) {
            return Err(StorageError::not_found(EntityKind::Gamer));
        }
        if !state.events.contains_key(&event_id) {
            return Err(StorageError::not_found(EntityKind::Event));
        }

        state.last_attendance_id += 1;
        let row = EventGamerEntity {
            id: state.last_attendance_id,
            gamer_id,
            event_id,
        };
        state.attendance.insert(row.id, row);
        Ok(())
    }

    async fn remove_attendee(&self, event_id: i64, gamer_id: i64) -> StorageResult<()> {
        let mut state = self.inner.write().await;
        if !state.events.contains_key(&event_id) {
            return Err(StorageError::not_found(EntityKind::Event));
        }

        let row_id = state
            .attendance
            .values()
            .find(|row| row.event_id == event_id && row.gamer_id == gamer_id)
            .map(|row| row.id)
            .ok_or_else(|| StorageError::not_found(EntityKind::EventGamer))?;
        state.attendance.remove(&row_id);
        Ok(())
    }
}

impl LevelUpStore for MemoryStore {
    fn save_gamer(&self, gamer: GamerEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_gamer(gamer).await })
    }

    fn save_game_type(&self, game_type: GameTypeEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_game_type(game_type).await })
    }

    fn find_gamer_by_uid(
        &self,
        uid: String,
    ) -> BoxFuture<'static, StorageResult<Option<GamerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_gamer_by_uid(uid).await })
    }

    fn find_gamers(&self, ids: Vec<i64>) -> BoxFuture<'static, StorageResult<Vec<GamerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_gamers(ids).await })
    }

    fn find_game_type(
        &self,
        id: i64,
    ) -> BoxFuture<'static, StorageResult<Option<GameTypeEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_game_type(id).await })
    }

    fn find_game_types(
        &self,
        ids: Vec<i64>,
    ) -> BoxFuture<'static, StorageResult<Vec<GameTypeEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_game_types(ids).await })
    }

    fn list_game_types(&self) -> BoxFuture<'static, StorageResult<Vec<GameTypeEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_game_types().await })
    }

    fn find_game(&self, id: i64) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_game(id).await })
    }

    fn find_games(&self, ids: Vec<i64>) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_games(ids).await })
    }

    fn list_games(
        &self,
        query: GameQuery,
    ) -> BoxFuture<'static, StorageResult<Vec<GameStatsEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_games(query).await })
    }

    fn create_game(
        &self,
        gamer_id: i64,
        fields: GameFields,
    ) -> BoxFuture<'static, StorageResult<GameEntity>> {
        let store = self.clone();
        Box::pin(async move { store.create_game(gamer_id, fields).await })
    }

    fn update_game(&self, id: i64, fields: GameFields) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.update_game(id, fields).await })
    }

    fn delete_game(&self, id: i64) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.delete_game(id).await })
    }

    fn find_event(
        &self,
        id: i64,
        viewer_id: Option<i64>,
    ) -> BoxFuture<'static, StorageResult<Option<EventStatsEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_event(id, viewer_id).await })
    }

    fn list_events(
        &self,
        viewer_id: i64,
    ) -> BoxFuture<'static, StorageResult<Vec<EventStatsEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_events(viewer_id).await })
    }

    fn create_event(
        &self,
        organizer_id: i64,
        fields: EventFields,
    ) -> BoxFuture<'static, StorageResult<EventEntity>> {
        let store = self.clone();
        Box::pin(async move { store.create_event(organizer_id, fields).await })
    }

    fn update_event(&self, id: i64, fields: EventFields) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.update_event(id, fields).await })
    }

    fn delete_event(&self, id: i64) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.delete_event(id).await })
    }

    fn add_attendee(&self, event_id: i64, gamer_id: i64) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.add_attendee(event_id, gamer_id).await })
    }

    fn remove_attendee(
        &self,
        event_id: i64,
        gamer_id: i64,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.remove_attendee(event_id, gamer_id).await })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, time};

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        for (id, uid) in [(1, "alice-uid"), (2, "bob-uid")] {
            store
                .save_gamer(GamerEntity {
                    id,
                    uid: uid.into(),
                    bio: String::new(),
                })
                .await
                .unwrap();
        }
        for (id, label) in [(1, "Board game"), (2, "Card game")] {
            store
                .save_game_type(GameTypeEntity {
                    id,
                    label: label.into(),
                })
                .await
                .unwrap();
        }
        store
    }

    fn game_fields(title: &str, game_type_id: i64) -> GameFields {
        GameFields {
            title: title.into(),
            maker: "Staunton".into(),
            number_of_players: 2,
            skill_level: 3,
            game_type_id,
        }
    }

    fn event_fields(game_id: i64) -> EventFields {
        EventFields {
            description: "Friday night".into(),
            date: date!(2024 - 05 - 03),
            time: time!(19:30),
            game_id,
        }
    }

    #[tokio::test]
    async fn ids_are_never_reused() {
        let store = seeded().await;
        let first = store.create_game(1, game_fields("Chess", 1)).await.unwrap();
        store.delete_game(first.id).await.unwrap();
        let second = store.create_game(1, game_fields("Go", 1)).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn create_game_requires_existing_type() {
        let store = seeded().await;
        let err = store
            .create_game(1, game_fields("Chess", 42))
            .await
            .unwrap_err();
        assert_eq!(err.missing_entity(), Some(EntityKind::GameType));
        let games = store
            .list_games(GameQuery {
                viewer_id: 1,
                game_type_id: None,
            })
            .await
            .unwrap();
        assert!(games.is_empty());
    }

    #[tokio::test]
    async fn update_game_checks_game_before_type() {
        let store = seeded().await;
        let err = store.update_game(9, game_fields("Chess", 42)).await.unwrap_err();
        assert_eq!(err.missing_entity(), Some(EntityKind::Game));

        let game = store.create_game(1, game_fields("Chess", 1)).await.unwrap();
        let err = store
            .update_game(game.id, game_fields("Shogi", 42))
            .await
            .unwrap_err();
        assert_eq!(err.missing_entity(), Some(EntityKind::GameType));
        assert_eq!(store.find_game(game.id).await.unwrap().unwrap().title, "Chess");
    }

    #[tokio::test]
    async fn game_counts_split_by_organizer() {
        let store = seeded().await;
        let chess = store.create_game(1, game_fields("Chess", 1)).await.unwrap();
        let uno = store.create_game(2, game_fields("Uno", 2)).await.unwrap();
        store.create_event(1, event_fields(chess.id)).await.unwrap();
        store.create_event(2, event_fields(chess.id)).await.unwrap();
        store.create_event(2, event_fields(uno.id)).await.unwrap();

        let stats = store
            .list_games(GameQuery {
                viewer_id: 1,
                game_type_id: None,
            })
            .await
            .unwrap();
        let counts: Vec<_> = stats
            .iter()
            .map(|row| (row.game.id, row.event_count, row.user_event_count))
            .collect();
        assert_eq!(counts, vec![(chess.id, 2, 1), (uno.id, 1, 0)]);

        let card_games = store
            .list_games(GameQuery {
                viewer_id: 1,
                game_type_id: Some(2),
            })
            .await
            .unwrap();
        assert_eq!(card_games.len(), 1);
        assert_eq!(card_games[0].game.id, uno.id);
    }

    #[tokio::test]
    async fn deleting_a_game_cascades_to_events_and_attendance() {
        let store = seeded().await;
        let chess = store.create_game(1, game_fields("Chess", 1)).await.unwrap();
        let event = store.create_event(1, event_fields(chess.id)).await.unwrap();
        store.add_attendee(event.id, 2).await.unwrap();

        store.delete_game(chess.id).await.unwrap();

        assert!(store.find_event(event.id, None).await.unwrap().is_none());
        assert!(store.inner.read().await.attendance.is_empty());
        let err = store.delete_game(chess.id).await.unwrap_err();
        assert_eq!(err.missing_entity(), Some(EntityKind::Game));
    }

    #[tokio::test]
    async fn attendance_rows_drive_counts_and_joined() {
        let store = seeded().await;
        let chess = store.create_game(1, game_fields("Chess", 1)).await.unwrap();
        let event = store.create_event(1, event_fields(chess.id)).await.unwrap();

        store.add_attendee(event.id, 2).await.unwrap();
        store.add_attendee(event.id, 2).await.unwrap();

        let for_bob = store.find_event(event.id, Some(2)).await.unwrap().unwrap();
        assert_eq!(for_bob.attendees_count, 2);
        assert_eq!(for_bob.joined, Some(true));

        let for_alice = store.list_events(1).await.unwrap();
        assert_eq!(for_alice[0].joined, Some(false));

        let anonymous = store.find_event(event.id, None).await.unwrap().unwrap();
        assert_eq!(anonymous.joined, None);

        store.remove_attendee(event.id, 2).await.unwrap();
        let after = store.find_event(event.id, Some(2)).await.unwrap().unwrap();
        assert_eq!(after.attendees_count, 1);

        let err = store.remove_attendee(event.id, 1).await.unwrap_err();
        assert_eq!(err.missing_entity(), Some(EntityKind::EventGamer));
    }

    #[tokio::test]
    async fn signup_requires_existing_event() {
        let store = seeded().await;
        let err = store.add_attendee(7, 1).await.unwrap_err();
        assert_eq!(err.missing_entity(), Some(EntityKind::Event));
    }
}
