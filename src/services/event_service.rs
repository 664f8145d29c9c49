//! Events and attendance: CRUD on events plus the signup and leave actions.

use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    dao::{
        models::{EventStatsEntity, GameEntity},
        storage::{EntityKind, StorageError},
        store::LevelUpStore,
    },
    dto::{
        common::MessageResponse,
        event::{CreatedEvent, EventDetail, EventRequest},
        validation::invalid_pk,
    },
    error::ServiceError,
    services::directory_service::{self, Lookup, gamers_by_id, related},
    state::SharedState,
};

/// Fetch one event with attendance figures.
///
/// `joined` is computed only when a caller is supplied.
pub async fn retrieve(
    state: &SharedState,
    id: i64,
    caller_uid: Option<&str>,
) -> Result<EventDetail, ServiceError> {
    let store = state.require_store().await?;
    let viewer_id = match caller_uid {
        Some(uid) => Some(directory_service::resolve_caller(&store, uid).await?.id),
        None => None,
    };

    let Some(row) = store.find_event(id, viewer_id).await? else {
        return Err(StorageError::not_found(EntityKind::Event).into());
    };

    let mut details = expand(&store, vec![row]).await?;
    details
        .pop()
        .ok_or_else(|| ServiceError::Internal(format!("event `{id}` vanished during expansion")))
}

/// List every event with attendance figures for the caller.
pub async fn list(
    state: &SharedState,
    caller_uid: &str,
) -> Result<Vec<EventDetail>, ServiceError> {
    let store = state.require_store().await?;
    let caller = directory_service::resolve_caller(&store, caller_uid).await?;

    let rows = store.list_events(caller.id).await?;
    expand(&store, rows).await
}

/// Schedule an event organized by the caller.
pub async fn create(
    state: &SharedState,
    caller_uid: &str,
    payload: EventRequest,
) -> Result<CreatedEvent, ServiceError> {
    let store = state.require_store().await?;
    let organizer = directory_service::resolve_caller(&store, caller_uid).await?;
    let fields = payload.into_fields()?;
    let game_id = fields.game_id;

    let event = store
        .create_event(organizer.id, fields)
        .await
        .map_err(|err| match err.missing_entity() {
            Some(EntityKind::Game) => invalid_pk("game", game_id).into(),
            _ => ServiceError::from(err),
        })?;

    info!(event_id = event.id, organizer_id = organizer.id, "event created");
    Ok(event.into())
}

/// Replace every mutable column of an event.
pub async fn update(
    state: &SharedState,
    id: i64,
    payload: EventRequest,
) -> Result<(), ServiceError> {
    let fields = payload.into_fields()?;
    let store = state.require_store().await?;
    store.update_event(id, fields).await?;

    debug!(event_id = id, "event updated");
    Ok(())
}

/// Delete an event and its attendance rows.
pub async fn destroy(state: &SharedState, id: i64) -> Result<(), ServiceError> {
    let store = state.require_store().await?;
    store.delete_event(id).await?;

    info!(event_id = id, "event deleted");
    Ok(())
}

/// Record the caller as attending the event.
pub async fn signup(
    state: &SharedState,
    caller_uid: &str,
    event_id: i64,
) -> Result<MessageResponse, ServiceError> {
    let store = state.require_store().await?;
    let gamer = directory_service::resolve_caller(&store, caller_uid).await?;
    store.add_attendee(event_id, gamer.id).await?;

    debug!(event_id, gamer_id = gamer.id, "gamer joined event");
    Ok(MessageResponse::new("Gamer added"))
}

/// Remove one attendance row of the caller for the event.
pub async fn leave(
    state: &SharedState,
    caller_uid: &str,
    event_id: i64,
) -> Result<MessageResponse, ServiceError> {
    let store = state.require_store().await?;
    let gamer = directory_service::resolve_caller(&store, caller_uid).await?;
    store.remove_attendee(event_id, gamer.id).await?;

    debug!(event_id, gamer_id = gamer.id, "gamer left event");
    Ok(MessageResponse::new("Gamer removed"))
}

async fn expand(
    store: &Arc<dyn LevelUpStore>,
    rows: Vec<EventStatsEntity>,
) -> Result<Vec<EventDetail>, ServiceError> {
    let organizers = gamers_by_id(store, rows.iter().map(|row| row.event.organizer_id)).await?;
    let games: Lookup<GameEntity> = store
        .find_games(rows.iter().map(|row| row.event.game_id).collect())
        .await?
        .into_iter()
        .map(|game| (game.id, game))
        .collect();

    rows.into_iter()
        .map(|row| {
            let organizer = related(&organizers, row.event.organizer_id, EntityKind::Gamer)?;
            let game = related(&games, row.event.game_id, EntityKind::Game)?.clone();
            Ok(EventDetail::new(row, organizer, game))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::AppConfig,
        dao::{
            models::{GameFields, GamerEntity},
            store::memory::MemoryStore,
        },
        services::directory_service::seed_directories,
        state::AppState,
    };

    async fn seeded() -> SharedState {
        let store = MemoryStore::new();
        let gamers = vec![
            GamerEntity {
                id: 1,
                uid: "alice".into(),
                bio: "Organizer".into(),
            },
            GamerEntity {
                id: 2,
                uid: "bob".into(),
                bio: "Player".into(),
            },
        ];
        let config = AppConfig::new(gamers, AppConfig::builtin().game_types().to_vec());
        seed_directories(&store, &config).await.unwrap();
        AppState::with_store(Arc::new(store)).await
    }

    async fn game(state: &SharedState) -> GameEntity {
        let store = state.require_store().await.unwrap();
        store
            .create_game(
                1,
                GameFields {
                    title: "Chess".into(),
                    maker: "Staunton".into(),
                    number_of_players: 2,
                    skill_level: 3,
                    game_type_id: 1,
                },
            )
            .await
            .unwrap()
    }

    fn meetup(game: i64) -> EventRequest {
        EventRequest {
            description: Some("Chess night".into()),
            date: Some("2024-05-18".into()),
            time: Some("19:30".into()),
            game: Some(game),
        }
    }

    #[tokio::test]
    async fn signup_and_leave_move_the_attendee_count() {
        let state = seeded().await;
        let game = game(&state).await;
        let event = create(&state, "alice", meetup(game.id)).await.unwrap();

        let message = signup(&state, "bob", event.id).await.unwrap();
        assert_eq!(message.message, "Gamer added");
        let detail = retrieve(&state, event.id, Some("bob")).await.unwrap();
        assert_eq!(detail.attendees_count, 1);
        assert_eq!(detail.joined, Some(1));

        let message = leave(&state, "bob", event.id).await.unwrap();
        assert_eq!(message.message, "Gamer removed");
        let detail = retrieve(&state, event.id, None).await.unwrap();
        assert_eq!(detail.attendees_count, 0);
        assert_eq!(detail.joined, None);
    }

    #[tokio::test]
    async fn leaving_an_event_never_joined_is_not_found() {
        let state = seeded().await;
        let game = game(&state).await;
        let event = create(&state, "alice", meetup(game.id)).await.unwrap();

        let err = leave(&state, "bob", event.id).await.unwrap_err();
        assert!(
            matches!(err, ServiceError::NotFound(ref message) if message == "EventGamer matching query does not exist.")
        );
        assert!(matches!(
            signup(&state, "bob", 404).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn listing_marks_joined_events_for_the_caller() {
        let state = seeded().await;
        let game = game(&state).await;
        let first = create(&state, "alice", meetup(game.id)).await.unwrap();
        let second = create(&state, "alice", meetup(game.id)).await.unwrap();
        signup(&state, "bob", second.id).await.unwrap();
        signup(&state, "alice", first.id).await.unwrap();

        let events = list(&state, "bob").await.unwrap();
        let joined: Vec<(i64, Option<u8>)> = events.iter().map(|e| (e.id, e.joined)).collect();
        assert_eq!(joined, vec![(first.id, Some(0)), (second.id, Some(1))]);
        assert_eq!(events[0].organizer.id, 1);
        assert_eq!(events[0].game.id, game.id);
        assert_eq!(events[0].attendees_count, 1);
    }

    #[tokio::test]
    async fn unknown_game_is_a_field_error_on_create_and_not_found_on_update() {
        let state = seeded().await;
        let game = game(&state).await;

        let err = create(&state, "alice", meetup(77)).await.unwrap_err();
        match err {
            ServiceError::Validation(errors) => {
                assert!(errors.field_errors().contains_key("game"))
            }
            other => panic!("expected validation error, got {other:?}"),
        }

        let event = create(&state, "alice", meetup(game.id)).await.unwrap();
        assert!(matches!(
            update(&state, event.id, meetup(77)).await,
            Err(ServiceError::NotFound(_))
        ));

        let mut payload = meetup(game.id);
        payload.description = Some("Rematch".into());
        payload.time = Some("20:15:00".into());
        update(&state, event.id, payload).await.unwrap();
        let detail = retrieve(&state, event.id, None).await.unwrap();
        assert_eq!(detail.description, "Rematch");
        assert_eq!(crate::formats::format_time(detail.time), "20:15:00");
    }

    #[tokio::test]
    async fn deleting_the_game_removes_its_events() {
        let state = seeded().await;
        let game = game(&state).await;
        let event = create(&state, "alice", meetup(game.id)).await.unwrap();

        crate::services::game_service::destroy(&state, game.id)
            .await
            .unwrap();
        assert!(matches!(
            retrieve(&state, event.id, None).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
