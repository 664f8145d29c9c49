use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, ClientSession, Collection, Database, IndexModel,
    bson::{Bson, Document, doc},
    options::{IndexOptions, ReturnDocument},
};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{
        COUNTER_COLLECTION_NAME, EVENT_COLLECTION_NAME, EVENT_GAMER_COLLECTION_NAME,
        GAME_COLLECTION_NAME, GAME_TYPE_COLLECTION_NAME, GAMER_COLLECTION_NAME,
        MongoCounterDocument, MongoEventDocument, MongoEventGamerDocument,
        MongoEventStatsDocument, MongoGameDocument, MongoGameStatsDocument,
        MongoGameTypeDocument, MongoGamerDocument, doc_id,
    },
};
use crate::dao::{
    models::{
        EventEntity, EventFields, EventStatsEntity, GameEntity, GameFields, GameQuery,
        GameStatsEntity, GameTypeEntity, GamerEntity,
    },
    storage::{EntityKind, StorageError, StorageResult},
    store::LevelUpStore,
};

/// MongoDB-backed [`LevelUpStore`].
///
/// Mutations run inside multi-document transactions, so the server must be a
/// replica set (a single-node replica set is enough for development).
#[derive(Clone)]
pub struct MongoStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

/// Commit on success, abort otherwise.
async fn finish<T>(session: &mut ClientSession, outcome: StorageResult<T>) -> StorageResult<T> {
    match outcome {
        Ok(value) => {
            session
                .commit_transaction()
                .await
                .map_err(|source| MongoDaoError::Transaction {
                    action: "commit",
                    source,
                })?;
            Ok(value)
        }
        Err(err) => {
            if let Err(abort_err) = session.abort_transaction().await {
                warn!(error = %abort_err, "failed to abort MongoDB transaction");
            }
            Err(err)
        }
    }
}

fn event_stats_pipeline(filter: Document, viewer_id: Option<i64>) -> Vec<Document> {
    let mut annotations = doc! { "attendees_count": { "$size": "$attendees" } };
    if let Some(viewer_id) = viewer_id {
        annotations.insert(
            "joined",
            doc! {
                "$size": {
                    "$filter": {
                        "input": "$attendees",
                        "as": "row",
                        "cond": { "$eq": ["$$row.gamer_id", viewer_id] },
                    }
                }
            },
        );
    }

    vec![
        doc! { "$match": filter },
        doc! {
            "$lookup": {
                "from": EVENT_GAMER_COLLECTION_NAME,
                "localField": "_id",
                "foreignField": "event_id",
                "as": "attendees",
            }
        },
        doc! { "$addFields": annotations },
        doc! { "$project": { "attendees": 0 } },
        doc! { "$sort": { "_id": 1 } },
    ]
}

fn game_stats_pipeline(query: GameQuery) -> Vec<Document> {
    let mut pipeline = Vec::with_capacity(5);
    if let Some(game_type_id) = query.game_type_id {
        pipeline.push(doc! { "$match": { "game_type_id": game_type_id } });
    }
    pipeline.extend([
        doc! {
            "$lookup": {
                "from": EVENT_COLLECTION_NAME,
                "localField": "_id",
                "foreignField": "game_id",
                "as": "events",
            }
        },
        doc! {
            "$addFields": {
                "event_count": { "$size": "$events" },
                "user_event_count": {
                    "$size": {
                        "$filter": {
                            "input": "$events",
                            "as": "event",
                            "cond": { "$eq": ["$$event.organizer_id", query.viewer_id] },
                        }
                    }
                },
            }
        },
        doc! { "$project": { "events": 0 } },
        doc! { "$sort": { "_id": 1 } },
    ]);
    pipeline
}

impl MongoStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let database = self.database().await;
        let indexes: [(&'static str, &'static str, Document, bool); 5] = [
            (GAMER_COLLECTION_NAME, "uid", doc! {"uid": 1}, true),
            (GAME_COLLECTION_NAME, "game_type_id", doc! {"game_type_id": 1}, false),
            (EVENT_COLLECTION_NAME, "game_id", doc! {"game_id": 1}, false),
            (EVENT_COLLECTION_NAME, "organizer_id", doc! {"organizer_id": 1}, false),
            (
                EVENT_GAMER_COLLECTION_NAME,
                "event_id,gamer_id",
                doc! {"event_id": 1, "gamer_id": 1},
                false,
            ),
        ];

        for (collection, index, keys, unique) in indexes {
            let model = IndexModel::builder()
                .keys(keys)
                .options(
                    IndexOptions::builder()
                        .name(Some(format!("{collection}_{index}_idx")))
                        .unique(Some(unique))
                        .build(),
                )
                .build();

            database
                .collection::<Document>(collection)
                .create_index(model)
                .await
                .map_err(|source| MongoDaoError::EnsureIndex {
                    collection,
                    index,
                    source,
                })?;
        }

        Ok(())
    }

    async fn database(&self) -> Database {
        let guard = self.inner.state.read().await;
        guard.database.clone()
    }

    async fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        let guard = self.inner.state.read().await;
        guard.database.collection::<T>(name)
    }

    async fn begin(&self) -> MongoResult<ClientSession> {
        let client = {
            let guard = self.inner.state.read().await;
            guard.client.clone()
        };

        let mut session =
            client
                .start_session()
                .await
                .map_err(|source| MongoDaoError::Transaction {
                    action: "open a session for",
                    source,
                })?;
        session
            .start_transaction()
            .await
            .map_err(|source| MongoDaoError::Transaction {
                action: "start",
                source,
            })?;
        Ok(session)
    }

    async fn ensure_exists(
        &self,
        session: &mut ClientSession,
        collection: &'static str,
        id: i64,
        entity: EntityKind,
    ) -> StorageResult<()> {
        let count = self
            .collection::<Document>(collection)
            .await
            .count_documents(doc_id(id))
            .session(&mut *session)
            .await
            .map_err(|source| MongoDaoError::Load { collection, source })?;

        if count == 0 {
            return Err(StorageError::not_found(entity));
        }
        Ok(())
    }

    async fn next_id(
        &self,
        session: &mut ClientSession,
        collection: &'static str,
    ) -> StorageResult<i64> {
        let counter = self
            .collection::<MongoCounterDocument>(COUNTER_COLLECTION_NAME)
            .await
            .find_one_and_update(doc! {"_id": collection}, doc! {"$inc": {"seq": 1_i64}})
            .upsert(true)
            .return_document(ReturnDocument::After)
            .session(&mut *session)
            .await
            .map_err(|source| MongoDaoError::NextId { collection, source })?;

        match counter {
            Some(counter) => Ok(counter.seq),
            None => Err(MongoDaoError::InvalidDocument {
                collection: COUNTER_COLLECTION_NAME,
                id: 0,
                reason: format!("upsert returned no counter for `{collection}`"),
            }
            .into()),
        }
    }

    /// Delete the events matching `filter` together with their attendance rows.
    async fn delete_events(
        &self,
        session: &mut ClientSession,
        filter: Document,
    ) -> StorageResult<()> {
        let event_ids: Vec<Bson> = self
            .collection::<Document>(EVENT_COLLECTION_NAME)
            .await
            .distinct("_id", filter.clone())
            .session(&mut *session)
            .await
            .map_err(|source| MongoDaoError::Load {
                collection: EVENT_COLLECTION_NAME,
                source,
            })?;

        self.collection::<Document>(EVENT_GAMER_COLLECTION_NAME)
            .await
            .delete_many(doc! {"event_id": {"$in": event_ids}})
            .session(&mut *session)
            .await
            .map_err(|source| MongoDaoError::Delete {
                collection: EVENT_GAMER_COLLECTION_NAME,
                source,
            })?;

        self.collection::<Document>(EVENT_COLLECTION_NAME)
            .await
            .delete_many(filter)
            .session(&mut *session)
            .await
            .map_err(|source| MongoDaoError::Delete {
                collection: EVENT_COLLECTION_NAME,
                source,
            })?;

        Ok(())
    }

    async fn find_many<T>(&self, collection: &'static str, filter: Document) -> MongoResult<Vec<T>>
    where
        T: DeserializeOwned + Unpin + Send + Sync,
    {
        self.collection::<T>(collection)
            .await
            .find(filter)
            .sort(doc! {"_id": 1})
            .await
            .map_err(|source| MongoDaoError::Load { collection, source })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::Load { collection, source })
    }

    async fn find_one<T>(
        &self,
        collection: &'static str,
        filter: Document,
    ) -> MongoResult<Option<T>>
    where
        T: DeserializeOwned + Send + Sync,
    {
        self.collection::<T>(collection)
            .await
            .find_one(filter)
            .await
            .map_err(|source| MongoDaoError::Load { collection, source })
    }

    async fn save_gamer(&self, gamer: GamerEntity) -> MongoResult<()> {
        let document = MongoGamerDocument::from(gamer);
        self.collection::<MongoGamerDocument>(GAMER_COLLECTION_NAME)
            .await
            .replace_one(doc_id(document.id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::Save {
                collection: GAMER_COLLECTION_NAME,
                source,
            })?;
        Ok(())
    }

    async fn save_game_type(&self, game_type: GameTypeEntity) -> MongoResult<()> {
        let document = MongoGameTypeDocument::from(game_type);
        self.collection::<MongoGameTypeDocument>(GAME_TYPE_COLLECTION_NAME)
            .await
            .replace_one(doc_id(document.id), &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::Save {
                collection: GAME_TYPE_COLLECTION_NAME,
                source,
            })?;
        Ok(())
    }

    async fn find_gamer_by_uid(&self, uid: String) -> MongoResult<Option<GamerEntity>> {
        let gamer = self
            .find_one::<MongoGamerDocument>(GAMER_COLLECTION_NAME, doc! {"uid": uid})
            .await?;
        Ok(gamer.map(Into::into))
    }

    async fn find_gamers(&self, ids: Vec<i64>) -> MongoResult<Vec<GamerEntity>> {
        let gamers = self
            .find_many::<MongoGamerDocument>(GAMER_COLLECTION_NAME, doc! {"_id": {"$in": ids}})
            .await?;
        Ok(gamers.into_iter().map(Into::into).collect())
    }

    async fn find_game_types(&self, filter: Document) -> MongoResult<Vec<GameTypeEntity>> {
        let game_types = self
            .find_many::<MongoGameTypeDocument>(GAME_TYPE_COLLECTION_NAME, filter)
            .await?;
        Ok(game_types.into_iter().map(Into::into).collect())
    }

    async fn find_game_type(&self, id: i64) -> MongoResult<Option<GameTypeEntity>> {
        let game_type = self
            .find_one::<MongoGameTypeDocument>(GAME_TYPE_COLLECTION_NAME, doc_id(id))
            .await?;
        Ok(game_type.map(Into::into))
    }

    async fn find_game(&self, id: i64) -> MongoResult<Option<GameEntity>> {
        let game = self
            .find_one::<MongoGameDocument>(GAME_COLLECTION_NAME, doc_id(id))
            .await?;
        Ok(game.map(Into::into))
    }

    async fn find_games(&self, ids: Vec<i64>) -> MongoResult<Vec<GameEntity>> {
        let games = self
            .find_many::<MongoGameDocument>(GAME_COLLECTION_NAME, doc! {"_id": {"$in": ids}})
            .await?;
        Ok(games.into_iter().map(Into::into).collect())
    }

    async fn list_games(&self, query: GameQuery) -> MongoResult<Vec<GameStatsEntity>> {
        let load_error = |source| MongoDaoError::Load {
            collection: GAME_COLLECTION_NAME,
            source,
        };
        let rows: Vec<MongoGameStatsDocument> = self
            .collection::<MongoGameDocument>(GAME_COLLECTION_NAME)
            .await
            .aggregate(game_stats_pipeline(query))
            .with_type::<MongoGameStatsDocument>()
            .await
            .map_err(load_error)?
            .try_collect()
            .await
            .map_err(load_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn event_stats(
        &self,
        filter: Document,
        viewer_id: Option<i64>,
    ) -> MongoResult<Vec<EventStatsEntity>> {
        let load_error = |source| MongoDaoError::Load {
            collection: EVENT_COLLECTION_NAME,
            source,
        };
        let rows: Vec<MongoEventStatsDocument> = self
            .collection::<MongoEventDocument>(EVENT_COLLECTION_NAME)
            .await
            .aggregate(event_stats_pipeline(filter, viewer_id))
            .with_type::<MongoEventStatsDocument>()
            .await
            .map_err(load_error)?
            .try_collect()
            .await
            .map_err(load_error)?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn create_game(&self, gamer_id: i64, fields: GameFields) -> StorageResult<GameEntity> {
        let mut session = self.begin().await?;
        let outcome = async {
            self.ensure_exists(&mut session, GAMER_COLLECTION_NAME, gamer_id, EntityKind::Gamer)
                .await?;
            self.ensure_exists(
                &mut session,
                GAME_TYPE_COLLECTION_NAME,
                fields.game_type_id,
                EntityKind::GameType,
            )
            .await?;

            let id = self.next_id(&mut session, GAME_COLLECTION_NAME).await?;
            let game = GameEntity::new(id, gamer_id, fields);
            self.collection::<MongoGameDocument>(GAME_COLLECTION_NAME)
                .await
                .insert_one(MongoGameDocument::from(game.clone()))
                .session(&mut session)
                .await
                .map_err(|source| MongoDaoError::Save {
                    collection: GAME_COLLECTION_NAME,
                    source,
                })?;
            Ok::<_, StorageError>(game)
        }
        .await;
        finish(&mut session, outcome).await
    }

    async fn update_game(&self, id: i64, fields: GameFields) -> StorageResult<()> {
        let mut session = self.begin().await?;
        let outcome = async {
            let games = self
                .collection::<MongoGameDocument>(GAME_COLLECTION_NAME)
                .await;
            let current = games
                .find_one(doc_id(id))
                .session(&mut session)
                .await
                .map_err(|source| MongoDaoError::Load {
                    collection: GAME_COLLECTION_NAME,
                    source,
                })?
                .ok_or_else(|| StorageError::not_found(EntityKind::Game))?;
            self.ensure_exists(
                &mut session,
                GAME_TYPE_COLLECTION_NAME,
                fields.game_type_id,
                EntityKind::GameType,
            )
            .await?;

            let mut game = GameEntity::from(current);
            game.apply(fields);
            games
                .replace_one(doc_id(id), MongoGameDocument::from(game))
                .session(&mut session)
                .await
                .map_err(|source| MongoDaoError::Save {
                    collection: GAME_COLLECTION_NAME,
                    source,
                })?;
            Ok::<_, StorageError>(())
        }
        .await;
        finish(&mut session, outcome).await
    }

    async fn delete_game(&self, id: i64) -> StorageResult<()> {
        let mut session = self.begin().await?;
        let outcome = async {
            self.ensure_exists(&mut session, GAME_COLLECTION_NAME, id, EntityKind::Game)
                .await?;
            self.delete_events(&mut session, doc! {"game_id": id})
                .await?;
            self.collection::<Document>(GAME_COLLECTION_NAME)
                .await
                .delete_one(doc_id(id))
                .session(&mut session)
                .await
                .map_err(|source| MongoDaoError::Delete {
                    collection: GAME_COLLECTION_NAME,
                    source,
                })?;
            Ok::<_, StorageError>(())
        }
        .await;
        finish(&mut session, outcome).await
    }

    async fn create_event(
        &self,
        organizer_id: i64,
        fields: EventFields,
    ) -> StorageResult<EventEntity> {
        let mut session = self.begin().await?;
        let outcome = async {
            self.ensure_exists(
                &mut session,
                GAMER_COLLECTION_NAME,
                organizer_id,
                EntityKind::Gamer,
            )
            .await?;
            self.ensure_exists(
                &mut session,
                GAME_COLLECTION_NAME,
                fields.game_id,
                EntityKind::Game,
            )
            .await?;

            let id = self.next_id(&mut session, EVENT_COLLECTION_NAME).await?;
            let event = EventEntity::new(id, organizer_id, fields);
            self.collection::<MongoEventDocument>(EVENT_COLLECTION_NAME)
                .await
                .insert_one(MongoEventDocument::from(event.clone()))
                .session(&mut session)
                .await
                .map_err(|source| MongoDaoError::Save {
                    collection: EVENT_COLLECTION_NAME,
                    source,
                })?;
            Ok::<_, StorageError>(event)
        }
        .await;
        finish(&mut session, outcome).await
    }

    async fn update_event(&self, id: i64, fields: EventFields) -> StorageResult<()> {
        let mut session = self.begin().await?;
        let outcome = async {
            let events = self
                .collection::<MongoEventDocument>(EVENT_COLLECTION_NAME)
                .await;
            let current = events
                .find_one(doc_id(id))
                .session(&mut session)
                .await
                .map_err(|source| MongoDaoError::Load {
                    collection: EVENT_COLLECTION_NAME,
                    source,
                })?
                .ok_or_else(|| StorageError::not_found(EntityKind::Event))?;
            self.ensure_exists(
                &mut session,
                GAME_COLLECTION_NAME,
                fields.game_id,
                EntityKind::Game,
            )
            .await?;

            let mut event = EventEntity::try_from(current)?;
            event.apply(fields);
            events
                .replace_one(doc_id(id), MongoEventDocument::from(event))
                .session(&mut session)
                .await
                .map_err(|source| MongoDaoError::Save {
                    collection: EVENT_COLLECTION_NAME,
                    source,
                })?;
            Ok::<_, StorageError>(())
        }
        .await;
        finish(&mut session, outcome).await
    }

    async fn delete_event(&self, id: i64) -> StorageResult<()> {
        let mut session = self.begin().await?;
        let outcome = async {
            self.ensure_exists(&mut session, EVENT_COLLECTION_NAME, id, EntityKind::Event)
                .await?;
            self.delete_events(&mut session, doc_id(id)).await?;
            Ok::<_, StorageError>(())
        }
        .await;
        finish(&mut session, outcome).await
    }

    async fn add_attendee(&self, event_id: i64, gamer_id: i64) -> StorageResult<()> {
        let mut session = self.begin().await?;
        let outcome = async {
            self.ensure_exists(&mut session, GAMER_COLLECTION_NAME, gamer_id, EntityKind::Gamer)
                .await?;
            self.ensure_exists(&mut session, EVENT_COLLECTION_NAME, event_id, EntityKind::Event)
                .await?;

            let id = self
                .next_id(&mut session, EVENT_GAMER_COLLECTION_NAME)
                .await?;
            let row = MongoEventGamerDocument {
                id,
                gamer_id,
                event_id,
            };
            self.collection::<MongoEventGamerDocument>(EVENT_GAMER_COLLECTION_NAME)
                .await
                .insert_one(row)
                .session(&mut session)
                .await
                .map_err(|source| MongoDaoError::Save {
                    collection: EVENT_GAMER_COLLECTION_NAME,
                    source,
                })?;
            Ok::<_, StorageError>(())
        }
        .await;
        finish(&mut session, outcome).await
    }

    async fn remove_attendee(&self, event_id: i64, gamer_id: i64) -> StorageResult<()> {
        let mut session = self.begin().await?;
        let outcome = async {
            self.ensure_exists(&mut session, EVENT_COLLECTION_NAME, event_id, EntityKind::Event)
                .await?;

            let removed = self
                .collection::<MongoEventGamerDocument>(EVENT_GAMER_COLLECTION_NAME)
                .await
                .find_one_and_delete(doc! {"event_id": event_id, "gamer_id": gamer_id})
                .sort(doc! {"_id": 1})
                .session(&mut session)
                .await
                .map_err(|source| MongoDaoError::Delete {
                    collection: EVENT_GAMER_COLLECTION_NAME,
                    source,
                })?;

            match removed {
                Some(row) => {
                    debug!(row_id = row.id, event_id, gamer_id, "attendance row removed");
                    Ok(())
                }
                None => Err(StorageError::not_found(EntityKind::EventGamer)),
            }
        }
        .await;
        finish(&mut session, outcome).await
    }
}

impl LevelUpStore for MongoStore {
    fn save_gamer(&self, gamer: GamerEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_gamer(gamer).await.map_err(Into::into) })
    }

    fn save_game_type(&self, game_type: GameTypeEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_game_type(game_type).await.map_err(Into::into) })
    }

    fn find_gamer_by_uid(
        &self,
        uid: String,
    ) -> BoxFuture<'static, StorageResult<Option<GamerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_gamer_by_uid(uid).await.map_err(Into::into) })
    }

    fn find_gamers(&self, ids: Vec<i64>) -> BoxFuture<'static, StorageResult<Vec<GamerEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_gamers(ids).await.map_err(Into::into) })
    }

    fn find_game_type(
        &self,
        id: i64,
    ) -> BoxFuture<'static, StorageResult<Option<GameTypeEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_game_type(id).await.map_err(Into::into) })
    }

    fn find_game_types(
        &self,
        ids: Vec<i64>,
    ) -> BoxFuture<'static, StorageResult<Vec<GameTypeEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .find_game_types(doc! {"_id": {"$in": ids}})
                .await
                .map_err(Into::into)
        })
    }

    fn list_game_types(&self) -> BoxFuture<'static, StorageResult<Vec<GameTypeEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_game_types(doc! {}).await.map_err(Into::into) })
    }

    fn find_game(&self, id: i64) -> BoxFuture<'static, StorageResult<Option<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_game(id).await.map_err(Into::into) })
    }

    fn find_games(&self, ids: Vec<i64>) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.find_games(ids).await.map_err(Into::into) })
    }

    fn list_games(
        &self,
        query: GameQuery,
    ) -> BoxFuture<'static, StorageResult<Vec<GameStatsEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.list_games(query).await.map_err(Into::into) })
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
        Box::pin(async move {
            let mut rows = store.event_stats(doc_id(id), viewer_id).await?;
            Ok(rows.pop())
        })
    }

    fn list_events(
        &self,
        viewer_id: i64,
    ) -> BoxFuture<'static, StorageResult<Vec<EventStatsEntity>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .event_stats(doc! {}, Some(viewer_id))
                .await
                .map_err(Into::into)
        })
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
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}
