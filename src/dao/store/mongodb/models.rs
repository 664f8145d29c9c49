use mongodb::bson::{Document, doc};
use serde::{Deserialize, Serialize};

use super::error::{MongoDaoError, MongoResult};
use crate::{
    dao::models::{
        EventEntity, EventStatsEntity, GameEntity, GameStatsEntity, GameTypeEntity, GamerEntity,
    },
    formats,
};

pub const GAMER_COLLECTION_NAME: &str = "gamers";
pub const GAME_TYPE_COLLECTION_NAME: &str = "game_types";
pub const GAME_COLLECTION_NAME: &str = "games";
pub const EVENT_COLLECTION_NAME: &str = "events";
pub const EVENT_GAMER_COLLECTION_NAME: &str = "event_gamers";
pub const COUNTER_COLLECTION_NAME: &str = "counters";

pub fn doc_id(id: i64) -> Document {
    doc! {"_id": id}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoGamerDocument {
    #[serde(rename = "_id")]
    pub id: i64,
    pub uid: String,
    #[serde(default)]
    pub bio: String,
}

impl From<GamerEntity> for MongoGamerDocument {
    fn from(value: GamerEntity) -> Self {
        Self {
            id: value.id,
            uid: value.uid,
            bio: value.bio,
        }
    }
}

impl From<MongoGamerDocument> for GamerEntity {
    fn from(value: MongoGamerDocument) -> Self {
        Self {
            id: value.id,
            uid: value.uid,
            bio: value.bio,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoGameTypeDocument {
    #[serde(rename = "_id")]
    pub id: i64,
    pub label: String,
}

impl From<GameTypeEntity> for MongoGameTypeDocument {
    fn from(value: GameTypeEntity) -> Self {
        Self {
            id: value.id,
            label: value.label,
        }
    }
}

impl From<MongoGameTypeDocument> for GameTypeEntity {
    fn from(value: MongoGameTypeDocument) -> Self {
        Self {
            id: value.id,
            label: value.label,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoGameDocument {
    #[serde(rename = "_id")]
    pub id: i64,
    pub gamer_id: i64,
    pub game_type_id: i64,
    pub title: String,
    pub maker: String,
    pub number_of_players: i32,
    pub skill_level: i32,
}

impl From<GameEntity> for MongoGameDocument {
    fn from(value: GameEntity) -> Self {
        Self {
            id: value.id,
            gamer_id: value.gamer_id,
            game_type_id: value.game_type_id,
            title: value.title,
            maker: value.maker,
            number_of_players: value.number_of_players,
            skill_level: value.skill_level,
        }
    }
}

impl From<MongoGameDocument> for GameEntity {
    fn from(value: MongoGameDocument) -> Self {
        Self {
            id: value.id,
            gamer_id: value.gamer_id,
            game_type_id: value.game_type_id,
            title: value.title,
            maker: value.maker,
            number_of_players: value.number_of_players,
            skill_level: value.skill_level,
        }
    }
}

/// Output row of the game listing aggregation.
#[derive(Debug, Deserialize)]
pub struct MongoGameStatsDocument {
    #[serde(flatten)]
    pub game: MongoGameDocument,
    pub event_count: i64,
    pub user_event_count: i64,
}

impl From<MongoGameStatsDocument> for GameStatsEntity {
    fn from(value: MongoGameStatsDocument) -> Self {
        Self {
            game: value.game.into(),
            event_count: value.event_count,
            user_event_count: value.user_event_count,
        }
    }
}

/// Dates and times are kept as their ISO strings so documents stay readable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoEventDocument {
    #[serde(rename = "_id")]
    pub id: i64,
    pub organizer_id: i64,
    pub game_id: i64,
    pub description: String,
    pub date: String,
    pub time: String,
}

impl From<EventEntity> for MongoEventDocument {
    fn from(value: EventEntity) -> Self {
        Self {
            id: value.id,
            organizer_id: value.organizer_id,
            game_id: value.game_id,
            description: value.description,
            date: formats::format_date(value.date),
            time: formats::format_time(value.time),
        }
    }
}

impl TryFrom<MongoEventDocument> for EventEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoEventDocument) -> MongoResult<Self> {
        let invalid = |reason: String| MongoDaoError::InvalidDocument {
            collection: EVENT_COLLECTION_NAME,
            id: value.id,
            reason,
        };
        let date = formats::parse_date(&value.date)
            .map_err(|err| invalid(format!("date `{}`: {err}", value.date)))?;
        let time = formats::parse_time(&value.time)
            .map_err(|err| invalid(format!("time `{}`: {err}", value.time)))?;

        Ok(Self {
            id: value.id,
            organizer_id: value.organizer_id,
            game_id: value.game_id,
            description: value.description,
            date,
            time,
        })
    }
}

/// Output row of the event aggregation; `joined` counts the viewer's rows.
#[derive(Debug, Deserialize)]
pub struct MongoEventStatsDocument {
    #[serde(flatten)]
    pub event: MongoEventDocument,
    pub attendees_count: i64,
    #[serde(default)]
    pub joined: Option<i64>,
}

impl TryFrom<MongoEventStatsDocument> for EventStatsEntity {
    type Error = MongoDaoError;

    fn try_from(value: MongoEventStatsDocument) -> MongoResult<Self> {
        Ok(Self {
            event: value.event.try_into()?,
            attendees_count: value.attendees_count,
            joined: value.joined.map(|rows| rows > 0),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoEventGamerDocument {
    #[serde(rename = "_id")]
    pub id: i64,
    pub gamer_id: i64,
    pub event_id: i64,
}

/// Sequence document backing auto-incremented ids.
#[derive(Debug, Deserialize)]
pub struct MongoCounterDocument {
    pub seq: i64,
}

#[cfg(test)]
mod tests {
    use time::macros::{date, time};

    use super::*;

    fn event() -> EventEntity {
        EventEntity {
            id: 5,
            organizer_id: 1,
            game_id: 2,
            description: "Chess night".into(),
            date: date!(2024 - 05 - 18),
            time: time!(19:30),
        }
    }

    fn stats(joined: Option<i64>) -> MongoEventStatsDocument {
        MongoEventStatsDocument {
            event: event().into(),
            attendees_count: 3,
            joined,
        }
    }

    #[test]
    fn event_document_stores_iso_strings() {
        let document = MongoEventDocument::from(event());
        assert_eq!(document.date, "2024-05-18");
        assert_eq!(document.time, "19:30:00");

        let entity = EventEntity::try_from(document).unwrap();
        assert_eq!(entity, event());
    }

    #[test]
    fn unreadable_date_is_an_invalid_document() {
        let mut document = MongoEventDocument::from(event());
        document.date = "18/05/2024".into();

        let err = EventEntity::try_from(document).unwrap_err();
        assert!(matches!(
            err,
            MongoDaoError::InvalidDocument { collection: EVENT_COLLECTION_NAME, id: 5, .. }
        ));
    }

    #[test]
    fn joined_reflects_viewer_rows() {
        let joined = EventStatsEntity::try_from(stats(Some(2))).unwrap();
        assert_eq!(joined.joined, Some(true));
        assert_eq!(joined.attendees_count, 3);

        let absent = EventStatsEntity::try_from(stats(Some(0))).unwrap();
        assert_eq!(absent.joined, Some(false));

        let anonymous = EventStatsEntity::try_from(stats(None)).unwrap();
        assert_eq!(anonymous.joined, None);
    }
}
