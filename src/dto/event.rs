use serde::{Deserialize, Serialize};
use time::{Date, Time};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::{
    dao::models::{EventEntity, EventFields, EventStatsEntity, GameEntity, GamerEntity},
    dto::{
        directory::GamerSummary,
        game::GameRecord,
        validation::{check, parse_date_field, parse_time_field, required, required_text},
    },
    formats,
};

const DESCRIPTION_MAX_CHARS: usize = 100;

/// Payload accepted by event creation and full replacement.
///
/// Every field is required; absent ones are reported as field errors.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct EventRequest {
    /// Non-blank, at most 100 characters.
    pub description: Option<String>,
    /// Calendar date, `YYYY-MM-DD`.
    #[schema(example = "2024-05-18")]
    pub date: Option<String>,
    /// Time of day, `HH:MM[:SS]`.
    #[schema(example = "19:30:00")]
    pub time: Option<String>,
    /// Identifier of an existing game, also accepted as `gameId`.
    #[serde(alias = "gameId")]
    pub game: Option<i64>,
}

impl Validate for EventRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.clone().into_fields().map(|_| ())
    }
}

impl EventRequest {
    /// Validate and convert into the stored columns.
    pub fn into_fields(self) -> Result<EventFields, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let description = check(
            &mut errors,
            "description",
            required_text(self.description, DESCRIPTION_MAX_CHARS),
        );
        let date = check(
            &mut errors,
            "date",
            required(self.date).and_then(|date| parse_date_field(&date)),
        );
        let time = check(
            &mut errors,
            "time",
            required(self.time).and_then(|time| parse_time_field(&time)),
        );
        let game_id = check(&mut errors, "game", required(self.game));

        match (description, date, time, game_id) {
            (Some(description), Some(date), Some(time), Some(game_id)) => Ok(EventFields {
                description,
                date,
                time,
                game_id,
            }),
            _ => Err(errors),
        }
    }
}

/// Echo of a freshly created event; the game is returned as an id.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedEvent {
    /// Identifier assigned by the store.
    pub id: i64,
    /// Submitted description.
    pub description: String,
    /// Calendar date.
    #[serde(serialize_with = "formats::serialize_date")]
    #[schema(value_type = String, example = "2024-05-18")]
    pub date: Date,
    /// Start time.
    #[serde(serialize_with = "formats::serialize_time")]
    #[schema(value_type = String, example = "19:30:00")]
    pub time: Time,
    /// Game id.
    pub game: i64,
}

impl From<EventEntity> for CreatedEvent {
    fn from(event: EventEntity) -> Self {
        Self {
            id: event.id,
            description: event.description,
            date: event.date,
            time: event.time,
            game: event.game_id,
        }
    }
}

/// Event with its organizer and game expanded one level.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventDetail {
    /// Event identifier.
    pub id: i64,
    /// Gamer who scheduled the event.
    pub organizer: GamerSummary,
    /// Game played, relations as ids.
    pub game: GameRecord,
    /// Free text.
    pub description: String,
    /// Calendar date.
    #[serde(serialize_with = "formats::serialize_date")]
    #[schema(value_type = String, example = "2024-05-18")]
    pub date: Date,
    /// Start time.
    #[serde(serialize_with = "formats::serialize_time")]
    #[schema(value_type = String, example = "19:30:00")]
    pub time: Time,
    /// `1` when the caller attends, `0` otherwise; `null` without a caller.
    pub joined: Option<u8>,
    /// Attendance rows of the event.
    pub attendees_count: i64,
}

impl EventDetail {
    /// Expand an annotated event with its organizer and game.
    pub fn new(stats: EventStatsEntity, organizer: &GamerEntity, game: GameEntity) -> Self {
        let EventStatsEntity {
            event,
            attendees_count,
            joined,
        } = stats;

        Self {
            id: event.id,
            organizer: organizer.into(),
            game: game.into(),
            description: event.description,
            date: event.date,
            time: event.time,
            joined: joined.map(u8::from),
            attendees_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, time};

    fn request(description: &str, date: &str, time: &str) -> EventRequest {
        EventRequest {
            description: Some(description.into()),
            date: Some(date.into()),
            time: Some(time.into()),
            game: Some(4),
        }
    }

    #[test]
    fn accepts_game_id_alias_and_short_time() {
        let payload: EventRequest = serde_json::from_str(
            r#"{"description":"Chess night","date":"2024-05-18","time":"19:30","gameId":4}"#,
        )
        .unwrap();
        let fields = payload.into_fields().unwrap();
        assert_eq!(fields.date, date!(2024 - 05 - 18));
        assert_eq!(fields.time, time!(19:30));
        assert_eq!(fields.game_id, 4);
    }

    #[test]
    fn collects_every_field_error() {
        let errors = request(&"d".repeat(101), "18/05/2024", "late")
            .into_fields()
            .unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields["description"][0].code, "max_length");
        assert_eq!(fields["date"][0].code, "date_format");
        assert_eq!(fields["time"][0].code, "time_format");
    }

    #[test]
    fn missing_game_is_a_field_error() {
        let payload: EventRequest = serde_json::from_str(
            r#"{"description":"Chess night","date":"2024-05-18","time":"19:30"}"#,
        )
        .unwrap();
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["game"][0].code, "required");
    }

    #[test]
    fn serializes_calendar_fields() {
        let created = CreatedEvent::from(EventEntity {
            id: 9,
            organizer_id: 1,
            game_id: 4,
            description: "Chess night".into(),
            date: date!(2024 - 05 - 18),
            time: time!(19:30),
        });
        let json = serde_json::to_value(created).unwrap();
        assert_eq!(json["date"], "2024-05-18");
        assert_eq!(json["time"], "19:30:00");
        assert_eq!(json["game"], 4);
    }
}
