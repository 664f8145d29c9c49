use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationErrors};

use crate::{
    dao::models::{GameEntity, GameFields, GameStatsEntity, GameTypeEntity, GamerEntity},
    dto::{
        directory::{GameTypeSummary, GamerSummary},
        validation::{check, required, required_text},
    },
};

const TITLE_MAX_CHARS: usize = 50;
const MAKER_MAX_CHARS: usize = 50;

/// Payload accepted by game creation and full replacement.
///
/// Every field is required; absent ones are reported as field errors.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct GameRequest {
    /// Non-blank, at most 50 characters.
    pub title: Option<String>,
    /// Non-blank, at most 50 characters.
    pub maker: Option<String>,
    /// Also accepted as `numberOfPlayers`.
    #[serde(alias = "numberOfPlayers")]
    pub number_of_players: Option<i32>,
    /// Also accepted as `skillLevel`.
    #[serde(alias = "skillLevel")]
    pub skill_level: Option<i32>,
    /// Identifier of an existing game type, also accepted as `gameType`.
    #[serde(alias = "gameType")]
    pub game_type: Option<i64>,
}

impl Validate for GameRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.clone().into_fields().map(|_| ())
    }
}

impl GameRequest {
    /// Validate and convert into the stored columns.
    pub fn into_fields(self) -> Result<GameFields, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let title = check(&mut errors, "title", required_text(self.title, TITLE_MAX_CHARS));
        let maker = check(&mut errors, "maker", required_text(self.maker, MAKER_MAX_CHARS));
        let number_of_players = check(
            &mut errors,
            "number_of_players",
            required(self.number_of_players),
        );
        let skill_level = check(&mut errors, "skill_level", required(self.skill_level));
        let game_type_id = check(&mut errors, "game_type", required(self.game_type));

        match (title, maker, number_of_players, skill_level, game_type_id) {
            (
                Some(title),
                Some(maker),
                Some(number_of_players),
                Some(skill_level),
                Some(game_type_id),
            ) => Ok(GameFields {
                title,
                maker,
                number_of_players,
                skill_level,
                game_type_id,
            }),
            _ => Err(errors),
        }
    }
}

/// Query string of the game listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GameListQuery {
    /// Only return games of this game type.
    #[serde(rename = "type")]
    pub game_type: Option<i64>,
}

/// Echo of a freshly created game; relations are returned as ids.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedGame {
    /// Identifier assigned by the store.
    pub id: i64,
    /// Submitted title.
    pub title: String,
    /// Submitted maker.
    pub maker: String,
    /// Submitted player count.
    pub number_of_players: i32,
    /// Submitted skill level.
    pub skill_level: i32,
    /// Game type id.
    pub game_type: i64,
}

impl From<GameEntity> for CreatedGame {
    fn from(game: GameEntity) -> Self {
        Self {
            id: game.id,
            title: game.title,
            maker: game.maker,
            number_of_players: game.number_of_players,
            skill_level: game.skill_level,
            game_type: game.game_type_id,
        }
    }
}

/// Game with its creator and type expanded one level.
///
/// The counts are only filled by the listing; single retrieval returns `null`.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameDetail {
    /// Game identifier.
    pub id: i64,
    /// Creator of the game.
    pub gamer: GamerSummary,
    /// Category of the game.
    pub game_type: GameTypeSummary,
    /// Publisher or designer.
    pub maker: String,
    /// Name of the game.
    pub title: String,
    /// Players needed for a session.
    pub number_of_players: i32,
    /// Expected experience.
    pub skill_level: i32,
    /// Events scheduled for the game.
    pub event_count: Option<i64>,
    /// Events of the game organized by the caller.
    pub user_event_count: Option<i64>,
}

impl GameDetail {
    /// Expand `game` without counts.
    pub fn new(game: GameEntity, gamer: &GamerEntity, game_type: &GameTypeEntity) -> Self {
        Self {
            id: game.id,
            gamer: gamer.into(),
            game_type: game_type.into(),
            maker: game.maker,
            title: game.title,
            number_of_players: game.number_of_players,
            skill_level: game.skill_level,
            event_count: None,
            user_event_count: None,
        }
    }

    /// Expand a listing row, counts included.
    pub fn with_stats(
        stats: GameStatsEntity,
        gamer: &GamerEntity,
        game_type: &GameTypeEntity,
    ) -> Self {
        Self {
            event_count: Some(stats.event_count),
            user_event_count: Some(stats.user_event_count),
            ..Self::new(stats.game, gamer, game_type)
        }
    }
}

/// Game nested inside another resource, relations kept as ids.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameRecord {
    /// Game identifier.
    pub id: i64,
    /// Creator id.
    pub gamer: i64,
    /// Game type id.
    pub game_type: i64,
    /// Publisher or designer.
    pub maker: String,
    /// Name of the game.
    pub title: String,
    /// Players needed for a session.
    pub number_of_players: i32,
    /// Expected experience.
    pub skill_level: i32,
}

impl From<GameEntity> for GameRecord {
    fn from(game: GameEntity) -> Self {
        Self {
            id: game.id,
            gamer: game.gamer_id,
            game_type: game.game_type_id,
            maker: game.maker,
            title: game.title,
            number_of_players: game.number_of_players,
            skill_level: game.skill_level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(title: &str, maker: &str) -> GameRequest {
        GameRequest {
            title: Some(title.into()),
            maker: Some(maker.into()),
            number_of_players: Some(2),
            skill_level: Some(3),
            game_type: Some(1),
        }
    }

    #[test]
    fn accepts_camel_case_aliases() {
        let payload: GameRequest = serde_json::from_str(
            r#"{"title":"Chess","maker":"Staunton","numberOfPlayers":2,"skillLevel":3,"gameType":1}"#,
        )
        .unwrap();
        assert_eq!(payload.number_of_players, Some(2));
        assert_eq!(payload.skill_level, Some(3));
        assert_eq!(payload.game_type, Some(1));
    }

    #[test]
    fn reports_each_invalid_field() {
        let errors = request(&"x".repeat(51), "  ").validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["title"][0].code, "max_length");
        assert_eq!(fields["maker"][0].code, "blank");
    }

    #[test]
    fn absent_fields_are_required() {
        let payload: GameRequest =
            serde_json::from_str(r#"{"title":"Chess","maker":"Staunton","numberOfPlayers":2}"#)
                .unwrap();
        let errors = payload.into_fields().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["skill_level"][0].code, "required");
        assert_eq!(fields["game_type"][0].code, "required");
    }

    #[test]
    fn converts_valid_payload() {
        let fields = request("Chess", "Staunton").into_fields().unwrap();
        assert_eq!(fields.title, "Chess");
        assert_eq!(fields.game_type_id, 1);
    }
}
