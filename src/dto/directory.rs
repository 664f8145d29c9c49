use serde::Serialize;
use utoipa::ToSchema;

use crate::dao::models::{GameTypeEntity, GamerEntity};

/// Public projection of a gamer; the `uid` never leaves the server.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GamerSummary {
    /// Gamer identifier.
    pub id: i64,
    /// Free-form profile text.
    pub bio: String,
}

impl From<&GamerEntity> for GamerSummary {
    fn from(gamer: &GamerEntity) -> Self {
        Self {
            id: gamer.id,
            bio: gamer.bio.clone(),
        }
    }
}

/// Game type as exposed to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GameTypeSummary {
    /// Game type identifier.
    pub id: i64,
    /// Display name.
    pub label: String,
}

impl From<&GameTypeEntity> for GameTypeSummary {
    fn from(game_type: &GameTypeEntity) -> Self {
        Self {
            id: game_type.id,
            label: game_type.label.clone(),
        }
    }
}

impl From<GameTypeEntity> for GameTypeSummary {
    fn from(game_type: GameTypeEntity) -> Self {
        Self {
            id: game_type.id,
            label: game_type.label,
        }
    }
}
