use std::{error::Error, fmt};
use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Kinds of persisted rows a lookup can miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    /// Directory gamer, also used for unknown callers.
    Gamer,
    /// Directory game type.
    GameType,
    /// Catalog game.
    Game,
    /// Scheduled event.
    Event,
    /// Attendance row.
    EventGamer,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Gamer => "Gamer",
            EntityKind::GameType => "GameType",
            EntityKind::Game => "Game",
            EntityKind::Event => "Event",
            EntityKind::EventGamer => "EventGamer",
        };
        f.write_str(name)
    }
}

/// Error raised by storage backends regardless of the underlying database.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not serve the call.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Backend error rendered for logs.
        message: String,
        /// Original backend failure.
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// A row referenced by the operation does not exist; nothing was written.
    #[error("{entity} matching query does not exist.")]
    NotFound {
        /// Kind of the missing row.
        entity: EntityKind,
    },
}

impl StorageError {
    /// Construct an unavailable error from any backend failure.
    pub fn unavailable(message: String, source: impl Error + Send + Sync + 'static) -> Self {
        StorageError::Unavailable {
            message,
            source: Box::new(source),
        }
    }

    /// Construct a lookup miss for `entity`.
    pub fn not_found(entity: EntityKind) -> Self {
        StorageError::NotFound { entity }
    }

    /// The missing entity when this is a lookup miss.
    pub fn missing_entity(&self) -> Option<EntityKind> {
        match self {
            StorageError::NotFound { entity } => Some(*entity),
            StorageError::Unavailable { .. } => None,
        }
    }
}
