use time::{Date, Time};

/// Registered player, owned by the external gamer directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamerEntity {
    /// Stable identifier.
    pub id: i64,
    /// Opaque key presented by clients in the `Authorization` header.
    pub uid: String,
    /// Free-form profile text.
    pub bio: String,
}

/// Category applied to games, owned by the external game type directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameTypeEntity {
    /// Stable identifier.
    pub id: i64,
    /// Display name, e.g. "Board game".
    pub label: String,
}

/// Catalog entry for a playable game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEntity {
    /// Store-assigned identifier.
    pub id: i64,
    /// Gamer who created the entry.
    pub gamer_id: i64,
    /// Category of the game.
    pub game_type_id: i64,
    /// Name of the game, at most 50 characters.
    pub title: String,
    /// Publisher or designer, at most 50 characters.
    pub maker: String,
    /// Players needed for a session.
    pub number_of_players: i32,
    /// Expected experience, higher is harder.
    pub skill_level: i32,
}

/// Mutable columns of a game, written as a whole on create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameFields {
    /// See [`GameEntity::title`].
    pub title: String,
    /// See [`GameEntity::maker`].
    pub maker: String,
    /// See [`GameEntity::number_of_players`].
    pub number_of_players: i32,
    /// See [`GameEntity::skill_level`].
    pub skill_level: i32,
    /// Game type the game belongs to; must exist.
    pub game_type_id: i64,
}

impl GameEntity {
    /// Build a row from its store-assigned id, its creator and the submitted columns.
    pub fn new(id: i64, gamer_id: i64, fields: GameFields) -> Self {
        Self {
            id,
            gamer_id,
            game_type_id: fields.game_type_id,
            title: fields.title,
            maker: fields.maker,
            number_of_players: fields.number_of_players,
            skill_level: fields.skill_level,
        }
    }

    /// Overwrite every mutable column.
    pub fn apply(&mut self, fields: GameFields) {
        self.game_type_id = fields.game_type_id;
        self.title = fields.title;
        self.maker = fields.maker;
        self.number_of_players = fields.number_of_players;
        self.skill_level = fields.skill_level;
    }
}

/// Game row annotated with event counts relative to a viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStatsEntity {
    /// The annotated game.
    pub game: GameEntity,
    /// Events scheduled for the game.
    pub event_count: i64,
    /// Events of the game organized by the viewer.
    pub user_event_count: i64,
}

/// Filter applied when listing games.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameQuery {
    /// Gamer whose organized events feed `user_event_count`.
    pub viewer_id: i64,
    /// Restrict the listing to one game type.
    pub game_type_id: Option<i64>,
}

/// Scheduled meetup to play a specific game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventEntity {
    /// Store-assigned identifier.
    pub id: i64,
    /// Gamer who scheduled the event.
    pub organizer_id: i64,
    /// Game played at the event.
    pub game_id: i64,
    /// Free text, at most 100 characters.
    pub description: String,
    /// Calendar day of the meetup.
    pub date: Date,
    /// Start time, without timezone.
    pub time: Time,
}

/// Mutable columns of an event, written as a whole on create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFields {
    /// See [`EventEntity::description`].
    pub description: String,
    /// See [`EventEntity::date`].
    pub date: Date,
    /// See [`EventEntity::time`].
    pub time: Time,
    /// Game played at the event; must exist.
    pub game_id: i64,
}

impl EventEntity {
    /// Build a row from its store-assigned id, its organizer and the submitted columns.
    pub fn new(id: i64, organizer_id: i64, fields: EventFields) -> Self {
        Self {
            id,
            organizer_id,
            game_id: fields.game_id,
            description: fields.description,
            date: fields.date,
            time: fields.time,
        }
    }

    /// Overwrite every mutable column.
    pub fn apply(&mut self, fields: EventFields) {
        self.game_id = fields.game_id;
        self.description = fields.description;
        self.date = fields.date;
        self.time = fields.time;
    }
}

/// Event row annotated with attendance figures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventStatsEntity {
    /// The annotated event.
    pub event: EventEntity,
    /// Attendance rows of the event, duplicates included.
    pub attendees_count: i64,
    /// Whether the viewer holds an attendance row; `None` without a viewer.
    pub joined: Option<bool>,
}

/// Attendance record linking a gamer to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventGamerEntity {
    /// Store-assigned identifier; `leave` removes the lowest one first.
    pub id: i64,
    /// Attending gamer.
    pub gamer_id: i64,
    /// Attended event.
    pub event_id: i64,
}
