use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Level Up Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::game::list_games,
        crate::routes::game::retrieve_game,
        crate::routes::game::create_game,
        crate::routes::game::update_game,
        crate::routes::game::delete_game,
        crate::routes::event::list_events,
        crate::routes::event::retrieve_event,
        crate::routes::event::create_event,
        crate::routes::event::update_event,
        crate::routes::event::delete_event,
        crate::routes::event::signup,
        crate::routes::event::leave,
        crate::routes::game_type::list_game_types,
        crate::routes::game_type::retrieve_game_type,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::health::HealthStatus,
            crate::dto::common::MessageResponse,
            crate::dto::directory::GamerSummary,
            crate::dto::directory::GameTypeSummary,
            crate::dto::game::GameRequest,
            crate::dto::game::CreatedGame,
            crate::dto::game::GameDetail,
            crate::dto::game::GameRecord,
            crate::dto::event::EventRequest,
            crate::dto::event::CreatedEvent,
            crate::dto::event::EventDetail,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "games", description = "Game catalog"),
        (name = "events", description = "Events and attendance"),
        (name = "gametypes", description = "Game type directory"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/healthcheck",
            "/games",
            "/games/{id}",
            "/events",
            "/events/{id}",
            "/events/{id}/signup",
            "/events/{id}/leave",
            "/gametypes",
            "/gametypes/{id}",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
    }
}
