/// Gamer and game type directories.
pub mod directory_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Events and attendance.
pub mod event_service;
/// Game catalog.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Storage connection supervisor toggling degraded mode.
pub mod storage_supervisor;
