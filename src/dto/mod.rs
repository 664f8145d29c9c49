pub mod common;
pub mod directory;
pub mod event;
pub mod game;
pub mod health;
pub mod validation;
