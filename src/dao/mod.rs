/// Domain rows shared by every storage backend.
pub mod models;
/// Backend-agnostic storage errors.
pub mod storage;
/// Storage trait and its memory and MongoDB implementations.
pub mod store;
