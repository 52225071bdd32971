pub mod api;
pub mod coordinator;
pub mod engine;
pub mod state;
pub mod ui;
