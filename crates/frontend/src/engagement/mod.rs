pub mod api;
pub mod favorites;
pub mod session;
pub mod tracker;
