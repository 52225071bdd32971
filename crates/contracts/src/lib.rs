pub mod catalog;
pub mod engagement;
