pub mod cards;
pub mod sessions;
