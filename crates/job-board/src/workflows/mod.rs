pub mod application;
pub mod applied;
