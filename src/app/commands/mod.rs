pub mod assistant;
pub mod auth;
pub mod export;
pub mod feedback;
pub mod profile;
pub mod prompt;
