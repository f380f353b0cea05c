pub mod cli;
pub mod commands;
pub mod config;
mod context;
pub mod web;

pub use context::AppContext;
