pub mod commands;
pub mod error;
pub mod provider;
pub mod resources;
pub mod tasks;
pub mod types;
