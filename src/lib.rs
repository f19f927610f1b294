pub mod config;
pub mod constants;
pub mod core;
pub mod events;
pub mod models;
pub mod services;
pub mod state;
pub mod store;
pub mod utils;
