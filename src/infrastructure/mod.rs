//! Infrastructure layer - Framework implementations
//!
//! This layer contains:
//! - Configuration loading (config)
//! - Direct SQL connection and table bootstrap (db)
//! - PostgREST client (supabase)
//! - Repository implementations (repositories)
//! - Application state (state)
//! - HTTP server setup (server)

pub mod config;
pub mod db;
pub mod repositories;
pub mod server;
pub mod state;
pub mod supabase;

pub use repositories::*;
pub use state::{AppState, StateOptions};
