//! A small multi-user note-taking web application.
//!
//! Users register and log in through HTML forms; every note operation is
//! scoped to the logged-in owner. See [`route::create_router`] for the HTTP
//! surface.

pub mod config;
pub mod db;
pub mod error;
pub mod handler;
pub mod jwt_auth;
pub mod model;
pub mod note_store;
pub mod password;
pub mod request;
pub mod response;
pub mod route;
pub mod session;
pub mod user_store;
pub mod view;

use sqlx::SqlitePool;

pub use route::create_router;

use crate::{config::Config, note_store::NoteStore, session::SessionStore, user_store::UserStore};

/// Shared by every request. Created once at startup.
pub struct AppState {
    pub config: Config,
    pub users: UserStore,
    pub notes: NoteStore,
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: Config, db: SqlitePool) -> Self {
        let sessions = SessionStore::new(&config.secret_key, config.session_ttl());
        AppState {
            users: UserStore::new(db.clone()),
            notes: NoteStore::new(db),
            sessions,
            config,
        }
    }
}
