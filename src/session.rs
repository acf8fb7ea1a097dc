//! Server-side login sessions.
//!
//! A session token is an HS256 JWT signed with the process-wide secret. The JWT
//! only names a session id; the session itself lives in [`SessionStore`], so
//! removing the entry revokes the token immediately even before it expires.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    model::{User, UserId},
};

pub type SessionToken = String;

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: UserId,
    pub username: String,
    pub sid: String,
    pub iat: usize,
    pub exp: usize,
}

/// The authenticated identity handed to request handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: UserId,
    pub username: String,
}

#[derive(Debug, Clone)]
struct SessionEntry {
    user: SessionUser,
    expires_at: DateTime<Utc>,
}

pub struct SessionStore {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
    sessions: Mutex<HashMap<String, SessionEntry>>,
}

impl SessionStore {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        SessionStore {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn sessions(&self) -> MutexGuard<'_, HashMap<String, SessionEntry>> {
        // The map stays consistent even if a holder panicked.
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn start(&self, user: &User) -> Result<SessionToken> {
        let now = Utc::now();
        let expires_at = now + self.ttl;
        let sid = new_session_id();

        let claims = TokenClaims {
            sub: user.id,
            username: user.username.clone(),
            sid: sid.clone(),
            iat: now.timestamp() as usize,
            exp: expires_at.timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding_key)?;

        let mut sessions = self.sessions();
        sessions.retain(|_, entry| entry.expires_at > now);
        sessions.insert(
            sid,
            SessionEntry {
                user: SessionUser {
                    user_id: user.id,
                    username: user.username.clone(),
                },
                expires_at,
            },
        );
        tracing::debug!(user_id = user.id, active = sessions.len(), "session started");

        Ok(token)
    }

    /// Resolves a token to its user. Anything wrong with the token means "not logged in".
    pub fn current(&self, token: &str) -> Option<SessionUser> {
        let claims = match decode::<TokenClaims>(token, &self.decoding_key, &Validation::default()) {
            Ok(data) => data.claims,
            Err(err) => {
                tracing::debug!(error = %err, "rejected session token");
                return None;
            }
        };

        let mut sessions = self.sessions();
        let entry = sessions.get(&claims.sid).cloned()?;
        if entry.expires_at <= Utc::now() {
            sessions.remove(&claims.sid);
            return None;
        }
        (entry.user.user_id == claims.sub).then_some(entry.user)
    }

    pub fn end(&self, token: &str) {
        // Expired tokens still identify a session worth removing.
        let mut validation = Validation::default();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        if let Ok(data) = decode::<TokenClaims>(token, &self.decoding_key, &validation) {
            if self.sessions().remove(&data.claims.sid).is_some() {
                tracing::debug!(user_id = data.claims.sub, "session ended");
            }
        }
    }

    #[cfg(test)]
    fn active_sessions(&self) -> usize {
        self.sessions().len()
    }
}

fn new_session_id() -> String {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
