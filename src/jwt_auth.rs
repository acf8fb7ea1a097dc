use std::sync::Arc;

use axum::{
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::{
    response::{redirect_with_flash, Flash},
    session::{SessionToken, SessionUser},
    AppState,
};

pub const TOKEN_COOKIE: &str = "token";

pub fn session_token(jar: &CookieJar) -> Option<&str> {
    jar.get(TOKEN_COOKIE).map(|cookie| cookie.value())
}

pub fn current_user(data: &AppState, jar: &CookieJar) -> Option<SessionUser> {
    session_token(jar).and_then(|token| data.sessions.current(token))
}

pub fn session_cookie(token: SessionToken, ttl: chrono::Duration) -> Cookie<'static> {
    Cookie::build(TOKEN_COOKIE, token)
        .path("/")
        .max_age(time::Duration::seconds(ttl.num_seconds()))
        .same_site(SameSite::Lax)
        .http_only(true)
        .finish()
}

pub fn clear_session_cookie(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(TOKEN_COOKIE, "").path("/").finish())
}

/// Gate for protected routes: injects the [`SessionUser`] or sends the visitor to `/login`.
pub async fn auth<B>(
    State(data): State<Arc<AppState>>,
    jar: CookieJar,
    mut req: Request<B>,
    next: Next<B>,
) -> Response {
    match current_user(&data, &jar) {
        Some(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        None => {
            tracing::debug!(path = %req.uri().path(), "unauthenticated request redirected to login");
            redirect_with_flash(jar, "/login", Flash::warning("Please log in to continue."))
        }
    }
}
