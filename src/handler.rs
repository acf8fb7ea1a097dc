use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Extension, Form,
};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    error::AppError,
    jwt_auth::{clear_session_cookie, current_user, session_cookie, session_token},
    model::NoteId,
    request::*,
    response::{redirect_with_flash, Flash},
    session::SessionUser,
    view, AppState,
};

pub async fn index_handler(State(data): State<Arc<AppState>>, jar: CookieJar) -> Redirect {
    match current_user(&data, &jar) {
        Some(_) => Redirect::to("/viewall"),
        None => Redirect::to("/login"),
    }
}

pub async fn register_page_handler(jar: CookieJar) -> Response {
    let (jar, flash) = Flash::take(jar);
    (jar, view::register_page(flash.as_ref())).into_response()
}

pub async fn register_user_handler(
    State(data): State<Arc<AppState>>,
    jar: CookieJar,
    Form(body): Form<RegisterUser>,
) -> Response {
    let new_user = match body.validate() {
        Ok(new_user) => new_user,
        Err(err) => return AppError::from(err).redirect(jar, "/register"),
    };

    match data
        .users
        .register(&new_user.username, &new_user.email, &new_user.password)
        .await
    {
        Ok(user_id) => {
            tracing::info!(user_id, username = %new_user.username, "user registered");
            redirect_with_flash(
                jar,
                "/login",
                Flash::success("Registration successful. Please log in."),
            )
        }
        Err(err) => err.redirect(jar, "/register"),
    }
}

pub async fn login_page_handler(jar: CookieJar) -> Response {
    let (jar, flash) = Flash::take(jar);
    (jar, view::login_page(flash.as_ref())).into_response()
}

pub async fn login_user_handler(
    State(data): State<Arc<AppState>>,
    jar: CookieJar,
    Form(body): Form<LoginUser>,
) -> Response {
    let credentials = match body.validate() {
        Ok(credentials) => credentials,
        Err(err) => return AppError::from(err).redirect(jar, "/login"),
    };

    let user = match data
        .users
        .verify(&credentials.username, &credentials.password)
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::info!(username = %credentials.username, "failed login attempt");
            return AppError::AuthenticationFailure.redirect(jar, "/login");
        }
        Err(err) => return err.redirect(jar, "/login"),
    };

    let token = match data.sessions.start(&user) {
        Ok(token) => token,
        Err(err) => return err.redirect(jar, "/login"),
    };

    tracing::info!(user_id = user.id, "user logged in");
    let jar = jar.add(session_cookie(token, data.sessions.ttl()));
    redirect_with_flash(jar, "/viewall", Flash::success(format!("Welcome {}", user.username)))
}

pub async fn logout_handler(State(data): State<Arc<AppState>>, jar: CookieJar) -> Response {
    if let Some(token) = session_token(&jar) {
        data.sessions.end(token);
    }
    let jar = clear_session_cookie(jar);
    redirect_with_flash(jar, "/login", Flash::info("You have been logged out."))
}

pub async fn add_note_page_handler(
    Extension(user): Extension<SessionUser>,
    jar: CookieJar,
) -> Response {
    let (jar, flash) = Flash::take(jar);
    (jar, view::note_form_page(&user, flash.as_ref(), "/addnote", None)).into_response()
}

pub async fn add_note_handler(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    jar: CookieJar,
    Form(body): Form<NoteForm>,
) -> Response {
    let draft = match body.validate() {
        Ok(draft) => draft,
        Err(err) => return AppError::from(err).redirect(jar, "/addnote"),
    };

    match data.notes.create(user.user_id, &draft.title, &draft.content).await {
        Ok(note_id) => {
            tracing::info!(user_id = user.user_id, note_id, "note created");
            redirect_with_flash(jar, "/viewall", Flash::success("Note added successfully."))
        }
        Err(err) => err.redirect(jar, "/addnote"),
    }
}

pub async fn view_all_handler(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    jar: CookieJar,
) -> Response {
    let notes = match data.notes.list_by_owner(user.user_id).await {
        Ok(notes) => notes,
        // Redirecting back to the list would loop, so render it empty with the error.
        Err(err) => {
            tracing::error!(error = %err, user_id = user.user_id, "failed to list notes");
            let (jar, _) = Flash::take(jar);
            let flash = err.flash();
            return (jar, view::note_list_page(&user, Some(&flash), &[])).into_response();
        }
    };

    let (jar, flash) = Flash::take(jar);
    (jar, view::note_list_page(&user, flash.as_ref(), &notes)).into_response()
}

pub async fn view_note_handler(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    jar: CookieJar,
    Path(note_id): Path<NoteId>,
) -> Response {
    match data.notes.get_by_id_for_owner(note_id, user.user_id).await {
        Ok(Some(note)) => {
            let (jar, flash) = Flash::take(jar);
            (jar, view::note_page(&user, flash.as_ref(), &note)).into_response()
        }
        Ok(None) => AppError::AuthorizationFailure.redirect(jar, "/viewall"),
        Err(err) => err.redirect(jar, "/viewall"),
    }
}

pub async fn update_note_page_handler(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    jar: CookieJar,
    Path(note_id): Path<NoteId>,
) -> Response {
    match data.notes.get_by_id_for_owner(note_id, user.user_id).await {
        Ok(Some(note)) => {
            let (jar, flash) = Flash::take(jar);
            let action = format!("/updatenote/{note_id}");
            (jar, view::note_form_page(&user, flash.as_ref(), &action, Some(&note))).into_response()
        }
        Ok(None) => not_authorized(jar, "edit"),
        Err(err) => err.redirect(jar, "/viewall"),
    }
}

pub async fn update_note_handler(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    jar: CookieJar,
    Path(note_id): Path<NoteId>,
    Form(body): Form<NoteForm>,
) -> Response {
    // Ownership first, so a foreign note id never reveals form feedback.
    match data.notes.get_by_id_for_owner(note_id, user.user_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_authorized(jar, "edit"),
        Err(err) => return err.redirect(jar, "/viewall"),
    }

    let form_path = format!("/updatenote/{note_id}");
    let draft = match body.validate() {
        Ok(draft) => draft,
        Err(err) => return AppError::from(err).redirect(jar, &form_path),
    };

    match data
        .notes
        .update(note_id, user.user_id, &draft.title, &draft.content)
        .await
    {
        Ok(true) => {
            tracing::info!(user_id = user.user_id, note_id, "note updated");
            redirect_with_flash(jar, "/viewall", Flash::success("Note updated successfully."))
        }
        // Deleted between the ownership check and the update.
        Ok(false) => not_authorized(jar, "edit"),
        Err(err) => err.redirect(jar, &form_path),
    }
}

pub async fn delete_note_handler(
    State(data): State<Arc<AppState>>,
    Extension(user): Extension<SessionUser>,
    jar: CookieJar,
    Path(note_id): Path<NoteId>,
) -> Response {
    match data.notes.delete(note_id, user.user_id).await {
        Ok(true) => {
            tracing::info!(user_id = user.user_id, note_id, "note deleted");
            redirect_with_flash(jar, "/viewall", Flash::info("Note deleted."))
        }
        Ok(false) => not_authorized(jar, "delete"),
        Err(err) => err.redirect(jar, "/viewall"),
    }
}

/// Same answer whether the note is missing or belongs to someone else.
fn not_authorized(jar: CookieJar, action: &str) -> Response {
    tracing::debug!(action, "note not available to the requesting user");
    redirect_with_flash(
        jar,
        "/viewall",
        Flash::danger(format!("You are not authorized to {action} this note.")),
    )
}
