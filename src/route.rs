use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{
    handler::{
        add_note_handler, add_note_page_handler, delete_note_handler, index_handler,
        login_page_handler, login_user_handler, logout_handler, register_page_handler,
        register_user_handler, update_note_handler, update_note_page_handler, view_all_handler,
        view_note_handler,
    },
    jwt_auth::auth,
    AppState,
};

pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route(
            "/register",
            get(register_page_handler).post(register_user_handler),
        )
        .route("/login", get(login_page_handler).post(login_user_handler))
        .route("/logout", get(logout_handler))
        .route(
            "/addnote",
            get(add_note_page_handler)
                .post(add_note_handler)
                .route_layer(middleware::from_fn_with_state(app_state.clone(), auth)),
        )
        .route(
            "/viewall",
            get(view_all_handler)
                .route_layer(middleware::from_fn_with_state(app_state.clone(), auth)),
        )
        .route(
            "/viewnotes/:id",
            get(view_note_handler)
                .route_layer(middleware::from_fn_with_state(app_state.clone(), auth)),
        )
        .route(
            "/updatenote/:id",
            get(update_note_page_handler)
                .post(update_note_handler)
                .route_layer(middleware::from_fn_with_state(app_state.clone(), auth)),
        )
        .route(
            "/deletenote/:id",
            post(delete_note_handler)
                .route_layer(middleware::from_fn_with_state(app_state.clone(), auth)),
        )
        .with_state(app_state)
}
