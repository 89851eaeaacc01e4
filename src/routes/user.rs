//! Account route definitions

use axum::{routing::get, Router};

use crate::handlers::user::{delete_current_user, get_current_user, update_current_user};
use crate::state::AppState;

pub fn user_routes() -> Router<AppState> {
    Router::new().route(
        "/user/",
        get(get_current_user)
            .put(update_current_user)
            .delete(delete_current_user),
    )
}
