//! Requisites route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::requisites::{
    create_requisites, get_own_requisites, get_requisites_by_user, update_own_requisites,
};
use crate::state::AppState;

pub fn requisites_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/requisites/",
            get(get_own_requisites).post(update_own_requisites),
        )
        .route("/requisites/:user_id/", get(get_requisites_by_user))
        .route("/createrequisites/", post(create_requisites))
}
