//! Profile route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::profile::{
    create_profile, get_own_profile, get_profile_by_user, set_profile_role, update_own_profile,
};
use crate::state::AppState;

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profile/", get(get_own_profile).post(update_own_profile))
        .route("/profile/:user_id/", get(get_profile_by_user))
        .route("/profile/:user_id/role/", post(set_profile_role))
        .route("/createprofile/", post(create_profile))
}
