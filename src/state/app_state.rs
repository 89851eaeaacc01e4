//! Application state shared across handlers

use std::sync::Arc;

use axum::extract::FromRef;

use crate::auth::AuthService;
use crate::profile::ProfileService;
use crate::requisites::RequisitesService;
use crate::store::Store;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub profile_service: Arc<ProfileService>,
    pub requisites_service: Arc<RequisitesService>,
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        jwt_secret: String,
        access_token_ttl_seconds: i64,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            auth_service: Arc::new(AuthService::new(
                store.clone(),
                jwt_secret,
                access_token_ttl_seconds,
                bcrypt_cost,
            )),
            profile_service: Arc::new(ProfileService::new(store.clone())),
            requisites_service: Arc::new(RequisitesService::new(store.clone())),
            store,
        }
    }
}

impl FromRef<AppState> for Arc<AuthService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.auth_service.clone()
    }
}

impl FromRef<AppState> for Arc<ProfileService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.profile_service.clone()
    }
}

impl FromRef<AppState> for Arc<RequisitesService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.requisites_service.clone()
    }
}
