//! Route definitions for the rmauth API

mod auth;
mod profile;
mod requisites;
mod user;

pub use auth::auth_routes;
pub use profile::profile_routes;
pub use requisites::requisites_routes;
pub use user::user_routes;
