//! Authentication module for rmauth
//!
//! - Password hashing and credential checks
//! - JWT access token generation and validation
//! - Opaque, single-use refresh tokens rotated on every login and exchange

mod jwt;
mod password;
mod refresh;
mod service;

pub use jwt::{generate_access_token, verify_token, Claims, JwtError, ACCESS_TOKEN_TYPE};
pub use password::{hash_password, verify_password};
pub use refresh::{generate_refresh_token, hash_refresh_token};
pub use service::{normalize_email, AuthError, AuthService};
