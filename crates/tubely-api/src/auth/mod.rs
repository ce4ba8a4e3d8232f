pub mod bearer;
pub mod jwt;
pub mod models;

pub use jwt::{CredentialVerifier, JwtVerifier};
pub use models::{AuthUser, JwtClaims};
