//! `jobboard-auth`: authentication facts and the authorization gate.
//!
//! This crate is intentionally decoupled from HTTP and storage: it decides
//! *whether* an actor may perform an operation, it never loads the resource.

pub mod authorize;
pub mod claims;
pub mod jwt;
pub mod operation;
pub mod password;
pub mod principal;
pub mod roles;

pub use authorize::{AuthzError, Scope, authorize};
pub use claims::{JwtClaims, TokenError, validate_claims};
pub use jwt::{Hs256Jwt, JwtValidator, TokenIssuer};
pub use operation::Operation;
pub use password::{Argon2Hasher, PasswordError, PasswordHasher};
pub use principal::{Actor, Viewer};
pub use roles::Role;
