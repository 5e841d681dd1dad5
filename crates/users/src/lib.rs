//! Users domain module (actors and their profiles).
//!
//! This crate contains business rules for registered actors, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod profile;
pub mod user;

pub use profile::{
    Education, Experience, Gender, Profile, ProfileGap, ProfileUpdate, check_profile_completeness, parse_skills,
};
pub use user::{PasswordReset, RegisterUser, User, UserStatus, hash_reset_token, RESET_TOKEN_TTL_MINUTES};
