//! Application ledger domain module.
//!
//! The join between a jobseeker and a job. One application per
//! (job, applicant) pair; the store enforces that with a unique index.

pub mod application;

pub use application::{Application, ApplicationStatus};
