//! Company directory domain module.
//!
//! One company profile per recruiter, with an active/disabled lifecycle and
//! viewer-dependent visibility. Pure domain logic (no IO, no HTTP, no storage).

pub mod company;

pub use company::{Company, CompanyFilter, CompanyPatch, CompanyStatus, RegisterCompany};
