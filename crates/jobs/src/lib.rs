//! Job catalog domain module.
//!
//! Job postings owned by a recruiter and linked to a company, with an
//! open/disabled lifecycle. Pure domain logic (no IO, no HTTP, no storage).

pub mod job;

pub use job::{Job, JobPatch, JobStatus, JobType, PostJob};
