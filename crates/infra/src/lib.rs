//! Infrastructure layer: document stores, outbound collaborators and the
//! service layer that runs every job board operation against them.

pub mod collaborators;
pub mod services;
pub mod store;

pub use services::{JobBoard, ServiceError, ServiceResult, ServiceSettings};
