//! Outbound collaborators: mail delivery and blob upload.

pub mod blob;
pub mod mailer;

pub use blob::{BlobError, BlobStore, LocalBlobStore, Upload};
pub use mailer::{LogMailer, Mail, MailError, Mailer, RecordingMailer};
