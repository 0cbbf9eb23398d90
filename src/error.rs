//! Error types for desktoast
//!
//! This module defines structured error types using the `thiserror` crate.
//! Mutators on [`crate::Notification`] never produce these; they report
//! skipped inputs through [`crate::Outcome`] instead.

use std::io;
use thiserror::Error;

/// Main error type for the desktoast library
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The session bus or the notification daemon is unreachable,
    /// or an established connection was lost
    #[error("notification service connection failed: {0}")]
    Connection(String),

    /// A factory precondition was not met (the context is closed)
    #[error("notification not created: {0}")]
    Creation(String),

    /// A show or dismiss request failed at the daemon boundary
    #[error("notification transport failed: {0}")]
    Transport(String),

    /// Error occurred while decoding an image file
    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),

    /// Error occurred while loading or saving the configuration file
    #[error("config error: {0}")]
    Config(String),

    /// Underlying I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for the desktoast library
pub type Result<T> = std::result::Result<T, NotifyError>;
