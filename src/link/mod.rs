//! Daemon link abstraction
//!
//! This module defines the boundary to the notification service. All
//! traffic to the daemon goes through the [`DaemonLink`] trait so the
//! context can be driven against the real session bus or a scripted
//! test double.

pub mod bus;
#[cfg(test)]
pub(crate) mod mock;

pub use bus::BusLink;

use async_trait::async_trait;

use crate::error::Result;
use crate::event_loop::CloseReason;
use crate::image::Bitmap;

/// Everything the daemon needs to display one notification
#[derive(Debug, Clone)]
pub struct ShowRequest {
    pub app_name: String,
    /// Id of a notification to replace, `0` for a new one
    pub replaces_id: u32,
    /// Themed icon name or icon file path, empty for none
    pub icon: String,
    pub summary: String,
    pub body: String,
    /// `(id, label)` pairs in display order
    pub actions: Vec<(String, String)>,
    pub image: Option<Bitmap>,
    /// Wire expiry: `-1` daemon default, `0` never, otherwise milliseconds
    pub timeout_ms: i32,
    /// Wire urgency byte
    pub urgency: u8,
}

/// An asynchronous event reported by the daemon
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// The user clicked an action (or the notification body, key `"default"`)
    ActionInvoked { id: u32, action: String },
    /// The notification was closed, expired, or dismissed
    Closed { id: u32, reason: CloseReason },
}

/// Identity and capabilities reported by the daemon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerInfo {
    pub name: String,
    pub vendor: String,
    pub version: String,
    pub spec_version: String,
    pub capabilities: Vec<String>,
}

/// Connection to the notification service.
///
/// Implementations must be cheap to hold disconnected: a link starts
/// unconnected and [`connect`](DaemonLink::connect) may be called again
/// after [`disconnect`](DaemonLink::disconnect).
#[async_trait]
pub trait DaemonLink: Send {
    /// Establish the connection and subscribe to daemon events.
    ///
    /// Calling this on an already connected link is a no-op returning
    /// success.
    async fn connect(&mut self, app_name: &str) -> Result<()>;

    fn is_connected(&self) -> bool;

    /// Post a notification, returning the daemon-assigned id
    async fn show(&mut self, request: &ShowRequest) -> Result<u32>;

    /// Ask the daemon to hide a posted notification
    async fn close(&mut self, id: u32) -> Result<()>;

    /// Wait for the next daemon event.
    ///
    /// Returns `None` when the event streams have ended (connection lost
    /// or link disconnected).
    async fn next_event(&mut self) -> Option<LinkEvent>;

    /// Query the daemon's identity and capability list
    async fn server_info(&mut self) -> Result<ServerInfo>;

    /// Drop the connection; safe to call when already disconnected
    async fn disconnect(&mut self);
}
