//! Notification values and their mutators
//!
//! A [`Notification`] is an owned value assembled through its mutators and
//! consumed by [`crate::Context::send`]. Mutators report invalid input
//! through [`Outcome`] rather than errors, so a caller can always tell an
//! applied mutation from a skipped one.

use std::path::{Path, PathBuf};

use crate::debug_context;
use crate::event_loop::{ActionCallback, ActionEvent, ClosedCallback, ClosedEvent};
use crate::image::Bitmap;

/// Action key the daemon treats as a click on the notification body
pub const DEFAULT_ACTION: &str = "default";

/// Daemon-assigned handle of a sent notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(pub(crate) u32);

impl NotificationId {
    /// The raw id assigned by the daemon
    pub fn value(&self) -> u32 {
        self.0
    }
}

/// Result of a mutator call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The mutation was applied
    Applied,
    /// The input was invalid and nothing changed
    Skipped(SkipReason),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

/// Why a mutator skipped its input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Action ids must be non-empty
    EmptyActionId,
    /// An action with the same id is already attached
    DuplicateActionId,
    /// A zero-pixel bitmap cannot be rendered
    EmptyBitmap,
}

/// Expiry behavior requested from the daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeout {
    /// Let the daemon pick its default expiry
    #[default]
    Default,
    /// Keep the notification until dismissed
    Never,
    Milliseconds(u32),
}

impl Timeout {
    /// The `expire_timeout` wire value
    pub(crate) fn to_wire(self) -> i32 {
        match self {
            Timeout::Default => -1,
            Timeout::Never => 0,
            Timeout::Milliseconds(ms) => ms as i32,
        }
    }
}

/// Urgency hint forwarded to the daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Urgency {
    Low,
    #[default]
    Normal,
    Critical,
}

impl Urgency {
    pub(crate) fn to_wire(self) -> u8 {
        match self {
            Urgency::Low => 0,
            Urgency::Normal => 1,
            Urgency::Critical => 2,
        }
    }
}

pub(crate) struct Action {
    pub(crate) id: String,
    pub(crate) label: String,
    /// `None` means the stock behavior: log the click and stop the loop
    pub(crate) callback: Option<ActionCallback>,
}

/// One pending desktop notification.
///
/// Created through [`crate::Context::create`] or
/// [`crate::Context::create_with_image`] and consumed by
/// [`crate::Context::send`].
pub struct Notification {
    pub(crate) summary: String,
    pub(crate) body: String,
    pub(crate) icon: Option<PathBuf>,
    pub(crate) image: Option<Bitmap>,
    pub(crate) actions: Vec<Action>,
    pub(crate) closed: Option<ClosedCallback>,
    pub(crate) timeout: Timeout,
    pub(crate) urgency: Urgency,
}

impl Notification {
    pub(crate) fn new(summary: &str, body: &str) -> Self {
        Self {
            summary: summary.to_string(),
            body: body.to_string(),
            icon: None,
            image: None,
            actions: Vec::new(),
            closed: None,
            timeout: Timeout::Default,
            urgency: Urgency::Normal,
        }
    }

    /// Append an action button invoking `callback` when clicked.
    ///
    /// Skipped for an empty or already attached id.
    pub fn on_action<F>(&mut self, id: &str, label: &str, callback: F) -> Outcome
    where
        F: FnMut(&ActionEvent) + Send + 'static,
    {
        self.push_action(id, label, Some(Box::new(callback)))
    }

    /// Append an action button with the stock behavior: log the click and
    /// request loop shutdown.
    pub fn button(&mut self, id: &str, label: &str) -> Outcome {
        self.push_action(id, label, None)
    }

    /// Register a callback for a click on the notification body.
    ///
    /// Registered as the daemon's `"default"` action; skipped if one is
    /// already attached.
    pub fn on_click<F>(&mut self, callback: F) -> Outcome
    where
        F: FnMut(&ActionEvent) + Send + 'static,
    {
        self.on_action(DEFAULT_ACTION, "Default", callback)
    }

    /// Register the closed-callback, replacing any previous one.
    pub fn on_close<F>(&mut self, callback: F) -> Outcome
    where
        F: FnMut(&ClosedEvent) + Send + 'static,
    {
        self.closed = Some(Box::new(callback));
        Outcome::Applied
    }

    /// Attach a decoded image, replacing any previous one.
    ///
    /// Skipped for a zero-pixel bitmap.
    pub fn set_image(&mut self, bitmap: Bitmap) -> Outcome {
        if bitmap.is_empty() {
            debug_context!("Notification", "skipping empty bitmap");
            return Outcome::Skipped(SkipReason::EmptyBitmap);
        }
        debug_context!(
            "Notification",
            "attaching {}x{} image",
            bitmap.width(),
            bitmap.height()
        );
        self.image = Some(bitmap);
        Outcome::Applied
    }

    /// Set the themed icon name or icon file path
    pub fn set_icon(&mut self, icon: impl AsRef<Path>) -> &mut Self {
        self.icon = Some(icon.as_ref().to_path_buf());
        self
    }

    pub fn set_timeout(&mut self, timeout: Timeout) -> &mut Self {
        self.timeout = timeout;
        self
    }

    pub fn set_urgency(&mut self, urgency: Urgency) -> &mut Self {
        self.urgency = urgency;
        self
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn icon(&self) -> Option<&Path> {
        self.icon.as_deref()
    }

    pub fn image(&self) -> Option<&Bitmap> {
        self.image.as_ref()
    }

    pub fn timeout(&self) -> Timeout {
        self.timeout
    }

    pub fn urgency(&self) -> Urgency {
        self.urgency
    }

    /// Attached action ids and labels, in attachment order
    pub fn actions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.actions
            .iter()
            .map(|action| (action.id.as_str(), action.label.as_str()))
    }

    fn push_action(&mut self, id: &str, label: &str, callback: Option<ActionCallback>) -> Outcome {
        if id.is_empty() {
            debug_context!("Notification", "skipping action with empty id");
            return Outcome::Skipped(SkipReason::EmptyActionId);
        }
        if self.actions.iter().any(|action| action.id == id) {
            debug_context!("Notification", "skipping duplicate action id {:?}", id);
            return Outcome::Skipped(SkipReason::DuplicateActionId);
        }
        debug_context!("Notification", "adding action {:?} ({:?})", id, label);
        self.actions.push(Action {
            id: id.to_string(),
            label: label.to_string(),
            callback,
        });
        Outcome::Applied
    }
}
