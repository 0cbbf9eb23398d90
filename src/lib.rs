//! Desktop notifications for the freedesktop notification service
//!
//! desktoast creates, displays, and manages the lifecycle of desktop
//! notifications: summary/body text, themed icons, decoded image
//! attachments, action buttons, and the callbacks the daemon fires when
//! the user interacts with them.
//!
//! Everything hangs off a caller-owned [`Context`]: open one, build
//! notifications through its factories, send them, and — when callbacks
//! matter — pump daemon events with [`Context::run_until`] until a
//! callback (or another thread) stops the loop through its [`LoopSignal`].
//!
//! ```no_run
//! use desktoast::{Context, LoopSignal};
//!
//! # fn main() -> desktoast::Result<()> {
//! let mut context = Context::open("My App")?;
//! let mut note = context.create("Upload finished", "3 files uploaded", None)?;
//! note.button("open", "Open folder");
//! context.send(note)?;
//! context.run_until(&LoopSignal::new())?;
//! context.close();
//! # Ok(())
//! # }
//! ```

mod context;
mod error;
mod event_loop;
mod image;
mod link;
mod notification;

pub mod config;
pub mod logging;

pub use config::{get_config_path, load_config, AppConfig};
pub use context::Context;
pub use error::{NotifyError, Result};
pub use event_loop::{ActionEvent, CloseReason, ClosedEvent, LoopSignal};
pub use image::Bitmap;
pub use link::ServerInfo;
pub use logging::{is_debug_enabled, set_debug};
pub use notification::{
    Notification, NotificationId, Outcome, SkipReason, Timeout, Urgency, DEFAULT_ACTION,
};

/// Fire-and-forget convenience: open a context, post one notification,
/// and close again.
///
/// The notification stays on screen per the daemon's default expiry; no
/// event loop is run, so callbacks cannot be attached this way.
pub fn notify(app_name: &str, summary: &str, body: &str) -> Result<()> {
    let mut context = Context::open(app_name)?;
    let notification = context.create(summary, body, None)?;
    context.send(notification)?;
    context.close();
    Ok(())
}
