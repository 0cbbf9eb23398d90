//! Caller-owned connection context
//!
//! A [`Context`] bundles the daemon link, the app name, and the callbacks
//! of sent notifications into one caller-owned value with an explicit
//! lifecycle: [`Context::open`] and [`Context::close`]. Nothing here is
//! process-global except the debug toggle.
//!
//! All daemon traffic is async underneath (zbus signal streams); the
//! context drives it from the calling thread through a current-thread
//! runtime, so notification callbacks always execute on the thread that
//! called [`Context::run_until`].

use std::collections::HashMap;
use std::path::Path;

use tokio::runtime::{Builder, Runtime};

use crate::debug_context;
use crate::error::{NotifyError, Result};
use crate::event_loop::{
    ActionCallback, ActionEvent, CloseReason, ClosedCallback, ClosedEvent, LoopSignal,
};
use crate::image::Bitmap;
use crate::link::{BusLink, DaemonLink, LinkEvent, ServerInfo, ShowRequest};
use crate::notification::{Notification, NotificationId};

/// Callbacks moved out of a sent notification, keyed by daemon id
struct Registered {
    /// `(action id, callback)`; `None` is the stock log-and-stop behavior
    actions: Vec<(String, Option<ActionCallback>)>,
    closed: Option<ClosedCallback>,
}

/// Connection to the notification service plus the dispatch state of
/// every notification sent through it.
///
/// Notifications created from a context are only dispatchable while the
/// context is open; a failed `send` closes the context (see
/// [`Context::send`]).
pub struct Context {
    app_name: String,
    runtime: Runtime,
    link: Box<dyn DaemonLink>,
    dispatch: HashMap<u32, Registered>,
}

impl Context {
    /// Connect to the session notification service as `app_name`.
    pub fn open(app_name: &str) -> Result<Self> {
        Self::with_link(app_name, Box::new(BusLink::new()))
    }

    pub(crate) fn with_link(app_name: &str, mut link: Box<dyn DaemonLink>) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        runtime.block_on(link.connect(app_name))?;
        debug_context!("Context", "opened as {:?}", app_name);
        Ok(Self {
            app_name: app_name.to_string(),
            runtime,
            link,
            dispatch: HashMap::new(),
        })
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn is_open(&self) -> bool {
        self.link.is_connected()
    }

    /// Re-establish the connection after a teardown.
    ///
    /// No-op returning success when already connected.
    pub fn reconnect(&mut self) -> Result<()> {
        if self.is_open() {
            debug_context!("Context", "reconnect: already connected");
            return Ok(());
        }
        self.runtime.block_on(self.link.connect(&self.app_name))?;
        debug_context!("Context", "reconnected as {:?}", self.app_name);
        Ok(())
    }

    /// Release the connection and drop all registered callbacks.
    ///
    /// Idempotent; safe to call on an already closed context.
    pub fn close(&mut self) {
        self.dispatch.clear();
        self.runtime.block_on(self.link.disconnect());
        debug_context!("Context", "closed");
    }

    /// Create a notification with an optional themed icon.
    ///
    /// Fails with [`NotifyError::Creation`] when the context is closed.
    pub fn create(&self, summary: &str, body: &str, icon: Option<&Path>) -> Result<Notification> {
        if !self.is_open() {
            return Err(NotifyError::Creation("context is closed".to_string()));
        }
        debug_context!(
            "Context",
            "creating notification - summary: {:?}, body: {:?}, icon: {:?}",
            summary,
            body,
            icon
        );
        let mut notification = Notification::new(summary, body);
        if let Some(icon) = icon {
            notification.set_icon(icon);
        }
        Ok(notification)
    }

    /// Create a notification with a decoded image attached.
    ///
    /// A failed image load is not fatal: the notification is returned
    /// without a bitmap and the failure is debug-logged.
    pub fn create_with_image(
        &self,
        summary: &str,
        body: &str,
        image_path: impl AsRef<Path>,
    ) -> Result<Notification> {
        let mut notification = self.create(summary, body, None)?;
        match Bitmap::load(image_path.as_ref()) {
            Ok(bitmap) => {
                notification.set_image(bitmap);
            }
            Err(err) => {
                debug_context!(
                    "Context",
                    "failed to load image {}: {}",
                    image_path.as_ref().display(),
                    err
                );
            }
        }
        Ok(notification)
    }

    /// Post a notification to the daemon.
    ///
    /// Consumes the notification and registers its callbacks under the
    /// daemon-assigned id for [`Context::run_until`] to dispatch. A
    /// transport failure tears the whole connection down (the daemon is
    /// presumed gone); the caller must [`Context::reconnect`] before
    /// creating or sending again.
    pub fn send(&mut self, notification: Notification) -> Result<NotificationId> {
        if !self.is_open() {
            return Err(NotifyError::Transport("no active connection".to_string()));
        }

        let request = self.build_request(&notification);
        debug_context!("Context", "sending notification {:?}", request.summary);

        match self.runtime.block_on(self.link.show(&request)) {
            Ok(id) => {
                let Notification {
                    actions, closed, ..
                } = notification;
                self.dispatch.insert(
                    id,
                    Registered {
                        actions: actions
                            .into_iter()
                            .map(|action| (action.id, action.callback))
                            .collect(),
                        closed,
                    },
                );
                debug_context!("Context", "notification posted with id {}", id);
                Ok(NotificationId(id))
            }
            Err(err) => {
                // a failed show means the bus connection is gone
                debug_context!("Context", "send failed, tearing down connection: {}", err);
                self.dispatch.clear();
                self.runtime.block_on(self.link.disconnect());
                Err(err)
            }
        }
    }

    /// Ask the daemon to hide a posted notification.
    ///
    /// Unlike [`Context::send`], a failure here leaves the connection
    /// open: a rejected `CloseNotification` says nothing about the link.
    pub fn dismiss(&mut self, id: NotificationId) -> Result<()> {
        if !self.is_open() {
            return Err(NotifyError::Transport("no active connection".to_string()));
        }
        debug_context!("Context", "dismissing notification {}", id.value());
        self.runtime.block_on(self.link.close(id.0))
        // the registry entry is retired when the daemon reports Closed
    }

    /// Query the daemon's identity and capability list.
    pub fn server_info(&mut self) -> Result<ServerInfo> {
        if !self.is_open() {
            return Err(NotifyError::Transport("no active connection".to_string()));
        }
        self.runtime.block_on(self.link.server_info())
    }

    /// Pump daemon events and dispatch them to registered callbacks.
    ///
    /// Blocks the calling thread until `signal` receives a stop request
    /// (usually from inside a callback, possibly from another thread).
    /// Callbacks run on this thread, in daemon delivery order. Events for
    /// unknown ids or action keys are ignored. Fails with
    /// [`NotifyError::Connection`] if the daemon event streams end.
    pub fn run_until(&mut self, signal: &LoopSignal) -> Result<()> {
        if !self.is_open() {
            return Err(NotifyError::Connection("no active connection".to_string()));
        }

        debug_context!("Context", "event loop starting");
        signal.begin();
        let result = {
            let link = &mut self.link;
            let dispatch = &mut self.dispatch;
            self.runtime.block_on(async {
                loop {
                    if signal.stop_requested() {
                        break Ok(());
                    }
                    let event = tokio::select! {
                        _ = signal.stopped() => break Ok(()),
                        event = link.next_event() => event,
                    };
                    match event {
                        Some(LinkEvent::ActionInvoked { id, action }) => {
                            dispatch_action(dispatch, signal, id, &action);
                        }
                        Some(LinkEvent::Closed { id, reason }) => {
                            dispatch_closed(dispatch, signal, id, reason);
                        }
                        None => {
                            break Err(NotifyError::Connection(
                                "daemon event stream ended".to_string(),
                            ));
                        }
                    }
                }
            })
        };
        signal.end();
        debug_context!("Context", "event loop stopped");
        result
    }

    fn build_request(&self, notification: &Notification) -> ShowRequest {
        ShowRequest {
            app_name: self.app_name.clone(),
            replaces_id: 0,
            icon: notification
                .icon
                .as_ref()
                .map(|icon| icon.to_string_lossy().into_owned())
                .unwrap_or_default(),
            summary: notification.summary.clone(),
            body: notification.body.clone(),
            actions: notification
                .actions
                .iter()
                .map(|action| (action.id.clone(), action.label.clone()))
                .collect(),
            image: notification.image.clone(),
            timeout_ms: notification.timeout.to_wire(),
            urgency: notification.urgency.to_wire(),
        }
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        if self.is_open() {
            self.close();
        }
    }
}

fn dispatch_action(
    dispatch: &mut HashMap<u32, Registered>,
    signal: &LoopSignal,
    id: u32,
    action: &str,
) {
    let Some(registered) = dispatch.get_mut(&id) else {
        debug_context!("Context", "action for unknown notification {}, ignored", id);
        return;
    };
    let Some((_, callback)) = registered
        .actions
        .iter_mut()
        .find(|(key, _)| key == action)
    else {
        debug_context!("Context", "unknown action {:?} on {}, ignored", action, id);
        return;
    };

    let event = ActionEvent {
        id: NotificationId(id),
        action,
        signal,
    };
    match callback {
        Some(callback) => callback(&event),
        None => {
            // stock button behavior
            debug_context!("Context", "action {:?} clicked, stopping loop", action);
            signal.request_stop();
        }
    }
}

fn dispatch_closed(
    dispatch: &mut HashMap<u32, Registered>,
    signal: &LoopSignal,
    id: u32,
    reason: CloseReason,
) {
    let Some(mut registered) = dispatch.remove(&id) else {
        debug_context!("Context", "close for unknown notification {}, ignored", id);
        return;
    };
    if let Some(callback) = registered.closed.as_mut() {
        callback(&ClosedEvent {
            id: NotificationId(id),
            reason,
            signal,
        });
    }
    debug_context!("Context", "notification {} retired ({:?})", id, reason);
}
