//! Session-bus implementation of the daemon link
//!
//! Talks to `org.freedesktop.Notifications` through zbus proxies and
//! forwards the daemon's `ActionInvoked` / `NotificationClosed` signals.

use std::collections::HashMap;

use async_trait::async_trait;
use futures::StreamExt;
use zbus::zvariant::{StructureBuilder, Value};
use zbus::{Connection, Proxy, SignalStream};

use crate::debug_context;
use crate::error::{NotifyError, Result};
use crate::event_loop::CloseReason;
use crate::link::{DaemonLink, LinkEvent, ServerInfo, ShowRequest};

const BUS_NAME: &str = "org.freedesktop.Notifications";
const OBJECT_PATH: &str = "/org/freedesktop/Notifications";

/// Live link to the session notification daemon
pub struct BusLink {
    state: Option<LinkState>,
}

/// Proxy plus the signal subscriptions made at connect time.
/// The proxy keeps the bus connection alive.
struct LinkState {
    proxy: Proxy<'static>,
    actions: SignalStream<'static>,
    closed: SignalStream<'static>,
}

impl BusLink {
    pub fn new() -> Self {
        Self { state: None }
    }
}

impl Default for BusLink {
    fn default() -> Self {
        Self::new()
    }
}

fn connection_err(err: zbus::Error) -> NotifyError {
    NotifyError::Connection(err.to_string())
}

fn transport_err(err: zbus::Error) -> NotifyError {
    NotifyError::Transport(err.to_string())
}

/// Assemble the `hints` dictionary for a `Notify` call.
///
/// Always carries the urgency byte; adds the `image-data` structure
/// (width, height, rowstride, alpha, bits per sample, channels, bytes)
/// when a bitmap is attached.
fn build_hints(request: &ShowRequest) -> HashMap<&'static str, Value<'static>> {
    let mut hints: HashMap<&'static str, Value<'static>> = HashMap::new();
    hints.insert("urgency", Value::U8(request.urgency));

    if let Some(bitmap) = &request.image {
        let image = StructureBuilder::new()
            .add_field(bitmap.width() as i32)
            .add_field(bitmap.height() as i32)
            .add_field(bitmap.rowstride() as i32)
            .add_field(bitmap.has_alpha())
            .add_field(8i32)
            .add_field(i32::from(bitmap.channels()))
            .add_field(bitmap.data().to_vec())
            .build();
        hints.insert("image-data", Value::Structure(image));
    }

    hints
}

#[async_trait]
impl DaemonLink for BusLink {
    async fn connect(&mut self, app_name: &str) -> Result<()> {
        if self.state.is_some() {
            debug_context!("BusLink", "already connected");
            return Ok(());
        }

        let connection = Connection::session().await.map_err(connection_err)?;
        let proxy = Proxy::new(&connection, BUS_NAME, OBJECT_PATH, BUS_NAME)
            .await
            .map_err(connection_err)?;
        let actions = proxy
            .receive_signal("ActionInvoked")
            .await
            .map_err(connection_err)?;
        let closed = proxy
            .receive_signal("NotificationClosed")
            .await
            .map_err(connection_err)?;

        debug_context!("BusLink", "connected to {} as {:?}", BUS_NAME, app_name);
        self.state = Some(LinkState {
            proxy,
            actions,
            closed,
        });
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.state.is_some()
    }

    async fn show(&mut self, request: &ShowRequest) -> Result<u32> {
        let state = self
            .state
            .as_ref()
            .ok_or_else(|| NotifyError::Transport("link is not connected".to_string()))?;

        let mut action_list = Vec::with_capacity(request.actions.len() * 2);
        for (id, label) in &request.actions {
            action_list.push(id.clone());
            action_list.push(label.clone());
        }
        let hints = build_hints(request);

        let reply = state
            .proxy
            .call_method(
                "Notify",
                &(
                    request.app_name.as_str(),
                    request.replaces_id,
                    request.icon.as_str(),
                    request.summary.as_str(),
                    request.body.as_str(),
                    action_list,
                    hints,
                    request.timeout_ms,
                ),
            )
            .await
            .map_err(transport_err)?;

        let id = reply.body::<u32>().map_err(transport_err)?;
        debug_context!("BusLink", "daemon assigned id {}", id);
        Ok(id)
    }

    async fn close(&mut self, id: u32) -> Result<()> {
        let state = self
            .state
            .as_ref()
            .ok_or_else(|| NotifyError::Transport("link is not connected".to_string()))?;

        state
            .proxy
            .call_method("CloseNotification", &(id,))
            .await
            .map_err(transport_err)?;
        Ok(())
    }

    async fn next_event(&mut self) -> Option<LinkEvent> {
        let state = self.state.as_mut()?;
        loop {
            tokio::select! {
                message = state.actions.next() => {
                    let message = message?;
                    match message.body::<(u32, String)>() {
                        Ok((id, action)) => {
                            return Some(LinkEvent::ActionInvoked { id, action });
                        }
                        Err(err) => {
                            debug_context!("BusLink", "bad ActionInvoked body: {}", err);
                        }
                    }
                }
                message = state.closed.next() => {
                    let message = message?;
                    match message.body::<(u32, u32)>() {
                        Ok((id, code)) => {
                            return Some(LinkEvent::Closed {
                                id,
                                reason: CloseReason::from_code(code),
                            });
                        }
                        Err(err) => {
                            debug_context!("BusLink", "bad NotificationClosed body: {}", err);
                        }
                    }
                }
            }
        }
    }

    async fn server_info(&mut self) -> Result<ServerInfo> {
        let state = self
            .state
            .as_ref()
            .ok_or_else(|| NotifyError::Transport("link is not connected".to_string()))?;

        let reply = state
            .proxy
            .call_method("GetServerInformation", &())
            .await
            .map_err(transport_err)?;
        let (name, vendor, version, spec_version) = reply
            .body::<(String, String, String, String)>()
            .map_err(transport_err)?;

        let reply = state
            .proxy
            .call_method("GetCapabilities", &())
            .await
            .map_err(transport_err)?;
        let capabilities = reply.body::<Vec<String>>().map_err(transport_err)?;

        Ok(ServerInfo {
            name,
            vendor,
            version,
            spec_version,
            capabilities,
        })
    }

    async fn disconnect(&mut self) {
        if self.state.take().is_some() {
            debug_context!("BusLink", "disconnected");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::Bitmap;

    fn request(image: Option<Bitmap>) -> ShowRequest {
        ShowRequest {
            app_name: "test".to_string(),
            replaces_id: 0,
            icon: String::new(),
            summary: "Title".to_string(),
            body: "Body".to_string(),
            actions: Vec::new(),
            image,
            timeout_ms: -1,
            urgency: 2,
        }
    }

    #[test]
    fn test_hints_carry_urgency() {
        let hints = build_hints(&request(None));
        assert_eq!(hints.get("urgency"), Some(&Value::U8(2)));
        assert!(!hints.contains_key("image-data"));
    }

    #[test]
    fn test_hints_carry_image_data() {
        let bitmap = Bitmap::from_rgba8(2, 1, vec![0; 8]).unwrap();
        let hints = build_hints(&request(Some(bitmap)));
        assert!(matches!(
            hints.get("image-data"),
            Some(Value::Structure(_))
        ));
    }

    #[test]
    fn test_disconnected_link_reports_state() {
        let link = BusLink::new();
        assert!(!link.is_connected());
    }
}
