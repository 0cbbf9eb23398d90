//! Scripted daemon link for tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{NotifyError, Result};
use crate::link::{DaemonLink, LinkEvent, ServerInfo, ShowRequest};

#[derive(Default)]
pub(crate) struct MockState {
    pub connected: bool,
    pub connect_calls: u32,
    pub fail_connect: bool,
    pub fail_show: bool,
    pub fail_close: bool,
    pub shown: Vec<ShowRequest>,
    pub closed_ids: Vec<u32>,
    /// Drained by `next_event`; an empty queue ends the stream
    pub events: VecDeque<LinkEvent>,
}

pub(crate) struct MockLink {
    state: Arc<Mutex<MockState>>,
}

impl MockLink {
    pub fn new() -> (Self, Arc<Mutex<MockState>>) {
        let state = Arc::new(Mutex::new(MockState::default()));
        (
            Self {
                state: Arc::clone(&state),
            },
            state,
        )
    }
}

#[async_trait]
impl DaemonLink for MockLink {
    async fn connect(&mut self, _app_name: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.connected {
            return Ok(());
        }
        state.connect_calls += 1;
        if state.fail_connect {
            return Err(NotifyError::Connection("scripted connect failure".to_string()));
        }
        state.connected = true;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.state.lock().unwrap().connected
    }

    async fn show(&mut self, request: &ShowRequest) -> Result<u32> {
        let mut state = self.state.lock().unwrap();
        if !state.connected {
            return Err(NotifyError::Transport("link is not connected".to_string()));
        }
        if state.fail_show {
            return Err(NotifyError::Transport("scripted show failure".to_string()));
        }
        state.shown.push(request.clone());
        Ok(state.shown.len() as u32)
    }

    async fn close(&mut self, id: u32) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if !state.connected {
            return Err(NotifyError::Transport("link is not connected".to_string()));
        }
        if state.fail_close {
            return Err(NotifyError::Transport("scripted close failure".to_string()));
        }
        state.closed_ids.push(id);
        Ok(())
    }

    async fn next_event(&mut self) -> Option<LinkEvent> {
        self.state.lock().unwrap().events.pop_front()
    }

    async fn server_info(&mut self) -> Result<ServerInfo> {
        Ok(ServerInfo {
            name: "mock".to_string(),
            vendor: "desktoast".to_string(),
            version: "0".to_string(),
            spec_version: "1.2".to_string(),
            capabilities: vec!["actions".to_string(), "body".to_string()],
        })
    }

    async fn disconnect(&mut self) {
        self.state.lock().unwrap().connected = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_show_requires_connection() {
        let (mut link, _state) = MockLink::new();
        let request = ShowRequest {
            app_name: "test".to_string(),
            replaces_id: 0,
            icon: String::new(),
            summary: "Title".to_string(),
            body: String::new(),
            actions: Vec::new(),
            image: None,
            timeout_ms: -1,
            urgency: 1,
        };

        assert!(matches!(
            link.show(&request).await,
            Err(NotifyError::Transport(_))
        ));

        link.connect("test").await.unwrap();
        assert_eq!(link.show(&request).await.unwrap(), 1);
        assert_eq!(link.show(&request).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_events_drain_in_order() {
        let (mut link, state) = MockLink::new();
        state.lock().unwrap().events.push_back(LinkEvent::ActionInvoked {
            id: 1,
            action: "ok".to_string(),
        });

        assert!(matches!(
            link.next_event().await,
            Some(LinkEvent::ActionInvoked { id: 1, .. })
        ));
        assert!(link.next_event().await.is_none());
    }
}
