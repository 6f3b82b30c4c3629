//! In-process transport over `std::sync::mpsc`, used by tests and embedders.
use super::Transport;
use crate::error::{Error, Result};
use crate::protocol::{Request, Response};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;

pub struct ChannelTransport {
    requests: Receiver<Request>,
    replies: Sender<Response>,
}

/// Client half of [`channel`].
pub struct ChannelClient {
    requests: Sender<Request>,
    replies: Receiver<Response>,
}

pub fn channel() -> (ChannelTransport, ChannelClient) {
    let (req_tx, req_rx) = mpsc::channel();
    let (rep_tx, rep_rx) = mpsc::channel();
    (
        ChannelTransport {
            requests: req_rx,
            replies: rep_tx,
        },
        ChannelClient {
            requests: req_tx,
            replies: rep_rx,
        },
    )
}

impl Transport for ChannelTransport {
    fn recv(&mut self, timeout: Duration) -> Result<Option<Request>> {
        match self.requests.recv_timeout(timeout) {
            Ok(request) => Ok(Some(request)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(Error::Disconnected),
        }
    }

    fn reply(&mut self, response: Response) -> Result<()> {
        self.replies.send(response).map_err(|_| Error::Disconnected)
    }
}

impl ChannelClient {
    pub fn send(&self, request: Request) -> Result<()> {
        self.requests.send(request).map_err(|_| Error::Disconnected)
    }

    /// Next reply, if one is already waiting.
    pub fn try_receive(&self) -> Option<Response> {
        self.replies.try_recv().ok()
    }
}
