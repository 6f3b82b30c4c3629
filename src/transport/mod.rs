//! Request/reply transports delivering frames to the server loop.

pub mod channel;
pub mod tcp;

use crate::error::Result;
use crate::protocol::{Request, Response};
use std::time::Duration;

pub use channel::{ChannelClient, ChannelTransport};
pub use tcp::{TcpClient, TcpTransport};

pub trait Transport {
    /// Wait up to `timeout` for the next request; `Ok(None)` when none arrived.
    fn recv(&mut self, timeout: Duration) -> Result<Option<Request>>;

    /// Answer the request most recently returned by `recv`.
    fn reply(&mut self, response: Response) -> Result<()>;
}
