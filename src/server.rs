//! Pull-based request loop.
//!
//! One request is processed to completion before the next is received. The
//! receive timeout only bounds the wait for a new request.
use crate::coordinator::{Mode, ModeCoordinator};
use crate::demo::DemoRecorder;
use crate::error::{Error, Result};
use crate::protocol::{Request, Response};
use crate::transport::Transport;
use log::{debug, error, warn};
use std::time::{Duration, Instant};

pub const RECEIVE_TIMEOUT: Duration = Duration::from_secs(3);

/// What a single `poll_once` did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Poll {
    /// Nothing arrived within the receive timeout.
    Idle,
    /// Error-flagged request, skipped without reply.
    Skipped,
    Replied,
    /// Processing failed; the request gets no reply.
    Dropped,
}

pub struct Server<T> {
    transport: T,
    coordinator: ModeCoordinator,
    demo: Option<DemoRecorder>,
}

impl<T: Transport> Server<T> {
    pub fn new(transport: T, coordinator: ModeCoordinator) -> Self {
        Self {
            transport,
            coordinator,
            demo: None,
        }
    }

    pub fn with_demo(mut self, demo: DemoRecorder) -> Self {
        self.demo = Some(demo);
        self
    }

    pub fn coordinator(&self) -> &ModeCoordinator {
        &self.coordinator
    }

    /// Serve until the transport fails.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.poll_once()?;
        }
    }

    pub fn poll_once(&mut self) -> Result<Poll> {
        let request = match self.transport.recv(RECEIVE_TIMEOUT) {
            Ok(Some(request)) => request,
            Ok(None) => return Ok(Poll::Idle),
            Err(err @ (Error::Protocol(_) | Error::Image(_) | Error::Json(_))) => {
                warn!("discarding malformed request: {err}");
                return Ok(Poll::Dropped);
            }
            Err(err) => return Err(err),
        };

        if request.header.error {
            debug!("client reported an error, skipping");
            if let Some(demo) = self.demo.as_mut() {
                demo.close();
            }
            return Ok(Poll::Skipped);
        }

        let started = Instant::now();
        let mode = request.header.mode();
        let response = match self.process(mode, request) {
            Ok(response) => response,
            Err(err) => {
                error!("{mode:?} request failed, no reply sent: {err}");
                return Ok(Poll::Dropped);
            }
        };
        debug!(
            "{mode:?} processed in {:.3} ms",
            started.elapsed().as_secs_f64() * 1000.0
        );

        if let Err(err) = self.transport.reply(response) {
            warn!("reply not delivered: {err}");
            return Ok(Poll::Dropped);
        }
        Ok(Poll::Replied)
    }

    fn process(&mut self, mode: Mode, request: Request) -> Result<Response> {
        let outcome = self
            .coordinator
            .handle(mode, request.header.pov_id, &request.frame)?;

        if let (Some(demo), Some(transformed)) = (self.demo.as_mut(), outcome.transformed.as_ref())
        {
            if let Err(err) = demo.record(transformed) {
                warn!("demo capture failed: {err}");
            }
        }

        Response::new(&outcome.reply, outcome.image)
    }
}
