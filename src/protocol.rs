//! Wire messages exchanged with camera clients.
//!
//! A request is a JSON header plus an encoded image; a response is a JSON body
//! plus an optional image (framing only). Header fields beyond the ones below
//! are ignored.
use crate::coordinator::{Mode, Reply};
use crate::error::{Error, Result};
use crate::image::GrayImageU8;
use crate::pov::PovId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestHeader {
    pub mode: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pov_id: Option<PovId>,
    /// Set by clients that lost their camera; the message carries no frame.
    #[serde(default)]
    pub error: bool,
    /// Accepted for compatibility, currently unused.
    #[serde(default)]
    pub save_ref: bool,
}

impl RequestHeader {
    pub fn new(mode: Mode, pov_id: Option<PovId>) -> Self {
        Self {
            mode: mode.wire_value(),
            pov_id,
            ..Self::default()
        }
    }

    pub fn parse(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| Error::Protocol(format!("bad header: {e}")))
    }

    pub fn mode(&self) -> Mode {
        Mode::from_wire(self.mode)
    }
}

#[derive(Clone, Debug)]
pub struct Request {
    pub header: RequestHeader,
    pub frame: GrayImageU8,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    /// JSON reply body.
    pub body: String,
    pub image: Option<GrayImageU8>,
}

impl Response {
    pub fn new(reply: &Reply, image: Option<GrayImageU8>) -> Result<Self> {
        Ok(Self {
            body: serde_json::to_string(reply)?,
            image,
        })
    }
}
