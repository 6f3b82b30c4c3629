//! Length-prefixed TCP transport.
//!
//! Every message in either direction is
//! `u32 BE header length | header JSON | u32 BE image length | image bytes`.
//! Requests carry any image format the `image` crate decodes; replies carry
//! PNG, or an empty image section when there is no image.
//!
//! One client is served at a time; a new connection is accepted once the
//! previous client disconnects.
use super::Transport;
use crate::error::{Error, Result};
use crate::image::io::{decode_image, encode_png};
use crate::image::GrayImageU8;
use crate::protocol::{Request, RequestHeader, Response};
use log::{info, warn};
use std::io::{self, ErrorKind, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::thread;
use std::time::{Duration, Instant};

const MAX_HEADER_BYTES: u32 = 64 * 1024;
const MAX_IMAGE_BYTES: u32 = 64 * 1024 * 1024;
const ACCEPT_POLL: Duration = Duration::from_millis(20);

pub struct TcpTransport {
    listener: TcpListener,
    peer: Option<TcpStream>,
}

impl TcpTransport {
    pub fn bind(addr: impl ToSocketAddrs) -> Result<Self> {
        let listener = TcpListener::bind(addr)?;
        listener.set_nonblocking(true)?;
        info!("listening on {}", listener.local_addr()?);
        Ok(Self {
            listener,
            peer: None,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    fn accept_within(&mut self, timeout: Duration) -> Result<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            match self.listener.accept() {
                Ok((stream, addr)) => {
                    stream.set_nonblocking(false)?;
                    info!("client connected from {addr}");
                    self.peer = Some(stream);
                    return Ok(true);
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    if Instant::now() >= deadline {
                        return Ok(false);
                    }
                    thread::sleep(ACCEPT_POLL);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl Transport for TcpTransport {
    fn recv(&mut self, timeout: Duration) -> Result<Option<Request>> {
        if self.peer.is_none() && !self.accept_within(timeout)? {
            return Ok(None);
        }
        let Some(stream) = self.peer.as_mut() else {
            return Ok(None);
        };
        stream.set_read_timeout(Some(timeout))?;

        let (header, image) = match read_message(stream) {
            Ok(Some(message)) => message,
            Ok(None) => return Ok(None),
            Err(e) => {
                if e.kind() == ErrorKind::UnexpectedEof {
                    info!("client disconnected");
                } else {
                    warn!("dropping client: {e}");
                }
                self.peer = None;
                return Ok(None);
            }
        };

        let header = RequestHeader::parse(&header)?;
        let frame = if header.error || image.is_empty() {
            GrayImageU8::zeros(0, 0)
        } else {
            decode_image(&image)?
        };
        Ok(Some(Request { header, frame }))
    }

    fn reply(&mut self, response: Response) -> Result<()> {
        let stream = self
            .peer
            .as_mut()
            .ok_or_else(|| Error::Protocol("no client to reply to".to_string()))?;
        let image = match &response.image {
            Some(image) => encode_png(image)?,
            None => Vec::new(),
        };
        if let Err(e) = write_message(stream, response.body.as_bytes(), &image) {
            self.peer = None;
            return Err(e.into());
        }
        Ok(())
    }
}

/// Blocking client for the TCP transport.
pub struct TcpClient {
    stream: TcpStream,
}

impl TcpClient {
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        Ok(Self {
            stream: TcpStream::connect(addr)?,
        })
    }

    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        Ok(self.stream.set_read_timeout(timeout)?)
    }

    /// Send a header and, unless `frame` is `None`, a PNG-encoded frame.
    pub fn send(&mut self, header: &RequestHeader, frame: Option<&GrayImageU8>) -> Result<()> {
        let body = serde_json::to_vec(header)?;
        let image = match frame {
            Some(frame) => encode_png(frame)?,
            None => Vec::new(),
        };
        write_message(&mut self.stream, &body, &image)?;
        Ok(())
    }

    pub fn receive(&mut self) -> Result<Response> {
        let (body, image) = read_message(&mut self.stream)?
            .ok_or_else(|| Error::Protocol("timed out waiting for a reply".to_string()))?;
        let body = String::from_utf8(body)
            .map_err(|e| Error::Protocol(format!("reply is not UTF-8: {e}")))?;
        let image = if image.is_empty() {
            None
        } else {
            Some(decode_image(&image)?)
        };
        Ok(Response { body, image })
    }
}

fn write_message(w: &mut impl Write, header: &[u8], image: &[u8]) -> io::Result<()> {
    let header_len = u32::try_from(header.len())
        .map_err(|_| io::Error::new(ErrorKind::InvalidInput, "header too large"))?;
    let image_len = u32::try_from(image.len())
        .map_err(|_| io::Error::new(ErrorKind::InvalidInput, "image too large"))?;
    w.write_all(&header_len.to_be_bytes())?;
    w.write_all(header)?;
    w.write_all(&image_len.to_be_bytes())?;
    w.write_all(image)?;
    w.flush()
}

/// Read one message. `Ok(None)` when the read timed out before the first
/// byte; a timeout in the middle of a message is an error.
fn read_message(r: &mut impl Read) -> io::Result<Option<(Vec<u8>, Vec<u8>)>> {
    let mut len = [0u8; 4];
    loop {
        match r.read(&mut len[..1]) {
            Ok(0) => return Err(io::Error::new(ErrorKind::UnexpectedEof, "peer closed")),
            Ok(_) => break,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                return Ok(None)
            }
            Err(e) => return Err(e),
        }
    }
    r.read_exact(&mut len[1..])?;
    let header = read_chunk(r, u32::from_be_bytes(len), MAX_HEADER_BYTES)?;

    r.read_exact(&mut len)?;
    let image = read_chunk(r, u32::from_be_bytes(len), MAX_IMAGE_BYTES)?;
    Ok(Some((header, image)))
}

fn read_chunk(r: &mut impl Read, len: u32, max: u32) -> io::Result<Vec<u8>> {
    if len > max {
        return Err(io::Error::new(
            ErrorKind::InvalidData,
            format!("message section of {len} bytes exceeds {max}"),
        ));
    }
    let mut buf = vec![0u8; len as usize];
    r.read_exact(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn framing_round_trips_sections() {
        let mut wire = Vec::new();
        write_message(&mut wire, b"{\"mode\":0}", &[1, 2, 3]).unwrap();
        let (header, image) = read_message(&mut Cursor::new(wire)).unwrap().unwrap();
        assert_eq!(header, b"{\"mode\":0}");
        assert_eq!(image, vec![1, 2, 3]);
    }

    #[test]
    fn oversized_header_is_rejected() {
        let mut wire = (MAX_HEADER_BYTES + 1).to_be_bytes().to_vec();
        wire.extend_from_slice(&[0; 8]);
        let err = read_message(&mut Cursor::new(wire)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn closed_stream_reports_eof() {
        let err = read_message(&mut Cursor::new(Vec::new())).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    }
}
