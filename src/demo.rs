//! Optional recording of recognition frames for demos and offline review.
//!
//! A session starts with the first recorded frame and writes numbered PNGs to
//! `<root>/demo_recognition_<unix ms>/`. Closing the session (a client that
//! lost its camera) makes the next frame start a fresh directory.
use crate::error::Result;
use crate::image::io::save_grayscale_u8;
use crate::image::GrayImageU8;
use log::info;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

struct Session {
    dir: PathBuf,
    frames: usize,
}

pub struct DemoRecorder {
    root: PathBuf,
    session: Option<Session>,
}

impl DemoRecorder {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            session: None,
        })
    }

    pub fn record(&mut self, frame: &GrayImageU8) -> Result<()> {
        if self.session.is_none() {
            let stamp = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default();
            let dir = self.root.join(format!("demo_recognition_{stamp}"));
            fs::create_dir_all(&dir)?;
            info!("demo capture started in {}", dir.display());
            self.session = Some(Session { dir, frames: 0 });
        }
        if let Some(session) = self.session.as_mut() {
            let path = session.dir.join(format!("frame_{:05}.png", session.frames));
            save_grayscale_u8(frame, &path)?;
            session.frames += 1;
        }
        Ok(())
    }

    /// End the current session, if any.
    pub fn close(&mut self) {
        if let Some(session) = self.session.take() {
            info!(
                "demo capture closed after {} frames ({})",
                session.frames,
                session.dir.display()
            );
        }
    }
}
