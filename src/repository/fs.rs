//! Directory-backed repository: `<root>/pov_<id>/{full,work}.png`.
use super::Repository;
use crate::error::Result;
use crate::image::io::{load_grayscale_image, save_grayscale_u8};
use crate::image::GrayImageU8;
use crate::pov::{PovId, PovImages, PovRecord};
use log::{debug, info};
use std::fs;
use std::path::PathBuf;

const POV_DIR_PREFIX: &str = "pov_";
const FULL_IMAGE: &str = "full.png";
const WORK_IMAGE: &str = "work.png";

#[derive(Debug)]
pub struct FsRepository {
    root: PathBuf,
    work_width: usize,
    next_id: PovId,
}

impl FsRepository {
    /// Open (creating if needed) a repository rooted at `root`. New ids continue
    /// after the highest id already on disk.
    pub fn open(root: impl Into<PathBuf>, work_width: usize) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        let mut max_id = 0;
        for entry in fs::read_dir(&root)? {
            let entry = entry?;
            if let Some(id) = parse_pov_dir(&entry.file_name().to_string_lossy()) {
                max_id = max_id.max(id);
            }
        }
        info!(
            "POV repository at {} (next id {})",
            root.display(),
            max_id + 1
        );
        Ok(Self {
            root,
            work_width,
            next_id: max_id + 1,
        })
    }

    fn pov_dir(&self, id: PovId) -> PathBuf {
        self.root.join(format!("{POV_DIR_PREFIX}{id}"))
    }
}

fn parse_pov_dir(name: &str) -> Option<PovId> {
    name.strip_prefix(POV_DIR_PREFIX)?.parse().ok()
}

impl Repository for FsRepository {
    fn save_new_pov(&mut self, image: &GrayImageU8) -> Result<PovId> {
        let images = PovImages::from_full(image.clone(), self.work_width)?;
        let id = self.next_id;
        let dir = self.pov_dir(id);
        save_grayscale_u8(&images.full, &dir.join(FULL_IMAGE))?;
        save_grayscale_u8(&images.work, &dir.join(WORK_IMAGE))?;
        self.next_id += 1;
        debug!("saved POV {id} to {}", dir.display());
        Ok(id)
    }

    fn get_pov_by_id(&self, id: PovId) -> Result<Option<PovRecord>> {
        let dir = self.pov_dir(id);
        if !dir.is_dir() {
            return Ok(None);
        }
        let images = PovImages {
            full: load_grayscale_image(&dir.join(FULL_IMAGE))?,
            work: load_grayscale_image(&dir.join(WORK_IMAGE))?,
        };
        Ok(Some(PovRecord::new(id, images)))
    }
}
