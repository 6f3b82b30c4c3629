use super::Repository;
use crate::error::Result;
use crate::image::GrayImageU8;
use crate::pov::{PovId, PovImages, PovRecord, DEFAULT_WORK_WIDTH};

/// In-process repository; contents vanish with the process.
#[derive(Debug)]
pub struct MemoryRepository {
    work_width: usize,
    next_id: PovId,
    povs: Vec<(PovId, PovImages)>,
}

impl MemoryRepository {
    pub fn new(work_width: usize) -> Self {
        Self {
            work_width,
            next_id: 1,
            povs: Vec::new(),
        }
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new(DEFAULT_WORK_WIDTH)
    }
}

impl Repository for MemoryRepository {
    fn save_new_pov(&mut self, image: &GrayImageU8) -> Result<PovId> {
        let images = PovImages::from_full(image.clone(), self.work_width)?;
        let id = self.next_id;
        self.next_id += 1;
        self.povs.push((id, images));
        Ok(id)
    }

    fn get_pov_by_id(&self, id: PovId) -> Result<Option<PovRecord>> {
        Ok(self
            .povs
            .iter()
            .find(|(pov_id, _)| *pov_id == id)
            .map(|(pov_id, images)| PovRecord::new(*pov_id, images.clone())))
    }
}
