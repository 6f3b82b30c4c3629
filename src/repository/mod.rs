//! Persistent POV storage.
//!
//! The repository assigns ids and hands out fresh [`PovRecord`]s without any
//! derived payload; derivation and caching belong to the learning data store.

pub mod fs;
pub mod memory;

use crate::error::Result;
use crate::image::GrayImageU8;
use crate::pov::{PovId, PovRecord};

pub use fs::FsRepository;
pub use memory::MemoryRepository;

pub trait Repository {
    /// Store a new reference frame and return its freshly assigned id.
    fn save_new_pov(&mut self, image: &GrayImageU8) -> Result<PovId>;

    /// Fetch a POV; `Ok(None)` when the id is unknown.
    fn get_pov_by_id(&self, id: PovId) -> Result<Option<PovRecord>>;
}
