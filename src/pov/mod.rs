//! Learning records ("points of view") and their derived payloads.
//!
//! A [`PovRecord`] is shared by reference (`Rc`) between the cache tiers of the
//! learning data store. Its derived payloads live in `OnceCell`s: they are
//! attached at most once and never change afterwards, so every caller that
//! resolves the same id observes the very same payload objects.

pub mod ml;
pub mod sight;

use crate::error::Result;
use crate::image::{ops, GrayImageU8};
use std::any::Any;
use std::cell::OnceCell;
use std::fmt;

pub use ml::MlData;
pub use sight::{Feature, ImageClass, ImageFilterType, Roi, RoiFeatureType, RoiImage, Sight};

/// Identifier assigned by the persistent repository.
pub type PovId = u64;

/// Width of the working-resolution reference copy.
pub const DEFAULT_WORK_WIDTH: usize = 640;

/// High-resolution reference plus the working-resolution copy used by the
/// alignment engines and the ML derivation.
#[derive(Clone, Debug)]
pub struct PovImages {
    pub full: GrayImageU8,
    pub work: GrayImageU8,
}

impl PovImages {
    pub fn from_full(full: GrayImageU8, work_width: usize) -> Result<Self> {
        let work = ops::resize_to_width(&full, work_width)?;
        Ok(Self { full, work })
    }
}

/// Opaque per-engine payload produced by an alignment engine's `learn`.
///
/// Engines downcast back to their own type; the coordinator never looks inside.
pub struct EngineData {
    engine: &'static str,
    inner: Box<dyn Any>,
}

impl EngineData {
    pub fn new<T: Any>(engine: &'static str, value: T) -> Self {
        Self {
            engine,
            inner: Box::new(value),
        }
    }

    /// Name of the engine that produced the payload.
    pub fn engine(&self) -> &'static str {
        self.engine
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

impl fmt::Debug for EngineData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineData")
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

#[derive(Debug)]
pub struct PovRecord {
    id: PovId,
    images: PovImages,
    engine_data: OnceCell<EngineData>,
    ml_data: OnceCell<MlData>,
}

impl PovRecord {
    pub fn new(id: PovId, images: PovImages) -> Self {
        Self {
            id,
            images,
            engine_data: OnceCell::new(),
            ml_data: OnceCell::new(),
        }
    }

    pub fn id(&self) -> PovId {
        self.id
    }

    pub fn images(&self) -> &PovImages {
        &self.images
    }

    /// Alignment-engine payload, if it has been derived already.
    pub fn engine_data(&self) -> Option<&EngineData> {
        self.engine_data.get()
    }

    /// ML payload, if it has been derived already.
    pub fn ml_data(&self) -> Option<&MlData> {
        self.ml_data.get()
    }

    /// Attach the engine payload on first call; later calls return the
    /// existing payload without running `derive`.
    pub fn engine_data_or_init(&self, derive: impl FnOnce() -> EngineData) -> &EngineData {
        self.engine_data.get_or_init(derive)
    }

    pub fn ml_data_or_init(&self, derive: impl FnOnce() -> MlData) -> &MlData {
        self.ml_data.get_or_init(derive)
    }
}
