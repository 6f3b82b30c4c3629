#![doc = include_str!("../README.md")]

pub mod alignment;
pub mod config;
pub mod coordinator;
pub mod demo;
pub mod error;
pub mod features;
pub mod filters;
pub mod geometry;
pub mod homography;
pub mod image;
pub mod pov;
pub mod protocol;
pub mod repository;
pub mod server;
pub mod store;
pub mod tolerance;
pub mod transport;
pub mod validation;

// --- High-level re-exports -------------------------------------------------

pub use crate::coordinator::{Mode, ModeCoordinator, Outcome, RecognitionReport, Reply};
pub use crate::error::{Error, Result};
pub use crate::pov::{PovId, PovRecord};
pub use crate::store::LearningDataStore;

/// Small prelude for wiring a coordinator by hand.
///
/// ```no_run
/// use pov_framing::prelude::*;
///
/// # fn main() -> pov_framing::Result<()> {
/// let store = LearningDataStore::new(Box::new(MemoryRepository::default()), Vec::new());
/// let aligner = Box::new(FullFrameAligner::new(PassthroughEngine));
/// let validator = ValidationAggregator::new(Box::new(RoiFeatureClassifier::new(0.1)));
/// let mut coordinator =
///     ModeCoordinator::new(store, aligner, validator, ToleranceThresholds::default());
///
/// let frame = GrayImageU8::zeros(640, 480);
/// let outcome = coordinator.handle(Mode::Learning, None, &frame)?;
/// println!("{}", serde_json::to_string(&outcome.reply)?);
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::alignment::{FullFrameAligner, PassthroughEngine};
    pub use crate::image::GrayImageU8;
    pub use crate::repository::MemoryRepository;
    pub use crate::tolerance::ToleranceThresholds;
    pub use crate::validation::{RoiFeatureClassifier, ValidationAggregator};
    pub use crate::{LearningDataStore, Mode, ModeCoordinator};
}
