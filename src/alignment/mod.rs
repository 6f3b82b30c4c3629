//! Alignment strategy: geometric correction between a live frame and a POV.
//!
//! Two engine families exist with different native result shapes:
//!
//! - full-frame transform ([`FullFrameEngine`]): scale + rotation angle;
//! - feature matching ([`FeatureMatchingEngine`]): scale, skew and
//!   translation, plus point correspondences for framing.
//!
//! Exactly one is wrapped into an [`Aligner`] at startup. Everything above this
//! module talks to `dyn Aligner` and only sees the optional skew/translation
//! fields that the active family can fill.

pub mod feature_matching;
pub mod full_frame;

use crate::error::Result;
use crate::image::GrayImageU8;
use crate::pov::{EngineData, PovRecord};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

pub use feature_matching::{
    FeatureMatchingAligner, FeatureMatchingEngine, HomographyFit, PointMatches,
};
pub use full_frame::{FullFrameAligner, FullFrameEngine, PassthroughEngine, TargetFit};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    #[default]
    FullFrame,
    FeatureMatching,
}

/// Result of aligning a frame against a POV for recognition.
#[derive(Clone, Debug)]
pub struct Alignment {
    pub success: bool,
    pub scale: f32,
    /// Only reported by the feature-matching family.
    pub skew: Option<f32>,
    /// Only reported by the feature-matching family.
    pub translation: Option<[f32; 2]>,
    /// Frame brought into the POV's reference geometry.
    pub transformed: GrayImageU8,
}

/// Result of framing: the warped frame, or the original one on failure.
#[derive(Clone, Debug)]
pub struct Framing {
    pub success: bool,
    pub image: GrayImageU8,
}

impl Framing {
    /// Failed framing that echoes the input frame.
    pub fn unchanged(frame: &GrayImageU8) -> Self {
        Self {
            success: false,
            image: frame.clone(),
        }
    }
}

/// Resolves the POV a framing request refers to. Only called by aligners that
/// need the learned record.
pub type PovLookup<'a> = dyn FnMut() -> Result<Rc<PovRecord>> + 'a;

pub trait Aligner {
    fn kind(&self) -> EngineKind;

    /// Compute the engine payload for a POV. Called at most once per record
    /// by the learning data store.
    fn learn(&self, record: &PovRecord) -> EngineData;

    /// Number of usable keypoints in `frame`, for pre-learning feedback.
    fn keypoint_count(&self, frame: &GrayImageU8) -> usize;

    fn recognize(&self, frame: &GrayImageU8, record: &PovRecord) -> Alignment;

    /// Warp `frame` into the POV's geometry. Lookup errors propagate.
    fn frame(&self, frame: &GrayImageU8, lookup: &mut PovLookup<'_>) -> Result<Framing>;
}
