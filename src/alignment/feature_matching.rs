use super::{Aligner, Alignment, EngineKind, Framing, PovLookup};
use crate::error::Result;
use crate::homography::estimate_homography;
use crate::image::{ops, GrayImageU8};
use crate::pov::{EngineData, PovRecord};
use log::debug;
use nalgebra::Matrix3;

/// Native recognition result of a feature-matching engine.
#[derive(Clone, Debug)]
pub struct HomographyFit {
    pub success: bool,
    pub scale: f32,
    pub skew: f32,
    /// Translation in pixels, `[x, y]`.
    pub translation: [f32; 2],
    pub transformed: GrayImageU8,
}

/// Matched point pairs between a frame and the POV's descriptors.
#[derive(Clone, Debug, Default)]
pub struct PointMatches {
    pub success: bool,
    pub source: Vec<[f32; 2]>,
    pub destination: Vec<[f32; 2]>,
}

pub trait FeatureMatchingEngine {
    /// Compute descriptor data for the POV's reference image.
    fn learn(&self, record: &PovRecord) -> EngineData;

    fn keypoint_count(&self, frame: &GrayImageU8) -> usize;

    fn recognize(&self, frame: &GrayImageU8, record: &PovRecord, data: &EngineData)
        -> HomographyFit;

    fn apply(&self, frame: &GrayImageU8, data: &EngineData) -> PointMatches;

    /// Homography mapping `source` onto `destination`, or its inverse.
    fn homography(
        &self,
        source: &[[f32; 2]],
        destination: &[[f32; 2]],
        invert: bool,
    ) -> Option<Matrix3<f32>> {
        let h = estimate_homography(source, destination)?;
        if invert {
            h.try_inverse()
        } else {
            Some(h)
        }
    }
}

pub struct FeatureMatchingAligner<E> {
    engine: E,
}

impl<E: FeatureMatchingEngine> FeatureMatchingAligner<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }
}

impl<E: FeatureMatchingEngine> Aligner for FeatureMatchingAligner<E> {
    fn kind(&self) -> EngineKind {
        EngineKind::FeatureMatching
    }

    fn learn(&self, record: &PovRecord) -> EngineData {
        self.engine.learn(record)
    }

    fn keypoint_count(&self, frame: &GrayImageU8) -> usize {
        self.engine.keypoint_count(frame)
    }

    fn recognize(&self, frame: &GrayImageU8, record: &PovRecord) -> Alignment {
        let data = record.engine_data_or_init(|| self.engine.learn(record));
        let fit = self.engine.recognize(frame, record, data);
        debug!(
            "feature fit: success={} scale={:.3} skew={:.3} t=({:.1}, {:.1})",
            fit.success, fit.scale, fit.skew, fit.translation[0], fit.translation[1]
        );
        Alignment {
            success: fit.success,
            scale: fit.scale,
            skew: Some(fit.skew),
            translation: Some(fit.translation),
            transformed: fit.transformed,
        }
    }

    fn frame(&self, frame: &GrayImageU8, lookup: &mut PovLookup<'_>) -> Result<Framing> {
        let record = lookup()?;
        let data = record.engine_data_or_init(|| self.engine.learn(&record));
        let matches = self.engine.apply(frame, data);
        if !matches.success {
            return Ok(Framing::unchanged(frame));
        }

        let warped = self
            .engine
            .homography(&matches.source, &matches.destination, true)
            .and_then(|h| ops::warp_perspective(frame, &h, frame.width(), frame.height()));
        Ok(match warped {
            Some(image) => Framing {
                success: true,
                image,
            },
            None => {
                debug!("POV {}: degenerate homography, framing skipped", record.id());
                Framing::unchanged(frame)
            }
        })
    }
}
