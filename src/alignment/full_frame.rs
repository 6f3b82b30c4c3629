use super::{Aligner, Alignment, EngineKind, Framing, PovLookup};
use crate::error::Result;
use crate::image::{ops, GrayImageU8};
use crate::pov::{EngineData, PovRecord};
use log::{debug, warn};

/// Native result of a full-frame-transform engine.
#[derive(Clone, Debug)]
pub struct TargetFit {
    pub success: bool,
    pub scale: f32,
    /// Rotation in degrees; not used for deviation labels yet.
    pub angle: f32,
    pub transformed: GrayImageU8,
}

pub trait FullFrameEngine {
    fn learn(&self, record: &PovRecord) -> EngineData;

    fn find_target(&self, frame: &GrayImageU8, record: &PovRecord, data: &EngineData)
        -> TargetFit;
}

pub struct FullFrameAligner<E> {
    engine: E,
}

impl<E: FullFrameEngine> FullFrameAligner<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }
}

impl<E: FullFrameEngine> Aligner for FullFrameAligner<E> {
    fn kind(&self) -> EngineKind {
        EngineKind::FullFrame
    }

    fn learn(&self, record: &PovRecord) -> EngineData {
        self.engine.learn(record)
    }

    /// Full-frame engines do not work with keypoints.
    fn keypoint_count(&self, _frame: &GrayImageU8) -> usize {
        0
    }

    fn recognize(&self, frame: &GrayImageU8, record: &PovRecord) -> Alignment {
        let data = record.engine_data_or_init(|| self.engine.learn(record));
        let fit = self.engine.find_target(frame, record, data);
        debug!(
            "full-frame fit: success={} scale={:.3} angle={:.2}",
            fit.success, fit.scale, fit.angle
        );
        Alignment {
            success: fit.success,
            scale: fit.scale,
            skew: None,
            translation: None,
            transformed: fit.transformed,
        }
    }

    // TODO: warp with the fitted transform once engines expose it; until then
    // framing reports failure and echoes the input frame without a lookup.
    fn frame(&self, frame: &GrayImageU8, _lookup: &mut PovLookup<'_>) -> Result<Framing> {
        Ok(Framing::unchanged(frame))
    }
}

/// Reference size captured at learning time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ReferenceSize {
    width: usize,
    height: usize,
}

/// Full-frame engine for mechanically fixed cameras: assumes the frame is
/// already aligned and only brings it to the reference working resolution.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassthroughEngine;

impl PassthroughEngine {
    const NAME: &'static str = "passthrough";
}

impl FullFrameEngine for PassthroughEngine {
    fn learn(&self, record: &PovRecord) -> EngineData {
        let work = &record.images().work;
        EngineData::new(
            Self::NAME,
            ReferenceSize {
                width: work.width(),
                height: work.height(),
            },
        )
    }

    fn find_target(
        &self,
        frame: &GrayImageU8,
        record: &PovRecord,
        data: &EngineData,
    ) -> TargetFit {
        let size = data.downcast_ref::<ReferenceSize>().copied().unwrap_or_else(|| {
            warn!(
                "POV {}: engine data produced by {}, expected {}",
                record.id(),
                data.engine(),
                Self::NAME
            );
            let work = &record.images().work;
            ReferenceSize {
                width: work.width(),
                height: work.height(),
            }
        });
        match ops::resize(frame, size.width, size.height) {
            Ok(transformed) => TargetFit {
                success: true,
                scale: 1.0,
                angle: 0.0,
                transformed,
            },
            Err(err) => {
                warn!("POV {}: cannot resize frame: {err}", record.id());
                TargetFit {
                    success: false,
                    scale: 1.0,
                    angle: 0.0,
                    transformed: frame.clone(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::pov::PovImages;

    fn record() -> PovRecord {
        let full = GrayImageU8::from_fn(1280, 960, |x, _| (x % 256) as u8);
        PovRecord::new(1, PovImages::from_full(full, 640).unwrap())
    }

    #[test]
    fn passthrough_brings_frame_to_reference_size() {
        let aligner = FullFrameAligner::new(PassthroughEngine);
        let record = record();
        let frame = GrayImageU8::zeros(1280, 960);

        let alignment = aligner.recognize(&frame, &record);
        assert!(alignment.success);
        assert_eq!(alignment.scale, 1.0);
        assert!(alignment.skew.is_none() && alignment.translation.is_none());
        assert_eq!(alignment.transformed.width(), 640);
        assert_eq!(alignment.transformed.height(), 480);
    }

    #[test]
    fn framing_echoes_the_frame_without_a_lookup() {
        let aligner = FullFrameAligner::new(PassthroughEngine);
        let frame = GrayImageU8::from_fn(8, 8, |x, y| (x + y) as u8);
        let mut lookups = 0;
        let framing = aligner
            .frame(&frame, &mut || {
                lookups += 1;
                Err(Error::NotFound(404))
            })
            .unwrap();
        assert!(!framing.success);
        assert_eq!(framing.image, frame);
        assert_eq!(lookups, 0);
        assert_eq!(aligner.keypoint_count(&frame), 0);
    }

    #[test]
    fn foreign_engine_data_falls_back_to_the_work_size() {
        let record = record();
        let data = EngineData::new("other", 7u8);
        let fit = PassthroughEngine.find_target(&GrayImageU8::zeros(100, 50), &record, &data);
        assert!(fit.success);
        assert_eq!(fit.transformed.width(), 640);
        assert_eq!(fit.transformed.height(), 480);
    }
}
