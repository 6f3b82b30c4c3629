//! Sight validation over an aligned candidate frame.
//!
//! The aggregator asks a [`SightClassifier`] about every configured sight and
//! AND-reduces the verdicts; an empty sight list never validates.
use crate::features::normalized_distance;
use crate::geometry::{PixelRect, Point2};
use crate::image::GrayImageU8;
use crate::pov::{ImageFilterType, PovRecord, RoiFeatureType, Sight};
use log::debug;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SightMatch {
    pub success: bool,
    /// Classifier-specific distance; lower is better.
    pub score: f32,
}

pub trait SightClassifier {
    /// Load the reference contexts of `sight` before `find_target`.
    fn get_knn_contexts(&mut self, sight: &Sight);

    /// Classify the sight placed at `top_left..bottom_right` on `image`.
    fn find_target(
        &mut self,
        image: &GrayImageU8,
        top_left: Point2,
        bottom_right: Point2,
    ) -> SightMatch;
}

pub struct ValidationAggregator {
    classifier: Box<dyn SightClassifier>,
}

impl ValidationAggregator {
    pub fn new(classifier: Box<dyn SightClassifier>) -> Self {
        Self { classifier }
    }

    /// `true` iff the POV has at least one sight and every sight matches.
    ///
    /// Every sight is classified even after a failure; the verdicts are folded
    /// with AND so a single miss anywhere in the order decides the result.
    pub fn validate(&mut self, record: &PovRecord, aligned: &GrayImageU8) -> bool {
        let sights = record.ml_data().map(|ml| ml.sights.as_slice()).unwrap_or(&[]);
        let classifier = &mut self.classifier;
        sights.iter().fold(!sights.is_empty(), |all_matched, sight| {
            let placement = sight.placement(aligned.width(), aligned.height());
            classifier.get_knn_contexts(sight);
            let verdict =
                classifier.find_target(aligned, placement.top_left(), placement.bottom_right());
            debug!(
                "sight {:?}: success={} score={:.3}",
                sight.name, verdict.success, verdict.score
            );
            all_matched && verdict.success
        })
    }
}

struct RoiContext {
    rect: PixelRect,
    filter: ImageFilterType,
    feature_type: RoiFeatureType,
    references: Vec<Vec<f32>>,
}

/// Nearest-neighbour classifier over the reference ROI features.
///
/// A sight matches when, for every ROI, the closest reference vector lies
/// within `uncertainty` (normalised Euclidean distance, see
/// [`normalized_distance`]).
pub struct RoiFeatureClassifier {
    uncertainty: f32,
    contexts: Vec<RoiContext>,
}

impl RoiFeatureClassifier {
    pub fn new(uncertainty: f32) -> Self {
        Self {
            uncertainty,
            contexts: Vec::new(),
        }
    }
}

impl SightClassifier for RoiFeatureClassifier {
    fn get_knn_contexts(&mut self, sight: &Sight) {
        self.contexts = sight
            .roi
            .iter()
            .map(|roi| RoiContext {
                rect: roi.rect(),
                filter: roi.image_filter_type,
                feature_type: roi.feature_type,
                references: roi
                    .images
                    .iter()
                    .flat_map(|image| &image.features)
                    .filter(|f| f.feature_type == roi.feature_type)
                    .map(|f| f.vector.clone())
                    .collect(),
            })
            .collect();
    }

    fn find_target(
        &mut self,
        image: &GrayImageU8,
        top_left: Point2,
        bottom_right: Point2,
    ) -> SightMatch {
        if self.contexts.is_empty() {
            return SightMatch {
                success: false,
                score: 1.0,
            };
        }
        let frame = image.as_view();
        let sight_image = frame.crop(PixelRect::from_corners(top_left, bottom_right));

        let worst = self
            .contexts
            .iter()
            .map(|ctx| {
                let mask = ctx.filter.apply(&sight_image);
                let candidate = ctx.feature_type.extract(&mask.as_view().crop(ctx.rect));
                ctx.references
                    .iter()
                    .map(|reference| normalized_distance(&candidate.vector, reference))
                    .fold(1.0f32, f32::min)
            })
            .fold(0.0f32, f32::max);

        SightMatch {
            success: worst <= self.uncertainty,
            score: worst,
        }
    }
}
