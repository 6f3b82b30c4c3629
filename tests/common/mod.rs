#![allow(dead_code)]

pub mod synthetic_image;

use pov_framing::alignment::{Aligner, FullFrameAligner, PassthroughEngine};
use pov_framing::pov::{ImageFilterType, Roi, RoiFeatureType, Sight};
use pov_framing::repository::MemoryRepository;
use pov_framing::tolerance::ToleranceThresholds;
use pov_framing::validation::{RoiFeatureClassifier, SightClassifier, ValidationAggregator};
use pov_framing::{LearningDataStore, ModeCoordinator};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// One 20×20 sight split into a left and a right ROI.
pub fn centered_sight() -> Sight {
    let roi = |x: u32, filter, feature| Roi {
        x,
        y: 0,
        width: 10,
        height: 20,
        image_filter_type: filter,
        feature_type: feature,
        images: Vec::new(),
    };
    Sight {
        name: "center".to_string(),
        width: 20,
        height: 20,
        roi: vec![
            roi(0, ImageFilterType::Threshold, RoiFeatureType::FillRatio),
            roi(10, ImageFilterType::Edges, RoiFeatureType::Projections),
        ],
    }
}

pub fn coordinator_with(
    template: Vec<Sight>,
    aligner: Box<dyn Aligner>,
    classifier: Box<dyn SightClassifier>,
    thresholds: ToleranceThresholds,
) -> ModeCoordinator {
    let store = LearningDataStore::new(Box::new(MemoryRepository::default()), template);
    ModeCoordinator::new(store, aligner, ValidationAggregator::new(classifier), thresholds)
}

/// Passthrough alignment and the ROI feature classifier, as the binary wires them.
pub fn stock_coordinator(template: Vec<Sight>) -> ModeCoordinator {
    coordinator_with(
        template,
        Box::new(FullFrameAligner::new(PassthroughEngine)),
        Box::new(RoiFeatureClassifier::new(0.1)),
        ToleranceThresholds::default(),
    )
}
