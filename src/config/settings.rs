//! Learning settings: sight template, classifier uncertainty and tolerance
//! thresholds.
use super::schema::{self, Field, Kind};
use crate::error::{Error, Result};
use crate::pov::Sight;
use crate::tolerance::ToleranceThresholds;
use log::info;
use serde::Deserialize;
use std::fs;
use std::path::Path;

static FILTER_NAMES: [&str; 3] = ["edges", "threshold", "inverted"];
static FEATURE_NAMES: [&str; 3] = ["fill_ratio", "projections", "pixels"];

static ROI_FIELDS: [Field; 6] = [
    Field::required("x", Kind::Unsigned),
    Field::required("y", Kind::Unsigned),
    Field::required("width", Kind::Unsigned),
    Field::required("height", Kind::Unsigned),
    Field::required("image_filter_type", Kind::OneOf(&FILTER_NAMES)),
    Field::required("feature_type", Kind::OneOf(&FEATURE_NAMES)),
];

static SIGHT_FIELDS: [Field; 4] = [
    Field::required("name", Kind::String),
    Field::required("width", Kind::Unsigned),
    Field::required("height", Kind::Unsigned),
    Field::required("roi", Kind::Array(&ROI)),
];

static ROI: Kind = Kind::Object(&ROI_FIELDS);
static SIGHT: Kind = Kind::Object(&SIGHT_FIELDS);

static SELECTOR_FIELDS: [Field; 1] = [Field::required("uncertainty", Kind::Number)];

static TOLERANCE_FIELDS: [Field; 5] = [
    Field::optional("min_scale", Kind::Number),
    Field::optional("max_scale", Kind::Number),
    Field::optional("max_skew", Kind::Number),
    Field::optional("min_trans", Kind::Number),
    Field::optional("max_trans", Kind::Number),
];

static SETTINGS_FIELDS: [Field; 3] = [
    Field::required("sights", Kind::Array(&SIGHT)),
    Field::required("recognition_selector", Kind::Object(&SELECTOR_FIELDS)),
    Field::optional("tolerance", Kind::Object(&TOLERANCE_FIELDS)),
];

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecognitionSelector {
    /// Largest normalised feature distance still accepted as a match.
    pub uncertainty: f32,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LearningSettings {
    pub sights: Vec<Sight>,
    pub recognition_selector: RecognitionSelector,
    #[serde(default)]
    pub tolerance: ToleranceThresholds,
}

impl LearningSettings {
    pub fn from_json_str(data: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(data)?;
        schema::validate(&value, &SETTINGS_FIELDS)?;
        let settings: Self = serde_json::from_value(value)?;
        settings.check_layout()?;
        Ok(settings)
    }

    /// Every sight must have an area and every ROI must lie inside its sight.
    fn check_layout(&self) -> Result<()> {
        for (i, sight) in self.sights.iter().enumerate() {
            if sight.width == 0 || sight.height == 0 {
                return Err(Error::Config(format!(
                    "sights[{i}] ({:?}) has an empty size {}x{}",
                    sight.name, sight.width, sight.height
                )));
            }
            for (j, roi) in sight.roi.iter().enumerate() {
                let fits = roi.width > 0
                    && roi.height > 0
                    && u64::from(roi.x) + u64::from(roi.width) <= u64::from(sight.width)
                    && u64::from(roi.y) + u64::from(roi.height) <= u64::from(sight.height);
                if !fits {
                    return Err(Error::Config(format!(
                        "sights[{i}].roi[{j}] at ({}, {}) size {}x{} does not fit inside sight {:?} of {}x{}",
                        roi.x, roi.y, roi.width, roi.height, sight.name, sight.width, sight.height
                    )));
                }
            }
        }
        Ok(())
    }
}

pub fn load_learning_settings(path: &Path) -> Result<LearningSettings> {
    info!("Reading the input file : {}", path.display());
    let data = fs::read_to_string(path)
        .map_err(|_| Error::Config(format!("The file {} doesn't exist.", path.display())))?;
    let settings = LearningSettings::from_json_str(&data)?;
    info!(
        "{} sights configured, uncertainty {}",
        settings.sights.len(),
        settings.recognition_selector.uncertainty
    );
    Ok(settings)
}
