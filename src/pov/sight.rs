//! Sight templates, their regions of interest and the features attached to
//! them once a reference frame has been processed.
use crate::geometry::{PixelRect, Point2};
use serde::{Deserialize, Serialize};

/// Binary mask producer applied to a sight crop before feature extraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFilterType {
    /// Sobel magnitude above a fraction of the crop's strongest edge.
    Edges,
    /// Otsu threshold, bright pixels set.
    Threshold,
    /// Otsu threshold, dark pixels set.
    Inverted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoiFeatureType {
    /// Share of set pixels, a 1-vector.
    FillRatio,
    /// Row means followed by column means.
    Projections,
    /// Every mask pixel as 0/1, row-major.
    Pixels,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub feature_type: RoiFeatureType,
    pub vector: Vec<f32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageClass {
    pub id: u32,
    pub name: String,
}

impl ImageClass {
    pub fn reference() -> Self {
        Self {
            id: 0,
            name: "Reference".to_string(),
        }
    }
}

/// Features extracted from one reference frame for one ROI.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoiImage {
    /// Top-left corner of the sight on the frame the features were cropped from.
    pub sight_position: Point2,
    pub image_class: ImageClass,
    pub features: Vec<Feature>,
}

/// Region of interest, in sight-relative pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Roi {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub image_filter_type: ImageFilterType,
    pub feature_type: RoiFeatureType,
    /// Filled during learning-data derivation, never read from settings.
    #[serde(skip)]
    pub images: Vec<RoiImage>,
}

impl Roi {
    pub fn rect(&self) -> PixelRect {
        PixelRect::new(
            self.x as i32,
            self.y as i32,
            self.width as i32,
            self.height as i32,
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Sight {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub roi: Vec<Roi>,
}

impl Sight {
    /// Placement of the sight on a `frame_w × frame_h` frame: always centred.
    pub fn placement(&self, frame_w: usize, frame_h: usize) -> PixelRect {
        PixelRect::centered(frame_w, frame_h, self.width, self.height)
    }
}
