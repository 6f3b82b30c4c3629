//! ML payload: the sight template with reference features attached.
use super::sight::{ImageClass, RoiImage, Sight};
use crate::image::GrayImageU8;
use rayon::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MlData {
    pub sights: Vec<Sight>,
}

impl MlData {
    /// Derive reference features for every ROI of every sight.
    ///
    /// `template` is cloned; only the copy receives the extracted `RoiImage`s.
    /// Each sight is cropped centred on `reference`, filtered per ROI into a
    /// binary mask, and the ROI sub-rectangle of that mask is turned into the
    /// configured feature vector.
    pub fn derive(template: &[Sight], reference: &GrayImageU8) -> Self {
        let mut sights = template.to_vec();
        let frame = reference.as_view();
        let class = ImageClass::reference();

        for sight in &mut sights {
            let placement = sight.placement(frame.w, frame.h);
            let sight_image = frame.crop(placement);
            let anchor = placement.top_left();

            sight.roi.par_iter_mut().for_each(|roi| {
                let mask = roi.image_filter_type.apply(&sight_image);
                let roi_mask = mask.as_view().crop(roi.rect());
                let feature = roi.feature_type.extract(&roi_mask);
                roi.images.push(RoiImage {
                    sight_position: anchor,
                    image_class: class.clone(),
                    features: vec![feature],
                });
            });
        }

        Self { sights }
    }
}
