//! Feature vectors extracted from ROI masks.
use crate::image::{ImageU8, ImageView};
use crate::pov::{Feature, RoiFeatureType};

impl RoiFeatureType {
    /// Extract this feature from a binary mask (any non-zero pixel counts as set).
    pub fn extract(self, mask: &ImageU8<'_>) -> Feature {
        let vector = match self {
            RoiFeatureType::FillRatio => fill_ratio(mask).into_iter().collect(),
            RoiFeatureType::Projections => projections(mask),
            RoiFeatureType::Pixels => mask
                .rows()
                .flat_map(|row| row.iter().map(|&px| if px > 0 { 1.0 } else { 0.0 }))
                .collect(),
        };
        Feature {
            feature_type: self,
            vector,
        }
    }
}

/// `None` for an empty mask.
fn fill_ratio(mask: &ImageU8<'_>) -> Option<f32> {
    let total = mask.w * mask.h;
    if total == 0 {
        return None;
    }
    let set: usize = mask
        .rows()
        .map(|row| row.iter().filter(|&&px| px > 0).count())
        .sum();
    Some(set as f32 / total as f32)
}

fn projections(mask: &ImageU8<'_>) -> Vec<f32> {
    let mut out = Vec::with_capacity(mask.w + mask.h);
    if mask.w == 0 || mask.h == 0 {
        return out;
    }
    let mut cols = vec![0u32; mask.w];
    for row in mask.rows() {
        let mut set = 0u32;
        for (x, &px) in row.iter().enumerate() {
            if px > 0 {
                set += 1;
                cols[x] += 1;
            }
        }
        out.push(set as f32 / mask.w as f32);
    }
    out.extend(cols.iter().map(|&c| c as f32 / mask.h as f32));
    out
}

/// Euclidean distance normalised by `sqrt(len)`, so that vectors of values in
/// [0, 1] always yield a distance in [0, 1]. Length mismatches and empty
/// vectors count as the maximum distance.
pub fn normalized_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 1.0;
    }
    let sq: f32 = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum();
    (sq / a.len() as f32).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::GrayImageU8;

    fn half_mask() -> GrayImageU8 {
        GrayImageU8::from_fn(4, 2, |x, _| if x < 2 { 255 } else { 0 })
    }

    #[test]
    fn fill_ratio_counts_set_pixels() {
        let mask = half_mask();
        let feature = RoiFeatureType::FillRatio.extract(&mask.as_view());
        assert_eq!(feature.vector, vec![0.5]);
        assert_eq!(feature.feature_type, RoiFeatureType::FillRatio);
    }

    #[test]
    fn projections_are_rows_then_columns() {
        let mask = half_mask();
        let feature = RoiFeatureType::Projections.extract(&mask.as_view());
        assert_eq!(feature.vector, vec![0.5, 0.5, 1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn pixels_flatten_row_major() {
        let mask = half_mask();
        let feature = RoiFeatureType::Pixels.extract(&mask.as_view());
        assert_eq!(feature.vector, vec![1.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn distance_is_bounded() {
        assert_eq!(normalized_distance(&[0.0, 1.0], &[0.0, 1.0]), 0.0);
        assert_eq!(normalized_distance(&[0.0, 0.0], &[1.0, 1.0]), 1.0);
        assert_eq!(normalized_distance(&[0.0], &[0.0, 1.0]), 1.0);
    }

    #[test]
    fn empty_vectors_never_match() {
        assert_eq!(normalized_distance(&[], &[]), 1.0);
        assert_eq!(normalized_distance(&[], &[0.5]), 1.0);

        let empty = GrayImageU8::zeros(0, 0);
        for feature_type in [
            RoiFeatureType::FillRatio,
            RoiFeatureType::Projections,
            RoiFeatureType::Pixels,
        ] {
            let feature = feature_type.extract(&empty.as_view());
            assert!(feature.vector.is_empty(), "{feature_type:?} on an empty mask");
        }
    }
}
