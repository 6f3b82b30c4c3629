//! Categorical deviation labels for operator guidance.
//!
//! Each axis is labelled independently. All comparisons are strict, so a value
//! exactly on a threshold is still `OK`.
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToleranceThresholds {
    pub min_scale: f32,
    pub max_scale: f32,
    pub max_skew: f32,
    pub min_trans: f32,
    pub max_trans: f32,
}

impl Default for ToleranceThresholds {
    fn default() -> Self {
        Self {
            min_scale: 0.8,
            max_scale: 1.2,
            max_skew: 0.15,
            min_trans: -25.0,
            max_trans: 25.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum ScaleLabel {
    #[default]
    #[serde(rename = "OK")]
    Ok,
    /// Camera too far: the scene looks smaller than the reference.
    #[serde(rename = "far")]
    Far,
    #[serde(rename = "close")]
    Close,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum AxisLabel {
    #[default]
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "minus")]
    Minus,
    #[serde(rename = "plus")]
    Plus,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TranslationLabels {
    pub x: AxisLabel,
    pub y: AxisLabel,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Deviation {
    pub scale: ScaleLabel,
    pub skew: AxisLabel,
    pub translation: TranslationLabels,
}

impl ToleranceThresholds {
    /// Label a measured misalignment.
    ///
    /// `skew` and `translation` are `None` for engines that do not measure
    /// them; those axes stay `OK`.
    pub fn evaluate(
        &self,
        scale: f32,
        skew: Option<f32>,
        translation: Option<[f32; 2]>,
    ) -> Deviation {
        let scale = if scale < self.min_scale {
            ScaleLabel::Far
        } else if scale > self.max_scale {
            ScaleLabel::Close
        } else {
            ScaleLabel::Ok
        };
        let skew = skew
            .map(|s| axis(s, -self.max_skew, self.max_skew))
            .unwrap_or_default();
        let translation = translation
            .map(|[x, y]| TranslationLabels {
                x: axis(x, self.min_trans, self.max_trans),
                y: axis(y, self.min_trans, self.max_trans),
            })
            .unwrap_or_default();
        Deviation {
            scale,
            skew,
            translation,
        }
    }
}

fn axis(value: f32, min: f32, max: f32) -> AxisLabel {
    if value < min {
        AxisLabel::Minus
    } else if value > max {
        AxisLabel::Plus
    } else {
        AxisLabel::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn scale_label(scale: f32) -> ScaleLabel {
        ToleranceThresholds::default().evaluate(scale, None, None).scale
    }

    #[test]
    fn scale_bounds_are_inclusive() {
        let t = ToleranceThresholds::default();
        assert_eq!(scale_label(t.min_scale), ScaleLabel::Ok);
        assert_eq!(scale_label(t.min_scale - EPS), ScaleLabel::Far);
        assert_eq!(scale_label(t.max_scale), ScaleLabel::Ok);
        assert_eq!(scale_label(t.max_scale + EPS), ScaleLabel::Close);
    }

    #[test]
    fn skew_and_translation_are_labelled_when_measured() {
        let t = ToleranceThresholds::default();
        let d = t.evaluate(1.0, Some(-0.2), Some([30.0, -30.0]));
        assert_eq!(d.skew, AxisLabel::Minus);
        assert_eq!(d.translation.x, AxisLabel::Plus);
        assert_eq!(d.translation.y, AxisLabel::Minus);

        let d = t.evaluate(1.0, Some(t.max_skew), Some([t.min_trans, t.max_trans]));
        assert_eq!(d, Deviation::default());
    }

    #[test]
    fn unmeasured_axes_stay_ok() {
        let d = ToleranceThresholds::default().evaluate(1.5, None, None);
        assert_eq!(d.scale, ScaleLabel::Close);
        assert_eq!(d.skew, AxisLabel::Ok);
        assert_eq!(d.translation, TranslationLabels::default());
    }

    #[test]
    fn labels_serialize_to_wire_strings() {
        let d = ToleranceThresholds::default().evaluate(0.1, Some(1.0), Some([0.0, 99.0]));
        let json = serde_json::to_value(d).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "scale": "far",
                "skew": "plus",
                "translation": {"x": "OK", "y": "plus"}
            })
        );
    }
}
