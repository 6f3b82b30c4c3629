//! Per-frame mode dispatch.
//!
//! The coordinator owns the learning data store, the alignment strategy chosen
//! at startup, the validation aggregator and the tolerance thresholds. No
//! state survives between requests except what the store caches.
use crate::alignment::Aligner;
use crate::error::{Error, Result};
use crate::image::{GrayImageU8, ImageView};
use crate::pov::PovId;
use crate::store::LearningDataStore;
use crate::tolerance::{Deviation, ToleranceThresholds};
use crate::validation::ValidationAggregator;
use log::{debug, info};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Prelearning,
    Learning,
    Recognition,
    /// Fallback for every value that is not one of the other three.
    Framing,
}

impl Mode {
    pub const PRELEARNING: i64 = 0;
    pub const LEARNING: i64 = 1;
    pub const RECOGNITION: i64 = 2;
    pub const FRAMING: i64 = 3;

    /// Map a wire value to a mode. Unrecognised values select framing.
    pub fn from_wire(value: i64) -> Self {
        match value {
            Self::PRELEARNING => Mode::Prelearning,
            Self::LEARNING => Mode::Learning,
            Self::RECOGNITION => Mode::Recognition,
            _ => Mode::Framing,
        }
    }

    pub fn wire_value(self) -> i64 {
        match self {
            Mode::Prelearning => Self::PRELEARNING,
            Mode::Learning => Self::LEARNING,
            Mode::Recognition => Self::RECOGNITION,
            Mode::Framing => Self::FRAMING,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RecognitionReport {
    #[serde(flatten)]
    pub deviation: Deviation,
    pub success: bool,
}

/// Mode-specific reply body. Serialises as `{"<mode>": {...}}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Reply {
    Prelearning { nb_kp: usize },
    Learning { id: PovId },
    Recognition(RecognitionReport),
    Framing { success: bool },
}

#[derive(Clone, Debug)]
pub struct Outcome {
    pub reply: Reply,
    /// Image sent back with the reply (framing only).
    pub image: Option<GrayImageU8>,
    /// Frame in reference geometry produced during recognition.
    pub transformed: Option<GrayImageU8>,
}

impl Outcome {
    fn reply(reply: Reply) -> Self {
        Self {
            reply,
            image: None,
            transformed: None,
        }
    }
}

pub struct ModeCoordinator {
    store: LearningDataStore,
    aligner: Box<dyn Aligner>,
    validator: ValidationAggregator,
    thresholds: ToleranceThresholds,
}

impl ModeCoordinator {
    pub fn new(
        store: LearningDataStore,
        aligner: Box<dyn Aligner>,
        validator: ValidationAggregator,
        thresholds: ToleranceThresholds,
    ) -> Self {
        Self {
            store,
            aligner,
            validator,
            thresholds,
        }
    }

    pub fn store(&self) -> &LearningDataStore {
        &self.store
    }

    /// Run the handler selected by `mode` on `frame`.
    ///
    /// Recognition needs `pov_id`; an unknown id surfaces as
    /// [`Error::NotFound`]. Framing only resolves the POV when the active
    /// aligner asks for it. An empty frame is rejected in every mode.
    pub fn handle(
        &mut self,
        mode: Mode,
        pov_id: Option<PovId>,
        frame: &GrayImageU8,
    ) -> Result<Outcome> {
        if frame.is_empty() {
            return Err(Error::InvalidImage(format!(
                "{mode:?} request carries an empty frame"
            )));
        }
        match mode {
            Mode::Prelearning => {
                info!("MODE prelearning");
                Ok(Outcome::reply(self.prelearning(frame)))
            }
            Mode::Learning => {
                info!("MODE learning");
                Ok(Outcome::reply(self.learning(frame)?))
            }
            Mode::Recognition => {
                debug!("MODE recognition");
                let id = pov_id.ok_or(Error::MissingPovId(mode))?;
                self.recognition(id, frame)
            }
            Mode::Framing => {
                info!("MODE framing");
                self.framing(pov_id, frame)
            }
        }
    }

    fn prelearning(&self, frame: &GrayImageU8) -> Reply {
        Reply::Prelearning {
            nb_kp: self.aligner.keypoint_count(frame),
        }
    }

    fn learning(&mut self, frame: &GrayImageU8) -> Result<Reply> {
        let id = self.store.learn(frame)?;
        info!("learned POV {id}");
        Ok(Reply::Learning { id })
    }

    fn recognition(&mut self, id: PovId, frame: &GrayImageU8) -> Result<Outcome> {
        let record = self.store.get(id, self.aligner.as_ref())?;
        let alignment = self.aligner.recognize(frame, &record);
        let ml_success = self.validator.validate(&record, &alignment.transformed);

        let deviation = if ml_success {
            Deviation::default()
        } else {
            self.thresholds
                .evaluate(alignment.scale, alignment.skew, alignment.translation)
        };
        let report = RecognitionReport {
            deviation,
            success: alignment.success && ml_success,
        };
        debug!(
            "POV {id}: alignment={} ml={} -> {:?}",
            alignment.success, ml_success, report
        );

        Ok(Outcome {
            reply: Reply::Recognition(report),
            image: None,
            transformed: Some(alignment.transformed),
        })
    }

    fn framing(&mut self, pov_id: Option<PovId>, frame: &GrayImageU8) -> Result<Outcome> {
        let store = &mut self.store;
        let aligner = self.aligner.as_ref();
        let mut resolve = || {
            let id = pov_id.ok_or(Error::MissingPovId(Mode::Framing))?;
            store.get(id, aligner)
        };
        let framing = aligner.frame(frame, &mut resolve)?;
        Ok(Outcome {
            reply: Reply::Framing {
                success: framing.success,
            },
            image: Some(framing.image),
            transformed: None,
        })
    }
}
