//! Learning data store: two cache tiers in front of the persistent repository.
//!
//! Lookup order for [`LearningDataStore::get`]:
//! 1. the most-recently-used slot, when its id matches;
//! 2. the in-process list of POVs learned by this process;
//! 3. the repository. A record fetched from the repository only lands in
//!    the MRU slot, never in the list.
//!
//! Both tiers hold `Rc<PovRecord>`, so a hit in either tier returns the same
//! allocation every time. If the store ever becomes shared between threads,
//! the MRU slot and the list must sit behind one lock since they are updated
//! together.
use crate::alignment::Aligner;
use crate::error::{Error, Result};
use crate::image::GrayImageU8;
use crate::pov::{MlData, PovId, PovRecord, Sight};
use crate::repository::Repository;
use log::{debug, warn};
use std::rc::Rc;

pub struct LearningDataStore {
    repository: Box<dyn Repository>,
    template: Vec<Sight>,
    recent: Option<Rc<PovRecord>>,
    learned: Vec<Rc<PovRecord>>,
}

impl LearningDataStore {
    /// `template` is the configured sight/ROI layout; it is copied for every
    /// POV and never modified itself.
    pub fn new(repository: Box<dyn Repository>, template: Vec<Sight>) -> Self {
        Self {
            repository,
            template,
            recent: None,
            learned: Vec::new(),
        }
    }

    /// Register `frame` as a new POV and keep it in the in-process list.
    pub fn learn(&mut self, frame: &GrayImageU8) -> Result<PovId> {
        let id = self.repository.save_new_pov(frame)?;
        match self.repository.get_pov_by_id(id)? {
            Some(record) => self.learned.push(Rc::new(record)),
            None => warn!("POV {id} was saved but cannot be read back"),
        }
        Ok(id)
    }

    /// Resolve `id` through the cache tiers and make sure its derived
    /// payloads exist. Derivation runs at most once per record.
    pub fn get(&mut self, id: PovId, aligner: &dyn Aligner) -> Result<Rc<PovRecord>> {
        let record = self.resolve(id)?;
        self.recent = Some(Rc::clone(&record));

        if record.engine_data().is_none() {
            debug!("POV {id}: deriving {:?} engine data", aligner.kind());
        }
        record.engine_data_or_init(|| aligner.learn(&record));

        if record.ml_data().is_none() {
            debug!("POV {id}: deriving ML data for {} sights", self.template.len());
        }
        record.ml_data_or_init(|| MlData::derive(&self.template, &record.images().work));

        Ok(record)
    }

    fn resolve(&self, id: PovId) -> Result<Rc<PovRecord>> {
        if let Some(recent) = self.recent.as_ref().filter(|r| r.id() == id) {
            return Ok(Rc::clone(recent));
        }
        if let Some(learned) = self.learned.iter().find(|r| r.id() == id) {
            return Ok(Rc::clone(learned));
        }
        debug!("POV {id}: not cached, asking the repository");
        self.repository
            .get_pov_by_id(id)?
            .map(Rc::new)
            .ok_or(Error::NotFound(id))
    }

    /// Record held by the most-recently-used slot, without touching any tier.
    pub fn peek_recent(&self) -> Option<&Rc<PovRecord>> {
        self.recent.as_ref()
    }

    /// Id held by the most-recently-used slot.
    pub fn recent_id(&self) -> Option<PovId> {
        self.recent.as_ref().map(|r| r.id())
    }

    /// Ids of the POVs learned by this process, in learning order.
    pub fn learned_ids(&self) -> Vec<PovId> {
        self.learned.iter().map(|r| r.id()).collect()
    }
}
