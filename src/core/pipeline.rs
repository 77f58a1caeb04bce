/// The main dispatch pipeline: Text → Sticker orchestration.
///
/// Wires together scoring, normalization, sampling, the dispatch gate and
/// asset resolution.

use serde::Serialize;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::distribution::{normalize, sample};
use crate::core::gate;
use crate::core::lexicon::{CueLexicon, LexiconError};
use crate::core::resolver::resolve;
use crate::core::scorer;
use crate::core::tuning::{Tuning, TuningError};
use crate::core::uniform::UniformSource;
use crate::schema::asset::{AssetPool, AssetPoolError, StickerAttachment};
use crate::schema::emotion::{EmotionLabel, ProbabilityVector, ScoreVector};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("lexicon error: {0}")]
    Lexicon(#[from] LexiconError),
    #[error("asset pool error: {0}")]
    AssetPool(#[from] AssetPoolError),
    #[error("tuning error: {0}")]
    Tuning(#[from] TuningError),
}

/// Every intermediate value computed for one message.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchTrace<'a> {
    pub scores: ScoreVector,
    pub probabilities: ProbabilityVector,
    pub label: EmotionLabel,
    /// Probability mass of the sampled label.
    pub intensity: f64,
    pub chance: f64,
    pub gate_draw: f64,
    pub dispatched: bool,
    pub asset: Option<&'a str>,
}

/// The sticker dispatch engine. Built via `StickerEngine::builder()`.
///
/// Holds only read-only tables, so one engine can serve every thread; all
/// randomness comes from the source passed to each call.
#[derive(Debug, Clone, Default)]
pub struct StickerEngine {
    lexicon: CueLexicon,
    tuning: Tuning,
    pool: AssetPool,
}

/// Builder for constructing a `StickerEngine`.
pub struct StickerEngineBuilder {
    lexicon_path: Option<String>,
    pool_path: Option<String>,
    tuning_path: Option<String>,
    /// Directly provided lexicon (for testing without files).
    lexicon: Option<CueLexicon>,
    /// Directly provided pool (for testing without files).
    pool: Option<AssetPool>,
    /// Directly provided tuning (for testing without files).
    tuning: Option<Tuning>,
}

impl StickerEngine {
    pub fn builder() -> StickerEngineBuilder {
        StickerEngineBuilder {
            lexicon_path: None,
            pool_path: None,
            tuning_path: None,
            lexicon: None,
            pool: None,
            tuning: None,
        }
    }

    pub fn lexicon(&self) -> &CueLexicon {
        &self.lexicon
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn pool(&self) -> &AssetPool {
        &self.pool
    }

    /// Raw per-label scores for `text`.
    pub fn scores(&self, text: &str) -> ScoreVector {
        scorer::score(text, &self.lexicon, &self.tuning.scorer)
    }

    /// Emotion distribution for `text`.
    pub fn probabilities(&self, text: &str) -> ProbabilityVector {
        normalize(&self.scores(text))
    }

    /// Run the full pipeline and keep every intermediate value.
    ///
    /// Draw order from `rng`: label sample, gate, asset pick. The asset draw
    /// is only taken when the gate passes and the group is non-empty.
    pub fn trace(&self, text: &str, rng: &mut impl UniformSource) -> DispatchTrace<'_> {
        let scores = self.scores(text);
        let probabilities = normalize(&scores);
        let label = sample(&probabilities, rng);
        let intensity = probabilities.mass(label);

        let chance = gate::send_chance(label, intensity, text, &self.tuning.gate);
        let gate_draw = rng.next_uniform();
        let dispatched = gate::passes(gate_draw, chance);

        let asset = if dispatched {
            resolve(label, &self.pool, rng)
        } else {
            None
        };

        debug!(
            label = %label,
            intensity,
            chance,
            gate_draw,
            dispatched,
            asset = asset.unwrap_or("-"),
            "sticker dispatch"
        );

        DispatchTrace {
            scores,
            probabilities,
            label,
            intensity,
            chance,
            gate_draw,
            dispatched,
            asset,
        }
    }

    /// Pick a sticker for an outgoing message, or `None` to send nothing.
    pub fn pick_sticker(&self, text: &str, rng: &mut impl UniformSource) -> Option<&str> {
        self.trace(text, rng).asset
    }

    /// `pick_sticker` with the thread-local generator.
    pub fn pick_sticker_random(&self, text: &str) -> Option<&str> {
        self.pick_sticker(text, &mut rand::thread_rng())
    }

    /// Build the attachment for a role's message.
    ///
    /// Roles that have not opted into stickers never get one, and no draw is
    /// taken from `rng` for them.
    pub fn attachment_for(
        &self,
        text: &str,
        allow_stickers: bool,
        rng: &mut impl UniformSource,
    ) -> Option<StickerAttachment> {
        if !allow_stickers {
            return None;
        }
        self.pick_sticker(text, rng)
            .map(|key| StickerAttachment::new(key, &self.pool))
    }
}

/// Pick a sticker using the built-in lexicon and default tuning.
pub fn pick_sticker_for_text<'a>(
    text: &str,
    pool: &'a AssetPool,
    rng: &mut impl UniformSource,
) -> Option<&'a str> {
    static LEXICON: OnceLock<CueLexicon> = OnceLock::new();
    static TUNING: OnceLock<Tuning> = OnceLock::new();
    let lexicon = LEXICON.get_or_init(CueLexicon::default);
    let tuning = TUNING.get_or_init(Tuning::default);

    let probabilities = normalize(&scorer::score(text, lexicon, &tuning.scorer));
    let label = sample(&probabilities, rng);
    let intensity = probabilities.mass(label);
    if !gate::should_dispatch(label, intensity, text, &tuning.gate, rng) {
        return None;
    }
    resolve(label, pool, rng)
}

impl StickerEngineBuilder {
    /// Lexicon RON file merged over the base lexicon (built-in unless
    /// `with_lexicon` was given).
    pub fn lexicon_path(mut self, path: &str) -> Self {
        self.lexicon_path = Some(path.to_string());
        self
    }

    /// Pool RON file, or a directory whose `.ron` files are merged in
    /// file-name order.
    pub fn pool_path(mut self, path: &str) -> Self {
        self.pool_path = Some(path.to_string());
        self
    }

    /// Tuning RON file. Replaces any tuning given with `with_tuning`.
    pub fn tuning_path(mut self, path: &str) -> Self {
        self.tuning_path = Some(path.to_string());
        self
    }

    /// Provide a lexicon directly (for testing without files).
    pub fn with_lexicon(mut self, lexicon: CueLexicon) -> Self {
        self.lexicon = Some(lexicon);
        self
    }

    /// Provide a pool directly (for testing without files).
    pub fn with_pool(mut self, pool: AssetPool) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Provide tuning directly (for testing without files).
    pub fn with_tuning(mut self, tuning: Tuning) -> Self {
        self.tuning = Some(tuning);
        self
    }

    pub fn build(self) -> Result<StickerEngine, EngineError> {
        let mut lexicon = self.lexicon.unwrap_or_default();
        let mut pool = self.pool.unwrap_or_default();
        let mut tuning = self.tuning.unwrap_or_default();

        if let Some(ref path) = self.lexicon_path {
            let loaded = CueLexicon::load_from_ron(Path::new(path))?;
            lexicon.merge(loaded);
            info!(path = %path, "loaded cue lexicon");
        }

        if let Some(ref path) = self.pool_path {
            pool.merge(AssetPool::load_from_path(Path::new(path))?);
            info!(path = %path, assets = pool.total_assets(), "loaded asset pool");
        }

        if let Some(ref path) = self.tuning_path {
            tuning = Tuning::load_from_ron(Path::new(path))?;
            info!(path = %path, "loaded tuning");
        } else {
            tuning.validate()?;
        }

        let empty = pool.empty_labels();
        if empty.len() == EmotionLabel::COUNT {
            warn!("asset pool is empty; no stickers will be dispatched");
        } else if !empty.is_empty() {
            let names: Vec<&str> = empty.iter().map(|label| label.name()).collect();
            warn!(labels = ?names, "asset pool has labels without stickers");
        }

        for (cue, labels) in lexicon.shared_cues() {
            debug!(cue = %cue, labels = ?labels, "cue shared across labels");
        }

        Ok(StickerEngine {
            lexicon,
            tuning,
            pool,
        })
    }
}
