//! Tunable heuristic constants for the scorer and the dispatch gate.
//!
//! Every number the pipeline uses lives here. `Tuning::default()` is the
//! shipped behaviour; a RON file may override any subset of fields.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::schema::emotion::EmotionLabel;

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

pub const CUED_BASELINE: f64 = 0.2;
pub const NEUTRAL_BASELINE: f64 = 0.8;
pub const CUE_WEIGHT: f64 = 1.2;
pub const EXCLAMATION_PRAISE_WEIGHT: f64 = 0.08;
pub const EXCLAMATION_ANGRY_WEIGHT: f64 = 0.06;
pub const QUESTION_FEAR_WEIGHT: f64 = 0.04;
pub const SHORT_TEXT_SPAN: f64 = 80.0;
pub const SHORT_TEXT_NEUTRAL_WEIGHT: f64 = 0.3;
pub const LONG_TEXT_SPAN: f64 = 120.0;
pub const LONG_TEXT_NEUTRAL_WEIGHT: f64 = 0.2;

pub const DEFAULT_BASE_CHANCE: f64 = 0.2;
pub const SHORT_LENGTH_THRESHOLD: usize = 8;
pub const SHORT_LENGTH_FACTOR: f64 = 0.5;
pub const LONG_LENGTH_THRESHOLD: usize = 80;
pub const LONG_LENGTH_FACTOR: f64 = 1.1;
pub const INTENSITY_FLOOR: f64 = 0.75;
pub const INTENSITY_PIVOT: f64 = 0.2;
pub const INTENSITY_CAP: f64 = 0.35;
pub const MAX_CHANCE: f64 = 0.85;

/// Base send chance per label before length and intensity scaling.
pub const BASE_CHANCES: &[(EmotionLabel, f64)] = &[
    (EmotionLabel::Praise, 0.40),
    (EmotionLabel::Funny, 0.40),
    (EmotionLabel::Flirt, 0.42),
    (EmotionLabel::Sad, 0.28),
    (EmotionLabel::Fear, 0.26),
    (EmotionLabel::Angry, 0.18),
    (EmotionLabel::Sleepy, 0.28),
    (EmotionLabel::Neutral, 0.14),
];

/// Complete tuning table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub scorer: ScorerTuning,
    pub gate: GateTuning,
}

/// Weights for the emotion scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerTuning {
    /// Prior for every non-neutral label.
    pub cued_baseline: f64,
    pub neutral_baseline: f64,
    /// Added per distinct cue hit.
    pub cue_weight: f64,
    /// Added to praise per `!`/`！`.
    pub exclamation_praise: f64,
    /// Added to angry per `!`/`！`.
    pub exclamation_angry: f64,
    /// Added to fear per `?`/`？`.
    pub question_fear: f64,
    /// Neutral gains `max(0, 1 - len/short_text_span) * short_text_weight`.
    pub short_text_span: f64,
    pub short_text_weight: f64,
    /// Neutral gains `min(1, len/long_text_span) * long_text_weight`.
    pub long_text_span: f64,
    pub long_text_weight: f64,
}

impl Default for ScorerTuning {
    fn default() -> Self {
        Self {
            cued_baseline: CUED_BASELINE,
            neutral_baseline: NEUTRAL_BASELINE,
            cue_weight: CUE_WEIGHT,
            exclamation_praise: EXCLAMATION_PRAISE_WEIGHT,
            exclamation_angry: EXCLAMATION_ANGRY_WEIGHT,
            question_fear: QUESTION_FEAR_WEIGHT,
            short_text_span: SHORT_TEXT_SPAN,
            short_text_weight: SHORT_TEXT_NEUTRAL_WEIGHT,
            long_text_span: LONG_TEXT_SPAN,
            long_text_weight: LONG_TEXT_NEUTRAL_WEIGHT,
        }
    }
}

/// Parameters of the dispatch gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateTuning {
    pub base_chance: FxHashMap<EmotionLabel, f64>,
    /// Used for labels missing from `base_chance`.
    pub default_base_chance: f64,
    /// Messages strictly shorter than this get `short_length_factor`.
    pub short_length_threshold: usize,
    pub short_length_factor: f64,
    /// Messages strictly longer than this get `long_length_factor`.
    pub long_length_threshold: usize,
    pub long_length_factor: f64,
    /// Intensity factor is `floor + clamp(intensity - pivot, 0, cap)`.
    pub intensity_floor: f64,
    pub intensity_pivot: f64,
    pub intensity_cap: f64,
    /// Upper bound on the final chance.
    pub max_chance: f64,
}

impl Default for GateTuning {
    fn default() -> Self {
        Self {
            base_chance: BASE_CHANCES.iter().copied().collect(),
            default_base_chance: DEFAULT_BASE_CHANCE,
            short_length_threshold: SHORT_LENGTH_THRESHOLD,
            short_length_factor: SHORT_LENGTH_FACTOR,
            long_length_threshold: LONG_LENGTH_THRESHOLD,
            long_length_factor: LONG_LENGTH_FACTOR,
            intensity_floor: INTENSITY_FLOOR,
            intensity_pivot: INTENSITY_PIVOT,
            intensity_cap: INTENSITY_CAP,
            max_chance: MAX_CHANCE,
        }
    }
}

impl GateTuning {
    pub fn base_chance_for(&self, label: EmotionLabel) -> f64 {
        self.base_chance
            .get(&label)
            .copied()
            .unwrap_or(self.default_base_chance)
    }
}

impl Tuning {
    /// Load tuning from a RON file and validate it.
    pub fn load_from_ron(path: &Path) -> Result<Tuning, TuningError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse tuning from a RON string and validate it. Missing fields keep
    /// their defaults.
    pub fn parse_ron(input: &str) -> Result<Tuning, TuningError> {
        let tuning: Tuning = ron::from_str(input)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would break the scorer's non-negativity or the
    /// gate's probability range.
    pub fn validate(&self) -> Result<(), TuningError> {
        let s = &self.scorer;
        let weights = [
            ("scorer.cued_baseline", s.cued_baseline),
            ("scorer.neutral_baseline", s.neutral_baseline),
            ("scorer.cue_weight", s.cue_weight),
            ("scorer.exclamation_praise", s.exclamation_praise),
            ("scorer.exclamation_angry", s.exclamation_angry),
            ("scorer.question_fear", s.question_fear),
            ("scorer.short_text_weight", s.short_text_weight),
            ("scorer.long_text_weight", s.long_text_weight),
            ("gate.default_base_chance", self.gate.default_base_chance),
            ("gate.short_length_factor", self.gate.short_length_factor),
            ("gate.long_length_factor", self.gate.long_length_factor),
            ("gate.intensity_floor", self.gate.intensity_floor),
            ("gate.intensity_cap", self.gate.intensity_cap),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(TuningError::Invalid(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        for (name, span) in [
            ("scorer.short_text_span", s.short_text_span),
            ("scorer.long_text_span", s.long_text_span),
        ] {
            if !span.is_finite() || span <= 0.0 {
                return Err(TuningError::Invalid(format!(
                    "{} must be positive, got {}",
                    name, span
                )));
            }
        }

        if !self.gate.intensity_pivot.is_finite() {
            return Err(TuningError::Invalid(
                "gate.intensity_pivot must be finite".to_string(),
            ));
        }

        for (label, chance) in &self.gate.base_chance {
            if !chance.is_finite() || *chance < 0.0 {
                return Err(TuningError::Invalid(format!(
                    "gate.base_chance[{}] must be a non-negative number, got {}",
                    label, chance
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.gate.max_chance) {
            return Err(TuningError::Invalid(format!(
                "gate.max_chance must be within [0, 1], got {}",
                self.gate.max_chance
            )));
        }

        Ok(())
    }
}
