use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;
use thiserror::Error;

/// The coarse emotional tone inferred from a chat message.
///
/// Declaration order is the sampling order. `EmotionLabel::ALL` lists the
/// variants in that order and every dense table in the crate is indexed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionLabel {
    Praise,
    Sad,
    Angry,
    Fear,
    Flirt,
    Sleepy,
    Funny,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown emotion label: {0}")]
pub struct UnknownLabel(pub String);

impl EmotionLabel {
    pub const COUNT: usize = 8;

    /// Every label, in sampling order. Neutral is last, so it is also the
    /// sampler's fallback.
    pub const ALL: [EmotionLabel; 8] = [
        Self::Praise,
        Self::Sad,
        Self::Angry,
        Self::Fear,
        Self::Flirt,
        Self::Sleepy,
        Self::Funny,
        Self::Neutral,
    ];

    /// Labels that can carry lexicon cues (everything except neutral).
    pub const CUED: [EmotionLabel; 7] = [
        Self::Praise,
        Self::Sad,
        Self::Angry,
        Self::Fear,
        Self::Flirt,
        Self::Sleepy,
        Self::Funny,
    ];

    /// Position in `EmotionLabel::ALL`.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn is_neutral(self) -> bool {
        self == Self::Neutral
    }

    /// Lower-case identifier, as used in RON tables and across the WASM boundary.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Praise => "praise",
            Self::Sad => "sad",
            Self::Angry => "angry",
            Self::Fear => "fear",
            Self::Flirt => "flirt",
            Self::Sleepy => "sleepy",
            Self::Funny => "funny",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for EmotionLabel {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|label| label.name() == lowered)
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

/// A dense table with exactly one value per [`EmotionLabel`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LabelMap<T>([T; EmotionLabel::COUNT]);

impl<T> LabelMap<T> {
    /// Build a table by evaluating `f` once per label, in sampling order.
    pub fn from_fn(mut f: impl FnMut(EmotionLabel) -> T) -> Self {
        Self(std::array::from_fn(|i| f(EmotionLabel::ALL[i])))
    }

    pub fn get(&self, label: EmotionLabel) -> &T {
        &self.0[label.index()]
    }

    pub fn get_mut(&mut self, label: EmotionLabel) -> &mut T {
        &mut self.0[label.index()]
    }

    /// Entries in sampling order.
    pub fn iter(&self) -> impl Iterator<Item = (EmotionLabel, &T)> + '_ {
        EmotionLabel::ALL.into_iter().zip(self.0.iter())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.0.iter()
    }

    pub fn map<U>(&self, mut f: impl FnMut(EmotionLabel, &T) -> U) -> LabelMap<U> {
        LabelMap::from_fn(|label| f(label, self.get(label)))
    }
}

impl<T: Clone> LabelMap<T> {
    pub fn filled(value: T) -> Self {
        Self::from_fn(|_| value.clone())
    }
}

impl<T> Index<EmotionLabel> for LabelMap<T> {
    type Output = T;

    fn index(&self, label: EmotionLabel) -> &T {
        self.get(label)
    }
}

impl<T> IndexMut<EmotionLabel> for LabelMap<T> {
    fn index_mut(&mut self, label: EmotionLabel) -> &mut T {
        self.get_mut(label)
    }
}

impl<T: Serialize> Serialize for LabelMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(EmotionLabel::COUNT))?;
        for (label, value) in self.iter() {
            map.serialize_entry(label.name(), value)?;
        }
        map.end()
    }
}

/// Raw, unnormalized per-label scores produced by the scorer.
pub type ScoreVector = LabelMap<f64>;

/// A categorical distribution over labels.
///
/// Values produced by the normalizer are non-negative and sum to 1 within
/// floating-point tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProbabilityVector(LabelMap<f64>);

impl ProbabilityVector {
    /// Wrap masses without renormalizing them. The caller is responsible for
    /// the distribution being valid; the sampler copes if it is not.
    pub fn from_masses(masses: LabelMap<f64>) -> Self {
        Self(masses)
    }

    /// Probability mass of a single label (its "intensity" once sampled).
    pub fn mass(&self, label: EmotionLabel) -> f64 {
        self.0[label]
    }

    pub fn iter(&self) -> impl Iterator<Item = (EmotionLabel, f64)> + '_ {
        self.0.iter().map(|(label, p)| (label, *p))
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// The most probable label. Ties resolve to the earliest label in
    /// sampling order.
    pub fn most_likely(&self) -> EmotionLabel {
        let mut best = EmotionLabel::ALL[0];
        for (label, p) in self.iter() {
            if p > self.mass(best) {
                best = label;
            }
        }
        best
    }
}
