/// Score normalization (softmax) and categorical sampling.

use crate::core::uniform::UniformSource;
use crate::schema::emotion::{EmotionLabel, LabelMap, ProbabilityVector, ScoreVector};

/// Numerically stable softmax over a score vector.
///
/// The maximum score is subtracted before exponentiating. A zero sum is
/// replaced by 1 so the division is always defined.
pub fn normalize(scores: &ScoreVector) -> ProbabilityVector {
    let max = scores
        .values()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let exps: LabelMap<f64> = scores.map(|_, score| (score - max).exp());
    let mut sum: f64 = exps.values().sum();
    if sum == 0.0 || !sum.is_finite() {
        sum = 1.0;
    }
    ProbabilityVector::from_masses(exps.map(|_, e| e / sum))
}

/// Draw one label from `probs`.
///
/// Walks labels in sampling order subtracting each mass from a single draw
/// and returns the first label that brings it to zero or below. Labels with
/// no mass are never returned by the walk. If rounding leaves a positive
/// residual the last label (neutral) is returned.
pub fn sample(probs: &ProbabilityVector, rng: &mut impl UniformSource) -> EmotionLabel {
    let mut r = rng.next_uniform();
    for (label, p) in probs.iter() {
        if p <= 0.0 {
            continue;
        }
        r -= p;
        if r <= 0.0 {
            return label;
        }
    }
    EmotionLabel::ALL[EmotionLabel::COUNT - 1]
}
