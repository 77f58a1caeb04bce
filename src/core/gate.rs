/// Dispatch gate: decides whether a sampled label actually sends a sticker.

use crate::core::scorer::trimmed_len;
use crate::core::tuning::GateTuning;
use crate::core::uniform::UniformSource;
use crate::schema::emotion::EmotionLabel;

/// Multiplier applied for the trimmed character length of the message.
pub fn length_factor(len: usize, tuning: &GateTuning) -> f64 {
    if len < tuning.short_length_threshold {
        tuning.short_length_factor
    } else if len > tuning.long_length_threshold {
        tuning.long_length_factor
    } else {
        1.0
    }
}

/// Multiplier derived from the sampled label's own probability mass.
pub fn intensity_factor(intensity: f64, tuning: &GateTuning) -> f64 {
    tuning.intensity_floor
        + (intensity - tuning.intensity_pivot)
            .max(0.0)
            .min(tuning.intensity_cap)
}

/// Probability of sending a sticker for `label`, in `[0, max_chance]`.
pub fn send_chance(label: EmotionLabel, intensity: f64, text: &str, tuning: &GateTuning) -> f64 {
    let base = tuning.base_chance_for(label);
    let chance = base
        * length_factor(trimmed_len(text), tuning)
        * intensity_factor(intensity, tuning);
    if chance.is_nan() {
        return 0.0;
    }
    chance.min(tuning.max_chance).max(0.0)
}

/// A draw passes the gate when it does not exceed the chance.
pub fn passes(draw: f64, chance: f64) -> bool {
    draw <= chance
}

/// Draw once and dispatch iff the draw does not exceed the send chance.
pub fn should_dispatch(
    label: EmotionLabel,
    intensity: f64,
    text: &str,
    tuning: &GateTuning,
    rng: &mut impl UniformSource,
) -> bool {
    let chance = send_chance(label, intensity, text, tuning);
    passes(rng.next_uniform(), chance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::uniform::ScriptedUniform;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn length_factor_bands() {
        let tuning = GateTuning::default();
        assert_eq!(length_factor(0, &tuning), 0.5);
        assert_eq!(length_factor(7, &tuning), 0.5);
        assert_eq!(length_factor(8, &tuning), 1.0);
        assert_eq!(length_factor(80, &tuning), 1.0);
        assert_eq!(length_factor(81, &tuning), 1.1);
    }

    #[test]
    fn intensity_factor_clamps() {
        let tuning = GateTuning::default();
        assert!(approx(intensity_factor(0.0, &tuning), 0.75));
        assert!(approx(intensity_factor(0.2, &tuning), 0.75));
        assert!(approx(intensity_factor(0.4, &tuning), 0.95));
        assert!(approx(intensity_factor(0.9, &tuning), 1.10));
    }

    #[test]
    fn send_chance_combines_factors() {
        let tuning = GateTuning::default();
        // 10 chars: length factor 1.0; intensity 0.5 -> 0.75 + 0.3
        let chance = send_chance(EmotionLabel::Praise, 0.5, "0123456789", &tuning);
        assert!(approx(chance, 0.40 * 1.0 * 1.05));

        // short message halves the chance
        let chance = send_chance(EmotionLabel::Neutral, 0.2, "ok", &tuning);
        assert!(approx(chance, 0.14 * 0.5 * 0.75));
    }

    #[test]
    fn send_chance_uses_trimmed_char_length() {
        let tuning = GateTuning::default();
        // eight CJK chars: 24 bytes, but only 8 characters once trimmed
        let padded = "   你真的太棒了啊啊   ";
        let chance = send_chance(EmotionLabel::Praise, 0.2, padded, &tuning);
        assert!(approx(chance, 0.40 * 1.0 * 0.75));
        let chance = send_chance(EmotionLabel::Praise, 0.2, " 太棒了 ", &tuning);
        assert!(approx(chance, 0.40 * 0.5 * 0.75));
    }

    #[test]
    fn send_chance_capped() {
        let mut tuning = GateTuning::default();
        tuning.base_chance.insert(EmotionLabel::Flirt, 5.0);
        let chance = send_chance(EmotionLabel::Flirt, 1.0, &"x".repeat(100), &tuning);
        assert_eq!(chance, 0.85);
    }

    #[test]
    fn missing_label_uses_default_base() {
        let mut tuning = GateTuning::default();
        tuning.base_chance.clear();
        let chance = send_chance(EmotionLabel::Sad, 0.2, "0123456789", &tuning);
        assert!(approx(chance, 0.20 * 0.75));
    }

    #[test]
    fn zero_draw_always_dispatches() {
        let tuning = GateTuning::default();
        let mut rng = ScriptedUniform::constant(0.0);
        for label in EmotionLabel::ALL {
            assert!(should_dispatch(label, 0.0, "", &tuning, &mut rng));
        }
    }

    #[test]
    fn high_draw_rejects_below_chance() {
        let tuning = GateTuning::default();
        let mut rng = ScriptedUniform::constant(0.999999);
        for label in EmotionLabel::ALL {
            assert!(!should_dispatch(label, 1.0, &"x".repeat(100), &tuning, &mut rng));
        }
    }

    #[test]
    fn draw_equal_to_chance_dispatches() {
        let tuning = GateTuning::default();
        let chance = send_chance(EmotionLabel::Praise, 0.5, "0123456789", &tuning);
        let mut rng = ScriptedUniform::constant(chance);
        assert!(should_dispatch(EmotionLabel::Praise, 0.5, "0123456789", &tuning, &mut rng));
    }
}
