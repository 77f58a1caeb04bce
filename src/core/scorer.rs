/// Emotion scorer: raw per-label scores from cues, punctuation and length.

use crate::core::lexicon::CueLexicon;
use crate::core::tuning::ScorerTuning;
use crate::schema::emotion::{EmotionLabel, LabelMap, ScoreVector};

const EXCLAMATION_MARKS: &[char] = &['!', '！'];
const QUESTION_MARKS: &[char] = &['?', '？'];

/// Surface features of a message that the scorer and the gate read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextFeatures {
    /// Character count of the trimmed text.
    pub length: usize,
    pub exclamations: usize,
    pub questions: usize,
}

impl TextFeatures {
    pub fn of(text: &str) -> Self {
        let trimmed = text.trim();
        let mut features = TextFeatures::default();
        for c in trimmed.chars() {
            features.length += 1;
            if EXCLAMATION_MARKS.contains(&c) {
                features.exclamations += 1;
            } else if QUESTION_MARKS.contains(&c) {
                features.questions += 1;
            }
        }
        features
    }
}

/// Character length of the trimmed text.
pub fn trimmed_len(text: &str) -> usize {
    text.trim().chars().count()
}

/// Score `text` against every label.
///
/// Every label starts at its prior, so the result is dense and strictly
/// positive for any non-negative tuning.
pub fn score(text: &str, lexicon: &CueLexicon, tuning: &ScorerTuning) -> ScoreVector {
    let trimmed = text.trim();
    let lowered = trimmed.to_lowercase();
    let features = TextFeatures::of(trimmed);

    let mut scores: ScoreVector = LabelMap::from_fn(|label| {
        if label.is_neutral() {
            tuning.neutral_baseline
        } else {
            tuning.cued_baseline
        }
    });

    for label in EmotionLabel::CUED {
        scores[label] += lexicon.hits(label, &lowered) as f64 * tuning.cue_weight;
    }

    // Punctuation hints
    scores[EmotionLabel::Praise] += features.exclamations as f64 * tuning.exclamation_praise;
    scores[EmotionLabel::Angry] += features.exclamations as f64 * tuning.exclamation_angry;
    scores[EmotionLabel::Fear] += features.questions as f64 * tuning.question_fear;

    // Short and long messages both lean neutral
    let len = features.length as f64;
    scores[EmotionLabel::Neutral] +=
        (1.0 - len / tuning.short_text_span).max(0.0) * tuning.short_text_weight;
    scores[EmotionLabel::Neutral] +=
        (len / tuning.long_text_span).min(1.0) * tuning.long_text_weight;

    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_score(text: &str) -> ScoreVector {
        score(text, &CueLexicon::default(), &ScorerTuning::default())
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn features_count_both_widths() {
        let f = TextFeatures::of("  真的吗？？ really?! wow！ ");
        assert_eq!(f.exclamations, 2);
        assert_eq!(f.questions, 3);
        assert_eq!(f.length, "真的吗？？ really?! wow！".chars().count());
    }

    #[test]
    fn trimmed_len_counts_chars_not_bytes() {
        assert_eq!(trimmed_len("  你好  "), 2);
        assert_eq!(trimmed_len(""), 0);
    }

    #[test]
    fn empty_text_is_priors_plus_short_bias() {
        let scores = default_score("");
        for label in EmotionLabel::CUED {
            assert!(approx(scores[label], 0.2), "{} = {}", label, scores[label]);
        }
        // 0.8 prior + full short-text bias, no long-text bias
        assert!(approx(scores[EmotionLabel::Neutral], 1.1));
    }

    #[test]
    fn short_ack_leans_neutral() {
        let scores = default_score("ok");
        let expected = 0.8 + (1.0 - 2.0 / 80.0) * 0.3 + (2.0 / 120.0) * 0.2;
        assert!(approx(scores[EmotionLabel::Neutral], expected));
        assert!(approx(scores[EmotionLabel::Praise], 0.2));
    }

    #[test]
    fn praise_cue_and_exclamations() {
        let scores = default_score("你真的太棒了!!!");
        assert!(approx(scores[EmotionLabel::Praise], 0.2 + 1.2 + 3.0 * 0.08));
        assert!(approx(scores[EmotionLabel::Angry], 0.2 + 3.0 * 0.06));
        assert!(scores[EmotionLabel::Praise] > scores[EmotionLabel::Angry]);
    }

    #[test]
    fn questions_feed_fear() {
        let scores = default_score("真的吗？？?");
        assert!(approx(scores[EmotionLabel::Fear], 0.2 + 3.0 * 0.04));
    }

    #[test]
    fn long_text_bias_saturates() {
        let long = "a".repeat(500);
        let scores = default_score(&long);
        // short-text bias is gone, long-text bias is capped at its weight
        assert!(approx(scores[EmotionLabel::Neutral], 0.8 + 0.2));
    }

    #[test]
    fn cue_hits_add_per_distinct_cue() {
        let scores = default_score("哈哈哈 lol lol");
        // 哈哈, 哈哈哈, lol
        assert!(approx(scores[EmotionLabel::Funny], 0.2 + 3.0 * 1.2));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let scores = default_score("AWESOME");
        assert!(approx(scores[EmotionLabel::Praise], 0.2 + 1.2));
    }

    #[test]
    fn scores_never_negative() {
        for text in ["", " ", "!!!", "???", "滚!!! idiot", "晚安 宝贝 💕", "🙂"] {
            let scores = default_score(text);
            assert!(scores.values().all(|s| *s >= 0.0), "negative score for {:?}", text);
        }
    }

    #[test]
    fn custom_tuning_applies() {
        let tuning = ScorerTuning {
            cue_weight: 2.0,
            ..ScorerTuning::default()
        };
        let scores = score("nice", &CueLexicon::default(), &tuning);
        assert!(approx(scores[EmotionLabel::Praise], 0.2 + 2.0));
    }
}
