/// Cue lexicon: trigger substrings per emotion and hit counting.

use rustc_hash::FxHashMap;
use std::path::Path;
use thiserror::Error;

use crate::schema::emotion::{EmotionLabel, LabelMap};

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("neutral cannot carry cues")]
    NeutralCues,
}

const PRAISE_CUES: &[&str] = &[
    "太棒", "厉害", "优秀", "牛", "奈斯", "绝了", "鼓掌", "yyds", "nice", "great", "awesome",
    "amazing", "perfect", "666", "good job",
];

const SAD_CUES: &[&str] = &[
    "难过", "伤心", "委屈", "想哭", "哭", "心碎", "难受", "不开心", "郁闷", "emo", "sad", "upset",
    "depressed",
];

const ANGRY_CUES: &[&str] = &[
    "生气", "气死", "滚", "讨厌", "烦", "闭嘴", "吵", "别烦", "怒", "angry", "mad", "hate",
    "idiot", "stupid", "shut up", "fuck",
];

const FEAR_CUES: &[&str] = &[
    "害怕", "怕", "恐怖", "吓", "慌", "紧张", "可怕", "scared", "afraid", "terrified",
];

const FLIRT_CUES: &[&str] = &[
    "想你", "想我", "爱你", "爱", "喜欢你", "喜欢", "亲", "亲亲", "抱", "抱抱", "么么", "贴贴",
    "可爱", "宝贝", "心动", "比心", "晚安", "kiss", "love", "miss you", "xoxo", "mwah", "❤️",
    "💕", "💗",
];

const SLEEPY_CUES: &[&str] = &[
    "困", "累", "睡", "晚安", "熬夜", "通宵", "打盹", "tired", "sleepy", "good night",
];

const FUNNY_CUES: &[&str] = &[
    "哈哈", "哈哈哈", "笑死", "笑哭", "蚌埠住", "离谱", "搞笑", "好笑", "lol", "lmao", "rofl",
];

/// Mapping from each non-neutral label to its trigger substrings.
///
/// Cues are stored lower-cased. Matching is plain substring containment on
/// the lower-cased text, so a cue also fires inside longer words.
#[derive(Debug, Clone, PartialEq)]
pub struct CueLexicon {
    cues: LabelMap<Vec<String>>,
}

impl Default for CueLexicon {
    /// The built-in product lexicon (mixed Chinese, English and emoji).
    fn default() -> Self {
        Self::empty()
            .with_cues(EmotionLabel::Praise, PRAISE_CUES.iter().copied())
            .with_cues(EmotionLabel::Sad, SAD_CUES.iter().copied())
            .with_cues(EmotionLabel::Angry, ANGRY_CUES.iter().copied())
            .with_cues(EmotionLabel::Fear, FEAR_CUES.iter().copied())
            .with_cues(EmotionLabel::Flirt, FLIRT_CUES.iter().copied())
            .with_cues(EmotionLabel::Sleepy, SLEEPY_CUES.iter().copied())
            .with_cues(EmotionLabel::Funny, FUNNY_CUES.iter().copied())
    }
}

impl CueLexicon {
    /// A lexicon with no cues; every label scores on priors and heuristics alone.
    pub fn empty() -> Self {
        Self {
            cues: LabelMap::default(),
        }
    }

    /// Builder-style cue replacement. Cues for neutral are ignored.
    pub fn with_cues<I, S>(mut self, label: EmotionLabel, cues: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !label.is_neutral() {
            self.set_cues(label, cues);
        }
        self
    }

    fn set_cues<I, S>(&mut self, label: EmotionLabel, cues: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.cues[label] = cues
            .into_iter()
            .map(|cue| cue.as_ref().to_lowercase())
            .filter(|cue| !cue.is_empty())
            .collect();
    }

    /// The lower-cased cues registered for `label`, in insertion order.
    pub fn cues(&self, label: EmotionLabel) -> &[String] {
        &self.cues[label]
    }

    /// Number of distinct cues for `label` found in `lowered`.
    ///
    /// `lowered` must already be lower-cased; the scorer lowers the message
    /// once and reuses it for every label.
    pub fn hits(&self, label: EmotionLabel, lowered: &str) -> usize {
        count_lowered_hits(lowered, &self.cues[label])
    }

    /// Cues that appear under more than one label, with the labels sharing them.
    pub fn shared_cues(&self) -> Vec<(String, Vec<EmotionLabel>)> {
        let mut owners: FxHashMap<&str, Vec<EmotionLabel>> = FxHashMap::default();
        for label in EmotionLabel::CUED {
            for cue in self.cues(label) {
                let labels = owners.entry(cue.as_str()).or_default();
                if !labels.contains(&label) {
                    labels.push(label);
                }
            }
        }
        let mut shared: Vec<(String, Vec<EmotionLabel>)> = owners
            .into_iter()
            .filter(|(_, labels)| labels.len() > 1)
            .map(|(cue, labels)| (cue.to_string(), labels))
            .collect();
        shared.sort();
        shared
    }

    /// Load a lexicon from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<CueLexicon, LexiconError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// Parse a lexicon from a RON map of label to cue list. Labels not
    /// listed get no cues.
    pub fn parse_ron(input: &str) -> Result<CueLexicon, LexiconError> {
        let raw: FxHashMap<EmotionLabel, Vec<String>> = ron::from_str(input)?;
        if raw.contains_key(&EmotionLabel::Neutral) {
            return Err(LexiconError::NeutralCues);
        }
        let mut lexicon = Self::empty();
        for (label, cues) in raw {
            lexicon.set_cues(label, cues);
        }
        Ok(lexicon)
    }

    /// Merge another lexicon into this one. Non-empty cue lists from
    /// `other` replace the list for that label.
    pub fn merge(&mut self, other: CueLexicon) {
        for label in EmotionLabel::CUED {
            if !other.cues(label).is_empty() {
                self.cues[label] = other.cues[label].clone();
            }
        }
    }
}

/// Count how many of `cues` occur in `text`, case-insensitively.
///
/// Each cue contributes at most once regardless of repeats. Empty text and
/// empty cues never match.
pub fn count_hits<S: AsRef<str>>(text: &str, cues: &[S]) -> usize {
    let lowered_cues: Vec<String> = cues.iter().map(|cue| cue.as_ref().to_lowercase()).collect();
    count_lowered_hits(&text.to_lowercase(), &lowered_cues)
}

/// `count_hits` for text and cues that are both already lower-cased.
fn count_lowered_hits<S: AsRef<str>>(lowered: &str, cues: &[S]) -> usize {
    if lowered.is_empty() {
        return 0;
    }
    cues.iter()
        .map(|cue| cue.as_ref())
        .filter(|cue| !cue.is_empty() && lowered.contains(*cue))
        .count()
}
