/// Asset resolver: uniform pick from the caller's pool.

use crate::core::uniform::UniformSource;
use crate::schema::asset::AssetPool;
use crate::schema::emotion::EmotionLabel;

/// Index chosen by `floor(draw * len)`, clamped into `[0, len)`.
///
/// Returns `None` for an empty collection. Out-of-range draws land on the
/// nearest end instead of indexing past it.
pub fn pick_index(draw: f64, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    // `as` saturates: negative and NaN become 0
    let index = (draw * len as f64).floor() as usize;
    Some(index.min(len - 1))
}

/// Pick an asset for `label`.
///
/// Uses the label's own group, falling back to neutral's group only when
/// the label has no entry at all. An empty group yields `None` without
/// consuming a draw.
pub fn resolve<'a>(
    label: EmotionLabel,
    pool: &'a AssetPool,
    rng: &mut impl UniformSource,
) -> Option<&'a str> {
    let group = pool
        .group(label)
        .or_else(|| pool.group(EmotionLabel::Neutral))?;
    if group.is_empty() {
        return None;
    }
    let index = pick_index(rng.next_uniform(), group.len())?;
    Some(group[index].as_str())
}
