//! Sticker Engine: affect-driven sticker dispatch for chat messages.
//!
//! Infers a coarse emotion from an outgoing message with a rule-weighted
//! heuristic scorer, decides probabilistically whether to attach a sticker,
//! and picks one from a caller-supplied asset pool. Every random draw comes
//! from an injected source, so a fixed sequence gives a fixed result.

pub mod core;
pub mod schema;

pub use crate::core::pipeline::{pick_sticker_for_text, StickerEngine};
pub use crate::core::uniform::{ScriptedUniform, UniformSource};
pub use crate::schema::asset::AssetPool;
pub use crate::schema::emotion::EmotionLabel;
