//! WASM bindings for sticker-engine, the entry point for web and mobile clients.

use rand::rngs::StdRng;
use wasm_bindgen::prelude::*;

use sticker_engine::core::pipeline::StickerEngine;
use sticker_engine::core::uniform::seeded;
use sticker_engine::schema::asset::{AssetPool, StickerAttachment};
use sticker_engine::schema::emotion::EmotionLabel;

// ---------------------------------------------------------------------------
// Embedded demo data, compiled into the WASM binary
// ---------------------------------------------------------------------------
mod data {
    pub const DEMO_POOL: &str = include_str!("../../data/demo_pool.ron");
}

// ---------------------------------------------------------------------------
// StickerDemo: the main exported struct
// ---------------------------------------------------------------------------
#[wasm_bindgen]
pub struct StickerDemo {
    engine: StickerEngine,
    rng: StdRng,
}

impl StickerDemo {
    fn from_pool(pool: AssetPool, seed: u64) -> Result<StickerDemo, JsError> {
        let engine = StickerEngine::builder()
            .with_pool(pool)
            .build()
            .map_err(|e| JsError::new(&format!("Engine build error: {e}")))?;
        Ok(StickerDemo {
            engine,
            rng: seeded(seed),
        })
    }
}

#[wasm_bindgen]
impl StickerDemo {
    /// Create a demo from a JSON sticker pool.
    ///
    /// Expected JSON shape:
    /// ```json
    /// {
    ///   "groups": { "praise": ["praise_clap"], "neutral": ["neutral_wave"] },
    ///   "sources": { "praise_clap": "img/clap.png" }
    /// }
    /// ```
    #[wasm_bindgen(constructor)]
    pub fn new(pool_json: &str, seed: u64) -> Result<StickerDemo, JsError> {
        let pool: AssetPool = serde_json::from_str(pool_json)
            .map_err(|e| JsError::new(&format!("Invalid pool JSON: {e}")))?;
        Self::from_pool(pool, seed)
    }

    /// Create a demo backed by the bundled pool.
    pub fn with_demo_pool(seed: u64) -> Result<StickerDemo, JsError> {
        let pool = AssetPool::parse_ron(data::DEMO_POOL)
            .map_err(|e| JsError::new(&format!("Pool parse error: {e}")))?;
        Self::from_pool(pool, seed)
    }

    /// Reset the generator.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = seeded(seed);
    }

    /// Pick a sticker key for `text`, or `undefined` when none is sent.
    pub fn pick(&mut self, text: &str) -> Option<String> {
        self.engine
            .pick_sticker(text, &mut self.rng)
            .map(str::to_string)
    }

    /// Pick a sticker and return the chat attachment as JSON, or `undefined`.
    ///
    /// `allow_stickers` is the role's opt-in flag.
    pub fn attachment(&mut self, text: &str, allow_stickers: bool) -> Result<Option<String>, JsError> {
        let attachment: Option<StickerAttachment> =
            self.engine.attachment_for(text, allow_stickers, &mut self.rng);
        attachment
            .map(|a| serde_json::to_string(&a))
            .transpose()
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Emotion distribution for `text` as a JSON object of label to probability.
    pub fn probabilities(&self, text: &str) -> Result<String, JsError> {
        serde_json::to_string(&self.engine.probabilities(text))
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Full dispatch trace for `text` as JSON.
    pub fn trace(&mut self, text: &str) -> Result<String, JsError> {
        let trace = self.engine.trace(text, &mut self.rng);
        serde_json::to_string(&trace)
            .map_err(|e| JsError::new(&format!("Serialization error: {e}")))
    }

    /// Return JSON array of label names in sampling order.
    pub fn labels() -> String {
        let names: Vec<&str> = EmotionLabel::ALL.iter().map(|l| l.name()).collect();
        serde_json::to_string(&names).unwrap_or_else(|_| "[]".to_string())
    }
}
