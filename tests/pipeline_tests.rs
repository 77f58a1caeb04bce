/// Pipeline integration tests: end-to-end text-to-sticker dispatch.

use sticker_engine::core::distribution::sample;
use sticker_engine::core::pipeline::{pick_sticker_for_text, StickerEngine};
use sticker_engine::core::resolver::resolve;
use sticker_engine::core::uniform::{seeded, ScriptedUniform};
use sticker_engine::schema::asset::{AssetPool, STICKER_PLACEHOLDER};
use sticker_engine::schema::emotion::EmotionLabel;

const SAMPLE_TEXTS: &[&str] = &[
    "",
    "   ",
    "ok",
    "你真的太棒了!!!",
    "呜呜呜我好难过，想哭",
    "滚！！别烦我，气死了",
    "好可怕…我有点害怕？？",
    "晚安宝贝，爱你 💕",
    "困死了，熬夜通宵好累",
    "哈哈哈笑死我了 lol",
    "Can you send me the report from yesterday's meeting before five?",
    "That was AWESOME, good job!!",
];

fn fixture_engine() -> StickerEngine {
    StickerEngine::builder()
        .pool_path("tests/fixtures/test_pool.ron")
        .build()
        .unwrap()
}

#[test]
fn probabilities_form_a_distribution() {
    let engine = fixture_engine();
    let long = "长".repeat(400);
    for text in SAMPLE_TEXTS.iter().copied().chain([long.as_str()]) {
        let probs = engine.probabilities(text);
        assert!(
            (probs.total() - 1.0).abs() <= 1e-9,
            "probabilities for {:?} sum to {}",
            text,
            probs.total()
        );
        assert!(probs.iter().all(|(_, p)| p >= 0.0 && p <= 1.0));
    }
}

#[test]
fn fixed_sequence_is_deterministic() {
    let engine = fixture_engine();
    let script = vec![0.12, 0.05, 0.77, 0.4, 0.91, 0.33];
    for text in SAMPLE_TEXTS {
        let first = engine.pick_sticker(text, &mut ScriptedUniform::new(script.clone()));
        for _ in 0..5 {
            let again = engine.pick_sticker(text, &mut ScriptedUniform::new(script.clone()));
            assert_eq!(first, again, "non-deterministic pick for {:?}", text);
        }
    }
}

#[test]
fn short_acknowledgement_is_mostly_neutral() {
    let engine = fixture_engine();
    let probs = engine.probabilities("ok");
    let neutral = probs.mass(EmotionLabel::Neutral);
    for label in EmotionLabel::CUED {
        assert!(
            neutral > probs.mass(label),
            "neutral {} not above {} {}",
            neutral,
            label,
            probs.mass(label)
        );
    }
}

#[test]
fn praise_beats_generic_exclamation_bonus() {
    let engine = fixture_engine();
    let scores = engine.scores("你真的太棒了!!!");
    let angry_bonus = 3.0 * engine.tuning().scorer.exclamation_angry;
    assert!(scores[EmotionLabel::Praise] > 0.2 + angry_bonus);
    assert!(scores[EmotionLabel::Praise] > scores[EmotionLabel::Angry]);
    assert_eq!(engine.probabilities("你真的太棒了!!!").most_likely(), EmotionLabel::Praise);
}

#[test]
fn empty_flirt_group_never_dispatches() {
    let engine = fixture_engine();
    let text = "爱你 想你 抱抱 亲亲 宝贝 💕";
    let mut flirt_sampled = 0;
    for seed in 0..500 {
        let trace = engine.trace(text, &mut seeded(seed));
        if trace.label == EmotionLabel::Flirt {
            flirt_sampled += 1;
            assert!(trace.asset.is_none(), "flirt produced {:?}", trace.asset);
        }
    }
    assert!(flirt_sampled > 0, "flirt was never sampled");
}

#[test]
fn zero_source_always_dispatches_first_label() {
    let engine = fixture_engine();
    for text in SAMPLE_TEXTS {
        let probs = engine.probabilities(text);
        let first_nonzero = probs
            .iter()
            .find(|(_, p)| *p > 0.0)
            .map(|(label, _)| label)
            .unwrap();
        let mut rng = ScriptedUniform::constant(0.0);
        assert_eq!(sample(&probs, &mut rng), first_nonzero);

        let trace = engine.trace(text, &mut ScriptedUniform::constant(0.0));
        assert!(trace.dispatched, "gate rejected a zero draw for {:?}", text);
        assert_eq!(trace.asset, Some("praise_clap"));
    }
}

#[test]
fn near_one_source_never_dispatches() {
    let engine = fixture_engine();
    for text in SAMPLE_TEXTS {
        let trace = engine.trace(text, &mut ScriptedUniform::constant(0.999_999));
        assert!(trace.chance < 0.999_999);
        assert!(!trace.dispatched);
        assert_eq!(
            engine.pick_sticker(text, &mut ScriptedUniform::constant(0.999_999)),
            None
        );
    }
}

#[test]
fn resolver_cycles_indices_in_range() {
    let pool = AssetPool::load_from_ron(std::path::Path::new("tests/fixtures/test_pool.ron")).unwrap();
    let group = pool.group(EmotionLabel::Funny).unwrap().to_vec();
    let script = vec![0.0, 0.34, 0.67, 0.999_999, 0.5];
    let mut rng = ScriptedUniform::new(script.clone());
    for round in 0..3 {
        for draw in &script {
            let expected = &group[(draw * group.len() as f64).floor() as usize];
            let picked = resolve(EmotionLabel::Funny, &pool, &mut rng);
            assert_eq!(picked, Some(expected.as_str()), "round {}", round);
        }
    }
}

#[test]
fn missing_group_uses_neutral_stickers() {
    let engine = fixture_engine();
    let text = "呜呜呜我好难过，想哭，心碎了";
    let mut saw_sad = false;
    for seed in 0..300 {
        let trace = engine.trace(text, &mut seeded(seed));
        if trace.label == EmotionLabel::Sad && trace.dispatched {
            saw_sad = true;
            let asset = trace.asset.unwrap();
            assert!(asset.starts_with("neutral_"), "unexpected {}", asset);
        }
    }
    assert!(saw_sad, "sad never dispatched");
}

#[test]
fn dispatch_rate_tracks_gate_chance() {
    let engine = fixture_engine();
    let text = "哈哈哈笑死我了 lol 太离谱了";
    let mut expected = 0.0;
    let mut dispatched = 0;
    let runs = 4000;
    let mut rng = seeded(2024);
    for _ in 0..runs {
        let trace = engine.trace(text, &mut rng);
        expected += trace.chance;
        if trace.dispatched {
            dispatched += 1;
        }
    }
    let observed = dispatched as f64 / runs as f64;
    let expected = expected / runs as f64;
    assert!(
        (observed - expected).abs() < 0.04,
        "expected ~{:.3}, observed {:.3}",
        expected,
        observed
    );
}

#[test]
fn free_function_with_empty_pool() {
    let pool = AssetPool::new();
    for seed in 0..100 {
        assert_eq!(pick_sticker_for_text("太棒了!!!", &pool, &mut seeded(seed)), None);
    }
}

#[test]
fn attachment_carries_source_and_placeholder() {
    let engine = fixture_engine();
    let attachment = engine
        .attachment_for("太棒了", true, &mut ScriptedUniform::constant(0.0))
        .unwrap();
    assert_eq!(attachment.media_key, "praise_clap");
    assert_eq!(attachment.source.as_deref(), Some("stickers/praise/clap.png"));
    assert_eq!(attachment.placeholder, STICKER_PLACEHOLDER);

    assert!(engine
        .attachment_for("太棒了", false, &mut ScriptedUniform::constant(0.0))
        .is_none());
}

#[test]
fn pool_directory_merges_in_name_order() {
    let engine = StickerEngine::builder()
        .pool_path("tests/fixtures/pool_dir")
        .build()
        .unwrap();
    let praise = engine.pool().group(EmotionLabel::Praise).unwrap();
    assert_eq!(praise, &["praise_lantern", "praise_dumpling"]);
    assert!(engine.pool().group(EmotionLabel::Neutral).is_some());
    assert_eq!(
        engine.pool().source_for("praise_lantern"),
        Some("stickers/seasonal/lantern.png")
    );
}

#[test]
fn tuning_file_changes_gate() {
    let engine = StickerEngine::builder()
        .pool_path("tests/fixtures/test_pool.ron")
        .tuning_path("tests/fixtures/test_tuning.ron")
        .build()
        .unwrap();
    let gate = &engine.tuning().gate;
    assert_eq!(gate.base_chance_for(EmotionLabel::Praise), 0.5);
    assert_eq!(gate.base_chance_for(EmotionLabel::Sad), 0.25);
    assert_eq!(gate.max_chance, 0.85);
}
