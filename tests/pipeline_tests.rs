/// Pipeline integration tests: fixture line sets planned end to end.

use dialogue_voice::config::Settings;
use dialogue_voice::core::emotion::EmotionSource;
use dialogue_voice::core::pipeline::{LinePlan, LinePlanner, SkipReason, SynthesisPlan};
use dialogue_voice::core::voice::VoiceTable;
use dialogue_voice::schema::emotion::{EmotionLabel, EmotionSetting};
use dialogue_voice::schema::line::LineSet;
use dialogue_voice::schema::vocalization::VocalizationCategory;
use std::io::Write;
use std::path::Path;

fn fixture_planner() -> LinePlanner {
    LinePlanner::builder()
        .voices_file("tests/fixtures/voices.json")
        .settings_file("tests/fixtures/settings.ron")
        .build()
        .unwrap()
}

fn fixture_lines() -> LineSet {
    LineSet::load_from_ron(Path::new("tests/fixtures/lines.ron")).unwrap()
}

fn plan_for<'p>(plans: &'p [LinePlan], id: &str) -> &'p SynthesisPlan {
    plans
        .iter()
        .filter_map(LinePlan::synthesis)
        .find(|p| p.id == id)
        .unwrap_or_else(|| panic!("no synthesis plan for {}", id))
}

#[test]
fn fixture_batch_summary() {
    let lines = fixture_lines();
    assert_eq!(lines.len(), 13);

    let (plans, summary) = fixture_planner().plan_all(lines.iter());
    assert_eq!(plans.len(), 13);
    assert_eq!(summary.planned, 10);
    assert_eq!(summary.vocalizations, 6);
    assert_eq!(summary.with_emotion, 6);
    assert_eq!(summary.skipped_prevoiced, 1);
    assert_eq!(summary.skipped_empty, 1);
    assert_eq!(summary.skipped_missing, 1);
}

#[test]
fn skipped_lines_keep_their_ids() {
    let (plans, _) = fixture_planner().plan_all(fixture_lines().iter());
    let skipped: Vec<(&str, SkipReason)> = plans
        .iter()
        .filter_map(|p| match p {
            LinePlan::Skip { id, reason } => Some((id.as_str(), *reason)),
            LinePlan::Synthesize(_) => None,
        })
        .collect();
    assert_eq!(
        skipped,
        vec![
            ("38614", SkipReason::PreVoiced),
            ("38615", SkipReason::EmptyText),
            ("38618", SkipReason::MissingFields),
        ]
    );
}

#[test]
fn jaheira_grunt_uses_character_preset() {
    let (plans, _) = fixture_planner().plan_all(fixture_lines().iter());
    let plan = plan_for(&plans, "38606");

    assert_eq!(plan.text, "aarrgh!");
    assert_eq!(plan.voice, "voices/jaheira_ref.wav");
    assert_eq!(plan.speed, Some(0.97));
    assert_eq!(plan.pitch_shift, Some(-1.0));

    let vocal = plan.vocalization.as_ref().unwrap();
    assert_eq!(vocal.category, VocalizationCategory::Grunt);
    assert!(vocal.is_pure);

    let emotion = plan.emotion.as_ref().unwrap();
    assert_eq!(emotion.source, EmotionSource::CharacterPreset);
    assert_eq!(emotion.setting, EmotionLabel::Angry.setting());
}

#[test]
fn direct_address_is_removed_from_spoken_text() {
    let (plans, _) = fixture_planner().plan_all(fixture_lines().iter());
    assert_eq!(
        plan_for(&plans, "38607").text,
        "Khalid is gone. I... I cannot bear it."
    );
    assert_eq!(
        plan_for(&plans, "38608").text,
        "Hey! You have to see this, my friend!"
    );
    assert!(plan_for(&plans, "38607").emotion.is_none());
}

#[test]
fn scream_falls_back_to_global_preset() {
    let (plans, _) = fixture_planner().plan_all(fixture_lines().iter());
    let plan = plan_for(&plans, "38609");
    assert_eq!(plan.voice, "female_young");
    assert_eq!(plan.text, "aaaah!");

    let emotion = plan.emotion.as_ref().unwrap();
    assert_eq!(emotion.source, EmotionSource::GlobalPreset);
    assert_eq!(emotion.setting, EmotionLabel::Fear.setting());
}

#[test]
fn manual_label_beats_vocalization_preset() {
    let (plans, _) = fixture_planner().plan_all(fixture_lines().iter());
    let plan = plan_for(&plans, "38610");

    // Still respelled as a pure yell.
    assert_eq!(plan.text, "raaagh!");
    let emotion = plan.emotion.as_ref().unwrap();
    assert_eq!(emotion.source, EmotionSource::Manual);
    assert_eq!(emotion.label, "urgent");
    assert_eq!(emotion.alpha, Some(0.8));
}

#[test]
fn embedded_vocalization_leaves_text_and_emotion_alone() {
    let (plans, _) = fixture_planner().plan_all(fixture_lines().iter());

    let laugh = plan_for(&plans, "38611");
    assert_eq!(laugh.text, "Heh heh. Boo approves.");
    assert!(!laugh.vocalization.as_ref().unwrap().is_pure);
    assert!(laugh.emotion.is_none());

    let cough = plan_for(&plans, "38617");
    assert_eq!(cough.voice, "narrator");
    assert_eq!(cough.vocalization.as_ref().unwrap().category, VocalizationCategory::Cough);
    assert_eq!(cough.text, "I... *cough* *cough*... I am not here");
}

#[test]
fn auto_detection_only_for_configured_speakers() {
    let (plans, _) = fixture_planner().plan_all(fixture_lines().iter());

    let threat = plan_for(&plans, "38612").emotion.as_ref().unwrap();
    assert_eq!(threat.source, EmotionSource::AutoDetected);
    assert_eq!(threat.label, "angry");

    let question = plan_for(&plans, "38613").emotion.as_ref().unwrap();
    assert_eq!(question.label, "fear");
}

#[test]
fn generic_preset_without_vector_is_pitch_speed_only() {
    let (plans, _) = fixture_planner().plan_all(fixture_lines().iter());
    let plan = plan_for(&plans, "38616");
    assert_eq!(plan.text, "sigh...");

    // Sarevok is also an auto-emotion speaker; the vocalization step wins.
    let emotion = plan.emotion.as_ref().unwrap();
    assert_eq!(emotion.source, EmotionSource::CharacterGeneric);
    assert_eq!(emotion.setting, EmotionSetting::PitchSpeedOnly);
    assert_eq!(emotion.alpha, Some(0.4));
}

#[test]
fn ron_and_json_voice_tables_agree() {
    let json = VoiceTable::load(Path::new("tests/fixtures/voices.json")).unwrap();
    let ron = VoiceTable::load(Path::new("tests/fixtures/voices.ron")).unwrap();

    for speaker in ["Jaheira", "Imoen", "Ilyich", "Nobody"] {
        assert_eq!(
            json.lookup(speaker).base_voice(),
            ron.lookup(speaker).base_voice(),
            "speaker {}",
            speaker
        );
    }
    assert_eq!(
        json.lookup("Jaheira").pitch_shift,
        ron.lookup("Jaheira").pitch_shift
    );
    assert_eq!(
        json.generic_emotion(VocalizationCategory::Scream),
        ron.generic_emotion(VocalizationCategory::Scream)
    );
}

#[test]
fn speaker_filter_narrows_batch() {
    let lines = fixture_lines().filter_speakers(&["ilyich".to_string()]);
    let (plans, summary) = fixture_planner().plan_all(lines.iter());
    assert_eq!(plans.len(), 2);
    assert_eq!(summary.planned, 2);
    assert_eq!(summary.with_emotion, 2);
}

#[test]
fn planner_loads_written_files() {
    let dir = tempfile::tempdir().unwrap();

    let voices_path = dir.path().join("voices.json");
    let mut voices = std::fs::File::create(&voices_path).unwrap();
    writeln!(voices, r#"{{"Viconia": {{"voice": "female_dark", "emotion_presets": {{"laugh": "happy"}}}}}}"#)
        .unwrap();

    let settings_path = dir.path().join("settings.ron");
    std::fs::write(&settings_path, "(skip_prevoiced: false, default_voice: \"fallback\")").unwrap();

    let planner = LinePlanner::builder()
        .voices_file(voices_path.to_str().unwrap())
        .settings_file(settings_path.to_str().unwrap())
        .build()
        .unwrap();
    assert!(!planner.settings().skip_prevoiced);

    let lines = LineSet::parse_ron(
        r#"[
            (id: "1", speaker: "Viconia", text: "Heh!", original_vo: Some("VICONI01")),
            (id: "2", speaker: "Edwin", text: "Simia!"),
        ]"#,
    )
    .unwrap();
    let (plans, _) = planner.plan_all(lines.iter());

    let viconia = plans[0].synthesis().unwrap();
    assert_eq!(viconia.voice, "female_dark");
    assert_eq!(viconia.text, "hehe!");
    assert_eq!(viconia.emotion.as_ref().unwrap().setting, EmotionLabel::Happy.setting());

    assert_eq!(plans[1].synthesis().unwrap().voice, "fallback");
}

#[test]
fn missing_voice_file_is_an_error() {
    let result = LinePlanner::builder()
        .voices_file("tests/fixtures/does_not_exist.json")
        .build();
    assert!(result.is_err());
}

#[test]
fn invalid_settings_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.ron");
    std::fs::write(&path, "(min_vocalization_confidence: 2.0)").unwrap();

    let result = LinePlanner::builder()
        .settings_file(path.to_str().unwrap())
        .build();
    assert!(result.is_err());
}

#[test]
fn planning_is_deterministic() {
    let planner = fixture_planner();
    let lines = fixture_lines();
    let (first, _) = planner.plan_all(lines.iter());
    let (second, _) = planner.plan_all(lines.iter());
    assert_eq!(first, second);
}

#[test]
fn plans_serialize_to_json() {
    let (plans, _) = fixture_planner().plan_all(fixture_lines().iter());
    let json = serde_json::to_value(&plans).unwrap();
    assert_eq!(json[0]["action"], "synthesize");
    assert_eq!(json[0]["text"], "aarrgh!");
    assert_eq!(json[8]["action"], "skip");
    assert_eq!(json[8]["reason"], "pre_voiced");
}

#[test]
fn settings_fixture_parses() {
    let settings = Settings::load_from_ron(Path::new("tests/fixtures/settings.ron")).unwrap();
    assert!(settings.auto_emotion_for("sarevok"));
    assert_eq!(settings.min_vocalization_confidence, 0.6);
}
