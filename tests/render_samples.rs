//! Rendering tests — build scores in code or load the JSON fixture and
//! render them to SVG.

use pretty_assertions::assert_eq;
use std::path::PathBuf;

use tablayout::model::{Bar, Staff, Track, Voice};
use tablayout::{
    build_bounds_lookup, compute_layout, parse_score_json, render_score_json_to_svg, render_score_to_svg,
    score_to_json, validate_score, Beat, Duration, FixedWidthMetrics, LayoutError, Note, RenderSettings, Score,
    TabRhythmMode,
};

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data").join(name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()))
}

/// One guitar staff with `bars` bars of four quarter notes each.
fn riff(bars: usize) -> Score {
    let mut next_id = 0;
    let bars = (0..bars)
        .map(|_| {
            let beats = (0..4)
                .map(|i| {
                    let mut beat = Beat::new(next_id, Duration::Quarter);
                    next_id += 1;
                    beat.notes.push(Note::new(6 - i, 3));
                    beat
                })
                .collect();
            Bar {
                voices: vec![Voice { beats }],
            }
        })
        .collect();
    Score {
        title: Some("Riff".into()),
        artist: None,
        tracks: vec![Track {
            name: "Guitar".into(),
            staves: vec![Staff {
                tuning: vec![64, 59, 55, 50, 45, 40],
                bars,
            }],
        }],
    }
}

#[test]
fn render_fixture_svg() {
    let svg = render_score_json_to_svg(&fixture("simple_tab.json"), None, None).expect("Failed to render fixture");

    assert!(svg.starts_with("<svg"), "Output should be SVG");
    assert!(svg.contains("</svg>"), "SVG should be closed");
    assert!(svg.contains("Open Road"), "SVG should contain title");
    assert!(svg.contains("The Fretboards"), "SVG should contain artist");
    assert!(svg.contains("Lead Guitar"), "SVG should contain track name");
    assert!(svg.contains(r#"width="820""#), "Default page width");

    // six staff lines at least
    assert!(svg.matches("<line").count() >= 6);
    // fret numbers, ghost note in parentheses
    assert!(svg.contains(">(12)<"));
    // rhythm dot and whammy curve
    assert!(svg.contains("<circle"));
    assert!(svg.contains("<path"));
    assert!(svg.contains(">-1<"), "Whammy label");
}

#[test]
fn fixture_bounds_cover_every_beat() {
    let score = parse_score_json(&fixture("simple_tab.json")).expect("fixture parses");
    let settings = RenderSettings::default();
    let metrics = FixedWidthMetrics::default();
    let layout = compute_layout(&score, &settings, &metrics, 820.0);

    let bounds = build_bounds_lookup(&layout);
    let ids: Vec<usize> = bounds.iter().map(|b| b.beat).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7]);

    let chord = &bounds[0];
    assert_eq!(chord.notes.len(), 2);
    let low_e = chord.notes.iter().find(|n| n.string == 6).expect("string 6");
    let (x, y) = (low_e.bounds.x + 1.0, low_e.bounds.y + 1.0);
    assert_eq!(chord.find_note_at_pos(x, y), Some(6));

    // slash heads and rests have no note rectangles
    assert!(bounds[5].notes.is_empty());
    assert!(bounds[6].notes.is_empty());

    // the beat owns at least what it draws
    for b in &bounds {
        assert!(b.real_bounds.w >= b.visual_bounds.w, "beat {}", b.beat);
    }
}

#[test]
fn narrow_page_breaks_into_more_systems() {
    let score = riff(8);
    let settings = RenderSettings::default();
    let metrics = FixedWidthMetrics::default();

    let wide = compute_layout(&score, &settings, &metrics, 1200.0);
    let narrow = compute_layout(&score, &settings, &metrics, 300.0);
    assert!(narrow.systems.len() > wide.systems.len());
    assert!(narrow.total_height > wide.total_height);

    let bars: usize = narrow.systems.iter().map(|s| s.staves[0].bars.len()).sum();
    assert_eq!(bars, 8);
    // systems are stacked top to bottom
    for pair in narrow.systems.windows(2) {
        assert!(pair[1].y > pair[0].y);
    }
}

#[test]
fn justified_systems_fill_the_page() {
    let score = riff(8);
    let settings = RenderSettings::default();
    let metrics = FixedWidthMetrics::default();
    let layout = compute_layout(&score, &settings, &metrics, 400.0);
    assert!(layout.systems.len() > 1);

    let first = &layout.systems[0];
    let row = &first.staves[0];
    let last_bar = row.bars.last().expect("bars");
    let right_edge = first.x_start + last_bar.x + last_bar.width();
    assert!((right_edge - first.x_end).abs() < 1e-6);
    for bar in &row.bars {
        assert!(bar.width() >= bar.min_width());
    }
}

#[test]
fn page_width_is_honored() {
    let score = riff(2);
    let svg = render_score_to_svg(&score, &RenderSettings::default(), Some(500.0));
    assert!(svg.contains(r#"width="500""#));
    assert!(svg.contains(r#"viewBox="0 0 500 "#));
}

#[test]
fn hidden_rhythm_draws_less() {
    let score = riff(2);
    let mut settings = RenderSettings::default();
    let with_rhythm = render_score_to_svg(&score, &settings, None);
    settings.notation.rhythm_mode = TabRhythmMode::Hidden;
    let without_rhythm = render_score_to_svg(&score, &settings, None);

    assert!(without_rhythm.matches("<line").count() < with_rhythm.matches("<line").count());
}

#[test]
fn score_without_strings_renders_placeholder() {
    let mut score = riff(1);
    score.tracks[0].staves[0].tuning.clear();
    let svg = render_score_to_svg(&score, &RenderSettings::default(), None);
    assert!(svg.contains("No tablature staves"));

    match validate_score(&score) {
        Err(LayoutError::EmptyTuning { track, staff }) => assert_eq!((track, staff), (0, 0)),
        other => panic!("expected EmptyTuning, got {other:?}"),
    }
}

#[test]
fn validation_rejects_bad_scores() {
    let mut score = riff(1);
    score.tracks[0].staves[0].bars[0].voices[0].beats[1].id = 0;
    assert!(matches!(validate_score(&score), Err(LayoutError::DuplicateBeatId(0))));

    let mut score = riff(1);
    score.tracks[0].staves[0].bars[0].voices[0].beats[2].notes[0].string = 7;
    match validate_score(&score) {
        Err(LayoutError::StringOutOfRange { beat, string, strings }) => {
            assert_eq!((beat, string, strings), (2, 7, 6));
        }
        other => panic!("expected StringOutOfRange, got {other:?}"),
    }

    assert!(validate_score(&riff(3)).is_ok());
    assert!(matches!(parse_score_json("{ not json"), Err(LayoutError::Json(_))));
}

#[test]
fn score_json_roundtrip_preserves_structure() {
    let score = parse_score_json(&fixture("simple_tab.json")).expect("fixture parses");
    let json = score_to_json(&score).expect("serializes");
    let again = parse_score_json(&json).expect("reparses");

    assert_eq!(again.title, score.title);
    assert_eq!(again.bar_count(), 2);
    let beat = &again.tracks[0].staves[0].bars[0].voices[0].beats[3];
    assert_eq!(beat.dots, 1);
    assert_eq!(beat.tremolo_speed, Some(Duration::ThirtySecond));
}

#[test]
fn settings_json_overrides_defaults() {
    let settings = RenderSettings::from_json(r#"{ "scale": 1.5, "notation": { "show_tab_rests": false } }"#)
        .expect("settings parse");
    assert_eq!(settings.scale, 1.5);
    assert!(!settings.notation.show_tab_rests);
    assert_eq!(settings.notation.rhythm_mode, TabRhythmMode::ShowWithBeams);
    assert_eq!(settings.notation.tab_line_spacing, 10.0);

    let svg = render_score_json_to_svg(&fixture("simple_tab.json"), Some(r#"{ "scale": 1.5 }"#), Some(900.0))
        .expect("renders");
    assert!(svg.contains(r#"width="900""#));
    assert!(render_score_json_to_svg(&fixture("simple_tab.json"), Some(r#"{ "scale": "big" }"#), None).is_err());
}

#[test]
fn oversized_bar_keeps_its_width_and_staff_follows_it() {
    // one bar of 32 notes cannot fit a 300 wide page
    let beats = (0..32)
        .map(|i| {
            let mut beat = Beat::new(i, Duration::ThirtySecond);
            beat.notes.push(Note::new(1 + i % 6, 10));
            beat
        })
        .collect();
    let mut score = riff(0);
    score.tracks[0].staves[0].bars.push(Bar {
        voices: vec![Voice { beats }],
    });
    let settings = RenderSettings::default();
    let metrics = FixedWidthMetrics::default();
    let layout = compute_layout(&score, &settings, &metrics, 300.0);

    assert_eq!(layout.systems.len(), 1);
    let system = &layout.systems[0];
    let bar = &system.staves[0].bars[0];
    assert_eq!(bar.width(), bar.min_width());
    assert!(system.x_end > 300.0);
    let right_edge = system.x_start + bar.x + bar.width();
    assert!((right_edge - system.x_end).abs() < 1e-6);
}
