//! Integration tests for scripted gesture replay

use std::path::Path;

use pretty_assertions::assert_eq;

use connector_bend::{AnchorSpec, BendConfig, Point, Scenario};

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_replay_promote_and_straighten() {
    let scenario = Scenario::from_file(&fixture("promote_and_straighten.toml")).unwrap();
    let outcome = scenario.replay(&BendConfig::default()).unwrap();

    insta::assert_snapshot!(outcome.to_string().trim_end(), @r"
    committed: yes
    anchors:
      0: attached server as start
      1: free (200, 20)
      2: free (200, 120)
    route:
      (60, 20)
      (200, 20)
      (200, 120)
    content:
      @server
      (200, 20)
      (200, 120)
    ");
}

#[test]
fn test_replay_cancel_leaves_connection_untouched() {
    let scenario = Scenario::from_toml_str(
        r#"
finish = "cancel"

[[anchors]]
free = [0.0, 0.0]

[[anchors]]
free = [100.0, 0.0]

[[steps]]
op = "create-after"
index = 0
at = [50.0, 50.0]
"#,
    )
    .unwrap();
    let outcome = scenario.replay(&BendConfig::default()).unwrap();

    assert!(!outcome.committed);
    assert_eq!(
        outcome.anchors,
        vec![
            AnchorSpec::free(Point::new(0.0, 0.0)),
            AnchorSpec::free(Point::new(100.0, 0.0))
        ]
    );
    assert_eq!(outcome.content, None);
}

#[test]
fn test_replay_with_config_file() {
    let scenario = Scenario::from_toml_str(
        r#"
[[anchors]]
free = [0.0, 0.0]

[[anchors]]
free = [40.0, 40.0]

[[anchors]]
free = [80.0, 40.0]

[[anchors]]
free = [120.0, 0.0]

[[steps]]
op = "select"
index = 1

[[steps]]
op = "move"
from = [40.0, 40.0]
to = [76.0, 42.0]
"#,
    )
    .unwrap();

    let merged = scenario.replay(&BendConfig::default()).unwrap();
    assert_eq!(merged.anchors.len(), 3);

    let strict = BendConfig::from_file(&fixture("strict.toml")).unwrap();
    assert_eq!(strict.point_overlay_threshold, 2.0);
    assert_eq!(strict.max_normalization_passes, 256);
    let kept = scenario.replay(&strict).unwrap();
    assert_eq!(kept.anchors.len(), 4);
    assert_eq!(kept.anchors[1], AnchorSpec::free(Point::new(76.0, 42.0)));
}

#[test]
fn test_rotated_frame_round_trips_pointer() {
    let scenario = Scenario::from_toml_str(
        r#"
origin = [100.0, 100.0]
rotation = 90.0

[[anchors]]
free = [0.0, 0.0]

[[anchors]]
free = [100.0, 0.0]

[[steps]]
op = "create-after"
index = 0
at = [100.0, 150.0]
"#,
    )
    .unwrap();
    let outcome = scenario.replay(&BendConfig::default()).unwrap();

    // Scene (100, 150) is 50 units along the local x axis after a 90° turn
    let Some(position) = outcome.anchors[1].free_position() else {
        panic!("expected a free anchor");
    };
    assert!((position.x - 50.0).abs() < 1e-9);
    assert!(position.y.abs() < 1e-9);
}
