use std::fs;
use std::path::Path;

use super::*;
use crate::error::Error;

fn parse(text: &str) -> Project {
    Project::parse(Path::new("scgen.toml"), text.to_string()).unwrap()
}

#[test]
fn test_defaults_without_file() {
    let options = Options::resolve(None, &Overrides::default()).unwrap();
    assert_eq!(options, Options::default());
    assert_eq!((options.batch, options.input, options.output), (4, 4, 4));
    assert_eq!(options.testbench.as_ref().map(|t| t.length), Some(100));
    assert!(options.simulation.is_none());
}

#[test]
fn test_load_project_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let toml_path = dir.path().join(CONFIG_FILE_NAME);
    fs::write(
        &toml_path,
        r#"[design]
batch = 2
input = 8
output = 3
representation = "bi"
adder = "alaghi"
suffix = "v2"

[testbench]
length = 64
seed = 7

[simulation]
enabled = true
precision = 10
"#,
    )
    .unwrap();

    assert_eq!(Project::find(dir.path()), Some(toml_path.clone()));
    let project = Project::load(&toml_path).unwrap();
    let options = Options::resolve(Some(&project.config), &Overrides::default()).unwrap();
    assert_eq!(options.batch, 2);
    assert_eq!(options.input, 8);
    assert_eq!(options.output, 3);
    assert_eq!(options.representation, Representation::Bi);
    assert_eq!(options.adder, AdderMode::Alaghi);
    assert_eq!(options.suffix.as_deref(), Some("v2"));
    assert_eq!(
        options.testbench,
        Some(TestbenchOptions {
            length: 64,
            seed: Some(7)
        })
    );
    assert_eq!(options.simulation, Some(SimulationOptions { precision: 10 }));
}

#[test]
fn test_find_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(Project::find(dir.path()), None);
}

#[test]
fn test_overrides_win_over_file() {
    let project = parse("[design]\nbatch = 2\nadder = \"alaghi\"\n\n[testbench]\nenabled = true\n");
    let overrides = Overrides {
        batch: Some(5),
        adder: Some(AdderMode::Selector),
        testbench: Some(false),
        ..Overrides::default()
    };
    let options = Options::resolve(Some(&project.config), &overrides).unwrap();
    assert_eq!(options.batch, 5);
    assert_eq!(options.adder, AdderMode::Selector);
    assert!(options.testbench.is_none());
}

#[test]
fn test_partial_sections_keep_defaults() {
    let project = parse("[simulation]\nenabled = true\n");
    let options = Options::resolve(Some(&project.config), &Overrides::default()).unwrap();
    assert_eq!(options.input, DEFAULT_DIMENSION);
    assert_eq!(
        options.simulation,
        Some(SimulationOptions {
            precision: DEFAULT_PRECISION
        })
    );
}

#[test]
fn test_zero_dimension_points_at_value() {
    let text = "[design]\ninput = 0\n";
    let project = parse(text);
    let diags = Options::resolve(Some(&project.config), &Overrides::default()).unwrap_err();
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("design.input"));
    assert_eq!(&text[diags[0].span.range()], "0");
    assert!(diags[0].notes.is_empty());
}

#[test]
fn test_all_errors_reported_together() {
    let project = parse("[design]\nbatch = -1\noutput = 0\n\n[simulation]\nprecision = 40\n");
    let diags = Options::resolve(Some(&project.config), &Overrides::default()).unwrap_err();
    assert_eq!(diags.len(), 3);
    assert!(diags.iter().all(|d| d.to_string().starts_with("error: invalid '")));
}

#[test]
fn test_cli_value_errors_carry_note() {
    let overrides = Overrides {
        precision: Some(1),
        ..Overrides::default()
    };
    let diags = Options::resolve(None, &overrides).unwrap_err();
    assert_eq!(diags.len(), 1);
    assert!(diags[0].span.is_dummy());
    assert_eq!(diags[0].notes.len(), 1);
    assert!(diags[0].help.as_deref().unwrap_or("").contains("between 3 and 32"));
}

#[test]
fn test_precision_below_tap_table_rejected() {
    let text = "[simulation]\nenabled = true\nprecision = 2\n";
    let project = parse(text);
    let diags = Options::resolve(Some(&project.config), &Overrides::default()).unwrap_err();
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("simulation.precision"));
    assert_eq!(&text[diags[0].span.range()], "2");
}

#[test]
fn test_precision_without_taps_rejected() {
    let overrides = Overrides {
        precision: Some(21),
        ..Overrides::default()
    };
    let diags = Options::resolve(None, &overrides).unwrap_err();
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("no maximal-length LFSR taps for 21 bits"));
    assert!(diags[0].help.as_deref().unwrap_or("").contains("24"));
}

#[test]
fn test_every_accepted_precision_has_full_period() {
    for p in MIN_PRECISION..=MAX_PRECISION {
        let overrides = Overrides {
            precision: Some(p),
            simulation: Some(true),
            ..Overrides::default()
        };
        if let Ok(options) = Options::resolve(None, &overrides) {
            assert_eq!(options.simulation, Some(SimulationOptions { precision: p }));
            assert!(!crate::lfsr::taps_for(p).1, "precision {} has no taps", p);
        }
    }
    assert!(Options::resolve(
        None,
        &Overrides {
            precision: Some(3),
            ..Overrides::default()
        }
    )
    .is_ok());
}

#[test]
fn test_negative_seed_rejected() {
    let project = parse("[testbench]\nseed = -3\n");
    let diags = Options::resolve(Some(&project.config), &Overrides::default()).unwrap_err();
    assert!(diags[0].message.contains("testbench.seed"));
}

#[test]
fn test_bad_suffix_rejected() {
    let overrides = Overrides {
        suffix: Some("has space".to_string()),
        ..Overrides::default()
    };
    let diags = Options::resolve(None, &overrides).unwrap_err();
    assert!(diags[0].message.contains("design.suffix"));
}

#[test]
fn test_empty_suffix_is_no_suffix() {
    let project = parse("[design]\nsuffix = \"\"\n");
    let options = Options::resolve(Some(&project.config), &Overrides::default()).unwrap();
    assert_eq!(options.suffix, None);
}

#[test]
fn test_unknown_key_is_a_config_error() {
    let err = Project::parse(
        Path::new("scgen.toml"),
        "[design]\nbatchsize = 4\n".to_string(),
    )
    .unwrap_err();
    match err {
        Error::Config { diagnostics, .. } => {
            assert_eq!(diagnostics.len(), 1);
            assert!(diagnostics[0].message.contains("batchsize"));
            assert!(!diagnostics[0].span.is_dummy());
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_bad_enum_value_is_a_config_error() {
    let err = Project::parse(
        Path::new("scgen.toml"),
        "[design]\nrepresentation = \"tri\"\n".to_string(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Project::load(&dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, Error::Io { action: "read", .. }));
}

#[test]
fn test_template_parses_to_defaults() {
    let project = parse(project::template());
    let options = Options::resolve(Some(&project.config), &Overrides::default()).unwrap();
    assert_eq!(options, Options::default());
}
