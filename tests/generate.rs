use std::path::Path;

use chrono::{TimeZone, Utc};

use scgen::config::{Options, Overrides, Project};
use scgen::{generate, Error};

fn resolve(toml: &str, overrides: &Overrides) -> Options {
    let project = Project::parse(Path::new("scgen.toml"), toml.to_string())
        .unwrap_or_else(|e| panic!("config should parse: {}", e));
    Options::resolve(Some(&project.config), overrides).unwrap_or_else(|diags| {
        panic!(
            "config should resolve, got {:?}",
            diags.iter().map(|d| &d.message).collect::<Vec<_>>()
        )
    })
}

fn read(dir: &Path, rel: &str) -> String {
    std::fs::read_to_string(dir.join(rel)).unwrap_or_else(|e| panic!("read {}: {}", rel, e))
}

// ── Config to files on disk ──

#[test]
fn test_config_file_drives_generation() {
    let options = resolve(
        r#"
[design]
batch = 2
input = 5
output = 3
adder = "alaghi"
suffix = "v2"

[testbench]
length = 64
seed = 11
"#,
        &Overrides::default(),
    );
    let created = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
    let bundle = generate(&options, created).unwrap();
    assert_eq!(bundle.seed(), Some(11));

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("out");
    let written = bundle.write_to(&dest).unwrap();
    assert_eq!(written.len(), bundle.files().len());

    let tree = read(&dest, "alaghi_nadder_v2.v");
    assert!(tree.contains("module alaghi_nadder_v2("));
    assert!(tree.contains("2020-01-02 03:04:05 GMT"));

    let mm = read(&dest, "sc_matrix_mult_v2.v");
    assert!(mm.contains("module sc_matrix_mult_v2("));
    assert!(mm.contains("sc_dot_product_v2"));

    let tb = read(&dest, "tb/sc_matrix_mult_v2_tb.v");
    assert!(tb.contains("module sc_matrix_mult_v2_tb"));

    let results = read(&dest, "tb/data/mm_result.mif");
    assert_eq!(results.lines().count(), 64);
    assert!(results.lines().all(|l| l.len() == 6));

    let inputs = read(&dest, "tb/data/adder_inputs.mif");
    assert!(inputs.lines().all(|l| l.len() == 5));
}

#[test]
fn test_command_line_overrides_the_file() {
    let options = resolve(
        "[design]\ninput = 3\n\n[testbench]\nseed = 1\n",
        &Overrides {
            input: Some(6),
            testbench: Some(false),
            ..Overrides::default()
        },
    );
    assert_eq!(options.input, 6);
    assert!(options.testbench.is_none());

    let bundle = generate(&options, Utc::now()).unwrap();
    assert!(bundle.seed().is_none());
    assert!(bundle
        .files()
        .iter()
        .all(|f| !f.path.starts_with("tb")));
}

#[test]
fn test_same_seed_reproduces_stimulus() {
    let overrides = Overrides {
        seed: Some(99),
        simulation: Some(true),
        ..Overrides::default()
    };
    let options = resolve("", &overrides);
    let created = Utc.with_ymd_and_hms(2021, 6, 1, 0, 0, 0).unwrap();
    let a = generate(&options, created).unwrap();
    let b = generate(&options, created).unwrap();
    assert_eq!(a.files(), b.files());
    assert!(a.get("tb/sc_dot_product_sim.v").is_some());
}

// ── Failures ──

#[test]
fn test_invalid_values_are_reported_together() {
    let project = Project::parse(
        Path::new("scgen.toml"),
        "[design]\ninput = 0\n\n[testbench]\nlength = -4\n".to_string(),
    )
    .unwrap();
    let diags = Options::resolve(Some(&project.config), &Overrides::default()).unwrap_err();
    assert_eq!(diags.len(), 2);

    let err = Error::options(diags, Some(&project));
    assert!(err.to_string().contains("2 problem(s)"));
}

#[test]
fn test_unknown_key_is_a_config_error() {
    let err = Project::parse(
        Path::new("scgen.toml"),
        "[design]\ninputs = 4\n".to_string(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
}

#[test]
fn test_destination_must_be_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("taken");
    std::fs::write(&file, "x").unwrap();

    let bundle = generate(&Options::default(), Utc::now()).unwrap();
    let err = bundle.write_to(&file).unwrap_err();
    assert!(matches!(err, Error::NotADirectory(_)));
}
