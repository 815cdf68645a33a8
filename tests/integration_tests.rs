use okhotsk_clean::error::SourceError;
use okhotsk_clean::pipeline::{DANSHUI_FILE, Layout, OKHOTSK_FILE, run};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{TempDir, tempdir};

const FIXTURES: [&str; 5] = [
    "okhotsk.csv",
    "danshui.csv",
    "katsuura.csv",
    "nemuro.csv",
    "yelizovo.csv",
];

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

/// Copies the fixtures into a scratch directory so individual files can be
/// broken per test.
fn scratch_data() -> TempDir {
    let dir = tempdir().expect("temporary directory");
    for name in FIXTURES {
        fs::copy(fixtures_dir().join(name), dir.path().join(name)).expect("fixture copied");
    }
    dir
}

#[test]
fn test_full_pipeline() {
    let out_dir = tempdir().expect("temporary directory");
    let layout = Layout {
        data_dir: fixtures_dir(),
        output: out_dir.path().join("data.csv"),
    };

    let stats = run(&layout).expect("pipeline ran");

    let content = fs::read_to_string(&layout.output).expect("output read");
    assert_eq!(
        content,
        "t,danshui,okhotsk,katsuura,nemuro,yelizovo\n2020-01-02,16.4,0.512,9.3,-2.5,-10.0\n"
    );

    assert_eq!(stats.primary_rows, 5);
    assert_eq!(stats.duplicate_dates, 1);
    // okhotsk is missing on 01-01 and has no row for 01-04
    assert_eq!(stats.missing_auxiliary, vec![2, 0, 0, 0]);
    assert_eq!(stats.out_of_range, 1);
    assert_eq!(stats.joined, 1);
}

#[test]
fn test_bad_value_aborts_with_position() {
    let data = scratch_data();
    let out_dir = tempdir().expect("temporary directory");
    fs::write(
        data.path().join(DANSHUI_FILE),
        "ObsTime,a,b,c,d,e,f,TMin\n2020-01-01,1,2,3,4,5,6,7\n2020-01-02,1,2,3,4,5,6,warm\n",
    )
    .expect("fixture written");

    let layout = Layout {
        data_dir: data.path().to_path_buf(),
        output: out_dir.path().join("data.csv"),
    };
    let err = run(&layout).expect_err("pipeline must fail");

    let chain = format!("{err:#}");
    assert!(chain.contains("reading Danshui station"), "{chain}");
    assert!(chain.contains("line 3, column 8"), "{chain}");
    assert!(chain.contains("invalid number \"warm\""), "{chain}");

    let source = err.downcast_ref::<SourceError>().expect("typed source error");
    assert_eq!(source.line(), Some(3));
    assert!(!layout.output.exists());
}

#[test]
fn test_missing_source_aborts() {
    let data = scratch_data();
    let out_dir = tempdir().expect("temporary directory");
    fs::remove_file(data.path().join(OKHOTSK_FILE)).expect("fixture removed");

    let layout = Layout {
        data_dir: data.path().to_path_buf(),
        output: out_dir.path().join("data.csv"),
    };
    let err = run(&layout).expect_err("pipeline must fail");

    assert!(matches!(err.downcast_ref::<SourceError>(), Some(SourceError::Open { .. })));
    assert!(!layout.output.exists());
}

#[test]
fn test_empty_source_is_header_error() {
    let data = scratch_data();
    let out_dir = tempdir().expect("temporary directory");
    fs::write(data.path().join("nemuro.csv"), "").expect("fixture written");

    let layout = Layout {
        data_dir: data.path().to_path_buf(),
        output: out_dir.path().join("data.csv"),
    };
    let err = run(&layout).expect_err("pipeline must fail");

    assert!(format!("{err:#}").contains("reading Nemuro station"));
    assert!(matches!(err.downcast_ref::<SourceError>(), Some(SourceError::Header { .. })));
}

#[test]
fn test_unwritable_output_fails() {
    let out_dir = tempdir().expect("temporary directory");
    let layout = Layout {
        data_dir: fixtures_dir(),
        output: out_dir.path().join("missing").join("data.csv"),
    };

    let err = run(&layout).expect_err("pipeline must fail");
    assert!(matches!(err.downcast_ref::<SourceError>(), Some(SourceError::Write { .. })));
    assert!(format!("{err:#}").contains("writing merged CSV"));
}
