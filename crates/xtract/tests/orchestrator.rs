//! End-to-end runs over fake game installations.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use xtract::prelude::*;
use xtract::{Error, ExpansionCatalog};

/// Write `<dir>/<name>.cat` and, if given, `<dir>/<name>.dat` from
/// `(path, payload)` records.
fn write_pair(dir: &Path, name: &str, records: &[(&str, &str)], data: bool) {
    fs::create_dir_all(dir).unwrap();

    let mut index = String::new();
    let mut payload = Vec::new();
    for (path, bytes) in records {
        index.push_str(&format!("{path} {} 1700000000 0123456789abcdef\n", bytes.len()));
        payload.extend_from_slice(bytes.as_bytes());
    }

    fs::write(dir.join(format!("{name}.cat")), index).unwrap();
    if data {
        fs::write(dir.join(format!("{name}.dat")), payload).unwrap();
    }
}

/// Read every file below `root` into a map keyed by relative path.
fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    fn walk(root: &Path, dir: &Path, out: &mut BTreeMap<PathBuf, Vec<u8>>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let relative = path.strip_prefix(root).unwrap().to_path_buf();
                out.insert(relative, fs::read(&path).unwrap());
            }
        }
    }

    let mut out = BTreeMap::new();
    walk(root, root, &mut out);
    out
}

#[derive(Default)]
struct Recorder {
    begun: Mutex<Vec<(String, u64)>>,
    advanced: Mutex<Vec<(String, String)>>,
}

impl ProgressSink for Recorder {
    fn begin(&self, target: &str, total: u64) {
        self.begun.lock().push((target.to_string(), total));
    }

    fn advance(&self, target: &str, current: &str) {
        self.advanced.lock().push((target.to_string(), current.to_string()));
    }
}

fn xml_options(source: &Path, output: &Path) -> ExtractOptions {
    ExtractOptions::new(source, output, ExtensionFilter::parse("xml"))
}

#[test]
fn test_base_only() {
    let dir = tempfile::tempdir().unwrap();
    let game = dir.path().join("game");
    write_pair(&game, "01", &[("test.xml", "data"), ("skip.dds", "....")], true);
    let out = dir.path().join("out");

    let report = Orchestrator::new(xml_options(&game, &out)).run(&NoProgress).unwrap();

    assert!(report.is_complete());
    assert_eq!(report.files_written(), 1);
    assert_eq!(fs::read(out.join("test.xml")).unwrap(), b"data");
    assert!(!out.join("skip.dds").exists());
}

#[test]
fn test_with_expansions() {
    let dir = tempfile::tempdir().unwrap();
    let game = dir.path().join("game");
    write_pair(&game, "base", &[("file1.xml", "ABCDE")], true);
    let boron = game.join("extensions/ego_dlc_boron");
    write_pair(&boron, "ext_01", &[("exp/file2.xml", "xyz")], true);
    let out = dir.path().join("out");

    let report = Orchestrator::new(xml_options(&game, &out).with_expansions(true))
        .run(&NoProgress)
        .unwrap();

    assert!(report.is_complete());
    assert_eq!(report.completed.len(), 2);
    assert_eq!(fs::read(out.join("file1.xml")).unwrap(), b"ABCDE");
    assert_eq!(fs::read(out.join("ego_dlc_boron/exp/file2.xml")).unwrap(), b"xyz");
}

#[test]
fn test_expansions_requested_without_directory() {
    let dir = tempfile::tempdir().unwrap();
    let game = dir.path().join("game");
    write_pair(&game, "base", &[("test.xml", "data")], true);
    let out = dir.path().join("out");

    let report = Orchestrator::new(xml_options(&game, &out).with_expansions(true))
        .run(&NoProgress)
        .unwrap();

    assert_eq!(report.completed.len(), 1);
    assert_eq!(fs::read(out.join("test.xml")).unwrap(), b"data");
}

#[test]
fn test_expansions_not_requested() {
    let dir = tempfile::tempdir().unwrap();
    let game = dir.path().join("game");
    write_pair(&game, "base", &[("test.xml", "data")], true);
    write_pair(&game.join("extensions/ego_dlc_split"), "ext_01", &[("dlc.xml", "dlc")], true);
    let out = dir.path().join("out");

    let report = Orchestrator::new(xml_options(&game, &out)).run(&NoProgress).unwrap();

    assert_eq!(report.completed.len(), 1);
    assert!(!out.join("ego_dlc_split").exists());
}

#[test]
fn test_include_specific_files() {
    let dir = tempfile::tempdir().unwrap();
    let game = dir.path().join("game");
    write_pair(&game, "01", &[("file1.xml", "data1")], true);
    write_pair(&game, "02", &[("file2.xml", "data2")], true);
    let out = dir.path().join("out");

    Orchestrator::new(xml_options(&game, &out).with_include(["01.cat"]))
        .run(&NoProgress)
        .unwrap();

    assert_eq!(fs::read(out.join("file1.xml")).unwrap(), b"data1");
    assert!(!out.join("file2.xml").exists());
}

#[test]
fn test_missing_data_file_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let game = dir.path().join("game");
    write_pair(&game, "broken", &[("file.xml", "data")], false);
    let out = dir.path().join("out");

    let report = Orchestrator::new(xml_options(&game, &out)).run(&NoProgress).unwrap();

    assert!(report.is_complete());
    assert_eq!(report.completed[0].missing_data, 1);
    assert_eq!(report.files_written(), 0);
}

#[test]
fn test_failing_expansion_does_not_affect_siblings() {
    let dir = tempfile::tempdir().unwrap();
    let game = dir.path().join("game");
    write_pair(&game, "01", &[("md/base.xml", "base")], true);

    let split = game.join("extensions/ego_dlc_split");
    write_pair(&split, "ext_01", &[("md/split.xml", "split")], true);
    // Data file shorter than the index claims.
    fs::write(split.join("ext_01.dat"), b"sp").unwrap();

    let terran = game.join("extensions/ego_dlc_terran");
    write_pair(&terran, "ext_01", &[("md/terran.xml", "terran")], true);

    // No cat files at all.
    fs::create_dir_all(game.join("extensions/ego_dlc_pirate")).unwrap();

    let out = dir.path().join("out");
    let recorder = Recorder::default();

    let report = Orchestrator::new(xml_options(&game, &out).with_expansions(true))
        .run(&recorder)
        .unwrap();

    let completed: Vec<_> = report.completed.iter().map(|r| r.target.as_str()).collect();
    assert_eq!(completed, vec!["base", "ego_dlc_split", "ego_dlc_terran"]);
    assert_eq!(report.completed[1].failed_pairs, 1);

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].target, "ego_dlc_pirate");
    assert!(matches!(
        report.failed[0].error,
        Error::Cat(xtract::cat::Error::NoArchivesFound(_))
    ));

    let files = snapshot(&out);
    let paths: Vec<_> = files.keys().map(|p| p.to_string_lossy().replace('\\', "/")).collect();
    assert_eq!(paths, vec!["ego_dlc_terran/md/terran.xml", "md/base.xml"]);

    let mut begun = recorder.begun.lock().clone();
    begun.sort();
    assert_eq!(
        begun,
        vec![
            ("Base game".to_string(), 1),
            ("Cradle of Humanity".to_string(), 1),
            ("Split Vendetta".to_string(), 1),
        ]
    );
    assert_eq!(recorder.advanced.lock().len(), 3);
}

#[test]
fn test_unknown_expansion_aborts_run() {
    static TABLE: &[(&str, &str)] = &[("ego_dlc_boron", "Kingdom End")];

    let dir = tempfile::tempdir().unwrap();
    let game = dir.path().join("game");
    write_pair(&game, "01", &[("base.xml", "base")], true);
    write_pair(&game.join("extensions/ego_dlc_future"), "ext_01", &[("f.xml", "f")], true);
    let out = dir.path().join("out");

    let options = xml_options(&game, &out)
        .with_expansions(true)
        .with_catalog(ExpansionCatalog::new(TABLE));
    let err = Orchestrator::new(options).run(&NoProgress).unwrap_err();

    assert!(matches!(err, Error::UnknownExpansion(id) if id == "ego_dlc_future"));
    assert!(!out.join("base.xml").exists());
}

#[test]
fn test_empty_base_directory_is_a_failed_target() {
    let dir = tempfile::tempdir().unwrap();
    let game = dir.path().join("game");
    fs::create_dir_all(&game).unwrap();
    let out = dir.path().join("out");

    let report = Orchestrator::new(xml_options(&game, &out)).run(&NoProgress).unwrap();

    assert!(report.completed.is_empty());
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].target, "base");
}

#[test]
fn test_runs_are_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let game = dir.path().join("game");
    write_pair(
        &game,
        "01",
        &[
            ("libraries/wares.xml", "<wares/>"),
            ("assets/ship.xmf", "\x00\x01\x02"),
            ("ui/core/menu.lua", "return {}"),
        ],
        true,
    );
    write_pair(&game, "02", &[("index/macros.xml", "<index/>")], true);
    write_pair(
        &game.join("extensions/ego_dlc_boron"),
        "ext_01",
        &[("libraries/wares.xml", "<diff/>")],
        true,
    );

    let options = |out: &Path| {
        ExtractOptions::new(&game, out, ExtensionFilter::parse("xml, lua")).with_expansions(true)
    };
    let first = dir.path().join("first");
    let second = dir.path().join("second");

    Orchestrator::new(options(&first)).run(&NoProgress).unwrap();
    Orchestrator::new(options(&second).with_jobs(1)).run(&NoProgress).unwrap();

    let first = snapshot(&first);
    assert_eq!(first.len(), 4);
    assert_eq!(first, snapshot(&second));
}
