//! File round-trip behavior of the strategy codec

use stratum_strategy::{load, save, serialize, StrategyStore};
use stratum_types::StratumError;

const MESSY_INPUT: &str = "\
# strategies for the 2x4 test cluster
dense2   2  2 4   0 1 2 3 4 5 6 7

dense1 1 8 0 1 2 3 4 5 6 7
embed 1 2 6 7
";

#[test]
fn load_then_save_is_canonical_and_stable() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("messy.strategy");
    std::fs::write(&input, MESSY_INPUT).unwrap();

    let store = load(&input, 8).unwrap();
    assert_eq!(store.len(), 3);

    let first = dir.path().join("first.strategy");
    let second = dir.path().join("second.strategy");
    save(&store, &first).unwrap();
    save(&store, &second).unwrap();

    let first_bytes = std::fs::read(&first).unwrap();
    let second_bytes = std::fs::read(&second).unwrap();
    assert_eq!(first_bytes, second_bytes);

    // canonical output is normalized whitespace in canonical order
    let text = String::from_utf8(first_bytes).unwrap();
    assert_eq!(
        text,
        "embed 1 2 6 7\ndense1 1 8 0 1 2 3 4 5 6 7\ndense2 2 2 4 0 1 2 3 4 5 6 7\n"
    );
}

#[test]
fn reloading_a_saved_store_preserves_every_entry() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.strategy");
    std::fs::write(&input, MESSY_INPUT).unwrap();

    let store = load(&input, 8).unwrap();
    let out = dir.path().join("out.strategy");
    save(&store, &out).unwrap();

    let reloaded = load(&out, 8).unwrap();
    assert_eq!(store, reloaded);

    // and the canonical text itself round-trips byte-for-byte
    assert_eq!(serialize(&store), serialize(&reloaded));
}

#[test]
fn missing_file_is_a_recoverable_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load(dir.path().join("nope.strategy"), 8).unwrap_err();
    assert!(matches!(err, StratumError::Io { .. }));
    assert!(err.is_recoverable());
}

#[test]
fn invalid_line_fails_the_whole_load() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.strategy");
    // second line references device 9 in a pool of 8
    std::fs::write(&input, "good 1 2 0 1\nbad 1 2 8 9\n").unwrap();

    let err = load(&input, 8).unwrap_err();
    match err {
        StratumError::Parse { line, message } => {
            assert_eq!(line, 2);
            assert!(message.contains("outside pool"));
        }
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn empty_store_serializes_to_nothing() {
    assert_eq!(serialize(&StrategyStore::new()), "");
}
