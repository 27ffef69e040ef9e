use std::{fs, io::Cursor};

use quill::interpret;
use walkdir::WalkDir;

/// Runs every script under `tests/scripts/` and compares its output with
/// the `.out` file sitting next to it.
#[test]
fn script_files_produce_expected_output() {
    let mut count = 0;

    for entry in
        WalkDir::new("tests/scripts").into_iter()
                                     .filter_map(Result::ok)
                                     .filter(|e| e.path().extension().is_some_and(|ext| ext == "ql"))
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        let expected_path = path.with_extension("out");
        let expected = fs::read_to_string(&expected_path).unwrap_or_else(|e| {
                           panic!("Failed to read expected output {expected_path:?}: {e}")
                       });

        let mut output = Vec::new();
        let ok = interpret(Cursor::new(source.as_str()), &mut output);
        let text = String::from_utf8(output).expect("script output was not UTF-8");
        assert!(ok, "script {path:?} failed:\n{text}");
        assert_eq!(text, expected, "script {path:?} produced unexpected output");

        count += 1;
    }

    assert!(count > 0, "No scripts found in tests/scripts");
}
