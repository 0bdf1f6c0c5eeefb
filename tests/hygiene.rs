//! Hygiene: source-level standards for the importer and CLI.
//!
//! Scans production sources under `src/` (sibling `*_test.rs` files are
//! exempt). Budgets only ever go down. The nonzero ones are pinned to the
//! exact allowed sites: built-in regex literals, env lookups and the CLI's
//! JSON output.

use std::fs;
use std::path::Path;

struct Budget {
    pattern: &'static str,
    max: usize,
    why: &'static str,
}

const BUDGETS: &[Budget] = &[
    // Panics. Only compile-time regex literals may `.expect`.
    Budget { pattern: ".unwrap()", max: 0, why: "propagate or default instead" },
    Budget { pattern: ".expect(", max: 3, why: "built-in regex literals only" },
    Budget { pattern: "panic!(", max: 0, why: "the importer never aborts the host" },
    Budget { pattern: "unreachable!(", max: 0, why: "match exhaustively" },
    Budget { pattern: "todo!(", max: 0, why: "stubs do not ship" },
    Budget { pattern: "unimplemented!(", max: 0, why: "stubs do not ship" },
    // Silent loss. Env lookups fall back to defaults.
    Budget { pattern: "let _ =", max: 0, why: "inspect or log the value" },
    Budget { pattern: ".ok()", max: 3, why: "env lookups in config.rs only" },
    // Output goes through tracing, except the CLI's JSON result.
    Budget { pattern: "println!(", max: 1, why: "CLI JSON output only" },
    Budget { pattern: "eprintln!(", max: 0, why: "use tracing" },
    // Structure.
    Budget { pattern: "#[allow(dead_code)]", max: 0, why: "delete unused code" },
];

struct SourceFile {
    path: String,
    content: String,
}

fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect_rs_files(Path::new("src"), &mut files);
    files
}

fn collect_rs_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_rs_files(&path, out);
            continue;
        }
        let path_str = path.to_string_lossy().to_string();
        if !path_str.ends_with(".rs") || path_str.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

/// Lines containing `pattern`, skipping `//` comments.
fn matching_lines<'a>(file: &'a SourceFile, pattern: &str) -> Vec<&'a str> {
    file.content
        .lines()
        .filter(|line| !line.trim_start().starts_with("//"))
        .filter(|line| line.contains(pattern))
        .collect()
}

fn hits(files: &[SourceFile], pattern: &str) -> Vec<(String, usize)> {
    files
        .iter()
        .filter_map(|file| {
            let count = matching_lines(file, pattern).len();
            (count > 0).then(|| (file.path.clone(), count))
        })
        .collect()
}

#[test]
fn source_tree_is_not_empty() {
    let files = source_files();
    assert!(files.iter().any(|f| f.path.ends_with("lib.rs")));
    assert!(files.iter().any(|f| f.path.ends_with("main.rs")));
}

#[test]
fn budgets_hold() {
    let files = source_files();
    let mut failures = Vec::new();
    for budget in BUDGETS {
        let found = hits(&files, budget.pattern);
        let count: usize = found.iter().map(|(_, c)| c).sum();
        if count > budget.max {
            let detail: Vec<String> = found.iter().map(|(path, c)| format!("    {path}: {c}")).collect();
            failures.push(format!(
                "`{}` found {count}, max {} ({})\n{}",
                budget.pattern,
                budget.max,
                budget.why,
                detail.join("\n")
            ));
        }
    }
    assert!(failures.is_empty(), "hygiene budgets exceeded:\n{}", failures.join("\n"));
}

#[test]
fn expects_only_guard_regex_literals() {
    for file in source_files() {
        for line in matching_lines(&file, ".expect(") {
            assert!(
                line.contains("Regex::new(") && line.contains(".expect(\"valid "),
                "{}: `.expect` outside a built-in regex: {}",
                file.path,
                line.trim()
            );
        }
    }
}

#[test]
fn printing_stays_in_the_cli() {
    for file in source_files() {
        if !matching_lines(&file, "println!(").is_empty() {
            assert!(file.path.ends_with("main.rs"), "{} prints; use tracing", file.path);
        }
    }
}
