//! Hygiene: source-level standards for the canvas core.
//!
//! Scans production sources under `src/` (sibling `*_test.rs` files are
//! exempt) for patterns the crate does not allow. Each pattern has a budget;
//! budgets only ever go down.

use std::fs;
use std::path::Path;

struct Budget {
    pattern: &'static str,
    max: usize,
    why: &'static str,
}

const BUDGETS: &[Budget] = &[
    // Panics.
    Budget { pattern: ".unwrap()", max: 0, why: "propagate or default instead" },
    Budget { pattern: ".expect(", max: 0, why: "propagate or default instead" },
    Budget { pattern: "panic!(", max: 0, why: "the core never aborts the host" },
    Budget { pattern: "unreachable!(", max: 0, why: "match exhaustively" },
    Budget { pattern: "todo!(", max: 0, why: "stubs do not ship" },
    Budget { pattern: "unimplemented!(", max: 0, why: "stubs do not ship" },
    // Silent loss.
    Budget { pattern: "let _ =", max: 0, why: "inspect or log the value" },
    Budget { pattern: ".ok()", max: 0, why: "inspect or log the error" },
    // Output goes through tracing; the library never prints.
    Budget { pattern: "println!(", max: 0, why: "use tracing" },
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

/// Per-file count of lines containing `pattern`, skipping `//` comments.
fn hits(files: &[SourceFile], pattern: &str) -> Vec<(String, usize)> {
    files
        .iter()
        .filter_map(|file| {
            let count = file
                .content
                .lines()
                .filter(|line| !line.trim_start().starts_with("//"))
                .filter(|line| line.contains(pattern))
                .count();
            (count > 0).then(|| (file.path.clone(), count))
        })
        .collect()
}

#[test]
fn source_tree_is_not_empty() {
    assert!(source_files().iter().any(|f| f.path.ends_with("lib.rs")));
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
