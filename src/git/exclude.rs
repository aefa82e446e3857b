//! Paths that never reach the diff context: build output, lockfiles,
//! caches, VCS and IDE metadata.

use glob::{MatchOptions, Pattern};

/// Fixed exclusion list, passed to git as `:(top,exclude)<pattern>` pathspecs.
pub const EXCLUDE_PATTERNS: &[&str] = &[
    // JavaScript / TypeScript
    "node_modules",
    ".next",
    "dist",
    "build",
    ".turbo",
    ".expo",
    "bun.lockb",
    "pnpm-lock.yaml",
    "yarn.lock",
    "package-lock.json",
    // Python
    "__pycache__",
    "*.pyc",
    "*.pyo",
    ".pytest_cache",
    ".mypy_cache",
    "env",
    "venv",
    ".venv",
    // Go
    "bin",
    "pkg",
    "*.test",
    "go.sum",
    // Rust
    "target",
    "Cargo.lock",
    // Java
    "out",
    "*.class",
    "*.jar",
    "*.war",
    "*.ear",
    // C / C++
    "a.out",
    "*.o",
    "*.so",
    "cmake-build-*",
    "CMakeFiles",
    "Makefile",
    // PHP
    "vendor",
    // Ruby
    "Gemfile.lock",
    ".bundle",
    // Swift
    ".swiftpm",
    ".build",
    // Docker & infra
    ".docker",
    ".cache",
    ".terraform",
    "terraform.tfstate*",
    // IDE
    ".idea",
    ".vscode",
    // Misc
    ".git",
    ".gitignore",
    ".vercel",
    ".netlify",
    ".DS_Store",
    "Thumbs.db",
    "coverage",
    "logs",
    "*.log",
    "*.tmp",
    "*.min.js",
    "*.min.css",
];

/// `:(top,exclude)<pattern>` pathspec arguments for every excluded pattern.
///
/// `top` anchors each pattern at the repository root, so the exclusions hold
/// when git runs from a subdirectory.
pub fn exclude_pathspecs() -> Vec<String> {
    EXCLUDE_PATTERNS
        .iter()
        .map(|p| format!(":(top,exclude){p}"))
        .collect()
}

/// Pathspec naming exactly one root-relative path, wherever git runs from.
pub fn top_level_pathspec(path: &str) -> String {
    format!(":(top,literal){path}")
}

/// Whether `path` is matched by any exclusion pattern.
///
/// Mirrors git's default pathspec matching so output from a git that ignored
/// the pathspecs is still filtered: literal patterns match the path itself or
/// anything beneath it, wildcard patterns match the whole path with `*`
/// allowed to cross `/`.
pub fn is_excluded(path: &str) -> bool {
    let path = path.trim_start_matches("./");
    EXCLUDE_PATTERNS.iter().any(|pattern| matches_pattern(pattern, path))
}

fn matches_pattern(pattern: &str, path: &str) -> bool {
    if pattern.contains(['*', '?', '[']) {
        let options = MatchOptions {
            case_sensitive: true,
            require_literal_separator: false,
            require_literal_leading_dot: false,
        };
        return Pattern::new(pattern)
            .map(|p| p.matches_with(path, options))
            .unwrap_or(false);
    }

    path == pattern
        || path
            .strip_prefix(pattern)
            .is_some_and(|rest| rest.starts_with('/'))
}
