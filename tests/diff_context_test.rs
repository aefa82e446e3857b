//! End-to-end tests for the diff context builder against real repositories.

mod common;

use commitra::git::repo::{current_branch, has_staged_changes, recent_commit_subjects};
use commitra::git::{DiffContextBuilder, SystemGit, UNABLE_TO_PRODUCE_DIFF};

use common::{TestRepo, numbered_lines};

#[test]
fn test_summary_and_snippets_for_small_change() {
    let repo = TestRepo::with_initial_commit();
    repo.write_staged("src/lib.rs", &numbered_lines("line", 3));
    repo.write_staged("src/main.rs", "fn main() {}\n");

    let context = DiffContextBuilder::new(repo.git()).build();

    assert!(context.starts_with("CHANGES SUMMARY:\nFiles changed: 2"));
    assert!(context.contains("Additions: 4, Deletions: 0, Total changes: 4"));
    assert!(context.contains("- src/lib.rs (+3/-0, 3 changes)"));
    assert!(context.contains("CODE CONTEXT:\nContext snippets (truncated):\n# src/lib.rs\n@@"));
    assert!(context.contains("+fn main() {}"));

    // lib.rs has more churn, so it is listed and snippeted first
    let lib = context.find("# src/lib.rs").unwrap();
    let main = context.find("# src/main.rs").unwrap();
    assert!(lib < main);
}

#[test]
fn test_excluded_paths_never_listed() {
    let repo = TestRepo::with_initial_commit();
    repo.write_staged("Cargo.lock", "# lock\n");
    repo.write_staged("node_modules/pkg/index.js", "module.exports = 1;\n");
    repo.write_staged("dist/bundle.js", "var x;\n");
    repo.write_staged("src/app.rs", "pub fn app() {}\n");

    let builder = DiffContextBuilder::new(repo.git());
    assert_eq!(builder.list_staged_files(), vec!["src/app.rs".to_string()]);

    let context = builder.build();
    assert!(context.contains("Files changed: 1"));
    assert!(!context.contains("Cargo.lock"));
    assert!(!context.contains("node_modules"));
    assert!(!context.contains("dist/bundle.js"));
}

#[test]
fn test_context_from_subdirectory_matches_root() {
    let repo = TestRepo::with_initial_commit();
    repo.write_staged("src/lib.rs", &numbered_lines("line", 3));
    repo.write_staged("node_modules/pkg/index.js", "module.exports = 1;\n");

    let root = DiffContextBuilder::new(repo.git()).build();
    let sub = DiffContextBuilder::new(repo.git_in("src")).build();

    assert!(sub.contains("CODE CONTEXT:\nContext snippets (truncated):\n# src/lib.rs\n@@ -0,0 +1,3 @@"));
    assert!(!sub.contains("node_modules"));
    assert_eq!(sub, root);
}

#[test]
fn test_staged_files_from_subdirectory_cover_whole_tree() {
    let repo = TestRepo::with_initial_commit();
    repo.write_staged("src/lib.rs", "pub fn lib() {}\n");
    repo.write_staged("docs/guide.md", "# guide\n");

    let files = DiffContextBuilder::new(repo.git_in("src")).list_staged_files();
    assert_eq!(files, vec!["docs/guide.md".to_string(), "src/lib.rs".to_string()]);
}

#[test]
fn test_renamed_file_gets_snippet_under_new_path() {
    let repo = TestRepo::new();
    repo.write_staged("src/old_name.rs", "fn one() {}\n");
    repo.commit("feat: add old_name");

    repo.remove_staged("src/old_name.rs");
    repo.write_staged("src/new_name.rs", "fn one() {}\nfn two() {}\n");

    let context = DiffContextBuilder::new(repo.git()).build();

    assert!(!context.contains("=>"));
    assert!(context.contains("- src/new_name.rs (+2/-0, 2 changes)"));
    assert!(context.contains("CODE CONTEXT:"));
    assert!(context.contains("# src/new_name.rs\n@@"));
    assert!(context.contains("+fn two() {}"));
}

#[test]
fn test_deletions_are_counted() {
    let repo = TestRepo::new();
    repo.write_staged("notes.txt", &numbered_lines("note", 5));
    repo.commit("docs: add notes");

    repo.write_staged("notes.txt", "note 1\n");

    let summary = DiffContextBuilder::new(repo.git()).diff_summary();
    assert!(summary.contains("Additions: 0, Deletions: 4, Total changes: 4"));
}

#[test]
fn test_snippets_respect_line_cap() {
    let repo = TestRepo::with_initial_commit();
    repo.write_staged("big.txt", &numbered_lines("row", 100));

    let snippets = DiffContextBuilder::new(repo.git()).diff_snippets(&["big.txt".to_string()], 10, 4000);

    let body_lines = snippets.lines().skip(2).count();
    assert_eq!(body_lines, 10);
    assert!(snippets.contains("+row 9"));
    assert!(!snippets.contains("+row 10\n"));
}

#[test]
fn test_snippets_respect_char_budget() {
    let repo = TestRepo::with_initial_commit();
    for name in ["a.txt", "b.txt", "c.txt"] {
        repo.write_staged(name, &numbered_lines("some fairly long line of content", 30));
    }

    let files: Vec<String> = ["a.txt", "b.txt", "c.txt"].map(String::from).to_vec();
    let snippets = DiffContextBuilder::new(repo.git()).diff_snippets(&files, 25, 300);

    assert_eq!(snippets.len(), 300);
    assert!(!snippets.contains("# b.txt"));
}

#[test]
fn test_nothing_staged_falls_back_to_empty_full_diff() {
    let repo = TestRepo::with_initial_commit();

    let context = DiffContextBuilder::new(repo.git()).build();
    assert_eq!(context, "FULL DIFF (fallback):");
}

#[test]
fn test_outside_repository_yields_sentinel() {
    let dir = tempfile::tempdir().unwrap();

    let context = DiffContextBuilder::new(SystemGit::in_dir(dir.path())).build();
    assert_eq!(context, UNABLE_TO_PRODUCE_DIFF);
}

#[test]
fn test_repo_metadata_helpers() {
    let repo = TestRepo::new();
    let git = repo.git();

    assert!(recent_commit_subjects(&git).is_empty());
    assert!(!has_staged_changes(&git));

    repo.write_staged("a.txt", "a\n");
    assert!(has_staged_changes(&git));
    repo.commit("feat: first");

    repo.write_staged("a.txt", "b\n");
    repo.commit("fix: second");

    assert_eq!(
        recent_commit_subjects(&git),
        vec!["fix: second".to_string(), "feat: first".to_string()]
    );
    assert!(!current_branch(&git).is_empty());
}
