//! Git operations via the system `git` binary.

pub mod diff;
pub mod exclude;
pub mod repo;
pub mod runner;

pub use diff::{
    DiffContextBuilder, FileStat, UNABLE_TO_PRODUCE_DIFF, build_enhanced_diff_context,
};
pub use exclude::{EXCLUDE_PATTERNS, is_excluded, top_level_pathspec};
pub use repo::{
    current_branch, ensure_work_tree, has_staged_changes, hooks_dir, recent_commit_subjects,
};
pub use runner::{GitRunner, SystemGit};
