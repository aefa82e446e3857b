//! Bounded diff context for the staged change.
//!
//! Produces a single text block (numstat summary plus a handful of hunk
//! snippets) sized for an LLM prompt. Every git failure is swallowed here:
//! the caller always receives some string, falling back to the full diff and
//! finally to [`UNABLE_TO_PRODUCE_DIFF`].

use tracing::{debug, warn};

use super::exclude::{exclude_pathspecs, is_excluded, top_level_pathspec};
use super::runner::{GitRunner, SystemGit};

/// Above this many staged files, snippet extraction is skipped entirely.
pub const LARGE_DIFF_THRESHOLD: usize = 200;

/// Maximum number of files that contribute snippets.
pub const SNIPPET_FILE_LIMIT: usize = 5;

pub const DEFAULT_PER_FILE_MAX_LINES: usize = 25;
pub const DEFAULT_TOTAL_MAX_CHARS: usize = 4000;

/// Number of entries in the "Top modified files" list.
pub const TOP_FILES_LIMIT: usize = 10;

/// Returned when not even the full fallback diff could be produced.
pub const UNABLE_TO_PRODUCE_DIFF: &str = "Unable to produce diff.";

const SNIPPETS_HEADER: &str = "Context snippets (truncated):";

/// Per-file line counts from `git diff --numstat`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStat {
    pub file: String,
    pub additions: usize,
    pub deletions: usize,
    pub total: usize,
}

impl FileStat {
    /// Parse one `additions\tdeletions\tfile` line.
    ///
    /// Non-numeric counts (git prints `-` for binary files) count as zero.
    pub fn parse(line: &str) -> Self {
        let mut parts = line.splitn(3, '\t');
        let additions = parse_count(parts.next());
        let deletions = parse_count(parts.next());
        let file = parts.next().unwrap_or_default().to_string();

        Self {
            file,
            additions,
            deletions,
            total: additions + deletions,
        }
    }
}

fn parse_count(field: Option<&str>) -> usize {
    field.and_then(|f| f.trim().parse().ok()).unwrap_or(0)
}

/// Aggregate totals over a set of file stats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffTotals {
    pub files: usize,
    pub additions: usize,
    pub deletions: usize,
    pub changes: usize,
}

impl DiffTotals {
    pub fn from_stats(stats: &[FileStat]) -> Self {
        stats.iter().fold(
            DiffTotals {
                files: stats.len(),
                ..Default::default()
            },
            |mut acc, s| {
                acc.additions += s.additions;
                acc.deletions += s.deletions;
                acc.changes += s.total;
                acc
            },
        )
    }
}

/// Stats ordered by total change count, descending.
///
/// The sort is stable: files with equal totals keep their numstat order.
pub fn rank_by_churn(stats: &[FileStat]) -> Vec<&FileStat> {
    let mut ranked: Vec<&FileStat> = stats.iter().collect();
    ranked.sort_by(|a, b| b.total.cmp(&a.total));
    ranked
}

/// Render the human-readable summary block. Empty when there are no stats.
pub fn render_summary(stats: &[FileStat]) -> String {
    if stats.is_empty() {
        return String::new();
    }

    let totals = DiffTotals::from_stats(stats);
    let mut lines = vec![
        format!("Files changed: {}", totals.files),
        format!(
            "Additions: {}, Deletions: {}, Total changes: {}",
            totals.additions, totals.deletions, totals.changes
        ),
        String::new(),
        "Top modified files:".to_string(),
    ];

    lines.extend(
        rank_by_churn(stats)
            .into_iter()
            .take(TOP_FILES_LIMIT)
            .map(|f| {
                format!(
                    "- {} (+{}/-{}, {} changes)",
                    f.file, f.additions, f.deletions, f.total
                )
            }),
    );

    lines.join("\n")
}

/// Keep hunk headers and added/removed lines, at most `max_lines` of them.
fn pick_change_lines(diff: &str, max_lines: usize) -> Vec<&str> {
    let mut picked = Vec::new();

    for line in diff.lines().filter(|l| !l.is_empty()) {
        if picked.len() >= max_lines {
            break;
        }

        let is_hunk = line.starts_with("@@");
        let is_change = (line.starts_with('+') || line.starts_with('-'))
            && !line.starts_with("+++")
            && !line.starts_with("---");

        if is_hunk || is_change {
            picked.push(line);
        }
    }

    picked
}

/// Largest byte index `<= max` that falls on a char boundary of `text`.
fn floor_char_boundary(text: &str, max: usize) -> usize {
    let mut end = max.min(text.len());
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    end
}

/// Builds the staged-change context from git output.
pub struct DiffContextBuilder<G> {
    git: G,
}

impl<G: GitRunner> DiffContextBuilder<G> {
    pub fn new(git: G) -> Self {
        Self { git }
    }

    fn staged_diff_args(&self, mode: &str) -> Vec<String> {
        let mut args = vec![
            "diff".to_string(),
            "--cached".to_string(),
            mode.to_string(),
            "--no-renames".to_string(),
            "--diff-algorithm=minimal".to_string(),
            "--".to_string(),
            // Whole tree, not just the current directory, minus the exclusions.
            ":/".to_string(),
        ];
        args.extend(exclude_pathspecs());
        args
    }

    /// Relative paths staged for the next commit, minus excluded paths.
    ///
    /// A failed git invocation yields an empty list, same as nothing staged.
    pub fn list_staged_files(&self) -> Vec<String> {
        match self.git.run(&self.staged_diff_args("--name-only")) {
            Ok(stdout) => stdout
                .lines()
                .filter(|l| !l.is_empty() && !is_excluded(l))
                .map(str::to_string)
                .collect(),
            Err(e) => {
                debug!("Listing staged files failed: {e}");
                Vec::new()
            }
        }
    }

    /// Numstat records for the staged change, in git's output order.
    pub fn collect_stats(&self) -> Vec<FileStat> {
        match self.git.run(&self.staged_diff_args("--numstat")) {
            Ok(stdout) => stdout
                .lines()
                .filter(|l| !l.is_empty())
                .map(FileStat::parse)
                .filter(|s| !is_excluded(&s.file))
                .collect(),
            Err(e) => {
                debug!("Collecting numstat failed: {e}");
                Vec::new()
            }
        }
    }

    /// Totals plus the top-churn file list, or an empty string on failure.
    pub fn diff_summary(&self) -> String {
        render_summary(&self.collect_stats())
    }

    /// Hunk snippets for up to [`SNIPPET_FILE_LIMIT`] of `files`, in order.
    ///
    /// Each file contributes at most `per_file_max_lines` picked lines. The
    /// returned text, header included, never exceeds `total_max_chars` bytes:
    /// the block that would overflow is cut to the remaining budget and no
    /// further files are read.
    pub fn diff_snippets(
        &self,
        files: &[String],
        per_file_max_lines: usize,
        total_max_chars: usize,
    ) -> String {
        let mut output = SNIPPETS_HEADER.to_string();
        let Some(mut remaining) = total_max_chars.checked_sub(output.len()) else {
            return String::new();
        };
        let mut picked_any = false;

        for file in files.iter().take(SNIPPET_FILE_LIMIT) {
            if remaining == 0 {
                break;
            }

            let args = vec![
                "diff".to_string(),
                "--cached".to_string(),
                "--unified=0".to_string(),
                "--no-renames".to_string(),
                "--".to_string(),
                top_level_pathspec(file),
            ];
            let stdout = match self.git.run(&args) {
                Ok(stdout) => stdout,
                Err(e) => {
                    debug!("Snippet extraction for {file} failed: {e}");
                    return String::new();
                }
            };

            let picked = pick_change_lines(&stdout, per_file_max_lines);
            if picked.is_empty() {
                continue;
            }
            picked_any = true;

            let mut block = format!("\n# {file}");
            for line in picked {
                block.push('\n');
                block.push_str(line);
            }

            if block.len() <= remaining {
                remaining -= block.len();
                output.push_str(&block);
            } else {
                let cut = floor_char_boundary(&block, remaining);
                output.push_str(&block[..cut]);
                remaining = 0;
            }
        }

        if picked_any { output } else { String::new() }
    }

    fn full_diff_fallback(&self) -> String {
        let args = vec![
            "diff".to_string(),
            "--cached".to_string(),
            "--unified=3".to_string(),
        ];
        match self.git.run(&args) {
            Ok(stdout) => format!("FULL DIFF (fallback):\n{stdout}"),
            Err(e) => {
                warn!("Full diff fallback failed: {e}");
                UNABLE_TO_PRODUCE_DIFF.to_string()
            }
        }
    }

    /// Assemble the complete context: summary and snippets, the full diff
    /// when both are empty, or the sentinel when even that fails.
    pub fn build(&self) -> String {
        let files = self.list_staged_files();

        if files.len() > LARGE_DIFF_THRESHOLD {
            let summary = self.diff_summary();
            let summary = if summary.is_empty() {
                "(no summary available)".to_string()
            } else {
                summary
            };

            return [
                "CHANGES SUMMARY (large diff mode):".to_string(),
                summary,
                String::new(),
                format!(
                    "Diff too large ({} files). Detailed snippets were skipped.",
                    files.len()
                ),
                "Only summary is included to avoid performance issues.".to_string(),
            ]
            .join("\n")
            .trim()
            .to_string();
        }

        let stats = self.collect_stats();
        let summary = render_summary(&stats);

        let ranked: Vec<String> = if stats.is_empty() {
            files
        } else {
            rank_by_churn(&stats)
                .into_iter()
                .map(|s| s.file.clone())
                .collect()
        };
        let snippets =
            self.diff_snippets(&ranked, DEFAULT_PER_FILE_MAX_LINES, DEFAULT_TOTAL_MAX_CHARS);

        let mut context = String::new();
        if !summary.is_empty() {
            context.push_str(&format!("CHANGES SUMMARY:\n{summary}\n\n"));
        }
        if !snippets.is_empty() {
            context.push_str(&format!("CODE CONTEXT:\n{snippets}\n\n"));
        }

        if context.trim().is_empty() {
            context = self.full_diff_fallback();
        }

        context.trim().to_string()
    }
}

/// Build the diff context for the repository in the current directory.
pub fn build_enhanced_diff_context() -> String {
    DiffContextBuilder::new(SystemGit::new()).build()
}
