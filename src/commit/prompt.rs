//! Prompt construction for AI-generated commit messages.

use crate::llm::types::ChatMessage;

/// Diff context beyond this many characters is cut and marked with "...".
pub const MAX_PROMPT_DIFF_CHARS: usize = 6000;

/// Subject length limit given to the model.
pub const DEFAULT_MAX_LENGTH: usize = 120;

/// How many previous subjects are shown to the model.
const PREVIOUS_COMMITS_SHOWN: usize = 3;

const COMMIT_SYSTEM_PROMPT: &str =
    "You are Commitra, an expert AI that generates clean, conventional-style commit messages.";

const HOOK_SYSTEM_PROMPT: &str =
    "You are Commitra. Generate concise and meaningful git commit messages.";

/// Inputs for [`build_commit_prompt`].
#[derive(Debug, Clone)]
pub struct CommitPromptInput<'a> {
    pub diff: &'a str,
    pub branch: &'a str,
    pub last_commits: &'a [String],
    pub locale: &'a str,
    pub max_length: usize,
}

impl<'a> CommitPromptInput<'a> {
    pub fn new(diff: &'a str) -> Self {
        Self {
            diff,
            branch: "",
            last_commits: &[],
            locale: "en",
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

/// Cut `text` to at most `max_chars` characters, appending "..." when cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Build the user prompt asking for one conventional commit subject.
pub fn build_commit_prompt(input: &CommitPromptInput<'_>) -> String {
    let previous = input
        .last_commits
        .iter()
        .take(PREVIOUS_COMMITS_SHOWN)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n- ");
    let short_diff = truncate_chars(input.diff, MAX_PROMPT_DIFF_CHARS);

    format!(
        r#"You are Commitra, a professional AI trained to write conventional git commit messages.

## GOAL
Generate ONE professional, conventional commit message that accurately describes the staged changes.

## CONTEXT
Branch: {branch}
Language: {locale}

Previous commits:
- {previous}

Code changes:
```diff
{short_diff}
```

## CRITICAL RULES
- Return ONLY the commit message (no explanations).
- Format: `type: subject` (NO scope, no extra words).
- Maximum {max_length} characters.
- Use imperative mood (e.g., "add", "fix", "update", not "added" or "fixed").
- Be clear and specific. Describe what changed and why.
- Include the affected component or module if relevant.
- Avoid redundancy with previous commits.

## COMMIT TYPES
- feat: New user-facing feature
- fix: Bug fix
- refactor: Code restructuring or improvement
- docs: Documentation only
- chore: Maintenance or dependency updates
- test: Test updates
- perf: Performance improvement
- build: Build system or dependency changes
- ci: CI/CD pipeline changes
- revert: Revert previous commit

## GOOD EXAMPLES
- feat: add OAuth-based user login flow
- fix: resolve race condition in session validation
- refactor: simplify API handler middleware
- docs: update API usage examples in README
- chore: bump serde to 1.0.200 for security patch

## BAD EXAMPLES
- feat(auth): add login (no scopes allowed)
- updated files
- minor fixes

## OUTPUT
Return only the final commit message line, no markdown, no extra context."#,
        branch = input.branch,
        locale = input.locale,
        max_length = input.max_length,
    )
}

/// System + user messages for the interactive `commit` command.
pub fn commit_messages(prompt: String) -> Vec<ChatMessage> {
    vec![ChatMessage::system(COMMIT_SYSTEM_PROMPT), ChatMessage::user(prompt)]
}

/// System + user messages for the `prepare-commit-msg` hook.
pub fn hook_messages(prompt: String) -> Vec<ChatMessage> {
    vec![ChatMessage::system(HOOK_SYSTEM_PROMPT), ChatMessage::user(prompt)]
}
