//! Optional cleanup of model output before it is stored.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^```[\w+-]*[ \t]*\r?\n(.*?)\r?\n?```\s*$").expect("fence regex is valid")
});

/// Strip one markdown fence wrapped around the whole response.
///
/// Models sometimes answer with "```python\n...\n```" despite being told not
/// to. Anything that is not a single fenced block, including a reply with
/// several fenced blocks, is returned unchanged.
pub fn strip_code_fence(response: &str) -> String {
    let trimmed = response.trim();
    if let Some(inner) = FENCE_RE.captures(trimmed).and_then(|caps| caps.get(1)) {
        if inner.as_str().lines().any(|line| line.trim_start().starts_with("```")) {
            debug!("Completion holds several fenced blocks, leaving it as is");
            return response.to_string();
        }
        debug!("Stripped markdown fence from completion");
        return format!("{}\n", inner.as_str().trim_end());
    }
    response.to_string()
}
