use regex::Regex;
use std::sync::LazyLock;

static INTEGER_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-+]?\d+").expect("integer token pattern is valid"));

/// First signed or unsigned integer in the display text, without a leading
/// `+`. Text with no integer is returned trimmed.
///
/// When a label carries several numbers ("#2 · +3 pts") the first one is
/// taken, so the selector feeding this must point at the points element only.
pub fn normalize_points(raw: &str) -> String {
    let trimmed = raw.trim();
    match INTEGER_TOKEN.find(trimmed) {
        Some(token) => token.as_str().trim_start_matches('+').to_string(),
        None => trimmed.to_string(),
    }
}
