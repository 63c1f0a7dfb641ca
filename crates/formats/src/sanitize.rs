use std::sync::LazyLock;

use regex::Regex;

static RE_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("regex pattern is valid")
});
static RE_EVENT_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\son\w+\s*=\s*(?:"[^"]*"|'[^']*')"#).expect("regex pattern is valid")
});
static RE_JS_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:href|src)\s*=\s*(?:"\s*javascript:[^"']*"|'\s*javascript:[^"']*')"#)
        .expect("regex pattern is valid")
});

/// Best-effort denylist filter for embedded feature descriptions.
///
/// Removes `<script>` blocks, `on*=` event-handler attributes, and
/// `href`/`src` attributes with a `javascript:` scheme, then trims.
/// This is not an HTML sanitizer; it only suits the bundled datasets.
pub fn sanitize_description_html(raw: &str) -> String {
    let cleaned = RE_SCRIPT.replace_all(raw, "");
    let cleaned = RE_EVENT_ATTR.replace_all(&cleaned, "");
    let cleaned = RE_JS_URL.replace_all(&cleaned, "");
    cleaned.trim().to_string()
}
