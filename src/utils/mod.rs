//! Common utilities and helper functions

const API_PREFIX: &str = "/api/v1";

/// Public URL of a file stored behind the API's file proxy
///
/// `path` is relative (e.g. `images/1739367808_photo.jpg`). Absolute http(s)
/// URLs are returned unchanged; empty paths yield `None`.
pub fn file_url(base_url: &str, path: &str) -> Option<String> {
    if path.is_empty() {
        return None;
    }

    if path.starts_with("http://") || path.starts_with("https://") {
        return Some(path.to_string());
    }

    let base = base_url.trim_end_matches('/');
    let base = base.strip_suffix(API_PREFIX).unwrap_or(base);

    Some(format!(
        "{base}{API_PREFIX}/files/{}",
        path.trim_start_matches('/')
    ))
}

/// Truncate text to at most `max_chars` characters
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_url_relative() {
        assert_eq!(
            file_url("http://localhost:8080/api/v1", "images/1_photo.jpg").as_deref(),
            Some("http://localhost:8080/api/v1/files/images/1_photo.jpg")
        );
        assert_eq!(
            file_url("https://scamguard.example", "/videos/v.mp4").as_deref(),
            Some("https://scamguard.example/api/v1/files/videos/v.mp4")
        );
    }

    #[test]
    fn test_file_url_absolute_and_empty() {
        assert_eq!(
            file_url("http://localhost:8080/api/v1", "https://cdn.example/a.png").as_deref(),
            Some("https://cdn.example/a.png")
        );
        assert_eq!(file_url("http://localhost:8080/api/v1", ""), None);
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("very long text here", 10), "very lo...");
        assert_eq!(truncate_text("мошенничество", 6), "мош...");
    }
}
