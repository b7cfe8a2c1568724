//! Input sanitization for filenames and free text.
//!
//! Uploaded filenames flow into output metadata (the set name, the manifest
//! `name` field) and free text flows into analyzer prompts, so both are
//! normalized before use.

/// Sanitizes a filename to a safe `[A-Za-z0-9._-]` subset.
///
/// Repeated dots are collapsed, leading dots stripped and the result capped
/// at 255 characters. Empty or all-invalid input becomes `"unnamed"`.
pub fn sanitize_file_name(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    while out.contains("..") {
        out = out.replace("..", ".");
    }
    let out: String = out.trim_start_matches('.').chars().take(255).collect();

    if out.is_empty() {
        "unnamed".to_string()
    } else {
        out
    }
}

/// Returns everything before the first dot of the filename, for manifest
/// naming.
pub fn file_stem(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

/// Sanitizes free text: strips angle brackets, trims, caps length.
pub fn sanitize_text(input: &str, max_len: usize) -> String {
    input
        .chars()
        .filter(|c| *c != '<' && *c != '>')
        .take(max_len)
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_strips_path_traversal() {
        let out = sanitize_file_name("../../etc/passwd");
        assert!(!out.contains('/'));
        assert!(!out.contains(".."));
        assert!(!out.starts_with('.'));

        assert_eq!(sanitize_file_name("..secret"), "secret");
    }

    #[test]
    fn file_name_keeps_safe_characters() {
        assert_eq!(sanitize_file_name("my-logo_v2.png"), "my-logo_v2.png");
    }

    #[test]
    fn file_name_falls_back_when_empty() {
        assert_eq!(sanitize_file_name(""), "unnamed");
        assert_eq!(sanitize_file_name("..."), "unnamed");
    }

    #[test]
    fn file_name_is_length_capped() {
        let long = "a".repeat(400);
        assert_eq!(sanitize_file_name(&long).len(), 255);
    }

    #[test]
    fn stem_drops_extension() {
        assert_eq!(file_stem("logo.png"), "logo");
        assert_eq!(file_stem("noext"), "noext");
    }

    #[test]
    fn text_strips_angle_brackets_and_trims() {
        assert_eq!(sanitize_text("  <script>hi  ", 100), "scripthi");
        assert_eq!(sanitize_text("plain", 3), "pla");
    }
}
