use super::generator::MalformedInput;

const SEPARATOR: char = '/';

/// Strips exactly one trailing `/` from `base_uri`.
///
/// Anything else, including a second trailing separator, is left alone.
pub fn normalize_base_uri(base_uri: &str) -> Result<&str, MalformedInput> {
    if base_uri.is_empty() {
        return Err(MalformedInput::EmptyBaseUri);
    }

    let end = base_uri.len() - usize::from(base_uri.ends_with(SEPARATOR));
    Ok(&base_uri[..end])
}

/// Joins a normalized base URI and a resolved template path with a single separator.
pub fn template_address(base_uri: &str, template_path: &str) -> String {
    if template_path.is_empty() || template_path.starts_with(SEPARATOR) {
        format!("{base_uri}{template_path}")
    } else {
        format!("{base_uri}{SEPARATOR}{template_path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_a_single_trailing_separator() {
        assert_eq!(normalize_base_uri("http://x/").expect("valid"), "http://x");
        assert_eq!(normalize_base_uri("http://x//").expect("valid"), "http://x/");
    }

    #[test]
    fn leaves_uri_without_separator_untouched() {
        assert_eq!(normalize_base_uri("http://x").expect("valid"), "http://x");
        assert_eq!(
            normalize_base_uri("https://docs.example/templates").expect("valid"),
            "https://docs.example/templates"
        );
        assert_eq!(normalize_base_uri("x").expect("valid"), "x");
    }

    #[test]
    fn handles_multibyte_final_character() {
        assert_eq!(
            normalize_base_uri("http://x/vorlagen-ü").expect("valid"),
            "http://x/vorlagen-ü"
        );
        assert_eq!(
            normalize_base_uri("http://x/vorlagen-ü/").expect("valid"),
            "http://x/vorlagen-ü"
        );
    }

    #[test]
    fn rejects_empty_base_uri() {
        assert!(matches!(
            normalize_base_uri(""),
            Err(MalformedInput::EmptyBaseUri)
        ));
    }

    #[test]
    fn trailing_separator_does_not_change_template_address() {
        let with = template_address(normalize_base_uri("http://x/").expect("valid"), "/tpl");
        let without = template_address(normalize_base_uri("http://x").expect("valid"), "/tpl");
        assert_eq!(with, "http://x/tpl");
        assert_eq!(with, without);
    }

    #[test]
    fn relative_template_path_gets_a_separator() {
        assert_eq!(
            template_address("http://x", "pending.html"),
            "http://x/pending.html"
        );
    }
}
