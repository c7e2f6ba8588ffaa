use crate::error::AppResult;
use regex::Regex;
use std::future::Future;

/// Derive a URL-safe slug from free-text input.
///
/// Pure string transform; uniqueness is handled separately by
/// [`ensure_unique_slug`] so this stays testable without a data store.
pub fn generate_slug(title: &str) -> String {
    if title.trim().is_empty() {
        return "untitled".to_string();
    }

    let slug = title.to_lowercase();

    // Remove everything outside [a-z0-9\s-]
    let slug = Regex::new(r"[^a-z0-9\s-]").unwrap().replace_all(&slug, "");

    // Whitespace runs become a single hyphen
    let slug = Regex::new(r"\s+").unwrap().replace_all(&slug, "-");

    // Collapse consecutive hyphens
    let slug = Regex::new(r"-+").unwrap().replace_all(&slug, "-");

    let mut slug = slug.trim_matches('-').to_string();

    if slug.len() > 200 {
        slug.truncate(200);
        slug = slug.trim_end_matches('-').to_string();
    }

    slug
}

/// Disambiguate a candidate slug against existing ones by appending
/// `-1`, `-2`, ... until `exists` reports it free. The collaborator is
/// expected to exclude the entity's own id when checking during updates.
pub async fn ensure_unique_slug<F, Fut>(candidate: &str, exists: F) -> AppResult<String>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = AppResult<bool>>,
{
    if !exists(candidate.to_string()).await? {
        return Ok(candidate.to_string());
    }

    let mut counter = 1u32;
    loop {
        let attempt = format!("{candidate}-{counter}");
        if !exists(attempt.clone()).await? {
            return Ok(attempt);
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_slug_basic() {
        assert_eq!(generate_slug("Hello, World! 2024"), "hello-world-2024");
        assert_eq!(generate_slug("Lahore Food Street"), "lahore-food-street");
    }

    #[test]
    fn test_generate_slug_empty_input() {
        assert_eq!(generate_slug(""), "untitled");
        assert_eq!(generate_slug("   "), "untitled");
    }

    #[test]
    fn test_generate_slug_idempotent() {
        for title in ["Hello, World! 2024", "  Trip -- to   Hunza!  ", "untitled", "a-b-c"] {
            let once = generate_slug(title);
            assert_eq!(generate_slug(&once), once);
        }
    }

    #[test]
    fn test_generate_slug_collapses_separators() {
        assert_eq!(generate_slug("a  -  b"), "a-b");
        assert_eq!(generate_slug("--trip--"), "trip");
        assert_eq!(generate_slug("a\t\n b"), "a-b");
    }

    #[test]
    fn test_generate_slug_output_charset() {
        let slug = generate_slug("Ünïcode & Sym*bols, Ok? 42");
        assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        assert!(!slug.starts_with('-'));
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn test_generate_slug_truncates_to_200() {
        let long = "word ".repeat(100);
        let slug = generate_slug(&long);
        assert!(slug.len() <= 200);
        assert!(!slug.ends_with('-'));
    }

    #[tokio::test]
    async fn test_ensure_unique_slug_free_candidate() {
        let taken: HashSet<String> = HashSet::new();
        let slug = ensure_unique_slug("trip", |s| {
            let hit = taken.contains(&s);
            async move { Ok(hit) }
        })
        .await
        .unwrap();
        assert_eq!(slug, "trip");
    }

    #[tokio::test]
    async fn test_ensure_unique_slug_appends_counter() {
        let taken: HashSet<String> =
            ["trip".to_string(), "trip-1".to_string()].into_iter().collect();
        let slug = ensure_unique_slug("trip", |s| {
            let hit = taken.contains(&s);
            async move { Ok(hit) }
        })
        .await
        .unwrap();
        assert_eq!(slug, "trip-2");
    }
}
