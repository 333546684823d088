//! Slug generation for application pages.

use uuid::Uuid;

/// Upper bound on slug length, in characters.
pub const MAX_SLUG_LEN: usize = 50;

/// Prefix used when the inputs contain nothing slug-worthy.
const FALLBACK_PREFIX: &str = "application";

/// Derives a URL-safe slug from company name and role title.
///
/// Pure and deterministic. Case folding is ASCII-only, so every non-ASCII
/// character becomes a separator. Returns an empty string when neither input
/// has an ASCII letter or digit.
pub fn slugify(company_name: &str, role_title: &str) -> String {
    let joined = format!("{company_name}-{role_title}").to_ascii_lowercase();

    let mut slug = String::with_capacity(joined.len());
    for c in joined.chars() {
        let c = if c.is_ascii_lowercase() || c.is_ascii_digit() {
            c
        } else {
            '-'
        };
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }

    let trimmed = slug.trim_matches('-');
    // Only ASCII survives the loop above, so byte slicing is on char boundaries.
    let truncated = &trimmed[..trimmed.len().min(MAX_SLUG_LEN)];
    truncated.trim_end_matches('-').to_string()
}

/// Like [`slugify`], but never returns an empty slug: when the inputs reduce
/// to nothing, a random `application-xxxxxxxx` identifier is generated.
pub fn slug_or_fallback(company_name: &str, role_title: &str) -> String {
    let slug = slugify(company_name, role_title);
    if !slug.is_empty() {
        return slug;
    }

    let id = Uuid::new_v4().simple().to_string();
    let fallback = format!("{FALLBACK_PREFIX}-{}", &id[..8]);
    tracing::warn!(
        "Inputs produced an empty slug; using generated identifier {}",
        fallback
    );
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_well_formed(slug: &str) -> bool {
        !slug.is_empty()
            && !slug.starts_with('-')
            && !slug.ends_with('-')
            && !slug.contains("--")
            && slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }

    #[test]
    fn test_basic_slug() {
        assert_eq!(
            slugify("Acme Corp", "Senior Engineer"),
            "acme-corp-senior-engineer"
        );
    }

    #[test]
    fn test_collapses_runs_and_strips_edges() {
        assert_eq!(slugify("A!!!B", "C D"), "a-b-c-d");
        assert_eq!(slugify("  --Acme--  ", "!!Dev!!"), "acme-dev");
    }

    #[test]
    fn test_deterministic() {
        let a = slugify("Globex Corporation", "Staff Platform Engineer (Remote)");
        let b = slugify("Globex Corporation", "Staff Platform Engineer (Remote)");
        assert_eq!(a, b);
    }

    #[test]
    fn test_truncates_to_max_len_without_trailing_hyphen() {
        let slug = slugify(
            "International Business Machines Corporation",
            "Principal Software Engineer, Distributed Systems",
        );
        assert!(slug.len() <= MAX_SLUG_LEN);
        assert!(is_well_formed(&slug), "malformed slug: {slug}");

        // Character 50 would be a hyphen here; it must not survive truncation.
        let slug = slugify(&"a".repeat(49), "b");
        assert_eq!(slug, "a".repeat(49));
    }

    #[test]
    fn test_non_ascii_becomes_separator() {
        assert_eq!(slugify("Café Zürich", "Développeur"), "caf-z-rich-d-veloppeur");
    }

    #[test]
    fn test_empty_when_no_alphanumerics() {
        assert_eq!(slugify("!!!", "???"), "");
        assert_eq!(slugify("日本", "エンジニア"), "");
    }

    #[test]
    fn test_fallback_only_when_empty() {
        assert_eq!(slug_or_fallback("Acme", "Dev"), "acme-dev");

        let fallback = slug_or_fallback("!!!", "???");
        assert!(fallback.starts_with("application-"));
        assert_eq!(fallback.len(), "application-".len() + 8);
        assert!(is_well_formed(&fallback));
    }

    #[test]
    fn test_output_alphabet_over_assorted_inputs() {
        let inputs = [
            ("O'Reilly & Sons", "Sr. Dev/Ops"),
            ("3M", "R&D Lead #2"),
            ("a", "b"),
            ("UPPER", "lower"),
            ("tab\tsep", "new\nline"),
        ];
        for (company, role) in inputs {
            let slug = slugify(company, role);
            assert!(slug.len() <= MAX_SLUG_LEN);
            assert!(is_well_formed(&slug), "{company:?}/{role:?} -> {slug:?}");
        }
    }
}
