//! City name normalization
//!
//! Autocomplete labels come back as display strings such as
//! `"Lyon (69000)"` or `"Aix-en-Provence, Bouches-du-Rhône"`. Slugs derived
//! from them name per-city directories in the artifact store, so the
//! normalization must be stable across runs: the same label always resumes
//! into the same directory.

/// Normalizes a city name into a filesystem-safe slug
///
/// # Normalization Steps
///
/// 1. Lowercase the whole name (accented characters are kept)
/// 2. Drop parenthetical qualifiers, e.g. `(69000)` or `(Loire)`
/// 3. Collapse every run of commas and spaces into a single underscore
/// 4. Strip leading and trailing underscores
///
/// # Examples
///
/// ```
/// use immoduel::normalize_city;
///
/// assert_eq!(normalize_city("Lyon (69000)"), "lyon");
/// assert_eq!(normalize_city("Aix en Provence"), "aix_en_provence");
/// ```
pub fn normalize_city(name: &str) -> String {
    let lowered = name.to_lowercase();

    // Step 2: drop parenthetical content, parentheses included
    let mut stripped = String::with_capacity(lowered.len());
    let mut depth: usize = 0;
    for c in lowered.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => stripped.push(c),
            _ => {}
        }
    }

    // Steps 3 and 4: separator runs become one underscore
    let mut slug = String::with_capacity(stripped.len());
    let mut in_separator = false;
    for c in stripped.chars() {
        if c == ',' || c == ' ' {
            if !in_separator {
                slug.push('_');
                in_separator = true;
            }
        } else {
            slug.push(c);
            in_separator = false;
        }
    }

    slug.trim_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parenthetical_is_dropped() {
        assert_eq!(normalize_city("Lyon (69000)"), "lyon");
        assert_eq!(normalize_city("Saint-Étienne (Loire)"), "saint-étienne");
    }

    #[test]
    fn test_spaces_collapse_to_underscore() {
        assert_eq!(normalize_city("Aix en Provence"), "aix_en_provence");
        assert_eq!(normalize_city("Le  Mans"), "le_mans");
    }

    #[test]
    fn test_commas_collapse_with_spaces() {
        assert_eq!(normalize_city("Paris, Île-de-France"), "paris_île-de-france");
        assert_eq!(normalize_city("Nantes , Loire-Atlantique"), "nantes_loire-atlantique");
    }

    #[test]
    fn test_hyphens_are_preserved() {
        assert_eq!(normalize_city("Aix-en-Provence"), "aix-en-provence");
    }

    #[test]
    fn test_no_trailing_underscore() {
        // The separator before the dropped qualifier must not survive
        assert_eq!(normalize_city("Bordeaux (33000) "), "bordeaux");
        assert_eq!(normalize_city(" Marseille"), "marseille");
    }

    #[test]
    fn test_already_clean_name() {
        assert_eq!(normalize_city("toulouse"), "toulouse");
    }

    #[test]
    fn test_unclosed_parenthesis_drops_the_tail() {
        assert_eq!(normalize_city("Lyon (69000"), "lyon");
    }
}
