use std::collections::HashSet;

use regex::Regex;

/// Excel's limit on worksheet name length, in characters.
pub const MAX_SHEET_NAME_CHARS: usize = 31;

const FALLBACK_SHEET_NAME: &str = "Sheet";

/// Hands out worksheet names that Excel accepts, unique within a workbook
/// (Excel compares them case-insensitively).
pub struct SheetNamer {
    invalid: Regex,
    used: HashSet<String>,
}

impl SheetNamer {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            invalid: Regex::new(r"[\[\]:*?/\\]")?,
            used: HashSet::new(),
        })
    }

    pub fn sanitize(&self, name: &str) -> String {
        let cleaned = self.invalid.replace_all(name, "-");
        let trimmed = tidy(&cleaned);
        if trimmed.is_empty() {
            return FALLBACK_SHEET_NAME.to_string();
        }
        tidy(&truncate_chars(trimmed, MAX_SHEET_NAME_CHARS)).to_string()
    }

    pub fn unique(&mut self, name: &str) -> String {
        let base = self.sanitize(name);
        let mut candidate = base.clone();
        let mut counter = 2;

        while self.used.contains(&candidate.to_lowercase()) {
            let suffix = format!(" ({})", counter);
            let room = MAX_SHEET_NAME_CHARS - suffix.chars().count();
            candidate = format!("{}{}", tidy(&truncate_chars(&base, room)), suffix);
            counter += 1;
        }

        self.used.insert(candidate.to_lowercase());
        candidate
    }
}

/// Excel rejects names that start or end with an apostrophe.
fn tidy(value: &str) -> &str {
    value.trim_matches(|c: char| c == '\'' || c.is_whitespace())
}

fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_characters_replaced() {
        let namer = SheetNamer::new().unwrap();
        assert_eq!(namer.sanitize("Bedah/Mulut [A]: *?"), "Bedah-Mulut -A-- --");
        assert_eq!(namer.sanitize("  "), "Sheet");
        assert_eq!(namer.sanitize("'Ortho'"), "Ortho");
    }

    #[test]
    fn test_long_names_truncated() {
        let namer = SheetNamer::new().unwrap();
        let name = namer.sanitize("Konservasi Gigi dan Endodontik Lanjutan");
        assert_eq!(name, "Konservasi Gigi dan Endodontik");

        let name = namer.sanitize("Kedokteran Gigi Anak dan Ortodonsia");
        assert_eq!(name.chars().count(), MAX_SHEET_NAME_CHARS);
    }

    #[test]
    fn test_apostrophe_left_by_truncation_is_trimmed() {
        let mut namer = SheetNamer::new().unwrap();
        let name = format!("{}'B", "A".repeat(30));

        let first = namer.unique(&name);
        assert_eq!(first, "A".repeat(30));

        let second = namer.unique(&name);
        assert_eq!(second, format!("{} (2)", "A".repeat(27)));
    }

    #[test]
    fn test_duplicates_numbered_case_insensitively() {
        let mut namer = SheetNamer::new().unwrap();
        assert_eq!(namer.unique("Ortho"), "Ortho");
        assert_eq!(namer.unique("ortho"), "ortho (2)");
        assert_eq!(namer.unique("Ortho"), "Ortho (3)");

        let long = "Konservasi Gigi dan Endodontik Lanjutan";
        let first = namer.unique(long);
        let second = namer.unique(long);
        assert_ne!(first, second);
        assert!(second.ends_with(" (2)"));
        assert!(second.chars().count() <= MAX_SHEET_NAME_CHARS);
    }
}
