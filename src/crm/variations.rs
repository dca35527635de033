//! Company name variations for CRM name search.

use std::collections::HashSet;

/// Business suffixes stripped during normalization, tried in order.
const NAME_SUFFIXES: [&str; 20] = [
    "Inc.",
    "Inc",
    "LLC.",
    "LLC",
    "Corp.",
    "Corp",
    "Ltd.",
    "Ltd",
    "Co.",
    "Co",
    "Group",
    "Companies",
    "Company",
    "Realty",
    "Corporation",
    "Limited",
    "Solutions",
    "Technologies",
    "Technology",
    "Services",
];

/// Words too generic to search on their own: connectors, business
/// suffixes, and industry terms that would match half the CRM.
const GENERIC_WORDS: [&str; 59] = [
    "by",
    "and",
    "the",
    "of",
    "for",
    "with",
    "at",
    "in",
    "on",
    "inc",
    "llc",
    "corp",
    "ltd",
    "co",
    "group",
    "company",
    "companies",
    "energy",
    "power",
    "data",
    "center",
    "centers",
    "solutions",
    "services",
    "systems",
    "technologies",
    "technology",
    "infrastructure",
    "management",
    "consulting",
    "construction",
    "engineering",
    "development",
    "capital",
    "realty",
    "real",
    "estate",
    "properties",
    "facility",
    "facilities",
    "mobile",
    "wireless",
    "network",
    "networks",
    "communications",
    "telecom",
    "cloud",
    "internet",
    "digital",
    "software",
    "hardware",
    "tech",
    "it",
    "automation",
    "security",
    "controls",
    "global",
    "international",
    "national",
];

/// Generates search-friendly variations of a company name.
///
/// The CRM name search runs each variation in turn, so ordering matters:
/// the full name comes first and single words last.
#[derive(Debug)]
pub struct CompanyVariationGenerator {
    generic_words: HashSet<&'static str>,
}

impl Default for CompanyVariationGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CompanyVariationGenerator {
    pub fn new() -> Self {
        Self {
            generic_words: GENERIC_WORDS.into_iter().collect(),
        }
    }

    /// Strip one trailing business suffix and clean punctuation.
    ///
    /// Only the first matching suffix is removed, so a name whose last
    /// word before the suffix is itself on the suffix list survives:
    /// "Advanced Cooling Technologies, Inc." normalizes to
    /// "Advanced Cooling Technologies", not "Advanced Cooling".
    pub fn normalize(&self, company: &str) -> String {
        let mut normalized = company.trim().to_string();

        'suffixes: for suffix in NAME_SUFFIXES {
            for pattern in [
                format!(", {suffix}"),
                format!(" {suffix}"),
                format!(",{suffix}"),
            ] {
                if ends_with_ignore_ascii_case(&normalized, &pattern) {
                    normalized.truncate(normalized.len() - pattern.len());
                    normalized = normalized.trim().to_string();
                    break 'suffixes;
                }
            }
        }

        let depunctuated = normalized.replace([',', '.'], "");
        depunctuated.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// All variations for a company name, deduplicated, order preserved.
    ///
    /// Order: the name as given, the normalized form, word combinations
    /// (first two, first and last, last two), then individual words of
    /// three or more characters that aren't generic.
    pub fn variations(&self, company: &str) -> Vec<String> {
        let mut variations: Vec<String> = vec![company.to_string()];

        let cleaned = self.normalize(company);
        if cleaned != company {
            variations.push(cleaned.clone());
        }

        let words: Vec<&str> = cleaned.split_whitespace().collect();
        if words.len() >= 2 {
            variations.push(words[..2].join(" "));
            if words.len() >= 3 {
                variations.push(format!("{} {}", words[0], words[words.len() - 1]));
                variations.push(words[words.len() - 2..].join(" "));
            }
        }

        for word in &words {
            if word.len() >= 3 && !self.generic_words.contains(word.to_lowercase().as_str()) {
                variations.push((*word).to_string());
            }
        }

        let mut seen = HashSet::new();
        variations
            .into_iter()
            .filter(|v| !v.is_empty() && seen.insert(v.clone()))
            .collect()
    }
}

fn ends_with_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    haystack.len() >= needle.len()
        && haystack.is_char_boundary(haystack.len() - needle.len())
        && haystack[haystack.len() - needle.len()..].eq_ignore_ascii_case(needle)
}
