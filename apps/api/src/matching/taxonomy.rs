//! Skill taxonomy normalizer: canonicalizes free-text skill names into
//! comparable tokens.
//!
//! Pipeline: NFKC fold → lower-case → trim → drop separators → synonym lookup.
//! Unknown names pass through as their separator-free, lower-cased form; the
//! matcher treats those as literal-equality tokens. Total: never fails.

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use unicode_normalization::UnicodeNormalization;

/// Compact alias → canonical token.
static SYNONYMS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let table: &[(&str, &[&str])] = &[
        // Languages
        ("javascript", &["js", "ecmascript", "es6", "vanillajs"]),
        ("typescript", &["ts"]),
        ("python", &["py", "python3"]),
        ("golang", &["go", "golanguage"]),
        ("csharp", &["c#", "csharp"]),
        ("cplusplus", &["c++", "cpp"]),
        // Frontend
        ("react", &["reactjs", "react18"]),
        ("nextjs", &["nextjs13", "nextjs14"]),
        ("vue", &["vuejs", "vue3"]),
        ("angular", &["angularjs"]),
        ("tailwind", &["tailwindcss"]),
        ("css", &["css3"]),
        ("sass", &["scss"]),
        ("graphql", &["gql"]),
        // Backend and data stores
        ("nodejs", &["node"]),
        ("postgresql", &["postgres", "psql"]),
        ("mongodb", &["mongo"]),
        // Infrastructure
        ("kubernetes", &["k8s", "kube"]),
        ("aws", &["amazonwebservices"]),
        ("gcp", &["googlecloud", "googlecloudplatform"]),
        // Data science
        ("machinelearning", &["ml"]),
        ("tensorflow", &["tf"]),
        ("pytorch", &["torch"]),
        // Product and design
        ("agile", &["scrum", "agilescrum"]),
        ("userresearch", &["uxresearch"]),
        ("dataanalysis", &["dataanalytics"]),
    ];

    let mut map = HashMap::new();
    for (canonical, aliases) in table {
        map.insert(*canonical, *canonical);
        for alias in *aliases {
            map.insert(*alias, *canonical);
        }
    }
    map
});

fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '.' | '-' | '_' | '/' | ',' | '\'' | '(' | ')' | ':' | ';' | '|')
}

fn fold(input: &str) -> String {
    input.nfkc().collect::<String>().trim().to_lowercase()
}

/// Canonical token for a raw skill name.
///
/// `"Next.js"`, `"NextJS"` and `"next js"` all become `"nextjs"`;
/// `"ReactJS"` becomes `"react"`.
pub fn normalize_skill(raw: &str) -> String {
    let folded = fold(raw);
    let compact: String = folded.chars().filter(|c| !is_separator(*c)).collect();
    if compact.is_empty() {
        return folded;
    }
    match SYNONYMS.get(compact.as_str()) {
        Some(canonical) => (*canonical).to_string(),
        None => compact,
    }
}

/// Distinct canonical tokens for a list of skill names, blanks dropped.
pub fn normalize_skill_set<'a>(names: impl IntoIterator<Item = &'a str>) -> BTreeSet<String> {
    names
        .into_iter()
        .filter(|n| !n.trim().is_empty())
        .map(normalize_skill)
        .collect()
}
