//! English singularization for table-derived model names.
//!
//! A small rule table in the spirit of the usual Rails-style inflectors:
//! uncountables and irregulars first, then suffix rules, first match wins.
//! Case of the kept stem is preserved.

/// Words with no distinct singular form.
const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "jeans",
    "police",
    "news",
];

/// Words whose last path segment is rewritten as a whole.
const IRREGULAR: &[(&str, &str)] = &[
    ("people", "person"),
    ("men", "man"),
    ("children", "child"),
    ("sexes", "sex"),
    ("moves", "move"),
    ("calories", "calorie"),
    ("mice", "mouse"),
    ("lice", "louse"),
    ("oxen", "ox"),
    ("axes", "axis"),
    ("testes", "testis"),
];

/// Left unchanged even though the suffix rules would touch them.
const PROTECTED: &[&str] = &["campus", "meta"];

/// Suffix rewrites, tried in order: (plural suffix, singular suffix).
const SUFFIX_RULES: &[(&str, &str)] = &[
    ("statuses", "status"),
    ("status", "status"),
    ("quizzes", "quiz"),
    ("matrices", "matrix"),
    ("vertices", "vertex"),
    ("indices", "index"),
    ("aliases", "alias"),
    ("alias", "alias"),
    ("octopi", "octopus"),
    ("octopus", "octopus"),
    ("viri", "virus"),
    ("virus", "virus"),
    ("crises", "crisis"),
    ("shoes", "shoe"),
    ("buses", "bus"),
    ("bus", "bus"),
    ("movies", "movie"),
    ("analyses", "analysis"),
    ("theses", "thesis"),
    ("xes", "x"),
    ("ches", "ch"),
    ("sses", "ss"),
    ("shes", "sh"),
    ("oes", "o"),
    ("tives", "tive"),
    ("hives", "hive"),
    ("ss", "ss"),
];

/// Singularize `name` unless it is listed in `exclusions`.
///
/// Exclusions are compared case-insensitively.
pub fn singular(name: &str, exclusions: &[String]) -> String {
    if exclusions.iter().any(|e| e.eq_ignore_ascii_case(name)) {
        return name.to_string();
    }
    let lower = name.to_ascii_lowercase();
    if PROTECTED.contains(&lower.as_str()) {
        return name.to_string();
    }
    if UNCOUNTABLE.iter().any(|w| is_last_word(&lower, w)) {
        return name.to_string();
    }
    for (plural, single) in IRREGULAR {
        if is_last_word(&lower, plural) {
            return replace_suffix(name, plural.len(), single);
        }
    }
    for (plural, single) in SUFFIX_RULES {
        if lower.ends_with(plural) {
            return replace_suffix(name, plural.len(), single);
        }
    }
    singular_tail(name, &lower)
}

/// Rules that depend on the letter before the suffix.
fn singular_tail(name: &str, lower: &str) -> String {
    let before = |suffix: &str| {
        lower
            .strip_suffix(suffix)
            .and_then(|stem| stem.chars().last())
    };

    if let Some(c) = before("ies") {
        if !"aeiouy".contains(c) || lower.ends_with("quies") {
            return replace_suffix(name, 3, "y");
        }
    }
    if let Some(c) = before("ves") {
        if c == 'l' || c == 'r' {
            return replace_suffix(name, 3, "f");
        }
        if c != 'f' {
            return replace_suffix(name, 3, "fe");
        }
    }
    if let Some(c) = before("a") {
        if c == 't' || c == 'i' {
            return replace_suffix(name, 1, "um");
        }
    }
    if lower.len() > 1 && lower.ends_with('s') {
        return replace_suffix(name, 1, "");
    }
    name.to_string()
}

/// Whether `word` is the whole name or its last `_`-separated segment.
fn is_last_word(lower: &str, word: &str) -> bool {
    lower == word || lower.ends_with(&format!("_{}", word))
}

fn replace_suffix(name: &str, len: usize, replacement: &str) -> String {
    let keep = name.len().saturating_sub(len);
    format!("{}{}", &name[..keep], replacement)
}
