//! Identifier construction shared by the extractors and the query analyzer.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::{Column, Parameter};
use crate::error::{GenError, GenResult};

/// Namespace that holds enums and table models.
pub const MODELS_MODULE: &str = "models";

/// Build a type name: split on `_`, capitalize each segment, concatenate.
///
/// Acronyms are not preserved: `user_id` becomes `UserId`, never `UserID`.
pub fn model_name(name: &str) -> String {
    name.split('_').map(capitalize).collect()
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower-case the first character: `GetAuthor` -> `getAuthor`.
pub fn lower_title(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

static WORD_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.)([A-Z][a-z]+)").expect("valid regex"));
static CASE_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").expect("valid regex"));

/// Convert a camel-case or Pascal-case query name to snake case.
///
/// Two passes: an underscore goes before every capital that starts a
/// lower-case run, then between a lower-case letter or digit and a
/// following capital. `GetUserByID` becomes `get_user_by_id`.
pub fn method_name(name: &str) -> String {
    let name = WORD_START.replace_all(name, "${1}_${2}");
    CASE_BOUNDARY.replace_all(&name, "${1}_${2}").to_lowercase()
}

/// Turn an enum literal into an upper-case identifier.
pub fn enum_value_name(value: &str) -> String {
    let mut id: String = value
        .chars()
        .map(|c| if matches!(c, '-' | ':' | '/') { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect::<String>()
        .to_uppercase();
    if id.is_empty() || id.starts_with(|c: char| c.is_ascii_digit()) {
        id.insert(0, '_');
    }
    id
}

/// Name of a result column, falling back to its 1-based position.
pub fn column_name(col: &Column, pos: usize) -> String {
    if col.name.is_empty() {
        format!("column_{}", pos + 1)
    } else {
        col.name.clone()
    }
}

/// Name of a parameter, falling back to its placeholder ordinal.
pub fn param_name(param: &Parameter) -> String {
    if param.column.name.is_empty() {
        format!("dollar_{}", param.number)
    } else {
        param.column.name.clone()
    }
}

/// Hands out unique names within one struct or argument list.
///
/// A taken name gets the first free `_2`, `_3`, ... suffix, checked against
/// every name handed out so far. Names allocated under the same key are
/// shared instead of suffixed again.
#[derive(Debug, Default)]
pub struct NameAllocator {
    taken: HashSet<String>,
    by_key: HashMap<i32, String>,
}

impl NameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a name for `key`.
    ///
    /// Returns the name and whether it is new for this key.
    pub fn allocate(&mut self, key: i32, base: &str) -> (String, bool) {
        if let Some(name) = self.by_key.get(&key) {
            return (name.clone(), false);
        }
        let name = self.unique(base);
        self.by_key.insert(key, name.clone());
        (name, true)
    }

    /// Allocate a name that no other key can share.
    pub fn unique(&mut self, base: &str) -> String {
        let mut name = base.to_string();
        let mut n = 2;
        while self.taken.contains(&name) {
            name = format!("{}_{}", base, n);
            n += 1;
        }
        self.taken.insert(name.clone());
        name
    }
}

/// Fail on the first generated name produced by two different origins.
///
/// Entries are `(generated name, human readable origin)`.
pub fn ensure_unique<'a>(
    kind: &'static str,
    entries: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> GenResult<()> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for (name, origin) in entries {
        if let Some(first) = seen.insert(name, origin) {
            return Err(GenError::NameCollision {
                kind,
                name: name.to_string(),
                first: first.to_string(),
                second: origin.to_string(),
            });
        }
    }
    Ok(())
}
