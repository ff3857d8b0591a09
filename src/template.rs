use crate::error::GrepUiError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

// ${key} with any body short of a closing brace
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{([^}]*)\}").unwrap());

/// Expand every `${key}` placeholder in `template` through `lookup`.
///
/// Replacement runs in ascending lexicographic order of the placeholder
/// literal, not in order of appearance; the two only diverge when one
/// resolved value contains another placeholder's literal text.
pub fn resolve<F>(template: &str, lookup: F) -> Result<String, GrepUiError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut replacements: BTreeMap<String, String> = BTreeMap::new();

    for capture in PLACEHOLDER.captures_iter(template) {
        let literal = &capture[0];
        let key = &capture[1];

        let value = lookup(key).ok_or_else(|| GrepUiError::MissingOption(key.to_string()))?;
        replacements.insert(literal.to_string(), value);
    }

    let mut resolved = template.to_string();
    for (literal, value) in &replacements {
        resolved = resolved.replace(literal, value);
    }

    Ok(resolved)
}
