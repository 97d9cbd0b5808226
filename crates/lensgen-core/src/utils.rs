//! String transformation utilities for lens naming

use once_cell::sync::Lazy;
use regex::Regex;

// Anything that cannot appear inside an identifier splits words.
static WORD_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9]+").expect("word separator regex is valid"));

/// Convert a string to TitleCase by capitalizing every separator-delimited word.
///
/// Characters after the first of each word keep their case, so `petId` stays
/// `PetId` and `int32` becomes `Int32`.
pub fn title_case(s: &str) -> String {
    WORD_SEPARATOR
        .split(s)
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect()
}

/// Convert a string to camelCase: [`title_case`] with a lowercased first letter.
pub fn camel_case(s: &str) -> String {
    let title = title_case(s);
    let mut chars = title.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
    }
}
