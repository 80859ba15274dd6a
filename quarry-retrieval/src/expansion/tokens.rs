//! Identifier token handling: splitting camel/snake/kebab identifiers
//! into normalized word lists and re-rendering them across case
//! conventions.

/// Split text into lowercased identifier words. CamelCase humps,
/// underscores, hyphens and non-alphanumeric separators all split.
pub fn normalize_tokens(text: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for raw in text.split(|c: char| !c.is_ascii_alphanumeric() && c != '_' && c != '-') {
        for word in split_identifier(raw) {
            if !word.is_empty() && !out.contains(&word) {
                out.push(word);
            }
        }
    }
    out
}

/// Split a single identifier into lowercase words.
pub fn split_identifier(identifier: &str) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for c in identifier.chars() {
        if c == '_' || c == '-' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        } else if c.is_ascii_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
            current.push(c.to_ascii_lowercase());
        } else {
            current.push(c.to_ascii_lowercase());
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Whether a token is a multi-word identifier in any case convention.
pub fn is_multiword_identifier(token: &str) -> bool {
    split_identifier(token).len() > 1
}

/// Render words as camelCase, snake_case and kebab-case.
/// The convention the token already uses is included; callers dedupe.
pub fn case_renderings(token: &str) -> Vec<String> {
    let words = split_identifier(token);
    if words.len() < 2 {
        return Vec::new();
    }

    let snake = words.join("_");
    let kebab = words.join("-");
    let camel = words
        .iter()
        .enumerate()
        .map(|(i, w)| {
            if i == 0 {
                w.clone()
            } else {
                let mut c = w.chars();
                match c.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + c.as_str(),
                    None => String::new(),
                }
            }
        })
        .collect::<String>();

    vec![snake, kebab, camel]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_splits() {
        assert_eq!(split_identifier("getUserName"), vec!["get", "user", "name"]);
    }

    #[test]
    fn snake_and_kebab_split() {
        assert_eq!(split_identifier("get_user_name"), vec!["get", "user", "name"]);
        assert_eq!(split_identifier("get-user-name"), vec!["get", "user", "name"]);
    }

    #[test]
    fn single_words_have_no_renderings() {
        assert!(case_renderings("cache").is_empty());
    }

    #[test]
    fn renderings_cover_three_conventions() {
        let r = case_renderings("getUserName");
        assert_eq!(r, vec!["get_user_name", "get-user-name", "getUserName"]);
    }

    #[test]
    fn normalize_dedupes_and_lowercases(){
        assert_eq!(
            normalize_tokens("parse JSON parseJson"),
            vec!["parse", "json"]
        );
    }
}
