use std::collections::HashSet;

use serde::Serialize;

use super::EPSILON;

/// How the alternatives of one nonterminal are split into symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenMode {
    /// One symbol per character, except for known nonterminal names (`iEtS`).
    Character,
    /// Whitespace separated symbols (`E + T`).
    Symbol,
}

impl TokenMode {
    pub fn choose<S: AsRef<str>>(alternatives: &[S]) -> Self {
        if alternatives.iter().any(|a| a.as_ref().contains(' ')) {
            TokenMode::Symbol
        } else {
            TokenMode::Character
        }
    }

    pub fn separator(self) -> &'static str {
        match self {
            TokenMode::Character => "",
            TokenMode::Symbol => " ",
        }
    }
}

pub fn is_epsilon(alternative: &str) -> bool {
    let alternative = alternative.trim();
    alternative.is_empty() || alternative == EPSILON
}

pub fn tokenize(alternative: &str, mode: TokenMode, known: &HashSet<String>) -> Vec<String> {
    if is_epsilon(alternative) {
        return Vec::new();
    }
    let alternative = alternative.trim();
    match mode {
        TokenMode::Symbol => alternative
            .split_whitespace()
            .map(|s| s.to_string())
            .collect(),
        TokenMode::Character => tokenize_characters(alternative, known),
    }
}

fn tokenize_characters(alternative: &str, known: &HashSet<String>) -> Vec<String> {
    let mut names: Vec<&str> = known
        .iter()
        .map(|s| s.as_str())
        .filter(|s| !s.is_empty())
        .collect();
    // Longest first; the name itself breaks ties so the scan is deterministic.
    names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let mut tokens = Vec::new();
    let mut rest = alternative;
    while let Some(c) = rest.chars().next() {
        match names.iter().find(|name| rest.starts_with(**name)) {
            Some(name) => {
                tokens.push(name.to_string());
                rest = &rest[name.len()..];
            }
            None => {
                tokens.push(c.to_string());
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    tokens
}

/// Joins tokens back into an alternative; the empty sequence renders as `ε`.
pub fn render<S: AsRef<str>>(tokens: &[S], mode: TokenMode) -> String {
    if tokens.is_empty() {
        return EPSILON.to_string();
    }
    tokens
        .iter()
        .map(|t| t.as_ref())
        .collect::<Vec<_>>()
        .join(mode.separator())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn mode_follows_spaces() {
        assert_eq!(TokenMode::choose(&["iEtS", "a"]), TokenMode::Character);
        assert_eq!(TokenMode::choose(&["E + T", "T"]), TokenMode::Symbol);
    }

    #[test]
    fn character_mode_keeps_known_names_whole() {
        let tokens = tokenize("iEtSS_f1", TokenMode::Character, &known(&["S", "S_f1"]));
        assert_eq!(tokens, vec!["i", "E", "t", "S", "S_f1"]);
    }

    #[test]
    fn longest_name_wins() {
        let tokens = tokenize("S'aS", TokenMode::Character, &known(&["S", "S'"]));
        assert_eq!(tokens, vec!["S'", "a", "S"]);
    }

    #[test]
    fn symbol_mode_splits_on_whitespace() {
        let tokens = tokenize(" E  +  T ", TokenMode::Symbol, &known(&["E"]));
        assert_eq!(tokens, vec!["E", "+", "T"]);
    }

    #[test]
    fn epsilon_is_empty() {
        assert!(tokenize(EPSILON, TokenMode::Character, &known(&[])).is_empty());
        assert!(tokenize("", TokenMode::Symbol, &known(&[])).is_empty());
        assert_eq!(render::<&str>(&[], TokenMode::Symbol), EPSILON);
    }

    #[test]
    fn multibyte_characters_are_single_tokens() {
        let tokens = tokenize("aβb", TokenMode::Character, &known(&[]));
        assert_eq!(tokens, vec!["a", "β", "b"]);
    }
}
