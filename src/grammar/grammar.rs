use std::collections::HashSet;

use indexmap::IndexMap;

use super::EPSILON;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub name: String,
    pub alternatives: Vec<String>,
}

impl Rule {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            alternatives: Vec::new(),
        }
    }

    /// Appends `alternative` unless an equal one is already present.
    pub fn add_alternative(&mut self, alternative: String) -> bool {
        if self.alternatives.contains(&alternative) {
            false
        } else {
            self.alternatives.push(alternative);
            true
        }
    }
}

/// Raw grammar: every alternative is kept in its declared textual form.
///
/// The first declared nonterminal is the start symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grammar {
    rules: IndexMap<String, Rule>,
}

impl Grammar {
    pub fn new() -> Self {
        Self {
            rules: IndexMap::new(),
        }
    }

    pub fn add_non_terminal(&mut self, name: &str) -> &mut Rule {
        self.rules
            .entry(name.to_string())
            .or_insert_with(|| Rule::new(name))
    }

    pub fn add_production(&mut self, left: &str, right: &str) {
        let right = right.trim();
        let right = if right.is_empty() { EPSILON } else { right };
        self.add_non_terminal(left).add_alternative(right.to_string());
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.get(name)
    }

    pub fn alternatives(&self, name: &str) -> &[String] {
        self.rules
            .get(name)
            .map(|r| r.alternatives.as_slice())
            .unwrap_or(&[])
    }

    pub fn non_terminal_iter(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(|k| k.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    pub fn start_symbol(&self) -> Option<&str> {
        self.rules.keys().next().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub(crate) fn set_alternatives(&mut self, name: &str, alternatives: Vec<String>) {
        let rule = self.add_non_terminal(name);
        rule.alternatives.clear();
        for alternative in alternatives {
            rule.add_alternative(alternative);
        }
    }

    /// Same nonterminals in the same order, each with the same set of alternatives.
    pub fn equivalent_up_to_order(&self, other: &Grammar) -> bool {
        self.rules.len() == other.rules.len()
            && self.rules.iter().zip(other.rules.iter()).all(|((a, ra), (b, rb))| {
                a == b
                    && ra.alternatives.len() == rb.alternatives.len()
                    && ra
                        .alternatives
                        .iter()
                        .all(|alt| rb.alternatives.contains(alt))
            })
    }
}

/// Every nonterminal name seen during one run, declared or minted.
#[derive(Debug, Clone, Default)]
pub struct NameContext {
    names: HashSet<String>,
}

impl NameContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_grammar(grammar: &Grammar) -> Self {
        Self {
            names: grammar.non_terminal_iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn declare(&mut self, name: &str) {
        self.names.insert(name.to_string());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn known(&self) -> &HashSet<String> {
        &self.names
    }

    /// Tries `base'`, then `base_f1`, `base_f2`, ... and claims the first unused one.
    pub fn fresh_name(&mut self, base: &str) -> String {
        let mut name = format!("{}'", base);
        let mut i = 1;
        while self.names.contains(&name) {
            name = format!("{}_f{}", base, i);
            i += 1;
        }
        self.names.insert(name.clone());
        name
    }
}
