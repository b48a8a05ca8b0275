use serde::Serialize;

use super::{
    grammar::NameContext,
    tokenize::is_epsilon,
    Grammar, EPSILON,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeftRecursionEntry {
    pub non_terminal: String,
    pub recursive: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeftRecursionReport {
    pub entries: Vec<LeftRecursionEntry>,
    /// Number of nonterminals with at least one recursive alternative.
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewrittenRule {
    pub non_terminal: String,
    pub alternatives: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeftRecursionRewrite {
    pub rule: RewrittenRule,
    /// The introduced `A'` rule, absent when `A` had nothing to rewrite.
    pub introduced: Option<RewrittenRule>,
}

/// Immediate left recursion is checked on the declared text: an alternative is
/// recursive when it starts with the nonterminal's name. `S2` therefore counts
/// as recursive for `S`.
fn is_left_recursive(non_terminal: &str, alternative: &str) -> bool {
    alternative.starts_with(non_terminal)
}

fn append_symbol(body: &str, symbol: &str) -> String {
    if is_epsilon(body) {
        symbol.to_string()
    } else {
        format!("{} {}", body, symbol)
    }
}

impl Grammar {
    pub fn detect_left_recursion(&self) -> LeftRecursionReport {
        let entries: Vec<LeftRecursionEntry> = self
            .rules()
            .map(|rule| LeftRecursionEntry {
                non_terminal: rule.name.clone(),
                recursive: rule
                    .alternatives
                    .iter()
                    .filter(|alt| is_left_recursive(&rule.name, alt))
                    .cloned()
                    .collect(),
            })
            .collect();
        let total = entries.iter().filter(|e| !e.recursive.is_empty()).count();
        LeftRecursionReport { entries, total }
    }

    /// Rewrites every immediately left-recursive nonterminal `A` into
    /// `A -> β A' | ε` and `A' -> α A' | ε`.
    ///
    /// Nonterminals are handled independently, so a single pass suffices.
    pub fn eliminate_left_recursion(
        &self,
        names: &mut NameContext,
    ) -> (Grammar, Vec<LeftRecursionRewrite>) {
        let mut g = Grammar::new();
        let mut rewrites = Vec::new();

        for rule in self.rules() {
            let mut recursive: Vec<&str> = Vec::new();
            let mut others: Vec<&str> = Vec::new();
            for alternative in &rule.alternatives {
                if is_left_recursive(&rule.name, alternative) {
                    recursive.push(alternative[rule.name.len()..].trim());
                } else {
                    others.push(alternative);
                }
            }

            if recursive.is_empty() {
                g.set_alternatives(&rule.name, rule.alternatives.clone());
                rewrites.push(LeftRecursionRewrite {
                    rule: RewrittenRule {
                        non_terminal: rule.name.clone(),
                        alternatives: rule.alternatives.clone(),
                    },
                    introduced: None,
                });
                continue;
            }

            let prime = names.fresh_name(&rule.name);

            let mut main: Vec<String> = others
                .iter()
                .map(|beta| append_symbol(beta, &prime))
                .collect();
            main.push(EPSILON.to_string());

            // `A -> A` adds nothing to the language and would make `A' -> A'`.
            let mut tail: Vec<String> = recursive
                .iter()
                .filter(|alpha| !alpha.is_empty())
                .map(|alpha| append_symbol(alpha, &prime))
                .collect();
            tail.push(EPSILON.to_string());

            g.set_alternatives(&rule.name, main);
            g.set_alternatives(&prime, tail);

            rewrites.push(LeftRecursionRewrite {
                rule: RewrittenRule {
                    non_terminal: rule.name.clone(),
                    alternatives: g.alternatives(&rule.name).to_vec(),
                },
                introduced: Some(RewrittenRule {
                    non_terminal: prime.clone(),
                    alternatives: g.alternatives(&prime).to_vec(),
                }),
            });
        }

        (g, rewrites)
    }
}
