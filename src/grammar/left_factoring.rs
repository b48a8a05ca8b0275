use serde::Serialize;

use super::{
    grammar::NameContext,
    tokenize::{render, tokenize, TokenMode},
    trie::TrieNode,
    Grammar,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactoringGroup {
    pub prefix: Vec<String>,
    /// The prefix joined the way the nonterminal's alternatives are written.
    pub rendered_prefix: String,
    pub alternatives: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NonTerminalFactoring {
    pub non_terminal: String,
    pub mode: TokenMode,
    pub groups: Vec<FactoringGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeftFactoringReport {
    pub entries: Vec<NonTerminalFactoring>,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactoringStep {
    pub non_terminal: String,
    pub prefix: String,
    pub replaced: Vec<String>,
    pub alternatives: Vec<String>,
    pub introduced: String,
    pub introduced_alternatives: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LeftFactoringRemoval {
    pub steps: Vec<FactoringStep>,
    /// Detect-and-rewrite rounds that found at least one group.
    pub iterations: usize,
}

impl Grammar {
    /// Finds, for every nonterminal with two or more alternatives, the longest
    /// prefixes shared by at least two of them.
    pub fn detect_left_factoring(&self, names: &NameContext) -> LeftFactoringReport {
        let mut entries = Vec::new();
        let mut total = 0;
        for rule in self.rules() {
            let mode = TokenMode::choose(&rule.alternatives);
            let groups: Vec<FactoringGroup> = if rule.alternatives.len() < 2 {
                Vec::new()
            } else {
                TrieNode::build(&rule.alternatives, mode, names.known())
                    .maximal_prefixes()
                    .into_iter()
                    .map(|(prefix, alternatives)| FactoringGroup {
                        rendered_prefix: prefix.join(mode.separator()),
                        prefix,
                        alternatives,
                    })
                    .collect()
            };
            total += groups.len();
            entries.push(NonTerminalFactoring {
                non_terminal: rule.name.clone(),
                mode,
                groups,
            });
        }
        LeftFactoringReport { entries, total }
    }

    /// Factors common prefixes out until detection finds no group.
    ///
    /// Each round runs detection on the current grammar and rewrites every
    /// group it found; a group whose members were already taken by an earlier
    /// group of the same round is skipped.
    pub fn remove_left_factoring(
        &self,
        names: &mut NameContext,
    ) -> (Grammar, LeftFactoringRemoval) {
        for name in self.non_terminal_iter() {
            names.declare(name);
        }

        let mut g = self.clone();
        let mut removal = LeftFactoringRemoval::default();

        loop {
            let report = g.detect_left_factoring(names);
            if report.total == 0 {
                break;
            }
            removal.iterations += 1;

            for entry in report.entries {
                for group in entry.groups {
                    if let Some(step) = g.factor_group(&entry.non_terminal, entry.mode, &group, names)
                    {
                        removal.steps.push(step);
                    }
                }
            }
        }

        (g, removal)
    }

    fn factor_group(
        &mut self,
        non_terminal: &str,
        mode: TokenMode,
        group: &FactoringGroup,
        names: &mut NameContext,
    ) -> Option<FactoringStep> {
        let current = self.alternatives(non_terminal).to_vec();
        let replaced: Vec<String> = current
            .iter()
            .filter(|alt| group.alternatives.contains(alt))
            .cloned()
            .collect();
        if replaced.len() < 2 {
            return None;
        }

        // Tokenize before minting so the new name cannot change the split.
        let token_lists: Vec<Vec<String>> = replaced
            .iter()
            .map(|alt| tokenize(alt, mode, names.known()))
            .collect();

        let introduced = names.fresh_name(non_terminal);

        let mut remainders: Vec<String> = Vec::new();
        for tokens in &token_lists {
            let rest = tokens
                .strip_prefix(group.prefix.as_slice())
                .unwrap_or(tokens.as_slice());
            let remainder = render(rest, mode);
            if !remainders.contains(&remainder) {
                remainders.push(remainder);
            }
        }

        let factored = match mode {
            TokenMode::Character => format!("{}{}", group.rendered_prefix, introduced),
            TokenMode::Symbol => format!("{} {}", group.rendered_prefix, introduced),
        };

        let mut alternatives: Vec<String> = current
            .into_iter()
            .filter(|alt| !replaced.contains(alt))
            .collect();
        if !alternatives.contains(&factored) {
            alternatives.push(factored);
        }

        self.set_alternatives(non_terminal, alternatives);
        self.set_alternatives(&introduced, remainders);

        Some(FactoringStep {
            non_terminal: non_terminal.to_string(),
            prefix: group.rendered_prefix.clone(),
            replaced,
            alternatives: self.alternatives(non_terminal).to_vec(),
            introduced_alternatives: self.alternatives(&introduced).to_vec(),
            introduced,
        })
    }
}
