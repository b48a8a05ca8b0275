use std::collections::HashSet;

use super::tokenized::{Symbol, TokenizedGrammar, END_MARK_INDEX, EPSILON_INDEX};

/// FIRST of every symbol; `EPSILON_INDEX` marks a nullable symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirstSets {
    sets: Vec<HashSet<usize>>,
}

/// FOLLOW of every nonterminal; terminal slots stay empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowSets {
    sets: Vec<HashSet<usize>>,
}

fn first_of_sequence(sets: &[HashSet<usize>], sequence: &[usize]) -> HashSet<usize> {
    let mut first: HashSet<usize> = HashSet::new();
    for idx in sequence {
        first.extend(sets[*idx].iter().filter(|&&s| s != EPSILON_INDEX).cloned());
        if !sets[*idx].contains(&EPSILON_INDEX) {
            return first;
        }
    }
    first.insert(EPSILON_INDEX);
    first
}

impl FirstSets {
    pub fn calculate(g: &TokenizedGrammar) -> Self {
        Self::calculate_with(g, |_, _| {})
    }

    /// Like [`FirstSets::calculate`], calling `on_round` with the sets after
    /// every full pass over the grammar.
    pub fn calculate_with<F>(g: &TokenizedGrammar, mut on_round: F) -> Self
    where
        F: FnMut(usize, &[HashSet<usize>]),
    {
        let mut sets: Vec<HashSet<usize>> = g
            .symbols
            .iter()
            .enumerate()
            .map(|(i, s)| match s {
                Symbol::Terminal(_) => std::iter::once(i).collect::<HashSet<usize>>(),
                Symbol::NonTerminal(_) => HashSet::new(),
            })
            .collect();

        let mut round = 0;
        let mut changed = true;
        while changed {
            changed = false;
            for nt in g.non_terminal_iter() {
                for production in &nt.productions {
                    for s in first_of_sequence(&sets, production) {
                        changed |= sets[nt.index].insert(s);
                    }
                }
            }
            round += 1;
            on_round(round, &sets);
        }

        Self { sets }
    }

    pub fn of(&self, idx: usize) -> &HashSet<usize> {
        &self.sets[idx]
    }

    pub fn of_sequence(&self, sequence: &[usize]) -> HashSet<usize> {
        first_of_sequence(&self.sets, sequence)
    }

    pub fn nullable(&self, idx: usize) -> bool {
        self.sets[idx].contains(&EPSILON_INDEX)
    }
}

impl FollowSets {
    pub fn calculate(g: &TokenizedGrammar, first: &FirstSets) -> Self {
        let mut sets: Vec<HashSet<usize>> = vec![HashSet::new(); g.symbols.len()];
        if let Some(start) = g.start_symbol {
            sets[start].insert(END_MARK_INDEX);
        }

        let mut changed = true;
        while changed {
            changed = false;
            for left in g.non_terminal_iter() {
                for production in &left.productions {
                    for (i, &b) in production.iter().enumerate() {
                        if !g.is_non_terminal(b) {
                            continue;
                        }
                        let beta = first.of_sequence(&production[i + 1..]);
                        let mut to_add: Vec<usize> = beta
                            .iter()
                            .filter(|&&s| s != EPSILON_INDEX)
                            .cloned()
                            .collect();
                        if beta.contains(&EPSILON_INDEX) {
                            to_add.extend(sets[left.index].iter().cloned());
                        }
                        for s in to_add {
                            changed |= sets[b].insert(s);
                        }
                    }
                }
            }
        }

        Self { sets }
    }

    pub fn of(&self, idx: usize) -> &HashSet<usize> {
        &self.sets[idx]
    }
}
