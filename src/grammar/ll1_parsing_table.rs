use std::collections::{HashMap, HashSet};

use crowbook_text_processing::escape::tex as escape_tex;
use serde::Serialize;

use super::{
    first_follow::{FirstSets, FollowSets},
    tokenized::{TokenizedGrammar, END_MARK_INDEX, EPSILON_INDEX},
    END_MARK, EPSILON,
};

/// Two alternatives claiming the same table cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub non_terminal: String,
    pub lookahead: String,
    /// The production that stays in the cell.
    pub existing: Vec<String>,
    pub attempted: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LL1ParsingTable {
    /// Column headers: terminals sorted by name, then `END_MARK`.
    terminals: Vec<String>,
    rows: Vec<(String, Vec<Option<Vec<String>>>)>,
    conflicts: Vec<Conflict>,
}

impl LL1ParsingTable {
    pub fn terminals(&self) -> &[String] {
        &self.terminals
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn is_ll1(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn cell(&self, non_terminal: &str, lookahead: &str) -> Option<&[String]> {
        let col = self.terminals.iter().position(|t| t == lookahead)?;
        self.rows
            .iter()
            .find(|(left, _)| left == non_terminal)
            .and_then(|(_, row)| row[col].as_deref())
    }

    pub fn filled_cells(&self) -> impl Iterator<Item = (&str, &str, &[String])> {
        self.rows.iter().flat_map(move |(left, row)| {
            row.iter().enumerate().filter_map(move |(col, cell)| {
                cell.as_deref()
                    .map(|p| (left.as_str(), self.terminals[col].as_str(), p))
            })
        })
    }

    pub fn to_plaintext(&self) -> String {
        let mut header: Vec<String> = vec![String::new()];
        header.extend(self.terminals.iter().cloned());
        let mut output: Vec<Vec<String>> = vec![header];
        for (left, row) in &self.rows {
            let mut line: Vec<String> = vec![left.clone()];
            line.extend(row.iter().map(|cell| match cell {
                Some(production) => format!("{} -> {}", left, production.join(" ")),
                None => String::new(),
            }));
            output.push(line);
        }

        let width: Vec<usize> = (0..output[0].len())
            .map(|j| output.iter().map(|line| line[j].chars().count()).max().unwrap_or(0))
            .collect();
        let mut table = output
            .iter()
            .map(|line| {
                line.iter()
                    .enumerate()
                    .map(|(i, s)| format!("{:>width$}", s, width = width[i]))
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect::<Vec<_>>()
            .join("\n");

        table.push_str("\n\n");
        if self.is_ll1() {
            table.push_str("Grammar is LL(1).");
        } else {
            table.push_str(&format!(
                "Grammar is not LL(1): {} conflict(s)",
                self.conflicts.len()
            ));
            for c in &self.conflicts {
                table.push_str(&format!(
                    "\n  M[{}, {}]: {} -> {} vs {} -> {}",
                    c.non_terminal,
                    c.lookahead,
                    c.non_terminal,
                    c.existing.join(" "),
                    c.non_terminal,
                    c.attempted.join(" ")
                ));
            }
        }
        table
    }

    pub fn to_latex(&self) -> String {
        let mut header: Vec<String> = vec![format!(
            "\\[\\begin{{array}}{{c{}}}\n",
            "|l".repeat(self.terminals.len()),
        )];
        header.extend(
            self.terminals
                .iter()
                .map(|t| format!("\\text{{{}}}", escape_tex(t.as_str()))),
        );
        let header = header.join(" & ");

        let terminal_set: HashSet<&str> = self.terminals.iter().map(|t| t.as_str()).collect();
        let mut output: Vec<String> = Vec::new();
        for (left, row) in &self.rows {
            let mut line: Vec<String> = vec![escape_tex(left.as_str()).to_string()];
            line.extend(row.iter().map(|cell| match cell {
                Some(production) => {
                    let right = production
                        .iter()
                        .map(|s| {
                            if terminal_set.contains(s.as_str()) {
                                format!("\\text{{{}}}", escape_tex(s.as_str()))
                            } else {
                                escape_tex(s.as_str()).to_string()
                            }
                        })
                        .collect::<Vec<_>>()
                        .join(" \\ ")
                        .replace(EPSILON, "\\epsilon");
                    format!("{} \\rightarrow {}", escape_tex(left.as_str()), right)
                }
                None => String::new(),
            }));
            output.push(line.join(" & "));
        }

        let output = output.join("\\\\\n");

        header + "\\\\\\hline\n" + &output + "\n\\end{array}\\]"
    }
}

impl TokenizedGrammar {
    /// Builds the predictive table; a cell keeps its first production and any
    /// later claim by a different production is recorded as a [`Conflict`].
    pub fn generate_ll1_parsing_table(
        &self,
        first: &FirstSets,
        follow: &FollowSets,
    ) -> LL1ParsingTable {
        let mut terminals: Vec<String> = self.terminal_iter().cloned().collect();
        terminals.sort();
        terminals.push(END_MARK.to_string());
        let map: HashMap<usize, usize> = terminals
            .iter()
            .enumerate()
            .filter_map(|(i, t)| self.get_symbol_index(t).map(|idx| (idx, i)))
            .collect();

        let mut rows: Vec<(String, Vec<Option<Vec<String>>>)> = Vec::new();
        let mut conflicts: Vec<Conflict> = Vec::new();
        for nt in self.non_terminal_iter() {
            let mut row: Vec<Option<usize>> = vec![None; terminals.len()];
            let to_strings = |production: &[usize]| -> Vec<String> {
                self.production_to_vec_str(production)
                    .into_iter()
                    .map(|s| s.to_string())
                    .collect()
            };

            for (p, production) in nt.productions.iter().enumerate() {
                let first_of_production = first.of_sequence(production);
                let mut lookaheads: Vec<usize> = first_of_production
                    .iter()
                    .filter(|&&s| s != EPSILON_INDEX)
                    .cloned()
                    .collect();
                if first_of_production.contains(&EPSILON_INDEX) {
                    lookaheads.extend(follow.of(nt.index).iter().cloned());
                }
                lookaheads.sort_by_key(|idx| {
                    (*idx == END_MARK_INDEX, self.get_symbol_name(*idx).to_string())
                });
                lookaheads.dedup();

                for lookahead in lookaheads {
                    let Some(&col) = map.get(&lookahead) else {
                        continue;
                    };
                    let cell = row[col];
                    match cell {
                        Some(existing) if nt.productions[existing] != *production => {
                            conflicts.push(Conflict {
                                non_terminal: nt.name.clone(),
                                lookahead: terminals[col].clone(),
                                existing: to_strings(&nt.productions[existing]),
                                attempted: to_strings(production),
                            });
                        }
                        Some(_) => {}
                        None => row[col] = Some(p),
                    }
                }
            }

            let row: Vec<Option<Vec<String>>> = row
                .into_iter()
                .map(|cell| cell.map(|p| to_strings(&nt.productions[p])))
                .collect();
            rows.push((nt.name.clone(), row));
        }

        LL1ParsingTable {
            terminals,
            rows,
            conflicts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;

    fn table(input: &str) -> LL1ParsingTable {
        let g = TokenizedGrammar::from_grammar(&Grammar::parse(input).unwrap());
        let first = FirstSets::calculate(&g);
        let follow = FollowSets::calculate(&g, &first);
        g.generate_ll1_parsing_table(&first, &follow)
    }

    #[test]
    fn expression_grammar_is_ll1() {
        let t = table("E -> TX\nX -> +TX|ε\nT -> FY\nY -> *FY|ε\nF -> (E)|i");
        assert!(t.is_ll1());
        assert_eq!(t.terminals(), &["(", ")", "*", "+", "i", "$"]);
        assert_eq!(t.cell("E", "i"), Some(&["T".to_string(), "X".to_string()][..]));
        assert_eq!(t.cell("X", "$"), Some(&[EPSILON.to_string()][..]));
        assert_eq!(t.cell("X", ")"), Some(&[EPSILON.to_string()][..]));
        assert_eq!(t.cell("F", "+"), None);
    }

    #[test]
    fn shared_first_terminal_is_one_conflict() {
        let t = table("S -> a|ab");
        assert!(!t.is_ll1());
        assert_eq!(
            t.conflicts(),
            &[Conflict {
                non_terminal: "S".to_string(),
                lookahead: "a".to_string(),
                existing: vec!["a".to_string()],
                attempted: vec!["a".to_string(), "b".to_string()],
            }]
        );
        // The first production keeps the cell.
        assert_eq!(t.cell("S", "a"), Some(&["a".to_string()][..]));
    }

    #[test]
    fn nullable_alternative_conflicts_through_follow() {
        let t = table("S -> Ab\nA -> b|ε");
        assert_eq!(t.conflicts().len(), 1);
        let c = &t.conflicts()[0];
        assert_eq!(c.non_terminal, "A");
        assert_eq!(c.lookahead, "b");
        assert_eq!(c.attempted, vec![EPSILON.to_string()]);
    }

    #[test]
    fn conflict_free_cells_hold_one_production() {
        let t = table("S -> aA|bB\nA -> c|ε\nB -> d");
        assert!(t.is_ll1());
        let cells: Vec<_> = t.filled_cells().collect();
        let mut keys: Vec<(&str, &str)> = cells.iter().map(|(n, l, _)| (*n, *l)).collect();
        let before = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(before, keys.len());
        assert_eq!(t.cell("A", "$"), Some(&[EPSILON.to_string()][..]));
    }

    #[test]
    fn plaintext_reports_conflicts() {
        let t = table("S -> a|ab");
        let text = t.to_plaintext();
        assert!(text.contains("Grammar is not LL(1): 1 conflict(s)"));
        assert!(text.contains("M[S, a]: S -> a vs S -> a b"));
    }
}
