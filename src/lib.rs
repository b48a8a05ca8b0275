extern crate wasm_bindgen;

use wasm_bindgen::prelude::*;

pub mod grammar;
pub use grammar::error::ParseError;
pub use grammar::pipeline::{analyze, AnalysisOptions, Transcript};
pub use grammar::Grammar;

fn error_json(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

#[wasm_bindgen]
pub fn analyze_to_json(
    grammar: &str,
    eliminate_left_recursion: bool,
    follow_and_table: bool,
) -> String {
    let options = AnalysisOptions {
        eliminate_left_recursion,
        follow_and_table,
    };
    match analyze(grammar, &options) {
        Ok(t) => t.to_json().unwrap_or_else(|e| error_json(&e.to_string())),
        Err(e) => error_json(&e.to_string()),
    }
}


#[cfg(test)]
mod scenario_tests {
    use std::collections::{BTreeSet, HashSet, VecDeque};

    use rstest::rstest;

    use crate::grammar::{
        first_follow::{FirstSets, FollowSets},
        grammar::NameContext,
        tokenized::TokenizedGrammar,
        EPSILON,
    };
    use crate::Grammar;

    /// Terminal strings of at most `max_len` characters derivable from the
    /// start symbol, found by leftmost expansion.
    fn language(g: &Grammar, max_len: usize) -> BTreeSet<String> {
        let g = TokenizedGrammar::from_grammar(g);
        let mut out = BTreeSet::new();
        let Some(start) = g.start_symbol else {
            return out;
        };
        let mut seen: HashSet<Vec<usize>> = HashSet::new();
        let mut queue: VecDeque<Vec<usize>> = VecDeque::from([vec![start]]);
        while let Some(form) = queue.pop_front() {
            let terminal_len: usize = form
                .iter()
                .filter(|s| !g.is_non_terminal(**s))
                .map(|s| g.get_symbol_name(*s).chars().count())
                .sum();
            if terminal_len > max_len {
                continue;
            }
            match form.iter().position(|s| g.is_non_terminal(*s)) {
                None => {
                    out.insert(form.iter().map(|s| g.get_symbol_name(*s)).collect::<String>());
                }
                Some(i) => {
                    let nt = g.symbols[form[i]].non_terminal().unwrap();
                    for production in &nt.productions {
                        let mut next = form[..i].to_vec();
                        next.extend(production.iter().cloned());
                        next.extend(form[i + 1..].iter().cloned());
                        if next.len() <= 2 * max_len + 4 && seen.insert(next.clone()) {
                            queue.push_back(next);
                        }
                    }
                }
            }
        }
        out
    }

    fn strings(s: &[&str]) -> Vec<String> {
        s.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn scenario_expression_recursion() {
        let g = Grammar::parse("E -> E+T|T").unwrap();
        let report = g.detect_left_recursion();
        assert_eq!(report.entries[0].recursive.len(), 1);

        let (g, _) = g.eliminate_left_recursion(&mut NameContext::from_grammar(&g));
        assert_eq!(g.alternatives("E"), strings(&["T E'", EPSILON]).as_slice());
        assert_eq!(g.alternatives("E'"), strings(&["+T E'", EPSILON]).as_slice());
    }

    #[test]
    fn scenario_dangling_else_factoring() {
        let g = Grammar::parse("S -> iEtS|iEtSeS|a").unwrap();
        let mut names = NameContext::from_grammar(&g);
        let report = g.detect_left_factoring(&names);
        assert_eq!(report.total, 1);
        assert_eq!(report.entries[0].groups[0].rendered_prefix, "iEtS");

        let (g, _) = g.remove_left_factoring(&mut names);
        assert_eq!(g.alternatives("S"), strings(&["a", "iEtSS'"]).as_slice());
        let tail: HashSet<&str> = g.alternatives("S'").iter().map(|s| s.as_str()).collect();
        assert_eq!(tail, HashSet::from(["eS", EPSILON]));
    }

    #[test]
    fn scenario_textual_recursion_check() {
        let g = Grammar::parse("A -> aA|b").unwrap();
        assert_eq!(g.detect_left_recursion().total, 0);
    }

    #[test]
    fn scenario_first_of_balanced() {
        let g = TokenizedGrammar::from_grammar(&Grammar::parse("S -> aSb | ε").unwrap());
        let first = g.to_first_output_vec(&FirstSets::calculate(&g));
        assert_eq!(first.get("S"), Some(strings(&["a", EPSILON]).as_slice()));
    }

    #[test]
    fn scenario_single_conflict() {
        let g = TokenizedGrammar::from_grammar(&Grammar::parse("S -> aB|aC\nB -> b\nC -> c").unwrap());
        let first = FirstSets::calculate(&g);
        let follow = FollowSets::calculate(&g, &first);
        let table = g.generate_ll1_parsing_table(&first, &follow);
        assert!(!table.is_ll1());
        assert_eq!(table.conflicts().len(), 1);
        let c = &table.conflicts()[0];
        assert_eq!((c.non_terminal.as_str(), c.lookahead.as_str()), ("S", "a"));
        assert_eq!(c.existing, strings(&["a", "B"]));
        assert_eq!(c.attempted, strings(&["a", "C"]));
    }

    #[rstest]
    #[case("E -> E+T|T", 7)]
    #[case("A -> A b | A c | d | e", 4)]
    #[case("S -> Sab|Sc|x|yz", 6)]
    fn recursion_removal_keeps_language(#[case] input: &str, #[case] max_len: usize) {
        let original = Grammar::parse(input).unwrap();
        let (rewritten, _) =
            original.eliminate_left_recursion(&mut NameContext::from_grammar(&original));

        let before = language(&original, max_len);
        let mut after = language(&rewritten, max_len);
        assert!(!before.is_empty());
        // The rewritten start symbol always gains `ε`.
        assert!(after.remove(""));
        assert_eq!(before, after);
    }

    #[rstest]
    #[case("S -> iEtS|iEtSeS|a")]
    #[case("A -> abc|abd|ae|f")]
    #[case("E -> T + E | T - E | T\nT -> id | id ( E )")]
    #[case("S -> aAb|aAc|aB\nA -> xy|xz\nB -> q")]
    fn factoring_reaches_fixed_point(#[case] input: &str) {
        let g = Grammar::parse(input).unwrap();
        let mut names = NameContext::from_grammar(&g);
        assert!(g.detect_left_factoring(&names).total > 0);

        let (factored, removal) = g.remove_left_factoring(&mut names);
        assert!(!removal.steps.is_empty());
        assert_eq!(factored.detect_left_factoring(&names).total, 0);
        assert!(factored.rules().all(|r| !r.alternatives.is_empty()));
    }

    #[rstest]
    #[case("S -> aSb|c")]
    #[case("E -> T E'\nE' -> + T E' | ε\nT -> id")]
    fn factoring_is_idempotent(#[case] input: &str) {
        let g = Grammar::parse(input).unwrap();
        let mut names = NameContext::from_grammar(&g);
        let (factored, _) = g.remove_left_factoring(&mut names);
        assert!(factored.equivalent_up_to_order(&g));

        let (again, removal) = factored.remove_left_factoring(&mut names);
        assert!(again.equivalent_up_to_order(&factored));
        assert!(removal.steps.is_empty());
    }

    #[test]
    fn factored_dangling_else_is_not_ll1() {
        let t = crate::analyze(
            "S -> iEtS|iEtSeS|a\nE -> b",
            &crate::AnalysisOptions {
                eliminate_left_recursion: false,
                follow_and_table: true,
            },
        )
        .unwrap();
        let table = t.ll1_table.as_ref().unwrap();
        // The classic dangling-else ambiguity survives factoring.
        assert_eq!(table.conflicts().len(), 1);
        assert_eq!(table.conflicts()[0].non_terminal, "S'");
        assert_eq!(table.conflicts()[0].lookahead, "e");
    }
}
