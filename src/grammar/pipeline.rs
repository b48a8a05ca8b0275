use serde::{Deserialize, Serialize};

use super::{
    error::ParseError,
    first_follow::{FirstSets, FollowSets},
    grammar::NameContext,
    left_factoring::{LeftFactoringRemoval, LeftFactoringReport},
    left_recursion::{LeftRecursionReport, LeftRecursionRewrite},
    ll1_parsing_table::LL1ParsingTable,
    pretty_print::{ProductionOutputVec, SetOutputVec},
    tokenized::TokenizedGrammar,
    Grammar,
};

/// Which optional stages run. Detection, factoring and FIRST always run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    pub eliminate_left_recursion: bool,
    pub follow_and_table: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    pub left_recursion: LeftRecursionReport,
    pub left_recursion_removal: Option<Vec<LeftRecursionRewrite>>,
    pub left_factoring: LeftFactoringReport,
    pub left_factoring_removal: LeftFactoringRemoval,
    pub grammar: ProductionOutputVec,
    pub first: SetOutputVec,
    pub follow: Option<SetOutputVec>,
    pub ll1_table: Option<LL1ParsingTable>,
    #[serde(skip)]
    final_grammar: Grammar,
}

impl Transcript {
    pub fn final_grammar(&self) -> &Grammar {
        &self.final_grammar
    }

    pub fn to_plaintext(&self) -> String {
        let mut sections: Vec<String> = vec![
            "--- Left Recursion Detection Result ---".to_string(),
            self.left_recursion.to_plaintext(),
        ];
        if let Some(rewrites) = &self.left_recursion_removal {
            sections.push("--- Left Recursion Removal Result ---".to_string());
            sections.push(
                rewrites
                    .iter()
                    .map(|r| r.to_plaintext())
                    .collect::<Vec<_>>()
                    .join("\n"),
            );
        }
        sections.push("--- Left Factoring Detection Result ---".to_string());
        sections.push(self.left_factoring.to_plaintext());
        sections.push("--- Left Factoring Removal Result ---".to_string());
        sections.push(self.left_factoring_removal.to_plaintext());
        sections.push("--- Grammar after left factoring removal ---".to_string());
        sections.push(self.grammar.to_plaintext());
        sections.push("--- FIRST sets ---".to_string());
        sections.push(self.first.to_plaintext());
        if let Some(follow) = &self.follow {
            sections.push("--- FOLLOW sets ---".to_string());
            sections.push(follow.to_plaintext());
        }
        if let Some(table) = &self.ll1_table {
            sections.push("--- LL(1) Parsing Table ---".to_string());
            sections.push(table.to_plaintext());
        }

        sections
            .chunks(2)
            .map(|pair| pair.join("\n"))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Final grammar, FIRST and, when computed, FOLLOW and the parsing table.
    pub fn to_latex(&self) -> String {
        let mut parts = vec![self.grammar.to_latex(), self.first.to_latex()];
        if let Some(follow) = &self.follow {
            parts.push(follow.to_latex());
        }
        if let Some(table) = &self.ll1_table {
            parts.push(table.to_latex());
        }
        parts.join("\n\n")
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl Grammar {
    /// Runs every stage in order: recursion detection, optional recursion
    /// removal, factoring detection and removal, FIRST, then optionally
    /// FOLLOW and the LL(1) table.
    pub fn analyze(&self, options: &AnalysisOptions) -> Transcript {
        let mut names = NameContext::from_grammar(self);

        let left_recursion = self.detect_left_recursion();
        let (grammar, left_recursion_removal) = if options.eliminate_left_recursion {
            let (g, rewrites) = self.eliminate_left_recursion(&mut names);
            (g, Some(rewrites))
        } else {
            (self.clone(), None)
        };

        let left_factoring = grammar.detect_left_factoring(&names);
        let (grammar, left_factoring_removal) = grammar.remove_left_factoring(&mut names);

        let tokenized = TokenizedGrammar::from_grammar(&grammar);
        let first = FirstSets::calculate(&tokenized);
        let (follow, ll1_table) = if options.follow_and_table {
            let follow = FollowSets::calculate(&tokenized, &first);
            let table = tokenized.generate_ll1_parsing_table(&first, &follow);
            (Some(tokenized.to_follow_output_vec(&follow)), Some(table))
        } else {
            (None, None)
        };

        Transcript {
            left_recursion,
            left_recursion_removal,
            left_factoring,
            left_factoring_removal,
            grammar: grammar.to_production_output_vec(),
            first: tokenized.to_first_output_vec(&first),
            follow,
            ll1_table,
            final_grammar: grammar,
        }
    }
}

pub fn analyze(input: &str, options: &AnalysisOptions) -> Result<Transcript, ParseError> {
    Ok(Grammar::parse(input)?.analyze(options))
}
