use crowbook_text_processing::escape;
use serde::Serialize;

use super::{
    first_follow::{FirstSets, FollowSets},
    left_factoring::{LeftFactoringRemoval, LeftFactoringReport},
    left_recursion::{LeftRecursionReport, LeftRecursionRewrite, RewrittenRule},
    tokenized::TokenizedGrammar,
    Grammar, EPSILON,
};

#[derive(Debug, Clone, Serialize)]
pub struct ProductionOutput {
    pub left: String,
    pub rights: Vec<String>,
}

impl ProductionOutput {
    pub fn to_plaintext(&self) -> String {
        format!("{} -> {}", self.left, self.rights.join(" | "))
    }

    pub fn to_latex(&self, and_sign: bool) -> String {
        if self.rights.is_empty() {
            return String::new();
        }

        let left = if and_sign {
            format!("{} & \\rightarrow &", escape::tex(self.left.as_str()))
        } else {
            format!("{} \\rightarrow ", escape::tex(self.left.as_str()))
        };
        let right = self
            .rights
            .iter()
            .map(|right| escape::tex(right.as_str()).to_string())
            .collect::<Vec<_>>()
            .join(" \\mid ");

        let output = left + &right;
        output.replace(EPSILON, "\\epsilon")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductionOutputVec {
    productions: Vec<ProductionOutput>,
}

impl ProductionOutputVec {
    pub fn productions(&self) -> &[ProductionOutput] {
        &self.productions
    }

    pub fn to_plaintext(&self) -> String {
        self.productions
            .iter()
            .map(|s| s.to_plaintext())
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        std::iter::once("\\[\\begin{array}{cll}".to_string())
            .chain(self.productions.iter().map(|s| s.to_latex(true)))
            .chain(std::iter::once("\\end{array}\\]".to_string()))
            .collect::<Vec<String>>()
            .join("\\\\\n")
    }
}

impl Grammar {
    pub fn to_production_output_vec(&self) -> ProductionOutputVec {
        ProductionOutputVec {
            productions: self
                .rules()
                .map(|rule| ProductionOutput {
                    left: rule.name.clone(),
                    rights: rule.alternatives.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SetOutput {
    pub name: String,
    pub members: Vec<String>,
}

/// FIRST or FOLLOW sets, symbols and members sorted by name.
#[derive(Debug, Clone, Serialize)]
pub struct SetOutputVec {
    #[serde(skip)]
    label: &'static str,
    data: Vec<SetOutput>,
}

impl SetOutputVec {
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.data
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.members.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.data.iter().map(|s| s.name.as_str())
    }

    pub fn to_plaintext(&self) -> String {
        self.data
            .iter()
            .map(|s| {
                if s.members.is_empty() {
                    format!("{}({}) = {{ }}", self.label, s.name)
                } else {
                    format!("{}({}) = {{ {} }}", self.label, s.name, s.members.join(", "))
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        let content = self
            .data
            .iter()
            .map(|s| {
                format!(
                    "{} & {}",
                    escape::tex(s.name.as_str()),
                    s.members
                        .iter()
                        .map(|m| escape::tex(m.as_str()).to_string())
                        .collect::<Vec<_>>()
                        .join(r"\ ")
                        .replace(EPSILON, r"$\epsilon$")
                )
            })
            .collect::<Vec<_>>()
            .join("\\\\\n ");

        format!(
            "\\begin{{tabular}}{{c|c}}\nSymbol & {}\\\\\\hline\n{}\\\\\n\\end{{tabular}}",
            self.label, content
        )
    }
}

impl TokenizedGrammar {
    fn to_set_output_vec<'a>(
        &self,
        label: &'static str,
        symbols: impl Iterator<Item = usize>,
        set_of: impl Fn(usize) -> &'a std::collections::HashSet<usize>,
    ) -> SetOutputVec {
        let mut data: Vec<SetOutput> = symbols
            .map(|idx| {
                let mut members: Vec<String> = set_of(idx)
                    .iter()
                    .map(|s| self.get_symbol_name(*s).to_string())
                    .collect();
                members.sort();
                SetOutput {
                    name: self.get_symbol_name(idx).to_string(),
                    members,
                }
            })
            .collect();
        data.sort_by(|a, b| a.name.cmp(&b.name));
        SetOutputVec { label, data }
    }

    /// FIRST of every nonterminal and of every terminal used in a production.
    pub fn to_first_output_vec(&self, first: &FirstSets) -> SetOutputVec {
        let symbols: Vec<usize> = self
            .non_terminal_iter()
            .map(|nt| nt.index)
            .chain(
                self.terminal_iter()
                    .filter_map(|t| self.get_symbol_index(t)),
            )
            .collect();
        self.to_set_output_vec("FIRST", symbols.into_iter(), move |idx| first.of(idx))
    }

    pub fn to_follow_output_vec(&self, follow: &FollowSets) -> SetOutputVec {
        let symbols: Vec<usize> = self.non_terminal_iter().map(|nt| nt.index).collect();
        self.to_set_output_vec("FOLLOW", symbols.into_iter(), move |idx| follow.of(idx))
    }
}

impl LeftRecursionReport {
    pub fn to_plaintext(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        for entry in &self.entries {
            if entry.recursive.is_empty() {
                lines.push(format!("{} has no left recursion.", entry.non_terminal));
            } else {
                lines.push(format!(
                    "{} has {} left recursive production(s):",
                    entry.non_terminal,
                    entry.recursive.len()
                ));
                for alternative in &entry.recursive {
                    lines.push(format!("{} → {}", entry.non_terminal, alternative));
                }
            }
        }
        lines.push(String::new());
        lines.push(format!("Total rules with left recursion: {}", self.total));
        lines.join("\n")
    }
}

impl RewrittenRule {
    pub fn to_plaintext(&self) -> String {
        format!("{} -> {}", self.non_terminal, self.alternatives.join(" | "))
    }
}

impl LeftRecursionRewrite {
    pub fn to_plaintext(&self) -> String {
        match &self.introduced {
            Some(prime) => format!("{}\n{}", self.rule.to_plaintext(), prime.to_plaintext()),
            None => self.rule.to_plaintext(),
        }
    }
}

impl LeftFactoringReport {
    pub fn to_plaintext(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        for entry in &self.entries {
            if entry.groups.is_empty() {
                lines.push(format!("{} has no left factoring.", entry.non_terminal));
                continue;
            }
            lines.push(format!(
                "{} has {} left factoring group(s):",
                entry.non_terminal,
                entry.groups.len()
            ));
            for (i, group) in entry.groups.iter().enumerate() {
                lines.push(format!(
                    "  Group {}: common prefix -> '{}'",
                    i + 1,
                    group.rendered_prefix
                ));
                for alternative in &group.alternatives {
                    lines.push(format!("    {} -> {}", entry.non_terminal, alternative));
                }
            }
        }
        lines.push(String::new());
        lines.push(format!(
            "Total left factoring groups in grammar: {}",
            self.total
        ));
        lines.join("\n")
    }
}

impl LeftFactoringRemoval {
    pub fn to_plaintext(&self) -> String {
        let mut blocks: Vec<String> = self
            .steps
            .iter()
            .map(|step| {
                format!(
                    "Factoring applied on {}:\n  Common prefix: '{}'\n  Replaced productions: {}\n  New {} productions: {}\n  Introduced {} -> {}",
                    step.non_terminal,
                    step.prefix,
                    step.replaced.join(", "),
                    step.non_terminal,
                    step.alternatives.join(", "),
                    step.introduced,
                    step.introduced_alternatives.join(", ")
                )
            })
            .collect();
        blocks.push(if self.iterations == 0 {
            "No left factoring detected; no changes made.".to_string()
        } else {
            "No further left factoring to remove.".to_string()
        });
        blocks.join("\n\n")
    }
}
