use super::{error::ParseError, Grammar};

impl Grammar {
    /// Parses one rule per line: `A -> alt1 | alt2 | ...`.
    ///
    /// Blank lines are skipped and a line starting with `|` adds alternatives
    /// to the rule on the previous line. A left side declared twice merges into
    /// one rule.
    pub fn parse(grammar: &str) -> Result<Self, ParseError> {
        let mut g = Self::new();

        let mut raw_productions: Vec<(String, &str)> = Vec::new();

        let mut previous_left: Option<String> = None;
        for (i, line) in grammar.lines().enumerate() {
            if line.chars().all(|c| c.is_whitespace()) {
                continue;
            }
            let line_no = i + 1;
            let (left, rights) = match line.split_once("->") {
                Some((left, rights)) => {
                    let left = left.trim();
                    if left.is_empty() {
                        return Err(ParseError::EmptyLeftSide {
                            line: line_no,
                            raw: line.to_string(),
                        });
                    } else if left.split_whitespace().count() != 1 {
                        return Err(ParseError::LeftSideWhitespace {
                            line: line_no,
                            raw: line.to_string(),
                        });
                    }
                    (left.to_string(), rights.trim())
                }
                None => {
                    let trimmed = line.trim();
                    if let Some(rest) = trimmed.strip_prefix('|') {
                        match &previous_left {
                            Some(left) => (left.clone(), rest.trim()),
                            None => {
                                return Err(ParseError::DanglingAlternative {
                                    line: line_no,
                                    raw: line.to_string(),
                                })
                            }
                        }
                    } else {
                        return Err(ParseError::MissingArrow {
                            line: line_no,
                            raw: line.to_string(),
                        });
                    }
                }
            };

            // Declare in line order so the start symbol is the first left side.
            g.add_non_terminal(&left);
            previous_left = Some(left.clone());
            raw_productions.push((left, rights));
        }

        for (left, rights) in raw_productions {
            for right in rights.split('|') {
                g.add_production(&left, right);
            }
        }

        Ok(g)
    }
}
