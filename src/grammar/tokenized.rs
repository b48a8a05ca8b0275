use std::collections::{HashMap, HashSet};

use super::{
    tokenize::{tokenize, TokenMode},
    Grammar, END_MARK, EPSILON,
};

/// Symbol index of `EPSILON`; FIRST sets use it as the nullable marker.
pub const EPSILON_INDEX: usize = 0;
/// Symbol index of `END_MARK`.
pub const END_MARK_INDEX: usize = 1;

#[derive(Debug, Clone)]
pub struct NonTerminal {
    pub index: usize,
    pub name: String,
    pub mode: TokenMode,
    pub productions: Vec<Vec<usize>>,
}

impl NonTerminal {
    pub fn new(index: usize, name: String) -> Self {
        Self {
            index,
            name,
            mode: TokenMode::Character,
            productions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Symbol {
    NonTerminal(NonTerminal),
    Terminal(String),
}

impl Symbol {
    pub fn non_terminal(&self) -> Option<&NonTerminal> {
        match self {
            Symbol::NonTerminal(e) => Some(e),
            Symbol::Terminal(_) => None,
        }
    }

    pub fn mut_non_terminal(&mut self) -> Option<&mut NonTerminal> {
        match self {
            Symbol::NonTerminal(e) => Some(e),
            Symbol::Terminal(_) => None,
        }
    }
}

/// Index-based view of a [`Grammar`] with every alternative split into symbols.
///
/// `EPSILON` and `END_MARK` occupy the first two slots and are neither listed
/// as terminals nor as nonterminals.
#[derive(Debug, Clone)]
pub struct TokenizedGrammar {
    pub symbols: Vec<Symbol>,
    pub symbol_table: HashMap<String, usize>,
    pub start_symbol: Option<usize>,
}

impl Default for TokenizedGrammar {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenizedGrammar {
    pub fn new() -> Self {
        let mut g = Self {
            symbols: Vec::new(),
            symbol_table: HashMap::new(),
            start_symbol: None,
        };
        g.add_terminal(EPSILON.to_string());
        g.add_terminal(END_MARK.to_string());
        g
    }

    pub fn from_grammar(grammar: &Grammar) -> Self {
        let mut g = Self::new();

        for name in grammar.non_terminal_iter() {
            g.add_non_terminal(name);
        }
        g.start_symbol = grammar
            .start_symbol()
            .and_then(|name| g.get_symbol_index(name));

        let known: HashSet<String> = grammar.non_terminal_iter().map(|s| s.to_string()).collect();
        for rule in grammar.rules() {
            let left = g.symbol_table[&rule.name];
            let mode = TokenMode::choose(&rule.alternatives);
            if let Some(nt) = g.symbols[left].mut_non_terminal() {
                nt.mode = mode;
            }
            for alternative in &rule.alternatives {
                let production: Vec<usize> = tokenize(alternative, mode, &known)
                    .into_iter()
                    .map(|s| match g.get_symbol_index(&s) {
                        Some(idx) => idx,
                        None => g.add_terminal(s),
                    })
                    .collect();
                g.add_production(left, production);
            }
        }

        g
    }

    pub fn terminal_iter(&self) -> impl Iterator<Item = &String> {
        self.symbols.iter().skip(2).filter_map(|s| {
            if let Symbol::Terminal(name) = s {
                Some(name)
            } else {
                None
            }
        })
    }

    pub fn non_terminal_iter(&self) -> impl Iterator<Item = &NonTerminal> {
        self.symbols.iter().filter_map(|s| s.non_terminal())
    }

    pub fn get_symbol_index(&self, name: &str) -> Option<usize> {
        self.symbol_table.get(name).cloned()
    }

    pub fn get_symbol_name(&self, index: usize) -> &str {
        match &self.symbols[index] {
            Symbol::NonTerminal(e) => e.name.as_str(),
            Symbol::Terminal(e) => e.as_str(),
        }
    }

    pub fn is_non_terminal(&self, index: usize) -> bool {
        matches!(self.symbols[index], Symbol::NonTerminal(_))
    }

    pub fn non_terminal(&self, name: &str) -> Option<&NonTerminal> {
        self.get_symbol_index(name)
            .and_then(|idx| self.symbols[idx].non_terminal())
    }

    pub fn add_non_terminal(&mut self, name: &str) -> usize {
        let idx = self.symbols.len();
        self.symbols
            .push(Symbol::NonTerminal(NonTerminal::new(idx, name.to_string())));
        self.symbol_table.insert(name.to_string(), idx);
        idx
    }

    pub fn add_terminal(&mut self, name: String) -> usize {
        let idx = self.symbols.len();
        self.symbols.push(Symbol::Terminal(name.clone()));
        self.symbol_table.insert(name, idx);
        idx
    }

    /// Adds `right` to `left` unless the same symbol sequence is already there.
    pub fn add_production(&mut self, left: usize, right: Vec<usize>) {
        if let Some(nt) = self.symbols[left].mut_non_terminal() {
            if !nt.productions.contains(&right) {
                nt.productions.push(right);
            }
        }
    }

    pub fn production_to_vec_str(&self, production: &[usize]) -> Vec<&str> {
        if production.is_empty() {
            vec![EPSILON]
        } else {
            production
                .iter()
                .map(|idx| self.get_symbol_name(*idx))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonterminals_come_first_and_terminals_are_inferred() {
        let g = Grammar::parse("S -> aSb|ε").unwrap();
        let t = TokenizedGrammar::from_grammar(&g);

        assert_eq!(t.start_symbol, t.get_symbol_index("S"));
        assert_eq!(
            t.terminal_iter().map(|s| s.as_str()).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
        let s = t.non_terminal("S").unwrap();
        assert_eq!(s.productions.len(), 2);
        assert!(s.productions[1].is_empty());
        assert_eq!(t.production_to_vec_str(&s.productions[0]), vec!["a", "S", "b"]);
    }

    #[test]
    fn later_nonterminals_are_recognised_in_character_mode() {
        let g = Grammar::parse("S -> aS_f1\nS_f1 -> b").unwrap();
        let t = TokenizedGrammar::from_grammar(&g);
        let s = t.non_terminal("S").unwrap();
        assert_eq!(t.production_to_vec_str(&s.productions[0]), vec!["a", "S_f1"]);
    }

    #[test]
    fn symbol_mode_terminals_are_words() {
        let g = Grammar::parse("E -> T + E | T\nT -> id").unwrap();
        let t = TokenizedGrammar::from_grammar(&g);
        assert_eq!(t.non_terminal("E").unwrap().mode, TokenMode::Symbol);
        assert_eq!(t.non_terminal("T").unwrap().mode, TokenMode::Character);
        assert!(t.get_symbol_index("+").is_some());
        // `T -> id` has no space, so it splits into characters.
        assert!(t.get_symbol_index("i").is_some());
        assert!(t.get_symbol_index("id").is_none());
    }
}
