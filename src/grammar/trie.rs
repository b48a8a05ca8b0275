use std::collections::HashSet;

use indexmap::IndexMap;

use super::tokenize::{tokenize, TokenMode};

#[derive(Debug, Default)]
pub struct TrieNode {
    pub children: IndexMap<String, TrieNode>,
    /// Raw alternatives whose token sequence passes through this node.
    pub alternatives: Vec<String>,
}

impl TrieNode {
    pub fn build<S: AsRef<str>>(
        alternatives: &[S],
        mode: TokenMode,
        known: &HashSet<String>,
    ) -> Self {
        let mut root = TrieNode::default();
        for alternative in alternatives {
            let alternative = alternative.as_ref();
            let mut node = &mut root;
            node.alternatives.push(alternative.to_string());
            for token in tokenize(alternative, mode, known) {
                node = node.children.entry(token).or_default();
                node.alternatives.push(alternative.to_string());
            }
        }
        root
    }

    fn is_shared(&self) -> bool {
        self.alternatives.len() >= 2
    }

    /// Deepest non-root nodes shared by at least two alternatives, in
    /// depth-first, left-to-right order.
    ///
    /// A node is reported only when no child of it is also shared, so no
    /// reported node is an ancestor of another and a pre-order walk yields the
    /// same order as a post-order one.
    pub fn maximal_prefixes(&self) -> Vec<(Vec<String>, Vec<String>)> {
        let mut groups = Vec::new();
        let mut stack: Vec<(&TrieNode, Vec<String>)> = vec![(self, Vec::new())];
        while let Some((node, path)) = stack.pop() {
            let child_shared = node.children.values().any(|c| c.is_shared());
            if node.is_shared() && !child_shared && !path.is_empty() {
                groups.push((path.clone(), node.alternatives.clone()));
            }
            for (token, child) in node.children.iter().rev() {
                if child.is_shared() {
                    let mut child_path = path.clone();
                    child_path.push(token.clone());
                    stack.push((child, child_path));
                }
            }
        }
        groups
    }
}
