//! Usage strings.
//!
//! Smart usage collapses a tree into one line: an executable node makes what
//! follows it optional (`[...]`), several children become an alternation
//! (`(a|b)`), and expansion stops after the first optional level. Nodes the
//! source may not use are left out.

use std::collections::BTreeMap;

use uniform_foundation::CommandSource;

use crate::dispatcher::Dispatcher;
use crate::node::ArgumentNode;
use crate::tree::CommandTree;

impl<S: CommandSource> Dispatcher<S> {
    /// Smart usage of the command known by `name`, e.g. `greet <name> [<times>]`.
    ///
    /// Returns `None` for unknown commands and commands the source may not use.
    pub fn usage(&self, name: &str, source: &S) -> Option<String> {
        let tree = self.get(name)?;
        self.tree_usage(&tree, source)
    }

    /// Smart usage of every command the source may use, keyed by name.
    pub fn usage_all(&self, source: &S) -> BTreeMap<String, String> {
        self.snapshot()
            .iter()
            .filter_map(|tree| {
                self.tree_usage(tree, source)
                    .map(|usage| (tree.name().to_string(), usage))
            })
            .collect()
    }

    /// Every executable path of the command known by `name`, one per line.
    ///
    /// Unlike [`usage`](Self::usage), nothing is collapsed.
    pub fn all_usage(&self, name: &str, source: &S) -> Vec<String> {
        let Some(tree) = self.get(name) else {
            return Vec::new();
        };
        if !self.can_use(&tree, source) {
            return Vec::new();
        }
        let mut lines = Vec::new();
        self.collect_paths(tree.root(), tree.name().to_string(), source, &mut lines);
        lines
    }

    fn tree_usage(&self, tree: &CommandTree<S>, source: &S) -> Option<String> {
        self.can_use(tree, source)
            .then(|| self.smart_usage(tree.root(), source, false, false))
    }

    fn smart_usage(
        &self,
        node: &ArgumentNode<S>,
        source: &S,
        optional: bool,
        deep: bool,
    ) -> String {
        let own = if optional {
            format!("[{}]", node.usage_text())
        } else {
            node.usage_text()
        };
        if deep {
            return own;
        }

        let child_optional = node.is_executable();
        let children: Vec<&ArgumentNode<S>> = node
            .children()
            .iter()
            .map(|c| &**c)
            .filter(|c| self.can_use_node(c, source))
            .collect();
        match children.as_slice() {
            [] => own,
            [only] => format!(
                "{own} {}",
                self.smart_usage(only, source, child_optional, child_optional)
            ),
            many => {
                let alternatives = many
                    .iter()
                    .map(|c| c.usage_text())
                    .collect::<Vec<_>>()
                    .join("|");
                if child_optional {
                    format!("{own} [{alternatives}]")
                } else {
                    format!("{own} ({alternatives})")
                }
            }
        }
    }

    fn collect_paths(
        &self,
        node: &ArgumentNode<S>,
        prefix: String,
        source: &S,
        lines: &mut Vec<String>,
    ) {
        if node.is_executable() {
            lines.push(prefix.clone());
        }
        for child in node.children() {
            if self.can_use_node(child, source) {
                let line = format!("{prefix} {}", child.usage_text());
                self.collect_paths(child, line, source, lines);
            }
        }
    }
}
