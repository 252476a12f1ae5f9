//! Completion suggestions over the same traversal as execution.

use std::ops::Range;

use uniform_foundation::CommandSource;

use crate::dispatcher::Dispatcher;
use crate::node::{ArgumentNode, NodeKind, starts_with};
use crate::permission::grants;
use crate::reader::ARGUMENT_SEPARATOR;

/// One completion: the text to put in place of `range`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Suggestion {
    /// Replacement text.
    pub text: String,
    /// Byte range of the input it replaces.
    pub range: Range<usize>,
}

impl Suggestion {
    /// Applies the suggestion to `input`.
    #[must_use]
    pub fn apply(&self, input: &str) -> String {
        let start = self.range.start.min(input.len());
        let end = self.range.end.clamp(start, input.len());
        format!("{}{}{}", &input[..start], self.text, &input[end..])
    }
}

impl<S: CommandSource> Dispatcher<S> {
    /// Completions for the token being typed at the end of `input`.
    ///
    /// Only nodes the source may use are proposed. Results are ordered exact
    /// match first, ignoring ASCII case, then lexically.
    pub fn suggest(&self, input: &str, source: &S) -> Vec<Suggestion> {
        let mut texts = if input.contains(ARGUMENT_SEPARATOR) {
            self.suggest_arguments(input, source)
        } else {
            self.suggest_names(input, source)
        };
        let (prefix, start) = match texts.first() {
            Some((_, start)) => (&input[*start..], *start),
            None => return Vec::new(),
        };
        texts.sort_by(|(a, _), (b, _)| {
            let exact_a = a.eq_ignore_ascii_case(prefix);
            let exact_b = b.eq_ignore_ascii_case(prefix);
            exact_b.cmp(&exact_a).then_with(|| a.cmp(b))
        });
        texts.dedup_by(|(a, _), (b, _)| a == b);
        if let Some(max) = self.config().max_suggestions {
            texts.truncate(max);
        }
        texts
            .into_iter()
            .map(|(text, _)| Suggestion {
                text,
                range: start..input.len(),
            })
            .collect()
    }

    /// Suggestion texts as plain strings.
    pub fn suggest_texts(&self, input: &str, source: &S) -> Vec<String> {
        self.suggest(input, source)
            .into_iter()
            .map(|s| s.text)
            .collect()
    }

    fn suggest_names(&self, prefix: &str, source: &S) -> Vec<(String, usize)> {
        let ignore_case = self.config().ignore_command_case;
        self.snapshot()
            .iter()
            .filter(|tree| self.can_use(tree, source))
            .flat_map(|tree| tree.names().map(str::to_string).collect::<Vec<_>>())
            .filter(|name| starts_with(name, prefix, ignore_case))
            .map(|name| (name, 0))
            .collect()
    }

    fn suggest_arguments(&self, input: &str, source: &S) -> Vec<(String, usize)> {
        let state = self.parse(input, source);
        let Some(tree) = state.command() else {
            return Vec::new();
        };
        if !self.can_use(tree, source) {
            return Vec::new();
        }

        let path = state.path();
        let (parent, start) = match path {
            [.., parent, last] if last.range.end == input.len() => (parent, last.range.start),
            [.., last] => (last, last.range.end + ARGUMENT_SEPARATOR.len_utf8()),
            [] => return Vec::new(),
        };
        if start > input.len() {
            return Vec::new();
        }
        let prefix = &input[start..];

        parent
            .node
            .children()
            .iter()
            .filter(|child| self.can_use_node(child, source))
            .flat_map(|child| candidates(child, prefix))
            .map(|text| (text, start))
            .collect()
    }

    pub(crate) fn can_use_node(&self, node: &ArgumentNode<S>, source: &S) -> bool {
        node.requirement().is_none_or(|r| r.admits(source))
            && grants(self.evaluator(), source, node.permission())
    }
}

fn candidates<S>(node: &ArgumentNode<S>, prefix: &str) -> Vec<String> {
    match node.kind() {
        NodeKind::Literal { token, .. } => {
            if node.literal_completes(prefix) {
                vec![token.to_string()]
            } else {
                Vec::new()
            }
        }
        NodeKind::Variable { parser, .. } => parser
            .suggest(prefix)
            .into_iter()
            .filter(|c| starts_with(c, prefix, true))
            .collect(),
    }
}
