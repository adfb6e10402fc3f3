//! Node rewriting applied to each field before it is decoded.

use crate::node::Node;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::sync::Arc;

/// Rewrites a node before it reaches a decoder.
///
/// Preprocessors run in registration order, each receiving the output of
/// the previous one. They see one node at a time: decoders apply them to
/// every record field and collection element exactly once, so an
/// implementation must not descend into maps or arrays itself.
pub trait Preprocessor: Send + Sync {
    /// The rewritten node, or `None` to leave `node` as it is.
    fn process(&self, node: &Node) -> Option<Node>;
}

static ENV_VAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

type Lookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Substitutes `${NAME}` in string nodes.
///
/// Unknown variables are left as written. Substituted text is not scanned
/// again.
#[derive(Clone)]
pub struct EnvVarPreprocessor {
    lookup: Lookup,
}

impl EnvVarPreprocessor {
    /// Resolve variables from the process environment.
    pub fn new() -> Self {
        Self::with_lookup(|name| std::env::var(name).ok())
    }

    pub fn with_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Arc::new(lookup),
        }
    }

    fn substitute(&self, text: &str) -> String {
        ENV_VAR
            .replace_all(text, |caps: &Captures<'_>| {
                let name = &caps[1];
                match (self.lookup)(name) {
                    Some(value) => value,
                    None => {
                        tracing::trace!(name, "environment variable not set");
                        caps[0].to_string()
                    }
                }
            })
            .into_owned()
    }
}

impl Default for EnvVarPreprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EnvVarPreprocessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvVarPreprocessor").finish_non_exhaustive()
    }
}

impl Preprocessor for EnvVarPreprocessor {
    fn process(&self, node: &Node) -> Option<Node> {
        match node {
            Node::String { value, pos, path } if value.contains("${") => Some(Node::String {
                value: self.substitute(value),
                pos: pos.clone(),
                path: path.clone(),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pos::Pos;
    use indexmap::IndexMap;

    fn preprocessor() -> EnvVarPreprocessor {
        EnvVarPreprocessor::with_lookup(|name| match name {
            "HOST" => Some("db.internal".to_string()),
            "PORT" => Some("5432".to_string()),
            _ => None,
        })
    }

    #[test]
    fn test_substitutes_known_and_keeps_unknown() {
        let node = Node::string("${HOST}:${PORT}/${NOPE}", Pos::NoPos, "<root>.url");
        assert_eq!(
            preprocessor().process(&node),
            Some(Node::string("db.internal:5432/${NOPE}", Pos::NoPos, "<root>.url"))
        );
    }

    #[test]
    fn test_substituted_text_is_not_rescanned() {
        let p = EnvVarPreprocessor::with_lookup(|name| match name {
            "A" => Some("${B}".to_string()),
            "B" => Some("leaked".to_string()),
            _ => None,
        });
        let node = Node::string("${A}", Pos::NoPos, "<root>.password");
        assert_eq!(
            p.process(&node),
            Some(Node::string("${B}", Pos::NoPos, "<root>.password"))
        );
    }

    #[test]
    fn test_containers_are_left_to_the_decoders() {
        let mut entries = IndexMap::new();
        entries.insert(
            "host".to_string(),
            Node::string("${HOST}", Pos::NoPos, "<root>.host"),
        );
        let node = Node::map(entries, Pos::NoPos, "<root>");
        assert_eq!(preprocessor().process(&node), None);

        let node = Node::array(
            vec![Node::string("${HOST}", Pos::NoPos, "<root>[0]")],
            Pos::NoPos,
            "<root>",
        );
        assert_eq!(preprocessor().process(&node), None);
    }

    #[test]
    fn test_non_strings_untouched() {
        let node = Node::long(1, Pos::NoPos, "<root>");
        assert_eq!(preprocessor().process(&node), None);
        let plain = Node::string("no variables", Pos::NoPos, "<root>");
        assert_eq!(preprocessor().process(&plain), None);
    }
}
