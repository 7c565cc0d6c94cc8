mod node;
mod render;

use std::fmt;
use std::sync::Arc;

// Re-export public types
pub use node::{
    Alias, Flow, Map, Node, NodeId, NodeKind, Pair, Scalar, ScalarStyle, ScalarType, Seq, Span,
};

use render::render_scalar;

/// A parsed YAML document that can be edited and written back losslessly.
///
/// Combines:
/// - the untouched source text, shared between clones
/// - an arena of [`Node`]s addressed by [`NodeId`]
///
/// Serializing (via `Display`) replays the source and splices in only the
/// scalars edited with [`YamlDocument::set_scalar`], so comments, blank
/// lines, quoting and key order survive a round trip. Cloning a document
/// yields an independent tree: edits on the clone never reach the original.
#[derive(Debug, Clone)]
pub struct YamlDocument {
    source: Arc<str>,
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl YamlDocument {
    pub(crate) fn new(source: Arc<str>, nodes: Vec<Node>, root: Option<NodeId>) -> Self {
        Self {
            source,
            nodes,
            root,
        }
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    // ========================================================================
    // Node access
    // ========================================================================

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn scalar(&self, id: NodeId) -> Option<&Scalar> {
        self.node(id).and_then(Node::as_scalar)
    }

    pub fn alias(&self, id: NodeId) -> Option<&Alias> {
        self.node(id).and_then(Node::as_alias)
    }

    pub fn map(&self, id: NodeId) -> Option<&Map> {
        self.node(id).and_then(Node::as_map)
    }

    /// Text used to label a node in a structural path: the value of a
    /// scalar, `*name` for an alias, empty for collections.
    pub fn text_of(&self, id: NodeId) -> String {
        match self.node(id).map(|n| &n.kind) {
            Some(NodeKind::Scalar(s)) => s.value.clone(),
            Some(NodeKind::Alias(a)) => format!("*{}", a.name),
            Some(NodeKind::Flow(f)) => f.raw.clone(),
            _ => String::new(),
        }
    }

    /// Every pair of `map` whose key is a scalar equal to `key`, in
    /// document order. Duplicate keys are kept by the parser.
    pub fn get_pairs<'a>(&'a self, map: NodeId, key: &'a str) -> impl Iterator<Item = Pair> + 'a {
        self.map(map)
            .into_iter()
            .flat_map(|map| map.pairs.iter())
            .filter(move |pair| self.scalar(pair.key).is_some_and(|k| k.value == key))
            .copied()
    }

    /// Find the first pair of `map` whose key is a scalar equal to `key`
    pub fn get_pair(&self, map: NodeId, key: &str) -> Option<Pair> {
        self.get_pairs(map, key).next()
    }

    /// Value node stored under `key` in `map`
    pub fn get(&self, map: NodeId, key: &str) -> Option<NodeId> {
        self.get_pair(map, key)?.value
    }

    /// Follow `keys` from the root, one mapping level per key
    pub fn get_path(&self, keys: &[&str]) -> Option<NodeId> {
        keys.iter()
            .try_fold(self.root?, |current, key| self.get(current, key))
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Compare-and-set the value of a scalar node.
    ///
    /// Returns `true` only when the stored value actually changed. Aliases are
    /// not followed; resolve them first with [`YamlDocument::resolve_alias`].
    pub fn set_scalar(&mut self, id: NodeId, value: &str) -> bool {
        let Some(Node {
            kind: NodeKind::Scalar(scalar),
            ..
        }) = self.nodes.get_mut(id.0)
        else {
            return false;
        };
        if scalar.value == value {
            return false;
        }
        scalar.value = value.to_string();
        scalar.ty = ScalarType::Str;
        scalar.edited = true;
        true
    }

    /// Return the mapping stored under the top-level `key`, creating an empty
    /// one when the key is absent.
    ///
    /// Returns `None` when the root is not a mapping, or when `key` exists but
    /// holds something other than a block mapping.
    pub fn ensure_map(&mut self, key: &str) -> Option<NodeId> {
        let root = match self.root {
            Some(root) => root,
            None => {
                let root = self.push(Node::new(NodeKind::Map(Map::default()), None));
                self.root = Some(root);
                root
            }
        };
        self.map(root)?;

        if let Some(pair) = self.get_pair(root, key) {
            return pair.value.filter(|v| self.map(*v).is_some());
        }

        let key_id = self.push(Node::new(
            NodeKind::Scalar(Scalar::new(key.to_string(), ScalarStyle::Plain)),
            None,
        ));
        let value_id = self.push(Node::new(NodeKind::Map(Map::default()), None));
        if let NodeKind::Map(map) = &mut self.nodes[root.0].kind {
            map.pairs.push(Pair {
                key: key_id,
                value: Some(value_id),
            });
        }
        Some(value_id)
    }

    /// Whether any scalar was edited or any node was added since parsing
    pub fn is_modified(&self) -> bool {
        self.nodes.iter().any(|node| match &node.kind {
            NodeKind::Scalar(s) => s.edited,
            _ => node.span.is_none(),
        })
    }

    pub(crate) fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    fn write_edits(&self, out: &mut String) {
        let mut edits: Vec<(Span, String)> = self
            .nodes
            .iter()
            .filter_map(|node| match (&node.kind, node.span) {
                (NodeKind::Scalar(s), Some(span)) if s.edited => {
                    Some((span, render_scalar(&s.value, s.style, s.parsed_ty)))
                }
                _ => None,
            })
            .collect();
        edits.sort_by_key(|(span, _)| span.start);

        let mut cursor = 0;
        for (span, text) in edits {
            if span.start < cursor {
                continue;
            }
            out.push_str(&self.source[cursor..span.start]);
            out.push_str(&text);
            cursor = span.end;
        }
        out.push_str(&self.source[cursor..]);
    }

    /// Top-level entries created by [`YamlDocument::ensure_map`] are appended
    /// after the original text.
    fn write_appended(&self, out: &mut String) {
        let Some(map) = self.root.and_then(|root| self.map(root)) else {
            return;
        };
        for pair in &map.pairs {
            let Some(key) = self.node(pair.key) else {
                continue;
            };
            if key.span.is_some() {
                continue;
            }
            if !out.is_empty() && !out.ends_with('\n') {
                out.push('\n');
            }
            let key_text = render_scalar(&self.text_of(pair.key), ScalarStyle::Plain, ScalarType::Str);
            out.push_str(&key_text);
            out.push(':');
            if let Some(value) = pair.value {
                out.push(' ');
                self.write_synthesized(value, 1, out);
            }
            out.push('\n');
        }
    }

    fn write_synthesized(&self, id: NodeId, depth: usize, out: &mut String) {
        let Some(node) = self.node(id) else { return };
        match &node.kind {
            NodeKind::Map(map) if map.pairs.is_empty() => out.push_str("{}"),
            NodeKind::Map(map) => {
                for pair in &map.pairs {
                    out.push('\n');
                    out.push_str(&"  ".repeat(depth));
                    out.push_str(&render_scalar(
                        &self.text_of(pair.key),
                        ScalarStyle::Plain,
                        ScalarType::Str,
                    ));
                    out.push(':');
                    if let Some(value) = pair.value {
                        out.push(' ');
                        self.write_synthesized(value, depth + 1, out);
                    }
                }
            }
            NodeKind::Scalar(s) => out.push_str(&render_scalar(&s.value, s.style, s.parsed_ty)),
            NodeKind::Alias(a) => {
                out.push('*');
                out.push_str(&a.name);
            }
            NodeKind::Flow(f) => out.push_str(&f.raw),
            NodeKind::Seq(_) => out.push_str("[]"),
        }
    }
}

impl fmt::Display for YamlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::with_capacity(self.source.len());
        self.write_edits(&mut out);
        self.write_appended(&mut out);
        f.write_str(&out)
    }
}
