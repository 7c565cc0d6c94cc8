use std::fmt;
use std::sync::Arc;

use rowan::ast::AstNode;
use yaml_edit::{Mapping, Scalar as CstScalar, Sequence, Yaml};

use crate::yaml_tree::{
    Alias, Flow, Map, Node, NodeId, NodeKind, Pair, Scalar, ScalarStyle, ScalarType, Seq, Span,
    YamlDocument,
};

type SyntaxNode = rowan::SyntaxNode<<Yaml as AstNode>::Language>;

/// Aliases are resolved over the whole document, so one that appears before
/// its anchor is not an error here.
const UNDEFINED_ALIAS: &str = "Undefined alias";

/// Result of parsing a YAML file
#[derive(Debug)]
pub struct ParseResult {
    /// The parsed document
    pub document: YamlDocument,
    /// Parsing errors (if any)
    pub errors: Vec<ParseError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(message: String) -> Self {
        Self { message }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Parse YAML text into an editable document.
///
/// The text goes through `yaml_edit`'s lossless parser; the syntax tree of
/// the first non-empty document is then turned into [`Node`]s that remember
/// where in the text each scalar sits. Parsing never fails, errors are
/// collected in [`ParseResult::errors`] and the recognized part of the tree
/// is kept.
pub fn parse(text: &str) -> ParseResult {
    let parsed = Yaml::parse(text);
    let errors = parsed
        .errors()
        .iter()
        .map(|e| e.to_string())
        .filter(|message| !message.starts_with(UNDEFINED_ALIAS))
        .map(ParseError::new)
        .collect();

    let yaml = parsed.tree();
    let mut builder = Builder::default();
    let root = yaml
        .documents()
        .find_map(|document| document.root_node())
        .and_then(|node| builder.content(&node));

    ParseResult {
        document: YamlDocument::new(Arc::from(text), builder.nodes, root),
        errors,
    }
}

#[derive(Default)]
struct Builder {
    nodes: Vec<Node>,
}

impl Builder {
    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    fn content(&mut self, node: &SyntaxNode) -> Option<NodeId> {
        let text = node.text().to_string();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let span = Some(trimmed_span(node, &text));
        let (anchor, tag) = properties(node);

        let kind = if trimmed.starts_with(['{', '[']) {
            NodeKind::Flow(Flow {
                raw: trimmed.to_string(),
            })
        } else if let Some(mapping) = Mapping::cast(node.clone()) {
            NodeKind::Map(self.map(&mapping))
        } else if let Some(sequence) = Sequence::cast(node.clone()) {
            let items = sequence
                .items()
                .filter_map(|item| self.content(&item))
                .collect();
            NodeKind::Seq(Seq { items })
        } else if let Some(name) = trimmed.strip_prefix('*') {
            NodeKind::Alias(Alias {
                name: name.to_string(),
            })
        } else if let Some(scalar) = CstScalar::cast(node.clone()) {
            NodeKind::Scalar(scalar_of(&scalar, trimmed, tag.as_deref()))
        } else {
            // tagged scalar: the tag token sits inside, next to the value
            let inner = node.children().find_map(CstScalar::cast)?;
            let tag = inner_tag(node);
            let id = self.content(inner.syntax())?;
            let built = &mut self.nodes[id.0];
            built.anchor = built.anchor.take().or(anchor);
            if let (Some(tag), NodeKind::Scalar(scalar)) = (&tag, &mut built.kind) {
                retype(scalar, tag);
            }
            built.tag = tag;
            return Some(id);
        };

        let mut built = Node::new(kind, span);
        built.anchor = anchor;
        built.tag = tag;
        Some(self.push(built))
    }

    fn map(&mut self, mapping: &Mapping) -> Map {
        let pairs = mapping
            .entries()
            .filter_map(|entry| {
                let key = entry.key().and_then(|key| self.key(&key))?;
                let value = entry
                    .value()
                    .and_then(|value| value.children().next())
                    .and_then(|content| self.content(&content));
                Some(Pair { key, value })
            })
            .collect();
        Map { pairs }
    }

    /// Keys are usually wrapped scalars, but a bare token key is accepted too
    fn key(&mut self, key: &SyntaxNode) -> Option<NodeId> {
        if let Some(content) = key.children().next() {
            return self.content(&content);
        }
        let text = key.text().to_string();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let scalar = Scalar::new(trimmed.to_string(), ScalarStyle::Plain);
        Some(self.push(Node::new(
            NodeKind::Scalar(scalar),
            Some(trimmed_span(key, &text)),
        )))
    }
}

/// Byte range of `node` without surrounding whitespace
fn trimmed_span(node: &SyntaxNode, text: &str) -> Span {
    let range = node.text_range();
    let start = usize::from(range.start()) + (text.len() - text.trim_start().len());
    let end = usize::from(range.end()) - (text.len() - text.trim_end().len());
    Span::new(start, end.max(start))
}

/// Anchor and tag written in front of a node, e.g. `&react` in
/// `- &react ^18.2.0`. Whitespace and comments in between are skipped.
fn properties(node: &SyntaxNode) -> (Option<String>, Option<String>) {
    let mut anchor = None;
    let mut tag = None;
    let mut cursor = node.prev_sibling_or_token();
    while let Some(rowan::NodeOrToken::Token(token)) = cursor {
        let text = token.text().trim();
        if let Some(name) = text.strip_prefix('&') {
            anchor.get_or_insert_with(|| name.to_string());
        } else if text.starts_with('!') {
            tag.get_or_insert_with(|| text.to_string());
        } else if !(text.is_empty() || text.starts_with('#')) {
            break;
        }
        cursor = token.prev_sibling_or_token();
    }
    (anchor, tag)
}

fn inner_tag(node: &SyntaxNode) -> Option<String> {
    node.children_with_tokens().find_map(|element| match element {
        rowan::NodeOrToken::Token(token) if token.text().starts_with('!') => {
            Some(token.text().to_string())
        }
        _ => None,
    })
}

fn scalar_of(scalar: &CstScalar, trimmed: &str, tag: Option<&str>) -> Scalar {
    let (value, style) = match trimmed.chars().next() {
        Some('\'') => (scalar.as_string(), ScalarStyle::SingleQuoted),
        Some('"') => (scalar.as_string(), ScalarStyle::DoubleQuoted),
        Some('|') => (block_value(trimmed, "\n"), ScalarStyle::Literal),
        Some('>') => (block_value(trimmed, " "), ScalarStyle::Folded),
        _ => (trimmed.to_string(), ScalarStyle::Plain),
    };
    let mut scalar = Scalar::new(value, style);
    if let Some(tag) = tag {
        retype(&mut scalar, tag);
    }
    scalar
}

/// `!!str 18` is a string whatever it looks like
fn retype(scalar: &mut Scalar, tag: &str) {
    if tag == "!!str" {
        scalar.ty = ScalarType::Str;
        scalar.parsed_ty = ScalarType::Str;
    }
}

/// Content of a `|` or `>` scalar: dedented lines joined by `separator`,
/// ending in a single newline unless the header strips it (`|-`).
fn block_value(text: &str, separator: &str) -> String {
    let mut lines = text.lines();
    let header = lines.next().unwrap_or_default();
    let body: Vec<&str> = lines.collect();
    let indent = body
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut value = body
        .iter()
        .map(|line| line.get(indent..).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(separator)
        .trim_end()
        .to_string();
    if !header.contains('-') && !value.is_empty() {
        value.push('\n');
    }
    value
}
