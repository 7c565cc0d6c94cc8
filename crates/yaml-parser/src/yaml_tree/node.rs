use std::sync::OnceLock;

use regex::Regex;

/// Handle to a node stored in a [`YamlDocument`](crate::YamlDocument).
///
/// Handles are only meaningful for the document that produced them and for
/// its clones, which keep the same arena layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// Byte range into the document source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// A node in the YAML tree
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// Anchor name declared on this node, e.g. `react` for `&react ^18.2.0`
    pub anchor: Option<String>,
    /// Tag kept verbatim, e.g. `!!str`
    pub tag: Option<String>,
    /// Source range of the node body. `None` for nodes created after parsing.
    pub span: Option<Span>,
}

impl Node {
    pub fn new(kind: NodeKind, span: Option<Span>) -> Self {
        Self {
            kind,
            anchor: None,
            tag: None,
            span,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match &self.kind {
            NodeKind::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_alias(&self) -> Option<&Alias> {
        match &self.kind {
            NodeKind::Alias(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match &self.kind {
            NodeKind::Map(m) => Some(m),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Map(Map),
    Seq(Seq),
    Scalar(Scalar),
    Alias(Alias),
    /// Flow collection (`{...}` or `[...]`) kept as opaque text
    Flow(Flow),
}

/// Block mapping, entries in document order
#[derive(Debug, Clone, Default)]
pub struct Map {
    pub pairs: Vec<Pair>,
}

/// A key/value entry of a [`Map`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pair {
    pub key: NodeId,
    /// `None` when the key has no value at all (`key:` followed by nothing)
    pub value: Option<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct Seq {
    pub items: Vec<NodeId>,
}

/// Reference to an anchored node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flow {
    pub raw: String,
}

/// Leaf value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scalar {
    /// The decoded value (quotes and escapes removed)
    pub value: String,
    pub style: ScalarStyle,
    pub ty: ScalarType,
    /// Type at parse time, used to decide how an edited value is quoted
    pub(crate) parsed_ty: ScalarType,
    /// Set once the value was changed after parsing
    pub(crate) edited: bool,
}

impl Scalar {
    pub fn new(value: String, style: ScalarStyle) -> Self {
        let ty = ScalarType::resolve(&value, style);
        Self {
            value,
            style,
            ty,
            parsed_ty: ty,
            edited: false,
        }
    }

    pub fn is_str(&self) -> bool {
        self.ty == ScalarType::Str
    }
}

/// How a scalar was written in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarStyle {
    /// `react: ^18.2.0`
    Plain,
    /// `react: '^18.2.0'`
    SingleQuoted,
    /// `react: "^18.2.0"`
    DoubleQuoted,
    /// `key: |`
    Literal,
    /// `key: >`
    Folded,
}

/// Core schema type of a scalar. Only plain scalars can resolve to
/// anything other than `Str`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Str,
    Int,
    Float,
    Bool,
    Null,
}

static INT_RE: OnceLock<Regex> = OnceLock::new();
static FLOAT_RE: OnceLock<Regex> = OnceLock::new();

fn int_re() -> &'static Regex {
    INT_RE.get_or_init(|| Regex::new(r"^(?:[-+]?[0-9]+|0o[0-7]+|0x[0-9a-fA-F]+)$").unwrap())
}

fn float_re() -> &'static Regex {
    FLOAT_RE.get_or_init(|| {
        Regex::new(
            r"^(?:[-+]?(?:\.[0-9]+|[0-9]+(?:\.[0-9]*)?)(?:[eE][-+]?[0-9]+)?|[-+]?\.(?:inf|Inf|INF)|\.(?:nan|NaN|NAN))$",
        )
        .unwrap()
    })
}

impl ScalarType {
    pub fn resolve(value: &str, style: ScalarStyle) -> Self {
        if style != ScalarStyle::Plain {
            return Self::Str;
        }
        match value {
            "" | "~" | "null" | "Null" | "NULL" => Self::Null,
            "true" | "True" | "TRUE" | "false" | "False" | "FALSE" => Self::Bool,
            v if int_re().is_match(v) => Self::Int,
            v if float_re().is_match(v) => Self::Float,
            _ => Self::Str,
        }
    }
}
