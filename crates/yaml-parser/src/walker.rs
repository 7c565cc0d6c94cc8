use crate::yaml_tree::{Node, NodeId, NodeKind, Pair, YamlDocument};

/// One step of the structural path from the document root to the item
/// currently being visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathItem {
    /// Always the first element
    Document,
    Map(NodeId),
    Seq(NodeId),
    /// Entered while visiting the key and value of this pair
    Pair(Pair),
}

/// What the walker is currently looking at
#[derive(Debug, Clone, Copy)]
pub enum Visited<'a> {
    Pair(&'a Pair),
    Node(NodeId, &'a Node),
}

/// Visitor verdict
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visit<T> {
    /// Stop the walk and return the value
    Break(T),
    /// Keep going, descending into children
    Continue,
    /// Keep going, but do not descend into this item's children
    Skip,
}

impl YamlDocument {
    /// Depth-first, preorder walk in document order.
    ///
    /// Every node is visited, including pair keys. A pair is visited before
    /// its key and value; while its key and value are walked the pair sits on
    /// the path. The path passed to the visitor holds the ancestors of the
    /// visited item, starting with [`PathItem::Document`].
    pub fn walk<T, F>(&self, mut visitor: F) -> Option<T>
    where
        F: FnMut(Visited<'_>, &[PathItem]) -> Visit<T>,
    {
        let root = self.root()?;
        let mut path = vec![PathItem::Document];
        self.walk_node(root, &mut path, &mut visitor)
    }

    fn walk_node<T, F>(&self, id: NodeId, path: &mut Vec<PathItem>, visitor: &mut F) -> Option<T>
    where
        F: FnMut(Visited<'_>, &[PathItem]) -> Visit<T>,
    {
        let node = self.node(id)?;
        match visitor(Visited::Node(id, node), path) {
            Visit::Break(found) => return Some(found),
            Visit::Skip => return None,
            Visit::Continue => {}
        }

        match &node.kind {
            NodeKind::Map(map) => {
                path.push(PathItem::Map(id));
                let found = map
                    .pairs
                    .iter()
                    .find_map(|pair| self.walk_pair(pair, path, visitor));
                path.pop();
                found
            }
            NodeKind::Seq(seq) => {
                path.push(PathItem::Seq(id));
                let found = seq
                    .items
                    .iter()
                    .find_map(|item| self.walk_node(*item, path, visitor));
                path.pop();
                found
            }
            NodeKind::Scalar(_) | NodeKind::Alias(_) | NodeKind::Flow(_) => None,
        }
    }

    fn walk_pair<T, F>(&self, pair: &Pair, path: &mut Vec<PathItem>, visitor: &mut F) -> Option<T>
    where
        F: FnMut(Visited<'_>, &[PathItem]) -> Visit<T>,
    {
        match visitor(Visited::Pair(pair), path) {
            Visit::Break(found) => return Some(found),
            Visit::Skip => return None,
            Visit::Continue => {}
        }

        path.push(PathItem::Pair(*pair));
        let found = self
            .walk_node(pair.key, path, visitor)
            .or_else(|| pair.value.and_then(|v| self.walk_node(v, path, visitor)));
        path.pop();
        found
    }

    /// Find the first string scalar, in walk order, anchored as `name`.
    ///
    /// When several nodes carry the same anchor the first one wins.
    pub fn find_anchor(&self, name: &str) -> Option<NodeId> {
        self.walk(|visited, _| match visited {
            Visited::Node(id, node)
                if node.anchor.as_deref() == Some(name)
                    && node.as_scalar().is_some_and(|s| s.is_str()) =>
            {
                Visit::Break(id)
            }
            _ => Visit::Continue,
        })
    }

    /// Resolve an alias node to the scalar it refers to.
    ///
    /// The returned handle addresses the anchored node itself, so an edit
    /// through it is seen by every alias of that anchor. Returns `None` for
    /// dangling aliases and when `alias` is not an alias node.
    pub fn resolve_alias(&self, alias: NodeId) -> Option<NodeId> {
        let name = &self.alias(alias)?.name;
        self.find_anchor(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn test_walk_visits_in_document_order() {
        let doc = parse("a: 1\nb:\n  c: 2\nd: [x]\n").document;
        let mut seen = Vec::new();
        doc.walk::<(), _>(|visited, _| {
            if let Visited::Node(id, node) = visited {
                if node.as_scalar().is_some() {
                    seen.push(doc.text_of(id));
                }
            }
            Visit::Continue
        });
        assert_eq!(seen, vec!["a", "1", "b", "c", "2", "d"]);
    }

    #[test]
    fn test_walk_path_holds_ancestors() {
        let doc = parse("catalogs:\n  legacy:\n    lodash: ^3.10.0\n").document;
        let path = doc
            .walk(|visited, path| match visited {
                Visited::Pair(pair) if doc.text_of(pair.key) == "lodash" => Visit::Break(path.to_vec()),
                _ => Visit::Continue,
            })
            .unwrap();

        assert_eq!(path.len(), 6);
        assert_eq!(path[0], PathItem::Document);
        assert!(matches!(path[1], PathItem::Map(_)));
        let PathItem::Pair(outer) = path[2] else {
            panic!("expected a pair");
        };
        assert_eq!(doc.text_of(outer.key), "catalogs");
        let PathItem::Pair(inner) = path[4] else {
            panic!("expected a pair");
        };
        assert_eq!(doc.text_of(inner.key), "legacy");
        assert!(matches!(path[5], PathItem::Map(_)));
    }

    #[test]
    fn test_walk_skip_does_not_descend() {
        let doc = parse("a:\n  b: 1\nc: 2\n").document;
        let mut keys = Vec::new();
        doc.walk::<(), _>(|visited, _| match visited {
            Visited::Pair(pair) => {
                keys.push(doc.text_of(pair.key));
                if doc.text_of(pair.key) == "a" {
                    Visit::Skip
                } else {
                    Visit::Continue
                }
            }
            _ => Visit::Continue,
        });
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn test_resolve_alias_defined_later() {
        let doc = parse("catalog:\n  react-dom: *react\n  react: &react ^18.2.0\n").document;
        let alias = doc.get_path(&["catalog", "react-dom"]).unwrap();
        let anchor = doc.resolve_alias(alias).unwrap();
        assert_eq!(Some(anchor), doc.get_path(&["catalog", "react"]));
        assert_eq!(doc.scalar(anchor).unwrap().value, "^18.2.0");
    }

    #[test]
    fn test_resolve_alias_is_stable() {
        let doc = parse("d:\n  - &v ^1.0.0\na: *v\nb: *v\n").document;
        let a = doc.resolve_alias(doc.get_path(&["a"]).unwrap());
        let b = doc.resolve_alias(doc.get_path(&["b"]).unwrap());
        assert!(a.is_some());
        assert_eq!(a, b);
        assert_eq!(a, doc.resolve_alias(doc.get_path(&["a"]).unwrap()));
    }

    #[test]
    fn test_resolve_dangling_alias() {
        let doc = parse("catalog:\n  react: ^18.2.0\n  react-dom: *react\n").document;
        let alias = doc.get_path(&["catalog", "react-dom"]).unwrap();
        assert!(doc.resolve_alias(alias).is_none());
        // not an alias at all
        let scalar = doc.get_path(&["catalog", "react"]).unwrap();
        assert!(doc.resolve_alias(scalar).is_none());
    }

    #[test]
    fn test_resolve_ignores_non_string_anchors() {
        let doc = parse("v: &v 18\nreact: *v\n").document;
        let alias = doc.get_path(&["react"]).unwrap();
        assert!(doc.resolve_alias(alias).is_none());
    }

    #[test]
    fn test_duplicate_anchor_first_wins() {
        let doc = parse("a: &v ^1.0.0\nb: &v ^2.0.0\nc: *v\n").document;
        let anchor = doc.resolve_alias(doc.get_path(&["c"]).unwrap()).unwrap();
        assert_eq!(doc.scalar(anchor).unwrap().value, "^1.0.0");
    }

    #[test]
    fn test_write_through_alias_is_shared() {
        let mut doc = parse("d:\n  - &v ^1.0.0 # shared\na: *v\nb: *v\n").document;
        let anchor = doc.resolve_alias(doc.get_path(&["a"]).unwrap()).unwrap();
        assert!(doc.set_scalar(anchor, "^1.1.0"));

        assert_eq!(doc.to_string(), "d:\n  - &v ^1.1.0 # shared\na: *v\nb: *v\n");
        let via_b = doc.resolve_alias(doc.get_path(&["b"]).unwrap()).unwrap();
        assert_eq!(doc.scalar(via_b).unwrap().value, "^1.1.0");
    }
}
