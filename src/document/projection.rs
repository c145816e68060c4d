//! Field projections
//!
//! A projection is a prefix tree of dotted field paths. The top level holds
//! the attribute names read from a record; each subtree holds what remains of
//! the paths below that attribute and travels with it when the attribute is
//! embedded.

/// Ordered tree of requested field paths
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldProjection {
    children: Vec<(String, FieldProjection)>,
}

impl FieldProjection {
    /// Creates an empty projection
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a projection from dotted paths, keeping first-seen order
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut projection = Self::new();
        for path in paths {
            projection.insert(path.as_ref());
        }
        projection
    }

    /// Adds a dotted path. Empty segments are ignored.
    pub fn insert(&mut self, path: &str) {
        let mut node = self;
        for segment in path.split('.').filter(|s| !s.is_empty()) {
            let index = match node.children.iter().position(|(name, _)| name == segment) {
                Some(index) => index,
                None => {
                    node.children.push((segment.to_string(), Self::new()));
                    node.children.len() - 1
                }
            };
            node = &mut node.children[index].1;
        }
    }

    /// Returns a copy with `fields` appended where absent
    pub fn with_fields<'f>(&self, fields: impl IntoIterator<Item = &'f str>) -> Self {
        let mut projection = self.clone();
        for field in fields {
            projection.insert(field);
        }
        projection
    }

    /// Top-level attribute names, in order
    pub fn heads(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(|(name, _)| name.as_str())
    }

    /// Remaining paths below `head`
    pub fn child(&self, head: &str) -> Option<&FieldProjection> {
        self.children
            .iter()
            .find(|(name, _)| name == head)
            .map(|(_, child)| child)
    }

    pub fn contains(&self, head: &str) -> bool {
        self.child(head).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of top-level attributes
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Flattens the tree back into dotted leaf paths
    pub fn paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        for (name, child) in &self.children {
            if child.is_empty() {
                paths.push(name.clone());
            } else {
                paths.extend(
                    child
                        .paths()
                        .into_iter()
                        .map(|rest| format!("{}.{}", name, rest)),
                );
            }
        }
        paths
    }
}
