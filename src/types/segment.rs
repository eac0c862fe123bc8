//! Path segments produced by the traversal driver.
//!
//! A walk from a root is a tree of segments. Each segment holds one node and a
//! shared back-reference ("trunk") to the segment it descended from, so many
//! walks can share a common prefix without copying it.

use std::collections::HashSet;
use std::sync::Arc;

use super::node::{Kinds, Node, NodeId};

/// One step of a walk: a node plus its trunk.
///
/// Segments are immutable once built. Cloning is cheap (an `Arc` bump).
#[derive(Debug, Clone)]
pub struct PathSegment(Arc<SegmentInner>);

#[derive(Debug)]
struct SegmentInner {
    node: Node,
    trunk: Option<PathSegment>,
    depth: usize,
}

impl PathSegment {
    /// Create the root segment of a walk.
    pub fn root(node: Node) -> Self {
        Self(Arc::new(SegmentInner {
            node,
            trunk: None,
            depth: 0,
        }))
    }

    /// Descend from this segment to `node`, returning the new terminal segment.
    pub fn descend(&self, node: Node) -> Self {
        Self(Arc::new(SegmentInner {
            node,
            trunk: Some(self.clone()),
            depth: self.0.depth + 1,
        }))
    }

    /// Build a single chain from a root through each following node.
    ///
    /// Returns `None` for an empty iterator.
    pub fn chain<I: IntoIterator<Item = Node>>(nodes: I) -> Option<Self> {
        let mut nodes = nodes.into_iter();
        let mut cursor = Self::root(nodes.next()?);
        for node in nodes {
            cursor = cursor.descend(node);
        }
        Some(cursor)
    }

    /// The node at this step.
    pub fn node(&self) -> &Node {
        &self.0.node
    }

    /// The node identifier at this step.
    pub fn id(&self) -> NodeId {
        self.0.node.id
    }

    /// The kinds of the node at this step.
    pub fn kinds(&self) -> &Kinds {
        &self.0.node.kinds
    }

    /// The segment this one descended from.
    pub fn trunk(&self) -> Option<&PathSegment> {
        self.0.trunk.as_ref()
    }

    /// Number of hops from the root (the root has depth 0).
    pub fn depth(&self) -> usize {
        self.0.depth
    }

    /// Whether this is a root segment.
    pub fn is_root(&self) -> bool {
        self.0.trunk.is_none()
    }

    /// Iterate from this segment back to the root, this segment first.
    pub fn walk_reverse(&self) -> WalkReverse<'_> {
        WalkReverse { cursor: Some(self) }
    }

    /// Node identifiers from root to this segment.
    pub fn ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.walk_reverse().map(PathSegment::id).collect();
        ids.reverse();
        ids
    }

    /// Whether any node appears more than once on the walk.
    pub fn is_cycle(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.depth() + 1);
        self.walk_reverse().any(|segment| !seen.insert(segment.id()))
    }
}

// Unlink trunks iteratively so dropping a deep walk cannot overflow the stack.
impl Drop for SegmentInner {
    fn drop(&mut self) {
        let mut trunk = self.trunk.take();
        while let Some(segment) = trunk {
            match Arc::try_unwrap(segment.0) {
                Ok(mut inner) => trunk = inner.trunk.take(),
                Err(_) => break,
            }
        }
    }
}

/// Iterator over a segment and its trunk chain.
pub struct WalkReverse<'a> {
    cursor: Option<&'a PathSegment>,
}

impl<'a> Iterator for WalkReverse<'a> {
    type Item = &'a PathSegment;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.cursor?;
        self.cursor = current.trunk();
        Some(current)
    }
}
