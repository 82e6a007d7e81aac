//! Part Tree
//!
//! An arena of assembled part nodes. Every node knows its part, its parent,
//! its ordered children and the positional label it was given during
//! assembly. Costs are filled in afterwards by [`crate::costs::aggregate`].

use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

use crate::parts::{Part, PartId};

pub mod assembler;
pub mod label;

pub use assembler::{Assembly, AssemblyIssue, assemble};
pub use label::Label;

new_key_type! {
    /// Key of a node in a [`PartTree`].
    pub struct PartKey;
}

/// Locally derived costs of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeCosts {
    /// `unit_price * quantity`
    pub line: u64,

    /// Line cost plus the rollup of every child
    pub rollup: u64,
}

/// A part placed in the tree.
#[derive(Debug, Clone)]
pub struct PartNode {
    part: Part,
    parent: Option<PartKey>,
    children: SmallVec<[PartKey; 4]>,
    label: Label,
    costs: Option<NodeCosts>,
}

impl PartNode {
    /// The part itself.
    #[must_use]
    pub fn part(&self) -> &Part {
        &self.part
    }

    /// Store identifier. Every assembled node has one.
    #[must_use]
    pub fn id(&self) -> Option<PartId> {
        self.part.id
    }

    /// Key of the parent node, `None` for roots.
    #[must_use]
    pub fn parent(&self) -> Option<PartKey> {
        self.parent
    }

    /// Keys of the children, in store order.
    #[must_use]
    pub fn children(&self) -> &[PartKey] {
        &self.children
    }

    /// Positional label.
    #[must_use]
    pub fn label(&self) -> &Label {
        &self.label
    }

    /// Costs, once the tree has been aggregated.
    #[must_use]
    pub fn costs(&self) -> Option<NodeCosts> {
        self.costs
    }
}

/// Forest of assembled parts.
#[derive(Debug, Clone, Default)]
pub struct PartTree {
    nodes: SlotMap<PartKey, PartNode>,
    roots: Vec<PartKey>,
    index: FxHashMap<PartId, PartKey>,
}

impl PartTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Root keys in store order.
    #[must_use]
    pub fn roots(&self) -> &[PartKey] {
        &self.roots
    }

    /// Look up a node.
    #[must_use]
    pub fn get(&self, key: PartKey) -> Option<&PartNode> {
        self.nodes.get(key)
    }

    /// Find the node holding the part with the given id.
    #[must_use]
    pub fn find(&self, id: PartId) -> Option<PartKey> {
        self.index.get(&id).copied()
    }

    /// Children of a node; empty for unknown keys.
    #[must_use]
    pub fn children(&self, key: PartKey) -> &[PartKey] {
        self.nodes.get(key).map_or(&[], |node| node.children.as_slice())
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth-first, pre-order walk yielding each key with its depth.
    #[must_use]
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            tree: self,
            stack: self.roots.iter().rev().map(|key| (*key, 0)).collect(),
        }
    }

    pub(crate) fn insert(&mut self, part: Part, parent: Option<PartKey>, label: Label) -> PartKey {
        let id = part.id;

        let key = self.nodes.insert(PartNode {
            part,
            parent,
            children: SmallVec::new(),
            label,
            costs: None,
        });

        match parent.and_then(|parent| self.nodes.get_mut(parent)) {
            Some(parent) => parent.children.push(key),
            None => self.roots.push(key),
        }

        if let Some(id) = id {
            self.index.insert(id, key);
        }

        key
    }

    pub(crate) fn set_costs(&mut self, key: PartKey, costs: NodeCosts) {
        if let Some(node) = self.nodes.get_mut(key) {
            node.costs = Some(costs);
        }
    }
}

/// Pre-order iterator over a [`PartTree`].
#[derive(Debug)]
pub struct Walk<'a> {
    tree: &'a PartTree,
    stack: Vec<(PartKey, usize)>,
}

impl Iterator for Walk<'_> {
    type Item = (PartKey, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (key, depth) = self.stack.pop()?;

        self.stack.extend(
            self.tree
                .children(key)
                .iter()
                .rev()
                .map(|child| (*child, depth + 1)),
        );

        Some((key, depth))
    }
}
