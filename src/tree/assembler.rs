//! Tree assembly
//!
//! Turns the collection returned by the store into a [`PartTree`]. The store
//! may send a flat list where each record names its parent, or a forest with
//! children embedded; both end up as the same tree.
//!
//! Records that cannot be placed are left out and reported as
//! [`AssemblyIssue`]s. Assembly itself never fails.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    parts::{Part, PartId, PartRecord},
    tree::{Label, PartKey, PartTree},
};

/// A record left out of the assembled tree.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssemblyIssue {
    /// The record's parent is not part of the collection.
    #[error("part {id} references missing parent {parent_id}")]
    OrphanReference {
        /// The dropped record
        id: PartId,

        /// The parent it names
        parent_id: PartId,
    },

    /// The record's parent exists but no root leads to it, either because an
    /// ancestor was dropped or because its ancestors form a cycle.
    #[error("part {id} is not reachable from any root")]
    Unreachable {
        /// The dropped record
        id: PartId,
    },

    /// Another record earlier in the collection already used this id.
    #[error("part id {id} appears more than once")]
    DuplicateId {
        /// The repeated id
        id: PartId,
    },

    /// The record has no id and cannot be referenced.
    #[error("part {name:?} has no id")]
    MissingId {
        /// Name of the dropped record
        name: String,
    },
}

/// Result of assembling a collection.
#[derive(Debug, Clone, Default)]
pub struct Assembly {
    /// The assembled forest
    pub tree: PartTree,

    /// Records that were left out, in the order they were found
    pub issues: Vec<AssemblyIssue>,
}

impl Assembly {
    /// Orphan references among the issues.
    pub fn orphans(&self) -> impl Iterator<Item = &AssemblyIssue> {
        self.issues
            .iter()
            .filter(|issue| matches!(issue, AssemblyIssue::OrphanReference { .. }))
    }
}

/// Assemble store records, flat or nested, into a labelled tree.
///
/// Siblings keep their relative order from `records`.
#[must_use]
pub fn assemble(records: Vec<PartRecord>) -> Assembly {
    let mut issues = Vec::new();

    let parts = flatten(records);
    let mut staged: Vec<Option<Part>> = Vec::with_capacity(parts.len());
    let mut positions: FxHashMap<PartId, usize> = FxHashMap::default();

    for part in parts {
        let Some(id) = part.id else {
            issues.push(AssemblyIssue::MissingId { name: part.name });
            continue;
        };

        if positions.contains_key(&id) {
            issues.push(AssemblyIssue::DuplicateId { id });
            continue;
        }

        positions.insert(id, staged.len());
        staged.push(Some(part));
    }

    let mut roots: SmallVec<[usize; 8]> = SmallVec::new();
    let mut children: FxHashMap<PartId, SmallVec<[usize; 4]>> = FxHashMap::default();
    let mut orphaned: FxHashSet<PartId> = FxHashSet::default();

    for (position, part) in staged.iter().enumerate() {
        let Some(part) = part else { continue };
        let Some(id) = part.id else { continue };

        match part.parent_id {
            None => roots.push(position),
            Some(parent_id) if positions.contains_key(&parent_id) => {
                children.entry(parent_id).or_default().push(position);
            }
            Some(parent_id) => {
                orphaned.insert(id);
                issues.push(AssemblyIssue::OrphanReference { id, parent_id });
            }
        }
    }

    let mut tree = PartTree::new();

    let mut stack: Vec<(usize, Option<PartKey>, Label)> = Vec::new();
    push_siblings(&mut stack, &roots, None, None);

    while let Some((position, parent, label)) = stack.pop() {
        let Some(part) = staged.get_mut(position).and_then(Option::take) else {
            continue;
        };

        let id = part.id;
        let key = tree.insert(part, parent, label.clone());

        if let Some(siblings) = id.and_then(|id| children.get(&id)) {
            push_siblings(&mut stack, siblings, Some(key), Some(&label));
        }
    }

    for part in staged.into_iter().flatten() {
        if let Some(id) = part.id
            && !orphaned.contains(&id)
        {
            issues.push(AssemblyIssue::Unreachable { id });
        }
    }

    Assembly { tree, issues }
}

/// Queue siblings so that they pop off the stack in their original order.
fn push_siblings(
    stack: &mut Vec<(usize, Option<PartKey>, Label)>,
    siblings: &[usize],
    parent: Option<PartKey>,
    parent_label: Option<&Label>,
) {
    for (idx, position) in siblings.iter().enumerate().rev() {
        let ordinal = u32::try_from(idx + 1).unwrap_or(u32::MAX);

        let label = match parent_label {
            Some(parent_label) => parent_label.child(ordinal),
            None => Label::root(ordinal),
        };

        stack.push((*position, parent, label));
    }
}

/// Flatten embedded children in pre-order. An embedded child belongs to the
/// record that carries it, so its `parent_id` is overwritten with that
/// record's id.
fn flatten(records: Vec<PartRecord>) -> Vec<Part> {
    let mut flat = Vec::with_capacity(records.len());
    let mut stack: Vec<(PartRecord, Option<PartId>)> =
        records.into_iter().rev().map(|record| (record, None)).collect();

    while let Some((record, enclosing)) = stack.pop() {
        let (mut part, embedded) = record.into_parts();

        if enclosing.is_some() {
            part.parent_id = enclosing;
        }

        let id = part.id;
        flat.push(part);

        stack.extend(embedded.into_iter().rev().map(|child| (child, id)));
    }

    flat
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn record(id: u64, parent_id: Option<u64>) -> PartRecord {
        PartRecord {
            id: Some(PartId::new(id)),
            name: format!("Part {id}"),
            unit_price: 1,
            quantity: 1,
            parent_id: parent_id.map(PartId::new),
            total_price: None,
            children: Vec::new(),
        }
    }

    fn labels(assembly: &Assembly) -> Vec<(u64, String)> {
        assembly
            .tree
            .walk()
            .filter_map(|(key, _)| assembly.tree.get(key))
            .filter_map(|node| Some((node.id()?.get(), node.label().to_string())))
            .collect()
    }

    #[test]
    fn flat_records_become_a_labelled_forest() {
        let assembly = assemble(vec![
            record(1, None),
            record(2, Some(1)),
            record(3, None),
            record(4, Some(3)),
            record(5, Some(3)),
            record(6, Some(5)),
        ]);

        assert!(assembly.issues.is_empty());
        assert_eq!(assembly.tree.roots().len(), 2);
        assert_eq!(
            labels(&assembly),
            vec![
                (1, "1".to_string()),
                (2, "1.1".to_string()),
                (3, "2".to_string()),
                (4, "2.1".to_string()),
                (5, "2.2".to_string()),
                (6, "2.2.1".to_string()),
            ]
        );
    }

    #[test]
    fn children_listed_before_their_parent_still_attach() {
        let assembly = assemble(vec![record(2, Some(1)), record(3, Some(1)), record(1, None)]);

        assert!(assembly.issues.is_empty());
        assert_eq!(
            labels(&assembly),
            vec![
                (1, "1".to_string()),
                (2, "1.1".to_string()),
                (3, "1.2".to_string()),
            ]
        );
    }

    #[test]
    fn sibling_order_follows_input_order() {
        let assembly = assemble(vec![
            record(1, None),
            record(9, Some(1)),
            record(4, Some(1)),
            record(7, Some(1)),
        ]);

        let children: Vec<u64> = assembly
            .tree
            .roots()
            .first()
            .map(|root| assembly.tree.children(*root))
            .unwrap_or_default()
            .iter()
            .filter_map(|key| assembly.tree.get(*key)?.id())
            .map(PartId::get)
            .collect();

        assert_eq!(children, vec![9, 4, 7]);
    }

    #[test]
    fn nested_records_are_flattened_under_their_carrier() -> TestResult {
        let mut root = record(1, None);
        let mut middle = record(2, None);
        middle.children.push(record(3, None));
        root.children.push(middle);
        root.children.push(record(4, Some(1)));

        let assembly = assemble(vec![root, record(5, None)]);

        assert!(assembly.issues.is_empty());
        assert_eq!(
            labels(&assembly),
            vec![
                (1, "1".to_string()),
                (2, "1.1".to_string()),
                (3, "1.1.1".to_string()),
                (4, "1.2".to_string()),
                (5, "2".to_string()),
            ]
        );

        let leaf = assembly
            .tree
            .find(PartId::new(3))
            .and_then(|key| assembly.tree.get(key))
            .ok_or("leaf missing")?;

        assert_eq!(leaf.part().parent_id, Some(PartId::new(2)));

        Ok(())
    }

    #[test]
    fn orphan_is_dropped_and_reported_once() {
        let assembly = assemble(vec![record(1, None), record(2, Some(99)), record(3, Some(1))]);

        assert_eq!(assembly.tree.len(), 2);
        assert!(assembly.tree.find(PartId::new(2)).is_none());
        assert_eq!(
            assembly.issues,
            vec![AssemblyIssue::OrphanReference {
                id: PartId::new(2),
                parent_id: PartId::new(99),
            }]
        );
    }

    #[test]
    fn descendants_of_an_orphan_are_unreachable() {
        let assembly = assemble(vec![record(1, None), record(2, Some(99)), record(3, Some(2))]);

        assert_eq!(assembly.tree.len(), 1);
        assert_eq!(assembly.orphans().count(), 1);
        assert!(
            assembly
                .issues
                .contains(&AssemblyIssue::Unreachable { id: PartId::new(3) })
        );
    }

    #[test]
    fn cycles_are_unreachable() {
        let assembly = assemble(vec![
            record(1, None),
            record(2, Some(3)),
            record(3, Some(2)),
            record(4, Some(4)),
        ]);

        assert_eq!(assembly.tree.len(), 1);
        assert_eq!(
            assembly.issues,
            vec![
                AssemblyIssue::Unreachable { id: PartId::new(2) },
                AssemblyIssue::Unreachable { id: PartId::new(3) },
                AssemblyIssue::Unreachable { id: PartId::new(4) },
            ]
        );
    }

    #[test]
    fn duplicate_and_missing_ids_are_reported() {
        let mut nameless = record(0, None);
        nameless.id = None;
        nameless.name = "Loose".to_string();

        let assembly = assemble(vec![record(1, None), record(1, None), nameless]);

        assert_eq!(assembly.tree.len(), 1);
        assert_eq!(
            assembly.issues,
            vec![
                AssemblyIssue::DuplicateId { id: PartId::new(1) },
                AssemblyIssue::MissingId {
                    name: "Loose".to_string()
                },
            ]
        );
    }

    #[test]
    fn empty_collection_gives_empty_tree() {
        let assembly = assemble(Vec::new());

        assert!(assembly.tree.is_empty());
        assert!(assembly.issues.is_empty());
    }
}
