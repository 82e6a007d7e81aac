//! Costs
//!
//! Line and rollup costs for an assembled [`PartTree`], plus a check of the
//! totals the store reported against the ones computed here.

use thiserror::Error;

use crate::{
    parts::PartId,
    tree::{NodeCosts, PartKey, PartTree},
};

/// Errors that can occur while computing costs.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CostError {
    /// An amount did not fit a `u64`.
    #[error("cost of part {id:?} overflows")]
    Overflow {
        /// Part whose cost overflowed
        id: Option<PartId>,
    },
}

/// Which local figure a store-reported `total_price` should equal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TotalBasis {
    /// Own line cost plus all descendants.
    #[default]
    Rollup,

    /// Own line cost only.
    Line,
}

/// A store-reported total that disagrees with the local computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TotalMismatch {
    /// Part in question
    pub id: PartId,

    /// What the store sent
    pub reported: u64,

    /// What was computed locally
    pub computed: u64,
}

/// Compute line and rollup costs for every node, leaves first.
///
/// Costs are derived from the parts alone, so running this again on an
/// unchanged tree yields the same figures.
///
/// # Errors
///
/// Returns [`CostError::Overflow`] if any amount exceeds `u64::MAX`.
pub fn aggregate(tree: &mut PartTree) -> Result<(), CostError> {
    let order: Vec<PartKey> = tree.walk().map(|(key, _)| key).collect();

    // Reversed pre-order visits every child before its parent.
    for key in order.into_iter().rev() {
        let Some(node) = tree.get(key) else { continue };

        let id = node.id();
        let line = node.part().line_total()?;

        let rollup = node.children().iter().try_fold(line, |acc, child| {
            let child_rollup = tree
                .get(*child)
                .and_then(|child| child.costs())
                .map_or(0, |costs| costs.rollup);

            acc.checked_add(child_rollup)
                .ok_or(CostError::Overflow { id })
        })?;

        tree.set_costs(key, NodeCosts { line, rollup });
    }

    Ok(())
}

/// Sum of the rollups of every root.
///
/// # Errors
///
/// Returns [`CostError::Overflow`] if the sum exceeds `u64::MAX`.
pub fn grand_total(tree: &PartTree) -> Result<u64, CostError> {
    tree.roots().iter().try_fold(0_u64, |acc, root| {
        let rollup = tree
            .get(*root)
            .and_then(|node| node.costs())
            .map_or(0, |costs| costs.rollup);

        acc.checked_add(rollup)
            .ok_or(CostError::Overflow { id: None })
    })
}

/// Compare store-reported totals against the aggregated costs.
///
/// Nodes without a reported total, or not yet aggregated, are skipped.
/// Mismatches are returned, never corrected.
#[must_use]
pub fn verify(tree: &PartTree, basis: TotalBasis) -> Vec<TotalMismatch> {
    tree.walk()
        .filter_map(|(key, _)| tree.get(key))
        .filter_map(|node| {
            let id = node.id()?;
            let reported = node.part().total_price?;
            let costs = node.costs()?;

            let computed = match basis {
                TotalBasis::Rollup => costs.rollup,
                TotalBasis::Line => costs.line,
            };

            (reported != computed).then_some(TotalMismatch {
                id,
                reported,
                computed,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::{
        parts::PartRecord,
        tree::{PartNode, assemble},
    };

    fn record(id: u64, parent_id: Option<u64>, unit_price: u64, quantity: u32) -> PartRecord {
        PartRecord {
            id: Some(PartId::new(id)),
            name: format!("Part {id}"),
            unit_price,
            quantity,
            parent_id: parent_id.map(PartId::new),
            total_price: None,
            children: Vec::new(),
        }
    }

    fn costs_of(tree: &PartTree, id: u64) -> Option<NodeCosts> {
        tree.find(PartId::new(id))
            .and_then(|key| tree.get(key))
            .and_then(PartNode::costs)
    }

    fn snapshot_costs(tree: &PartTree) -> Vec<Option<NodeCosts>> {
        tree.walk()
            .map(|(key, _)| tree.get(key).and_then(PartNode::costs))
            .collect()
    }

    fn sample() -> PartTree {
        assemble(vec![
            record(1, None, 100, 3),
            record(2, Some(1), 10, 2),
            record(3, Some(1), 5, 1),
        ])
        .tree
    }

    #[test]
    fn leaves_cost_price_times_quantity_and_parents_roll_up() -> TestResult {
        let mut tree = sample();

        aggregate(&mut tree)?;

        assert_eq!(costs_of(&tree, 2), Some(NodeCosts { line: 20, rollup: 20 }));
        assert_eq!(costs_of(&tree, 3), Some(NodeCosts { line: 5, rollup: 5 }));
        assert_eq!(
            costs_of(&tree, 1),
            Some(NodeCosts {
                line: 300,
                rollup: 325
            })
        );

        Ok(())
    }

    #[test]
    fn rollup_spans_every_descendant() -> TestResult {
        let mut tree = assemble(vec![
            record(1, None, 0, 1),
            record(2, Some(1), 1, 1),
            record(3, Some(2), 10, 1),
            record(4, Some(3), 100, 1),
        ])
        .tree;

        aggregate(&mut tree)?;

        assert_eq!(costs_of(&tree, 1).map(|costs| costs.rollup), Some(111));
        assert_eq!(costs_of(&tree, 2).map(|costs| costs.rollup), Some(111));
        assert_eq!(costs_of(&tree, 3).map(|costs| costs.rollup), Some(110));

        Ok(())
    }

    #[test]
    fn aggregation_is_idempotent() -> TestResult {
        let mut tree = sample();

        aggregate(&mut tree)?;
        let first = snapshot_costs(&tree);

        aggregate(&mut tree)?;
        let second = snapshot_costs(&tree);

        assert_eq!(first, second);

        Ok(())
    }

    #[test]
    fn overflow_is_reported() {
        let mut tree = assemble(vec![
            record(1, None, u64::MAX, 1),
            record(2, Some(1), 1, 1),
        ])
        .tree;

        assert_eq!(
            aggregate(&mut tree),
            Err(CostError::Overflow {
                id: Some(PartId::new(1))
            })
        );
    }

    #[test]
    fn grand_total_sums_roots() -> TestResult {
        let mut tree = assemble(vec![
            record(1, None, 10, 1),
            record(2, Some(1), 5, 2),
            record(3, None, 7, 3),
        ])
        .tree;

        aggregate(&mut tree)?;

        assert_eq!(grand_total(&tree)?, 51);

        Ok(())
    }

    #[test]
    fn verify_flags_disagreeing_rollups() -> TestResult {
        let mut root = record(1, None, 100, 3);
        root.total_price = Some(300);
        let mut child = record(2, Some(1), 10, 2);
        child.total_price = Some(20);

        let mut tree = assemble(vec![root, child]).tree;
        aggregate(&mut tree)?;

        assert_eq!(
            verify(&tree, TotalBasis::Rollup),
            vec![TotalMismatch {
                id: PartId::new(1),
                reported: 300,
                computed: 320,
            }]
        );

        Ok(())
    }

    #[test]
    fn verify_against_line_totals() -> TestResult {
        let mut root = record(1, None, 100, 3);
        root.total_price = Some(300);
        let mut child = record(2, Some(1), 10, 2);
        child.total_price = Some(21);

        let mut tree = assemble(vec![root, child]).tree;
        aggregate(&mut tree)?;

        assert_eq!(
            verify(&tree, TotalBasis::Line),
            vec![TotalMismatch {
                id: PartId::new(2),
                reported: 21,
                computed: 20,
            }]
        );

        Ok(())
    }

    #[test]
    fn verify_skips_unreported_totals() -> TestResult {
        let mut tree = sample();
        aggregate(&mut tree)?;

        assert!(verify(&tree, TotalBasis::Rollup).is_empty());

        Ok(())
    }
}
