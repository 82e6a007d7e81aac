//! Partlist prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    costs::{CostError, TotalBasis, TotalMismatch, aggregate, grand_total, verify},
    parts::{Part, PartDraft, PartId, PartPayload, PartRecord, ValidationError, validate},
    render::{OutlineRow, RenderError, outline},
    tree::{Assembly, AssemblyIssue, Label, NodeCosts, PartKey, PartNode, PartTree, assemble},
};
