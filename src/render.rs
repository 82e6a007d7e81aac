//! Outline rendering
//!
//! Walks an aggregated [`PartTree`] into numbered, indented rows and prints
//! them as a table.

use std::io;

use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    costs::{CostError, grand_total},
    parts::PartId,
    tree::{Label, PartTree},
};

/// Errors that can occur when rendering an outline.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The tree has not been aggregated.
    #[error("part {0:?} has no computed costs")]
    MissingCosts(Option<PartId>),

    /// Cost arithmetic failed.
    #[error(transparent)]
    Cost(#[from] CostError),

    /// An amount is too large to be shown as money.
    #[error("amount {0} cannot be displayed")]
    Amount(u64),

    /// Writing the output failed.
    #[error("IO error")]
    IO,
}

/// One line of the outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineRow {
    /// Positional label
    pub label: Label,

    /// Zero-based depth
    pub depth: usize,

    /// Store identifier
    pub id: Option<PartId>,

    /// Display name
    pub name: String,

    /// Unit price in whole currency units
    pub unit_price: u64,

    /// Quantity
    pub quantity: u32,

    /// Own line cost
    pub line: u64,

    /// Line cost plus descendants
    pub rollup: u64,
}

impl OutlineRow {
    /// Label, indentation and name as one cell, e.g. `    1.2. Bolt`.
    #[must_use]
    pub fn heading(&self) -> String {
        format!("{}{}. {}", "  ".repeat(self.depth), self.label, self.name)
    }
}

/// Rows for every node in pre-order.
///
/// # Errors
///
/// Returns [`RenderError::MissingCosts`] if the tree was not aggregated.
pub fn outline(tree: &PartTree) -> Result<Vec<OutlineRow>, RenderError> {
    tree.walk()
        .filter_map(|(key, depth)| tree.get(key).map(|node| (node, depth)))
        .map(|(node, depth)| {
            let costs = node.costs().ok_or(RenderError::MissingCosts(node.id()))?;
            let part = node.part();

            Ok(OutlineRow {
                label: node.label().clone(),
                depth,
                id: part.id,
                name: part.name.clone(),
                unit_price: part.unit_price,
                quantity: part.quantity,
                line: costs.line,
                rollup: costs.rollup,
            })
        })
        .collect()
}

/// Print the outline with a grand total.
///
/// # Errors
///
/// Returns a [`RenderError`] if the tree was not aggregated, an amount cannot
/// be shown, or writing fails.
pub fn write_to(
    mut out: impl io::Write,
    tree: &PartTree,
    currency: &'static Currency,
) -> Result<(), RenderError> {
    let rows = outline(tree)?;

    let mut builder = Builder::default();

    builder.push_record(["Part", "ID", "Unit Price", "Qty", "Line", "Total"]);

    for row in &rows {
        builder.push_record([
            row.heading(),
            row.id.map(|id| id.to_string()).unwrap_or_default(),
            money(row.unit_price, currency)?,
            row.quantity.to_string(),
            money(row.line, currency)?,
            money(row.rollup, currency)?,
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(1..6), Alignment::right());

    let total = money(grand_total(tree)?, currency)?;

    writeln!(out, "{table}").map_err(|_err| RenderError::IO)?;
    writeln!(out, " Total: {total}").map_err(|_err| RenderError::IO)
}

/// Amounts are whole currency units, as the store keeps them.
fn money(units: u64, currency: &'static Currency) -> Result<String, RenderError> {
    let amount = i64::try_from(units).map_err(|_err| RenderError::Amount(units))?;

    Ok(Money::from_major(amount, currency).to_string())
}
