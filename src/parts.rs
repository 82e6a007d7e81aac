//! Parts

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::costs::CostError;

/// Store-assigned part identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartId(u64);

impl PartId {
    /// Wrap a raw store identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw store identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Display for PartId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

impl From<u64> for PartId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Reasons a candidate part is refused before it reaches the store.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The name is empty or only whitespace.
    #[error("part name must not be empty")]
    EmptyName,

    /// The unit price is negative.
    #[error("unit price must not be negative")]
    InvalidPrice,

    /// The quantity is below one or does not fit a `u32`.
    #[error("quantity must be at least 1")]
    InvalidQuantity,
}

/// Unvalidated part attributes, as typed in by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartDraft {
    /// Display name
    pub name: String,

    /// Unit price in whole currency units
    pub unit_price: i64,

    /// Quantity
    pub quantity: i64,

    /// Owning part, `None` for a root
    pub parent_id: Option<PartId>,
}

/// Part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Store identifier, unset until the store has created the part
    pub id: Option<PartId>,

    /// Display name
    pub name: String,

    /// Unit price in whole currency units
    pub unit_price: u64,

    /// Quantity, at least 1
    pub quantity: u32,

    /// Owning part, `None` for a root
    pub parent_id: Option<PartId>,

    /// Total reported by the store, if any
    pub total_price: Option<u64>,
}

impl Part {
    /// Own line cost: `unit_price * quantity`.
    ///
    /// # Errors
    ///
    /// Returns [`CostError::Overflow`] if the product does not fit a `u64`.
    pub fn line_total(&self) -> Result<u64, CostError> {
        self.unit_price
            .checked_mul(u64::from(self.quantity))
            .ok_or(CostError::Overflow { id: self.id })
    }

    /// Request body for creating or updating this part.
    #[must_use]
    pub fn payload(&self) -> PartPayload {
        PartPayload {
            name: self.name.clone(),
            unit_price: self.unit_price,
            quantity: self.quantity,
            parent_id: self.parent_id,
        }
    }
}

/// Validate a draft into a part that has not been stored yet.
///
/// Checks run name, price, quantity; the first failure is returned.
///
/// # Errors
///
/// Returns the first [`ValidationError`] the draft violates.
pub fn validate(candidate: PartDraft) -> Result<Part, ValidationError> {
    let name = candidate.name.trim();

    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }

    let unit_price =
        u64::try_from(candidate.unit_price).map_err(|_err| ValidationError::InvalidPrice)?;

    let quantity = u32::try_from(candidate.quantity)
        .ok()
        .filter(|quantity| *quantity >= 1)
        .ok_or(ValidationError::InvalidQuantity)?;

    Ok(Part {
        id: None,
        name: name.to_string(),
        unit_price,
        quantity,
        parent_id: candidate.parent_id,
        total_price: None,
    })
}

/// Create/update request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartPayload {
    /// Display name
    pub name: String,

    /// Unit price in whole currency units
    pub unit_price: u64,

    /// Quantity
    pub quantity: u32,

    /// Owning part
    pub parent_id: Option<PartId>,
}

/// A part as the store sends it, flat or with embedded children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartRecord {
    /// Store identifier
    #[serde(default)]
    pub id: Option<PartId>,

    /// Display name
    pub name: String,

    /// Unit price in whole currency units
    #[serde(default)]
    pub unit_price: u64,

    /// Quantity
    #[serde(default = "default_quantity")]
    pub quantity: u32,

    /// Owning part
    #[serde(default)]
    pub parent_id: Option<PartId>,

    /// Store-computed total
    #[serde(default)]
    pub total_price: Option<u64>,

    /// Embedded sub-parts
    #[serde(default)]
    pub children: Vec<PartRecord>,
}

const fn default_quantity() -> u32 {
    1
}

impl PartRecord {
    /// Split the record into its part and its embedded children.
    #[must_use]
    pub fn into_parts(self) -> (Part, Vec<PartRecord>) {
        let part = Part {
            id: self.id,
            name: self.name,
            unit_price: self.unit_price,
            quantity: self.quantity,
            parent_id: self.parent_id,
            total_price: self.total_price,
        };

        (part, self.children)
    }
}

impl From<Part> for PartRecord {
    fn from(part: Part) -> Self {
        Self {
            id: part.id,
            name: part.name,
            unit_price: part.unit_price,
            quantity: part.quantity,
            parent_id: part.parent_id,
            total_price: part.total_price,
            children: Vec::new(),
        }
    }
}
