//! Partlist
//!
//! Partlist models a hierarchical bill of materials: parts with a unit price
//! and quantity that nest under other parts. It assembles the collections a
//! parts store returns into a labelled tree, rolls costs up from the leaves
//! and renders the result as a numbered outline.

pub mod costs;
pub mod fixtures;
pub mod parts;
pub mod prelude;
pub mod render;
pub mod tree;
