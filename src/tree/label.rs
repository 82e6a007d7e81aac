//! Positional labels

use std::fmt::{Display, Formatter, Result as FmtResult, Write};

use smallvec::SmallVec;

/// Dotted, 1-based sibling path from a root to a node, e.g. `2.3`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(SmallVec<[u32; 6]>);

impl Label {
    /// Label of the root at the given 1-based position.
    #[must_use]
    pub fn root(position: u32) -> Self {
        let mut path = SmallVec::new();
        path.push(position);

        Self(path)
    }

    /// Label of this node's child at the given 1-based position.
    #[must_use]
    pub fn child(&self, position: u32) -> Self {
        let mut path = self.0.clone();
        path.push(position);

        Self(path)
    }

    /// Sibling positions from the root down.
    #[must_use]
    pub fn positions(&self) -> &[u32] {
        &self.0
    }

    /// Zero-based depth; roots are at depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len().saturating_sub(1)
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let mut positions = self.0.iter();

        if let Some(first) = positions.next() {
            write!(f, "{first}")?;
        }

        for position in positions {
            f.write_char('.')?;
            write!(f, "{position}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_label_is_single_position() {
        let label = Label::root(2);

        assert_eq!(label.to_string(), "2");
        assert_eq!(label.depth(), 0);
    }

    #[test]
    fn child_label_appends_position() {
        let label = Label::root(2).child(3).child(1);

        assert_eq!(label.to_string(), "2.3.1");
        assert_eq!(label.positions(), &[2, 3, 1]);
        assert_eq!(label.depth(), 2);
    }
}
