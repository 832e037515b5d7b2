//! A single guardian's share

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::ShareIndex;
use crate::field::FieldElement;

/// One point `(index, f(index))` of the splitting polynomial
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Share {
    #[zeroize(skip)]
    index: ShareIndex,
    value: FieldElement,
}

impl Share {
    #[must_use]
    pub fn new(index: ShareIndex, value: FieldElement) -> Self {
        Self { index, value }
    }

    #[must_use]
    pub fn index(&self) -> ShareIndex {
        self.index
    }

    #[must_use]
    pub fn value(&self) -> &FieldElement {
        &self.value
    }
}

impl std::fmt::Debug for Share {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Share")
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}
