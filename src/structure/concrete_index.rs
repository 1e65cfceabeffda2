use std::ops::Deref;

use derive_more::Display;
use derive_more::From;
use derive_more::Into;

use serde::{Deserialize, Serialize};

/// A concrete index, i.e. the integer position along one tensor axis
pub type ConcreteIndex = usize;

/// Offset into the flat backing storage of a tensor.
///
/// What a given offset addresses depends on the layout that produced it: for
/// dense storage it is the column-major position, for symmetric storage the
/// position of an independent component.
#[derive(
    Debug,
    Copy,
    Clone,
    Ord,
    PartialOrd,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
    From,
    Into,
    Display,
)]
#[display(fmt = "{}", index)]
pub struct FlatIndex {
    index: usize,
}

/// A full multi-index, one [`ConcreteIndex`] per tensor axis.
#[derive(
    Debug, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize, From, Into, Display,
)]
#[display(fmt = "{:?}", indices)]
pub struct ExpandedIndex {
    indices: Vec<ConcreteIndex>,
}

impl AsRef<[ConcreteIndex]> for ExpandedIndex {
    fn as_ref(&self) -> &[ConcreteIndex] {
        &self.indices
    }
}

impl Deref for ExpandedIndex {
    type Target = [ConcreteIndex];

    fn deref(&self) -> &Self::Target {
        &self.indices
    }
}

impl FromIterator<ConcreteIndex> for ExpandedIndex {
    fn from_iter<T: IntoIterator<Item = ConcreteIndex>>(iter: T) -> Self {
        ExpandedIndex {
            indices: iter.into_iter().collect(),
        }
    }
}
