use derive_more::Display;
use derive_more::From;
use derive_more::Into;
use duplicate::duplicate;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Flat and expanded concrete indices
pub mod concrete_index;

use concrete_index::{ConcreteIndex, ExpandedIndex, FlatIndex};

/// The size of one tensor axis.
///
/// Axes of a tensor all share the same spatial dimension, so the shape of an
/// order `n` tensor is `n` copies of its [`Dimension`].
#[derive(
    Debug,
    Copy,
    Clone,
    Ord,
    PartialOrd,
    Eq,
    PartialEq,
    Hash,
    Display,
    Serialize,
    Deserialize,
    From,
    Into,
)]
#[display(fmt = "{}", _0)]
pub struct Dimension(pub usize);

/// Number of scalars a dense tensor of the given order and dimension stores.
pub const fn dense_component_count(order: usize, dim: usize) -> usize {
    dim.pow(order as u32)
}

/// Number of independent components of a minor-symmetric tensor.
///
/// Order 2 counts the upper triangle including the diagonal. Order 4 is that
/// count squared: the tensor is addressed as a dense square block of collapsed
/// index pairs.
pub const fn symmetric_component_count(order: usize, dim: usize) -> usize {
    match order {
        2 => dim * (dim + 1) / 2,
        4 => {
            let pairs = dim * (dim + 1) / 2;
            pairs * pairs
        }
        _ => panic!("symmetric storage exists only for orders 2 and 4"),
    }
}

/// Offset of an index pair in the row-major enumeration of the upper triangle,
/// `(0,0), (0,1), .., (0,dim-1), (1,1), ..`. The pair is sorted first, so both
/// `(i,j)` and `(j,i)` land on the same slot.
pub(crate) fn pair_offset(i: ConcreteIndex, j: ConcreteIndex, dim: usize) -> usize {
    let (lo, hi) = if i <= j { (i, j) } else { (j, i) };
    lo * (2 * dim - lo + 1) / 2 + (hi - lo)
}

/// Inverse of [`pair_offset`]: the canonical pair `(i, j)` with `i <= j`.
pub(crate) fn pair_expand(mut offset: usize, dim: usize) -> (ConcreteIndex, ConcreteIndex) {
    let mut i = 0;
    while offset >= dim - i {
        offset -= dim - i;
        i += 1;
    }
    (i, i + offset)
}

#[derive(Error, Debug)]
pub enum StructureError {
    #[error("wrong number of indices {0}, expected {1}")]
    WrongOrder(usize, usize),
    #[error("index {0} out of bounds for axis {1} of size {2}")]
    IndexOutOfBounds(usize, usize, usize),
    #[error("flat index {0} out of bounds for storage of size {1}")]
    FlatIndexOutOfBounds(usize, usize),
    #[error("data length {0} does not match storage size {1}")]
    DataLength(usize, usize),
}

/// A tensor structure: a fixed (order, dimension) shape together with a
/// storage layout, resolvable entirely at compile time.
///
/// The two halves of the contract are the shape algebra (the associated
/// consts and [`shape`](Self::shape)) and the storage bijection:
/// [`flat_index`](Self::flat_index) maps a validated multi-index to an offset
/// into the backing storage, [`expanded_index`](Self::expanded_index) maps an
/// offset back to the canonical representative multi-index of that slot.
///
/// The supported shapes form a closed domain: orders 1, 2 and 4 over
/// dimensions 1, 2 and 3 (orders 2 and 4 only for the symmetric layout). No
/// impl exists outside it, so an unsupported shape is rejected before any
/// instance can be built.
pub trait TensorStructure {
    const ORDER: usize;
    const DIM: usize;
    /// Length of the backing storage, i.e. the number of independent
    /// components of this layout.
    const SIZE: usize;

    fn order(&self) -> usize {
        Self::ORDER
    }

    fn dim(&self) -> usize {
        Self::DIM
    }

    /// Length of the backing storage. This is the length of the data vector
    /// of a tensor with this structure.
    fn size(&self) -> usize {
        Self::SIZE
    }

    /// The (outwards facing) shape of the tensor as a list of dimensions.
    fn shape(&self) -> Vec<Dimension> {
        vec![Dimension(Self::DIM); Self::ORDER]
    }

    /// Verifies that the list of indices provided is valid for the tensor.
    ///
    /// # Errors
    ///
    /// [`StructureError::WrongOrder`] if the number of indices differs from
    /// the order, [`StructureError::IndexOutOfBounds`] if an index exceeds
    /// the dimension of its axis.
    fn verify_indices<C: AsRef<[ConcreteIndex]>>(&self, indices: C) -> Result<(), StructureError> {
        let indices = indices.as_ref();
        if indices.len() != Self::ORDER {
            return Err(StructureError::WrongOrder(indices.len(), Self::ORDER));
        }
        for (axis, &index) in indices.iter().enumerate() {
            if index >= Self::DIM {
                return Err(StructureError::IndexOutOfBounds(index, axis, Self::DIM));
            }
        }
        Ok(())
    }

    /// The storage offset of the given multi-index.
    ///
    /// # Errors
    ///
    /// Same as [`Self::verify_indices`].
    fn flat_index<C: AsRef<[ConcreteIndex]>>(&self, indices: C)
        -> Result<FlatIndex, StructureError>;

    /// The canonical representative multi-index of the given storage offset.
    ///
    /// Exactly one representative exists per slot; generic construction
    /// relies on this to invoke a generator once per independent component.
    ///
    /// # Errors
    ///
    /// [`StructureError::FlatIndexOutOfBounds`] if the offset is past the end
    /// of the storage.
    fn expanded_index(&self, flat_index: FlatIndex) -> Result<ExpandedIndex, StructureError>;
}

/// Dense storage layout: all `DIM^ORDER` components, column-major (first
/// index varies fastest).
#[derive(
    Debug, Copy, Clone, Default, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize,
)]
pub struct DenseStructure<const ORDER: usize, const DIM: usize>;

/// Compact storage layout for minor-symmetric tensors: only the independent
/// components are stored, and every index permutation consistent with minor
/// symmetry resolves to the same slot.
#[derive(
    Debug, Copy, Clone, Default, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize,
)]
pub struct SymmetricStructure<const ORDER: usize, const DIM: usize>;

duplicate! {
    [
        ord dim;
        [1] [1]; [1] [2]; [1] [3];
        [2] [1]; [2] [2]; [2] [3];
        [4] [1]; [4] [2]; [4] [3];
    ]
    impl TensorStructure for DenseStructure<ord, dim> {
        const ORDER: usize = ord;
        const DIM: usize = dim;
        const SIZE: usize = dense_component_count(ord, dim);

        fn flat_index<C: AsRef<[ConcreteIndex]>>(
            &self,
            indices: C,
        ) -> Result<FlatIndex, StructureError> {
            self.verify_indices(&indices)?;
            let mut flat = 0;
            let mut stride = 1;
            for &index in indices.as_ref() {
                flat += index * stride;
                stride *= Self::DIM;
            }
            Ok(flat.into())
        }

        fn expanded_index(&self, flat_index: FlatIndex) -> Result<ExpandedIndex, StructureError> {
            let mut flat: usize = flat_index.into();
            if flat >= Self::SIZE {
                return Err(StructureError::FlatIndexOutOfBounds(flat, Self::SIZE));
            }
            let mut indices = Vec::with_capacity(Self::ORDER);
            for _ in 0..Self::ORDER {
                indices.push(flat % Self::DIM);
                flat /= Self::DIM;
            }
            Ok(indices.into())
        }
    }
}

duplicate! {
    [
        dim;
        [1]; [2]; [3];
    ]
    impl TensorStructure for SymmetricStructure<2, dim> {
        const ORDER: usize = 2;
        const DIM: usize = dim;
        const SIZE: usize = symmetric_component_count(2, dim);

        fn flat_index<C: AsRef<[ConcreteIndex]>>(
            &self,
            indices: C,
        ) -> Result<FlatIndex, StructureError> {
            self.verify_indices(&indices)?;
            let indices = indices.as_ref();
            Ok(pair_offset(indices[0], indices[1], Self::DIM).into())
        }

        fn expanded_index(&self, flat_index: FlatIndex) -> Result<ExpandedIndex, StructureError> {
            let flat: usize = flat_index.into();
            if flat >= Self::SIZE {
                return Err(StructureError::FlatIndexOutOfBounds(flat, Self::SIZE));
            }
            let (i, j) = pair_expand(flat, Self::DIM);
            Ok(vec![i, j].into())
        }
    }

    // The order 4 mapping is two nested order 2 collapses: (i,j) to a row,
    // (k,l) to a column, addressing a dense square block of pair slots with
    // the row varying fastest.
    impl TensorStructure for SymmetricStructure<4, dim> {
        const ORDER: usize = 4;
        const DIM: usize = dim;
        const SIZE: usize = symmetric_component_count(4, dim);

        fn flat_index<C: AsRef<[ConcreteIndex]>>(
            &self,
            indices: C,
        ) -> Result<FlatIndex, StructureError> {
            self.verify_indices(&indices)?;
            let indices = indices.as_ref();
            let pairs = symmetric_component_count(2, Self::DIM);
            let row = pair_offset(indices[0], indices[1], Self::DIM);
            let col = pair_offset(indices[2], indices[3], Self::DIM);
            Ok((row + col * pairs).into())
        }

        fn expanded_index(&self, flat_index: FlatIndex) -> Result<ExpandedIndex, StructureError> {
            let flat: usize = flat_index.into();
            if flat >= Self::SIZE {
                return Err(StructureError::FlatIndexOutOfBounds(flat, Self::SIZE));
            }
            let pairs = symmetric_component_count(2, Self::DIM);
            let (i, j) = pair_expand(flat % pairs, Self::DIM);
            let (k, l) = pair_expand(flat / pairs, Self::DIM);
            Ok(vec![i, j, k, l].into())
        }
    }
}
