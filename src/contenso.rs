/*!

Fixed-shape tensors for continuum-mechanics-style computation: vectors,
second-order and fourth-order tensors over spatial dimensions 1, 2 and 3, with
shape and element type known at compile time.

Every tensor couples a data vector with a zero-sized structure type that fixes
order, dimension and storage layout. There are two layouts, [`DenseStructure`]
and [`SymmetricStructure`]: the dense kind stores all `dim^order` components in
column-major order, the symmetric kind stores only the independent components
of a (minor-)symmetric tensor and resolves every multi-index through an
upper-triangle collapse. At the index level the two are indistinguishable:
reading `(i, j)` or `(j, i)` from a symmetric tensor hits the same stored
scalar by construction.

Data is added through the constructors on [`Tensor`]: a generator function
over canonical index representatives, or a flat data vector of exactly the
independent length. The symmetry algebra lives in [`symmetry`]: symmetric and
skew parts of second-order tensors, minor and major symmetrization of
fourth-order tensors, and the matching predicates.

Heterogeneous storage is handled by the [`StorageTensor`] enum, which holds
either kind of a given shape.

*/

/// Tensor structures: shape algebra, index mapping and storage layouts
pub mod structure;

/// Tensors with data
pub mod data;

/// Adding, subtracting, scalar multiplication of tensors
pub mod arithmetic;

/// Symmetry decomposition and predicates
pub mod symmetry;

#[cfg(test)]
mod tests;

pub use arithmetic::ScalarMul;
pub use data::{
    DenseTensor, GetTensorData, HasTensorData, StorageTensor, SymmetricTensor, Tensor, Vector,
};
pub use structure::{
    concrete_index::{ConcreteIndex, ExpandedIndex, FlatIndex},
    DenseStructure, Dimension, StructureError, SymmetricStructure, TensorStructure,
};
pub use symmetry::{
    IsMajorSymmetric, IsMinorSymmetric, IsSymmetric, MajorSymmetrize, MinorSymmetrize, SkewPart,
    SymmetricPart,
};
