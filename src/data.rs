use crate::structure::{
    concrete_index::{ConcreteIndex, ExpandedIndex, FlatIndex},
    DenseStructure, Dimension, StructureError, SymmetricStructure, TensorStructure,
};

use anyhow::Result;
use approx::{AbsDiffEq, RelativeEq};
use delegate::delegate;
use derive_more::From;
use enum_try_as_inner::EnumTryAsInner;
use num::Zero;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, ops::Index};

/// A tensor value: a flat data vector addressed through a zero-sized
/// structure type that fixes order, dimension and storage layout.
///
/// Tensors are pure values. They are created fully formed by
/// [`from_fn`](Tensor::from_fn) or [`from_data`](Tensor::from_data) and never
/// mutated afterwards; derived tensors are new values. Equality is
/// component-wise.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Hash, Eq)]
pub struct Tensor<T, S> {
    pub data: Vec<T>,
    pub structure: S,
}

/// A tensor storing all of its `DIM^ORDER` components.
pub type DenseTensor<T, const ORDER: usize, const DIM: usize> =
    Tensor<T, DenseStructure<ORDER, DIM>>;

/// A minor-symmetric tensor storing only its independent components.
///
/// The full multi-index interface is preserved: reading any permutation of a
/// stored slot's index consistent with minor symmetry yields the same scalar,
/// because the layout collapses them onto one offset.
pub type SymmetricTensor<T, const ORDER: usize, const DIM: usize> =
    Tensor<T, SymmetricStructure<ORDER, DIM>>;

/// A vector is the order 1 dense tensor.
pub type Vector<T, const DIM: usize> = DenseTensor<T, 1, DIM>;

impl<T, S: TensorStructure> TensorStructure for Tensor<T, S> {
    const ORDER: usize = S::ORDER;
    const DIM: usize = S::DIM;
    const SIZE: usize = S::SIZE;

    delegate! {
        to self.structure {
            fn expanded_index(&self, flat_index: FlatIndex) -> Result<ExpandedIndex, StructureError>;
        }
    }

    fn flat_index<C: AsRef<[ConcreteIndex]>>(
        &self,
        indices: C,
    ) -> Result<FlatIndex, StructureError> {
        self.structure.flat_index(indices)
    }
}

impl<T, S: TensorStructure> Tensor<T, S> {
    /// Builds a tensor by invoking `f` exactly once per storage slot, fed the
    /// slot's canonical representative multi-index.
    ///
    /// For symmetric storage the generator therefore runs once per
    /// independent component and is never invoked for a symmetric duplicate.
    /// Every symmetrization algorithm is built on this single path. The
    /// generator may yield any scalar that promotes into `T`.
    pub fn from_fn<U: Into<T>, F: FnMut(&[ConcreteIndex]) -> U>(structure: S, mut f: F) -> Self {
        let mut data = Vec::with_capacity(S::SIZE);
        for flat in 0..S::SIZE {
            let representative = structure.expanded_index(flat.into()).unwrap();
            data.push(f(&representative).into());
        }
        Tensor { data, structure }
    }

    /// Generates a new tensor from the given data, which must already be in
    /// the canonical layout of the structure. No symmetrization is performed.
    ///
    /// # Errors
    ///
    /// [`StructureError::DataLength`] if the data length differs from the
    /// independent component count of the storage kind.
    pub fn from_data<U: Into<T>>(data: Vec<U>, structure: S) -> Result<Self> {
        if data.len() != S::SIZE {
            return Err(StructureError::DataLength(data.len(), S::SIZE).into());
        }
        Ok(Tensor {
            data: data.into_iter().map(Into::into).collect(),
            structure,
        })
    }

    pub fn iter_flat(&self) -> impl Iterator<Item = (FlatIndex, &T)> + '_ {
        self.data.iter().enumerate().map(|(i, v)| (i.into(), v))
    }

    /// Iterates over (canonical representative index, value) pairs in storage
    /// order.
    pub fn iter_expanded(&self) -> impl Iterator<Item = (ExpandedIndex, &T)> + '_ {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (self.structure.expanded_index(i.into()).unwrap(), v))
    }
}

impl<T: Clone + Zero, S: TensorStructure> Tensor<T, S> {
    pub fn zero(structure: S) -> Self {
        Tensor {
            data: vec![T::zero(); S::SIZE],
            structure,
        }
    }
}

impl<T: Clone, S: TensorStructure + Clone> Tensor<T, S> {
    /// Promotes every component into `U`.
    pub fn cast<U>(&self) -> Tensor<U, S>
    where
        U: Clone + From<T>,
    {
        let data = self.data.iter().map(|x| x.clone().into()).collect();
        Tensor {
            data,
            structure: self.structure.clone(),
        }
    }
}

impl<T, S: TensorStructure + Clone> Tensor<T, S> {
    pub fn convert_to<U>(&self) -> Tensor<U, S>
    where
        U: for<'a> From<&'a T>,
    {
        let data = self.data.iter().map(|x| x.into()).collect();
        Tensor {
            data,
            structure: self.structure.clone(),
        }
    }
}

impl<T: Clone, const ORDER: usize, const DIM: usize> SymmetricTensor<T, ORDER, DIM>
where
    SymmetricStructure<ORDER, DIM>: TensorStructure,
    DenseStructure<ORDER, DIM>: TensorStructure,
{
    /// Expands the compact storage into the dense layout of the same shape.
    pub fn to_dense(&self) -> DenseTensor<T, ORDER, DIM> {
        Tensor::from_fn(DenseStructure, |indices| self.get_owned(indices).unwrap())
    }
}

impl<T, S> Index<FlatIndex> for Tensor<T, S> {
    type Output = T;

    fn index(&self, index: FlatIndex) -> &Self::Output {
        let i: usize = index.into();
        &self.data[i]
    }
}

/// Trait for reading the data of a tensor through its multi-index interface
pub trait GetTensorData {
    type Data;

    /// # Errors
    ///
    /// Forwards the error from [`TensorStructure::verify_indices`]
    fn get_ref<C: AsRef<[ConcreteIndex]>>(&self, indices: C) -> Result<&Self::Data>;

    fn get_ref_linear(&self, index: FlatIndex) -> Option<&Self::Data>;

    fn get_owned<C: AsRef<[ConcreteIndex]>>(&self, indices: C) -> Result<Self::Data>
    where
        Self::Data: Clone,
    {
        self.get_ref(indices).cloned()
    }
}

impl<T, S: TensorStructure> GetTensorData for Tensor<T, S> {
    type Data = T;

    fn get_ref<C: AsRef<[ConcreteIndex]>>(&self, indices: C) -> Result<&T> {
        let flat = self.structure.flat_index(indices)?;
        Ok(&self[flat])
    }

    fn get_ref_linear(&self, index: FlatIndex) -> Option<&T> {
        let i: usize = index.into();
        self.data.get(i)
    }
}

/// Trait for getting the data of a tensor without its structure
pub trait HasTensorData {
    type Data: Clone;

    /// All stored values, in storage order.
    fn data(&self) -> Vec<Self::Data>;

    /// The canonical representative indices, in the same order as
    /// [`data`](Self::data).
    fn indices(&self) -> Vec<ExpandedIndex>;
}

impl<T: Clone, S: TensorStructure> HasTensorData for Tensor<T, S> {
    type Data = T;

    fn data(&self) -> Vec<T> {
        self.data.clone()
    }

    fn indices(&self) -> Vec<ExpandedIndex> {
        (0..S::SIZE)
            .map(|i| self.structure.expanded_index(i.into()).unwrap())
            .collect()
    }
}

impl<T: Display, S: TensorStructure> Display for Tensor<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = String::new();
        for (index, value) in self.iter_expanded() {
            s.push_str(&format!("{}: {}\n", index, value));
        }
        write!(f, "{}", s)
    }
}

impl<T: AbsDiffEq, S: PartialEq> AbsDiffEq for Tensor<T, S>
where
    T::Epsilon: Copy,
{
    type Epsilon = T::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        T::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.data.len() == other.data.len()
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(s, o)| T::abs_diff_eq(s, o, epsilon))
    }
}

impl<T: RelativeEq, S: PartialEq> RelativeEq for Tensor<T, S>
where
    T::Epsilon: Copy,
{
    fn default_max_relative() -> Self::Epsilon {
        T::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.data.len() == other.data.len()
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(s, o)| T::relative_eq(s, o, epsilon, max_relative))
    }
}

/// Enum for storing either a dense or a symmetric tensor of the same shape
#[derive(Debug, Clone, EnumTryAsInner, Serialize, Deserialize, From, PartialEq)]
#[derive_err(Debug)]
pub enum StorageTensor<T, const ORDER: usize, const DIM: usize> {
    Dense(DenseTensor<T, ORDER, DIM>),
    Symmetric(SymmetricTensor<T, ORDER, DIM>),
}

impl<T, const ORDER: usize, const DIM: usize> StorageTensor<T, ORDER, DIM>
where
    DenseStructure<ORDER, DIM>: TensorStructure,
    SymmetricStructure<ORDER, DIM>: TensorStructure,
{
    pub fn order(&self) -> usize {
        ORDER
    }

    pub fn dim(&self) -> usize {
        DIM
    }

    /// The stored length of the wrapped tensor, which depends on the storage
    /// kind.
    pub fn size(&self) -> usize {
        match self {
            StorageTensor::Dense(t) => t.size(),
            StorageTensor::Symmetric(t) => t.size(),
        }
    }

    pub fn shape(&self) -> Vec<Dimension> {
        match self {
            StorageTensor::Dense(t) => t.shape(),
            StorageTensor::Symmetric(t) => t.shape(),
        }
    }
}

impl<T, const ORDER: usize, const DIM: usize> GetTensorData for StorageTensor<T, ORDER, DIM>
where
    DenseStructure<ORDER, DIM>: TensorStructure,
    SymmetricStructure<ORDER, DIM>: TensorStructure,
{
    type Data = T;

    fn get_ref<C: AsRef<[ConcreteIndex]>>(&self, indices: C) -> Result<&T> {
        match self {
            StorageTensor::Dense(t) => t.get_ref(indices),
            StorageTensor::Symmetric(t) => t.get_ref(indices),
        }
    }

    fn get_ref_linear(&self, index: FlatIndex) -> Option<&T> {
        match self {
            StorageTensor::Dense(t) => t.get_ref_linear(index),
            StorageTensor::Symmetric(t) => t.get_ref_linear(index),
        }
    }
}

impl<T: Clone, const ORDER: usize, const DIM: usize> HasTensorData for StorageTensor<T, ORDER, DIM>
where
    DenseStructure<ORDER, DIM>: TensorStructure,
    SymmetricStructure<ORDER, DIM>: TensorStructure,
{
    type Data = T;

    fn data(&self) -> Vec<T> {
        match self {
            StorageTensor::Dense(t) => t.data(),
            StorageTensor::Symmetric(t) => t.data(),
        }
    }

    fn indices(&self) -> Vec<ExpandedIndex> {
        match self {
            StorageTensor::Dense(t) => t.indices(),
            StorageTensor::Symmetric(t) => t.indices(),
        }
    }
}

impl<T: Display, const ORDER: usize, const DIM: usize> Display for StorageTensor<T, ORDER, DIM>
where
    DenseStructure<ORDER, DIM>: TensorStructure,
    SymmetricStructure<ORDER, DIM>: TensorStructure,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageTensor::Dense(t) => t.fmt(f),
            StorageTensor::Symmetric(t) => t.fmt(f),
        }
    }
}
