use crate::data::{DenseTensor, StorageTensor, SymmetricTensor, Tensor};
use crate::structure::{DenseStructure, SymmetricStructure, TensorStructure};

use std::ops::{Add, Mul, Neg, Sub};

impl<T, U, S> Neg for Tensor<T, S>
where
    T: Neg<Output = U>,
{
    type Output = Tensor<U, S>;

    fn neg(self) -> Self::Output {
        Tensor {
            data: self.data.into_iter().map(Neg::neg).collect(),
            structure: self.structure,
        }
    }
}

// Both layouts are fixed at the type level, so componentwise sums need no
// structure comparison: operands of the same shape and kind zip slot by slot.

impl<T, U, Out, S> Add<Tensor<U, S>> for Tensor<T, S>
where
    T: Add<U, Output = Out>,
{
    type Output = Tensor<Out, S>;

    fn add(self, rhs: Tensor<U, S>) -> Self::Output {
        Tensor {
            data: self
                .data
                .into_iter()
                .zip(rhs.data)
                .map(|(a, b)| a + b)
                .collect(),
            structure: self.structure,
        }
    }
}

impl<T, U, Out, S> Sub<Tensor<U, S>> for Tensor<T, S>
where
    T: Sub<U, Output = Out>,
{
    type Output = Tensor<Out, S>;

    fn sub(self, rhs: Tensor<U, S>) -> Self::Output {
        Tensor {
            data: self
                .data
                .into_iter()
                .zip(rhs.data)
                .map(|(a, b)| a - b)
                .collect(),
            structure: self.structure,
        }
    }
}

// Mixed-kind sums expand the compact operand first; the result is dense.

impl<T, U, Out, const ORDER: usize, const DIM: usize> Add<DenseTensor<U, ORDER, DIM>>
    for SymmetricTensor<T, ORDER, DIM>
where
    T: Clone + Add<U, Output = Out>,
    SymmetricStructure<ORDER, DIM>: TensorStructure,
    DenseStructure<ORDER, DIM>: TensorStructure,
{
    type Output = DenseTensor<Out, ORDER, DIM>;

    fn add(self, rhs: DenseTensor<U, ORDER, DIM>) -> Self::Output {
        self.to_dense() + rhs
    }
}

impl<T, U, Out, const ORDER: usize, const DIM: usize> Add<SymmetricTensor<U, ORDER, DIM>>
    for DenseTensor<T, ORDER, DIM>
where
    T: Add<U, Output = Out>,
    U: Clone,
    SymmetricStructure<ORDER, DIM>: TensorStructure,
    DenseStructure<ORDER, DIM>: TensorStructure,
{
    type Output = DenseTensor<Out, ORDER, DIM>;

    fn add(self, rhs: SymmetricTensor<U, ORDER, DIM>) -> Self::Output {
        self + rhs.to_dense()
    }
}

impl<T, U, Out, const ORDER: usize, const DIM: usize> Sub<DenseTensor<U, ORDER, DIM>>
    for SymmetricTensor<T, ORDER, DIM>
where
    T: Clone + Sub<U, Output = Out>,
    SymmetricStructure<ORDER, DIM>: TensorStructure,
    DenseStructure<ORDER, DIM>: TensorStructure,
{
    type Output = DenseTensor<Out, ORDER, DIM>;

    fn sub(self, rhs: DenseTensor<U, ORDER, DIM>) -> Self::Output {
        self.to_dense() - rhs
    }
}

impl<T, U, Out, const ORDER: usize, const DIM: usize> Sub<SymmetricTensor<U, ORDER, DIM>>
    for DenseTensor<T, ORDER, DIM>
where
    T: Sub<U, Output = Out>,
    U: Clone,
    SymmetricStructure<ORDER, DIM>: TensorStructure,
    DenseStructure<ORDER, DIM>: TensorStructure,
{
    type Output = DenseTensor<Out, ORDER, DIM>;

    fn sub(self, rhs: SymmetricTensor<U, ORDER, DIM>) -> Self::Output {
        self - rhs.to_dense()
    }
}

/// Componentwise multiplication by a scalar
pub trait ScalarMul<T> {
    type Output;

    fn scalar_mul(&self, rhs: &T) -> Self::Output;
}

impl<T, U, Out, S> ScalarMul<T> for Tensor<U, S>
where
    U: Clone + Mul<T, Output = Out>,
    T: Clone,
    S: Clone,
{
    type Output = Tensor<Out, S>;

    fn scalar_mul(&self, rhs: &T) -> Self::Output {
        Tensor {
            data: self
                .data
                .iter()
                .map(|u| u.clone() * rhs.clone())
                .collect(),
            structure: self.structure.clone(),
        }
    }
}

impl<T, U, Out, const ORDER: usize, const DIM: usize> ScalarMul<T> for StorageTensor<U, ORDER, DIM>
where
    DenseTensor<U, ORDER, DIM>: ScalarMul<T, Output = DenseTensor<Out, ORDER, DIM>>,
    SymmetricTensor<U, ORDER, DIM>: ScalarMul<T, Output = SymmetricTensor<Out, ORDER, DIM>>,
{
    type Output = StorageTensor<Out, ORDER, DIM>;

    fn scalar_mul(&self, rhs: &T) -> Self::Output {
        match self {
            StorageTensor::Dense(a) => StorageTensor::Dense(a.scalar_mul(rhs)),
            StorageTensor::Symmetric(a) => StorageTensor::Symmetric(a.scalar_mul(rhs)),
        }
    }
}
