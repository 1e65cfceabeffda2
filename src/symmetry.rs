use crate::data::{DenseTensor, GetTensorData, StorageTensor, SymmetricTensor, Tensor};
use crate::structure::{DenseStructure, SymmetricStructure, TensorStructure};

use duplicate::duplicate;
use log::trace;
use num::{Num, One, Zero};

/// The symmetric part of a tensor.
///
/// For order 2 this is the closest symmetric tensor under the decomposition
/// `a == a.symmetric_part() + a.skew_part()`; for order 4 it coincides with
/// [`MinorSymmetrize`]. Always a no-op on symmetric storage.
pub trait SymmetricPart {
    type Output;

    fn symmetric_part(&self) -> Self::Output;
}

/// The skew (antisymmetric) part of an order 2 tensor.
///
/// The result is never representable in compact symmetric storage, so it is
/// always dense.
pub trait SkewPart {
    type Output;

    fn skew_part(&self) -> Self::Output;
}

/// Minor symmetrization of an order 4 tensor: the unweighted mean over the
/// orbit `{(i,j,k,l), (j,i,k,l), (i,j,l,k), (j,i,l,k)}` of each component.
pub trait MinorSymmetrize {
    type Output;

    fn minor_symmetric(&self) -> Self::Output;
}

/// Major symmetrization of an order 4 tensor: each component averaged with
/// its pair-swapped partner `(k,l,i,j)`. The result is dense for either
/// storage kind, since major symmetry is not what the compact layout encodes.
pub trait MajorSymmetrize {
    type Output;

    fn major_symmetric(&self) -> Self::Output;
}

/// Whether a tensor equals its own symmetric part. Structurally true on
/// symmetric storage; order 4 tensors are tested for minor symmetry.
pub trait IsSymmetric {
    fn is_symmetric(&self) -> bool;
}

/// Whether an order 4 tensor is invariant under swaps within its first and
/// within its second index pair.
pub trait IsMinorSymmetric {
    fn is_minor_symmetric(&self) -> bool;
}

/// Whether an order 4 tensor is invariant under swapping its index pairs as
/// blocks.
pub trait IsMajorSymmetric {
    fn is_major_symmetric(&self) -> bool;
}

impl<T: Num + Clone, const DIM: usize> SymmetricPart for DenseTensor<T, 2, DIM>
where
    DenseStructure<2, DIM>: TensorStructure,
    SymmetricStructure<2, DIM>: TensorStructure,
{
    type Output = SymmetricTensor<T, 2, DIM>;

    fn symmetric_part(&self) -> Self::Output {
        trace!("symmetric part of order 2 dense tensor");
        Tensor::from_fn(SymmetricStructure, |indices| {
            let (i, j) = (indices[0], indices[1]);
            if i == j {
                self.get_owned([i, j]).unwrap()
            } else {
                let two = T::one() + T::one();
                (self.get_owned([i, j]).unwrap() + self.get_owned([j, i]).unwrap()) / two
            }
        })
    }
}

impl<T: Clone, const DIM: usize> SymmetricPart for SymmetricTensor<T, 2, DIM> {
    type Output = SymmetricTensor<T, 2, DIM>;

    fn symmetric_part(&self) -> Self::Output {
        self.clone()
    }
}

impl<T, const DIM: usize> SymmetricPart for DenseTensor<T, 4, DIM>
where
    DenseTensor<T, 4, DIM>: MinorSymmetrize,
{
    type Output = <DenseTensor<T, 4, DIM> as MinorSymmetrize>::Output;

    fn symmetric_part(&self) -> Self::Output {
        self.minor_symmetric()
    }
}

impl<T, const DIM: usize> SymmetricPart for SymmetricTensor<T, 4, DIM>
where
    SymmetricTensor<T, 4, DIM>: MinorSymmetrize,
{
    type Output = <SymmetricTensor<T, 4, DIM> as MinorSymmetrize>::Output;

    fn symmetric_part(&self) -> Self::Output {
        self.minor_symmetric()
    }
}

impl<T: Num + Clone, const DIM: usize> SkewPart for DenseTensor<T, 2, DIM>
where
    DenseStructure<2, DIM>: TensorStructure,
{
    type Output = DenseTensor<T, 2, DIM>;

    fn skew_part(&self) -> Self::Output {
        trace!("skew part of order 2 dense tensor");
        Tensor::from_fn(DenseStructure, |indices| {
            let (i, j) = (indices[0], indices[1]);
            let two = T::one() + T::one();
            (self.get_owned([i, j]).unwrap() - self.get_owned([j, i]).unwrap()) / two
        })
    }
}

// A symmetric tensor has no skew part.
impl<T: Zero + Clone, const DIM: usize> SkewPart for SymmetricTensor<T, 2, DIM>
where
    DenseStructure<2, DIM>: TensorStructure,
{
    type Output = DenseTensor<T, 2, DIM>;

    fn skew_part(&self) -> Self::Output {
        Tensor::zero(DenseStructure)
    }
}

impl<T: Num + Clone, const DIM: usize> MinorSymmetrize for DenseTensor<T, 4, DIM>
where
    DenseStructure<4, DIM>: TensorStructure,
    SymmetricStructure<4, DIM>: TensorStructure,
{
    type Output = SymmetricTensor<T, 4, DIM>;

    fn minor_symmetric(&self) -> Self::Output {
        trace!("minor symmetrization of order 4 dense tensor");
        Tensor::from_fn(SymmetricStructure, |indices| {
            let (i, j, k, l) = (indices[0], indices[1], indices[2], indices[3]);
            if i == j && k == l {
                self.get_owned([i, j, k, l]).unwrap()
            } else {
                let two = T::one() + T::one();
                let four = two.clone() * two;
                (self.get_owned([i, j, k, l]).unwrap()
                    + self.get_owned([j, i, k, l]).unwrap()
                    + self.get_owned([i, j, l, k]).unwrap()
                    + self.get_owned([j, i, l, k]).unwrap())
                    / four
            }
        })
    }
}

impl<T: Clone, const DIM: usize> MinorSymmetrize for SymmetricTensor<T, 4, DIM> {
    type Output = SymmetricTensor<T, 4, DIM>;

    fn minor_symmetric(&self) -> Self::Output {
        self.clone()
    }
}

duplicate! {
    [storage; [DenseStructure]; [SymmetricStructure]]
    impl<T: Num + Clone, const DIM: usize> MajorSymmetrize for Tensor<T, storage<4, DIM>>
    where
        storage<4, DIM>: TensorStructure,
        DenseStructure<4, DIM>: TensorStructure,
    {
        type Output = DenseTensor<T, 4, DIM>;

        fn major_symmetric(&self) -> Self::Output {
            trace!("major symmetrization of order 4 tensor");
            Tensor::from_fn(DenseStructure, |indices| {
                let (i, j, k, l) = (indices[0], indices[1], indices[2], indices[3]);
                if i == k && j == l {
                    // invariant under the pair swap, nothing to average
                    self.get_owned([i, j, k, l]).unwrap()
                } else {
                    let two = T::one() + T::one();
                    (self.get_owned([i, j, k, l]).unwrap()
                        + self.get_owned([k, l, i, j]).unwrap())
                        / two
                }
            })
        }
    }
}

impl<T: PartialEq, const DIM: usize> IsSymmetric for DenseTensor<T, 4, DIM>
where
    DenseTensor<T, 4, DIM>: IsMinorSymmetric,
{
    fn is_symmetric(&self) -> bool {
        self.is_minor_symmetric()
    }
}

// The dimension is fixed and small, so the order 2 checks are direct
// comparisons of the column-major slots rather than a loop.

impl<T: PartialEq> IsSymmetric for DenseTensor<T, 2, 1> {
    fn is_symmetric(&self) -> bool {
        true
    }
}

impl<T: PartialEq> IsSymmetric for DenseTensor<T, 2, 2> {
    fn is_symmetric(&self) -> bool {
        self.data[1] == self.data[2]
    }
}

impl<T: PartialEq> IsSymmetric for DenseTensor<T, 2, 3> {
    fn is_symmetric(&self) -> bool {
        self.data[1] == self.data[3] && self.data[2] == self.data[6] && self.data[5] == self.data[7]
    }
}

// Symmetric storage cannot hold an asymmetric value.
impl<T, const ORDER: usize, const DIM: usize> IsSymmetric for SymmetricTensor<T, ORDER, DIM> {
    fn is_symmetric(&self) -> bool {
        true
    }
}

impl<T: PartialEq, const DIM: usize> IsMinorSymmetric for DenseTensor<T, 4, DIM>
where
    DenseStructure<4, DIM>: TensorStructure,
{
    fn is_minor_symmetric(&self) -> bool {
        for l in 0..DIM {
            for k in l..DIM {
                for j in 0..DIM {
                    for i in j..DIM {
                        let value = self.get_ref([i, j, k, l]).unwrap();
                        if *value != *self.get_ref([j, i, k, l]).unwrap()
                            || *value != *self.get_ref([i, j, l, k]).unwrap()
                        {
                            return false;
                        }
                    }
                }
            }
        }
        true
    }
}

impl<T, const DIM: usize> IsMinorSymmetric for SymmetricTensor<T, 4, DIM> {
    fn is_minor_symmetric(&self) -> bool {
        true
    }
}

duplicate! {
    [storage; [DenseStructure]; [SymmetricStructure]]
    impl<T: PartialEq, const DIM: usize> IsMajorSymmetric for Tensor<T, storage<4, DIM>>
    where
        storage<4, DIM>: TensorStructure,
    {
        fn is_major_symmetric(&self) -> bool {
            for l in 0..DIM {
                for k in l..DIM {
                    for j in 0..DIM {
                        for i in j..DIM {
                            if *self.get_ref([i, j, k, l]).unwrap()
                                != *self.get_ref([k, l, i, j]).unwrap()
                            {
                                return false;
                            }
                        }
                    }
                }
            }
            true
        }
    }
}

impl<T, const DIM: usize> SymmetricPart for StorageTensor<T, 2, DIM>
where
    DenseTensor<T, 2, DIM>: SymmetricPart<Output = SymmetricTensor<T, 2, DIM>>,
    SymmetricTensor<T, 2, DIM>: SymmetricPart<Output = SymmetricTensor<T, 2, DIM>>,
{
    type Output = SymmetricTensor<T, 2, DIM>;

    fn symmetric_part(&self) -> Self::Output {
        match self {
            StorageTensor::Dense(t) => t.symmetric_part(),
            StorageTensor::Symmetric(t) => t.symmetric_part(),
        }
    }
}

impl<T, const DIM: usize> SkewPart for StorageTensor<T, 2, DIM>
where
    DenseTensor<T, 2, DIM>: SkewPart<Output = DenseTensor<T, 2, DIM>>,
    SymmetricTensor<T, 2, DIM>: SkewPart<Output = DenseTensor<T, 2, DIM>>,
{
    type Output = DenseTensor<T, 2, DIM>;

    fn skew_part(&self) -> Self::Output {
        match self {
            StorageTensor::Dense(t) => t.skew_part(),
            StorageTensor::Symmetric(t) => t.skew_part(),
        }
    }
}

impl<T, const DIM: usize> MinorSymmetrize for StorageTensor<T, 4, DIM>
where
    DenseTensor<T, 4, DIM>: MinorSymmetrize<Output = SymmetricTensor<T, 4, DIM>>,
    SymmetricTensor<T, 4, DIM>: MinorSymmetrize<Output = SymmetricTensor<T, 4, DIM>>,
{
    type Output = SymmetricTensor<T, 4, DIM>;

    fn minor_symmetric(&self) -> Self::Output {
        match self {
            StorageTensor::Dense(t) => t.minor_symmetric(),
            StorageTensor::Symmetric(t) => t.minor_symmetric(),
        }
    }
}

impl<T, const DIM: usize> MajorSymmetrize for StorageTensor<T, 4, DIM>
where
    DenseTensor<T, 4, DIM>: MajorSymmetrize<Output = DenseTensor<T, 4, DIM>>,
    SymmetricTensor<T, 4, DIM>: MajorSymmetrize<Output = DenseTensor<T, 4, DIM>>,
{
    type Output = DenseTensor<T, 4, DIM>;

    fn major_symmetric(&self) -> Self::Output {
        match self {
            StorageTensor::Dense(t) => t.major_symmetric(),
            StorageTensor::Symmetric(t) => t.major_symmetric(),
        }
    }
}

impl<T, const ORDER: usize, const DIM: usize> IsSymmetric for StorageTensor<T, ORDER, DIM>
where
    DenseTensor<T, ORDER, DIM>: IsSymmetric,
    SymmetricTensor<T, ORDER, DIM>: IsSymmetric,
{
    fn is_symmetric(&self) -> bool {
        match self {
            StorageTensor::Dense(t) => t.is_symmetric(),
            StorageTensor::Symmetric(t) => t.is_symmetric(),
        }
    }
}

impl<T, const DIM: usize> IsMinorSymmetric for StorageTensor<T, 4, DIM>
where
    DenseTensor<T, 4, DIM>: IsMinorSymmetric,
    SymmetricTensor<T, 4, DIM>: IsMinorSymmetric,
{
    fn is_minor_symmetric(&self) -> bool {
        match self {
            StorageTensor::Dense(t) => t.is_minor_symmetric(),
            StorageTensor::Symmetric(t) => t.is_minor_symmetric(),
        }
    }
}

impl<T, const DIM: usize> IsMajorSymmetric for StorageTensor<T, 4, DIM>
where
    DenseTensor<T, 4, DIM>: IsMajorSymmetric,
    SymmetricTensor<T, 4, DIM>: IsMajorSymmetric,
{
    fn is_major_symmetric(&self) -> bool {
        match self {
            StorageTensor::Dense(t) => t.is_major_symmetric(),
            StorageTensor::Symmetric(t) => t.is_major_symmetric(),
        }
    }
}
