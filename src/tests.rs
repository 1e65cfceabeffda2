use crate::{
    arithmetic::ScalarMul,
    data::{
        DenseTensor, GetTensorData, HasTensorData, StorageTensor, SymmetricTensor, Tensor, Vector,
    },
    structure::{DenseStructure, StructureError, SymmetricStructure, TensorStructure},
    symmetry::{
        IsMajorSymmetric, IsMinorSymmetric, IsSymmetric, MajorSymmetrize, MinorSymmetrize,
        SkewPart, SymmetricPart,
    },
};

use approx::assert_relative_eq;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoroshiro64Star;

fn random_dense<const ORDER: usize, const DIM: usize>(seed: u64) -> DenseTensor<f64, ORDER, DIM>
where
    DenseStructure<ORDER, DIM>: TensorStructure,
{
    let mut rng = Xoroshiro64Star::seed_from_u64(seed);
    Tensor::from_fn(DenseStructure, |_| rng.gen_range(-1.0f64..1.0))
}

fn random_symmetric<const ORDER: usize, const DIM: usize>(
    seed: u64,
) -> SymmetricTensor<f64, ORDER, DIM>
where
    SymmetricStructure<ORDER, DIM>: TensorStructure,
{
    let mut rng = Xoroshiro64Star::seed_from_u64(seed);
    Tensor::from_fn(SymmetricStructure, |_| rng.gen_range(-1.0f64..1.0))
}

#[test]
fn vector_is_the_order_one_tensor() {
    let v = Vector::<f64, 3>::from_data(vec![1, 2, 3], DenseStructure).unwrap();
    assert_eq!(v.size(), 3);
    assert_eq!(v.shape().len(), 1);
    assert_relative_eq!(v.get_owned([1]).unwrap(), 2.0);
    assert!(Vector::<f64, 3>::from_data(vec![1.0, 2.0], DenseStructure).is_err());
}

#[test]
fn construction_rejects_wrong_length() {
    assert!(DenseTensor::<f64, 1, 1>::from_data(vec![0.0; 2], DenseStructure).is_err());
    assert!(DenseTensor::<f64, 1, 2>::from_data(vec![0.0; 3], DenseStructure).is_err());
    assert!(DenseTensor::<f64, 1, 3>::from_data(vec![0.0; 4], DenseStructure).is_err());
    assert!(DenseTensor::<f64, 2, 1>::from_data(vec![0.0; 2], DenseStructure).is_err());
    assert!(DenseTensor::<f64, 2, 2>::from_data(vec![0.0; 5], DenseStructure).is_err());
    assert!(DenseTensor::<f64, 2, 3>::from_data(vec![0.0; 8], DenseStructure).is_err());
    assert!(DenseTensor::<f64, 4, 1>::from_data(vec![0.0; 2], DenseStructure).is_err());
    assert!(DenseTensor::<f64, 4, 2>::from_data(vec![0.0; 17], DenseStructure).is_err());
    assert!(DenseTensor::<f64, 4, 3>::from_data(vec![0.0; 80], DenseStructure).is_err());

    assert!(SymmetricTensor::<f64, 2, 1>::from_data(vec![0.0; 2], SymmetricStructure).is_err());
    assert!(SymmetricTensor::<f64, 2, 2>::from_data(vec![0.0; 4], SymmetricStructure).is_err());
    assert!(SymmetricTensor::<f64, 2, 3>::from_data(vec![0.0; 5], SymmetricStructure).is_err());
    assert!(SymmetricTensor::<f64, 4, 1>::from_data(vec![0.0; 2], SymmetricStructure).is_err());
    assert!(SymmetricTensor::<f64, 4, 2>::from_data(vec![0.0; 10], SymmetricStructure).is_err());
    assert!(SymmetricTensor::<f64, 4, 3>::from_data(vec![0.0; 35], SymmetricStructure).is_err());

    let err = DenseTensor::<f64, 2, 3>::from_data(vec![0.0; 8], DenseStructure).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<StructureError>(),
        Some(StructureError::DataLength(8, 9))
    ));
}

#[test]
fn reads_outside_the_shape_are_rejected() {
    let t = random_dense::<2, 3>(1);
    assert!(t.get_ref([3, 0]).is_err());
    assert!(t.get_ref([0, 0, 0]).is_err());
    assert!(t.get_ref_linear(9.into()).is_none());

    let s = random_symmetric::<2, 3>(1);
    assert!(s.get_ref([0, 3]).is_err());
    assert!(s.get_ref_linear(6.into()).is_none());
}

#[test]
fn symmetric_plus_skew_recomposes() {
    let _ = env_logger::builder().is_test(true).try_init();

    let a1 = random_dense::<2, 1>(11);
    assert_relative_eq!(
        a1.symmetric_part() + a1.skew_part(),
        a1,
        epsilon = 1e-12
    );

    let a2 = random_dense::<2, 2>(12);
    assert_relative_eq!(
        a2.symmetric_part() + a2.skew_part(),
        a2,
        epsilon = 1e-12
    );

    let a3 = random_dense::<2, 3>(13);
    assert_relative_eq!(
        a3.symmetric_part() + a3.skew_part(),
        a3,
        epsilon = 1e-12
    );
}

#[test]
fn symmetric_part_is_idempotent() {
    let a = random_dense::<2, 3>(3);
    let s = a.symmetric_part();
    assert_eq!(s.symmetric_part(), s);

    let s = random_symmetric::<2, 2>(4);
    assert_eq!(s.symmetric_part(), s);
}

#[test]
fn skew_part_of_symmetric_storage_is_zero() {
    let s = random_symmetric::<2, 3>(5);
    assert_eq!(s.skew_part(), Tensor::zero(DenseStructure));
}

#[test]
fn order_two_decomposition_matches_hand_computed_values() {
    // row-major [0.59, 0.57; 0.77, 0.46], laid out column-major
    let a = DenseTensor::<f64, 2, 2>::from_data(vec![0.59, 0.77, 0.57, 0.46], DenseStructure)
        .unwrap();

    let sym = a.symmetric_part();
    assert_relative_eq!(sym.get_owned([0, 0]).unwrap(), 0.59, epsilon = 1e-12);
    assert_relative_eq!(sym.get_owned([0, 1]).unwrap(), 0.67, epsilon = 1e-12);
    assert_relative_eq!(sym.get_owned([1, 0]).unwrap(), 0.67, epsilon = 1e-12);
    assert_relative_eq!(sym.get_owned([1, 1]).unwrap(), 0.46, epsilon = 1e-12);

    let skew = a.skew_part();
    assert_relative_eq!(skew.get_owned([0, 0]).unwrap(), 0.0, epsilon = 1e-12);
    assert_relative_eq!(skew.get_owned([0, 1]).unwrap(), -0.1, epsilon = 1e-12);
    assert_relative_eq!(skew.get_owned([1, 0]).unwrap(), 0.1, epsilon = 1e-12);
    assert_relative_eq!(skew.get_owned([1, 1]).unwrap(), 0.0, epsilon = 1e-12);
}

#[test]
fn minor_symmetrization_properties() {
    let t2 = random_dense::<4, 2>(7);
    let t3 = random_dense::<4, 3>(8);

    let ms2 = t2.minor_symmetric();
    let ms3 = t3.minor_symmetric();

    assert!(ms2.to_dense().is_minor_symmetric());
    assert!(ms3.to_dense().is_minor_symmetric());

    assert_eq!(ms2.minor_symmetric(), ms2);
    assert_eq!(ms3.minor_symmetric(), ms3);

    assert_eq!(t2.symmetric_part(), ms2);
    assert_eq!(t3.symmetric_part(), ms3);
}

#[test]
fn minor_symmetrization_averages_the_orbit() {
    let t = random_dense::<4, 2>(13);
    let ms = t.minor_symmetric();

    let expected = (t.get_owned([0, 1, 0, 1]).unwrap()
        + t.get_owned([1, 0, 0, 1]).unwrap()
        + t.get_owned([0, 1, 1, 0]).unwrap()
        + t.get_owned([1, 0, 1, 0]).unwrap())
        / 4.0;
    assert_relative_eq!(ms.get_owned([0, 1, 0, 1]).unwrap(), expected, epsilon = 1e-12);

    // orbit of size one passes through unchanged
    assert_eq!(
        ms.get_owned([1, 1, 0, 0]).unwrap(),
        t.get_owned([1, 1, 0, 0]).unwrap()
    );
}

#[test]
fn major_symmetrization_properties() {
    let t = random_dense::<4, 3>(17);
    let mm = t.major_symmetric();
    assert!(mm.is_major_symmetric());
    assert_relative_eq!(mm.major_symmetric(), mm, epsilon = 1e-12);

    let expected =
        (t.get_owned([0, 1, 2, 2]).unwrap() + t.get_owned([2, 2, 0, 1]).unwrap()) / 2.0;
    assert_relative_eq!(mm.get_owned([0, 1, 2, 2]).unwrap(), expected, epsilon = 1e-12);

    // both storage kinds are accepted, the result is always dense
    let s = random_symmetric::<4, 3>(19);
    assert!(!s.is_major_symmetric());
    let sm = s.major_symmetric();
    assert!(sm.is_major_symmetric());
    assert_relative_eq!(sm.major_symmetric(), sm, epsilon = 1e-12);
}

#[test]
fn is_symmetric_classifies_order_two() {
    assert!(DenseTensor::<f64, 2, 1>::from_data(vec![3.5], DenseStructure)
        .unwrap()
        .is_symmetric());

    let asym2 =
        DenseTensor::<f64, 2, 2>::from_data(vec![1.0, 2.0, 3.0, 4.0], DenseStructure).unwrap();
    assert!(!asym2.is_symmetric());
    let sym2 =
        DenseTensor::<f64, 2, 2>::from_data(vec![1.0, 2.0, 2.0, 4.0], DenseStructure).unwrap();
    assert!(sym2.is_symmetric());

    let asym3 = DenseTensor::<f64, 2, 3>::from_data(
        vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        DenseStructure,
    )
    .unwrap();
    assert!(!asym3.is_symmetric());
    let sym3 = DenseTensor::<f64, 2, 3>::from_data(
        vec![1.0, 2.0, 3.0, 2.0, 4.0, 5.0, 3.0, 5.0, 6.0],
        DenseStructure,
    )
    .unwrap();
    assert!(sym3.is_symmetric());

    // symmetric storage is symmetric regardless of its contents
    assert!(random_symmetric::<2, 3>(29).is_symmetric());
    assert!(random_symmetric::<4, 3>(29).is_symmetric());
}

#[test]
fn order_four_symmetry_test_is_minor_symmetry() {
    let t = random_dense::<4, 2>(23);
    assert_eq!(t.is_symmetric(), t.is_minor_symmetric());
    assert!(t.minor_symmetric().is_symmetric());
    assert!(t.minor_symmetric().to_dense().is_symmetric());
}

#[test]
fn symmetric_reads_match_dense_expansion() {
    let s = random_symmetric::<4, 3>(31);
    let d = s.to_dense();
    for (index, value) in d.iter_expanded() {
        assert_eq!(*value, s.get_owned(&index).unwrap());
    }

    // swaps within either pair hit the same stored scalar
    assert_eq!(
        s.get_owned([2, 1, 0, 2]).unwrap(),
        s.get_owned([1, 2, 0, 2]).unwrap()
    );
    assert_eq!(
        s.get_owned([2, 1, 0, 2]).unwrap(),
        s.get_owned([2, 1, 2, 0]).unwrap()
    );
}

#[test]
fn construction_promotes_element_types() {
    let ints = DenseTensor::<i32, 2, 2>::from_data(vec![1, 2, 3, 4], DenseStructure).unwrap();
    let floats: DenseTensor<f64, 2, 2> = ints.cast();
    assert_relative_eq!(floats.get_owned([1, 0]).unwrap(), 2.0);

    let promoted =
        DenseTensor::<f64, 2, 2>::from_data(vec![1i8, 2, 3, 4], DenseStructure).unwrap();
    assert_eq!(promoted, floats);

    let complexes: DenseTensor<num::Complex<f64>, 2, 2> = floats.convert_to();
    assert_eq!(
        complexes.get_owned([0, 1]).unwrap(),
        num::Complex::new(3.0, 0.0)
    );

    let generated = DenseTensor::<f64, 2, 2>::from_fn(DenseStructure, |indices| {
        (indices[0] + 2 * indices[1]) as u32
    });
    assert_relative_eq!(generated.get_owned([1, 1]).unwrap(), 3.0);
}

#[test]
fn componentwise_arithmetic() {
    let a = random_dense::<2, 3>(47);
    let doubled = a.scalar_mul(&2.0);
    assert_relative_eq!(doubled, a.clone() + a.clone(), epsilon = 1e-12);

    let negated = -a.clone();
    assert_relative_eq!(
        a.clone() + negated,
        Tensor::zero(DenseStructure),
        epsilon = 1e-12
    );
    assert_relative_eq!(
        a.clone() - a.clone(),
        Tensor::zero(DenseStructure),
        epsilon = 1e-12
    );

    // mixed-kind sums densify the compact operand
    let s = random_symmetric::<2, 3>(48);
    let mixed = s.clone() + a.clone();
    assert_relative_eq!(mixed, s.to_dense() + a, epsilon = 1e-12);
}

#[test]
fn storage_tensor_holds_either_kind() {
    let t = random_dense::<4, 2>(41);
    let stored: StorageTensor<f64, 4, 2> = t.clone().into();
    assert_eq!(stored.order(), 4);
    assert_eq!(stored.dim(), 2);
    assert_eq!(stored.size(), 16);
    assert_eq!(stored.is_minor_symmetric(), t.is_minor_symmetric());
    assert_eq!(
        stored.get_owned([1, 0, 1, 1]).unwrap(),
        t.get_owned([1, 0, 1, 1]).unwrap()
    );

    let compact: StorageTensor<f64, 4, 2> = t.minor_symmetric().into();
    assert_eq!(compact.size(), 9);
    assert!(compact.is_minor_symmetric());
    assert!(compact.is_symmetric());
    assert_eq!(compact.minor_symmetric(), t.minor_symmetric());
    assert_eq!(compact.data().len(), 9);
    assert!(compact.indices().iter().all(|ix| ix[0] <= ix[1] && ix[2] <= ix[3]));

    let expanded = compact.try_into_symmetric().unwrap().to_dense();
    assert!(expanded.is_minor_symmetric());

    let st: StorageTensor<f64, 2, 3> = random_dense::<2, 3>(43).into();
    let sp = st.symmetric_part();
    assert!(sp.is_symmetric());
    assert_eq!(st.skew_part().size(), 9);

    let scaled = StorageTensor::<f64, 2, 2>::from(random_symmetric::<2, 2>(53)).scalar_mul(&3.0);
    assert_eq!(scaled.size(), 3);
}

#[test]
fn serialization_roundtrips() {
    let s = random_symmetric::<2, 3>(37);
    let json = serde_json::to_string(&s).unwrap();
    let back: SymmetricTensor<f64, 2, 3> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, s);
}

#[test]
fn display_lists_canonical_indices() {
    let v = Vector::<f64, 2>::from_data(vec![1.0, 2.0], DenseStructure).unwrap();
    let shown = format!("{}", v);
    assert!(shown.contains("[0]: 1"));
    assert!(shown.contains("[1]: 2"));

    let s = random_symmetric::<2, 2>(61);
    assert_eq!(format!("{}", s).lines().count(), 3);
}
