//! Decomposition and elementwise behaviour across every arity.

#[macro_use]
mod common;

use common::Lcg;
use shortvec::{MaskVector, ShortVec, ShortVector};

fn check_decomposition<V: ShortVector>() {
    assert_eq!(V::ARITY % V::REGISTERS, 0);
    // No padding and no remainder lane: the vector is exactly ARITY scalars.
    assert_eq!(
        core::mem::size_of::<V>(),
        V::ARITY * core::mem::size_of::<V::Scalar>()
    );
}

#[test]
fn registers_cover_every_arity_exactly() {
    for_each_arity!(check_decomposition);
}

#[test]
fn sixteen_wide_square_of_two_is_four() {
    let v = ShortVec::<f64, 16>::from(2.0);
    let sq = v * v;
    for i in 0..16 {
        assert_eq!(sq[i], 4.0, "lane {}", i);
    }
}

fn check_elementwise_laws<V: ShortVector>() {
    let mut rng = Lcg::new(0x5eed + V::ARITY as u64);
    for _ in 0..16 {
        let a_lanes = rng.lanes::<V::Scalar>(V::ARITY);
        let b_lanes = rng.lanes::<V::Scalar>(V::ARITY);
        let a = V::from_slice(&a_lanes);
        let b = V::from_slice(&b_lanes);

        let (sum, diff, prod, quot) = (a + b, a - b, a * b, a / b);
        for i in 0..V::ARITY {
            let (x, y) = (a_lanes[i], b_lanes[i]);
            assert_eq!(sum.lane(i), x + y, "{} + {} in lane {}", x, y, i);
            assert_eq!(diff.lane(i), x - y, "{} - {} in lane {}", x, y, i);
            assert_eq!(prod.lane(i), x * y, "{} * {} in lane {}", x, y, i);
            assert_eq!(quot.lane(i), x / y, "{} / {} in lane {}", x, y, i);
        }

        let mut acc = a;
        acc += b;
        acc *= b;
        acc -= a;
        acc /= b;
        for i in 0..V::ARITY {
            let (x, y) = (a_lanes[i], b_lanes[i]);
            assert_eq!(acc.lane(i), ((x + y) * y - x) / y);
        }
    }
}

#[test]
fn arithmetic_matches_scalar_arithmetic_per_lane() {
    for_each_arity!(check_elementwise_laws);
}

#[test]
fn division_by_zero_follows_ieee() {
    let num = ShortVec::<f64, 4>::from([1.0, -1.0, 0.0, 2.0]);
    let q = num / ShortVec::<f64, 4>::splat(0.0);
    assert_eq!(q[0], f64::INFINITY);
    assert_eq!(q[1], f64::NEG_INFINITY);
    assert!(q[2].is_nan());
    assert_eq!(q[3], f64::INFINITY);
}

fn check_blend_law<V: ShortVector>() {
    let mut rng = Lcg::new(0xb1e4d + V::ARITY as u64);
    let a_lanes = rng.lanes::<V::Scalar>(V::ARITY);
    let b_lanes = rng.lanes::<V::Scalar>(V::ARITY);
    let a = V::from_slice(&a_lanes);
    let b = V::from_slice(&b_lanes);

    let mask = a.cmp_lt(b);
    let picked = a.blend(mask, b);
    for i in 0..V::ARITY {
        let expected = if a_lanes[i] < b_lanes[i] { b_lanes[i] } else { a_lanes[i] };
        assert_eq!(picked.lane(i), expected, "lane {}", i);
        assert_eq!(mask.lane(i), a_lanes[i] < b_lanes[i]);
    }

    // Complementary comparisons partition the lanes.
    assert!((a.cmp_lt(b) | a.cmp_ge(b)).all());
    assert!(!(a.cmp_lt(b) & a.cmp_ge(b)).any());
    assert!(a.cmp_eq(a).all());
}

#[test]
fn blend_takes_replacement_where_mask_is_true() {
    for_each_arity!(check_blend_law);
}

#[test]
fn comparisons_with_nan_are_false() {
    let a = ShortVec::<f32, 8>::from([f32::NAN, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    let b = ShortVec::<f32, 8>::splat(4.0);
    for mask in [a.cmp_lt(b), a.cmp_le(b), a.cmp_eq(b), a.cmp_gt(b), a.cmp_ge(b)] {
        assert!(!mask.lane(0));
    }
    assert!(a.cmp_eq(b).lane(4));
    assert!(a.cmp_gt(b).lane(7));
    assert!(!a.cmp_gt(b).all());
}

#[test]
fn any_detects_a_single_true_lane_in_the_last_register() {
    let a = ShortVec::<f64, 32>::splat(1.0);
    let mut lanes = [1.0; 32];
    lanes[31] = 5.0;
    let b = ShortVec::<f64, 32>::from(lanes);

    assert!(!a.cmp_gt(a).any());
    assert!(b.cmp_gt(a).any());
    assert!(!b.cmp_gt(a).all());

    // `any` on a plain vector tests raw bits.
    assert!(!ShortVec::<f64, 32>::splat(0.0).any());
    assert!(b.any());
}

#[test]
fn display_renders_lanes_in_order() {
    let v = ShortVec::<f64, 4>::from([1.0, 2.0, 3.0, 4.5]);
    assert_eq!(v.to_string(), "[1, 2, 3, 4.5]");
    let one = ShortVec::<f32, 1>::from(0.25f32);
    assert_eq!(one.to_string(), "[0.25]");
}

#[test]
fn debug_names_scalar_and_arity() {
    let v = ShortVec::<f64, 2>::splat(1.0);
    assert_eq!(format!("{:?}", v), "ShortVec<f64, 2>([1.0, 1.0])");
}

#[test]
fn default_is_all_zero() {
    let v = ShortVec::<f32, 16>::default();
    assert!(v.to_array().iter().all(|&x| x == 0.0));
    assert!(!v.any());
}

#[test]
fn in_place_multiply_multiplies() {
    let mut v = ShortVec::<f64, 4>::from([1.0, 2.0, 3.0, 4.0]);
    v *= ShortVec::<f64, 4>::splat(3.0);
    assert_eq!(v.to_array(), [3.0, 6.0, 9.0, 12.0]);
}

#[test]
fn lanes_are_indexed_in_logical_order() {
    let lanes: Vec<f32> = (0..32).map(|i| i as f32).collect();
    let v = ShortVec::<f32, 32>::from_slice(&lanes);
    for (i, &x) in lanes.iter().enumerate() {
        assert_eq!(v[i], x);
        assert_eq!(v.lane(i), x);
    }
    assert_eq!(v.as_slice(), &lanes[..]);
}

#[test]
#[should_panic]
fn lane_out_of_range_panics() {
    let v = ShortVec::<f64, 8>::splat(1.0);
    let _ = v.lane(8);
}
