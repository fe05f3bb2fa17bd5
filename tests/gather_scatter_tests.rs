//! Indexed loads and stores.

#[macro_use]
mod common;

use common::Lcg;
use shortvec::{Element, ShortVec, ShortVector};

fn check_inverse<V: ShortVector>() {
    let mut rng = Lcg::new(0x9a7 + V::ARITY as u64);
    let v = V::from_slice(&rng.lanes::<V::Scalar>(V::ARITY));
    let offsets: Vec<i32> = (0..V::ARITY as i32).collect();

    let mut buffer = vec![<V::Scalar as Element>::ZERO; V::ARITY];
    v.scatter_into(&mut buffer, &offsets);
    assert_eq!(V::gather_from(&buffer, &offsets), v);
}

#[test]
fn scatter_then_gather_is_identity() {
    for_each_arity!(check_inverse);
}

fn check_strided<V: ShortVector>() {
    // Every third scalar, walking backwards.
    let data: Vec<V::Scalar> = (0..3 * V::ARITY)
        .map(|i| <V::Scalar as Element>::from_f64(i as f64))
        .collect();
    let offsets: Vec<i32> = (0..V::ARITY as i32).rev().map(|i| 3 * i).collect();

    let g = V::gather_from(&data, &offsets);
    for (lane, &offset) in offsets.iter().enumerate() {
        assert_eq!(g.lane(lane), data[offset as usize], "lane {}", lane);
    }

    let mut out = vec![<V::Scalar as Element>::ZERO; 3 * V::ARITY];
    g.scatter_into(&mut out, &offsets);
    for (i, (&x, &expected)) in out.iter().zip(&data).enumerate() {
        if i % 3 == 0 {
            assert_eq!(x, expected, "scalar {}", i);
        } else {
            assert_eq!(x, <V::Scalar as Element>::ZERO, "scalar {} should be untouched", i);
        }
    }
}

#[test]
fn gather_and_scatter_follow_arbitrary_offsets() {
    for_each_arity!(check_strided);
}

#[test]
fn gather_may_repeat_offsets() {
    let data = [1.0, 2.0, 3.0];
    let g = ShortVec::<f64, 4>::gather_from(&data, &[2, 2, 0, 2]);
    assert_eq!(g.to_array(), [3.0, 3.0, 1.0, 3.0]);
}

#[test]
fn aliasing_scatter_keeps_the_last_lane() {
    let v = ShortVec::<f32, 8>::from([0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
    let mut out = [0.0f32; 2];
    v.scatter_into(&mut out, &[0, 1, 0, 1, 0, 1, 0, 1]);
    assert_eq!(out, [6.0, 7.0]);
}

#[test]
fn raw_gather_reads_through_pointer_offsets() {
    let data: Vec<f64> = (0..64).map(|i| i as f64).collect();
    // Offsets relative to the middle of the buffer may be negative.
    let base = unsafe { data.as_ptr().add(32) };
    let offsets = [-32, -1, 0, 31];
    let g = unsafe { ShortVec::<f64, 4>::gather(base, &offsets) };
    assert_eq!(g.to_array(), [0.0, 31.0, 32.0, 63.0]);
}

#[test]
#[should_panic]
fn gather_from_rejects_negative_offsets() {
    let data = [0.0f64; 4];
    let _ = ShortVec::<f64, 2>::gather_from(&data, &[0, -1]);
}

#[test]
#[should_panic]
fn scatter_into_rejects_too_few_offsets() {
    let mut data = [0.0f32; 8];
    ShortVec::<f32, 8>::splat(1.0).scatter_into(&mut data, &[0, 1, 2]);
}
