//! Load/store variants: alignment, round trips, and write bounds.

#[macro_use]
mod common;

use common::Lcg;
use shortvec::{Element, ShortVec, ShortVector};

/// Buffer aligned for the widest register of any family.
#[repr(C, align(64))]
struct Aligned<T>([T; 40]);

impl<T: Element> Aligned<T> {
    fn zeroed() -> Self {
        Aligned([T::ZERO; 40])
    }
}

fn check_round_trip<V: ShortVector>() {
    let mut rng = Lcg::new(0xa11 + V::ARITY as u64);
    let lanes = rng.lanes::<V::Scalar>(V::ARITY);
    let v = V::from_slice(&lanes);

    let mut unaligned = vec![<V::Scalar as Element>::ZERO; V::ARITY + 1];
    unsafe { v.store(unaligned.as_mut_ptr().add(1)) };
    assert_eq!(&unaligned[1..], &lanes[..]);
    let back = unsafe { V::load(unaligned.as_ptr().add(1)) };
    assert_eq!(back, v);

    let mut aligned = Aligned::<V::Scalar>::zeroed();
    unsafe { v.store_aligned(aligned.0.as_mut_ptr()) };
    assert_eq!(&aligned.0[..V::ARITY], &lanes[..]);
    let back = unsafe { V::load_aligned(aligned.0.as_ptr()) };
    assert_eq!(back, v);

    let mut streamed = Aligned::<V::Scalar>::zeroed();
    unsafe { v.store_nt(streamed.0.as_mut_ptr()) };
    assert_eq!(&streamed.0[..V::ARITY], &lanes[..]);
}

#[test]
fn stores_and_loads_round_trip() {
    for_each_arity!(check_round_trip);
}

fn check_store_bounds<V: ShortVector>() {
    let guard = <V::Scalar as Element>::from_f64(-7.0);
    let fill = <V::Scalar as Element>::from_f64(3.0);
    let mut buffer = vec![guard; V::ARITY + 8];

    V::splat(fill).store_slice(&mut buffer);

    for (i, &x) in buffer.iter().enumerate() {
        if i < V::ARITY {
            assert_eq!(x, fill, "lane {} should be written", i);
        } else {
            assert_eq!(
                x, guard,
                "guard {} was overwritten by a {}-wide store",
                i,
                V::ARITY
            );
        }
    }
}

#[test]
fn stores_never_write_past_the_vector() {
    for_each_arity!(check_store_bounds);
}

#[test]
fn load_consumes_registers_in_order() {
    let lanes: Vec<f64> = (0..16).map(|i| i as f64 * 10.0).collect();
    let v = unsafe { ShortVec::<f64, 16>::load(lanes.as_ptr()) };
    assert_eq!(v.to_array().to_vec(), lanes);
}

#[test]
fn from_slice_ignores_the_tail() {
    let v = ShortVec::<f32, 4>::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    assert_eq!(v.to_array(), [1.0, 2.0, 3.0, 4.0]);
}

#[test]
#[should_panic]
fn from_slice_rejects_short_input() {
    let _ = ShortVec::<f64, 8>::from_slice(&[1.0; 7]);
}

#[test]
#[should_panic]
fn store_slice_rejects_short_output() {
    let mut out = [0.0f32; 3];
    ShortVec::<f32, 4>::splat(1.0).store_slice(&mut out);
}

/// Four bytes past an aligned base, misaligned for every register including
/// a lone `f64`.
#[cfg(debug_assertions)]
fn misaligned(buffer: &mut Aligned<f64>) -> *mut f64 {
    unsafe { (buffer.0.as_mut_ptr() as *mut u8).add(4) as *mut f64 }
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "not aligned")]
fn load_aligned_checks_alignment_in_debug_builds() {
    let mut buffer = Aligned::<f64>::zeroed();
    let ptr = misaligned(&mut buffer);
    let _ = unsafe { ShortVec::<f64, 4>::load_aligned(ptr) };
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "not aligned")]
fn store_aligned_checks_alignment_in_debug_builds() {
    let mut buffer = Aligned::<f64>::zeroed();
    let ptr = misaligned(&mut buffer);
    unsafe { ShortVec::<f64, 4>::splat(1.0).store_aligned(ptr) };
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "not aligned")]
fn store_nt_checks_alignment_in_debug_builds() {
    let mut buffer = Aligned::<f64>::zeroed();
    let ptr = misaligned(&mut buffer);
    unsafe { ShortVec::<f64, 4>::splat(1.0).store_nt(ptr) };
}
