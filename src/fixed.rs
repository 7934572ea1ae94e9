//! Fixed-point helpers shared by the integrator and the renderer.
//!
//! Every signed plane stores plain `i32` values. Arithmetic happens in `i64`
//! and is pulled back into `[-LIMIT, LIMIT]` before it is written, which keeps
//! enough headroom that the sum of any two stored values still fits in `i64`
//! and, once clamped, in `i32`.

/// Largest magnitude any stored height, velocity or force may take.
pub const LIMIT: i32 = 0x6000_0000;

#[inline]
pub fn cap(x: i64) -> i32 {
    x.clamp(-(LIMIT as i64), LIMIT as i64) as i32
}

/// Arithmetic (flooring) shift, the fixed-point analogue of `x / 2^shift`.
#[inline]
pub fn shr(x: i64, shift: u32) -> i64 {
    x >> shift
}

#[inline]
pub fn in_range(x: i32) -> bool {
    (-LIMIT..=LIMIT).contains(&x)
}
