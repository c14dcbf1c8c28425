//! Scalar float rules of the shader unit.
//!
//! These differ from IEEE-754 in a few places: multiplication treats `0 * inf` as `0`,
//! `min`/`max` are plain compare-and-select (so NaN handling depends on operand order), and
//! `rsq` of either zero is `+inf`.

/// `a * b`, with NaN winning over zero and zero winning over infinity.
pub fn mul(a: f32, b: f32) -> f32 {
    if a.is_nan() || b.is_nan() {
        f32::NAN
    } else if a == 0.0 || b == 0.0 {
        0.0
    } else {
        a * b
    }
}

/// `a + b`.
pub fn add(a: f32, b: f32) -> f32 {
    a + b
}

/// `a * b + c` with [`mul`] semantics for the product.
pub fn mad(a: f32, b: f32, c: f32) -> f32 {
    add(mul(a, b), c)
}

/// Sum of pairwise [`mul`] products, accumulated left to right.
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).fold(0.0, |acc, (&x, &y)| add(acc, mul(x, y)))
}

/// `a > b ? a : b`.
pub fn max(a: f32, b: f32) -> f32 {
    if a > b { a } else { b }
}

/// `a < b ? a : b`.
pub fn min(a: f32, b: f32) -> f32 {
    if a < b { a } else { b }
}

/// `1.0` when `a >= b`, else `0.0`. False for any NaN operand.
pub fn sge(a: f32, b: f32) -> f32 {
    if a >= b { 1.0 } else { 0.0 }
}

/// `1.0` when `a < b`, else `0.0`. False for any NaN operand.
pub fn slt(a: f32, b: f32) -> f32 {
    if a < b { 1.0 } else { 0.0 }
}

/// `1 / x`.
pub fn rcp(x: f32) -> f32 {
    1.0 / x
}

/// `1 / sqrt(x)`; either zero gives `+inf`.
pub fn rsq(x: f32) -> f32 {
    if x == 0.0 {
        f32::INFINITY
    } else {
        1.0 / x.sqrt()
    }
}

/// Round toward negative infinity.
pub fn flr(x: f32) -> f32 {
    x.floor()
}

/// `2^x`.
pub fn ex2(x: f32) -> f32 {
    x.exp2()
}

/// `log2(x)`; either zero gives `-inf`, negatives give NaN.
pub fn lg2(x: f32) -> f32 {
    x.log2()
}

#[cfg(test)]
#[path = "../../tests/unit/soft/alu.rs"]
mod tests;
