use super::*;

#[test]
fn classifies_exceptional_values() {
    assert_eq!(FpClass::of(f32::NAN), FpClass::Nan);
    assert_eq!(FpClass::of(-f32::NAN), FpClass::Nan);
    assert_eq!(FpClass::of(f32::INFINITY), FpClass::PosInf);
    assert_eq!(FpClass::of(f32::NEG_INFINITY), FpClass::NegInf);
}

#[test]
fn classifies_exact_values_including_negative_zero() {
    assert_eq!(FpClass::of(0.0), FpClass::Zero);
    assert_eq!(FpClass::of(-0.0), FpClass::Zero);
    assert_eq!(FpClass::of(1.0), FpClass::One);
    assert_eq!(FpClass::of(2.0), FpClass::Number);
    assert_eq!(FpClass::of(-1.0), FpClass::Number);
    assert_eq!(FpClass::of(f32::MIN_POSITIVE), FpClass::Number);
}

#[test]
fn markers_are_distinct() {
    for (i, a) in FpClass::ALL.iter().enumerate() {
        for b in &FpClass::ALL[i + 1..] {
            assert_ne!(a.marker(), b.marker(), "{a} and {b} share a marker");
        }
    }
}
