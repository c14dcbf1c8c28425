use super::*;

#[test]
fn built_in_suites_validate() {
    for s in all_suites() {
        s.validate()
            .unwrap_or_else(|e| panic!("suite {} invalid: {e}", s.kind));
    }
}

#[test]
fn suites_come_in_declared_order() {
    let kinds: Vec<_> = all_suites().iter().map(|s| s.kind).collect();
    assert_eq!(kinds, SuiteKind::ALL.to_vec());
}

#[test]
fn case_counts_match_the_programs() {
    assert_eq!(suite(SuiteKind::Dph).tests().len(), 10);
    assert_eq!(suite(SuiteKind::Sge).tests().len(), 5);
    assert_eq!(suite(SuiteKind::Fp).tests().len(), fp::SELECTOR_COUNT as usize);
    assert_eq!(fp::SELECTOR_COUNT, 41);
}

#[test]
fn fp_selector_is_written_to_uniform_x() {
    let s = suite(SuiteKind::Fp);
    for (i, c) in s.tests().iter().enumerate() {
        assert_eq!(c.id as usize, i);
        assert_eq!(c.inputs.uniform.x, c.id as f32);
        assert!(c.inputs.vertex_color.is_none());
    }
    assert_eq!(
        s.tests()[0].expected,
        ExpectedColor::class(FpClass::PosInf)
    );
}

#[test]
fn sge_mixed_case_matches_reference_scenario() {
    let s = suite(SuiteKind::Sge);
    let mixed = &s.tests()[3];
    assert_eq!(mixed.inputs.uniform, Vec4::new(0.52, 0.82, 0.01, 0.0));
    assert_eq!(
        mixed.inputs.vertex_color,
        Some(Vec4::new(0.21, 0.82, 0.23, 1.0))
    );
    assert_eq!(mixed.expected, ExpectedColor::Rgb([1.0, 1.0, 0.0]));
}

#[test]
fn out_of_range_expectation_is_rejected() {
    assert!(ExpectedColor::Rgb([0.0, 1.5, 0.0]).validate().is_err());
    assert!(ExpectedColor::Rgba([0.0, 0.0, 0.0, f32::NAN]).validate().is_err());
    assert!(ExpectedColor::Rgb([0.0, 0.5, 0.75]).validate().is_ok());
}

#[test]
fn duplicate_ids_are_rejected() {
    let mut s = suite(SuiteKind::Sge);
    let dup = s.cases[0].clone();
    s.cases.push(dup);
    let err = s.validate().unwrap_err();
    assert!(err.to_string().contains("repeats case id 0"));
}

#[test]
fn delivery_mismatch_is_rejected() {
    let mut s = suite(SuiteKind::Dph);
    s.cases[2].inputs.vertex_color = None;
    assert!(s.validate().is_err());

    let mut s = suite(SuiteKind::Fp);
    s.uniform = "projection";
    assert!(s.validate().is_err());
}

#[test]
fn suite_names_roundtrip() {
    for k in SuiteKind::ALL {
        assert_eq!(SuiteKind::from_name(k.name()), Some(k));
    }
    assert_eq!(SuiteKind::from_name("mad"), None);
}

#[test]
fn rgba_expectations_need_an_alpha_framebuffer() {
    use crate::framebuffer::layout::{Orientation, PixelFormat};

    let mut s = suite(SuiteKind::Dph);
    assert!(s.check_layout(FramebufferLayout::TOP_SCREEN).is_ok());

    s.cases[3].expected = ExpectedColor::Rgba([1.0, 1.0, 1.0, 1.0]);
    assert!(s.validate().is_ok());
    let err = s.check_layout(FramebufferLayout::TOP_SCREEN).unwrap_err();
    assert!(matches!(err, ConformError::Validation(_)));

    let abgr =
        FramebufferLayout::new(400, 240, PixelFormat::Abgr8, Orientation::ColumnMajorBottomUp)
            .unwrap();
    assert!(s.check_layout(abgr).is_ok());
}
