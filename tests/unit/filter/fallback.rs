use super::*;

#[test]
fn every_blend_mode_has_a_row() {
    for mode in [
        BlendMode::Normal,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Darken,
        BlendMode::Lighten,
    ] {
        assert!(BLEND_MODES.iter().any(|(m, _)| *m == mode));
    }
}

#[test]
fn normal_and_multiply_are_exact() {
    assert_eq!(
        blend_mode_mapping(BlendMode::Normal),
        IntrinsicMapping {
            intrinsic: BlendIntrinsic::SrcOver,
            fidelity: Fidelity::Exact
        }
    );
    assert_eq!(
        blend_mode_mapping(BlendMode::Multiply).fidelity,
        Fidelity::Exact
    );
}

#[test]
fn screen_darken_lighten_fall_back_to_multiply() {
    for mode in [BlendMode::Screen, BlendMode::Darken, BlendMode::Lighten] {
        let m = blend_mode_mapping(mode);
        assert_eq!(m.intrinsic, BlendIntrinsic::Multiply);
        assert_eq!(m.fidelity, Fidelity::Approximate);
    }
}

#[test]
fn composite_operators_map_to_porter_duff() {
    assert_eq!(
        composite_mapping(CompositeOperator::Over).intrinsic,
        BlendIntrinsic::SrcOver
    );
    assert_eq!(
        composite_mapping(CompositeOperator::In).intrinsic,
        BlendIntrinsic::SrcIn
    );
    assert_eq!(
        composite_mapping(CompositeOperator::Out).intrinsic,
        BlendIntrinsic::SrcOut
    );
    assert_eq!(
        composite_mapping(CompositeOperator::Atop).intrinsic,
        BlendIntrinsic::SrcAtop
    );
    assert_eq!(
        composite_mapping(CompositeOperator::Xor).intrinsic,
        BlendIntrinsic::Xor
    );
}

#[test]
fn arithmetic_is_the_only_approximate_operator() {
    let approx: Vec<_> = COMPOSITE_OPERATORS
        .iter()
        .filter(|(_, m)| m.fidelity == Fidelity::Approximate)
        .map(|(o, _)| *o)
        .collect();
    assert_eq!(approx, vec![CompositeOperator::Arithmetic]);
}
