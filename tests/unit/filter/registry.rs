use super::*;
use crate::filter::operation::{BlendMode, CompositeOperator};
use crate::foundation::core::Subregion;

fn src() -> ImageBuffer {
    ImageBuffer::filled(2, 2, [255, 0, 0, 255]).unwrap()
}

#[test]
fn execute_without_selection_is_none() {
    let reg = FilterRegistry::new();
    assert!(reg.execute(&src(), &src()).is_none());
}

#[test]
fn define_filter_selects_and_replaces() {
    let mut reg = FilterRegistry::new();
    {
        let mut b = reg.define_filter("a");
        b.add(Operation::flood(0x0000ff, 1.0));
        b.add(Operation::flood(0x00ff00, 1.0));
    }
    assert_eq!(reg.current_name(), Some("a"));
    assert_eq!(reg.get("a").map(FilterStack::len), Some(2));

    reg.define_filter("a");
    assert_eq!(reg.get("a").map(FilterStack::len), Some(0));
    assert_eq!(reg.len(), 1);
}

#[test]
fn add_operation_targets_current_filter() {
    let mut reg = FilterRegistry::new();
    reg.add_operation(Operation::flood(0, 1.0));
    assert!(reg.is_empty());

    reg.define_filter("first");
    reg.define_filter("second");
    assert!(reg.set_filter("first"));
    reg.add_operation(Operation::flood(0x0000ff, 1.0));
    assert_eq!(reg.get("first").map(FilterStack::len), Some(1));
    assert_eq!(reg.get("second").map(FilterStack::len), Some(0));

    let out = reg.execute(&src(), &src()).unwrap();
    assert_eq!(out.pixel(0, 0), Some([0, 0, 255, 255]));
}

#[test]
fn unknown_set_filter_clears_selection() {
    let mut reg = FilterRegistry::new();
    reg.define_filter("a");
    assert!(!reg.set_filter("missing"));
    assert_eq!(reg.current_name(), None);
    reg.add_operation(Operation::flood(0, 1.0));
    assert_eq!(reg.get("a").map(FilterStack::len), Some(0));
}

#[test]
fn names_are_sorted_and_remove_clears_current() {
    let mut reg = FilterRegistry::new();
    reg.define_filter("b");
    reg.define_filter("a");
    assert_eq!(reg.names(), vec!["a", "b"]);
    assert!(reg.remove("a").is_some());
    assert_eq!(reg.current_name(), None);
    assert!(reg.remove("a").is_none());
    assert_eq!(reg.names(), vec!["b"]);
}

#[test]
fn builder_default_input_and_result_names() {
    let mut reg = FilterRegistry::new();
    let mut b = reg.define_filter("shadow");
    assert!(b.is_empty());
    assert_eq!(b.default_input(), InputRef::Source);

    b.add_with_result("blur", Operation::gaussian_blur(InputRef::SourceAlpha, 2.0, 2.0));
    assert_eq!(b.default_input(), InputRef::Node(0));
    assert_eq!(b.resolve_input("blur"), Some(InputRef::Node(0)));
    assert_eq!(b.resolve_input("SourceGraphic"), Some(InputRef::Source));
    assert_eq!(b.resolve_input("nope"), None);

    let i = b.add(Operation::offset(InputRef::Node(0), 1.0, 1.0));
    assert_eq!(i, 1);
    assert_eq!(b.len(), 2);
}

#[test]
fn raw_shims_decode_codes() {
    let mut reg = FilterRegistry::new();
    reg.define_filter("raw");
    reg.add_fe_flood(1, 2, 3, 4, -1, 0xff11_2233, 1.0);
    reg.add_fe_offset(0, 0, 0, 0, 0, 1.0, 0.0);
    reg.add_fe_blend(0, 0, 0, 0, -1, 1, 1);
    reg.add_fe_composite(0, 0, 0, 0, 2, -1, 2, [1.0, 2.0, 3.0, 4.0]);
    reg.add_fe_gaussian_blur(0, 0, 0, 0, 3, 0.0, 4.0);

    let ops = reg.get("raw").unwrap().operations();
    assert_eq!(ops.len(), 5);
    assert_eq!(ops[0].region(), Subregion::new(1, 2, 3, 4));
    match &ops[0] {
        Operation::Flood(f) => assert_eq!(f.color.0, 0x0011_2233),
        other => panic!("expected flood, got {other:?}"),
    }
    match &ops[2] {
        Operation::Blend(b) => {
            assert_eq!(b.mode, BlendMode::Multiply);
            assert_eq!(b.input2, InputRef::Node(1));
        }
        other => panic!("expected blend, got {other:?}"),
    }
    match &ops[3] {
        Operation::Composite(c) => {
            assert_eq!(c.operator, CompositeOperator::In);
            assert_eq!(c.k, [1.0, 2.0, 3.0, 4.0]);
        }
        other => panic!("expected composite, got {other:?}"),
    }
    match &ops[4] {
        Operation::GaussianBlur(g) => assert_eq!((g.std_dev_x, g.std_dev_y), (4.0, 4.0)),
        other => panic!("expected blur, got {other:?}"),
    }
}

#[test]
fn unknown_codes_fall_back() {
    let mut reg = FilterRegistry::new();
    reg.define_filter("raw");
    reg.add_fe_blend(0, 0, 0, 0, -1, -3, 99);
    reg.add_fe_composite(0, 0, 0, 0, 0, -1, -3, [0.0; 4]);
    let ops = reg.get("raw").unwrap().operations();
    assert!(matches!(&ops[0], Operation::Blend(b) if b.mode == BlendMode::Normal));
    assert!(matches!(&ops[1], Operation::Composite(c) if c.operator == CompositeOperator::Over));
}
