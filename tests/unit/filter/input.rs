use super::*;

#[test]
fn raw_codes_decode_to_slots() {
    assert_eq!(InputRef::from_raw(-1), InputRef::Source);
    assert_eq!(InputRef::from_raw(-2), InputRef::SourceAlpha);
    assert_eq!(InputRef::from_raw(-3), InputRef::Background);
    assert_eq!(InputRef::from_raw(-4), InputRef::BackgroundAlpha);
    assert_eq!(InputRef::from_raw(-5), InputRef::FillPaint);
    assert_eq!(InputRef::from_raw(-6), InputRef::StrokePaint);
    assert_eq!(InputRef::from_raw(0), InputRef::Node(0));
    assert_eq!(InputRef::from_raw(7), InputRef::Node(7));
    assert_eq!(InputRef::from_raw(-9), InputRef::Unknown(-9));
}

#[test]
fn raw_codes_survive_encoding() {
    for code in [-9, -6, -5, -4, -3, -2, -1, 0, 3] {
        assert_eq!(InputRef::from_raw(code).to_raw(), code);
    }
}

#[test]
fn keywords_accept_background_graphic_spelling() {
    assert_eq!(
        InputRef::from_keyword("BackgroundGraphic"),
        Some(InputRef::Background)
    );
    assert_eq!(
        InputRef::from_keyword("BackgroundImage"),
        Some(InputRef::Background)
    );
    assert_eq!(
        InputRef::from_keyword(" SourceAlpha "),
        Some(InputRef::SourceAlpha)
    );
    assert_eq!(InputRef::from_keyword("blur1"), None);
}

#[test]
fn reserved_slots_are_flagged() {
    assert!(InputRef::FillPaint.is_reserved());
    assert!(InputRef::StrokePaint.is_reserved());
    assert!(InputRef::Unknown(-12).is_reserved());
    assert!(!InputRef::Source.is_reserved());
    assert!(!InputRef::Node(0).is_reserved());
}

#[test]
fn serde_uses_raw_codes() {
    let json = serde_json::to_string(&InputRef::BackgroundAlpha).unwrap();
    assert_eq!(json, "-4");
    let back: InputRef = serde_json::from_str("2").unwrap();
    assert_eq!(back, InputRef::Node(2));
}
