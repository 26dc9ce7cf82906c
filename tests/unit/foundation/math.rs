use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn premultiply_zero_alpha_clears_color() {
    assert_eq!(premultiply([200, 100, 50, 0]), [0, 0, 0, 0]);
}

#[test]
fn opaque_pixels_survive_premultiply_roundtrip() {
    let px = [12, 200, 99, 255];
    assert_eq!(unpremultiply(premultiply(px)), px);
}

#[test]
fn half_alpha_roundtrip_is_within_one() {
    let px = [0x11, 0x22, 0x33, 128];
    let back = unpremultiply(premultiply(px));
    for c in 0..3 {
        assert!((i32::from(back[c]) - i32::from(px[c])).abs() <= 1);
    }
    assert_eq!(back[3], 128);
}
