use super::*;

fn ctx() -> CpuContext {
    CpuContext::new(ComputeSettings::default())
}

#[test]
fn copy_requires_matching_sizes() {
    let src = ImageBuffer::filled(2, 2, [1, 2, 3, 4]).unwrap();
    let mut dst = ImageBuffer::new(2, 2).unwrap();
    ctx().copy(&src, &mut dst).unwrap();
    assert_eq!(dst, src);

    let mut wrong = ImageBuffer::new(3, 2).unwrap();
    assert!(ctx().copy(&src, &mut wrong).is_err());
}

#[test]
fn fill_writes_every_pixel() {
    let mut dst = ImageBuffer::new(3, 1).unwrap();
    ctx().fill([9, 8, 7, 255], &mut dst).unwrap();
    assert!(dst.data().chunks_exact(4).all(|px| px == [9, 8, 7, 255]));
}

#[test]
fn zero_sigma_blur_copies() {
    let src = ImageBuffer::filled(3, 3, [0, 0, 0, 255]).unwrap();
    let mut dst = ImageBuffer::new(3, 3).unwrap();
    ctx().gaussian_blur(0.0, &src, &mut dst).unwrap();
    assert_eq!(dst, src);
}

#[test]
fn draw_offset_clips_and_leaves_vacated_area() {
    let mut src = ImageBuffer::new(3, 1).unwrap();
    src.set_pixel(0, 0, [255, 0, 0, 255]);
    src.set_pixel(1, 0, [0, 255, 0, 255]);
    src.set_pixel(2, 0, [0, 0, 255, 255]);

    let mut dst = ImageBuffer::new(3, 1).unwrap();
    ctx().draw_offset(&src, 1, 0, &mut dst).unwrap();
    assert_eq!(dst.pixel(0, 0), Some([0, 0, 0, 0]));
    assert_eq!(dst.pixel(1, 0), Some([255, 0, 0, 255]));
    assert_eq!(dst.pixel(2, 0), Some([0, 255, 0, 255]));

    let mut left = ImageBuffer::new(3, 1).unwrap();
    ctx().draw_offset(&src, -2, 0, &mut left).unwrap();
    assert_eq!(left.pixel(0, 0), Some([0, 0, 255, 255]));
    assert_eq!(left.pixel(1, 0), Some([0, 0, 0, 0]));
}

#[test]
fn draw_offset_fully_outside_is_noop() {
    let src = ImageBuffer::filled(2, 2, [1, 1, 1, 255]).unwrap();
    let mut dst = ImageBuffer::new(2, 2).unwrap();
    ctx().draw_offset(&src, 5, 0, &mut dst).unwrap();
    ctx().draw_offset(&src, 0, -7, &mut dst).unwrap();
    assert!(dst.is_fully_transparent());
}

#[test]
fn factory_builds_cpu_context() {
    let c = create_context_for_test();
    assert_eq!(c.kind(), BackendKind::Cpu);
}

fn create_context_for_test() -> Box<dyn ComputeContext> {
    crate::compute::backend::create_context(&ComputeSettings::default()).unwrap()
}
