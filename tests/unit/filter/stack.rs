use super::*;
use crate::compute::backend::BackendKind;
use crate::compute::cpu::CpuContext;
use crate::filter::operation::{BlendMode, CompositeOperator};
use crate::foundation::core::PremulRgba8;

/// CPU context that counts calls so tests can check derived-buffer caching.
struct Counting {
    inner: CpuContext,
    fills: usize,
    dst_in: usize,
}

impl Counting {
    fn new() -> Self {
        Self {
            inner: CpuContext::new(ComputeSettings::default()),
            fills: 0,
            dst_in: 0,
        }
    }
}

impl ComputeContext for Counting {
    fn kind(&self) -> BackendKind {
        self.inner.kind()
    }

    fn copy(&mut self, src: &ImageBuffer, dst: &mut ImageBuffer) -> SvgfxResult<()> {
        self.inner.copy(src, dst)
    }

    fn blend(
        &mut self,
        op: BlendIntrinsic,
        src: &ImageBuffer,
        dst: &mut ImageBuffer,
    ) -> SvgfxResult<()> {
        if op == BlendIntrinsic::DstIn {
            self.dst_in += 1;
        }
        self.inner.blend(op, src, dst)
    }

    fn gaussian_blur(
        &mut self,
        sigma: f32,
        src: &ImageBuffer,
        dst: &mut ImageBuffer,
    ) -> SvgfxResult<()> {
        self.inner.gaussian_blur(sigma, src, dst)
    }

    fn fill(&mut self, px: PremulRgba8, dst: &mut ImageBuffer) -> SvgfxResult<()> {
        self.fills += 1;
        self.inner.fill(px, dst)
    }

    fn draw_offset(
        &mut self,
        src: &ImageBuffer,
        dx: i32,
        dy: i32,
        dst: &mut ImageBuffer,
    ) -> SvgfxResult<()> {
        self.inner.draw_offset(src, dx, dy, dst)
    }
}

fn solid(w: u32, h: u32, px: PremulRgba8) -> ImageBuffer {
    ImageBuffer::filled(w, h, px).unwrap()
}

#[test]
fn empty_stack_yields_transparent() {
    let stack = FilterStack::new();
    let src = solid(4, 4, [255, 0, 0, 255]);
    let out = stack.execute(&ComputeSettings::default(), &src, &src);
    assert_eq!(out.dimensions(), (4, 4));
    assert!(out.is_fully_transparent());
}

#[test]
fn push_returns_indices_and_normalizes() {
    let mut stack = FilterStack::new();
    assert_eq!(stack.push(Operation::flood(0xff0000, 1.0)), 0);
    assert_eq!(
        stack.push(Operation::gaussian_blur(InputRef::Node(0), 0.0, 0.0)),
        1
    );
    assert_eq!(stack.len(), 2);
    assert_eq!(stack.operations()[1].name(), "feComposite");
}

#[test]
fn deserialized_stacks_are_normalized() {
    let json = r#"{"operations":[
        {"kind":"gaussian_blur","in":-1,"std_dev_x":0.0,"std_dev_y":5.0},
        {"kind":"gaussian_blur","in":0,"std_dev_x":0.0,"std_dev_y":0.0}
    ],"results":{"soft":0}}"#;
    let stack: FilterStack = serde_json::from_str(json).unwrap();

    let mut built = FilterStack::new();
    built.push(Operation::gaussian_blur(InputRef::Source, 0.0, 5.0));
    built.push(Operation::gaussian_blur(InputRef::Node(0), 0.0, 0.0));
    built.name_result("soft", 0);

    assert_eq!(stack, built);
    assert_eq!(
        stack.operations()[0],
        Operation::gaussian_blur(InputRef::Source, 5.0, 5.0)
    );
    assert_eq!(
        stack.operations()[1],
        Operation::composite(CompositeOperator::Over, InputRef::Node(0), InputRef::Node(0))
    );
}

#[test]
fn result_is_last_node_output() {
    let mut stack = FilterStack::new();
    stack.push(Operation::flood(0x00ff00, 1.0));
    stack.push(Operation::flood(0x0000ff, 1.0));
    let src = solid(2, 2, [255, 0, 0, 255]);
    let out = stack.execute(&ComputeSettings::default(), &src, &src);
    assert_eq!(out.pixel(1, 1), Some([0, 0, 255, 255]));
}

#[test]
fn source_alpha_is_opaque_black_masked_by_source() {
    let mut stack = FilterStack::new();
    stack.push(Operation::offset(InputRef::SourceAlpha, 0.0, 0.0));
    let mut src = ImageBuffer::new(2, 1).unwrap();
    src.set_pixel(0, 0, [100, 20, 0, 128]);
    let out = stack.execute(&ComputeSettings::default(), &src, &src);
    assert_eq!(out.pixel(0, 0), Some([0, 0, 0, 128]));
    assert_eq!(out.pixel(1, 0), Some([0, 0, 0, 0]));
}

#[test]
fn source_alpha_is_derived_once_per_execution() {
    let mut stack = FilterStack::new();
    stack.push(Operation::offset(InputRef::SourceAlpha, 1.0, 0.0));
    stack.push(Operation::blend(
        InputRef::SourceAlpha,
        InputRef::Node(0),
        BlendMode::Normal,
    ));
    stack.push(Operation::composite(
        CompositeOperator::Over,
        InputRef::SourceAlpha,
        InputRef::SourceAlpha,
    ));
    let src = solid(3, 3, [10, 20, 30, 255]);

    let mut ctx = Counting::new();
    stack.execute_in(&mut ctx, &src, &src);
    assert_eq!(ctx.fills, 1);
    assert_eq!(ctx.dst_in, 1);

    // Alpha derivations share the opaque template.
    let mut both = FilterStack::new();
    both.push(Operation::blend(
        InputRef::SourceAlpha,
        InputRef::BackgroundAlpha,
        BlendMode::Normal,
    ));
    let mut ctx = Counting::new();
    both.execute_in(&mut ctx, &src, &src);
    assert_eq!(ctx.fills, 1);
    assert_eq!(ctx.dst_in, 2);
}

#[test]
fn stacks_without_alpha_inputs_skip_derivation() {
    let mut stack = FilterStack::new();
    stack.push(Operation::offset(InputRef::Source, 1.0, 1.0));
    let src = solid(2, 2, [1, 2, 3, 255]);
    let mut ctx = Counting::new();
    stack.execute_in(&mut ctx, &src, &src);
    assert_eq!(ctx.fills, 0);
    assert_eq!(ctx.dst_in, 0);
}

#[test]
fn reserved_and_forward_inputs_contribute_nothing() {
    let src = solid(2, 2, [255, 255, 255, 255]);
    for input in [
        InputRef::FillPaint,
        InputRef::StrokePaint,
        InputRef::Unknown(-42),
        InputRef::Node(0),
        InputRef::Node(9),
    ] {
        let mut stack = FilterStack::new();
        stack.push(Operation::offset(input, 0.0, 0.0));
        let out = stack.execute(&ComputeSettings::default(), &src, &src);
        assert!(out.is_fully_transparent(), "{input}");
    }
}

#[test]
fn background_is_fitted_to_source() {
    let mut stack = FilterStack::new();
    stack.push(Operation::offset(InputRef::Background, 0.0, 0.0));
    let bg = solid(1, 1, [0, 0, 255, 255]);
    let src = solid(2, 2, [255, 0, 0, 255]);
    let out = stack.execute(&ComputeSettings::default(), &bg, &src);
    assert_eq!(out.dimensions(), (2, 2));
    assert_eq!(out.pixel(0, 0), Some([0, 0, 255, 255]));
    assert_eq!(out.pixel(1, 1), Some([0, 0, 0, 0]));
}

#[test]
fn named_results_resolve_to_indices() {
    let mut stack = FilterStack::new();
    let i = stack.push(Operation::flood(0, 1.0));
    stack.name_result("base", i);
    assert_eq!(stack.result_index("base"), Some(0));
    assert_eq!(stack.result_index("other"), None);
}

#[test]
fn memo_initializes_once() {
    let mut memo: Memo<u32> = Memo::default();
    assert!(memo.get().is_none());
    let mut calls = 0;
    for _ in 0..3 {
        let v = memo
            .get_or_try_init(|| {
                calls += 1;
                Ok(7)
            })
            .unwrap();
        assert_eq!(*v, 7);
    }
    assert_eq!(calls, 1);
}
