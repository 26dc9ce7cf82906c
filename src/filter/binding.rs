//! Raw-code entry points matching the platform binding (`addFilter_fe*`).
//!
//! Every shim decodes integer codes, appends to the current filter and never fails. Unknown
//! mode/operator codes degrade to normal/over.

use crate::filter::input::InputRef;
use crate::filter::operation::{BlendMode, CompositeOperator, Operation};
use crate::filter::registry::FilterRegistry;
use crate::foundation::core::Subregion;

impl FilterRegistry {
    #[allow(clippy::too_many_arguments)]
    pub fn add_fe_blend(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        input: i32,
        input2: i32,
        mode: i32,
    ) {
        let mode = BlendMode::from_code(mode).unwrap_or_else(|| {
            tracing::warn!(code = mode, "unknown feBlend mode; using normal");
            BlendMode::Normal
        });
        let op = Operation::blend(InputRef::from_raw(input), InputRef::from_raw(input2), mode);
        self.add_operation(op.with_region(Subregion::new(x, y, width, height)));
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_fe_composite(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        operator: i32,
        input: i32,
        input2: i32,
        k: [f64; 4],
    ) {
        let operator = CompositeOperator::from_code(operator).unwrap_or_else(|| {
            tracing::warn!(code = operator, "unknown feComposite operator; using over");
            CompositeOperator::Over
        });
        let mut op = Operation::composite(
            operator,
            InputRef::from_raw(input),
            InputRef::from_raw(input2),
        );
        if let Operation::Composite(c) = &mut op {
            c.k = k;
        }
        self.add_operation(op.with_region(Subregion::new(x, y, width, height)));
    }

    /// `color` is a packed `0x00RRGGBB`; the top byte is ignored.
    #[allow(clippy::too_many_arguments)]
    pub fn add_fe_flood(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        input: i32,
        color: u32,
        opacity: f64,
    ) {
        let mut op = Operation::flood(color, opacity);
        if let Operation::Flood(f) = &mut op {
            f.input = InputRef::from_raw(input);
        }
        self.add_operation(op.with_region(Subregion::new(x, y, width, height)));
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_fe_gaussian_blur(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        input: i32,
        std_dev_x: f64,
        std_dev_y: f64,
    ) {
        let op = Operation::gaussian_blur(InputRef::from_raw(input), std_dev_x, std_dev_y);
        self.add_operation(op.with_region(Subregion::new(x, y, width, height)));
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_fe_offset(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        input: i32,
        dx: f64,
        dy: f64,
    ) {
        let op = Operation::offset(InputRef::from_raw(input), dx, dy);
        self.add_operation(op.with_region(Subregion::new(x, y, width, height)));
    }
}
