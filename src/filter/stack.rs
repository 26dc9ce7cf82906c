use std::collections::HashMap;

use crate::compute::backend::{ComputeContext, ComputeSettings, create_context};
use crate::compute::blend::BlendIntrinsic;
use crate::filter::input::InputRef;
use crate::filter::operation::Operation;
use crate::foundation::error::{SvgfxError, SvgfxResult};
use crate::surface::buffer::ImageBuffer;

/// Get-or-compute cell for a value derived at most once per execution.
#[derive(Debug)]
pub(crate) struct Memo<T> {
    value: Option<T>,
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self { value: None }
    }
}

impl<T> Memo<T> {
    pub(crate) fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub(crate) fn get_or_try_init(
        &mut self,
        init: impl FnOnce() -> SvgfxResult<T>,
    ) -> SvgfxResult<&T> {
        if self.value.is_none() {
            self.value = Some(init()?);
        }
        self.value
            .as_ref()
            .ok_or_else(|| SvgfxError::evaluation("derived buffer missing after init"))
    }
}

/// Buffers derived from the execution's inputs.
struct DerivedBuffers {
    source: ImageBuffer,
    background: ImageBuffer,
    /// Transparent stand-in for inputs that carry no pixels.
    empty: ImageBuffer,
    pure_alpha: Memo<ImageBuffer>,
    source_alpha: Memo<ImageBuffer>,
    background_alpha: Memo<ImageBuffer>,
}

/// Alpha-only copy of `color`: the opaque-black template with `color` applied destination-in.
fn alpha_of(
    ctx: &mut dyn ComputeContext,
    pure_alpha: &mut Memo<ImageBuffer>,
    color: &ImageBuffer,
) -> SvgfxResult<ImageBuffer> {
    let template = pure_alpha.get_or_try_init(|| {
        let mut t = color.transparent_like();
        ctx.fill([0, 0, 0, 255], &mut t)?;
        Ok(t)
    })?;
    let mut out = color.transparent_like();
    ctx.copy(template, &mut out)?;
    ctx.blend(BlendIntrinsic::DstIn, color, &mut out)?;
    Ok(out)
}

impl DerivedBuffers {
    /// Compute the lazily-derived buffer behind `r`, if any.
    fn prepare(&mut self, ctx: &mut dyn ComputeContext, r: InputRef) -> SvgfxResult<()> {
        match r {
            InputRef::SourceAlpha => {
                let Self {
                    source,
                    pure_alpha,
                    source_alpha,
                    ..
                } = self;
                source_alpha.get_or_try_init(|| alpha_of(ctx, pure_alpha, source))?;
            }
            InputRef::BackgroundAlpha => {
                let Self {
                    background,
                    pure_alpha,
                    background_alpha,
                    ..
                } = self;
                background_alpha.get_or_try_init(|| alpha_of(ctx, pure_alpha, background))?;
            }
            _ => {}
        }
        Ok(())
    }
}

/// Per-node execution state.
enum NodeState {
    Unexecuted,
    Executed(ImageBuffer),
    /// Execution failed; later references see no contribution.
    Failed,
}

/// One `execute` call: inputs, derived buffers and node outputs. Dropped as a whole at the end.
struct Execution {
    derived: DerivedBuffers,
    nodes: Vec<NodeState>,
}

impl Execution {
    /// Buffer behind `r`; `None` for reserved slots and unavailable node outputs.
    fn lookup(&self, r: InputRef) -> Option<&ImageBuffer> {
        match r {
            InputRef::Source => Some(&self.derived.source),
            InputRef::Background => Some(&self.derived.background),
            InputRef::SourceAlpha => self.derived.source_alpha.get(),
            InputRef::BackgroundAlpha => self.derived.background_alpha.get(),
            InputRef::FillPaint | InputRef::StrokePaint | InputRef::Unknown(_) => None,
            InputRef::Node(i) => match self.nodes.get(i) {
                Some(NodeState::Executed(buf)) => Some(buf),
                _ => None,
            },
        }
    }

    fn resolve(&self, r: Option<InputRef>, at: usize) -> &ImageBuffer {
        let Some(r) = r else {
            return &self.derived.empty;
        };
        match self.lookup(r) {
            Some(buf) => buf,
            None => {
                if r.is_reserved() {
                    tracing::debug!(node = at, input = %r, "reserved input contributes nothing");
                } else {
                    tracing::warn!(node = at, input = %r, "input unavailable; using transparent");
                }
                &self.derived.empty
            }
        }
    }
}

/// An ordered list of filter primitives executed against a background/source pair.
///
/// Deserialization re-pushes every operation so stored stacks get the same normalization as
/// built ones.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "RawFilterStack")]
pub struct FilterStack {
    operations: Vec<Operation>,
    /// `result` name to node index.
    #[serde(default)]
    results: HashMap<String, usize>,
}

#[derive(serde::Deserialize)]
struct RawFilterStack {
    operations: Vec<Operation>,
    #[serde(default)]
    results: HashMap<String, usize>,
}

impl From<RawFilterStack> for FilterStack {
    fn from(raw: RawFilterStack) -> Self {
        let mut stack = FilterStack::new();
        for op in raw.operations {
            stack.push(op);
        }
        stack.results = raw.results;
        stack
    }
}

impl FilterStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a primitive (after definition-time normalization); returns its index.
    pub fn push(&mut self, op: Operation) -> usize {
        self.operations.push(op.normalized());
        self.operations.len() - 1
    }

    /// Record `name` as the `result` of node `index`. Later names shadow earlier ones.
    pub fn name_result(&mut self, name: impl Into<String>, index: usize) {
        self.results.insert(name.into(), index);
    }

    pub fn result_index(&self, name: &str) -> Option<usize> {
        self.results.get(name).copied()
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Execute with a freshly created compute context.
    ///
    /// Never fails: problems degrade to transparent output for the affected node (or the whole
    /// result when no context can be created) and are logged.
    #[tracing::instrument(skip_all, fields(nodes = self.operations.len()))]
    pub fn execute(
        &self,
        settings: &ComputeSettings,
        background: &ImageBuffer,
        source: &ImageBuffer,
    ) -> ImageBuffer {
        match create_context(settings) {
            Ok(mut ctx) => self.execute_in(ctx.as_mut(), background, source),
            Err(err) => {
                tracing::warn!(error = %err, "compute context unavailable; returning transparent");
                source.transparent_like()
            }
        }
    }

    /// Execute on a caller-provided context.
    pub fn execute_in(
        &self,
        ctx: &mut dyn ComputeContext,
        background: &ImageBuffer,
        source: &ImageBuffer,
    ) -> ImageBuffer {
        let (width, height) = source.dimensions();
        let mut result = source.transparent_like();

        if !background.same_size(source) {
            tracing::debug!(
                background = ?background.dimensions(),
                source = ?(width, height),
                "background fitted to source size"
            );
        }
        let background = match background.fit_to(width, height) {
            Ok(bg) => bg,
            Err(err) => {
                tracing::warn!(error = %err, "background could not be fitted; using transparent");
                source.transparent_like()
            }
        };

        let mut exec = Execution {
            derived: DerivedBuffers {
                source: source.clone(),
                background,
                empty: source.transparent_like(),
                pure_alpha: Memo::default(),
                source_alpha: Memo::default(),
                background_alpha: Memo::default(),
            },
            nodes: Vec::with_capacity(self.operations.len()),
        };

        for (at, op) in self.operations.iter().enumerate() {
            exec.nodes.push(NodeState::Unexecuted);
            let state = match run_node(ctx, &mut exec, at, op) {
                Ok(buf) => NodeState::Executed(buf),
                Err(err) => {
                    tracing::warn!(node = at, primitive = op.name(), error = %err, "node failed");
                    NodeState::Failed
                }
            };
            exec.nodes[at] = state;
        }

        if let Some(NodeState::Executed(last)) = exec.nodes.last()
            && let Err(err) = ctx.copy(last, &mut result)
        {
            tracing::warn!(error = %err, "final copy failed; returning transparent");
            return source.transparent_like();
        }
        result
    }
}

fn run_node(
    ctx: &mut dyn ComputeContext,
    exec: &mut Execution,
    at: usize,
    op: &Operation,
) -> SvgfxResult<ImageBuffer> {
    let (in1, in2) = op.inputs();
    for r in [in1, in2].into_iter().flatten() {
        exec.derived.prepare(ctx, r)?;
    }
    let a = exec.resolve(in1, at);
    let b = exec.resolve(in2, at);
    op.run(ctx, a, b)
}

#[cfg(test)]
#[path = "../../tests/unit/filter/stack.rs"]
mod tests;
