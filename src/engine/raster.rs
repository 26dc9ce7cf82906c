use std::collections::HashMap;

use crate::compute::blend::{BlendIntrinsic, blend_in_place};
use crate::foundation::core::Rect;
use crate::foundation::error::{SvgfxError, SvgfxResult};
use crate::surface::buffer::ImageBuffer;

/// Opaque reference to a document owned by an [`SvgEngine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SvgHandle(u64);

#[derive(Debug)]
struct SvgDocument {
    antialias: bool,
    /// Markup of the last successful parse, kept so antialiasing changes can re-parse.
    source: Option<String>,
    /// Pending chunked input between `parse_chunk_begin` and `parse_chunk_end`.
    chunk: Option<String>,
    tree: Option<usvg::Tree>,
}

impl SvgDocument {
    fn new() -> Self {
        Self {
            antialias: true,
            source: None,
            chunk: None,
            tree: None,
        }
    }
}

fn parse_tree(text: &str, antialias: bool) -> SvgfxResult<usvg::Tree> {
    let shape_rendering = if antialias {
        usvg::ShapeRendering::GeometricPrecision
    } else {
        usvg::ShapeRendering::CrispEdges
    };
    let opts = usvg::Options {
        shape_rendering,
        ..Default::default()
    };
    usvg::Tree::from_str(text, &opts).map_err(|e| SvgfxError::engine(format!("parse svg: {e}")))
}

/// Pixel bounds of the non-transparent area of premultiplied RGBA8 data.
fn drawn_bounds(data: &[u8], width: u32) -> Option<Rect> {
    let width = width as usize;
    let mut bounds: Option<(usize, usize, usize, usize)> = None;
    for (i, px) in data.chunks_exact(4).enumerate() {
        if px[3] == 0 {
            continue;
        }
        let (x, y) = (i % width, i / width);
        bounds = Some(match bounds {
            None => (x, y, x + 1, y + 1),
            Some((l, t, r, b)) => (l.min(x), t.min(y), r.max(x + 1), b.max(y + 1)),
        });
    }
    bounds.map(|(l, t, r, b)| Rect::new(l as f64, t as f64, r as f64, b as f64))
}

/// Parses SVG documents into `usvg` trees and rasterizes them with `resvg`.
///
/// Documents are addressed by [`SvgHandle`]s; using a destroyed or foreign handle is an error.
#[derive(Debug, Default)]
pub struct SvgEngine {
    documents: HashMap<u64, SvgDocument>,
    next_handle: u64,
    /// Caller clip for bounding-box reporting (`set_bounding_box` with `in_clip`).
    clip: Option<Rect>,
    last_bounding_box: Option<Rect>,
}

impl SvgEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self) -> SvgHandle {
        let id = self.next_handle;
        self.next_handle += 1;
        self.documents.insert(id, SvgDocument::new());
        tracing::trace!(handle = id, "svg document created");
        SvgHandle(id)
    }

    /// Release a document. Returns `false` for unknown handles.
    pub fn destroy(&mut self, handle: SvgHandle) -> bool {
        self.documents.remove(&handle.0).is_some()
    }

    fn document_mut(&mut self, handle: SvgHandle) -> SvgfxResult<&mut SvgDocument> {
        self.documents
            .get_mut(&handle.0)
            .ok_or_else(|| SvgfxError::engine(format!("invalid svg handle {}", handle.0)))
    }

    fn document(&self, handle: SvgHandle) -> SvgfxResult<&SvgDocument> {
        self.documents
            .get(&handle.0)
            .ok_or_else(|| SvgfxError::engine(format!("invalid svg handle {}", handle.0)))
    }

    /// Parse a complete document, replacing any previous one on this handle.
    pub fn parse(&mut self, handle: SvgHandle, text: &str) -> SvgfxResult<()> {
        let doc = self.document_mut(handle)?;
        let tree = parse_tree(text, doc.antialias)?;
        doc.tree = Some(tree);
        doc.source = Some(text.to_owned());
        Ok(())
    }

    pub fn parse_chunk_begin(&mut self, handle: SvgHandle) -> SvgfxResult<()> {
        let doc = self.document_mut(handle)?;
        if doc.chunk.is_some() {
            tracing::debug!(handle = handle.0, "restarting chunked parse");
        }
        doc.chunk = Some(String::new());
        Ok(())
    }

    pub fn parse_chunk(&mut self, handle: SvgHandle, text: &str) -> SvgfxResult<()> {
        let doc = self.document_mut(handle)?;
        match doc.chunk.as_mut() {
            Some(buf) => {
                buf.push_str(text);
                Ok(())
            }
            None => Err(SvgfxError::engine("parse_chunk called before parse_chunk_begin")),
        }
    }

    pub fn parse_chunk_end(&mut self, handle: SvgHandle) -> SvgfxResult<()> {
        let text = self
            .document_mut(handle)?
            .chunk
            .take()
            .ok_or_else(|| SvgfxError::engine("parse_chunk_end called before parse_chunk_begin"))?;
        self.parse(handle, &text)
    }

    /// Toggle antialiasing. Off renders shapes with crisp edges; a loaded document is re-parsed.
    pub fn set_antialiasing(&mut self, handle: SvgHandle, on: bool) -> SvgfxResult<()> {
        let doc = self.document_mut(handle)?;
        if doc.antialias == on {
            return Ok(());
        }
        doc.antialias = on;
        if let Some(source) = &doc.source {
            doc.tree = Some(parse_tree(source, on)?);
        }
        Ok(())
    }

    /// Intrinsic size of the loaded document.
    pub fn document_size(&self, handle: SvgHandle) -> SvgfxResult<Option<(f32, f32)>> {
        let doc = self.document(handle)?;
        Ok(doc
            .tree
            .as_ref()
            .map(|t| (t.size().width(), t.size().height())))
    }

    /// Draw the document scaled to fit `target`, source-over.
    pub fn render(&mut self, handle: SvgHandle, target: &mut ImageBuffer) -> SvgfxResult<()> {
        let (w, h) = target.dimensions();
        self.render_to_area(handle, target, 0, 0, w, h)
    }

    /// Draw the document into the `w` x `h` area at (`x`, `y`) with uniform scaling, source-over.
    #[tracing::instrument(skip(self, target))]
    pub fn render_to_area(
        &mut self,
        handle: SvgHandle,
        target: &mut ImageBuffer,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
    ) -> SvgfxResult<()> {
        let doc = self.document(handle)?;
        let tree = doc
            .tree
            .as_ref()
            .ok_or_else(|| SvgfxError::engine("render called before a document was parsed"))?;

        let (tw, th) = target.dimensions();
        let mut pixmap = resvg::tiny_skia::Pixmap::new(tw, th)
            .ok_or_else(|| SvgfxError::engine("failed to allocate svg pixmap"))?;

        let size = tree.size();
        let scale = (w as f32 / size.width()).min(h as f32 / size.height());
        if !scale.is_finite() || scale <= 0.0 {
            tracing::debug!("empty render area");
            self.last_bounding_box = None;
            return Ok(());
        }
        let xform = resvg::tiny_skia::Transform::from_row(scale, 0.0, 0.0, scale, x as f32, y as f32);
        resvg::render(tree, xform, &mut pixmap.as_mut());

        blend_in_place(BlendIntrinsic::SrcOver, target.data_mut(), pixmap.data())?;

        let clip = self
            .clip
            .unwrap_or_else(|| Rect::new(0.0, 0.0, f64::from(tw), f64::from(th)));
        self.last_bounding_box = drawn_bounds(pixmap.data(), tw)
            .map(|b| b.intersect(clip))
            .filter(|b| b.area() > 0.0);
        Ok(())
    }

    /// Restrict reported bounding boxes to `left..right` x `top..bottom` when `in_clip`; otherwise
    /// report against the whole target. Negative coordinates clamp to zero.
    pub fn set_bounding_box(&mut self, in_clip: bool, left: i32, top: i32, right: i32, bottom: i32) {
        let c = |v: i32| f64::from(v.max(0));
        self.clip = in_clip.then(|| Rect::new(c(left), c(top), c(right), c(bottom)));
    }

    /// Pixel bounds of the last render, clipped; `None` when nothing was drawn.
    pub fn last_bounding_box(&self) -> Option<Rect> {
        self.last_bounding_box
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/raster.rs"]
mod tests;
