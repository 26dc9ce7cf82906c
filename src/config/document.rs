use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::filter::input::InputRef;
use crate::filter::operation::{BlendMode, CompositeOperator, Operation};
use crate::filter::registry::{FilterBuilder, FilterRegistry};
use crate::filter::stack::FilterStack;
use crate::foundation::core::Subregion;
use crate::foundation::error::{SvgfxError, SvgfxResult};

/// A set of named filters in JSON form.
///
/// ```json
/// { "filters": [ { "name": "shadow", "primitives": [
///   { "kind": "gaussian_blur", "in": "SourceAlpha", "std_dev_x": 3, "result": "blur" },
///   { "kind": "offset", "in": "blur", "dx": 4, "dy": 4 } ] } ] }
/// ```
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FilterDocument {
    pub filters: Vec<FilterDef>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FilterDef {
    pub name: String,
    #[serde(default)]
    pub primitives: Vec<PrimitiveDef>,
}

/// One primitive entry. `in`/`in2` default to the previous primitive (or the source graphic for
/// the first one).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PrimitiveDef {
    #[serde(rename = "in", default, skip_serializing_if = "Option::is_none")]
    pub input: Option<InputSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in2: Option<InputSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default)]
    pub region: Subregion,
    #[serde(flatten)]
    pub kind: PrimitiveKind,
}

/// Raw binding code or a keyword / result name.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum InputSpec {
    Code(i32),
    Name(String),
}

/// `"#rrggbb"` or a packed `0x00RRGGBB` integer.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    Packed(u32),
    Hex(String),
}

impl Default for ColorSpec {
    fn default() -> Self {
        Self::Packed(0)
    }
}

fn one() -> f64 {
    1.0
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PrimitiveKind {
    Blend {
        #[serde(default)]
        mode: BlendMode,
    },
    Composite {
        #[serde(default)]
        operator: CompositeOperator,
        #[serde(default)]
        k1: f64,
        #[serde(default)]
        k2: f64,
        #[serde(default)]
        k3: f64,
        #[serde(default)]
        k4: f64,
    },
    Flood {
        #[serde(default)]
        color: ColorSpec,
        #[serde(default = "one")]
        opacity: f64,
    },
    /// `std_dev_y` defaults to `std_dev_x`, like a single-valued `stdDeviation`.
    GaussianBlur {
        #[serde(default)]
        std_dev_x: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        std_dev_y: Option<f64>,
    },
    Offset {
        #[serde(default)]
        dx: f64,
        #[serde(default)]
        dy: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PathElem {
    Field(&'static str),
    Index(usize),
}

#[derive(Debug, Clone)]
struct DocumentError {
    path: Vec<PathElem>,
    message: String,
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for p in &self.path {
            match p {
                PathElem::Field(name) => write!(f, ".{name}")?,
                PathElem::Index(i) => write!(f, "[{i}]")?,
            }
        }
        write!(f, ": {}", self.message)
    }
}

struct Errors {
    errors: Vec<DocumentError>,
}

impl Errors {
    fn push(&mut self, path: &[PathElem], message: impl Into<String>) {
        self.errors.push(DocumentError {
            path: path.to_vec(),
            message: message.into(),
        });
    }

    fn into_result<T>(self, ok: T) -> SvgfxResult<T> {
        if self.errors.is_empty() {
            return Ok(ok);
        }
        let joined = self
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n");
        Err(SvgfxError::validation(joined))
    }
}

/// Parse `#rrggbb` into `0x00RRGGBB`.
fn parse_hex_color(s: &str) -> Option<u32> {
    let hex = s.trim().strip_prefix('#')?;
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

impl FilterDocument {
    pub fn from_json_str(s: &str) -> SvgfxResult<Self> {
        let doc: Self = serde_json::from_str(s)?;
        doc.validate()?;
        Ok(doc)
    }

    pub fn from_reader(r: impl Read) -> SvgfxResult<Self> {
        let doc: Self = serde_json::from_reader(r)?;
        doc.validate()?;
        Ok(doc)
    }

    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_path(path: impl AsRef<Path>) -> SvgfxResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SvgfxError::validation(format!("open filter document '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn to_json_string(&self) -> SvgfxResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every filter without touching a registry. All problems are reported together, one
    /// `$.filters[i]...: message` line each.
    pub fn validate(&self) -> SvgfxResult<()> {
        self.lower().map(|_| ())
    }

    /// Validate, then add every filter to `registry`. Existing filters with the same name are
    /// replaced; the current selection is left alone.
    #[tracing::instrument(skip_all, fields(filters = self.filters.len()))]
    pub fn install(&self, registry: &mut FilterRegistry) -> SvgfxResult<()> {
        for (name, stack) in self.lower()? {
            tracing::debug!(filter = %name, nodes = stack.len(), "installing filter");
            registry.insert_stack(name, stack);
        }
        Ok(())
    }

    fn lower(&self) -> SvgfxResult<Vec<(String, FilterStack)>> {
        let mut errors = Errors { errors: Vec::new() };
        let mut out = Vec::with_capacity(self.filters.len());
        let mut path = vec![PathElem::Field("filters")];
        for (i, def) in self.filters.iter().enumerate() {
            path.push(PathElem::Index(i));
            if def.name.trim().is_empty() {
                path.push(PathElem::Field("name"));
                errors.push(&path, "filter name must not be empty");
                path.pop();
            }
            let mut stack = FilterStack::new();
            let mut builder = FilterBuilder::new(&mut stack);
            path.push(PathElem::Field("primitives"));
            for (j, prim) in def.primitives.iter().enumerate() {
                path.push(PathElem::Index(j));
                if let Some(op) = lower_primitive(&builder, prim, &mut path, &mut errors) {
                    match &prim.result {
                        Some(result) => builder.add_with_result(result.clone(), op),
                        None => builder.add(op),
                    };
                }
                path.pop();
            }
            path.pop();
            path.pop();
            out.push((def.name.clone(), stack));
        }
        errors.into_result(out)
    }
}

fn lower_input(
    builder: &FilterBuilder<'_>,
    field: &'static str,
    spec: Option<&InputSpec>,
    path: &mut Vec<PathElem>,
    errors: &mut Errors,
) -> InputRef {
    match spec {
        None => builder.default_input(),
        Some(InputSpec::Code(code)) => InputRef::from_raw(*code),
        Some(InputSpec::Name(name)) => builder.resolve_input(name).unwrap_or_else(|| {
            path.push(PathElem::Field(field));
            errors.push(path, format!("unknown input or result name \"{name}\""));
            path.pop();
            InputRef::Source
        }),
    }
}

fn check_finite(values: &[(&'static str, f64)], path: &mut Vec<PathElem>, errors: &mut Errors) {
    for &(field, v) in values {
        if !v.is_finite() {
            path.push(PathElem::Field(field));
            errors.push(path, format!("must be a finite number, got {v}"));
            path.pop();
        }
    }
}

fn lower_primitive(
    builder: &FilterBuilder<'_>,
    prim: &PrimitiveDef,
    path: &mut Vec<PathElem>,
    errors: &mut Errors,
) -> Option<Operation> {
    let before = errors.errors.len();

    let input = lower_input(builder, "in", prim.input.as_ref(), path, errors);

    let op = match &prim.kind {
        PrimitiveKind::Blend { mode } => {
            let input2 = lower_input(builder, "in2", prim.in2.as_ref(), path, errors);
            Operation::blend(input, input2, *mode)
        }
        PrimitiveKind::Composite {
            operator,
            k1,
            k2,
            k3,
            k4,
        } => {
            let input2 = lower_input(builder, "in2", prim.in2.as_ref(), path, errors);
            check_finite(&[("k1", *k1), ("k2", *k2), ("k3", *k3), ("k4", *k4)], path, errors);
            let mut op = Operation::composite(*operator, input, input2);
            if let Operation::Composite(c) = &mut op {
                c.k = [*k1, *k2, *k3, *k4];
            }
            op
        }
        PrimitiveKind::Flood { color, opacity } => {
            check_finite(&[("opacity", *opacity)], path, errors);
            let packed = match color {
                ColorSpec::Packed(v) => *v,
                ColorSpec::Hex(s) => parse_hex_color(s).unwrap_or_else(|| {
                    path.push(PathElem::Field("color"));
                    errors.push(path, format!("malformed color \"{s}\"; expected #rrggbb"));
                    path.pop();
                    0
                }),
            };
            let mut op = Operation::flood(packed, *opacity);
            if let Operation::Flood(f) = &mut op {
                f.input = input;
            }
            op
        }
        PrimitiveKind::GaussianBlur {
            std_dev_x,
            std_dev_y,
        } => {
            let std_dev_y = std_dev_y.unwrap_or(*std_dev_x);
            check_finite(&[("std_dev_x", *std_dev_x), ("std_dev_y", std_dev_y)], path, errors);
            Operation::gaussian_blur(input, *std_dev_x, std_dev_y)
        }
        PrimitiveKind::Offset { dx, dy } => {
            check_finite(&[("dx", *dx), ("dy", *dy)], path, errors);
            Operation::offset(input, *dx, *dy)
        }
    };

    if let Some(result) = &prim.result
        && result.trim().is_empty()
    {
        path.push(PathElem::Field("result"));
        errors.push(path, "result name must not be empty");
        path.pop();
    }

    (errors.errors.len() == before).then(|| op.with_region(prim.region))
}

#[cfg(test)]
#[path = "../../tests/unit/config/document.rs"]
mod tests;
