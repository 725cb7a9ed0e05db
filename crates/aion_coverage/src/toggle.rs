//! Toggle coverage: per-bit value-change points for module signals.
//!
//! Each eligible variable gets one shadow copy holding its previous value.
//! Its type is decomposed into scalar bit lanes; every lane gets a
//! [`CoverToggle`] comparing the current and previous lane, followed by an
//! assignment refreshing the shadow lane. All of these land at module scope.

use std::fmt;

use aion_common::name::pretty_name;
use aion_common::{AionResult, InternalError, Interner};
use aion_config::CoverageConfig;
use aion_ir::{CoverCategory, CoverToggle, DType, DTypeId, Expr, Node, TypeDb, Var, VarDecl};
use tracing::debug;

use crate::context::{CoverageContext, PointSpec};
use crate::errors;

/// Why a variable is left without toggle coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleSkip {
    /// Parameters, temporaries, or signals of non-logic types.
    NotRelevant,
    /// The display name starts with `_`.
    LeadingUnderscore,
    /// A component of an inlined hierarchical name starts with `_`.
    InlinedLeadingUnderscore,
    /// More bits than the configured maximum.
    TooWide {
        /// `width × unpacked elements` of the variable.
        bits: u64,
        /// The configured limit.
        max: u32,
    },
}

impl fmt::Display for ToggleSkip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToggleSkip::NotRelevant => write!(f, "not relevant signal type"),
            ToggleSkip::LeadingUnderscore => write!(f, "leading underscore"),
            ToggleSkip::InlinedLeadingUnderscore => write!(f, "inlined leading underscore"),
            ToggleSkip::TooWide { bits, max } => {
                write!(f, "wide bus/array of {bits} bits > max width {max}")
            }
        }
    }
}

/// Returns why `var` (displayed as `display_name`) gets no toggle coverage,
/// or `None` if it is eligible.
pub fn skip_reason(
    var: &Var,
    display_name: &str,
    types: &TypeDb,
    config: &CoverageConfig,
) -> Option<ToggleSkip> {
    if !var.is_toggle_coverable(types) {
        return Some(ToggleSkip::NotRelevant);
    }
    if !config.underscore {
        if display_name.starts_with('_') {
            return Some(ToggleSkip::LeadingUnderscore);
        }
        if display_name.contains("._") {
            return Some(ToggleSkip::InlinedLeadingUnderscore);
        }
    }
    let bits = types
        .width(var.dtype)
        .saturating_mul(types.unpacked_elements(var.dtype));
    if bits > u64::from(config.max_width) {
        return Some(ToggleSkip::TooWide {
            bits,
            max: config.max_width,
        });
    }
    None
}

/// One bit lane (or the path to one) of a toggle-covered variable.
#[derive(Debug, Clone, PartialEq)]
pub struct ToggleLane {
    /// Index and field path below the variable, e.g. `"[2].valid"`.
    pub path: String,
    /// Read reference to the current value.
    pub current: Expr,
    /// Read reference to the shadow copy.
    pub previous: Expr,
}

impl ToggleLane {
    fn step(&self, path: String, select: impl Fn(Expr) -> Expr) -> Self {
        Self {
            path,
            current: select(self.current.clone()),
            previous: select(self.previous.clone()),
        }
    }
}

/// The type toggle expansion cannot decompose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnsupportedType(pub DTypeId);

/// Decomposes `dtype` below `above` into scalar lanes, appending them to `out`.
///
/// Unions contribute their first member only.
pub fn expand_lanes(
    types: &TypeDb,
    interner: &Interner,
    dtype: DTypeId,
    above: &ToggleLane,
    out: &mut Vec<ToggleLane>,
) -> Result<(), UnsupportedType> {
    let dtype = types.skip_refs(dtype);
    match types.get(dtype) {
        DType::Basic { range: Some(range), .. } => {
            for index in range.lo()..=range.hi() {
                let offset = bit_offset(range.offset(index), dtype)?;
                out.push(above.step(format!("{}[{index}]", above.path), |e| e.sel(offset, 1)));
            }
        }
        DType::Basic { range: None, .. } => out.push(above.clone()),
        DType::UnpackedArray { elem, range } => {
            for index in range.lo()..=range.hi() {
                let offset = bit_offset(range.offset(index), dtype)?;
                let lane = above.step(format!("{}[{index}]", above.path), |e| e.array_sel(offset));
                expand_lanes(types, interner, *elem, &lane, out)?;
            }
        }
        DType::PackedArray { elem, range } => {
            let elem_width = types.width(types.skip_refs(*elem));
            let width = bit_offset(elem_width, dtype)?;
            for index in range.lo()..=range.hi() {
                let lsb = bit_offset(range.offset(index).saturating_mul(elem_width), dtype)?;
                let lane = above.step(format!("{}[{index}]", above.path), |e| e.sel(lsb, width));
                expand_lanes(types, interner, *elem, &lane, out)?;
            }
        }
        DType::Struct {
            packed: true,
            members,
            ..
        } => {
            for member in members {
                let width = bit_offset(types.width(types.skip_refs(member.dtype)), dtype)?;
                let path = format!("{}.{}", above.path, interner.resolve(member.name));
                let lane = above.step(path, |e| e.sel(member.lsb, width));
                expand_lanes(types, interner, member.dtype, &lane, out)?;
            }
        }
        DType::Struct { members, .. } => {
            for member in members {
                let path = format!("{}.{}", above.path, interner.resolve(member.name));
                let lane = above.step(path, |e| e.member(member.name));
                expand_lanes(types, interner, member.dtype, &lane, out)?;
            }
        }
        DType::Union { members, .. } => {
            if let Some(member) = members.first() {
                let path = format!("{}.{}", above.path, interner.resolve(member.name));
                let lane = above.step(path, |e| e);
                expand_lanes(types, interner, member.dtype, &lane, out)?;
            }
        }
        DType::Queue { .. } | DType::Class { .. } | DType::Enum { .. } | DType::Typedef { .. } => {
            return Err(UnsupportedType(dtype));
        }
    }
    Ok(())
}

/// Narrows a bit position or width to the `u32` selects use.
fn bit_offset(bits: u64, dtype: DTypeId) -> Result<u32, UnsupportedType> {
    u32::try_from(bits).map_err(|_| UnsupportedType(dtype))
}

impl CoverageContext<'_> {
    /// Adds toggle coverage for a module-scope variable declaration.
    pub(crate) fn visit_var(&mut self, decl: &VarDecl) -> AionResult<()> {
        if self.in_toggle_off
            || self.state.in_mod_off
            || !decl.span.coverage_on()
            || !self.config.toggle
        {
            return Ok(());
        }
        let Some(cx) = self.module.as_ref() else {
            return Ok(());
        };
        let var = cx.vars.get(decl.var).clone();
        let interner = self.interner;
        let raw_name = interner.resolve(var.name);
        let display_name = pretty_name(raw_name);

        if let Some(reason) = skip_reason(&var, &display_name, self.types, self.config) {
            debug!(var = %display_name, %reason, "toggle coverage disabled");
            self.stats.toggle_skipped += 1;
            return Ok(());
        }
        debug!(var = %display_name, "toggle coverage");

        let shadow = self.new_shadow_var(&var, raw_name)?;
        let root = ToggleLane {
            path: String::new(),
            current: Expr::read(decl.var),
            previous: Expr::read(shadow),
        };
        let mut lanes = Vec::new();
        if let Err(UnsupportedType(bad)) =
            expand_lanes(self.types, interner, var.dtype, &root, &mut lanes)
        {
            let kind = self.types.kind_name(bad);
            self.sink.emit(errors::fatal_unsupported_toggle_type(
                &display_name,
                kind,
                var.span,
            ));
            return Err(InternalError::unexpected(
                "coverage",
                format_args!("{kind} type in toggle expansion of `{display_name}`"),
            ));
        }

        for lane in lanes {
            let (inc, _) = self.new_cover_inc(PointSpec {
                category: CoverCategory::Toggle,
                comment: format!("{display_name}{}", lane.path),
                hier: String::new(),
                line_ranges: String::new(),
                column_offset: 0,
                span: var.span,
                trace_name: None,
            })?;
            let update = Self::shadow_update(lane.current.clone(), &lane.previous, var.span);
            self.push_module_item(Node::CoverToggle(CoverToggle {
                inc,
                current: lane.current,
                previous: lane.previous,
                span: var.span,
            }))?;
            self.push_module_item(Node::Assign(update))?;
        }
        Ok(())
    }
}
