//! Aggregate artifact emission.

use ffb_ir::NameInterner;
use ffb_plan::{AccessorKind, AccessorPlan, AggregatePlan};
use tracing::debug;

use crate::source::SourceWriter;
use crate::{Artifact, ArtifactKind};

/// Serialize one aggregate plan into its generated module.
///
/// The module carries the layout constant, one offset constant per
/// field, a zero-initializing allocation routine taking an external
/// allocator, and the planned accessor set, in field declaration
/// order.
pub fn emit_aggregate(plan: &AggregatePlan, interner: &NameInterner) -> Artifact {
    let name = interner.resolve(plan.name);
    debug!(name = %name, "emitting aggregate artifact");

    let mut w = SourceWriter::new();
    w.line("// Generated by ffbgen; do not edit.");
    if !plan.valid {
        w.line("// Generation reported errors for this declaration; only the");
        w.line("// members that resolved are covered.");
    }
    w.blank();
    w.open(&format!("pub mod {name}"));
    w.line("use ffb_rt::{Layout, RtError, Segment, SegmentAllocator};");
    w.blank();
    w.line(&format!(
        "pub const LAYOUT: Layout = Layout::new({}, {});",
        plan.layout.byte_size, plan.layout.byte_align
    ));

    if !plan.accessors.is_empty() {
        w.blank();
    }
    for accessor in &plan.accessors {
        w.line(&format!(
            "pub const {}: u64 = {};",
            offset_const(&interner.resolve(accessor.symbol)),
            accessor.offset
        ));
    }

    w.blank();
    w.line("/// Allocate a zero-initialized instance.");
    w.open("pub fn allocate(allocator: &mut dyn SegmentAllocator) -> Segment");
    w.line("allocator.allocate(LAYOUT)");
    w.close();

    for accessor in &plan.accessors {
        emit_accessor(&mut w, accessor, interner);
    }

    w.close();

    Artifact {
        name,
        kind: ArtifactKind::Aggregate,
        valid: plan.valid,
        text: w.finish(),
    }
}

fn offset_const(symbol: &str) -> String {
    format!("OFFSET_{}", symbol.to_ascii_uppercase())
}

fn emit_accessor(w: &mut SourceWriter, accessor: &AccessorPlan, interner: &NameInterner) {
    let symbol = interner.resolve(accessor.symbol);
    let offset = offset_const(&symbol);

    match &accessor.kind {
        AccessorKind::Scalar(kind) => {
            emit_scalar_pair(w, &symbol, &offset, kind.rust_name());
        }
        AccessorKind::Address => {
            // Addresses are stored as pointer-width integers.
            emit_scalar_pair(w, &symbol, &offset, "u64");
        }
        AccessorKind::Sequence {
            elem,
            count,
            byte_len,
        } => {
            let elem = elem.rust_name();
            w.blank();
            w.open(&format!(
                "pub fn {symbol}_span(instance: &Segment) -> Result<&[u8], RtError>"
            ));
            w.line(&format!("instance.span({offset}, {byte_len})"));
            w.close();
            w.blank();
            w.open(&format!(
                "pub fn {symbol}_at(instance: &Segment, index: u64) -> Result<{elem}, RtError>"
            ));
            w.line(&format!("instance.get_indexed::<{elem}>({offset}, index)"));
            w.close();
            w.blank();
            w.open(&format!(
                "pub fn set_{symbol}_at(instance: &mut Segment, index: u64, value: {elem}) -> Result<(), RtError>"
            ));
            w.line(&format!(
                "instance.set_indexed::<{elem}>({offset}, index, value)"
            ));
            w.close();
            w.blank();
            w.line(&format!(
                "/// Replace all {count} elements in one bulk copy; fails without"
            ));
            w.line("/// writing when the slice length does not match.");
            w.open(&format!(
                "pub fn set_{symbol}(instance: &mut Segment, values: &[{elem}]) -> Result<(), RtError>"
            ));
            w.line(&format!(
                "instance.replace_all::<{elem}>({offset}, {count}, values)"
            ));
            w.close();
        }
        AccessorKind::Embedded { byte_len, .. } => {
            w.blank();
            w.open(&format!(
                "pub fn {symbol}_span(instance: &Segment) -> Result<&[u8], RtError>"
            ));
            w.line(&format!("instance.span({offset}, {byte_len})"));
            w.close();
            w.blank();
            w.open(&format!(
                "pub fn set_{symbol}(instance: &mut Segment, value: &Segment) -> Result<(), RtError>"
            ));
            w.line(&format!("instance.write_segment({offset}, value)"));
            w.close();
        }
    }
}

fn emit_scalar_pair(w: &mut SourceWriter, symbol: &str, offset: &str, ty: &str) {
    w.blank();
    w.open(&format!(
        "pub fn {symbol}(instance: &Segment) -> Result<{ty}, RtError>"
    ));
    w.line(&format!("instance.get::<{ty}>({offset})"));
    w.close();
    w.blank();
    w.open(&format!(
        "pub fn set_{symbol}(instance: &mut Segment, value: {ty}) -> Result<(), RtError>"
    ));
    w.line(&format!("instance.set::<{ty}>({offset}, value)"));
    w.close();
}
