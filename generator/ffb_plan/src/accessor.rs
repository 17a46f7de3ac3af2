//! Accessor planning for aggregate fields.

use ffb_diagnostic::{DiagnosticSink, ErrorCode, NullSink};
use ffb_ir::{AggregateDesc, AggregateKind, Name, Origin, ScalarKind};
use ffb_layout::AggregateLayout;
use ffb_resolve::{Resolver, ValueClass};

/// What kind of accessor a field gets.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum AccessorKind {
    /// Typed get/set pair at the field's offset.
    Scalar(ScalarKind),
    /// Get/set of a raw pointer-sized handle.
    Address,
    /// Raw-span accessor over the byte range, indexed element get/set,
    /// and a bulk replace that fails on length mismatch.
    Sequence {
        elem: ScalarKind,
        count: u64,
        byte_len: u64,
    },
    /// Raw-span accessor plus a typed view of the embedded aggregate.
    Embedded { target: Name, byte_len: u64 },
}

/// Accessor contract for one field.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct AccessorPlan {
    /// Structural field name, the key into the layout's offset table.
    pub field: Name,
    /// Name the accessor is emitted under (rename override applied).
    pub symbol: Name,
    /// Byte offset within the aggregate, looked up from the resolved
    /// layout, never recomputed here.
    pub offset: u64,
    pub kind: AccessorKind,
}

/// Everything the emitter needs for one aggregate artifact.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct AggregatePlan {
    pub name: Name,
    pub kind: AggregateKind,
    pub layout: AggregateLayout,
    pub accessors: Vec<AccessorPlan>,
    /// False when any field failed to resolve; the artifact is still
    /// emitted for the surviving fields but marked invalid.
    pub valid: bool,
}

/// Plan the accessor set for one aggregate.
///
/// Returns `None` for aggregates excluded from layout computation
/// (layout cycles); no artifact exists for those. Field resolution
/// failures were already reported when the registry was built, so this
/// pass resolves silently and only plans the fields that survived.
pub fn plan_aggregate(
    resolver: &Resolver<'_>,
    agg: &AggregateDesc,
    sink: &mut dyn DiagnosticSink,
) -> Option<AggregatePlan> {
    let entry = resolver.aggregate_entry(agg.name)?;
    let mut valid = entry.valid;
    let mut accessors = Vec::with_capacity(agg.fields.len());
    let mut silent = NullSink;

    for field in &agg.fields {
        let origin = Origin::decl(agg.name).member(field.name);
        let Ok(resolved) = resolver.resolve_type(&field.ty, origin, &mut silent) else {
            continue;
        };
        let Some(offset) = entry.layout.offset_of(field.name) else {
            // Resolved now but absent from the layout: the duplicate
            // of an earlier field name. Already reported.
            continue;
        };

        let kind = match resolved.class {
            ValueClass::Scalar(kind) => AccessorKind::Scalar(kind),
            // A one-element sequence behaves exactly like a scalar.
            ValueClass::Sequence { elem, count: 1 } => AccessorKind::Scalar(elem),
            ValueClass::Sequence { elem, count } => AccessorKind::Sequence {
                elem,
                count,
                byte_len: resolved.layout.byte_size,
            },
            ValueClass::Address { .. } | ValueClass::StrPtr | ValueClass::RawHandle => {
                AccessorKind::Address
            }
            ValueClass::ByValueAggregate { target, .. } => AccessorKind::Embedded {
                target,
                byte_len: resolved.layout.byte_size,
            },
            ValueClass::ScratchAllocator => {
                sink.error(
                    ErrorCode::E2001,
                    origin,
                    "type is not supported: a scratch-allocator slot is not a field type",
                );
                valid = false;
                continue;
            }
        };

        accessors.push(AccessorPlan {
            field: field.name,
            symbol: field.accessor_name(),
            offset,
            kind,
        });
    }

    Some(AggregatePlan {
        name: agg.name,
        kind: agg.kind,
        layout: entry.layout.clone(),
        accessors,
        valid,
    })
}
