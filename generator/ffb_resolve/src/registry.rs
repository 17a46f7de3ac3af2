//! Aggregate registry and the single type-resolution precedence list.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::debug;

use ffb_diagnostic::{Diagnostic, DiagnosticSink, ErrorCode};
use ffb_ir::{AggregateDesc, AggregateKind, Markers, Module, Name, Origin, TypeDesc};
use ffb_layout::{struct_layout, union_layout, AggregateLayout, Layout};

use crate::{ResolvedType, Target, Unresolved, ValueClass};

/// A fully resolved aggregate: its layout plus the declaration facts
/// call planning needs.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct AggregateEntry {
    pub kind: AggregateKind,
    /// Markers the declaration itself carries.
    pub default_markers: Markers,
    pub layout: AggregateLayout,
    /// False when any field failed to resolve; the layout then covers
    /// only the fields that did resolve and the artifact is marked
    /// invalid downstream.
    pub valid: bool,
}

/// Resolves the description graph's types against a target.
///
/// Built once per generation run; aggregate layouts are computed in
/// dependency order during construction, after which `resolve_type` is
/// a pure read-only lookup that planners may call from any thread.
pub struct Resolver<'m> {
    module: &'m Module,
    target: Target,
    entries: FxHashMap<Name, AggregateEntry>,
    /// Aggregates excluded from layout computation (layout cycles).
    failed: FxHashSet<Name>,
}

impl<'m> Resolver<'m> {
    /// Resolve every aggregate in the module.
    ///
    /// Cycles are detected first, before any layout computation; the
    /// participants are excluded and reported once. Remaining
    /// aggregates resolve in dependency order so an embedded layout is
    /// always available before its embedder.
    pub fn build(module: &'m Module, target: Target, sink: &mut dyn DiagnosticSink) -> Self {
        let failed = detect_cycles(module, sink);

        let mut resolver = Resolver {
            module,
            target,
            entries: FxHashMap::default(),
            failed,
        };

        let mut visited = FxHashSet::default();
        for agg in &module.aggregates {
            resolver.resolve_in_order(agg.name, &mut visited, sink);
        }
        resolver
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn module(&self) -> &'m Module {
        self.module
    }

    /// Entry for a resolved aggregate; `None` for unknown names and for
    /// cycle participants.
    pub fn aggregate_entry(&self, name: Name) -> Option<&AggregateEntry> {
        self.entries.get(&name)
    }

    fn resolve_in_order(
        &mut self,
        name: Name,
        visited: &mut FxHashSet<Name>,
        sink: &mut dyn DiagnosticSink,
    ) {
        if !visited.insert(name) || self.failed.contains(&name) {
            return;
        }
        let module = self.module;
        let Some(agg) = module.aggregate(name) else {
            return;
        };
        for (dep, _) in by_value_deps(module, agg) {
            self.resolve_in_order(dep, visited, sink);
        }
        self.compute(agg, sink);
    }

    fn compute(&mut self, agg: &AggregateDesc, sink: &mut dyn DiagnosticSink) {
        debug!(name = agg.name.raw(), "resolving aggregate layout");

        let decl_origin = Origin::decl(agg.name);
        let mut seen = FxHashSet::default();
        let mut valid = true;
        let mut fields: Vec<(Name, Layout)> = Vec::with_capacity(agg.fields.len());

        for field in &agg.fields {
            let origin = decl_origin.member(field.name);

            if !seen.insert(field.name) {
                sink.error(
                    ErrorCode::E1002,
                    origin,
                    "duplicate field name within the aggregate",
                );
                valid = false;
                continue;
            }

            match self.resolve_type(&field.ty, origin, sink) {
                Ok(resolved) => fields.push((field.name, resolved.layout)),
                Err(Unresolved) => valid = false,
            }
        }

        let layout = match agg.kind {
            AggregateKind::Struct => struct_layout(&fields),
            AggregateKind::Union => union_layout(&fields),
        };

        self.entries.insert(
            agg.name,
            AggregateEntry {
                kind: agg.kind,
                default_markers: agg.default_markers,
                layout,
                valid,
            },
        );
    }

    /// Resolve one semantic type to a layout descriptor.
    ///
    /// This is the single precedence list of the crate docs; field
    /// resolution and parameter resolution both land here. A failure
    /// reports against `origin` and returns [`Unresolved`]; the caller
    /// continues with sibling members.
    pub fn resolve_type(
        &self,
        ty: &TypeDesc,
        origin: Origin,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<ResolvedType, Unresolved> {
        match ty {
            TypeDesc::Scalar(kind) => Ok(ResolvedType {
                layout: Layout::scalar(*kind),
                class: ValueClass::Scalar(*kind),
            }),
            TypeDesc::Str => Ok(ResolvedType {
                layout: self.target.address_layout(),
                class: ValueClass::StrPtr,
            }),
            TypeDesc::Handle => Ok(ResolvedType {
                layout: self.target.address_layout(),
                class: ValueClass::RawHandle,
            }),
            TypeDesc::ScratchAllocator => Ok(ResolvedType {
                layout: self.target.address_layout(),
                class: ValueClass::ScratchAllocator,
            }),
            TypeDesc::Sequence { elem, count } => {
                if *count == 0 {
                    sink.error(
                        ErrorCode::E1003,
                        origin,
                        "sequence repeat count must be at least 1",
                    );
                    return Err(Unresolved);
                }
                let Some(layout) = Layout::sequence(*elem, *count) else {
                    sink.error(
                        ErrorCode::E1003,
                        origin,
                        "sequence repeat count overflows the total byte size",
                    );
                    return Err(Unresolved);
                };
                Ok(ResolvedType {
                    layout,
                    class: ValueClass::Sequence {
                        elem: *elem,
                        count: *count,
                    },
                })
            }
            TypeDesc::Named { target, markers } => {
                self.resolve_named(*target, *markers, origin, sink)
            }
        }
    }

    fn resolve_named(
        &self,
        target: Name,
        markers: Markers,
        origin: Origin,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<ResolvedType, Unresolved> {
        // Mutual exclusion first: never silently pick one marker.
        if markers.is_ambiguous() {
            sink.error(
                ErrorCode::E2002,
                origin,
                "conflicting by-value and by-address markers on one declaration",
            );
            return Err(Unresolved);
        }

        if markers.contains(Markers::BY_VALUE) {
            return self.embed(target, true, origin, sink);
        }

        if markers.contains(Markers::ADDRESS) {
            let of = self.module.aggregate(target).map(|agg| agg.name);
            return Ok(ResolvedType {
                layout: self.target.address_layout(),
                class: ValueClass::Address { of },
            });
        }

        // No marker on the use: the same precedence re-applies against
        // the referenced declaration's own markers.
        let Some(agg) = self.module.aggregate(target) else {
            sink.error(
                ErrorCode::E2004,
                origin,
                "reference to an undeclared aggregate",
            );
            return Err(Unresolved);
        };

        if agg.default_markers.is_ambiguous() {
            sink.error(
                ErrorCode::E2002,
                origin,
                "the referenced declaration carries conflicting by-value and by-address markers",
            );
            return Err(Unresolved);
        }

        if agg.default_markers.contains(Markers::BY_VALUE) {
            return self.embed(target, false, origin, sink);
        }

        if agg.default_markers.contains(Markers::ADDRESS) {
            return Ok(ResolvedType {
                layout: self.target.address_layout(),
                class: ValueClass::Address {
                    of: Some(agg.name),
                },
            });
        }

        sink.report(
            Diagnostic::error(ErrorCode::E2001)
                .with_origin(origin)
                .with_message("type is not supported: nominal type without by-value or by-address semantics")
                .with_note("mark the use by value or by address, or give the declaration a default marker"),
        );
        Err(Unresolved)
    }

    fn embed(
        &self,
        target: Name,
        explicit: bool,
        origin: Origin,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<ResolvedType, Unresolved> {
        if self.failed.contains(&target) {
            // The cycle itself was already reported once; references to
            // the excluded aggregate degrade to plain unsupported uses.
            sink.report(
                Diagnostic::error(ErrorCode::E2001)
                    .with_origin(origin)
                    .with_message("type is not supported: the referenced aggregate failed to resolve"),
            );
            return Err(Unresolved);
        }

        match self.entries.get(&target) {
            Some(entry) if entry.valid => Ok(ResolvedType {
                layout: entry.layout.as_layout(),
                class: ValueClass::ByValueAggregate { target, explicit },
            }),
            Some(_) => {
                sink.report(
                    Diagnostic::error(ErrorCode::E2001)
                        .with_origin(origin)
                        .with_message("type is not supported: the referenced aggregate has definition errors"),
                );
                Err(Unresolved)
            }
            None => {
                if self.module.aggregate(target).is_some() {
                    sink.error(
                        ErrorCode::E9001,
                        origin,
                        "aggregate referenced before its layout was resolved",
                    );
                } else {
                    sink.error(
                        ErrorCode::E2004,
                        origin,
                        "reference to an undeclared aggregate",
                    );
                }
                Err(Unresolved)
            }
        }
    }
}

/// By-value dependency edges out of one aggregate: fields that will
/// embed a declared aggregate's layout.
fn by_value_deps(module: &Module, agg: &AggregateDesc) -> SmallVec<[(Name, Origin); 4]> {
    let mut deps = SmallVec::new();
    for field in &agg.fields {
        let TypeDesc::Named { target, markers } = &field.ty else {
            continue;
        };
        if markers.is_ambiguous() || markers.contains(Markers::ADDRESS) {
            continue;
        }
        let by_value = markers.contains(Markers::BY_VALUE)
            || module
                .aggregate(*target)
                .is_some_and(|a| a.default_markers == Markers::BY_VALUE);
        if by_value && module.aggregate(*target).is_some() {
            deps.push((*target, Origin::decl(agg.name).member(field.name)));
        }
    }
    deps
}

/// Find aggregates that transitively embed themselves by value.
///
/// Runs before any layout computation. Each cycle is reported once,
/// against the field where the back edge closes it, and every
/// aggregate on the cycle is excluded.
fn detect_cycles(module: &Module, sink: &mut dyn DiagnosticSink) -> FxHashSet<Name> {
    #[derive(Copy, Clone, Eq, PartialEq)]
    enum State {
        InStack,
        Done,
    }

    fn dfs(
        module: &Module,
        name: Name,
        state: &mut FxHashMap<Name, State>,
        stack: &mut Vec<Name>,
        failed: &mut FxHashSet<Name>,
        sink: &mut dyn DiagnosticSink,
    ) {
        state.insert(name, State::InStack);
        stack.push(name);

        if let Some(agg) = module.aggregate(name) {
            for (dep, origin) in by_value_deps(module, agg) {
                match state.get(&dep) {
                    Some(State::InStack) => {
                        sink.report(
                            Diagnostic::error(ErrorCode::E2003)
                                .with_origin(origin)
                                .with_message("aggregate transitively embeds itself by value")
                                .with_note(
                                    "hold the inner aggregate by address to break the cycle",
                                ),
                        );
                        let start = stack.iter().position(|&n| n == dep).unwrap_or(0);
                        for &member in &stack[start..] {
                            failed.insert(member);
                        }
                    }
                    Some(State::Done) => {}
                    None => dfs(module, dep, state, stack, failed, sink),
                }
            }
        }

        stack.pop();
        state.insert(name, State::Done);
    }

    let mut state = FxHashMap::default();
    let mut stack = Vec::new();
    let mut failed = FxHashSet::default();

    for agg in &module.aggregates {
        if !state.contains_key(&agg.name) {
            dfs(module, agg.name, &mut state, &mut stack, &mut failed, sink);
        }
    }
    failed
}

#[cfg(test)]
mod tests;
