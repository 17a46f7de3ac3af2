//! Call-binding planning for declared native functions.

use smallvec::SmallVec;
use tracing::debug;

use ffb_diagnostic::{Diagnostic, DiagnosticSink, ErrorCode};
use ffb_ir::{FunctionDesc, InterfaceDesc, LibraryRef, Name, Origin, ScalarKind, TypeDesc};
use ffb_layout::Layout;
use ffb_resolve::{Resolver, Unresolved, ValueClass};

/// How one argument crosses into the native call.
///
/// Precedence, first match wins:
/// 1. address-tagged values pass the underlying raw handle;
/// 2. a by-value aggregate whose marker came from the declaration
///    default passes its handle too, the caller already owns a native
///    region; fixed-length sequences pass the same way, as buffers;
/// 3. string-like values copy their bytes into the call's scratch
///    region and pass the copy's address;
/// 4. an explicitly by-value aggregate copies into scratch and passes
///    the copy by value;
/// 5. primitive scalars pass unchanged.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum MarshalStrategy {
    /// Pass the argument's raw handle directly.
    RawHandle,
    /// Pass the address of the native region the caller already owns.
    BorrowedSegment,
    /// Copy the string's bytes into scratch, pass the copy's address.
    ScratchStr,
    /// Copy the by-value aggregate into scratch, pass the copy by
    /// value.
    ScratchCopy,
    /// Pass the scalar value unchanged.
    Direct(ScalarKind),
}

impl MarshalStrategy {
    /// Whether this strategy allocates in the call's scratch region.
    pub fn uses_scratch(self) -> bool {
        matches!(self, MarshalStrategy::ScratchStr | MarshalStrategy::ScratchCopy)
    }
}

/// How the native result comes back out.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ReturnStrategy {
    Void,
    /// Scalar result, returned unchanged.
    Direct(ScalarKind),
    /// Pointer-sized result, returned as a raw handle.
    RawHandle,
    /// By-value aggregate result, materialized through the allocator
    /// slot the signature declares as its first parameter.
    MaterializeByValue { target: Name },
}

/// One planned parameter: its boundary layout and marshal strategy.
///
/// The declared scratch-allocator slot, when present, is validated and
/// then dropped; it never appears among planned parameters.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct PlannedParam {
    pub name: Name,
    /// Declared position in the source signature, allocator slot
    /// included. Lets the emitter name arguments by their original
    /// index even when the slot shifted everything by one.
    pub declared_index: u32,
    pub layout: Layout,
    pub strategy: MarshalStrategy,
}

/// Everything the emitter needs for one generated call thunk.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct CallBindingPlan {
    /// High-level name of the generated call.
    pub name: Name,
    /// Symbol resolved in the native namespace.
    pub symbol: Name,
    /// Boundary value layouts: the return layout first when the call
    /// is non-void, then parameter layouts in declaration order with
    /// the allocator slot excluded.
    pub value_layouts: SmallVec<[Layout; 8]>,
    pub params: Vec<PlannedParam>,
    pub ret: ReturnStrategy,
    /// Whether the generated call wraps its body in a scoped scratch
    /// region. True iff any parameter copies into scratch or the
    /// return is materialized by value.
    pub needs_scratch: bool,
    /// False when any parameter or the return failed to plan; the
    /// thunk is still described for the parts that survived.
    pub valid: bool,
}

/// One planned interface: the call plans plus the symbol namespace.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct InterfacePlan {
    pub name: Name,
    /// Library the symbols resolve in; `None` is the platform default
    /// namespace.
    pub library: Option<LibraryRef>,
    pub calls: Vec<CallBindingPlan>,
    pub valid: bool,
}

/// Plan every function of one declared interface.
///
/// Functions are planned independently; one bad signature never
/// suppresses planning of its siblings.
pub fn plan_interface(
    resolver: &Resolver<'_>,
    iface: &InterfaceDesc,
    sink: &mut dyn DiagnosticSink,
) -> InterfacePlan {
    debug!(name = iface.name.raw(), "planning interface");

    let mut calls = Vec::with_capacity(iface.functions.len());
    for func in &iface.functions {
        calls.push(plan_function(resolver, iface.name, func, sink));
    }
    let valid = calls.iter().all(|c| c.valid);

    InterfacePlan {
        name: iface.name,
        library: iface.library.clone(),
        calls,
        valid,
    }
}

/// Plan one function signature.
///
/// The plan is a pure function of the signature and the resolved
/// registry; it does not depend on planning order or on any other
/// function.
pub fn plan_function(
    resolver: &Resolver<'_>,
    iface: Name,
    func: &FunctionDesc,
    sink: &mut dyn DiagnosticSink,
) -> CallBindingPlan {
    let origin = Origin::decl(iface).member(func.name);
    let mut valid = true;

    let (ret, ret_layout) = match plan_return(resolver, func, origin, sink) {
        Ok(pair) => pair,
        Err(Unresolved) => {
            valid = false;
            (ReturnStrategy::Void, None)
        }
    };

    let allocator_slot = validate_allocator_slot(func, &ret, origin, sink, &mut valid);

    let mut params = Vec::with_capacity(func.params.len());
    for (index, param) in func.params.iter().enumerate() {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "parameter counts are tiny"
        )]
        let index = index as u32;
        if Some(index) == allocator_slot {
            continue;
        }
        let param_origin = origin.param(index);

        let Ok(resolved) = resolver.resolve_type(&param.ty, param_origin, sink) else {
            valid = false;
            continue;
        };

        let strategy = match resolved.class {
            ValueClass::Address { .. } | ValueClass::RawHandle => MarshalStrategy::RawHandle,
            ValueClass::ByValueAggregate {
                explicit: false, ..
            }
            | ValueClass::Sequence { .. } => MarshalStrategy::BorrowedSegment,
            ValueClass::StrPtr => MarshalStrategy::ScratchStr,
            ValueClass::ByValueAggregate { explicit: true, .. } => MarshalStrategy::ScratchCopy,
            ValueClass::Scalar(kind) => MarshalStrategy::Direct(kind),
            ValueClass::ScratchAllocator => {
                // A slot the return did not call for, or a second one.
                sink.report(
                    Diagnostic::error(ErrorCode::E3001)
                        .with_origin(param_origin)
                        .with_message(
                            "scratch-allocator slot in a position the signature does not expect",
                        )
                        .with_note(
                            "the slot is only valid as the first parameter of a function \
                             returning an aggregate by value",
                        ),
                );
                valid = false;
                continue;
            }
        };

        // Boundary layout is what the native signature sees: the
        // pointer layout for every handle-passing strategy, the
        // resolved layout only when the value itself crosses.
        let layout = match strategy {
            MarshalStrategy::RawHandle
            | MarshalStrategy::BorrowedSegment
            | MarshalStrategy::ScratchStr => resolver.target().address_layout(),
            MarshalStrategy::ScratchCopy | MarshalStrategy::Direct(_) => resolved.layout,
        };

        params.push(PlannedParam {
            name: param.name,
            declared_index: index,
            layout,
            strategy,
        });
    }

    let mut value_layouts = SmallVec::new();
    if let Some(layout) = ret_layout {
        value_layouts.push(layout);
    }
    value_layouts.extend(params.iter().map(|p| p.layout));

    let needs_scratch = params.iter().any(|p| p.strategy.uses_scratch())
        || matches!(ret, ReturnStrategy::MaterializeByValue { .. });

    CallBindingPlan {
        name: func.name,
        symbol: func.native_symbol(),
        value_layouts,
        params,
        ret,
        needs_scratch,
        valid,
    }
}

/// Resolve the return type and pick its strategy.
///
/// Returns the boundary layout alongside; `None` layout means void.
fn plan_return(
    resolver: &Resolver<'_>,
    func: &FunctionDesc,
    origin: Origin,
    sink: &mut dyn DiagnosticSink,
) -> Result<(ReturnStrategy, Option<Layout>), Unresolved> {
    let Some(ret_ty) = &func.ret else {
        return Ok((ReturnStrategy::Void, None));
    };
    let resolved = resolver.resolve_type(ret_ty, origin, sink)?;

    let strategy = match resolved.class {
        ValueClass::Scalar(kind) => ReturnStrategy::Direct(kind),
        ValueClass::Address { .. } | ValueClass::StrPtr | ValueClass::RawHandle => {
            ReturnStrategy::RawHandle
        }
        ValueClass::ByValueAggregate { target, explicit } => {
            if explicit {
                ReturnStrategy::MaterializeByValue { target }
            } else {
                // Defaulted by-value returns mirror parameter rule 2:
                // the result is a handle to native memory the callee
                // owns.
                ReturnStrategy::RawHandle
            }
        }
        ValueClass::Sequence { .. } => {
            sink.error(
                ErrorCode::E2001,
                origin,
                "type is not supported: a fixed-length sequence cannot be returned by value",
            );
            return Err(Unresolved);
        }
        ValueClass::ScratchAllocator => {
            sink.error(
                ErrorCode::E2001,
                origin,
                "type is not supported: a scratch-allocator slot is not a return type",
            );
            return Err(Unresolved);
        }
    };
    let layout = match strategy {
        ReturnStrategy::RawHandle => resolver.target().address_layout(),
        _ => resolved.layout,
    };
    Ok((strategy, Some(layout)))
}

/// Check the declared scratch-allocator slot against what the return
/// strategy requires.
///
/// Returns the declared index of the slot to exclude from marshalling,
/// if one is accepted. A required slot that is missing or misplaced is
/// a positional-contract violation, reported against the offending
/// position; a declared slot nothing requires is kept out of the call
/// but flagged as a warning.
fn validate_allocator_slot(
    func: &FunctionDesc,
    ret: &ReturnStrategy,
    origin: Origin,
    sink: &mut dyn DiagnosticSink,
    valid: &mut bool,
) -> Option<u32> {
    let first_is_slot = matches!(
        func.params.first().map(|p| &p.ty),
        Some(TypeDesc::ScratchAllocator)
    );

    if matches!(ret, ReturnStrategy::MaterializeByValue { .. }) {
        if first_is_slot {
            return Some(0);
        }
        sink.report(
            Diagnostic::error(ErrorCode::E3001)
                .with_origin(origin.param(0))
                .with_message(
                    "a function returning an aggregate by value must declare a \
                     scratch-allocator slot as its first parameter",
                )
                .with_note("the generated call materializes the result through that slot"),
        );
        *valid = false;
        return None;
    }

    if first_is_slot {
        sink.report(
            Diagnostic::warning(ErrorCode::E3002)
                .with_origin(origin.param(0))
                .with_message("declared scratch-allocator slot is not needed by this signature"),
        );
        return Some(0);
    }
    None
}
