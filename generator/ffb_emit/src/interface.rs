//! Interface artifact emission: symbol binding plus call thunks.

use ffb_ir::{NameInterner, ScalarKind};
use ffb_plan::{CallBindingPlan, InterfacePlan, MarshalStrategy, PlannedParam, ReturnStrategy};
use tracing::debug;

use crate::source::SourceWriter;
use crate::{Artifact, ArtifactKind};

/// Serialize one interface plan into its generated module.
///
/// The module binds every symbol once through a host-supplied
/// [`SymbolSource`], stores the table in a `OnceLock`, and exposes one
/// thunk per planned function. Thunks that failed to plan are omitted
/// with a note; their diagnostics were already reported.
///
/// [`SymbolSource`]: ffb_rt::SymbolSource
pub fn emit_interface(plan: &InterfacePlan, interner: &NameInterner) -> Artifact {
    let name = interner.resolve(plan.name);
    debug!(name = %name, "emitting interface artifact");

    let mut w = SourceWriter::new();
    w.line("// Generated by ffbgen; do not edit.");
    if !plan.valid {
        w.line("// Generation reported errors for this declaration; only the");
        w.line("// functions that planned are covered.");
    }
    w.blank();
    w.open(&format!("pub mod {name}"));
    w.line("use std::sync::OnceLock;");
    w.blank();
    w.line(&format!("use ffb_rt::{{{}}};", imports(plan)));
    w.blank();
    w.line("static BINDINGS: OnceLock<BindingTable> = OnceLock::new();");
    w.blank();

    let symbols: Vec<String> = plan
        .calls
        .iter()
        .filter(|call| call.valid)
        .map(|call| format!("\"{}\"", interner.resolve(call.symbol)))
        .collect();
    w.line(&format!("const SYMBOLS: &[&str] = &[{}];", symbols.join(", ")));
    w.blank();

    w.line("/// Resolve every symbol once, before the first call.");
    w.line("/// Rebinding is a no-op; the first table wins.");
    w.open("pub fn bind(source: &dyn SymbolSource) -> Result<(), RtError>");
    let namespace = match &plan.library {
        Some(library) => {
            let lib_name = interner.resolve(library.name);
            match library.version {
                Some(version) => {
                    format!("Some((\"{lib_name}\", Some(\"{}\")))", interner.resolve(version))
                }
                None => format!("Some((\"{lib_name}\", None))"),
            }
        }
        None => "None".to_owned(),
    };
    w.line(&format!(
        "let table = BindingTable::bind({namespace}, SYMBOLS, source)?;"
    ));
    w.line("let _ = BINDINGS.set(table);");
    w.line("Ok(())");
    w.close();

    for call in &plan.calls {
        if call.valid {
            emit_thunk(&mut w, call, interner);
        } else {
            w.blank();
            w.line(&format!(
                "// fn {} omitted: generation reported errors.",
                interner.resolve(call.name)
            ));
        }
    }

    w.close();

    Artifact {
        name,
        kind: ArtifactKind::Interface,
        valid: plan.valid,
        text: w.finish(),
    }
}

/// The `ffb_rt` names the module's thunks collectively need.
fn imports(plan: &InterfacePlan) -> String {
    let mut names = vec![
        "translate_fault",
        "unexpected_return",
        "BindingTable",
        "CallValue",
        "NativeInvoker",
        "RtError",
        "SymbolSource",
    ];
    let valid = || plan.calls.iter().filter(|call| call.valid);
    if valid().any(|call| call.params.iter().any(|p| p.strategy.uses_scratch())) {
        names.push("Scratch");
    }
    if valid().any(|call| matches!(call.ret, ReturnStrategy::MaterializeByValue { .. })) {
        names.push("Layout");
        names.push("Segment");
        names.push("SegmentAllocator");
    }
    names.sort_unstable();
    names.join(", ")
}

fn emit_thunk(w: &mut SourceWriter, call: &CallBindingPlan, interner: &NameInterner) {
    let name = interner.resolve(call.name);
    let symbol = interner.resolve(call.symbol);
    let materialize = matches!(call.ret, ReturnStrategy::MaterializeByValue { .. });
    let scratch_args = call.params.iter().any(|p| p.strategy.uses_scratch());

    let mut signature = vec!["invoker: &dyn NativeInvoker".to_owned()];
    if materialize {
        signature.push("allocator: &mut dyn SegmentAllocator".to_owned());
    }
    for param in &call.params {
        let param_name = interner.resolve(param.name);
        signature.push(format!("{param_name}: {}", param_type(param)));
    }

    w.blank();
    w.open(&format!(
        "pub fn {name}({}) -> Result<{}, RtError>",
        signature.join(", "),
        return_type(&call.ret)
    ));

    w.line(&format!(
        "let table = BINDINGS.get().ok_or_else(|| RtError::NotBound {{ symbol: \"{symbol}\".to_owned() }})?;"
    ));
    w.line(&format!("let addr = table.address(\"{symbol}\")?;"));

    // Scratch is scoped to exactly this activation; dropping it on any
    // exit path releases every marshal copy.
    if scratch_args {
        w.line("let mut scratch = Scratch::new();");
    }
    for param in &call.params {
        let param_name = interner.resolve(param.name);
        match param.strategy {
            MarshalStrategy::ScratchStr => {
                w.line(&format!(
                    "let arg_{param_name} = scratch.alloc_str({param_name});"
                ));
            }
            MarshalStrategy::ScratchCopy => {
                w.line(&format!(
                    "let arg_{param_name} = scratch.alloc_copy({param_name});"
                ));
            }
            _ => {}
        }
    }
    if let ReturnStrategy::MaterializeByValue { .. } = call.ret {
        // The result layout is the first value layout of the plan.
        let layout = call.value_layouts[0];
        w.line(&format!(
            "let mut out = allocator.allocate(Layout::new({}, {}));",
            layout.byte_size, layout.byte_align
        ));
        w.line(&format!(
            "let out_addr = out.span_mut(0, {})?.as_mut_ptr() as usize;",
            layout.byte_size
        ));
    }

    let mut args: Vec<String> = Vec::with_capacity(call.params.len() + 1);
    if materialize {
        args.push("CallValue::Address(out_addr)".to_owned());
    }
    for param in &call.params {
        args.push(arg_value(param, interner));
    }
    if args.is_empty() {
        w.line("let args: [CallValue; 0] = [];");
    } else {
        w.line(&format!("let args = [{}];", args.join(", ")));
    }

    w.line("let ret = invoker");
    w.line("    .invoke(addr, &args)");
    w.line(&format!(
        "    .map_err(|fault| translate_fault(\"{symbol}\", fault))?;"
    ));

    w.open("match ret");
    match call.ret {
        ReturnStrategy::Void => w.line("CallValue::Void => Ok(()),"),
        ReturnStrategy::Direct(kind) => {
            let (variant, narrow) = narrow_return(kind);
            w.line(&format!("CallValue::{variant}(value) => Ok({narrow}),"));
        }
        ReturnStrategy::RawHandle => w.line("CallValue::Address(value) => Ok(value),"),
        ReturnStrategy::MaterializeByValue { .. } => w.line("CallValue::Void => Ok(out),"),
    }
    w.line(&format!(
        "other => Err(unexpected_return(\"{symbol}\", &other)),"
    ));
    w.close();

    w.close();
}

/// The Rust surface type a planned parameter takes.
fn param_type(param: &PlannedParam) -> &'static str {
    match param.strategy {
        MarshalStrategy::RawHandle => "usize",
        MarshalStrategy::BorrowedSegment | MarshalStrategy::ScratchCopy => "&Segment",
        MarshalStrategy::ScratchStr => "&str",
        MarshalStrategy::Direct(kind) => kind.rust_name(),
    }
}

fn return_type(ret: &ReturnStrategy) -> &'static str {
    match ret {
        ReturnStrategy::Void => "()",
        ReturnStrategy::Direct(kind) => kind.rust_name(),
        ReturnStrategy::RawHandle => "usize",
        ReturnStrategy::MaterializeByValue { .. } => "Segment",
    }
}

/// The `CallValue` expression marshalling one argument.
fn arg_value(param: &PlannedParam, interner: &NameInterner) -> String {
    let name = interner.resolve(param.name);
    match param.strategy {
        MarshalStrategy::RawHandle => format!("CallValue::Address({name})"),
        MarshalStrategy::BorrowedSegment => {
            format!("CallValue::Address({name}.as_bytes().as_ptr() as usize)")
        }
        MarshalStrategy::ScratchStr | MarshalStrategy::ScratchCopy => {
            format!("CallValue::Address(arg_{name}.as_bytes().as_ptr() as usize)")
        }
        MarshalStrategy::Direct(kind) => widen_arg(kind, &name),
    }
}

/// Widen a scalar argument into its boundary `CallValue`.
fn widen_arg(kind: ScalarKind, name: &str) -> String {
    match kind {
        ScalarKind::I64 => format!("CallValue::Int({name})"),
        ScalarKind::U64 => format!("CallValue::Int({name} as i64)"),
        ScalarKind::I8
        | ScalarKind::U8
        | ScalarKind::I16
        | ScalarKind::U16
        | ScalarKind::I32
        | ScalarKind::U32 => format!("CallValue::Int(i64::from({name}))"),
        ScalarKind::F64 => format!("CallValue::Float({name})"),
        ScalarKind::F32 => format!("CallValue::Float(f64::from({name}))"),
    }
}

/// Match arm pieces narrowing a boundary return to its scalar kind.
fn narrow_return(kind: ScalarKind) -> (&'static str, String) {
    match kind {
        ScalarKind::I64 => ("Int", "value".to_owned()),
        ScalarKind::F64 => ("Float", "value".to_owned()),
        ScalarKind::F32 => ("Float", "value as f32".to_owned()),
        ScalarKind::I8
        | ScalarKind::U8
        | ScalarKind::I16
        | ScalarKind::U16
        | ScalarKind::I32
        | ScalarKind::U32
        | ScalarKind::U64 => ("Int", format!("value as {}", kind.rust_name())),
    }
}
