//! Manifest loading: the JSON description of a native surface.
//!
//! The manifest is the serialized form of the description graph; the
//! generator core never sees it. Lowering interns every string into a
//! [`Name`] and checks the structural kind of each declaration, so a
//! struct carrying functions or an interface carrying fields is
//! reported instead of silently dropped.

use serde::{Deserialize, Serialize};

use ffb_diagnostic::{Diagnostic, DiagnosticSink, ErrorCode};
use ffb_ir::{
    AggregateDesc, AggregateKind, FieldDesc, FunctionDesc, InterfaceDesc, LibraryRef, Markers,
    Module, Name, NameInterner, Origin, ParamDesc, ScalarKind, TypeDesc,
};

/// Top-level manifest document.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Manifest {
    pub declarations: Vec<Declaration>,
}

/// One declared item, kind-tagged.
///
/// `fields` and `functions` are both optional at the serde level; the
/// kind check during lowering enforces which one a declaration may
/// carry.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Declaration {
    pub kind: String,
    pub name: String,
    /// Default marker the declaration itself carries (aggregates
    /// only); a use-site marker always wins over these.
    #[serde(default)]
    pub by_value: bool,
    #[serde(default)]
    pub by_address: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library: Option<LibraryDoc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub functions: Option<Vec<FunctionRef>>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LibraryDoc {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FieldRef {
    pub name: String,
    /// Accessor-name override for generated symbols only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rename: Option<String>,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FunctionRef {
    pub name: String,
    /// Native symbol override; defaults to the declared name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default)]
    pub params: Vec<ParamRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ret: Option<TypeRef>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ParamRef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

/// Serialized form of a semantic type.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "snake_case")]
pub enum TypeRef {
    Scalar(ScalarRef),
    Named {
        target: String,
        #[serde(default)]
        by_value: bool,
        #[serde(default)]
        by_address: bool,
    },
    Str,
    Handle,
    Sequence {
        elem: ScalarRef,
        count: u64,
    },
    ScratchAllocator,
}

#[derive(Serialize, Deserialize, Copy, Clone, Eq, PartialEq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum ScalarRef {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
}

impl From<ScalarRef> for ScalarKind {
    fn from(value: ScalarRef) -> Self {
        match value {
            ScalarRef::I8 => ScalarKind::I8,
            ScalarRef::U8 => ScalarKind::U8,
            ScalarRef::I16 => ScalarKind::I16,
            ScalarRef::U16 => ScalarKind::U16,
            ScalarRef::I32 => ScalarKind::I32,
            ScalarRef::U32 => ScalarKind::U32,
            ScalarRef::I64 => ScalarKind::I64,
            ScalarRef::U64 => ScalarKind::U64,
            ScalarRef::F32 => ScalarKind::F32,
            ScalarRef::F64 => ScalarKind::F64,
        }
    }
}

/// Parse a manifest from JSON text.
pub fn parse_manifest(text: &str) -> Result<Manifest, serde_json::Error> {
    serde_json::from_str(text)
}

/// Lower a manifest into the interned description graph.
///
/// Declarations of the wrong structural kind are reported and skipped;
/// every other declaration lowers, so one bad item never hides the
/// rest of the manifest.
pub fn lower(
    manifest: &Manifest,
    interner: &NameInterner,
    sink: &mut dyn DiagnosticSink,
) -> Module {
    let mut module = Module::default();

    for decl in &manifest.declarations {
        let name = interner.intern(&decl.name);
        match decl.kind.as_str() {
            "struct" => {
                if let Some(agg) = lower_aggregate(decl, name, AggregateKind::Struct, interner, sink)
                {
                    module.aggregates.push(agg);
                }
            }
            "union" => {
                if let Some(agg) = lower_aggregate(decl, name, AggregateKind::Union, interner, sink)
                {
                    module.aggregates.push(agg);
                }
            }
            "interface" => {
                if let Some(iface) = lower_interface(decl, name, interner, sink) {
                    module.interfaces.push(iface);
                }
            }
            other => {
                sink.report(
                    Diagnostic::error(ErrorCode::E1001)
                        .with_origin(Origin::decl(name))
                        .with_message(format!("unknown declaration kind `{other}`"))
                        .with_note("expected `struct`, `union`, or `interface`"),
                );
            }
        }
    }

    module
}

fn lower_aggregate(
    decl: &Declaration,
    name: Name,
    kind: AggregateKind,
    interner: &NameInterner,
    sink: &mut dyn DiagnosticSink,
) -> Option<AggregateDesc> {
    if decl.functions.is_some() {
        sink.error(
            ErrorCode::E1001,
            Origin::decl(name),
            "an aggregate declaration cannot carry functions",
        );
        return None;
    }
    let fields = decl
        .fields
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|field| FieldDesc {
            name: interner.intern(&field.name),
            rename: field.rename.as_deref().map(|r| interner.intern(r)),
            ty: lower_type(&field.ty, interner),
        })
        .collect();

    Some(AggregateDesc {
        name,
        kind,
        default_markers: markers_from(decl.by_value, decl.by_address),
        fields,
    })
}

fn lower_interface(
    decl: &Declaration,
    name: Name,
    interner: &NameInterner,
    sink: &mut dyn DiagnosticSink,
) -> Option<InterfaceDesc> {
    if decl.fields.is_some() {
        sink.error(
            ErrorCode::E1001,
            Origin::decl(name),
            "an interface declaration cannot carry fields",
        );
        return None;
    }
    let functions = decl
        .functions
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|func| FunctionDesc {
            name: interner.intern(&func.name),
            symbol: func.symbol.as_deref().map(|s| interner.intern(s)),
            params: func
                .params
                .iter()
                .map(|param| ParamDesc {
                    name: interner.intern(&param.name),
                    ty: lower_type(&param.ty, interner),
                })
                .collect(),
            ret: func.ret.as_ref().map(|ty| lower_type(ty, interner)),
        })
        .collect();

    Some(InterfaceDesc {
        name,
        library: decl.library.as_ref().map(|lib| LibraryRef {
            name: interner.intern(&lib.name),
            version: lib.version.as_deref().map(|v| interner.intern(v)),
        }),
        functions,
    })
}

fn markers_from(by_value: bool, by_address: bool) -> Markers {
    let mut markers = Markers::empty();
    if by_value {
        markers |= Markers::BY_VALUE;
    }
    if by_address {
        markers |= Markers::ADDRESS;
    }
    markers
}

fn lower_type(ty: &TypeRef, interner: &NameInterner) -> TypeDesc {
    match ty {
        TypeRef::Scalar(kind) => TypeDesc::Scalar((*kind).into()),
        TypeRef::Named {
            target,
            by_value,
            by_address,
        } => TypeDesc::Named {
            target: interner.intern(target),
            markers: markers_from(*by_value, *by_address),
        },
        TypeRef::Str => TypeDesc::Str,
        TypeRef::Handle => TypeDesc::Handle,
        TypeRef::Sequence { elem, count } => TypeDesc::Sequence {
            elem: (*elem).into(),
            count: *count,
        },
        TypeRef::ScratchAllocator => TypeDesc::ScratchAllocator,
    }
}
