//! Resolver tests: precedence rules, accumulation, and cycle handling.

#![allow(
    clippy::expect_used,
    reason = "test code uses expect for concise assertions"
)]

use pretty_assertions::assert_eq;
use smallvec::SmallVec;

use ffb_diagnostic::{DiagnosticQueue, ErrorCode};
use ffb_ir::{
    AggregateDesc, AggregateKind, FieldDesc, Markers, Module, Name, NameInterner, Origin,
    ScalarKind, TypeDesc,
};
use ffb_layout::Layout;

use super::*;

fn scalar(kind: ScalarKind) -> TypeDesc {
    TypeDesc::Scalar(kind)
}

fn named(target: Name, markers: Markers) -> TypeDesc {
    TypeDesc::Named { target, markers }
}

fn strukt(
    interner: &NameInterner,
    name: &str,
    by_value: bool,
    fields: Vec<(&str, TypeDesc)>,
) -> AggregateDesc {
    let default_markers = if by_value {
        Markers::BY_VALUE
    } else {
        Markers::empty()
    };
    strukt_with_default(interner, name, default_markers, fields)
}

fn strukt_with_default(
    interner: &NameInterner,
    name: &str,
    default_markers: Markers,
    fields: Vec<(&str, TypeDesc)>,
) -> AggregateDesc {
    AggregateDesc {
        name: interner.intern(name),
        kind: AggregateKind::Struct,
        default_markers,
        fields: fields
            .into_iter()
            .map(|(fname, ty)| FieldDesc::new(interner.intern(fname), ty))
            .collect::<SmallVec<_>>(),
    }
}

fn codes(queue: &mut DiagnosticQueue) -> Vec<ErrorCode> {
    queue.flush().into_iter().map(|d| d.code).collect()
}

#[test]
fn scalar_resolves_to_fixed_layout() {
    let module = Module::default();
    let mut queue = DiagnosticQueue::new();
    let resolver = Resolver::build(&module, Target::default(), &mut queue);

    let resolved = resolver
        .resolve_type(&scalar(ScalarKind::I32), Origin::default(), &mut queue)
        .ok();
    let resolved = resolved.expect("scalar always resolves");
    assert_eq!(resolved.layout, Layout::new(4, 4));
    assert_eq!(resolved.class, ValueClass::Scalar(ScalarKind::I32));
    assert!(!queue.has_errors());
}

#[test]
fn str_and_handle_are_pointer_sized() {
    let module = Module::default();
    let mut queue = DiagnosticQueue::new();
    let resolver = Resolver::build(&module, Target::default(), &mut queue);

    for (ty, class) in [
        (TypeDesc::Str, ValueClass::StrPtr),
        (TypeDesc::Handle, ValueClass::RawHandle),
    ] {
        let resolved = resolver
            .resolve_type(&ty, Origin::default(), &mut queue)
            .ok()
            .expect("pointer-like types always resolve");
        assert_eq!(resolved.layout, Layout::new(8, 8));
        assert_eq!(resolved.class, class);
    }
}

#[test]
fn struct_fields_get_padded_offsets() {
    // i8 then i32: offsets 0 and 4, size 8.
    let interner = NameInterner::new();
    let module = Module {
        aggregates: vec![strukt(
            &interner,
            "mixed",
            true,
            vec![("a", scalar(ScalarKind::I8)), ("b", scalar(ScalarKind::I32))],
        )],
        interfaces: vec![],
    };
    let mut queue = DiagnosticQueue::new();
    let resolver = Resolver::build(&module, Target::default(), &mut queue);

    let entry = resolver
        .aggregate_entry(interner.intern("mixed"))
        .expect("resolved");
    assert!(entry.valid);
    assert_eq!(entry.layout.byte_size, 8);
    assert_eq!(entry.layout.byte_align, 4);
    assert_eq!(entry.layout.offset_of(interner.intern("a")), Some(0));
    assert_eq!(entry.layout.offset_of(interner.intern("b")), Some(4));
    assert!(!queue.has_errors());
}

#[test]
fn explicit_by_value_embeds_aggregate_layout() {
    let interner = NameInterner::new();
    let inner = strukt(
        &interner,
        "inner",
        false,
        vec![("x", scalar(ScalarKind::I64))],
    );
    let module = Module {
        aggregates: vec![inner],
        interfaces: vec![],
    };
    let mut queue = DiagnosticQueue::new();
    let resolver = Resolver::build(&module, Target::default(), &mut queue);

    let resolved = resolver
        .resolve_type(
            &named(interner.intern("inner"), Markers::BY_VALUE),
            Origin::default(),
            &mut queue,
        )
        .ok()
        .expect("explicit by-value embed");
    assert_eq!(resolved.layout, Layout::new(8, 8));
    assert_eq!(
        resolved.class,
        ValueClass::ByValueAggregate {
            target: interner.intern("inner"),
            explicit: true
        }
    );
}

#[test]
fn declaration_default_supplies_by_value() {
    let interner = NameInterner::new();
    let module = Module {
        aggregates: vec![strukt(
            &interner,
            "vec2",
            true,
            vec![("x", scalar(ScalarKind::F32)), ("y", scalar(ScalarKind::F32))],
        )],
        interfaces: vec![],
    };
    let mut queue = DiagnosticQueue::new();
    let resolver = Resolver::build(&module, Target::default(), &mut queue);

    // No use-site marker: the declaration default applies, and the
    // resolved class records that the marker was not explicit.
    let resolved = resolver
        .resolve_type(
            &named(interner.intern("vec2"), Markers::empty()),
            Origin::default(),
            &mut queue,
        )
        .ok()
        .expect("default by-value embed");
    assert_eq!(
        resolved.class,
        ValueClass::ByValueAggregate {
            target: interner.intern("vec2"),
            explicit: false
        }
    );
}

#[test]
fn declaration_default_supplies_by_address() {
    let interner = NameInterner::new();
    let module = Module {
        aggregates: vec![strukt_with_default(
            &interner,
            "opaque",
            Markers::ADDRESS,
            vec![("fd", scalar(ScalarKind::I32))],
        )],
        interfaces: vec![],
    };
    let mut queue = DiagnosticQueue::new();
    let resolver = Resolver::build(&module, Target::default(), &mut queue);

    // A bare use of an address-default declaration resolves exactly
    // like a use-site address marker would.
    let resolved = resolver
        .resolve_type(
            &named(interner.intern("opaque"), Markers::empty()),
            Origin::default(),
            &mut queue,
        )
        .ok()
        .expect("default address resolves");
    assert_eq!(resolved.layout, Layout::new(8, 8));
    assert_eq!(
        resolved.class,
        ValueClass::Address {
            of: Some(interner.intern("opaque"))
        }
    );
    assert!(!queue.has_errors());
}

#[test]
fn ambiguous_declaration_default_never_picks_one() {
    let interner = NameInterner::new();
    let module = Module {
        aggregates: vec![strukt_with_default(
            &interner,
            "torn",
            Markers::BY_VALUE | Markers::ADDRESS,
            vec![("v", scalar(ScalarKind::I32))],
        )],
        interfaces: vec![],
    };
    let mut queue = DiagnosticQueue::new();
    let resolver = Resolver::build(&module, Target::default(), &mut queue);

    let result = resolver.resolve_type(
        &named(interner.intern("torn"), Markers::empty()),
        Origin::default(),
        &mut queue,
    );
    assert_eq!(result, Err(Unresolved));
    assert_eq!(codes(&mut queue), vec![ErrorCode::E2002]);
}

#[test]
fn address_marker_is_pointer_with_tag() {
    let interner = NameInterner::new();
    let module = Module {
        aggregates: vec![strukt(
            &interner,
            "node",
            true,
            vec![("v", scalar(ScalarKind::I32))],
        )],
        interfaces: vec![],
    };
    let mut queue = DiagnosticQueue::new();
    let resolver = Resolver::build(&module, Target::default(), &mut queue);

    let resolved = resolver
        .resolve_type(
            &named(interner.intern("node"), Markers::ADDRESS),
            Origin::default(),
            &mut queue,
        )
        .ok()
        .expect("address resolves");
    assert_eq!(resolved.layout, Layout::new(8, 8));
    assert_eq!(
        resolved.class,
        ValueClass::Address {
            of: Some(interner.intern("node"))
        }
    );
}

#[test]
fn both_markers_are_ambiguous_never_picked() {
    let interner = NameInterner::new();
    let module = Module {
        aggregates: vec![strukt(
            &interner,
            "amb",
            true,
            vec![("v", scalar(ScalarKind::I32))],
        )],
        interfaces: vec![],
    };
    let mut queue = DiagnosticQueue::new();
    let resolver = Resolver::build(&module, Target::default(), &mut queue);

    let result = resolver.resolve_type(
        &named(interner.intern("amb"), Markers::BY_VALUE | Markers::ADDRESS),
        Origin::default(),
        &mut queue,
    );
    assert_eq!(result, Err(Unresolved));
    assert_eq!(codes(&mut queue), vec![ErrorCode::E2002]);
}

#[test]
fn unknown_aggregate_reference() {
    let interner = NameInterner::new();
    let module = Module::default();
    let mut queue = DiagnosticQueue::new();
    let resolver = Resolver::build(&module, Target::default(), &mut queue);

    let result = resolver.resolve_type(
        &named(interner.intern("ghost"), Markers::BY_VALUE),
        Origin::default(),
        &mut queue,
    );
    assert_eq!(result, Err(Unresolved));
    assert_eq!(codes(&mut queue), vec![ErrorCode::E2004]);
}

#[test]
fn unmarked_non_value_aggregate_is_unsupported() {
    let interner = NameInterner::new();
    let module = Module {
        aggregates: vec![strukt(
            &interner,
            "plain",
            false,
            vec![("v", scalar(ScalarKind::I32))],
        )],
        interfaces: vec![],
    };
    let mut queue = DiagnosticQueue::new();
    let resolver = Resolver::build(&module, Target::default(), &mut queue);

    let result = resolver.resolve_type(
        &named(interner.intern("plain"), Markers::empty()),
        Origin::default(),
        &mut queue,
    );
    assert_eq!(result, Err(Unresolved));
    assert_eq!(codes(&mut queue), vec![ErrorCode::E2001]);
}

#[test]
fn self_cycle_is_rejected_before_layout() {
    // An aggregate containing itself by value.
    let interner = NameInterner::new();
    let a = interner.intern("a");
    let module = Module {
        aggregates: vec![strukt(
            &interner,
            "a",
            true,
            vec![("inner", named(a, Markers::BY_VALUE))],
        )],
        interfaces: vec![],
    };
    let mut queue = DiagnosticQueue::new();
    let resolver = Resolver::build(&module, Target::default(), &mut queue);

    assert!(resolver.aggregate_entry(a).is_none());
    assert_eq!(codes(&mut queue), vec![ErrorCode::E2003]);
}

#[test]
fn mutual_cycle_reported_once_and_both_excluded() {
    let interner = NameInterner::new();
    let a = interner.intern("a");
    let b = interner.intern("b");
    let module = Module {
        aggregates: vec![
            strukt(&interner, "a", true, vec![("b", named(b, Markers::BY_VALUE))]),
            strukt(&interner, "b", true, vec![("a", named(a, Markers::BY_VALUE))]),
        ],
        interfaces: vec![],
    };
    let mut queue = DiagnosticQueue::new();
    let resolver = Resolver::build(&module, Target::default(), &mut queue);

    assert!(resolver.aggregate_entry(a).is_none());
    assert!(resolver.aggregate_entry(b).is_none());
    let cycle_reports = queue
        .iter()
        .filter(|d| d.code == ErrorCode::E2003)
        .count();
    assert_eq!(cycle_reports, 1);
}

#[test]
fn address_of_cyclic_shape_is_fine() {
    // A linked-list node holding itself by address is legal.
    let interner = NameInterner::new();
    let node = interner.intern("node");
    let module = Module {
        aggregates: vec![strukt(
            &interner,
            "node",
            true,
            vec![
                ("value", scalar(ScalarKind::I64)),
                ("next", named(node, Markers::ADDRESS)),
            ],
        )],
        interfaces: vec![],
    };
    let mut queue = DiagnosticQueue::new();
    let resolver = Resolver::build(&module, Target::default(), &mut queue);

    let entry = resolver.aggregate_entry(node).expect("resolved");
    assert!(entry.valid);
    assert_eq!(entry.layout.byte_size, 16);
    assert!(!queue.has_errors());
}

#[test]
fn absurd_repeat_count_is_rejected_not_wrapped() {
    // A count whose total byte size exceeds u64 must fail like the
    // zero-count case, never wrap to a small bogus layout.
    let interner = NameInterner::new();
    let module = Module::default();
    let mut queue = DiagnosticQueue::new();
    let resolver = Resolver::build(&module, Target::default(), &mut queue);

    let result = resolver.resolve_type(
        &TypeDesc::Sequence {
            elem: ScalarKind::I64,
            count: u64::MAX / 2,
        },
        Origin::decl(interner.intern("huge")),
        &mut queue,
    );
    assert_eq!(result, Err(Unresolved));
    assert_eq!(codes(&mut queue), vec![ErrorCode::E1003]);
}

#[test]
fn bad_field_does_not_suppress_siblings() {
    let interner = NameInterner::new();
    let module = Module {
        aggregates: vec![strukt(
            &interner,
            "partial",
            true,
            vec![
                ("ok_a", scalar(ScalarKind::I32)),
                ("bad", named(interner.intern("ghost"), Markers::BY_VALUE)),
                (
                    "bad_seq",
                    TypeDesc::Sequence {
                        elem: ScalarKind::I8,
                        count: 0,
                    },
                ),
                ("ok_b", scalar(ScalarKind::I64)),
            ],
        )],
        interfaces: vec![],
    };
    let mut queue = DiagnosticQueue::new();
    let resolver = Resolver::build(&module, Target::default(), &mut queue);

    // Both bad fields reported: accumulation, not fail-fast.
    assert_eq!(codes(&mut queue), vec![ErrorCode::E2004, ErrorCode::E1003]);

    // The entry exists but is invalid; surviving fields keep offsets.
    let entry = resolver
        .aggregate_entry(interner.intern("partial"))
        .expect("entry exists");
    assert!(!entry.valid);
    assert_eq!(entry.layout.offset_of(interner.intern("ok_a")), Some(0));
    assert_eq!(entry.layout.offset_of(interner.intern("ok_b")), Some(8));
}

#[test]
fn duplicate_field_name_is_definition_error() {
    let interner = NameInterner::new();
    let module = Module {
        aggregates: vec![strukt(
            &interner,
            "dup",
            true,
            vec![("x", scalar(ScalarKind::I32)), ("x", scalar(ScalarKind::I64))],
        )],
        interfaces: vec![],
    };
    let mut queue = DiagnosticQueue::new();
    let resolver = Resolver::build(&module, Target::default(), &mut queue);

    assert_eq!(codes(&mut queue), vec![ErrorCode::E1002]);
    let entry = resolver
        .aggregate_entry(interner.intern("dup"))
        .expect("entry exists");
    assert!(!entry.valid);
}

#[test]
fn union_members_all_at_zero() {
    let interner = NameInterner::new();
    let module = Module {
        aggregates: vec![AggregateDesc {
            name: interner.intern("variant"),
            kind: AggregateKind::Union,
            default_markers: Markers::BY_VALUE,
            fields: vec![
                FieldDesc::new(interner.intern("i"), scalar(ScalarKind::I32)),
                FieldDesc::new(interner.intern("d"), scalar(ScalarKind::F64)),
                FieldDesc::new(
                    interner.intern("bytes"),
                    TypeDesc::Sequence {
                        elem: ScalarKind::U8,
                        count: 13,
                    },
                ),
            ]
            .into_iter()
            .collect::<SmallVec<_>>(),
        }],
        interfaces: vec![],
    };
    let mut queue = DiagnosticQueue::new();
    let resolver = Resolver::build(&module, Target::default(), &mut queue);

    let entry = resolver
        .aggregate_entry(interner.intern("variant"))
        .expect("resolved");
    assert_eq!(entry.layout.offset_of(interner.intern("i")), Some(0));
    assert_eq!(entry.layout.offset_of(interner.intern("d")), Some(0));
    assert_eq!(entry.layout.offset_of(interner.intern("bytes")), Some(0));
    // max size 13 rounded up to max align 8.
    assert_eq!(entry.layout.byte_size, 16);
    assert_eq!(entry.layout.byte_align, 8);
}

#[test]
fn nested_by_value_struct_resolves_in_dependency_order() {
    // `outer` is declared before `inner` in the module; the registry
    // still resolves `inner` first.
    let interner = NameInterner::new();
    let inner_name = interner.intern("inner");
    let module = Module {
        aggregates: vec![
            strukt(
                &interner,
                "outer",
                true,
                vec![
                    ("head", scalar(ScalarKind::I8)),
                    ("body", named(inner_name, Markers::BY_VALUE)),
                ],
            ),
            strukt(
                &interner,
                "inner",
                true,
                vec![("x", scalar(ScalarKind::I32)), ("y", scalar(ScalarKind::I32))],
            ),
        ],
        interfaces: vec![],
    };
    let mut queue = DiagnosticQueue::new();
    let resolver = Resolver::build(&module, Target::default(), &mut queue);

    let outer = resolver
        .aggregate_entry(interner.intern("outer"))
        .expect("resolved");
    assert!(outer.valid);
    // inner is 8 bytes, align 4; placed at offset 4 after the i8.
    assert_eq!(outer.layout.offset_of(interner.intern("body")), Some(4));
    assert_eq!(outer.layout.byte_size, 12);
    assert!(!queue.has_errors());
}
