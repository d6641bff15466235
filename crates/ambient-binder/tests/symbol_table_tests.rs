//! Symbol table tests: host runtime globals, reference resolution, idempotence,
//! and concurrent reads.

use ambient_binder::embedded_libs::LIB_STDLIB;
use ambient_binder::symbol_table::build;
use ambient_binder::{
    DeclarationRecord, DeclarationRegistry, Fragment, FunctionTypeRef, MergeOptions,
    ParameterRecord, SymbolTable, TypeRef, merge_all,
};
use ambient_common::{DeclKey, DiagnosticKind, Scope};
use ambient_types::Type;
use rayon::prelude::*;
use std::sync::Arc;

fn stdlib_registry() -> DeclarationRegistry {
    let mut registry = DeclarationRegistry::new();
    registry.register_fragment(&LIB_STDLIB.fragment().unwrap());
    registry
}

fn table_of(fragments: &[Fragment], options: &MergeOptions) -> SymbolTable {
    let mut registry = DeclarationRegistry::new();
    for fragment in fragments {
        registry.register_fragment(fragment);
    }
    SymbolTable::from_registry(&registry, options)
}

fn param(name: &str, ty: &str) -> ParameterRecord {
    ParameterRecord::new(name, Some(TypeRef::name(ty)))
}

fn scoped_member(
    module: &str,
    interface: &str,
    member: &str,
    parameters: Vec<ParameterRecord>,
    return_type: Option<&str>,
) -> DeclarationRecord {
    DeclarationRecord::InterfaceMember {
        interface_name: interface.into(),
        member_name: member.into(),
        parameters,
        return_type_ref: return_type.map(TypeRef::name),
        module: Some(module.into()),
    }
}

// =============================================================================
// Host runtime globals
// =============================================================================

#[test]
fn stub_module_is_found_with_no_members() {
    let table = SymbolTable::from_registry(&stdlib_registry(), &MergeOptions::default());

    let javascript = table.lookup_module("javascript").unwrap();
    assert_eq!(javascript.name, "javascript");
    assert!(javascript.is_opaque());
    assert_eq!(javascript.members().count(), 0);

    let stub = table.get(&DeclKey::module_self("javascript")).unwrap();
    assert!(stub.is_module_stub());
    assert!(table.lookup_global("javascript").is_none());
}

#[test]
fn json_has_exactly_stringify_and_parse() {
    let table = SymbolTable::from_registry(&stdlib_registry(), &MergeOptions::default());
    let json = table.lookup_global("JSON").unwrap();

    let names: Vec<&str> = json.members().iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["stringify", "parse"]);

    let stringify = json.member("stringify").unwrap().signature();
    assert_eq!(stringify.parameters.len(), 2);
    assert_eq!(stringify.parameters[0].ty, Type::Any);
    assert!(!stringify.parameters[0].optional);
    assert!(stringify.parameters[1].optional);
    assert!(stringify.parameters[1].ty.is_function());
    assert_eq!(stringify.return_type, Type::Any);

    let parse = json.member("parse").unwrap().signature();
    assert_eq!(parse.parameters.len(), 1);
    assert_eq!(parse.parameters[0].ty, Type::String);
    assert!(!parse.parameters[0].optional);
    assert_eq!(parse.return_type, Type::Any);
}

#[test]
fn console_log_is_variadic_and_returns_void() {
    let table = SymbolTable::from_registry(&stdlib_registry(), &MergeOptions::default());
    let log = table.lookup_global("console").unwrap().member("log").unwrap();

    assert!(!log.is_overloaded());
    let signature = log.signature();
    assert_eq!(signature.parameters.len(), 1);
    assert!(signature.parameters[0].variadic);
    assert_eq!(signature.parameters[0].ty, Type::Any);
    assert_eq!(signature.return_type, Type::Void);
    assert_eq!(signature.to_string(), "(...objects: any[]) => void");
}

#[test]
fn stdlib_builds_without_diagnostics() {
    let table = SymbolTable::from_registry(&stdlib_registry(), &MergeOptions::default());
    assert!(table.diagnostics().is_empty());
    assert_eq!(table.len(), 3);
    assert_eq!(table.globals().count(), 2);
    assert_eq!(table.modules().len(), 1);
}

// =============================================================================
// Idempotence
// =============================================================================

#[test]
fn building_twice_is_byte_identical() {
    let registry = stdlib_registry();

    let (merged, diagnostics) = merge_all(&registry);
    let first = build(merged, diagnostics);
    let (merged, diagnostics) = merge_all(&registry);
    let second = build(merged, diagnostics);

    assert_eq!(first, second);
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}

#[test]
fn building_with_diagnostics_twice_is_byte_identical() {
    let fragment = Fragment::new(
        "lib.d.ts",
        vec![
            DeclarationRecord::member("Foo", "bar", vec![param("x", "string")], None),
            DeclarationRecord::member("Foo", "bar", vec![param("x", "Missing")], None),
        ],
    );
    let options = MergeOptions::without_libs();
    let first = table_of(std::slice::from_ref(&fragment), &options);
    let second = table_of(&[fragment], &options);
    assert_eq!(first.diagnostics().len(), 2);
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}

// =============================================================================
// Reference resolution
// =============================================================================

#[test]
fn unknown_type_falls_back_to_any_with_a_diagnostic() {
    let table = table_of(
        &[Fragment::new(
            "walker.d.ts",
            vec![DeclarationRecord::member("Walker", "visit", vec![param("node", "Node")], None)],
        )],
        &MergeOptions::without_libs(),
    );

    let visit = table.lookup_global("Walker").unwrap().member("visit").unwrap();
    assert_eq!(visit.signature().parameters[0].ty, Type::Any);

    assert!(table.has_errors());
    let diagnostics = table.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].kind, DiagnosticKind::UnknownType);
    assert_eq!(diagnostics[0].site.file, "walker.d.ts");
    assert_eq!(
        diagnostics[0].message_text,
        "Cannot find type 'Node' referenced by 'Walker.visit'. Treating it as 'any'."
    );
}

#[test]
fn repeated_unknown_reference_in_one_signature_is_reported_once() {
    let table = table_of(
        &[Fragment::new(
            "walker.d.ts",
            vec![DeclarationRecord::member(
                "Walker",
                "visit",
                vec![param("node", "Node")],
                Some(TypeRef::name("Node")),
            )],
        )],
        &MergeOptions::without_libs(),
    );
    assert_eq!(table.diagnostics().len(), 1);
    let signature = table.lookup_global("Walker").unwrap().members()[0].signature();
    assert_eq!(signature.return_type, Type::Any);
}

#[test]
fn known_reference_resolves_to_its_declaration() {
    let table = table_of(
        &[Fragment::new(
            "walker.d.ts",
            vec![
                DeclarationRecord::member("Walker", "visit", vec![param("node", "Node")], None),
                DeclarationRecord::member("Node", "kind", vec![], Some(TypeRef::name("string"))),
            ],
        )],
        &MergeOptions::without_libs(),
    );
    assert!(table.diagnostics().is_empty());

    let visit = table.lookup_global("Walker").unwrap().member("visit").unwrap();
    let node_type = &visit.signature().parameters[0].ty;
    assert_eq!(node_type, &Type::Declared(DeclKey::global("Node")));
    let node = table.declaration_of(node_type).unwrap();
    assert_eq!(node.member("kind").unwrap().signature().return_type, Type::String);
}

#[test]
fn references_inside_callback_types_are_resolved() {
    let callback = TypeRef::Function(FunctionTypeRef {
        parameters: vec![param("node", "Node")],
        return_type_ref: Some(Box::new(TypeRef::name("void"))),
    });
    let table = table_of(
        &[Fragment::new(
            "walker.d.ts",
            vec![DeclarationRecord::member(
                "Walker",
                "each",
                vec![ParameterRecord::new("callback", Some(callback))],
                None,
            )],
        )],
        &MergeOptions::without_libs(),
    );

    assert_eq!(table.diagnostics().len(), 1);
    let each = table.lookup_global("Walker").unwrap().member("each").unwrap();
    let callback = each.signature().parameters[0].ty.as_signature().unwrap();
    assert_eq!(callback.parameters[0].ty, Type::Any);
    assert_eq!(callback.return_type, Type::Void);
}

#[test]
fn own_module_scope_is_searched_before_global() {
    let table = table_of(
        &[
            Fragment::new(
                "globals.d.ts",
                vec![DeclarationRecord::member("Stats", "size", vec![], None)],
            ),
            Fragment::new(
                "fs.d.ts",
                vec![
                    DeclarationRecord::module_stub("fs"),
                    scoped_member("fs", "Stats", "isFile", vec![], None),
                    scoped_member("fs", "Fs", "stat", vec![param("path", "string")], Some("Stats")),
                ],
            ),
        ],
        &MergeOptions::without_libs(),
    );

    let fs = table.lookup_module("fs").unwrap();
    assert!(!fs.is_opaque());
    let names: Vec<&str> = fs.declarations.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["Stats", "Fs"]);

    let stat = fs.declaration("Fs").unwrap().member("stat").unwrap();
    assert_eq!(
        stat.signature().return_type,
        Type::Declared(DeclKey::new(Scope::module("fs"), "Stats"))
    );
}

#[test]
fn module_scope_falls_back_to_global() {
    let table = table_of(
        &[
            Fragment::new(
                "lib.d.ts",
                vec![DeclarationRecord::member("Buffer", "length", vec![], None)],
            ),
            Fragment::new(
                "fs.d.ts",
                vec![scoped_member("fs", "Fs", "read", vec![], Some("Buffer"))],
            ),
        ],
        &MergeOptions::without_libs(),
    );
    let read = table.lookup(&Scope::module("fs"), "Fs").unwrap().member("read").unwrap();
    assert_eq!(read.signature().return_type, Type::Declared(DeclKey::global("Buffer")));
}

#[test]
fn cross_module_fallback_follows_the_option() {
    let fragments = [Fragment::new(
        "lib.d.ts",
        vec![
            scoped_member("fs", "Stats", "isFile", vec![], None),
            DeclarationRecord::member("Tools", "stat", vec![], Some(TypeRef::name("Stats"))),
        ],
    )];

    let across = table_of(&fragments, &MergeOptions::without_libs());
    let stat = across.lookup_global("Tools").unwrap().member("stat").unwrap();
    assert_eq!(
        stat.signature().return_type,
        Type::Declared(DeclKey::new(Scope::module("fs"), "Stats"))
    );
    assert!(across.diagnostics().is_empty());

    let options = MergeOptions {
        resolve_across_modules: false,
        ..MergeOptions::without_libs()
    };
    let isolated = table_of(&fragments, &options);
    let stat = isolated.lookup_global("Tools").unwrap().member("stat").unwrap();
    assert_eq!(stat.signature().return_type, Type::Any);
    assert_eq!(isolated.diagnostics()[0].kind, DiagnosticKind::UnknownType);
}

#[test]
fn merge_diagnostics_precede_resolution_diagnostics() {
    let table = table_of(
        &[Fragment::new(
            "lib.d.ts",
            vec![
                DeclarationRecord::member("Walker", "visit", vec![param("node", "Node")], None),
                DeclarationRecord::member(
                    "Broken",
                    "call",
                    vec![
                        ParameterRecord::new("a", None).optional(),
                        ParameterRecord::new("b", None),
                    ],
                    None,
                ),
            ],
        )],
        &MergeOptions::without_libs(),
    );
    let kinds: Vec<DiagnosticKind> = table.diagnostics().iter().map(|d| d.kind).collect();
    assert_eq!(kinds, [DiagnosticKind::MalformedSignature, DiagnosticKind::UnknownType]);
    assert!(table.lookup_global("Broken").is_none());
}

#[test]
fn overloads_made_identical_by_the_any_fallback_collapse() {
    let table = table_of(
        &[
            Fragment::new(
                "a.d.ts",
                vec![DeclarationRecord::member("Foo", "bar", vec![param("x", "Missing")], None)],
            ),
            Fragment::new(
                "b.d.ts",
                vec![DeclarationRecord::member("Foo", "bar", vec![param("x", "any")], None)],
            ),
        ],
        &MergeOptions::without_libs(),
    );

    let kinds: Vec<DiagnosticKind> = table.diagnostics().iter().map(|d| d.kind).collect();
    assert_eq!(kinds, [DiagnosticKind::UnknownType]);
    assert_eq!(table.diagnostics()[0].site.file, "a.d.ts");

    let bar = table.lookup_global("Foo").unwrap().member("bar").unwrap();
    assert!(!bar.is_overloaded());
    assert_eq!(bar.overloads()[0].site.file, "a.d.ts");
    assert_eq!(bar.signature().parameters[0].ty, Type::Any);
}

#[test]
fn distinct_unknown_references_collapse_but_are_each_reported() {
    let table = table_of(
        &[Fragment::new(
            "lib.d.ts",
            vec![
                DeclarationRecord::member("Foo", "bar", vec![param("x", "Left")], None),
                DeclarationRecord::member("Foo", "bar", vec![param("x", "Right")], None),
                DeclarationRecord::member("Foo", "bar", vec![], None),
            ],
        )],
        &MergeOptions::without_libs(),
    );

    let unknown: Vec<u32> = table
        .diagnostics()
        .iter()
        .filter(|d| d.kind == DiagnosticKind::UnknownType)
        .map(|d| d.site.ordinal)
        .collect();
    assert_eq!(unknown, [0, 1]);
    // The warning for the collapsed overload is withdrawn; the one for the
    // zero-parameter overload stays.
    let ambiguity: Vec<u32> = table
        .diagnostics()
        .iter()
        .filter(|d| d.kind == DiagnosticKind::OverloadAmbiguity)
        .map(|d| d.site.ordinal)
        .collect();
    assert_eq!(ambiguity, [2]);

    let bar = table.lookup_global("Foo").unwrap().member("bar").unwrap();
    let ordinals: Vec<u32> = bar.overloads().iter().map(|o| o.site.ordinal).collect();
    assert_eq!(ordinals, [0, 2]);
}

#[test]
fn stub_survives_a_malformed_interface_of_the_same_module() {
    let table = table_of(
        &[Fragment::new(
            "fs.d.ts",
            vec![
                DeclarationRecord::module_stub("fs"),
                DeclarationRecord::InterfaceMember {
                    interface_name: "fs".into(),
                    member_name: "bad".into(),
                    parameters: vec![
                        ParameterRecord::new("a", None).optional(),
                        ParameterRecord::new("b", None),
                    ],
                    return_type_ref: None,
                    module: Some("fs".into()),
                },
            ],
        )],
        &MergeOptions::without_libs(),
    );

    let kinds: Vec<DiagnosticKind> = table.diagnostics().iter().map(|d| d.kind).collect();
    assert_eq!(kinds, [DiagnosticKind::MalformedSignature]);
    assert_eq!(table.diagnostics()[0].site.ordinal, 1);

    let fs = table.lookup_module("fs").unwrap();
    assert!(fs.is_opaque());
    assert_eq!(fs.members().count(), 0);
}

// =============================================================================
// Concurrent reads
// =============================================================================

#[test]
fn lookups_from_many_threads_agree() {
    let table = Arc::new(SymbolTable::from_registry(&stdlib_registry(), &MergeOptions::default()));

    let arities: Vec<usize> = (0..256)
        .into_par_iter()
        .map(|i| {
            let table = Arc::clone(&table);
            let name = if i % 2 == 0 { "JSON" } else { "console" };
            let declaration = table.lookup_global(name).unwrap();
            assert!(table.lookup_module("javascript").unwrap().is_opaque());
            declaration.members().len()
        })
        .collect();

    for (i, arity) in arities.into_iter().enumerate() {
        assert_eq!(arity, if i % 2 == 0 { 2 } else { 1 });
    }
}
