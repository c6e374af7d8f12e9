use super::*;
use crate::config::MergePolicy;
use tsmeta_common::{DiagnosticCode, LiteralValue};
use tsmeta_ir::{Strictness, ValidatorRef};
use tsmeta_oracle::{PropertyInfo, TupleElementInfo, TypeTable};

fn walker(table: &TypeTable) -> TypeWalker<'_> {
    TypeWalker::new(table, table, WalkerConfig::default())
}

fn walker_with(table: &TypeTable, config: WalkerConfig) -> TypeWalker<'_> {
    TypeWalker::new(table, table, config)
}

/// `Level0 { next: Level1 }`, ..., with the last level empty.
fn chain(table: &mut TypeTable, levels: usize) -> TypeId {
    let mut next: Option<TypeId> = None;
    for level in (0..levels).rev() {
        let properties = next
            .map(|ty| vec![PropertyInfo::required("next", ty)])
            .unwrap_or_default();
        next = Some(table.interface(&format!("Level{level}"), properties));
    }
    next.unwrap_or(TypeId::ANY)
}

fn empty_objects(table: &mut TypeTable, count: usize) -> TypeId {
    let members = (0..count).map(|_| table.object(Vec::new())).collect();
    table.union(members)
}

fn resolved<'r>(walker: &'r TypeWalker<'_>, name: &str) -> &'r ObjectMetadata {
    walker
        .registry()
        .resolve(name)
        .and_then(Metadata::as_object)
        .unwrap_or_else(|| panic!("{name} should be a registered object"))
}

fn phantom(table: &mut TypeTable, markers: &[(&str, TypeId)]) -> TypeId {
    table.object(
        markers
            .iter()
            .map(|(name, ty)| PropertyInfo::required(*name, *ty))
            .collect(),
    )
}

// =============================================================================
// Primitives and dispatch
// =============================================================================

#[test]
fn test_primitives() {
    let table = TypeTable::new();
    let mut walker = walker(&table);

    assert_eq!(walker.walk(TypeId::STRING), Metadata::atomic(AtomicKind::String));
    assert_eq!(walker.walk(TypeId::NUMBER), Metadata::atomic(AtomicKind::Number));
    assert_eq!(walker.walk(TypeId::BOOLEAN), Metadata::atomic(AtomicKind::Boolean));
    assert_eq!(walker.walk(TypeId::BIGINT), Metadata::atomic(AtomicKind::Bigint));
    assert_eq!(walker.walk(TypeId::NULL), Metadata::atomic(AtomicKind::Null));
    assert!(walker.walk(TypeId::ANY).is_any());
    assert_eq!(walker.walk(TypeId::UNKNOWN).kind, MetadataKind::Unknown);
    assert_eq!(walker.walk(TypeId::NEVER).kind, MetadataKind::Never);
    assert!(walker.registry().is_empty());
    assert!(walker.diagnostics().is_empty());
}

#[test]
fn test_literal_and_object_keyword() {
    let mut table = TypeTable::new();
    let ok = table.literal_str("ok");
    let mut walker = walker(&table);

    assert_eq!(
        walker.walk(ok),
        Metadata::literal(LiteralValue::String("ok".into()))
    );
    assert_eq!(
        walker.walk(TypeId::OBJECT),
        Metadata::object(ObjectMetadata::default())
    );
}

#[test]
fn test_type_parameter_uses_base_constraint() {
    let mut table = TypeTable::new();
    let constrained = table.type_parameter("T", Some(TypeId::STRING));
    let free = table.type_parameter("U", None);
    let mut walker = walker(&table);

    assert_eq!(walker.walk(constrained), Metadata::atomic(AtomicKind::String));
    assert!(walker.walk(free).is_any());
}

#[test]
fn test_tuple_elements_keep_flags() {
    let mut table = TypeTable::new();
    let tuple = table.tuple(vec![
        TupleElementInfo::required(TypeId::STRING),
        TupleElementInfo {
            type_id: TypeId::NUMBER,
            optional: true,
            rest: false,
        },
    ]);
    let mut walker = walker(&table);

    let MetadataKind::Tuple(elements) = walker.walk(tuple).kind else {
        panic!("expected a tuple");
    };
    assert_eq!(elements.len(), 2);
    assert_eq!(elements[0].ty, Metadata::atomic(AtomicKind::String));
    assert!(!elements[0].optional);
    assert!(elements[1].optional);
}

#[test]
fn test_arrays_and_array_subtypes() {
    let mut table = TypeTable::new();
    let strings = table.array(TypeId::STRING);
    let tags = table.array_subtype("Tags", TypeId::STRING);
    let mut walker = walker(&table);

    let expected = Metadata::array(Metadata::atomic(AtomicKind::String));
    assert_eq!(walker.walk(strings), expected);
    assert_eq!(walker.walk(tags), expected);
    assert!(walker.registry().is_empty());
}

#[test]
fn test_index_signature_and_methods() {
    let mut table = TypeTable::new();
    let method = table.function("render", "./view");
    let dict = table.interface(
        "Dict",
        vec![
            PropertyInfo::required("size", TypeId::NUMBER),
            PropertyInfo::method("render", method),
        ],
    );
    table.add_index_signature(dict, TypeId::STRING, TypeId::NUMBER);
    let mut walker = walker(&table);

    walker.walk(dict);
    let object = resolved(&walker, "Dict");
    assert_eq!(object.properties.len(), 1);
    assert_eq!(object.properties[0].name, "size");
    let signature = object.index_signature.as_ref().expect("index signature");
    assert_eq!(signature.key, Metadata::atomic(AtomicKind::String));
    assert_eq!(signature.value, Metadata::atomic(AtomicKind::Number));
}

// =============================================================================
// Registration and cycles
// =============================================================================

#[test]
fn test_named_object_registered_once() {
    let mut table = TypeTable::new();
    let user = table.interface(
        "User",
        vec![
            PropertyInfo::required("id", TypeId::STRING),
            PropertyInfo::optional("age", TypeId::NUMBER),
        ],
    );
    let mut walker = walker(&table);

    assert_eq!(walker.walk(user), Metadata::reference("User"));
    assert_eq!(walker.walk(user), Metadata::reference("User"));
    assert_eq!(walker.registry().len(), 1);

    let object = resolved(&walker, "User");
    assert_eq!(object.name.as_deref(), Some("User"));
    assert!(object.property("id").is_some_and(|p| p.required));
    assert!(object.property("age").is_some_and(|p| !p.required));
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "duplicate registration of 'User'")]
fn test_duplicate_registration_asserts() {
    let table = TypeTable::new();
    let mut walker = walker(&table);
    walker.register("User", Metadata::object(ObjectMetadata::default()));
    walker.register("User", Metadata::any());
}

#[test]
#[cfg(not(debug_assertions))]
fn test_duplicate_registration_reported() {
    let table = TypeTable::new();
    let mut walker = walker(&table);
    walker.register("User", Metadata::object(ObjectMetadata::default()));
    walker.register("User", Metadata::any());

    assert!(resolved(&walker, "User").properties.is_empty());
    let diagnostics = walker.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, DiagnosticCode::DuplicateRegistration.as_u32());
    assert!(!diagnostics[0].is_advisory());
}

#[test]
fn test_self_reference_terminates() {
    let mut table = TypeTable::new();
    let node = table.declare_interface("Node");
    table.define_properties(
        node,
        vec![
            PropertyInfo::required("value", TypeId::NUMBER),
            PropertyInfo::optional("next", node),
        ],
    );
    let mut walker = walker(&table);

    assert_eq!(walker.walk(node), Metadata::reference("Node"));
    let next = resolved(&walker, "Node").property("next").expect("next");
    assert_eq!(next.ty, Metadata::reference("Node"));
    assert!(!next.required);
    assert!(walker.registry().dangling_refs().is_empty());
}

#[test]
fn test_self_referencing_intersection_registers_alias() {
    let mut table = TypeTable::new();
    let named = table.object(vec![PropertyInfo::required("name", TypeId::STRING)]);
    let nested = table.object(Vec::new());
    let tree = table.intersection(vec![named, nested]);
    table.set_alias(tree, "Tree", Vec::new());
    let children = table.array(tree);
    table.define_properties(nested, vec![PropertyInfo::required("children", children)]);
    let mut walker = walker(&table);

    assert_eq!(walker.walk(tree), Metadata::reference("Tree"));
    let object = resolved(&walker, "Tree");
    assert_eq!(object.properties.len(), 2);
    assert_eq!(
        object.property("children").map(|p| &p.ty),
        Some(&Metadata::array(Metadata::reference("Tree")))
    );
    assert!(walker.registry().dangling_refs().is_empty());
}

#[test]
fn test_walk_named_resolves_union_self_reference() {
    let mut table = TypeTable::new();
    let cell = table.object(Vec::new());
    let list = table.union(vec![cell, TypeId::NULL]);
    table.define_properties(
        cell,
        vec![
            PropertyInfo::required("head", TypeId::NUMBER),
            PropertyInfo::required("tail", list),
        ],
    );
    let mut walker = walker(&table);

    assert_eq!(walker.walk_named("List", list), Metadata::reference("List"));
    let entry = walker.registry().resolve("List").expect("List registered");
    assert!(entry.nullable);
    let tail = entry.as_object().and_then(|o| o.property("tail")).expect("tail");
    assert_eq!(tail.ty, Metadata::reference("List"));
    assert!(walker.registry().dangling_refs().is_empty());
}

#[test]
fn test_walk_named_promotes_anonymous_object() {
    let mut table = TypeTable::new();
    let point = table.object(vec![
        PropertyInfo::required("x", TypeId::NUMBER),
        PropertyInfo::required("y", TypeId::NUMBER),
    ]);
    let mut walker = walker(&table);

    assert_eq!(walker.walk_named("Point", point), Metadata::reference("Point"));
    assert_eq!(walker.walk_named("Point", point), Metadata::reference("Point"));
    assert_eq!(resolved(&walker, "Point").properties.len(), 2);
    assert_eq!(walker.registry().len(), 1);
}

#[test]
fn test_walk_named_keeps_phantom_inline() {
    let mut table = TypeTable::new();
    let tag = table.literal_str("UserId");
    let brand = phantom(&mut table, &[("__brand", tag)]);
    let mut walker = walker(&table);

    let node = walker.walk_named("Brand", brand);
    assert!(node.as_object().is_some());
    assert!(walker.registry().is_empty());
}

#[test]
fn test_registry_handed_to_next_walker() {
    let mut table = TypeTable::new();
    let user = table.interface("User", vec![PropertyInfo::required("id", TypeId::STRING)]);
    let order = table.interface("Order", vec![PropertyInfo::required("owner", user)]);

    let mut first = walker(&table);
    first.walk(user);
    let (registry, diagnostics) = first.into_parts();
    assert!(diagnostics.is_empty());

    let mut second = TypeWalker::with_registry(&table, &table, WalkerConfig::default(), registry);
    assert_eq!(second.walk(order), Metadata::reference("Order"));
    assert_eq!(second.registry().len(), 2);
    assert_eq!(
        resolved(&second, "Order").property("owner").map(|p| &p.ty),
        Some(&Metadata::reference("User"))
    );
}

// =============================================================================
// Budgets
// =============================================================================

#[test]
fn test_depth_budget_keeps_nineteen_levels() {
    let mut table = TypeTable::new();
    let root = chain(&mut table, 19);
    let mut walker = walker(&table);

    assert_eq!(walker.walk(root), Metadata::reference("Level0"));
    assert_eq!(walker.registry().len(), 19);
    assert!(walker.diagnostics().is_empty());
    assert_eq!(
        resolved(&walker, "Level17").property("next").map(|p| &p.ty),
        Some(&Metadata::reference("Level18"))
    );
}

#[test]
fn test_depth_budget_degrades_twentieth_level() {
    let mut table = TypeTable::new();
    let root = chain(&mut table, 20);
    let mut walker = walker(&table);

    walker.walk(root);
    assert_eq!(walker.registry().len(), 19);
    assert!(!walker.registry().has("Level19"));

    let next = resolved(&walker, "Level18").property("next").expect("next");
    assert!(next.ty.is_any());
    assert_eq!(next.ty.degraded, Some(Degradation::DepthExceeded));

    let diagnostics = walker.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, DiagnosticCode::DepthExceeded.as_u32());
    assert!(diagnostics[0].message.contains("Level0"));
}

#[test]
fn test_breadth_budget_first_five_hundred_faithful() {
    let mut table = TypeTable::new();
    let root = empty_objects(&mut table, 501);
    let mut walker = walker(&table);

    let node = walker.walk(root);
    let union = node.as_union().expect("union");
    assert_eq!(union.members.len(), 501);
    assert!(union.members[..500].iter().all(|m| m.as_object().is_some()));
    assert_eq!(union.members[500].degraded, Some(Degradation::BreadthExceeded));

    let diagnostics = walker.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, DiagnosticCode::BreadthExceeded.as_u32());
}

#[test]
fn test_breadth_budget_resets_per_call() {
    let mut table = TypeTable::new();
    let root = empty_objects(&mut table, 500);
    let mut walker = walker(&table);

    for _ in 0..3 {
        let node = walker.walk(root);
        assert!(node.as_union().is_some_and(|u| !u.members.iter().any(Metadata::is_degraded)));
    }
    assert!(walker.diagnostics().is_empty());
}

#[test]
fn test_literal_union_does_not_consume_breadth() {
    let mut table = TypeTable::new();
    let codes = (0..600)
        .map(|i| table.literal_str(&format!("E{i:03}")))
        .collect();
    let code = table.union(codes);
    table.set_alias(code, "ErrorCode", Vec::new());
    let mut walker = walker(&table);

    let node = walker.walk(code);
    assert_eq!(node.name.as_deref(), Some("ErrorCode"));
    let union = node.as_union().expect("union");
    assert_eq!(union.members.len(), 600);
    assert!(union.members.iter().all(Metadata::is_literal));
    assert!(walker.diagnostics().is_empty());
}

#[test]
fn test_shallow_profile_from_config() {
    let mut table = TypeTable::new();
    let root = chain(&mut table, 10);
    let config = WalkerConfig {
        limits: crate::config::WalkLimits {
            profile: crate::BudgetProfile::Shallow,
            ..Default::default()
        },
        ..WalkerConfig::default()
    };
    let mut walker = walker_with(&table, config);

    walker.walk(root);
    assert_eq!(walker.registry().len(), 7);
    assert_eq!(walker.diagnostics().len(), 1);
}

// =============================================================================
// Unions
// =============================================================================

#[test]
fn test_nullable_order_independence() {
    let mut table = TypeTable::new();
    let first = table.union(vec![TypeId::NULL, TypeId::STRING, TypeId::UNDEFINED]);
    let second = table.union(vec![TypeId::UNDEFINED, TypeId::STRING, TypeId::NULL]);
    let mut walker = walker(&table);

    let a = walker.walk(first);
    let b = walker.walk(second);
    assert_eq!(a, b);
    assert_eq!(a.kind, MetadataKind::Atomic(AtomicKind::String));
    assert!(a.nullable);
    assert!(a.optional);
}

#[test]
fn test_boolean_pair_folds() {
    let mut table = TypeTable::new();
    let nullable_flag = table.union(vec![TypeId::BOOLEAN, TypeId::NULL]);
    let mixed = table.union(vec![TypeId::STRING, TypeId::BOOLEAN_TRUE]);
    let mut walker = walker(&table);

    let flag = walker.walk(nullable_flag);
    assert_eq!(flag.kind, MetadataKind::Atomic(AtomicKind::Boolean));
    assert!(flag.nullable);

    let mixed = walker.walk(mixed);
    let members = &mixed.as_union().expect("union").members;
    assert_eq!(members[0], Metadata::atomic(AtomicKind::String));
    assert_eq!(members[1], Metadata::literal(LiteralValue::Boolean(true)));
}

#[test]
fn test_optional_property_from_undefined_member() {
    let mut table = TypeTable::new();
    let maybe = table.union(vec![TypeId::STRING, TypeId::UNDEFINED]);
    let profile = table.interface("Profile", vec![PropertyInfo::required("bio", maybe)]);
    let mut walker = walker(&table);

    walker.walk(profile);
    let bio = resolved(&walker, "Profile").property("bio").expect("bio");
    assert!(!bio.required);
    assert!(bio.ty.optional);
}

#[test]
fn test_discriminant_detected() {
    let mut table = TypeTable::new();
    let a = table.literal_str("a");
    let b = table.literal_str("b");
    let first = table.object(vec![
        PropertyInfo::required("kind", a),
        PropertyInfo::required("x", TypeId::NUMBER),
    ]);
    let second = table.object(vec![
        PropertyInfo::required("kind", b),
        PropertyInfo::required("y", TypeId::STRING),
    ]);
    let shape = table.union(vec![first, second]);
    let mut walker = walker(&table);

    let node = walker.walk(shape);
    let discriminant = node
        .as_union()
        .and_then(|u| u.discriminant.as_ref())
        .expect("discriminant");
    assert_eq!(discriminant.property_name, "kind");
    assert_eq!(discriminant.member_for("a"), Some(0));
    assert_eq!(discriminant.member_for("b"), Some(1));
}

#[test]
fn test_discriminant_rejects_duplicates() {
    let mut table = TypeTable::new();
    let a = table.literal_str("a");
    let first = table.object(vec![
        PropertyInfo::required("kind", a),
        PropertyInfo::required("x", TypeId::NUMBER),
    ]);
    let second = table.object(vec![
        PropertyInfo::required("kind", a),
        PropertyInfo::required("y", TypeId::STRING),
    ]);
    let shape = table.union(vec![first, second]);
    let mut walker = walker(&table);

    let node = walker.walk(shape);
    assert!(node.as_union().is_some_and(|u| u.discriminant.is_none()));
}

#[test]
fn test_discriminant_through_registered_refs() {
    let mut table = TypeTable::new();
    let circle_kind = table.literal_str("circle");
    let square_kind = table.literal_str("square");
    let circle = table.interface(
        "Circle",
        vec![
            PropertyInfo::required("kind", circle_kind),
            PropertyInfo::required("radius", TypeId::NUMBER),
        ],
    );
    let square = table.interface(
        "Square",
        vec![
            PropertyInfo::required("kind", square_kind),
            PropertyInfo::required("side", TypeId::NUMBER),
        ],
    );
    let shape = table.union(vec![circle, square]);
    let mut walker = walker(&table);

    let node = walker.walk(shape);
    let union = node.as_union().expect("union");
    assert_eq!(union.members[0], Metadata::reference("Circle"));
    let discriminant = union.discriminant.as_ref().expect("discriminant");
    assert_eq!(discriminant.member_for("square"), Some(1));
}

#[test]
fn test_discriminant_tells_string_from_number() {
    let mut table = TypeTable::new();
    let one_text = table.literal_str("1");
    let one = table.literal_num(1.0);
    let first = table.object(vec![
        PropertyInfo::required("kind", one_text),
        PropertyInfo::required("x", TypeId::NUMBER),
    ]);
    let second = table.object(vec![
        PropertyInfo::required("kind", one),
        PropertyInfo::required("y", TypeId::STRING),
    ]);
    let shape = table.union(vec![first, second]);
    let mut walker = walker(&table);

    let node = walker.walk(shape);
    let discriminant = node
        .as_union()
        .and_then(|u| u.discriminant.as_ref())
        .expect("discriminant");
    assert_eq!(discriminant.property_name, "kind");
    assert_eq!(discriminant.member_for("\"1\""), Some(0));
    assert_eq!(discriminant.member_for("1"), Some(1));
}

#[test]
fn test_subfield_union_alias_registered() {
    let mut table = TypeTable::new();
    let open = table.literal_str("open");
    let closed = table.literal_str("closed");
    let status = table.union(vec![open, closed]);
    table.set_alias(status, "Status", Vec::new());
    let order = table.interface("Order", vec![PropertyInfo::required("status", status)]);
    let mut walker = walker(&table);

    walker.walk(order);
    assert_eq!(
        resolved(&walker, "Order").property("status").map(|p| &p.ty),
        Some(&Metadata::reference("Status"))
    );
    let entry = walker.registry().resolve("Status").expect("Status");
    assert_eq!(entry.name.as_deref(), Some("Status"));
    assert!(entry.as_union().is_some());
}

#[test]
fn test_subfield_alias_registration_can_be_disabled() {
    let mut table = TypeTable::new();
    let open = table.literal_str("open");
    let closed = table.literal_str("closed");
    let status = table.union(vec![open, closed]);
    table.set_alias(status, "Status", Vec::new());
    let order = table.interface("Order", vec![PropertyInfo::required("status", status)]);
    let config = WalkerConfig {
        register_subfield_aliases: false,
        ..WalkerConfig::default()
    };
    let mut walker = walker_with(&table, config);

    walker.walk(order);
    assert!(!walker.registry().has("Status"));
    let status = resolved(&walker, "Order").property("status").expect("status");
    assert!(status.ty.as_union().is_some());
}

#[test]
fn test_enum_registered_under_symbol() {
    let mut table = TypeTable::new();
    let color = table.enumeration(
        "Color",
        &[
            ("Red", LiteralValue::String("red".into())),
            ("Green", LiteralValue::String("green".into())),
        ],
    );
    let paint = table.interface("Paint", vec![PropertyInfo::required("color", color)]);
    let mut walker = walker(&table);

    walker.walk(paint);
    let entry = walker.registry().resolve("Color").expect("Color");
    assert_eq!(entry.name.as_deref(), Some("Color"));
    assert_eq!(entry.as_union().map(|u| u.members.len()), Some(2));
}

// =============================================================================
// Branded types
// =============================================================================

#[test]
fn test_branded_string_collapses() {
    let mut table = TypeTable::new();
    let three = table.literal_num(3.0);
    let brand = phantom(&mut table, &[("__minLength", three)]);
    let username = table.intersection(vec![TypeId::STRING, brand]);
    let mut walker = walker(&table);

    let node = walker.walk(username);
    assert_eq!(node.kind, MetadataKind::Atomic(AtomicKind::String));
    assert_eq!(node.constraints.as_ref().and_then(|c| c.min_length), Some(3));
    assert!(walker.registry().is_empty());
}

#[test]
fn test_ambiguous_brand_stays_intersection() {
    let mut table = TypeTable::new();
    let one = table.literal_num(1.0);
    let brand = phantom(&mut table, &[("__minimum", one)]);
    let odd = table.intersection(vec![TypeId::STRING, TypeId::NUMBER, brand]);
    let mut walker = walker(&table);

    let node = walker.walk(odd);
    let MetadataKind::Intersection(members) = &node.kind else {
        panic!("expected an intersection, got {node:?}");
    };
    assert_eq!(members.len(), 3);
    assert!(node.constraints.is_none());
}

#[test]
fn test_branded_errors_and_compat_tag() {
    let mut table = TypeTable::new();
    let three = table.literal_num(3.0);
    let too_short = table.literal_str("too short");
    let format_kind = table.literal_str("format");
    let email = table.literal_str("email");
    let tag = table.object(vec![
        PropertyInfo::required("kind", format_kind),
        PropertyInfo::required("value", email),
    ]);
    let brand = phantom(
        &mut table,
        &[
            ("__minLength", three),
            ("__minLength_error", too_short),
            ("~tag", tag),
        ],
    );
    let address = table.intersection(vec![TypeId::STRING, brand]);
    let mut walker = walker(&table);

    let node = walker.walk(address);
    let constraints = node.constraints.expect("constraints");
    assert_eq!(constraints.min_length, Some(3));
    assert_eq!(constraints.format.as_deref(), Some("email"));
    assert_eq!(
        constraints.error_messages.get("minLength").map(String::as_str),
        Some("too short")
    );
}

#[test]
fn test_validate_marker_resolves_function() {
    let mut table = TypeTable::new();
    let check = table.function("isSlug", "./validators");
    let brand = phantom(&mut table, &[("__validate", check)]);
    let slug = table.intersection(vec![TypeId::STRING, brand]);
    let mut walker = walker(&table);

    let node = walker.walk(slug);
    assert_eq!(
        node.constraints.and_then(|c| c.validator),
        Some(ValidatorRef {
            function_name: "isSlug".into(),
            module_path: "./validators".into(),
        })
    );
}

#[test]
fn test_branded_array_bounds() {
    let mut table = TypeTable::new();
    let strings = table.array(TypeId::STRING);
    let one = table.literal_num(1.0);
    let brand = phantom(&mut table, &[("__minItems", one)]);
    let tags = table.intersection(vec![strings, brand]);
    let mut walker = walker(&table);

    let node = walker.walk(tags);
    assert!(matches!(node.kind, MetadataKind::Array(_)));
    assert_eq!(node.constraints.and_then(|c| c.min_items), Some(1));
}

#[test]
fn test_branded_literal_union_reuses_constraints() {
    let mut table = TypeTable::new();
    let pattern = table.literal_str("^[A-Z]\\d+$");
    let brand = phantom(&mut table, &[("__pattern", pattern)]);
    let members = ["A01", "B02", "C03"]
        .iter()
        .map(|code| {
            let literal = table.literal_str(code);
            table.intersection(vec![literal, brand])
        })
        .collect();
    let codes = table.union(members);
    let mut walker = walker(&table);

    let node = walker.walk(codes);
    let union = node.as_union().expect("union");
    assert_eq!(union.members.len(), 3);
    assert!(union.members.iter().all(Metadata::is_literal));
    assert_eq!(
        node.constraints.as_ref().and_then(|c| c.pattern.as_deref()),
        Some("^[A-Z]\\d+$")
    );
    assert_eq!(walker.branded_literals.len(), 1);
    assert!(walker.diagnostics().is_empty());
}

#[test]
fn test_single_branded_literal_keeps_constraints() {
    let mut table = TypeTable::new();
    let pattern = table.literal_str("^A");
    let brand = phantom(&mut table, &[("__pattern", pattern)]);
    let literal = table.literal_str("A01");
    let branded = table.intersection(vec![literal, brand]);
    let maybe = table.union(vec![branded, TypeId::NULL]);
    let mut walker = walker(&table);

    let node = walker.walk(maybe);
    assert_eq!(node.as_literal(), Some(&LiteralValue::String("A01".into())));
    assert!(node.nullable);
    assert_eq!(
        node.constraints.and_then(|c| c.pattern),
        Some("^A".to_string())
    );
}

#[test]
fn test_doc_tags_win_over_brand() {
    let mut table = TypeTable::new();
    let three = table.literal_num(3.0);
    let twenty = table.literal_num(20.0);
    let brand = phantom(&mut table, &[("__minLength", three), ("__maxLength", twenty)]);
    let username = table.intersection(vec![TypeId::STRING, brand]);
    let decl = table.declaration();
    let account = table.interface(
        "Account",
        vec![PropertyInfo::required("name", username).with_declaration(decl)],
    );
    table.tag_property(decl, "minLength", "5");
    table.tag_property(decl, "description", "Display name");
    table.tag_type(account, "strict", "");
    let mut walker = walker(&table);

    walker.walk(account);
    let object = resolved(&walker, "Account");
    assert_eq!(object.strictness, Some(Strictness::Strict));

    let name = object.property("name").expect("name");
    let constraints = name.constraints.as_ref().expect("constraints");
    assert_eq!(constraints.min_length, Some(5));
    assert_eq!(constraints.max_length, Some(20));
    assert_eq!(name.description.as_deref(), Some("Display name"));
    assert!(name.ty.constraints.is_none());
}

// =============================================================================
// Intersections
// =============================================================================

fn merge_fixture(table: &mut TypeTable) -> TypeId {
    let a = table.interface(
        "A",
        vec![
            PropertyInfo::required("id", TypeId::STRING),
            PropertyInfo::required("shared", TypeId::STRING),
        ],
    );
    let b = table.interface(
        "B",
        vec![
            PropertyInfo::required("shared", TypeId::NUMBER),
            PropertyInfo::required("extra", TypeId::BOOLEAN),
        ],
    );
    table.intersection(vec![a, b])
}

#[test]
fn test_flatten_later_wins() {
    let mut table = TypeTable::new();
    let both = merge_fixture(&mut table);
    let mut walker = walker(&table);

    let node = walker.walk(both);
    let object = node.as_object().expect("merged object");
    let names: Vec<_> = object.properties.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["id", "shared", "extra"]);
    assert_eq!(
        object.property("shared").map(|p| &p.ty),
        Some(&Metadata::atomic(AtomicKind::Number))
    );
}

#[test]
fn test_flatten_first_wins() {
    let mut table = TypeTable::new();
    let both = merge_fixture(&mut table);
    let config = WalkerConfig {
        merge_policy: MergePolicy::FirstWins,
        ..WalkerConfig::default()
    };
    let mut walker = walker_with(&table, config);

    let node = walker.walk(both);
    let object = node.as_object().expect("merged object");
    assert_eq!(
        object.property("shared").map(|p| &p.ty),
        Some(&Metadata::atomic(AtomicKind::String))
    );
}

#[test]
fn test_subfield_intersection_alias_registered() {
    let mut table = TypeTable::new();
    let both = merge_fixture(&mut table);
    table.set_alias(both, "AB", Vec::new());
    let holder = table.interface("Holder", vec![PropertyInfo::required("both", both)]);
    let mut walker = walker(&table);

    walker.walk(holder);
    assert_eq!(
        resolved(&walker, "Holder").property("both").map(|p| &p.ty),
        Some(&Metadata::reference("AB"))
    );
    assert_eq!(resolved(&walker, "AB").name.as_deref(), Some("AB"));
    assert!(walker.registry().dangling_refs().is_empty());
}

// =============================================================================
// Generic instantiations
// =============================================================================

fn page(table: &mut TypeTable, item: TypeId) -> TypeId {
    let items = table.array(item);
    table.instantiate(
        "Page",
        vec![item],
        vec![
            PropertyInfo::required("items", items),
            PropertyInfo::required("total", TypeId::NUMBER),
        ],
    )
}

#[test]
fn test_instantiations_get_composite_names() {
    let mut table = TypeTable::new();
    let user = table.interface("User", vec![PropertyInfo::required("id", TypeId::STRING)]);
    let order = table.interface("Order", vec![PropertyInfo::required("id", TypeId::NUMBER)]);
    let users = page(&mut table, user);
    let orders = page(&mut table, order);
    let users_again = page(&mut table, user);
    let mut walker = walker(&table);

    assert_eq!(walker.walk(users), Metadata::reference("PageUser"));
    assert_eq!(walker.walk(orders), Metadata::reference("PageOrder"));
    assert_eq!(walker.walk(users_again), Metadata::reference("PageUser"));
    assert_eq!(walker.registry().names(), ["Order", "PageOrder", "PageUser", "User"]);
    assert!(walker.diagnostics().is_empty());
}

#[test]
fn test_unnameable_arguments_inline_with_one_advisory() {
    let mut table = TypeTable::new();
    let pair = table.tuple(vec![
        TupleElementInfo::required(TypeId::STRING),
        TupleElementInfo::required(TypeId::NUMBER),
    ]);
    let single = table.tuple(vec![TupleElementInfo::required(TypeId::NUMBER)]);
    let pairs = page(&mut table, pair);
    let singles = page(&mut table, single);
    let mut walker = walker(&table);

    assert!(walker.walk(pairs).as_object().is_some());
    assert!(walker.walk(singles).as_object().is_some());
    assert!(walker.registry().is_empty());

    let diagnostics = walker.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].is_advisory());
    assert!(diagnostics[0].message.contains("'Page'"));
}

#[test]
fn test_literal_instantiations_never_share_an_entry() {
    let mut table = TypeTable::new();
    let boxes: Vec<TypeId> = [
        LiteralValue::String("15".into()),
        LiteralValue::Number(15.0),
        LiteralValue::String("foo bar".into()),
        LiteralValue::String("fooBar".into()),
    ]
    .into_iter()
    .map(|value| {
        let literal = table.literal(value);
        table.instantiate("Box", vec![literal], vec![PropertyInfo::required("value", literal)])
    })
    .collect();
    let mut walker = walker(&table);

    let nodes: Vec<Metadata> = boxes.iter().map(|&ty| walker.walk(ty)).collect();
    assert!(nodes[0].as_object().is_some());
    assert_eq!(nodes[1], Metadata::reference("Box15"));
    assert!(nodes[2].as_object().is_some());
    assert_eq!(nodes[3], Metadata::reference("BoxFooBar"));
    for (i, a) in nodes.iter().enumerate() {
        for b in &nodes[i + 1..] {
            assert_ne!(a, b);
        }
    }
    assert_eq!(walker.registry().names(), ["Box15", "BoxFooBar"]);

    let diagnostics = walker.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, DiagnosticCode::UnnameableTypeArguments.as_u32());
}

#[test]
fn test_composite_name_owned_by_first_instantiation() {
    let mut table = TypeTable::new();
    let a = table.interface("A", Vec::new());
    let bc = table.interface("BC", Vec::new());
    let ab = table.interface("AB", Vec::new());
    let c = table.interface("C", Vec::new());
    let fields = vec![PropertyInfo::required("first", TypeId::STRING)];
    let first = table.instantiate("Pair", vec![a, bc], fields.clone());
    let second = table.instantiate("Pair", vec![ab, c], fields.clone());
    let first_again = table.instantiate("Pair", vec![a, bc], fields);
    let mut walker = walker(&table);

    assert_eq!(walker.walk(first), Metadata::reference("PairABC"));
    assert!(walker.walk(second).as_object().is_some());
    assert_eq!(walker.walk(first_again), Metadata::reference("PairABC"));
    assert_eq!(walker.registry().names(), ["PairABC"]);
    assert_eq!(walker.diagnostics().len(), 1);
    assert!(walker.diagnostics()[0].message.contains("'Pair'"));
}

#[test]
fn test_nested_copy_of_instantiation_refers_back() {
    let mut table = TypeTable::new();
    let inner = table.instantiate(
        "Node",
        vec![TypeId::STRING],
        vec![PropertyInfo::required("value", TypeId::STRING)],
    );
    let outer = table.instantiate(
        "Node",
        vec![TypeId::STRING],
        vec![
            PropertyInfo::required("value", TypeId::STRING),
            PropertyInfo::optional("next", inner),
        ],
    );
    let mut walker = walker(&table);

    assert_eq!(walker.walk(outer), Metadata::reference("NodeString"));
    assert_eq!(walker.registry().len(), 1);
    let next = resolved(&walker, "NodeString").property("next").expect("next");
    assert_eq!(next.ty, Metadata::reference("NodeString"));
    assert!(walker.diagnostics().is_empty());
}

#[test]
fn test_unnameable_alias_collapsing_to_one_member_is_silent() {
    let mut table = TypeTable::new();
    let pair = table.tuple(vec![
        TupleElementInfo::required(TypeId::STRING),
        TupleElementInfo::required(TypeId::NUMBER),
    ]);
    let maybe = table.union(vec![pair, TypeId::NULL]);
    table.set_alias(maybe, "Maybe", vec![pair]);
    let either = table.union(vec![pair, TypeId::STRING]);
    table.set_alias(either, "Either", vec![pair]);
    let holder = table.interface("Holder", vec![PropertyInfo::required("value", maybe)]);
    let choice = table.interface("Choice", vec![PropertyInfo::required("value", either)]);
    let mut walker = walker(&table);

    walker.walk(holder);
    let value = resolved(&walker, "Holder").property("value").expect("value");
    assert!(matches!(value.ty.kind, MetadataKind::Tuple(_)));
    assert!(value.ty.nullable);
    assert!(walker.diagnostics().is_empty());

    walker.walk(choice);
    let value = resolved(&walker, "Choice").property("value").expect("value");
    assert!(value.ty.as_union().is_some());
    assert_eq!(walker.diagnostics().len(), 1);
    assert!(walker.diagnostics()[0].message.contains("'Either'"));
}

// =============================================================================
// Native types and wrappers
// =============================================================================

#[test]
fn test_wrappers_unwrap() {
    let mut table = TypeTable::new();
    let user = table.interface("User", vec![PropertyInfo::required("id", TypeId::STRING)]);
    let pending = table.library("Promise", vec![user]);
    let inner = table.library("Promise", vec![TypeId::STRING]);
    let nested = table.library("Promise", vec![inner]);
    let mut walker = walker(&table);

    assert_eq!(walker.walk(pending), Metadata::reference("User"));
    assert_eq!(walker.walk(nested), Metadata::atomic(AtomicKind::String));
}

#[test]
fn test_native_types() {
    let mut table = TypeTable::new();
    let user = table.interface("User", vec![PropertyInfo::required("id", TypeId::STRING)]);
    let date = table.library("Date", Vec::new());
    let map = table.library("Map", vec![TypeId::STRING, user]);
    let callback = table.function("onChange", "./events");
    let mut walker = walker(&table);

    assert_eq!(walker.walk(date), Metadata::native("Date", Vec::new()));
    assert_eq!(
        walker.walk(map),
        Metadata::native(
            "Map",
            vec![Metadata::atomic(AtomicKind::String), Metadata::reference("User")]
        )
    );
    assert_eq!(walker.walk(callback), Metadata::native("Function", Vec::new()));
}

#[test]
fn test_extra_native_types() {
    let mut table = TypeTable::new();
    let decimal = table.interface("Decimal", vec![PropertyInfo::required("digits", TypeId::STRING)]);
    let config = WalkerConfig {
        extra_native_types: vec!["Decimal".into()],
        ..WalkerConfig::default()
    };
    let mut walker = walker_with(&table, config);

    assert_eq!(walker.walk(decimal), Metadata::native("Decimal", Vec::new()));
    assert!(walker.registry().is_empty());
}

#[test]
fn test_template_literal_pattern() {
    let mut table = TypeTable::new();
    let version = table.template(vec!["v".into()], vec![TypeId::NUMBER]);
    let id = table.template(vec!["id_".into(), String::new()], vec![TypeId::STRING]);
    let mut walker = walker(&table);

    let node = walker.walk(version);
    assert_eq!(node.kind, MetadataKind::Atomic(AtomicKind::String));
    assert_eq!(
        node.constraints.and_then(|c| c.pattern).as_deref(),
        Some(r"^v[+-]?\d+(?:\.\d+)?$")
    );
    assert_eq!(
        walker.walk(id).constraints.and_then(|c| c.pattern).as_deref(),
        Some("^id_.*$")
    );
}

// =============================================================================
// Whole runs
// =============================================================================

fn storefront(table: &mut TypeTable) -> Vec<TypeId> {
    let user = table.interface("User", vec![PropertyInfo::required("id", TypeId::STRING)]);
    let order = table.declare_interface("Order");
    let orders = table.array(order);
    let maybe_user = table.union(vec![user, TypeId::NULL]);
    table.define_properties(
        order,
        vec![
            PropertyInfo::required("buyer", maybe_user),
            PropertyInfo::optional("related", orders),
        ],
    );
    let users = page(table, user);
    let order_page = page(table, order);
    vec![users, order_page, order]
}

#[test]
fn test_no_dangling_refs_after_run() {
    let mut table = TypeTable::new();
    let roots = storefront(&mut table);
    let mut walker = walker(&table);

    for root in roots {
        walker.walk(root);
    }
    assert!(walker.registry().dangling_refs().is_empty());
    assert!(walker.diagnostics().is_empty());
}

#[test]
fn test_independent_runs_in_parallel() {
    use rayon::prelude::*;

    let mut table = TypeTable::new();
    let roots = storefront(&mut table);

    let registries: Vec<Registry> = (0..8)
        .into_par_iter()
        .map(|_| {
            let mut walker = walker(&table);
            for &root in &roots {
                walker.walk(root);
            }
            walker.into_parts().0
        })
        .collect();

    assert!(registries.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(registries[0].len(), 4);
}

#[test]
fn test_walk_under_trace_subscriber() {
    let mut table = TypeTable::new();
    let roots = storefront(&mut table);
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .with_test_writer()
        .finish();

    let registry = tracing::subscriber::with_default(subscriber, || {
        let mut walker = walker(&table);
        for &root in &roots {
            walker.walk(root);
        }
        walker.into_parts().0
    });
    assert_eq!(registry.len(), 4);
}
