use super::*;
use crate::host::ProgramId;
use crate::memory::{MemoryProgram, PropertySpec};

fn fact(name: &str, optional: bool, readonly: bool, type_key: &str) -> PropertyFact {
    PropertyFact {
        name: Arc::from(name),
        optional,
        readonly,
        type_key: CanonicalKey::from(type_key),
    }
}

#[test]
fn test_facts_sorted_by_name() {
    let mut program = MemoryProgram::new(ProgramId(1));
    let string = program.intrinsic("string");
    let number = program.intrinsic("number");
    let object = program.object(vec![
        PropertySpec::new("zeta", string),
        PropertySpec::new("alpha", number),
        PropertySpec::new("mid", string),
    ]);

    let facts = property_facts(&program, object, NodeId(0), 7, true);
    let names: Vec<&str> = facts.iter().map(|fact| &*fact.name).collect();
    assert_eq!(names, vec!["alpha", "mid", "zeta"]);
}

#[test]
fn test_sort_is_bytewise() {
    let mut program = MemoryProgram::new(ProgramId(1));
    let string = program.intrinsic("string");
    let object = program.object(vec![
        PropertySpec::new("a", string),
        PropertySpec::new("B", string),
        PropertySpec::new("_c", string),
    ]);

    let facts = property_facts(&program, object, NodeId(0), 7, true);
    let names: Vec<&str> = facts.iter().map(|fact| &*fact.name).collect();
    assert_eq!(names, vec!["B", "_c", "a"]);
}

#[test]
fn test_fact_fields() {
    let mut program = MemoryProgram::new(ProgramId(1));
    let string = program.intrinsic("string");
    let number = program.intrinsic("number");
    let object = program.object(vec![
        PropertySpec::new("id", number).readonly(),
        PropertySpec::new("label", string).optional(),
    ]);

    let facts = property_facts(&program, object, NodeId(0), 7, true);
    assert_eq!(
        facts,
        vec![
            fact("id", false, true, "number"),
            fact("label", true, false, "string"),
        ]
    );
}

#[test]
fn test_synthetic_property_resolves_at_fallback_location() {
    let mut program = MemoryProgram::new(ProgramId(1));
    let string = program.intrinsic("string");
    let number = program.intrinsic("number");
    let mapped = program.object(vec![PropertySpec::new("key", string).synthetic()]);
    let file = program.add_file("src/mapped.ts");
    let declaration = program.declare(
        file,
        0,
        crate::host::DeclaredForm::ShapeAlias,
        "Mapped",
        mapped,
    );
    let elsewhere = program.declare(
        file,
        40,
        crate::host::DeclaredForm::ShapeAlias,
        "Elsewhere",
        string,
    );
    program.narrow_property_at(mapped, "key", declaration, number);

    assert_eq!(program.property_node(mapped, "key"), None);
    // No declaring node: never read-only, type seen from the declaration.
    let facts = property_facts(&program, mapped, declaration, 7, true);
    assert_eq!(facts, vec![fact("key", false, false, "number")]);

    let facts = property_facts(&program, mapped, elsewhere, 7, true);
    assert_eq!(facts, vec![fact("key", false, false, "string")]);
}

#[test]
fn test_declared_property_resolves_at_its_own_node() {
    let mut program = MemoryProgram::new(ProgramId(1));
    let string = program.intrinsic("string");
    let number = program.intrinsic("number");
    let boolean = program.intrinsic("boolean");
    let object = program.object(vec![PropertySpec::new("value", string)]);
    let file = program.add_file("src/value.ts");
    let declaration = program.declare(
        file,
        0,
        crate::host::DeclaredForm::ObjectShape,
        "Holder",
        object,
    );
    let property_node = program.property_node(object, "value").expect("declared property");
    program.narrow_property_at(object, "value", property_node, number);
    program.narrow_property_at(object, "value", declaration, boolean);

    let facts = property_facts(&program, object, declaration, 7, true);
    assert_eq!(facts, vec![fact("value", false, false, "number")]);
}

#[test]
fn test_alias_is_resolved_before_extraction() {
    let mut program = MemoryProgram::new(ProgramId(1));
    let string = program.intrinsic("string");
    let point = program.object(vec![PropertySpec::new("a", string)]);
    let alias = program.alias("Point", point);

    assert_eq!(
        property_facts(&program, alias, NodeId(0), 7, true),
        vec![fact("a", false, false, "string")]
    );
    assert!(property_facts(&program, alias, NodeId(0), 7, false).is_empty());
}

#[test]
fn test_exhausted_budget_yields_no_facts() {
    let mut program = MemoryProgram::new(ProgramId(1));
    let string = program.intrinsic("string");
    let object = program.object(vec![PropertySpec::new("a", string)]);

    assert!(property_facts(&program, object, NodeId(0), 0, true).is_empty());

    // One unit left: the fact exists but its type is cut off.
    let facts = property_facts(&program, object, NodeId(0), 1, true);
    assert_eq!(facts, vec![fact("a", false, false, "#DepthLimit")]);
}

#[test]
fn test_non_objects_have_no_facts() {
    let mut program = MemoryProgram::new(ProgramId(1));
    let string = program.intrinsic("string");
    let signature = program.signature("() => void");
    let callable = program.callable(vec![signature], vec![]);
    let empty = program.object(vec![]);

    assert!(property_facts(&program, string, NodeId(0), 7, true).is_empty());
    assert!(property_facts(&program, callable, NodeId(0), 7, true).is_empty());
    assert!(property_facts(&program, empty, NodeId(0), 7, true).is_empty());
}

#[test]
fn test_nested_property_keys_share_the_traversal() {
    let mut program = MemoryProgram::new(ProgramId(1));
    let number = program.intrinsic("number");
    let point = program.object(vec![
        PropertySpec::new("y", number),
        PropertySpec::new("x", number),
    ]);
    let line = program.object(vec![
        PropertySpec::new("to", point),
        PropertySpec::new("from", point),
    ]);

    let facts = property_facts(&program, line, NodeId(0), 7, true);
    assert_eq!(
        facts,
        vec![
            fact("from", false, false, "object{x:number,y:number}"),
            fact("to", false, false, "object{x:number,y:number}"),
        ]
    );
}

#[test]
fn test_fact_display() {
    assert_eq!(fact("id", false, true, "number").to_string(), "readonly id:number");
    assert_eq!(fact("tag", true, false, "string").to_string(), "tag?:string");
    assert_eq!(
        fact("both", true, true, "boolean").to_string(),
        "readonly both?:boolean"
    );
}

#[test]
fn test_render_property_list() {
    let mut out = String::from("object");
    render_property_list(
        &mut out,
        &[fact("a", false, false, "string"), fact("b", true, true, "number")],
    );
    assert_eq!(out, "object{a:string,readonly b?:number}");

    let mut empty = String::new();
    render_property_list(&mut empty, &[]);
    assert_eq!(empty, "{}");
}

#[test]
fn test_property_subset() {
    let a = fact("a", false, false, "string");
    let b = fact("b", false, false, "number");
    let c = fact("c", false, false, "boolean");
    let a_optional = fact("a", true, false, "string");

    assert!(is_property_subset(&[a.clone()], &[a.clone(), b.clone()]));
    assert!(is_property_subset(&[], &[a.clone()]));
    assert!(is_property_subset(&[a.clone(), c.clone()], &[a.clone(), b.clone(), c.clone()]));
    assert!(!is_property_subset(&[a.clone(), c.clone()], &[a.clone(), b.clone()]));
    // Field-for-field: same name with different optionality is not a match.
    assert!(!is_property_subset(&[a_optional], &[a, b]));
}
