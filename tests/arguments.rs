//! Integration tests for validating arguments against template parameters

use std::path::Path;

use chronicle_templates::{load_templates, prepare_arguments, ArgStore, ResolveError, TemplateStore};
use pretty_assertions::assert_eq;

fn library() -> TemplateStore {
    load_templates(Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/library"))
        .expect("Should load library")
}

#[test]
fn test_example_arguments_validate_for_every_template() {
    let store = library();
    for id in store.list_template_ids(true) {
        let params = store.get_template(&id).expect("Should exist").parameters();
        let mut args = ArgStore::from_args(params.example_arguments()).expect("Should parse");
        params
            .validate_and_process_args(&mut args)
            .unwrap_or_else(|e| panic!("examples of '{}' should validate: {}", id, e));
    }
}

#[test]
fn test_example_arguments_of_scenario() {
    let store = library();
    let template = store.get_template("pfs2.s1-01").expect("Should exist");
    assert_eq!(
        template.parameters().example_arguments(),
        vec![
            "char=Stabby McStabface",
            "faction=Grand Archive",
            "societyid=123456-2001",
            "treasurebundles=10",
        ]
    );
}

#[test]
fn test_processed_arguments_include_derived_values() {
    let store = library();
    let template = store.get_template("pfs2.s1-01").expect("Should exist");
    let args = prepare_arguments(
        template,
        ["societyid=  98765 -2003", "faction=Vigilant Seal", "treasurebundles=4"],
    )
    .expect("Should validate");

    let pairs: Vec<(&str, &str)> = args.iter().collect();
    assert_eq!(
        pairs,
        vec![
            ("societyid", "98765-2003"),
            ("faction", "Vigilant Seal"),
            ("treasurebundles", "4"),
            ("societyid.player", "98765"),
            ("societyid.char", "2003"),
        ]
    );
}

#[test]
fn test_inherited_parameter_validates_in_child() {
    let store = library();
    let template = store.get_template("pfs2.s1-02").expect("Should exist");
    let err = prepare_arguments(template, ["faction=Radiant Oath"]).unwrap_err();
    assert!(matches!(err.root(), ResolveError::Validation { .. }));
    assert!(err.to_string().contains("faction"));
}

#[test]
fn test_parameter_of_sibling_is_unknown() {
    let store = library();
    let template = store.get_template("pfs2.s1-02").expect("Should exist");
    let err = prepare_arguments(template, ["treasurebundles=2"]).unwrap_err();
    assert!(err.to_string().contains("no corresponding parameter"));
}

#[test]
fn test_malformed_argument_is_rejected() {
    let store = library();
    let template = store.get_template("pfs2").expect("Should exist");
    let err = prepare_arguments(template, ["char"]).unwrap_err();
    assert!(matches!(err, ResolveError::Validation { .. }));
}

#[test]
fn test_inherited_parameters_are_independent_copies() {
    let store = library();
    let base = store.get_template("pfs2").expect("Should exist").parameters();
    let child = store.get_template("pfs2.s1").expect("Should exist").parameters();
    assert_eq!(base.get("faction"), child.get("faction"));
    assert!(!std::ptr::eq(
        base.get("faction").expect("Should exist"),
        child.get("faction").expect("Should exist")
    ));
}
