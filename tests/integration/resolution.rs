//! Resolution of YAML-defined variables through the public API.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use zenfig::models::Value;
use zenfig::resolver::{
    DependencyGraph, Diagnostic, ResolveError, ResolverOptions, resolve,
};
use zenfig::templating::{Registry, RenderError, Renderer};
use zenfig::test_utils::{init_test_logging, variables};

fn resolve_yaml(yaml: &str) -> zenfig::models::Variables {
    init_test_logging(None);
    let (resolved, diagnostics) =
        resolve(variables(yaml), Registry::with_builtins(), ResolverOptions::default()).unwrap();
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
    resolved
}

#[test]
fn test_theme_resolves_end_to_end() {
    let resolved = resolve_yaml(
        r##"
base: "1A1A1A"
accent: "{{ @base|norm_hex }}"
accent_rgb: "{{ @accent|hex_to_rgb }}"
font_size: 11
title_size: "{{ @font_size + 2 }}"
banner: "size {{ @title_size }}pt in {{ @accent }}"
terminal:
  font: "Hack {{ @font_size }}"
  size: "{{ @font_size }}"
  colors: ["{{ @accent }}", "#ffffff"]
"##,
    );

    assert_eq!(resolved["accent"], Value::from("#1a1a1a"));
    assert_eq!(
        resolved["accent_rgb"],
        Value::Sequence(vec![Value::Integer(26), Value::Integer(26), Value::Integer(26)])
    );
    assert_eq!(resolved["title_size"], Value::Integer(13));
    assert_eq!(resolved["banner"], Value::from("size 13pt in #1a1a1a"));

    let Value::Mapping(terminal) = &resolved["terminal"] else {
        panic!("terminal must stay a mapping");
    };
    assert_eq!(terminal["font"], Value::from("Hack 11"));
    assert_eq!(terminal["size"], Value::Integer(11));
    assert_eq!(
        terminal["colors"],
        Value::Sequence(vec![Value::from("#1a1a1a"), Value::from("#ffffff")])
    );
}

#[test]
fn test_output_has_no_expressions_left() {
    let resolved = resolve_yaml(
        r##"
a: "{{ @b }}-{{ @c }}"
b: "{{ @c }}"
c: "x"
"##,
    );
    for value in resolved.values() {
        assert!(!value.to_string().contains("{{"), "unresolved value: {value}");
    }
    assert_eq!(resolved["a"], Value::from("x-x"));
}

#[test]
fn test_type_preservation_rules() {
    let resolved = resolve_yaml(
        r##"
n: 5
f: 0.25
b: false
list: [1, 2]
as_int: "{{ @n }}"
as_float: "{{ @f }}"
as_bool: "{{ @b }}"
as_list: "{{ @list }}"
padded: " {{ @n }}"
mixed: "{{ @n }}{{ @n }}"
negated: "{{ -3 + @n }}"
trimmed: "{{- @n -}}"
"##,
    );

    assert_eq!(resolved["as_int"], Value::Integer(5));
    assert_eq!(resolved["as_float"], Value::Float(0.25));
    assert_eq!(resolved["as_bool"], Value::Bool(false));
    assert_eq!(resolved["as_list"], resolved["list"]);
    assert_eq!(resolved["padded"], Value::from(" 5"));
    assert_eq!(resolved["mixed"], Value::from("55"));
    assert_eq!(resolved["negated"], Value::Integer(2));
    assert_eq!(resolved["trimmed"], Value::Integer(5));
}

#[test]
fn test_cycle_aborts_resolution() {
    let result = resolve(
        variables("a: '{{ @b }}'\nb: '{{ @c }}'\nc: '{{ @a }}'\nok: fine\n"),
        Registry::with_builtins(),
        ResolverOptions::default(),
    );
    let err = result.unwrap_err();
    assert_eq!(
        err,
        ResolveError::CircularDependency {
            chain: vec!["a".into(), "b".into(), "c".into(), "a".into()]
        }
    );
}

#[test]
fn test_undefined_reference_policies() {
    let yaml = "greeting: 'Hello {{ @nmae }}!'\nname: World\n";

    let (resolved, diagnostics) =
        resolve(variables(yaml), Registry::with_builtins(), ResolverOptions::default()).unwrap();
    assert_eq!(resolved["greeting"], Value::from("Hello !"));
    assert_eq!(resolved.len(), 2);
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].to_string().contains("did you mean name?"));

    let err = resolve(variables(yaml), Registry::with_builtins(), ResolverOptions::strict())
        .unwrap_err();
    assert!(matches!(
        err,
        ResolveError::UndefinedReference { ref variable, .. } if variable == "nmae"
    ));
}

#[test]
fn test_failing_filter_does_not_stop_others() {
    let (resolved, diagnostics) = resolve(
        variables("bad: '{{ @color|norm_hex }}'\ncolor: not-a-color\nother: '{{ @color }}!'\n"),
        Registry::with_builtins(),
        ResolverOptions::default(),
    )
    .unwrap();

    assert_eq!(resolved["bad"], Value::from("{{ @color|norm_hex }}"));
    assert_eq!(resolved["other"], Value::from("not-a-color!"));
    assert!(matches!(
        &diagnostics[..],
        [Diagnostic::RenderFailed { key, error: RenderError::FilterFailed { .. } }] if key == "bad"
    ));
}

#[test]
fn test_custom_registry_filter() {
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&seen);

    let mut registry = Registry::new();
    registry.register_filter("shout", move |value, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        let text = value.as_str().unwrap_or_default();
        Ok(tera::Value::String(format!("{}!", text.to_uppercase())))
    });

    let mut graph = DependencyGraph::build(
        variables("word: hey\nloud: '{{ @word|shout }}'\nlouder: '{{ @loud }} {{ @loud }}'\n"),
        registry.clone(),
        ResolverOptions::default(),
    )
    .unwrap();
    let resolved = graph.evaluate().unwrap();

    assert_eq!(resolved["loud"], Value::from("HEY!"));
    assert_eq!(resolved["louder"], Value::from("HEY! HEY!"));
    assert_eq!(seen.load(Ordering::SeqCst), 1);

    // Builtins are not part of a plain registry
    assert!(!registry.has_filter("norm_hex"));

    let out = Renderer::new(registry).render_template("{{ word | shout }}", &resolved).unwrap();
    assert_eq!(out, "HEY!");
}

#[test]
fn test_render_template_with_builtin_functions() {
    let resolved = resolve_yaml("accent: '{{ @base|norm_hex }}'\nbase: fff\n");
    let out = Renderer::new(Registry::with_builtins())
        .render_template(
            "{{ accent }} {{ color_hex_to_rgb(color=accent) | join(sep=',') }}",
            &resolved,
        )
        .unwrap();
    assert_eq!(out, "#ffffff 255,255,255");
}
