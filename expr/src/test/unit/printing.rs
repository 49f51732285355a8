use crate::config::PrintConfig;
use crate::expr::Expr;
use crate::operands;
use crate::test::kinds::{DUMMY1, DUMMY2, FLAT, NEUTRAL, neutral};
use crate::value::{Kwargs, Value};

fn expr(value: Value) -> Expr {
    value.as_expr().cloned().unwrap()
}

#[test]
fn test_default_str_form() {
    let e = FLAT.create(operands![1, 2, "a"]).unwrap();
    assert_eq!(e.to_string(), "Flat(1, 2, a)");
}

#[test]
fn test_default_srepr_quotes_strings() {
    let e = expr(FLAT.create(operands![1, 2.5, "a"]).unwrap());
    assert_eq!(e.srepr(), "Flat(1, 2.5, 'a')");
}

#[test]
fn test_kwargs_follow_positional_args() {
    let mut kwargs = Kwargs::new();
    kwargs.insert("label", Value::from("x"));
    kwargs.insert("dim", Value::Int(2));
    let e = expr(DUMMY1.create_kw(operands![1], kwargs).unwrap());
    assert_eq!(e.srepr(), "Dummy1(1, dim=2, label='x')");
    assert_eq!(e.render(&PrintConfig::default()), "Dummy1(1, dim=2, label=x)");
}

#[test]
fn test_default_tex_form() {
    let e = expr(DUMMY1.create(operands![1, "a"]).unwrap());
    assert_eq!(e.render_tex(&PrintConfig::default()), "{\\rm Dummy1}\\left(1, \\text{a}\\right)");
}

#[test]
fn test_singleton_prints_bare_name() {
    let e = neutral();
    assert_eq!(e.to_string(), "e");
    assert_eq!(e.srepr(), "e");
    assert_eq!(Expr::singleton(&NEUTRAL).unwrap().render_tex(&PrintConfig::default()), "{\\rm e}");
}

#[test]
fn test_nested_srepr() {
    let inner = DUMMY2.create(operands!["x", Value::tuple([Value::Int(1)])]).unwrap();
    let outer = expr(DUMMY1.create(operands![inner, neutral()]).unwrap());
    assert_eq!(outer.srepr(), "Dummy1(Dummy2('x', (1,)), e)");
}

#[test]
fn test_indented_srepr() {
    let inner = DUMMY2.create(operands!["x", 2]).unwrap();
    let outer = expr(DUMMY1.create(operands![1, inner]).unwrap());
    let config = PrintConfig::builder().indent(2).build();
    let expected = "Dummy1(\n  1,\n  Dummy2(\n    'x',\n    2))";
    assert_eq!(outer.srepr_indented_with(&config), expected);
}

#[test]
fn test_indented_srepr_without_args() {
    let e = expr(DUMMY1.create(operands![]).unwrap());
    assert_eq!(e.srepr_indented_with(&PrintConfig::default()), "Dummy1()");
}

#[test]
fn test_cached_forms_are_computed_once() {
    let e = expr(FLAT.create(operands![1, 2]).unwrap());
    let first = e.srepr().as_ptr();
    let copy = e.clone();
    assert_eq!(copy.srepr().as_ptr(), first);
    assert_eq!(e.tex().as_ptr(), copy.tex().as_ptr());
}

#[test]
fn test_concurrent_display_agrees() {
    let e = expr(FLAT.create(operands![3, "b", 4.5]).unwrap());
    let rendered: Vec<String> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8).map(|_| s.spawn(|| e.to_string())).collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(rendered.iter().all(|r| r == "Flat(3, b, 4.5)"));
}
