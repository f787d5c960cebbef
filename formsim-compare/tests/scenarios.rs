use assert_float_eq::{
    afe_abs,
    afe_relative_error_msg,
    afe_is_relative_eq,
    assert_float_relative_eq,
};
use formsim_compare::{
    compare_sources,
    normalize,
    similarity,
    similarity_with,
    ArityPolicy,
    CompareOptions,
    ComparisonError,
    Side,
};
use formsim_compute::{symbolic::SimplifyError, tree::{Node, Tag}};
use pretty_assertions::assert_eq;

fn compare(a: &str, b: &str) -> formsim_compare::Comparison {
    compare_sources(a, b, &CompareOptions::default()).unwrap()
}

#[test]
fn renamed_variables() {
    let comparison = compare("x + y", "a + b");
    assert_eq!(comparison.first.normalized.to_string(), "x_1 + x_2");
    assert_eq!(comparison.second.normalized.to_string(), "x_1 + x_2");
    assert_eq!(comparison.similarity.percentage(), 100.0);
    assert!(comparison.equivalent);
}

#[test]
fn different_operator() {
    let comparison = compare("x + y", "x * y");
    assert_eq!((comparison.similarity.matches(), comparison.similarity.total()), (2.0, 3));
    assert_float_relative_eq!(comparison.similarity.percentage(), 200.0 / 3.0);
    assert!(!comparison.equivalent);
}

#[test]
fn different_constant() {
    let comparison = compare("2 * x", "3 * x");
    assert_eq!((comparison.similarity.matches(), comparison.similarity.total()), (2.5, 3));
    assert_float_relative_eq!(comparison.similarity.percentage(), 250.0 / 3.0);
    assert!(!comparison.equivalent);
}

#[test]
fn equivalent_but_different_shape() {
    let comparison = compare("(a+1)^2", "b^2 + 2b + 1");
    assert!(comparison.equivalent);
    assert!(comparison.similarity.percentage() < 100.0);
}

#[test]
fn malformed_input() {
    let err = compare_sources("x + y", "x + * y", &CompareOptions::default()).unwrap_err();
    let ComparisonError::Parse { side, source } = err else {
        panic!("expected a parse error");
    };
    assert_eq!(side, Side::Second);

    let mut report = Vec::new();
    source.write_report("second", "x + * y", &mut report).unwrap();
    let report = String::from_utf8(strip_ansi_escapes::strip(report)).unwrap();
    assert!(report.contains(&source.error().kind.message()));
}

#[test]
fn malformed_first_input_is_reported_first() {
    let err = compare_sources("(x", "(y", &CompareOptions::default()).unwrap_err();
    assert!(matches!(err, ComparisonError::Parse { side: Side::First, .. }));
}

#[test]
fn simplification_errors() {
    let err = compare_sources("x/0", "x", &CompareOptions::default()).unwrap_err();
    assert!(matches!(err, ComparisonError::Simplification(SimplifyError::DivisionByZero)));

    let err = compare_sources("n!", "n", &CompareOptions::default()).unwrap_err();
    assert!(matches!(err, ComparisonError::Simplification(SimplifyError::Unsupported { .. })));
}

#[test]
fn function_heads() {
    // a single group after an unknown name is a product, whose names get renamed
    assert_eq!(compare("f(x)", "g(x)").similarity.percentage(), 100.0);

    // a call keeps its name, so different heads are a mismatch
    let comparison = compare("f(x, y)", "g(x, y)");
    assert_eq!((comparison.similarity.matches(), comparison.similarity.total()), (2.0, 3));
    assert_eq!(compare("sin(x)", "cos(x)").similarity.total(), 2);
}

#[test]
fn repeated_factors() {
    assert!(!compare("x x y", "x y y").equivalent);

    let comparison = compare("x x y - x y y", "0");
    assert!(!comparison.equivalent);
    assert!(!comparison.first.simplified.is_zero());
}

#[test]
fn arity_policy() {
    let truncate = compare("f(x, y)", "f(x, y, z)");
    assert_eq!(truncate.similarity.percentage(), 100.0);

    let options = CompareOptions::new().arity(ArityPolicy::Penalize);
    let penalize = compare_sources("f(x, y)", "f(x, y, z)", &options).unwrap();
    assert_float_relative_eq!(penalize.similarity.percentage(), 75.0);
}

#[test]
fn prefix_and_report() {
    let options = CompareOptions::new().prefix("v");
    let comparison = compare_sources("p * q", "q * p", &options).unwrap();
    assert!(comparison.equivalent);
    assert_eq!(comparison.to_string(), "\
equivalent: yes
similarity: 100.00% (1 / 1)
first formula:
  simplified: p * q
  normalized: v_1 * v_2
  mapping: p -> v_1, q -> v_2
second formula:
  simplified: q * p
  normalized: v_1 * v_2
  mapping: q -> v_1, p -> v_2
");
}

#[test]
fn renaming_invariance() {
    let a = compare("m^2 + 3m n", "x + y");
    let b = compare("s^2 + 3s t", "u + w");
    assert_eq!(a.similarity, b.similarity);
    assert_eq!(a.first.normalized, b.first.normalized);
}

/// Builds `f(f(f(...f(leaf)...)))`, nested `depth` times.
fn deep_chain(depth: usize, leaf: Node) -> Node {
    let mut node = leaf;
    for _ in 0..depth {
        node = Node::operator(Tag::Call("f".to_string()), vec![node]);
    }
    node
}

#[test]
fn deep_trees_do_not_overflow() {
    let a = deep_chain(100_000, Node::symbol("a"));
    let b = deep_chain(100_000, Node::symbol("b"));

    let (norm_a, mapping) = normalize(&a);
    let (norm_b, _) = normalize(&b);
    assert_eq!(mapping.get("a"), Some("x_1"));
    assert_eq!(norm_a, norm_b);
    assert_eq!(similarity(&norm_a, &norm_b).percentage(), 100.0);

    let c = deep_chain(100_000, Node::integer(2));
    let score = similarity_with(&norm_a, &c, ArityPolicy::Penalize);
    assert_eq!(score.total(), 100_001);
}

#[test]
fn deep_trees_are_not_simplified() {
    let a = deep_chain(100_000, Node::symbol("a"));
    let b = deep_chain(100_000, Node::symbol("b"));
    let err = formsim_compare::compare_trees(a, b, &CompareOptions::default()).unwrap_err();
    assert!(matches!(err, ComparisonError::Simplification(SimplifyError::TooDeep { .. })));
}
