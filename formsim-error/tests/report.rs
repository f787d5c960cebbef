use formsim_attrs::ErrorKind;
use formsim_error::Error;
use pretty_assertions::assert_eq;

#[derive(Debug, ErrorKind)]
#[error(
    message = "unknown operator",
    labels = ["this operator".to_string()],
    help = format!("did you mean `{}`?", suggestion),
)]
struct UnknownOperator {
    suggestion: String,
}

#[derive(Debug, ErrorKind)]
#[error(message = "nothing to compare", labels = Vec::<String>::new())]
struct NothingToCompare;

fn render(err: &Error, input: &str) -> String {
    let mut out = Vec::new();
    err.write_report("input", input, &mut out).unwrap();
    String::from_utf8(strip_ansi_escapes::strip(out)).unwrap()
}

#[test]
fn report_contains_message_and_help() {
    let err = Error::new(vec![2..3], UnknownOperator { suggestion: "*".to_string() });
    let report = render(&err, "x # y");

    assert!(report.contains("unknown operator"), "{report}");
    assert!(report.contains("this operator"), "{report}");
    assert!(report.contains("did you mean `*`?"), "{report}");
}

#[test]
fn display_uses_message_and_first_span() {
    let err = Error::new_fatal(vec![4..7, 0..1], UnknownOperator { suggestion: "+".to_string() });
    assert!(err.fatal);
    assert_eq!(err.to_string(), "unknown operator (at 4..7)");
}

#[test]
fn unit_struct_without_spans() {
    let err = Error::new(Vec::new(), NothingToCompare);
    assert_eq!(err.to_string(), "nothing to compare");
    let report = render(&err, "");
    assert!(report.contains("nothing to compare"), "{report}");
}
