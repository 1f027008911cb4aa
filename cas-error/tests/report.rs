use ariadne::Fmt;
use cas_attrs::ErrorKind;
use cas_error::{Error, ErrorKind, EXPR};

#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unknown symbol `{}`", name),
    labels = [format!("this {} is not defined", "symbol".fg(EXPR))],
    help = "check the spelling",
)]
struct UnknownSymbol {
    name: String,
}

#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = "nothing to see here", labels = [""])]
struct Quiet;

/// Renders the report of the error to a plain string.
fn render(err: &Error, input: &str) -> String {
    let mut out = Vec::new();
    err.write_report("input", input, &mut out).unwrap();
    String::from_utf8(strip_ansi_escapes::strip(out)).unwrap()
}

#[test]
fn message_and_display() {
    let err = Error::new(vec![0..3], UnknownSymbol { name: "foo".to_string() });
    assert_eq!(err.kind.message(), "unknown symbol `foo`");
    assert_eq!(err.to_string(), "unknown symbol `foo`");
}

#[test]
fn downcast_kind() {
    let err = Error::new(vec![0..3], UnknownSymbol { name: "foo".to_string() });
    assert!(err.is::<UnknownSymbol>());
    assert!(!err.is::<Quiet>());
    assert_eq!(err.downcast_ref::<UnknownSymbol>().unwrap().name, "foo");
}

#[test]
fn report_contains_labels() {
    let err = Error::new(vec![4..7], UnknownSymbol { name: "foo".to_string() });
    let report = render(&err, "1 + foo");
    assert!(report.contains("unknown symbol `foo`"));
    assert!(report.contains("this symbol is not defined"));
    assert!(report.contains("check the spelling"));
}

#[test]
fn report_without_spans() {
    let err = Error::new(Vec::new(), Quiet);
    let report = render(&err, "x");
    assert!(report.contains("nothing to see here"));
}
