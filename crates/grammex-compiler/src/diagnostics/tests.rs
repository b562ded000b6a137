use grammex_core::Location;

use super::*;

#[test]
fn severity_display() {
    insta::assert_snapshot!(format!("{}", Severity::Error), @"error");
    insta::assert_snapshot!(format!("{}", Severity::Warning), @"warning");
}

#[test]
fn report_with_default_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::LeftRecursion, Location::new(1, 1))
        .emit();

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.has_errors());
    assert!(!diagnostics.has_warnings());
    insta::assert_snapshot!(diagnostics.render(), @"error at 1:1: left recursion detected");
}

#[test]
fn report_with_custom_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::EmptyLoopBody, Location::new(4, 7))
        .message("(...)+")
        .emit();

    insta::assert_snapshot!(
        diagnostics.render(),
        @"error at 4:7: expansion within `(...)+` can be matched by the empty string"
    );
}

#[test]
fn counts_by_severity() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::InvalidCharRange, Location::new(1, 1))
        .emit();
    diagnostics
        .report(DiagnosticKind::ChoiceConflict, Location::new(2, 1))
        .emit();
    diagnostics
        .report(DiagnosticKind::LoopConflict, Location::new(3, 1))
        .emit();

    assert_eq!(diagnostics.error_count(), 1);
    assert_eq!(diagnostics.warning_count(), 2);
    assert_eq!(diagnostics.of_kind(DiagnosticKind::ChoiceConflict).count(), 1);
}

#[test]
fn default_hint_and_related() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::EmptyAlternative, Location::new(2, 5))
        .related_to("later choice", Location::new(3, 5))
        .emit();

    let diag = diagnostics.iter().next().unwrap();
    assert_eq!(diag.severity(), Severity::Warning);
    assert_eq!(diag.related()[0].location(), Location::new(3, 5));
    insta::assert_snapshot!(
        diagnostics.render(),
        @"warning at 2:5: choice can expand to the empty token sequence (related: later choice at 3:5) (hint: this choice is always taken in favor of the choices appearing later)"
    );
}

#[test]
fn plain_rendering_separates_lines() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::RegexLoop, Location::new(1, 2))
        .message("\"A --> B --> A\"")
        .emit();
    diagnostics
        .report(DiagnosticKind::UnmatchableRegex, Location::new(5, 1))
        .message("<IF> can never be matched as <ID>")
        .emit();

    insta::assert_snapshot!(diagnostics.render(), @r#"
    error at 1:2: loop in regular expression detected: "A --> B --> A"
    warning at 5:1: regular expression choice <IF> can never be matched as <ID>
    "#);
}

#[test]
fn annotated_rendering_with_source() {
    let source = "Start : A B ;\nA : Start ;\n";
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::LeftRecursion, Location::new(2, 5))
        .message("\"Start... --> A... --> Start...\"")
        .emit();

    let output = diagnostics.printer().source(source).path("calc.jj").render();

    assert!(output.contains("error: left recursion detected"));
    assert!(output.contains("calc.jj"));
    assert!(output.contains("A : Start ;"));
}

#[test]
fn location_span_clamps() {
    let source = "ab\ncd";

    assert_eq!(printer::location_span(source, Location::new(1, 1)), 0..1);
    assert_eq!(printer::location_span(source, Location::new(2, 2)), 4..5);
    assert_eq!(printer::location_span(source, Location::new(1, 9)), 2..3);
    assert_eq!(printer::location_span(source, Location::new(7, 1)), 5..5);
}
