//! Diagnostic rendering for parser errors.

use ariadne::{Color, Label, Report, ReportKind, Source};
use tinta_parse::{Diagnostic, DiagnosticKind, LexErrorKind, MAX_NESTING_DEPTH, SyntaxErrorKind};

/// Render a diagnostic with ariadne.
///
/// Returns a string containing the formatted error message with source
/// context.
pub fn render(diagnostic: &Diagnostic, filename: &str, source: &str) -> String {
    let mut output = Vec::new();
    write_report(diagnostic, filename, source, &mut output);
    String::from_utf8(output).unwrap_or_else(|_| diagnostic.to_string())
}

/// Write the diagnostic report to a writer.
pub fn write_report<W: std::io::Write>(
    diagnostic: &Diagnostic,
    filename: &str,
    source: &str,
    writer: W,
) {
    let report = build_report(diagnostic, filename);
    let _ = report
        .finish()
        .write((filename, Source::from(source)), writer);
}

fn build_report<'a>(
    diagnostic: &Diagnostic,
    filename: &'a str,
) -> ariadne::ReportBuilder<'static, (&'a str, std::ops::Range<usize>)> {
    let range = diagnostic.span.range();
    let label = Label::new((filename, range.clone()))
        .with_message(diagnostic.message.clone())
        .with_color(Color::Red);

    match diagnostic.kind {
        DiagnosticKind::Lex(LexErrorKind::InvalidEscape) => {
            Report::build(ReportKind::Error, (filename, range))
                .with_message("invalid escape sequence")
                .with_label(label)
                .with_help("valid escapes are: \\\", \\\\, \\n, \\r, \\t")
        }

        DiagnosticKind::Lex(LexErrorKind::UnterminatedString) => {
            Report::build(ReportKind::Error, (filename, range))
                .with_message("unterminated string")
                .with_label(label)
                .with_help("close the string before the end of the line")
        }

        DiagnosticKind::Lex(LexErrorKind::InvalidIdentifier) => {
            Report::build(ReportKind::Error, (filename, range))
                .with_message("invalid identifier")
                .with_label(label)
                .with_help(
                    "identifiers start with a letter, continue with letters, digits, '_' or '-', and cannot end with a hyphen",
                )
        }

        DiagnosticKind::Syntax(SyntaxErrorKind::UnterminatedBlock) => {
            Report::build(ReportKind::Error, (filename, range.clone()))
                .with_message("unterminated block")
                .with_label(
                    Label::new((filename, range))
                        .with_message("block opened here")
                        .with_color(Color::Red),
                )
                .with_help("add a closing '}'")
        }

        DiagnosticKind::Syntax(SyntaxErrorKind::MissingTerminator) => {
            Report::build(ReportKind::Error, (filename, range))
                .with_message("missing terminator")
                .with_label(label)
                .with_help("end the shorthand block with ';'")
        }

        DiagnosticKind::Syntax(SyntaxErrorKind::ExpectedText) => {
            Report::build(ReportKind::Error, (filename, range))
                .with_message("expected text")
                .with_label(label)
                .with_help("a shorthand block holds a single quoted text node")
        }

        DiagnosticKind::Syntax(SyntaxErrorKind::ExpectedBlockBody) => {
            Report::build(ReportKind::Error, (filename, range))
                .with_message("expected block body")
                .with_label(label)
                .with_help("a block header is followed by '{' or ':'")
        }

        DiagnosticKind::Syntax(SyntaxErrorKind::InvalidLabel) => {
            Report::build(ReportKind::Error, (filename, range))
                .with_message("invalid label")
                .with_label(label)
                .with_help("labels are @group, #anchor or $link, each with an identifier")
        }

        DiagnosticKind::Syntax(SyntaxErrorKind::ExpectedString) => {
            Report::build(ReportKind::Error, (filename, range))
                .with_message("expected string")
                .with_label(label)
                .with_help("shorthand text is double-quoted, optionally wrapped in '*'")
        }

        DiagnosticKind::Syntax(SyntaxErrorKind::EmptyTypeChain) => {
            Report::build(ReportKind::Error, (filename, range))
                .with_message("empty type chain")
                .with_label(label)
                .with_help("a block header needs at least one type name")
        }

        DiagnosticKind::Syntax(SyntaxErrorKind::NestingTooDeep) => {
            Report::build(ReportKind::Error, (filename, range))
                .with_message("nesting too deep")
                .with_label(label)
                .with_help(format!(
                    "blocks may nest at most {MAX_NESTING_DEPTH} levels"
                ))
        }
    }
}
