use miette::{Diagnostic, NamedSource, SourceSpan};
use schema_tree_core::SchemaError;

use crate::error::CliError;

/// A description-file syntax error rendered with a source snippet.
///
/// The module-level `#[allow(unused_assignments)]` in main.rs is required
/// because miette's derive macro generates assignment patterns that rustc
/// flags as unused.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct DescriptionDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("{label}")]
    span: SourceSpan,

    message: String,
    label: String,

    #[help]
    suggestion: Option<String>,
}

/// Builds a diagnostic for an [`SchemaError::InvalidDescription`]; other
/// errors carry no position and yield `None`.
pub fn description_diagnostic(
    error: &SchemaError,
    source: &str,
    filename: &str,
) -> Option<DescriptionDiagnostic> {
    let SchemaError::InvalidDescription {
        message,
        line,
        column,
    } = error
    else {
        return None;
    };

    let offset = byte_offset(source, *line, *column);
    let len = usize::from(offset < source.len());
    Some(DescriptionDiagnostic {
        src: NamedSource::new(filename, source.to_string()),
        span: (offset, len).into(),
        message: format!("invalid description: {message}"),
        label: label_for(message).to_string(),
        suggestion: suggestion_for(message),
    })
}

/// The miette report for a CLI error, when it has a source position.
pub fn description_report(err: &CliError) -> Option<miette::Report> {
    let CliError::Description {
        error,
        source_text,
        file,
    } = err
    else {
        return None;
    };
    description_diagnostic(error, source_text, &file.display().to_string())
        .map(miette::Report::new)
}

/// Converts serde_json's one-based line and column into a byte offset,
/// clamped to the source and moved back onto a char boundary.
fn byte_offset(source: &str, line: usize, column: usize) -> usize {
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    let mut offset = (line_start + column.saturating_sub(1)).min(source.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

fn label_for(message: &str) -> &'static str {
    if message.starts_with("EOF") {
        "input ended here"
    } else if message.starts_with("unknown variant") {
        "unknown value"
    } else if message.starts_with("missing field") {
        "in this object"
    } else {
        "here"
    }
}

fn suggestion_for(message: &str) -> Option<String> {
    if message.starts_with("EOF") {
        Some("Check for an unclosed '{' or '['.".to_string())
    } else if message.starts_with("trailing comma") {
        Some("Remove the comma after the last element.".to_string())
    } else if message.starts_with("unknown variant") {
        Some(
            "Node kinds are container, leaf, leaf-list, list, choice, case, anydata, anyxml, \
             uses, grouping, rpc, action, input, output and notification."
                .to_string(),
        )
    } else if let Some(field) = message.strip_prefix("missing field ") {
        let field = field.split_whitespace().next().unwrap_or(field);
        Some(format!("Add {field} to the object."))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn invalid(message: &str, line: usize, column: usize) -> SchemaError {
        SchemaError::InvalidDescription {
            message: message.into(),
            line,
            column,
        }
    }

    #[test]
    fn offset_counts_previous_lines() {
        let src = "{\n  \"modules\": x\n}";
        assert_eq!(byte_offset(src, 1, 1), 0);
        assert_eq!(byte_offset(src, 2, 14), 15);
        assert_eq!(&src[15..16], "x");
    }

    #[test]
    fn offset_is_clamped() {
        assert_eq!(byte_offset("{}", 9, 9), 2);
        assert_eq!(byte_offset("{}", 1, 0), 0);
    }

    #[test]
    fn offset_stays_on_char_boundary() {
        let src = "\"é\"";
        assert!(src.is_char_boundary(byte_offset(src, 1, 3)));
    }

    #[test]
    fn eof_diagnostic() {
        let err = invalid("EOF while parsing an object at line 1 column 1", 1, 1);
        let diag = description_diagnostic(&err, "{", "broken.json").unwrap();
        assert!(diag.message.contains("EOF"));
        assert_eq!(diag.label, "input ended here");
        assert!(diag.suggestion.unwrap().contains("unclosed"));
    }

    #[test]
    fn unknown_kind_diagnostic() {
        let err = invalid("unknown variant `contianer`, expected one of ...", 1, 20);
        let diag = description_diagnostic(&err, r#"{"kind": "contianer"}"#, "a.json").unwrap();
        assert_eq!(diag.label, "unknown value");
        assert!(diag.suggestion.unwrap().contains("container"));
    }

    #[test]
    fn missing_field_diagnostic() {
        let err = invalid("missing field `name` at line 1 column 2", 1, 2);
        let diag = description_diagnostic(&err, "{}", "a.json").unwrap();
        assert_eq!(diag.suggestion.as_deref(), Some("Add `name` to the object."));
    }

    #[test]
    fn positionless_errors_have_no_diagnostic() {
        let err = SchemaError::UnknownModule("x".into());
        assert!(description_diagnostic(&err, "{}", "a.json").is_none());
    }

    #[test]
    fn report_only_for_description_errors() {
        let err = CliError::Description {
            error: invalid("expected value", 1, 1),
            source_text: "x".into(),
            file: PathBuf::from("a.json"),
        };
        assert!(description_report(&err).is_some());
        assert!(description_report(&CliError::Other("x".into())).is_none());
    }
}
