//! Go source renderer.
//!
//! Rendering is two passes. [`printer`] walks the syntax tree and emits
//! loosely laid out text, marking alignment cells with `\x0b`. [`format`]
//! then canonicalizes it: indentation by bracket depth, gofmt-style column
//! alignment, sorted imports and normalized blank lines. The same tree
//! always renders to the same bytes.

pub mod format;
pub mod printer;

use layer_core::{
    application::{ApplicationError, ports::SourceRenderer},
    domain::SourceFile,
    error::LayerResult,
};
use thiserror::Error;
use tracing::{instrument, trace};

/// Composition errors found while rendering.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("empty identifier in {context}")]
    EmptyIdentifier { context: &'static str },

    #[error("'{name}' is not a valid Go identifier")]
    InvalidIdentifier { name: String },

    #[error("file has no package name")]
    EmptyPackage,

    #[error("import with an empty path")]
    EmptyImportPath,

    #[error("ungrouped import declaration with {count} specs")]
    UngroupedImport { count: usize },

    #[error("assignment of {rhs} value(s) to {lhs} operand(s)")]
    AssignmentArity { lhs: usize, rhs: usize },

    #[error("key-value expression outside a composite literal")]
    KeyValueOutsideComposite,

    #[error("range clause has a value but no key")]
    RangeValueWithoutKey,

    #[error("unbalanced brackets at line {line}")]
    UnbalancedBrackets { line: usize },
}

pub type RenderResult<T> = Result<T, RenderError>;

/// [`SourceRenderer`] producing gofmt-compatible Go source.
#[derive(Debug, Default, Clone, Copy)]
pub struct GoRenderer;

impl GoRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Both passes, with render errors kept typed.
    pub fn render_source(&self, file: &SourceFile) -> RenderResult<String> {
        let raw = printer::print_file(file)?;
        trace!(bytes = raw.len(), "Printed");
        format::canonicalize(&raw)
    }
}

impl SourceRenderer for GoRenderer {
    #[instrument(skip_all, fields(package = %file.package))]
    fn render(&self, file: &SourceFile) -> LayerResult<String> {
        self.render_source(file).map_err(|e| {
            ApplicationError::RenderingFailed {
                file: format!("package {}", file.package),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layer_core::domain::builder::*;

    #[test]
    fn renders_a_small_program() {
        let src = file(
            "main",
            vec![
                imports([import("log")]),
                func(
                    "main",
                    vec![],
                    vec![],
                    vec![expr_stmt(selector_call("log.Println", vec![string_lit("hi")]))],
                ),
            ],
        );

        let out = GoRenderer::new().render_source(&src).unwrap();
        assert_eq!(
            out,
            "package main\n\nimport \"log\"\n\nfunc main() {\n\tlog.Println(\"hi\")\n}\n"
        );
    }

    #[test]
    fn render_errors_become_application_errors() {
        let src = file("", vec![]);
        let err = GoRenderer::new().render(&src).unwrap_err();
        assert!(err.to_string().contains("no package name"));
    }
}
