//! Error types with diagnostics using miette
//!
//! Only programming-contract violations surface as errors. Degenerate input
//! (empty point lists, open freehand strokes, too-short lines) is handled by
//! fallbacks at the call site and never reaches this module.

use miette::Diagnostic;
use thiserror::Error;

use crate::element::ElementType;

/// Errors raised while building render or collision geometry
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ShapeError {
    #[error("unimplemented type {kind}")]
    #[diagnostic(
        code(sketch_shapes::unimplemented_type),
        help("add a branch for this element type to the shape generator")
    )]
    UnimplementedType { kind: ElementType },

    #[error("invalid {field} on element {element_id}: {value}")]
    #[diagnostic(code(sketch_shapes::invalid_dimension))]
    InvalidDimension {
        element_id: String,
        field: &'static str,
        value: f64,
    },
}

impl ShapeError {
    pub fn unimplemented(kind: ElementType) -> Self {
        ShapeError::UnimplementedType { kind }
    }
}
