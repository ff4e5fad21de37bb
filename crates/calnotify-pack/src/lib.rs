//! The formula surface exposed to the host runtime.
//!
//! Declares the four notification formulas, coerces raw host arguments
//! into typed values, runs the matching operation and renders the result.

pub mod coerce;
pub mod error;
pub mod error_mapping;
pub mod formulas;
pub mod schema;

pub use error::FormulaError;
pub use formulas::{invoke, InvokeOptions};
pub use schema::{pack, FormulaDef, FormulaKind, PackDefinition, ParamDef, ParameterType, ResultType};
