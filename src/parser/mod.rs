mod common;
mod python;

pub use common::{Declaration, ParsedUnit, Parser, IMPLICIT_RECEIVERS, INITIALIZER_NAME};
pub use python::PythonParser;
