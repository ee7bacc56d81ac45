//! Tests for the type notation parser

mod test_notation_errors;
mod test_type_notation;
