//! Type validation and input casting against the builtin tags.

use slate_ast::ty::TypeTag;
use slate_ast::Span;

use crate::interp::RuntimeError;
use crate::value::Value;

/// Validate a value against a declared tag.
pub fn validate(value: &Value, expected: TypeTag, span: Span) -> Result<(), RuntimeError> {
    if value.tag() == Some(expected) {
        Ok(())
    } else {
        Err(RuntimeError::TypeCheck { given: value.type_name(), expected, span })
    }
}

/// Validate a call argument against a procedure parameter, carrying the
/// procedure and parameter names in the failure.
pub fn validate_param(
    value: &Value,
    expected: TypeTag,
    procedure: &str,
    parameter: &str,
    span: Span,
) -> Result<(), RuntimeError> {
    if value.tag() == Some(expected) {
        Ok(())
    } else {
        Err(RuntimeError::ParamTypeCheck {
            given: value.type_name(),
            expected,
            procedure: procedure.to_string(),
            parameter: parameter.to_string(),
            span,
        })
    }
}

/// Cast one line of user input to the given tag. `None` means the INPUT
/// statement re-prompts; a cast failure never escapes.
pub fn cast_input(text: &str, tag: TypeTag) -> Option<Value> {
    match tag {
        TypeTag::String => Some(Value::Str(text.to_string())),
        TypeTag::Integer => text.trim().parse::<i64>().ok().map(Value::Int),
        TypeTag::Float => text.trim().parse::<f64>().ok().map(Value::Float),
        TypeTag::Boolean => match text.trim().to_lowercase().as_str() {
            "true" | "1" => Some(Value::Bool(true)),
            "false" | "0" => Some(Value::Bool(false)),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_matches_tag() {
        let span = Span::new(0, 0);
        assert!(validate(&Value::Int(1), TypeTag::Integer, span).is_ok());
        let err = validate(&Value::Str("hi".into()), TypeTag::Integer, span).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected type INTEGER; received STRING instead"
        );
    }

    #[test]
    fn param_failure_carries_context() {
        let err = validate_param(
            &Value::Bool(true),
            TypeTag::Float,
            "scale",
            "factor",
            Span::new(0, 0),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "In parameter factor in scale, expected type FLOAT; received BOOLEAN instead"
        );
    }

    #[test]
    fn input_casts() {
        assert!(matches!(cast_input("42", TypeTag::Integer), Some(Value::Int(42))));
        assert!(matches!(cast_input(" 2.5 ", TypeTag::Float), Some(Value::Float(_))));
        assert!(matches!(cast_input("TRUE", TypeTag::Boolean), Some(Value::Bool(true))));
        assert!(matches!(cast_input("0", TypeTag::Boolean), Some(Value::Bool(false))));
        assert!(cast_input("forty", TypeTag::Integer).is_none());
        assert!(cast_input("yes", TypeTag::Boolean).is_none());
        // Strings take the line as-is
        assert!(matches!(cast_input("  spaced  ", TypeTag::String), Some(Value::Str(s)) if s == "  spaced  "));
    }
}
