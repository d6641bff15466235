//! Parameter-list validation.
//!
//! A well-formed parameter list is: required parameters, then optional ones,
//! then at most one rest parameter in the last position. Nested function types
//! are held to the same rule.

use crate::types::{CallableSignature, Type};
use std::fmt;

/// Why a parameter list is malformed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignatureError {
    /// `parameter` is required but follows the optional or variadic `after`.
    RequiredAfterOptional { parameter: String, after: String },
    /// A second rest parameter `parameter` appears after `first`.
    MultipleVariadic { parameter: String, first: String },
    /// The rest parameter `parameter` is followed by another parameter.
    VariadicNotLast { parameter: String },
}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequiredAfterOptional { parameter, after } => write!(
                f,
                "required parameter '{parameter}' cannot follow optional parameter '{after}'"
            ),
            Self::MultipleVariadic { parameter, first } => write!(
                f,
                "rest parameter '{parameter}' duplicates rest parameter '{first}'"
            ),
            Self::VariadicNotLast { parameter } => {
                write!(f, "rest parameter '{parameter}' must be the last parameter")
            }
        }
    }
}

impl std::error::Error for SignatureError {}

impl CallableSignature {
    /// Check the parameter ordering rules, nested function types included.
    pub fn validate(&self) -> Result<(), SignatureError> {
        let mut first_omittable: Option<&str> = None;
        let mut first_variadic: Option<&str> = None;

        for parameter in &self.parameters {
            if parameter.variadic {
                if let Some(first) = first_variadic {
                    return Err(SignatureError::MultipleVariadic {
                        parameter: parameter.name.clone(),
                        first: first.to_string(),
                    });
                }
                first_variadic = Some(parameter.name.as_str());
            } else if !parameter.optional
                && let Some(after) = first_omittable
            {
                return Err(SignatureError::RequiredAfterOptional {
                    parameter: parameter.name.clone(),
                    after: after.to_string(),
                });
            }

            if first_omittable.is_none() && parameter.may_be_omitted() {
                first_omittable = Some(parameter.name.as_str());
            }

            if let Type::Function(nested) = &parameter.ty {
                nested.validate()?;
            }
        }

        // Only an optional parameter can still trail the rest parameter here.
        if let Some(position) = self.parameters.iter().position(|p| p.variadic)
            && position + 1 != self.parameters.len()
        {
            return Err(SignatureError::VariadicNotLast {
                parameter: self.parameters[position].name.clone(),
            });
        }

        if let Type::Function(nested) = &self.return_type {
            nested.validate()?;
        }
        Ok(())
    }
}
