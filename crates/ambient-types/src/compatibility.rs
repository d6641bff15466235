//! Structural compatibility and overload selection.
//!
//! This is the minimum a call site needs from the merged table: given the
//! argument types at a call, pick the first overload that accepts them.
//! `any` is compatible with everything in both directions.

use crate::types::{CallableSignature, Type};
use tracing::trace;

/// Whether a value of type `source` may be passed where `target` is expected.
pub fn is_assignable_to(source: &Type, target: &Type) -> bool {
    match (source, target) {
        (Type::Any, _) | (_, Type::Any) => true,
        (Type::Function(source), Type::Function(target)) => {
            is_signature_assignable_to(source, target)
        }
        // Unresolved names only compare equal to themselves.
        _ => source == target,
    }
}

/// Whether a callable with signature `source` may stand in for `target`.
///
/// Parameters are compared bivariantly and the source may take fewer
/// parameters than the target supplies, as with callbacks.
fn is_signature_assignable_to(source: &CallableSignature, target: &CallableSignature) -> bool {
    if source.min_arity() > target.parameters.len() && target.max_arity().is_some() {
        return false;
    }

    let parameters_ok = source
        .parameters
        .iter()
        .zip(&target.parameters)
        .all(|(s, t)| is_assignable_to(&t.ty, &s.ty) || is_assignable_to(&s.ty, &t.ty));

    let returns_ok = matches!(target.return_type, Type::Void)
        || is_assignable_to(&source.return_type, &target.return_type);

    parameters_ok && returns_ok
}

impl CallableSignature {
    /// Whether a call with these argument types matches this signature.
    pub fn accepts_arguments(&self, arguments: &[Type]) -> bool {
        if arguments.len() < self.min_arity() {
            return false;
        }
        if let Some(max) = self.max_arity()
            && arguments.len() > max
        {
            return false;
        }

        let rest = self.parameters.iter().find(|p| p.variadic);
        arguments.iter().enumerate().all(|(index, argument)| {
            let parameter = match self.parameters.get(index) {
                Some(parameter) if !parameter.variadic => parameter,
                _ => match rest {
                    Some(rest) => rest,
                    None => return false,
                },
            };
            is_assignable_to(argument, &parameter.ty)
        })
    }
}

/// Pick the first signature that accepts `arguments`.
///
/// Overload lists are ordered by priority, so the first compatible entry wins
/// even when a later one would match more precisely. Returns the index of the
/// chosen overload along with it.
pub fn resolve_overload<'a>(
    signatures: impl IntoIterator<Item = &'a CallableSignature>,
    arguments: &[Type],
) -> Option<(usize, &'a CallableSignature)> {
    let chosen = signatures
        .into_iter()
        .enumerate()
        .find(|(_, signature)| signature.accepts_arguments(arguments));
    trace!(
        arguments = arguments.len(),
        chosen = ?chosen.map(|(index, _)| index),
        "resolve_overload"
    );
    chosen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Parameter;

    fn stringify() -> CallableSignature {
        CallableSignature::new(
            vec![
                Parameter::required("object", Type::Any),
                Parameter::optional("toEncodable", Type::untyped_function()),
            ],
            Type::Any,
        )
    }

    #[test]
    fn any_is_compatible_both_ways() {
        assert!(is_assignable_to(&Type::Any, &Type::String));
        assert!(is_assignable_to(&Type::Void, &Type::Any));
        assert!(!is_assignable_to(&Type::String, &Type::Void));
    }

    #[test]
    fn optional_parameter_may_be_omitted() {
        let signature = stringify();
        assert!(signature.accepts_arguments(&[Type::String]));
        assert!(signature.accepts_arguments(&[Type::String, Type::untyped_function()]));
        assert!(!signature.accepts_arguments(&[]));
        assert!(!signature.accepts_arguments(&[Type::Any, Type::Any, Type::Any]));
    }

    #[test]
    fn optional_function_parameter_rejects_string() {
        assert!(!stringify().accepts_arguments(&[Type::Any, Type::String]));
    }

    #[test]
    fn rest_parameter_accepts_any_count() {
        let log =
            CallableSignature::new(vec![Parameter::variadic("objects", Type::Any)], Type::Void);
        assert!(log.accepts_arguments(&[]));
        assert!(log.accepts_arguments(&[Type::String, Type::Void, Type::Any]));
    }

    #[test]
    fn first_compatible_overload_wins() {
        let by_string =
            CallableSignature::new(vec![Parameter::required("x", Type::String)], Type::String);
        let by_any = CallableSignature::new(vec![Parameter::required("x", Type::Any)], Type::Void);
        let overloads = [by_string.clone(), by_any.clone()];

        let (index, chosen) = resolve_overload(&overloads, &[Type::String]).unwrap();
        assert_eq!(index, 0);
        assert_eq!(chosen, &by_string);

        let (index, _) = resolve_overload(&overloads, &[Type::untyped_function()]).unwrap();
        assert_eq!(index, 1);

        assert!(resolve_overload(&overloads, &[]).is_none());
    }
}
