//! Type compatibility checking
//!
//! Decides whether a value of type `got` may occupy a slot declared as `want`.
//! Interfaces are matched structurally against the actual method set; every
//! other declared type requires `got` to be both convertible and assignable,
//! so convertibility alone never makes two types compatible.

use crate::error::CompatibilityError;
use crate::types::{ChanDir, Kind, Primitive, Type, Underlying};

/// Check whether `got` may stand in for `want`.
///
/// `got == None` is an untyped nil: it is accepted exactly when `want` is of a
/// nilable kind (pointer, sequence, mapping, channel, function, interface).
pub fn check_compatibility(want: &Type, got: Option<&Type>) -> Result<(), CompatibilityError> {
    let Some(got) = got else {
        if want.is_nilable() {
            return Ok(());
        }
        return Err(CompatibilityError::NotNilable { want: want.clone() });
    };

    if want.kind() == Kind::Interface {
        let missing = missing_methods(got, want);
        if !missing.is_empty() {
            return Err(CompatibilityError::NotImplementing {
                want: want.clone(),
                got: got.clone(),
                missing,
            });
        }
        return Ok(());
    }

    if !convertible_to(got, want) {
        return Err(CompatibilityError::NotConvertible {
            want: want.clone(),
            got: got.clone(),
        });
    }
    if !assignable_to(got, want) {
        return Err(CompatibilityError::NotAssignable {
            want: want.clone(),
            got: got.clone(),
        });
    }
    Ok(())
}

/// Methods of the interface `iface` that `ty` lacks or declares with a
/// different signature. Empty when `ty` implements `iface`, and also when
/// `iface` is not an interface at all.
pub fn missing_methods(ty: &Type, iface: &Type) -> Vec<String> {
    let Some(required) = iface.as_interface() else {
        return Vec::new();
    };
    required
        .sorted()
        .into_iter()
        .filter(|(name, signature)| ty.method(name) != Some(*signature))
        .map(|(name, _)| name.to_string())
        .collect()
}

/// Whether `ty` satisfies every method of the interface `iface`
pub fn implements(ty: &Type, iface: &Type) -> bool {
    iface.kind() == Kind::Interface && missing_methods(ty, iface).is_empty()
}

/// Whether a value of type `got` can be assigned to a slot of type `want`
/// without conversion.
pub fn assignable_to(got: &Type, want: &Type) -> bool {
    if got == want {
        return true;
    }
    if implements(got, want) {
        return true;
    }

    let one_side_unnamed = got.name().is_none() || want.name().is_none();
    if one_side_unnamed && got.underlying() == want.underlying() {
        return true;
    }

    // A bidirectional channel can be narrowed to a directional one
    match (got.underlying(), want.underlying()) {
        (
            Underlying::Channel {
                dir: ChanDir::Both,
                elem: got_elem,
            },
            Underlying::Channel { elem: want_elem, .. },
        ) => one_side_unnamed && got_elem == want_elem,
        _ => false,
    }
}

/// Whether a value of type `got` can be explicitly converted to `want`
pub fn convertible_to(got: &Type, want: &Type) -> bool {
    if assignable_to(got, want) {
        return true;
    }
    if got.underlying() == want.underlying() {
        return true;
    }

    match (got.underlying(), want.underlying()) {
        (Underlying::Pointer(got_target), Underlying::Pointer(want_target)) => {
            got.name().is_none()
                && want.name().is_none()
                && got_target.underlying() == want_target.underlying()
        }
        (Underlying::Primitive(from), Underlying::Primitive(to)) => {
            (from.is_numeric() && to.is_numeric())
                || (from.is_integer() && *to == Primitive::String)
        }
        (Underlying::Sequence(elem), Underlying::Primitive(Primitive::String))
        | (Underlying::Primitive(Primitive::String), Underlying::Sequence(elem)) => {
            is_byte_or_rune(elem)
        }
        _ => false,
    }
}

fn is_byte_or_rune(ty: &Type) -> bool {
    matches!(
        ty.underlying(),
        Underlying::Primitive(Primitive::Uint8) | Underlying::Primitive(Primitive::Int32)
    )
}
