//! Structural matching of callables and interfaces.
//!
//! Signature rules, candidate against expected:
//! - a candidate with `*args` or `**kwargs` never matches
//! - parameters match by position and name
//! - surplus trailing candidate parameters must have defaults
//! - an unannotated expected parameter accepts anything
//! - an annotated expected parameter needs an annotated candidate parameter
//!   whose spec is a subtype of it; a missing annotation is a mismatch
//! - the return spec follows the same rule
//!
//! Failures are explained at `trace` level.

use super::{is_subtype, satisfies};
use crate::runtime::{CallableProbe, Class, StaticMember, Value, get_attribute, probe_callable};
use crate::spec::{Interface, Member, Param, Signature, TypeSpec};
use conform_log::trace;

fn annotation_conforms(candidate: Option<&TypeSpec>, expected: Option<&TypeSpec>) -> bool {
    match (candidate, expected) {
        (_, None) => true,
        (None, Some(_)) => false,
        (Some(candidate), Some(expected)) => is_subtype(candidate, expected),
    }
}

fn param_conforms(candidate: &Param, expected: &Param) -> bool {
    if candidate.name() != expected.name() {
        trace!(
            "parameter '{}' found where '{}' was expected",
            candidate.name(),
            expected.name()
        );
        return false;
    }
    if !annotation_conforms(candidate.annotation(), expected.annotation()) {
        trace!(
            "parameter '{}' is {} but {} is required",
            candidate.name(),
            candidate
                .annotation()
                .map_or_else(|| "unannotated".to_string(), ToString::to_string),
            expected
                .annotation()
                .map_or_else(|| "anything".to_string(), ToString::to_string),
        );
        return false;
    }
    true
}

/// Checks whether a callable with signature `candidate` can stand in for
/// one with signature `expected`.
#[must_use]
pub fn signature_conforms(candidate: &Signature, expected: &Signature) -> bool {
    if candidate.is_variadic() {
        trace!("signature {candidate} is variadic");
        return false;
    }

    let expected_params = expected.params();
    let candidate_params = candidate.params();
    if candidate_params.len() < expected_params.len() {
        trace!("signature {candidate} takes fewer parameters than {expected}");
        return false;
    }
    if let Some(extra) = candidate_params[expected_params.len()..]
        .iter()
        .find(|param| !param.has_default())
    {
        trace!(
            "signature {candidate} requires extra parameter '{}'",
            extra.name()
        );
        return false;
    }

    if !candidate_params
        .iter()
        .zip(expected_params)
        .all(|(c, e)| param_conforms(c, e))
    {
        return false;
    }

    if !annotation_conforms(candidate.returns(), expected.returns()) {
        trace!("return of {candidate} does not conform to {expected}");
        return false;
    }
    true
}

/// Checks whether a live value is a callable conforming to `expected`.
pub(crate) fn callable_conforms(value: &Value, expected: &Signature) -> bool {
    match probe_callable(value) {
        CallableProbe::NotCallable => {
            trace!("{} is not callable", value.class().name());
            false
        }
        CallableProbe::Opaque => true,
        CallableProbe::Inspected(signature) => signature_conforms(signature, expected),
    }
}

/// Checks every member of `interface` (inherited ones included) on a live
/// value.
pub(crate) fn value_implements(value: &Value, interface: &Interface) -> bool {
    for (name, member) in interface.all_members() {
        let Some(found) = get_attribute(value, name) else {
            trace!(
                "{} lacks member '{name}' required by {}",
                value.class().name(),
                interface.name()
            );
            return false;
        };

        let conforms = match member {
            Member::Attribute(spec) => satisfies(&found, spec),
            Member::Method(signature) => callable_conforms(&found, signature),
        };
        if !conforms {
            trace!(
                "member '{name}' of {} does not conform to {}",
                value.class().name(),
                interface.name()
            );
            return false;
        }
    }
    true
}

/// Checks the methods of `interface` against a class without an instance.
///
/// Attributes are instance state and are not checked.
pub(crate) fn class_implements(class: &Class, interface: &Interface) -> bool {
    for (name, member) in interface.all_members() {
        let Member::Method(expected) = member else {
            continue;
        };

        let conforms = match crate::runtime::lookup_static(class, name) {
            Some(StaticMember::Method(method)) => method
                .signature()
                .is_none_or(|signature| signature_conforms(signature, expected)),
            Some(StaticMember::Attribute(attribute)) => callable_conforms(&attribute, expected),
            None => false,
        };
        if !conforms {
            trace!(
                "class {} does not provide method '{name}' of {}",
                class.name(),
                interface.name()
            );
            return false;
        }
    }
    true
}

/// Checks that `narrow` declares every member of `wide` compatibly.
pub(crate) fn interface_extends(narrow: &Interface, wide: &Interface) -> bool {
    if narrow.extends(wide) {
        return true;
    }
    wide.all_members().into_iter().all(|(name, wanted)| {
        match (narrow.member(name), wanted) {
            (Some(Member::Attribute(have)), Member::Attribute(want)) => is_subtype(have, want),
            (Some(Member::Method(have)), Member::Method(want)) => signature_conforms(have, want),
            _ => {
                trace!(
                    "{} has no compatible member '{name}' of {}",
                    narrow.name(),
                    wide.name()
                );
                false
            }
        }
    })
}
