//! Descriptor rules checked with Validation.

use crate::core::{NamingConvention, OperationId, Phase, ERROR_FIELD, PENDING_FIELD};
use crate::descriptor::ResourceDescriptor;
use crate::validation::violations::{DescriptorError, DescriptorViolation};
use std::collections::HashMap;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Accumulated outcome of checking a descriptor.
pub type DescriptorValidation = Validation<(), NonEmptyVec<DescriptorViolation>>;

/// An operation that claimed a name first.
struct Claim<'a> {
    owner: &'a OperationId,
    shared: bool,
}

/// Check every descriptor rule, accumulating ALL violations.
///
/// Returns `Validation::Success(())` for a well-formed descriptor,
/// otherwise `Validation::Failure` with every violation found.
pub fn validate(descriptor: &ResourceDescriptor, naming: &NamingConvention) -> DescriptorValidation {
    let mut checks: Vec<DescriptorValidation> = Vec::new();

    for field in [PENDING_FIELD, ERROR_FIELD] {
        let check = if descriptor.base_state().contains_key(field) {
            Validation::fail(DescriptorViolation::ReservedBaseField {
                field: field.to_string(),
            })
        } else {
            Validation::success(())
        };
        checks.push(check);
    }

    let mut properties: HashMap<&str, Claim<'_>> = HashMap::new();
    let mut dispatches: HashMap<&str, &OperationId> = HashMap::new();
    let mut commit_names: HashMap<String, (&OperationId, Phase)> = HashMap::new();

    for (id, spec) in descriptor.operations() {
        if [PENDING_FIELD, ERROR_FIELD].contains(&spec.property.as_str()) {
            checks.push(Validation::fail(DescriptorViolation::ReservedProperty {
                operation: id.clone(),
                property: spec.property.clone(),
            }));
        }

        for (field, value) in [
            ("property", &spec.property),
            ("commit string", &spec.commit_string),
            ("dispatch string", &spec.dispatch_string),
        ] {
            if value.is_empty() {
                checks.push(Validation::fail(DescriptorViolation::EmptyField {
                    operation: id.clone(),
                    field,
                }));
            }
        }

        match properties.get(spec.property.as_str()) {
            Some(claim) if !(claim.shared && spec.shared) => {
                checks.push(Validation::fail(DescriptorViolation::DuplicateProperty {
                    property: spec.property.clone(),
                    first: claim.owner.clone(),
                    second: id.clone(),
                }));
            }
            Some(_) => {}
            None => {
                properties.insert(
                    &spec.property,
                    Claim {
                        owner: id,
                        shared: spec.shared,
                    },
                );
            }
        }

        match dispatches.get(spec.dispatch_string.as_str()) {
            Some(first) => checks.push(Validation::fail(DescriptorViolation::DuplicateDispatch {
                dispatch: spec.dispatch_string.clone(),
                first: (*first).clone(),
                second: id.clone(),
            })),
            None => {
                dispatches.insert(&spec.dispatch_string, id);
            }
        }

        for phase in Phase::ALL {
            let name = naming.commit_name(&spec.commit_string, phase);
            match commit_names.get(&name) {
                Some((first, _)) if *first != id => {
                    checks.push(Validation::fail(DescriptorViolation::CommitNameCollision {
                        name,
                        first: (*first).clone(),
                        second: id.clone(),
                    }));
                }
                Some((_, earlier)) => {
                    checks.push(Validation::fail(DescriptorViolation::AmbiguousCommitName {
                        name,
                        operation: id.clone(),
                        first: *earlier,
                        second: phase,
                    }));
                }
                None => {
                    commit_names.insert(name, (id, phase));
                }
            }
        }
    }

    Validation::all_vec(checks).map(|_| ())
}

/// Fail-fast view of [`validate`] for callers that want a `Result`.
pub fn check(descriptor: &ResourceDescriptor, naming: &NamingConvention) -> Result<(), DescriptorError> {
    match validate(descriptor, naming) {
        Validation::Success(_) => Ok(()),
        Validation::Failure(errors) => Err(DescriptorError {
            violations: errors.iter().cloned().collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Response;
    use crate::descriptor::{OperationBuilder, OperationSpec};
    use serde_json::json;

    fn op(property: &str, commit: &str, dispatch: &str) -> OperationBuilder {
        OperationSpec::builder()
            .property(property)
            .commit(commit)
            .dispatch(dispatch)
            .request_async(|_, _| async { Ok(Response::new(json!(null))) })
    }

    fn violations(descriptor: &ResourceDescriptor) -> Vec<DescriptorViolation> {
        match check(descriptor, &NamingConvention::default()) {
            Ok(()) => Vec::new(),
            Err(error) => error.violations,
        }
    }

    #[test]
    fn well_formed_descriptor_passes() {
        let descriptor = ResourceDescriptor::new()
            .base_field("data", json!({}))
            .operation("fetchUser", op("user", "FETCH_USER", "fetchUser").build().unwrap())
            .operation("listPosts", op("posts", "LIST_POSTS", "listPosts").build().unwrap());

        let result = validate(&descriptor, &NamingConvention::default());
        assert!(result.is_success());
    }

    #[test]
    fn empty_descriptor_passes() {
        assert!(violations(&ResourceDescriptor::new()).is_empty());
    }

    #[test]
    fn unannotated_shared_property_is_rejected() {
        let descriptor = ResourceDescriptor::new()
            .operation("fetchUser", op("user", "FETCH_USER", "fetchUser").build().unwrap())
            .operation("updateUser", op("user", "UPDATE_USER", "updateUser").build().unwrap());

        assert_eq!(
            violations(&descriptor),
            vec![DescriptorViolation::DuplicateProperty {
                property: "user".to_string(),
                first: OperationId::new("fetchUser"),
                second: OperationId::new("updateUser"),
            }]
        );
    }

    #[test]
    fn property_sharing_requires_both_annotations() {
        let one_sided = ResourceDescriptor::new()
            .operation("fetchUser", op("user", "FETCH_USER", "fetchUser").build().unwrap())
            .operation(
                "updateUser",
                op("user", "UPDATE_USER", "updateUser").shared().build().unwrap(),
            );
        assert_eq!(violations(&one_sided).len(), 1);

        let both = ResourceDescriptor::new()
            .operation(
                "fetchUser",
                op("user", "FETCH_USER", "fetchUser").shared().build().unwrap(),
            )
            .operation(
                "updateUser",
                op("user", "UPDATE_USER", "updateUser").shared().build().unwrap(),
            );
        assert!(violations(&both).is_empty());
    }

    #[test]
    fn suffix_collisions_across_operations_are_detected() {
        let descriptor = ResourceDescriptor::new()
            .operation("load", op("a", "LOAD", "load").build().unwrap())
            .operation("loadOk", op("b", "LOAD_SUCCEEDED", "loadOk").build().unwrap());

        assert_eq!(
            violations(&descriptor),
            vec![DescriptorViolation::CommitNameCollision {
                name: "LOAD_SUCCEEDED".to_string(),
                first: OperationId::new("load"),
                second: OperationId::new("loadOk"),
            }]
        );
    }

    #[test]
    fn reserved_property_names_are_rejected() {
        let descriptor = ResourceDescriptor::new()
            .operation("loadErrors", op("error", "LOAD_ERRORS", "loadErrors").build().unwrap())
            .operation("poll", op("pending", "POLL", "poll").build().unwrap());

        assert_eq!(
            violations(&descriptor),
            vec![
                DescriptorViolation::ReservedProperty {
                    operation: OperationId::new("loadErrors"),
                    property: "error".to_string(),
                },
                DescriptorViolation::ReservedProperty {
                    operation: OperationId::new("poll"),
                    property: "pending".to_string(),
                },
            ]
        );
    }

    #[test]
    fn identical_suffixes_collide_within_one_operation() {
        let naming = NamingConvention {
            failure_suffix: "SUCCEEDED".to_string(),
            ..NamingConvention::default()
        };
        let descriptor = ResourceDescriptor::new()
            .operation("fetchUser", op("user", "FETCH_USER", "fetchUser").build().unwrap());

        let found = match check(&descriptor, &naming) {
            Ok(()) => Vec::new(),
            Err(error) => error.violations,
        };

        assert_eq!(
            found,
            vec![DescriptorViolation::AmbiguousCommitName {
                name: "FETCH_USER_SUCCEEDED".to_string(),
                operation: OperationId::new("fetchUser"),
                first: Phase::Succeeded,
                second: Phase::Failed,
            }]
        );
    }

    #[test]
    fn empty_suffix_collides_with_begin_name() {
        let naming = NamingConvention {
            separator: String::new(),
            success_suffix: String::new(),
            ..NamingConvention::default()
        };
        let descriptor = ResourceDescriptor::new()
            .operation("fetchUser", op("user", "FETCH_USER", "fetchUser").build().unwrap());

        let result = validate(&descriptor, &naming);
        assert!(!result.is_success());
    }

    #[test]
    fn all_violations_are_accumulated() {
        let descriptor = ResourceDescriptor::new()
            .base_field("pending", json!({}))
            .base_field("error", json!({}))
            .operation("a", op("", "A", "run").build().unwrap())
            .operation("b", op("x", "B", "run").build().unwrap());

        let found = violations(&descriptor);

        assert_eq!(found.len(), 4);
        assert!(found.iter().any(|v| matches!(v, DescriptorViolation::ReservedBaseField { field } if field == "pending")));
        assert!(found.iter().any(|v| matches!(v, DescriptorViolation::ReservedBaseField { field } if field == "error")));
        assert!(found.iter().any(|v| matches!(v, DescriptorViolation::EmptyField { field: "property", .. })));
        assert!(found.iter().any(|v| matches!(v, DescriptorViolation::DuplicateDispatch { .. })));
    }
}
