//! Family assignments: the `(area, family, subfamily)` scopes that bound a
//! product manager's write access.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

/// A stored assignment of a user to a subfamily.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FamilyAssignment {
    pub id: i32,
    pub user_id: Uuid,
    pub area_id: i32,
    pub family_id: i32,
    pub subfamily_id: i32,
}

/// One item of an assignment replacement request. Every id is required, but
/// absence is reported as a validation error instead of a decode failure.
/// Ids of zero or below count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AssignmentInput {
    pub area_id: Option<i32>,
    pub family_id: Option<i32>,
    pub subfamily_id: Option<i32>,
}

/// A validated assignment ready to be inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewAssignment {
    pub area_id: i32,
    pub family_id: i32,
    pub subfamily_id: i32,
}

/// Validate a full replacement list. Nothing may be written unless this passes.
pub fn validate_assignments(items: &[AssignmentInput]) -> DomainResult<Vec<NewAssignment>> {
    let mut seen = HashSet::with_capacity(items.len());
    let mut validated = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let (Some(area_id), Some(family_id), Some(subfamily_id)) = (
            present(item.area_id),
            present(item.family_id),
            present(item.subfamily_id),
        ) else {
            return Err(DomainError::validation(format!(
                "Assignment #{} requires area_id, family_id and subfamily_id",
                index + 1
            )));
        };

        if !seen.insert(subfamily_id) {
            return Err(DomainError::validation(format!(
                "Subfamily {} is assigned more than once",
                subfamily_id
            )));
        }

        validated.push(NewAssignment {
            area_id,
            family_id,
            subfamily_id,
        });
    }

    Ok(validated)
}

fn present(id: Option<i32>) -> Option<i32> {
    id.filter(|id| *id > 0)
}

/// Does any of `assignments` grant `user_id` the subfamily?
pub fn covers_subfamily(assignments: &[FamilyAssignment], user_id: Uuid, subfamily_id: i32) -> bool {
    assignments
        .iter()
        .any(|a| a.user_id == user_id && a.subfamily_id == subfamily_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(area: Option<i32>, family: Option<i32>, subfamily: Option<i32>) -> AssignmentInput {
        AssignmentInput {
            area_id: area,
            family_id: family,
            subfamily_id: subfamily,
        }
    }

    #[test]
    fn accepts_complete_items() {
        let validated =
            validate_assignments(&[item(Some(1), Some(10), Some(100)), item(Some(1), Some(10), Some(101))])
                .unwrap();
        assert_eq!(validated.len(), 2);
        assert_eq!(validated[1].subfamily_id, 101);
    }

    #[test]
    fn zero_or_negative_ids_count_as_missing() {
        for bad in [
            item(Some(0), Some(0), Some(0)),
            item(Some(1), Some(10), Some(0)),
            item(Some(-1), Some(10), Some(100)),
        ] {
            let err = validate_assignments(&[item(Some(1), Some(10), Some(101)), bad]).unwrap_err();
            assert!(matches!(err, DomainError::Validation(msg) if msg.contains("#2")));
        }
    }

    #[test]
    fn rejects_missing_subfamily() {
        let err = validate_assignments(&[item(Some(1), Some(10), Some(100)), item(Some(1), Some(10), None)])
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("#2")));
    }

    #[test]
    fn rejects_repeated_subfamily() {
        let err = validate_assignments(&[item(Some(1), Some(10), Some(100)), item(Some(2), Some(20), Some(100))])
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn empty_list_clears_everything() {
        assert!(validate_assignments(&[]).unwrap().is_empty());
    }

    #[test]
    fn coverage_is_per_user() {
        let owner = Uuid::new_v4();
        let assignments = vec![FamilyAssignment {
            id: 1,
            user_id: owner,
            area_id: 1,
            family_id: 2,
            subfamily_id: 3,
        }];
        assert!(covers_subfamily(&assignments, owner, 3));
        assert!(!covers_subfamily(&assignments, owner, 4));
        assert!(!covers_subfamily(&assignments, Uuid::new_v4(), 3));
    }
}
