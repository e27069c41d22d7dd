//! Role/affiliation invariants checked on every user write.

use thiserror::Error;

use crate::access::{CollegeId, UniversityId};
use crate::role::Role;

/// A college reference together with the university that owns it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollegeRef {
    pub id: CollegeId,
    pub university: UniversityId,
}

/// Raised when a user record breaks a role/affiliation rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("University users must be associated with a university")]
    UniversityRequired,

    #[error("College staff must be associated with a college")]
    CollegeRequired,

    #[error("Selected college must belong to the selected university")]
    CollegeOutsideUniversity {
        college: CollegeId,
        college_university: UniversityId,
        university: UniversityId,
    },
}

/// The role and org references of a user about to be persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UserAffiliation {
    pub role: Role,
    pub university: Option<UniversityId>,
    pub college: Option<CollegeRef>,
}

impl UserAffiliation {
    /// Check the role/affiliation invariants, reporting the first violation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.role == Role::University && self.university.is_none() {
            return Err(ValidationError::UniversityRequired);
        }
        if self.role.is_college_staff() && self.college.is_none() {
            return Err(ValidationError::CollegeRequired);
        }
        if let (Some(college), Some(university)) = (self.college, self.university)
            && college.university != university
        {
            return Err(ValidationError::CollegeOutsideUniversity {
                college: college.id,
                college_university: college.university,
                university,
            });
        }
        Ok(())
    }

    /// Fill in the university of college staff from their college.
    pub fn derive_university(&mut self) {
        if self.role.is_college_staff()
            && self.university.is_none()
            && let Some(college) = self.college
        {
            self.university = Some(college.university);
        }
    }

    /// Validate, then derive. The result is what gets written.
    pub fn prepare_for_save(mut self) -> Result<Self, ValidationError> {
        self.validate()?;
        self.derive_university();
        Ok(self)
    }
}
