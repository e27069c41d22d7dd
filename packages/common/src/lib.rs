pub mod access;
pub mod affiliation;
pub mod approval;
pub mod choices;
pub mod role;

pub use access::{
    AccessScope, CollegeDirectory, CollegeId, CollegeSnapshot, UniversityId, UserContext,
    resolve_accessible_colleges,
};
pub use affiliation::{CollegeRef, UserAffiliation, ValidationError};
pub use approval::{ApprovalError, ApprovalStatus};
pub use choices::{BloodGroup, Community, GradLevel, Sex};
pub use role::Role;
