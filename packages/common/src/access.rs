//! Role-scoped visibility of colleges.
//!
//! Every college-owned record (departments, volunteers, events, camps, ...)
//! inherits the visibility of its college, so this module is the single place
//! that decides what a user may read or write.

use std::collections::BTreeSet;

use crate::role::Role;

pub type UniversityId = i32;
pub type CollegeId = i32;

/// The parts of a user that matter for access decisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UserContext {
    pub role: Role,
    pub university: Option<UniversityId>,
    pub college: Option<CollegeId>,
}

/// Which colleges a user may access, before it is evaluated against a store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessScope {
    /// Every college.
    All,
    /// Every college of one university.
    University(UniversityId),
    /// A single college.
    College(CollegeId),
    /// No college at all.
    Nothing,
}

impl AccessScope {
    pub fn for_user(user: &UserContext) -> Self {
        match user.role {
            Role::Admin => Self::All,
            Role::University => match user.university {
                Some(university) => Self::University(university),
                None => Self::Nothing,
            },
            Role::CollegePo | Role::CollegeVs => match user.college {
                Some(college) => Self::College(college),
                None => Self::Nothing,
            },
        }
    }

    /// Whether a college with the given id, owned by `university`, is in scope.
    pub fn permits(&self, college: CollegeId, university: UniversityId) -> bool {
        match *self {
            Self::All => true,
            Self::University(u) => u == university,
            Self::College(c) => c == college,
            Self::Nothing => false,
        }
    }
}

/// Read access to the college table, consistent for one resolution call.
pub trait CollegeDirectory {
    fn all_colleges(&self) -> BTreeSet<CollegeId>;
    fn colleges_by_university(&self, university: UniversityId) -> BTreeSet<CollegeId>;
}

/// Compute the ids of every college `user` may access.
pub fn resolve_accessible_colleges<D>(user: &UserContext, directory: &D) -> BTreeSet<CollegeId>
where
    D: CollegeDirectory + ?Sized,
{
    match AccessScope::for_user(user) {
        AccessScope::All => directory.all_colleges(),
        AccessScope::University(university) => directory.colleges_by_university(university),
        AccessScope::College(college) => BTreeSet::from([college]),
        AccessScope::Nothing => BTreeSet::new(),
    }
}

/// In-memory `(college, university)` pairs fetched from the store.
#[derive(Clone, Debug, Default)]
pub struct CollegeSnapshot {
    rows: Vec<(CollegeId, UniversityId)>,
}

impl CollegeSnapshot {
    pub fn new(rows: Vec<(CollegeId, UniversityId)>) -> Self {
        Self { rows }
    }
}

impl CollegeDirectory for CollegeSnapshot {
    fn all_colleges(&self) -> BTreeSet<CollegeId> {
        self.rows.iter().map(|&(college, _)| college).collect()
    }

    fn colleges_by_university(&self, university: UniversityId) -> BTreeSet<CollegeId> {
        self.rows
            .iter()
            .filter(|&&(_, u)| u == university)
            .map(|&(college, _)| college)
            .collect()
    }
}
