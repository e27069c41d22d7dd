pub mod attendance;
pub mod auth;
pub mod camp;
pub mod college;
pub mod department;
pub mod event;
pub mod programme;
pub mod university;
pub mod user;
pub mod volunteer;
