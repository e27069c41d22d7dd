pub mod hash;
pub mod jwt;
pub mod scope;
pub mod user;
