mod attendance;
mod auth;
mod camps;
mod common;
mod records;
mod scope;
mod users;
