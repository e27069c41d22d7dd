pub mod attendance;
pub mod attendance_sheet;
pub mod camp;
pub mod camp_attendance;
pub mod camp_event;
pub mod camp_event_photo;
pub mod college;
pub mod department;
pub mod event;
pub mod event_detail;
pub mod event_photo;
pub mod programme;
pub mod role_permission;
pub mod university;
pub mod user;
pub mod volunteer;
