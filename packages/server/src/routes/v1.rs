use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers::{
    attendance, auth, camp, college, department, event, programme, university, user, volunteer,
};
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/users", user_routes())
        .nest("/universities", university_routes())
        .nest("/colleges", college_routes())
        .nest("/departments", department_routes())
        .nest("/programmes", programme_routes())
        .nest("/volunteers", volunteer_routes())
        .nest("/events", event_routes())
        .nest("/event-photos", event_photo_routes())
        .nest("/attendance", attendance_routes())
        .nest("/camps", camp_routes())
        .nest("/camp-events", camp_event_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(auth::register))
        .routes(routes!(auth::login))
        .routes(routes!(auth::me))
}

fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(user::list_users, user::create_user))
        .routes(routes!(user::get_user, user::update_user, user::delete_user))
}

fn university_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            university::list_universities,
            university::create_university
        ))
        .routes(routes!(
            university::get_university,
            university::update_university,
            university::delete_university
        ))
}

/// College CRUD plus the collections owned by a college.
fn college_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(college::list_colleges, college::create_college))
        .routes(routes!(
            college::get_college,
            college::update_college,
            college::delete_college
        ))
        .routes(routes!(
            department::list_departments,
            department::create_department
        ))
        .routes(routes!(
            volunteer::list_volunteers,
            volunteer::create_volunteer
        ))
        .routes(routes!(event::list_events, event::create_event))
        .routes(routes!(camp::list_camps, camp::create_camp))
}

fn department_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            department::get_department,
            department::update_department,
            department::delete_department
        ))
        .routes(routes!(
            programme::list_programmes,
            programme::create_programme
        ))
}

fn programme_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(
        programme::get_programme,
        programme::update_programme,
        programme::delete_programme
    ))
}

fn volunteer_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(
        volunteer::get_volunteer,
        volunteer::update_volunteer,
        volunteer::delete_volunteer
    ))
}

fn event_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            event::get_event,
            event::update_event,
            event::delete_event
        ))
        .routes(routes!(
            event::list_event_details,
            event::create_event_detail
        ))
        .routes(routes!(event::list_event_photos, event::add_event_photo))
        .routes(routes!(attendance::list_sheets, attendance::submit_sheet))
}

fn event_photo_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(event::delete_event_photo))
}

fn attendance_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(attendance::get_sheet, attendance::delete_sheet))
        .routes(routes!(attendance::approve_sheet))
        .routes(routes!(attendance::reject_sheet))
}

fn camp_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(camp::get_camp, camp::update_camp, camp::delete_camp))
        .routes(routes!(camp::list_attendees, camp::add_attendees))
        .routes(routes!(camp::remove_attendee))
        .routes(routes!(camp::list_camp_events, camp::create_camp_event))
}

fn camp_event_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(camp::delete_camp_event))
        .routes(routes!(
            camp::list_camp_event_photos,
            camp::add_camp_event_photo
        ))
}
