use serde_json::{Value, json};

use crate::common::{Hierarchy, TestApp, TestResponse, routes};

struct Setup {
    admin: String,
    h: Hierarchy,
    event: i32,
    anu: i32,
    binu: i32,
}

async fn setup(app: &TestApp) -> Setup {
    let admin = app.admin_token().await;
    let h = app.seed_hierarchy(&admin).await;
    let programme = app.create_programme(&admin, h.college_x).await;
    let anu = app
        .create_volunteer(&admin, h.college_x, programme, "Anu")
        .await;
    let binu = app
        .create_volunteer(&admin, h.college_x, programme, "Binu")
        .await;
    let event = app.create_event(&admin, h.college_x, "Blood donation").await;
    Setup {
        admin,
        h,
        event,
        anu,
        binu,
    }
}

fn sheet(unit: i32, entries: &[(i32, i32)]) -> Value {
    let entries: Vec<Value> = entries
        .iter()
        .map(|&(volunteer_id, hours)| json!({"volunteer_id": volunteer_id, "hours": hours}))
        .collect();
    json!({"date": "2025-08-12", "unit": unit, "entries": entries})
}

async fn submit(app: &TestApp, s: &Setup, token: &str, body: &Value) -> TestResponse {
    app.post_with_token(&routes::event_attendance(s.event), body, token)
        .await
}

#[tokio::test]
async fn submitted_sheet_starts_pending_with_its_rows() {
    let app = TestApp::spawn().await;
    let s = setup(&app).await;
    let vs = app
        .user_token(&s.admin, "vs_x", "college_vs", None, Some(s.h.college_x))
        .await;

    let res = submit(&app, &s, &vs, &sheet(96, &[(s.anu, 4), (s.binu, 3)])).await;

    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["status"], "pending");
    assert_eq!(res.body["status_label"], "Pending for Approval");
    assert!(res.body["approved_by"].is_null());
    let entries = res.body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["volunteer_name"], "Anu");
    assert_eq!(entries[0]["hours"], 4);

    let listing = app
        .get_with_token(&routes::event_attendance(s.event), &vs)
        .await;
    assert_eq!(listing.status, 200, "{}", listing.text);
    assert_eq!(listing.body[0]["entry_count"], 2);
}

#[tokio::test]
async fn volunteers_of_another_college_are_rejected() {
    let app = TestApp::spawn().await;
    let s = setup(&app).await;
    let programme_y = app.create_programme(&s.admin, s.h.college_y).await;
    let outsider = app
        .create_volunteer(&s.admin, s.h.college_y, programme_y, "Cini")
        .await;

    let res = submit(&app, &s, &s.admin, &sheet(96, &[(s.anu, 4), (outsider, 4)])).await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");

    let listing = app
        .get_with_token(&routes::event_attendance(s.event), &s.admin)
        .await;
    assert_eq!(listing.body, json!([]));
}

#[tokio::test]
async fn second_sheet_for_the_same_unit_and_date_conflicts() {
    let app = TestApp::spawn().await;
    let s = setup(&app).await;

    let first = submit(&app, &s, &s.admin, &sheet(96, &[(s.anu, 4)])).await;
    assert_eq!(first.status, 201, "{}", first.text);

    let res = submit(&app, &s, &s.admin, &sheet(96, &[(s.binu, 4)])).await;
    assert_eq!(res.status, 409);
    assert_eq!(res.body["code"], "CONFLICT");
}

#[tokio::test]
async fn volunteer_cannot_be_counted_twice_on_one_day() {
    let app = TestApp::spawn().await;
    let s = setup(&app).await;

    let first = submit(&app, &s, &s.admin, &sheet(96, &[(s.anu, 4)])).await;
    assert_eq!(first.status, 201, "{}", first.text);

    let res = submit(&app, &s, &s.admin, &sheet(4, &[(s.anu, 2)])).await;
    assert_eq!(res.status, 409);

    // The conflicting sheet is rolled back with its rows.
    let listing = app
        .get_with_token(&routes::event_attendance(s.event), &s.admin)
        .await;
    assert_eq!(listing.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn approval_records_the_reviewer_and_is_final() {
    let app = TestApp::spawn().await;
    let s = setup(&app).await;
    let po = app
        .user_token(&s.admin, "po_x", "college_po", None, Some(s.h.college_x))
        .await;
    let po_id = app.get_with_token(routes::ME, &po).await.id();
    let sheet_id = submit(&app, &s, &po, &sheet(96, &[(s.anu, 4)])).await.id();

    let approved = app
        .post_with_token(&routes::approve_sheet(sheet_id), &json!({}), &po)
        .await;
    assert_eq!(approved.status, 200, "{}", approved.text);
    assert_eq!(approved.body["status"], "approved");
    assert_eq!(approved.body["status_label"], "Approved");
    assert_eq!(approved.body["approved_by"], po_id);

    let reject = app
        .post_with_token(&routes::reject_sheet(sheet_id), &json!({}), &po)
        .await;
    assert_eq!(reject.status, 409);
    assert_eq!(reject.body["code"], "CONFLICT");

    let delete = app
        .delete_with_token(&routes::attendance_sheet(sheet_id), &po)
        .await;
    assert_eq!(delete.status, 409);
}

#[tokio::test]
async fn rejected_sheet_can_be_withdrawn_and_resubmitted() {
    let app = TestApp::spawn().await;
    let s = setup(&app).await;
    let sheet_id = submit(&app, &s, &s.admin, &sheet(96, &[(s.anu, 4)])).await.id();

    let rejected = app
        .post_with_token(&routes::reject_sheet(sheet_id), &json!({}), &s.admin)
        .await;
    assert_eq!(rejected.status, 200, "{}", rejected.text);
    assert_eq!(rejected.body["status"], "rejected");

    let delete = app
        .delete_with_token(&routes::attendance_sheet(sheet_id), &s.admin)
        .await;
    assert_eq!(delete.status, 204);

    let again = submit(&app, &s, &s.admin, &sheet(96, &[(s.anu, 4)])).await;
    assert_eq!(again.status, 201, "{}", again.text);
}

#[tokio::test]
async fn volunteer_secretary_cannot_approve() {
    let app = TestApp::spawn().await;
    let s = setup(&app).await;
    let vs = app
        .user_token(&s.admin, "vs_x", "college_vs", None, Some(s.h.college_x))
        .await;
    let sheet_id = submit(&app, &s, &vs, &sheet(96, &[(s.anu, 4)])).await.id();

    let res = app
        .post_with_token(&routes::approve_sheet(sheet_id), &json!({}), &vs)
        .await;

    assert_eq!(res.status, 403);
}

#[tokio::test]
async fn university_user_approves_within_its_university_only() {
    let app = TestApp::spawn().await;
    let s = setup(&app).await;
    let sheet_id = submit(&app, &s, &s.admin, &sheet(96, &[(s.anu, 4)])).await.id();
    let uni_b = app
        .user_token(&s.admin, "uni_b", "university", Some(s.h.university_b), None)
        .await;
    let uni_a = app
        .user_token(&s.admin, "uni_a", "university", Some(s.h.university_a), None)
        .await;

    let outside = app
        .post_with_token(&routes::approve_sheet(sheet_id), &json!({}), &uni_b)
        .await;
    assert_eq!(outside.status, 404);

    let inside = app
        .post_with_token(&routes::approve_sheet(sheet_id), &json!({}), &uni_a)
        .await;
    assert_eq!(inside.status, 200, "{}", inside.text);
}

#[tokio::test]
async fn list_filters_by_status() {
    let app = TestApp::spawn().await;
    let s = setup(&app).await;
    let first = submit(&app, &s, &s.admin, &sheet(96, &[(s.anu, 4)])).await.id();
    let second = submit(&app, &s, &s.admin, &sheet(4, &[(s.binu, 4)])).await.id();
    let approved = app
        .post_with_token(&routes::approve_sheet(first), &json!({}), &s.admin)
        .await;
    assert_eq!(approved.status, 200, "{}", approved.text);

    let pending = app
        .get_with_token(
            &format!("{}?status=pending", routes::event_attendance(s.event)),
            &s.admin,
        )
        .await;

    assert_eq!(pending.status, 200, "{}", pending.text);
    let ids: Vec<i64> = pending
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![i64::from(second)]);
}
