use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn admin_sees_every_college() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let h = app.seed_hierarchy(&admin).await;

    let res = app.get_with_token(routes::COLLEGES, &admin).await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.data_ids(), vec![h.college_x, h.college_y, h.college_z]);
    assert_eq!(res.body["pagination"]["total"], 3);
}

#[tokio::test]
async fn page_far_past_the_end_is_empty() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let h = app.seed_hierarchy(&admin).await;
    let huge = "page=18446744073709551615&per_page=100";

    for url in [
        format!("{}?{huge}", routes::COLLEGES),
        format!("{}?{huge}", routes::USERS),
        format!("{}?{huge}", routes::college_volunteers(h.college_x)),
    ] {
        let res = app.get_with_token(&url, &admin).await;
        assert_eq!(res.status, 200, "{url}: {}", res.text);
        assert_eq!(res.body["data"], json!([]), "{url}");
        assert_eq!(res.body["pagination"]["page"], 100_000, "{url}");
    }
}

#[tokio::test]
async fn university_user_sees_only_its_colleges() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let h = app.seed_hierarchy(&admin).await;
    let token = app
        .user_token(&admin, "uni_a", "university", Some(h.university_a), None)
        .await;

    let res = app.get_with_token(routes::COLLEGES, &token).await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.data_ids(), vec![h.college_x, h.college_y]);

    let universities = app.get_with_token(routes::UNIVERSITIES, &token).await;
    assert_eq!(universities.data_ids(), vec![h.university_a]);
}

#[tokio::test]
async fn program_officer_sees_only_its_college() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let h = app.seed_hierarchy(&admin).await;
    let token = app
        .user_token(&admin, "po_x", "college_po", None, Some(h.college_x))
        .await;

    let res = app.get_with_token(routes::COLLEGES, &token).await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.data_ids(), vec![h.college_x]);
}

#[tokio::test]
async fn out_of_scope_college_is_not_found() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let h = app.seed_hierarchy(&admin).await;
    let token = app
        .user_token(&admin, "po_x", "college_po", None, Some(h.college_x))
        .await;

    let own = app.get_with_token(&routes::college(h.college_x), &token).await;
    assert_eq!(own.status, 200);

    for college in [h.college_y, h.college_z] {
        let res = app.get_with_token(&routes::college(college), &token).await;
        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

#[tokio::test]
async fn out_of_scope_records_are_not_found() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let h = app.seed_hierarchy(&admin).await;
    let programme_z = app.create_programme(&admin, h.college_z).await;
    let volunteer_z = app
        .create_volunteer(&admin, h.college_z, programme_z, "Zara")
        .await;
    let event_z = app.create_event(&admin, h.college_z, "Tree planting").await;
    let token = app
        .user_token(&admin, "po_x", "college_po", None, Some(h.college_x))
        .await;

    let volunteer = app.get_with_token(&routes::volunteer(volunteer_z), &token).await;
    assert_eq!(volunteer.status, 404);

    let event = app.get_with_token(&routes::event(event_z), &token).await;
    assert_eq!(event.status, 404);

    let listing = app
        .get_with_token(&routes::college_volunteers(h.college_z), &token)
        .await;
    assert_eq!(listing.status, 404);

    let create = app
        .post_with_token(
            &routes::college_events(h.college_z),
            &json!({"event_name": "Intrusion", "date": "2025-08-12"}),
            &token,
        )
        .await;
    assert_eq!(create.status, 404);
}

#[tokio::test]
async fn missing_permission_is_forbidden() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let h = app.seed_hierarchy(&admin).await;
    let token = app
        .user_token(&admin, "uni_a", "university", Some(h.university_a), None)
        .await;

    let res = app
        .post_with_token(
            &routes::college_events(h.college_x),
            &json!({"event_name": "Blood donation", "date": "2025-08-12"}),
            &token,
        )
        .await;

    assert_eq!(res.status, 403);
    assert_eq!(res.body["code"], "PERMISSION_DENIED");
}
