use serde_json::json;

use crate::common::{PASSWORD, TestApp, routes};

fn camp_body(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "from_date": "2025-12-20",
        "to_date": "2025-12-26",
        "location": "GHSS Pinarayi",
        "theme": "Swachh Bharat",
    })
}

#[tokio::test]
async fn camp_dates_must_be_ordered() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let h = app.seed_hierarchy(&admin).await;

    let mut body = camp_body("Special Camp");
    body["to_date"] = json!("2025-12-01");
    let res = app
        .post_with_token(&routes::college_camps(h.college_x), &body, &admin)
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(
        res.body["message"],
        "Camp start date must not be after its end date"
    );
}

#[tokio::test]
async fn coordinator_must_belong_to_the_camp_college() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let h = app.seed_hierarchy(&admin).await;
    let po_y = app
        .post_with_token(
            routes::USERS,
            &json!({
                "username": "po_y",
                "password": PASSWORD,
                "role": "college_po",
                "college_id": h.college_y,
            }),
            &admin,
        )
        .await
        .id();
    let po_x = app
        .post_with_token(
            routes::USERS,
            &json!({
                "username": "po_x",
                "password": PASSWORD,
                "role": "college_po",
                "college_id": h.college_x,
            }),
            &admin,
        )
        .await
        .id();

    let mut body = camp_body("Special Camp");
    body["coordinator_id"] = json!(po_y);
    let res = app
        .post_with_token(&routes::college_camps(h.college_x), &body, &admin)
        .await;
    assert_eq!(res.status, 400);

    body["coordinator_id"] = json!(po_x);
    let res = app
        .post_with_token(&routes::college_camps(h.college_x), &body, &admin)
        .await;
    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["coordinator_id"], po_x);
}

#[tokio::test]
async fn attendees_are_registered_once() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let h = app.seed_hierarchy(&admin).await;
    let programme = app.create_programme(&admin, h.college_x).await;
    let anu = app
        .create_volunteer(&admin, h.college_x, programme, "Anu")
        .await;
    let binu = app
        .create_volunteer(&admin, h.college_x, programme, "Binu")
        .await;
    let po = app
        .user_token(&admin, "po_x", "college_po", None, Some(h.college_x))
        .await;
    let camp = app
        .post_with_token(
            &routes::college_camps(h.college_x),
            &camp_body("Special Camp"),
            &po,
        )
        .await;
    assert_eq!(camp.status, 201, "{}", camp.text);
    let camp = camp.id();

    let first = app
        .post_with_token(
            &routes::camp_attendees(camp),
            &json!({"volunteer_ids": [anu]}),
            &po,
        )
        .await;
    assert_eq!(first.status, 200, "{}", first.text);
    assert_eq!(first.body["added"], 1);

    let second = app
        .post_with_token(
            &routes::camp_attendees(camp),
            &json!({"volunteer_ids": [anu, binu]}),
            &po,
        )
        .await;
    assert_eq!(second.status, 200, "{}", second.text);
    assert_eq!(second.body["added"], 1);

    let listing = app.get_with_token(&routes::camp_attendees(camp), &po).await;
    assert_eq!(listing.status, 200, "{}", listing.text);
    let names: Vec<&str> = listing
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Anu", "Binu"]);

    let removed = app
        .delete_with_token(&routes::camp_attendee(camp, anu), &po)
        .await;
    assert_eq!(removed.status, 204);
    let missing = app
        .delete_with_token(&routes::camp_attendee(camp, anu), &po)
        .await;
    assert_eq!(missing.status, 404);
}

#[tokio::test]
async fn attendees_from_another_college_are_rejected() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let h = app.seed_hierarchy(&admin).await;
    let programme_y = app.create_programme(&admin, h.college_y).await;
    let outsider = app
        .create_volunteer(&admin, h.college_y, programme_y, "Cini")
        .await;
    let camp = app
        .post_with_token(
            &routes::college_camps(h.college_x),
            &camp_body("Special Camp"),
            &admin,
        )
        .await
        .id();

    let res = app
        .post_with_token(
            &routes::camp_attendees(camp),
            &json!({"volunteer_ids": [outsider]}),
            &admin,
        )
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn camp_events_fall_within_the_camp() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let h = app.seed_hierarchy(&admin).await;
    let camp = app
        .post_with_token(
            &routes::college_camps(h.college_x),
            &camp_body("Special Camp"),
            &admin,
        )
        .await
        .id();

    let outside = app
        .post_with_token(
            &routes::camp_events(camp),
            &json!({
                "event_name": "Beach cleanup",
                "description": "Cleanup",
                "date": "2025-12-27",
            }),
            &admin,
        )
        .await;
    assert_eq!(outside.status, 400);

    let inside = app
        .post_with_token(
            &routes::camp_events(camp),
            &json!({
                "event_name": "Beach cleanup",
                "description": "Cleanup",
                "date": "2025-12-22",
            }),
            &admin,
        )
        .await;
    assert_eq!(inside.status, 201, "{}", inside.text);
    let camp_event = inside.id();

    let shrink = app
        .patch_with_token(
            &routes::camp(camp),
            &json!({"to_date": "2025-12-21"}),
            &admin,
        )
        .await;
    assert_eq!(shrink.status, 400);

    let photo = app
        .post_with_token(
            &routes::camp_event_photos(camp_event),
            &json!({"photo": "camps/2025/cleanup-1.jpg"}),
            &admin,
        )
        .await;
    assert_eq!(photo.status, 201, "{}", photo.text);

    let photos = app
        .get_with_token(&routes::camp_event_photos(camp_event), &admin)
        .await;
    assert_eq!(photos.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn volunteer_secretary_cannot_manage_camps() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let h = app.seed_hierarchy(&admin).await;
    let vs = app
        .user_token(&admin, "vs_x", "college_vs", None, Some(h.college_x))
        .await;

    let res = app
        .post_with_token(
            &routes::college_camps(h.college_x),
            &camp_body("Special Camp"),
            &vs,
        )
        .await;

    assert_eq!(res.status, 403);
}
