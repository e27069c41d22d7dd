use serde_json::json;

use crate::common::{PASSWORD, TestApp, routes};

async fn create_user(app: &TestApp, admin: &str, body: serde_json::Value) -> i32 {
    let res = app.post_with_token(routes::USERS, &body, admin).await;
    assert_eq!(res.status, 201, "create user failed: {}", res.text);
    res.id()
}

#[tokio::test]
async fn admin_can_create_another_admin() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;

    let res = app
        .post_with_token(
            routes::USERS,
            &json!({"username": "admin2", "password": PASSWORD, "role": "admin"}),
            &admin,
        )
        .await;

    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["role"], "admin");
    assert_eq!(res.body["role_label"], "Admin");
    assert!(res.body.get("password").is_none());
}

#[tokio::test]
async fn non_admin_cannot_manage_users() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let h = app.seed_hierarchy(&admin).await;
    let token = app
        .user_token(&admin, "po_x", "college_po", None, Some(h.college_x))
        .await;

    let res = app.get_with_token(routes::USERS, &token).await;

    assert_eq!(res.status, 403);
    assert_eq!(res.body["code"], "PERMISSION_DENIED");
}

#[tokio::test]
async fn list_users_filters_by_role() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let h = app.seed_hierarchy(&admin).await;
    let po = create_user(
        &app,
        &admin,
        json!({
            "username": "po_x",
            "password": PASSWORD,
            "role": "college_po",
            "college_id": h.college_x,
        }),
    )
    .await;
    create_user(
        &app,
        &admin,
        json!({
            "username": "uni_a",
            "password": PASSWORD,
            "role": "university",
            "university_id": h.university_a,
        }),
    )
    .await;

    let res = app
        .get_with_token(&format!("{}?role=college_po", routes::USERS), &admin)
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.data_ids(), vec![po]);
}

#[tokio::test]
async fn moving_college_staff_rederives_the_university() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let h = app.seed_hierarchy(&admin).await;
    let po = create_user(
        &app,
        &admin,
        json!({
            "username": "po_x",
            "password": PASSWORD,
            "role": "college_po",
            "college_id": h.college_x,
        }),
    )
    .await;

    let res = app
        .patch_with_token(
            &routes::user(po),
            &json!({"college_id": h.college_z}),
            &admin,
        )
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["college_id"], h.college_z);
    assert_eq!(res.body["university_id"], h.university_b);
}

#[tokio::test]
async fn clearing_the_college_of_staff_is_rejected() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let h = app.seed_hierarchy(&admin).await;
    let vs = create_user(
        &app,
        &admin,
        json!({
            "username": "vs_x",
            "password": PASSWORD,
            "role": "college_vs",
            "college_id": h.college_x,
        }),
    )
    .await;

    let res = app
        .patch_with_token(&routes::user(vs), &json!({"college_id": null}), &admin)
        .await;

    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn role_cannot_be_changed() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let h = app.seed_hierarchy(&admin).await;
    let uni = create_user(
        &app,
        &admin,
        json!({
            "username": "uni_a",
            "password": PASSWORD,
            "role": "university",
            "university_id": h.university_a,
        }),
    )
    .await;

    let res = app
        .patch_with_token(&routes::user(uni), &json!({"role": "admin"}), &admin)
        .await;

    assert_eq!(res.status, 400);
    let fetched = app.get_with_token(&routes::user(uni), &admin).await;
    assert_eq!(fetched.body["role"], "university");
}

#[tokio::test]
async fn password_change_takes_effect() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let h = app.seed_hierarchy(&admin).await;
    let uni = create_user(
        &app,
        &admin,
        json!({
            "username": "uni_a",
            "password": PASSWORD,
            "role": "university",
            "university_id": h.university_a,
        }),
    )
    .await;

    let res = app
        .patch_with_token(
            &routes::user(uni),
            &json!({"password": "brandnewpass"}),
            &admin,
        )
        .await;
    assert_eq!(res.status, 200, "{}", res.text);

    let old = app
        .post_without_token(
            routes::LOGIN,
            &json!({"username": "uni_a", "password": PASSWORD}),
        )
        .await;
    assert_eq!(old.status, 401);

    let new = app
        .post_without_token(
            routes::LOGIN,
            &json!({"username": "uni_a", "password": "brandnewpass"}),
        )
        .await;
    assert_eq!(new.status, 200);
}

#[tokio::test]
async fn deleted_user_token_stops_working() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let h = app.seed_hierarchy(&admin).await;
    let token = app
        .user_token(&admin, "po_x", "college_po", None, Some(h.college_x))
        .await;
    let me = app.get_with_token(routes::ME, &token).await;
    let id = me.id();

    let res = app.delete_with_token(&routes::user(id), &admin).await;
    assert_eq!(res.status, 204);

    let after = app.get_with_token(routes::ME, &token).await;
    assert_eq!(after.status, 401);
    assert_eq!(after.body["code"], "TOKEN_INVALID");
}

#[tokio::test]
async fn admin_cannot_delete_itself() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let me = app.get_with_token(routes::ME, &admin).await;

    let res = app.delete_with_token(&routes::user(me.id()), &admin).await;

    assert_eq!(res.status, 409);
    assert_eq!(res.body["code"], "CONFLICT");
}
