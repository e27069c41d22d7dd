use serde_json::json;

use crate::common::{PASSWORD, TestApp, routes};

mod registration {
    use super::*;

    #[tokio::test]
    async fn college_staff_registration_derives_the_university() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let h = app.seed_hierarchy(&admin).await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({
                    "username": "po_x",
                    "password": PASSWORD,
                    "role": "college_po",
                    "college_id": h.college_x,
                }),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["role"], "college_po");
        assert_eq!(res.body["college_id"], h.college_x);
        assert_eq!(res.body["university_id"], h.university_a);
    }

    #[tokio::test]
    async fn university_user_without_university_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"username": "uni", "password": PASSWORD, "role": "university"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert_eq!(
            res.body["message"],
            "University users must be associated with a university"
        );
    }

    #[tokio::test]
    async fn college_staff_without_college_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"username": "vs", "password": PASSWORD, "role": "college_vs"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(
            res.body["message"],
            "College staff must be associated with a college"
        );
    }

    #[tokio::test]
    async fn college_from_another_university_is_rejected() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let h = app.seed_hierarchy(&admin).await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({
                    "username": "po_z",
                    "password": PASSWORD,
                    "role": "college_po",
                    "university_id": h.university_a,
                    "college_id": h.college_z,
                }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(
            res.body["message"],
            "Selected college must belong to the selected university"
        );
    }

    #[tokio::test]
    async fn admin_cannot_self_register() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({"username": "root", "password": PASSWORD, "role": "admin"}),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let h = app.seed_hierarchy(&admin).await;
        let body = json!({
            "username": "uni_a",
            "password": PASSWORD,
            "role": "university",
            "university_id": h.university_a,
        });

        let first = app.post_without_token(routes::REGISTER, &body).await;
        assert_eq!(first.status, 201, "{}", first.text);

        let res = app.post_without_token(routes::REGISTER, &body).await;
        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "USERNAME_TAKEN");
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::REGISTER, &json!({"username": "x"}))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn login_returns_token_and_role_permissions() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let h = app.seed_hierarchy(&admin).await;
        app.user_token(&admin, "vs_x", "college_vs", None, Some(h.college_x))
            .await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "vs_x", "password": PASSWORD}),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert!(res.body["token"].is_string());
        assert_eq!(res.body["role"], "college_vs");
        let permissions: Vec<&str> = res.body["permissions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p.as_str().unwrap())
            .collect();
        assert!(permissions.contains(&"attendance:submit"));
        assert!(!permissions.contains(&"attendance:approve"));
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let app = TestApp::spawn().await;
        app.admin_token().await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "admin", "password": "wrongpassword"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }
}

mod me {
    use super::*;

    #[tokio::test]
    async fn me_requires_a_token() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::ME).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn me_rejects_a_garbage_token() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::ME, "not-a-jwt").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn me_lists_accessible_colleges() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let h = app.seed_hierarchy(&admin).await;
        let token = app
            .user_token(&admin, "uni_a", "university", Some(h.university_a), None)
            .await;

        let res = app.get_with_token(routes::ME, &token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["username"], "uni_a");
        assert_eq!(
            res.body["accessible_college_ids"],
            json!([h.college_x, h.college_y])
        );
    }
}
