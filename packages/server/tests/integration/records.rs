use serde_json::json;

use crate::common::{TestApp, routes, volunteer_body};

mod volunteers {
    use super::*;

    #[tokio::test]
    async fn volunteer_secretary_enrols_a_volunteer() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let h = app.seed_hierarchy(&admin).await;
        let programme = app.create_programme(&admin, h.college_x).await;
        let vs = app
            .user_token(&admin, "vs_x", "college_vs", None, Some(h.college_x))
            .await;

        let res = app
            .post_with_token(
                &routes::college_volunteers(h.college_x),
                &volunteer_body(programme, "Anu"),
                &vs,
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["college_id"], h.college_x);
        assert_eq!(res.body["status"], "active");
        assert_eq!(res.body["blood_group"], "O+");
    }

    #[tokio::test]
    async fn programme_of_another_college_is_rejected() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let h = app.seed_hierarchy(&admin).await;
        let programme_y = app.create_programme(&admin, h.college_y).await;

        let res = app
            .post_with_token(
                &routes::college_volunteers(h.college_x),
                &volunteer_body(programme_y, "Anu"),
                &admin,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn unit_and_year_must_be_known_choices() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let h = app.seed_hierarchy(&admin).await;
        let programme = app.create_programme(&admin, h.college_x).await;

        let mut body = volunteer_body(programme, "Anu");
        body["unit"] = json!(7);
        let res = app
            .post_with_token(&routes::college_volunteers(h.college_x), &body, &admin)
            .await;
        assert_eq!(res.status, 400);

        let mut body = volunteer_body(programme, "Anu");
        body["year"] = json!(4);
        let res = app
            .post_with_token(&routes::college_volunteers(h.college_x), &body, &admin)
            .await;
        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn roll_numbers_are_unique_within_a_college() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let h = app.seed_hierarchy(&admin).await;
        let programme_x = app.create_programme(&admin, h.college_x).await;
        let programme_y = app.create_programme(&admin, h.college_y).await;

        let mut body = volunteer_body(programme_x, "Anu");
        body["roll_no"] = json!(12);
        let first = app
            .post_with_token(&routes::college_volunteers(h.college_x), &body, &admin)
            .await;
        assert_eq!(first.status, 201, "{}", first.text);

        let dup = app
            .post_with_token(&routes::college_volunteers(h.college_x), &body, &admin)
            .await;
        assert_eq!(dup.status, 409);
        assert_eq!(dup.body["code"], "CONFLICT");

        let mut other = volunteer_body(programme_y, "Binu");
        other["roll_no"] = json!(12);
        let res = app
            .post_with_token(&routes::college_volunteers(h.college_y), &other, &admin)
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
    }

    #[tokio::test]
    async fn list_filters_and_searches() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let h = app.seed_hierarchy(&admin).await;
        let programme = app.create_programme(&admin, h.college_x).await;
        let anu = app
            .create_volunteer(&admin, h.college_x, programme, "Anu")
            .await;
        let mut body = volunteer_body(programme, "Binu");
        body["year"] = json!(2);
        let binu = app
            .post_with_token(&routes::college_volunteers(h.college_x), &body, &admin)
            .await
            .id();

        let all = app
            .get_with_token(&routes::college_volunteers(h.college_x), &admin)
            .await;
        assert_eq!(all.status, 200, "{}", all.text);
        assert_eq!(all.data_ids(), vec![anu, binu]);

        let second_year = app
            .get_with_token(
                &format!("{}?year=2", routes::college_volunteers(h.college_x)),
                &admin,
            )
            .await;
        assert_eq!(second_year.data_ids(), vec![binu]);

        let search = app
            .get_with_token(
                &format!("{}?search=anu", routes::college_volunteers(h.college_x)),
                &admin,
            )
            .await;
        assert_eq!(search.data_ids(), vec![anu]);
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let h = app.seed_hierarchy(&admin).await;
        let programme = app.create_programme(&admin, h.college_x).await;
        let id = app
            .create_volunteer(&admin, h.college_x, programme, "Anu")
            .await;

        let res = app
            .patch_with_token(&routes::volunteer(id), &json!({"hobbies": "Chess"}), &admin)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["hobbies"], "Chess");
        assert_eq!(res.body["name"], "Anu");
    }
}

mod hierarchy {
    use super::*;

    #[tokio::test]
    async fn department_names_are_unique_per_college() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let h = app.seed_hierarchy(&admin).await;
        let body = json!({"name": "Chemistry"});

        let first = app
            .post_with_token(&routes::college_departments(h.college_x), &body, &admin)
            .await;
        assert_eq!(first.status, 201, "{}", first.text);

        let dup = app
            .post_with_token(&routes::college_departments(h.college_x), &body, &admin)
            .await;
        assert_eq!(dup.status, 409);

        let other = app
            .post_with_token(&routes::college_departments(h.college_y), &body, &admin)
            .await;
        assert_eq!(other.status, 201, "{}", other.text);
    }

    #[tokio::test]
    async fn only_admins_create_colleges() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let h = app.seed_hierarchy(&admin).await;
        let uni = app
            .user_token(&admin, "uni_a", "university", Some(h.university_a), None)
            .await;

        let res = app
            .post_with_token(
                routes::COLLEGES,
                &json!({
                    "name": "College W",
                    "directorate": "DCE",
                    "university_id": h.university_a,
                }),
                &uni,
            )
            .await;

        assert_eq!(res.status, 403);
    }

    #[tokio::test]
    async fn deleting_a_university_cascades_to_its_colleges() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let h = app.seed_hierarchy(&admin).await;
        let programme = app.create_programme(&admin, h.college_x).await;
        let volunteer = app
            .create_volunteer(&admin, h.college_x, programme, "Anu")
            .await;

        let res = app
            .delete_with_token(&routes::university(h.university_a), &admin)
            .await;
        assert_eq!(res.status, 204, "{}", res.text);

        let colleges = app.get_with_token(routes::COLLEGES, &admin).await;
        assert_eq!(colleges.data_ids(), vec![h.college_z]);

        let gone = app.get_with_token(&routes::volunteer(volunteer), &admin).await;
        assert_eq!(gone.status, 404);

        let again = app
            .delete_with_token(&routes::university(h.university_a), &admin)
            .await;
        assert_eq!(again.status, 404);
    }

    #[tokio::test]
    async fn event_dates_filter_the_listing() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;
        let h = app.seed_hierarchy(&admin).await;
        let early = app
            .post_with_token(
                &routes::college_events(h.college_x),
                &json!({"event_name": "Orientation", "date": "2025-06-01"}),
                &admin,
            )
            .await
            .id();
        let late = app
            .post_with_token(
                &routes::college_events(h.college_x),
                &json!({"event_name": "Cleanup", "date": "2025-09-01"}),
                &admin,
            )
            .await
            .id();

        let all = app
            .get_with_token(&routes::college_events(h.college_x), &admin)
            .await;
        assert_eq!(all.status, 200, "{}", all.text);
        assert_eq!(all.data_ids(), vec![early, late]);

        let summer = app
            .get_with_token(
                &format!("{}?to=2025-07-01", routes::college_events(h.college_x)),
                &admin,
            )
            .await;
        assert_eq!(summer.data_ids(), vec![early]);
    }
}
