use std::net::SocketAddr;

use reqwest::Client;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use serde_json::{Value, json};

use common::Role;
use nss_server::config::{AppConfig, AuthConfig, CorsConfig, DatabaseConfig, ServerConfig};
use nss_server::entity::user;
use nss_server::state::AppState;
use nss_server::utils::hash;

pub const PASSWORD: &str = "securepass";

pub mod routes {
    pub const REGISTER: &str = "/api/v1/auth/register";
    pub const LOGIN: &str = "/api/v1/auth/login";
    pub const ME: &str = "/api/v1/auth/me";
    pub const USERS: &str = "/api/v1/users";
    pub const UNIVERSITIES: &str = "/api/v1/universities";
    pub const COLLEGES: &str = "/api/v1/colleges";

    pub fn user(id: i32) -> String {
        format!("/api/v1/users/{id}")
    }

    pub fn university(id: i32) -> String {
        format!("/api/v1/universities/{id}")
    }

    pub fn college(id: i32) -> String {
        format!("/api/v1/colleges/{id}")
    }

    pub fn college_departments(college_id: i32) -> String {
        format!("/api/v1/colleges/{college_id}/departments")
    }

    pub fn department_programmes(department_id: i32) -> String {
        format!("/api/v1/departments/{department_id}/programmes")
    }

    pub fn college_volunteers(college_id: i32) -> String {
        format!("/api/v1/colleges/{college_id}/volunteers")
    }

    pub fn volunteer(id: i32) -> String {
        format!("/api/v1/volunteers/{id}")
    }

    pub fn college_events(college_id: i32) -> String {
        format!("/api/v1/colleges/{college_id}/events")
    }

    pub fn event(id: i32) -> String {
        format!("/api/v1/events/{id}")
    }

    pub fn event_attendance(event_id: i32) -> String {
        format!("/api/v1/events/{event_id}/attendance")
    }

    pub fn attendance_sheet(id: i32) -> String {
        format!("/api/v1/attendance/{id}")
    }

    pub fn approve_sheet(id: i32) -> String {
        format!("/api/v1/attendance/{id}/approve")
    }

    pub fn reject_sheet(id: i32) -> String {
        format!("/api/v1/attendance/{id}/reject")
    }

    pub fn college_camps(college_id: i32) -> String {
        format!("/api/v1/colleges/{college_id}/camps")
    }

    pub fn camp(id: i32) -> String {
        format!("/api/v1/camps/{id}")
    }

    pub fn camp_attendees(camp_id: i32) -> String {
        format!("/api/v1/camps/{camp_id}/attendees")
    }

    pub fn camp_attendee(camp_id: i32, volunteer_id: i32) -> String {
        format!("/api/v1/camps/{camp_id}/attendees/{volunteer_id}")
    }

    pub fn camp_events(camp_id: i32) -> String {
        format!("/api/v1/camps/{camp_id}/events")
    }

    pub fn camp_event_photos(camp_event_id: i32) -> String {
        format!("/api/v1/camp-events/{camp_event_id}/photos")
    }
}

/// A running test server backed by its own in-memory database.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

/// Two universities and three colleges: X and Y under A, Z under B.
pub struct Hierarchy {
    pub university_a: i32,
    pub university_b: i32,
    pub college_x: i32,
    pub college_y: i32,
    pub college_z: i32,
}

impl TestApp {
    pub async fn spawn() -> Self {
        // One connection keeps the in-memory database alive and shared.
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let db = Database::connect(opts)
            .await
            .expect("Failed to open in-memory database");

        nss_server::database::sync_schema(&db)
            .await
            .expect("Failed to sync schema");
        nss_server::seed::seed_role_permissions(&db)
            .await
            .expect("Failed to seed role permissions");
        nss_server::seed::ensure_indexes(&db)
            .await
            .expect("Failed to create indexes");

        let app_config = AppConfig {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 1,
            },
            auth: AuthConfig {
                jwt_secret: "test-secret-for-integration-tests".to_string(),
                token_ttl_hours: 1,
                bootstrap_admin: None,
            },
        };

        let state = AppState {
            db: db.clone(),
            config: app_config,
        };

        let app = nss_server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn patch_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .patch(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send PATCH request");

        TestResponse::from_response(res).await
    }

    pub async fn delete_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    pub async fn login(&self, username: &str) -> String {
        let res = self
            .post_without_token(
                routes::LOGIN,
                &json!({"username": username, "password": PASSWORD}),
            )
            .await;
        assert_eq!(res.status, 200, "Login failed: {}", res.text);

        res.body["token"]
            .as_str()
            .expect("Login response should contain a token")
            .to_string()
    }

    /// Insert an admin directly, since admins cannot self-register, and log in.
    pub async fn admin_token(&self) -> String {
        user::ActiveModel {
            username: Set("admin".to_string()),
            password: Set(hash::hash_password(PASSWORD).expect("Failed to hash password")),
            role: Set(Role::Admin),
            university_id: Set(None),
            college_id: Set(None),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("Failed to insert admin");

        self.login("admin").await
    }

    /// Create a user through the admin API and return its token.
    pub async fn user_token(
        &self,
        admin_token: &str,
        username: &str,
        role: &str,
        university_id: Option<i32>,
        college_id: Option<i32>,
    ) -> String {
        let res = self
            .post_with_token(
                routes::USERS,
                &json!({
                    "username": username,
                    "password": PASSWORD,
                    "role": role,
                    "university_id": university_id,
                    "college_id": college_id,
                }),
                admin_token,
            )
            .await;
        assert_eq!(res.status, 201, "create user failed: {}", res.text);

        self.login(username).await
    }

    pub async fn create_university(&self, token: &str, name: &str) -> i32 {
        let res = self
            .post_with_token(
                routes::UNIVERSITIES,
                &json!({"name": name, "directorate": "Directorate of Collegiate Education"}),
                token,
            )
            .await;
        assert_eq!(res.status, 201, "create_university failed: {}", res.text);
        res.id()
    }

    pub async fn create_college(&self, token: &str, name: &str, university_id: i32) -> i32 {
        let res = self
            .post_with_token(
                routes::COLLEGES,
                &json!({
                    "name": name,
                    "directorate": "Directorate of Collegiate Education",
                    "university_id": university_id,
                    "nss_unit": 96,
                }),
                token,
            )
            .await;
        assert_eq!(res.status, 201, "create_college failed: {}", res.text);
        res.id()
    }

    pub async fn seed_hierarchy(&self, admin_token: &str) -> Hierarchy {
        let university_a = self.create_university(admin_token, "University A").await;
        let university_b = self.create_university(admin_token, "University B").await;
        Hierarchy {
            university_a,
            university_b,
            college_x: self.create_college(admin_token, "College X", university_a).await,
            college_y: self.create_college(admin_token, "College Y", university_a).await,
            college_z: self.create_college(admin_token, "College Z", university_b).await,
        }
    }

    /// Create a department with one programme and return the programme `id`.
    pub async fn create_programme(&self, token: &str, college_id: i32) -> i32 {
        let dept = self
            .post_with_token(
                &routes::college_departments(college_id),
                &json!({"name": "Physics", "code": "PHY"}),
                token,
            )
            .await;
        assert_eq!(dept.status, 201, "create department failed: {}", dept.text);

        let res = self
            .post_with_token(
                &routes::department_programmes(dept.id()),
                &json!({"name": "BSc Physics", "duration_years": 3, "grad_level": "UG"}),
                token,
            )
            .await;
        assert_eq!(res.status, 201, "create programme failed: {}", res.text);
        res.id()
    }

    pub async fn create_volunteer(
        &self,
        token: &str,
        college_id: i32,
        programme_id: i32,
        name: &str,
    ) -> i32 {
        let res = self
            .post_with_token(
                &routes::college_volunteers(college_id),
                &volunteer_body(programme_id, name),
                token,
            )
            .await;
        assert_eq!(res.status, 201, "create_volunteer failed: {}", res.text);
        res.id()
    }

    pub async fn create_event(&self, token: &str, college_id: i32, name: &str) -> i32 {
        let res = self
            .post_with_token(
                &routes::college_events(college_id),
                &json!({"event_name": name, "date": "2025-08-12", "location": "Main hall"}),
                token,
            )
            .await;
        assert_eq!(res.status, 201, "create_event failed: {}", res.text);
        res.id()
    }
}

pub fn volunteer_body(programme_id: i32, name: &str) -> Value {
    json!({
        "programme_id": programme_id,
        "name": name,
        "guardian_name": "Guardian",
        "guardian_mobile": 9876543210i64,
        "sex": "female",
        "dob": "2005-04-01",
        "year": 1,
        "community": "General",
        "address": "12 College Road",
        "blood_group": "O+",
        "height": 160,
        "weight": 55,
        "unit": 96,
        "mobile": 9123456780i64,
        "email": "volunteer@example.com",
        "year_of_enrollment": 2024,
    })
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    pub fn id(&self) -> i32 {
        self.body["id"]
            .as_i64()
            .expect("response body should contain 'id'") as i32
    }

    /// Sorted `id`s of the objects in `body.data`.
    pub fn data_ids(&self) -> Vec<i32> {
        let mut ids: Vec<i32> = self.body["data"]
            .as_array()
            .expect("response body should contain 'data'")
            .iter()
            .map(|item| item["id"].as_i64().expect("item should have 'id'") as i32)
            .collect();
        ids.sort_unstable();
        ids
    }
}
