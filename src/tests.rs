#[cfg(test)]
mod integration_tests {
    use crate::schemas::{ApiResponse, ErrorResponse, HealthResponse};
    use crate::test_utils::test_utils::{
        cookie_server, job_payload, login, register_and_login, register_user, setup_test_app,
        setup_test_app_with_state,
    };
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use chrono::NaiveDate;
    use model::entities::{application, job, user};
    use sea_orm::{EntityTrait, PaginatorTrait};
    use serde_json::{json, Value};

    async fn post_job(server: &TestServer, employer_id: i32) -> i32 {
        let response = server.post("/employers").json(&job_payload(employer_id)).await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<Value> = response.json();
        body.data["id"].as_i64().unwrap() as i32
    }

    fn application_form(job_id: i32) -> MultipartForm {
        MultipartForm::new()
            .add_text("jobId", job_id.to_string())
            .add_text("emailAddress", "student@example.com")
            .add_text("yearOfGraduation", "2025")
            .add_text("candidateStatement", "I would love to join the team")
    }

    async fn apply_for(server: &TestServer, job_id: i32) -> i32 {
        let response = server.post("/apply").multipart(application_form(job_id)).await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<Value> = response.json();
        body.data["id"].as_i64().unwrap() as i32
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server.get("/health").await;

        response.assert_status(StatusCode::OK);
        let body: HealthResponse = response.json();
        assert_eq!(body.status, "healthy");
        assert_eq!(body.database, "connected");
    }

    #[tokio::test]
    async fn test_register_login_and_current_user() {
        let app = setup_test_app().await;
        let server = cookie_server(app);

        let id = register_user(&server, "ada@example.com", "Student").await;

        let response = server
            .post("/auth/login")
            .json(&json!({ "email": "ada@example.com", "password": crate::test_utils::test_utils::TEST_PASSWORD }))
            .await;
        response.assert_status_ok();
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.message, "Login successful");
        assert_eq!(body.data["id"], id);
        assert_eq!(body.data["role"], "Student");

        let response = server.get("/auth/get-current-user").await;
        response.assert_status_ok();
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["email"], "ada@example.com");
        assert_eq!(body.data["id"], id);
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let (app, state) = setup_test_app_with_state().await;
        let server = cookie_server(app);

        register_user(&server, "dup@example.com", "Student").await;

        let response = server
            .post("/auth/register")
            .json(&json!({
                "email": "dup@example.com",
                "firstName": "Other",
                "lastName": "Person",
                "password": "another",
                "userType": "Employer",
            }))
            .await;

        response.assert_status(StatusCode::CONFLICT);
        let body: ErrorResponse = response.json();
        assert_eq!(body.error, "Email already taken");
        assert!(!body.success);
        assert_eq!(user::Entity::find().count(&state.db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_register_rejects_unknown_role() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/auth/register")
            .json(&json!({
                "email": "x@example.com",
                "firstName": "X",
                "lastName": "Y",
                "password": "pw",
                "userType": "Wizard",
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_with_wrong_password() {
        let app = setup_test_app().await;
        let server = cookie_server(app);
        register_user(&server, "bob@example.com", "Employer").await;

        let response = server
            .post("/auth/login")
            .json(&json!({ "email": "bob@example.com", "password": "wrong" }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: ErrorResponse = response.json();
        assert_eq!(body.error, "Invalid username or password");
        assert_eq!(body.code, "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_protected_endpoints_require_session() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        for path in ["/employers", "/jobs", "/students", "/user-applications", "/auth/get-current-user"] {
            let response = server.get(path).await;
            response.assert_status(StatusCode::UNAUTHORIZED);
            let body: ErrorResponse = response.json();
            assert_eq!(body.error, "Authentication required", "path {}", path);
        }
    }

    #[tokio::test]
    async fn test_logout_ends_session() {
        let app = setup_test_app().await;
        let server = cookie_server(app);
        register_and_login(&server, "leaving@example.com", "Student").await;

        let response = server.post("/auth/logout").await;
        response.assert_status_ok();
        let body: ApiResponse<String> = response.json();
        assert_eq!(body.message, "Successfully logged out!");

        server
            .get("/auth/get-current-user")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_create_job_stores_every_field() {
        let (app, state) = setup_test_app_with_state().await;
        let server = cookie_server(app);
        let employer_id = register_and_login(&server, "hr@example.com", "Employer").await;
        assert_eq!(employer_id, 1);

        let job_id = post_job(&server, employer_id).await;

        let stored = job::Entity::find_by_id(job_id).one(&state.db).await.unwrap().unwrap();
        assert_eq!(stored.employer_id, 1);
        assert_eq!(stored.title, "Software Engineer");
        assert_eq!(stored.department, "Engineering");
        assert_eq!(stored.manager_name, "John Doe");
        assert_eq!(stored.manager_email, "john.doe@example.com");
        assert_eq!(stored.hiring_semesters, "Fall, Spring");
        assert_eq!(stored.min_students, 1);
        assert_eq!(stored.max_students, 5);
        assert_eq!(stored.role_location, "Remote");
        assert_eq!(stored.type_of_work, "Full-time");
        assert_eq!(stored.brief_description, "Job description");
        assert_eq!(stored.prerequisites, "");
        assert_eq!(stored.more_details, "");
        assert_eq!(stored.application_deadline, NaiveDate::from_ymd_opt(2022, 12, 31).unwrap());
    }

    #[tokio::test]
    async fn test_create_job_rejects_inverted_student_range() {
        let app = setup_test_app().await;
        let server = cookie_server(app);
        let employer_id = register_and_login(&server, "hr@example.com", "Employer").await;

        let mut payload = job_payload(employer_id);
        payload["minStudents"] = json!(6);
        let response = server.post("/employers").json(&payload).await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_post_job_for_another_employer_requires_admin() {
        let app = setup_test_app().await;
        let employer = cookie_server(app.clone());
        let other = cookie_server(app.clone());
        let admin = cookie_server(app);

        let employer_id = register_and_login(&employer, "first@example.com", "Employer").await;
        register_and_login(&other, "second@example.com", "Employer").await;
        register_and_login(&admin, "root@example.com", "admin").await;

        other
            .post("/post-job")
            .json(&job_payload(employer_id))
            .await
            .assert_status(StatusCode::FORBIDDEN);

        let response = admin.post("/post-job").json(&job_payload(employer_id)).await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["employer_id"], employer_id);

        admin
            .post("/post-job")
            .json(&job_payload(999))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_partial_job_update_keeps_other_fields() {
        let app = setup_test_app().await;
        let server = cookie_server(app);
        let employer_id = register_and_login(&server, "hr@example.com", "Employer").await;
        let job_id = post_job(&server, employer_id).await;

        let response = server
            .put(&format!("/jobs/{}", job_id))
            .json(&json!({ "title": "Data Engineer", "maxStudents": 8 }))
            .await;
        response.assert_status_ok();

        let body: ApiResponse<Value> = server.get(&format!("/jobs/{}", job_id)).await.json();
        assert_eq!(body.data["title"], "Data Engineer");
        assert_eq!(body.data["max_students"], 8);
        assert_eq!(body.data["department"], "Engineering");
        assert_eq!(body.data["manager_name"], "John Doe");
        assert_eq!(body.data["application_deadline"], "2022-12-31");

        server
            .put(&format!("/jobs/{}", job_id))
            .json(&json!({ "minStudents": 10 }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .put(&format!("/jobs/{}", job_id))
            .json(&json!({ "salary": 100 }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .put("/jobs/999")
            .json(&json!({ "title": "Ghost" }))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_job_removes_its_applications() {
        let (app, state) = setup_test_app_with_state().await;
        let employer = cookie_server(app.clone());
        let student = cookie_server(app);
        let employer_id = register_and_login(&employer, "hr@example.com", "Employer").await;
        register_and_login(&student, "kid@example.com", "Student").await;

        let job_id = post_job(&employer, employer_id).await;
        apply_for(&student, job_id).await;

        employer
            .delete(&format!("/jobs/{}", job_id))
            .await
            .assert_status_ok();

        assert_eq!(job::Entity::find().count(&state.db).await.unwrap(), 0);
        assert_eq!(application::Entity::find().count(&state.db).await.unwrap(), 0);
        employer
            .get(&format!("/jobs/{}", job_id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_filter_treats_other_department_as_unfiltered() {
        let app = setup_test_app().await;
        let server = cookie_server(app);
        let employer_id = register_and_login(&server, "hr@example.com", "Employer").await;

        post_job(&server, employer_id).await;
        let mut payload = job_payload(employer_id);
        payload["department"] = json!("Marketing");
        payload["title"] = json!("Content Writer");
        payload["roleLocation"] = json!("San Francisco");
        server.post("/employers").json(&payload).await.assert_status(StatusCode::CREATED);

        let all: ApiResponse<Vec<Value>> = server.get("/jobs").await.json();
        let other: ApiResponse<Vec<Value>> = server.get("/jobs?department=Other").await.json();
        assert_eq!(all.data.len(), 2);
        assert_eq!(other.data, all.data);

        let marketing: ApiResponse<Vec<Value>> = server.get("/jobs?department=Marketing").await.json();
        assert_eq!(marketing.data.len(), 1);
        assert_eq!(marketing.data[0]["title"], "Content Writer");

        let keyword: ApiResponse<Vec<Value>> = server.get("/jobs?keyword=software").await.json();
        assert_eq!(keyword.data.len(), 1);
        assert_eq!(keyword.data[0]["title"], "Software Engineer");

        let location: ApiResponse<Vec<Value>> = server.get("/jobs?location=San%20Francisco").await.json();
        assert_eq!(location.data.len(), 1);
        assert_eq!(location.data[0]["role_location"], "San Francisco");
    }

    #[tokio::test]
    async fn test_public_job_search() {
        let app = setup_test_app().await;
        let employer = cookie_server(app.clone());
        let anonymous = TestServer::new(app).unwrap();
        let employer_id = register_and_login(&employer, "hr@example.com", "Employer").await;
        post_job(&employer, employer_id).await;

        let response = anonymous
            .post("/job-search")
            .json(&json!({ "keyword": "engineer", "department": "Other" }))
            .await;
        response.assert_status_ok();
        let body: ApiResponse<Vec<Value>> = response.json();
        assert_eq!(body.data.len(), 1);

        let body: ApiResponse<Vec<Value>> = anonymous
            .post("/job-search")
            .json(&json!({ "keyword": "plumber" }))
            .await
            .json();
        assert!(body.data.is_empty());
    }

    #[tokio::test]
    async fn test_admin_jobs_requires_admin() {
        let app = setup_test_app().await;
        let employer = cookie_server(app.clone());
        let student = cookie_server(app.clone());
        let admin = cookie_server(app);

        let employer_id = register_and_login(&employer, "hr@example.com", "Employer").await;
        register_and_login(&student, "kid@example.com", "Student").await;
        register_and_login(&admin, "root@example.com", "admin").await;
        let job_id = post_job(&employer, employer_id).await;
        apply_for(&student, job_id).await;

        let response = student.get("/admin/jobs").await;
        response.assert_status(StatusCode::FORBIDDEN);
        let body: ErrorResponse = response.json();
        assert_eq!(body.error, "Admin access required");

        let response = admin.get("/admin/jobs").await;
        response.assert_status_ok();
        let body: ApiResponse<Vec<Value>> = response.json();
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0]["job"]["id"], job_id);
        assert_eq!(body.data[0]["employer"]["id"], employer_id);
        assert_eq!(body.data[0]["applications"].as_array().unwrap().len(), 1);
        assert_eq!(body.data[0]["applications"][0]["student_name"], "Test Student");
    }

    #[tokio::test]
    async fn test_apply_with_resume() {
        let (app, state) = setup_test_app_with_state().await;
        let employer = cookie_server(app.clone());
        let student = cookie_server(app);
        let employer_id = register_and_login(&employer, "hr@example.com", "Employer").await;
        let student_id = register_and_login(&student, "kid@example.com", "Student").await;
        let job_id = post_job(&employer, employer_id).await;

        let resume = Part::bytes(b"%PDF-1.4 resume".to_vec())
            .file_name("cv.pdf")
            .mime_type("application/pdf");
        let response = student
            .post("/apply")
            .multipart(application_form(job_id).add_part("resume", resume))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["status"], "pending");
        assert_eq!(body.data["has_resume"], true);
        assert_eq!(body.data["student_id"], student_id);

        let stored = state.upload_dir.join(format!("{}_cv.pdf", student_id));
        assert_eq!(tokio::fs::read(&stored).await.unwrap(), b"%PDF-1.4 resume");

        let mine: ApiResponse<Vec<Value>> = student.get("/user-applications").await.json();
        assert_eq!(mine.data.len(), 1);
        assert_eq!(mine.data[0]["job"]["title"], "Software Engineer");
    }

    #[tokio::test]
    async fn test_apply_validates_form() {
        let app = setup_test_app().await;
        let employer = cookie_server(app.clone());
        let student = cookie_server(app);
        let employer_id = register_and_login(&employer, "hr@example.com", "Employer").await;
        register_and_login(&student, "kid@example.com", "Student").await;
        let job_id = post_job(&employer, employer_id).await;

        let missing_statement = MultipartForm::new()
            .add_text("jobId", job_id.to_string())
            .add_text("emailAddress", "student@example.com")
            .add_text("yearOfGraduation", "2025");
        student
            .post("/apply")
            .multipart(missing_statement)
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let bad_year = MultipartForm::new()
            .add_text("jobId", job_id.to_string())
            .add_text("emailAddress", "student@example.com")
            .add_text("yearOfGraduation", "soon")
            .add_text("candidateStatement", "Hello");
        let response = student.post("/apply").multipart(bad_year).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert_eq!(body.error, "Field 'yearOfGraduation' must be an integer");

        student
            .post("/apply")
            .multipart(application_form(999))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_withdraw_application() {
        let app = setup_test_app().await;
        let employer = cookie_server(app.clone());
        let student = cookie_server(app.clone());
        let stranger = cookie_server(app);
        let employer_id = register_and_login(&employer, "hr@example.com", "Employer").await;
        register_and_login(&student, "kid@example.com", "Student").await;
        register_and_login(&stranger, "other@example.com", "Student").await;
        let job_id = post_job(&employer, employer_id).await;
        let application_id = apply_for(&student, job_id).await;

        student
            .delete("/user-applications/999")
            .await
            .assert_status(StatusCode::NOT_FOUND);
        stranger
            .delete(&format!("/user-applications/{}", application_id))
            .await
            .assert_status(StatusCode::FORBIDDEN);

        let response = student.delete(&format!("/user-applications/{}", application_id)).await;
        response.assert_status_ok();
        let body: ApiResponse<String> = response.json();
        assert_eq!(body.message, "Application withdrawn successfully");

        let mine: ApiResponse<Vec<Value>> = student.get("/user-applications").await.json();
        assert!(mine.data.is_empty());
    }

    #[tokio::test]
    async fn test_update_application_status() {
        let app = setup_test_app().await;
        let employer = cookie_server(app.clone());
        let student = cookie_server(app);
        let employer_id = register_and_login(&employer, "hr@example.com", "Employer").await;
        register_and_login(&student, "kid@example.com", "Student").await;
        let job_id = post_job(&employer, employer_id).await;
        let application_id = apply_for(&student, job_id).await;
        let path = format!("/applications/{}", application_id);

        employer
            .put(&path)
            .json(&json!({ "status": "maybe" }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let response = employer.put(&path).json(&json!({ "status": "accepted" })).await;
        response.assert_status_ok();

        let body: ApiResponse<Value> = employer.get(&path).await.json();
        assert_eq!(body.data["status"], "accepted");

        let received: ApiResponse<Vec<Value>> = employer.get("/applications").await.json();
        assert_eq!(received.data.len(), 1);

        employer.delete(&path).await.assert_status_ok();
        employer.get(&path).await.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_employer_cascades() {
        let (app, state) = setup_test_app_with_state().await;
        let employer = cookie_server(app.clone());
        let student = cookie_server(app.clone());
        let admin = cookie_server(app);
        let employer_id = register_and_login(&employer, "hr@example.com", "Employer").await;
        register_and_login(&student, "kid@example.com", "Student").await;
        register_and_login(&admin, "root@example.com", "admin").await;
        let job_id = post_job(&employer, employer_id).await;
        apply_for(&student, job_id).await;

        student
            .delete(&format!("/users/{}", employer_id))
            .await
            .assert_status(StatusCode::FORBIDDEN);

        admin
            .delete(&format!("/users/{}", employer_id))
            .await
            .assert_status_ok();

        assert!(user::Entity::find_by_id(employer_id).one(&state.db).await.unwrap().is_none());
        assert_eq!(job::Entity::find().count(&state.db).await.unwrap(), 0);
        assert_eq!(application::Entity::find().count(&state.db).await.unwrap(), 0);

        admin
            .delete(&format!("/users/{}", employer_id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_own_account_ends_session() {
        let (app, state) = setup_test_app_with_state().await;
        let server = cookie_server(app);
        let id = register_and_login(&server, "gone@example.com", "Student").await;

        server.delete(&format!("/users/{}", id)).await.assert_status_ok();

        assert_eq!(user::Entity::find().count(&state.db).await.unwrap(), 0);
        server
            .get("/auth/get-current-user")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_all_users_nests_by_role() {
        let app = setup_test_app().await;
        let employer = cookie_server(app.clone());
        let student = cookie_server(app);
        let employer_id = register_and_login(&employer, "hr@example.com", "Employer").await;
        let student_id = register_and_login(&student, "kid@example.com", "Student").await;
        let job_id = post_job(&employer, employer_id).await;
        apply_for(&student, job_id).await;

        let body: ApiResponse<Vec<Value>> = student.get("/auth/all-users").await.json();
        assert_eq!(body.data.len(), 2);

        let employer_row = body.data.iter().find(|u| u["id"] == employer_id).unwrap();
        assert_eq!(employer_row["jobs"].as_array().unwrap().len(), 1);
        assert!(employer_row.get("applications").is_none());
        assert!(employer_row.get("education_level").is_none());

        let student_row = body.data.iter().find(|u| u["id"] == student_id).unwrap();
        assert_eq!(student_row["applications"].as_array().unwrap().len(), 1);
        assert!(student_row.get("jobs").is_none());
    }

    #[tokio::test]
    async fn test_student_and_employer_profiles() {
        let app = setup_test_app().await;
        let student = cookie_server(app.clone());
        let employer = cookie_server(app);
        let student_id = register_and_login(&student, "kid@example.com", "Student").await;
        let employer_id = register_and_login(&employer, "hr@example.com", "Employer").await;

        let response = student
            .put(&format!("/students/{}", student_id))
            .json(&json!({ "educationLevel": "Sophomore", "resume": "Rust, SQL" }))
            .await;
        response.assert_status_ok();
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["education_level"], "Sophomore");
        assert_eq!(body.data["first_name"], "Test");

        employer
            .put(&format!("/students/{}", student_id))
            .json(&json!({ "resume": "hijacked" }))
            .await
            .assert_status(StatusCode::FORBIDDEN);

        let students: ApiResponse<Vec<Value>> = employer.get("/students").await.json();
        assert_eq!(students.data.len(), 1);
        assert_eq!(students.data[0]["resume"], "Rust, SQL");

        employer
            .put(&format!("/employers/{}", employer_id))
            .json(&json!({ "email": "kid@example.com" }))
            .await
            .assert_status(StatusCode::CONFLICT);

        let response = employer
            .put(&format!("/employers/{}", employer_id))
            .json(&json!({ "firstName": "Grace" }))
            .await;
        response.assert_status_ok();
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["first_name"], "Grace");
    }

    #[tokio::test]
    async fn test_team_crud() {
        let app = setup_test_app().await;
        let anonymous = TestServer::new(app.clone()).unwrap();
        let member = cookie_server(app);
        register_and_login(&member, "lead@example.com", "Employer").await;

        let response = anonymous
            .post("/teams")
            .json(&json!({
                "name": "Platform",
                "manager": "Jane Roe",
                "email": "platform@example.com",
                "max_students": "3",
                "contact": "Slack #platform",
                "priority": "High",
                "recruiting_for": "Spring",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<Value> = response.json();
        let team_id = body.data["id"].as_i64().unwrap();
        assert_eq!(body.data["max_students"], 3);

        let teams: ApiResponse<Vec<Value>> = anonymous.get("/teams").await.json();
        assert_eq!(teams.data.len(), 1);

        let path = format!("/teams/{}", team_id);
        anonymous
            .put(&path)
            .json(&json!({ "priority": "Low" }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        let response = member.put(&path).json(&json!({ "priority": "Low" })).await;
        response.assert_status_ok();
        let body: ApiResponse<Value> = anonymous.get(&path).await.json();
        assert_eq!(body.data["priority"], "Low");
        assert_eq!(body.data["name"], "Platform");

        anonymous.delete(&path).await.assert_status(StatusCode::UNAUTHORIZED);
        member.delete(&path).await.assert_status_ok();
        anonymous.get(&path).await.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_tracker_crud() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/ws-position-tracker")
            .json(&json!({
                "student_id": 12345,
                "minerva_email": "kid@minerva.edu",
                "full_name": "Kid Student",
                "expected_grad_year": "2026",
                "ws_eligible": true,
                "department_name": "Library",
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: ApiResponse<Value> = response.json();
        let tracker_id = body.data["id"].as_i64().unwrap();
        assert_eq!(body.data["student_id"], "12345");
        assert_eq!(body.data["expected_grad_year"], 2026);
        assert_eq!(body.data["ws_eligible"], true);

        let path = format!("/ws-position-tracker/{}", tracker_id);
        let response = server
            .put(&path)
            .json(&json!({ "merge_status": "Merged", "notes": "Paperwork done" }))
            .await;
        response.assert_status_ok();

        let body: ApiResponse<Value> = server.get(&path).await.json();
        assert_eq!(body.data["merge_status"], "Merged");
        assert_eq!(body.data["full_name"], "Kid Student");

        let all: ApiResponse<Vec<Value>> = server.get("/ws-position-tracker").await.json();
        assert_eq!(all.data.len(), 1);

        server.delete(&path).await.assert_status_ok();
        server.get(&path).await.assert_status(StatusCode::NOT_FOUND);
        server.delete(&path).await.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_login_after_reregistering_same_server() {
        let app = setup_test_app().await;
        let server = cookie_server(app);
        register_user(&server, "a@example.com", "Student").await;
        register_user(&server, "b@example.com", "Employer").await;

        login(&server, "a@example.com").await;
        let body: ApiResponse<Value> = server.get("/auth/get-current-user").await.json();
        assert_eq!(body.data["email"], "a@example.com");

        login(&server, "b@example.com").await;
        let body: ApiResponse<Value> = server.get("/auth/get-current-user").await.json();
        assert_eq!(body.data["email"], "b@example.com");
        assert_eq!(body.data["role"], "Employer");
    }

    #[tokio::test]
    async fn test_health_reports_unreachable_database() {
        let (app, state) = setup_test_app_with_state().await;
        let server = TestServer::new(app).unwrap();
        state.db.clone().close().await.unwrap();

        let response = server.get("/health").await;

        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        let body: HealthResponse = response.json();
        assert_eq!(body.status, "unhealthy");
        assert_eq!(body.database, "disconnected");
    }

    #[tokio::test]
    async fn test_employer_email_change_frees_old_address() {
        let app = setup_test_app().await;
        let server = cookie_server(app);
        let employer_id = register_and_login(&server, "old@example.com", "Employer").await;

        let response = server
            .put(&format!("/employers/{}", employer_id))
            .json(&json!({ "email": "new@example.com" }))
            .await;
        response.assert_status_ok();
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["username"], "new@example.com");

        register_user(&server, "old@example.com", "Student").await;
        login(&server, "new@example.com").await;
        let body: ApiResponse<Value> = server.get("/auth/get-current-user").await.json();
        assert_eq!(body.data["id"], employer_id);
    }

    #[tokio::test]
    async fn test_filter_validation_uses_error_envelope() {
        let app = setup_test_app().await;
        let server = cookie_server(app);
        register_and_login(&server, "kid@example.com", "Student").await;

        let response = server.get(&format!("/jobs?keyword={}", "a".repeat(201))).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: ErrorResponse = response.json();
        assert_eq!(body.code, "VALIDATION_ERROR");
        assert!(!body.success);
    }

    #[tokio::test]
    async fn test_job_requires_hiring_semesters() {
        let (app, state) = setup_test_app_with_state().await;
        let server = cookie_server(app);
        let employer_id = register_and_login(&server, "hr@example.com", "Employer").await;

        for empty in [json!([]), json!("   "), json!(["", " "])] {
            let mut payload = job_payload(employer_id);
            payload["hiringSemesters"] = empty;
            let response = server.post("/employers").json(&payload).await;
            response.assert_status(StatusCode::BAD_REQUEST);
            let body: ErrorResponse = response.json();
            assert_eq!(body.code, "VALIDATION_ERROR");
        }
        assert_eq!(job::Entity::find().count(&state.db).await.unwrap(), 0);

        let job_id = post_job(&server, employer_id).await;
        server
            .put(&format!("/jobs/{}", job_id))
            .json(&json!({ "hiringSemesters": [] }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let response = server
            .put(&format!("/jobs/{}", job_id))
            .json(&json!({ "hiringSemesters": ["Summer", "Fall"] }))
            .await;
        response.assert_status_ok();
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["hiring_semesters"], "Summer,Fall");
    }

    #[tokio::test]
    async fn test_delete_student_removes_their_applications() {
        let (app, state) = setup_test_app_with_state().await;
        let employer = cookie_server(app.clone());
        let student = cookie_server(app);
        let employer_id = register_and_login(&employer, "hr@example.com", "Employer").await;
        let student_id = register_and_login(&student, "kid@example.com", "Student").await;
        let job_id = post_job(&employer, employer_id).await;
        apply_for(&student, job_id).await;
        assert_eq!(application::Entity::find().count(&state.db).await.unwrap(), 1);

        student
            .delete(&format!("/users/{}", student_id))
            .await
            .assert_status_ok();

        assert_eq!(application::Entity::find().count(&state.db).await.unwrap(), 0);
        assert!(user::Entity::find_by_id(student_id).one(&state.db).await.unwrap().is_none());
        assert!(job::Entity::find_by_id(job_id).one(&state.db).await.unwrap().is_some());

        let received: ApiResponse<Vec<Value>> = employer.get("/applications").await.json();
        assert!(received.data.is_empty());
    }

    #[tokio::test]
    async fn test_tracker_update_accepts_numeric_student_id() {
        let app = setup_test_app().await;
        let server = TestServer::new(app).unwrap();

        let body: ApiResponse<Value> = server
            .post("/ws-position-tracker")
            .json(&json!({
                "student_id": "0042",
                "minerva_email": "kid@minerva.edu",
                "full_name": "Kid Student",
            }))
            .await
            .json();
        let path = format!("/ws-position-tracker/{}", body.data["id"]);

        let response = server.put(&path).json(&json!({ "student_id": 12345 })).await;

        response.assert_status_ok();
        let body: ApiResponse<Value> = response.json();
        assert_eq!(body.data["student_id"], "12345");
    }
}
