#[cfg(test)]
mod tests {
    use rocket::http::{ContentType, Header, Status};

    use crate::models::NOT_SUBMITTED;
    use crate::routes::base_file_name;
    use crate::test::test_utils::{
        create_standard_test_db, monday, saturday, setup_test_client, thursday, tuesday,
        TestDbBuilder,
    };

    fn location(response: &rocket::local::asynchronous::LocalResponse<'_>) -> Option<String> {
        response.headers().get_one("Location").map(String::from)
    }

    #[rocket::async_test]
    async fn test_home_page() {
        let test_db = create_standard_test_db().await;
        let (client, _) = setup_test_client(test_db, tuesday()).await;

        let response = client.get("/").dispatch().await;
        assert_eq!(response.status(), Status::Ok);

        let body = response.into_string().await.unwrap();
        assert!(body.contains("Test Student"));
        assert!(body.contains("Tuesday"));
        assert!(body.contains("03 June, 2025"));
        assert!(body.contains("/generate_questions"));
    }

    #[rocket::async_test]
    async fn test_generate_then_view_today() {
        let test_db = create_standard_test_db().await;
        let (client, test_db) = setup_test_client(test_db, tuesday()).await;

        let response = client.post("/generate_questions").dispatch().await;
        assert_eq!(response.status(), Status::SeeOther);
        assert_eq!(location(&response).as_deref(), Some("/today"));

        let log = test_db.log_for(tuesday()).await.expect("log should exist");
        assert_eq!(log.questions.len(), 10);

        let response = client.get("/today").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let body = response.into_string().await.unwrap();
        assert!(body.contains(&format!("/submit_answers/{}", log.id)));
        assert!(body.contains("answer[10]"));
        assert!(body.contains("Type the precise one-line answer..."));
        assert!(!body.contains("type=\"file\""));

        let response = client.post("/generate_questions").dispatch().await;
        assert_eq!(response.status(), Status::SeeOther);
        assert_eq!(test_db.log_count().await, 1);

        let home = client.get("/").dispatch().await.into_string().await.unwrap();
        assert!(home.contains("Continue today"));
    }

    #[rocket::async_test]
    async fn test_today_redirects_home_before_generation() {
        let test_db = create_standard_test_db().await;
        let (client, _) = setup_test_client(test_db, monday()).await;

        let response = client.get("/today").dispatch().await;
        assert_eq!(response.status(), Status::SeeOther);
        assert_eq!(location(&response).as_deref(), Some("/"));
    }

    #[rocket::async_test]
    async fn test_rest_day() {
        let test_db = create_standard_test_db().await;
        let (client, test_db) = setup_test_client(test_db, saturday()).await;

        let response = client.post("/generate_questions").dispatch().await;
        assert_eq!(response.status(), Status::SeeOther);

        let response = client.get("/today").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let body = response.into_string().await.unwrap();
        assert!(body.contains("rest day"));
        assert!(!body.contains("answer[1]"));

        assert_eq!(test_db.log_count().await, 0);
    }

    #[rocket::async_test]
    async fn test_insufficient_bank_page() {
        let test_db = TestDbBuilder::new()
            .questions("Tuesday", 3)
            .build()
            .await
            .unwrap();
        let (client, test_db) = setup_test_client(test_db, tuesday()).await;

        let response = client.post("/generate_questions").dispatch().await;
        assert_eq!(response.status(), Status::Conflict);
        let body = response.into_string().await.unwrap();
        assert!(body.contains("Not enough questions in the Tuesday bank"));
        assert_eq!(test_db.log_count().await, 0);
    }

    #[rocket::async_test]
    async fn test_submit_text_answers() {
        let test_db = TestDbBuilder::new()
            .questions("Monday", 3)
            .build()
            .await
            .unwrap();
        let (client, test_db) = setup_test_client(test_db, monday()).await;

        client.post("/generate_questions").dispatch().await;
        let log = test_db.log_for(monday()).await.expect("log should exist");

        let response = client
            .post(format!("/submit_answers/{}", log.id))
            .header(ContentType::Form)
            .body("answer%5B1%5D=42&answer%5B3%5D=")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::SeeOther);
        assert_eq!(location(&response).as_deref(), Some("/today"));

        let log = test_db.log_for(monday()).await.unwrap();
        assert_eq!(log.questions[0].submitted_answer, "42");
        assert_eq!(log.questions[1].submitted_answer, NOT_SUBMITTED);
        assert_eq!(log.questions[2].submitted_answer, NOT_SUBMITTED);

        let body = client.get("/today").dispatch().await.into_string().await.unwrap();
        assert!(body.contains("Your answers have been submitted"));
    }

    fn drawing_form(file_name: &str, content_type: &str) -> String {
        format!(
            concat!(
                "--BOUNDARY\r\n",
                "Content-Disposition: form-data; name=\"answer[1]\"\r\n",
                "\r\n",
                "see attached\r\n",
                "--BOUNDARY\r\n",
                "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
                "Content-Type: {}\r\n",
                "\r\n",
                "not-really-an-image\r\n",
                "--BOUNDARY--\r\n",
            ),
            file_name, content_type
        )
    }

    async fn submit_drawing(
        client: &rocket::local::asynchronous::Client,
        log_id: i64,
        file_name: &str,
        content_type: &str,
    ) -> Status {
        client
            .post(format!("/submit_answers/{}", log_id))
            .header(Header::new(
                "Content-Type",
                "multipart/form-data; boundary=BOUNDARY",
            ))
            .body(drawing_form(file_name, content_type))
            .dispatch()
            .await
            .status()
    }

    #[rocket::async_test]
    async fn test_submit_drawing_upload() {
        let test_db = create_standard_test_db().await;
        let (client, test_db) = setup_test_client(test_db, thursday()).await;

        client.post("/generate_questions").dispatch().await;
        let log = test_db.log_for(thursday()).await.expect("log should exist");

        let today = client.get("/today").dispatch().await.into_string().await.unwrap();
        assert!(today.contains("type=\"file\""));

        let status = submit_drawing(&client, log.id, "neuron.png", "image/png").await;
        assert_eq!(status, Status::SeeOther);

        let log = test_db.log_for(thursday()).await.unwrap();
        assert_eq!(log.questions[0].submitted_answer, "File uploaded: neuron.png");
    }

    #[rocket::async_test]
    async fn test_drawing_upload_keeps_client_file_name() {
        let test_db = create_standard_test_db().await;
        let (client, test_db) = setup_test_client(test_db, thursday()).await;

        client.post("/generate_questions").dispatch().await;
        let log_id = test_db.log_for(thursday()).await.unwrap().id;

        let cases = [
            ("diagram.pdf", "application/octet-stream", "diagram.pdf"),
            ("neuron.v2.png", "image/png", "neuron.v2.png"),
            ("scan.PDF", "application/pdf", "scan.PDF"),
        ];

        for (sent, content_type, stored) in cases {
            let status = submit_drawing(&client, log_id, sent, content_type).await;
            assert_eq!(status, Status::SeeOther, "upload of {}", sent);

            let log = test_db.log_for(thursday()).await.unwrap();
            assert_eq!(
                log.questions[0].submitted_answer,
                format!("File uploaded: {}", stored)
            );
        }
    }

    #[test]
    fn test_base_file_name() {
        assert_eq!(base_file_name("neuron.v2.png"), Some("neuron.v2.png"));
        assert_eq!(base_file_name("../../etc/cell.png"), Some("cell.png"));
        assert_eq!(base_file_name("C:\\scans\\page 1.PDF"), Some("page 1.PDF"));
        assert_eq!(base_file_name("uploads/"), None);
        assert_eq!(base_file_name("   "), None);
    }

    #[rocket::async_test]
    async fn test_submit_to_missing_log() {
        let test_db = create_standard_test_db().await;
        let (client, _) = setup_test_client(test_db, monday()).await;

        let response = client
            .post("/submit_answers/999")
            .header(ContentType::Form)
            .body("answer%5B1%5D=42")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::NotFound);
    }

    #[rocket::async_test]
    async fn test_record_pages() {
        let test_db = create_standard_test_db().await;
        let (client, test_db) = setup_test_client(test_db, monday()).await;

        let empty = client.get("/record").dispatch().await;
        assert_eq!(empty.status(), Status::Ok);
        assert!(empty.into_string().await.unwrap().contains("No homework"));

        client.post("/generate_questions").dispatch().await;
        let log = test_db.log_for(monday()).await.unwrap();

        let body = client.get("/record").dispatch().await.into_string().await.unwrap();
        assert!(body.contains(&format!("/record/{}", log.id)));
        assert!(body.contains("Not answered"));

        let response = client.get(format!("/record/{}", log.id)).dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        let body = response.into_string().await.unwrap();
        assert!(body.contains("Question-Answer (3-5 lines)"));
        assert!(body.contains("Mitochondria are the powerhouse of the cell"));
        assert!(body.contains("not answered yet"));
    }

    #[rocket::async_test]
    async fn test_missing_record_and_unknown_route() {
        let test_db = create_standard_test_db().await;
        let (client, _) = setup_test_client(test_db, monday()).await;

        let response = client.get("/record/12345").dispatch().await;
        assert_eq!(response.status(), Status::NotFound);

        let response = client.get("/does/not/exist").dispatch().await;
        assert_eq!(response.status(), Status::NotFound);
        let body = response.into_string().await.unwrap();
        assert!(body.contains("404 - Page Not Found"));
    }
}
