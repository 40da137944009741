//! API integration tests
//!
//! Need a running server on localhost:8080 started with the development
//! configuration, which creates the `admin` account.

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Suffix keeping usernames and ISBNs apart between runs
fn unique() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .subsec_nanos();
    format!("{:09}", nanos)
}

async fn login(client: &Client, username: &str, password: &str) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": username,
            "password": password
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

/// Helper to get an administrator token
async fn admin_token(client: &Client) -> String {
    login(client, "admin", "admin").await
}

/// Create a user through the admin panel and return its id
async fn create_user(client: &Client, admin: &str, username: &str, role: &str) -> i64 {
    let response = client
        .post(format!("{}/admin/users", BASE_URL))
        .bearer_auth(admin)
        .json(&json!({
            "username": username,
            "email": format!("{}@example.org", username),
            "role": role,
            "password1": "secret",
            "password2": "secret"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No id in response")
}

async fn create_book(client: &Client, admin: &str, title: &str) -> i64 {
    let response = client
        .post(format!("{}/admin/books", BASE_URL))
        .bearer_auth(admin)
        .json(&json!({
            "title": title,
            "author": "Jorge Luis Borges",
            "isbn": format!("978{}", unique())
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["id"].as_i64().expect("No id in response")
}

async fn checkout(client: &Client, librarian: &str, user_id: i64, book_id: i64, due_date: Option<&str>) -> Value {
    let response = client
        .post(format!("{}/loans", BASE_URL))
        .bearer_auth(librarian)
        .json(&json!({
            "user_id": user_id,
            "book_id": book_id,
            "due_date": due_date
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.expect("Failed to parse response")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["redirect"], "/admin/panel");
    assert!(body["user"]["password_hash"].is_null());
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "InvalidCredentials");
}

#[tokio::test]
#[ignore]
async fn test_role_login_page_rejects_other_roles() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login/librarian", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "WrongRole");
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/dashboard/librarian", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_wrong_dashboard_redirects_with_warning() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let username = format!("student{}", unique());
    create_user(&client, &admin, &username, "student").await;
    let student = login(&client, &username, "secret").await;

    let response = client
        .get(format!("{}/dashboard/librarian", BASE_URL))
        .bearer_auth(&student)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "PermissionDenied");
    assert_eq!(body["level"], "warning");
    assert_eq!(body["redirect"], "/");

    let own = client
        .get(format!("{}/dashboard/student", BASE_URL))
        .bearer_auth(&student)
        .send()
        .await
        .expect("Failed to send request");
    assert!(own.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_reserving_available_book_is_refused() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let username = format!("prof{}", unique());
    create_user(&client, &admin, &username, "professor").await;
    let professor = login(&client, &username, "secret").await;
    let book_id = create_book(&client, &admin, "Ficciones").await;

    let response = client
        .post(format!("{}/books/{}/reserve", BASE_URL, book_id))
        .bearer_auth(&professor)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "BookAvailable");
    assert_eq!(body["level"], "warning");
    assert_eq!(body["redirect"], "/dashboard/professor");
}

#[tokio::test]
#[ignore]
async fn test_loan_lifecycle() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let suffix = unique();
    let borrower_name = format!("ana{}", suffix);
    let borrower_id = create_user(&client, &admin, &borrower_name, "student").await;
    let librarian_name = format!("lib{}", suffix);
    create_user(&client, &admin, &librarian_name, "librarian").await;
    let other_name = format!("eva{}", suffix);
    create_user(&client, &admin, &other_name, "student").await;

    let borrower = login(&client, &borrower_name, "secret").await;
    let librarian = login(&client, &librarian_name, "secret").await;
    let other = login(&client, &other_name, "secret").await;
    let book_id = create_book(&client, &admin, "El Aleph").await;

    let body = checkout(&client, &librarian, borrower_id, book_id, None).await;
    let loan_id = body["loan"]["id"].as_i64().expect("No loan id");
    assert_eq!(body["loan"]["renewed"], false);
    assert_eq!(body["loan"]["fine_amount"], 0);

    // Book is out, so it can now be reserved
    let reserve = client
        .post(format!("{}/books/{}/reserve", BASE_URL, book_id))
        .bearer_auth(&other)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(reserve.status(), StatusCode::CREATED);
    let body: Value = reserve.json().await.expect("Failed to parse response");
    assert_eq!(body["reservation"]["book_id"].as_i64(), Some(book_id));
    assert_eq!(body["reservation"]["fulfilled"], false);

    // Nobody renews someone else's loan
    let foreign = client
        .post(format!("{}/loans/{}/renew", BASE_URL, loan_id))
        .bearer_auth(&other)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(foreign.status(), StatusCode::NOT_FOUND);

    let renewed = client
        .post(format!("{}/loans/{}/renew", BASE_URL, loan_id))
        .bearer_auth(&borrower)
        .send()
        .await
        .expect("Failed to send request");
    assert!(renewed.status().is_success());
    let body: Value = renewed.json().await.expect("Failed to parse response");
    assert_eq!(body["loan"]["renewed"], true);

    let again = client
        .post(format!("{}/loans/{}/renew", BASE_URL, loan_id))
        .bearer_auth(&borrower)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(again.status(), StatusCode::CONFLICT);
    let body: Value = again.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "AlreadyRenewed");
    assert_eq!(body["redirect"], "/dashboard/student");

    let fine = client
        .post(format!("{}/loans/{}/pay-fine", BASE_URL, loan_id))
        .bearer_auth(&librarian)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(fine.status(), StatusCode::CONFLICT);
    let body: Value = fine.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "NoFineDue");

    let returned = client
        .post(format!("{}/loans/{}/return", BASE_URL, loan_id))
        .bearer_auth(&librarian)
        .send()
        .await
        .expect("Failed to send request");
    assert!(returned.status().is_success());

    let twice = client
        .post(format!("{}/loans/{}/return", BASE_URL, loan_id))
        .bearer_auth(&librarian)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(twice.status(), StatusCode::CONFLICT);

    let book: Value = client
        .get(format!("{}/books/{}", BASE_URL, book_id))
        .bearer_auth(&borrower)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    assert_eq!(book["available"], true);

    // Returning the loan leaves the reservation open
    let dashboard: Value = client
        .get(format!("{}/dashboard/student", BASE_URL))
        .bearer_auth(&other)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let reservations: Vec<&Value> = dashboard["reservations"]
        .as_array()
        .expect("Expected a list")
        .iter()
        .filter(|r| r["book_id"].as_i64() == Some(book_id))
        .collect();
    assert_eq!(reservations.len(), 1);
    assert_eq!(reservations[0]["fulfilled"], false);
}

#[tokio::test]
#[ignore]
async fn test_concurrent_checkouts_lend_a_book_once() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let suffix = unique();
    let first = create_user(&client, &admin, &format!("uno{}", suffix), "student").await;
    let second = create_user(&client, &admin, &format!("dos{}", suffix), "professor").await;
    let librarian_name = format!("desk{}", suffix);
    create_user(&client, &admin, &librarian_name, "librarian").await;
    let librarian = login(&client, &librarian_name, "secret").await;

    for round in 0..10 {
        let book_id = create_book(&client, &admin, &format!("Pedro Páramo {}", round)).await;
        let send = |user_id: i64| {
            client
                .post(format!("{}/loans", BASE_URL))
                .bearer_auth(&librarian)
                .json(&json!({ "user_id": user_id, "book_id": book_id }))
                .send()
        };

        let (a, b) = tokio::join!(send(first), send(second));
        let mut statuses = vec![
            a.expect("Failed to send request").status(),
            b.expect("Failed to send request").status(),
        ];
        statuses.sort();
        assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::CONFLICT]);

        let book: Value = client
            .get(format!("{}/books/{}", BASE_URL, book_id))
            .bearer_auth(&librarian)
            .send()
            .await
            .expect("Failed to send request")
            .json()
            .await
            .expect("Failed to parse response");
        assert_eq!(book["available"], false);
    }
}

#[tokio::test]
#[ignore]
async fn test_concurrent_duplicate_username_is_a_conflict() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let username = format!("twin{}", unique());
    let send = || {
        client
            .post(format!("{}/admin/users", BASE_URL))
            .bearer_auth(&admin)
            .json(&json!({
                "username": username,
                "email": "twin@example.org",
                "password1": "secret",
                "password2": "secret"
            }))
            .send()
    };

    let (a, b) = tokio::join!(send(), send());
    let mut statuses = vec![
        a.expect("Failed to send request").status(),
        b.expect("Failed to send request").status(),
    ];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::CONFLICT]);
}

#[tokio::test]
#[ignore]
async fn test_issued_token_follows_account_changes() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let username = format!("mut{}", unique());
    let user_id = create_user(&client, &admin, &username, "student").await;
    let token = login(&client, &username, "secret").await;

    let promoted = client
        .put(format!("{}/admin/users/{}", BASE_URL, user_id))
        .bearer_auth(&admin)
        .json(&json!({ "role": "professor" }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(promoted.status().is_success());

    let student_page = client
        .get(format!("{}/dashboard/student", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(student_page.status(), StatusCode::FORBIDDEN);

    let professor_page = client
        .get(format!("{}/dashboard/professor", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert!(professor_page.status().is_success());

    let deactivated = client
        .put(format!("{}/admin/users/{}", BASE_URL, user_id))
        .bearer_auth(&admin)
        .json(&json!({ "is_active": false }))
        .send()
        .await
        .expect("Failed to send request");
    assert!(deactivated.status().is_success());

    let refused = client
        .get(format!("{}/auth/me", BASE_URL))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(refused.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore]
async fn test_checkout_rejects_due_date_before_today() {
    let client = Client::new();
    let admin = admin_token(&client).await;
    let suffix = unique();
    let borrower_id = create_user(&client, &admin, &format!("leo{}", suffix), "student").await;
    let librarian_name = format!("bib{}", suffix);
    create_user(&client, &admin, &librarian_name, "librarian").await;
    let librarian = login(&client, &librarian_name, "secret").await;
    let book_id = create_book(&client, &admin, "Rayuela").await;

    let response = client
        .post(format!("{}/loans", BASE_URL))
        .bearer_auth(&librarian)
        .json(&json!({
            "user_id": borrower_id,
            "book_id": book_id,
            "due_date": "2000-01-01"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "InvalidDueDate");
}

#[tokio::test]
#[ignore]
async fn test_administrators_cannot_be_deleted() {
    let client = Client::new();
    let admin = admin_token(&client).await;

    let me: Value = client
        .get(format!("{}/auth/me", BASE_URL))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");
    let admin_id = me["id"].as_i64().expect("No id");

    let response = client
        .delete(format!("{}/admin/users/{}", BASE_URL, admin_id))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "CannotDeleteAdministrator");
    assert_eq!(body["redirect"], "/admin/panel/users");

    let victim = create_user(&client, &admin, &format!("tmp{}", unique()), "student").await;
    let deleted = client
        .delete(format!("{}/admin/users/{}", BASE_URL, victim))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to send request");
    assert!(deleted.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_password_confirmation_must_match() {
    let client = Client::new();
    let admin = admin_token(&client).await;

    let response = client
        .post(format!("{}/admin/users", BASE_URL))
        .bearer_auth(&admin)
        .json(&json!({
            "username": format!("mis{}", unique()),
            "email": "mismatch@example.org",
            "password1": "secret",
            "password2": "secreto"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "PasswordMismatch");
}

#[tokio::test]
#[ignore]
async fn test_settings_upsert() {
    let client = Client::new();
    let admin = admin_token(&client).await;

    let response = client
        .put(format!("{}/admin/settings", BASE_URL))
        .bearer_auth(&admin)
        .json(&json!({
            "settings": [{ "name": "library_name", "value": "Biblioteca Central" }]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    let stored = body
        .as_array()
        .expect("Expected a list")
        .iter()
        .find(|s| s["name"] == "library_name")
        .expect("Setting missing");
    assert_eq!(stored["value"], "Biblioteca Central");
}
