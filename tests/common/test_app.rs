use once_cell::sync::Lazy;
use serde_json::json;
use std::fs::copy;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use planty::config::Settings;
use planty::database::{new_pool, run_migrations};
use planty::repository::{self, Repo};
use planty::test_fixtures::settings::{settings_with, TEST_ENV};

pub struct TestApp {
    pub repo: Repo,
    pub settings: Settings,
    pub sms_server: MockServer,
    // Keeps the database file alive for the duration of the test.
    _db_dir: TempDir,
}

const DB_TEMPLATE_FILE: &str = "test.db";

static TEST_DB_TEMPLATE: Lazy<TempDir> = Lazy::new(|| {
    let temp_dir = TempDir::new().unwrap();
    let template_db_path = temp_dir.path().join(DB_TEMPLATE_FILE);

    let pool = new_pool(template_db_path.to_str().unwrap()).unwrap();
    run_migrations(&pool).expect("diesel migrations");

    temp_dir
});

pub fn messages_path() -> String {
    format!(
        "/2010-04-01/Accounts/{}/Messages.json",
        TEST_ENV["TWILIO_SID"]
    )
}

impl TestApp {
    /// Accepts one message to the given national number and answers with `sid`.
    pub async fn accept_sms(&self, phone_digits: &str, sid: &str, times: u64) {
        Mock::given(method("POST"))
            .and(path(messages_path()))
            .and(body_string_contains(format!("To=%2B1{}", phone_digits)))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "sid": sid,
                "status": "queued",
            })))
            .expect(times)
            .mount(&self.sms_server)
            .await;
    }

    /// Rejects messages to the given national number the way Twilio does.
    pub async fn reject_sms(&self, phone_digits: &str, times: u64) {
        Mock::given(method("POST"))
            .and(path(messages_path()))
            .and(body_string_contains(format!("To=%2B1{}", phone_digits)))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "code": 21211,
                "message": "The 'To' number is not a valid phone number.",
                "status": 400,
            })))
            .expect(times)
            .mount(&self.sms_server)
            .await;
    }
}

pub async fn spawn_app() -> TestApp {
    let db_dir = TempDir::new().unwrap();
    let db_path = db_dir.path().join(DB_TEMPLATE_FILE);
    copy(TEST_DB_TEMPLATE.path().join(DB_TEMPLATE_FILE), &db_path).unwrap();

    let sms_server = MockServer::start().await;
    let sms_uri = sms_server.uri();
    let settings = settings_with(&[
        ("DATABASE_URL", db_path.to_str().unwrap()),
        ("TWILIO_API_URL", sms_uri.as_str()),
    ]);

    let repo = repository::implementation(&settings.database_url)
        .await
        .expect("Could not open test database");

    TestApp {
        repo,
        settings,
        sms_server,
        _db_dir: db_dir,
    }
}
