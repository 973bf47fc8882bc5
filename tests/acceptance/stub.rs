//! In-process stand-in for the GitHub Issues endpoints.

use serde_json::{Value, json};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const REPOSITORY: &str = "octocat/hello-world";
pub const USER: &str = "stub-user";
pub const TOKEN: &str = "stub-token";
/// `Basic base64("stub-user:stub-token")`
const AUTHORIZATION: &str = "Basic c3R1Yi11c2VyOnN0dWItdG9rZW4=";

const ISSUES_PATH: &str = "/repos/octocat/hello-world/issues";
const ISSUE_PATH_PATTERN: &str = r"^/repos/octocat/hello-world/issues/\d+$";

const OVERRIDE_PRIORITY: u8 = 1;
const ISSUE_PRIORITY: u8 = 2;

fn issue_json(id: u64, number: u64, title: &str, body: Option<&str>) -> Value {
    json!({
        "id": id,
        "node_id": format!("I_stub{number}"),
        "number": number,
        "title": title,
        "body": body,
        "state": "open",
        "user": {"login": "octocat", "id": 1},
        "labels": [],
        "comments": 0,
        "html_url": format!("https://github.com/{REPOSITORY}/issues/{number}")
    })
}

fn message(text: &str) -> Value {
    json!({
        "message": text,
        "documentation_url": "https://docs.github.com/rest/issues/issues"
    })
}

fn authorization(request: &Request) -> Option<&str> {
    request
        .headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
}

fn request_body(request: &Request) -> Value {
    serde_json::from_slice(&request.body).unwrap_or(Value::Null)
}

fn create_issue(request: &Request) -> ResponseTemplate {
    match authorization(request) {
        None => return ResponseTemplate::new(404).set_body_json(message("Not Found")),
        Some(AUTHORIZATION) => (),
        Some(_) => return ResponseTemplate::new(401).set_body_json(message("Bad credentials")),
    }
    let body = request_body(request);
    match body["title"].as_str() {
        Some(title) if !title.is_empty() => ResponseTemplate::new(201)
            .set_body_json(issue_json(2008, 8, title, body["body"].as_str())),
        _ => ResponseTemplate::new(422).set_body_json(json!({
            "message": "Validation Failed",
            "errors": [{"resource": "Issue", "code": "missing_field", "field": "title"}]
        })),
    }
}

fn update_issue(request: &Request) -> ResponseTemplate {
    match authorization(request) {
        None => ResponseTemplate::new(401).set_body_json(message("Requires authentication")),
        Some(AUTHORIZATION) => {
            let body = request_body(request);
            let title = body["title"].as_str().unwrap_or("Seventh issue");
            ResponseTemplate::new(200).set_body_json(issue_json(
                1007,
                7,
                title,
                body["body"].as_str(),
            ))
        }
        Some(_) => ResponseTemplate::new(401).set_body_json(message("Bad credentials")),
    }
}

/// Starts a stub that answers the way github.com does for the target repository.
pub async fn start() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(ISSUES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            issue_json(1001, 1, "First issue", Some("Opened by the stub")),
            issue_json(1007, 7, "Seventh issue", None),
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{ISSUES_PATH}/1")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(issue_json(
                1001,
                1,
                "First issue",
                Some("Opened by the stub"),
            )),
        )
        .with_priority(ISSUE_PRIORITY)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(ISSUE_PATH_PATTERN))
        .respond_with(ResponseTemplate::new(404).set_body_json(message("Not Found")))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(ISSUES_PATH))
        .respond_with(create_issue)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path_regex(ISSUE_PATH_PATTERN))
        .respond_with(ResponseTemplate::new(404).set_body_json(message("Not Found")))
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path_regex(ISSUE_PATH_PATTERN))
        .respond_with(update_issue)
        .mount(&server)
        .await;

    server
}

/// Makes every update answer with `title`, whatever was sent
pub async fn answer_updates_with_title(server: &MockServer, title: &str) {
    Mock::given(method("PATCH"))
        .and(path_regex(ISSUE_PATH_PATTERN))
        .respond_with(ResponseTemplate::new(200).set_body_json(issue_json(1007, 7, title, None)))
        .with_priority(OVERRIDE_PRIORITY)
        .mount(server)
        .await;
}

pub async fn answer_list_with(server: &MockServer, issues: Value) {
    Mock::given(method("GET"))
        .and(path(ISSUES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(issues))
        .with_priority(OVERRIDE_PRIORITY)
        .mount(server)
        .await;
}
