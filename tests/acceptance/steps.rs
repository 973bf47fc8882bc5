use crate::IssuesWorld;
use crate::stub;
use cucumber::{given, then, when};
use issuecheck::auth::Credentials;
use issuecheck::config::SuiteConfig;
use issuecheck::suite::{self, CaseId, CaseOutcome};
use wiremock::MockServer;

fn stub_server(world: &IssuesWorld) -> &MockServer {
    world
        .stub
        .as_ref()
        .expect("The Issues API stub is not running")
}

fn outcome(world: &IssuesWorld) -> &CaseOutcome {
    world.outcome.as_ref().expect("No case has run yet")
}

#[given("the Issues API stub is running")]
async fn given_stub_is_running(world: &mut IssuesWorld) {
    world.stub = Some(stub::start().await);
    world.credentials =
        Some(Credentials::new(stub::USER, stub::TOKEN).expect("Valid stub credentials"));
}

#[given("no credentials are configured")]
async fn given_no_credentials(world: &mut IssuesWorld) {
    world.credentials = None;
}

#[given("the configured token is wrong")]
async fn given_wrong_token(world: &mut IssuesWorld) {
    world.credentials =
        Some(Credentials::new(stub::USER, "not-the-token").expect("Valid credentials"));
}

#[given(regex = r#"^the API answers updates with title "(.*)"$"#)]
async fn given_updates_answer_with_title(world: &mut IssuesWorld, title: String) {
    stub::answer_updates_with_title(stub_server(world), &title).await;
}

#[given("the repository has no issues")]
async fn given_no_issues(world: &mut IssuesWorld) {
    stub::answer_list_with(stub_server(world), serde_json::json!([])).await;
}

#[given(regex = r#"^the repository lists an issue without a title$"#)]
async fn given_issue_without_title(world: &mut IssuesWorld) {
    stub::answer_list_with(
        stub_server(world),
        serde_json::json!([
            {"id": 1001, "number": 1, "title": "First issue"},
            {"id": 1002, "number": 2, "title": ""}
        ]),
    )
    .await;
}

#[when(regex = r#"^the "([a-z-]+)" case runs$"#)]
async fn when_case_runs(world: &mut IssuesWorld, name: String) {
    let id = CaseId::from_name(&name).unwrap_or_else(|| panic!("Unknown case `{name}`"));
    let config = SuiteConfig::new(
        &stub_server(world).uri(),
        stub::REPOSITORY.parse().expect("Valid stub repository"),
        world.credentials.clone(),
    )
    .expect("Valid stub configuration");

    world.outcome = Some(suite::run_case(&config, &suite::case(id)).await);
}

#[then(regex = r#"^the response status should be (\d+)$"#)]
async fn then_status_should_be(world: &mut IssuesWorld, expected: u16) {
    let status = outcome(world).status.map(|status| status.as_u16());
    assert_eq!(status, Some(expected), "Outcome: {:?}", world.outcome);
}

#[then("the case should pass")]
async fn then_case_should_pass(world: &mut IssuesWorld) {
    let outcome = outcome(world);
    assert!(outcome.passed(), "{outcome}");
}

#[then(regex = r#"^the case should fail with "(.*)"$"#)]
async fn then_case_should_fail_with(world: &mut IssuesWorld, expected: String) {
    let outcome = outcome(world);
    let failure = match &outcome.result {
        Ok(()) => panic!("Expected {} to fail with {expected:?}", outcome.case),
        Err(failure) => failure.to_string(),
    };
    assert!(
        failure.contains(&expected),
        "Expected failure containing {expected:?}, got {failure:?}"
    );
}

#[then("no request should have reached the API")]
async fn then_no_request_sent(world: &mut IssuesWorld) {
    let requests = stub_server(world)
        .received_requests()
        .await
        .expect("Request recording is enabled");
    assert!(
        requests.is_empty(),
        "Expected no requests, got {}",
        requests.len()
    );
}
