// system-tests/tests/suites/client_requests.rs
// ============================================================================
// Module: Request Shape Tests
// Description: Wire-level checks on the requests each step sends.
// Purpose: Ensure headers, query strings, and bodies match the API contract.
// Dependencies: system-tests helpers, idea-center-harness, serde_json
// ============================================================================

//! Request shape coverage: bearer header, `ideaId` query, and JSON bodies.

use idea_center_harness::SuiteRunner;
use idea_center_harness::TestContext;
use idea_center_harness::model::endpoints;
use idea_center_harness::steps::SENTINEL_IDEA_ID;
use idea_center_harness::steps::StepId;
use idea_center_harness::steps::run_step;
use serde_json::json;

use crate::helpers::artifacts::TestReporter;
use crate::helpers::harness::static_token_config;
use crate::helpers::harness::stub_client;
use crate::helpers::idea_stub::STUB_TOKEN;
use crate::helpers::idea_stub::spawn_idea_stub;

#[tokio::test(flavor = "multi_thread")]
async fn every_idea_request_carries_the_bearer() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("every_idea_request_carries_the_bearer")?;
    let stub = spawn_idea_stub()?;

    let run = SuiteRunner::new(static_token_config(&stub)).run().await?;
    reporter.write_run(&run)?;

    let expected = format!("Bearer {STUB_TOKEN}");
    let requests = stub.requests();
    for request in &requests {
        if request.authorization.as_deref() != Some(expected.as_str()) {
            return Err(format!("{} {} sent without the bearer", request.method, request.path).into());
        }
    }
    let methods: Vec<&str> = requests.iter().map(|request| request.method.as_str()).collect();
    if methods != ["POST", "GET", "PUT", "DELETE", "POST", "PUT", "DELETE"] {
        return Err(format!("unexpected method order: {}", methods.join(",")).into());
    }
    let transcript = serde_json::to_string(&run.transcript)?;
    if transcript.contains(STUB_TOKEN) {
        return Err("transcript must not contain the bearer token".into());
    }

    reporter.finish("pass", vec!["bearer header present on all seven requests".to_string()])?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn create_sends_the_complete_payload() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("create_sends_the_complete_payload")?;
    let stub = spawn_idea_stub()?;
    let client = stub_client(&stub);
    let mut context = TestContext::new();

    run_step(StepId::Create, &client, &mut context).await?;

    let creates = stub.requests_to(endpoints::CREATE);
    let expected = json!({
        "title": "new Idea",
        "description": "This is an example of creating a idea's description",
        "url": "",
    });
    if creates.len() != 1 || creates[0].json() != Some(expected) {
        return Err("create should send title, description, and url".into());
    }
    if stub.idea_ids() != ["idea-1"] {
        return Err("create should store one idea".into());
    }
    if context != TestContext::new() {
        return Err("create must not record an id".into());
    }

    reporter.finish("pass", vec!["create body carries every field".to_string()])?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn invalid_create_sends_only_the_url() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("invalid_create_sends_only_the_url")?;
    let stub = spawn_idea_stub()?;
    let client = stub_client(&stub);
    let mut context = TestContext::new();

    run_step(StepId::CreateInvalid, &client, &mut context).await?;

    let creates = stub.requests_to(endpoints::CREATE);
    if creates.first().and_then(|request| request.json()) != Some(json!({ "url": "" })) {
        return Err("invalid create should send only the url".into());
    }
    if !stub.idea_ids().is_empty() {
        return Err("invalid create must not store an idea".into());
    }

    reporter.finish("pass", vec!["incomplete body answered with 400".to_string()])?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn edit_and_delete_address_ideas_by_query() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("edit_and_delete_address_ideas_by_query")?;
    let stub = spawn_idea_stub()?;
    let target = stub.seed_idea("target");
    let client = stub_client(&stub);
    let mut context = TestContext::new();
    context.record_idea_id(target.clone());

    run_step(StepId::Edit, &client, &mut context).await?;
    if stub.idea_title(&target).as_deref() != Some("Edited Idea") {
        return Err("edit should update the stored title".into());
    }
    run_step(StepId::EditNonExisting, &client, &mut context).await?;
    run_step(StepId::Delete, &client, &mut context).await?;
    run_step(StepId::DeleteNonExisting, &client, &mut context).await?;

    let target_query = format!("ideaId={target}");
    let sentinel_query = format!("ideaId={SENTINEL_IDEA_ID}");
    let edits = stub.requests_to(endpoints::EDIT);
    let edit_queries: Vec<Option<&str>> =
        edits.iter().map(|request| request.query.as_deref()).collect();
    if edit_queries != [Some(target_query.as_str()), Some(sentinel_query.as_str())] {
        return Err("edits should address the target then the sentinel".into());
    }
    let edit_body = json!({
        "title": "Edited Idea",
        "description": "This is an updated test idea description.",
        "url": "",
    });
    if edits.iter().any(|request| request.json().as_ref() != Some(&edit_body)) {
        return Err("edits should send the edit payload".into());
    }
    let deletes = stub.requests_to(endpoints::DELETE);
    if deletes.len() != 2
        || deletes.iter().any(|request| {
            request.query.as_deref() != Some(target_query.as_str()) || !request.body.is_empty()
        })
    {
        return Err("deletes should carry only the ideaId query".into());
    }
    if !stub.idea_ids().is_empty() {
        return Err("target should be deleted".into());
    }

    reporter.finish("pass", vec!["ideaId travels in the query string".to_string()])?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn edit_is_repeatable_on_the_same_idea() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("edit_is_repeatable_on_the_same_idea")?;
    let stub = spawn_idea_stub()?;
    let target = stub.seed_idea("target");
    let client = stub_client(&stub);
    let mut context = TestContext::new();
    context.record_idea_id(target.clone());

    run_step(StepId::Edit, &client, &mut context).await?;
    run_step(StepId::Edit, &client, &mut context).await?;

    if stub.requests_to(endpoints::EDIT).len() != 2 || stub.idea_ids() != [target] {
        return Err("repeated edits should succeed on the same idea".into());
    }

    reporter.finish("pass", vec!["edit succeeded twice".to_string()])?;
    Ok(())
}
