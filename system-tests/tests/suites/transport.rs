// system-tests/tests/suites/transport.rs
// ============================================================================
// Module: Transport Failure Tests
// Description: Unreachable targets and oversized responses.
// Purpose: Ensure transport failures are classified apart from contract ones.
// Dependencies: system-tests helpers, idea-center-harness, reqwest
// ============================================================================

//! Transport coverage: connection failures and the response size limit.

use std::net::TcpListener;

use idea_center_harness::CredentialSource;
use idea_center_harness::HarnessConfig;
use idea_center_harness::RequestOptions;
use idea_center_harness::SuiteRunner;
use idea_center_harness::TransportError;
use idea_center_harness::client::MAX_RESPONSE_BYTES;
use idea_center_harness::model::endpoints;
use idea_center_harness::report::FailureKind;
use reqwest::Method;
use url::Url;

use crate::helpers::artifacts::TestReporter;
use crate::helpers::harness::static_token_config;
use crate::helpers::harness::stub_client;
use crate::helpers::idea_stub::StubFaults;
use crate::helpers::idea_stub::spawn_idea_stub_with_faults;

/// Returns a loopback URL whose port has no listener.
fn closed_port_url() -> Result<Url, Box<dyn std::error::Error>> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(Url::parse(&format!("http://{addr}"))?)
}

#[tokio::test(flavor = "multi_thread")]
async fn oversized_listing_is_a_transport_failure() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("oversized_listing_is_a_transport_failure")?;
    let stub = spawn_idea_stub_with_faults(StubFaults {
        oversized_listing: true,
        ..StubFaults::default()
    })?;

    let client = stub_client(&stub);
    match client.send(Method::GET, endpoints::ALL, RequestOptions::new()).await {
        Err(TransportError::ResponseTooLarge {
            actual,
            limit,
        }) => {
            if limit != MAX_RESPONSE_BYTES || actual <= limit {
                return Err(format!("unexpected size report: {actual} > {limit}").into());
            }
        }
        Err(err) => return Err(format!("expected size limit failure, got {err}").into()),
        Ok(response) => {
            return Err(format!("expected size limit failure, got {}", response.status).into());
        }
    }
    let transcript = client.close();
    if transcript.len() != 1 || transcript[0].status.is_some() {
        return Err("oversized response should be recorded without a status".into());
    }

    let run = SuiteRunner::new(static_token_config(&stub)).run().await?;
    reporter.write_run(&run)?;
    let listing = run.report.steps[1].failure.as_ref().map(|failure| failure.kind);
    if run.report.steps.len() != 7 || listing != Some(FailureKind::Transport) {
        return Err(format!("unexpected report:\n{}", run.report.render_text()).into());
    }

    reporter.finish("pass", vec!["body limit enforced while streaming".to_string()])?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn closed_port_fails_every_request_step() -> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("closed_port_fails_every_request_step")?;
    let config = HarnessConfig::new(closed_port_url()?, CredentialSource::static_token("token"));

    let run = SuiteRunner::new(config).run().await?;
    reporter.write_run(&run)?;

    let kinds: Vec<Option<FailureKind>> = run
        .report
        .steps
        .iter()
        .map(|step| step.failure.as_ref().map(|failure| failure.kind))
        .collect();
    let expected = [
        Some(FailureKind::Transport),
        Some(FailureKind::Transport),
        Some(FailureKind::MissingContext),
        Some(FailureKind::MissingContext),
        Some(FailureKind::Transport),
        Some(FailureKind::Transport),
        Some(FailureKind::MissingContext),
    ];
    if kinds != expected {
        return Err(format!("unexpected failure kinds:\n{}", run.report.render_text()).into());
    }
    if run.transcript.len() != 4
        || !run.transcript.iter().all(|entry| entry.error.is_some() && entry.status.is_none())
    {
        return Err("each sent request should be recorded as a transport failure".into());
    }

    reporter.finish("pass", vec!["connection refusal classified as transport".to_string()])?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn closed_port_login_is_an_authentication_failure()
-> Result<(), Box<dyn std::error::Error>> {
    let mut reporter = TestReporter::new("closed_port_login_is_an_authentication_failure")?;
    let config = HarnessConfig::new(closed_port_url()?, CredentialSource::login("a@b.c", "pw"));

    let Err(err) = SuiteRunner::new(config).run().await else {
        return Err("login against a closed port should abort".into());
    };
    if !err.to_string().starts_with("authentication request failed") {
        return Err(format!("unexpected error: {err}").into());
    }

    reporter.finish("pass", vec!["setup failure surfaced".to_string()])?;
    Ok(())
}
