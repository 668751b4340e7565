// system-tests/tests/helpers/harness.rs
// ============================================================================
// Module: Harness Wiring
// Description: Builds harness configs and clients bound to a stub server.
// Purpose: Keep suites focused on assertions instead of setup.
// Dependencies: idea-center-harness, url
// ============================================================================

use idea_center_harness::ApiClient;
use idea_center_harness::Credential;
use idea_center_harness::CredentialSource;
use idea_center_harness::HarnessConfig;
use url::Url;

use super::idea_stub::IdeaStubHandle;
use super::idea_stub::STUB_EMAIL;
use super::idea_stub::STUB_PASSWORD;
use super::idea_stub::STUB_TOKEN;

/// Parses the stub base URL.
pub fn stub_url(stub: &IdeaStubHandle) -> Url {
    Url::parse(stub.base_url()).expect("stub base url")
}

/// Config that authenticates with the stub's pre-issued token.
pub fn static_token_config(stub: &IdeaStubHandle) -> HarnessConfig {
    HarnessConfig::new(stub_url(stub), CredentialSource::static_token(STUB_TOKEN))
}

/// Config that authenticates through the stub's login endpoint.
pub fn login_config(stub: &IdeaStubHandle) -> HarnessConfig {
    HarnessConfig::new(stub_url(stub), CredentialSource::login(STUB_EMAIL, STUB_PASSWORD))
}

/// Config with an arbitrary credential source.
pub fn config_with(stub: &IdeaStubHandle, source: CredentialSource) -> HarnessConfig {
    HarnessConfig::new(stub_url(stub), source)
}

/// Client carrying the stub's valid token.
pub fn stub_client(stub: &IdeaStubHandle) -> ApiClient {
    ApiClient::new(stub_url(stub), Credential::new(STUB_TOKEN).expect("credential"))
        .expect("api client")
}
