use crate::deploy::SourceVerifier;
use crate::error::{FightersError, Result};
use crate::models::{DeployedContract, VerificationStatus};
use crate::services::ArtifactStore;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

const CODE_FORMAT: &str = "solidity-standard-json-input";

#[derive(Debug, Deserialize)]
struct EtherscanResponse {
    status: String,
    #[allow(dead_code)]
    message: String,
    result: String,
}

fn is_already_verified(result: &str) -> bool {
    result.to_lowercase().contains("already verified")
}

/// Submits contract sources to an Etherscan-compatible explorer.
pub struct EtherscanVerifier {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    artifacts: ArtifactStore,
    poll_interval: Duration,
    max_polls: u32,
}

impl EtherscanVerifier {
    pub fn new(api_url: String, api_key: String, artifacts: ArtifactStore) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            artifacts,
            poll_interval: Duration::from_secs(5),
            max_polls: 12,
        }
    }

    pub fn with_polling(mut self, interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = interval;
        self.max_polls = max_polls;
        self
    }

    async fn post(&self, form: &[(&str, &str)]) -> Result<EtherscanResponse> {
        let response = self
            .client
            .post(&self.api_url)
            .form(form)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    async fn submit(&self, contract: &DeployedContract) -> Result<EtherscanResponse> {
        let artifact = self.artifacts.load(&contract.contract)?;
        let build_info = self.artifacts.build_info(&artifact)?;

        let source_code = serde_json::to_string(&build_info.input)?;
        let address = format!("{:?}", contract.address);
        let contract_name = artifact.fully_qualified_name();
        let compiler_version = format!("v{}", build_info.solc_long_version);
        let constructor_args = contract.encoded_args();

        tracing::info!(
            "Submitting {} at {} for verification ({})",
            contract_name,
            address,
            compiler_version
        );

        self.post(&[
            ("apikey", self.api_key.as_str()),
            ("module", "contract"),
            ("action", "verifysourcecode"),
            ("contractaddress", address.as_str()),
            ("sourceCode", source_code.as_str()),
            ("codeformat", CODE_FORMAT),
            ("contractname", contract_name.as_str()),
            ("compilerversion", compiler_version.as_str()),
            // Misspelling is part of the explorer API
            ("constructorArguements", constructor_args.as_str()),
        ])
        .await
    }

    async fn check(&self, guid: &str) -> Result<EtherscanResponse> {
        self.post(&[
            ("apikey", self.api_key.as_str()),
            ("module", "contract"),
            ("action", "checkverifystatus"),
            ("guid", guid),
        ])
        .await
    }
}

#[async_trait]
impl SourceVerifier for EtherscanVerifier {
    async fn verify(&self, contract: &DeployedContract) -> Result<VerificationStatus> {
        let submission = self.submit(contract).await?;

        if submission.status != "1" {
            if is_already_verified(&submission.result) {
                tracing::info!("{} already verified", contract.contract);
                return Ok(VerificationStatus::AlreadyVerified);
            }
            return Err(FightersError::VerificationFailed(submission.result));
        }

        let guid = submission.result;
        tracing::debug!("Verification queued with guid {}", guid);

        for attempt in 1..=self.max_polls {
            tokio::time::sleep(self.poll_interval).await;

            let status = self.check(&guid).await?;
            if status.result.starts_with("Pass") {
                tracing::info!("{} verified on explorer", contract.contract);
                return Ok(VerificationStatus::Verified);
            }
            if is_already_verified(&status.result) {
                return Ok(VerificationStatus::AlreadyVerified);
            }
            if status.result.contains("Pending") {
                tracing::debug!("Verification pending (attempt {}/{})", attempt, self.max_polls);
                continue;
            }
            return Err(FightersError::VerificationFailed(status.result));
        }

        Err(FightersError::VerificationFailed(format!(
            "no verdict for guid {} after {} checks",
            guid, self.max_polls
        )))
    }
}
