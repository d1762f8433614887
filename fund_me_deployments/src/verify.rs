use std::time::Duration;

use ethers::types::Address;
use serde::Deserialize;
use tokio::time::sleep;
use tracing::{info, warn};
use url::Url;

use crate::{
    artifacts::{Artifacts, BuildInfo, HardhatArtifact},
    deployments::DeploymentRecord,
    errors::{HarnessError, Result},
};

/// Etherscan's multichain endpoint; the target chain goes in `chainid`.
const ETHERSCAN_API_URL: &str = "https://api.etherscan.io/v2/api";
const CODE_FORMAT: &str = "solidity-standard-json-input";

const STATUS_POLL_INTERVAL: Duration = Duration::from_secs(5);
const STATUS_POLL_ATTEMPTS: usize = 10;

#[derive(Debug, Deserialize)]
struct EtherscanResponse {
    status: String,
    #[allow(unused)]
    message: String,
    result: serde_json::Value,
}

impl EtherscanResponse {
    fn is_ok(&self) -> bool {
        self.status == "1"
    }

    fn result_text(&self) -> String {
        match &self.result {
            serde_json::Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    Pending { guid: String },
    AlreadyVerified,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerificationStatus {
    Pending,
    Verified,
    Failed(String),
}

impl VerificationStatus {
    fn from_result(result: &str) -> Self {
        // Etherscan may not have indexed the freshly deployed code yet
        if result.starts_with("Pending") || result.starts_with("Unable to locate ContractCode") {
            Self::Pending
        } else if result.starts_with("Pass") || is_already_verified(result) {
            Self::Verified
        } else {
            Self::Failed(result.to_owned())
        }
    }
}

fn is_already_verified(result: &str) -> bool {
    result.to_ascii_lowercase().contains("already verified")
}

/// A `verifysourcecode` submission for one deployed contract.
#[derive(Clone, Debug)]
pub struct VerificationRequest {
    pub address: Address,
    /// `<source path>:<contract name>`
    pub contract_name: String,
    pub compiler_version: String,
    /// The compiler's standard JSON input, serialized.
    pub source: String,
    /// Hex-encoded constructor arguments without a `0x` prefix.
    pub constructor_args: String,
}

impl VerificationRequest {
    pub fn new(
        record: &DeploymentRecord,
        artifact: &HardhatArtifact,
        build_info: &BuildInfo,
    ) -> Result<Self> {
        Ok(Self {
            address: record.address,
            contract_name: artifact.fully_qualified_name(),
            compiler_version: format!("v{}", build_info.solc_long_version),
            source: serde_json::to_string(&build_info.input)?,
            constructor_args: hex::encode(record.constructor_args()?),
        })
    }

    fn form(&self, api_key: &str) -> Vec<(&'static str, String)> {
        vec![
            ("apikey", api_key.to_owned()),
            ("module", "contract".to_owned()),
            ("action", "verifysourcecode".to_owned()),
            ("contractaddress", format!("{:?}", self.address)),
            ("sourceCode", self.source.clone()),
            ("codeformat", CODE_FORMAT.to_owned()),
            ("contractname", self.contract_name.clone()),
            ("compilerversion", self.compiler_version.clone()),
            // sic: the API only understands this spelling
            ("constructorArguements", self.constructor_args.clone()),
        ]
    }
}

pub struct EtherscanClient {
    http: reqwest::Client,
    api_url: Url,
    api_key: String,
    chain_id: u64,
}

impl EtherscanClient {
    pub fn new(api_key: impl Into<String>, chain_id: u64) -> Result<Self> {
        Self::with_url(ETHERSCAN_API_URL, api_key, chain_id)
    }

    pub fn with_url(api_url: &str, api_key: impl Into<String>, chain_id: u64) -> Result<Self> {
        Ok(Self {
            http: reqwest::Client::new(),
            api_url: Url::parse(api_url)?,
            api_key: api_key.into(),
            chain_id,
        })
    }

    fn endpoint(&self) -> Url {
        let mut url = self.api_url.clone();
        url.query_pairs_mut()
            .append_pair("chainid", &self.chain_id.to_string());
        url
    }

    pub async fn is_verified(&self, address: Address) -> Result<bool> {
        let address = format!("{address:?}");
        let response: EtherscanResponse = self
            .http
            .get(self.endpoint())
            .query(&[
                ("module", "contract"),
                ("action", "getsourcecode"),
                ("address", address.as_str()),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?
            .json()
            .await?;

        source_code_present(&response)
    }

    pub async fn submit(&self, request: &VerificationRequest) -> Result<Submission> {
        let response: EtherscanResponse = self
            .http
            .post(self.endpoint())
            .form(&request.form(&self.api_key))
            .send()
            .await?
            .json()
            .await?;

        submission_from(&response)
    }

    pub async fn check_status(&self, guid: &str) -> Result<VerificationStatus> {
        let response: EtherscanResponse = self
            .http
            .get(self.endpoint())
            .query(&[
                ("module", "contract"),
                ("action", "checkverifystatus"),
                ("guid", guid),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?
            .json()
            .await?;

        Ok(VerificationStatus::from_result(&response.result_text()))
    }
}

fn source_code_present(response: &EtherscanResponse) -> Result<bool> {
    if !response.is_ok() {
        return Err(HarnessError::Verification(response.result_text()));
    }

    let source_code = response
        .result
        .get(0)
        .and_then(|entry| entry.get("SourceCode"))
        .and_then(|source| source.as_str())
        .unwrap_or_default();
    Ok(!source_code.is_empty())
}

fn submission_from(response: &EtherscanResponse) -> Result<Submission> {
    let result = response.result_text();
    if response.is_ok() {
        Ok(Submission::Pending { guid: result })
    } else if is_already_verified(&result) {
        Ok(Submission::AlreadyVerified)
    } else {
        Err(HarnessError::Verification(result))
    }
}

/// Registers a deployed contract's source with Etherscan.
///
/// Best-effort: every failure is logged and swallowed, so a deployment never
/// fails because verification did.
pub async fn verify(
    etherscan: &EtherscanClient,
    artifacts: &Artifacts,
    record: &DeploymentRecord,
) {
    info!("Verifying contract...");
    if let Err(e) = try_verify(etherscan, artifacts, record).await {
        warn!(
            contract = %record.contract_name,
            address = ?record.address,
            "verification failed: {e}"
        );
    }
}

async fn try_verify(
    etherscan: &EtherscanClient,
    artifacts: &Artifacts,
    record: &DeploymentRecord,
) -> Result<()> {
    if etherscan.is_verified(record.address).await? {
        info!("The contract {:?} has already been verified", record.address);
        return Ok(());
    }

    let artifact = artifacts.load(&record.contract_name)?;
    let build_info = artifacts.build_info_for(&artifact.source_name)?;
    let request = VerificationRequest::new(record, &artifact, &build_info)?;

    let guid = match etherscan.submit(&request).await? {
        Submission::AlreadyVerified => {
            info!("The contract {:?} has already been verified", record.address);
            return Ok(());
        }
        Submission::Pending { guid } => guid,
    };
    info!(
        "Successfully submitted source code for contract {} at {:?} for verification",
        request.contract_name, record.address
    );

    for _ in 0..STATUS_POLL_ATTEMPTS {
        sleep(STATUS_POLL_INTERVAL).await;
        match etherscan.check_status(&guid).await? {
            VerificationStatus::Pending => continue,
            VerificationStatus::Verified => {
                info!(
                    "Successfully verified contract {} on Etherscan",
                    request.contract_name
                );
                return Ok(());
            }
            VerificationStatus::Failed(reason) => {
                return Err(HarnessError::Verification(reason));
            }
        }
    }

    Err(HarnessError::Verification(format!(
        "still pending after {STATUS_POLL_ATTEMPTS} status checks (guid: {guid})"
    )))
}

#[cfg(test)]
mod tests {
    use ethers::{
        abi::{Abi, Token},
        types::{Address, Bytes},
    };
    use serde_json::json;

    use super::*;

    const FUND_ME_ADDRESS: &str = "0x9fE46736679d2D9a65F0992F2272dE9f3c7fa6e0";
    const PRICE_FEED: &str = "0x694AA1769357215DE4FAC081bf1f309aDC325306";

    fn response(value: serde_json::Value) -> EtherscanResponse {
        serde_json::from_value(value).unwrap()
    }

    fn fund_me_record() -> DeploymentRecord {
        let price_feed: Address = PRICE_FEED.parse().unwrap();
        DeploymentRecord::new(
            "FundMe",
            FUND_ME_ADDRESS.parse().unwrap(),
            Abi::default(),
            None,
            &[Token::Address(price_feed)],
        )
    }

    #[test]
    fn test_verification_request_form() {
        let artifact = HardhatArtifact {
            contract_name: "FundMe".to_owned(),
            source_name: "contracts/FundMe.sol".to_owned(),
            abi: Abi::default(),
            bytecode: Bytes::default(),
        };
        let build_info = BuildInfo {
            solc_long_version: "0.8.28+commit.7893614a".to_owned(),
            input: json!({ "language": "Solidity", "sources": {} }),
        };

        let request = VerificationRequest::new(&fund_me_record(), &artifact, &build_info).unwrap();
        let form = request.form("KEY");
        let field = |name: &str| {
            form.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.clone())
                .unwrap()
        };

        assert_eq!(field("apikey"), "KEY");
        assert_eq!(field("action"), "verifysourcecode");
        assert_eq!(field("codeformat"), "solidity-standard-json-input");
        assert_eq!(field("contractname"), "contracts/FundMe.sol:FundMe");
        assert_eq!(field("compilerversion"), "v0.8.28+commit.7893614a");
        assert_eq!(
            field("contractaddress"),
            FUND_ME_ADDRESS.to_ascii_lowercase()
        );
        assert_eq!(
            field("constructorArguements"),
            format!(
                "000000000000000000000000{}",
                PRICE_FEED.trim_start_matches("0x").to_ascii_lowercase()
            )
        );
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&field("sourceCode")).unwrap(),
            build_info.input
        );
    }

    #[test]
    fn test_status_from_result() {
        assert_eq!(
            VerificationStatus::from_result("Pending in queue"),
            VerificationStatus::Pending
        );
        assert_eq!(
            VerificationStatus::from_result(
                "Unable to locate ContractCode at 0x9fe46736679d2d9a65f0992f2272de9f3c7fa6e0"
            ),
            VerificationStatus::Pending
        );
        assert_eq!(
            VerificationStatus::from_result("Pass - Verified"),
            VerificationStatus::Verified
        );
        assert_eq!(
            VerificationStatus::from_result("Already Verified"),
            VerificationStatus::Verified
        );
        assert_eq!(
            VerificationStatus::from_result("Fail - Unable to verify"),
            VerificationStatus::Failed("Fail - Unable to verify".to_owned())
        );
    }

    #[test]
    fn test_source_code_present() {
        let verified = response(json!({
            "status": "1",
            "message": "OK",
            "result": [{ "SourceCode": "contract FundMe {}", "ContractName": "FundMe" }]
        }));
        assert!(source_code_present(&verified).unwrap());

        let unverified = response(json!({
            "status": "1",
            "message": "OK",
            "result": [{ "SourceCode": "", "ABI": "Contract source code not verified" }]
        }));
        assert!(!source_code_present(&unverified).unwrap());

        let rejected = response(json!({
            "status": "0",
            "message": "NOTOK",
            "result": "Invalid API Key"
        }));
        assert!(matches!(
            source_code_present(&rejected),
            Err(HarnessError::Verification(reason)) if reason == "Invalid API Key"
        ));
    }

    #[test]
    fn test_submission_from_response() {
        let accepted = response(json!({ "status": "1", "message": "OK", "result": "abc123" }));
        assert_eq!(
            submission_from(&accepted).unwrap(),
            Submission::Pending {
                guid: "abc123".to_owned()
            }
        );

        let duplicate = response(json!({
            "status": "0",
            "message": "NOTOK",
            "result": "Contract source code already verified"
        }));
        assert_eq!(
            submission_from(&duplicate).unwrap(),
            Submission::AlreadyVerified
        );

        let rate_limited = response(json!({
            "status": "0",
            "message": "NOTOK",
            "result": "Max rate limit reached"
        }));
        assert!(matches!(
            submission_from(&rate_limited),
            Err(HarnessError::Verification(_))
        ));
    }

    #[test]
    fn test_endpoint_carries_chain_id() {
        let client = EtherscanClient::new("KEY", 11155111).unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "https://api.etherscan.io/v2/api?chainid=11155111"
        );
    }

    #[tokio::test]
    async fn test_verify_swallows_failures() {
        // nothing listens on port 1, so the first request fails
        let client = EtherscanClient::with_url("http://127.0.0.1:1/api", "KEY", 11155111).unwrap();
        let dir = tempfile::tempdir().unwrap();

        verify(&client, &Artifacts::new(dir.path()), &fund_me_record()).await;
    }
}
