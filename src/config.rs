//! Deployment configuration
//!
//! A deployment binds one tracked token to its sentinel address and its
//! exclusion policy. Deployments come from a compiled-in preset or from a TOML
//! file with one `[[deployment]]` table per token:
//!
//! ```toml
//! [[deployment]]
//! token = "0xDEf1CA1fb7FBcDC777520aa7f396b4E015F497aB"
//!
//! [deployment.exclusion]
//! kind = "explicit"
//! addresses = ["0xD057B63f5E69CF1B929b356b579Cba08D7688048"]
//!
//! [[deployment]]
//! token = "0x177127622c4A00F3d409B75571e12cB3c8973d3c"
//! zero_address = "0x0000000000000000000000000000000000000000"
//!
//! [deployment.exclusion]
//! kind = "vesting_contract"
//! address = "0xc20C9C13E853fc64d054b73fF21d3636B2d97eaB"
//! ```
//!
//! Resolution parses every address and validates the whole file before any
//! processor is built. Nothing is reloaded afterwards.

use crate::core::classifier::{Exclusion, ExplicitExclusion, VestingContract};
use crate::core::processor::TransferProcessor;
use crate::core::store::MemoryStore;
use crate::types::{Address, TokenId};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

pub const MAINNET_TOKEN: &str = "0xDEf1CA1fb7FBcDC777520aa7f396b4E015F497aB";

/// vCOW, solver rewards safe and DAO safe
pub const MAINNET_NON_CIRCULATING: [&str; 3] = [
    "0xD057B63f5E69CF1B929b356b579Cba08D7688048",
    "0xA03be496e67Ec29bC62F01a428683D7F9c204930",
    "0xcA771eda0c70aA7d053aB1B25004559B918FE662",
];

pub const GNOSIS_CHAIN_TOKEN: &str = "0x177127622c4A00F3d409B75571e12cB3c8973d3c";

pub const GNOSIS_CHAIN_VESTING: &str = "0xc20C9C13E853fc64d054b73fF21d3636B2d97eaB";

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File not found
    #[error("config file not found: {0}")]
    NotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Validation error
    #[error("validation error: {0}")]
    Validation(String),
}

/// Raw configuration file contents
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrackerConfig {
    #[serde(rename = "deployment", default)]
    pub deployments: Vec<DeploymentConfig>,
}

/// One `[[deployment]]` table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeploymentConfig {
    /// Token contract address, used verbatim as the supply record id
    pub token: String,

    /// Mint source / burn sink; the all-zero address when omitted
    #[serde(default)]
    pub zero_address: Option<String>,

    pub exclusion: ExclusionConfig,
}

/// Exclusion policy table, tagged by `kind`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExclusionConfig {
    Explicit { addresses: Vec<String> },
    VestingContract { address: String },
}

/// A validated deployment, ready to build a processor from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub token: TokenId,
    pub sentinel: Address,
    pub policy: Exclusion,
}

impl Deployment {
    /// Build an empty in-memory processor for this deployment
    pub fn processor(&self) -> TransferProcessor<Exclusion, MemoryStore> {
        TransferProcessor::new(
            self.token.clone(),
            self.sentinel,
            self.policy.clone(),
            MemoryStore::new(),
        )
    }
}

impl TrackerConfig {
    /// Token contract on Ethereum mainnet with its three non-circulating
    /// holders
    pub fn mainnet() -> Self {
        TrackerConfig {
            deployments: vec![DeploymentConfig {
                token: MAINNET_TOKEN.to_string(),
                zero_address: None,
                exclusion: ExclusionConfig::Explicit {
                    addresses: MAINNET_NON_CIRCULATING
                        .iter()
                        .map(|address| address.to_string())
                        .collect(),
                },
            }],
        }
    }

    /// Bridged token on Gnosis Chain, where only the vesting contract is
    /// non-circulating
    pub fn gnosis_chain() -> Self {
        TrackerConfig {
            deployments: vec![DeploymentConfig {
                token: GNOSIS_CHAIN_TOKEN.to_string(),
                zero_address: None,
                exclusion: ExclusionConfig::VestingContract {
                    address: GNOSIS_CHAIN_VESTING.to_string(),
                },
            }],
        }
    }

    /// Load and validate configuration from a TOML file
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Vec<Deployment>, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load and validate configuration from a TOML string
    pub fn load_str(content: &str) -> Result<Vec<Deployment>, ConfigError> {
        let config: TrackerConfig = toml::from_str(content)?;
        config.resolve()
    }

    /// Parse every address and validate the deployments as a whole
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if:
    /// - There are no deployments
    /// - Any address fails to parse
    /// - Two deployments name the same token (ignoring letter case)
    /// - A deployment's sentinel is part of its own exclusion set
    pub fn resolve(&self) -> Result<Vec<Deployment>, ConfigError> {
        if self.deployments.is_empty() {
            return Err(ConfigError::Validation(
                "at least one deployment is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        let mut deployments = Vec::with_capacity(self.deployments.len());

        for raw in &self.deployments {
            let deployment = raw.resolve()?;
            if !seen.insert(deployment.token.as_str().to_ascii_lowercase()) {
                return Err(ConfigError::Validation(format!(
                    "token '{}' is configured more than once",
                    deployment.token
                )));
            }
            deployments.push(deployment);
        }

        Ok(deployments)
    }
}

impl DeploymentConfig {
    fn resolve(&self) -> Result<Deployment, ConfigError> {
        let token = self.token.trim();
        if token.is_empty() {
            return Err(ConfigError::Validation(
                "deployment has an empty token".to_string(),
            ));
        }

        let sentinel = match &self.zero_address {
            Some(raw) => parse_address(token, raw)?,
            None => Address::ZERO,
        };

        let policy: Exclusion = match &self.exclusion {
            ExclusionConfig::Explicit { addresses } => {
                let addresses = addresses
                    .iter()
                    .map(|raw| parse_address(token, raw))
                    .collect::<Result<Vec<_>, _>>()?;
                ExplicitExclusion::new(addresses).into()
            }
            ExclusionConfig::VestingContract { address } => {
                VestingContract::new(parse_address(token, address)?).into()
            }
        };

        let sentinel_excluded = match &policy {
            Exclusion::Explicit(explicit) => explicit.contains(&sentinel),
            Exclusion::Vesting(vesting) => vesting.address() == sentinel,
        };
        if sentinel_excluded {
            return Err(ConfigError::Validation(format!(
                "token '{}': zero address {} cannot be excluded from circulation",
                token, sentinel
            )));
        }

        Ok(Deployment {
            token: TokenId::new(token),
            sentinel,
            policy,
        })
    }
}

fn parse_address(token: &str, raw: &str) -> Result<Address, ConfigError> {
    raw.parse()
        .map_err(|e| ConfigError::Validation(format!("token '{}': {}", token, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::ExclusionPolicy;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TWO_DEPLOYMENTS: &str = r#"
[[deployment]]
token = "0xDEf1CA1fb7FBcDC777520aa7f396b4E015F497aB"

[deployment.exclusion]
kind = "explicit"
addresses = [
    "0xD057B63f5E69CF1B929b356b579Cba08D7688048",
    "0xA03be496e67Ec29bC62F01a428683D7F9c204930",
]

[[deployment]]
token = "0x177127622c4A00F3d409B75571e12cB3c8973d3c"
zero_address = "0x000000000000000000000000000000000000dEaD"

[deployment.exclusion]
kind = "vesting_contract"
address = "0xc20C9C13E853fc64d054b73fF21d3636B2d97eaB"
"#;

    #[test]
    fn test_load_string() {
        let deployments = TrackerConfig::load_str(TWO_DEPLOYMENTS).unwrap();
        assert_eq!(deployments.len(), 2);

        let mainnet = &deployments[0];
        assert_eq!(mainnet.token.as_str(), MAINNET_TOKEN);
        assert_eq!(mainnet.sentinel, Address::ZERO);
        let vcow: Address = MAINNET_NON_CIRCULATING[0].parse().unwrap();
        assert!(mainnet.policy.is_excluded(&vcow));

        let gnosis = &deployments[1];
        let dead: Address = "0x000000000000000000000000000000000000dead".parse().unwrap();
        assert_eq!(gnosis.sentinel, dead);
        let vesting: Address = GNOSIS_CHAIN_VESTING.parse().unwrap();
        assert_eq!(gnosis.policy, Exclusion::Vesting(VestingContract::new(vesting)));
    }

    #[test]
    fn test_load_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(TWO_DEPLOYMENTS.as_bytes()).unwrap();
        file.flush().unwrap();

        let deployments = TrackerConfig::load_file(file.path()).unwrap();
        assert_eq!(deployments.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let result = TrackerConfig::load_file("/nonexistent/tracker.toml");
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_malformed_toml() {
        let result = TrackerConfig::load_str("[[deployment]\ntoken = ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_unknown_exclusion_kind_is_parse_error() {
        let content = r#"
[[deployment]]
token = "0xtoken"

[deployment.exclusion]
kind = "everything"
"#;
        let result = TrackerConfig::load_str(content);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[rstest]
    #[case::no_deployments("", "at least one deployment")]
    #[case::bad_address(
        r#"
[[deployment]]
token = "0xtoken"
[deployment.exclusion]
kind = "vesting_contract"
address = "0x1234"
"#,
        "expected 40 hex digits"
    )]
    #[case::duplicate_token(
        r#"
[[deployment]]
token = "0xDEf1CA1fb7FBcDC777520aa7f396b4E015F497aB"
[deployment.exclusion]
kind = "explicit"
addresses = []

[[deployment]]
token = "0xdef1ca1fb7fbcdc777520aa7f396b4e015f497ab"
[deployment.exclusion]
kind = "explicit"
addresses = []
"#,
        "configured more than once"
    )]
    #[case::sentinel_in_explicit_set(
        r#"
[[deployment]]
token = "0xtoken"
[deployment.exclusion]
kind = "explicit"
addresses = ["0x0000000000000000000000000000000000000000"]
"#,
        "cannot be excluded"
    )]
    #[case::sentinel_is_vesting_contract(
        r#"
[[deployment]]
token = "0xtoken"
zero_address = "0xc20C9C13E853fc64d054b73fF21d3636B2d97eaB"
[deployment.exclusion]
kind = "vesting_contract"
address = "0xc20c9c13e853fc64d054b73ff21d3636b2d97eab"
"#,
        "cannot be excluded"
    )]
    #[case::empty_token(
        r#"
[[deployment]]
token = "  "
[deployment.exclusion]
kind = "explicit"
addresses = []
"#,
        "empty token"
    )]
    fn test_validation_errors(#[case] content: &str, #[case] expected: &str) {
        match TrackerConfig::load_str(content) {
            Err(ConfigError::Validation(message)) => assert!(
                message.contains(expected),
                "'{}' does not mention '{}'",
                message,
                expected
            ),
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_mainnet_preset() {
        let deployments = TrackerConfig::mainnet().resolve().unwrap();
        assert_eq!(deployments.len(), 1);

        let deployment = &deployments[0];
        assert_eq!(deployment.token.as_str(), MAINNET_TOKEN);
        assert_eq!(deployment.sentinel, Address::ZERO);
        for raw in MAINNET_NON_CIRCULATING {
            let address: Address = raw.parse().unwrap();
            assert!(deployment.policy.is_excluded(&address), "{}", raw);
        }
        let vesting: Address = GNOSIS_CHAIN_VESTING.parse().unwrap();
        assert!(!deployment.policy.is_excluded(&vesting));
    }

    #[test]
    fn test_gnosis_chain_preset() {
        let deployments = TrackerConfig::gnosis_chain().resolve().unwrap();
        assert_eq!(deployments.len(), 1);

        let deployment = &deployments[0];
        assert_eq!(deployment.token.as_str(), GNOSIS_CHAIN_TOKEN);
        let vesting: Address = GNOSIS_CHAIN_VESTING.parse().unwrap();
        assert!(deployment.policy.is_excluded(&vesting));
        let dao: Address = MAINNET_NON_CIRCULATING[2].parse().unwrap();
        assert!(!deployment.policy.is_excluded(&dao));
    }

    #[test]
    fn test_deployment_builds_empty_processor() {
        let deployment = TrackerConfig::mainnet().resolve().unwrap().remove(0);
        let processor = deployment.processor();

        assert_eq!(processor.token(), &deployment.token);
        assert_eq!(processor.store().holder_count(), 0);
    }
}
