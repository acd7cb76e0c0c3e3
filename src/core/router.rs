//! Token routing
//!
//! A replay input may interleave transfers of several tokens. `TokenRouter`
//! owns one [`TransferProcessor`] per configured deployment and hands each
//! record to the processor of the token that emitted it.

use crate::config::Deployment;
use crate::core::classifier::Exclusion;
use crate::core::processor::TransferProcessor;
use crate::core::store::MemoryStore;
use crate::types::{SupplyError, TokenState, TransferOutcome, TransferRecord};
use std::collections::HashMap;

/// Processor type every configured deployment runs on
pub type DeploymentProcessor = TransferProcessor<Exclusion, MemoryStore>;

/// Routing key for a token string: trimmed, lower-case
///
/// Token contracts are hex addresses, so the same token may appear in
/// checksummed and lower-case form.
pub fn token_key(token: &str) -> String {
    token.trim().to_ascii_lowercase()
}

/// Sequential router over per-token processors
#[derive(Debug)]
pub struct TokenRouter {
    processors: HashMap<String, DeploymentProcessor>,
}

impl TokenRouter {
    /// Build one empty processor per deployment
    pub fn new(deployments: &[Deployment]) -> Self {
        let processors = deployments
            .iter()
            .map(|deployment| (token_key(deployment.token.as_str()), deployment.processor()))
            .collect();

        TokenRouter { processors }
    }

    /// Apply one record to its token's processor
    ///
    /// # Errors
    ///
    /// Returns `SupplyError::UnknownToken` when no deployment matches, plus
    /// anything [`TransferProcessor::process`] returns.
    pub fn route(&mut self, record: &TransferRecord) -> Result<TransferOutcome, SupplyError> {
        let processor = self
            .processors
            .get_mut(&token_key(&record.token))
            .ok_or_else(|| SupplyError::unknown_token(&record.token))?;

        processor.process(&record.event)
    }

    /// Final state of every configured token, sorted by token identity
    pub fn states(&self) -> Result<Vec<TokenState>, SupplyError> {
        let mut states = self
            .processors
            .values()
            .map(DeploymentProcessor::state)
            .collect::<Result<Vec<_>, _>>()?;
        states.sort_by(|a, b| a.supply.id.cmp(&b.supply.id));
        Ok(states)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackerConfig;
    use crate::types::{Address, TransferEvent};
    use num_bigint::BigInt;

    fn addr(last: u8) -> Address {
        let mut bytes = [0u8; 20];
        bytes[19] = last;
        Address::from_bytes(bytes)
    }

    fn router() -> TokenRouter {
        let mut config = TrackerConfig::mainnet();
        config
            .deployments
            .extend(TrackerConfig::gnosis_chain().deployments);
        TokenRouter::new(&config.resolve().unwrap())
    }

    fn record(token: &str, from: Address, to: Address, amount: i64) -> TransferRecord {
        TransferRecord {
            token: token.to_string(),
            event: TransferEvent::new(from, to, amount),
        }
    }

    #[test]
    fn test_token_key_normalizes_case_and_whitespace() {
        assert_eq!(
            token_key(" 0xDEf1CA1fb7FBcDC777520aa7f396b4E015F497aB "),
            "0xdef1ca1fb7fbcdc777520aa7f396b4e015f497ab"
        );
    }

    #[test]
    fn test_route_matches_token_in_any_case() {
        let mut router = router();

        router
            .route(&record(
                "0xdef1ca1fb7fbcdc777520aa7f396b4e015f497ab",
                Address::ZERO,
                addr(1),
                100,
            ))
            .unwrap();

        let states = router.states().unwrap();
        let mainnet = states
            .iter()
            .find(|state| state.supply.id.as_str() == crate::config::MAINNET_TOKEN)
            .unwrap();
        assert_eq!(mainnet.supply.total, BigInt::from(100));
        assert_eq!(mainnet.holders.len(), 1);
    }

    #[test]
    fn test_route_unknown_token() {
        let mut router = router();

        let result = router.route(&record("0xnope", Address::ZERO, addr(1), 1));

        assert_eq!(
            result,
            Err(SupplyError::UnknownToken {
                token: "0xnope".to_string()
            })
        );
    }

    #[test]
    fn test_tokens_are_tracked_independently() {
        let mut router = router();
        let gnosis = crate::config::GNOSIS_CHAIN_TOKEN;
        let mainnet = crate::config::MAINNET_TOKEN;

        router
            .route(&record(mainnet, Address::ZERO, addr(1), 500))
            .unwrap();
        router
            .route(&record(gnosis, Address::ZERO, addr(1), 70))
            .unwrap();
        router.route(&record(gnosis, addr(1), addr(2), 20)).unwrap();

        let states = router.states().unwrap();
        assert_eq!(states.len(), 2);
        // Sorted by id
        assert_eq!(states[0].supply.id.as_str(), gnosis);
        assert_eq!(states[0].supply.total, BigInt::from(70));
        assert_eq!(states[0].holders.len(), 2);
        assert_eq!(states[1].supply.id.as_str(), mainnet);
        assert_eq!(states[1].supply.total, BigInt::from(500));
        assert_eq!(states[1].holders[0].balance, BigInt::from(500));
    }

    #[test]
    fn test_states_include_untouched_tokens() {
        let router = router();
        let states = router.states().unwrap();

        assert_eq!(states.len(), 2);
        for state in states {
            assert_eq!(state.supply.total, BigInt::from(0));
            assert!(state.holders.is_empty());
        }
    }
}
