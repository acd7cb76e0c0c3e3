//! Transfer processor
//!
//! This module provides the `TransferProcessor` that orchestrates supply
//! accounting by coordinating the exclusion policy, the `BalanceLedger` and
//! the `SupplyAggregate` for one token.
//!
//! For each transfer the processor:
//! - rejects negative amounts before touching any state
//! - classifies both endpoints once, before any balance changes
//! - when the transfer mints, burns, or touches an excluded address, applies
//!   every matching supply mutation (mint, burn, out of exclusion, into
//!   exclusion) in that order and persists the aggregate once
//! - debits the sender and credits the receiver
//!
//! The supply conditions are independent, not an else-if chain. A mint
//! straight into an excluded address therefore raises `total` and leaves
//! `circulating` where it was; a burn out of an excluded address lowers
//! `total` only.

use crate::core::aggregate::SupplyAggregate;
use crate::core::ledger::BalanceLedger;
use crate::core::store::MemoryStore;
use crate::core::traits::{ExclusionPolicy, HolderStore, SupplyStore};
use crate::types::{
    Address, Supply, SupplyError, TokenId, TokenState, TransferEvent, TransferOutcome,
};
use num_traits::Signed;

/// Supply accounting engine for a single token
///
/// Owns its store; all state for the token lives behind it. Events must be fed
/// in chain order, one at a time.
#[derive(Debug)]
pub struct TransferProcessor<P, S> {
    token: TokenId,
    policy: P,
    ledger: BalanceLedger,
    store: S,
}

impl<P, S> TransferProcessor<P, S>
where
    P: ExclusionPolicy,
    S: HolderStore + SupplyStore,
{
    /// Create a processor for `token`
    ///
    /// # Arguments
    ///
    /// * `token` - Identity key of the tracked token's supply record
    /// * `sentinel` - The null/burn address (normally [`Address::ZERO`])
    /// * `policy` - Which addresses are non-circulating
    /// * `store` - Where holder and supply records are persisted
    pub fn new(token: TokenId, sentinel: Address, policy: P, store: S) -> Self {
        TransferProcessor {
            token,
            policy,
            ledger: BalanceLedger::new(sentinel),
            store,
        }
    }

    pub fn token(&self) -> &TokenId {
        &self.token
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether the transfer changes total or circulating supply
    ///
    /// True for mints, burns, and anything touching an excluded address.
    pub fn is_supply_affecting(&self, from: &Address, to: &Address) -> bool {
        let sentinel = self.ledger.sentinel();
        let mint_or_burn = *from == sentinel || *to == sentinel;
        let touches_excluded = self.policy.is_excluded(from) || self.policy.is_excluded(to);
        mint_or_burn || touches_excluded
    }

    /// Process a single transfer event
    ///
    /// # Returns
    ///
    /// * `Ok(TransferOutcome)` - The transfer was applied; any values that
    ///   went negative are listed in `underflows` (and logged)
    /// * `Err(SupplyError)` - The transfer was rejected or a store write failed
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The amount is negative (no state is touched)
    /// - Loading or persisting a holder or the supply record fails. Processing
    ///   stops at the failed write; redelivery is the caller's concern.
    pub fn process(&mut self, event: &TransferEvent) -> Result<TransferOutcome, SupplyError> {
        let TransferEvent { from, to, amount } = event;

        if amount.is_negative() {
            return Err(SupplyError::negative_amount(
                &amount.to_string(),
                &from.to_hex(),
                &to.to_hex(),
            ));
        }

        let sentinel = self.ledger.sentinel();
        let from_excluded = self.policy.is_excluded(from);
        let to_excluded = self.policy.is_excluded(to);

        let mut outcome = TransferOutcome {
            supply_affecting: self.is_supply_affecting(from, to),
            underflows: Vec::new(),
        };

        if outcome.supply_affecting {
            tracing::info!(
                token = %self.token,
                %amount,
                %from,
                %to,
                "Token supply update"
            );

            let mut aggregate = SupplyAggregate::load(&mut self.store, &self.token)?;
            if *from == sentinel {
                aggregate.mint(amount);
            }
            if *to == sentinel {
                aggregate.burn(amount);
            }
            if from_excluded {
                aggregate.move_out_of_exclusion(amount);
            }
            if to_excluded {
                aggregate.move_into_exclusion(amount);
            }
            outcome.underflows.extend(aggregate.underflows());
            aggregate.persist(&mut self.store)?;
        }

        // Sender is committed before the receiver is loaded, so a self-transfer
        // nets to zero. Loading both up front and committing the receiver last
        // would instead leave `balance + amount` on a self-transfer; that
        // variant is deliberately not reproduced.
        let mut sender = self.ledger.load_or_create(&self.store, *from)?;
        outcome
            .underflows
            .extend(self.ledger.debit(&mut sender, amount));
        self.ledger.commit(&mut self.store, &sender)?;

        let mut receiver = self.ledger.load_or_create(&self.store, *to)?;
        self.ledger.credit(&mut receiver, amount);
        self.ledger.commit(&mut self.store, &receiver)?;

        for underflow in &outcome.underflows {
            tracing::warn!(token = %self.token, %from, %to, "{}", underflow);
        }
        tracing::debug!(
            token = %self.token,
            %from,
            %to,
            %amount,
            supply_affecting = outcome.supply_affecting,
            "Transfer processed"
        );

        Ok(outcome)
    }

    /// Current supply snapshot
    ///
    /// Read-only: a token that has not seen a supply-affecting transfer yet
    /// reports zeros without creating a record.
    pub fn supply(&self) -> Result<Supply, SupplyError> {
        Ok(self
            .store
            .get_supply(&self.token)?
            .unwrap_or_else(|| Supply::new(self.token.clone())))
    }
}

impl<P: ExclusionPolicy> TransferProcessor<P, MemoryStore> {
    /// Supply plus every persisted holder
    pub fn state(&self) -> Result<TokenState, SupplyError> {
        Ok(TokenState {
            supply: self.supply()?,
            holders: self.store.holders().into_iter().cloned().collect(),
        })
    }
}
