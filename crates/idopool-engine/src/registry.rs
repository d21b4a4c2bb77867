//! The launchpad: pool registry, vault directory and the entry point for
//! every pool operation.
//!
//! ```text
//! caller → Launchpad → PoolLedger::gate (phase clock)
//!                    → allowlist / authority
//!                    → exchange | escrow  (stage a Transition)
//!                    → PoolLedger::commit (check → custody → records → journal)
//! ```

use std::collections::HashMap;

use idopool_types::{
    Amount, Digest, EventKind, Identity, LaunchpadError, Operation, ParticipantAccount, Phase,
    PoolConfig, PoolId, Result, StorageHandle, UnixTimestamp, constants,
};

use crate::{
    audit::{AuditReport, audit},
    escrow, exchange,
    ledger::{PoolLedger, Transition},
    vault::{AssetLedger, Holder, Transfer, VaultDirectory, VaultRole},
};

/// Registry of launch pools over one asset capability.
#[derive(Debug)]
pub struct Launchpad<A: AssetLedger> {
    pools: HashMap<PoolId, PoolLedger>,
    vaults: VaultDirectory,
    assets: A,
}

impl<A: AssetLedger> Launchpad<A> {
    #[must_use]
    pub fn new(assets: A) -> Self {
        Self {
            pools: HashMap::new(),
            vaults: VaultDirectory::new(),
            assets,
        }
    }

    fn split(&mut self, pool: &PoolId) -> Result<(&mut PoolLedger, &mut A)> {
        let ledger = self
            .pools
            .get_mut(pool)
            .ok_or_else(|| LaunchpadError::PoolNotFound(pool.clone()))?;
        Ok((ledger, &mut self.assets))
    }

    // -----------------------------------------------------------------
    // Setup
    // -----------------------------------------------------------------

    /// Create a pool, allocate its vaults and fund the offered vault with
    /// `public + private` allocation from the authority's wallet.
    pub fn initialize_pool(&mut self, config: PoolConfig, now: UnixTimestamp) -> Result<()> {
        config.validate()?;
        let pool_id = config.pool_id.clone();
        if self.pools.contains_key(&pool_id) {
            return Err(LaunchpadError::PoolAlreadyInitialized(pool_id));
        }
        idopool_core::phase_clock::check(Operation::InitializePool, now, &config.times)?;

        let total_offered = config.total_offered()?;
        let authority = config.authority;
        let vaults = self.vaults.plan()?;
        let mut ledger = PoolLedger::new(config, vaults);
        let transition = Transition::new(
            ledger.state().clone(),
            EventKind::PoolInitialized {
                authority,
                total_offered,
            },
        )
        .with_transfer(Transfer::new(
            Holder::Wallet(authority),
            vaults.holder(VaultRole::Offered),
            &ledger.config().offered_asset,
            total_offered,
        ));
        ledger.commit(&mut self.assets, transition, now)?;

        self.vaults.register(&pool_id, vaults)?;
        tracing::info!(
            engine = constants::ENGINE_NAME,
            version = constants::VERSION,
            pool = %pool_id,
            %authority,
            total_offered,
            offered_vault = %vaults.offered,
            payment_vault = %vaults.payment,
            escrow_vault = %vaults.escrow,
            "Pool initialized"
        );
        self.pools.insert(pool_id, ledger);
        Ok(())
    }

    /// Commit the allowlist root. Authority only, PENDING only, once.
    pub fn set_allowlist_root(
        &mut self,
        pool: &PoolId,
        caller: Identity,
        root: Digest,
        now: UnixTimestamp,
    ) -> Result<()> {
        let (ledger, assets) = self.split(pool)?;
        ledger.gate(Operation::SetAllowlistRoot, now)?;
        ledger.require_authority(&caller, Operation::SetAllowlistRoot)?;
        let transition = Transition::new(ledger.state().clone(), EventKind::AllowlistRootSet { root })
            .with_allowlist_root(root);
        ledger.commit(assets, transition, now)?;
        tracing::info!(pool = %pool, %root, "Allowlist root set");
        Ok(())
    }

    /// Register a participant ahead of their first deposit or swap.
    pub fn create_participant_account(
        &mut self,
        pool: &PoolId,
        identity: Identity,
        now: UnixTimestamp,
    ) -> Result<()> {
        let (ledger, assets) = self.split(pool)?;
        ledger.gate(Operation::CreateParticipantAccount, now)?;
        if ledger.participant(&identity).is_some() {
            return Err(LaunchpadError::ParticipantAlreadyInitialized(identity));
        }
        let transition = Transition::new(
            ledger.state().clone(),
            EventKind::ParticipantCreated {
                participant: identity,
            },
        )
        .with_participant(ParticipantAccount::new(identity));
        ledger.commit(assets, transition, now)?;
        tracing::info!(pool = %pool, participant = %identity, "Participant account created");
        Ok(())
    }

    // -----------------------------------------------------------------
    // Exchange
    // -----------------------------------------------------------------

    /// Swap payment for offered tokens at the private price. Returns the offered units received.
    pub fn direct_swap(
        &mut self,
        pool: &PoolId,
        participant: Identity,
        proof: &[Digest],
        payment_in: Amount,
        requested_out: Option<Amount>,
        now: UnixTimestamp,
    ) -> Result<Amount> {
        let (ledger, assets) = self.split(pool)?;
        exchange::direct_swap(
            ledger,
            assets,
            participant,
            proof,
            payment_in,
            requested_out,
            now,
        )
    }

    /// Deposit payment for redeemable units. Returns the new redeemable balance.
    pub fn deposit_for_redeemable(
        &mut self,
        pool: &PoolId,
        participant: Identity,
        amount: Amount,
        proof: Option<&[Digest]>,
        now: UnixTimestamp,
    ) -> Result<Amount> {
        let (ledger, assets) = self.split(pool)?;
        exchange::deposit_for_redeemable(ledger, assets, participant, amount, proof, now)
    }

    /// Burn redeemable units for a pro-rata share of the public allocation.
    pub fn redeem_for_offered(
        &mut self,
        pool: &PoolId,
        participant: Identity,
        amount: Amount,
        now: UnixTimestamp,
    ) -> Result<Amount> {
        let (ledger, assets) = self.split(pool)?;
        exchange::redeem_for_offered(ledger, assets, participant, amount, now)
    }

    /// Send the collected, non-escrowed payment to the authority.
    pub fn withdraw_collected_payment(
        &mut self,
        pool: &PoolId,
        caller: Identity,
        now: UnixTimestamp,
    ) -> Result<Amount> {
        let (ledger, assets) = self.split(pool)?;
        exchange::withdraw_collected_payment(ledger, assets, caller, now)
    }

    /// Sweep offered tokens nobody can claim to the authority.
    pub fn withdraw_unsold_offered(
        &mut self,
        pool: &PoolId,
        caller: Identity,
        now: UnixTimestamp,
    ) -> Result<Amount> {
        let (ledger, assets) = self.split(pool)?;
        exchange::withdraw_unsold_offered(ledger, assets, caller, now)
    }

    // -----------------------------------------------------------------
    // Escrow
    // -----------------------------------------------------------------

    /// Move redeemable units into the time-locked escrow. Returns the locked amount.
    pub fn deposit_to_escrow(
        &mut self,
        pool: &PoolId,
        participant: Identity,
        amount: Amount,
        now: UnixTimestamp,
    ) -> Result<Amount> {
        let (ledger, assets) = self.split(pool)?;
        escrow::deposit_to_escrow(ledger, assets, participant, amount, now)
    }

    /// Release escrowed payment once it unlocks. Returns what stays locked.
    pub fn withdraw_from_escrow(
        &mut self,
        pool: &PoolId,
        participant: Identity,
        amount: Amount,
        now: UnixTimestamp,
    ) -> Result<Amount> {
        let (ledger, assets) = self.split(pool)?;
        escrow::withdraw_from_escrow(ledger, assets, participant, amount, now)
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    /// The ledger of one pool.
    pub fn pool(&self, pool: &PoolId) -> Result<&PoolLedger> {
        self.pools
            .get(pool)
            .ok_or_else(|| LaunchpadError::PoolNotFound(pool.clone()))
    }

    /// The pool's phase at `now`.
    pub fn phase(&self, pool: &PoolId, now: UnixTimestamp) -> Result<Phase> {
        Ok(self.pool(pool)?.phase(now))
    }

    /// Full-scan invariant check of one pool against custody.
    pub fn audit(&self, pool: &PoolId) -> Result<AuditReport> {
        audit(self.pool(pool)?, &self.assets)
    }

    /// The custody handle of one of the pool's vaults.
    pub fn vault(&self, pool: &PoolId, role: VaultRole) -> Result<StorageHandle> {
        self.vaults.get(pool, role)
    }

    /// Every initialized pool.
    pub fn pool_ids(&self) -> impl Iterator<Item = &PoolId> {
        self.pools.keys()
    }

    #[must_use]
    pub fn assets(&self) -> &A {
        &self.assets
    }

    /// Mutable custody access, for hosts funding wallets.
    pub fn assets_mut(&mut self) -> &mut A {
        &mut self.assets
    }
}
