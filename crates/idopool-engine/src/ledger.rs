//! The pool ledger: configuration, counters, participant and escrow tables,
//! allowlist root and journal of one pool.
//!
//! Nothing outside this module mutates a ledger directly. The exchange and
//! escrow modules compute a [`Transition`] from a read-only view; the ledger
//! then validates it, hands its transfers to the asset capability, and only
//! after custody succeeded writes the staged records. Any error before that
//! point leaves ledger and custody exactly as they were.

use std::collections::HashMap;

use idopool_core::{AllowlistVerifier, phase_clock};
use idopool_types::{
    Digest, EscrowEntry, EventKind, Identity, LaunchpadError, Operation, ParticipantAccount,
    Phase, PoolConfig, PoolEvent, PoolState, Result, UnixTimestamp,
};

use crate::{
    journal::Journal,
    vault::{AssetLedger, Holder, PoolVaults, Transfer, VaultRole},
};

/// Everything one committed operation changes.
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: PoolState,
    pub participant: Option<ParticipantAccount>,
    pub escrow: Option<EscrowEntry>,
    pub allowlist_root: Option<Digest>,
    pub transfers: Vec<Transfer>,
    pub event: EventKind,
}

impl Transition {
    #[must_use]
    pub fn new(state: PoolState, event: EventKind) -> Self {
        Self {
            state,
            participant: None,
            escrow: None,
            allowlist_root: None,
            transfers: Vec::new(),
            event,
        }
    }

    #[must_use]
    pub fn with_participant(mut self, account: ParticipantAccount) -> Self {
        self.participant = Some(account);
        self
    }

    #[must_use]
    pub fn with_escrow(mut self, entry: EscrowEntry) -> Self {
        self.escrow = Some(entry);
        self
    }

    #[must_use]
    pub fn with_allowlist_root(mut self, root: Digest) -> Self {
        self.allowlist_root = Some(root);
        self
    }

    #[must_use]
    pub fn with_transfer(mut self, transfer: Transfer) -> Self {
        self.transfers.push(transfer);
        self
    }
}

/// State of one launch pool.
#[derive(Debug, Clone)]
pub struct PoolLedger {
    config: PoolConfig,
    state: PoolState,
    allowlist: AllowlistVerifier,
    participants: HashMap<Identity, ParticipantAccount>,
    escrows: HashMap<Identity, EscrowEntry>,
    vaults: PoolVaults,
    journal: Journal,
}

impl PoolLedger {
    /// A ledger for a freshly initialized pool. Custody funding is the
    /// caller's first transition.
    #[must_use]
    pub fn new(config: PoolConfig, vaults: PoolVaults) -> Self {
        let allowlist = AllowlistVerifier::with_root(config.allowlist_root);
        Self {
            config,
            state: PoolState::initialized(),
            allowlist,
            participants: HashMap::new(),
            escrows: HashMap::new(),
            vaults,
            journal: Journal::new(),
        }
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    #[must_use]
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &PoolState {
        &self.state
    }

    #[must_use]
    pub fn allowlist(&self) -> &AllowlistVerifier {
        &self.allowlist
    }

    #[must_use]
    pub fn participant(&self, identity: &Identity) -> Option<&ParticipantAccount> {
        self.participants.get(identity)
    }

    pub fn participants(&self) -> impl Iterator<Item = &ParticipantAccount> {
        self.participants.values()
    }

    #[must_use]
    pub fn escrow(&self, identity: &Identity) -> Option<&EscrowEntry> {
        self.escrows.get(identity)
    }

    pub fn escrows(&self) -> impl Iterator<Item = &EscrowEntry> {
        self.escrows.values()
    }

    #[must_use]
    pub fn vaults(&self) -> &PoolVaults {
        &self.vaults
    }

    #[must_use]
    pub fn vault(&self, role: VaultRole) -> Holder {
        self.vaults.holder(role)
    }

    #[must_use]
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// The pool's phase at `now`.
    #[must_use]
    pub fn phase(&self, now: UnixTimestamp) -> Phase {
        phase_clock::phase(now, &self.config.times)
    }

    // -----------------------------------------------------------------
    // Guards used while staging
    // -----------------------------------------------------------------

    /// Phase gate for `operation` at `now`.
    pub fn gate(&self, operation: Operation, now: UnixTimestamp) -> Result<Phase> {
        phase_clock::check(operation, now, &self.config.times)
    }

    /// Reject callers other than the pool authority.
    pub fn require_authority(&self, caller: &Identity, operation: Operation) -> Result<()> {
        if *caller == self.config.authority {
            return Ok(());
        }
        tracing::warn!(
            pool = %self.config.pool_id,
            %caller,
            %operation,
            "Authority check failed"
        );
        Err(LaunchpadError::Unauthorized {
            caller: *caller,
            operation,
        })
    }

    /// A copy of the participant's account, or a fresh one.
    #[must_use]
    pub fn account_or_new(&self, identity: Identity) -> ParticipantAccount {
        self.participants
            .get(&identity)
            .cloned()
            .unwrap_or_else(|| ParticipantAccount::new(identity))
    }

    /// A copy of the participant's account.
    ///
    /// # Errors
    /// `ParticipantNotFound` if they never deposited, swapped or registered.
    pub fn account(&self, identity: Identity) -> Result<ParticipantAccount> {
        self.participants
            .get(&identity)
            .cloned()
            .ok_or(LaunchpadError::ParticipantNotFound(identity))
    }

    // -----------------------------------------------------------------
    // Commit
    // -----------------------------------------------------------------

    /// Validate, apply custody, then write the staged records.
    ///
    /// # Errors
    /// Any counter invariant the staged state breaks, `AlreadySet` for a
    /// second allowlist root, and whatever the asset capability rejects.
    /// On error nothing has changed.
    pub fn commit<A: AssetLedger>(
        &mut self,
        assets: &mut A,
        transition: Transition,
        now: UnixTimestamp,
    ) -> Result<&PoolEvent> {
        let Transition {
            state,
            participant,
            escrow,
            allowlist_root,
            transfers,
            event,
        } = transition;

        state.check(&self.config)?;
        let allowlist = match allowlist_root {
            Some(root) => {
                let mut staged = self.allowlist.clone();
                staged.set_root(root)?;
                Some(staged)
            }
            None => None,
        };
        let pending = self.journal.prepare(event, now)?;

        assets.apply(&transfers)?;

        self.state = state;
        if let Some(account) = participant {
            self.participants.insert(account.owner, account);
        }
        if let Some(entry) = escrow {
            self.escrows.insert(entry.owner(), entry);
        }
        if let Some(allowlist) = allowlist {
            self.allowlist = allowlist;
        }
        self.journal.commit(pending)
    }
}

#[cfg(test)]
mod tests {
    use idopool_types::StorageHandle;

    use super::*;
    use crate::vault::InMemoryAssets;

    fn ledger() -> PoolLedger {
        let vaults = PoolVaults {
            offered: StorageHandle(0),
            payment: StorageHandle(1),
            escrow: StorageHandle(2),
        };
        PoolLedger::new(PoolConfig::sample("melon", Identity::random()), vaults)
    }

    #[test]
    fn new_ledger_is_initialized_and_empty() {
        let l = ledger();
        assert!(l.state().is_initialized);
        assert_eq!(l.participants().count(), 0);
        assert!(l.journal().is_empty());
        assert!(l.allowlist().root().is_none());
        assert_eq!(l.phase(50), Phase::Pending);
    }

    #[test]
    fn require_authority_rejects_others() {
        let l = ledger();
        let authority = l.config().authority;
        assert!(l.require_authority(&authority, Operation::SetAllowlistRoot).is_ok());
        let stranger = Identity::random();
        assert_eq!(
            l.require_authority(&stranger, Operation::WithdrawCollectedPayment),
            Err(LaunchpadError::Unauthorized {
                caller: stranger,
                operation: Operation::WithdrawCollectedPayment,
            })
        );
    }

    #[test]
    fn commit_writes_records_and_journal() {
        let mut l = ledger();
        let mut assets = InMemoryAssets::new();
        let who = Identity::random();
        assets.mint(Holder::Wallet(who), "USDC", 50).unwrap();

        let mut account = l.account_or_new(who);
        account.credit_deposit(50).unwrap();
        let mut state = l.state().clone();
        state.total_redeemable_minted = 50;
        state.total_payment_deposited = 50;
        let transition = Transition::new(
            state,
            EventKind::Deposited {
                participant: who,
                payment_in: 50,
                with_proof: false,
            },
        )
        .with_participant(account)
        .with_transfer(Transfer::new(
            Holder::Wallet(who),
            l.vault(VaultRole::Payment),
            "USDC",
            50,
        ));

        let seq = l.commit(&mut assets, transition, 250).unwrap().seq;
        assert_eq!(seq, 0);
        assert_eq!(l.state().total_redeemable_minted, 50);
        assert_eq!(l.participant(&who).unwrap().redeemable_balance, 50);
        assert_eq!(assets.balance(&l.vault(VaultRole::Payment), "USDC"), 50);
    }

    #[test]
    fn failed_custody_leaves_ledger_untouched() {
        let mut l = ledger();
        let mut assets = InMemoryAssets::new();
        let who = Identity::random();

        let mut account = l.account_or_new(who);
        account.credit_deposit(50).unwrap();
        let mut state = l.state().clone();
        state.total_redeemable_minted = 50;
        let transition = Transition::new(
            state,
            EventKind::Deposited {
                participant: who,
                payment_in: 50,
                with_proof: false,
            },
        )
        .with_participant(account)
        .with_transfer(Transfer::new(
            Holder::Wallet(who),
            l.vault(VaultRole::Payment),
            "USDC",
            50,
        ));

        let err = l.commit(&mut assets, transition, 250).unwrap_err();
        assert!(matches!(err, LaunchpadError::InsufficientFunds { .. }));
        assert_eq!(l.state().total_redeemable_minted, 0);
        assert!(l.participant(&who).is_none());
        assert!(l.journal().is_empty());
    }

    #[test]
    fn broken_counters_rejected_before_custody() {
        let mut l = ledger();
        let mut assets = InMemoryAssets::new();
        let mut state = l.state().clone();
        state.public_disbursed = l.config().public_allocation + 1;
        let who = Identity::random();
        assets
            .mint(l.vault(VaultRole::Offered), "WMELON", 1)
            .unwrap();
        let transition = Transition::new(
            state,
            EventKind::Redeemed {
                participant: who,
                redeemable_in: 1,
                offered_out: 1,
            },
        )
        .with_transfer(Transfer::new(
            l.vault(VaultRole::Offered),
            Holder::Wallet(who),
            "WMELON",
            1,
        ));
        assert!(matches!(
            l.commit(&mut assets, transition, 450),
            Err(LaunchpadError::AllocationExceeded { .. })
        ));
        assert_eq!(assets.balance(&Holder::Wallet(who), "WMELON"), 0);
    }

    #[test]
    fn second_root_rejected_atomically() {
        let mut l = ledger();
        let mut assets = InMemoryAssets::new();
        let root = Digest([9; 32]);
        let first = Transition::new(l.state().clone(), EventKind::AllowlistRootSet { root })
            .with_allowlist_root(root);
        l.commit(&mut assets, first, 10).unwrap();
        assert_eq!(l.allowlist().root(), Some(&root));

        let other = Digest([8; 32]);
        let second = Transition::new(l.state().clone(), EventKind::AllowlistRootSet { root: other })
            .with_allowlist_root(other);
        assert!(matches!(
            l.commit(&mut assets, second, 11),
            Err(LaunchpadError::AlreadySet { .. })
        ));
        assert_eq!(l.allowlist().root(), Some(&root));
        assert_eq!(l.journal().len(), 1);
    }
}
