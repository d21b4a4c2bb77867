//! Exchange engine: direct swap, deposit for redeemable, pro-rata
//! redemption and the authority's two sweeps.
//!
//! Each function stages a [`Transition`] from the ledger's current view and
//! commits it. Checks run in a fixed order (phase gate, authority or
//! allowlist, amounts, per-participant rules, allocation) so the same bad
//! call always fails with the same error.

use idopool_core::math;
use idopool_types::{
    AllocationKind, Amount, Digest, EventKind, Identity, LaunchpadError, Operation, Phase, Result,
    UnixTimestamp,
};

use crate::{
    ledger::{PoolLedger, Transition},
    vault::{AssetLedger, Holder, Transfer, VaultRole},
};

fn require_positive(amount: Amount, what: &str) -> Result<()> {
    if amount == 0 {
        return Err(LaunchpadError::InvalidAmount {
            reason: format!("{what} must be greater than zero"),
        });
    }
    Ok(())
}

/// Swap payment for offered tokens at the private price. One-shot per
/// participant, WHITELIST only, allowlist members only.
///
/// `requested_out`, when given, must equal the computed output.
///
/// Returns the offered units received.
pub fn direct_swap<A: AssetLedger>(
    ledger: &mut PoolLedger,
    assets: &mut A,
    participant: Identity,
    proof: &[Digest],
    payment_in: Amount,
    requested_out: Option<Amount>,
    now: UnixTimestamp,
) -> Result<Amount> {
    ledger.gate(Operation::DirectSwap, now)?;
    ledger.allowlist().require_member(&participant, proof)?;
    require_positive(payment_in, "payment")?;

    let mut account = ledger.account_or_new(participant);
    if account.has_claimed_direct_swap {
        return Err(LaunchpadError::AlreadyClaimed(participant));
    }
    if account.entered_redeemable_path() {
        return Err(LaunchpadError::PathConflict(participant));
    }

    let config = ledger.config();
    // Public-only pool: there is no private price, so report the payment.
    if config.private_allocation == 0 {
        return Err(LaunchpadError::AllocationExceeded {
            kind: AllocationKind::Private,
            requested: payment_in,
            remaining: 0,
        });
    }
    let offered_out = math::private_swap_out(
        payment_in,
        config.private_allocation,
        config.private_target_amount,
    )?;
    require_positive(offered_out, "offered output")?;
    if let Some(requested) = requested_out.filter(|r| *r != offered_out) {
        return Err(LaunchpadError::InvalidAmountOut {
            requested,
            computed: offered_out,
        });
    }
    let remaining = ledger.state().private_remaining(config)?;
    if offered_out > remaining {
        return Err(LaunchpadError::AllocationExceeded {
            kind: AllocationKind::Private,
            requested: offered_out,
            remaining,
        });
    }

    account.record_direct_swap(payment_in, offered_out)?;
    let mut state = ledger.state().clone();
    state.private_disbursed = math::add(state.private_disbursed, offered_out)?;
    state.private_payment_collected = math::add(state.private_payment_collected, payment_in)?;

    let wallet = Holder::Wallet(participant);
    let transition = Transition::new(
        state,
        EventKind::DirectSwapped {
            participant,
            payment_in,
            offered_out,
        },
    )
    .with_participant(account)
    .with_transfer(Transfer::new(
        wallet,
        ledger.vault(VaultRole::Payment),
        &config.payment_asset,
        payment_in,
    ))
    .with_transfer(Transfer::new(
        ledger.vault(VaultRole::Offered),
        wallet,
        &config.offered_asset,
        offered_out,
    ));

    ledger.commit(assets, transition, now)?;
    tracing::info!(
        pool = %ledger.config().pool_id,
        %participant,
        payment_in,
        offered_out,
        "Direct swap executed"
    );
    Ok(offered_out)
}

/// Deposit payment and receive the same number of redeemable units.
///
/// Open to anyone during DEPOSIT; during WHITELIST a valid `proof` is
/// required. Returns the participant's new redeemable balance.
pub fn deposit_for_redeemable<A: AssetLedger>(
    ledger: &mut PoolLedger,
    assets: &mut A,
    participant: Identity,
    amount: Amount,
    proof: Option<&[Digest]>,
    now: UnixTimestamp,
) -> Result<Amount> {
    let phase = ledger.gate(Operation::DepositForRedeemable, now)?;
    let with_proof = phase == Phase::Whitelist;
    if with_proof {
        ledger
            .allowlist()
            .require_member(&participant, proof.unwrap_or_default())?;
    }
    require_positive(amount, "deposit")?;

    let mut account = ledger.account_or_new(participant);
    if account.has_claimed_direct_swap {
        return Err(LaunchpadError::PathConflict(participant));
    }
    account.credit_deposit(amount)?;
    let balance = account.redeemable_balance;

    let config = ledger.config();
    let mut state = ledger.state().clone();
    state.total_payment_deposited = math::add(state.total_payment_deposited, amount)?;
    state.total_redeemable_minted = math::add(state.total_redeemable_minted, amount)?;

    let transition = Transition::new(
        state,
        EventKind::Deposited {
            participant,
            payment_in: amount,
            with_proof,
        },
    )
    .with_participant(account)
    .with_transfer(Transfer::new(
        Holder::Wallet(participant),
        ledger.vault(VaultRole::Payment),
        &config.payment_asset,
        amount,
    ));

    ledger.commit(assets, transition, now)?;
    tracing::info!(
        pool = %ledger.config().pool_id,
        %participant,
        amount,
        balance,
        %phase,
        "Deposit accepted"
    );
    Ok(balance)
}

/// Burn `amount` redeemable units for a pro-rata share of the public
/// allocation. Returns the offered units paid out.
pub fn redeem_for_offered<A: AssetLedger>(
    ledger: &mut PoolLedger,
    assets: &mut A,
    participant: Identity,
    amount: Amount,
    now: UnixTimestamp,
) -> Result<Amount> {
    ledger.gate(Operation::RedeemForOffered, now)?;
    require_positive(amount, "redemption")?;

    let mut account = ledger.account(participant)?;
    account.debit_redeemable(amount)?;

    let config = ledger.config();
    let total_minted = ledger.state().total_redeemable_minted;
    let offered_out = math::pro_rata_out(
        account.redeemed_total,
        amount,
        config.public_allocation,
        total_minted,
    )?;
    tracing::debug!(
        %participant,
        already_redeemed = account.redeemed_total,
        amount,
        public_allocation = config.public_allocation,
        total_minted,
        offered_out,
        "Pro-rata payout computed"
    );
    let remaining = ledger.state().public_remaining(config)?;
    if offered_out > remaining {
        return Err(LaunchpadError::AllocationExceeded {
            kind: AllocationKind::Public,
            requested: offered_out,
            remaining,
        });
    }

    account.redeemed_total = math::add(account.redeemed_total, amount)?;
    account.offered_received = math::add(account.offered_received, offered_out)?;
    let mut state = ledger.state().clone();
    state.total_redeemed = math::add(state.total_redeemed, amount)?;
    state.public_disbursed = math::add(state.public_disbursed, offered_out)?;

    let transition = Transition::new(
        state,
        EventKind::Redeemed {
            participant,
            redeemable_in: amount,
            offered_out,
        },
    )
    .with_participant(account)
    .with_transfer(Transfer::new(
        ledger.vault(VaultRole::Offered),
        Holder::Wallet(participant),
        &config.offered_asset,
        offered_out,
    ));

    ledger.commit(assets, transition, now)?;
    tracing::info!(
        pool = %ledger.config().pool_id,
        %participant,
        redeemed = amount,
        offered_out,
        "Redemption settled"
    );
    Ok(offered_out)
}

/// Sweep the payment vault to the authority. Escrowed payment sits in its
/// own vault and is not touched. Returns the amount moved; a repeat call
/// moves zero.
pub fn withdraw_collected_payment<A: AssetLedger>(
    ledger: &mut PoolLedger,
    assets: &mut A,
    caller: Identity,
    now: UnixTimestamp,
) -> Result<Amount> {
    ledger.gate(Operation::WithdrawCollectedPayment, now)?;
    ledger.require_authority(&caller, Operation::WithdrawCollectedPayment)?;

    let mut state = ledger.state().clone();
    let collected = math::add(state.total_payment_deposited, state.private_payment_collected)?;
    let amount = math::sub(
        math::sub(collected, state.total_escrowed)?,
        state.payment_withdrawn_by_authority,
    )?;
    state.payment_withdrawn_by_authority =
        math::add(state.payment_withdrawn_by_authority, amount)?;

    let config = ledger.config();
    let transition = Transition::new(
        state,
        EventKind::PaymentCollected {
            authority: caller,
            amount,
        },
    )
    .with_transfer(Transfer::new(
        ledger.vault(VaultRole::Payment),
        Holder::Wallet(caller),
        &config.payment_asset,
        amount,
    ));

    ledger.commit(assets, transition, now)?;
    tracing::info!(pool = %ledger.config().pool_id, amount, "Collected payment withdrawn");
    Ok(amount)
}

/// Offered units nobody can claim any more: the unswapped private
/// allocation, plus the undisbursed public allocation once no redeemable
/// balance is outstanding.
fn unclaimable_offered(ledger: &PoolLedger) -> Result<Amount> {
    let config = ledger.config();
    let state = ledger.state();
    let private = state.private_remaining(config)?;
    let public = if state.outstanding_redeemable()? == 0 {
        state.public_remaining(config)?
    } else {
        0
    };
    math::add(private, public)
}

/// Return unclaimable offered tokens to the authority. Repeat calls sweep
/// only what became unclaimable since the last one.
pub fn withdraw_unsold_offered<A: AssetLedger>(
    ledger: &mut PoolLedger,
    assets: &mut A,
    caller: Identity,
    now: UnixTimestamp,
) -> Result<Amount> {
    ledger.gate(Operation::WithdrawUnsoldOffered, now)?;
    ledger.require_authority(&caller, Operation::WithdrawUnsoldOffered)?;

    let mut state = ledger.state().clone();
    let amount = math::sub(
        unclaimable_offered(ledger)?,
        state.offered_withdrawn_by_authority,
    )?;
    state.offered_withdrawn_by_authority =
        math::add(state.offered_withdrawn_by_authority, amount)?;

    let config = ledger.config();
    let transition = Transition::new(
        state,
        EventKind::UnsoldOfferedWithdrawn {
            authority: caller,
            amount,
        },
    )
    .with_transfer(Transfer::new(
        ledger.vault(VaultRole::Offered),
        Holder::Wallet(caller),
        &config.offered_asset,
        amount,
    ));

    ledger.commit(assets, transition, now)?;
    tracing::info!(pool = %ledger.config().pool_id, amount, "Unsold offered tokens withdrawn");
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use idopool_core::AllowlistTree;
    use idopool_types::{PoolConfig, StorageHandle};

    use super::*;
    use crate::vault::{InMemoryAssets, PoolVaults};

    struct Fixture {
        ledger: PoolLedger,
        assets: InMemoryAssets,
        authority: Identity,
        members: Vec<Identity>,
        tree: AllowlistTree,
    }

    impl Fixture {
        fn new() -> Self {
            let authority = Identity::random();
            let members: Vec<Identity> = (0..3).map(|_| Identity::random()).collect();
            let tree = AllowlistTree::build(&members).unwrap();
            let mut config = PoolConfig::sample("melon", authority);
            config.allowlist_root = Some(tree.root());
            let vaults = PoolVaults {
                offered: StorageHandle(0),
                payment: StorageHandle(1),
                escrow: StorageHandle(2),
            };
            let ledger = PoolLedger::new(config, vaults);
            let mut assets = InMemoryAssets::new();
            assets
                .mint(ledger.vault(VaultRole::Offered), "WMELON", 12_000_000)
                .unwrap();
            Self {
                ledger,
                assets,
                authority,
                members,
                tree,
            }
        }

        fn fund(&mut self, who: Identity, amount: Amount) {
            self.assets
                .mint(Holder::Wallet(who), "USDC", amount)
                .unwrap();
        }

        fn proof(&self, who: &Identity) -> Vec<Digest> {
            self.tree.proof(who).unwrap()
        }

        fn deposit(&mut self, who: Identity, amount: Amount, now: UnixTimestamp) -> Result<Amount> {
            deposit_for_redeemable(&mut self.ledger, &mut self.assets, who, amount, None, now)
        }
    }

    #[test]
    fn direct_swap_reference_scenario() {
        let mut f = Fixture::new();
        let who = f.members[0];
        f.fund(who, 10_000);
        let proof = f.proof(&who);
        let out = direct_swap(
            &mut f.ledger,
            &mut f.assets,
            who,
            &proof,
            10_000,
            Some(200_000),
            150,
        )
        .unwrap();
        assert_eq!(out, 200_000);
        assert_eq!(f.assets.balance(&Holder::Wallet(who), "WMELON"), 200_000);
        assert_eq!(f.assets.balance(&Holder::Wallet(who), "USDC"), 0);
        assert_eq!(f.ledger.state().private_disbursed, 200_000);
        assert_eq!(f.ledger.state().private_payment_collected, 10_000);
    }

    #[test]
    fn direct_swap_on_public_only_pool() {
        let authority = Identity::random();
        let members: Vec<Identity> = (0..2).map(|_| Identity::random()).collect();
        let tree = AllowlistTree::build(&members).unwrap();
        let mut config = PoolConfig::sample("melon", authority);
        config.private_allocation = 0;
        config.private_target_amount = 0;
        config.allowlist_root = Some(tree.root());
        config.validate().unwrap();
        let vaults = PoolVaults {
            offered: StorageHandle(0),
            payment: StorageHandle(1),
            escrow: StorageHandle(2),
        };
        let mut ledger = PoolLedger::new(config, vaults);
        let mut assets = InMemoryAssets::new();
        assets
            .mint(ledger.vault(VaultRole::Offered), "WMELON", 10_000_000)
            .unwrap();
        let who = members[0];
        assets.mint(Holder::Wallet(who), "USDC", 10).unwrap();

        let proof = tree.proof(&who).unwrap();
        assert_eq!(
            direct_swap(&mut ledger, &mut assets, who, &proof, 10, None, 150),
            Err(LaunchpadError::AllocationExceeded {
                kind: AllocationKind::Private,
                requested: 10,
                remaining: 0,
            })
        );
        assert_eq!(ledger.state().private_disbursed, 0);
        assert_eq!(assets.balance(&Holder::Wallet(who), "USDC"), 10);
        assert!(ledger.journal().is_empty());
    }

    #[test]
    fn second_direct_swap_already_claimed() {
        let mut f = Fixture::new();
        let who = f.members[1];
        f.fund(who, 20_000);
        let proof = f.proof(&who);
        direct_swap(&mut f.ledger, &mut f.assets, who, &proof, 10_000, None, 150).unwrap();
        let err =
            direct_swap(&mut f.ledger, &mut f.assets, who, &proof, 10_000, None, 151).unwrap_err();
        assert_eq!(err, LaunchpadError::AlreadyClaimed(who));
        assert_eq!(f.ledger.state().private_disbursed, 200_000);
    }

    #[test]
    fn direct_swap_checks() {
        let mut f = Fixture::new();
        let who = f.members[0];
        f.fund(who, 1_000_000);
        let proof = f.proof(&who);

        // outside WHITELIST
        assert!(matches!(
            direct_swap(&mut f.ledger, &mut f.assets, who, &proof, 10, None, 250),
            Err(LaunchpadError::PhaseViolation { .. })
        ));
        // non-member
        let outsider = Identity::random();
        assert_eq!(
            direct_swap(&mut f.ledger, &mut f.assets, outsider, &proof, 10, None, 150),
            Err(LaunchpadError::ProofInvalid)
        );
        // wrong expected output
        assert_eq!(
            direct_swap(&mut f.ledger, &mut f.assets, who, &proof, 10_000, Some(1), 150),
            Err(LaunchpadError::InvalidAmountOut {
                requested: 1,
                computed: 200_000
            })
        );
        // zero payment
        assert!(matches!(
            direct_swap(&mut f.ledger, &mut f.assets, who, &proof, 0, None, 150),
            Err(LaunchpadError::InvalidAmount { .. })
        ));
        // more than the private allocation
        assert!(matches!(
            direct_swap(&mut f.ledger, &mut f.assets, who, &proof, 100_001, None, 150),
            Err(LaunchpadError::AllocationExceeded {
                kind: AllocationKind::Private,
                ..
            })
        ));
        assert!(f.ledger.journal().is_empty());
        assert!(f.ledger.participant(&who).is_none());
    }

    #[test]
    fn dust_payment_rejected() {
        let mut f = Fixture::new();
        let who = f.members[0];
        f.fund(who, 10);
        let proof = f.proof(&who);
        // sample price is 20 offered per payment unit, so shrink the allocation
        // to force a zero output
        let mut config = f.ledger.config().clone();
        config.private_allocation = 1;
        let mut ledger = PoolLedger::new(config, *f.ledger.vaults());
        assert!(matches!(
            direct_swap(&mut ledger, &mut f.assets, who, &proof, 1, None, 150),
            Err(LaunchpadError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn paths_are_mutually_exclusive() {
        let mut f = Fixture::new();
        let (swapper, depositor) = (f.members[0], f.members[1]);
        f.fund(swapper, 20_000);
        f.fund(depositor, 20_000);
        let swapper_proof = f.proof(&swapper);
        let depositor_proof = f.proof(&depositor);

        direct_swap(&mut f.ledger, &mut f.assets, swapper, &swapper_proof, 10_000, None, 150)
            .unwrap();
        assert_eq!(
            f.deposit(swapper, 10, 250),
            Err(LaunchpadError::PathConflict(swapper))
        );

        deposit_for_redeemable(
            &mut f.ledger,
            &mut f.assets,
            depositor,
            10,
            Some(depositor_proof.as_slice()),
            150,
        )
        .unwrap();
        assert_eq!(
            direct_swap(&mut f.ledger, &mut f.assets, depositor, &depositor_proof, 10, None, 160),
            Err(LaunchpadError::PathConflict(depositor))
        );
    }

    #[test]
    fn whitelist_deposit_needs_proof() {
        let mut f = Fixture::new();
        let outsider = Identity::random();
        f.fund(outsider, 100);
        assert_eq!(f.deposit(outsider, 100, 150), Err(LaunchpadError::ProofInvalid));
        assert_eq!(f.deposit(outsider, 100, 250), Ok(100));
        let event = f.ledger.journal().events().last().unwrap();
        assert_eq!(
            event.kind,
            EventKind::Deposited {
                participant: outsider,
                payment_in: 100,
                with_proof: false
            }
        );
    }

    #[test]
    fn deposits_accumulate() {
        let mut f = Fixture::new();
        let who = Identity::random();
        f.fund(who, 1_000);
        f.deposit(who, 300, 250).unwrap();
        assert_eq!(f.deposit(who, 200, 260), Ok(500));
        assert!(matches!(
            f.deposit(who, 0, 260),
            Err(LaunchpadError::InvalidAmount { .. })
        ));
        assert_eq!(f.ledger.state().total_redeemable_minted, 500);
        assert_eq!(f.ledger.state().total_payment_deposited, 500);
        assert_eq!(f.assets.balance(&f.ledger.vault(VaultRole::Payment), "USDC"), 500);
    }

    #[test]
    fn deposit_without_funds_changes_nothing() {
        let mut f = Fixture::new();
        let who = Identity::random();
        f.fund(who, 10);
        assert!(matches!(
            f.deposit(who, 11, 250),
            Err(LaunchpadError::InsufficientFunds { .. })
        ));
        assert!(f.ledger.participant(&who).is_none());
        assert_eq!(f.ledger.state().total_redeemable_minted, 0);
    }

    #[test]
    fn redemption_reference_scenario() {
        let mut f = Fixture::new();
        let (a, b) = (Identity::random(), Identity::random());
        f.fund(a, 10_000_349);
        f.fund(b, 23_000_672);
        f.deposit(a, 10_000_349, 250).unwrap();
        f.deposit(b, 23_000_672, 250).unwrap();

        // not before end_ido
        assert!(matches!(
            redeem_for_offered(&mut f.ledger, &mut f.assets, a, 1, 399),
            Err(LaunchpadError::PhaseViolation { .. })
        ));

        let out_a = redeem_for_offered(&mut f.ledger, &mut f.assets, a, 10_000_349, 400).unwrap();
        let out_b = redeem_for_offered(&mut f.ledger, &mut f.assets, b, 23_000_672, 401).unwrap();
        assert_eq!(out_a, 3_030_315);
        assert_eq!(out_b, 6_969_684);
        assert_eq!(f.ledger.state().public_disbursed, 9_999_999);
        assert_eq!(f.ledger.state().outstanding_redeemable(), Ok(0));
    }

    #[test]
    fn over_redemption_changes_nothing() {
        let mut f = Fixture::new();
        let who = Identity::random();
        f.fund(who, 100);
        f.deposit(who, 100, 250).unwrap();
        let before = f.ledger.state().clone();
        assert_eq!(
            redeem_for_offered(&mut f.ledger, &mut f.assets, who, 101, 450),
            Err(LaunchpadError::InsufficientBalance {
                needed: 101,
                available: 100
            })
        );
        assert_eq!(f.ledger.state(), &before);
        assert_eq!(f.ledger.participant(&who).unwrap().redeemable_balance, 100);
    }

    #[test]
    fn unknown_participant_cannot_redeem() {
        let mut f = Fixture::new();
        let who = Identity::random();
        assert_eq!(
            redeem_for_offered(&mut f.ledger, &mut f.assets, who, 1, 450),
            Err(LaunchpadError::ParticipantNotFound(who))
        );
    }

    #[test]
    fn authority_withdrawals() {
        let mut f = Fixture::new();
        let who = Identity::random();
        let member = f.members[2];
        f.fund(who, 1_000);
        f.fund(member, 10_000);
        let proof = f.proof(&member);
        direct_swap(&mut f.ledger, &mut f.assets, member, &proof, 10_000, None, 150).unwrap();
        f.deposit(who, 1_000, 250).unwrap();

        let authority = f.authority;
        assert!(matches!(
            withdraw_collected_payment(&mut f.ledger, &mut f.assets, who, 450),
            Err(LaunchpadError::Unauthorized { .. })
        ));
        assert!(matches!(
            withdraw_collected_payment(&mut f.ledger, &mut f.assets, authority, 399),
            Err(LaunchpadError::PhaseViolation { .. })
        ));
        assert_eq!(
            withdraw_collected_payment(&mut f.ledger, &mut f.assets, authority, 450),
            Ok(11_000)
        );
        assert_eq!(
            withdraw_collected_payment(&mut f.ledger, &mut f.assets, authority, 451),
            Ok(0)
        );
        assert_eq!(f.assets.balance(&Holder::Wallet(authority), "USDC"), 11_000);

        // private leftover only; the public allocation is still owed
        assert_eq!(
            withdraw_unsold_offered(&mut f.ledger, &mut f.assets, authority, 452),
            Ok(1_800_000)
        );
        assert_eq!(
            withdraw_unsold_offered(&mut f.ledger, &mut f.assets, authority, 453),
            Ok(0)
        );
        // the single depositor takes the whole public allocation; nothing left
        assert_eq!(
            redeem_for_offered(&mut f.ledger, &mut f.assets, who, 1_000, 454),
            Ok(10_000_000)
        );
        assert_eq!(
            withdraw_unsold_offered(&mut f.ledger, &mut f.assets, authority, 455),
            Ok(0)
        );
        assert_eq!(f.assets.balance(&f.ledger.vault(VaultRole::Offered), "WMELON"), 0);
    }

    #[test]
    fn unsold_public_swept_when_nobody_deposited() {
        let mut f = Fixture::new();
        let authority = f.authority;
        assert_eq!(
            withdraw_unsold_offered(&mut f.ledger, &mut f.assets, authority, 400),
            Ok(12_000_000)
        );
        assert_eq!(f.ledger.state().offered_withdrawn_by_authority, 12_000_000);
        assert!(f.ledger.state().offered_withdrawn());
    }

    #[test]
    fn rounding_dust_swept_after_last_redemption() {
        let mut f = Fixture::new();
        let (a, b) = (Identity::random(), Identity::random());
        f.fund(a, 10_000_349);
        f.fund(b, 23_000_672);
        f.deposit(a, 10_000_349, 250).unwrap();
        f.deposit(b, 23_000_672, 250).unwrap();
        let authority = f.authority;
        redeem_for_offered(&mut f.ledger, &mut f.assets, a, 10_000_349, 400).unwrap();
        // b still holds redeemable: only the private allocation is sweepable
        assert_eq!(
            withdraw_unsold_offered(&mut f.ledger, &mut f.assets, authority, 401),
            Ok(2_000_000)
        );
        redeem_for_offered(&mut f.ledger, &mut f.assets, b, 23_000_672, 402).unwrap();
        assert_eq!(
            withdraw_unsold_offered(&mut f.ledger, &mut f.assets, authority, 403),
            Ok(1)
        );
    }
}
