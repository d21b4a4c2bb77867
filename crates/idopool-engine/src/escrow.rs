//! Escrow manager: the time-locked exit for redeemable holders.
//!
//! A participant who would rather have their payment back than a share of
//! the offered tokens moves redeemable units into escrow before `end_ido`.
//! The units stop counting towards the pro-rata denominator, the matching
//! payment moves from the pool's payment vault into its escrow vault, and
//! it can be withdrawn once the entry's `unlock_time` (`end_escrow`) passes.

use idopool_core::{math, phase_clock};
use idopool_types::{
    Amount, EscrowEntry, EventKind, Identity, LaunchpadError, Operation, Result, UnixTimestamp,
};

use crate::{
    ledger::{PoolLedger, Transition},
    vault::{AssetLedger, Holder, Transfer, VaultRole},
};

/// Move `amount` redeemable units into escrow. Returns the participant's
/// locked escrow amount afterwards.
pub fn deposit_to_escrow<A: AssetLedger>(
    ledger: &mut PoolLedger,
    assets: &mut A,
    participant: Identity,
    amount: Amount,
    now: UnixTimestamp,
) -> Result<Amount> {
    ledger.gate(Operation::DepositToEscrow, now)?;
    if amount == 0 {
        return Err(LaunchpadError::InvalidAmount {
            reason: "escrow deposit must be greater than zero".to_string(),
        });
    }

    let mut account = ledger.account(participant)?;
    account.debit_redeemable(amount)?;

    let config = ledger.config();
    let mut entry = ledger
        .escrow(&participant)
        .cloned()
        .unwrap_or_else(|| EscrowEntry::new(participant, config.times.end_escrow));
    entry.lock(amount)?;
    let locked = entry.amount();

    let mut state = ledger.state().clone();
    state.total_redeemable_minted = math::sub(state.total_redeemable_minted, amount)?;
    state.total_escrowed = math::add(state.total_escrowed, amount)?;

    let transition = Transition::new(
        state,
        EventKind::EscrowDeposited {
            participant,
            amount,
        },
    )
    .with_participant(account)
    .with_escrow(entry)
    .with_transfer(Transfer::new(
        ledger.vault(VaultRole::Payment),
        ledger.vault(VaultRole::Escrow),
        &config.payment_asset,
        amount,
    ));

    ledger.commit(assets, transition, now)?;
    tracing::info!(
        pool = %ledger.config().pool_id,
        %participant,
        amount,
        locked,
        "Escrow deposit locked"
    );
    Ok(locked)
}

/// Withdraw escrowed payment once the entry has unlocked. Returns the amount
/// still locked afterwards.
pub fn withdraw_from_escrow<A: AssetLedger>(
    ledger: &mut PoolLedger,
    assets: &mut A,
    participant: Identity,
    amount: Amount,
    now: UnixTimestamp,
) -> Result<Amount> {
    ledger.gate(Operation::WithdrawFromEscrow, now)?;
    let mut entry = ledger
        .escrow(&participant)
        .cloned()
        .ok_or(LaunchpadError::EscrowNotFound(participant))?;
    if !phase_clock::escrow_unlocked(now, entry.unlock_time()) {
        return Err(LaunchpadError::EscrowLocked {
            unlock_time: entry.unlock_time(),
            now,
        });
    }
    if amount == 0 {
        return Err(LaunchpadError::InvalidAmount {
            reason: "escrow withdrawal must be greater than zero".to_string(),
        });
    }
    entry.release(amount)?;
    let remaining = entry.amount();

    let mut state = ledger.state().clone();
    state.escrow_released = math::add(state.escrow_released, amount)?;

    let config = ledger.config();
    let transition = Transition::new(
        state,
        EventKind::EscrowWithdrawn {
            participant,
            amount,
        },
    )
    .with_escrow(entry)
    .with_transfer(Transfer::new(
        ledger.vault(VaultRole::Escrow),
        Holder::Wallet(participant),
        &config.payment_asset,
        amount,
    ));

    ledger.commit(assets, transition, now)?;
    tracing::info!(
        pool = %ledger.config().pool_id,
        %participant,
        amount,
        remaining,
        "Escrow withdrawal released"
    );
    Ok(remaining)
}

#[cfg(test)]
mod tests {
    use idopool_types::{PoolConfig, StorageHandle};

    use super::*;
    use crate::{
        exchange,
        vault::{InMemoryAssets, PoolVaults},
    };

    fn setup(deposit: Amount) -> (PoolLedger, InMemoryAssets, Identity) {
        let vaults = PoolVaults {
            offered: StorageHandle(0),
            payment: StorageHandle(1),
            escrow: StorageHandle(2),
        };
        let mut ledger = PoolLedger::new(PoolConfig::sample("melon", Identity::random()), vaults);
        let mut assets = InMemoryAssets::new();
        let who = Identity::random();
        assets.mint(Holder::Wallet(who), "USDC", deposit).unwrap();
        exchange::deposit_for_redeemable(&mut ledger, &mut assets, who, deposit, None, 250)
            .unwrap();
        (ledger, assets, who)
    }

    #[test]
    fn deposit_moves_redeemable_into_escrow() {
        let (mut ledger, mut assets, who) = setup(23_000_672);
        let locked = deposit_to_escrow(&mut ledger, &mut assets, who, 2_000_000, 350).unwrap();
        assert_eq!(locked, 2_000_000);

        let account = ledger.participant(&who).unwrap();
        assert_eq!(account.redeemable_balance, 21_000_672);
        let entry = ledger.escrow(&who).unwrap();
        assert_eq!(entry.amount(), 2_000_000);
        assert_eq!(entry.unlock_time(), 500);
        assert_eq!(ledger.state().total_redeemable_minted, 21_000_672);
        assert_eq!(ledger.state().total_escrowed, 2_000_000);
        assert_eq!(
            assets.balance(&ledger.vault(VaultRole::Escrow), "USDC"),
            2_000_000
        );
        assert_eq!(
            assets.balance(&ledger.vault(VaultRole::Payment), "USDC"),
            21_000_672
        );
    }

    #[test]
    fn escrow_window_closes_at_end_ido() {
        let (mut ledger, mut assets, who) = setup(100);
        assert!(matches!(
            deposit_to_escrow(&mut ledger, &mut assets, who, 10, 400),
            Err(LaunchpadError::PhaseViolation { .. })
        ));
        assert!(ledger.escrow(&who).is_none());
    }

    #[test]
    fn escrow_deposit_over_balance_fails() {
        let (mut ledger, mut assets, who) = setup(100);
        assert_eq!(
            deposit_to_escrow(&mut ledger, &mut assets, who, 101, 350),
            Err(LaunchpadError::InsufficientBalance {
                needed: 101,
                available: 100
            })
        );
        assert_eq!(ledger.state().total_escrowed, 0);
    }

    #[test]
    fn repeated_escrow_deposits_keep_unlock_time() {
        let (mut ledger, mut assets, who) = setup(100);
        deposit_to_escrow(&mut ledger, &mut assets, who, 10, 250).unwrap();
        let locked = deposit_to_escrow(&mut ledger, &mut assets, who, 15, 399).unwrap();
        assert_eq!(locked, 25);
        assert_eq!(ledger.escrow(&who).unwrap().unlock_time(), 500);
        assert_eq!(ledger.escrow(&who).unwrap().total_escrowed(), 25);
    }

    #[test]
    fn withdraw_locked_until_end_escrow() {
        let (mut ledger, mut assets, who) = setup(2_000_000);
        deposit_to_escrow(&mut ledger, &mut assets, who, 2_000_000, 350).unwrap();

        assert_eq!(
            withdraw_from_escrow(&mut ledger, &mut assets, who, 1, 499),
            Err(LaunchpadError::EscrowLocked {
                unlock_time: 500,
                now: 499
            })
        );
        assert_eq!(
            withdraw_from_escrow(&mut ledger, &mut assets, who, 500_000, 500),
            Ok(1_500_000)
        );
        assert_eq!(
            withdraw_from_escrow(&mut ledger, &mut assets, who, 1_500_000, 600),
            Ok(0)
        );
        assert_eq!(assets.balance(&Holder::Wallet(who), "USDC"), 2_000_000);
        assert_eq!(ledger.state().escrow_released, 2_000_000);
    }

    #[test]
    fn over_withdraw_fails() {
        let (mut ledger, mut assets, who) = setup(100);
        deposit_to_escrow(&mut ledger, &mut assets, who, 40, 350).unwrap();
        assert!(matches!(
            withdraw_from_escrow(&mut ledger, &mut assets, who, 41, 500),
            Err(LaunchpadError::InsufficientBalance { .. })
        ));
        assert_eq!(ledger.escrow(&who).unwrap().amount(), 40);
    }

    #[test]
    fn withdraw_without_entry_fails() {
        let (mut ledger, mut assets, _) = setup(100);
        let stranger = Identity::random();
        assert_eq!(
            withdraw_from_escrow(&mut ledger, &mut assets, stranger, 1, 600),
            Err(LaunchpadError::EscrowNotFound(stranger))
        );
    }

    #[test]
    fn escrow_shrinks_the_pro_rata_denominator() {
        let (mut ledger, mut assets, who) = setup(1_000);
        assets
            .mint(ledger.vault(VaultRole::Offered), "WMELON", 10_000_000)
            .unwrap();
        deposit_to_escrow(&mut ledger, &mut assets, who, 500, 350).unwrap();
        // the remaining 500 units are the whole denominator
        assert_eq!(
            exchange::redeem_for_offered(&mut ledger, &mut assets, who, 500, 400),
            Ok(10_000_000)
        );
    }
}
