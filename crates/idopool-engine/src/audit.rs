//! Full-scan pool audit.
//!
//! Invariants re-derived from the participant and escrow tables and the
//! custody balances, not from the counters alone:
//! ```text
//! total_redeemable_minted == Σ redeemable_balance + total_redeemed
//! payment vault == deposited + private collected − escrowed − withdrawn by authority
//! escrow vault  == Σ entry.amount == total_escrowed − escrow_released
//! offered vault == public + private − public disbursed − private disbursed − swept
//! ```
//!
//! Commits only run the cheap counter checks of `PoolState::check`; this
//! scan is for hosts and tests. A failure means the ledger and custody have
//! diverged; halting the pool is left to the host.

use idopool_core::math;
use idopool_types::{Amount, LaunchpadError, Result};

use crate::{
    ledger::PoolLedger,
    vault::{AssetLedger, VaultRole},
};

/// Figures the audit reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditReport {
    pub participants: usize,
    pub escrow_entries: usize,
    pub outstanding_redeemable: Amount,
    pub payment_vault: Amount,
    pub escrow_vault: Amount,
    pub offered_vault: Amount,
    pub journal_len: usize,
}

fn expect_equal(what: &str, actual: Amount, expected: Amount) -> Result<()> {
    if actual != expected {
        return Err(LaunchpadError::InvariantViolation {
            reason: format!("{what}: actual {actual} != expected {expected}"),
        });
    }
    Ok(())
}

fn sum<'a, T: 'a>(
    mut items: impl Iterator<Item = &'a T>,
    field: impl Fn(&T) -> Amount,
) -> Result<Amount> {
    items.try_fold(0, |acc, item| math::add(acc, field(item)))
}

/// Audit one pool against its custody.
///
/// # Errors
/// `InvariantViolation` naming the first mismatch, or the arithmetic error
/// a corrupt counter produces.
pub fn audit<A: AssetLedger>(ledger: &PoolLedger, assets: &A) -> Result<AuditReport> {
    let config = ledger.config();
    let state = ledger.state();
    state.check(config)?;

    // Participant table against counters.
    let balances = sum(ledger.participants(), |a| a.redeemable_balance)?;
    expect_equal(
        "redeemable minted vs balances + redeemed",
        state.total_redeemable_minted,
        math::add(balances, state.total_redeemed)?,
    )?;
    expect_equal(
        "total redeemed",
        sum(ledger.participants(), |a| a.redeemed_total)?,
        state.total_redeemed,
    )?;
    expect_equal(
        "public disbursed",
        sum(ledger.participants(), |a| a.offered_received)?,
        state.public_disbursed,
    )?;
    expect_equal(
        "private disbursed",
        sum(ledger.participants(), |a| a.direct_swap_offered)?,
        state.private_disbursed,
    )?;
    expect_equal(
        "private payment collected",
        sum(ledger.participants(), |a| a.direct_swap_payment)?,
        state.private_payment_collected,
    )?;
    expect_equal(
        "payment deposited",
        sum(ledger.participants(), |a| a.cumulative_deposited)?,
        state.total_payment_deposited,
    )?;

    // Escrow table against counters.
    let locked = sum(ledger.escrows(), |e| e.amount())?;
    expect_equal(
        "escrow locked",
        locked,
        math::sub(state.total_escrowed, state.escrow_released)?,
    )?;
    expect_equal(
        "escrowed",
        sum(ledger.escrows(), |e| e.total_escrowed())?,
        state.total_escrowed,
    )?;
    if let Some(entry) = ledger
        .escrows()
        .find(|e| e.unlock_time() != config.times.end_escrow)
    {
        return Err(LaunchpadError::InvariantViolation {
            reason: format!(
                "escrow entry of {} unlocks at {} instead of {}",
                entry.owner(),
                entry.unlock_time(),
                config.times.end_escrow
            ),
        });
    }

    // Custody.
    let payment_vault = assets.balance(&ledger.vault(VaultRole::Payment), &config.payment_asset);
    let collected = math::add(state.total_payment_deposited, state.private_payment_collected)?;
    expect_equal(
        "payment vault",
        payment_vault,
        math::sub(
            math::sub(collected, state.total_escrowed)?,
            state.payment_withdrawn_by_authority,
        )?,
    )?;
    let escrow_vault = assets.balance(&ledger.vault(VaultRole::Escrow), &config.payment_asset);
    expect_equal("escrow vault", escrow_vault, locked)?;
    let offered_vault = assets.balance(&ledger.vault(VaultRole::Offered), &config.offered_asset);
    let disbursed = math::add(state.public_disbursed, state.private_disbursed)?;
    expect_equal(
        "offered vault",
        offered_vault,
        math::sub(
            math::sub(config.total_offered()?, disbursed)?,
            state.offered_withdrawn_by_authority,
        )?,
    )?;

    ledger.journal().verify()?;

    let report = AuditReport {
        participants: ledger.participants().count(),
        escrow_entries: ledger.escrows().count(),
        outstanding_redeemable: state.outstanding_redeemable()?,
        payment_vault,
        escrow_vault,
        offered_vault,
        journal_len: ledger.journal().len(),
    };
    tracing::debug!(pool = %config.pool_id, ?report, "Audit passed");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use idopool_types::{Identity, PoolConfig, StorageHandle};

    use super::*;
    use crate::{
        escrow, exchange,
        vault::{Holder, InMemoryAssets, PoolVaults, Transfer},
    };

    fn funded() -> (PoolLedger, InMemoryAssets) {
        let vaults = PoolVaults {
            offered: StorageHandle(0),
            payment: StorageHandle(1),
            escrow: StorageHandle(2),
        };
        let ledger = PoolLedger::new(PoolConfig::sample("melon", Identity::random()), vaults);
        let mut assets = InMemoryAssets::new();
        assets
            .mint(ledger.vault(VaultRole::Offered), "WMELON", 12_000_000)
            .unwrap();
        (ledger, assets)
    }

    #[test]
    fn fresh_pool_passes() {
        let (ledger, assets) = funded();
        let report = audit(&ledger, &assets).unwrap();
        assert_eq!(report.offered_vault, 12_000_000);
        assert_eq!(report.participants, 0);
        assert_eq!(report.journal_len, 0);
    }

    #[test]
    fn passes_after_deposits_escrow_and_redemption() {
        let (mut ledger, mut assets) = funded();
        let (a, b) = (Identity::random(), Identity::random());
        assets.mint(Holder::Wallet(a), "USDC", 10_000_349).unwrap();
        assets.mint(Holder::Wallet(b), "USDC", 23_000_672).unwrap();
        exchange::deposit_for_redeemable(&mut ledger, &mut assets, a, 10_000_349, None, 250)
            .unwrap();
        exchange::deposit_for_redeemable(&mut ledger, &mut assets, b, 23_000_672, None, 250)
            .unwrap();
        escrow::deposit_to_escrow(&mut ledger, &mut assets, b, 2_000_000, 350).unwrap();
        exchange::redeem_for_offered(&mut ledger, &mut assets, a, 5_000_000, 400).unwrap();

        let report = audit(&ledger, &assets).unwrap();
        assert_eq!(report.participants, 2);
        assert_eq!(report.escrow_entries, 1);
        assert_eq!(report.escrow_vault, 2_000_000);
        assert_eq!(report.payment_vault, 31_001_021);
        assert_eq!(report.outstanding_redeemable, 26_001_021);
        assert_eq!(report.journal_len, 4);
    }

    #[test]
    fn detects_custody_drift() {
        let (ledger, mut assets) = funded();
        // someone drains the offered vault behind the ledger's back
        let thief = Holder::Wallet(Identity::random());
        assets
            .apply(&[Transfer::new(
                ledger.vault(VaultRole::Offered),
                thief,
                "WMELON",
                1,
            )])
            .unwrap();
        let err = audit(&ledger, &assets).unwrap_err();
        assert!(matches!(
            err,
            LaunchpadError::InvariantViolation { ref reason } if reason.starts_with("offered vault")
        ));
    }

    #[test]
    fn detects_unfunded_pool() {
        let (ledger, _) = funded();
        let empty = InMemoryAssets::new();
        assert!(audit(&ledger, &empty).is_err());
    }
}
