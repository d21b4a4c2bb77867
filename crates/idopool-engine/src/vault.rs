//! Custody: the asset capability and the pool vault directory.
//!
//! The engine never moves tokens itself. It hands a batch of [`Transfer`]s
//! to an [`AssetLedger`], which must apply all of them or none. Pool-owned
//! balances live in vaults addressed by [`StorageHandle`]s that the
//! [`VaultDirectory`] hands out when a pool is initialized.

use std::{collections::HashMap, fmt};

use idopool_core::math;
use idopool_types::{Amount, Asset, Identity, LaunchpadError, PoolId, Result, StorageHandle};

/// Who holds a balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum Holder {
    /// A participant's or authority's own wallet.
    Wallet(Identity),
    /// A pool-owned custody slot.
    Vault(StorageHandle),
}

impl fmt::Display for Holder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wallet(id) => write!(f, "wallet({id})"),
            Self::Vault(handle) => write!(f, "{handle}"),
        }
    }
}

/// One movement of `amount` units of `asset`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub from: Holder,
    pub to: Holder,
    pub asset: Asset,
    pub amount: Amount,
}

impl Transfer {
    #[must_use]
    pub fn new(from: Holder, to: Holder, asset: &str, amount: Amount) -> Self {
        Self {
            from,
            to,
            asset: asset.to_string(),
            amount,
        }
    }
}

/// The asset-transfer capability the engine drives.
///
/// Implementations must make [`AssetLedger::apply`] atomic: if any transfer
/// in the batch fails, no balance changes.
pub trait AssetLedger {
    /// Balance of `asset` held by `holder`; zero if never credited.
    fn balance(&self, holder: &Holder, asset: &str) -> Amount;

    /// Apply a transfer batch atomically, in order.
    ///
    /// # Errors
    /// `InsufficientFunds` if any source runs dry at its point in the batch.
    fn apply(&mut self, transfers: &[Transfer]) -> Result<()>;

    /// Create `amount` units of `asset` out of thin air for `holder`.
    /// Hosts use this to fund wallets; the engine never mints.
    ///
    /// # Errors
    /// `ArithmeticOverflow` if the balance would overflow.
    fn mint(&mut self, holder: Holder, asset: &str, amount: Amount) -> Result<()>;
}

// ---------------------------------------------------------------------------
// InMemoryAssets
// ---------------------------------------------------------------------------

/// In-process [`AssetLedger`] keyed by `(holder, asset)`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAssets {
    balances: HashMap<(Holder, Asset), Amount>,
}

impl InMemoryAssets {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Total units of `asset` across every holder.
    #[must_use]
    pub fn total_supply(&self, asset: &str) -> u128 {
        self.balances
            .iter()
            .filter(|((_, a), _)| a == asset)
            .map(|(_, amount)| u128::from(*amount))
            .sum()
    }
}

impl AssetLedger for InMemoryAssets {
    fn balance(&self, holder: &Holder, asset: &str) -> Amount {
        self.balances
            .get(&(*holder, asset.to_string()))
            .copied()
            .unwrap_or(0)
    }

    fn apply(&mut self, transfers: &[Transfer]) -> Result<()> {
        // Work on an overlay of touched entries; write back only if every
        // transfer succeeded.
        let mut staged: HashMap<(Holder, Asset), Amount> = HashMap::new();
        for transfer in transfers.iter().filter(|t| t.amount > 0) {
            let from_key = (transfer.from, transfer.asset.clone());
            let available = staged
                .get(&from_key)
                .copied()
                .unwrap_or_else(|| self.balance(&transfer.from, &transfer.asset));
            let remaining = available.checked_sub(transfer.amount).ok_or_else(|| {
                LaunchpadError::InsufficientFunds {
                    holder: transfer.from.to_string(),
                    asset: transfer.asset.clone(),
                    needed: transfer.amount,
                    available,
                }
            })?;
            staged.insert(from_key, remaining);

            let to_key = (transfer.to, transfer.asset.clone());
            let current = staged
                .get(&to_key)
                .copied()
                .unwrap_or_else(|| self.balance(&transfer.to, &transfer.asset));
            staged.insert(to_key, math::add(current, transfer.amount)?);
        }
        self.balances.extend(staged);
        Ok(())
    }

    fn mint(&mut self, holder: Holder, asset: &str, amount: Amount) -> Result<()> {
        let entry = self.balances.entry((holder, asset.to_string())).or_default();
        *entry = math::add(*entry, amount)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// VaultDirectory
// ---------------------------------------------------------------------------

/// What a pool vault is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VaultRole {
    /// Offered tokens awaiting swap, redemption or sweep.
    Offered,
    /// Payment collected from deposits and direct swaps.
    Payment,
    /// Payment moved to escrow, pooled across participants.
    Escrow,
}

impl VaultRole {
    pub const ALL: [Self; 3] = [Self::Offered, Self::Payment, Self::Escrow];
}

/// The three vault handles of one pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolVaults {
    pub offered: StorageHandle,
    pub payment: StorageHandle,
    pub escrow: StorageHandle,
}

impl PoolVaults {
    #[must_use]
    pub fn handle(&self, role: VaultRole) -> StorageHandle {
        match role {
            VaultRole::Offered => self.offered,
            VaultRole::Payment => self.payment,
            VaultRole::Escrow => self.escrow,
        }
    }

    #[must_use]
    pub fn holder(&self, role: VaultRole) -> Holder {
        Holder::Vault(self.handle(role))
    }
}

/// `(pool, role) → handle` table. Handles are never reused.
#[derive(Debug, Clone)]
pub struct VaultDirectory {
    slots: HashMap<(PoolId, VaultRole), StorageHandle>,
    next: StorageHandle,
}

impl Default for VaultDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl VaultDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: HashMap::new(),
            next: StorageHandle(0),
        }
    }

    /// The handles [`VaultDirectory::register`] would assign next, without
    /// reserving them.
    ///
    /// # Errors
    /// `ArithmeticOverflow` once the handle space is exhausted.
    pub fn plan(&self) -> Result<PoolVaults> {
        let offered = self.next;
        let payment = offered.next()?;
        let escrow = payment.next()?;
        Ok(PoolVaults {
            offered,
            payment,
            escrow,
        })
    }

    /// Record a pool's vaults and advance past their handles.
    ///
    /// # Errors
    /// `PoolAlreadyInitialized` if the pool already has vaults,
    /// `ArithmeticOverflow` if no handle is left after them.
    pub fn register(&mut self, pool: &PoolId, vaults: PoolVaults) -> Result<()> {
        if VaultRole::ALL
            .iter()
            .any(|role| self.slots.contains_key(&(pool.clone(), *role)))
        {
            return Err(LaunchpadError::PoolAlreadyInitialized(pool.clone()));
        }
        let highest = vaults.offered.max(vaults.payment).max(vaults.escrow);
        let next = highest.next()?;
        for role in VaultRole::ALL {
            self.slots.insert((pool.clone(), role), vaults.handle(role));
        }
        self.next = self.next.max(next);
        Ok(())
    }

    /// Look up a vault.
    ///
    /// # Errors
    /// `PoolNotFound` if the pool was never registered.
    pub fn get(&self, pool: &PoolId, role: VaultRole) -> Result<StorageHandle> {
        self.slots
            .get(&(pool.clone(), role))
            .copied()
            .ok_or_else(|| LaunchpadError::PoolNotFound(pool.clone()))
    }

    /// Number of registered vaults.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
