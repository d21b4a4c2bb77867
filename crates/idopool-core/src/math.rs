//! Checked integer arithmetic for pool accounting.
//!
//! All amounts are `u64` base units. Products go through `u128` so
//! `a × b / d` never overflows in the intermediate; only a quotient that does
//! not fit back into `u64` is an overflow. Divisions floor.

use idopool_types::{Amount, LaunchpadError, Result};

/// `a + b`, or `ArithmeticOverflow`.
pub fn add(a: Amount, b: Amount) -> Result<Amount> {
    a.checked_add(b).ok_or(LaunchpadError::ArithmeticOverflow)
}

/// `a − b`, or `ArithmeticUnderflow`.
pub fn sub(a: Amount, b: Amount) -> Result<Amount> {
    a.checked_sub(b).ok_or(LaunchpadError::ArithmeticUnderflow)
}

/// `floor(a × b / d)`.
///
/// # Errors
/// `DivisionByZero` if `d == 0`; `ArithmeticOverflow` if the quotient does
/// not fit in `u64`.
pub fn mul_div_floor(a: Amount, b: Amount, d: Amount) -> Result<Amount> {
    if d == 0 {
        return Err(LaunchpadError::DivisionByZero);
    }
    let product = u128::from(a)
        .checked_mul(u128::from(b))
        .ok_or(LaunchpadError::ArithmeticOverflow)?;
    Amount::try_from(product / u128::from(d)).map_err(|_| LaunchpadError::ArithmeticOverflow)
}

/// Offered units a direct swap pays for `payment_in`:
/// `floor(payment_in × private_allocation / private_target_amount)`.
pub fn private_swap_out(
    payment_in: Amount,
    private_allocation: Amount,
    private_target_amount: Amount,
) -> Result<Amount> {
    mul_div_floor(payment_in, private_allocation, private_target_amount)
}

/// Offered units owed for redeeming `amount` redeemable units on top of
/// `already_redeemed` by the same holder.
///
/// The entitlement is computed on the cumulative redeemed amount,
/// `entitled(x) = floor(x × public_allocation / total_minted)`, and the
/// payout is the increment. A single redemption of the whole balance pays
/// `floor(amount × public_allocation / total_minted)`, and any split of that
/// balance into partial redemptions pays exactly the same total.
pub fn pro_rata_out(
    already_redeemed: Amount,
    amount: Amount,
    public_allocation: Amount,
    total_minted: Amount,
) -> Result<Amount> {
    let before = mul_div_floor(already_redeemed, public_allocation, total_minted)?;
    let after = mul_div_floor(add(already_redeemed, amount)?, public_allocation, total_minted)?;
    sub(after, before)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_sub_checked() {
        assert_eq!(add(1, 2), Ok(3));
        assert_eq!(add(u64::MAX, 1), Err(LaunchpadError::ArithmeticOverflow));
        assert_eq!(sub(5, 3), Ok(2));
        assert_eq!(sub(3, 5), Err(LaunchpadError::ArithmeticUnderflow));
    }

    #[test]
    fn mul_div_uses_wide_intermediate() {
        // u64::MAX × u64::MAX fits in u128; dividing by u64::MAX gives u64::MAX.
        assert_eq!(mul_div_floor(u64::MAX, u64::MAX, u64::MAX), Ok(u64::MAX));
        assert_eq!(
            mul_div_floor(u64::MAX, 2, 1),
            Err(LaunchpadError::ArithmeticOverflow)
        );
        assert_eq!(mul_div_floor(1, 1, 0), Err(LaunchpadError::DivisionByZero));
    }

    #[test]
    fn mul_div_floors() {
        assert_eq!(mul_div_floor(7, 1, 2), Ok(3));
        assert_eq!(mul_div_floor(0, 5, 3), Ok(0));
    }

    #[test]
    fn private_swap_reference_scenario() {
        // 10_000 payment at target 100_000 for 2_000_000 offered.
        assert_eq!(private_swap_out(10_000, 2_000_000, 100_000), Ok(200_000));
    }

    #[test]
    fn pro_rata_reference_scenario() {
        let total = 10_000_349 + 23_000_672;
        let a = pro_rata_out(0, 10_000_349, 10_000_000, total).unwrap();
        let b = pro_rata_out(0, 23_000_672, 10_000_000, total).unwrap();
        assert_eq!(a, 3_030_315);
        assert_eq!(b, 6_969_684);
        assert_eq!(a + b, 10_000_000 - 1);
    }

    #[test]
    fn partial_redemptions_sum_to_full() {
        let total = 33_001_021;
        let full = pro_rata_out(0, 10_000_349, 10_000_000, total).unwrap();
        let mut paid = 0;
        let mut redeemed = 0;
        for chunk in [1, 333, 4_000_000, 15, 6_000_000] {
            paid += pro_rata_out(redeemed, chunk, 10_000_000, total).unwrap();
            redeemed += chunk;
        }
        assert_eq!(redeemed, 10_000_349);
        assert_eq!(paid, full);
    }

    #[test]
    fn sole_depositor_gets_everything() {
        assert_eq!(pro_rata_out(0, 777, 10_000_000, 777), Ok(10_000_000));
    }

    #[test]
    fn rounding_loss_below_redeemer_count() {
        let deposits: Vec<u64> = (1..=50).map(|i| i * 7_919 + 13).collect();
        let total: u64 = deposits.iter().sum();
        let paid: u64 = deposits
            .iter()
            .map(|d| pro_rata_out(0, *d, 1_000_003, total).unwrap())
            .sum();
        assert!(paid <= 1_000_003);
        assert!(1_000_003 - paid < deposits.len() as u64);
    }
}
