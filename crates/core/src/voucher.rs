//! Voucher codes.
//!
//! A voucher code is both the win record's id and the player's redemption
//! proof. Format: `ET-<value>-<SUFFIX>` where the suffix is five characters
//! from `[0-9A-Z]`. Uniqueness is probabilistic only (36^5 suffixes per
//! value); nothing checks for collisions.

use rand::Rng;

/// Fixed prefix of every voucher code.
pub const VOUCHER_PREFIX: &str = "ET";

/// Number of random characters at the end of a code.
pub const SUFFIX_LENGTH: usize = 5;

const SUFFIX_CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Generate a voucher code for a prize of the given face value.
pub fn generate_voucher_code(value: u32) -> String {
    generate_voucher_code_with(value, &mut rand::rng())
}

/// Generate a voucher code drawing the suffix from `rng`.
pub fn generate_voucher_code_with<R: Rng + ?Sized>(value: u32, rng: &mut R) -> String {
    let suffix: String = (0..SUFFIX_LENGTH)
        .map(|_| char::from(SUFFIX_CHARSET[rng.random_range(0..SUFFIX_CHARSET.len())]))
        .collect();
    format!("{VOUCHER_PREFIX}-{value}-{suffix}")
}
