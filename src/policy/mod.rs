//! Banking policies.
//!
//! Policies generate input for the batch simulator: before each roll the
//! simulator asks every active player's policy whether to bank. The rules
//! engine never consults a policy.
//!
//! - `NeverBank`: rides every round (`greedy`)
//! - `ThresholdBank`: banks at a round score (`threshold:N`)
//! - `RollLimitBank`: banks after N rolls (`roll_limit:N`)

pub mod banking;

pub use banking::{
    parse_policy, BankingPolicy, NeverBank, ParsePolicyError, PolicySpec, RollLimitBank,
    ThresholdBank, NEVER_BANK_THRESHOLD,
};
