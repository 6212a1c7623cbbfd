//! Lamports ⇄ sale-token conversion.
//!
//! The on-chain program stores the exchange rate as a single integer: the
//! number of sale-token base units minted per lamport. All arithmetic here
//! is integer; an intermediate floating-point representation would round
//! differently than the program's integer multiply and create irreconcilable
//! balances. Overflow is an error, never a wrap or a clamp.

use crate::error::SaleError;

/// Exchange rate: sale-token base units per lamport. Always nonzero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rate(u64);

impl Rate {
    /// A zero rate would make every purchase free and every division
    /// undefined, so it is rejected up front.
    pub fn new(tokens_per_lamport: u64) -> Result<Self, SaleError> {
        if tokens_per_lamport == 0 {
            return Err(SaleError::InvalidArgument("rate must be > 0".into()));
        }
        Ok(Rate(tokens_per_lamport))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Sale-token base units bought by `lamports` at `rate`.
pub fn tokens_for_lamports(lamports: u64, rate: Rate) -> Result<u64, SaleError> {
    lamports
        .checked_mul(rate.0)
        .ok_or_else(|| SaleError::AmountOverflow(format!("{lamports} * {}", rate.0)))
}

/// Lamports required for `tokens` sale-token base units at `rate`.
///
/// Truncating integer division: the result never exceeds what the tokens
/// cost, it only loses the sub-lamport remainder.
pub fn lamports_for_tokens(tokens: u64, rate: Rate) -> u64 {
    tokens / rate.0
}

/// Scale a whole-token count into base units for a mint with `decimals`
/// digits of sub-unit precision. The program works in base units only, so
/// callers must pre-scale before building instructions.
pub fn scale_to_base_units(whole_tokens: u64, decimals: u8) -> Result<u64, SaleError> {
    let factor = 10u64
        .checked_pow(u32::from(decimals))
        .ok_or_else(|| SaleError::AmountOverflow(format!("10^{decimals}")))?;
    whole_tokens
        .checked_mul(factor)
        .ok_or_else(|| SaleError::AmountOverflow(format!("{whole_tokens} * 10^{decimals}")))
}
