/*
[INPUT]:  Generation volumes (kWh), grid emission factor, token decimals
[OUTPUT]: Carbon-reduction estimates and token instructions in base units
[POS]:    Estimation layer - converts generation into CO2 and token amounts
[UPDATE]: When the emission factor source or token economics change
*/

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::http::{RangerError, Result};
use crate::types::{BurnHistory, GenerationData, RecordStatus, TokenInstruction};

/// kg CO2 avoided per kWh of solar generation (regional grid average)
pub const DEFAULT_GRID_EMISSION_FACTOR: Decimal = Decimal::from_parts(5703, 0, 0, false, 4);
/// Decimals of the generation token; one whole token per kWh
pub const DEFAULT_TOKEN_DECIMALS: u32 = 9;
const MAX_TOKEN_DECIMALS: u32 = 18;

/// CO2 avoided by a generated volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarbonEstimate {
    pub kwh: Decimal,
    /// kg CO2 per kWh
    pub factor: Decimal,
    pub co2_kg: Decimal,
}

impl CarbonEstimate {
    pub fn from_kwh(kwh: Decimal, factor: Decimal) -> Result<Self> {
        if kwh.is_sign_negative() {
            return Err(RangerError::InvalidEnergy(format!(
                "generation cannot be negative ({kwh} kWh)"
            )));
        }
        if factor.is_sign_negative() {
            return Err(RangerError::Config(format!(
                "emission factor cannot be negative ({factor})"
            )));
        }
        let co2_kg = kwh.checked_mul(factor).ok_or_else(|| {
            RangerError::InvalidEnergy(format!("{kwh} kWh at {factor} kg/kWh is out of range"))
        })?;
        Ok(Self {
            kwh,
            factor,
            co2_kg,
        })
    }

    pub fn co2_tonnes(&self) -> Decimal {
        self.co2_kg / Decimal::ONE_THOUSAND
    }
}

/// Total generation over a set of data points
pub fn total_generation(points: &[GenerationData]) -> Decimal {
    points.iter().map(|point| point.amount).sum()
}

/// Converts between kWh, whole tokens and on-chain base units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPolicy {
    decimals: u32,
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            decimals: DEFAULT_TOKEN_DECIMALS,
        }
    }
}

impl TokenPolicy {
    pub fn new(decimals: u32) -> Result<Self> {
        if decimals > MAX_TOKEN_DECIMALS {
            return Err(RangerError::Config(format!(
                "token decimals must be at most {MAX_TOKEN_DECIMALS}, got {decimals}"
            )));
        }
        Ok(Self { decimals })
    }

    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    fn scale(&self) -> Decimal {
        Decimal::from(10u64.pow(self.decimals))
    }

    /// Base units for a whole-token amount, truncated toward zero.
    /// Only positive amounts can be minted or burned.
    pub fn base_units(&self, tokens: Decimal) -> Result<u64> {
        if tokens <= Decimal::ZERO {
            return Err(RangerError::InvalidEnergy(format!(
                "amount must be positive, got {tokens}"
            )));
        }
        tokens
            .checked_mul(self.scale())
            .and_then(|scaled| scaled.trunc().to_u64())
            .ok_or_else(|| RangerError::InvalidEnergy(format!("amount {tokens} is out of range")))
    }

    /// Whole tokens for a base-unit amount
    pub fn tokens(&self, base_units: u64) -> Decimal {
        Decimal::from(base_units) / self.scale()
    }

    /// Mint one token per generated kWh to `destination`
    pub fn mint_for_generation(
        &self,
        mint: &str,
        destination: &str,
        kwh: Decimal,
    ) -> Result<TokenInstruction> {
        Ok(TokenInstruction::Mint {
            mint: mint.to_string(),
            destination: destination.to_string(),
            amount: self.base_units(kwh)?,
        })
    }

    /// Burn `tokens` whole tokens held by `owner`
    pub fn burn(&self, mint: &str, owner: &str, tokens: Decimal) -> Result<TokenInstruction> {
        Ok(TokenInstruction::Burn {
            mint: mint.to_string(),
            owner: owner.to_string(),
            amount: self.base_units(tokens)?,
        })
    }

    /// History row for a burn; each burned token retires one kWh of reduction
    pub fn burn_record(
        &self,
        date: NaiveDate,
        tokens: Decimal,
        factor: Decimal,
        status: RecordStatus,
    ) -> Result<BurnHistory> {
        let estimate = CarbonEstimate::from_kwh(tokens, factor)?;
        Ok(BurnHistory {
            date,
            amount: tokens,
            carbon_reduction: estimate.co2_kg,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn dec(value: &str) -> Decimal {
        value.parse().expect("decimal literal")
    }

    #[test]
    fn test_default_factor() {
        assert_eq!(DEFAULT_GRID_EMISSION_FACTOR, dec("0.5703"));
    }

    #[rstest]
    #[case("0", "0")]
    #[case("10", "5.703")]
    #[case("6.89", "3.929367")]
    fn test_carbon_estimate(#[case] kwh: &str, #[case] expected: &str) {
        let estimate = CarbonEstimate::from_kwh(dec(kwh), DEFAULT_GRID_EMISSION_FACTOR).unwrap();
        assert_eq!(estimate.co2_kg, dec(expected));
    }

    #[test]
    fn test_negative_generation_rejected() {
        let result = CarbonEstimate::from_kwh(dec("-1"), DEFAULT_GRID_EMISSION_FACTOR);
        assert!(matches!(result, Err(RangerError::InvalidEnergy(_))));
    }

    #[test]
    fn test_overflowing_estimate_rejected() {
        let result = CarbonEstimate::from_kwh(Decimal::MAX, dec("2"));
        assert!(matches!(result, Err(RangerError::InvalidEnergy(_))));
    }

    #[test]
    fn test_tonnes() {
        let estimate = CarbonEstimate::from_kwh(dec("2000"), dec("0.5")).unwrap();
        assert_eq!(estimate.co2_tonnes(), dec("1"));
    }

    #[rstest]
    #[case("7.73", 7_730_000_000)]
    #[case("0.0000000019", 1)]
    #[case("1", 1_000_000_000)]
    fn test_base_units_truncate(#[case] tokens: &str, #[case] expected: u64) {
        let policy = TokenPolicy::default();
        assert_eq!(policy.base_units(dec(tokens)).unwrap(), expected);
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let policy = TokenPolicy::default();
        assert!(policy.base_units(Decimal::ZERO).is_err());
        assert!(policy.mint_for_generation("m", "d", dec("-3")).is_err());
    }

    #[test]
    fn test_tokens_from_base_units() {
        let policy = TokenPolicy::new(2).unwrap();
        assert_eq!(policy.tokens(1234), dec("12.34"));
        assert!(TokenPolicy::new(19).is_err());
    }

    #[test]
    fn test_mint_and_burn_instructions() {
        let policy = TokenPolicy::default();
        let mint = policy.mint_for_generation("mint111", "dest111", dec("6.95")).unwrap();
        assert_eq!(mint.amount(), 6_950_000_000);

        let burn = policy.burn("mint111", "dest111", dec("50")).unwrap();
        assert!(matches!(burn, TokenInstruction::Burn { amount: 50_000_000_000, .. }));
    }

    #[test]
    fn test_burn_record_carbon_reduction() {
        let policy = TokenPolicy::default();
        let record = policy
            .burn_record(
                NaiveDate::from_ymd_opt(2025, 2, 4).unwrap(),
                dec("50"),
                DEFAULT_GRID_EMISSION_FACTOR,
                RecordStatus::Confirmed,
            )
            .unwrap();
        assert_eq!(record.carbon_reduction, dec("28.515"));
    }

    #[test]
    fn test_total_generation() {
        let day = |d: u32, kwh: &str| GenerationData {
            date: NaiveDate::from_ymd_opt(2025, 2, d).unwrap(),
            amount: dec(kwh),
        };
        let points = vec![day(1, "6.89"), day(2, "7.12"), day(3, "6.95")];
        assert_eq!(total_generation(&points), dec("20.96"));
    }
}
