/*
[INPUT]:  Generation figures and wallet-side token operations
[OUTPUT]: Domain models for history views and token instructions
[POS]:    Data layer - type definitions shared by estimation and wallet layers
[UPDATE]: When history views or token operations change
*/

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{RecordStatus, TokenMovement};

/// Daily generation point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationData {
    pub date: NaiveDate,
    /// kWh
    pub amount: Decimal,
}

/// Mint/burn history row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenHistory {
    pub date: NaiveDate,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub movement: TokenMovement,
    pub status: RecordStatus,
}

/// Burn history row with the carbon reduction it represents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurnHistory {
    pub date: NaiveDate,
    pub amount: Decimal,
    /// kg CO2
    #[serde(rename = "carbonReduction")]
    pub carbon_reduction: Decimal,
    pub status: RecordStatus,
}

/// Token operation handed to a wallet for signing and submission.
///
/// Amounts are in base units (see [`crate::carbon::TokenPolicy`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TokenInstruction {
    Mint {
        mint: String,
        destination: String,
        amount: u64,
    },
    Burn {
        mint: String,
        owner: String,
        amount: u64,
    },
}

impl TokenInstruction {
    pub fn movement(&self) -> TokenMovement {
        match self {
            TokenInstruction::Mint { .. } => TokenMovement::Mint,
            TokenInstruction::Burn { .. } => TokenMovement::Burn,
        }
    }

    pub fn amount(&self) -> u64 {
        match self {
            TokenInstruction::Mint { amount, .. } | TokenInstruction::Burn { amount, .. } => {
                *amount
            }
        }
    }
}
