/*
[INPUT]:  Upstream JSON envelopes and report payloads
[OUTPUT]: Typed Rust response structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::http::{RangerError, Result};

/// Code the upstream uses when a session is no longer accepted
pub const AUTH_EXPIRED_CODE: i32 = 401;

/// Common `{ success, code, errorMessage, data }` envelope
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    pub code: Option<serde_json::Value>,
    #[serde(rename = "errorMessage")]
    pub error_message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Numeric form of `code`; the upstream sends either a number or a numeric string
    pub fn code_value(&self) -> Option<i32> {
        match self.code.as_ref()? {
            serde_json::Value::Number(n) => n.as_i64().map(|v| v as i32),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Unwrap the payload or convert the envelope into an error
    pub fn into_result(self) -> Result<T> {
        let code = self.code_value();
        if !self.success {
            if code == Some(AUTH_EXPIRED_CODE) {
                return Err(RangerError::TokenExpired);
            }
            return Err(RangerError::Api {
                code: code.unwrap_or_default(),
                message: self
                    .error_message
                    .unwrap_or_else(|| "unknown error".to_string()),
            });
        }
        self.data
            .ok_or_else(|| RangerError::InvalidResponse("success response without data".into()))
    }
}

/// `data` of a successful login; the `auth` value arrives as a response header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginData {
    pub token: String,
    pub secret: String,
    #[serde(rename = "userId", deserialize_with = "string_or_number")]
    pub user_id: String,
}

/// Plant generation for one day, in kWh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyDay {
    #[serde(rename = "energyDay")]
    pub energy_day: Decimal,
}

/// One sample of a report series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuePoint {
    pub ts: String,
    pub val: Option<Decimal>,
}

/// A typed series inside a device report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyItem {
    #[serde(rename = "typeCode")]
    pub type_code: i32,
    #[serde(default)]
    pub vals: Vec<ValuePoint>,
}

impl EnergyItem {
    /// Generation series carry `typeCode == 0`
    pub const GENERATION: i32 = 0;

    /// Sum of all present samples
    pub fn total(&self) -> Decimal {
        self.vals.iter().filter_map(|point| point.val).sum()
    }
}

/// Payload of the per-device month/year reports
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EnergySeries {
    #[serde(default)]
    pub items: Vec<EnergyItem>,
}

impl EnergySeries {
    pub fn generation(&self) -> Option<&EnergyItem> {
        self.items
            .iter()
            .find(|item| item.type_code == EnergyItem::GENERATION)
    }

    pub fn into_generation(self) -> Option<EnergyItem> {
        self.items
            .into_iter()
            .find(|item| item.type_code == EnergyItem::GENERATION)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}
