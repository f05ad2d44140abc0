/*
[INPUT]:  Upstream API route table and serde requirements
[OUTPUT]: Typed endpoint and status enums
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When upstream routes change or new report types are added
*/

use serde::{Deserialize, Serialize};

/// Upstream routes used by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Login,
    EnergyDay,
    EnergyTotal,
    OutputPowerOneDay,
    EcerIncome,
    EnergyYearPerMonth,
    EnergyMonthPerDay,
    EnergyDetail,
}

impl Endpoint {
    /// Path relative to the API base; also the signed material
    pub const fn path(self) -> &'static str {
        match self {
            Endpoint::Login => "/ppr/web/login/login",
            Endpoint::EnergyDay => "/dcs/api/auth/web/solar/plants/energyDay",
            Endpoint::EnergyTotal => "/dcs/api/auth/web/solar/plants/energyTotal",
            Endpoint::OutputPowerOneDay => "/dcs/api/auth/web/solar/plants/outputPowerOneDay",
            Endpoint::EcerIncome => "/dgm/api/dgm/itemseybond/ECERIncome",
            Endpoint::EnergyYearPerMonth => "/dcs/api/auth/web/solar/device/energyYearPerMonth",
            Endpoint::EnergyMonthPerDay => "/dcs/api/auth/web/solar/device/energyMonthPerDay",
            Endpoint::EnergyDetail => "/dcs/api/auth/web/solar/device/energyDetail",
        }
    }

    /// Whether the route needs a signed session
    pub const fn requires_signature(self) -> bool {
        !matches!(self, Endpoint::Login)
    }
}

/// Settlement state of a mint or burn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Pending,
    Confirmed,
    Failed,
}

/// Direction of a token movement in the history views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenMovement {
    Mint,
    Burn,
}
