/*
[INPUT]:  Login settings, estimation settings, report date
[OUTPUT]: Daily generation with its carbon estimate and planned mint amount
[POS]:    Reporting layer - backs the `report` command
[UPDATE]: When the report fields or estimation inputs change
*/

use chrono::NaiveDate;
use green_ranger_adapter::{
    AuthManager, CarbonEstimate, ClientConfig, Deployment, EnergyService, RangerClient, Session,
    TokenPolicy, types::LoginRequest,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{EstimationSettings, LoginSettings};
use crate::error::Result;

/// One day of generation and what it is worth
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub generation_kwh: Decimal,
    pub carbon: CarbonEstimate,
    pub co2_tonnes: Decimal,
    pub token_decimals: u32,
    /// `None` when nothing was generated
    pub mint_base_units: Option<u64>,
}

/// Energy service for the configured account, direct or through a proxy
pub fn energy_service(login: &LoginSettings) -> Result<EnergyService> {
    let deployment = match &login.proxy_origin {
        Some(origin) => Deployment::Proxied {
            origin: origin.clone(),
        },
        None => Deployment::Direct,
    };
    let client = RangerClient::with_config(ClientConfig {
        deployment,
        project: login.project.clone(),
        ..ClientConfig::default()
    })?;

    let request = LoginRequest {
        project: login.project.clone(),
        ..LoginRequest::new(login.account.clone(), login.password.clone())
    };
    Ok(EnergyService::new(AuthManager::new(client, request)))
}

/// Fetch the day's generation and derive the estimate
pub async fn build_report(
    service: &EnergyService,
    session: &mut Session,
    estimation: &EstimationSettings,
    date: NaiveDate,
) -> Result<DailyReport> {
    let energy = service.energy_day(session, date).await?;
    let kwh = energy.energy_day;

    let carbon = CarbonEstimate::from_kwh(kwh, estimation.grid_emission_factor)?;
    let policy = TokenPolicy::new(estimation.token_decimals)?;
    let mint_base_units = if kwh > Decimal::ZERO {
        Some(policy.base_units(kwh)?)
    } else {
        warn!(%date, %kwh, "no generation; nothing to mint");
        None
    };

    info!(%date, %kwh, co2_kg = %carbon.co2_kg, "report built");
    Ok(DailyReport {
        date,
        generation_kwh: kwh,
        co2_tonnes: carbon.co2_tonnes(),
        carbon,
        token_decimals: policy.decimals(),
        mint_base_units,
    })
}
