/*
[INPUT]:  Report parameters and a caller-owned session
[OUTPUT]: Typed generation reports from the energy API
[POS]:    HTTP layer - signed report endpoints (require session + path signature)
[UPDATE]: When adding new report endpoints or changing query parameters
*/

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::auth::{AuthManager, Session};
use crate::http::Result;
use crate::types::{
    DeviceQuery, Endpoint, EnergyDay, EnergyItem, EnergySeries, GenerationData, format_date,
};

/// Business id the dashboard reports income under
const ECER_ITEM_BUSINESS_ID: u32 = 1;

/// Report queries against the energy API.
///
/// Responses are never cached; each call hits the upstream.
#[derive(Debug, Clone)]
pub struct EnergyService {
    auth: AuthManager,
}

impl EnergyService {
    pub fn new(auth: AuthManager) -> Self {
        Self { auth }
    }

    pub fn auth(&self) -> &AuthManager {
        &self.auth
    }

    /// Plant generation for one day
    ///
    /// GET /dcs/api/auth/web/solar/plants/energyDay?date={date}
    pub async fn energy_day(&self, session: &mut Session, date: NaiveDate) -> Result<EnergyDay> {
        let query = [("date", format_date(date))];
        self.auth
            .signed_get(session, Endpoint::EnergyDay.path(), &query)
            .await
    }

    /// Day generation as a dashboard data point
    pub async fn generation_data(
        &self,
        session: &mut Session,
        date: NaiveDate,
    ) -> Result<GenerationData> {
        let day = self.energy_day(session, date).await?;
        Ok(GenerationData {
            date,
            amount: day.energy_day,
        })
    }

    /// Lifetime plant totals
    ///
    /// GET /dcs/api/auth/web/solar/plants/energyTotal
    pub async fn energy_total(&self, session: &mut Session) -> Result<Value> {
        self.auth
            .signed_get(session, Endpoint::EnergyTotal.path(), &[])
            .await
    }

    /// Power curve for the current day
    ///
    /// GET /dcs/api/auth/web/solar/plants/outputPowerOneDay
    pub async fn output_power_one_day(&self, session: &mut Session) -> Result<Value> {
        self.auth
            .signed_get(session, Endpoint::OutputPowerOneDay.path(), &[])
            .await
    }

    /// Emission-reduction income for a generated volume
    ///
    /// GET /dgm/api/dgm/itemseybond/ECERIncome?itemBusinessId=1&sumIIPlanGeneratedEnergy={kwh}
    pub async fn ecer_income(
        &self,
        session: &mut Session,
        generated_kwh: Decimal,
    ) -> Result<Value> {
        let query = [
            ("itemBusinessId", ECER_ITEM_BUSINESS_ID.to_string()),
            ("sumIIPlanGeneratedEnergy", generated_kwh.normalize().to_string()),
        ];
        self.auth
            .signed_get(session, Endpoint::EcerIncome.path(), &query)
            .await
    }

    /// Monthly generation series for a device year
    ///
    /// GET /dcs/api/auth/web/solar/device/energyYearPerMonth
    pub async fn energy_year_per_month(
        &self,
        session: &mut Session,
        device: &DeviceQuery,
    ) -> Result<Option<EnergyItem>> {
        self.generation_series(session, Endpoint::EnergyYearPerMonth, device)
            .await
    }

    /// Daily generation series for a device month
    ///
    /// GET /dcs/api/auth/web/solar/device/energyMonthPerDay
    pub async fn energy_month_per_day(
        &self,
        session: &mut Session,
        device: &DeviceQuery,
    ) -> Result<Option<EnergyItem>> {
        self.generation_series(session, Endpoint::EnergyMonthPerDay, device)
            .await
    }

    /// Raw device detail report
    ///
    /// GET /dcs/api/auth/web/solar/device/energyDetail
    pub async fn energy_detail(
        &self,
        session: &mut Session,
        device: &DeviceQuery,
    ) -> Result<Value> {
        self.auth
            .signed_get(session, Endpoint::EnergyDetail.path(), &device.to_query())
            .await
    }

    async fn generation_series(
        &self,
        session: &mut Session,
        endpoint: Endpoint,
        device: &DeviceQuery,
    ) -> Result<Option<EnergyItem>> {
        let series: EnergySeries = self
            .auth
            .signed_get(session, endpoint.path(), &device.to_query())
            .await?;
        Ok(series.into_generation())
    }
}
