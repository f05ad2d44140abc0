//! Log in, read today's generation and estimate the carbon it avoided.
//!
//! RANGER_ACCOUNT=... RANGER_PASSWORD=... cargo run --example energy_report

use green_ranger_adapter::carbon::DEFAULT_GRID_EMISSION_FACTOR;
use green_ranger_adapter::{
    AuthManager, CarbonEstimate, EnergyService, LoginRequest, RangerClient, Session, TokenPolicy,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let account = std::env::var("RANGER_ACCOUNT")?;
    let password = std::env::var("RANGER_PASSWORD")?;

    let client = RangerClient::new()?;
    let auth = AuthManager::new(client, LoginRequest::new(account, password));
    let service = EnergyService::new(auth);
    let mut session = Session::new();

    let today = chrono::Utc::now().date_naive();
    let day = service.energy_day(&mut session, today).await?;
    let estimate = CarbonEstimate::from_kwh(day.energy_day, DEFAULT_GRID_EMISSION_FACTOR)?;

    println!("Generation on {today}: {} kWh", day.energy_day);
    println!("Avoided emissions: {} kg CO2", estimate.co2_kg);
    if let Ok(units) = TokenPolicy::default().base_units(day.energy_day) {
        println!("Mintable: {units} base units");
    }
    Ok(())
}
