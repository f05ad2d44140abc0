/*
[INPUT]:  Report arguments and login configuration
[OUTPUT]: JSON daily report on stdout
[POS]:    CLI layer - `report` subcommand
[UPDATE]: When the report output changes
*/

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use green_ranger_adapter::Session;

use green_ranger_proxy::RangerConfig;
use green_ranger_proxy::report::{build_report, energy_service};

use super::ConfigArgs;

#[derive(clap::Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
    /// Day to report (YYYY-MM-DD), defaults to today
    #[arg(long = "date", value_name = "DATE")]
    pub date: Option<NaiveDate>,
}

pub async fn run(args: ReportArgs) -> Result<()> {
    let config = RangerConfig::load(args.config.config_path.as_deref()).context("load config")?;
    let login = config
        .login
        .as_ref()
        .context("report needs `login.account` and `login.password` in the configuration")?;

    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let service = energy_service(login).context("build energy client")?;
    let mut session = Session::new();

    let report = build_report(&service, &mut session, &config.estimation, date)
        .await
        .context("build report")?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
