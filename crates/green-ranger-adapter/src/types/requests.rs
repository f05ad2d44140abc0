/*
[INPUT]:  Login settings and report query parameters
[OUTPUT]: Serializable request bodies and query pairs
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PROJECT: &str = "IOT";

/// Body of `POST /ppr/web/login/login`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub account: String,
    pub password: String,
    #[serde(default = "default_project")]
    pub project: String,
}

impl LoginRequest {
    pub fn new(account: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            password: password.into(),
            project: default_project(),
        }
    }
}

fn default_project() -> String {
    DEFAULT_PROJECT.to_string()
}

/// Device selector shared by the per-device energy reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceQuery {
    pub date: NaiveDate,
    pub devaddr: u32,
    pub devcode: u32,
    pub pn: String,
    pub sn: String,
    #[serde(rename = "type")]
    pub kind: u32,
}

impl DeviceQuery {
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("date", format_date(self.date)),
            ("devaddr", self.devaddr.to_string()),
            ("devcode", self.devcode.to_string()),
            ("pn", self.pn.clone()),
            ("sn", self.sn.clone()),
            ("type", self.kind.to_string()),
        ]
    }
}

/// Upstream dates are plain `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_defaults_project() {
        let req: LoginRequest =
            serde_json::from_str(r#"{"account":"13200000000","password":"hash"}"#).unwrap();
        assert_eq!(req.project, "IOT");
        assert_eq!(LoginRequest::new("a", "b").project, "IOT");
    }

    #[test]
    fn test_device_query_pairs() {
        let query = DeviceQuery {
            date: NaiveDate::from_ymd_opt(2025, 2, 12).unwrap(),
            devaddr: 1,
            devcode: 3502,
            pn: "W0040158451235".to_string(),
            sn: "96342210200071".to_string(),
            kind: 4,
        };

        let pairs = query.to_query();
        assert_eq!(pairs[0], ("date", "2025-02-12".to_string()));
        assert_eq!(pairs[5], ("type", "4".to_string()));
    }
}
