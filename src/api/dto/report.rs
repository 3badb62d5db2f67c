//! DTOs for click report endpoints.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::application::services::RequestedLink;
use crate::application::services::report_service::{DEFAULT_REPORT_DAYS, DEFAULT_REPORT_LIMIT};

/// Query parameters for `GET /api/report/most-requested`.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct MostRequestedParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub days: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub limit: Option<u32>,
}

impl MostRequestedParams {
    pub fn days(&self) -> u32 {
        self.days.unwrap_or(DEFAULT_REPORT_DAYS)
    }

    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_REPORT_LIMIT)
    }
}

/// One row of a click report.
#[derive(Debug, Serialize)]
pub struct LinkClicksItem {
    pub id: i64,
    pub token: String,
    pub aka_name: Option<String>,
    pub origin_url: String,
    pub clicks: i64,
}

impl From<RequestedLink> for LinkClicksItem {
    fn from(entry: RequestedLink) -> Self {
        Self {
            id: entry.link.id,
            token: entry.link.token,
            aka_name: entry.link.aka_name,
            origin_url: entry.link.origin_url,
            clicks: entry.clicks,
        }
    }
}

/// Top links for a trailing window.
#[derive(Debug, Serialize)]
pub struct MostRequestedResponse {
    pub days: u32,
    pub limit: u32,
    pub items: Vec<LinkClicksItem>,
}
