use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::{SplitError, SplitResult};

const REPORT_PAGE_URL: &str = "https://www.warcraftlogs.com/reports";
const FIGHTS_API_URL: &str = "https://www.warcraftlogs.com/v1/report/fights";

/// Delivers the two raw documents a report is built from.
pub trait ReportSource {
    /// The report's HTML page, which embeds `var start_time = ...;` and `var end_time = ...;`.
    fn report_page(&self, report_id: &str) -> SplitResult<String>;

    /// The JSON fight list for the report.
    fn fights_payload(&self, report_id: &str) -> SplitResult<String>;
}

pub struct WarcraftLogsClient {
    client: Client,
    api_key: String,
}

impl WarcraftLogsClient {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> SplitResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("fightclip/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|error| SplitError::Fetch(error.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
        })
    }

    fn get_text(&self, url: &str, query: &[(&str, &str)]) -> SplitResult<String> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .map_err(|error| SplitError::Fetch(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SplitError::Fetch(format!("HTTP {status} from {url}")));
        }

        response
            .text()
            .map_err(|error| SplitError::Fetch(error.to_string()))
    }
}

impl ReportSource for WarcraftLogsClient {
    fn report_page(&self, report_id: &str) -> SplitResult<String> {
        tracing::debug!(report = %report_id, "Fetching report page");
        self.get_text(&format!("{REPORT_PAGE_URL}/{report_id}"), &[])
    }

    fn fights_payload(&self, report_id: &str) -> SplitResult<String> {
        tracing::debug!(report = %report_id, "Fetching report fight list");
        self.get_text(
            &format!("{FIGHTS_API_URL}/{report_id}"),
            &[("api_key", self.api_key.as_str())],
        )
    }
}
