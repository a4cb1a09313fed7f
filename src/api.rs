use crate::model::UsersPage;
use anyhow::{anyhow, Context, Result};
use std::time::Duration;

/// Trait for user listing backends to allow mocking and abstraction
pub trait UserSource {
    fn fetch_page(&self, limit: usize, skip: usize) -> Result<UsersPage>;
}

pub struct Client {
    base_url: String,
    agent: ureq::Agent,
    timeout: Duration,
}

impl Client {
    pub fn new(base_url: &str, timeout_ms: u64) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: ureq::Agent::new(),
            timeout: Duration::from_millis(timeout_ms),
        }
    }

    pub fn users_url(&self) -> String {
        format!("{}/users", self.base_url)
    }
}

impl UserSource for Client {
    fn fetch_page(&self, limit: usize, skip: usize) -> Result<UsersPage> {
        let url = self.users_url();

        let resp = self
            .agent
            .get(&url)
            .timeout(self.timeout)
            .query("limit", &limit.to_string())
            .query("skip", &skip.to_string())
            .set("Accept", "application/json")
            .call();

        match resp {
            Ok(r) => {
                let page: UsersPage = r
                    .into_json()
                    .with_context(|| format!("Invalid users response from {}", url))?;
                Ok(page)
            }
            Err(ureq::Error::Status(code, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                Err(anyhow!("API error {}: {}", code, body))
            }
            Err(e) => Err(anyhow!("Request failed: {}", e)),
        }
    }
}
