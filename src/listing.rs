use crate::domain::hints::{extract_hints, strip_markup, HintSource, PartialVehicleHints};
use std::time::Duration;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Fetches a dealer listing page over HTTP and scans its text for hints
pub struct HttpHintSource {
    agent: ureq::Agent,
    known_makes: Vec<String>,
}

impl HttpHintSource {
    pub fn new(timeout: Duration, known_makes: Vec<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build();
        HttpHintSource { agent, known_makes }
    }
}

impl HintSource for HttpHintSource {
    fn fetch_hints(&self, url: &str) -> anyhow::Result<PartialVehicleHints> {
        let body = self.agent.get(url).call()?.into_string()?;
        log::info!("Fetched {} bytes from {}", body.len(), url);
        Ok(extract_hints(&strip_markup(&body), &self.known_makes))
    }
}
