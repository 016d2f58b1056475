use remindu_utils::create_random_secret;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Base url of the external WhatsApp delivery gateway
    pub gateway_url: String,
    /// Key sent along with every gateway call so that the gateway
    /// can verify that the request comes from this server
    pub gateway_key: String,
    /// Seconds between two runs of the send reminders job
    pub reminders_job_interval_secs: u64,
}

impl Config {
    pub fn new() -> Self {
        let default_port = "5000";
        let port = std::env::var("PORT").unwrap_or_else(|_| default_port.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                default_port.parse::<usize>().unwrap()
            }
        };

        let gateway_url = std::env::var("GATEWAY_URL").unwrap_or_else(|_| {
            let url = "http://localhost:8080".to_string();
            info!(
                "Did not find GATEWAY_URL environment variable. Falling back to: {}",
                url
            );
            url
        });

        let gateway_key = match std::env::var("GATEWAY_KEY") {
            Ok(key) => key,
            Err(_) => {
                info!("Did not find GATEWAY_KEY environment variable. Going to create one.");
                let key = create_random_secret(16);
                info!("Gateway key was generated and set to: {}", key);
                key
            }
        };

        let default_interval = "60";
        let interval = std::env::var("REMINDERS_JOB_INTERVAL_SECS")
            .unwrap_or_else(|_| default_interval.into());
        let reminders_job_interval_secs = match interval.parse::<u64>() {
            Ok(secs) if secs > 0 => secs,
            _ => {
                warn!(
                    "The given REMINDERS_JOB_INTERVAL_SECS: {} is not valid, falling back to the default interval: {}.",
                    interval, default_interval
                );
                default_interval.parse::<u64>().unwrap()
            }
        };

        Self {
            port,
            gateway_url,
            gateway_key,
            reminders_job_interval_secs,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
