use remindu_domain::ID;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Header used to let the gateway verify that a call comes from this server
pub const GATEWAY_KEY_HEADER: &str = "remindu-gateway-key";

/// One element of the batched send-reminder gateway call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderNotification {
    pub reminder_id: ID,
    pub whatsapp_number: String,
    pub title: String,
    pub description: String,
}

/// Per-reminder delivery outcome reported by the gateway. Entries are
/// matched to reminders by `reminder_id`, never by position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResult {
    pub success: bool,
    pub message: String,
    pub reminder_id: ID,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendRemindersRequest<'a> {
    reminder_input: &'a [ReminderNotification],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendLoginPollRequest<'a> {
    whatsapp_number: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendLoginPollResponse {
    success: bool,
}

#[async_trait::async_trait]
pub trait INotificationGateway: Send + Sync {
    /// Submits all due reminders of a tick as one batched call. The
    /// response contains one entry per submitted reminder.
    async fn send_reminders(
        &self,
        batch: &[ReminderNotification],
    ) -> anyhow::Result<Vec<NotificationResult>>;

    /// Asks the gateway to send a verification poll to the given
    /// WhatsApp number. Returns whether the gateway accepted it.
    async fn send_verification_poll(&self, whatsapp_number: &str) -> anyhow::Result<bool>;
}

/// HTTP client for the external WhatsApp delivery gateway
pub struct WhatsappGateway {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WhatsappGateway {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            api_key,
        }
    }
}

#[async_trait::async_trait]
impl INotificationGateway for WhatsappGateway {
    async fn send_reminders(
        &self,
        batch: &[ReminderNotification],
    ) -> anyhow::Result<Vec<NotificationResult>> {
        let res = self
            .client
            .post(format!("{}/send-reminder", self.base_url))
            .header(GATEWAY_KEY_HEADER, self.api_key.as_str())
            .json(&SendRemindersRequest {
                reminder_input: batch,
            })
            .send()
            .await?
            .error_for_status()?;

        let results = res.json::<Vec<NotificationResult>>().await?;
        Ok(results)
    }

    async fn send_verification_poll(&self, whatsapp_number: &str) -> anyhow::Result<bool> {
        let res = self
            .client
            .post(format!("{}/send-login-poll", self.base_url))
            .header(GATEWAY_KEY_HEADER, self.api_key.as_str())
            .json(&SendLoginPollRequest { whatsapp_number })
            .send()
            .await?
            .error_for_status()?;

        let res = res.json::<SendLoginPollResponse>().await?;
        Ok(res.success)
    }
}

/// Gateway stand-in used for testing. Records every call and reports
/// success for all reminders except those addressed to a number in
/// `rejected_numbers`. Setting `broken` makes every call fail like an
/// unreachable gateway would, and entries placed in `extra_results` are
/// appended to the next response like a confused gateway reporting on
/// reminders it was never sent.
pub struct InMemoryNotificationGateway {
    pub broken: AtomicBool,
    pub rejected_numbers: Mutex<Vec<String>>,
    pub extra_results: Mutex<Vec<NotificationResult>>,
    pub sent_batches: Mutex<Vec<Vec<ReminderNotification>>>,
    pub sent_polls: Mutex<Vec<String>>,
}

impl InMemoryNotificationGateway {
    pub fn new() -> Self {
        Self {
            broken: AtomicBool::new(false),
            rejected_numbers: Mutex::new(vec![]),
            extra_results: Mutex::new(vec![]),
            sent_batches: Mutex::new(vec![]),
            sent_polls: Mutex::new(vec![]),
        }
    }
}

impl Default for InMemoryNotificationGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl INotificationGateway for InMemoryNotificationGateway {
    async fn send_reminders(
        &self,
        batch: &[ReminderNotification],
    ) -> anyhow::Result<Vec<NotificationResult>> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("Gateway is unreachable"));
        }
        self.sent_batches.lock().unwrap().push(batch.to_vec());

        let rejected = self.rejected_numbers.lock().unwrap();
        let mut results: Vec<NotificationResult> = batch
            .iter()
            .map(|notification| {
                let success = !rejected.contains(&notification.whatsapp_number);
                NotificationResult {
                    success,
                    message: if success {
                        "Reminder sent".into()
                    } else {
                        "Unable to deliver reminder".into()
                    },
                    reminder_id: notification.reminder_id.clone(),
                }
            })
            .collect();
        results.extend(self.extra_results.lock().unwrap().drain(..));
        Ok(results)
    }

    async fn send_verification_poll(&self, whatsapp_number: &str) -> anyhow::Result<bool> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("Gateway is unreachable"));
        }
        self.sent_polls
            .lock()
            .unwrap()
            .push(whatsapp_number.to_string());
        Ok(true)
    }
}
