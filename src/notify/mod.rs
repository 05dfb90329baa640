//! Outbound credential notification: the wire contract of the mailer
//! service and client implementations of it.

use std::thread;

use serde::{Deserialize, Serialize};

/// Request body of `POST /api/send-account-id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsMail {
    pub email: String,
    pub account_id: String,
    pub password: String,
}

/// Response body of the mailer, success or not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendOutcome {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SendOutcome {
    pub fn sent(message: impl Into<String>) -> SendOutcome {
        SendOutcome {
            success: true,
            message: message.into(),
            error: None,
        }
    }
}

/// Best-effort delivery of credentials for a freshly created account.
/// Implementations must not block the caller and must swallow failures;
/// account creation never waits for, or fails with, the mail.
pub trait Notify: Send + Sync {
    fn account_created(&self, mail: &CredentialsMail);
}

/// Discards every notification.
pub struct NullNotifier;

impl Notify for NullNotifier {
    fn account_created(&self, _mail: &CredentialsMail) {}
}

/// Posts the credential mail to an HTTP mailer endpoint from a background
/// thread. Any transport error or non-success outcome is logged and
/// dropped. Pending deliveries are joined on drop so a short-lived
/// process does not tear the thread down mid-request; the spawn itself
/// returns immediately, so creation is never gated on the mailer.
pub struct HttpNotifier {
    endpoint: String,
    pending: std::sync::Mutex<Vec<thread::JoinHandle<()>>>,
}

const MAILER_TIMEOUT_SECS: u64 = 10;

impl HttpNotifier {
    pub fn new(endpoint: impl Into<String>) -> HttpNotifier {
        HttpNotifier {
            endpoint: endpoint.into(),
            pending: std::sync::Mutex::new(Vec::new()),
        }
    }
}

impl Notify for HttpNotifier {
    fn account_created(&self, mail: &CredentialsMail) {
        let endpoint = self.endpoint.clone();
        let mail = mail.clone();
        let handle = thread::spawn(move || match deliver(&endpoint, &mail) {
            Ok(outcome) if outcome.success => {
                log::info!("credential mail for {} accepted: {}", mail.account_id, outcome.message);
            }
            Ok(outcome) => {
                log::warn!(
                    "mailer refused credential mail for {}: {}",
                    mail.account_id,
                    outcome.error.unwrap_or(outcome.message)
                );
            }
            Err(err) => {
                log::warn!("could not reach mailer for {}: {}", mail.account_id, err);
            }
        });
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(handle);
    }
}

impl Drop for HttpNotifier {
    fn drop(&mut self) {
        let pending = self.pending.get_mut().unwrap_or_else(|e| e.into_inner());
        for handle in pending.drain(..) {
            let _ = handle.join();
        }
    }
}

fn deliver(endpoint: &str, mail: &CredentialsMail) -> reqwest::Result<SendOutcome> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(MAILER_TIMEOUT_SECS))
        .build()?;
    client.post(endpoint).json(mail).send()?.json::<SendOutcome>()
}
