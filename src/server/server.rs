mod error;
mod server_config;

use std::fs;
use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use tower_http::services::ServeDir;

use unibank::notify::{CredentialsMail, SendOutcome};

use error::ServerError;
use server_config::MailerConfig;

const MAILER_CONFIG: &str = "resources/mailer.toml";

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

async fn send_account_id(
    State(config): State<Arc<MailerConfig>>,
    Json(mail): Json<CredentialsMail>,
) -> Result<Json<SendOutcome>, ServerError> {
    deliver_to_outbox(&config, &mail)?;
    log::info!(
        "delivered credential mail for account {} to {}",
        mail.account_id,
        mail.email
    );
    Ok(Json(SendOutcome::sent("Account credentials sent successfully")))
}

/// Render the credential mail and drop it into the outbox directory.
/// An SMTP relay is environment-specific; the outbox keeps the mailer
/// self-contained while honoring the same request/response contract.
fn deliver_to_outbox(config: &MailerConfig, mail: &CredentialsMail) -> anyhow::Result<()> {
    fs::create_dir_all(&config.outbox)?;
    let filename = format!(
        "{}-{}.html",
        Utc::now().format("%Y%m%dT%H%M%S%3f"),
        mail.account_id
    );
    let rendered = render_credentials_mail(&config.sender, mail);
    fs::write(config.outbox.join(filename), rendered)?;
    Ok(())
}

fn render_credentials_mail(sender: &str, mail: &CredentialsMail) -> String {
    format!(
        r#"<!-- From: {sender} -->
<!-- To: {email} -->
<!-- Subject: Your UNI Bank Account Credentials -->
<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;">
  <h2 style="color: #2563eb;">Welcome to UNI Bank!</h2>
  <p>Thank you for creating an account with us. Here are your account credentials:</p>

  <div style="background-color: #f3f4f6; padding: 20px; border-radius: 5px; margin: 20px 0;">
    <h3 style="color: #1e40af; margin: 0 0 10px 0;">Account ID</h3>
    <p style="font-size: 1.2em; margin: 0; color: #1e40af;">{account_id}</p>

    <h3 style="color: #1e40af; margin: 20px 0 10px 0;">Password</h3>
    <p style="font-size: 1.2em; margin: 0; color: #1e40af;">{password}</p>
  </div>

  <p>You'll need these credentials to sign in to your account. Please keep them safe!</p>
  <p style="color: #6b7280; font-size: 0.9em;">For security reasons, please do not share these credentials with anyone.</p>
  <p style="color: #6b7280; font-size: 0.9em;">We recommend changing your password after your first login.</p>
</div>
"#,
        sender = sender,
        email = mail.email,
        account_id = mail.account_id,
        password = mail.password,
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match MailerConfig::read(MAILER_CONFIG) {
        Ok(config) => config,
        Err(err) => {
            log::warn!("{:#}; falling back to defaults", err);
            MailerConfig::default()
        }
    };
    let config = Arc::new(config);

    let mut app = Router::new()
        .route("/api/health", get(health))
        .route("/api/send-account-id", post(send_account_id))
        .with_state(config.clone());
    if let Some(static_dir) = &config.static_dir {
        app = app.fallback_service(ServeDir::new(static_dir));
    }

    let listener = tokio::net::TcpListener::bind(config.listen).await?;
    log::info!("mailer listening on {}", config.listen);
    axum::serve(listener, app).await?;
    Ok(())
}
