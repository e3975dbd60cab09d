//! Email delivery through an HTTP mail API.

use super::channel::{
    announcement_body, announcement_subject, ChannelError, EventCreatedNotification,
    NotificationChannel,
};
use async_trait::async_trait;
use rally_config::EmailConfig;
use rally_database::{Event, User};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Sends one announcement email per interested user.
pub struct EmailChannel {
    client: Client,
    api_url: String,
    api_key: Option<String>,
    sender: String,
}

impl EmailChannel {
    pub fn from_config(config: &EmailConfig) -> Result<Self, ChannelError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            sender: config.sender.clone(),
        })
    }

    async fn send(&self, user: &User, subject: &str, text: &str) -> Result<(), ChannelError> {
        let mut request = self.client.post(&self.api_url).json(&SendEmailRequest {
            from: &self.sender,
            to: &user.email,
            subject,
            text,
        });
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(ChannelError::Rejected {
                status: response.status().as_u16(),
            });
        }

        debug!(user_id = %user.public_id, "announcement email accepted");
        Ok(())
    }
}

fn personalised_body(user: &User, event: &Event) -> String {
    format!(
        "Hi {},\n\nA new event matching your interests has been announced.\n\n{}",
        user.display_name,
        announcement_body(event)
    )
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    fn name(&self) -> &str {
        "email"
    }

    async fn receive(&self, notification: &EventCreatedNotification) -> Result<(), ChannelError> {
        let subject = announcement_subject(&notification.event);
        let mut failed = 0;

        for user in &notification.interested_users {
            let text = personalised_body(user, &notification.event);
            if let Err(err) = self.send(user, &subject, &text).await {
                warn!(user_id = %user.public_id, error = %err, "announcement email failed");
                failed += 1;
            }
        }

        if failed > 0 {
            return Err(ChannelError::PartialDelivery {
                failed,
                attempted: notification.interested_users.len(),
            });
        }

        Ok(())
    }
}
