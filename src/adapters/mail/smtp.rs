use crate::config::SmtpConfig;
use crate::domain::model::MailMessage;
use crate::domain::ports::Mailer;
use crate::utils::error::{FormError, Result};
use crate::utils::validation::validate_required_field;
use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Outbound mail session built once at startup and shared by all requests.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

fn parse_mailbox(field: &str, value: &str) -> Result<Mailbox> {
    value
        .parse()
        .map_err(|e| FormError::InvalidConfigValueError {
            field: field.to_string(),
            value: value.to_string(),
            reason: format!("{}", e),
        })
}

impl SmtpMailer {
    pub fn from_config(config: &SmtpConfig) -> Result<Self> {
        let host = validate_required_field("smtp_host", &config.smtp_host)?;
        let from = parse_mailbox(
            "mail_from",
            validate_required_field("mail_from", &config.mail_from)?,
        )?;
        let to = parse_mailbox("mail_to", validate_required_field("mail_to", &config.mail_to)?)?;

        let builder = if config.smtp_starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
        }
        .map_err(|e| FormError::ConfigError {
            message: format!("Failed to set up SMTP relay {}: {}", host, e),
        })?;

        let mut builder = builder.port(config.smtp_port);
        if let (Some(username), Some(password)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from,
            to,
        })
    }

    pub fn build_email(&self, message: &MailMessage) -> Result<Message> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(message.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                message.text_body.clone(),
                message.html_body.clone(),
            ))
            .map_err(FormError::delivery)
    }

    /// Opens a connection to the relay to check reachability and credentials.
    pub async fn verify(&self) -> Result<bool> {
        self.transport
            .test_connection()
            .await
            .map_err(FormError::delivery)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn deliver(&self, message: &MailMessage) -> Result<()> {
        let email = self.build_email(message)?;
        self.transport
            .send(email)
            .await
            .map_err(FormError::delivery)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SmtpConfig {
        SmtpConfig {
            smtp_host: Some("smtp.example.com".to_string()),
            smtp_port: 465,
            smtp_username: Some("forms".to_string()),
            smtp_password: Some("hunter2".to_string()),
            smtp_starttls: false,
            mail_from: Some("Forms <forms@example.com>".to_string()),
            mail_to: Some("owner@example.com".to_string()),
            mail_subject: "New form submission".to_string(),
        }
    }

    #[test]
    fn test_build_email_has_both_parts() {
        let mailer = SmtpMailer::from_config(&config()).unwrap();
        let email = mailer
            .build_email(&MailMessage {
                subject: "New form submission".to_string(),
                text_body: "name: Ada".to_string(),
                html_body: "<table><tr><th>name</th><td>Ada</td></tr></table>".to_string(),
            })
            .unwrap();

        let raw = String::from_utf8(email.formatted()).unwrap();
        assert!(raw.contains("Subject: New form submission"));
        assert!(raw.contains("To: owner@example.com"));
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("text/plain"));
        assert!(raw.contains("text/html"));
    }

    #[test]
    fn test_missing_host_is_config_error() {
        let mut config = config();
        config.smtp_host = None;
        let err = SmtpMailer::from_config(&config).err().unwrap();
        assert!(matches!(err, FormError::MissingConfigError { .. }));
    }

    #[test]
    fn test_bad_sender_is_rejected() {
        let mut config = config();
        config.mail_from = Some("not an address".to_string());
        let err = SmtpMailer::from_config(&config).err().unwrap();
        assert!(matches!(err, FormError::InvalidConfigValueError { .. }));
    }
}
