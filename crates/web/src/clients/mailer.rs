use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("SMTP transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Message build error: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("Invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Invalid content type: {0}")]
    ContentType(#[from] lettre::message::header::ContentTypeErr),
}

/// One QR delivery job, assembled by the import orchestrator or the single
/// registration path.
#[derive(Debug, Clone)]
pub struct QrEmail {
    pub to: String,
    pub name: String,
    pub team: String,
    pub check_in_url: String,
    pub qr_png: Vec<u8>,
    pub attachment_filename: String,
}

/// Mail delivery boundary. Exactly one production implementation exists;
/// tests plug in fakes.
#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &QrEmail) -> Result<(), MailError>;
}

/// SMTP mailer over a pooled STARTTLS transport, so messages within a batch
/// reuse the same connection instead of handshaking per message.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    /// Redirects every message when set (non-production runs).
    override_recipient: Option<Mailbox>,
}

impl SmtpMailer {
    pub fn from_config(config: &Config) -> Result<Self, MailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_server)?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ))
            .build();

        let override_recipient = match &config.test_email {
            Some(address) => Some(address.parse()?),
            None => None,
        };

        Ok(Self {
            transport,
            from: config.smtp_from_email.parse()?,
            override_recipient,
        })
    }

    fn compose(&self, email: &QrEmail) -> Result<Message, MailError> {
        let recipient = match &self.override_recipient {
            Some(mailbox) => mailbox.clone(),
            None => email.to.parse()?,
        };

        let html = format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
  <h1>안녕하세요, {name}님!</h1>
  <p>{team} 팀 체크인용 QR 코드를 보내드립니다.</p>
  <div style="text-align: center; margin: 30px 0;">
    <img src="cid:qr_code" alt="QR Code" style="max-width: 200px;">
    <p>위의 QR 코드를 스캔하시거나 아래 버튼을 클릭해주세요.</p>
    <a href="{url}" style="display: inline-block; background-color: #007bff; color: white; padding: 12px 24px; text-decoration: none; border-radius: 5px;">체크인하기</a>
  </div>
  <p style="color: #666; font-size: 14px;">이 이메일은 자동으로 발송되었습니다.</p>
</div>"#,
            name = email.name,
            team = email.team,
            url = email.check_in_url,
        );

        let png_type = ContentType::parse("image/png")?;
        let inline_qr =
            Attachment::new_inline("qr_code".to_string()).body(email.qr_png.clone(), png_type.clone());
        let attached_qr =
            Attachment::new(email.attachment_filename.clone()).body(email.qr_png.clone(), png_type);

        let message = Message::builder()
            .from(self.from.clone())
            .to(recipient)
            .subject(format!("{} 체육대회 QR 코드 안내", email.team))
            .multipart(
                MultiPart::mixed()
                    .multipart(
                        MultiPart::related()
                            .singlepart(
                                SinglePart::builder()
                                    .header(ContentType::TEXT_HTML)
                                    .body(html),
                            )
                            .singlepart(inline_qr),
                    )
                    .singlepart(attached_qr),
            )?;

        Ok(message)
    }
}

#[async_trait::async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &QrEmail) -> Result<(), MailError> {
        let message = self.compose(email)?;
        self.transport.send(message).await?;
        Ok(())
    }
}

/// Per-job outcome inside a batch.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub to: String,
    pub error: Option<String>,
}

/// Aggregate result of one delivery batch.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub outcomes: Vec<JobOutcome>,
}

/// Deliver a batch of jobs over one mailer session. A failed job is recorded
/// and the batch continues; this function never aborts wholesale.
pub async fn send_qr_batch(mailer: &dyn Mailer, jobs: &[QrEmail]) -> BatchReport {
    let mut report = BatchReport {
        total: jobs.len(),
        ..Default::default()
    };

    for job in jobs {
        match mailer.send(job).await {
            Ok(()) => {
                report.succeeded += 1;
                report.outcomes.push(JobOutcome {
                    to: job.to.clone(),
                    error: None,
                });
            }
            Err(e) => {
                tracing::warn!("Failed to send QR email to {}: {}", job.to, e);
                report.failed += 1;
                report.outcomes.push(JobOutcome {
                    to: job.to.clone(),
                    error: Some(e.to_string()),
                });
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_job(to: &str) -> QrEmail {
        QrEmail {
            to: to.to_string(),
            name: "홍길동".to_string(),
            team: "개발팀".to_string(),
            check_in_url: "https://attend.example.com/check-in?token=abc123XY".to_string(),
            qr_png: vec![0x89, 0x50, 0x4e, 0x47],
            attachment_filename: "qr_code.png".to_string(),
        }
    }

    struct FlakyMailer {
        failing: Vec<String>,
    }

    #[async_trait::async_trait]
    impl Mailer for FlakyMailer {
        async fn send(&self, email: &QrEmail) -> Result<(), MailError> {
            if self.failing.contains(&email.to) {
                Err(MailError::Address(
                    "not-an-address".parse::<Mailbox>().unwrap_err(),
                ))
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn batch_continues_past_failed_jobs() {
        let mailer = FlakyMailer {
            failing: vec!["kim@example.com".to_string()],
        };
        let jobs = vec![
            sample_job("hong@example.com"),
            sample_job("kim@example.com"),
            sample_job("lee@example.com"),
        ];

        let report = send_qr_batch(&mailer, &jobs).await;

        assert_eq!(report.total, 3);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 1);
        assert!(report.outcomes[1].error.is_some());
        assert!(report.outcomes[2].error.is_none());
    }

    #[tokio::test]
    async fn empty_batch_reports_zero() {
        let mailer = FlakyMailer { failing: vec![] };
        let report = send_qr_batch(&mailer, &[]).await;
        assert_eq!(report.total, 0);
        assert_eq!(report.succeeded, 0);
        assert_eq!(report.failed, 0);
    }

    // The pooled transport spawns onto the runtime when built, so these two
    // need one even though they never send.
    #[tokio::test]
    async fn composed_message_carries_inline_and_attached_qr() {
        let mailer = SmtpMailer {
            transport: AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous("localhost")
                .build(),
            from: "attendance@example.com".parse().unwrap(),
            override_recipient: None,
        };

        let message = mailer.compose(&sample_job("hong@example.com")).unwrap();
        let formatted = String::from_utf8_lossy(&message.formatted()).to_string();

        assert!(formatted.contains("multipart/related"));
        assert!(formatted.contains("cid:qr_code"));
        assert!(formatted.contains("qr_code.png"));
    }

    #[tokio::test]
    async fn override_recipient_redirects_delivery() {
        let mailer = SmtpMailer {
            transport: AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous("localhost")
                .build(),
            from: "attendance@example.com".parse().unwrap(),
            override_recipient: Some("qa@example.com".parse().unwrap()),
        };

        let message = mailer.compose(&sample_job("hong@example.com")).unwrap();
        let formatted = String::from_utf8_lossy(&message.formatted()).to_string();

        assert!(formatted.contains("qa@example.com"));
        assert!(!formatted.contains("hong@example.com"));
    }
}
