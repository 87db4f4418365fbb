use async_trait::async_trait;
use tracing::info;

use models::{Issue, ServiceProvider};

/// A composed notification message, ready for whatever transport the
/// deployment wires in.
#[derive(Clone, Debug, PartialEq)]
pub struct IssueEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &IssueEmail) -> anyhow::Result<()>;
}

/// Default transport: log the composed message. Real SMTP delivery is a
/// deployment concern behind the same trait.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &IssueEmail) -> anyhow::Result<()> {
        info!(to = %email.to, subject = %email.subject, "issue notification email");
        Ok(())
    }
}

/// Compose the provider notification for a reported issue.
pub fn compose_issue_email(issue: &Issue, provider: &ServiceProvider) -> IssueEmail {
    let subject = format!("New Issue Reported: {}", issue.appliance.appliance_name);
    let body = format!(
        "Dear {},\n\n\
         A new issue has been reported that requires your attention.\n\n\
         Appliance: {}\n\
         Location: Room {}, Floor {}\n\
         Priority: {}\n\
         Description: {}\n\
         Reported by: {}\n\
         Date: {}\n\n\
         Please review and take appropriate action.\n",
        provider.name,
        issue.appliance.appliance_name,
        issue.appliance.room,
        issue.appliance.floor,
        issue.priority,
        issue.description,
        issue.reported_by,
        issue.created_at.format("%Y-%m-%d %H:%M UTC"),
    );
    IssueEmail { to: provider.email.clone(), subject, body }
}
