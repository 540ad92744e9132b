//! Reports future expenses that are due for a reminder.
//!
//! Meant to run once a day from cron. For every user with a current budget it
//! lists the unsettled future expenses expiring exactly `notifications.lead_days`
//! from today. Delivery is left to whatever consumes the log output.
//!
//! Usage: notifier [YYYY-MM-DD]
//!
//! The optional date replaces today, for replaying a missed run.

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use walletify_db::BudgetRepository;
use walletify_shared::AppConfig;

fn scan_date() -> anyhow::Result<NaiveDate> {
    match std::env::args().nth(1) {
        Some(arg) => NaiveDate::parse_from_str(&arg, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{arg}', expected YYYY-MM-DD")),
        None => Ok(Utc::now().date_naive()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "walletify=info,notifier=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let today = scan_date()?;
    let config = AppConfig::load().context("Failed to load configuration")?;
    let db = walletify_db::connect(&config.database)
        .await
        .context("Failed to connect to database")?;

    let lead_days = config.notifications.lead_days;
    let groups = BudgetRepository::new(db)
        .due_reminders(today, lead_days)
        .await?;

    for group in &groups {
        let Some(email) = group.email.as_deref() else {
            warn!(user_id = %group.user_id, "User has no email address, reminder skipped");
            continue;
        };

        for detail in &group.details {
            info!(
                user_id = %group.user_id,
                email,
                detail_id = %detail.id,
                name = %detail.name,
                value = %detail.value,
                expiration_date = %detail.expiration_date,
                "Future expense due"
            );
        }
    }

    info!(%today, lead_days, users = groups.len(), "Reminder scan complete");
    Ok(())
}
