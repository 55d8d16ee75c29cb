//! Integration tests for the append-only notification log.

use regwatch_core::notification::DeliveryStatus;
use regwatch_db::models::alert::CreateAlert;
use regwatch_db::models::notification_log::NewLogEntry;
use regwatch_db::models::organization::CreateOrganization;
use regwatch_db::repositories::{AlertRepo, NotificationLogRepo, OrganizationRepo};
use sqlx::PgPool;

async fn seed(pool: &PgPool) -> (i64, i64) {
    let alert = AlertRepo::create(
        pool,
        &CreateAlert {
            title: "A".into(),
            source: None,
            jurisdiction: None,
            alert_date: None,
            category: None,
            severity: None,
            summary: None,
            legal_basis: None,
            deadline: None,
            comment: None,
            suggestion: None,
        },
        "DE",
        None,
    )
    .await
    .unwrap();
    let org = OrganizationRepo::create(pool, &CreateOrganization { name: "Acme".into() })
        .await
        .unwrap();
    (alert.id, org.id)
}

fn entry(alert_id: i64, organization_id: i64, email: &str, status: DeliveryStatus) -> NewLogEntry {
    NewLogEntry {
        alert_id,
        organization_id,
        recipient_email: email.to_string(),
        recipient_name: email.to_string(),
        status,
        error_message: (status == DeliveryStatus::Failed).then(|| "mailbox full".to_string()),
        sent_at: chrono::Utc::now(),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn append_and_list(pool: PgPool) {
    let (alert_id, org_id) = seed(&pool).await;

    let written = NotificationLogRepo::append(
        &pool,
        &[
            entry(alert_id, org_id, "a@acme.test", DeliveryStatus::Sent),
            entry(alert_id, org_id, "b@acme.test", DeliveryStatus::Failed),
        ],
    )
    .await
    .unwrap();
    assert_eq!(written, 2);
    assert_eq!(NotificationLogRepo::append(&pool, &[]).await.unwrap(), 0);

    assert_eq!(NotificationLogRepo::count_for_alert(&pool, alert_id).await.unwrap(), 2);
    let rows = NotificationLogRepo::list_for_alert(&pool, alert_id, 50, 0)
        .await
        .unwrap();
    let failed = rows
        .iter()
        .find(|r| r.status == DeliveryStatus::Failed)
        .unwrap();
    assert_eq!(failed.error_message.as_deref(), Some("mailbox full"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn log_rows_cannot_be_updated_or_deleted(pool: PgPool) {
    let (alert_id, org_id) = seed(&pool).await;
    NotificationLogRepo::append(
        &pool,
        &[entry(alert_id, org_id, "a@acme.test", DeliveryStatus::Sent)],
    )
    .await
    .unwrap();

    let update = sqlx::query("UPDATE notification_log SET status = 'failed'")
        .execute(&pool)
        .await;
    assert!(update.is_err());

    let delete = sqlx::query("DELETE FROM notification_log").execute(&pool).await;
    assert!(delete.is_err());

    assert_eq!(NotificationLogRepo::count_for_alert(&pool, alert_id).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn failed_rows_require_an_error_message(pool: PgPool) {
    let (alert_id, org_id) = seed(&pool).await;
    let mut bad = entry(alert_id, org_id, "a@acme.test", DeliveryStatus::Failed);
    bad.error_message = None;

    assert!(NotificationLogRepo::append(&pool, &[bad]).await.is_err());
    assert_eq!(NotificationLogRepo::count_for_alert(&pool, alert_id).await.unwrap(), 0);
}
