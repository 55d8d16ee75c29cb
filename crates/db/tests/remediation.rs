//! Integration tests for action items, client actions and their comment
//! trail.

use regwatch_core::affected_client::ClientRisk;
use regwatch_core::remediation::{ActionStatus, Priority};
use regwatch_db::models::action_item::{CreateActionItem, UpdateActionItem};
use regwatch_db::models::affected_client::AffectedClientInput;
use regwatch_db::models::alert::CreateAlert;
use regwatch_db::models::client_action::CreateClientAction;
use regwatch_db::models::organization::CreateOrganization;
use regwatch_db::repositories::{
    ActionItemRepo, AffectedClientRepo, AlertRepo, ClientActionRepo, OrganizationRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create an alert with one affected organization; returns (alert, link, org).
async fn seed(pool: &PgPool) -> (i64, i64, i64) {
    let alert = AlertRepo::create(
        pool,
        &CreateAlert {
            title: "CSRD reporting".into(),
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

    let mut tx = pool.begin().await.unwrap();
    let links = AffectedClientRepo::replace_all(
        &mut tx,
        alert.id,
        &[AffectedClientInput {
            organization_id: org.id,
            risk: ClientRisk::High,
            reason: None,
            comment: None,
        }],
        false,
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();

    (alert.id, links[0].id, org.id)
}

fn new_action(text: &str) -> CreateClientAction {
    CreateClientAction {
        text: text.to_string(),
        due_date: None,
    }
}

// ---------------------------------------------------------------------------
// Action items
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn action_item_crud(pool: PgPool) {
    let (alert_id, _, _) = seed(&pool).await;

    let item = ActionItemRepo::create(
        &pool,
        alert_id,
        &CreateActionItem {
            text: "Update AML policy".into(),
            priority: None,
            due_date: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(item.priority, Priority::Medium);
    assert_eq!(item.status, ActionStatus::Offen);

    let updated = ActionItemRepo::update(
        &pool,
        item.id,
        &UpdateActionItem {
            status: Some(ActionStatus::Erledigt),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.status, ActionStatus::Erledigt);
    assert_eq!(updated.text, "Update AML policy");

    assert_eq!(ActionItemRepo::list_for_alert(&pool, alert_id).await.unwrap().len(), 1);
    assert!(ActionItemRepo::delete(&pool, item.id).await.unwrap());
    assert!(!ActionItemRepo::delete(&pool, item.id).await.unwrap());
    assert!(ActionItemRepo::find_by_id(&pool, item.id).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Client actions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn client_action_starts_open_and_resolves_owner(pool: PgPool) {
    let (alert_id, link_id, org_id) = seed(&pool).await;

    let action = ClientActionRepo::create(&pool, link_id, &new_action("Train staff"), 3)
        .await
        .unwrap();
    assert_eq!(action.status, ActionStatus::Offen);
    assert_eq!(action.created_by, Some(3));

    let owner = ClientActionRepo::owner(&pool, action.id).await.unwrap().unwrap();
    assert_eq!(owner.alert_id, alert_id);
    assert_eq!(owner.organization_id, org_id);
    assert_eq!(owner.affected_client_id, link_id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn comments_cannot_be_edited(pool: PgPool) {
    let (_, link_id, _) = seed(&pool).await;
    let action = ClientActionRepo::create(&pool, link_id, &new_action("Train staff"), 3)
        .await
        .unwrap();
    let comment = ClientActionRepo::add_comment(&pool, action.id, 3, "Scheduled for May")
        .await
        .unwrap();

    let result = sqlx::query("UPDATE client_action_comments SET body = 'edited' WHERE id = $1")
        .bind(comment.id)
        .execute(&pool)
        .await;
    assert!(result.is_err(), "comment UPDATE must be rejected");

    assert!(ClientActionRepo::delete_comment(&pool, comment.id).await.unwrap());
    assert!(ClientActionRepo::find_comment(&pool, comment.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn grouped_views_include_actions_and_comments(pool: PgPool) {
    let (alert_id, link_id, org_id) = seed(&pool).await;
    let action = ClientActionRepo::create(&pool, link_id, &new_action("Train staff"), 3)
        .await
        .unwrap();

    let mut tx = pool.begin().await.unwrap();
    ClientActionRepo::set_status(&mut tx, action.id, ActionStatus::InArbeit)
        .await
        .unwrap();
    ClientActionRepo::add_system_comment(&mut tx, action.id, 3, "Status changed: offen -> in_arbeit")
        .await
        .unwrap();
    tx.commit().await.unwrap();
    ClientActionRepo::add_comment(&pool, action.id, 4, "On it").await.unwrap();

    let groups = ClientActionRepo::list_grouped_for_alert(&pool, alert_id)
        .await
        .unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].organization_name, "Acme");
    assert_eq!(groups[0].alert_title, "CSRD reporting");
    let actions = &groups[0].actions;
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].action.status, ActionStatus::InArbeit);
    let flags: Vec<bool> = actions[0].comments.iter().map(|c| c.is_system).collect();
    assert_eq!(flags, vec![true, false]);

    // The alert is still a draft, so the organization view hides it.
    let org_view = ClientActionRepo::list_grouped_for_organization(&pool, org_id)
        .await
        .unwrap();
    assert!(org_view.is_empty());
}
