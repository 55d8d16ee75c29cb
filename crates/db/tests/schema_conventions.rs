use sqlx::PgPool;

/// Ledgers that are only ever inserted into carry `created_at` but no
/// `updated_at`.
const APPEND_ONLY_TABLES: &[&str] = &[
    "alert_status_changes",
    "client_action_comments",
    "notification_log",
];

/// All `id` columns must be bigint.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_pks_are_bigint(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name, data_type
         FROM information_schema.columns
         WHERE column_name = 'id'
           AND table_schema = 'public'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(!rows.is_empty());
    for (table, data_type) in &rows {
        assert_eq!(
            data_type, "bigint",
            "Table {table}.id should be bigint, got {data_type}"
        );
    }
}

/// Every table has `created_at` as timestamptz; mutable tables also have
/// `updated_at`.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_tables_have_timestamps(pool: PgPool) {
    let tables: Vec<(String,)> = sqlx::query_as(
        "SELECT table_name
         FROM information_schema.tables
         WHERE table_schema = 'public'
           AND table_type = 'BASE TABLE'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    for (table,) in &tables {
        let columns: &[&str] = if APPEND_ONLY_TABLES.contains(&table.as_str()) {
            &["created_at"]
        } else {
            &["created_at", "updated_at"]
        };

        for col in columns {
            let result: Option<(String,)> = sqlx::query_as(&format!(
                "SELECT data_type
                 FROM information_schema.columns
                 WHERE table_schema = 'public'
                   AND table_name = '{table}'
                   AND column_name = '{col}'"
            ))
            .fetch_optional(&pool)
            .await
            .unwrap();

            let (data_type,) =
                result.unwrap_or_else(|| panic!("Table {table} is missing column {col}"));
            assert_eq!(
                data_type, "timestamp with time zone",
                "Table {table}.{col} should be timestamptz, got {data_type}"
            );
        }
    }
}

/// No character varying columns; TEXT is used throughout.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_no_varchar_columns(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name, column_name
         FROM information_schema.columns
         WHERE table_schema = 'public'
           AND data_type = 'character varying'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name, column_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(
        rows.is_empty(),
        "Found VARCHAR columns (should use TEXT): {:?}",
        rows
    );
}

/// Every foreign key column must lead some index.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_fks_have_indexes(pool: PgPool) {
    let fk_columns: Vec<(String, String)> = sqlx::query_as(
        "SELECT DISTINCT
             tc.table_name,
             kcu.column_name
         FROM information_schema.table_constraints tc
         JOIN information_schema.key_column_usage kcu
             ON tc.constraint_name = kcu.constraint_name
             AND tc.table_schema = kcu.table_schema
         WHERE tc.constraint_type = 'FOREIGN KEY'
           AND tc.table_schema = 'public'
         ORDER BY tc.table_name, kcu.column_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(!fk_columns.is_empty());
    for (table, column) in &fk_columns {
        let has_index: (bool,) = sqlx::query_as(&format!(
            "SELECT EXISTS (
                SELECT 1
                FROM pg_indexes
                WHERE schemaname = 'public'
                  AND tablename = '{table}'
                  AND (indexdef LIKE '%({column})%' OR indexdef LIKE '%({column},%')
            )"
        ))
        .fetch_one(&pool)
        .await
        .unwrap();

        assert!(has_index.0, "FK column {table}.{column} has no index");
    }
}

/// Every foreign key constraint must have explicit ON DELETE and ON UPDATE rules.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_all_fks_have_on_delete_and_on_update(pool: PgPool) {
    let fk_rules: Vec<(String, String, String, String)> = sqlx::query_as(
        "SELECT
             rc.constraint_name,
             tc.table_name,
             rc.delete_rule,
             rc.update_rule
         FROM information_schema.referential_constraints rc
         JOIN information_schema.table_constraints tc
             ON rc.constraint_name = tc.constraint_name
             AND rc.constraint_schema = tc.table_schema
         WHERE rc.constraint_schema = 'public'
         ORDER BY tc.table_name, rc.constraint_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(
        !fk_rules.is_empty(),
        "Expected at least one FK constraint in the schema"
    );

    for (constraint, table, delete_rule, update_rule) in &fk_rules {
        assert!(
            delete_rule != "NO ACTION" || update_rule != "NO ACTION",
            "FK {constraint} on {table} has default NO ACTION for both ON DELETE and ON UPDATE; \
             specify an explicit rule"
        );
    }
}

/// Ledger tables reject edits at the database level.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_append_only_tables_have_guard_triggers(pool: PgPool) {
    for table in ["client_action_comments", "notification_log"] {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*)
             FROM information_schema.triggers
             WHERE event_object_schema = 'public'
               AND event_object_table = $1
               AND action_statement LIKE '%trigger_reject_mutation%'",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .unwrap();

        assert!(count > 0, "{table} has no append-only guard trigger");
    }
}
