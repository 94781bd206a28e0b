use sqlx::PgPool;

async fn base_tables(pool: &PgPool) -> Vec<String> {
    sqlx::query_scalar(
        "SELECT table_name::TEXT
         FROM information_schema.tables
         WHERE table_schema = 'public'
           AND table_type = 'BASE TABLE'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(pool)
    .await
    .unwrap()
}

/// Every `id` column is a BIGSERIAL key.
#[sqlx::test(migrations = "../../db/migrations")]
async fn ids_are_bigint(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name::TEXT, data_type::TEXT
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
        assert_eq!(data_type, "bigint", "{table}.id should be bigint");
    }
}

/// Every table records when its rows were created, as timestamptz.
#[sqlx::test(migrations = "../../db/migrations")]
async fn tables_have_created_at(pool: PgPool) {
    for table in base_tables(&pool).await {
        let data_type: Option<String> = sqlx::query_scalar(
            "SELECT data_type::TEXT
             FROM information_schema.columns
             WHERE table_schema = 'public' AND table_name = $1 AND column_name = 'created_at'",
        )
        .bind(&table)
        .fetch_optional(&pool)
        .await
        .unwrap();

        assert_eq!(
            data_type.as_deref(),
            Some("timestamp with time zone"),
            "{table}.created_at missing or not timestamptz"
        );
    }
}

/// Tables with an `updated_at` column keep it current through the shared trigger.
#[sqlx::test(migrations = "../../db/migrations")]
async fn updated_at_has_trigger(pool: PgPool) {
    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT table_name::TEXT
         FROM information_schema.columns
         WHERE table_schema = 'public' AND column_name = 'updated_at'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    for table in &tables {
        let has_trigger: bool = sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM information_schema.triggers
                WHERE event_object_schema = 'public'
                  AND event_object_table = $1
                  AND action_statement LIKE '%set_updated_at%'
            )",
        )
        .bind(table)
        .fetch_one(&pool)
        .await
        .unwrap();

        assert!(has_trigger, "{table} has updated_at but no set_updated_at trigger");
    }
}

/// TEXT everywhere, no VARCHAR.
#[sqlx::test(migrations = "../../db/migrations")]
async fn no_varchar_columns(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name::TEXT, column_name::TEXT
         FROM information_schema.columns
         WHERE table_schema = 'public'
           AND data_type = 'character varying'
           AND table_name != '_sqlx_migrations'",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(rows.is_empty(), "VARCHAR columns found: {rows:?}");
}

/// Every foreign key column leads some index, and every FK states its delete rule.
#[sqlx::test(migrations = "../../db/migrations")]
async fn foreign_keys_are_indexed(pool: PgPool) {
    let fk_columns: Vec<(String, String, String)> = sqlx::query_as(
        "SELECT DISTINCT tc.table_name::TEXT, kcu.column_name::TEXT, rc.delete_rule::TEXT
         FROM information_schema.table_constraints tc
         JOIN information_schema.key_column_usage kcu
             ON tc.constraint_name = kcu.constraint_name
             AND tc.table_schema = kcu.table_schema
         JOIN information_schema.referential_constraints rc
             ON rc.constraint_name = tc.constraint_name
             AND rc.constraint_schema = tc.table_schema
         WHERE tc.constraint_type = 'FOREIGN KEY'
           AND tc.table_schema = 'public'
         ORDER BY 1, 2",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(!fk_columns.is_empty());
    for (table, column, delete_rule) in &fk_columns {
        let has_index: bool = sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM pg_indexes
                WHERE schemaname = 'public'
                  AND tablename = $1
                  AND indexdef LIKE '%(' || $2 || '%'
            )",
        )
        .bind(table)
        .bind(column)
        .fetch_one(&pool)
        .await
        .unwrap();

        assert!(has_index, "FK column {table}.{column} has no index");
        assert_ne!(
            delete_rule, "NO ACTION",
            "FK {table}.{column} needs an explicit ON DELETE rule"
        );
    }
}
