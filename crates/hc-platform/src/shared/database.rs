//! Entity Store
//!
//! SQLite pool setup and schema. Foreign keys are always enforced; the
//! cascades below (domain -> policies, role -> domains/accountabilities/
//! assignments) rely on them.

use std::str::FromStr;
use std::time::Duration;

use hc_config::DatabaseConfig;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        external_id TEXT NOT NULL UNIQUE,
        first_name TEXT,
        last_name TEXT,
        email TEXT NOT NULL UNIQUE,
        is_deleted INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS organizations (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        is_deleted INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS circles (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        purpose TEXT,
        is_deleted INTEGER NOT NULL DEFAULT 0,
        organization_id TEXT NOT NULL REFERENCES organizations(id),
        parent_circle_id TEXT REFERENCES circles(id),
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS invitations (
        id TEXT PRIMARY KEY,
        code TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL,
        status TEXT NOT NULL,
        organization_id TEXT NOT NULL REFERENCES organizations(id),
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS partners (
        id TEXT PRIMARY KEY,
        partner_type TEXT NOT NULL,
        first_name TEXT,
        last_name TEXT,
        email TEXT NOT NULL,
        is_active INTEGER NOT NULL DEFAULT 1,
        is_deleted INTEGER NOT NULL DEFAULT 0,
        user_id TEXT NOT NULL REFERENCES users(id),
        organization_id TEXT NOT NULL REFERENCES organizations(id),
        invitation_id TEXT REFERENCES invitations(id),
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        UNIQUE (user_id, organization_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS roles (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        purpose TEXT,
        role_type TEXT NOT NULL,
        parent_circle_id TEXT REFERENCES circles(id),
        circle_id TEXT REFERENCES circles(id),
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS domains (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        role_id TEXT NOT NULL REFERENCES roles(id) ON DELETE CASCADE,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS policies (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT,
        domain_id TEXT NOT NULL REFERENCES domains(id) ON DELETE CASCADE,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS accountabilities (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        role_id TEXT NOT NULL REFERENCES roles(id) ON DELETE CASCADE,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS circle_partners (
        circle_id TEXT NOT NULL REFERENCES circles(id),
        partner_id TEXT NOT NULL REFERENCES partners(id),
        created_at TEXT NOT NULL,
        PRIMARY KEY (circle_id, partner_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS role_partners (
        role_id TEXT NOT NULL REFERENCES roles(id) ON DELETE CASCADE,
        partner_id TEXT NOT NULL REFERENCES partners(id),
        created_at TEXT NOT NULL,
        PRIMARY KEY (role_id, partner_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS events (
        id TEXT PRIMARY KEY,
        event_type TEXT NOT NULL,
        source TEXT NOT NULL,
        subject TEXT NOT NULL,
        time TEXT NOT NULL,
        spec_version TEXT NOT NULL,
        message_group TEXT NOT NULL,
        correlation_id TEXT NOT NULL,
        causation_id TEXT,
        execution_id TEXT NOT NULL,
        principal_id TEXT NOT NULL,
        data TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS audit_logs (
        id TEXT PRIMARY KEY,
        entity_type TEXT NOT NULL,
        entity_id TEXT,
        operation TEXT NOT NULL,
        operation_json TEXT,
        principal_id TEXT,
        performed_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_partners_organization ON partners (organization_id)",
    "CREATE INDEX IF NOT EXISTS idx_circles_organization ON circles (organization_id, parent_circle_id)",
    "CREATE INDEX IF NOT EXISTS idx_roles_parent_circle ON roles (parent_circle_id)",
    "CREATE INDEX IF NOT EXISTS idx_invitations_organization ON invitations (organization_id)",
    "CREATE INDEX IF NOT EXISTS idx_circle_partners_partner ON circle_partners (partner_id)",
    "CREATE INDEX IF NOT EXISTS idx_role_partners_partner ON role_partners (partner_id)",
    "CREATE INDEX IF NOT EXISTS idx_events_subject ON events (subject)",
    "CREATE INDEX IF NOT EXISTS idx_audit_logs_entity ON audit_logs (entity_type, entity_id)",
];

/// Open the pool described by the configuration.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await?;

    info!(url = %config.url, "Connected to entity store");
    Ok(pool)
}

/// Private in-memory database with the schema applied.
///
/// Every connection to `sqlite::memory:` is a separate database, so the pool
/// is pinned to one connection that never expires.
pub async fn connect_in_memory() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    initialize_schema(&pool).await?;
    Ok(pool)
}

/// Create tables and indexes if they do not exist.
pub async fn initialize_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!(statements = SCHEMA.len(), "Entity store schema ready");
    Ok(())
}
