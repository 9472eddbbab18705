//! SQL schema for the Huntboard SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS applications (
    id          TEXT PRIMARY KEY,
    user_id     TEXT NOT NULL,
    data        TEXT NOT NULL,   -- JSON object keyed by custom-field id
    created_at  TEXT NOT NULL,   -- ISO 8601 UTC
    updated_at  TEXT NOT NULL
);

-- Notes live in their own table but belong to their application: deleting
-- the parent row deletes them.
CREATE TABLE IF NOT EXISTS notes (
    id              TEXT PRIMARY KEY,
    application_id  TEXT NOT NULL REFERENCES applications(id) ON DELETE CASCADE,
    content         TEXT NOT NULL,
    created_at      TEXT NOT NULL,
    updated_at      TEXT             -- NULL until first edited
);

CREATE TABLE IF NOT EXISTS custom_fields (
    id            TEXT NOT NULL,
    user_id       TEXT NOT NULL,
    name          TEXT NOT NULL,
    field_type    TEXT NOT NULL,   -- 'text' | 'textarea' | 'date' | 'select' | 'number' | 'checkbox'
    required      INTEGER NOT NULL,
    field_order   INTEGER NOT NULL,
    show_in_table INTEGER NOT NULL DEFAULT 1,
    options       TEXT,            -- JSON array, select fields only
    PRIMARY KEY (user_id, id)
);

-- One row per user.
CREATE TABLE IF NOT EXISTS preferences (
    user_id            TEXT PRIMARY KEY,
    theme              TEXT NOT NULL,
    default_pagination INTEGER NOT NULL
);

-- One row per user; both collections stored as JSON arrays.
CREATE TABLE IF NOT EXISTS chart_configs (
    user_id        TEXT PRIMARY KEY,
    charts         TEXT NOT NULL,
    overview_cards TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS applications_user_idx ON applications(user_id);
CREATE INDEX IF NOT EXISTS notes_application_idx ON notes(application_id);
CREATE INDEX IF NOT EXISTS custom_fields_user_idx ON custom_fields(user_id);

PRAGMA user_version = 1;
";
