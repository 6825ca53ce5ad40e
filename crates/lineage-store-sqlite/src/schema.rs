//! SQL schema for the lineage SQLite store.
//!
//! Executed on every open; idempotent thanks to `CREATE ... IF NOT EXISTS`.

/// Full schema DDL.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS script (
    code               TEXT PRIMARY KEY,
    iso_id             INTEGER UNIQUE NOT NULL,
    u_name             TEXT UNIQUE,      -- Unicode property value alias
    u_version_added    INTEGER,
    u_subversion_added INTEGER
) STRICT;

CREATE TABLE IF NOT EXISTS code_point (
    id                          INTEGER PRIMARY KEY,   -- the scalar value
    text                        TEXT GENERATED ALWAYS AS (
        CASE WHEN general_category_code IN ('Cn', 'Cs') THEN '' ELSE char(id) END
    ) VIRTUAL,
    name                        TEXT,
    script_code                 TEXT NOT NULL DEFAULT 'Zzzz' REFERENCES script (code),
    general_category_code       TEXT NOT NULL DEFAULT 'Cn',
    bidi_class_code             TEXT NOT NULL DEFAULT 'L',
    simple_uppercase_mapping_id INTEGER REFERENCES code_point (id),
    simple_lowercase_mapping_id INTEGER REFERENCES code_point (id),
    decomposition_type          TEXT,   -- 'canonical' | 'singleton' | compatibility tag
    std_order_num               INTEGER -- recomputed on every load
) STRICT;

CREATE INDEX IF NOT EXISTS idx_fk_script_code          ON code_point (script_code);
CREATE INDEX IF NOT EXISTS idx_general_category_code   ON code_point (general_category_code);
CREATE INDEX IF NOT EXISTS idx_code_point_text         ON code_point (text);

-- Decomposition facts are stable: rows are only ever inserted.
CREATE TABLE IF NOT EXISTS decomposition_mapping (
    code_point_id    INTEGER REFERENCES code_point (id),
    decomposition_id INTEGER REFERENCES code_point (id),
    order_num        INTEGER,   -- 1-based
    PRIMARY KEY (code_point_id, decomposition_id, order_num)
) STRICT;

CREATE TABLE IF NOT EXISTS derivation_type (
    id          INTEGER PRIMARY KEY,
    name        TEXT UNIQUE,
    description TEXT
) STRICT;

CREATE TABLE IF NOT EXISTS certainty_type (
    id          INTEGER PRIMARY KEY,
    name        TEXT UNIQUE,
    description TEXT
) STRICT;

-- A directed multigraph: one edge per (child, parent, type).
-- Cleared and rebuilt on every load.
CREATE TABLE IF NOT EXISTS code_point_derivation (
    child_id           INTEGER REFERENCES code_point (id),
    parent_id          INTEGER REFERENCES code_point (id),
    derivation_type_id INTEGER NOT NULL DEFAULT 1 REFERENCES derivation_type (id),
    certainty_type_id  INTEGER NOT NULL DEFAULT 6 REFERENCES certainty_type (id),
    source             TEXT,
    notes              TEXT,
    PRIMARY KEY (child_id, parent_id, derivation_type_id),
    CHECK (child_id != parent_id)
) STRICT;

CREATE INDEX IF NOT EXISTS idx_pk_inverse
    ON code_point_derivation (parent_id, child_id, derivation_type_id);

PRAGMA user_version = 1;
";
