//! SQL schema for the rateme SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Identity columns are written once; every other column is derived and
-- written only together with the fact that changes it.
CREATE TABLE IF NOT EXISTS people (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    name            TEXT    NOT NULL,
    description     TEXT    NOT NULL,
    category        TEXT    NOT NULL,   -- Category::as_str
    image_url       TEXT    NOT NULL,
    average_rating  REAL    NOT NULL DEFAULT 0,
    rating_count    INTEGER NOT NULL DEFAULT 0,
    comments_count  INTEGER NOT NULL DEFAULT 0,
    facemash_wins   INTEGER NOT NULL DEFAULT 0,
    facemash_losses INTEGER NOT NULL DEFAULT 0,
    view_count      INTEGER NOT NULL DEFAULT 0,
    is_verified     INTEGER NOT NULL DEFAULT 0,
    created_at      TEXT    NOT NULL    -- RFC 3339 UTC; server-assigned
);

-- Fact tables are strictly append-only.
-- No UPDATE or DELETE is ever issued against them.
CREATE TABLE IF NOT EXISTS ratings (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    person_id  INTEGER NOT NULL REFERENCES people(id),
    rating     INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
    created_at TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS comments (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    person_id  INTEGER NOT NULL REFERENCES people(id),
    content    TEXT    NOT NULL CHECK (length(content) > 0),
    created_at TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS facemash_votes (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    winner_id  INTEGER NOT NULL REFERENCES people(id),
    loser_id   INTEGER NOT NULL REFERENCES people(id),
    created_at TEXT    NOT NULL,
    CHECK (winner_id != loser_id)
);

CREATE INDEX IF NOT EXISTS people_category_idx ON people(category);
CREATE INDEX IF NOT EXISTS ratings_person_idx  ON ratings(person_id);
CREATE INDEX IF NOT EXISTS comments_person_idx ON comments(person_id);

PRAGMA user_version = 1;
";
