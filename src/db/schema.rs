//! Database schema and migrations for Estate.
//!
//! Migrations are applied sequentially when the database is first opened
//! or upgraded.

/// Database migrations.
///
/// Each migration is a SQL script that will be executed in order.
/// The schema_version table tracks which migrations have been applied.
pub const MIGRATIONS: &[&str] = &[
    // v1: Users (credential records)
    r#"
CREATE TABLE users (
    id          TEXT PRIMARY KEY,          -- UUID v4
    name        TEXT NOT NULL,
    email       TEXT NOT NULL,
    password    TEXT NOT NULL,             -- Argon2id PHC string
    phone       TEXT NOT NULL,
    role        TEXT NOT NULL,             -- 'tenant', 'landlord', 'broker', 'admin'
    created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE UNIQUE INDEX idx_users_email ON users(email COLLATE NOCASE);
CREATE INDEX idx_users_role ON users(role);
"#,
    // v2: Property listings
    r#"
CREATE TABLE listings (
    id              TEXT PRIMARY KEY,      -- UUID v4
    owner_id        TEXT NOT NULL REFERENCES users(id),
    title           TEXT NOT NULL,
    description     TEXT NOT NULL,
    region          TEXT NOT NULL,
    district        TEXT NOT NULL,
    address         TEXT NOT NULL,
    property_type   TEXT NOT NULL,         -- 'house', 'apartment', 'condo', 'land', 'commercial'
    rent_price      REAL,
    purchase_price  REAL,
    photos          TEXT NOT NULL DEFAULT '[]',  -- JSON array of public paths
    videos          TEXT NOT NULL DEFAULT '[]',  -- JSON array of public paths
    latitude        REAL,
    longitude       REAL,
    status          TEXT NOT NULL DEFAULT 'available',
    created_at      TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE INDEX idx_listings_created_at ON listings(created_at);
CREATE INDEX idx_listings_owner ON listings(owner_id);
CREATE INDEX idx_listings_type ON listings(property_type);
"#,
];
