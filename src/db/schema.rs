//! Database schema and migrations for NetLink.
//!
//! Migrations are applied in order when the database is opened. The
//! schema_version table tracks which ones have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: users and connections
    r#"
CREATE TABLE users (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    name             TEXT NOT NULL,
    username         TEXT NOT NULL UNIQUE,
    email            TEXT NOT NULL UNIQUE,
    password         TEXT NOT NULL,           -- Argon2 hash
    profile_picture  TEXT NOT NULL DEFAULT '',
    banner_img       TEXT NOT NULL DEFAULT '',
    headline         TEXT NOT NULL DEFAULT 'NetLink User',
    location         TEXT NOT NULL DEFAULT 'Earth',
    about            TEXT NOT NULL DEFAULT 'Hi, I am using NetLink',
    skills           TEXT NOT NULL DEFAULT '[]',  -- JSON array of strings
    experience       TEXT NOT NULL DEFAULT '[]',  -- JSON array of entries
    education        TEXT NOT NULL DEFAULT '[]',  -- JSON array of entries
    created_at       TEXT NOT NULL,
    updated_at       TEXT NOT NULL
);

-- One row per direction; a connection between A and B is stored twice
CREATE TABLE user_connections (
    user_id        INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    connection_id  INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at     TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (user_id, connection_id),
    CHECK (user_id <> connection_id)
);

CREATE INDEX idx_user_connections_connection_id ON user_connections(connection_id);
"#,
    // v2: posts, likes and comments
    r#"
CREATE TABLE posts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    author_id   INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    content     TEXT NOT NULL,
    image_url   TEXT,
    image_id    TEXT,                     -- storage identifier of image_url
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE INDEX idx_posts_author_id ON posts(author_id);
CREATE INDEX idx_posts_created_at ON posts(created_at);

CREATE TABLE post_likes (
    post_id     INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
    user_id     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (post_id, user_id)
);

CREATE TABLE post_comments (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    post_id     INTEGER NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
    user_id     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    content     TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE INDEX idx_post_comments_post_id ON post_comments(post_id);
"#,
    // v3: notifications
    r#"
CREATE TABLE notifications (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    recipient_id     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    type             TEXT NOT NULL CHECK (type IN ('like', 'comment', 'connectionAccepted')),
    related_user_id  INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    related_post_id  INTEGER REFERENCES posts(id) ON DELETE SET NULL,
    read             INTEGER NOT NULL DEFAULT 0,
    created_at       TEXT NOT NULL,
    CHECK (recipient_id <> related_user_id)
);

CREATE INDEX idx_notifications_recipient_id ON notifications(recipient_id, created_at);
"#,
    // v4: storage IDs of profile images, so replaced files can be deleted
    r#"
ALTER TABLE users ADD COLUMN profile_picture_id TEXT;
ALTER TABLE users ADD COLUMN banner_img_id TEXT;
"#,
];
