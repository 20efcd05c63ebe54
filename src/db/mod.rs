//! Database module for SQLite/PostgreSQL persistence using SeaORM

pub mod dialect;
pub mod entities;

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

/// Initialize database connection and create tables
pub async fn init_database(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    tracing::info!("Connecting to database: {}", db_url);

    let db = Database::connect(db_url).await?;

    create_tables(&db).await?;

    Ok(db)
}

/// Create all tables if they don't exist
async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Content nodes table; lft/rght/tree_id/level hold the nested-set
    // encoding maintained by the import pipeline.
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS content_node (
            id TEXT PRIMARY KEY,
            parent_id TEXT,
            channel_id TEXT NOT NULL,
            content_id TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT,
            kind TEXT NOT NULL,
            available BOOLEAN NOT NULL DEFAULT FALSE,
            lft BIGINT NOT NULL,
            rght BIGINT NOT NULL,
            tree_id INTEGER NOT NULL,
            level INTEGER NOT NULL,
            coach_content BOOLEAN NOT NULL DEFAULT FALSE,
            num_coach_contents INTEGER NOT NULL DEFAULT 0,
            on_device_resources INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY (parent_id) REFERENCES content_node(id) ON DELETE CASCADE
        )
        "#.to_string(),
    )).await?;

    // Indexes for tree-ordered reads and per-channel annotation queries
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"CREATE INDEX IF NOT EXISTS idx_content_node_tree ON content_node(tree_id, lft)"#.to_string(),
    )).await?;
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"CREATE INDEX IF NOT EXISTS idx_content_node_content_id ON content_node(content_id)"#.to_string(),
    )).await?;
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"CREATE INDEX IF NOT EXISTS idx_content_node_level_channel_kind ON content_node(level, channel_id, kind)"#.to_string(),
    )).await?;
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"CREATE INDEX IF NOT EXISTS idx_content_node_level_channel_available ON content_node(level, channel_id, available)"#.to_string(),
    )).await?;

    // Local files table (content blobs addressed by hash)
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS local_file (
            id TEXT PRIMARY KEY,
            extension TEXT NOT NULL,
            available BOOLEAN NOT NULL DEFAULT FALSE,
            file_size BIGINT
        )
        "#.to_string(),
    )).await?;

    // Files table (node asset records referencing shared local files)
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS file (
            id TEXT PRIMARY KEY,
            contentnode_id TEXT NOT NULL,
            local_file_id TEXT NOT NULL,
            preset TEXT NOT NULL,
            lang_id TEXT,
            supplementary BOOLEAN NOT NULL DEFAULT FALSE,
            thumbnail BOOLEAN NOT NULL DEFAULT FALSE,
            priority INTEGER,
            FOREIGN KEY (contentnode_id) REFERENCES content_node(id) ON DELETE CASCADE,
            FOREIGN KEY (local_file_id) REFERENCES local_file(id)
        )
        "#.to_string(),
    )).await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"CREATE INDEX IF NOT EXISTS idx_file_contentnode ON file(contentnode_id)"#.to_string(),
    )).await?;
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"CREATE INDEX IF NOT EXISTS idx_file_local_file ON file(local_file_id)"#.to_string(),
    )).await?;

    // Languages table
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS language (
            id TEXT PRIMARY KEY,
            lang_code TEXT NOT NULL,
            lang_subcode TEXT,
            lang_name TEXT,
            lang_direction TEXT NOT NULL DEFAULT 'ltr'
        )
        "#.to_string(),
    )).await?;

    // Channel metadata table
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS channel_metadata (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            author TEXT NOT NULL DEFAULT '',
            version INTEGER NOT NULL DEFAULT 0,
            thumbnail TEXT,
            root_id TEXT NOT NULL,
            last_updated TEXT,
            published_size BIGINT NOT NULL DEFAULT 0,
            total_resource_count INTEGER NOT NULL DEFAULT 0,
            position INTEGER NOT NULL DEFAULT 0,
            public BOOLEAN
        )
        "#.to_string(),
    )).await?;

    // Channel included-languages join table
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS channel_language (
            channel_id TEXT NOT NULL,
            language_id TEXT NOT NULL,
            PRIMARY KEY (channel_id, language_id),
            FOREIGN KEY (channel_id) REFERENCES channel_metadata(id) ON DELETE CASCADE,
            FOREIGN KEY (language_id) REFERENCES language(id) ON DELETE CASCADE
        )
        "#.to_string(),
    )).await?;

    // Content tags and node-tag join table
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS content_tag (
            id TEXT PRIMARY KEY,
            tag_name TEXT NOT NULL
        )
        "#.to_string(),
    )).await?;
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS node_tag (
            node_id TEXT NOT NULL,
            tag_id TEXT NOT NULL,
            PRIMARY KEY (node_id, tag_id),
            FOREIGN KEY (node_id) REFERENCES content_node(id) ON DELETE CASCADE,
            FOREIGN KEY (tag_id) REFERENCES content_tag(id) ON DELETE CASCADE
        )
        "#.to_string(),
    )).await?;

    // Prerequisite and related-content edges
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS node_prerequisite (
            node_id TEXT NOT NULL,
            prerequisite_id TEXT NOT NULL,
            PRIMARY KEY (node_id, prerequisite_id),
            FOREIGN KEY (node_id) REFERENCES content_node(id) ON DELETE CASCADE,
            FOREIGN KEY (prerequisite_id) REFERENCES content_node(id) ON DELETE CASCADE
        )
        "#.to_string(),
    )).await?;
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS node_related (
            node_id TEXT NOT NULL,
            related_id TEXT NOT NULL,
            PRIMARY KEY (node_id, related_id),
            FOREIGN KEY (node_id) REFERENCES content_node(id) ON DELETE CASCADE,
            FOREIGN KEY (related_id) REFERENCES content_node(id) ON DELETE CASCADE
        )
        "#.to_string(),
    )).await?;

    // Assessment metadata table
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS assessment_metadata (
            id TEXT PRIMARY KEY,
            contentnode_id TEXT NOT NULL,
            assessment_item_ids TEXT NOT NULL DEFAULT '[]',
            number_of_assessments INTEGER NOT NULL DEFAULT 0,
            mastery_model TEXT NOT NULL DEFAULT '{}',
            randomize BOOLEAN NOT NULL DEFAULT FALSE,
            is_manipulable BOOLEAN NOT NULL DEFAULT FALSE,
            FOREIGN KEY (contentnode_id) REFERENCES content_node(id) ON DELETE CASCADE
        )
        "#.to_string(),
    )).await?;

    tracing::info!("Database tables initialized");
    Ok(())
}
