use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    // Create the catalog tables on a fresh store. Existing tables are left
    // exactly as they are.
    ensure_schema(&db).await?;

    Ok(db)
}

async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let id_column = match backend {
        DatabaseBackend::Sqlite => "id INTEGER PRIMARY KEY AUTOINCREMENT",
        _ => "id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY",
    };

    let statements = [
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS videos (
                {id_column},
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                video_ref TEXT NOT NULL,
                section_title TEXT,
                duration TEXT,
                skill INTEGER NOT NULL DEFAULT 1,
                watched_fully BOOLEAN NOT NULL DEFAULT FALSE,
                ott BOOLEAN NOT NULL DEFAULT FALSE,
                app BOOLEAN NOT NULL DEFAULT FALSE,
                arg BOOLEAN NOT NULL DEFAULT FALSE,
                putt BOOLEAN NOT NULL DEFAULT FALSE
            )
            "#
        ),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS sections (
                {id_column},
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                skill TEXT NOT NULL DEFAULT ''
            )
            "#
        ),
        // No foreign keys: relation rows are allowed to outlive their video
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS tags (
                {id_column},
                video_id BIGINT NOT NULL,
                tag TEXT NOT NULL
            )
            "#
        ),
        r#"
        CREATE TABLE IF NOT EXISTS section_videos (
            section_id BIGINT NOT NULL,
            video_id BIGINT NOT NULL,
            PRIMARY KEY (section_id, video_id)
        )
        "#
        .to_owned(),
        "CREATE INDEX IF NOT EXISTS idx_tags_video_id ON tags (video_id)".to_owned(),
        "CREATE INDEX IF NOT EXISTS idx_section_videos_video_id ON section_videos (video_id)"
            .to_owned(),
    ];

    for sql in statements {
        db.execute(Statement::from_string(backend, sql)).await?;
    }

    tracing::debug!("Catalog schema ready ({:?})", backend);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_db_is_repeatable() {
        let db = init_db("sqlite::memory:").await.unwrap();
        ensure_schema(&db).await.unwrap();

        let row = db
            .query_one(Statement::from_string(
                DatabaseBackend::Sqlite,
                "SELECT COUNT(*) AS n FROM sqlite_master WHERE type = 'table' \
                 AND name IN ('videos', 'sections', 'tags', 'section_videos')"
                    .to_owned(),
            ))
            .await
            .unwrap()
            .unwrap();
        let n: i64 = row.try_get("", "n").unwrap();
        assert_eq!(n, 4);
    }
}
