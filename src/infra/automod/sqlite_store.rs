// SQLite-backed store for guild auto-mod configs and member warnings.
//
// Tables:
// - guild_configs: One JSON config document per guild
// - member_warnings: One row per warning, insertion order = warning order

use crate::core::automod::{GuildConfig, GuildConfigStore};
use crate::core::platform::MemberRef;
use crate::core::storage::StoreError;
use crate::core::warnings::{MemberRecord, MemberStore, Warning};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Row, Sqlite};
use std::path::Path;

pub struct SqliteAutoModStore {
    pool: Pool<Sqlite>,
}

fn storage_error(e: sqlx::Error) -> StoreError {
    StoreError::Storage(e.to_string())
}

impl SqliteAutoModStore {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure the file exists if it's a file path
        let path_str = database_url.trim_start_matches("sqlite://");
        if !database_url.contains(":memory:") && !Path::new(path_str).exists() {
            if let Some(parent) = Path::new(path_str).parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::File::create(path_str)?;
        }

        let conn_str = if database_url.starts_with("sqlite:") {
            database_url.to_string()
        } else {
            format!("sqlite://{}", database_url)
        };

        let pool = SqlitePoolOptions::new().connect(&conn_str).await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS guild_configs (
                guild_id INTEGER PRIMARY KEY,
                config TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS member_warnings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                guild_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                reason TEXT NOT NULL,
                instigator_id INTEGER NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_member_warnings_member
                ON member_warnings(guild_id, user_id, id);
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn count_warnings<'e, E>(
        executor: E,
        guild_id: u64,
        user_id: u64,
    ) -> Result<usize, StoreError>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM member_warnings WHERE guild_id = ? AND user_id = ?",
        )
        .bind(guild_id as i64)
        .bind(user_id as i64)
        .fetch_one(executor)
        .await
        .map_err(storage_error)?;

        Ok(count.max(0) as usize)
    }
}

#[async_trait]
impl GuildConfigStore for SqliteAutoModStore {
    async fn get_config(&self, guild_id: u64) -> Result<GuildConfig, StoreError> {
        let row = sqlx::query("SELECT config FROM guild_configs WHERE guild_id = ?")
            .bind(guild_id as i64)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

        match row {
            Some(row) => {
                let json: String = row.get("config");
                let mut config: GuildConfig = serde_json::from_str(&json)?;
                config.guild_id = guild_id;
                Ok(config)
            }
            None => Ok(GuildConfig::new(guild_id)),
        }
    }

    async fn save_config(&self, config: GuildConfig) -> Result<(), StoreError> {
        let json = serde_json::to_string(&config)?;

        sqlx::query(
            r#"
            INSERT INTO guild_configs (guild_id, config)
            VALUES (?, ?)
            ON CONFLICT(guild_id) DO UPDATE SET config = excluded.config
            "#,
        )
        .bind(config.guild_id as i64)
        .bind(json)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(())
    }
}

#[async_trait]
impl MemberStore for SqliteAutoModStore {
    async fn get_member(&self, member: &MemberRef) -> Result<MemberRecord, StoreError> {
        if member.user.bot {
            return Err(StoreError::BotAccount(member.user.id));
        }

        let rows = sqlx::query(
            r#"
            SELECT reason, instigator_id, created_at
            FROM member_warnings
            WHERE guild_id = ? AND user_id = ?
            ORDER BY id ASC
            "#,
        )
        .bind(member.guild_id as i64)
        .bind(member.user.id as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        let mut record = MemberRecord::new(member);
        for row in rows {
            let created_at: String = row.get("created_at");
            let at = DateTime::parse_from_rfc3339(&created_at)
                .map_err(|e| StoreError::Storage(format!("bad warning timestamp: {e}")))?
                .with_timezone(&Utc);

            record.warnings.push(Warning {
                reason: row.get("reason"),
                instigator_id: row.get::<i64, _>("instigator_id") as u64,
                at,
            });
        }

        Ok(record)
    }

    async fn save_member(&self, record: MemberRecord) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        // Rows are append-only; only warnings past the stored count are new.
        let stored = Self::count_warnings(&mut *tx, record.guild_id, record.user_id).await?;
        if record.warnings.len() < stored {
            return Err(StoreError::WarningsShrunk(record.user_id));
        }

        for warning in &record.warnings[stored..] {
            insert_warning(&mut tx, record.guild_id, record.user_id, warning).await?;
        }

        tx.commit().await.map_err(storage_error)?;
        Ok(())
    }

    async fn append_warning(
        &self,
        member: &MemberRef,
        warning: Warning,
    ) -> Result<usize, StoreError> {
        if member.user.bot {
            return Err(StoreError::BotAccount(member.user.id));
        }

        let mut tx = self.pool.begin().await.map_err(storage_error)?;
        insert_warning(&mut tx, member.guild_id, member.user.id, &warning).await?;
        let count = Self::count_warnings(&mut *tx, member.guild_id, member.user.id).await?;
        tx.commit().await.map_err(storage_error)?;

        Ok(count)
    }
}

async fn insert_warning(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    guild_id: u64,
    user_id: u64,
    warning: &Warning,
) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        INSERT INTO member_warnings (guild_id, user_id, reason, instigator_id, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(guild_id as i64)
    .bind(user_id as i64)
    .bind(&warning.reason)
    .bind(warning.instigator_id as i64)
    .bind(warning.at.to_rfc3339())
    .execute(&mut **tx)
    .await
    .map_err(storage_error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::automod::PolicyKind;
    use crate::core::platform::UserRef;
    use tempfile::TempDir;

    async fn open(dir: &TempDir) -> SqliteAutoModStore {
        let path = dir.path().join("automod.db");
        SqliteAutoModStore::new(path.to_str().unwrap()).await.unwrap()
    }

    fn warning(reason: &str, instigator_id: u64) -> Warning {
        Warning {
            reason: reason.to_string(),
            instigator_id,
            at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_config_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = open(&dir).await;
            assert_eq!(store.get_config(10).await.unwrap(), GuildConfig::new(10));

            let mut config = GuildConfig::new(10);
            config
                .auto_mod
                .set_filters(vec![PolicyKind::BadWord, PolicyKind::parse("LinkSpam2")]);
            config.auto_mod.auto_warn_users = true;
            config.auto_mod.ban_words = vec!["idiot".to_string()];
            store.save_config(config).await.unwrap();
        }

        let store = open(&dir).await;
        let config = store.get_config(10).await.unwrap();
        assert_eq!(config.auto_mod.filters.len(), 2);
        assert_eq!(config.auto_mod.filters[0], PolicyKind::BadWord);
        assert!(!config.auto_mod.filters[1].is_known());
        assert!(config.auto_mod.auto_warn_users);
        assert_eq!(config.auto_mod.ban_words, vec!["idiot".to_string()]);
    }

    #[tokio::test]
    async fn test_warnings_append_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir).await;
        let member = MemberRef::new(1, UserRef::new(2, "user"));
        let other_guild = MemberRef::new(9, UserRef::new(2, "user"));

        assert_eq!(
            store.append_warning(&member, warning("first", 7)).await.unwrap(),
            1
        );
        assert_eq!(
            store.append_warning(&member, warning("second", 8)).await.unwrap(),
            2
        );
        assert_eq!(
            store
                .append_warning(&other_guild, warning("elsewhere", 7))
                .await
                .unwrap(),
            1
        );

        let record = store.get_member(&member).await.unwrap();
        let reasons: Vec<&str> = record.warnings.iter().map(|w| w.reason.as_str()).collect();
        assert_eq!(reasons, vec!["first", "second"]);
        assert_eq!(record.warnings[1].instigator_id, 8);
    }

    #[tokio::test]
    async fn test_save_member_appends_only_new_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir).await;
        let member = MemberRef::new(1, UserRef::new(3, "user"));

        let mut record = store.get_member(&member).await.unwrap();
        record.warnings.push(warning("a", 1));
        store.save_member(record.clone()).await.unwrap();

        record.warnings.push(warning("b", 1));
        store.save_member(record.clone()).await.unwrap();
        assert_eq!(store.get_member(&member).await.unwrap().warning_count(), 2);

        record.warnings.clear();
        assert!(matches!(
            store.save_member(record).await,
            Err(StoreError::WarningsShrunk(3))
        ));
    }

    #[tokio::test]
    async fn test_bots_have_no_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = open(&dir).await;
        let bot = MemberRef::new(1, UserRef::bot(4, "bot"));

        assert!(matches!(
            store.get_member(&bot).await,
            Err(StoreError::BotAccount(4))
        ));
    }
}
