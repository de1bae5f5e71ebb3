use anyhow::{Context, Result};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Executor, Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use shared::domain::{Goal, GoalIndex};

/// Ordered goal collection backed by SQLite.
///
/// Goals have no public identity. Their position in `list_goals` (insertion
/// order) is the only address, so update and delete resolve the position to a
/// row inside a single statement.
#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn list_goals(&self) -> Result<Vec<Goal>> {
        let rows = sqlx::query(
            "SELECT name, target_amount, current_amount, deadline FROM goals ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .context("failed to list goals")?;
        Ok(rows.iter().map(goal_from_row).collect())
    }

    /// Appends a goal and returns its position.
    pub async fn append_goal(&self, goal: &Goal) -> Result<GoalIndex> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "INSERT INTO goals (name, target_amount, current_amount, deadline) VALUES (?, ?, ?, ?)",
        )
        .bind(&goal.name)
        .bind(goal.target_amount)
        .bind(goal.current_amount)
        .bind(&goal.deadline)
        .execute(&mut *tx)
        .await
        .context("failed to insert goal")?;
        let count = count_goals(&mut *tx).await?;
        tx.commit().await?;
        Ok(GoalIndex(count.saturating_sub(1)))
    }

    /// Replaces the goal at `index`. Returns `false` when the position is out of range.
    pub async fn replace_goal_at(&self, index: GoalIndex, goal: &Goal) -> Result<bool> {
        let Some(offset) = sql_offset(index) else {
            return Ok(false);
        };
        let result = sqlx::query(
            r#"
            UPDATE goals
            SET name = ?1, target_amount = ?2, current_amount = ?3, deadline = ?4,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = (SELECT id FROM goals ORDER BY id ASC LIMIT 1 OFFSET ?5)
            "#,
        )
        .bind(&goal.name)
        .bind(goal.target_amount)
        .bind(goal.current_amount)
        .bind(&goal.deadline)
        .bind(offset)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to update goal at position {index}"))?;
        Ok(result.rows_affected() == 1)
    }

    /// Removes the goal at `index`. Returns `false` when the position is out of range.
    pub async fn remove_goal_at(&self, index: GoalIndex) -> Result<bool> {
        let Some(offset) = sql_offset(index) else {
            return Ok(false);
        };
        let result = sqlx::query(
            "DELETE FROM goals WHERE id = (SELECT id FROM goals ORDER BY id ASC LIMIT 1 OFFSET ?1)",
        )
        .bind(offset)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to delete goal at position {index}"))?;
        Ok(result.rows_affected() == 1)
    }
}

fn goal_from_row(row: &SqliteRow) -> Goal {
    Goal {
        name: row.get::<String, _>("name"),
        target_amount: row.get::<f64, _>("target_amount"),
        current_amount: row.get::<f64, _>("current_amount"),
        deadline: row.get::<String, _>("deadline"),
    }
}

async fn count_goals<'e, E>(executor: E) -> Result<usize>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM goals")
        .fetch_one(executor)
        .await
        .context("failed to count goals")?;
    Ok(usize::try_from(count).unwrap_or_default())
}

fn sql_offset(index: GoalIndex) -> Option<i64> {
    i64::try_from(index.0).ok()
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
