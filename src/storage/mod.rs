//! Persistence layer.
//!
//! SQLite-backed store for players and rounds behind the `RoundStore`
//! trait. The handicap engine never touches this module; it only ever
//! sees the `Vec<Round>` a store returns, so the store is the single
//! place that owns row lifecycle (create, list, delete).

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};
use uuid::Uuid;

use crate::types::{NewPlayer, NewRound, Player, Round, TrackerError};

/// Data-access seam consumed by the API layer.
///
/// "All rounds for player X" is the only query shape the handicap
/// engine needs; the rest is plain CRUD.
#[async_trait]
pub trait RoundStore: Send + Sync {
    async fn create_player(&self, new: NewPlayer) -> Result<Player, TrackerError>;
    async fn list_players(&self) -> Result<Vec<Player>, TrackerError>;
    async fn get_player(&self, id: &str) -> Result<Player, TrackerError>;
    async fn delete_player(&self, id: &str) -> Result<(), TrackerError>;

    async fn create_round(&self, new: NewRound) -> Result<Round, TrackerError>;
    async fn get_round(&self, id: &str) -> Result<Round, TrackerError>;
    async fn delete_round(&self, id: &str) -> Result<(), TrackerError>;

    /// All rounds for one player, newest first. The handicap engine
    /// re-sorts internally, so the order here only serves table views.
    async fn rounds_for_player(&self, player_id: &str) -> Result<Vec<Round>, TrackerError>;
}

/// SQLite-backed implementation of [`RoundStore`].
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connect to the given SQLite URL and run embedded migrations.
    ///
    /// Use `sqlite://path?mode=rwc` for a file-backed database.
    pub async fn connect(url: &str) -> Result<Self, TrackerError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| TrackerError::Storage(e.to_string()))?;

        info!(url, "Connected to database");
        Ok(Self { pool })
    }

    /// In-memory database for tests. A single connection keeps every
    /// query on the same in-memory instance.
    pub async fn in_memory() -> Result<Self, TrackerError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| TrackerError::Storage(e.to_string()))?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl RoundStore for SqliteStore {
    async fn create_player(&self, new: NewPlayer) -> Result<Player, TrackerError> {
        let player = Player {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            email: new.email,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"INSERT INTO players (id, name, email, created_at)
               VALUES (?, ?, ?, ?)"#,
        )
        .bind(&player.id)
        .bind(&player.name)
        .bind(&player.email)
        .bind(player.created_at)
        .execute(&self.pool)
        .await?;

        debug!(player_id = %player.id, name = %player.name, "Player created");
        Ok(player)
    }

    async fn list_players(&self) -> Result<Vec<Player>, TrackerError> {
        let players: Vec<Player> = sqlx::query_as(
            r#"SELECT id, name, email, created_at FROM players ORDER BY created_at"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(players)
    }

    async fn get_player(&self, id: &str) -> Result<Player, TrackerError> {
        let player: Option<Player> = sqlx::query_as(
            r#"SELECT id, name, email, created_at FROM players WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        player.ok_or_else(|| TrackerError::PlayerNotFound(id.to_string()))
    }

    async fn delete_player(&self, id: &str) -> Result<(), TrackerError> {
        let result = sqlx::query(r#"DELETE FROM players WHERE id = ?"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TrackerError::PlayerNotFound(id.to_string()));
        }
        debug!(player_id = id, "Player deleted");
        Ok(())
    }

    async fn create_round(&self, new: NewRound) -> Result<Round, TrackerError> {
        new.validate()?;
        // Look up the player first so an unknown id surfaces as
        // not-found instead of a foreign key constraint error.
        let player = self.get_player(&new.player_id).await?;

        let round = Round {
            id: Uuid::new_v4().to_string(),
            player_id: player.id,
            date: new.date,
            course: new.course,
            tee: new.tee,
            rating: new.rating,
            slope: new.slope,
            score: new.score,
        };

        sqlx::query(
            r#"INSERT INTO rounds (id, player_id, date, course, tee, rating, slope, score)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&round.id)
        .bind(&round.player_id)
        .bind(round.date)
        .bind(&round.course)
        .bind(&round.tee)
        .bind(round.rating)
        .bind(round.slope)
        .bind(round.score)
        .execute(&self.pool)
        .await?;

        debug!(
            round_id = %round.id,
            player_id = %round.player_id,
            score = round.score,
            "Round created"
        );
        Ok(round)
    }

    async fn get_round(&self, id: &str) -> Result<Round, TrackerError> {
        let round: Option<Round> = sqlx::query_as(
            r#"SELECT id, player_id, date, course, tee, rating, slope, score
               FROM rounds WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        round.ok_or_else(|| TrackerError::RoundNotFound(id.to_string()))
    }

    async fn delete_round(&self, id: &str) -> Result<(), TrackerError> {
        let result = sqlx::query(r#"DELETE FROM rounds WHERE id = ?"#)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TrackerError::RoundNotFound(id.to_string()));
        }
        debug!(round_id = id, "Round deleted");
        Ok(())
    }

    async fn rounds_for_player(&self, player_id: &str) -> Result<Vec<Round>, TrackerError> {
        let rounds: Vec<Round> = sqlx::query_as(
            r#"SELECT id, player_id, date, course, tee, rating, slope, score
               FROM rounds WHERE player_id = ? ORDER BY date DESC"#,
        )
        .bind(player_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rounds)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
