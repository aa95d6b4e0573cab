//! PostgreSQL-backed store. Entities are kept as JSONB documents keyed by
//! their identifiers; analyses get typed columns.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;

use crate::models::{AnalysisResult, Candidate, Job, Prospect};
use crate::records::dataset::Dataset;
use crate::store::{AnalysisStore, StoreError};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS candidates (
        id   TEXT PRIMARY KEY,
        data JSONB NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS jobs (
        code TEXT PRIMARY KEY,
        data JSONB NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS prospects (
        id             BIGSERIAL PRIMARY KEY,
        job_code       TEXT NOT NULL,
        candidate_code TEXT NOT NULL,
        data           JSONB NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS prospects_job_code_idx ON prospects (job_code)",
    r#"
    CREATE TABLE IF NOT EXISTS analyses (
        id           UUID PRIMARY KEY,
        job_code     TEXT NOT NULL,
        candidate_id TEXT NOT NULL,
        content      TEXT NOT NULL,
        file         TEXT NOT NULL,
        opinion      TEXT NOT NULL,
        name         TEXT NOT NULL,
        skills       TEXT[] NOT NULL,
        education    TEXT[] NOT NULL,
        languages    TEXT[] NOT NULL,
        score        DOUBLE PRECISION NOT NULL,
        created_at   TIMESTAMPTZ NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS analyses_job_code_idx ON analyses (job_code)",
];

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool and makes sure the tables exist.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        info!("Connecting to PostgreSQL...");
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        let store = Self::new(pool);
        store.ensure_schema().await?;
        info!("PostgreSQL store ready");
        Ok(store)
    }

    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Replaces stored candidates, jobs and prospects with a normalized snapshot.
    /// Analyses are left untouched.
    pub async fn import_dataset(&self, dataset: &Dataset) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        for candidate in &dataset.candidates {
            sqlx::query(
                "INSERT INTO candidates (id, data) VALUES ($1, $2)
                 ON CONFLICT (id) DO UPDATE SET data = EXCLUDED.data",
            )
            .bind(&candidate.id)
            .bind(Json(candidate))
            .execute(&mut *tx)
            .await?;
        }

        for job in &dataset.jobs {
            sqlx::query(
                "INSERT INTO jobs (code, data) VALUES ($1, $2)
                 ON CONFLICT (code) DO UPDATE SET data = EXCLUDED.data",
            )
            .bind(&job.code)
            .bind(Json(job))
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM prospects").execute(&mut *tx).await?;
        for prospect in &dataset.prospects {
            sqlx::query("INSERT INTO prospects (job_code, candidate_code, data) VALUES ($1, $2, $3)")
                .bind(&prospect.job_code)
                .bind(&prospect.candidate_code)
                .bind(Json(prospect))
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        info!(
            candidates = dataset.candidates.len(),
            jobs = dataset.jobs.len(),
            prospects = dataset.prospects.len(),
            "Dataset imported into PostgreSQL"
        );
        Ok(())
    }
}

#[async_trait]
impl AnalysisStore for PgStore {
    async fn get_jobs(&self) -> Result<Vec<Job>, StoreError> {
        let rows = sqlx::query_scalar::<_, Json<Job>>("SELECT data FROM jobs ORDER BY code")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|Json(job)| job).collect())
    }

    async fn get_job(&self, job_code: &str) -> Result<Option<Job>, StoreError> {
        let row = sqlx::query_scalar::<_, Json<Job>>("SELECT data FROM jobs WHERE code = $1")
            .bind(job_code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|Json(job)| job))
    }

    async fn get_candidates(&self, job_code: &str) -> Result<Vec<Candidate>, StoreError> {
        let rows = sqlx::query_scalar::<_, Json<Candidate>>(
            r#"
            SELECT c.data
            FROM candidates c
            JOIN (
                SELECT candidate_code, MIN(id) AS first_seen
                FROM prospects
                WHERE job_code = $1
                GROUP BY candidate_code
            ) p ON p.candidate_code = c.id
            ORDER BY p.first_seen
            "#,
        )
        .bind(job_code)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|Json(c)| c).collect())
    }

    async fn get_all_candidates(&self) -> Result<Vec<Candidate>, StoreError> {
        let rows = sqlx::query_scalar::<_, Json<Candidate>>("SELECT data FROM candidates ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|Json(c)| c).collect())
    }

    async fn get_prospects(&self, job_code: &str) -> Result<Vec<Prospect>, StoreError> {
        let rows = sqlx::query_scalar::<_, Json<Prospect>>(
            "SELECT data FROM prospects WHERE job_code = $1 ORDER BY id",
        )
        .bind(job_code)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|Json(p)| p).collect())
    }

    async fn insert_analysis(&self, analysis: &AnalysisResult) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO analyses
                (id, job_code, candidate_id, content, file, opinion, name,
                 skills, education, languages, score, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(analysis.id)
        .bind(&analysis.job_code)
        .bind(&analysis.candidate_id)
        .bind(&analysis.content)
        .bind(&analysis.file)
        .bind(&analysis.opinion)
        .bind(&analysis.name)
        .bind(&analysis.skills)
        .bind(&analysis.education)
        .bind(&analysis.languages)
        .bind(analysis.score)
        .bind(analysis.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_analyses(&self, job_code: &str) -> Result<Vec<AnalysisResult>, StoreError> {
        let rows = sqlx::query_as::<_, AnalysisResult>(
            "SELECT * FROM analyses WHERE job_code = $1 ORDER BY created_at",
        )
        .bind(job_code)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn insert_candidate(&self, candidate: Candidate) -> Result<(), StoreError> {
        let result = sqlx::query(
            "INSERT INTO candidates (id, data) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING",
        )
        .bind(&candidate.id)
        .bind(Json(&candidate))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Duplicate {
                entity: "candidate",
                id: candidate.id,
            });
        }
        Ok(())
    }

    async fn update_candidate(&self, candidate: Candidate) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE candidates SET data = $2 WHERE id = $1")
            .bind(&candidate.id)
            .bind(Json(&candidate))
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "candidate",
                id: candidate.id,
            });
        }
        Ok(())
    }
}
