use std::collections::BTreeSet;

use deadpool_postgres::PoolError;
use thiserror::Error;
use tokio_postgres::{Error as PgError, Row};
use tracing::instrument;

use crate::{Company, JobId, JobOpening, SalaryRange, db::PgPool};

#[derive(Debug, Error)]
pub enum JobOpeningFetchError {
    #[error("failed to get postgres connection: {0}")]
    Pool(#[from] PoolError),
    #[error("postgres error: {0}")]
    Postgres(#[from] PgError),
}

// job_openings is owned by the posting ingestion service; read-only here.
const SELECT_COLUMNS: &str = "SELECT
        id,
        company_name,
        company_industry,
        company_location,
        position,
        salary_min,
        salary_max,
        required_skills,
        requirements,
        benefits
    FROM job_openings";

#[instrument(skip(pool))]
pub async fn fetch_open_job_openings(pool: &PgPool) -> Result<Vec<JobOpening>, JobOpeningFetchError> {
    let client = pool.get().await?;
    let stmt = client
        .prepare_cached(&format!("{SELECT_COLUMNS} WHERE is_open ORDER BY id"))
        .await?;

    let rows = client.query(&stmt, &[]).await?;
    rows.iter()
        .map(opening_from_row)
        .collect::<Result<Vec<_>, _>>()
        .map_err(JobOpeningFetchError::from)
}

#[instrument(skip(pool))]
pub async fn fetch_job_opening(
    pool: &PgPool,
    id: JobId,
) -> Result<Option<JobOpening>, JobOpeningFetchError> {
    let client = pool.get().await?;
    let stmt = client
        .prepare_cached(&format!("{SELECT_COLUMNS} WHERE id = $1"))
        .await?;

    let row = client.query_opt(&stmt, &[&id]).await?;
    Ok(row.as_ref().map(opening_from_row).transpose()?)
}

fn opening_from_row(row: &Row) -> Result<JobOpening, PgError> {
    let text = |column: &str| -> Result<String, PgError> {
        Ok(row.try_get::<_, Option<String>>(column)?.unwrap_or_default())
    };
    let list = |column: &str| -> Result<Vec<String>, PgError> {
        Ok(row.try_get::<_, Option<Vec<String>>>(column)?.unwrap_or_default())
    };

    Ok(JobOpening {
        id: row.try_get("id")?,
        company: Company {
            name: text("company_name")?,
            industry: text("company_industry")?,
            location: text("company_location")?,
        },
        position: text("position")?,
        salary_range: SalaryRange {
            min: row.try_get("salary_min")?,
            max: row.try_get("salary_max")?,
        },
        required_skills: list("required_skills")?.into_iter().collect::<BTreeSet<_>>(),
        requirements: list("requirements")?,
        benefits: list("benefits")?,
    })
}
