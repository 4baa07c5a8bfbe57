pub mod job_openings;
pub mod pool;

pub use job_openings::{JobOpeningFetchError, fetch_job_opening, fetch_open_job_openings};
pub use pool::{DbPoolError, PgPool, PoolSettings, create_pool_from_url};
