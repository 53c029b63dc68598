use crate::core::distance::{calculate_bounding_box, haversine_distance, BoundingBox};
use crate::models::{JobId, JobPosting, JobStatus, SkillCategory, SkillRecord, WorkerId, WorkerProfile};
use crate::services::store::{MarketplaceStore, StoreError};
use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::Duration;

const JOB_COLUMNS: &str = r#"
    id, title, skill_required, skill_category::text AS skill_category,
    latitude::float8 AS latitude, longitude::float8 AS longitude,
    offered_price::float8 AS offered_price, is_urgent, status::text AS status
"#;

const WORKER_COLUMNS: &str = r#"
    id, name, latitude::float8 AS latitude, longitude::float8 AS longitude,
    trust_score::float8 AS trust_score, availability_status
"#;

/// PostgreSQL-backed marketplace store
///
/// Reads the `users`, `jobs` and `skills` tables owned by the marketplace
/// backend. Nearby queries pre-filter with a bounding box in SQL and apply
/// the exact haversine radius here, so rows outside the circle never reach
/// the matcher.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new store from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a new store from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }

    /// Load skills for many workers with one query
    async fn skills_for(&self, worker_ids: &[WorkerId]) -> Result<HashMap<WorkerId, Vec<SkillRecord>>, StoreError> {
        let mut by_worker: HashMap<WorkerId, Vec<SkillRecord>> = HashMap::new();
        if worker_ids.is_empty() {
            return Ok(by_worker);
        }

        let query = r#"
            SELECT user_id, skill_name, category::text AS category, experience_years
            FROM skills
            WHERE user_id = ANY($1)
            ORDER BY user_id, id
        "#;

        let rows = sqlx::query(query).bind(worker_ids).fetch_all(&self.pool).await?;

        for row in &rows {
            let user_id: i64 = row.try_get("user_id")?;
            by_worker.entry(user_id).or_default().push(skill_from_row(row)?);
        }

        Ok(by_worker)
    }
}

fn parse_category(value: &str) -> Result<SkillCategory, StoreError> {
    value
        .parse()
        .map_err(|e: crate::models::UnknownVariant| StoreError::InvalidRow(e.to_string()))
}

fn skill_from_row(row: &PgRow) -> Result<SkillRecord, StoreError> {
    let category: String = row.try_get("category")?;
    let experience_years: Option<i32> = row.try_get("experience_years")?;

    Ok(SkillRecord {
        skill_name: row.try_get("skill_name")?,
        category: parse_category(&category)?,
        // Negative experience is rejected upstream; treat it as unknown if it appears
        experience_years: experience_years.and_then(|years| u32::try_from(years).ok()),
    })
}

/// Decode a job row; a job stored without coordinates cannot be matched
fn job_from_row(row: &PgRow) -> Result<Option<JobPosting>, StoreError> {
    let id: i64 = row.try_get("id")?;
    let latitude: Option<f64> = row.try_get("latitude")?;
    let longitude: Option<f64> = row.try_get("longitude")?;

    let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
        tracing::warn!("Job {} has no coordinates, skipping", id);
        return Ok(None);
    };

    let skill_category: Option<String> = row.try_get("skill_category")?;
    let status: String = row.try_get("status")?;

    Ok(Some(JobPosting {
        id,
        title: row.try_get("title")?,
        skill_required: row.try_get("skill_required")?,
        skill_category: skill_category.as_deref().map(parse_category).transpose()?,
        latitude,
        longitude,
        offered_price: row.try_get("offered_price")?,
        is_urgent: row.try_get::<Option<bool>, _>("is_urgent")?.unwrap_or(false),
        status: status
            .parse::<JobStatus>()
            .map_err(|e| StoreError::InvalidRow(e.to_string()))?,
    }))
}

fn worker_from_row(row: &PgRow) -> Result<WorkerProfile, StoreError> {
    Ok(WorkerProfile {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
        trust_score: row.try_get::<Option<f64>, _>("trust_score")?.unwrap_or(0.0),
        availability: row.try_get::<Option<bool>, _>("availability_status")?.unwrap_or(false),
        skills: Vec::new(),
    })
}

/// Longitude condition over bind parameters `$3` (min) and `$4` (max)
fn longitude_filter(bbox: &BoundingBox) -> &'static str {
    if bbox.crosses_antimeridian() {
        "(longitude >= $3 OR longitude <= $4)"
    } else {
        "longitude BETWEEN $3 AND $4"
    }
}

fn sort_nearest<T>(items: &mut [(f64, T)]) {
    items.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
}

#[async_trait]
impl MarketplaceStore for PostgresStore {
    async fn find_job_by_id(&self, id: JobId) -> Result<Option<JobPosting>, StoreError> {
        let query = format!("SELECT {} FROM jobs WHERE id = $1", JOB_COLUMNS);

        let row = sqlx::query(&query).bind(id).fetch_optional(&self.pool).await?;

        match row {
            Some(row) => job_from_row(&row),
            None => Ok(None),
        }
    }

    async fn find_nearby_workers(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<WorkerProfile>, StoreError> {
        let bbox = calculate_bounding_box(latitude, longitude, radius_km);
        let query = format!(
            r#"
            SELECT {}
            FROM users
            WHERE user_type IN ('WORKER', 'BOTH')
              AND availability_status = true
              AND latitude IS NOT NULL AND longitude IS NOT NULL
              AND latitude BETWEEN $1 AND $2
              AND {}
            "#,
            WORKER_COLUMNS,
            longitude_filter(&bbox)
        );

        let rows = sqlx::query(&query)
            .bind(bbox.min_lat)
            .bind(bbox.max_lat)
            .bind(bbox.min_lon)
            .bind(bbox.max_lon)
            .fetch_all(&self.pool)
            .await?;

        let mut nearby = Vec::with_capacity(rows.len());
        for row in &rows {
            let worker = worker_from_row(row)?;
            if let Some((lat, lon)) = worker.location() {
                let distance = haversine_distance(latitude, longitude, lat, lon);
                if distance <= radius_km {
                    nearby.push((distance, worker));
                }
            }
        }
        sort_nearest(&mut nearby);

        let ids: Vec<WorkerId> = nearby.iter().map(|(_, worker)| worker.id).collect();
        let mut skills = self.skills_for(&ids).await?;

        tracing::debug!(
            "Nearby workers: {} in bounding box, {} within {}km",
            rows.len(),
            nearby.len(),
            radius_km
        );

        Ok(nearby
            .into_iter()
            .map(|(_, mut worker)| {
                worker.skills = skills.remove(&worker.id).unwrap_or_default();
                worker
            })
            .collect())
    }

    async fn find_worker_by_id(&self, id: WorkerId) -> Result<Option<WorkerProfile>, StoreError> {
        let query = format!("SELECT {} FROM users WHERE id = $1", WORKER_COLUMNS);

        let Some(row) = sqlx::query(&query).bind(id).fetch_optional(&self.pool).await? else {
            return Ok(None);
        };

        worker_from_row(&row).map(Some)
    }

    async fn find_skills_by_worker(&self, id: WorkerId) -> Result<Vec<SkillRecord>, StoreError> {
        let query = r#"
            SELECT skill_name, category::text AS category, experience_years
            FROM skills
            WHERE user_id = $1
            ORDER BY id
        "#;

        let rows = sqlx::query(query).bind(id).fetch_all(&self.pool).await?;

        rows.iter().map(skill_from_row).collect()
    }

    async fn find_nearby_jobs(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<JobPosting>, StoreError> {
        let bbox = calculate_bounding_box(latitude, longitude, radius_km);
        let query = format!(
            r#"
            SELECT {}
            FROM jobs
            WHERE latitude BETWEEN $1 AND $2
              AND {}
            "#,
            JOB_COLUMNS,
            longitude_filter(&bbox)
        );

        let rows = sqlx::query(&query)
            .bind(bbox.min_lat)
            .bind(bbox.max_lat)
            .bind(bbox.min_lon)
            .bind(bbox.max_lon)
            .fetch_all(&self.pool)
            .await?;

        let mut nearby = Vec::with_capacity(rows.len());
        for row in &rows {
            if let Some(job) = job_from_row(row)? {
                let distance = haversine_distance(latitude, longitude, job.latitude, job.longitude);
                if distance <= radius_km {
                    nearby.push((distance, job));
                }
            }
        }
        sort_nearest(&mut nearby);

        Ok(nearby.into_iter().map(|(_, job)| job).collect())
    }
}
