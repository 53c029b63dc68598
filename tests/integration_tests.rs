// Integration tests for Workwise Match

use async_trait::async_trait;
use std::sync::Arc;
use workwise_match::models::{
    JobId, JobPosting, JobRecommendationsResponse, JobStatus, SkillCategory, SkillRecord,
    WorkerId, WorkerMatchesResponse, WorkerProfile,
};
use workwise_match::services::{CachedStore, InMemoryStore, MarketplaceStore, StoreError};
use workwise_match::{EngineError, MatchingEngine};

const BASE_LAT: f64 = 12.97;
const BASE_LON: f64 = 77.59;
const KM_PER_DEGREE_LAT: f64 = 111.194_93;

const MATCH_JOB: JobId = 1;
const INVALID_JOB: JobId = 2;
const SKILLED_WORKER: WorkerId = 500;
const UNSKILLED_WORKER: WorkerId = 501;
const UNLOCATED_WORKER: WorkerId = 502;

fn north(km: f64) -> f64 {
    BASE_LAT + km / KM_PER_DEGREE_LAT
}

fn create_test_worker(id: WorkerId, km: f64, skills: Vec<SkillRecord>) -> WorkerProfile {
    WorkerProfile {
        id,
        name: format!("Worker {}", id),
        latitude: Some(north(km)),
        longitude: Some(BASE_LON),
        trust_score: 3.5,
        availability: true,
        skills,
    }
}

fn create_test_job(id: JobId, km: f64, skill_required: &str, category: SkillCategory) -> JobPosting {
    JobPosting {
        id,
        title: format!("Job {}", id),
        skill_required: skill_required.to_string(),
        skill_category: Some(category),
        latitude: north(km),
        longitude: BASE_LON,
        offered_price: Some(800.0),
        is_urgent: false,
        status: JobStatus::Posted,
    }
}

fn electrician(id: WorkerId, km: f64) -> WorkerProfile {
    create_test_worker(
        id,
        km,
        vec![SkillRecord::new("Electrical", SkillCategory::Electrical, Some(4))],
    )
}

/// Thirty electricians within 21km, plus workers that must never be ranked
fn create_marketplace() -> InMemoryStore {
    let mut workers: Vec<WorkerProfile> = (1..=30).map(|i| electrician(i, i as f64 * 0.7)).collect();

    // Scores 0.20: below the worker threshold
    workers.push(WorkerProfile {
        trust_score: 0.0,
        ..create_test_worker(90, 20.0, vec![SkillRecord::new("Cooking", SkillCategory::Cooking, Some(0))])
    });
    // Outside the 25km candidate radius
    workers.push(electrician(91, 40.0));
    // Not available
    workers.push(WorkerProfile {
        availability: false,
        ..electrician(92, 1.0)
    });

    workers.push(electrician(SKILLED_WORKER, 0.0));
    workers.push(create_test_worker(UNSKILLED_WORKER, 0.0, vec![]));
    workers.push(WorkerProfile {
        latitude: None,
        longitude: None,
        ..electrician(UNLOCATED_WORKER, 0.0)
    });

    let mut jobs = vec![create_test_job(MATCH_JOB, 0.0, "Electrical Wiring", SkillCategory::Electrical)];
    jobs.push(JobPosting {
        latitude: f64::NAN,
        ..create_test_job(INVALID_JOB, 0.0, "Electrical Wiring", SkillCategory::Electrical)
    });
    for i in 0..20 {
        jobs.push(create_test_job(100 + i, 1.0 + i as f64 * 1.3, "Electrical Repair", SkillCategory::Electrical));
    }
    // Already assigned
    jobs.push(JobPosting {
        status: JobStatus::WorkerAssigned,
        ..create_test_job(150, 0.5, "Electrical Repair", SkillCategory::Electrical)
    });
    // Scores 0.15: below the job threshold
    jobs.push(JobPosting {
        offered_price: None,
        ..create_test_job(151, 25.0, "Cooking", SkillCategory::Cooking)
    });
    // Outside the 30km candidate radius
    jobs.push(create_test_job(152, 45.0, "Electrical Repair", SkillCategory::Electrical));

    InMemoryStore::from_snapshot(workers, jobs)
}

fn create_engine() -> MatchingEngine<InMemoryStore> {
    MatchingEngine::with_defaults(create_marketplace())
}

#[tokio::test]
async fn test_best_workers_ranked_and_limited() {
    let engine = create_engine();

    let matches = engine.find_best_workers(MATCH_JOB).await.unwrap();

    assert_eq!(matches.len(), 20);
    assert!(matches.windows(2).all(|pair| pair[0].match_score >= pair[1].match_score));
    assert!(matches.iter().all(|m| m.match_score > 0.30 && m.match_score <= 1.0));
    assert!(matches.iter().all(|m| m.distance_km <= 25.0));
    assert!(matches.iter().all(|m| ![90, 91, 92].contains(&m.worker_id)));

    // Nearest electricians are ranked first
    assert!(matches[0].distance_km <= 5.0);
    assert_eq!(matches[0].score_breakdown.location_score, 1.0);
}

#[tokio::test]
async fn test_unknown_job_returns_empty() {
    let engine = create_engine();

    let matches = engine.find_best_workers(9999).await.unwrap();
    assert!(matches.is_empty());
}

#[tokio::test]
async fn test_job_without_coordinates_returns_empty() {
    let engine = create_engine();

    let matches = engine.find_best_workers(INVALID_JOB).await.unwrap();
    assert!(matches.is_empty());
}

#[tokio::test]
async fn test_recommendations_ranked_and_limited() {
    let engine = create_engine();

    let recommendations = engine.recommend_jobs(SKILLED_WORKER).await.unwrap();

    assert_eq!(recommendations.len(), 15);
    assert!(recommendations
        .windows(2)
        .all(|pair| pair[0].match_score >= pair[1].match_score));
    assert!(recommendations.iter().all(|r| r.match_score > 0.40));
    assert!(recommendations.iter().all(|r| ![150, 151, 152].contains(&r.job_id)));

    let top = &recommendations[0];
    assert_eq!(top.job_id, MATCH_JOB);
    assert!((top.match_score - 0.82).abs() < 1e-9);
    assert_eq!(
        top.reasons.get("skillMatch").map(String::as_str),
        Some("Your Electrical skill matches this job")
    );
    assert!(top.reasons.contains_key("proximity"));
    assert!(top.reasons.contains_key("goodPay"));
    assert!(!top.reasons.contains_key("urgent"));
}

#[test]
fn test_worker_without_skills_gets_nothing() {
    let engine = create_engine();

    let recommendations = tokio_test::block_on(engine.recommend_jobs(UNSKILLED_WORKER)).unwrap();
    assert!(recommendations.is_empty());

    let response = JobRecommendationsResponse::new(UNSKILLED_WORKER, recommendations);
    assert_eq!(
        response.message,
        "No recommendations found. Try updating your skills and location."
    );
}

#[test]
fn test_worker_without_location_gets_nothing() {
    let engine = create_engine();

    let recommendations = tokio_test::block_on(engine.recommend_jobs(UNLOCATED_WORKER)).unwrap();
    assert!(recommendations.is_empty());
}

#[test]
fn test_unknown_worker_gets_nothing() {
    let engine = create_engine();

    let recommendations = tokio_test::block_on(engine.recommend_jobs(12345)).unwrap();
    assert!(recommendations.is_empty());
}

#[test]
fn test_response_envelopes() {
    let engine = create_engine();

    let matches = tokio_test::block_on(engine.find_best_workers(MATCH_JOB)).unwrap();
    let response = WorkerMatchesResponse::new(MATCH_JOB, matches);
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["jobId"], 1);
    assert_eq!(json["totalMatches"], 20);
    assert!(json["matches"][0]["scoreBreakdown"]["skillMatch"].is_number());
    assert!(json["matches"][0]["distanceKm"].is_number());

    let recommendations = tokio_test::block_on(engine.recommend_jobs(SKILLED_WORKER)).unwrap();
    let response = JobRecommendationsResponse::new(SKILLED_WORKER, recommendations);
    assert_eq!(response.total_recommendations, 15);
    assert_eq!(response.message, "Found 15 job recommendations for you!");
}

/// Delegates to a snapshot but fails the chosen lookups
struct FailingStore {
    inner: InMemoryStore,
    fail_nearby: bool,
    fail_skills: bool,
}

impl FailingStore {
    fn outage() -> StoreError {
        StoreError::Unavailable("connection refused".to_string())
    }
}

#[async_trait]
impl MarketplaceStore for FailingStore {
    async fn find_job_by_id(&self, id: JobId) -> Result<Option<JobPosting>, StoreError> {
        self.inner.find_job_by_id(id).await
    }

    async fn find_nearby_workers(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<WorkerProfile>, StoreError> {
        if self.fail_nearby {
            return Err(Self::outage());
        }
        self.inner.find_nearby_workers(latitude, longitude, radius_km).await
    }

    async fn find_worker_by_id(&self, id: WorkerId) -> Result<Option<WorkerProfile>, StoreError> {
        self.inner.find_worker_by_id(id).await
    }

    async fn find_skills_by_worker(&self, id: WorkerId) -> Result<Vec<SkillRecord>, StoreError> {
        if self.fail_skills {
            return Err(Self::outage());
        }
        self.inner.find_skills_by_worker(id).await
    }

    async fn find_nearby_jobs(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<JobPosting>, StoreError> {
        if self.fail_nearby {
            return Err(Self::outage());
        }
        self.inner.find_nearby_jobs(latitude, longitude, radius_km).await
    }
}

#[tokio::test]
async fn test_upstream_failure_aborts_matching() {
    let engine = MatchingEngine::with_defaults(FailingStore {
        inner: create_marketplace(),
        fail_nearby: true,
        fail_skills: false,
    });

    let result = engine.find_best_workers(MATCH_JOB).await;
    assert!(matches!(
        result,
        Err(EngineError::Upstream(StoreError::Unavailable(_)))
    ));

    // Missing ids short-circuit before the failing lookup
    assert!(engine.find_best_workers(9999).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_upstream_failure_aborts_recommendations() {
    let engine = MatchingEngine::with_defaults(FailingStore {
        inner: create_marketplace(),
        fail_nearby: false,
        fail_skills: true,
    });

    let result = engine.recommend_jobs(SKILLED_WORKER).await;
    assert!(matches!(
        result,
        Err(EngineError::Upstream(StoreError::Unavailable(_)))
    ));
}

#[tokio::test]
async fn test_concurrent_requests_share_engine() {
    let engine = Arc::new(create_engine());
    let expected_matches = engine.find_best_workers(MATCH_JOB).await.unwrap();
    let expected_recs = engine.recommend_jobs(SKILLED_WORKER).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let engine = Arc::clone(&engine);
        handles.push(tokio::spawn(async move {
            let matches = engine.find_best_workers(MATCH_JOB).await.unwrap();
            let recs = engine.recommend_jobs(SKILLED_WORKER).await.unwrap();
            (matches, recs)
        }));
    }

    for handle in handles {
        let (matches, recs) = handle.await.unwrap();
        assert_eq!(matches, expected_matches);
        assert_eq!(recs, expected_recs);
    }
}

#[tokio::test]
async fn test_cached_store_matches_direct_store() {
    let direct = create_engine();
    let cached = MatchingEngine::with_defaults(CachedStore::new(create_marketplace(), 100, 60));

    for _ in 0..2 {
        assert_eq!(
            cached.recommend_jobs(SKILLED_WORKER).await.unwrap(),
            direct.recommend_jobs(SKILLED_WORKER).await.unwrap()
        );
    }
    assert_eq!(
        cached.find_best_workers(MATCH_JOB).await.unwrap(),
        direct.find_best_workers(MATCH_JOB).await.unwrap()
    );
}

#[tokio::test]
async fn test_shared_store_behind_arc() {
    let store = Arc::new(create_marketplace());
    let engine = MatchingEngine::with_defaults(Arc::clone(&store));

    let matches = engine.find_best_workers(MATCH_JOB).await.unwrap();
    assert_eq!(matches.len(), 20);
    assert_eq!(store.worker_count(), 36);
}

/// Counts skill lookups that reach the snapshot
struct SkillCountingStore {
    inner: InMemoryStore,
    skill_lookups: std::sync::atomic::AtomicUsize,
}

#[async_trait]
impl MarketplaceStore for SkillCountingStore {
    async fn find_job_by_id(&self, id: JobId) -> Result<Option<JobPosting>, StoreError> {
        self.inner.find_job_by_id(id).await
    }

    async fn find_nearby_workers(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<WorkerProfile>, StoreError> {
        self.inner.find_nearby_workers(latitude, longitude, radius_km).await
    }

    async fn find_worker_by_id(&self, id: WorkerId) -> Result<Option<WorkerProfile>, StoreError> {
        self.inner.find_worker_by_id(id).await
    }

    async fn find_skills_by_worker(&self, id: WorkerId) -> Result<Vec<SkillRecord>, StoreError> {
        self.skill_lookups.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.inner.find_skills_by_worker(id).await
    }

    async fn find_nearby_jobs(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> Result<Vec<JobPosting>, StoreError> {
        self.inner.find_nearby_jobs(latitude, longitude, radius_km).await
    }
}

#[tokio::test]
async fn test_repeated_recommendations_load_skills_once() {
    let counting = SkillCountingStore {
        inner: create_marketplace(),
        skill_lookups: std::sync::atomic::AtomicUsize::new(0),
    };
    let engine = MatchingEngine::with_defaults(CachedStore::new(counting, 100, 60));

    let worker = engine.store().find_worker_by_id(SKILLED_WORKER).await.unwrap().unwrap();
    assert!(worker.skills.is_empty());

    let first = engine.recommend_jobs(SKILLED_WORKER).await.unwrap();
    let second = engine.recommend_jobs(SKILLED_WORKER).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.len(), 15);
    let lookups = engine
        .store()
        .inner()
        .skill_lookups
        .load(std::sync::atomic::Ordering::SeqCst);
    assert_eq!(lookups, 1);
}
