use axum::Json;
use axum::extract::{Path as AxumPath, Query, State};
use axum::http::StatusCode;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};

use crate::pkg::internal::adaptors::jobs::mutators::JobMutator;
use crate::pkg::internal::adaptors::jobs::selectors::JobSelector;
use crate::pkg::internal::adaptors::jobs::spec::{Attachment, Job, JobEntry};
use crate::pkg::internal::export::{ExportFormat, export_filename, to_csv, to_json};
use crate::pkg::server::state::{AppState, GetTxn};
use crate::prelude::{Error, Result};

#[derive(Debug, Deserialize)]
pub struct CreateJobInput {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub url: Option<String>,
    pub date_applied: String,
    pub status: String,
    #[serde(default)]
    pub work_model: Option<String>,
    #[serde(default)]
    pub salary_range: Option<String>,
    #[serde(default = "default_salary_frequency")]
    pub salary_frequency: String,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub screenshot_url: Option<String>,
    #[serde(default)]
    pub resume_url: Option<String>,
    #[serde(default)]
    pub cover_letter_url: Option<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

fn default_salary_frequency() -> String {
    "Yearly".to_string()
}

/// Partial update. Outer `Option` is key presence; for nullable columns the
/// inner `Option` carries an explicit null, which still overwrites. Absent
/// keys never touch the row.
#[derive(Debug, Default, Deserialize)]
pub struct PatchJobInput {
    pub title: Option<String>,
    pub company: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub url: Option<Option<String>>,
    pub date_applied: Option<String>,
    pub status: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub work_model: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub salary_range: Option<Option<String>>,
    pub salary_frequency: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub tech_stack: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub screenshot_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub resume_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub cover_letter_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub attachments: Option<Option<Vec<Attachment>>>,
}

fn deserialize_present<'de, T, D>(deserializer: D) -> core::result::Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl CreateJobInput {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation("title is required".to_string()));
        }
        if self.company.trim().is_empty() {
            return Err(Error::Validation("company is required".to_string()));
        }
        Ok(())
    }
}

impl PatchJobInput {
    pub fn validate(&self) -> Result<()> {
        if matches!(&self.title, Some(t) if t.trim().is_empty()) {
            return Err(Error::Validation("title must not be empty".to_string()));
        }
        if matches!(&self.company, Some(c) if c.trim().is_empty()) {
            return Err(Error::Validation("company must not be empty".to_string()));
        }
        Ok(())
    }
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateJobInput>,
) -> Result<impl IntoResponse> {
    input.validate()?;
    let mut tx = state.db_pool.begin_txn().await?;
    let job = JobMutator::new(&mut tx).create(input).await?.normalize()?;
    tx.commit().await?;
    tracing::info!("created job {}", job.id);
    Ok((StatusCode::CREATED, Json(json!({ "id": job.id }))))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Job>>> {
    let mut tx = state.db_pool.begin_txn().await?;
    let jobs = JobSelector::new(&mut tx)
        .get_all()
        .await?
        .into_iter()
        .map(JobEntry::normalize)
        .collect::<Result<Vec<_>>>()?;
    Ok(Json(jobs))
}

pub async fn get_one(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<i32>,
) -> Result<Json<Job>> {
    let mut tx = state.db_pool.begin_txn().await?;
    match JobSelector::new(&mut tx).get_by_id(id).await? {
        Some(entry) => Ok(Json(entry.normalize()?)),
        None => Err(Error::NotFound("job")),
    }
}

pub async fn update(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<i32>,
    Json(input): Json<PatchJobInput>,
) -> Result<Json<Value>> {
    input.validate()?;
    let mut tx = state.db_pool.begin_txn().await?;
    let updated = JobMutator::new(&mut tx).update(id, input).await?;
    tx.commit().await?;
    match updated {
        Some(_) => Ok(Json(json!({ "success": true }))),
        None => Err(Error::NotFound("job")),
    }
}

pub async fn remove(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<i32>,
) -> Result<Json<Value>> {
    let mut tx = state.db_pool.begin_txn().await?;
    let existed = JobMutator::new(&mut tx).delete(id).await?;
    tx.commit().await?;
    if !existed {
        return Err(Error::NotFound("job"));
    }
    Ok(Json(json!({ "success": true })))
}

#[derive(Deserialize)]
pub struct ExportParams {
    pub format: Option<String>,
}

pub async fn export(
    State(state): State<AppState>,
    Query(params): Query<ExportParams>,
) -> Result<Response> {
    // Format is validated before the store is touched.
    let format: ExportFormat = params.format.as_deref().unwrap_or_default().parse()?;

    let mut tx = state.db_pool.begin_txn().await?;
    let jobs = JobSelector::new(&mut tx)
        .get_saved()
        .await?
        .into_iter()
        .map(JobEntry::normalize)
        .collect::<Result<Vec<_>>>()?;

    let content = match format {
        ExportFormat::Csv => to_csv(&jobs)?,
        ExportFormat::Json => to_json(&jobs)?,
    };
    let filename = export_filename(format);
    tracing::info!("exporting {} saved jobs as {}", jobs.len(), format.extension());
    Ok((
        [
            (CONTENT_TYPE, format.media_type().to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename={}", filename),
            ),
        ],
        content,
    )
        .into_response())
}
