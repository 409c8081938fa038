use sqlx::PgConnection;
use sqlx::types::Json;

use crate::pkg::internal::adaptors::jobs::spec::JobEntry;
use crate::pkg::server::handlers::jobs::{CreateJobInput, PatchJobInput};
use crate::prelude::Result;

pub struct JobMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> JobMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        JobMutator { pool }
    }

    pub async fn create(&mut self, job: CreateJobInput) -> Result<JobEntry> {
        let row = sqlx::query_as::<_, JobEntry>(
            r#"
            INSERT INTO jobs (title, company, url, date_applied, status, work_model,
                              salary_range, salary_frequency, tech_stack, notes,
                              screenshot_url, resume_url, cover_letter_url, attachments)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING id, title, company, url, date_applied, status, work_model, salary_range,
                      salary_frequency, tech_stack, notes, screenshot_url, resume_url,
                      cover_letter_url, attachments, created_at, updated_at
            "#,
        )
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.url)
        .bind(&job.date_applied)
        .bind(&job.status)
        .bind(&job.work_model)
        .bind(&job.salary_range)
        .bind(&job.salary_frequency)
        .bind(Json(&job.tech_stack))
        .bind(&job.notes)
        .bind(&job.screenshot_url)
        .bind(&job.resume_url)
        .bind(&job.cover_letter_url)
        .bind(Json(&job.attachments))
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }

    // Single-statement merge: only fields present in the patch make it into the
    // SET clause, updated_at is always refreshed. Double-Option fields bind
    // NULL when the caller sent an explicit null.
    pub async fn update(&mut self, id: i32, job: PatchJobInput) -> Result<Option<JobEntry>> {
        let mut query = String::from("UPDATE jobs SET updated_at = CURRENT_TIMESTAMP");
        let mut param_count = 1;

        if job.title.is_some() {
            param_count += 1;
            query.push_str(&format!(", title = ${}", param_count));
        }
        if job.company.is_some() {
            param_count += 1;
            query.push_str(&format!(", company = ${}", param_count));
        }
        if job.url.is_some() {
            param_count += 1;
            query.push_str(&format!(", url = ${}", param_count));
        }
        if job.date_applied.is_some() {
            param_count += 1;
            query.push_str(&format!(", date_applied = ${}", param_count));
        }
        if job.status.is_some() {
            param_count += 1;
            query.push_str(&format!(", status = ${}", param_count));
        }
        if job.work_model.is_some() {
            param_count += 1;
            query.push_str(&format!(", work_model = ${}", param_count));
        }
        if job.salary_range.is_some() {
            param_count += 1;
            query.push_str(&format!(", salary_range = ${}", param_count));
        }
        if job.salary_frequency.is_some() {
            param_count += 1;
            query.push_str(&format!(", salary_frequency = ${}", param_count));
        }
        if job.tech_stack.is_some() {
            param_count += 1;
            query.push_str(&format!(", tech_stack = ${}", param_count));
        }
        if job.notes.is_some() {
            param_count += 1;
            query.push_str(&format!(", notes = ${}", param_count));
        }
        if job.screenshot_url.is_some() {
            param_count += 1;
            query.push_str(&format!(", screenshot_url = ${}", param_count));
        }
        if job.resume_url.is_some() {
            param_count += 1;
            query.push_str(&format!(", resume_url = ${}", param_count));
        }
        if job.cover_letter_url.is_some() {
            param_count += 1;
            query.push_str(&format!(", cover_letter_url = ${}", param_count));
        }
        if job.attachments.is_some() {
            param_count += 1;
            query.push_str(&format!(", attachments = ${}", param_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, title, company, url, date_applied, status, work_model, \
             salary_range, salary_frequency, tech_stack, notes, screenshot_url, resume_url, \
             cover_letter_url, attachments, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, JobEntry>(&query).bind(id);

        if let Some(title) = job.title {
            q = q.bind(title);
        }
        if let Some(company) = job.company {
            q = q.bind(company);
        }
        if let Some(url) = job.url {
            q = q.bind(url);
        }
        if let Some(date_applied) = job.date_applied {
            q = q.bind(date_applied);
        }
        if let Some(status) = job.status {
            q = q.bind(status);
        }
        if let Some(work_model) = job.work_model {
            q = q.bind(work_model);
        }
        if let Some(salary_range) = job.salary_range {
            q = q.bind(salary_range);
        }
        if let Some(salary_frequency) = job.salary_frequency {
            q = q.bind(salary_frequency);
        }
        if let Some(tech_stack) = job.tech_stack {
            q = q.bind(tech_stack.map(Json));
        }
        if let Some(notes) = job.notes {
            q = q.bind(notes);
        }
        if let Some(screenshot_url) = job.screenshot_url {
            q = q.bind(screenshot_url);
        }
        if let Some(resume_url) = job.resume_url {
            q = q.bind(resume_url);
        }
        if let Some(cover_letter_url) = job.cover_letter_url {
            q = q.bind(cover_letter_url);
        }
        if let Some(attachments) = job.attachments {
            q = q.bind(attachments.map(Json));
        }

        let row = q.fetch_optional(&mut *self.pool).await?;
        Ok(row)
    }

    pub async fn delete(&mut self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&mut *self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
