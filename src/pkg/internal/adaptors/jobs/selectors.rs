use sqlx::PgConnection;

use crate::pkg::internal::adaptors::jobs::spec::JobEntry;
use crate::prelude::Result;

pub struct JobSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> JobSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        JobSelector { pool }
    }

    pub async fn get_by_id(&mut self, id: i32) -> Result<Option<JobEntry>> {
        let row = sqlx::query_as::<_, JobEntry>(
            "SELECT id, title, company, url, date_applied, status, work_model, salary_range,
                    salary_frequency, tech_stack, notes, screenshot_url, resume_url,
                    cover_letter_url, attachments, created_at, updated_at
             FROM jobs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_all(&mut self) -> Result<Vec<JobEntry>> {
        let rows = sqlx::query_as::<_, JobEntry>(
            "SELECT id, title, company, url, date_applied, status, work_model, salary_range,
                    salary_frequency, tech_stack, notes, screenshot_url, resume_url,
                    cover_letter_url, attachments, created_at, updated_at
             FROM jobs ORDER BY date_applied DESC",
        )
        .fetch_all(&mut *self.pool)
        .await?;

        Ok(rows)
    }

    // Export only ever wants the exact literal 'Saved'; case variants stay out.
    pub async fn get_saved(&mut self) -> Result<Vec<JobEntry>> {
        let rows = sqlx::query_as::<_, JobEntry>(
            "SELECT id, title, company, url, date_applied, status, work_model, salary_range,
                    salary_frequency, tech_stack, notes, screenshot_url, resume_url,
                    cover_letter_url, attachments, created_at, updated_at
             FROM jobs WHERE status = 'Saved' ORDER BY date_applied DESC",
        )
        .fetch_all(&mut *self.pool)
        .await?;

        Ok(rows)
    }
}
