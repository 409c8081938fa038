use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use crate::prelude::{Error, Result};

/// One stored attachment. Older clients sent bare path strings, newer ones
/// send name/url records; both shapes are accepted and written back out
/// exactly as they came in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Attachment {
    Record { name: String, url: String },
    Bare(String),
}

/// Raw `jobs` row. The two JSONB columns are kept as whatever the driver
/// returned; [`JobEntry::normalize`] turns them into materialized lists.
#[derive(Debug, Clone, FromRow)]
pub struct JobEntry {
    pub id: i32,
    pub title: String,
    pub company: String,
    pub url: Option<String>,
    pub date_applied: String,
    pub status: String,
    pub work_model: Option<String>,
    pub salary_range: Option<String>,
    pub salary_frequency: String,
    pub tech_stack: Option<Value>,
    pub notes: Option<String>,
    pub screenshot_url: Option<String>,
    pub resume_url: Option<String>,
    pub cover_letter_url: Option<String>,
    pub attachments: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Normalized job record as served to API consumers and the export path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub company: String,
    pub url: Option<String>,
    pub date_applied: String,
    pub status: String,
    pub work_model: Option<String>,
    pub salary_range: Option<String>,
    pub salary_frequency: String,
    pub tech_stack: Vec<String>,
    pub notes: Option<String>,
    pub screenshot_url: Option<String>,
    pub resume_url: Option<String>,
    pub cover_letter_url: Option<String>,
    pub attachments: Vec<Attachment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Decodes a semi-structured column into a list, whichever way it was stored.
///
/// Rows migrated from the old sqlite deployment hold JSON text inside the
/// JSONB column (a string value), rows written by this service hold native
/// arrays, and columns never written are NULL. All three read back the same.
pub fn decode_list<T: serde::de::DeserializeOwned>(column: Option<Value>) -> Result<Vec<T>> {
    match column {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(raw)) => Ok(serde_json::from_str(&raw)?),
        Some(native) => Ok(serde_json::from_value(native)?),
    }
}

impl JobEntry {
    pub fn normalize(self) -> Result<Job> {
        Ok(Job {
            id: self.id,
            title: self.title,
            company: self.company,
            url: self.url,
            date_applied: self.date_applied,
            status: self.status,
            work_model: self.work_model,
            salary_range: self.salary_range,
            salary_frequency: self.salary_frequency,
            tech_stack: decode_list(self.tech_stack)?,
            notes: self.notes,
            screenshot_url: self.screenshot_url,
            resume_url: self.resume_url,
            cover_letter_url: self.cover_letter_url,
            attachments: decode_list(self.attachments)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl TryFrom<JobEntry> for Job {
    type Error = Error;

    fn try_from(entry: JobEntry) -> Result<Job> {
        entry.normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_list_absent_and_null_are_empty() {
        let absent: Vec<String> = decode_list(None).unwrap();
        let null: Vec<String> = decode_list(Some(Value::Null)).unwrap();
        assert!(absent.is_empty());
        assert!(null.is_empty());
    }

    #[test]
    fn decode_list_raw_text_and_native_agree() {
        let raw = Some(Value::String(r#"["React","TypeScript"]"#.to_string()));
        let native = Some(json!(["React", "TypeScript"]));
        let from_raw: Vec<String> = decode_list(raw).unwrap();
        let from_native: Vec<String> = decode_list(native).unwrap();
        assert_eq!(from_raw, from_native);
        assert_eq!(from_raw, vec!["React".to_string(), "TypeScript".to_string()]);
    }

    #[test]
    fn attachments_accept_both_shapes() {
        let mixed = Some(json!([
            {"name": "resume.pdf", "url": "/uploads/resume.pdf"},
            "/uploads/old-style.png",
        ]));
        let parsed: Vec<Attachment> = decode_list(mixed).unwrap();
        assert_eq!(
            parsed,
            vec![
                Attachment::Record {
                    name: "resume.pdf".to_string(),
                    url: "/uploads/resume.pdf".to_string(),
                },
                Attachment::Bare("/uploads/old-style.png".to_string()),
            ]
        );
    }

    #[test]
    fn attachments_serialize_back_unchanged() {
        let original = json!([
            {"name": "resume.pdf", "url": "/uploads/resume.pdf"},
            "/uploads/old-style.png",
        ]);
        let parsed: Vec<Attachment> = decode_list(Some(original.clone())).unwrap();
        assert_eq!(serde_json::to_value(&parsed).unwrap(), original);
    }

    #[test]
    fn decode_list_rejects_malformed_text() {
        let garbage = Some(Value::String("not json".to_string()));
        assert!(decode_list::<String>(garbage).is_err());
    }
}
