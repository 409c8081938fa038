use std::str::FromStr;

use chrono::Local;
use csv::{QuoteStyle, WriterBuilder};

use crate::pkg::internal::adaptors::jobs::spec::Job;
use crate::prelude::{Error, Result};

pub const CSV_HEADERS: [&str; 17] = [
    "id",
    "title",
    "company",
    "url",
    "date_applied",
    "status",
    "work_model",
    "salary_range",
    "salary_frequency",
    "tech_stack",
    "notes",
    "screenshot_url",
    "resume_url",
    "cover_letter_url",
    "attachments",
    "created_at",
    "updated_at",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(Error::UnsupportedExportFormat(other.to_string())),
        }
    }
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Json => "application/json",
        }
    }
}

pub fn export_filename(format: ExportFormat) -> String {
    let today = Local::now().format("%Y-%m-%d");
    format!("saved-jobs-{}.{}", today, format.extension())
}

/// Serializes jobs to CSV with every cell quoted, so downstream spreadsheet
/// imports never have to guess at embedded commas or quotes. List fields are
/// written as their JSON text encoding, absent optionals as empty cells.
pub fn to_csv(jobs: &[Job]) -> Result<String> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(vec![]);

    wtr.write_record(CSV_HEADERS)?;
    for job in jobs {
        wtr.write_record(&[
            job.id.to_string(),
            job.title.clone(),
            job.company.clone(),
            job.url.clone().unwrap_or_default(),
            job.date_applied.clone(),
            job.status.clone(),
            job.work_model.clone().unwrap_or_default(),
            job.salary_range.clone().unwrap_or_default(),
            job.salary_frequency.clone(),
            serde_json::to_string(&job.tech_stack)?,
            job.notes.clone().unwrap_or_default(),
            job.screenshot_url.clone().unwrap_or_default(),
            job.resume_url.clone().unwrap_or_default(),
            job.cover_letter_url.clone().unwrap_or_default(),
            serde_json::to_string(&job.attachments)?,
            job.created_at.to_rfc3339(),
            job.updated_at.to_rfc3339(),
        ])?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    let content = String::from_utf8(bytes)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    Ok(content)
}

/// Serializes jobs as a pretty-printed JSON array, list fields kept as native
/// arrays rather than re-encoded strings.
pub fn to_json(jobs: &[Job]) -> Result<String> {
    Ok(serde_json::to_string_pretty(jobs)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pkg::internal::adaptors::jobs::spec::Attachment;
    use chrono::{TimeZone, Utc};

    fn sample_job() -> Job {
        let ts = Utc.with_ymd_and_hms(2025, 2, 20, 12, 0, 0).unwrap();
        Job {
            id: 1,
            title: "Backend Engineer".to_string(),
            company: "Acme".to_string(),
            url: None,
            date_applied: "2025-02-15".to_string(),
            status: "Saved".to_string(),
            work_model: None,
            salary_range: None,
            salary_frequency: "Yearly".to_string(),
            tech_stack: vec![],
            notes: None,
            screenshot_url: None,
            resume_url: None,
            cover_letter_url: None,
            attachments: vec![],
            created_at: ts,
            updated_at: ts,
        }
    }

    fn parse_rows(content: &str) -> Vec<Vec<String>> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(content.as_bytes());
        rdr.records()
            .map(|r| r.unwrap().iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn csv_of_nothing_is_header_only() {
        let content = to_csv(&[]).unwrap();
        let rows = parse_rows(&content);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], CSV_HEADERS.to_vec());
    }

    #[test]
    fn json_of_nothing_is_empty_array() {
        assert_eq!(to_json(&[]).unwrap(), "[]");
    }

    #[test]
    fn csv_none_optionals_become_empty_cells() {
        let content = to_csv(&[sample_job()]).unwrap();
        let rows = parse_rows(&content);
        assert_eq!(rows.len(), 2);
        let data = &rows[1];
        assert_eq!(data.len(), CSV_HEADERS.len());
        assert_eq!(data[3], ""); // url
        assert_eq!(data[6], ""); // work_model
        assert_eq!(data[7], ""); // salary_range
        assert_eq!(data[8], "Yearly");
        assert_eq!(data[10], ""); // notes
    }

    #[test]
    fn csv_notes_with_quotes_and_commas_round_trip() {
        let mut job = sample_job();
        job.notes = Some(r#"He said, "Hello, world!""#.to_string());
        let content = to_csv(&[job]).unwrap();
        let rows = parse_rows(&content);
        assert_eq!(rows[1][10], r#"He said, "Hello, world!""#);
    }

    #[test]
    fn csv_list_cells_are_json_encoded() {
        let mut job = sample_job();
        job.tech_stack = vec!["React".to_string(), "TypeScript".to_string()];
        job.attachments = vec![Attachment::Record {
            name: "resume.pdf".to_string(),
            url: "/uploads/resume.pdf".to_string(),
        }];
        let content = to_csv(&[job]).unwrap();
        let rows = parse_rows(&content);

        let tech: Vec<String> = serde_json::from_str(&rows[1][9]).unwrap();
        assert_eq!(tech, vec!["React".to_string(), "TypeScript".to_string()]);
        let attachments: serde_json::Value = serde_json::from_str(&rows[1][14]).unwrap();
        assert_eq!(
            attachments,
            serde_json::json!([{"name": "resume.pdf", "url": "/uploads/resume.pdf"}])
        );
    }

    #[test]
    fn csv_rows_follow_input_order() {
        let mut first = sample_job();
        first.title = "First".to_string();
        let mut second = sample_job();
        second.id = 2;
        second.title = "Second".to_string();
        let content = to_csv(&[first, second]).unwrap();
        let rows = parse_rows(&content);
        assert_eq!(rows[1][1], "First");
        assert_eq!(rows[2][1], "Second");
    }

    #[test]
    fn json_keeps_lists_as_native_arrays() {
        let mut job = sample_job();
        job.tech_stack = vec!["React".to_string(), "TypeScript".to_string()];
        job.attachments = vec![
            Attachment::Record {
                name: "resume.pdf".to_string(),
                url: "/uploads/resume.pdf".to_string(),
            },
            Attachment::Bare("/uploads/legacy.png".to_string()),
        ];
        let content = to_json(&[job]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();

        assert_eq!(parsed[0]["tech_stack"], serde_json::json!(["React", "TypeScript"]));
        assert_eq!(
            parsed[0]["attachments"],
            serde_json::json!([
                {"name": "resume.pdf", "url": "/uploads/resume.pdf"},
                "/uploads/legacy.png",
            ])
        );
        // 2-space indentation
        assert!(content.starts_with("[\n  {"));
    }

    #[test]
    fn format_parsing_rejects_anything_else() {
        assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("xlsx".parse::<ExportFormat>().is_err());
        assert!("CSV".parse::<ExportFormat>().is_err());
        assert!("".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn filename_carries_date_and_extension() {
        let name = export_filename(ExportFormat::Csv);
        assert!(name.starts_with("saved-jobs-"));
        assert!(name.ends_with(".csv"));
        // saved-jobs-YYYY-MM-DD.csv
        assert_eq!(name.len(), "saved-jobs-".len() + 10 + ".csv".len());
    }
}
