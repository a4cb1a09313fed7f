use crate::filter::FilterState;
use crate::sort::SortState;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only JSONL log of one browsing session
pub struct Transcript {
    pub path: PathBuf,
    session_id: String,
    file: File,
}

#[derive(Serialize)]
struct Event<'a> {
    ts: DateTime<Utc>,
    session_id: &'a str,
    #[serde(rename = "type")]
    event_type: &'a str,
    #[serde(flatten)]
    data: serde_json::Value,
}

impl Transcript {
    pub fn new(path: &Path, session_id: &str) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            session_id: session_id.to_string(),
            file,
        })
    }

    pub fn log(&mut self, event_type: &str, data: serde_json::Value) -> Result<()> {
        let event = Event {
            ts: Utc::now(),
            session_id: &self.session_id,
            event_type,
            data,
        };
        let line = serde_json::to_string(&event)?;
        writeln!(self.file, "{}", line)?;
        self.file.flush()?;
        Ok(())
    }

    pub fn session_start(&mut self, base_url: &str) -> Result<()> {
        self.log(
            "session_start",
            serde_json::json!({ "base_url": base_url }),
        )
    }

    pub fn fetch_start(&mut self, page: usize, limit: usize, skip: usize) -> Result<()> {
        self.log(
            "fetch_start",
            serde_json::json!({ "page": page, "limit": limit, "skip": skip }),
        )
    }

    pub fn fetch_ok(&mut self, page: usize, raw: usize, kept: usize, has_more: bool) -> Result<()> {
        self.log(
            "fetch_ok",
            serde_json::json!({
                "page": page,
                "raw": raw,
                "kept": kept,
                "has_more": has_more,
            }),
        )
    }

    pub fn fetch_err(&mut self, page: usize, error: &str) -> Result<()> {
        self.log(
            "fetch_err",
            serde_json::json!({ "page": page, "error": error }),
        )
    }

    pub fn fetch_stale(&mut self, page: usize) -> Result<()> {
        self.log("fetch_stale", serde_json::json!({ "page": page }))
    }

    pub fn filter_change(&mut self, filters: &FilterState) -> Result<()> {
        self.log(
            "filter_change",
            serde_json::json!({
                "gender": filters.gender,
                "country": filters.country,
            }),
        )
    }

    pub fn sort_change(&mut self, sort: &SortState) -> Result<()> {
        self.log(
            "sort_change",
            serde_json::json!({
                "field": sort.field.as_str(),
                "order": sort.order.as_str(),
            }),
        )
    }
}
