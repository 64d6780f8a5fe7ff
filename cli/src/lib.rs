use anyhow::{Context, Result};
use search_core::{DocId, DocumentStatus, EngineConfig, SearchServer};
use serde::Deserialize;
use walkdir::WalkDir;

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct InputDoc {
    pub id: DocId,
    pub text: String,
    #[serde(default)]
    pub status: DocumentStatus,
    #[serde(default)]
    pub ratings: Vec<i32>,
}

/// Settings given on the command line; `None` falls back to the config file.
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub stop_words: Option<String>,
    pub shards: Option<usize>,
}

pub fn resolve_config(overrides: &ConfigOverrides) -> Result<EngineConfig> {
    let mut config = match &overrides.config_file {
        Some(path) => {
            let json = fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
            EngineConfig::from_json_str(&json).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => EngineConfig::default(),
    };
    if let Some(stop_words) = &overrides.stop_words {
        config.stop_words = stop_words.split(' ').filter(|w| !w.is_empty()).map(str::to_string).collect();
    }
    if let Some(shards) = overrides.shards {
        config.shard_count = shards;
    }
    Ok(config)
}

/// Collect `.json` / `.jsonl` files under `input` (a file or a directory).
pub fn input_files(input: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "json" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    }
    files
}

pub fn read_documents(file: &Path) -> Result<Vec<InputDoc>> {
    if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
        let reader = BufReader::new(File::open(file).with_context(|| format!("opening {}", file.display()))?);
        let mut docs = Vec::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let doc = serde_json::from_str(&line)
                .with_context(|| format!("{}:{}: malformed document", file.display(), line_no + 1))?;
            docs.push(doc);
        }
        return Ok(docs);
    }

    let reader = BufReader::new(File::open(file).with_context(|| format!("opening {}", file.display()))?);
    let malformed = || format!("{}: malformed document", file.display());
    let json: serde_json::Value = serde_json::from_reader(reader).with_context(malformed)?;
    let docs = match json {
        serde_json::Value::Array(arr) => arr
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<InputDoc>, _>>()
            .with_context(malformed)?,
        serde_json::Value::Object(_) => vec![serde_json::from_value(json).with_context(malformed)?],
        _ => Vec::new(),
    };
    Ok(docs)
}

/// Build a server from every document under `input`.
///
/// Documents the engine rejects are logged and skipped.
pub fn build_server(input: &Path, config: &EngineConfig) -> Result<SearchServer> {
    let mut server = SearchServer::with_config(config)?;
    let mut skipped = 0usize;
    for file in input_files(input) {
        for doc in read_documents(&file)? {
            if let Err(err) = server.add_document(doc.id, &doc.text, doc.status, &doc.ratings) {
                tracing::warn!(doc_id = doc.id, error = %err, "skipping document");
                skipped += 1;
            }
        }
    }
    tracing::info!(num_docs = server.document_count(), skipped, "ingested documents");
    Ok(server)
}
