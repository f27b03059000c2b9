use crate::errors::SimError;
use crate::requests::models::Request;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Reads a recorded trace. The format is chosen by file extension: `.csv`
/// for flat per-sequence rows, `.jsonl` for block-hash records.
/// # Errors
/// Returns an error for unsupported extensions, unreadable files, or rows
/// with missing/unparsable required fields.
pub fn read_trace(path: &Path) -> Result<Vec<Request>, SimError> {
    match extension_of(path).as_str() {
        "csv" => read_csv_trace(path),
        "jsonl" => read_jsonl_trace(path),
        other => Err(SimError::UnsupportedTraceFormat(format!(".{other}"))),
    }
}

/// Counts distinct block hash ids across a JSONL trace, for capacity sizing.
/// Blank and malformed lines are skipped.
/// # Errors
/// Returns an error if the path is not a JSONL trace or cannot be read.
pub fn count_unique_hash_ids(path: &Path) -> Result<usize, SimError> {
    if extension_of(path) != "jsonl" {
        return Err(SimError::FractionNeedsJsonl(path.to_path_buf()));
    }
    let text = fs::read_to_string(path)?;
    let mut unique: HashSet<u64> = HashSet::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Ok(record) = serde_json::from_str::<Value>(line) else {
            continue;
        };
        if let Some(value) = record.get("hash_ids") {
            for id in hash_ids_of(value).unwrap_or_default() {
                unique.insert(id);
            }
        }
    }
    Ok(unique.len())
}

fn extension_of(path: &Path) -> String {
    path.extension().and_then(|e| e.to_str()).unwrap_or_default().to_ascii_lowercase()
}

fn read_csv_trace(path: &Path) -> Result<Vec<Request>, SimError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h == name);
    let (seq_id_col, seq_len_col) = (column("sequence_id"), column("sequence_length"));
    let type_col = column("request_type");
    let priority_col = column("priority");
    let pinned_col = column("pinned");
    let tenant_col = column("tenant_id");

    let mut requests = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        let cell = |col: Option<usize>| col.and_then(|c| record.get(c)).map(str::trim);
        let sequence_id = parse_required(cell(seq_id_col), "sequence_id", idx)?;
        let sequence_length = parse_required(cell(seq_len_col), "sequence_length", idx)?;
        let request_type = match cell(type_col) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => "prefill".to_string(),
        };
        let priority = cell(priority_col).filter(|v| !v.is_empty()).map_or(Ok(0), |v| {
            v.parse::<i64>().map_err(|e| SimError::TraceRecord {
                line: idx + 2,
                reason: format!("priority: {e}"),
            })
        })?;
        let pinned = cell(pinned_col).is_some_and(parse_bool_str);
        let tenant_id = cell(tenant_col).map(str::to_string);
        requests.push(Request {
            request_id: idx as u64,
            sequence_id,
            sequence_length,
            request_type,
            priority,
            pinned,
            tenant_id,
            ..Request::default()
        });
    }
    Ok(requests)
}

fn read_jsonl_trace(path: &Path) -> Result<Vec<Request>, SimError> {
    let text = fs::read_to_string(path)?;
    let mut requests = Vec::new();
    let mut decode_errors = 0usize;
    for (idx, line) in text.lines().enumerate() {
        let Ok(record) = serde_json::from_str::<Value>(line) else {
            decode_errors += 1;
            continue;
        };
        let hash_ids = match record.get("hash_ids") {
            Some(value) => hash_ids_of(value).ok_or_else(|| SimError::TraceRecord {
                line: idx + 1,
                reason: "hash_ids must be an integer or a list of integers".to_string(),
            })?,
            None => Vec::new(),
        };
        let input_length = u64_field(&record, "input_length");
        let output_length = u64_field(&record, "output_length");
        requests.push(Request {
            request_id: idx as u64,
            sequence_id: hash_ids.first().copied().unwrap_or(idx as u64),
            sequence_length: input_length,
            timestamp_ms: Some(record.get("timestamp").and_then(Value::as_i64).unwrap_or(0)),
            input_length: Some(input_length),
            output_length: Some(output_length),
            priority: record.get("priority").and_then(Value::as_i64).unwrap_or(0),
            pinned: record.get("pinned").is_some_and(parse_bool_value),
            tenant_id: tenant_of(record.get("tenant_id")),
            block_hashes: hash_ids,
            ..Request::default()
        });
    }
    if decode_errors > 0 {
        log::warn!("skipped {decode_errors} malformed JSONL lines in {}", path.display());
    }
    Ok(requests)
}

fn parse_required(cell: Option<&str>, name: &str, idx: usize) -> Result<u64, SimError> {
    let value = cell.filter(|v| !v.is_empty()).ok_or_else(|| SimError::TraceRecord {
        line: idx + 2,
        reason: format!("missing {name}"),
    })?;
    value.parse::<u64>().map_err(|e| SimError::TraceRecord {
        line: idx + 2,
        reason: format!("{name}: {e}"),
    })
}

fn hash_ids_of(value: &Value) -> Option<Vec<u64>> {
    match value {
        Value::Null => Some(Vec::new()),
        Value::Array(items) => items.iter().map(int_of).collect(),
        other => int_of(other).map(|id| vec![id]),
    }
}

fn int_of(value: &Value) -> Option<u64> {
    if let Some(id) = value.as_u64() {
        return Some(id);
    }
    // Tolerate negative, floating-point, and string-typed ids.
    value
        .as_i64()
        .map(|id| id as u64)
        .or_else(|| value.as_f64().map(|id| id as u64))
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

fn u64_field(record: &Value, name: &str) -> u64 {
    record.get(name).and_then(Value::as_u64).unwrap_or(0)
}

fn tenant_of(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_bool_str(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "y")
}

fn parse_bool_value(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => parse_bool_str(s),
        _ => false,
    }
}
