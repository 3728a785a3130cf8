use crate::domain::models::SavedSession;
use crate::services::engine::SessionError;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

fn unix_now() -> (u64, u32) {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| (d.as_secs(), d.subsec_nanos()))
        .unwrap_or((0, 0))
}

pub fn data_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")?;
    Ok(PathBuf::from(home).join(".local").join("share").join("hazid"))
}

fn sessions_dir() -> anyhow::Result<PathBuf> {
    Ok(data_dir()?.join("sessions"))
}

fn session_path(id: &str) -> anyhow::Result<PathBuf> {
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(SessionError::NotFound(id.to_string()).into());
    }
    Ok(sessions_dir()?.join(format!("{}.json", id)))
}

/// Best-effort JSONL trail of session activity; never fails the command.
pub fn audit(action: &str, data: serde_json::Value) {
    let path = match data_dir() {
        Ok(d) => d.join("audit.jsonl"),
        Err(_) => return,
    };
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let event = serde_json::json!({
        "ts": unix_now().0,
        "action": action,
        "data": data
    });
    let line = format!("{}\n", event);
    let _ = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut f| std::io::Write::write_all(&mut f, line.as_bytes()));
}

/// 16 hex chars derived from the report, the catalog digest and the clock.
pub fn new_session_id(report: &str, catalog_digest: &str) -> String {
    let (secs, nanos) = unix_now();
    let mut hasher = Sha256::new();
    hasher.update(report.as_bytes());
    hasher.update(catalog_digest.as_bytes());
    hasher.update(secs.to_le_bytes());
    hasher.update(nanos.to_le_bytes());
    hasher.update(std::process::id().to_le_bytes());
    let mut id = hex::encode(hasher.finalize());
    id.truncate(16);
    id
}

pub fn save_session(s: &SavedSession) -> anyhow::Result<()> {
    let p = session_path(&s.id)?;
    if let Some(parent) = p.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(p, serde_json::to_string_pretty(s)?)?;
    Ok(())
}

pub fn load_session(id: &str) -> anyhow::Result<SavedSession> {
    let p = session_path(id)?;
    if !p.exists() {
        return Err(SessionError::NotFound(id.to_string()).into());
    }
    let raw = std::fs::read_to_string(p)?;
    serde_json::from_str(&raw).map_err(|e| SessionError::Corrupt(e.to_string()).into())
}
