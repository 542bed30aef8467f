//! Structured JSON logging.
//!
//! One JSON object per line with timestamp, monotonic sequence, level,
//! domain and event name. Lines go to stderr; if `LOG_DIR` is set they are
//! also appended to `<LOG_DIR>/events.jsonl` for later replay. `LOG_LEVEL`
//! and `LOG_DOMAINS` (comma-separated, or "all") filter output.

use std::fs::{create_dir_all, OpenOptions};
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
}

impl Level {
    pub fn from_env() -> Self {
        match std::env::var("LOG_LEVEL").as_deref() {
            Ok("debug") => Level::Debug,
            Ok("warn") => Level::Warn,
            Ok("error") => Level::Error,
            _ => Level::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Session,
    Markup,
    Adapter,
    System,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Session => "session",
            Domain::Markup => "markup",
            Domain::Adapter => "adapter",
            Domain::System => "system",
        }
    }

    fn is_enabled(&self) -> bool {
        match std::env::var("LOG_DOMAINS").as_deref() {
            Ok("all") | Err(_) => true,
            Ok(domains) => domains.split(',').any(|d| d.trim() == self.as_str()),
        }
    }
}

static LOG_SEQ: AtomicU64 = AtomicU64::new(0);
static FILE_SINK: OnceLock<Option<Mutex<std::fs::File>>> = OnceLock::new();

fn file_sink() -> &'static Option<Mutex<std::fs::File>> {
    FILE_SINK.get_or_init(|| {
        let dir = std::env::var("LOG_DIR").ok()?;
        if let Err(err) = create_dir_all(&dir) {
            eprintln!("[log] cannot create {}: {}", dir, err);
            return None;
        }
        let path = std::path::Path::new(&dir).join("events.jsonl");
        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => Some(Mutex::new(file)),
            Err(err) => {
                eprintln!("[log] cannot open {}: {}", path.display(), err);
                None
            }
        }
    })
}

/// Emit one structured log line.
pub fn log(level: Level, domain: Domain, event: &str, mut fields: Map<String, Value>) {
    if level < Level::from_env() || !domain.is_enabled() {
        return;
    }
    fields.insert("ts".to_string(), json!(Utc::now().to_rfc3339()));
    fields.insert("seq".to_string(), json!(LOG_SEQ.fetch_add(1, Ordering::SeqCst)));
    fields.insert("level".to_string(), json!(level.as_str()));
    fields.insert("domain".to_string(), json!(domain.as_str()));
    fields.insert("event".to_string(), json!(event));
    let line = Value::Object(fields).to_string();
    eprintln!("{}", line);
    if let Some(file) = file_sink() {
        if let Ok(mut f) = file.lock() {
            let _ = writeln!(f, "{}", line);
        }
    }
}

pub fn obj(pairs: &[(&str, Value)]) -> Map<String, Value> {
    let mut map = Map::new();
    for (key, value) in pairs {
        map.insert((*key).to_string(), value.clone());
    }
    map
}

pub fn v_str(s: &str) -> Value {
    Value::String(s.to_string())
}

pub fn v_num(n: f64) -> Value {
    json!(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_ordering() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Warn < Level::Error);
    }

    #[test]
    fn obj_builds_field_map() {
        let fields = obj(&[("msg", v_str("hola")), ("n", v_num(2.0))]);
        assert_eq!(fields.get("msg"), Some(&json!("hola")));
        assert_eq!(fields.get("n"), Some(&json!(2.0)));
    }

    #[test]
    fn file_sink_appends_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("LOG_DIR", dir.path());
        std::env::remove_var("LOG_LEVEL");
        log(Level::Info, Domain::System, "boot", obj(&[("msg", v_str("hola"))]));
        let path = dir.path().join("events.jsonl");
        let contents = std::fs::read_to_string(path).unwrap();
        let parsed: Value = serde_json::from_str(contents.lines().next().unwrap()).unwrap();
        assert_eq!(parsed["event"], json!("boot"));
        assert_eq!(parsed["domain"], json!("system"));
    }
}
