use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde_json::Value;
use tracing::{info, warn};

use super::{Result, SnapshotStore};
use crate::{
    currency::RateSnapshot,
    domain::Subscription,
    errors::CoreError,
    utils::paths::{app_data_dir, ensure_dir, rates_file_in, snapshot_file},
};

const TMP_SUFFIX: &str = "tmp";

/// File-backed store rooted in the application directory.
#[derive(Debug, Clone)]
pub struct JsonStore {
    base: PathBuf,
    snapshot: PathBuf,
}

impl JsonStore {
    /// `snapshot` overrides where subscriptions are read from; rates always
    /// live under `base`.
    pub fn new(base: Option<PathBuf>, snapshot: Option<PathBuf>) -> Result<Self> {
        let base = base.unwrap_or_else(app_data_dir);
        ensure_dir(&base)?;
        let snapshot = snapshot.unwrap_or_else(|| snapshot_file(None));
        Ok(Self { base, snapshot })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot
    }

    pub fn rates_path(&self) -> PathBuf {
        rates_file_in(&self.base)
    }
}

impl SnapshotStore for JsonStore {
    fn load_subscriptions(&self) -> Result<Vec<Subscription>> {
        if !self.snapshot.exists() {
            return Err(CoreError::NotFound(format!(
                "subscription snapshot `{}`",
                self.snapshot.display()
            )));
        }
        let data = fs::read_to_string(&self.snapshot)?;
        let subs = parse_snapshot(&data)?;
        info!(path = %self.snapshot.display(), count = subs.len(), "subscription snapshot loaded");
        Ok(subs)
    }

    fn save_subscriptions(&self, subs: &[Subscription]) -> Result<()> {
        let json = serde_json::to_string_pretty(subs)?;
        save_json(&self.snapshot, &json)
    }

    fn load_rates(&self) -> Result<Option<RateSnapshot>> {
        let path = self.rates_path();
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&data)?))
    }

    fn save_rates(&self, snapshot: &RateSnapshot) -> Result<()> {
        let json = serde_json::to_string_pretty(snapshot)?;
        save_json(&self.rates_path(), &json)?;
        info!(
            effective_date = snapshot.effective_date.as_deref().unwrap_or("unknown"),
            currencies = snapshot.rates.len(),
            "rate table cached"
        );
        Ok(())
    }
}

/// Reads a subscription list in either the plain array form or the paginated
/// `{"results": [...]}` form. Records that cannot be read at all (no id, not
/// an object) are skipped with a warning; the rest of the snapshot survives.
pub fn parse_snapshot(json: &str) -> Result<Vec<Subscription>> {
    let payload: Value = serde_json::from_str(json)?;
    let rows = match payload {
        Value::Array(rows) => rows,
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(rows)) => rows,
            _ => {
                return Err(CoreError::InvalidInput(
                    "snapshot object has no `results` array".into(),
                ))
            }
        },
        _ => {
            return Err(CoreError::InvalidInput(
                "snapshot must be a JSON array of subscriptions".into(),
            ))
        }
    };

    let mut subs = Vec::with_capacity(rows.len());
    for (index, row) in rows.into_iter().enumerate() {
        match serde_json::from_value::<Subscription>(row) {
            Ok(sub) => subs.push(sub),
            Err(err) => warn!(index, %err, "skipping unreadable subscription record"),
        }
    }
    Ok(subs)
}

fn save_json(path: &Path, json: &str) -> Result<()> {
    let tmp = tmp_path(path);
    write_atomic(&tmp, json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

pub(crate) fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
