// JSON export of layout plans for external plotting tools
use crate::domain::chart::LayoutPlan;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct PlanDocument<'a> {
    generated_at: DateTime<Utc>,
    plan: &'a LayoutPlan,
}

/// The plan file that sits next to a rendered image
pub fn plan_path(image_path: &Path) -> PathBuf {
    image_path.with_extension("json")
}

pub fn write_plan(plan: &LayoutPlan, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let document = PlanDocument {
        generated_at: Utc::now(),
        plan,
    };
    let json = serde_json::to_string_pretty(&document).context("Failed to serialize layout plan")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}
