// src/config/validate.rs

use crate::config::model::{RawSettingsFile, Settings, SettingsSection};
use crate::errors::{PlanError, Result};

impl TryFrom<RawSettingsFile> for Settings {
    type Error = PlanError;

    fn try_from(raw: RawSettingsFile) -> std::result::Result<Self, Self::Error> {
        validate_settings(&raw.settings)?;
        Ok(Settings::new_unchecked(raw.settings))
    }
}

fn validate_settings(s: &SettingsSection) -> Result<()> {
    if s.stuck_after_days == 0 {
        return Err(PlanError::Settings(
            "[settings].stuck_after_days must be >= 1 (got 0)".to_string(),
        ));
    }

    if s.assumed_task_minutes == 0 {
        return Err(PlanError::Settings(
            "[settings].assumed_task_minutes must be >= 1 (got 0)".to_string(),
        ));
    }

    if s.next_count == 0 {
        return Err(PlanError::Settings(
            "[settings].next_count must be >= 1 (got 0)".to_string(),
        ));
    }

    if !(s.long_task_hours.is_finite() && s.long_task_hours > 0.0) {
        return Err(PlanError::Settings(format!(
            "[settings].long_task_hours must be a positive number (got {})",
            s.long_task_hours
        )));
    }

    if let Some(dir) = &s.template_dir {
        if dir.as_os_str().is_empty() {
            return Err(PlanError::Settings(
                "[settings].template_dir must not be empty".to_string(),
            ));
        }
    }

    Ok(())
}
