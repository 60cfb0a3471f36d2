//! Model path discovery utilities
//!
//! Finds the dual-encoder artifact across different installation scenarios.

use crate::error::{RecommendError, Result};
use std::path::{Path, PathBuf};

const ARTIFACT_FILE: &str = "dual_encoder.bin";

/// Find the dual-encoder model artifact with priority:
/// 1. Explicit path passed by the caller (CLI flag)
/// 2. NAMEBRIDGE_MODEL_PATH environment variable (file or directory)
/// 3. User home directory (~/.namebridge/models/dual_encoder.bin)
pub fn find_model_path(explicit: Option<&Path>) -> Result<PathBuf> {
    // Priority 1: explicit path
    if let Some(path) = explicit {
        let resolved = resolve_artifact(path);
        if resolved.exists() {
            return Ok(resolved);
        }
        return Err(RecommendError::model(format!(
            "Model artifact not found at: {}",
            path.display()
        )));
    }

    // Priority 2: NAMEBRIDGE_MODEL_PATH
    if let Ok(model_path) = std::env::var("NAMEBRIDGE_MODEL_PATH") {
        let resolved = resolve_artifact(Path::new(&model_path));
        if resolved.exists() {
            log::info!("Using NAMEBRIDGE_MODEL_PATH: {}", resolved.display());
            return Ok(resolved);
        }
        log::warn!(
            "NAMEBRIDGE_MODEL_PATH set but artifact not found: {}",
            model_path
        );
    }

    // Priority 3: user home directory
    if let Some(home) = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE")) {
        let user_path = PathBuf::from(home)
            .join(".namebridge")
            .join("models")
            .join(ARTIFACT_FILE);
        if user_path.exists() {
            log::info!("Using user model artifact: {}", user_path.display());
            return Ok(user_path);
        }
    }

    Err(RecommendError::model(
        "Dual-encoder artifact not found. Checked:\n\
         - --model flag\n\
         - NAMEBRIDGE_MODEL_PATH environment variable\n\
         - ~/.namebridge/models/dual_encoder.bin",
    ))
}

/// Accept either the artifact file itself or its containing directory
fn resolve_artifact(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(ARTIFACT_FILE)
    } else {
        path.to_path_buf()
    }
}
