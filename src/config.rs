// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Undine-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Undine and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Viewer configuration, persisted as JSON.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The two roots everything else is resolved against: where the sources live,
/// and where the generated diagrams live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerConfig {
    source_root: PathBuf,
    diagrams_root: PathBuf,
}

impl ViewerConfig {
    pub fn new(source_root: impl Into<PathBuf>, diagrams_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            diagrams_root: diagrams_root.into(),
        }
    }

    pub fn source_root(&self) -> &Path {
        &self.source_root
    }

    pub fn diagrams_root(&self) -> &Path {
        &self.diagrams_root
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|error| ConfigError::Io {
            path: path.to_owned(),
            message: error.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|error| ConfigError::Json {
            path: path.to_owned(),
            message: error.to_string(),
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = serde_json::to_string_pretty(self).map_err(|error| ConfigError::Json {
            path: path.to_owned(),
            message: error.to_string(),
        })?;
        fs::write(path, text).map_err(|error| ConfigError::Io {
            path: path.to_owned(),
            message: error.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io { path: PathBuf, message: String },
    Json { path: PathBuf, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => {
                write!(f, "cannot access config {}: {message}", path.display())
            }
            Self::Json { path, message } => {
                write!(f, "malformed config {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {}
