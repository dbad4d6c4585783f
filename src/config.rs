//! Study configuration
//!
//! Describes where each dataset's files live and how its records are labelled.
//! Loaded from TOML:
//!
//! ```toml
//! [[datasets]]
//! name = "nanofuzz"
//! irr_label = "Jest, NaNo"
//! base_dir = "nanofuzz"
//! treatments = ["Jest", "NaNofuzz"]
//! tasks = [1, 2, 3, 4, 5, 6]
//! fixed_transcripts = "R3-StepTranscripts.csv"
//! variable_transcripts = "R4-StepTranscripts.csv"
//! transitions = "R6-StepTransitions.csv"
//! participants = "data.csv"
//!
//! [datasets.raters]
//! first = "Author 3"
//! second = "Author 2"
//!
//! [[datasets.transition_groups]]
//! treatment = "Jest"
//! session_suffix = "J"
//! ```

use crate::agreement::RaterPair;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A whole study: one or more independently collected datasets
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudyConfig {
    pub datasets: Vec<DatasetConfig>,

    /// Directory relative paths are resolved against (the config file's directory)
    #[serde(skip)]
    pub root: PathBuf,
}

/// Rows of a transitions file reported under one treatment label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionGroup {
    pub treatment: String,

    /// Keep only sessions whose id ends with this suffix; all rows when absent
    #[serde(default)]
    pub session_suffix: Option<String>,
}

/// One dataset of the study
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub name: String,

    /// Label in the inter-rater reliability table (defaults to `name`)
    #[serde(default)]
    pub irr_label: Option<String>,

    /// Directory holding the dataset's files (defaults to the study root)
    #[serde(default)]
    pub base_dir: Option<PathBuf>,

    /// Treatment labels, in the order of their `Intervention{n}` indices
    pub treatments: Vec<String>,

    /// Task numbers present in the participant file
    pub tasks: Vec<u32>,

    #[serde(default)]
    pub raters: Option<RaterPair>,

    /// Fixed-interval step transcripts (inter-rater reliability)
    #[serde(default)]
    pub fixed_transcripts: Option<PathBuf>,

    /// Variable-interval step transcripts (time per step)
    #[serde(default)]
    pub variable_transcripts: Option<PathBuf>,

    /// Step transitions
    #[serde(default)]
    pub transitions: Option<PathBuf>,

    /// Participant task data (loop iterations, raw task table)
    #[serde(default)]
    pub participants: Option<PathBuf>,

    #[serde(default)]
    pub transition_groups: Vec<TransitionGroup>,

    /// Print the raw per-task participant table
    #[serde(default = "default_task_table")]
    pub task_table: bool,
}

fn default_task_table() -> bool {
    true
}

impl StudyConfig {
    /// Load and validate a study file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read study config {}", path.display()))?;
        let mut config = Self::from_toml(&text)
            .with_context(|| format!("Invalid study config {}", path.display()))?;
        config.root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(config)
    }

    /// Parse and validate TOML text; relative paths resolve against the working directory
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: StudyConfig = toml::from_str(text).context("Failed to parse TOML")?;
        config.validate().map_err(anyhow::Error::msg)?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.datasets.is_empty() {
            return Err("study must define at least one dataset".to_string());
        }

        let mut names = HashSet::new();
        for dataset in &self.datasets {
            if !names.insert(dataset.name.as_str()) {
                return Err(format!("duplicate dataset name '{}'", dataset.name));
            }
            dataset.validate()?;
        }

        Ok(())
    }

    pub fn dataset(&self, name: &str) -> Option<&DatasetConfig> {
        self.datasets.iter().find(|d| d.name == name)
    }

    /// Resolve a dataset file against the study root and the dataset's base directory
    pub fn resolve(&self, dataset: &DatasetConfig, file: &Path) -> PathBuf {
        let base = match &dataset.base_dir {
            Some(dir) => self.root.join(dir),
            None => self.root.clone(),
        };
        base.join(file)
    }
}

impl DatasetConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("dataset name must not be empty".to_string());
        }
        if self.treatments.is_empty() {
            return Err(format!("dataset '{}' has no treatments", self.name));
        }
        if self.tasks.is_empty() {
            return Err(format!("dataset '{}' has no tasks", self.name));
        }
        if let Some(raters) = &self.raters {
            if raters.first == raters.second {
                return Err(format!(
                    "dataset '{}' compares rater '{}' with itself",
                    self.name, raters.first
                ));
            }
        }
        if self.fixed_transcripts.is_some() && self.raters.is_none() {
            return Err(format!(
                "dataset '{}' has fixed transcripts but no raters",
                self.name
            ));
        }
        if self.transitions.is_some()
            && self.transition_groups.is_empty()
            && self.treatments.len() > 1
        {
            return Err(format!(
                "dataset '{}' has {} treatments; transition_groups must say how to split its transitions",
                self.name,
                self.treatments.len()
            ));
        }
        Ok(())
    }

    pub fn irr_label(&self) -> &str {
        self.irr_label.as_deref().unwrap_or(&self.name)
    }

    /// Transition groups, defaulting to the whole file under the only treatment
    pub fn effective_transition_groups(&self) -> Vec<TransitionGroup> {
        if !self.transition_groups.is_empty() {
            return self.transition_groups.clone();
        }
        self.treatments
            .first()
            .map(|treatment| {
                vec![TransitionGroup {
                    treatment: treatment.clone(),
                    session_suffix: None,
                }]
            })
            .unwrap_or_default()
    }
}
