use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

use crate::grading::alignment::phonetics::PhoneticTable;
use crate::grading::{
    validate_threshold, EmptyHypothesisPolicy, GradingSettings, DEFAULT_PASS_THRESHOLD,
};

/// Grader configuration read from a JSON file; every field is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraderConfig {
    #[serde(alias = "passThreshold", alias = "threshold")]
    pub pass_threshold: f64,
    #[serde(alias = "emptyHypothesis")]
    pub empty_hypothesis: EmptyHypothesisPolicy,
    /// Replacement for the bundled phonetic lexicon. Relative paths resolve
    /// against the directory of the configuration file.
    #[serde(alias = "lexicon")]
    pub lexicon_path: Option<PathBuf>,
}

impl Default for GraderConfig {
    fn default() -> Self {
        Self {
            pass_threshold: DEFAULT_PASS_THRESHOLD,
            empty_hypothesis: EmptyHypothesisPolicy::default(),
            lexicon_path: None,
        }
    }
}

impl GraderConfig {
    /// Loads the file at `path`, or falls back to defaults when none is given.
    pub fn from_override(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(file) => Self::from_file(file)?,
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration file {:?}", path))?;
        let mut config = Self::parse(&raw)
            .with_context(|| format!("invalid configuration file {:?}", path))?;
        if let (Some(lexicon), Some(base)) = (config.lexicon_path.take(), path.parent()) {
            config.lexicon_path = Some(resolve_relative(base, lexicon));
        }
        Ok(config)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(raw).context("failed to parse configuration JSON")?;
        Ok(config)
    }

    pub fn with_threshold(mut self, threshold: Option<f64>) -> Self {
        if let Some(value) = threshold {
            self.pass_threshold = value;
        }
        self
    }

    pub fn with_empty_hypothesis(mut self, policy: Option<EmptyHypothesisPolicy>) -> Self {
        if let Some(value) = policy {
            self.empty_hypothesis = value;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.pass_threshold).context("invalid pass_threshold")?;
        if let Some(path) = &self.lexicon_path {
            ensure!(path.is_file(), "lexicon path {:?} is not a file", path);
        }
        Ok(())
    }

    pub fn settings(&self) -> GradingSettings {
        GradingSettings::default()
            .with_threshold(self.pass_threshold)
            .with_empty_hypothesis(self.empty_hypothesis)
    }

    /// Loads the custom lexicon, if one is configured.
    pub fn load_table(&self) -> Result<Option<PhoneticTable>> {
        self.lexicon_path
            .as_deref()
            .map(|path| {
                PhoneticTable::from_path(path)
                    .with_context(|| format!("failed to load phonetic lexicon {:?}", path))
            })
            .transpose()
    }
}

fn resolve_relative(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
