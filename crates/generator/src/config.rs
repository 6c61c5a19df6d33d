//! Generator configuration

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use usage_lib::report::ReportFormat;
use usage_lib::simulation::{
    AllocationRange, SessionConfig, DEFAULT_EXECUTORS_PER_FRAMEWORK, DEFAULT_FRAMEWORKS,
    DEFAULT_SAMPLES,
};

/// Prefix of environment variables read into [`GeneratorConfig`]
pub const ENV_PREFIX: &str = "USAGE_GEN";

/// Generator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    /// Number of simulated frameworks
    #[serde(default = "default_frameworks")]
    pub frameworks: usize,

    /// Executors created by each framework
    #[serde(default = "default_executors_per_framework")]
    pub executors_per_framework: usize,

    /// Samples to generate
    #[serde(default = "default_samples")]
    pub samples: usize,

    /// Random seed; drawn from entropy when unset
    #[serde(default)]
    pub seed: Option<u64>,

    /// Initial simulated clock; the current epoch second when unset
    #[serde(default)]
    pub start_time: Option<i64>,

    #[serde(default = "default_cpus_min")]
    pub cpus_min: u32,

    #[serde(default = "default_cpus_max")]
    pub cpus_max: u32,

    #[serde(default = "default_mem_min_mb")]
    pub mem_min_mb: u64,

    #[serde(default = "default_mem_max_mb")]
    pub mem_max_mb: u64,

    /// Report destination; stdout when unset
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Report layout (`pretty` or `compact`)
    #[serde(default)]
    pub format: ReportFormat,
}

fn default_frameworks() -> usize {
    DEFAULT_FRAMEWORKS
}

fn default_executors_per_framework() -> usize {
    DEFAULT_EXECUTORS_PER_FRAMEWORK
}

fn default_samples() -> usize {
    DEFAULT_SAMPLES
}

fn default_cpus_min() -> u32 {
    AllocationRange::default().cpus_min
}

fn default_cpus_max() -> u32 {
    AllocationRange::default().cpus_max
}

fn default_mem_min_mb() -> u64 {
    AllocationRange::default().mem_min_mb
}

fn default_mem_max_mb() -> u64 {
    AllocationRange::default().mem_max_mb
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            frameworks: default_frameworks(),
            executors_per_framework: default_executors_per_framework(),
            samples: default_samples(),
            seed: None,
            start_time: None,
            cpus_min: default_cpus_min(),
            cpus_max: default_cpus_max(),
            mem_min_mb: default_mem_min_mb(),
            mem_max_mb: default_mem_max_mb(),
            output: None,
            format: ReportFormat::default(),
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from an optional file, then the environment
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .context("Failed to read generator configuration")?;

        config
            .try_deserialize()
            .context("Failed to parse generator configuration")
    }

    pub fn allocation(&self) -> AllocationRange {
        AllocationRange {
            cpus_min: self.cpus_min,
            cpus_max: self.cpus_max,
            mem_min_mb: self.mem_min_mb,
            mem_max_mb: self.mem_max_mb,
        }
    }

    /// Simulation parameters for this configuration
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            frameworks: self.frameworks,
            executors_per_framework: self.executors_per_framework,
            samples: self.samples,
            allocation: self.allocation(),
            seed: self.seed,
            start_time: self.start_time,
        }
    }
}
