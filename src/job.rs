use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use thiserror::Error;

//

/// the shaders this project ships, relative to the project root
pub const DEFAULT_JOBS: &[(&str, &str)] = &[
    ("Shaders/ModelVS.metal", "Assets/Shaders/ModelVS.metallib"),
    ("Shaders/ModelPS.metal", "Assets/Shaders/ModelPS.metallib"),
];

#[derive(Error, Debug)]
pub enum JobError {
    #[error("two jobs write the same output {}", .0.display())]
    DuplicateOutput(PathBuf),
    #[error("shader source {} does not exist", .0.display())]
    MissingSource(PathBuf),
}

//

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderJob {
    pub source: PathBuf,
    pub output: PathBuf,
}

impl ShaderJob {
    pub fn new(source: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
        }
    }

    pub fn check_source(&self) -> Result<(), JobError> {
        if !self.source.is_file() {
            return Err(JobError::MissingSource(self.source.clone()));
        }
        Ok(())
    }
}

/// ordered jobs, no two of which share an output
#[derive(Debug, Clone, Default)]
pub struct JobList {
    jobs: Vec<ShaderJob>,
}

impl JobList {
    pub fn new(jobs: Vec<ShaderJob>) -> Result<Self, JobError> {
        check_outputs(&jobs)?;
        Ok(Self { jobs })
    }

    pub fn defaults() -> Result<Self, JobError> {
        Self::new(
            DEFAULT_JOBS
                .iter()
                .map(|&(source, output)| ShaderJob::new(source, output))
                .collect(),
        )
    }

    /// anchors relative paths at `root`, absolute paths are kept
    ///
    /// outputs are checked again, a relative and an absolute path may
    /// name the same file once joined
    pub fn resolve(self, root: &Path) -> Result<Self, JobError> {
        let jobs = self
            .jobs
            .into_iter()
            .map(|job| ShaderJob {
                source: root.join(job.source),
                output: root.join(job.output),
            })
            .collect();
        Self::new(jobs)
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShaderJob> {
        self.jobs.iter()
    }
}

fn check_outputs(jobs: &[ShaderJob]) -> Result<(), JobError> {
    let mut outputs = FxHashSet::default();
    for job in jobs {
        if !outputs.insert(job.output.as_path()) {
            return Err(JobError::DuplicateOutput(job.output.clone()));
        }
    }
    Ok(())
}

//
