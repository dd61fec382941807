use std::{fs, time::Instant};

use eyre::{Result, WrapErr};

use crate::{
    job::{JobList, ShaderJob},
    scratch::ScratchQueue,
    toolchain::{CompileOptions, Tool, Toolchain, metal_ar_args, metal_args, metallib_args},
};

//

pub const AIR_FILE: &str = "out.air";
pub const DIAGNOSTICS_FILE: &str = "diag.dia";
pub const ARCHIVE_FILE: &str = "out.metal-ar";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildReport {
    pub built: usize,
}

//

/// source -> AIR -> archive -> metallib, each intermediate is deleted
/// as soon as the next stage has read it
pub fn compile_shader(
    toolchain: &Toolchain,
    options: &CompileOptions,
    job: &ShaderJob,
) -> Result<()> {
    job.check_source()?;

    if let Some(parent) = job.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .wrap_err_with(|| format!("failed to create {}", parent.display()))?;
    }

    let dir = tempfile::Builder::new()
        .prefix("metallib-build")
        .tempdir()
        .wrap_err("failed to create a temporary directory")?;
    tracing::debug!("working in {}", dir.path().display());

    let air = dir.path().join(AIR_FILE);
    let diagnostics = dir.path().join(DIAGNOSTICS_FILE);
    let archive = dir.path().join(ARCHIVE_FILE);

    let mut scratch = ScratchQueue::new();

    toolchain.run(
        Tool::Metal,
        &metal_args(options, &job.source, &air, &diagnostics),
    )?;
    scratch.push(&diagnostics);
    scratch.flush();

    scratch.push(&air);
    toolchain.run(Tool::MetalAr, &metal_ar_args(&air, &archive))?;
    scratch.flush();

    scratch.push(&archive);
    toolchain.run(Tool::Metallib, &metallib_args(&archive, &job.output))?;
    scratch.flush();

    drop(scratch);
    dir.close()
        .wrap_err("failed to remove the temporary directory")?;

    Ok(())
}

/// runs `jobs` in order and stops at the first failure
pub fn build_all(
    toolchain: &Toolchain,
    options: &CompileOptions,
    jobs: &JobList,
) -> Result<BuildReport> {
    let mut report = BuildReport::default();

    for (i, job) in jobs.iter().enumerate() {
        tracing::info!(
            "[{}/{}] {} -> {}",
            i + 1,
            jobs.len(),
            job.source.display(),
            job.output.display()
        );

        let start = Instant::now();
        compile_shader(toolchain, options, job)
            .wrap_err_with(|| format!("failed to compile {}", job.source.display()))?;
        tracing::debug!("{} took {:?}", job.output.display(), start.elapsed());

        report.built += 1;
    }

    Ok(report)
}

//
