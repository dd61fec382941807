use std::{
    ffi::{OsStr, OsString},
    fmt, io,
    path::{Path, PathBuf},
    process::{Command, ExitStatus},
};

use thiserror::Error;

use crate::config::PLATFORM_DIR;

//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Metal,
    MetalAr,
    Metallib,
}

impl Tool {
    pub const fn file_name(self) -> &'static str {
        match self {
            Tool::Metal => "metal",
            Tool::MetalAr => "metal-ar",
            Tool::Metallib => "metallib",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("failed to launch {tool} ({}): {source}", .program.display())]
    Spawn {
        tool: Tool,
        program: PathBuf,
        source: io::Error,
    },
    #[error("{tool} exited with {status}")]
    Failed { tool: Tool, status: ExitStatus },
}

//

/// locations of the three executables of the Metal toolchain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub metal: PathBuf,
    pub metal_ar: PathBuf,
    pub metallib: PathBuf,
}

impl Toolchain {
    pub fn from_developer_dir(developer_dir: &Path) -> Self {
        Self::from_tool_dir(&developer_dir.join(PLATFORM_DIR).join("usr/bin"))
    }

    pub fn from_tool_dir(dir: &Path) -> Self {
        Self {
            metal: dir.join(Tool::Metal.file_name()),
            metal_ar: dir.join(Tool::MetalAr.file_name()),
            metallib: dir.join(Tool::Metallib.file_name()),
        }
    }

    pub fn path(&self, tool: Tool) -> &Path {
        match tool {
            Tool::Metal => &self.metal,
            Tool::MetalAr => &self.metal_ar,
            Tool::Metallib => &self.metallib,
        }
    }

    pub fn run(&self, tool: Tool, args: &[OsString]) -> Result<(), ToolError> {
        run_tool(tool, self.path(tool), args)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    pub sysroot: PathBuf,
    pub macos_min_version: OsString,
    pub language_std: OsString,
    pub fast_math: bool,
}

//

/// `metal`: source -> AIR, diagnostics serialized next to it
pub fn metal_args(
    options: &CompileOptions,
    source: &Path,
    air: &Path,
    diagnostics: &Path,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-emit-llvm".into(),
        "-c".into(),
        "-isysroot".into(),
        options.sysroot.clone().into(),
    ];
    if options.fast_math {
        args.push("-ffast-math".into());
    }
    args.push("-serialize-diagnostics".into());
    args.push(diagnostics.into());
    args.push("-o".into());
    args.push(air.into());
    args.push(flag("-mmacosx-version-min=", &options.macos_min_version));
    args.push(flag("-std=", &options.language_std));
    args.push(source.into());
    args
}

/// `-name=value` without going through UTF-8
fn flag(name: &str, value: &OsStr) -> OsString {
    let mut flag = OsString::from(name);
    flag.push(value);
    flag
}

/// `metal-ar`: AIR -> archive
pub fn metal_ar_args(air: &Path, archive: &Path) -> Vec<OsString> {
    vec!["r".into(), archive.into(), air.into()]
}

/// `metallib`: archive -> linked library
pub fn metallib_args(archive: &Path, output: &Path) -> Vec<OsString> {
    vec!["-o".into(), output.into(), archive.into()]
}

pub fn run_tool(tool: Tool, program: &Path, args: &[OsString]) -> Result<(), ToolError> {
    tracing::debug!("running {} {:?}", program.display(), args);

    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|source| ToolError::Spawn {
            tool,
            program: program.to_owned(),
            source,
        })?;

    if !status.success() {
        return Err(ToolError::Failed { tool, status });
    }

    Ok(())
}

//
