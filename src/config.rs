use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
};

use eyre::{Result, WrapErr};

use crate::toolchain::{CompileOptions, Toolchain};

//

pub const DEFAULT_DEVELOPER_DIR: &str = "/Applications/Xcode.app/Contents/Developer";
pub const PLATFORM_DIR: &str = "Platforms/MacOSX.platform";
pub const SDK_NAME: &str = "MacOSX10.11.sdk";
pub const DEFAULT_MACOS_MIN: &str = "10.9";
pub const DEFAULT_LANGUAGE_STD: &str = "osx-metal1.1";

pub const ENV_DEVELOPER_DIR: &str = "DEVELOPER_DIR";
pub const ENV_TOOL_DIR: &str = "METALLIB_TOOL_DIR";
pub const ENV_SYSROOT: &str = "METALLIB_SYSROOT";
pub const ENV_MACOS_MIN: &str = "METALLIB_MACOS_MIN";
pub const ENV_LANGUAGE_STD: &str = "METALLIB_STD";
pub const ENV_ROOT: &str = "METALLIB_ROOT";

//

#[derive(Debug, Clone)]
pub struct Config {
    pub toolchain: Toolchain,
    pub options: CompileOptions,
    pub root: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let cwd = env::current_dir().wrap_err("failed to read the current directory")?;
        Ok(Self::from_lookup(cwd, |key| env::var_os(key)))
    }

    /// `lookup` is consulted once per variable, empty values count as unset
    pub fn from_lookup(cwd: PathBuf, lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let developer_dir = get(ENV_DEVELOPER_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DEVELOPER_DIR));

        let toolchain = match get(ENV_TOOL_DIR) {
            Some(dir) => Toolchain::from_tool_dir(Path::new(&dir)),
            None => Toolchain::from_developer_dir(&developer_dir),
        };

        let sysroot = get(ENV_SYSROOT)
            .map(PathBuf::from)
            .unwrap_or_else(|| default_sysroot(&developer_dir));

        let macos_min_version =
            get(ENV_MACOS_MIN).unwrap_or_else(|| OsString::from(DEFAULT_MACOS_MIN));

        let language_std =
            get(ENV_LANGUAGE_STD).unwrap_or_else(|| OsString::from(DEFAULT_LANGUAGE_STD));

        let root = match get(ENV_ROOT).map(PathBuf::from) {
            Some(root) if root.is_relative() => cwd.join(root),
            Some(root) => root,
            None => cwd,
        };

        Self {
            toolchain,
            options: CompileOptions {
                sysroot,
                macos_min_version,
                language_std,
                fast_math: true,
            },
            root,
        }
    }
}

pub fn default_sysroot(developer_dir: &Path) -> PathBuf {
    developer_dir
        .join(PLATFORM_DIR)
        .join("Developer/SDKs")
        .join(SDK_NAME)
}

//
