//! shell-script stand-ins for the Metal toolchain

use std::{
    fs,
    os::unix::fs::PermissionsExt,
    path::PathBuf,
    sync::{Mutex, MutexGuard},
};

use tempfile::TempDir;

use crate::toolchain::{Tool, Toolchain};

//

static SPAWN_LOCK: Mutex<()> = Mutex::new(());

/// hold while writing or running fake tools, exec of a script another
/// thread has open for writing fails with ETXTBSY
pub fn spawn_lock() -> MutexGuard<'static, ()> {
    SPAWN_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct FakeTools {
    dir: TempDir,
}

impl FakeTools {
    pub fn new() -> Self {
        Self::build(None)
    }

    pub fn failing(tool: Tool) -> Self {
        Self::build(Some(tool))
    }

    fn build(failing: Option<Tool>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("calls.log");
        let workdir = dir.path().join("workdir");

        // work done before a failing tool bails out, then the rest
        let stages = |tool: Tool| match tool {
            Tool::Metal => (
                format!(
                    r#"while [ $# -gt 0 ]; do
  case "$1" in
    -o) air="$2"; shift ;;
    -serialize-diagnostics) dia="$2"; shift ;;
    -*) ;;
    *) src="$1" ;;
  esac
  shift
done
dirname "$air" > "{}"
echo diagnostics > "$dia"
"#,
                    workdir.display()
                ),
                "cp \"$src\" \"$air\"\n".to_owned(),
            ),
            Tool::MetalAr | Tool::Metallib => (String::new(), "cp \"$3\" \"$2\"\n".to_owned()),
        };

        for tool in [Tool::Metal, Tool::MetalAr, Tool::Metallib] {
            let fail = if failing == Some(tool) { "exit 1\n" } else { "" };
            let (before, after) = stages(tool);
            let script = format!(
                "#!/bin/sh\necho {tool} >> \"{}\"\n{before}{fail}{after}",
                log.display()
            );

            let path = dir.path().join(tool.file_name());
            fs::write(&path, script).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }

        Self { dir }
    }

    pub fn toolchain(&self) -> Toolchain {
        Toolchain::from_tool_dir(self.dir.path())
    }

    /// tool names in invocation order
    pub fn log(&self) -> Vec<String> {
        fs::read_to_string(self.dir.path().join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    /// temporary directory the most recent `metal` call wrote into
    pub fn last_workdir(&self) -> PathBuf {
        let dir = fs::read_to_string(self.dir.path().join("workdir")).unwrap();
        PathBuf::from(dir.trim_end())
    }
}
