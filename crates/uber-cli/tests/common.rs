#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use assert_cmd::assert::Assert;
use serde_json::Value;
use tempfile::TempDir;

pub const SAMPLE_MANIFEST: &str = r#"{
    "project-info": {
        "project-name": "MyProject",
        "project-source": "src/main.py",
        "version": "1.0.0"
    },
    "venv-configs": {
        "main-venv": { "main": true },
        "dev-venv": { "main": false }
    },
    "dependencies": {
        "requests": { "venv": "main-venv", "version": "2.26.0" },
        "flask": { "venv": "main-venv" },
        "numpy": { "venv": "dev-venv", "version": "1.21.0" }
    }
}"#;

/// Creates a project directory holding `manifest` as its `uber` file and an
/// entry script at `src/main.py`.
pub fn prepare_project(manifest: &str) -> (TempDir, PathBuf) {
    let temp = tempfile::Builder::new()
        .prefix("uber-cli")
        .tempdir()
        .expect("tempdir");
    let project = temp.path().join("project");
    fs::create_dir_all(project.join("src")).expect("create project");
    fs::write(project.join("uber"), manifest).expect("write manifest");
    fs::write(project.join("src").join("main.py"), "print('hello')\n").expect("write script");
    (temp, project)
}

pub fn write_settings(project: &Path, contents: &str) {
    fs::write(project.join("uber-config"), contents).expect("write settings");
}

pub fn parse_json(assert: &Assert) -> Value {
    serde_json::from_slice(&assert.get_output().stdout).expect("valid json")
}

pub fn stdout(assert: &Assert) -> String {
    String::from_utf8_lossy(&assert.get_output().stdout).to_string()
}

pub fn stderr(assert: &Assert) -> String {
    String::from_utf8_lossy(&assert.get_output().stderr).to_string()
}

/// Stand-in for a Python interpreter, good enough for `-m venv`, `-m pip`,
/// and running a script. Every action is appended to `$UBER_SHIM_LOG`.
///
/// Requirements starting with `broken` fail to install; scripts exit with
/// `$UBER_SHIM_EXIT`. Like pip, `pip show` reports a two-part pin such as
/// `2.26` as `2.26.0`.
#[cfg(unix)]
const PYTHON_SHIM: &str = r#"#!/bin/sh
log() {
  if [ -n "$UBER_SHIM_LOG" ]; then echo "$*" >> "$UBER_SHIM_LOG"; fi
}
if [ "$1" = "-m" ] && [ "$2" = "venv" ]; then
  case "$(basename "$3")" in
    broken*) echo "Error: ensurepip is not available" >&2; exit 1 ;;
  esac
  mkdir -p "$3/bin" && cp "$0" "$3/bin/python" && chmod +x "$3/bin/python"
  log "venv $(basename "$3")"
  exit 0
fi
env_dir=$(dirname "$(dirname "$0")")
env_name=$(basename "$env_dir")
if [ "$1" = "-m" ] && [ "$2" = "pip" ] && [ "$3" = "show" ]; then
  if [ -f "$env_dir/installed-$4" ]; then cat "$env_dir/installed-$4"; exit 0; fi
  echo "WARNING: Package(s) not found: $4" >&2
  exit 1
fi
if [ "$1" = "-m" ] && [ "$2" = "pip" ] && [ "$3" = "install" ]; then
  log "install $env_name $4"
  case "$4" in
    broken*) echo "ERROR: No matching distribution found for $4" >&2; exit 1 ;;
  esac
  pkg=${4%%==*}
  version=latest
  case "$4" in *==*) version=${4#*==} ;; esac
  case "$version" in latest|*.*.*) ;; *.*) version="$version.0" ;; esac
  printf 'Name: %s\nVersion: %s\n' "$pkg" "$version" > "$env_dir/installed-$pkg"
  exit 0
fi
log "run $env_name $1"
exit "${UBER_SHIM_EXIT:-0}"
"#;

/// Writes the python shim into `dir` and returns its path.
#[cfg(unix)]
pub fn install_python_shim(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("python-shim");
    fs::write(&path, PYTHON_SHIM).expect("write shim");
    let mut perms = fs::metadata(&path).expect("shim metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("chmod shim");
    path
}

pub fn read_log(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(ToString::to_string)
        .collect()
}
