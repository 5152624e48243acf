//! Spawning external programs: the configured tool and the platform
//! file browser.

use std::process::Command;

use camino::Utf8Path;
use tracing::info;

use crate::error::{Error, Result};

/// Spawn an external tool as a detached process.
///
/// On Windows, OS error 740 means the executable demands elevation; that
/// case is surfaced as [`Error::ElevationRequired`] so the caller can
/// retry through [`launch_tool_elevated`].
pub fn launch_tool(path: &Utf8Path) -> Result<()> {
    if !path.is_file() {
        return Err(Error::Validation(format!(
            "Tool executable not found: {}",
            path
        )));
    }

    match Command::new(path.as_std_path()).spawn() {
        Ok(child) => {
            info!("launched tool {} (pid {})", path, child.id());
            Ok(())
        }
        Err(err) if err.raw_os_error() == Some(740) => Err(Error::ElevationRequired {
            path: path.to_string(),
        }),
        Err(err) => Err(err.into()),
    }
}

/// Relaunch the tool through an elevation prompt (Windows only).
///
/// A declined prompt is reported as [`Error::Cancelled`].
#[cfg(target_os = "windows")]
pub fn launch_tool_elevated(path: &Utf8Path) -> Result<()> {
    if !path.is_file() {
        return Err(Error::Validation(format!(
            "Tool executable not found: {}",
            path
        )));
    }

    let status = Command::new("powershell")
        .args([
            "-NoProfile",
            "-Command",
            &format!("Start-Process -FilePath '{}' -Verb RunAs", path),
        ])
        .status()?;
    if status.success() {
        info!("launched tool {} elevated", path);
        Ok(())
    } else {
        Err(Error::Cancelled)
    }
}

#[cfg(not(target_os = "windows"))]
pub fn launch_tool_elevated(_path: &Utf8Path) -> Result<()> {
    Err(Error::Validation(
        "Elevated launch is only supported on Windows.".to_string(),
    ))
}

/// Open a folder in the platform file browser.
pub fn reveal_in_file_browser(path: &Utf8Path) -> Result<()> {
    if !path.is_dir() {
        return Err(Error::Validation(format!("Folder not found: {}", path)));
    }

    #[cfg(target_os = "windows")]
    let program = "explorer";
    #[cfg(target_os = "macos")]
    let program = "open";
    #[cfg(all(not(target_os = "windows"), not(target_os = "macos")))]
    let program = "xdg-open";

    let child = Command::new(program).arg(path.as_std_path()).spawn()?;
    info!("revealed {} with {} (pid {})", path, program, child.id());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launching_a_missing_executable_is_a_validation_error() {
        let err = launch_tool(Utf8Path::new("/does/not/exist.exe")).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn revealing_a_missing_folder_is_a_validation_error() {
        let err = reveal_in_file_browser(Utf8Path::new("/does/not/exist")).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
