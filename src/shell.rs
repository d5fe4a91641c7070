use std::env;

/// The resolved shell interpreter used for both prompt construction and
/// command execution. Recomputed on every run, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellInfo {
    /// Executable name passed to the process spawner (e.g. "bash").
    pub executable: &'static str,
    /// Human-readable label used in the system prompt (e.g. "Bash").
    pub friendly_name: &'static str,
}

impl ShellInfo {
    pub fn is_powershell(&self) -> bool {
        self.executable == "powershell"
    }
}

/// Detect the user's shell from the running OS and the `SHELL` variable.
///
/// Pure decision table, no failure path: anything unrecognized falls back
/// to plain `sh`.
pub fn detect() -> ShellInfo {
    detect_from(env::consts::OS, env::var("SHELL").ok().as_deref())
}

/// Table-driven core of [`detect`], split out so every row can be tested
/// without touching the live environment.
pub fn detect_from(os: &str, shell_var: Option<&str>) -> ShellInfo {
    if os == "windows" {
        return ShellInfo {
            executable: "powershell",
            friendly_name: "Windows PowerShell",
        };
    }

    match shell_var {
        Some("/bin/bash") => ShellInfo {
            executable: "bash",
            friendly_name: "Bash",
        },
        Some("/bin/zsh") => ShellInfo {
            executable: "zsh",
            friendly_name: "Zsh",
        },
        Some("/bin/fish") => ShellInfo {
            executable: "fish",
            friendly_name: "Fish",
        },
        // SHELL unset or pointing somewhere we don't know about
        _ => ShellInfo {
            executable: "sh",
            friendly_name: "Unix shell",
        },
    }
}
