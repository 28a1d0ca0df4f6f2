//! Process-level state consulted during enrichment.

use std::collections::HashMap;

/// Machine identity and a snapshot of process variables.
#[derive(Debug, Clone, Default)]
pub struct Ambient {
    hostname: String,
    vars: HashMap<String, String>,
}

impl Ambient {
    pub fn new(hostname: impl Into<String>, vars: HashMap<String, String>) -> Self {
        Self {
            hostname: hostname.into(),
            vars,
        }
    }

    /// Capture the machine hostname and the current environment.
    ///
    /// Variables whose name or value is not valid UTF-8 are left out.
    pub fn from_process() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect();
        Self::new(machine_hostname(), vars)
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Non-empty value of a process variable.
    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Local machine name, or "localhost" when it cannot be read.
pub fn machine_hostname() -> String {
    #[cfg(unix)]
    {
        if let Ok(name) = nix::unistd::gethostname() {
            if let Some(name) = name.to_str().filter(|n| !n.is_empty()) {
                return name.to_string();
            }
        }
    }

    std::env::var("HOSTNAME")
        .or_else(|_| std::env::var("COMPUTERNAME"))
        .ok()
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}
