/// A (RHEL major version, CPU architecture) pair tracked for updates.
///
/// Enumerated from configuration at startup; the set is immutable for the
/// duration of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub rhel_major: u32,
    pub architecture: String,
}

impl Target {
    /// Identity key used in the state file, e.g. `"9-x86_64"`.
    pub fn state_key(&self) -> String {
        format!("{}-{}", self.rhel_major, self.architecture)
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.rhel_major, self.architecture)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}
