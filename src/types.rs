use std::str::FromStr;

use clap::ValueEnum;
use serde::Deserialize;

/// Canonical task key type (`"1.1"`, `"2.3"`, ...).
pub type TaskKey = String;

/// When to colour terminal output.
///
/// - `Auto`: colour only when stdout is a terminal and `NO_COLOR` is unset.
/// - `Always` / `Never`: force it on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl Default for ColorChoice {
    fn default() -> Self {
        ColorChoice::Auto
    }
}

impl FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            other => Err(format!(
                "invalid color: {other} (expected \"auto\", \"always\" or \"never\")"
            )),
        }
    }
}

impl ColorChoice {
    /// Resolve to a concrete on/off decision for stdout.
    pub fn enabled(self) -> bool {
        use std::io::IsTerminal;

        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
            }
        }
    }
}
