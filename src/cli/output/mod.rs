//! Output formatting utilities for the CLI.

pub mod table;

use serde::Serialize;

pub use table::TableFormatter;

/// Result of a command, printable for humans or as JSON.
pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;
    fn to_json(&self) -> serde_json::Value;
}

pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&result.to_json()).unwrap_or_default());
    } else {
        println!("{}", result.to_human());
    }
}

/// Replacement shown for secret values.
pub const REDACTED: &str = "<redacted>";

/// Redact a secret value, keeping empty values visibly empty.
pub fn redact(value: &str, secret: bool) -> String {
    if secret && !value.is_empty() {
        REDACTED.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact() {
        assert_eq!(redact("token", true), REDACTED);
        assert_eq!(redact("", true), "");
        assert_eq!(redact("prod", false), "prod");
    }
}
