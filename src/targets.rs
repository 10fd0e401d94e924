//! URL list loading

use crate::error::Result;
use std::path::Path;

/// Reads a newline-delimited URL file.
///
/// Blank lines are kept so the pool can skip them.
pub fn load_targets(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_targets(&content))
}

pub fn parse_targets(content: &str) -> Vec<String> {
    let content = content.trim();
    if content.is_empty() {
        return Vec::new();
    }
    content.lines().map(|line| line.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_targets() {
        let urls = parse_targets("\n  https://a.test\r\n\nhttps://b.test  \n\n");
        assert_eq!(urls, vec!["https://a.test", "", "https://b.test"]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_targets("  \n\n").is_empty());
    }
}
