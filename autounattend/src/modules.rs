use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Outcome of an external module that runs before generation and may supply
/// first-logon commands.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ModuleResult {
    pub module: String,

    #[serde(default = "default_success")]
    pub success: bool,

    #[serde(default)]
    pub commands: Vec<String>,
}

fn default_success() -> bool {
    true
}

#[derive(Deserialize)]
struct ModuleOutcome {
    #[serde(default = "default_success")]
    success: bool,

    #[serde(default)]
    commands: Vec<String>,
}

/// A results file is either a list of results or an object keyed by module
/// name. Object keys keep their file order.
#[derive(Deserialize)]
#[serde(untagged)]
enum ResultsFile {
    List(Vec<ModuleResult>),
    Map(serde_json::Map<String, serde_json::Value>),
}

/// Module results in the order they were produced.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct ModuleResults(Vec<ModuleResult>);

impl ModuleResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, module: &str, success: bool, commands: Vec<String>) {
        self.0.push(ModuleResult {
            module: module.to_string(),
            success,
            commands,
        });
    }

    pub fn with(mut self, module: &str, success: bool, commands: &[&str]) -> Self {
        self.push(module, success, commands.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModuleResult> {
        self.0.iter()
    }

    pub fn get(&self, module: &str) -> Option<&ModuleResult> {
        self.0.iter().find(|result| result.module == module)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn parse(json: &str) -> Result<Self> {
        Ok(match serde_json::from_str(json)? {
            ResultsFile::List(results) => Self(results),
            ResultsFile::Map(map) => {
                let mut results = Self::new();
                for (module, value) in map {
                    let outcome: ModuleOutcome = serde_json::from_value(value)?;
                    results.push(&module, outcome.success, outcome.commands);
                }
                results
            }
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = ?path, "Loading module results");
        Self::parse(&std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_list() {
        let results = ModuleResults::parse(
            r#"[{"module": "drivers", "commands": ["pnputil /add-driver x.inf"]}, {"module": "office", "success": false}]"#,
        )
        .unwrap();

        assert_eq!(results.len(), 2);
        assert!(results.get("drivers").unwrap().success);
        assert!(!results.get("office").unwrap().success);
    }

    #[test]
    fn parse_map_keeps_order() {
        let results = ModuleResults::parse(
            r#"{"zeta": {"success": true, "commands": ["a"]}, "alpha": {"success": true, "commands": ["b"]}}"#,
        )
        .unwrap();

        let names: Vec<&str> = results.iter().map(|r| r.module.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn parse_garbage() {
        assert!(ModuleResults::parse("[1, 2]").is_err());
    }
}
