//! Catalog document types and parsing

use crate::error::RosettaError;
use crate::repo::ExclusionSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A language grouping in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// Key into `Catalog::examples` and the first path segment under `examples/`
    pub name: String,

    /// Human-readable name
    pub title: String,
}

/// Deployment mechanism an example can be scaffolded with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeployType {
    Terraform,
    Yccli,
    None,
    /// Any type this CLI does not know how to present
    #[serde(other)]
    Unknown,
}

impl DeployType {
    pub fn value(&self) -> &'static str {
        match self {
            DeployType::Terraform => "terraform",
            DeployType::Yccli => "yccli",
            DeployType::None => "none",
            DeployType::Unknown => "unknown",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DeployType::Terraform => "Terraform",
            DeployType::Yccli => "YC CLI",
            DeployType::None => "None",
            DeployType::Unknown => "Unknown",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DeployType::Terraform => "Add terraform to your project",
            DeployType::Yccli => "Add Makefile with YC CLI commands",
            DeployType::None => "Do not add anything",
            DeployType::Unknown => "",
        }
    }

    /// Whether the wizard offers this option
    pub fn is_known(&self) -> bool {
        !matches!(self, DeployType::Unknown)
    }
}

impl fmt::Display for DeployType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// One way to deploy an example
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployOption {
    #[serde(rename = "type")]
    pub kind: DeployType,

    /// Glob patterns (relative to the example root) for files that only make
    /// sense with this option; they are dropped when another option is chosen
    #[serde(default)]
    pub exclusive: Vec<String>,
}

/// An example project under `examples/{language}/{name}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub name: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, rename = "deploy")]
    pub deploy_options: Vec<DeployOption>,
}

impl Example {
    /// Deploy options the wizard can present, in catalog order
    pub fn presentable_deploy_options(&self) -> Vec<DeployOption> {
        self.deploy_options
            .iter()
            .filter(|d| d.kind.is_known())
            .cloned()
            .collect()
    }

    /// Union of the `exclusive` globs of every option whose type differs from `chosen`
    ///
    /// Duplicates are dropped; first occurrence wins so the order stays stable.
    pub fn exclusions_for(&self, chosen: DeployType) -> Vec<String> {
        let mut globs: Vec<String> = Vec::new();
        for option in self.deploy_options.iter().filter(|d| d.kind != chosen) {
            for glob in &option.exclusive {
                if !globs.contains(glob) {
                    globs.push(glob.clone());
                }
            }
        }
        globs
    }
}

/// Parsed catalog (examples.yaml)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Repository coordinate on the hosting service, e.g. `owner/name`
    pub repo: String,

    #[serde(default)]
    pub languages: Vec<Language>,

    /// Examples grouped by language name
    #[serde(default)]
    pub examples: BTreeMap<String, Vec<Example>>,
}

impl Catalog {
    /// Parse and validate a catalog document
    pub fn from_yaml(content: &str) -> Result<Self, RosettaError> {
        let catalog: Catalog = serde_yaml::from_str(content)
            .map_err(|e| RosettaError::Configuration(format!("failed to parse catalog: {}", e)))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check the parts of the catalog that can be checked up front
    ///
    /// A language without examples is not rejected here; selecting it is.
    pub fn validate(&self) -> Result<(), RosettaError> {
        let mut parts = self.repo.split('/');
        let well_formed = matches!(
            (parts.next(), parts.next(), parts.next()),
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty()
        );
        if !well_formed {
            return Err(RosettaError::Configuration(format!(
                "repo must look like 'owner/name', got '{}'",
                self.repo
            )));
        }

        if self.languages.is_empty() {
            return Err(RosettaError::Configuration(
                "catalog lists no languages".to_string(),
            ));
        }

        for (language, examples) in &self.examples {
            for example in examples {
                for option in &example.deploy_options {
                    ExclusionSet::new(&option.exclusive).map_err(|e| {
                        RosettaError::Configuration(format!(
                            "example '{}/{}' ({} deploy): {}",
                            language, example.name, option.kind.value(), e
                        ))
                    })?;
                }
            }
        }

        Ok(())
    }

    /// Examples registered for a language
    ///
    /// A missing or empty list means the catalog is inconsistent.
    pub fn examples_for(&self, language: &str) -> Result<&[Example], RosettaError> {
        match self.examples.get(language) {
            Some(examples) if !examples.is_empty() => Ok(examples),
            _ => Err(RosettaError::Configuration(format!(
                "no examples for language {}",
                language
            ))),
        }
    }

    /// Repository directory holding an example
    pub fn example_root(language: &str, example: &str) -> String {
        format!("examples/{}/{}", language, example)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"
repo: nikolaymatrosov/sls-rosetta
languages:
  - name: go
    title: Go
  - name: php
    title: PHP
examples:
  go:
    - name: hello
      title: Hello world
      description: Simple HTTP handler
      deploy:
        - type: terraform
          exclusive: ["tf/*", "*.tf"]
        - type: yccli
          exclusive: ["Makefile"]
        - type: none
        - type: pulumi
          exclusive: ["Pulumi.yaml"]
"#;

    fn hello() -> Example {
        Catalog::from_yaml(CATALOG).unwrap().examples["go"][0].clone()
    }

    #[test]
    fn test_parse_catalog() {
        let catalog = Catalog::from_yaml(CATALOG).unwrap();
        assert_eq!(catalog.repo, "nikolaymatrosov/sls-rosetta");
        assert_eq!(catalog.languages.len(), 2);
        assert_eq!(catalog.languages[0].title, "Go");

        let example = &catalog.examples["go"][0];
        assert_eq!(example.deploy_options.len(), 4);
        assert_eq!(example.deploy_options[2].kind, DeployType::None);
        assert!(example.deploy_options[2].exclusive.is_empty());
        assert_eq!(example.deploy_options[3].kind, DeployType::Unknown);
    }

    #[test]
    fn test_unknown_deploy_types_are_not_presented() {
        let kinds: Vec<DeployType> = hello()
            .presentable_deploy_options()
            .iter()
            .map(|d| d.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![DeployType::Terraform, DeployType::Yccli, DeployType::None]
        );
    }

    #[test]
    fn test_exclusions_union_every_other_option() {
        let example = hello();
        assert_eq!(
            example.exclusions_for(DeployType::None),
            vec!["tf/*", "*.tf", "Makefile", "Pulumi.yaml"]
        );
        assert_eq!(
            example.exclusions_for(DeployType::Terraform),
            vec!["Makefile", "Pulumi.yaml"]
        );
        assert_eq!(
            example.exclusions_for(DeployType::Yccli),
            vec!["tf/*", "*.tf", "Pulumi.yaml"]
        );
    }

    #[test]
    fn test_exclusions_deduplicated() {
        let example = Example {
            name: "queue".into(),
            title: "Queue".into(),
            description: String::new(),
            deploy_options: vec![
                DeployOption {
                    kind: DeployType::Terraform,
                    exclusive: vec!["deploy/*".into()],
                },
                DeployOption {
                    kind: DeployType::Yccli,
                    exclusive: vec!["deploy/*".into(), "Makefile".into()],
                },
                DeployOption {
                    kind: DeployType::None,
                    exclusive: vec![],
                },
            ],
        };
        assert_eq!(
            example.exclusions_for(DeployType::None),
            vec!["deploy/*", "Makefile"]
        );
    }

    #[test]
    fn test_only_none_option_excludes_nothing() {
        let example = Example {
            name: "bare".into(),
            title: "Bare".into(),
            description: String::new(),
            deploy_options: vec![DeployOption {
                kind: DeployType::None,
                exclusive: vec![],
            }],
        };
        assert!(example.exclusions_for(DeployType::None).is_empty());
    }

    #[test]
    fn test_examples_for_missing_language() {
        let catalog = Catalog::from_yaml(CATALOG).unwrap();
        assert_eq!(catalog.examples_for("go").unwrap().len(), 1);

        let err = catalog.examples_for("php").unwrap_err();
        assert!(matches!(err, RosettaError::Configuration(_)));
        assert!(err.to_string().contains("php"));
    }

    #[test]
    fn test_examples_for_empty_list() {
        let mut catalog = Catalog::from_yaml(CATALOG).unwrap();
        catalog.examples.insert("php".into(), Vec::new());
        assert!(catalog.examples_for("php").is_err());
    }

    #[test]
    fn test_malformed_glob_rejected() {
        let content = CATALOG.replace("\"*.tf\"", "\"[unclosed\"");
        let err = Catalog::from_yaml(&content).unwrap_err();
        assert!(matches!(err, RosettaError::Configuration(_)));
        assert!(err.to_string().contains("go/hello"));
    }

    #[test]
    fn test_bad_repo_coordinate_rejected() {
        let content = CATALOG.replace("nikolaymatrosov/sls-rosetta", "sls-rosetta");
        assert!(Catalog::from_yaml(&content).is_err());
    }

    #[test]
    fn test_example_root() {
        assert_eq!(Catalog::example_root("go", "hello"), "examples/go/hello");
    }
}
