//! Selection state machine: language, example, deploy type, destination path

use super::widgets::{ListView, ListWidget, TextInput};
use crate::catalog::{Catalog, DeployOption, Example, Language};
use crate::error::RosettaError;
use crate::repo::{CloneRequest, ExclusionSet};
use std::path::PathBuf;

/// Longest destination path the input accepts
const PATH_CHAR_LIMIT: usize = 156;

const CHECK_MARK: &str = "✓";

/// Wizard stages, in the only order they can be visited
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    SelectLanguage,
    SelectExample,
    SelectDeployType,
    EnterPath,
    Result,
}

/// Input events, already decoded from keystrokes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardEvent {
    Confirm,
    Cancel,
    Up,
    Down,
    Left,
    Right,
    Backspace,
    Char(char),
}

/// Outcome of handling one event
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Input was consumed by the active widget, or rejected with an inline error
    Stay,
    Advanced(Stage),
    Cancelled,
    /// All choices made; the clone can start
    Finished(CloneRequest),
}

/// The list shown by the current stage, with its statically known item type
#[derive(Debug, Clone)]
enum ActiveList {
    Languages(ListWidget<Language>),
    Examples(ListWidget<Example>),
    DeployTypes(ListWidget<DeployOption>),
    None,
}

impl ActiveList {
    fn view(&self) -> Option<&dyn ListView> {
        match self {
            ActiveList::Languages(list) => Some(list),
            ActiveList::Examples(list) => Some(list),
            ActiveList::DeployTypes(list) => Some(list),
            ActiveList::None => None,
        }
    }

    fn next(&mut self) {
        match self {
            ActiveList::Languages(list) => list.next(),
            ActiveList::Examples(list) => list.next(),
            ActiveList::DeployTypes(list) => list.next(),
            ActiveList::None => {}
        }
    }

    fn previous(&mut self) {
        match self {
            ActiveList::Languages(list) => list.previous(),
            ActiveList::Examples(list) => list.previous(),
            ActiveList::DeployTypes(list) => list.previous(),
            ActiveList::None => {}
        }
    }
}

/// Choices confirmed so far
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub language: Option<Language>,
    pub example: Option<Example>,
    pub deploy: Option<DeployOption>,
    /// Fixed when the deploy type is confirmed
    pub exclusions: ExclusionSet,
    pub destination: Option<PathBuf>,
    /// One line per confirmed choice, shown above the active stage
    pub banner: Vec<String>,
}

/// The selection wizard
///
/// Holds the catalog by reference; the catalog is read-only for the session.
pub struct Wizard<'c> {
    catalog: &'c Catalog,
    stage: Stage,
    active: ActiveList,
    path_input: TextInput,
    selection: Selection,
}

impl<'c> Wizard<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self {
            catalog,
            stage: Stage::SelectLanguage,
            active: ActiveList::Languages(ListWidget::new(
                "Select function language",
                catalog.languages.clone(),
            )),
            path_input: TextInput::new("Enter path to clone", "Path to clone", PATH_CHAR_LIMIT),
            selection: Selection::default(),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn banner(&self) -> &[String] {
        &self.selection.banner
    }

    /// The list of the current stage, if it is a list stage
    pub fn active_list(&self) -> Option<&dyn ListView> {
        self.active.view()
    }

    pub fn path_input(&self) -> &TextInput {
        &self.path_input
    }

    /// Feed one event
    ///
    /// Errors are fatal for the session; validation failures never surface
    /// here, they become the path input's inline error instead.
    pub fn handle(&mut self, event: WizardEvent) -> Result<Transition, RosettaError> {
        match event {
            WizardEvent::Cancel => Ok(Transition::Cancelled),
            WizardEvent::Confirm => self.confirm(),
            other => {
                self.delegate(other);
                Ok(Transition::Stay)
            }
        }
    }

    fn delegate(&mut self, event: WizardEvent) {
        match self.stage {
            Stage::SelectLanguage | Stage::SelectExample | Stage::SelectDeployType => match event {
                WizardEvent::Up => self.active.previous(),
                WizardEvent::Down => self.active.next(),
                _ => {}
            },
            Stage::EnterPath => match event {
                WizardEvent::Char(c) => self.path_input.insert_char(c),
                WizardEvent::Backspace => self.path_input.delete_char(),
                WizardEvent::Left => self.path_input.move_cursor_left(),
                WizardEvent::Right => self.path_input.move_cursor_right(),
                _ => {}
            },
            Stage::Result => {}
        }
    }

    fn confirm(&mut self) -> Result<Transition, RosettaError> {
        match self.stage {
            Stage::SelectLanguage => self.select_language(),
            Stage::SelectExample => self.select_example(),
            Stage::SelectDeployType => self.select_deploy_type(),
            Stage::EnterPath => match self.select_path() {
                Ok(request) => Ok(Transition::Finished(request)),
                Err(e) if e.is_recoverable() => {
                    self.path_input.set_error(e.to_string());
                    Ok(Transition::Stay)
                }
                Err(e) => Err(e),
            },
            Stage::Result => Ok(Transition::Stay),
        }
    }

    fn push_banner(&mut self, label: &str, value: &str) {
        self.selection
            .banner
            .push(format!("{} {}: {}", CHECK_MARK, label, value));
    }

    fn select_language(&mut self) -> Result<Transition, RosettaError> {
        let ActiveList::Languages(list) = &self.active else {
            return Ok(Transition::Stay);
        };
        let Some(language) = list.selected().cloned() else {
            return Ok(Transition::Stay);
        };

        let examples = self.catalog.examples_for(&language.name)?.to_vec();

        self.push_banner("Language", &language.title);
        self.active = ActiveList::Examples(ListWidget::new(
            format!("Select {} example", language.title),
            examples,
        ));
        self.selection.language = Some(language);
        self.stage = Stage::SelectExample;
        Ok(Transition::Advanced(self.stage))
    }

    fn select_example(&mut self) -> Result<Transition, RosettaError> {
        let ActiveList::Examples(list) = &self.active else {
            return Ok(Transition::Stay);
        };
        let Some(example) = list.selected().cloned() else {
            return Ok(Transition::Stay);
        };

        let options = example.presentable_deploy_options();
        if options.is_empty() {
            return Err(RosettaError::Configuration(format!(
                "example {} has no supported deploy options",
                example.name
            )));
        }

        self.push_banner("Example", &example.title);
        self.active = ActiveList::DeployTypes(ListWidget::new(
            "Select way to deploy your function",
            options,
        ));
        self.selection.example = Some(example);
        self.stage = Stage::SelectDeployType;
        Ok(Transition::Advanced(self.stage))
    }

    fn select_deploy_type(&mut self) -> Result<Transition, RosettaError> {
        let ActiveList::DeployTypes(list) = &self.active else {
            return Ok(Transition::Stay);
        };
        let Some(deploy) = list.selected().cloned() else {
            return Ok(Transition::Stay);
        };
        let Some(example) = &self.selection.example else {
            return Ok(Transition::Stay);
        };

        let exclusions = ExclusionSet::new(example.exclusions_for(deploy.kind))?;

        self.push_banner("Deploy type", deploy.kind.title());
        self.selection.exclusions = exclusions;
        self.selection.deploy = Some(deploy);
        self.active = ActiveList::None;
        self.stage = Stage::EnterPath;
        Ok(Transition::Advanced(self.stage))
    }

    fn select_path(&mut self) -> Result<CloneRequest, RosettaError> {
        let value = self.path_input.value().trim().to_string();
        if value.is_empty() {
            return Err(RosettaError::Validation("Path can't be empty".to_string()));
        }

        let path = PathBuf::from(&value);
        if std::fs::symlink_metadata(&path).is_ok() {
            return Err(RosettaError::Validation(format!(
                "path {} already exists",
                value
            )));
        }

        let request = self.clone_request_for(path.clone())?;

        self.push_banner("Path", &value);
        self.selection.destination = Some(path);
        self.stage = Stage::Result;
        Ok(request)
    }

    fn clone_request_for(&self, destination: PathBuf) -> Result<CloneRequest, RosettaError> {
        match (&self.selection.language, &self.selection.example) {
            (Some(language), Some(example)) => Ok(CloneRequest {
                repo: self.catalog.repo.clone(),
                root: Catalog::example_root(&language.name, &example.name),
                destination,
                exclusions: self.selection.exclusions.clone(),
            }),
            _ => Err(RosettaError::Configuration(
                "path confirmed before language and example".to_string(),
            )),
        }
    }

    /// The clone to run, once the wizard reached `Stage::Result`
    pub fn clone_request(&self) -> Option<CloneRequest> {
        let destination = self.selection.destination.clone()?;
        self.clone_request_for(destination).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DeployType;

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
          exclusive: ["tf/*"]
        - type: none
          exclusive: []
    - name: bare
      title: Bare
      deploy:
        - type: none
    - name: exotic
      title: Exotic
      deploy:
        - type: pulumi
          exclusive: ["Pulumi.yaml"]
"#;

    fn catalog() -> Catalog {
        Catalog::from_yaml(CATALOG).unwrap()
    }

    fn type_text(wizard: &mut Wizard, text: &str) {
        for c in text.chars() {
            assert_eq!(wizard.handle(WizardEvent::Char(c)).unwrap(), Transition::Stay);
        }
    }

    fn advance_to_path(wizard: &mut Wizard, example_downs: usize, deploy_downs: usize) {
        wizard.handle(WizardEvent::Confirm).unwrap();
        for _ in 0..example_downs {
            wizard.handle(WizardEvent::Down).unwrap();
        }
        wizard.handle(WizardEvent::Confirm).unwrap();
        for _ in 0..deploy_downs {
            wizard.handle(WizardEvent::Down).unwrap();
        }
        assert_eq!(
            wizard.handle(WizardEvent::Confirm).unwrap(),
            Transition::Advanced(Stage::EnterPath)
        );
    }

    #[test]
    fn test_go_hello_none_end_to_end() {
        let catalog = catalog();
        let mut wizard = Wizard::new(&catalog);
        assert_eq!(wizard.active_list().unwrap().title(), "Select function language");

        assert_eq!(
            wizard.handle(WizardEvent::Confirm).unwrap(),
            Transition::Advanced(Stage::SelectExample)
        );
        assert_eq!(wizard.active_list().unwrap().title(), "Select Go example");

        assert_eq!(
            wizard.handle(WizardEvent::Confirm).unwrap(),
            Transition::Advanced(Stage::SelectDeployType)
        );

        wizard.handle(WizardEvent::Down).unwrap();
        assert_eq!(
            wizard.handle(WizardEvent::Confirm).unwrap(),
            Transition::Advanced(Stage::EnterPath)
        );
        assert_eq!(wizard.selection().deploy.as_ref().unwrap().kind, DeployType::None);
        assert_eq!(wizard.selection().exclusions.patterns(), ["tf/*"]);

        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("out");
        type_text(&mut wizard, destination.to_str().unwrap());

        let Transition::Finished(request) = wizard.handle(WizardEvent::Confirm).unwrap() else {
            panic!("expected the wizard to finish");
        };
        assert_eq!(wizard.stage(), Stage::Result);
        assert_eq!(request.repo, "nikolaymatrosov/sls-rosetta");
        assert_eq!(request.root, "examples/go/hello");
        assert_eq!(request.destination, destination);
        assert!(request.exclusions.is_excluded("tf/main.tf"));
        assert_eq!(wizard.clone_request(), Some(request));

        assert_eq!(
            wizard.banner(),
            [
                "✓ Language: Go".to_string(),
                "✓ Example: Hello world".to_string(),
                "✓ Deploy type: None".to_string(),
                format!("✓ Path: {}", destination.display()),
            ]
        );
    }

    #[test]
    fn test_choosing_terraform_keeps_terraform_files() {
        let catalog = catalog();
        let mut wizard = Wizard::new(&catalog);
        advance_to_path(&mut wizard, 0, 0);
        assert!(wizard.selection().exclusions.is_empty());
    }

    #[test]
    fn test_only_none_option_yields_empty_exclusions() {
        let catalog = catalog();
        let mut wizard = Wizard::new(&catalog);
        advance_to_path(&mut wizard, 1, 0);
        assert_eq!(wizard.selection().example.as_ref().unwrap().name, "bare");
        assert!(wizard.selection().exclusions.is_empty());
    }

    #[test]
    fn test_language_without_examples_is_configuration_error() {
        let catalog = catalog();
        let mut wizard = Wizard::new(&catalog);
        wizard.handle(WizardEvent::Down).unwrap();

        let err = wizard.handle(WizardEvent::Confirm).unwrap_err();
        assert!(matches!(err, RosettaError::Configuration(_)));
        assert_eq!(wizard.stage(), Stage::SelectLanguage);
        assert!(wizard.banner().is_empty());
        assert!(wizard.selection().language.is_none());
    }

    #[test]
    fn test_example_without_supported_deploy_options() {
        let catalog = catalog();
        let mut wizard = Wizard::new(&catalog);
        wizard.handle(WizardEvent::Confirm).unwrap();
        wizard.handle(WizardEvent::Up).unwrap();

        let err = wizard.handle(WizardEvent::Confirm).unwrap_err();
        assert!(matches!(err, RosettaError::Configuration(_)));
        assert_eq!(wizard.stage(), Stage::SelectExample);
    }

    #[test]
    fn test_empty_path_reprompts() {
        let catalog = catalog();
        let mut wizard = Wizard::new(&catalog);
        advance_to_path(&mut wizard, 0, 1);
        type_text(&mut wizard, "   ");

        assert_eq!(wizard.handle(WizardEvent::Confirm).unwrap(), Transition::Stay);
        assert_eq!(wizard.stage(), Stage::EnterPath);
        assert_eq!(wizard.path_input().error(), Some("Path can't be empty"));
        assert!(wizard.selection().destination.is_none());
        assert_eq!(wizard.banner().len(), 3);
    }

    #[test]
    fn test_existing_path_reprompts() {
        let catalog = catalog();
        let mut wizard = Wizard::new(&catalog);
        advance_to_path(&mut wizard, 0, 1);

        let dir = tempfile::tempdir().unwrap();
        type_text(&mut wizard, dir.path().to_str().unwrap());

        assert_eq!(wizard.handle(WizardEvent::Confirm).unwrap(), Transition::Stay);
        assert_eq!(wizard.stage(), Stage::EnterPath);
        assert!(wizard
            .path_input()
            .error()
            .unwrap()
            .contains("already exists"));
        assert!(wizard.clone_request().is_none());

        // Editing clears the annotation
        wizard.handle(WizardEvent::Backspace).unwrap();
        assert!(wizard.path_input().error().is_none());
    }

    #[test]
    fn test_cancel_from_every_stage() {
        let catalog = catalog();
        for steps in 0..4 {
            let mut wizard = Wizard::new(&catalog);
            for _ in 0..steps.min(3) {
                wizard.handle(WizardEvent::Confirm).unwrap();
            }
            let stage = wizard.stage();
            assert_eq!(wizard.handle(WizardEvent::Cancel).unwrap(), Transition::Cancelled);
            assert_eq!(wizard.stage(), stage);
        }
    }

    #[test]
    fn test_navigation_does_not_change_stage() {
        let catalog = catalog();
        let mut wizard = Wizard::new(&catalog);
        for event in [
            WizardEvent::Down,
            WizardEvent::Up,
            WizardEvent::Left,
            WizardEvent::Char('x'),
            WizardEvent::Backspace,
        ] {
            assert_eq!(wizard.handle(event).unwrap(), Transition::Stay);
            assert_eq!(wizard.stage(), Stage::SelectLanguage);
        }
        assert!(wizard.path_input().value().is_empty());
    }

    #[test]
    fn test_stages_are_ordered() {
        assert!(Stage::SelectLanguage < Stage::SelectExample);
        assert!(Stage::SelectExample < Stage::SelectDeployType);
        assert!(Stage::SelectDeployType < Stage::EnterPath);
        assert!(Stage::EnterPath < Stage::Result);
    }
}
