//! Wizard states and the step indicator.

use std::fmt;

/// One of the four numbered steps shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ImportStep {
    /// 1: choose a file
    Upload,
    /// 2: preview data, pick sheet and title row
    Preview,
    /// 3: configure fields and form info
    Configure,
    /// 4: import (reached by a successful save)
    Import,
}

impl ImportStep {
    pub const ALL: [Self; 4] = [Self::Upload, Self::Preview, Self::Configure, Self::Import];

    pub fn number(self) -> u8 {
        match self {
            Self::Upload => 1,
            Self::Preview => 2,
            Self::Configure => 3,
            Self::Import => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Upload => "Upload file",
            Self::Preview => "Preview data",
            Self::Configure => "Configure fields",
            Self::Import => "Import",
        }
    }
}

/// Where an import session currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WizardState {
    #[default]
    SelectingFile,
    PreviewingData,
    ConfiguringFields,
    /// Set by a successful save.
    Importing,
    Closed,
}

impl WizardState {
    /// The furthest step reached in this state; `None` once closed.
    pub fn current_step(self) -> Option<ImportStep> {
        match self {
            Self::SelectingFile => Some(ImportStep::Upload),
            Self::PreviewingData => Some(ImportStep::Preview),
            Self::ConfiguringFields => Some(ImportStep::Configure),
            Self::Importing => Some(ImportStep::Import),
            Self::Closed => None,
        }
    }

    /// Active steps: every step up to and including the current one.
    ///
    /// Moving forward adds a step; moving back truncates the set.
    pub fn active_steps(self) -> Vec<ImportStep> {
        match self.current_step() {
            Some(current) => ImportStep::ALL
                .into_iter()
                .filter(|step| *step <= current)
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn is_step_active(self, step: ImportStep) -> bool {
        self.current_step().is_some_and(|current| step <= current)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SelectingFile => "selecting a file",
            Self::PreviewingData => "previewing data",
            Self::ConfiguringFields => "configuring fields",
            Self::Importing => "importing",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for WizardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_steps_grow_with_state() {
        let numbers = |state: WizardState| -> Vec<u8> {
            state.active_steps().into_iter().map(ImportStep::number).collect()
        };
        assert_eq!(numbers(WizardState::SelectingFile), vec![1]);
        assert_eq!(numbers(WizardState::PreviewingData), vec![1, 2]);
        assert_eq!(numbers(WizardState::ConfiguringFields), vec![1, 2, 3]);
        assert_eq!(numbers(WizardState::Importing), vec![1, 2, 3, 4]);
        assert!(numbers(WizardState::Closed).is_empty());
    }

    #[test]
    fn test_step_checks() {
        assert!(WizardState::ConfiguringFields.is_step_active(ImportStep::Preview));
        assert!(!WizardState::PreviewingData.is_step_active(ImportStep::Configure));
        assert!(!WizardState::Closed.is_step_active(ImportStep::Upload));
    }
}
