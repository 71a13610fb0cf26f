//! Tab error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TabError {
    #[error("Tab group '{0}' has no tabs")]
    EmptyGroup(String),

    #[error("Tab group '{group}': panel '{panel}' not found in document")]
    MissingPanel { group: String, panel: String },

    #[error("Tab group '{group}': trigger '{trigger}' not found in document")]
    MissingTrigger { group: String, trigger: String },

    #[error("Tab group '{group}': '{id}' is bound more than once")]
    DuplicateBinding { group: String, id: String },

    #[error("Tab group '{group}': unknown panel '{panel}'")]
    UnknownPanel { group: String, panel: String },

    #[error("Tab group '{group}': unknown trigger '{trigger}'")]
    UnknownTrigger { group: String, trigger: String },
}
