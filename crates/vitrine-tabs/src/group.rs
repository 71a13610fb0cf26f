//! Tab group
//!
//! Owns the active-panel pointer for one cluster of tabs and mirrors it
//! onto the document through a [`TabSurface`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::TabError;
use crate::state::TabState;
use crate::surface::TabSurface;
use crate::Result;

/// One clickable trigger and the panel it reveals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabBinding {
    /// Element id of the trigger
    pub trigger: String,
    /// Element id of the panel (the trigger's `data-tab` target)
    pub panel: String,
}

impl TabBinding {
    pub fn new(trigger: impl Into<String>, panel: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
            panel: panel.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TabGroup {
    name: String,
    bindings: Vec<TabBinding>,
    active: usize,
}

impl TabGroup {
    /// Build a group over `bindings`, validated against `surface`.
    ///
    /// Every trigger and panel must exist in the document. The initial
    /// active panel is the first one carrying the active marker; when the
    /// markup marks none, the first binding is activated. The markup is
    /// then normalized so exactly one pair is marked.
    pub fn new<S>(name: impl Into<String>, bindings: Vec<TabBinding>, surface: &mut S) -> Result<Self>
    where
        S: TabSurface + ?Sized,
    {
        let name = name.into();

        if bindings.is_empty() {
            return Err(TabError::EmptyGroup(name));
        }

        let mut seen = HashSet::new();
        for binding in &bindings {
            for id in [&binding.trigger, &binding.panel] {
                if !seen.insert(id.as_str()) {
                    return Err(TabError::DuplicateBinding {
                        group: name.clone(),
                        id: id.clone(),
                    });
                }
            }

            if !surface.has_element(&binding.panel) {
                return Err(TabError::MissingPanel {
                    group: name.clone(),
                    panel: binding.panel.clone(),
                });
            }
            if !surface.has_element(&binding.trigger) {
                return Err(TabError::MissingTrigger {
                    group: name.clone(),
                    trigger: binding.trigger.clone(),
                });
            }
        }

        let marked: Vec<usize> = bindings
            .iter()
            .enumerate()
            .filter(|(_, b)| surface.is_marked_active(&b.panel))
            .map(|(i, _)| i)
            .collect();

        let active = match marked.first() {
            Some(&index) => {
                if marked.len() > 1 {
                    tracing::warn!(
                        group = %name,
                        panel = %bindings[index].panel,
                        marked = marked.len(),
                        "Several panels marked active, keeping the first"
                    );
                }
                index
            }
            None => {
                tracing::warn!(
                    group = %name,
                    panel = %bindings[0].panel,
                    "No panel marked active, activating the first"
                );
                0
            }
        };

        let group = Self {
            name,
            bindings,
            active,
        };
        group.render(surface);

        tracing::debug!(
            group = %group.name,
            tabs = group.bindings.len(),
            active = %group.active_panel(),
            "Tab group ready"
        );

        Ok(group)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bindings(&self) -> &[TabBinding] {
        &self.bindings
    }

    pub fn active_panel(&self) -> &str {
        &self.bindings[self.active].panel
    }

    pub fn active_trigger(&self) -> &str {
        &self.bindings[self.active].trigger
    }

    pub fn contains_trigger(&self, trigger: &str) -> bool {
        self.bindings.iter().any(|b| b.trigger == trigger)
    }

    /// State of a trigger or panel in this group
    pub fn state_of(&self, id: &str) -> Option<TabState> {
        self.bindings
            .iter()
            .position(|b| b.panel == id || b.trigger == id)
            .map(|index| TabState::from_active(index == self.active))
    }

    /// Make `panel` the active panel.
    ///
    /// Selecting the already-active panel rewrites the same markup and
    /// reports no change.
    pub fn select<S>(&mut self, panel: &str, surface: &mut S) -> Result<bool>
    where
        S: TabSurface + ?Sized,
    {
        let index = self
            .bindings
            .iter()
            .position(|b| b.panel == panel)
            .ok_or_else(|| TabError::UnknownPanel {
                group: self.name.clone(),
                panel: panel.to_string(),
            })?;

        Ok(self.activate(index, surface))
    }

    /// Handle a click on `trigger`
    pub fn select_trigger<S>(&mut self, trigger: &str, surface: &mut S) -> Result<bool>
    where
        S: TabSurface + ?Sized,
    {
        let index = self
            .bindings
            .iter()
            .position(|b| b.trigger == trigger)
            .ok_or_else(|| TabError::UnknownTrigger {
                group: self.name.clone(),
                trigger: trigger.to_string(),
            })?;

        Ok(self.activate(index, surface))
    }

    fn activate<S>(&mut self, index: usize, surface: &mut S) -> bool
    where
        S: TabSurface + ?Sized,
    {
        let changed = index != self.active;
        if changed {
            tracing::debug!(
                group = %self.name,
                from = %self.bindings[self.active].panel,
                to = %self.bindings[index].panel,
                "Tab selected"
            );
        }

        self.active = index;
        self.render(surface);
        changed
    }

    fn render<S>(&self, surface: &mut S)
    where
        S: TabSurface + ?Sized,
    {
        // Deactivate everything first so the active pair ends marked even
        // if ids were shared with another group
        for (i, binding) in self.bindings.iter().enumerate() {
            if i != self.active {
                surface.set_marked_active(&binding.trigger, false);
                surface.set_marked_active(&binding.panel, false);
            }
        }

        let active = &self.bindings[self.active];
        surface.set_marked_active(&active.trigger, true);
        surface.set_marked_active(&active.panel, true);
    }
}
