//! Page document model
//!
//! A flat map of elements keyed by id, each with an optional parent,
//! a class list, attributes and inline styles. It carries just enough
//! structure for the behavior layer: class toggling, attribute swaps and
//! "is this click inside that element" checks.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use vitrine_tabs::{TabBinding, TabSurface, ACTIVE_CLASS};

use crate::error::CoreError;
use crate::Result;

/// Pseudo-id for the document body
pub const BODY_ID: &str = "body";

/// Serialized page description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSpec {
    pub name: String,
    pub elements: Vec<ElementSpec>,
    pub tab_groups: Vec<TabGroupSpec>,
}

impl PageSpec {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementSpec {
    pub id: String,
    /// Tag name, e.g. `img`
    pub tag: Option<String>,
    pub parent: Option<String>,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
}

impl ElementSpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

/// A cluster of tabs sharing one active panel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabGroupSpec {
    pub name: String,
    pub tabs: Vec<TabBinding>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Element {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub classes: BTreeSet<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub styles: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    name: String,
    elements: BTreeMap<String, Element>,
    body_styles: BTreeMap<String, String>,
}

impl Page {
    /// Build the document from `spec`.
    ///
    /// Ids must be unique and non-empty, and every parent must be declared
    /// somewhere in the page.
    pub fn from_spec(spec: &PageSpec) -> Result<Self> {
        let mut elements = BTreeMap::new();

        for element in &spec.elements {
            if element.id.is_empty() || element.id == BODY_ID {
                return Err(CoreError::Page(format!(
                    "invalid element id {:?}",
                    element.id
                )));
            }

            let previous = elements.insert(
                element.id.clone(),
                Element {
                    id: element.id.clone(),
                    tag: element.tag.as_deref().map(str::to_ascii_lowercase),
                    parent: element.parent.clone(),
                    classes: element.classes.iter().cloned().collect(),
                    attributes: element.attributes.clone(),
                    styles: BTreeMap::new(),
                },
            );
            if previous.is_some() {
                return Err(CoreError::Page(format!("duplicate element id {}", element.id)));
            }
        }

        for element in elements.values() {
            if let Some(parent) = &element.parent {
                if !elements.contains_key(parent) {
                    return Err(CoreError::Page(format!(
                        "element {} has unknown parent {}",
                        element.id, parent
                    )));
                }
            }
        }

        let page = Self {
            name: spec.name.clone(),
            elements,
            body_styles: BTreeMap::new(),
        };

        // Parent links must not loop
        for id in page.elements.keys() {
            if page.ancestors(id).any(|ancestor| ancestor == id) {
                return Err(CoreError::Page(format!("element {} is its own ancestor", id)));
            }
        }

        Ok(page)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    pub fn has_element(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    pub fn tag(&self, id: &str) -> Option<&str> {
        self.elements.get(id).and_then(|element| element.tag.as_deref())
    }

    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.elements
            .get(id)
            .is_some_and(|element| element.classes.contains(class))
    }

    /// Returns whether the class list changed
    pub fn add_class(&mut self, id: &str, class: &str) -> bool {
        match self.elements.get_mut(id) {
            Some(element) => element.classes.insert(class.to_string()),
            None => false,
        }
    }

    /// Returns whether the class list changed
    pub fn remove_class(&mut self, id: &str, class: &str) -> bool {
        match self.elements.get_mut(id) {
            Some(element) => element.classes.remove(class),
            None => false,
        }
    }

    pub fn attribute(&self, id: &str, name: &str) -> Option<&str> {
        self.elements
            .get(id)
            .and_then(|element| element.attributes.get(name))
            .map(String::as_str)
    }

    pub fn set_attribute(&mut self, id: &str, name: &str, value: &str) {
        if let Some(element) = self.elements.get_mut(id) {
            element.attributes.insert(name.to_string(), value.to_string());
        }
    }

    pub fn style(&self, id: &str, property: &str) -> Option<&str> {
        self.elements
            .get(id)
            .and_then(|element| element.styles.get(property))
            .map(String::as_str)
    }

    pub fn set_style(&mut self, id: &str, property: &str, value: &str) {
        if let Some(element) = self.elements.get_mut(id) {
            element.styles.insert(property.to_string(), value.to_string());
        }
    }

    pub fn body_style(&self, property: &str) -> Option<&str> {
        self.body_styles.get(property).map(String::as_str)
    }

    pub fn body_styles(&self) -> &BTreeMap<String, String> {
        &self.body_styles
    }

    /// `None` clears the property
    pub fn set_body_style(&mut self, property: &str, value: Option<&str>) {
        match value {
            Some(value) => {
                self.body_styles
                    .insert(property.to_string(), value.to_string());
            }
            None => {
                self.body_styles.remove(property);
            }
        }
    }

    /// Parent chain of `id`, nearest first
    pub fn ancestors<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a str> + 'a {
        let start = self
            .elements
            .get(id)
            .and_then(|element| element.parent.as_deref());
        let limit = self.elements.len();

        std::iter::successors(start, move |current| {
            self.elements
                .get(*current)
                .and_then(|element| element.parent.as_deref())
        })
        .take(limit)
    }

    /// Whether `id` is `container` or nested inside it
    pub fn is_within(&self, id: &str, container: &str) -> bool {
        id == container || self.ancestors(id).any(|ancestor| ancestor == container)
    }

    /// `id` followed by its ancestors, the path a click bubbles along
    pub fn click_path<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        std::iter::once(id)
            .filter(move |id| self.has_element(id))
            .chain(self.ancestors(id))
    }

    pub fn ids_with_class(&self, class: &str) -> Vec<String> {
        self.elements
            .values()
            .filter(|element| element.classes.contains(class))
            .map(|element| element.id.clone())
            .collect()
    }

    pub fn ids_with_attribute(&self, name: &str) -> Vec<(String, String)> {
        self.elements
            .values()
            .filter_map(|element| {
                element
                    .attributes
                    .get(name)
                    .map(|value| (element.id.clone(), value.clone()))
            })
            .collect()
    }
}

impl TabSurface for Page {
    fn has_element(&self, id: &str) -> bool {
        Page::has_element(self, id)
    }

    fn is_marked_active(&self, id: &str) -> bool {
        self.has_class(id, ACTIVE_CLASS)
    }

    fn set_marked_active(&mut self, id: &str, active: bool) {
        if active {
            self.add_class(id, ACTIVE_CLASS);
        } else {
            self.remove_class(id, ACTIVE_CLASS);
        }
    }
}
