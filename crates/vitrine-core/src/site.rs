//! Site state container
//!
//! One [`Site`] per loaded page. It owns the document, the theme preference
//! and every interactive component, and mirrors their state onto the
//! document after each event.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use vitrine_nav::{FrameGate, MenuState, MobileMenu, ScrollToTop, VISIBLE_CLASS};
use vitrine_storage::{Database, Preferences};
use vitrine_tabs::TabGroup;
use vitrine_theme::{AmbientSource, DocumentTheme, ThemePreference, ThemeSource, ThemeValue};
use vitrine_viewport::{
    Intersection, LazyImages, RevealObserver, DATA_SRC_ATTRIBUTE, FADE_IN_CLASS, IMAGE_TAG,
    LAZY_CLASS,
};

use crate::config::Config;
use crate::event::Event;
use crate::page::{Element, Page, PageSpec};
use crate::Result;

/// Open the preference store described by `config`.
///
/// A database that cannot be opened leaves the session with in-memory
/// preferences only.
pub fn open_preferences(config: &Config) -> Preferences {
    if !config.persist_preferences {
        tracing::info!("Preference persistence disabled, using memory only");
        return Preferences::memory_only();
    }

    match Database::open(&config.database_path) {
        Ok(db) => Preferences::new(db),
        Err(e) => {
            tracing::warn!(
                path = %config.database_path.display(),
                error = %e,
                "Preference store unavailable, using memory only"
            );
            Preferences::memory_only()
        }
    }
}

/// Serializable view of the document after the events so far
#[derive(Debug, Clone, Serialize)]
pub struct PageSnapshot {
    pub page: String,
    pub theme: ThemeValue,
    pub theme_source: ThemeSource,
    /// Active panel per tab group
    pub tabs: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menu: Option<MenuState>,
    pub scroll_y: f64,
    pub body_styles: BTreeMap<String, String>,
    pub elements: Vec<Element>,
}

pub struct Site {
    config: Config,
    page: Page,
    document: DocumentTheme,
    theme: ThemePreference,
    tabs: Vec<TabGroup>,
    menu: Option<MobileMenu>,
    scroll_to_top: Option<ScrollToTop>,
    frame: FrameGate,
    scroll_y: f64,
    lazy_images: LazyImages,
    reveal: RevealObserver,
}

impl Site {
    /// Load a page and wire up its behavior.
    ///
    /// Fails when the page is malformed or a tab group references an
    /// element that does not exist. Optional controls that are missing
    /// simply stay disabled.
    pub fn new(
        config: Config,
        spec: &PageSpec,
        preferences: Preferences,
        ambient: &dyn AmbientSource,
    ) -> Result<Self> {
        let mut page = Page::from_spec(spec)?;

        let document = DocumentTheme::new();
        let theme = ThemePreference::new(preferences, Arc::new(document.clone()), ambient);

        if !page.has_element(&config.theme_toggle_id) {
            tracing::debug!(id = %config.theme_toggle_id, "No theme toggle on page");
        }

        let mut tabs = Vec::with_capacity(spec.tab_groups.len());
        for group in &spec.tab_groups {
            tabs.push(TabGroup::new(
                group.name.clone(),
                group.tabs.clone(),
                &mut page,
            )?);
        }

        let ids = &config.mobile_menu;
        let menu = if page.has_element(&ids.toggle) && page.has_element(&ids.menu) {
            Some(MobileMenu::new())
        } else {
            tracing::debug!(toggle = %ids.toggle, menu = %ids.menu, "No mobile menu on page");
            None
        };

        let scroll_to_top = if page.has_element(&config.scroll_to_top_id) {
            Some(ScrollToTop::new(config.scroll_to_top_threshold))
        } else {
            None
        };

        let mut lazy_images = LazyImages::new();
        for (id, src) in page.ids_with_attribute(DATA_SRC_ATTRIBUTE) {
            if page.tag(&id) == Some(IMAGE_TAG) {
                lazy_images.observe(id, src);
            }
        }

        let mut reveal = RevealObserver::new(config.reveal_threshold);
        for class in &config.reveal_classes {
            for id in page.ids_with_class(class) {
                reveal.observe(id);
            }
        }

        tracing::info!(
            page = %page.name(),
            tab_groups = tabs.len(),
            lazy_images = lazy_images.pending(),
            "Page loaded"
        );

        Ok(Self {
            config,
            page,
            document,
            theme,
            tabs,
            menu,
            scroll_to_top,
            frame: FrameGate::new(),
            scroll_y: 0.0,
            lazy_images,
            reveal,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn document(&self) -> &DocumentTheme {
        &self.document
    }

    pub fn theme(&self) -> &ThemePreference {
        &self.theme
    }

    pub fn tab_groups(&self) -> &[TabGroup] {
        &self.tabs
    }

    pub fn tab_group(&self, name: &str) -> Option<&TabGroup> {
        self.tabs.iter().find(|group| group.name() == name)
    }

    pub fn menu_state(&self) -> Option<MenuState> {
        self.menu.as_ref().map(MobileMenu::state)
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    pub fn handle(&mut self, event: Event) -> Result<()> {
        tracing::trace!(kind = event.kind(), "Handling event");

        match event {
            Event::Click { target } => self.on_click(&target),
            Event::Scroll { y } => {
                self.on_scroll(y);
                Ok(())
            }
            Event::Frame => {
                self.on_frame();
                Ok(())
            }
            Event::Intersect { entries } => {
                self.on_intersect(&entries);
                Ok(())
            }
            Event::SystemTheme { dark } => {
                self.theme.on_system_preference_changed(dark);
                Ok(())
            }
        }
    }

    fn on_click(&mut self, target: &str) -> Result<()> {
        if !self.page.has_element(target) {
            // Clicks on unmodelled parts of the page still count as
            // outside the menu
            tracing::trace!(target = %target, "Click on unknown element");
        }

        if self.page.has_element(&self.config.theme_toggle_id)
            && self.page.is_within(target, &self.config.theme_toggle_id)
        {
            self.theme.toggle();
        }

        self.menu_click(target);

        let path: Vec<String> = self.page.click_path(target).map(str::to_string).collect();
        for group in &mut self.tabs {
            if let Some(trigger) = path.iter().find(|id| group.contains_trigger(id)) {
                group.select_trigger(trigger, &mut self.page)?;
            }
        }

        if self.scroll_to_top.is_some() && self.page.is_within(target, &self.config.scroll_to_top_id)
        {
            let top = self
                .scroll_to_top
                .as_ref()
                .map(ScrollToTop::target)
                .unwrap_or(0.0);
            self.on_scroll(top);
        }

        Ok(())
    }

    fn menu_click(&mut self, target: &str) {
        let Some(menu) = self.menu.as_mut() else {
            return;
        };
        let ids = &self.config.mobile_menu;

        let changed = if self.page.is_within(target, &ids.toggle) {
            menu.toggle();
            true
        } else {
            let inside_menu = self.page.is_within(target, &ids.menu);
            let on_link = self.page.click_path(target).any(|id| {
                self.page.has_class(id, &ids.link_class) && self.page.is_within(id, &ids.menu)
            });
            menu.on_click(inside_menu, on_link)
        };

        if changed {
            let state = menu.state();
            self.render_menu(state);
        }
    }

    fn render_menu(&mut self, state: MenuState) {
        let ids = &self.config.mobile_menu;
        let open = state.is_open();

        if open {
            self.page.add_class(&ids.menu, vitrine_tabs::ACTIVE_CLASS);
        } else {
            self.page.remove_class(&ids.menu, vitrine_tabs::ACTIVE_CLASS);
        }
        self.page
            .set_style(&ids.menu_icon, "display", if open { "none" } else { "block" });
        self.page
            .set_style(&ids.close_icon, "display", if open { "block" } else { "none" });
        self.page.set_body_style("overflow", state.body_overflow());
    }

    fn on_scroll(&mut self, y: f64) {
        self.scroll_y = y.max(0.0);
        if !self.frame.request() {
            tracing::trace!(y = self.scroll_y, "Frame already pending");
        }
    }

    fn on_frame(&mut self) {
        if !self.frame.take() {
            return;
        }

        let Some(button) = self.scroll_to_top.as_mut() else {
            return;
        };

        if let Some(visible) = button.update(self.scroll_y) {
            let id = &self.config.scroll_to_top_id;
            if visible {
                self.page.add_class(id, VISIBLE_CLASS);
            } else {
                self.page.remove_class(id, VISIBLE_CLASS);
            }
        }
    }

    fn on_intersect(&mut self, entries: &[Intersection]) {
        for load in self.lazy_images.on_intersection(entries) {
            self.page.set_attribute(&load.id, "src", &load.src);
            self.page.remove_class(&load.id, LAZY_CLASS);
        }

        for id in self.reveal.on_intersection(entries) {
            self.page.add_class(&id, FADE_IN_CLASS);
        }
    }

    pub fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            page: self.page.name().to_string(),
            theme: self.document.get().unwrap_or_else(|| self.theme.current()),
            theme_source: self.theme.source(),
            tabs: self
                .tabs
                .iter()
                .map(|group| (group.name().to_string(), group.active_panel().to_string()))
                .collect(),
            menu: self.menu_state(),
            scroll_y: self.scroll_y,
            body_styles: self.page.body_styles().clone(),
            elements: self.page.elements().cloned().collect(),
        }
    }
}

impl std::fmt::Debug for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Site")
            .field("page", &self.page.name())
            .field("theme", &self.theme)
            .field("tabs", &self.tabs.len())
            .field("menu", &self.menu_state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{ElementSpec, TabGroupSpec};
    use vitrine_storage::MemoryStore;
    use vitrine_tabs::{TabBinding, TabState};
    use vitrine_theme::{ManualAmbient, THEME_KEY};

    fn index_spec() -> PageSpec {
        PageSpec {
            name: "index".to_string(),
            elements: vec![
                ElementSpec::new("themeToggle").class("theme-toggle"),
                ElementSpec::new("themeIcon").parent("themeToggle"),
                ElementSpec::new("mobileMenuToggle"),
                ElementSpec::new("menuIcon").parent("mobileMenuToggle"),
                ElementSpec::new("closeIcon").parent("mobileMenuToggle"),
                ElementSpec::new("mobileMenu").class("mobile-menu"),
                ElementSpec::new("navNews")
                    .parent("mobileMenu")
                    .class("mobile-nav-link"),
                ElementSpec::new("menuHeading").parent("mobileMenu"),
                ElementSpec::new("scrollToTop").class("scroll-to-top"),
                ElementSpec::new("photosTab")
                    .class("media-tab")
                    .class("active"),
                ElementSpec::new("videosTab").class("media-tab"),
                ElementSpec::new("videosLabel").parent("videosTab"),
                ElementSpec::new("photos")
                    .class("media-content")
                    .class("active"),
                ElementSpec::new("videos").class("media-content"),
                ElementSpec::new("heroImage")
                    .tag("img")
                    .class("lazy")
                    .attribute("data-src", "images/hero.jpg"),
                ElementSpec::new("news-1").class("news-card"),
                ElementSpec::new("newsBanner")
                    .tag("div")
                    .class("lazy")
                    .attribute("data-src", "images/banner.jpg"),
                ElementSpec::new("footer"),
            ],
            tab_groups: vec![TabGroupSpec {
                name: "media".to_string(),
                tabs: vec![
                    TabBinding::new("photosTab", "photos"),
                    TabBinding::new("videosTab", "videos"),
                ],
            }],
        }
    }

    fn site_with(store: &MemoryStore, ambient: &ManualAmbient) -> Site {
        Site::new(
            Config::new("/tmp/vitrine-test".into()),
            &index_spec(),
            Preferences::new(store.clone()),
            ambient,
        )
        .unwrap()
    }

    #[test]
    fn test_initial_theme_from_ambient() {
        let store = MemoryStore::new();
        let ambient = ManualAmbient::new(true);
        let site = site_with(&store, &ambient);

        assert_eq!(site.document().get(), Some(ThemeValue::Dark));
        assert_eq!(site.snapshot().theme_source, ThemeSource::Ambient);
        assert!(store.is_empty());
    }

    #[test]
    fn test_toggle_click_persists() {
        let store = MemoryStore::new();
        let ambient = ManualAmbient::new(false);
        let mut site = site_with(&store, &ambient);

        site.handle(Event::click("themeIcon")).unwrap();
        assert_eq!(site.document().get(), Some(ThemeValue::Dark));
        assert_eq!(
            vitrine_storage::PreferenceStore::get(&store, THEME_KEY).unwrap(),
            Some("dark".to_string())
        );

        // Explicit choice now outranks the OS
        ambient.set_prefers_dark(true);
        ambient.set_prefers_dark(false);
        assert_eq!(site.document().get(), Some(ThemeValue::Dark));
    }

    #[test]
    fn test_ambient_followed_without_choice() {
        let store = MemoryStore::new();
        let ambient = ManualAmbient::new(true);
        let site = site_with(&store, &ambient);

        ambient.set_prefers_dark(false);
        assert_eq!(site.document().get(), Some(ThemeValue::Light));
    }

    #[test]
    fn test_system_theme_event() {
        let store = MemoryStore::new();
        let ambient = ManualAmbient::new(false);
        let mut site = site_with(&store, &ambient);

        site.handle(Event::SystemTheme { dark: true }).unwrap();
        assert_eq!(site.theme().current(), ThemeValue::Dark);
    }

    #[test]
    fn test_tab_click_bubbles_to_trigger() {
        let store = MemoryStore::new();
        let ambient = ManualAmbient::new(false);
        let mut site = site_with(&store, &ambient);

        site.handle(Event::click("videosLabel")).unwrap();

        let group = site.tab_group("media").unwrap();
        assert_eq!(group.active_panel(), "videos");
        assert_eq!(group.state_of("photosTab"), Some(TabState::Inactive));
        assert!(site.page().has_class("videos", "active"));
        assert!(site.page().has_class("videosTab", "active"));
        assert!(!site.page().has_class("photos", "active"));
        assert!(!site.page().has_class("photosTab", "active"));

        site.handle(Event::click("photosTab")).unwrap();
        assert_eq!(site.snapshot().tabs["media"], "photos");
    }

    #[test]
    fn test_mobile_menu_cycle() {
        let store = MemoryStore::new();
        let ambient = ManualAmbient::new(false);
        let mut site = site_with(&store, &ambient);

        site.handle(Event::click("menuIcon")).unwrap();
        assert_eq!(site.menu_state(), Some(MenuState::Open));
        assert!(site.page().has_class("mobileMenu", "active"));
        assert_eq!(site.page().style("menuIcon", "display"), Some("none"));
        assert_eq!(site.page().style("closeIcon", "display"), Some("block"));
        assert_eq!(site.page().body_style("overflow"), Some("hidden"));

        // Clicks inside the menu that are not links keep it open
        site.handle(Event::click("menuHeading")).unwrap();
        assert_eq!(site.menu_state(), Some(MenuState::Open));

        site.handle(Event::click("navNews")).unwrap();
        assert_eq!(site.menu_state(), Some(MenuState::Closed));
        assert!(!site.page().has_class("mobileMenu", "active"));
        assert_eq!(site.page().style("menuIcon", "display"), Some("block"));
        assert_eq!(site.page().body_style("overflow"), None);

        site.handle(Event::click("closeIcon")).unwrap();
        assert_eq!(site.menu_state(), Some(MenuState::Open));
        site.handle(Event::click("footer")).unwrap();
        assert_eq!(site.menu_state(), Some(MenuState::Closed));
    }

    #[test]
    fn test_scroll_to_top_per_frame() {
        let store = MemoryStore::new();
        let ambient = ManualAmbient::new(false);
        let mut site = site_with(&store, &ambient);

        site.handle(Event::Scroll { y: 120.0 }).unwrap();
        site.handle(Event::Scroll { y: 640.0 }).unwrap();
        assert!(!site.page().has_class("scrollToTop", "visible"));

        site.handle(Event::Frame).unwrap();
        assert!(site.page().has_class("scrollToTop", "visible"));

        site.handle(Event::click("scrollToTop")).unwrap();
        assert_eq!(site.scroll_y(), 0.0);
        site.handle(Event::Frame).unwrap();
        assert!(!site.page().has_class("scrollToTop", "visible"));
    }

    #[test]
    fn test_intersections_load_and_reveal() {
        let store = MemoryStore::new();
        let ambient = ManualAmbient::new(false);
        let mut site = site_with(&store, &ambient);

        site.handle(Event::Intersect {
            entries: vec![
                Intersection::new("heroImage", 0.2),
                Intersection::new("news-1", 0.05),
                Intersection::new("newsBanner", 1.0),
            ],
        })
        .unwrap();

        // Only images are lazily loaded
        assert_eq!(site.page().attribute("newsBanner", "src"), None);
        assert!(site.page().has_class("newsBanner", "lazy"));

        assert_eq!(site.page().attribute("heroImage", "src"), Some("images/hero.jpg"));
        assert!(!site.page().has_class("heroImage", "lazy"));
        assert!(!site.page().has_class("news-1", "fade-in"));

        site.handle(Event::Intersect {
            entries: vec![Intersection::new("news-1", 0.4)],
        })
        .unwrap();
        assert!(site.page().has_class("news-1", "fade-in"));
    }

    #[test]
    fn test_optional_controls_may_be_missing() {
        let spec = PageSpec {
            name: "bare".to_string(),
            elements: vec![ElementSpec::new("content")],
            tab_groups: Vec::new(),
        };
        let ambient = ManualAmbient::new(false);
        let mut site = Site::new(
            Config::new("/tmp/vitrine-test".into()),
            &spec,
            Preferences::memory_only(),
            &ambient,
        )
        .unwrap();

        site.handle(Event::click("content")).unwrap();
        site.handle(Event::click("themeToggle")).unwrap();
        site.handle(Event::Scroll { y: 900.0 }).unwrap();
        site.handle(Event::Frame).unwrap();

        assert_eq!(site.menu_state(), None);
        assert_eq!(site.theme().current(), ThemeValue::Light);
    }

    #[test]
    fn test_missing_tab_panel_fails() {
        let mut spec = index_spec();
        spec.tab_groups[0]
            .tabs
            .push(TabBinding::new("photosTab2", "archive"));
        spec.elements.push(ElementSpec::new("photosTab2"));

        let ambient = ManualAmbient::new(false);
        let result = Site::new(
            Config::new("/tmp/vitrine-test".into()),
            &spec,
            Preferences::memory_only(),
            &ambient,
        );
        assert!(matches!(result, Err(crate::CoreError::Tab(_))));
    }

    #[test]
    fn test_persisted_choice_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::new(dir.path().to_path_buf());
        config.database_path = dir.path().join("prefs").join("vitrine.db");
        let ambient = ManualAmbient::new(false);

        {
            let mut site =
                Site::new(config.clone(), &index_spec(), open_preferences(&config), &ambient)
                    .unwrap();
            site.handle(Event::click("themeToggle")).unwrap();
        }

        let ambient = ManualAmbient::new(false);
        let site = Site::new(config.clone(), &index_spec(), open_preferences(&config), &ambient)
            .unwrap();
        assert_eq!(site.theme().current(), ThemeValue::Dark);
        assert_eq!(site.snapshot().theme_source, ThemeSource::Stored);
    }

    #[test]
    fn test_preferences_memory_only_when_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::new(dir.path().to_path_buf());
        config.persist_preferences = false;

        let prefs = open_preferences(&config);
        assert!(!prefs.is_durable());

        prefs.set(THEME_KEY, "dark");
        assert_eq!(prefs.get(THEME_KEY).as_deref(), Some("dark"));
        assert!(!config.database_path.exists());
    }

    #[test]
    fn test_preferences_fall_back_when_database_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "occupied").unwrap();

        let mut config = Config::new(dir.path().to_path_buf());
        config.database_path = blocker.join("vitrine.db");

        let prefs = open_preferences(&config);
        assert!(!prefs.is_durable());

        prefs.set(THEME_KEY, "light");
        assert_eq!(prefs.get(THEME_KEY).as_deref(), Some("light"));
        prefs.remove(THEME_KEY);
        assert_eq!(prefs.get(THEME_KEY), None);
    }

    #[test]
    fn test_snapshot_serializes() {
        let ambient = ManualAmbient::new(true);
        let site = site_with(&MemoryStore::new(), &ambient);

        let json = serde_json::to_value(site.snapshot()).unwrap();
        assert_eq!(json["theme"], "dark");
        assert_eq!(json["theme_source"], "ambient");
        assert_eq!(json["menu"], "closed");
        assert_eq!(json["tabs"]["media"], "photos");
    }
}
