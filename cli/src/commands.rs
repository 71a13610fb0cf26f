//! Subcommand implementations

use anyhow::Context;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use vitrine_core::{
    open_preferences, os_prefers_dark, Config, DocumentTheme, Event, ManualAmbient, PageSpec,
    Preferences, Site, SystemAmbient, ThemePreference,
};

/// Theme preference backed by the configured store, seeded with the
/// current OS preference
fn theme_preference(config: &Config) -> ThemePreference {
    let ambient = ManualAmbient::new(os_prefers_dark());
    ThemePreference::new(
        open_preferences(config),
        Arc::new(DocumentTheme::new()),
        &ambient,
    )
}

pub fn theme(config: &Config, out: &mut impl Write) -> anyhow::Result<()> {
    let preference = theme_preference(config);
    writeln!(out, "{} ({})", preference.current(), preference.source())?;
    Ok(())
}

pub fn toggle(config: &Config, out: &mut impl Write) -> anyhow::Result<()> {
    let preference = theme_preference(config);
    let theme = preference.toggle();
    writeln!(out, "{}", theme)?;
    Ok(())
}

pub fn reset(config: &Config, out: &mut impl Write) -> anyhow::Result<()> {
    let preference = theme_preference(config);
    let theme = preference.clear_explicit_choice();
    writeln!(out, "{} ({})", theme, preference.source())?;
    Ok(())
}

pub fn replay(
    config: &Config,
    page: &Path,
    events: &Path,
    dark: Option<bool>,
    ephemeral: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let page_json = std::fs::read_to_string(page)
        .with_context(|| format!("reading page {}", page.display()))?;
    let events_json = std::fs::read_to_string(events)
        .with_context(|| format!("reading events {}", events.display()))?;

    let preferences = if ephemeral {
        Preferences::memory_only()
    } else {
        open_preferences(config)
    };

    replay_json(
        config,
        &page_json,
        &events_json,
        dark.unwrap_or_else(os_prefers_dark),
        preferences,
        out,
    )
}

pub(crate) fn replay_json(
    config: &Config,
    page_json: &str,
    events_json: &str,
    prefers_dark: bool,
    preferences: Preferences,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let spec = PageSpec::from_json(page_json).context("parsing page")?;
    let events = Event::list_from_json(events_json).context("parsing events")?;

    let ambient = ManualAmbient::new(prefers_dark);
    let mut site = Site::new(config.clone(), &spec, preferences, &ambient)?;

    let count = events.len();
    for (index, event) in events.into_iter().enumerate() {
        let kind = event.kind();
        site.handle(event)
            .with_context(|| format!("event {} ({})", index, kind))?;
    }
    tracing::info!(page = %spec.name, events = count, "Replay finished");

    serde_json::to_writer_pretty(&mut *out, &site.snapshot())?;
    writeln!(out)?;
    Ok(())
}

pub fn watch(config: &Config) -> anyhow::Result<()> {
    let ambient = SystemAmbient::with_interval(config.ambient_poll_interval());
    let document = DocumentTheme::new();

    let _rendered = document.subscribe(|theme| {
        tracing::info!(theme = %theme, "Theme applied");
    });
    let preference = ThemePreference::new(
        open_preferences(config),
        Arc::new(document.clone()),
        &ambient,
    );

    tracing::info!(
        theme = %preference.current(),
        source = %preference.source(),
        interval_ms = config.ambient_poll_interval().as_millis() as u64,
        "Watching system color scheme"
    );

    loop {
        std::thread::park();
    }
}
