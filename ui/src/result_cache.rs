//! Last known values of everything the dashboard shows.
//!
//! Task completions land here even while the dashboard is hidden. When it
//! is shown again, every entry it has not seen yet is pushed to it.

use dioxus_logger::tracing::debug;
use serde::Deserialize;
use serde::Serialize;

use crate::dashboard::Dashboard;
use crate::settings::AppSettings;

/// Which dashboard element a cached value feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIs)]
pub enum ResultKind {
    /// A per-exchange box, keyed by exchange name.
    Exchange,
    /// A generic box such as "banks" or "blockchain", keyed by id.
    Box,
}

/// A value to store, as produced by a task completion.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultUpdate {
    pub kind: ResultKind,
    pub key: String,
    pub value: f64,
    pub icon: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CachedResult {
    pub kind: ResultKind,
    pub key: String,
    /// USD.
    pub value: f64,
    pub icon: String,
    /// Whether the dashboard already shows `value`.
    pub applied: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultCache {
    /// In first-seen order.
    entries: Vec<CachedResult>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: ResultKind, key: &str) -> Option<&CachedResult> {
        self.entries.iter().find(|e| e.kind == kind && e.key == key)
    }

    fn get_mut(&mut self, kind: ResultKind, key: &str) -> Option<&mut CachedResult> {
        self.entries
            .iter_mut()
            .find(|e| e.kind == kind && e.key == key)
    }

    /// Returns the entry for `(kind, key)`, leaving its value alone, or
    /// appends a new unapplied one.
    pub fn upsert(&mut self, kind: ResultKind, key: &str, value: f64, icon: &str) -> &mut CachedResult {
        let index = match self.entries.iter().position(|e| e.kind == kind && e.key == key) {
            Some(index) => index,
            None => {
                self.entries.push(CachedResult {
                    kind,
                    key: key.to_string(),
                    value,
                    icon: icon.to_string(),
                    applied: false,
                });
                self.entries.len() - 1
            }
        };
        &mut self.entries[index]
    }

    /// Stores `update`. A new entry, or an existing one whose value
    /// changed, is marked unapplied.
    pub fn record(&mut self, update: ResultUpdate) {
        let entry = self.upsert(update.kind, &update.key, update.value, &update.icon);
        if entry.value != update.value {
            entry.value = update.value;
            entry.applied = false;
        }
    }

    /// Changes the value of an existing entry and marks it unapplied.
    /// Returns false if there is no such entry.
    pub fn set_value(&mut self, kind: ResultKind, key: &str, value: f64) -> bool {
        match self.get_mut(kind, key) {
            Some(entry) => {
                entry.value = value;
                entry.applied = false;
                true
            }
            None => false,
        }
    }

    pub fn mark_applied(&mut self, kind: ResultKind, key: &str) -> bool {
        match self.get_mut(kind, key) {
            Some(entry) => {
                entry.applied = true;
                true
            }
            None => false,
        }
    }

    pub fn unapplied(&self) -> impl Iterator<Item = &CachedResult> {
        self.entries.iter().filter(|e| !e.applied)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CachedResult> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pushes every unapplied entry to `dashboard`, creating boxes that do
    /// not exist yet and updating the rest. Does nothing while the dashboard
    /// is hidden. Returns how many entries were applied.
    pub fn reapply_unapplied(&mut self, dashboard: &mut Dashboard, settings: &AppSettings) -> usize {
        if !dashboard.is_visible() {
            return 0;
        }

        let mut applied = 0;
        for entry in self.entries.iter_mut().filter(|e| !e.applied) {
            let created = match entry.kind {
                ResultKind::Exchange => {
                    dashboard.render_exchange_box(&entry.key, entry.value, &entry.icon, settings)
                }
                ResultKind::Box => {
                    dashboard.render_box(&entry.key, &entry.icon, entry.value, settings)
                }
            };
            if !created {
                dashboard.update_amount(entry.kind, &entry.key, entry.value, settings);
            }
            entry.applied = true;
            applied += 1;
        }
        if applied > 0 {
            debug!("applied {} cached results to the dashboard", applied);
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::prefs::display_preference::DisplayPreference;

    fn settings() -> AppSettings {
        AppSettings::from_prefs(&DisplayPreference {
            fallback_currency: Default::default(),
            floating_precision: 2,
        })
    }

    fn update(kind: ResultKind, key: &str, value: f64) -> ResultUpdate {
        ResultUpdate {
            kind,
            key: key.to_string(),
            value,
            icon: "🏦".to_string(),
        }
    }

    #[test]
    fn test_record_marks_changes_unapplied() {
        let mut cache = ResultCache::new();
        cache.record(update(ResultKind::Box, "banks", 10.0));
        assert!(cache.mark_applied(ResultKind::Box, "banks"));
        assert_eq!(cache.unapplied().count(), 0);

        // same value: nothing new to show.
        cache.record(update(ResultKind::Box, "banks", 10.0));
        assert_eq!(cache.unapplied().count(), 0);

        cache.record(update(ResultKind::Box, "banks", 12.0));
        assert_eq!(cache.unapplied().count(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_upsert_keeps_existing_value() {
        let mut cache = ResultCache::new();
        cache.upsert(ResultKind::Box, "blockchain", 5.0, "⛓").applied = true;
        let entry = cache.upsert(ResultKind::Box, "blockchain", 9.0, "⛓");
        assert_eq!(entry.value, 5.0);
        assert!(entry.applied);

        // same key, other kind: a separate entry.
        cache.upsert(ResultKind::Exchange, "blockchain", 1.0, "📈");
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_set_value_requires_entry() {
        let mut cache = ResultCache::new();
        assert!(!cache.set_value(ResultKind::Exchange, "kraken", 1.0));
        cache.record(update(ResultKind::Exchange, "kraken", 1.0));
        cache.mark_applied(ResultKind::Exchange, "kraken");
        assert!(cache.set_value(ResultKind::Exchange, "kraken", 2.0));
        assert!(!cache.get(ResultKind::Exchange, "kraken").unwrap().applied);
    }

    #[test]
    fn test_hidden_dashboard_keeps_results_pending() {
        let settings = settings();
        let mut dashboard = Dashboard::new();
        let mut cache = ResultCache::new();
        cache.record(update(ResultKind::Exchange, "kraken", 1500.0));

        assert_eq!(cache.reapply_unapplied(&mut dashboard, &settings), 0);
        assert!(dashboard.boxes().is_empty());

        dashboard.set_visible(true);
        assert_eq!(cache.reapply_unapplied(&mut dashboard, &settings), 1);
        assert_eq!(dashboard.boxes().len(), 1);
        assert_eq!(dashboard.boxes()[0].display, "$1,500.00");
        assert_eq!(cache.reapply_unapplied(&mut dashboard, &settings), 0);
    }

    #[test]
    fn test_reapply_updates_existing_box() {
        let settings = settings();
        let mut dashboard = Dashboard::new();
        dashboard.set_visible(true);
        let mut cache = ResultCache::new();

        cache.record(update(ResultKind::Box, "banks", 100.0));
        cache.reapply_unapplied(&mut dashboard, &settings);
        cache.record(update(ResultKind::Box, "banks", 250.0));
        cache.reapply_unapplied(&mut dashboard, &settings);

        assert_eq!(dashboard.boxes().len(), 1);
        assert_eq!(dashboard.boxes()[0].usd_value, 250.0);
    }
}
