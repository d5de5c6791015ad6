use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

use quiz_core::model::{Level, MAX_TIMER_MINUTES, Preferences, QuizMode};
use storage::repository::KeyValueStore;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, warn};

use crate::keys;

/// Reads and writes the home-screen preferences, one key per field.
///
/// Persistence is best-effort: failures are logged and never surface to the
/// caller, so a broken store degrades to defaults instead of blocking a quiz.
#[derive(Clone)]
pub struct PreferencesService {
    kv: Arc<dyn KeyValueStore>,
}

impl PreferencesService {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Load preferences, falling back to the default for every key that is
    /// missing, unreadable or invalid.
    pub async fn load(&self) -> Preferences {
        let defaults = Preferences::default();

        let mode = self
            .read_parsed::<QuizMode>(keys::MODE)
            .await
            .unwrap_or(defaults.mode);
        let randomize = self
            .read_parsed::<bool>(keys::RANDOMIZE)
            .await
            .unwrap_or(defaults.randomize);
        let timer_enabled = self
            .read_parsed::<bool>(keys::TIMER)
            .await
            .unwrap_or(defaults.timer_enabled);
        let timer_minutes = self
            .read_parsed::<u32>(keys::TIMER_MINUTES)
            .await
            .map_or(defaults.timer_minutes, |m| m.clamp(1, MAX_TIMER_MINUTES));
        let count = self
            .read_parsed::<usize>(keys::COUNT)
            .await
            .map_or(defaults.count, |c| c.max(1));
        let chapter = self.read(keys::CHAPTER).await.filter(|c| !c.trim().is_empty());
        let level = self.read_parsed::<Level>(keys::LEVEL).await;

        Preferences {
            mode,
            randomize,
            timer_enabled,
            timer_minutes,
            chapter,
            level,
            count,
        }
    }

    /// Persist every field. Individual write failures are logged and skipped.
    pub async fn save(&self, prefs: &Preferences) {
        let entries = [
            (keys::MODE, prefs.mode.as_str().to_string()),
            (keys::RANDOMIZE, prefs.randomize.to_string()),
            (keys::TIMER, prefs.timer_enabled.to_string()),
            (keys::TIMER_MINUTES, prefs.timer_minutes.to_string()),
            (keys::CHAPTER, prefs.chapter.clone().unwrap_or_default()),
            (
                keys::LEVEL,
                prefs.level.map(Level::as_str).unwrap_or_default().to_string(),
            ),
            (keys::COUNT, prefs.count.to_string()),
        ];

        for (key, value) in entries {
            if let Err(err) = self.kv.set(key, &value).await {
                warn!(key, error = %err, "failed to persist preference");
            }
        }
    }

    /// Write snapshots one at a time, in the order they were sent.
    ///
    /// Snapshots queued behind a running write are collapsed to the newest
    /// one. Returns once every sender is dropped and the queue is drained.
    pub async fn run_writer(&self, mut snapshots: UnboundedReceiver<Preferences>) {
        while let Some(mut latest) = snapshots.recv().await {
            let mut skipped = 0_usize;
            while let Ok(newer) = snapshots.try_recv() {
                latest = newer;
                skipped += 1;
            }
            if skipped > 0 {
                debug!(skipped, "collapsed queued preference snapshots");
            }
            self.save(&latest).await;
        }
    }

    async fn read(&self, key: &str) -> Option<String> {
        match self.kv.get(key).await {
            Ok(value) => value,
            Err(err) => {
                warn!(key, error = %err, "failed to read preference");
                None
            }
        }
    }

    async fn read_parsed<T>(&self, key: &str) -> Option<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = self.read(key).await?;
        if raw.trim().is_empty() {
            return None;
        }
        match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, value = %raw, error = %err, "ignoring invalid preference");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryStore;

    #[tokio::test]
    async fn empty_store_yields_defaults() {
        let service = PreferencesService::new(Arc::new(InMemoryStore::new()));
        assert_eq!(service.load().await, Preferences::default());
    }

    #[tokio::test]
    async fn round_trips_every_field() {
        let store = InMemoryStore::new();
        let service = PreferencesService::new(Arc::new(store.clone()));
        let prefs = Preferences {
            mode: QuizMode::Exam,
            randomize: false,
            timer_enabled: true,
            timer_minutes: 25,
            chapter: Some("Réseaux".into()),
            level: Some(Level::Advanced),
            count: 4,
        };

        service.save(&prefs).await;
        assert_eq!(service.load().await, prefs);
        assert_eq!(store.get(keys::TIMER).await.unwrap().as_deref(), Some("true"));
        assert_eq!(store.get(keys::LEVEL).await.unwrap().as_deref(), Some("avancé"));
    }

    #[tokio::test]
    async fn writer_keeps_the_last_edit() {
        let store = InMemoryStore::new();
        let service = PreferencesService::new(Arc::new(store.clone()));
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();

        // Typing "25" in the minutes field: "2" first, then "25".
        for minutes in [2, 25] {
            let prefs = Preferences {
                timer_minutes: minutes,
                ..Preferences::default()
            };
            tx.send(prefs).unwrap();
        }
        drop(tx);
        service.run_writer(rx).await;

        assert_eq!(service.load().await.timer_minutes, 25);
        assert_eq!(
            store.get(keys::TIMER_MINUTES).await.unwrap().as_deref(),
            Some("25")
        );
    }

    #[tokio::test]
    async fn empty_filters_and_garbage_fall_back() {
        let store = InMemoryStore::new();
        store.set(keys::CHAPTER, "").await.unwrap();
        store.set(keys::LEVEL, "").await.unwrap();
        store.set(keys::MODE, "speedrun").await.unwrap();
        store.set(keys::COUNT, "-3").await.unwrap();
        store.set(keys::TIMER_MINUTES, "999").await.unwrap();

        let prefs = PreferencesService::new(Arc::new(store)).load().await;
        assert_eq!(prefs.chapter, None);
        assert_eq!(prefs.level, None);
        assert_eq!(prefs.mode, QuizMode::Training);
        assert_eq!(prefs.count, Preferences::default().count);
        assert_eq!(prefs.timer_minutes, MAX_TIMER_MINUTES);
    }
}
