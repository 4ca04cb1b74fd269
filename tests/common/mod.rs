#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use multi_timer::{
    engine::TickEngine,
    services::{Haptics, Notifier},
    state::NewTimer,
};

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn titles(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(title, _)| title.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, message: &str) {
        self.sent
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
    }
}

#[derive(Debug, Default)]
pub struct CountingHaptics {
    pub count: AtomicUsize,
}

impl CountingHaptics {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl Haptics for CountingHaptics {
    fn vibrate(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn ticker() -> (TickEngine, Arc<RecordingNotifier>, Arc<CountingHaptics>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let haptics = Arc::new(CountingHaptics::default());
    let engine = TickEngine::new(notifier.clone(), haptics.clone());
    (engine, notifier, haptics)
}

pub fn new_timer(name: &str, category: &str, duration: u64, halfway_alert: bool) -> NewTimer {
    NewTimer {
        name: name.to_string(),
        category: category.to_string(),
        duration,
        halfway_alert,
    }
}
