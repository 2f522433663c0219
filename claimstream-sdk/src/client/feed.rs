//! Client-side notification feed lifecycle.
//!
//! [`NotificationFeed`] is a pure state machine: it never reads the clock
//! itself, callers pass `Instant`s in. A UI layer drives it with the
//! messages coming off a [`super::NotificationStream`], calls
//! [`tick`](NotificationFeed::tick) on its render cadence, and renders
//! whatever [`active`](NotificationFeed::active) returns.
//!
//! Lifecycle per notification:
//!
//! ```text
//! push ─► Visible ──(8s, or dismiss/click)──► Fading ──(300ms)──► removed
//! ```
//!
//! Removal always goes through the fading phase, never an instant cut.
//! A bounded seen-id set guarantees a redelivered event id never produces
//! a second visible notification.

use std::collections::{HashSet, VecDeque};
use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::objects::stream::LiveNotification;

/// How long a notification stays fully visible before auto-fading.
pub const DISPLAY_DURATION: Duration = Duration::from_secs(8);

/// Length of the fade-out phase preceding removal.
pub const FADE_DURATION: Duration = Duration::from_millis(300);

/// How many event ids the dedup set remembers.
const SEEN_CAPACITY: usize = 128;

/// Render phase of one on-screen notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPhase {
    Visible,
    Fading { since: Instant },
}

/// One notification currently owned by the feed.
#[derive(Debug, Clone)]
pub struct ActiveNotification {
    pub notification: LiveNotification,
    pub shown_at: Instant,
    pub phase: NotificationPhase,
}

/// Deduplicating, self-expiring set of on-screen notifications.
#[derive(Debug)]
pub struct NotificationFeed {
    seen_order: VecDeque<Uuid>,
    seen: HashSet<Uuid>,
    active: Vec<ActiveNotification>,
    display: Duration,
    fade: Duration,
}

impl Default for NotificationFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationFeed {
    pub fn new() -> Self {
        Self::with_durations(DISPLAY_DURATION, FADE_DURATION)
    }

    /// Override the display/fade durations (primarily for tests).
    pub fn with_durations(display: Duration, fade: Duration) -> Self {
        Self {
            seen_order: VecDeque::with_capacity(SEEN_CAPACITY),
            seen: HashSet::with_capacity(SEEN_CAPACITY),
            active: Vec::new(),
            display,
            fade,
        }
    }

    /// Accept a pushed notification.
    ///
    /// Returns `false` when the event id was already seen (the duplicate
    /// is silently dropped).
    pub fn push(&mut self, notification: LiveNotification, now: Instant) -> bool {
        if !self.remember(notification.id) {
            return false;
        }
        self.active.push(ActiveNotification {
            notification,
            shown_at: now,
            phase: NotificationPhase::Visible,
        });
        true
    }

    /// Advance time: start fades for expired notifications and detach
    /// those whose fade completed. Returns the number detached.
    ///
    /// Auto-fades are anchored at the expiry instant, not the tick time,
    /// so one late tick past `display + fade` completes the whole
    /// lifecycle.
    pub fn tick(&mut self, now: Instant) -> usize {
        for entry in &mut self.active {
            if entry.phase == NotificationPhase::Visible
                && now.duration_since(entry.shown_at) >= self.display
            {
                entry.phase = NotificationPhase::Fading {
                    since: entry.shown_at + self.display,
                };
            }
        }
        let fade = self.fade;
        let before = self.active.len();
        self.active.retain(|entry| match entry.phase {
            NotificationPhase::Visible => true,
            NotificationPhase::Fading { since } => now.duration_since(since) < fade,
        });
        before - self.active.len()
    }

    /// User pressed the close control: fade out without navigating.
    ///
    /// Returns `false` if the id is not currently visible.
    pub fn dismiss(&mut self, id: Uuid, now: Instant) -> bool {
        self.start_fade(id, now)
    }

    /// User clicked the notification body: fade out and return the
    /// navigation target for the referenced casino.
    pub fn click(&mut self, id: Uuid, now: Instant) -> Option<String> {
        let slug = self
            .active
            .iter()
            .find(|e| e.notification.id == id && e.phase == NotificationPhase::Visible)
            .map(|e| e.notification.casino_slug.clone())?;
        self.start_fade(id, now);
        Some(format!("/casinos/{slug}"))
    }

    /// View teardown: drop everything immediately. The seen set is kept
    /// so a re-mounted view does not replay old notifications.
    pub fn clear(&mut self) {
        self.active.clear();
    }

    /// All notifications the UI should currently render (including ones
    /// mid-fade).
    pub fn active(&self) -> &[ActiveNotification] {
        &self.active
    }

    /// Notifications in the fully-visible phase.
    pub fn visible_count(&self) -> usize {
        self.active
            .iter()
            .filter(|e| e.phase == NotificationPhase::Visible)
            .count()
    }

    fn start_fade(&mut self, id: Uuid, now: Instant) -> bool {
        match self
            .active
            .iter_mut()
            .find(|e| e.notification.id == id && e.phase == NotificationPhase::Visible)
        {
            Some(entry) => {
                entry.phase = NotificationPhase::Fading { since: now };
                true
            }
            None => false,
        }
    }

    /// Record an id in the bounded dedup set; `false` if already present.
    fn remember(&mut self, id: Uuid) -> bool {
        if self.seen.contains(&id) {
            return false;
        }
        if self.seen_order.len() == SEEN_CAPACITY
            && let Some(evicted) = self.seen_order.pop_front()
        {
            self.seen.remove(&evicted);
        }
        self.seen_order.push_back(id);
        self.seen.insert(id);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn notification(id: Uuid) -> LiveNotification {
        LiveNotification {
            id,
            casino_name: "Lucky Dice".into(),
            casino_logo: "/img/lucky-dice.png".into(),
            casino_slug: "lucky-dice".into(),
            bonus_title: "200% Welcome Bonus".into(),
            bonus_code: None,
            created_at: datetime!(2026-08-30 12:00:00 UTC),
        }
    }

    #[test]
    fn duplicate_id_is_shown_at_most_once() {
        let mut feed = NotificationFeed::new();
        let id = Uuid::new_v4();
        let now = Instant::now();

        assert!(feed.push(notification(id), now));
        assert!(!feed.push(notification(id), now));
        assert_eq!(feed.visible_count(), 1);
    }

    #[test]
    fn duplicate_is_rejected_even_after_removal() {
        let mut feed = NotificationFeed::new();
        let id = Uuid::new_v4();
        let start = Instant::now();

        feed.push(notification(id), start);
        feed.tick(start + DISPLAY_DURATION + FADE_DURATION);
        assert!(feed.active().is_empty());

        assert!(!feed.push(notification(id), start + Duration::from_secs(20)));
    }

    #[test]
    fn auto_expiry_fades_then_detaches() {
        let mut feed = NotificationFeed::new();
        let start = Instant::now();
        feed.push(notification(Uuid::new_v4()), start);

        // Still fully visible just before the display duration elapses.
        feed.tick(start + DISPLAY_DURATION - Duration::from_millis(1));
        assert_eq!(feed.visible_count(), 1);

        // Past the display duration: fading, still attached.
        let removed = feed.tick(start + DISPLAY_DURATION);
        assert_eq!(removed, 0);
        assert_eq!(feed.active().len(), 1);
        assert_eq!(feed.visible_count(), 0);

        // Fade complete: detached.
        let removed = feed.tick(start + DISPLAY_DURATION + FADE_DURATION);
        assert_eq!(removed, 1);
        assert!(feed.active().is_empty());
    }

    #[test]
    fn single_late_tick_expires_in_one_pass() {
        let mut feed = NotificationFeed::new();
        let start = Instant::now();
        feed.push(notification(Uuid::new_v4()), start);

        // No intermediate ticks: the first tick arrives after the full
        // lifecycle should have elapsed.
        let removed = feed.tick(start + DISPLAY_DURATION + FADE_DURATION);
        assert_eq!(removed, 1);
        assert!(feed.active().is_empty());
    }

    #[test]
    fn dismiss_fades_without_navigation() {
        let mut feed = NotificationFeed::new();
        let id = Uuid::new_v4();
        let now = Instant::now();
        feed.push(notification(id), now);

        assert!(feed.dismiss(id, now));
        assert_eq!(feed.visible_count(), 0);
        // Still attached until the fade completes.
        assert_eq!(feed.active().len(), 1);
        // Dismissing again is a no-op.
        assert!(!feed.dismiss(id, now));
    }

    #[test]
    fn click_returns_navigation_target_and_fades() {
        let mut feed = NotificationFeed::new();
        let id = Uuid::new_v4();
        let now = Instant::now();
        feed.push(notification(id), now);

        assert_eq!(feed.click(id, now).as_deref(), Some("/casinos/lucky-dice"));
        assert_eq!(feed.visible_count(), 0);
        assert_eq!(feed.click(id, now), None);
    }

    #[test]
    fn clear_detaches_everything_but_keeps_dedup() {
        let mut feed = NotificationFeed::new();
        let id = Uuid::new_v4();
        let now = Instant::now();
        feed.push(notification(id), now);

        feed.clear();
        assert!(feed.active().is_empty());
        assert!(!feed.push(notification(id), now));
    }

    #[test]
    fn seen_set_is_bounded() {
        let mut feed = NotificationFeed::new();
        let now = Instant::now();
        let first = Uuid::new_v4();
        feed.push(notification(first), now);

        for _ in 0..SEEN_CAPACITY {
            feed.push(notification(Uuid::new_v4()), now);
        }

        // `first` was evicted from the seen set, so it may show again.
        assert!(feed.push(notification(first), now));
    }
}
