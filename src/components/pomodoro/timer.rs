use super::models::{Phase, PomodoroSettings};

/// A completed phase transition reported by [`PomodoroTimer::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChange {
    pub finished: Phase,
    pub next: Phase,
}

/// Pure pomodoro state machine
///
/// The timer does not own a clock; a driver feeds it elapsed seconds through
/// [`PomodoroTimer::tick`] and delivers notifications for the phase changes
/// it returns. The cycle is focus, then a short break, with a long break
/// after every `long_break_interval`-th completed focus phase.
#[derive(Debug, Clone)]
pub struct PomodoroTimer {
    settings: PomodoroSettings,
    phase: Phase,
    remaining_secs: u32,
    is_running: bool,
    completed_focus_count: u32,
}

impl PomodoroTimer {
    pub fn new(settings: PomodoroSettings) -> Self {
        let remaining_secs = settings.duration_of(Phase::Focus);
        Self {
            settings,
            phase: Phase::Focus,
            remaining_secs,
            is_running: false,
            completed_focus_count: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn completed_focus_count(&self) -> u32 {
        self.completed_focus_count
    }

    pub fn start(&mut self) {
        self.is_running = true;
    }

    pub fn pause(&mut self) {
        self.is_running = false;
    }

    /// Back to a fresh, stopped focus phase
    pub fn reset(&mut self) {
        self.is_running = false;
        self.phase = Phase::Focus;
        self.remaining_secs = self.settings.duration_of(Phase::Focus);
        self.completed_focus_count = 0;
    }

    /// Complete the current phase immediately
    pub fn skip(&mut self) -> PhaseChange {
        self.complete_phase()
    }

    /// Advance the countdown by `elapsed_secs`
    ///
    /// Returns the phase change when the countdown reaches zero. The timer
    /// stops on a completed phase; the driver decides when the next one
    /// starts (matching the manual confirm flow of the dashboard UI).
    pub fn tick(&mut self, elapsed_secs: u32) -> Option<PhaseChange> {
        if !self.is_running {
            return None;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(elapsed_secs);
        if self.remaining_secs > 0 {
            return None;
        }

        Some(self.complete_phase())
    }

    /// Replace the settings; the current phase's countdown restarts
    pub fn apply_settings(&mut self, settings: PomodoroSettings) {
        self.settings = settings;
        self.remaining_secs = self.settings.duration_of(self.phase);
    }

    fn complete_phase(&mut self) -> PhaseChange {
        let finished = self.phase;
        self.is_running = false;

        let next = match finished {
            Phase::Focus => {
                self.completed_focus_count += 1;
                if self.completed_focus_count % self.settings.long_break_interval == 0 {
                    Phase::LongBreak
                } else {
                    Phase::ShortBreak
                }
            }
            Phase::ShortBreak | Phase::LongBreak => Phase::Focus,
        };

        self.phase = next;
        self.remaining_secs = self.settings.duration_of(next);

        PhaseChange { finished, next }
    }
}

/// Build the notification for a completed phase
pub fn format_phase_change(change: &PhaseChange) -> (String, String) {
    let body = match change.finished {
        Phase::Focus => "Time for a break!",
        Phase::ShortBreak | Phase::LongBreak => "Back to work!",
    };
    ("Pomodoro".to_string(), body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_settings() -> PomodoroSettings {
        PomodoroSettings {
            focus_secs: 120,
            short_break_secs: 60,
            long_break_secs: 300,
            long_break_interval: 2,
        }
    }

    #[test]
    fn tick_does_nothing_while_paused() {
        let mut timer = PomodoroTimer::new(quick_settings());
        assert_eq!(timer.tick(60), None);
        assert_eq!(timer.remaining_secs(), 120);
    }

    #[test]
    fn focus_completes_into_short_break() {
        let mut timer = PomodoroTimer::new(quick_settings());
        timer.start();

        assert_eq!(timer.tick(60), None);
        let change = timer.tick(60).unwrap();

        assert_eq!(change.finished, Phase::Focus);
        assert_eq!(change.next, Phase::ShortBreak);
        assert_eq!(timer.remaining_secs(), 60);
        assert!(!timer.is_running());
    }

    #[test]
    fn long_break_after_interval_focus_phases() {
        let mut timer = PomodoroTimer::new(quick_settings());

        // First focus -> short break
        timer.start();
        assert_eq!(timer.tick(120).unwrap().next, Phase::ShortBreak);
        timer.start();
        assert_eq!(timer.tick(60).unwrap().next, Phase::Focus);

        // Second focus -> long break (interval = 2)
        timer.start();
        let change = timer.tick(120).unwrap();
        assert_eq!(change.next, Phase::LongBreak);
        assert_eq!(timer.completed_focus_count(), 2);
    }

    #[test]
    fn skip_completes_the_current_phase() {
        let mut timer = PomodoroTimer::new(quick_settings());
        let change = timer.skip();
        assert_eq!(change.finished, Phase::Focus);
        assert_eq!(timer.phase(), Phase::ShortBreak);
    }

    #[test]
    fn reset_returns_to_fresh_focus() {
        let mut timer = PomodoroTimer::new(quick_settings());
        timer.start();
        let _ = timer.tick(120);
        timer.reset();

        assert_eq!(timer.phase(), Phase::Focus);
        assert_eq!(timer.remaining_secs(), 120);
        assert_eq!(timer.completed_focus_count(), 0);
        assert!(!timer.is_running());
    }

    #[test]
    fn apply_settings_restarts_current_countdown() {
        let mut timer = PomodoroTimer::new(quick_settings());
        timer.start();
        let _ = timer.tick(30);

        let mut settings = quick_settings();
        settings.focus_secs = 600;
        timer.apply_settings(settings);

        assert_eq!(timer.remaining_secs(), 600);
    }

    #[test]
    fn overshooting_tick_still_completes_once() {
        let mut timer = PomodoroTimer::new(quick_settings());
        timer.start();
        let change = timer.tick(10_000).unwrap();
        assert_eq!(change.finished, Phase::Focus);
        assert_eq!(timer.remaining_secs(), 60);
    }
}
