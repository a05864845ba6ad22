/// Reminder settings shared by the background worker and the UI pages

/// Name of the recurring reminder alarm
pub const ALARM_NAME: &str = "accomplishment-reminder";

/// Interval used when nothing valid has been persisted yet
pub const DEFAULT_INTERVAL_MINUTES: u32 = 15;

/// Fixed layout and limits for the reminder prompt.
///
/// Everything the coordinator, scheduler and entry store need to know about
/// sizes and bounds lives here so tests can shrink or vary it.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderConfig {
    pub alarm_name: String,
    pub default_interval_minutes: u32,
    pub min_interval_minutes: u32,
    pub max_interval_minutes: u32,
    pub window_width: i32,
    pub window_height: i32,
    /// Extension-relative page loaded into the reminder popup
    pub reminder_page: String,
    pub max_notes_per_save: usize,
    /// Notes are cut to this many characters
    pub max_note_chars: usize,
}

impl ReminderConfig {
    /// Round and clamp a requested interval into the accepted range
    pub fn clamp_interval(&self, requested: f64) -> u32 {
        let min = self.min_interval_minutes as f64;
        let max = self.max_interval_minutes as f64;
        requested.round().clamp(min, max) as u32
    }
}

impl Default for ReminderConfig {
    fn default() -> Self {
        ReminderConfig {
            alarm_name: ALARM_NAME.to_string(),
            default_interval_minutes: DEFAULT_INTERVAL_MINUTES,
            min_interval_minutes: 1,
            max_interval_minutes: 1440,
            window_width: 420,
            window_height: 520,
            reminder_page: "reminder.html".to_string(),
            max_notes_per_save: 3,
            max_note_chars: 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReminderConfig::default();
        assert_eq!(config.alarm_name, "accomplishment-reminder");
        assert_eq!(config.default_interval_minutes, 15);
        assert_eq!((config.window_width, config.window_height), (420, 520));
    }

    #[test]
    fn test_clamp_interval() {
        let config = ReminderConfig::default();
        assert_eq!(config.clamp_interval(0.0), 1);
        assert_eq!(config.clamp_interval(-30.0), 1);
        assert_eq!(config.clamp_interval(2.5), 3);
        assert_eq!(config.clamp_interval(44.4), 44);
        assert_eq!(config.clamp_interval(5000.0), 1440);
    }
}
