use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimePart {
    Hours,
    Minutes,
    Seconds,
    Milliseconds,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Meridian {
    #[default]
    Am,
    Pm,
}

/// Text-backed time-of-day editor with optional 12-hour display.
///
/// Each part keeps the text the user typed; `value` is only `Some` while all
/// visible parts are valid.
#[derive(Clone, Debug)]
pub struct TimeInput {
    hours: String,
    minutes: String,
    seconds: String,
    milliseconds: String,
    pub meridian: Meridian,
    pub use_12h: bool,
    pub show_seconds: bool,
    pub show_milliseconds: bool,
    invalid: [bool; 4],
    value: Option<NaiveTime>,
}

fn index(part: TimePart) -> usize {
    match part {
        TimePart::Hours => 0,
        TimePart::Minutes => 1,
        TimePart::Seconds => 2,
        TimePart::Milliseconds => 3,
    }
}

fn parse_part(text: &str, upper: u32) -> Option<u32> {
    let text = text.trim();
    if text.is_empty() {
        return Some(0);
    }
    text.parse::<u32>().ok().filter(|v| *v < upper)
}

impl TimeInput {
    pub fn new(use_12h: bool, show_seconds: bool, show_milliseconds: bool) -> Self {
        TimeInput {
            hours: String::new(),
            minutes: String::new(),
            seconds: String::new(),
            milliseconds: String::new(),
            meridian: Meridian::Am,
            use_12h,
            show_seconds,
            show_milliseconds,
            invalid: [false; 4],
            value: None,
        }
    }

    pub fn value(&self) -> Option<NaiveTime> {
        self.value
    }

    pub fn part_text(&self, part: TimePart) -> &str {
        match part {
            TimePart::Hours => &self.hours,
            TimePart::Minutes => &self.minutes,
            TimePart::Seconds => &self.seconds,
            TimePart::Milliseconds => &self.milliseconds,
        }
    }

    pub fn is_part_invalid(&self, part: TimePart) -> bool {
        self.invalid[index(part)]
    }

    pub fn is_valid(&self) -> bool {
        !self.invalid.iter().any(|i| *i)
    }

    /// Marks every part invalid, e.g. when the combined date-time violates
    /// the datepicker limits.
    pub fn set_all_invalid(&mut self, invalid: bool) {
        self.invalid = [invalid; 4];
    }

    /// Replaces the displayed parts with `value`. `None` clears the editor.
    pub fn write_value(&mut self, value: Option<NaiveTime>) {
        self.value = value;
        let Some(time) = value else {
            self.hours.clear();
            self.minutes.clear();
            self.seconds.clear();
            self.milliseconds.clear();
            self.meridian = Meridian::Am;
            return;
        };
        let mut hours = time.hour();
        if self.use_12h {
            self.meridian = if hours >= 12 { Meridian::Pm } else { Meridian::Am };
            hours %= 12;
            if hours == 0 {
                hours = 12;
            }
        }
        self.hours = format!("{hours:02}");
        self.minutes = format!("{:02}", time.minute());
        self.seconds = format!("{:02}", time.second());
        self.milliseconds = format!("{:03}", time.nanosecond() / 1_000_000 % 1000);
    }

    /// Updates one part from typed text and recomputes the value.
    pub fn set_part(&mut self, part: TimePart, text: &str) -> Option<NaiveTime> {
        let slot = match part {
            TimePart::Hours => &mut self.hours,
            TimePart::Minutes => &mut self.minutes,
            TimePart::Seconds => &mut self.seconds,
            TimePart::Milliseconds => &mut self.milliseconds,
        };
        text.clone_into(slot);
        self.update_value()
    }

    /// Arrow-key stepping of one part. Each part wraps within its own range
    /// without carrying into the next larger part.
    pub fn step(&mut self, part: TimePart, up: bool) -> Option<NaiveTime> {
        let current = self.compose().unwrap_or(NaiveTime::MIN);
        let delta: i64 = if up { 1 } else { -1 };
        let wrap = |value: u32, modulo: i64| (value as i64 + delta).rem_euclid(modulo) as u32;
        let next = match part {
            TimePart::Hours => current.with_hour(wrap(current.hour(), 24)),
            TimePart::Minutes => current.with_minute(wrap(current.minute(), 60)),
            TimePart::Seconds => current.with_second(wrap(current.second(), 60)),
            TimePart::Milliseconds => {
                let millis = wrap(current.nanosecond() / 1_000_000, 1000);
                current.with_nanosecond(millis * 1_000_000)
            }
        };
        trace!(?part, up, "time step");
        self.write_value(next);
        self.update_value()
    }

    /// Switches between AM and PM, keeping the displayed hour.
    pub fn toggle_meridian(&mut self) -> Option<NaiveTime> {
        self.meridian = match self.meridian {
            Meridian::Am => Meridian::Pm,
            Meridian::Pm => Meridian::Am,
        };
        self.update_value()
    }

    /// The editable parts in display order.
    pub fn visible_parts(&self) -> Vec<TimePart> {
        let mut parts = vec![TimePart::Hours, TimePart::Minutes];
        if self.show_seconds {
            parts.push(TimePart::Seconds);
        }
        if self.show_milliseconds {
            parts.push(TimePart::Milliseconds);
        }
        parts
    }

    /// The part after `part`, wrapping back to the hours.
    pub fn next_part(&self, part: TimePart) -> TimePart {
        let parts = self.visible_parts();
        let at = parts.iter().position(|p| *p == part).unwrap_or(0);
        parts[(at + 1) % parts.len()]
    }

    pub fn meridian_label(&self) -> Option<&'static str> {
        self.use_12h.then_some(match self.meridian {
            Meridian::Am => "AM",
            Meridian::Pm => "PM",
        })
    }

    /// Display text such as `02:30 PM` or `14:30:05.250`.
    pub fn display(&self) -> String {
        let mut out = String::new();
        for part in self.visible_parts() {
            match part {
                TimePart::Hours => {}
                TimePart::Milliseconds => out.push('.'),
                _ => out.push(':'),
            }
            out.push_str(self.part_text(part));
        }
        if let Some(label) = self.meridian_label() {
            out.push(' ');
            out.push_str(label);
        }
        out
    }

    fn compose(&self) -> Option<NaiveTime> {
        let hour_limit = if self.use_12h { 13 } else { 24 };
        let mut hour = parse_part(&self.hours, hour_limit)?;
        if self.use_12h {
            hour %= 12;
            if self.meridian == Meridian::Pm {
                hour += 12;
            }
        }
        let minute = parse_part(&self.minutes, 60)?;
        let second = if self.show_seconds { parse_part(&self.seconds, 60)? } else { 0 };
        let millis = if self.show_milliseconds {
            parse_part(&self.milliseconds, 1000)?
        } else {
            0
        };
        NaiveTime::from_hms_milli_opt(hour, minute, second, millis)
    }

    fn update_value(&mut self) -> Option<NaiveTime> {
        let hour_limit = if self.use_12h { 13 } else { 24 };
        self.invalid = [
            parse_part(&self.hours, hour_limit).is_none(),
            parse_part(&self.minutes, 60).is_none(),
            self.show_seconds && parse_part(&self.seconds, 60).is_none(),
            self.show_milliseconds && parse_part(&self.milliseconds, 1000).is_none(),
        ];
        self.value = self.compose();
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn test_write_value_24h() {
        let mut input = TimeInput::new(false, true, false);
        input.write_value(Some(t(14, 5, 9)));
        assert_eq!(input.part_text(TimePart::Hours), "14");
        assert_eq!(input.display(), "14:05:09");
    }

    #[test]
    fn test_write_value_12h_midnight_and_noon() {
        let mut input = TimeInput::new(true, false, false);
        input.write_value(Some(t(0, 15, 0)));
        assert_eq!(input.display(), "12:15 AM");
        input.write_value(Some(t(12, 0, 0)));
        assert_eq!(input.display(), "12:00 PM");
        input.write_value(Some(t(23, 59, 0)));
        assert_eq!(input.display(), "11:59 PM");
    }

    #[test]
    fn test_write_none_clears() {
        let mut input = TimeInput::new(false, false, false);
        input.write_value(Some(t(8, 0, 0)));
        input.write_value(None);
        assert_eq!(input.part_text(TimePart::Minutes), "");
        assert_eq!(input.value(), None);
    }

    #[test]
    fn test_set_part_validates_ranges() {
        let mut input = TimeInput::new(false, true, false);
        input.write_value(Some(t(10, 0, 0)));
        assert_eq!(input.set_part(TimePart::Minutes, "45"), Some(t(10, 45, 0)));
        assert_eq!(input.set_part(TimePart::Minutes, "60"), None);
        assert!(input.is_part_invalid(TimePart::Minutes));
        assert!(!input.is_part_invalid(TimePart::Hours));
        assert_eq!(input.set_part(TimePart::Hours, "24"), None);
        assert_eq!(input.set_part(TimePart::Minutes, "x"), None);
        assert!(!input.is_valid());
    }

    #[test]
    fn test_hidden_parts_are_ignored() {
        let mut input = TimeInput::new(false, false, false);
        input.write_value(Some(t(10, 0, 0)));
        assert_eq!(input.set_part(TimePart::Seconds, "99"), Some(t(10, 0, 0)));
        assert!(input.is_valid());
    }

    #[test]
    fn test_12h_parts_and_meridian() {
        let mut input = TimeInput::new(true, false, false);
        input.write_value(Some(t(9, 30, 0)));
        assert_eq!(input.toggle_meridian(), Some(t(21, 30, 0)));
        assert_eq!(input.set_part(TimePart::Hours, "12"), Some(t(12, 30, 0)));
        assert_eq!(input.set_part(TimePart::Hours, "13"), None);
    }

    #[test]
    fn test_step_wraps_within_part() {
        let mut input = TimeInput::new(false, true, true);
        input.write_value(Some(t(23, 59, 59)));
        assert_eq!(input.step(TimePart::Hours, true), Some(t(0, 59, 59)));
        assert_eq!(input.step(TimePart::Minutes, true), Some(t(0, 0, 59)));
        assert_eq!(input.step(TimePart::Seconds, false), Some(t(0, 0, 58)));
        let stepped = input.step(TimePart::Milliseconds, false).unwrap();
        assert_eq!(stepped.nanosecond() / 1_000_000, 999);
    }

    #[test]
    fn test_step_12h_crosses_noon() {
        let mut input = TimeInput::new(true, false, false);
        input.write_value(Some(t(11, 0, 0)));
        assert_eq!(input.step(TimePart::Hours, true), Some(t(12, 0, 0)));
        assert_eq!(input.display(), "12:00 PM");
    }

    #[test]
    fn test_next_part_skips_hidden_parts() {
        let input = TimeInput::new(false, false, false);
        assert_eq!(input.next_part(TimePart::Hours), TimePart::Minutes);
        assert_eq!(input.next_part(TimePart::Minutes), TimePart::Hours);
        let input = TimeInput::new(false, false, true);
        assert_eq!(input.next_part(TimePart::Minutes), TimePart::Milliseconds);
        assert_eq!(input.next_part(TimePart::Milliseconds), TimePart::Hours);
        assert_eq!(input.visible_parts().len(), 3);
    }

    #[test]
    fn test_display_shows_typed_text() {
        let mut input = TimeInput::new(false, true, true);
        input.write_value(Some(t(14, 30, 5)));
        input.set_part(TimePart::Minutes, "7");
        assert_eq!(input.display(), "14:7:05.000");
        assert_eq!(input.meridian_label(), None);
    }

    #[test]
    fn test_step_from_empty_starts_at_midnight() {
        let mut input = TimeInput::new(false, false, false);
        assert_eq!(input.step(TimePart::Minutes, true), Some(t(0, 1, 0)));
    }

    #[test]
    fn test_set_all_invalid_flags_every_part() {
        let mut input = TimeInput::new(false, false, false);
        input.write_value(Some(t(12, 0, 0)));
        input.set_all_invalid(true);
        assert!(input.is_part_invalid(TimePart::Hours));
        assert!(input.is_part_invalid(TimePart::Minutes));
        assert!(!input.is_valid());
        assert_eq!(input.set_part(TimePart::Hours, "13"), Some(t(13, 0, 0)));
        assert!(input.is_valid());
    }
}
