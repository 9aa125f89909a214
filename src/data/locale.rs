use crate::calc::date_math::days_of_week;
use crate::data::model::WeekStart;
use tracing::debug;

/// Calendar strings and patterns for one locale.
#[derive(Debug, Clone, PartialEq)]
pub struct Locale {
    pub id: &'static str,
    pub month_names: [&'static str; 12],
    pub month_names_short: [&'static str; 12],
    /// Weekday names, Sunday first.
    pub day_names: [&'static str; 7],
    /// Short weekday names, Sunday first.
    pub day_names_short: [&'static str; 7],
    /// AM / PM strings.
    pub day_periods: [&'static str; 2],
    pub short_date: &'static str,
    pub short_time: &'static str,
    pub medium_time: &'static str,
    /// Combines a time (`{0}`) and a date (`{1}`).
    pub date_time: &'static str,
    /// Pattern used for cell ARIA labels.
    pub full_date: &'static str,
    pub first_day_of_week: WeekStart,
}

const EN_MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];
const EN_MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const EN_DAYS: [&str; 7] = [
    "Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday",
];
const EN_DAYS_SHORT: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub const EN: Locale = Locale {
    id: "en",
    month_names: EN_MONTHS,
    month_names_short: EN_MONTHS_SHORT,
    day_names: EN_DAYS,
    day_names_short: EN_DAYS_SHORT,
    day_periods: ["AM", "PM"],
    short_date: "M/d/yy",
    short_time: "h:mm a",
    medium_time: "h:mm:ss a",
    date_time: "{1}, {0}",
    full_date: "EEEE, MMMM d, y",
    first_day_of_week: WeekStart::Sunday,
};

pub const EN_GB: Locale = Locale {
    id: "en-GB",
    month_names: EN_MONTHS,
    month_names_short: EN_MONTHS_SHORT,
    day_names: EN_DAYS,
    day_names_short: EN_DAYS_SHORT,
    day_periods: ["am", "pm"],
    short_date: "dd/MM/y",
    short_time: "HH:mm",
    medium_time: "HH:mm:ss",
    date_time: "{1}, {0}",
    full_date: "EEEE d MMMM y",
    first_day_of_week: WeekStart::Monday,
};

pub const DE: Locale = Locale {
    id: "de",
    month_names: [
        "Januar", "Februar", "März", "April", "Mai", "Juni", "Juli", "August", "September",
        "Oktober", "November", "Dezember",
    ],
    month_names_short: [
        "Jan.", "Feb.", "März", "Apr.", "Mai", "Juni", "Juli", "Aug.", "Sept.", "Okt.", "Nov.",
        "Dez.",
    ],
    day_names: [
        "Sonntag", "Montag", "Dienstag", "Mittwoch", "Donnerstag", "Freitag", "Samstag",
    ],
    day_names_short: ["So.", "Mo.", "Di.", "Mi.", "Do.", "Fr.", "Sa."],
    day_periods: ["AM", "PM"],
    short_date: "dd.MM.yy",
    short_time: "HH:mm",
    medium_time: "HH:mm:ss",
    date_time: "{1}, {0}",
    full_date: "EEEE, d. MMMM y",
    first_day_of_week: WeekStart::Monday,
};

pub const FR: Locale = Locale {
    id: "fr",
    month_names: [
        "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août", "septembre",
        "octobre", "novembre", "décembre",
    ],
    month_names_short: [
        "janv.", "févr.", "mars", "avr.", "mai", "juin", "juil.", "août", "sept.", "oct.",
        "nov.", "déc.",
    ],
    day_names: [
        "dimanche", "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi",
    ],
    day_names_short: ["dim.", "lun.", "mar.", "mer.", "jeu.", "ven.", "sam."],
    day_periods: ["AM", "PM"],
    short_date: "dd/MM/y",
    short_time: "HH:mm",
    medium_time: "HH:mm:ss",
    date_time: "{1} {0}",
    full_date: "EEEE d MMMM y",
    first_day_of_week: WeekStart::Monday,
};

const LOCALES: [&Locale; 4] = [&EN, &EN_GB, &DE, &FR];

impl Locale {
    /// Looks up a locale by id. Matches exactly first, then by language
    /// prefix (`de-AT` → `de`), and falls back to `en`.
    pub fn resolve(id: &str) -> &'static Locale {
        let wanted = id.trim();
        if let Some(found) = LOCALES.iter().find(|l| l.id.eq_ignore_ascii_case(wanted)) {
            return found;
        }
        let language = wanted.split(['-', '_']).next().unwrap_or("");
        if let Some(found) = LOCALES
            .iter()
            .find(|l| l.id.eq_ignore_ascii_case(language))
        {
            return found;
        }
        debug!(locale = wanted, "unknown locale, falling back to en");
        &EN
    }

    pub fn month_name(&self, month: u32) -> &'static str {
        self.month_names
            .get(month.saturating_sub(1) as usize)
            .copied()
            .unwrap_or("")
    }

    /// Short weekday headers ordered from the given week start.
    pub fn weekday_headers(&self, week_start: WeekStart) -> Vec<&'static str> {
        days_of_week(week_start)
            .iter()
            .map(|day| self.day_names_short[day.num_days_from_sunday() as usize])
            .collect()
    }

    /// Returns true when the locale's time patterns use a 12-hour clock.
    pub fn uses_12h_clock(&self) -> bool {
        self.short_time.contains('a')
    }
}
