use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use crate::locale::Locale;

/// Timezone QR dates are displayed in.
pub const DEFAULT_DISPLAY_TZ: Tz = chrono_tz::Asia::Bangkok;

/// Offset between the Gregorian and the Thai Buddhist calendar year.
const BUDDHIST_ERA_OFFSET: i32 = 543;

const TH_MONTHS_SHORT: [&str; 12] = [
    "ม.ค.", "ก.พ.", "มี.ค.", "เม.ย.", "พ.ค.", "มิ.ย.", "ก.ค.", "ส.ค.", "ก.ย.", "ต.ค.", "พ.ย.", "ธ.ค.",
];

const EN_MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Today's date in the display timezone.
pub fn display_date_today() -> NaiveDate {
    Utc::now().with_timezone(&DEFAULT_DISPLAY_TZ).date_naive()
}

/// Subtracts a number of days from a date, returning `None` on overflow.
pub fn days_before(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    Duration::try_days(days).and_then(|d| date.checked_sub_signed(d))
}

/// Converts epoch seconds to a UTC instant, `None` if out of range.
pub fn from_epoch_seconds(seconds: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(seconds, 0)
}

/// Formats a date the way the QR card shows it.
///
/// Thai uses the Buddhist era year and the `น.` suffix, e.g.
/// `16 ต.ค. 2569 14:05 น.`; English gives `16 Oct 2026 14:05`.
pub fn format_display_datetime<T: TimeZone>(instant: &DateTime<T>, locale: Locale) -> String {
    let local = instant.with_timezone(&DEFAULT_DISPLAY_TZ);
    let month = local.month0() as usize;
    let time = local.format("%H:%M");
    match locale {
        Locale::Th => format!(
            "{} {} {} {} น.",
            local.day(),
            TH_MONTHS_SHORT[month],
            local.year() + BUDDHIST_ERA_OFFSET,
            time
        ),
        Locale::En => format!(
            "{} {} {} {}",
            local.day(),
            EN_MONTHS_SHORT[month],
            local.year(),
            time
        ),
    }
}

/// Formats a calendar date without a time component.
pub fn format_display_date(date: NaiveDate, locale: Locale) -> String {
    let month = date.month0() as usize;
    match locale {
        Locale::Th => format!(
            "{} {} {}",
            date.day(),
            TH_MONTHS_SHORT[month],
            date.year() + BUDDHIST_ERA_OFFSET
        ),
        Locale::En => format!("{} {} {}", date.day(), EN_MONTHS_SHORT[month], date.year()),
    }
}
