use chrono::{Datelike, NaiveDate};

/// Formats the age of something born on `date_of_birth` (`YYYY-MM-DD`) as of `today`.
///
/// At least one full year gives "1 Year" / "N Years", otherwise "1 Month" / "N Months".
/// Returns `None` for unparseable or future dates.
pub fn age_label(date_of_birth: &str, today: NaiveDate) -> Option<String> {
    let dob = NaiveDate::parse_from_str(date_of_birth.trim(), "%Y-%m-%d").ok()?;
    if dob > today {
        return None;
    }

    let mut years = today.year() - dob.year();
    let mut months = today.month() as i32 - dob.month() as i32;
    if months < 0 {
        years -= 1;
        months += 12;
    }
    if today.day() < dob.day() {
        months -= 1;
        if months < 0 {
            years -= 1;
            months += 12;
        }
    }

    let label = if years >= 1 {
        if years == 1 {
            "1 Year".to_string()
        } else {
            format!("{} Years", years)
        }
    } else if months == 1 {
        "1 Month".to_string()
    } else {
        format!("{} Months", months)
    };
    Some(label)
}
