use chrono::{Datelike, NaiveDate};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date: {0}")]
pub struct InvalidDate(pub String);

pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

/// Parse an ISO `YYYY-MM-DD` calendar date with a year in `1..=9999`.
pub fn parse_date(raw: &str) -> Result<NaiveDate, InvalidDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .filter(|date| (MIN_YEAR..=MAX_YEAR).contains(&date.year()))
        .ok_or_else(|| InvalidDate(raw.to_string()))
}

/// The day `birthday` is celebrated in `year`.
/// Feb 29 is observed on Feb 28 when `year` is not a leap year.
pub fn observed_in(birthday: NaiveDate, year: i32) -> Result<NaiveDate, InvalidDate> {
    NaiveDate::from_ymd_opt(year, birthday.month(), birthday.day())
        .or_else(|| {
            if birthday.month() == 2 && birthday.day() == 29 {
                NaiveDate::from_ymd_opt(year, 2, 28)
            } else {
                None
            }
        })
        .ok_or_else(|| InvalidDate(format!("{birthday} has no occurrence in {year}")))
}

/// Days from `today` until the next time `birthday` comes around.
/// Returns 0 when today is the birthday; never more than 365.
pub fn days_until_next_birthday(today: NaiveDate, birthday: NaiveDate) -> Result<i64, InvalidDate> {
    let mut next = observed_in(birthday, today.year())?;
    if next < today {
        next = observed_in(birthday, today.year() + 1)?;
    }
    Ok((next - today).num_days())
}

/// Completed years of age on `today`. Birthdays in the future count as 0.
pub fn age_on(today: NaiveDate, birthday: NaiveDate) -> u32 {
    if birthday >= today {
        return 0;
    }
    let mut years = today.year() - birthday.year();
    if observed_in(birthday, today.year()).map_or(false, |d| d > today) {
        years -= 1;
    }
    years.max(0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_birthday_today_is_zero() {
        assert_eq!(days_until_next_birthday(d(2024, 3, 10), d(1990, 3, 10)), Ok(0));
    }

    #[test]
    fn test_birthday_yesterday_rolls_to_next_year() {
        // 2025 has no Feb 29, so the gap is one day short of a full year
        assert_eq!(days_until_next_birthday(d(2024, 3, 10), d(1990, 3, 9)), Ok(364));
    }

    #[test]
    fn test_birthday_later_this_year() {
        assert_eq!(days_until_next_birthday(d(2024, 1, 1), d(2000, 1, 31)), Ok(30));
        assert_eq!(days_until_next_birthday(d(2023, 12, 31), d(1985, 1, 1)), Ok(1));
    }

    #[test]
    fn test_leap_day_observed_on_feb_28() {
        let leapling = d(2000, 2, 29);
        assert_eq!(observed_in(leapling, 2023), Ok(d(2023, 2, 28)));
        assert_eq!(observed_in(leapling, 2024), Ok(d(2024, 2, 29)));
        assert_eq!(days_until_next_birthday(d(2023, 2, 28), leapling), Ok(0));
        assert_eq!(days_until_next_birthday(d(2023, 2, 1), leapling), Ok(27));
        // from Mar 1 2023 the next occurrence is the real leap day
        assert_eq!(days_until_next_birthday(d(2023, 3, 1), leapling), Ok(365));
    }

    #[test]
    fn test_countdown_stays_within_a_year() {
        let birthdays = [d(1990, 1, 1), d(1970, 2, 28), d(2000, 2, 29), d(1999, 3, 1), d(1980, 12, 31)];
        let mut today = d(2023, 1, 1);
        while today <= d(2025, 12, 31) {
            for &birthday in &birthdays {
                let days = days_until_next_birthday(today, birthday).unwrap();
                assert!((0..366).contains(&days), "{today} -> {birthday}: {days}");
                if today.month() == birthday.month() && today.day() == birthday.day() {
                    assert_eq!(days, 0);
                }
            }
            today = today.succ_opt().unwrap();
        }
    }

    #[test]
    fn test_out_of_range_year_is_invalid_date() {
        assert!(days_until_next_birthday(NaiveDate::MAX, d(2000, 12, 31)).is_ok());
        assert!(days_until_next_birthday(NaiveDate::MAX, d(2000, 1, 1)).is_err());
    }

    #[test]
    fn test_age_on() {
        assert_eq!(age_on(d(2024, 3, 10), d(1990, 3, 10)), 34);
        assert_eq!(age_on(d(2024, 3, 9), d(1990, 3, 10)), 33);
        assert_eq!(age_on(d(2023, 2, 28), d(2000, 2, 29)), 23);
        assert_eq!(age_on(d(2023, 2, 27), d(2000, 2, 29)), 22);
        assert_eq!(age_on(d(2020, 1, 1), d(2024, 1, 1)), 0);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date(" 1990-03-09 "), Ok(d(1990, 3, 9)));
        assert!(parse_date("1990-02-30").is_err());
        assert!(parse_date("09.03.1990").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn test_parse_date_year_range() {
        assert_eq!(parse_date("0001-01-01"), Ok(d(1, 1, 1)));
        assert_eq!(parse_date("9999-12-31"), Ok(d(9999, 12, 31)));
        for raw in ["0000-01-01", "-0050-01-01", "+12345-01-01", "10000-01-01"] {
            assert_eq!(parse_date(raw), Err(InvalidDate(raw.to_string())), "{raw}");
        }
    }
}
