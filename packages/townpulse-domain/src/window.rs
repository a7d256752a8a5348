use time::{Date, Month, OffsetDateTime};

/// First day of the calendar month containing `now`, in UTC.
pub fn month_start(now: OffsetDateTime) -> Date {
	let date = now.date();

	date.replace_day(1).unwrap_or(date)
}

/// Inclusive lower bound of a trailing window: the month of `now`, truncated,
/// minus `window_months`. Computed at call time so results shift month to
/// month without any materialized refresh.
pub fn trailing_window_start(now: OffsetDateTime, window_months: i32) -> Date {
	shift_month_start(month_start(now), -window_months)
}

/// Exclusive upper bound for "current calendar month" filters.
pub fn next_month_start(now: OffsetDateTime) -> Date {
	shift_month_start(month_start(now), 1)
}

fn shift_month_start(start: Date, offset_months: i32) -> Date {
	let zero_based = start.year() * 12 + (i32::from(u8::from(start.month())) - 1) + offset_months;
	let year = zero_based.div_euclid(12);
	let month = zero_based.rem_euclid(12) as u8 + 1;
	let Ok(month) = Month::try_from(month) else {
		return start;
	};

	Date::from_calendar_date(year, month, 1).unwrap_or(start)
}
