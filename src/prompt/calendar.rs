// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Plain month grids in the layout of `cal(1)`
//!
//! The grid is handed to the model as a reference so the decorated calendar
//! gets weekdays and month length right.

use chrono::{Datelike, NaiveDate};

const WEEKDAY_HEADER: &str = "Su Mo Tu We Th Fr Sa";

/// Number of days in the given month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

/// Render the month containing `date` as a Sunday-first grid.
pub fn month_grid(date: NaiveDate) -> String {
    let title = date.format("%B %Y").to_string();
    let mut lines = vec![
        format!("{:^width$}", title, width = WEEKDAY_HEADER.len())
            .trim_end()
            .to_string(),
        WEEKDAY_HEADER.to_string(),
    ];

    let lead = date
        .with_day(1)
        .map(|first| first.weekday().num_days_from_sunday())
        .unwrap_or(0) as usize;
    let mut cells: Vec<String> = vec!["  ".to_string(); lead];
    for day in 1..=days_in_month(date.year(), date.month()) {
        cells.push(format!("{:>2}", day));
    }

    for week in cells.chunks(7) {
        lines.push(week.join(" "));
    }

    lines.join("\n")
}
