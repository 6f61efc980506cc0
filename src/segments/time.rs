use crate::bar::{Environment, Module, ModuleRef, RenderModule};
use crate::input::{ClickEvent, ClickKind};
use crate::segments::FormatToggle;
use crate::utils::{apply_format, FormatContext, FormatString};
use anyhow::Result;
use chrono::{DateTime, Datelike, Local, TimeZone, Timelike};
use futures::future::LocalBoxFuture;
use serde_json::json;

const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September", "October",
    "November", "December",
];

const WEEKDAYS: [&str; 7] = [
    "Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday",
];

/// `"st"` for 1, 21, 31; `"th"` for 11..=13 and the like.
pub fn day_suffix(day: u32) -> &'static str {
    if (10..20).contains(&day) {
        return "th";
    }
    match day % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Format keys for a point in time.
///
/// year, month (1-based), monthName, shortMonthName, dayOfMonth,
/// dayOfMonthSuffix, dayOfWeek, dayOfWeekNumber (days since Sunday),
/// shortDayOfWeek, hour, twelveHour, amPm, minute, second.
pub fn time_context<Tz: TimeZone>(t: &DateTime<Tz>) -> FormatContext {
    let month = MONTHS[t.month0() as usize];
    let weekday = WEEKDAYS[t.weekday().num_days_from_sunday() as usize];
    let (pm, twelve) = t.hour12();

    let value = json!({
        "year": t.year(),
        "month": t.month(),
        "monthName": month,
        "shortMonthName": &month[..3],
        "dayOfMonth": t.day(),
        "dayOfMonthSuffix": day_suffix(t.day()),
        "dayOfWeek": weekday,
        "dayOfWeekNumber": t.weekday().num_days_from_sunday(),
        "shortDayOfWeek": &weekday[..3],
        "hour": t.hour(),
        "twelveHour": twelve,
        "amPm": if pm { "pm" } else { "am" },
        "minute": format!("{:02}", t.minute()),
        "second": format!("{:02}", t.second()),
    });
    match value {
        serde_json::Value::Object(map) => map,
        _ => FormatContext::new(),
    }
}

struct Time {
    format: FormatString,
    alternate: Option<FormatString>,
    toggle: FormatToggle,
}

impl RenderModule for Time {
    fn render<'a>(&'a self, _env: &'a Environment) -> LocalBoxFuture<'a, Result<String>> {
        Box::pin(async move {
            let context = time_context(&Local::now());
            let format = match &self.alternate {
                Some(alternate) if self.toggle.is_alternate() => alternate,
                _ => &self.format,
            };
            Ok(apply_format(format, &context).await)
        })
    }

    fn accepts_input(&self) -> bool {
        true
    }

    fn input<'a>(&'a self, event: &'a ClickEvent) -> LocalBoxFuture<'a, Result<()>> {
        Box::pin(async move {
            if event.kind == ClickKind::MouseLeft {
                self.toggle.flip();
            }
            Ok(())
        })
    }
}

/// Local date and time. With `alternate`, left clicks switch between the two formats.
pub fn time(format: impl Into<FormatString>, alternate: Option<FormatString>) -> ModuleRef {
    Module::render(Time {
        format: format.into(),
        alternate,
        toggle: FormatToggle::default(),
    })
}
