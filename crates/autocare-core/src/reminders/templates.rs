//! Fixed SMS layouts for upcoming and overdue service reminders.

use chrono::NaiveDate;

use super::{Classification, DueReminder, TemplateType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub template_type: TemplateType,
    pub body: String,
}

/// Renders the message for `due` according to `classification`.
///
/// Returns `None` for [`Classification::Skip`].
#[must_use]
pub fn render(due: &DueReminder, classification: Classification) -> Option<RenderedMessage> {
    match classification {
        Classification::Upcoming { days_until_due } => Some(RenderedMessage {
            template_type: TemplateType::Upcoming,
            body: upcoming(due, days_until_due),
        }),
        Classification::FollowUp { days_late } => Some(RenderedMessage {
            template_type: TemplateType::FollowUp,
            body: follow_up(due, days_late),
        }),
        Classification::Skip => None,
    }
}

fn upcoming(due: &DueReminder, days_until_due: i64) -> String {
    let when = match days_until_due {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        n => format!("in {n} days"),
    };

    let mut lines = vec![format!(
        "Hi {}, this is a reminder that your {} is due for {} {when} ({}).",
        greeting_name(due),
        due.vehicle.display_name(),
        due.reminder.service_type,
        format_due_date(due.reminder.target_date),
    )];
    if let Some(line) = mileage_line(due.reminder.mileage) {
        lines.push(line);
    }
    lines.push("Reply to this message or give us a call to book your appointment.".to_string());
    lines.join("\n")
}

fn follow_up(due: &DueReminder, days_late: i64) -> String {
    let days = if days_late == 1 {
        "1 day".to_string()
    } else {
        format!("{days_late} days")
    };

    let mut lines = vec![format!(
        "Hi {}, your {} was due for {} on {} ({days} ago).",
        greeting_name(due),
        due.vehicle.display_name(),
        due.reminder.service_type,
        format_due_date(due.reminder.target_date),
    )];
    if let Some(line) = mileage_line(due.reminder.mileage) {
        lines.push(line);
    }
    lines.push(
        "Putting off scheduled maintenance can hurt your vehicle's performance and may affect \
         your warranty coverage."
            .to_string(),
    );
    lines.push("Reply to this message or give us a call to book your service today.".to_string());
    lines.join("\n")
}

fn greeting_name(due: &DueReminder) -> &str {
    due.customer
        .full_name
        .as_deref()
        .and_then(|name| name.split_whitespace().next())
        .unwrap_or("there")
}

fn mileage_line(mileage: Option<i32>) -> Option<String> {
    mileage.map(|m| format!("Mileage on record: {} mi", group_thousands(m)))
}

/// `"Monday, March 10, 2025"`.
#[must_use]
pub fn format_due_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

fn group_thousands(value: i32) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
