use tabled::settings::Style;
use tabled::{Table, Tabled};
use taskboard_core::{AppError, Task, TaskStats};
use time::{Duration, OffsetDateTime};

#[derive(Tabled)]
struct TaskRow<'a> {
    #[tabled(rename = "ID")]
    id: &'a str,
    #[tabled(rename = "Title")]
    title: &'a str,
    #[tabled(rename = "Deadline")]
    deadline: &'a str,
    #[tabled(rename = "Due")]
    due: String,
    #[tabled(rename = "Status")]
    status: &'static str,
}

pub fn status_label(task: &Task, now: OffsetDateTime) -> &'static str {
    if task.completed {
        "completed"
    } else if task.is_overdue(now) {
        "overdue"
    } else {
        "pending"
    }
}

/// Deadline relative to `now`, e.g. `in 3 days` or `2 hours ago`; `-` when it does not parse.
pub fn relative_deadline(task: &Task, now: OffsetDateTime) -> String {
    let Some(deadline) = task.deadline_at() else {
        return "-".to_string();
    };

    let delta = deadline - now;
    let distance = distance_words(delta.abs());
    if delta.is_negative() {
        format!("{distance} ago")
    } else {
        format!("in {distance}")
    }
}

fn distance_words(span: Duration) -> String {
    let days = span.whole_days();
    if span.whole_minutes() < 1 {
        "less than a minute".to_string()
    } else if span.whole_hours() < 1 {
        count_words(span.whole_minutes(), "minute")
    } else if days < 1 {
        count_words(span.whole_hours(), "hour")
    } else if days < 30 {
        count_words(days, "day")
    } else if days < 365 {
        count_words(days / 30, "month")
    } else {
        count_words(days / 365, "year")
    }
}

fn count_words(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit}")
    } else {
        format!("{count} {unit}s")
    }
}

pub fn tasks_table(tasks: &[Task], now: OffsetDateTime) -> String {
    let rows = tasks.iter().map(|task| TaskRow {
        id: &task.id,
        title: &task.title,
        deadline: &task.deadline,
        due: relative_deadline(task, now),
        status: status_label(task, now),
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());
    table.to_string()
}

fn task_value(task: &Task, now: OffsetDateTime) -> serde_json::Value {
    serde_json::json!({
        "id": task.id,
        "title": task.title,
        "deadline": task.deadline,
        "completed": task.completed,
        "createdAt": task.created_at,
        "completedAt": task.completed_at,
        "overdue": task.is_overdue(now),
    })
}

pub fn tasks_json(tasks: &[Task], now: OffsetDateTime) -> String {
    let payload = tasks.iter().map(|task| task_value(task, now)).collect();
    serde_json::Value::Array(payload).to_string()
}

pub fn task_json(task: &Task, now: OffsetDateTime) -> String {
    task_value(task, now).to_string()
}

pub fn task_detail(task: &Task, now: OffsetDateTime) -> String {
    [
        format!("ID:           {}", task.id),
        format!("Title:        {}", task.title),
        format!("Deadline:     {}", task.deadline),
        format!("Due:          {}", relative_deadline(task, now)),
        format!("Status:       {}", status_label(task, now)),
        format!("Created at:   {}", task.created_at),
        format!(
            "Completed at: {}",
            task.completed_at.as_deref().unwrap_or("-")
        ),
    ]
    .join("\n")
}

pub fn stats_plain(stats: &TaskStats) -> String {
    [
        format!("Overdue:       {}", stats.overdue),
        format!("Not completed: {}", stats.not_completed),
        format!("Completed:     {}", stats.completed),
        format!("Total:         {}", stats.total),
    ]
    .join("\n")
}

pub fn stats_json(stats: &TaskStats) -> Result<String, AppError> {
    Ok(serde_json::to_string(stats)?)
}
