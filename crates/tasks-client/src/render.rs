use std::fmt::Write;

use tasks_core::Task;

use crate::app::App;

const DUE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Render the application state as plain text.
pub fn render(app: &App) -> String {
    let mut out = String::from("Todo List\n");

    if let Some(error) = app.error() {
        let _ = writeln!(out, "! {error}");
    }

    out.push_str("\nTask List\n");
    if app.tasks().is_empty() {
        out.push_str("  (no tasks)\n");
    }
    for task in app.tasks() {
        match app.editing().filter(|t| t.id == task.id) {
            Some(draft) => write_task(&mut out, draft, true),
            None => write_task(&mut out, task, false),
        }
    }
    out
}

/// Render a single task.
pub fn render_task(task: &Task) -> String {
    let mut out = String::new();
    write_task(&mut out, task, false);
    out
}

fn write_task(out: &mut String, task: &Task, editing: bool) {
    let marker = if editing { " [editing]" } else { "" };
    let _ = writeln!(
        out,
        "- #{} {} - {}{marker}",
        task.id,
        task.title,
        task.description.as_deref().unwrap_or("")
    );
    let due = task
        .due_date
        .map(|d| d.format(DUE_FORMAT).to_string())
        .unwrap_or_else(|| "none".to_string());
    let _ = writeln!(out, "  Due: {due}");
    let status = if task.is_completed { "Completed" } else { "Pending" };
    let _ = writeln!(out, "  Status: {status}");
}
