//! Search and sort of the displayed collections
//!
//! Every function here is pure: it reads the given slices and returns a new
//! vector, leaving the input untouched.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::collections::HashMap;

use crate::project::Project;
use crate::task::Task;

/// Sort key chosen in the list header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    Id,
    Name,
    TaskAmount,
    Status,
    Performer,
    Deadline,
}

impl Default for SortBy {
    fn default() -> Self {
        Self::Id
    }
}

/// Projects to display.
///
/// A non-empty `query` keeps projects whose name contains it, ignoring case,
/// in their original order. Otherwise all projects are sorted by `sort_by`;
/// keys that don't apply to projects sort by id.
pub fn filtered_projects(
    projects: &[Project],
    tasks: &[Task],
    query: &str,
    sort_by: SortBy,
) -> Vec<Project> {
    if !query.is_empty() {
        return matching_name(projects, query, |p| &p.name);
    }

    let mut sorted = projects.to_vec();
    match sort_by {
        SortBy::Name => sorted.sort_by(|a, b| locale_cmp(&a.name, &b.name)),
        SortBy::TaskAmount => {
            let counts = task_counts(tasks);
            sorted.sort_by_key(|p| Reverse(counts.get(&p.id).copied().unwrap_or(0)));
        }
        SortBy::Status => sorted.sort_by_key(|p| p.status.priority()),
        SortBy::Id | SortBy::Performer | SortBy::Deadline => sorted.sort_by_key(|p| p.id),
    }
    sorted
}

/// Tasks to display, with the same query-or-sort contract as
/// [`filtered_projects`]. Deadlines sort latest first.
pub fn filtered_tasks(tasks: &[Task], query: &str, sort_by: SortBy) -> Vec<Task> {
    if !query.is_empty() {
        return matching_name(tasks, query, |t| &t.name);
    }

    let mut sorted = tasks.to_vec();
    match sort_by {
        SortBy::Name => sorted.sort_by(|a, b| locale_cmp(&a.name, &b.name)),
        SortBy::Performer => sorted.sort_by(|a, b| locale_cmp(&a.performer, &b.performer)),
        SortBy::Status => sorted.sort_by_key(|t| t.status.priority()),
        // Unparseable deadlines end up last
        SortBy::Deadline => sorted.sort_by_cached_key(|t| Reverse(parse_deadline(&t.deadline))),
        SortBy::Id | SortBy::TaskAmount => sorted.sort_by_key(|t| t.id),
    }
    sorted
}

/// Tasks belonging to `project_id`
pub fn tasks_for_project(tasks: &[Task], project_id: i64) -> Vec<Task> {
    tasks
        .iter()
        .filter(|t| t.project_id == project_id)
        .cloned()
        .collect()
}

/// Number of tasks belonging to `project_id`
pub fn task_amount(tasks: &[Task], project_id: i64) -> usize {
    tasks.iter().filter(|t| t.project_id == project_id).count()
}

/// Human-friendly string ordering.
///
/// Letters compare case-insensitively first; on a tie lowercase sorts
/// before uppercase.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| swap_case(a).cmp(&swap_case(b)))
        .then_with(|| a.cmp(b))
}

fn swap_case(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_uppercase() {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                c.to_uppercase().next().unwrap_or(c)
            }
        })
        .collect()
}

fn matching_name<T: Clone>(items: &[T], query: &str, name: impl Fn(&T) -> &String) -> Vec<T> {
    let needle = query.to_lowercase();
    items
        .iter()
        .filter(|item| name(item).to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

fn task_counts(tasks: &[Task]) -> HashMap<i64, usize> {
    let mut counts = HashMap::new();
    for task in tasks {
        *counts.entry(task.project_id).or_insert(0) += 1;
    }
    counts
}

/// Parse a deadline written as RFC 3339, a date-time, or a plain date
pub fn parse_deadline(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.naive_utc())
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").ok())
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M").ok())
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
