use crate::errors::{AppError, AppResult};
use crate::models::{NewTaskPayload, QuickEntry, Task, TaskView};
use crate::notifications::Notifier;
use chrono::Utc;
use uuid::Uuid;

pub const EMPTY_TITLE_MESSAGE: &str = "Task title cannot be empty";

/// Checked in this order; the first one present wins.
const QUICK_ENTRY_SEPARATORS: [&str; 5] = [
    " with description ",
    " with details ",
    " with note ",
    ": ",
    " - ",
];

/// Splits free text such as "Buy milk with description Get 2% milk" into a
/// title and description.
pub fn parse_quick_entry(raw: &str) -> AppResult<QuickEntry> {
    let (title, description) = QUICK_ENTRY_SEPARATORS
        .iter()
        .find_map(|separator| raw.split_once(separator))
        .map(|(title, description)| (title.trim(), description.trim()))
        .unwrap_or((raw.trim(), ""));

    if title.is_empty() {
        return Err(AppError::invalid(EMPTY_TITLE_MESSAGE));
    }
    Ok(QuickEntry {
        title: title.to_string(),
        description: description.to_string(),
    })
}

#[derive(Debug, Clone, Default)]
pub struct TaskBoard {
    tasks: Vec<Task>,
}

impl TaskBoard {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn add(&mut self, payload: NewTaskPayload, notifier: &Notifier) -> AppResult<Task> {
        if payload.title.trim().is_empty() {
            notifier.error(EMPTY_TITLE_MESSAGE);
            return Err(AppError::invalid(EMPTY_TITLE_MESSAGE));
        }

        let mut title = payload.title.clone();
        if let Some(parent_id) = payload.parent_id.as_deref() {
            match self.get(parent_id) {
                Some(parent) => title = format!("{} (sub-task of {})", title, parent.title),
                None => tracing::warn!(parent_id = %parent_id, "subtask parent not found; adding as top-level task"),
            }
        }

        let task = Task {
            id: format!("task-{}", Uuid::new_v4()),
            title,
            description: payload.description.filter(|value| !value.is_empty()),
            completed: false,
            priority: payload.priority.unwrap_or_default(),
            due_date: None,
            tags: Vec::new(),
            created_at: Utc::now(),
        };
        self.tasks.insert(0, task.clone());
        tracing::info!(task_id = %task.id, "task added");
        notifier.success(format!("New task added: {}", payload.title));
        Ok(task)
    }

    pub fn quick_add(&mut self, raw: &str, notifier: &Notifier) -> AppResult<Task> {
        let entry = match parse_quick_entry(raw) {
            Ok(entry) => entry,
            Err(error) => {
                notifier.error(EMPTY_TITLE_MESSAGE);
                return Err(error);
            }
        };
        self.add_entry(entry, notifier)
    }

    /// Adds an already-split title/description pair.
    pub fn add_entry(&mut self, entry: QuickEntry, notifier: &Notifier) -> AppResult<Task> {
        self.add(
            NewTaskPayload {
                title: entry.title,
                description: Some(entry.description),
                priority: None,
                parent_id: None,
            },
            notifier,
        )
    }

    /// Replaces the stored task with the same id.
    pub fn edit(&mut self, updated: Task, notifier: &Notifier) -> AppResult<Task> {
        if updated.title.trim().is_empty() {
            notifier.error(EMPTY_TITLE_MESSAGE);
            return Err(AppError::invalid(EMPTY_TITLE_MESSAGE));
        }
        let slot = self
            .tasks
            .iter_mut()
            .find(|task| task.id == updated.id)
            .ok_or_else(|| AppError::NotFound(format!("task {}", updated.id)))?;
        *slot = updated.clone();
        tracing::info!(task_id = %updated.id, "task updated");
        notifier.success(format!("Task updated: {}", updated.title));
        Ok(updated)
    }

    pub fn delete(&mut self, id: &str, notifier: &Notifier) -> AppResult<Task> {
        let index = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| AppError::NotFound(format!("task {}", id)))?;
        let removed = self.tasks.remove(index);
        tracing::info!(task_id = %id, "task deleted");
        notifier.info(format!("Task deleted: {}", removed.title));
        Ok(removed)
    }

    pub fn toggle_complete(&mut self, id: &str, notifier: &Notifier) -> AppResult<Task> {
        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| AppError::NotFound(format!("task {}", id)))?;
        task.completed = !task.completed;
        let message = if task.completed {
            format!("Task completed: {}", task.title)
        } else {
            format!("Task marked as incomplete: {}", task.title)
        };
        tracing::info!(task_id = %id, completed = task.completed, "task toggled");
        notifier.info(message);
        Ok(task.clone())
    }

    /// Prepends tasks brought in from a calendar provider.
    pub fn import(&mut self, imported: Vec<Task>, notifier: &Notifier) -> usize {
        let count = imported.len();
        if count == 0 {
            return 0;
        }
        self.tasks.splice(0..0, imported);
        tracing::info!(count, "tasks imported");
        notifier.success(format!("Imported {} tasks from calendar", count));
        count
    }

    pub fn view(&self, tag: Option<&str>) -> TaskView {
        let matches = |task: &&Task| tag.map_or(true, |tag| task.tags.iter().any(|t| t == tag));
        let pending = self
            .tasks
            .iter()
            .filter(|task| !task.completed)
            .filter(matches)
            .cloned()
            .collect::<Vec<_>>();
        let completed = self
            .tasks
            .iter()
            .filter(|task| task.completed)
            .filter(matches)
            .cloned()
            .collect::<Vec<_>>();
        TaskView {
            filter_tag: tag.map(ToString::to_string),
            total: pending.len() + completed.len(),
            pending,
            completed,
        }
    }

    /// Unique tags in first-seen order.
    pub fn all_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        for tag in self.tasks.iter().flat_map(|task| task.tags.iter()) {
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_quick_entry, TaskBoard};
    use crate::errors::AppError;
    use crate::fixtures::starter_tasks;
    use crate::models::{NewTaskPayload, Priority};
    use crate::notifications::Notifier;

    fn payload(title: &str) -> NewTaskPayload {
        NewTaskPayload {
            title: title.to_string(),
            ..NewTaskPayload::default()
        }
    }

    #[test]
    fn quick_entry_uses_first_listed_separator() {
        let entry = parse_quick_entry("Buy milk with description Get 2% milk: skim").expect("parse");
        assert_eq!(entry.title, "Buy milk");
        assert_eq!(entry.description, "Get 2% milk: skim");

        let entry = parse_quick_entry("  Call mom - about a - birthday ").expect("parse");
        assert_eq!(entry.title, "Call mom");
        assert_eq!(entry.description, "about a - birthday");

        let entry = parse_quick_entry(" Water plants ").expect("parse");
        assert_eq!(entry.title, "Water plants");
        assert_eq!(entry.description, "");
    }

    #[test]
    fn quick_entry_rejects_empty_title() {
        let error = parse_quick_entry(" : only a description").expect_err("empty title");
        assert!(matches!(error, AppError::Validation(_)));
        assert!(parse_quick_entry("   ").is_err());
    }

    #[test]
    fn add_prepends_with_defaults() {
        let notifier = Notifier::new();
        let mut board = TaskBoard::new(starter_tasks());
        let task = board.add(payload("Book dentist"), &notifier).expect("add");
        assert_eq!(board.list()[0].id, task.id);
        assert!(task.id.starts_with("task-"));
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.tags.is_empty());
        assert_eq!(board.list().len(), 9);
        assert_eq!(
            notifier.last_message().as_deref(),
            Some("New task added: Book dentist")
        );
    }

    #[test]
    fn blank_title_is_rejected_and_board_unchanged() {
        let notifier = Notifier::new();
        let mut board = TaskBoard::new(starter_tasks());
        assert!(board.add(payload("   "), &notifier).is_err());
        assert_eq!(board.list().len(), 8);
        assert_eq!(
            notifier.last_message().as_deref(),
            Some("Task title cannot be empty")
        );
    }

    #[test]
    fn subtask_title_names_parent() {
        let notifier = Notifier::new();
        let mut board = TaskBoard::new(Vec::new());
        let parent = board.add(payload("Plan trip"), &notifier).expect("parent");
        let child = board
            .add(
                NewTaskPayload {
                    parent_id: Some(parent.id.clone()),
                    ..payload("Book hotel")
                },
                &notifier,
            )
            .expect("child");
        assert_eq!(child.title, "Book hotel (sub-task of Plan trip)");

        let orphan = board
            .add(
                NewTaskPayload {
                    parent_id: Some("missing".to_string()),
                    ..payload("Pack")
                },
                &notifier,
            )
            .expect("orphan");
        assert_eq!(orphan.title, "Pack");
    }

    #[test]
    fn toggle_twice_restores_state_and_view_splits() {
        let notifier = Notifier::new();
        let mut board = TaskBoard::new(starter_tasks());
        let id = board.list()[0].id.clone();
        let before = board.view(None);
        let original = board.get(&id).expect("task").completed;

        board.toggle_complete(&id, &notifier).expect("toggle");
        assert_ne!(board.get(&id).expect("task").completed, original);
        board.toggle_complete(&id, &notifier).expect("toggle back");
        assert_eq!(board.get(&id).expect("task").completed, original);

        let after = board.view(None);
        assert_eq!(before.pending.len(), after.pending.len());
        assert_eq!(after.total, 8);
    }

    #[test]
    fn tag_filter_and_unique_tags() {
        let board = TaskBoard::new(starter_tasks());
        let tags = board.all_tags();
        let unique = tags.iter().collect::<std::collections::HashSet<_>>();
        assert_eq!(tags.len(), unique.len());
        assert_eq!(&tags[..3], &["work", "client", "presentation"]);

        let tag = tags.first().expect("fixtures carry tags").clone();
        let view = board.view(Some(&tag));
        assert!(view
            .pending
            .iter()
            .chain(view.completed.iter())
            .all(|task| task.tags.contains(&tag)));
    }

    #[test]
    fn add_then_delete_restores_previous_list() {
        let notifier = Notifier::new();
        let mut board = TaskBoard::new(starter_tasks());
        let before = board.list().to_vec();
        let task = board.add(payload("Renew passport"), &notifier).expect("add");
        board.delete(&task.id, &notifier).expect("delete");
        assert_eq!(board.list(), before.as_slice());
    }

    #[test]
    fn delete_and_edit_unknown_ids_are_not_found() {
        let notifier = Notifier::new();
        let mut board = TaskBoard::new(starter_tasks());
        assert!(matches!(board.delete("nope", &notifier), Err(AppError::NotFound(_))));

        let mut task = board.list()[1].clone();
        task.title = "Renamed".to_string();
        board.edit(task.clone(), &notifier).expect("edit");
        assert_eq!(board.get(&task.id).expect("task").title, "Renamed");

        let removed = board.delete(&task.id, &notifier).expect("delete");
        assert_eq!(removed.title, "Renamed");
        assert!(board.get(&task.id).is_none());
    }

    #[test]
    fn import_prepends_in_order() {
        let notifier = Notifier::new();
        let mut board = TaskBoard::new(starter_tasks());
        let imported = crate::fixtures::google_calendar_tasks(chrono::Utc::now());
        let first_id = imported[0].id.clone();
        assert_eq!(board.import(imported, &notifier), 2);
        assert_eq!(board.list()[0].id, first_id);
        assert_eq!(
            notifier.last_message().as_deref(),
            Some("Imported 2 tasks from calendar")
        );
    }
}
