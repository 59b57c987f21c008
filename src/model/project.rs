use chrono::NaiveDate;

use super::mutation::{BaselineEdit, NewTask, TaskEdit};
use super::task::Task;
use super::timeline::TimelineRange;
use super::tree::{self, VisibleRow};
use crate::error::TaskError;

/// The in-memory task collection in display order.
#[derive(Debug, Clone, Default)]
pub struct Project {
    pub name: String,
    pub tasks: Vec<Task>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }

    pub fn find(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Swap in a new version of the task with the same id. Unknown ids leave
    /// the collection unchanged.
    pub fn replace(&mut self, task: Task) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(slot) => {
                *slot = task;
                true
            }
            None => false,
        }
    }

    /// Create a task from the add form and append it.
    pub fn add_task(&mut self, form: &NewTask) -> Result<&Task, TaskError> {
        let task = form.build()?;
        log::info!("added task '{}' ({})", task.text, task.id);
        self.tasks.push(task);
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Apply the task edit form to the task with `id`.
    pub fn edit_task(&mut self, id: &str, form: &TaskEdit) -> Result<(), TaskError> {
        let task = self.find(id).ok_or_else(|| TaskError::NotFound(id.to_string()))?;
        let updated = form.apply(task)?;
        self.replace(updated);
        Ok(())
    }

    /// Apply the baseline edit form to the task with `id`.
    pub fn edit_baseline(&mut self, id: &str, form: &BaselineEdit) -> Result<(), TaskError> {
        let task = self.find(id).ok_or_else(|| TaskError::NotFound(id.to_string()))?;
        let updated = form.apply(task)?;
        self.replace(updated);
        Ok(())
    }

    /// Expand or collapse a task's children.
    pub fn toggle_open(&mut self, id: &str) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.open = !task.open;
                true
            }
            None => false,
        }
    }

    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        tree::visible_rows(&self.tasks)
    }

    pub fn range(&self, today: NaiveDate, lead_days: i64, tail_days: i64) -> TimelineRange {
        TimelineRange::resolve(&self.tasks, today, lead_days, tail_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::TaskType;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn project() -> Project {
        Project::new("Mobile").with_tasks(vec![
            Task::new("Mobile app", date(2024, 4, 1), date(2024, 4, 30)).with_id("1"),
            Task::new("Spec", date(2024, 4, 2), date(2024, 4, 8))
                .with_id("2")
                .with_parent("1"),
        ])
    }

    #[test]
    fn add_appends_with_fresh_id() {
        let mut p = project();
        let form = NewTask {
            text: "QA".into(),
            start: "2024-04-20".into(),
            end: "2024-04-25".into(),
            task_type: TaskType::Task,
        };
        let id = p.add_task(&form).unwrap().id.clone();
        assert_eq!(p.tasks.len(), 3);
        assert_eq!(p.tasks[2].id, id);
        assert!(id.starts_with("task-"));
    }

    #[test]
    fn rejected_add_leaves_collection() {
        let mut p = project();
        let form = NewTask {
            text: String::new(),
            start: "2024-04-20".into(),
            end: "2024-04-25".into(),
            task_type: TaskType::Task,
        };
        assert!(p.add_task(&form).is_err());
        assert_eq!(p.tasks.len(), 2);
    }

    #[test]
    fn edit_unknown_task_is_not_found() {
        let mut p = project();
        let form = TaskEdit::from_task(&p.tasks[0]);
        assert!(matches!(p.edit_task("zzz", &form), Err(TaskError::NotFound(_))));
    }

    #[test]
    fn edit_baseline_writes_planned_dates() {
        let mut p = project();
        let form = BaselineEdit {
            start: "2024-03-30".into(),
            end: "2024-04-07".into(),
        };
        p.edit_baseline("2", &form).unwrap();
        let t = p.find("2").unwrap();
        assert_eq!(t.planned_start, Some(date(2024, 3, 30)));
        assert_eq!(t.start_date, date(2024, 4, 2));
    }

    #[test]
    fn toggle_hides_children() {
        let mut p = project();
        assert!(p.visible_rows()[0].has_children);
        assert!(p.toggle_open("1"));
        assert_eq!(p.visible_rows().len(), 1);
        assert!(!p.toggle_open("missing"));
    }

    #[test]
    fn replace_unknown_is_noop() {
        let mut p = project();
        let stray = Task::new("Stray", date(2024, 1, 1), date(2024, 1, 2));
        assert!(!p.replace(stray));
        assert_eq!(p.tasks.len(), 2);
    }
}
