//! Which tasks are on screen, and how deeply each is indented.
//!
//! A task is visible when every ancestor along its `parent` chain is present
//! and open. A dangling parent id ends the chain as if the task were
//! top-level. Parent chains are walked with a visited set, so a cycle in the
//! data ends the walk instead of looping; the task is then treated the same
//! as one with a dangling parent.

use std::collections::{HashMap, HashSet};

use super::task::Task;

/// A task that should be rendered, in collection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRow {
    /// Index into the task collection.
    pub index: usize,
    /// Number of resolvable ancestors.
    pub depth: usize,
    pub has_children: bool,
}

/// Where an ancestor walk ended.
enum ChainEnd {
    /// Reached a task without a parent, or a dangling parent id.
    Root,
    /// Reached a closed ancestor.
    Collapsed,
    /// Revisited a task already on the chain.
    Cycle,
}

/// Id lookup over a task collection. The first task wins on duplicate ids.
pub struct TaskTree<'a> {
    tasks: &'a [Task],
    by_id: HashMap<&'a str, usize>,
    with_children: HashSet<&'a str>,
}

impl<'a> TaskTree<'a> {
    pub fn new(tasks: &'a [Task]) -> Self {
        let mut by_id = HashMap::with_capacity(tasks.len());
        for (i, task) in tasks.iter().enumerate() {
            by_id.entry(task.id.as_str()).or_insert(i);
        }
        let with_children = tasks
            .iter()
            .filter_map(|t| t.parent.as_deref())
            .collect();
        Self {
            tasks,
            by_id,
            with_children,
        }
    }

    pub fn has_children(&self, id: &str) -> bool {
        self.with_children.contains(id)
    }

    /// Walk up from `index`, returning how the chain ended and how many
    /// ancestors were found.
    fn walk(&self, index: usize) -> (ChainEnd, usize) {
        let mut seen = HashSet::new();
        seen.insert(index);
        let mut depth = 0;
        let mut current = &self.tasks[index];
        loop {
            let Some(parent_index) = current.parent.as_deref().and_then(|p| self.by_id.get(p)) else {
                return (ChainEnd::Root, depth);
            };
            if !seen.insert(*parent_index) {
                return (ChainEnd::Cycle, depth);
            }
            let parent = &self.tasks[*parent_index];
            if !parent.open {
                return (ChainEnd::Collapsed, depth + 1);
            }
            depth += 1;
            current = parent;
        }
    }

    /// Ancestor count for the task at `index`, ignoring `open` flags.
    fn depth(&self, index: usize) -> usize {
        let mut seen = HashSet::new();
        seen.insert(index);
        let mut depth = 0;
        let mut current = &self.tasks[index];
        while let Some(&parent_index) = current.parent.as_deref().and_then(|p| self.by_id.get(p)) {
            if !seen.insert(parent_index) {
                break;
            }
            depth += 1;
            current = &self.tasks[parent_index];
        }
        depth
    }

    fn is_visible(&self, index: usize) -> bool {
        match self.walk(index).0 {
            ChainEnd::Root => true,
            ChainEnd::Collapsed => false,
            ChainEnd::Cycle => {
                log::warn!(
                    "parent chain of task '{}' is cyclic; showing it as top-level",
                    self.tasks[index].id
                );
                true
            }
        }
    }

    /// Visible tasks in collection order.
    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(i, _)| self.is_visible(*i))
            .map(|(i, task)| VisibleRow {
                index: i,
                depth: self.depth(i),
                has_children: self.has_children(&task.id),
            })
            .collect()
    }
}

/// Visible tasks in collection order.
pub fn visible_rows(tasks: &[Task]) -> Vec<VisibleRow> {
    TaskTree::new(tasks).visible_rows()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn task(id: &str, parent: Option<&str>) -> Task {
        let d = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let t = Task::new(id, d, d).with_id(id);
        match parent {
            Some(p) => t.with_parent(p),
            None => t,
        }
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        visible_rows(tasks)
            .iter()
            .map(|r| tasks[r.index].id.as_str())
            .collect()
    }

    fn sample() -> Vec<Task> {
        vec![
            task("1", None),
            task("2", Some("1")),
            task("3", Some("1")),
            task("3.1", Some("3")),
            task("3.2", Some("3")),
            task("4", None),
        ]
    }

    #[test]
    fn all_open_shows_everything_in_order() {
        let tasks = sample();
        assert_eq!(ids(&tasks), vec!["1", "2", "3", "3.1", "3.2", "4"]);
    }

    #[test]
    fn depth_follows_parent_chain_not_id_pattern() {
        let mut tasks = sample();
        tasks.push(task("x", Some("3.1")));
        let rows = visible_rows(&tasks);
        let depths: Vec<_> = rows.iter().map(|r| r.depth).collect();
        assert_eq!(depths, vec![0, 1, 1, 2, 2, 0, 3]);
    }

    #[test]
    fn has_children_flags() {
        let tasks = sample();
        let rows = visible_rows(&tasks);
        let flags: Vec<_> = rows.iter().map(|r| r.has_children).collect();
        assert_eq!(flags, vec![true, false, true, false, false, false]);
    }

    #[test]
    fn closed_parent_hides_descendants_transitively() {
        let mut tasks = sample();
        tasks[0].open = false;
        assert_eq!(ids(&tasks), vec!["1", "4"]);
    }

    #[test]
    fn reopening_restores_previous_set() {
        let mut tasks = sample();
        tasks[2].open = false;
        let before = ids(&tasks).into_iter().map(String::from).collect::<Vec<_>>();
        assert_eq!(before, vec!["1", "2", "3", "4"]);

        tasks[0].open = false;
        assert_eq!(ids(&tasks), vec!["1", "4"]);

        tasks[0].open = true;
        assert_eq!(ids(&tasks), before);
    }

    #[test]
    fn dangling_parent_is_visible() {
        let mut tasks = sample();
        tasks.push(task("orphan", Some("missing")));
        for t in tasks.iter_mut() {
            t.open = false;
        }
        assert_eq!(ids(&tasks), vec!["1", "4", "orphan"]);
    }

    #[test]
    fn cycle_terminates() {
        let tasks = vec![task("a", Some("b")), task("b", Some("a")), task("c", Some("c"))];
        assert_eq!(ids(&tasks), vec!["a", "b", "c"]);
        let tree = TaskTree::new(&tasks);
        assert_eq!(tree.depth(0), 1);
        assert_eq!(tree.depth(2), 0);
    }

    #[test]
    fn recomputation_is_idempotent() {
        let mut tasks = sample();
        tasks[2].open = false;
        assert_eq!(visible_rows(&tasks), visible_rows(&tasks));
    }
}
