//! Annotation Reconciler: confirmed annotations per task, the selected task,
//! and the highlight state derived from them.
//!
//! The map only changes on a server-confirmed save. All view state (done
//! marks, the highlighted name, progress) is recomputed from scratch on every
//! call and never stored.

use std::collections::BTreeMap;

use crate::contract::{AnnotateRequest, Annotation, Task};
use crate::error::CoreError;
use crate::output::{NameItem, Progress, TaskItem};
use crate::types::{AbsoluteFrame, TaskIndex};

#[derive(Debug, Clone, Default)]
pub struct AnnotationReconciler {
    annotations: BTreeMap<TaskIndex, Annotation>,
    selected: Option<TaskIndex>,
}

impl AnnotationReconciler {
    pub fn new(annotations: BTreeMap<TaskIndex, Annotation>) -> Self {
        Self {
            annotations,
            selected: None,
        }
    }

    pub fn selected(&self) -> Option<TaskIndex> {
        self.selected
    }

    pub fn annotation(&self, index: TaskIndex) -> Option<&Annotation> {
        self.annotations.get(&index)
    }

    pub fn annotations(&self) -> &BTreeMap<TaskIndex, Annotation> {
        &self.annotations
    }

    /// Select task `index` and return the frame to navigate to: the
    /// confirmed annotation's frame if there is one, otherwise the task's
    /// nominal frame.
    pub fn select(&mut self, index: TaskIndex, tasks: &[Task]) -> Result<AbsoluteFrame, CoreError> {
        let task = tasks.get(index).ok_or_else(|| CoreError::NotFound {
            entity: "Task",
            id: index.to_string(),
        })?;
        self.selected = Some(index);
        Ok(self
            .annotations
            .get(&index)
            .map_or(task.frame, |annotation| annotation.frame))
    }

    /// Record a server-confirmed annotation, replacing any previous one.
    pub fn confirm(&mut self, index: TaskIndex, annotation: Annotation) {
        tracing::debug!(task = index, frame = annotation.frame, name = %annotation.name, "Annotation confirmed");
        self.annotations.insert(index, annotation);
    }

    pub fn is_done(&self, index: TaskIndex) -> bool {
        self.annotations.contains_key(&index)
    }

    /// Annotated tasks out of `task_count`. Annotations for indices beyond the
    /// task list are not counted.
    pub fn progress(&self, task_count: usize) -> Progress {
        Progress {
            done: self.annotations.range(..task_count).count(),
            total: task_count,
        }
    }

    pub fn task_items(&self, tasks: &[Task]) -> Vec<TaskItem> {
        tasks
            .iter()
            .enumerate()
            .map(|(index, task)| TaskItem {
                index,
                label: task_label(index, task, self.annotations.get(&index)),
                done: self.is_done(index),
                current: self.selected == Some(index),
            })
            .collect()
    }

    /// A name is highlighted only when the selected task's confirmed
    /// annotation carries that name at exactly `current_frame`.
    pub fn name_items(&self, names: &[String], current_frame: Option<AbsoluteFrame>) -> Vec<NameItem> {
        let confirmed = self
            .selected
            .and_then(|index| self.annotations.get(&index))
            .filter(|annotation| Some(annotation.frame) == current_frame);

        names
            .iter()
            .map(|name| NameItem {
                name: name.clone(),
                selected: confirmed.is_some_and(|annotation| &annotation.name == name),
            })
            .collect()
    }
}

/// `"{i+1}: {name} ({frame})"`, plus `" ✓ [{name} @ {frame}]"` when annotated.
pub fn task_label(index: TaskIndex, task: &Task, annotation: Option<&Annotation>) -> String {
    let mut label = format!("{}: {} ({})", index + 1, task.name, task.frame);
    if let Some(annotation) = annotation {
        label.push_str(&format!(" ✓ [{} @ {}]", annotation.name, annotation.frame));
    }
    label
}

/// Toast text for a confirmed save.
pub fn success_message(request: &AnnotateRequest) -> String {
    let mut message = format!("Success: {} @ Frame {}", request.name, request.absolute_frame);
    if let Some(index) = request.task_index {
        message.push_str(&format!(" (Task {})", index + 1));
    }
    message
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
