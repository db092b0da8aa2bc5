//! Display surfaces.
//!
//! A [`Surface`] receives every [`RenderCommand`] in emission order. It owns
//! presentation only; it never feeds anything back into the core.

use std::io::Write;

use framemark_core::output::{NameItem, RenderCommand, TaskItem};

pub trait Surface: Send + 'static {
    fn render(&mut self, command: RenderCommand);
}

/// Line-oriented surface for terminals and logs.
pub struct TextSurface<W: Write + Send + 'static> {
    out: W,
}

impl<W: Write + Send + 'static> TextSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl TextSurface<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send + 'static> Surface for TextSurface<W> {
    fn render(&mut self, command: RenderCommand) {
        let text = format_command(&command);
        if let Err(e) = writeln!(self.out, "{text}").and_then(|()| self.out.flush()) {
            tracing::warn!(error = %e, "Failed to write to surface");
        }
    }
}

/// Human-readable rendering of one command.
pub fn format_command(command: &RenderCommand) -> String {
    match command {
        RenderCommand::ShowFrame { url } => format!("frame  {url}"),
        RenderCommand::ShowPlaceholder { text } => format!("frame  [{text}]"),
        RenderCommand::FrameInfo(info) => format!(
            "info   {} {} {} | {}",
            info.folder_label(),
            info.frame_label(),
            info.folder_name,
            info.summary()
        ),
        RenderCommand::TaskList { items, progress } => {
            let mut text = format!("tasks  ({progress})");
            if items.is_empty() {
                text.push_str(" none");
            }
            for item in items {
                text.push('\n');
                text.push_str(&format_task(item));
            }
            text
        }
        RenderCommand::NameList(items) => format!("names  {}", format_names(items)),
        RenderCommand::Toast(message) => format!("toast  {message}"),
        RenderCommand::PanelError { tasks, names } => {
            format!("tasks  {tasks}\nnames  {names}")
        }
        RenderCommand::VideoList(videos) => format!("videos {}", videos.join(", ")),
    }
}

fn format_task(item: &TaskItem) -> String {
    let marker = if item.current { '>' } else { ' ' };
    format!("     {marker} {}", item.label)
}

fn format_names(items: &[NameItem]) -> String {
    if items.is_empty() {
        return "none".to_string();
    }
    items
        .iter()
        .map(|item| {
            if item.selected {
                format!("*{}*", item.name)
            } else {
                item.name.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use framemark_core::output::{FrameInfo, Progress};
    use framemark_core::types::Position;

    #[test]
    fn frame_info_line() {
        let info = FrameInfo {
            position: Position::new(1, 500),
            folder_count: 2,
            folder_name: "1000_1999".into(),
            absolute_frame: 1500,
            timecode: "00:01:00".into(),
        };
        assert_eq!(
            format_command(&RenderCommand::FrameInfo(info)),
            "info   Folder (2 / 2) Frame (500) 1000_1999 | Time: 00:01:00 | Absolute Frame: 1500"
        );
    }

    #[test]
    fn task_list_marks_current() {
        let command = RenderCommand::TaskList {
            items: vec![
                TaskItem {
                    index: 0,
                    label: "1: Bob (50) ✓ [Bob @ 50]".into(),
                    done: true,
                    current: true,
                },
                TaskItem {
                    index: 1,
                    label: "2: Ann (70)".into(),
                    done: false,
                    current: false,
                },
            ],
            progress: Progress { done: 1, total: 2 },
        };
        assert_eq!(
            format_command(&command),
            "tasks  (1/2)\n     > 1: Bob (50) ✓ [Bob @ 50]\n       2: Ann (70)"
        );
    }

    #[test]
    fn selected_names_are_starred() {
        let command = RenderCommand::NameList(vec![
            NameItem {
                name: "Alice".into(),
                selected: true,
            },
            NameItem {
                name: "Bob".into(),
                selected: false,
            },
        ]);
        assert_eq!(format_command(&command), "names  *Alice*, Bob");
        assert_eq!(format_command(&RenderCommand::NameList(Vec::new())), "names  none");
    }

    #[test]
    fn text_surface_writes_lines() {
        let mut surface = TextSurface::new(Vec::new());
        surface.render(RenderCommand::Toast("Success: Bob @ Frame 50".into()));
        surface.render(RenderCommand::VideoList(vec!["a".into(), "b".into()]));
        let text = String::from_utf8(surface.into_inner()).unwrap();
        assert_eq!(text, "toast  Success: Bob @ Frame 50\nvideos a, b\n");
    }
}
