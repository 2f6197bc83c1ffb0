//! Which screen is mounted: start page, manual viewer, or timed slideshow.

use crate::events::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Autoplay {
    Running,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Start,
    Viewing,
    Playing(Autoplay),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewChange {
    pub from: View,
    pub to: View,
}

#[derive(Debug)]
pub struct ViewSM {
    view: View,
}

impl Default for ViewSM {
    fn default() -> Self {
        Self { view: View::Start }
    }
}

impl ViewSM {
    #[must_use]
    pub fn current(&self) -> View {
        self.view
    }

    /// Apply a screen-level command. Navigation commands never change the view.
    pub fn on_command(&mut self, cmd: &Command) -> Option<ViewChange> {
        match (self.view, cmd) {
            (View::Start, Command::StartViewer | Command::Confirm) => self.goto(View::Viewing),
            (View::Start, Command::StartSlideshow) => self.goto(View::Playing(Autoplay::Paused)),
            (View::Playing(Autoplay::Paused), Command::Play) => {
                self.goto(View::Playing(Autoplay::Running))
            }
            (View::Playing(Autoplay::Running), Command::Pause) => {
                self.goto(View::Playing(Autoplay::Paused))
            }
            (View::Viewing | View::Playing(_), Command::End) => self.goto(View::Start),
            _ => None,
        }
    }

    /// Back to the start screen, e.g. after a new directory was accepted.
    pub fn reset(&mut self) -> Option<ViewChange> {
        self.goto(View::Start)
    }

    fn goto(&mut self, to: View) -> Option<ViewChange> {
        if self.view == to {
            return None;
        }
        let ch = ViewChange {
            from: self.view,
            to,
        };
        self.view = to;
        Some(ch)
    }
}
