use crate::config::{Config, Position};
use crate::lookups::LookupKind;
use crate::surface::{DisplayCell, DisplaySurface, TextInput};
use crate::ui;
use crate::widget::{initial_display, LookupWidget, Phase};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{backend::Backend, Terminal};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// One dashboard cell: a widget plus the surfaces it is wired to.
pub struct Panel {
    pub title: String,
    pub position: Position,
    pub input: TextInput,
    pub display: DisplayCell,
    pub widget: Arc<LookupWidget>,
}

impl Panel {
    pub fn kind(&self) -> LookupKind {
        self.widget.kind()
    }

    pub fn is_loading(&self) -> bool {
        self.widget.phase() == Phase::Requesting
    }
}

pub struct App {
    pub panels: Vec<Panel>,
    pub selected: usize,
    /// Widgets that could not be built, with the reason.
    pub unavailable: Vec<(String, String)>,
    should_quit: bool,
    tick_rate: Duration,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let mut panels = Vec::new();
        let mut unavailable = Vec::new();

        for widget_config in &config.widgets {
            let input = TextInput::new();
            let display = DisplayCell::new();
            display.show(initial_display(widget_config.kind()));

            match LookupWidget::from_config(
                widget_config,
                Arc::new(input.clone()),
                Arc::new(display.clone()),
            ) {
                Ok(widget) => panels.push(Panel {
                    title: widget_config.title().to_string(),
                    position: widget_config.position(),
                    input,
                    display,
                    widget: Arc::new(widget),
                }),
                Err(e) => {
                    warn!(widget = widget_config.title(), error = %e, "widget disabled");
                    unavailable.push((widget_config.title().to_string(), e.to_string()));
                }
            }
        }

        panels.sort_by_key(|p| (p.position.row, p.position.col));

        Self {
            panels,
            selected: 0,
            unavailable,
            should_quit: false,
            tick_rate: Duration::from_millis(config.general.tick_rate_ms),
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn selected_panel(&self) -> Option<&Panel> {
        self.panels.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if !self.panels.is_empty() {
            self.selected = (self.selected + 1) % self.panels.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.panels.is_empty() {
            self.selected = (self.selected + self.panels.len() - 1) % self.panels.len();
        }
    }

    /// Fire the selected widget's trigger without blocking the UI loop.
    pub fn trigger_selected(&self) {
        let Some(panel) = self.selected_panel() else {
            return;
        };

        let widget = panel.widget.clone();
        let title = panel.title.clone();
        tokio::spawn(async move {
            match widget.handle_trigger().await {
                Ok(outcome) => info!(widget = %title, ?outcome, "trigger finished"),
                Err(e) => warn!(widget = %title, error = %e, "trigger failed"),
            }
        });
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Right | KeyCode::Down => self.select_next(),
            KeyCode::BackTab | KeyCode::Left | KeyCode::Up => self.select_prev(),
            KeyCode::Enter => self.trigger_selected(),
            KeyCode::Backspace => {
                if let Some(panel) = self.selected_panel() {
                    panel.input.pop();
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(panel) = self.selected_panel() {
                    if panel.kind().takes_input() {
                        panel.input.push(c);
                    }
                }
            }
            _ => {}
        }
    }

    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| ui::render(frame, self))?;

            if event::poll(self.tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
        }

        Ok(())
    }
}

/// Calls `restore` when dropped, so terminal state set up for the dashboard is
/// undone however the dashboard exits.
pub struct RestoreGuard<F: FnMut()> {
    restore: F,
}

impl<F: FnMut()> RestoreGuard<F> {
    pub fn new(restore: F) -> Self {
        Self { restore }
    }
}

impl<F: FnMut()> Drop for RestoreGuard<F> {
    fn drop(&mut self) {
        (self.restore)();
    }
}
