use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use tracing::{debug, info};

use crate::app::{App, Message, Model, ToastLevel, update};

pub(super) struct ResizeDebouncer {
    delay_ms: u64,
    pending: Option<(u16, u16, u64)>,
}

impl ResizeDebouncer {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub(super) const fn queue(&mut self, width: u16, height: u16, now_ms: u64) {
        self.pending = Some((width, height, now_ms));
    }

    pub(super) fn take_ready(&mut self, now_ms: u64) -> Option<(u16, u16)> {
        let (width, height, queued_at) = self.pending?;
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending = None;
            Some((width, height))
        } else {
            None
        }
    }

    pub(super) const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl App {
    /// Build the initial model and load the file into it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid table.
    pub fn prepare_model(&self, screen: (u16, u16)) -> Result<Model> {
        let bytes = std::fs::read(&self.file_path)
            .with_context(|| format!("Failed to read {}", self.file_path.display()))?;
        let mut model = Model::new(Some(self.file_path.clone()), screen)
            .with_output_path(self.output_path.clone())
            .with_preset_fields(self.fields.clone());
        model
            .config_global_path
            .clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);

        let notice = model
            .load_bytes(&bytes)
            .with_context(|| format!("Failed to load {}", self.file_path.display()))?;
        info!(path = %self.file_path.display(), %notice, "table loaded");
        if model.active_toast().is_none() {
            model.show_toast(ToastLevel::Info, notice.to_string());
        }
        Ok(model)
    }

    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be loaded, terminal
    /// initialization fails, or the event loop hits an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        // Load before touching the terminal so parse errors print normally.
        let mut model = self.prepare_model((80, 24))?;

        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal: recedit requires an interactive terminal")?;
        let result = terminal
            .size()
            .map_err(anyhow::Error::from)
            .and_then(|size| {
                model.screen = (size.width, size.height);
                execute!(stdout(), EnableBracketedPaste)?;
                if self.mouse_enabled {
                    execute!(stdout(), EnableMouseCapture)?;
                }
                self.event_loop(&mut terminal, &mut model)
            });

        // Restore terminal
        if self.mouse_enabled {
            let _ = execute!(stdout(), DisableMouseCapture);
        }
        let _ = execute!(stdout(), DisableBracketedPaste);
        ratatui::restore();

        result
    }

    fn event_loop(&self, terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        let start = Instant::now();
        let mut resize_debouncer = ResizeDebouncer::new(100);
        let mut needs_render = true;

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                *model = update(std::mem::take(model), Message::Resize(width, height));
                needs_render = true;
            }

            // Handle events
            let poll_ms = if needs_render {
                0
            } else if resize_debouncer.is_pending() {
                10
            } else {
                250
            };
            if event::poll(Duration::from_millis(poll_ms))? {
                loop {
                    let event_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                    let msg =
                        self.handle_event(event::read()?, model, event_ms, &mut resize_debouncer);
                    if let Some(msg) = msg {
                        debug!(?msg, "message");
                        let side_msg = msg.clone();
                        *model = update(std::mem::take(model), msg);
                        Self::handle_message_side_effects(model, &side_msg);
                        needs_render = true;
                    }
                    // Coalesce key repeat bursts into a single render.
                    if model.should_quit || !event::poll(Duration::from_millis(0))? {
                        break;
                    }
                }
            }

            if needs_render {
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                needs_render = false;
            }

            if model.should_quit {
                break;
            }
        }
        Ok(())
    }
}
