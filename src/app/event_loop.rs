use std::io::stdout;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::model::{ArticleState, CatalogState};
use crate::app::{App, Message, Model, update};

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

/// Defers applying the search filter until typing pauses.
pub(super) struct SearchDebouncer {
    delay_ms: u64,
    queued_at: Option<u64>,
}

impl SearchDebouncer {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            queued_at: None,
        }
    }

    pub(super) const fn queue(&mut self, now_ms: u64) {
        self.queued_at = Some(now_ms);
    }

    pub(super) fn take_ready(&mut self, now_ms: u64) -> bool {
        let Some(queued_at) = self.queued_at else {
            return false;
        };
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.queued_at = None;
            true
        } else {
            false
        }
    }

    pub(super) const fn cancel(&mut self) {
        self.queued_at = None;
    }

    pub(super) const fn is_pending(&self) -> bool {
        self.queued_at.is_some()
    }
}

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization fails or the event
    /// loop encounters an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let _run_scope = crate::perf::scope("app.run.total");

        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal - blogless requires an interactive terminal")?;
        let size = terminal.size()?;

        let mut model = Model::new(self.fetcher.site_name(), (size.width, size.height));
        model.apply_layout();

        let (tx, rx) = mpsc::channel();
        // Kick off the manifest fetch before the first frame.
        self.spawn_catalog_fetch(&tx);

        execute!(stdout(), EnableMouseCapture)?;
        let result = self.event_loop(&mut terminal, &mut model, &tx, &rx);
        let _ = execute!(stdout(), DisableMouseCapture);
        ratatui::restore();

        result
    }

    /// Queue or cancel the search debounce based on the message.
    const fn update_search_debouncer(msg: &Message, now_ms: u64, debouncer: &mut SearchDebouncer) {
        match msg {
            Message::SearchInput(_) => debouncer.queue(now_ms),
            Message::ApplySearch
            | Message::CommitSearch
            | Message::ClearSearch
            | Message::StartSearch => debouncer.cancel(),
            _ => {}
        }
    }

    fn event_loop(
        &self,
        terminal: &mut DefaultTerminal,
        model: &mut Model,
        tx: &Sender<Message>,
        rx: &Receiver<Message>,
    ) -> Result<()> {
        let start = Instant::now();
        let mut resize_debouncer = ResizeDebouncer::new(100);
        let mut search_debouncer = SearchDebouncer::new(200);
        let mut frame_idx: u64 = 0;
        let mut needs_render = true;

        loop {
            let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                crate::perf::log_event(
                    "event.resize.apply",
                    format!("frame={frame_idx} width={width} height={height}"),
                );
                let msg = Message::Resize(width, height);
                *model = update(std::mem::take(model), msg);
                needs_render = true;
            }

            if search_debouncer.take_ready(now_ms) {
                *model = update(std::mem::take(model), Message::ApplySearch);
                needs_render = true;
            }

            // Drain worker completions (manifest, articles, excerpts).
            while let Ok(msg) = rx.try_recv() {
                let side_msg = msg.clone();
                *model = update(std::mem::take(model), msg);
                self.handle_message_side_effects(model, tx, &side_msg);
                needs_render = true;
            }

            // Advance the scroll animation and expire pulses/toasts.
            if model.tick(Instant::now()) {
                needs_render = true;
            }

            // Poll cadence: immediate when painting, fast while
            // animating, snappy while work is in flight, lazy idle.
            let busy_io = matches!(model.catalog, CatalogState::Loading)
                || matches!(model.article, ArticleState::Loading { .. })
                || !model.descriptions_pending.is_empty();
            let poll_ms = if needs_render {
                0
            } else if model.scroll_animation.is_some() {
                16
            } else if resize_debouncer.is_pending() || search_debouncer.is_pending() {
                10
            } else if busy_io {
                25
            } else {
                250
            };

            if event::poll(Duration::from_millis(poll_ms))? {
                // Refresh timestamp after poll wait so debouncers use
                // accurate times.
                let event_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                let msg =
                    Self::handle_event(&event::read()?, model, event_ms, &mut resize_debouncer);
                if let Some(msg) = msg {
                    crate::perf::log_event("event.message", format!("frame={frame_idx} msg={msg:?}"));
                    let side_msg = msg.clone();
                    *model = update(std::mem::take(model), msg);
                    self.handle_message_side_effects(model, tx, &side_msg);
                    Self::update_search_debouncer(&side_msg, event_ms, &mut search_debouncer);
                    needs_render = true;
                }

                // Coalesce key repeat bursts into a single render.
                let mut drained = 0_u32;
                while event::poll(Duration::from_millis(0))? {
                    let drain_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                    let msg =
                        Self::handle_event(&event::read()?, model, drain_ms, &mut resize_debouncer);
                    if let Some(msg) = msg {
                        drained += 1;
                        let side_msg = msg.clone();
                        *model = update(std::mem::take(model), msg);
                        self.handle_message_side_effects(model, tx, &side_msg);
                        Self::update_search_debouncer(&side_msg, drain_ms, &mut search_debouncer);
                        needs_render = true;
                    }
                }
                if drained > 0 {
                    crate::perf::log_event(
                        "event.drain",
                        format!("frame={frame_idx} drained={drained}"),
                    );
                }
            }

            if needs_render {
                frame_idx += 1;
                let draw_start = Instant::now();
                terminal.draw(|frame| Self::view(model, frame))?;
                crate::perf::log_event(
                    "frame.draw",
                    format!(
                        "frame={} draw_ms={:.3}",
                        frame_idx,
                        draw_start.elapsed().as_secs_f64() * 1000.0
                    ),
                );
                needs_render = false;
            }

            if model.should_quit {
                break;
            }
        }
        Ok(())
    }
}
