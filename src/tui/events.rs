use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CEvent, KeyEvent, KeyEventKind};
use log::debug;

/// Ticks drive the day-change check, so anything faster only burns CPU.
const MIN_TICK: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Key(KeyEvent),
    Resize(u16, u16),
    Tick,
}

/// Map a terminal event to a dashboard event. Key releases and repeats
/// (sent by terminals with the kitty protocol) are dropped.
pub fn translate(raw: CEvent) -> Option<Event> {
    match raw {
        CEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CEvent::Resize(w, h) => Some(Event::Resize(w, h)),
        _ => None,
    }
}

pub fn tick_interval(tick_rate_ms: u64) -> Duration {
    Duration::from_millis(tick_rate_ms).max(MIN_TICK)
}

/// Input thread feeding the dashboard loop.
pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::channel();
        let tick_rate = tick_interval(tick_rate_ms);

        thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = tick_rate.saturating_sub(last_tick.elapsed());
                let ready = event::poll(timeout).unwrap_or(false);

                let forwarded = if ready {
                    match event::read() {
                        Ok(raw) => translate(raw),
                        Err(e) => {
                            debug!("Terminal input closed: {}", e);
                            break;
                        }
                    }
                } else {
                    None
                };
                let forwarded = forwarded.or_else(|| {
                    (last_tick.elapsed() >= tick_rate).then(|| {
                        last_tick = Instant::now();
                        Event::Tick
                    })
                });

                if let Some(ev) = forwarded {
                    if tx.send(ev).is_err() {
                        break;
                    }
                }
            }
        });

        Self { rx }
    }

    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }
}
