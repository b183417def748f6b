//! Terminal platform for the mesh viewer
//!
//! Draws into a half-block [`Canvas`] with 24-bit color, reads the pointer
//! from mouse motion events and paces frames with a sleep.

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent,
    },
    execute, queue,
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use meshview_core::{Color, FrameStatus, Key, Platform, PlatformEvent, Point2D, Surface, Viewer};
use std::io::{self, stdout, Stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub mod canvas;

pub use canvas::Canvas;

/// Terminal rows used by the status line above the canvas.
const STATUS_ROWS: u16 = 1;

/// Canvas size in pixels for a terminal of `cols` x `rows` cells.
pub fn pixel_size(cols: u16, rows: u16) -> (u32, u32) {
    (cols as u32, rows.saturating_sub(STATUS_ROWS) as u32 * 2)
}

/// Pixel size of the canvas for the current terminal.
pub fn terminal_pixel_size() -> io::Result<(u32, u32)> {
    let (cols, rows) = terminal::size()?;
    Ok(pixel_size(cols, rows))
}

/// Translate one terminal event into viewer events and pointer updates.
fn translate(event: Event, pointer: &mut Option<Point2D>) -> Option<PlatformEvent> {
    match event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) => {
            // Only presses count; repeats and releases would re-toggle.
            if kind != KeyEventKind::Press {
                return None;
            }
            let key = match code {
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Some(PlatformEvent::Quit)
                }
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Some(PlatformEvent::Quit)
                }
                KeyCode::Char(' ') => Key::Space,
                KeyCode::Char(c) => Key::Char(c.to_ascii_lowercase()),
                _ => Key::Other,
            };
            Some(PlatformEvent::KeyPress(key))
        }
        Event::Mouse(MouseEvent { column, row, .. }) => {
            *pointer = Some(Point2D::new(
                column as f64,
                row.saturating_sub(STATUS_ROWS) as f64 * 2.0,
            ));
            None
        }
        Event::Resize(cols, rows) => {
            let (width, height) = pixel_size(cols, rows);
            Some(PlatformEvent::Resize { width, height })
        }
        _ => None,
    }
}

/// crossterm-backed display surface, pointer source and frame pacer
pub struct TerminalPlatform {
    canvas: Canvas,
    out: Stdout,
    /// `None` until the first mouse event arrives.
    pointer: Option<Point2D>,
    last_tick: Option<Instant>,
    fps_window: Instant,
    frame_count: u32,
    fps: f32,
    status: Option<FrameStatus>,
}

impl TerminalPlatform {
    pub fn new() -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        Ok(Self {
            canvas: Canvas::for_cells(cols, rows.saturating_sub(STATUS_ROWS)),
            out: stdout(),
            pointer: None,
            last_tick: None,
            fps_window: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            status: None,
        })
    }

    fn status_line(&self) -> String {
        let on_off = |b: bool| if b { "on" } else { "off" };
        match &self.status {
            Some(status) => format!(
                "Meshview | FPS: {:.1} | Faces: {} | Edges: {} | Shading: {} | Mouse=Rotate Space=Edges S=Shading Q=Quit",
                self.fps,
                status.faces,
                on_off(status.wireframe),
                status.shading.label(),
            ),
            None => format!("Meshview | FPS: {:.1}", self.fps),
        }
    }
}

impl Surface for TerminalPlatform {
    type Error = io::Error;

    fn clear(&mut self, color: Color) -> io::Result<()> {
        self.canvas.clear(color);
        Ok(())
    }

    fn draw_polygon(&mut self, points: &[Point2D], color: Color) -> io::Result<()> {
        self.canvas.fill_polygon(points, color);
        Ok(())
    }

    fn draw_line(&mut self, from: Point2D, to: Point2D, color: Color) -> io::Result<()> {
        self.canvas.draw_line(from, to, color);
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        self.canvas.draw(&mut self.out, STATUS_ROWS)?;

        let width = self.canvas.width();
        let line: String = self.status_line().chars().take(width).collect();
        queue!(
            self.out,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(TermColor::Yellow),
            Print(line),
            ResetColor
        )?;

        self.out.flush()
    }
}

impl Platform for TerminalPlatform {
    fn poll_events(&mut self) -> io::Result<Vec<PlatformEvent>> {
        let mut events = Vec::new();
        while event::poll(Duration::ZERO)? {
            let translated = translate(event::read()?, &mut self.pointer);
            if let Some(PlatformEvent::Resize { width, height }) = translated {
                debug!(width, height, "terminal resized");
                self.canvas.resize(width as usize, height as usize);
                queue!(self.out, terminal::Clear(ClearType::All))?;
            }
            events.extend(translated);
        }
        Ok(events)
    }

    fn pointer_position(&mut self) -> Option<Point2D> {
        self.pointer
    }

    fn tick(&mut self, target_fps: u32) {
        let target_frame_time = Duration::from_secs_f64(1.0 / target_fps.max(1) as f64);
        if let Some(last) = self.last_tick {
            let elapsed = last.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }
        }

        let now = Instant::now();
        self.last_tick = Some(now);
        self.frame_count += 1;
        if (now - self.fps_window).as_secs() >= 1 {
            self.fps = self.frame_count as f32 / (now - self.fps_window).as_secs_f32();
            self.frame_count = 0;
            self.fps_window = now;
        }
    }

    fn show_status(&mut self, status: &FrameStatus) -> io::Result<()> {
        self.status = Some(*status);
        Ok(())
    }
}

/// Raw mode, alternate screen and mouse capture, undone on drop
///
/// Restoring runs on every exit from [`TerminalApp::run`], including a
/// failure while entering. Errors while restoring are logged, not returned.
struct TerminalGuard<W: Write> {
    out: W,
}

impl<W: Write> TerminalGuard<W> {
    fn enter(out: W) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut guard = Self { out };
        execute!(
            guard.out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture
        )?;
        Ok(guard)
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        if let Err(err) = execute!(
            self.out,
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        ) {
            warn!(%err, "failed to leave the alternate screen");
        }
        if let Err(err) = terminal::disable_raw_mode() {
            warn!(%err, "failed to disable raw mode");
        }
    }
}

/// Main application struct for terminal mesh viewing
pub struct TerminalApp {
    viewer: Viewer,
}

impl TerminalApp {
    pub fn new(viewer: Viewer) -> Self {
        Self { viewer }
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    /// Take over the terminal, run until quit, then restore it.
    pub fn run(&mut self) -> io::Result<()> {
        let _guard = TerminalGuard::enter(stdout())?;
        let mut platform = TerminalPlatform::new()?;
        self.viewer.run(&mut platform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseEventKind};
    use meshview_core::{Mesh, Orientation, ViewerConfig};
    use std::collections::VecDeque;
    use std::convert::Infallible;

    /// Feeds raw terminal events through `translate`, one batch per frame.
    #[derive(Default)]
    struct ReplayPlatform {
        batches: VecDeque<Vec<Event>>,
        pointer: Option<Point2D>,
    }

    impl Surface for ReplayPlatform {
        type Error = Infallible;

        fn clear(&mut self, _color: Color) -> Result<(), Infallible> {
            Ok(())
        }

        fn draw_polygon(&mut self, _points: &[Point2D], _color: Color) -> Result<(), Infallible> {
            Ok(())
        }

        fn draw_line(&mut self, _from: Point2D, _to: Point2D, _color: Color) -> Result<(), Infallible> {
            Ok(())
        }

        fn present(&mut self) -> Result<(), Infallible> {
            Ok(())
        }
    }

    impl Platform for ReplayPlatform {
        fn poll_events(&mut self) -> Result<Vec<PlatformEvent>, Infallible> {
            let Some(batch) = self.batches.pop_front() else {
                return Ok(vec![PlatformEvent::Quit]);
            };
            Ok(batch
                .into_iter()
                .filter_map(|event| translate(event, &mut self.pointer))
                .collect())
        }

        fn pointer_position(&mut self) -> Option<Point2D> {
            self.pointer
        }

        fn tick(&mut self, _target_fps: u32) {}
    }

    fn mouse_moved(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Moved,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    /// Writer that refuses every byte.
    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            state: KeyEventState::NONE,
        })
    }

    fn press(code: KeyCode) -> Event {
        key(code, KeyModifiers::NONE, KeyEventKind::Press)
    }

    #[test]
    fn test_pixel_size_reserves_status_row() {
        assert_eq!(pixel_size(80, 25), (80, 48));
        assert_eq!(pixel_size(10, 0), (10, 0));
    }

    #[test]
    fn test_translate_keys() {
        let mut pointer = None;
        assert_eq!(
            translate(press(KeyCode::Char(' ')), &mut pointer),
            Some(PlatformEvent::KeyPress(Key::Space))
        );
        assert_eq!(
            translate(press(KeyCode::Char('S')), &mut pointer),
            Some(PlatformEvent::KeyPress(Key::Char('s')))
        );
        assert_eq!(
            translate(press(KeyCode::Esc), &mut pointer),
            Some(PlatformEvent::Quit)
        );
        assert_eq!(
            translate(
                key(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyEventKind::Press),
                &mut pointer
            ),
            Some(PlatformEvent::Quit)
        );
        assert_eq!(
            translate(press(KeyCode::Tab), &mut pointer),
            Some(PlatformEvent::KeyPress(Key::Other))
        );
    }

    #[test]
    fn test_repeat_and_release_ignored() {
        let mut pointer = None;
        for kind in [KeyEventKind::Repeat, KeyEventKind::Release] {
            let event = key(KeyCode::Char(' '), KeyModifiers::NONE, kind);
            assert_eq!(translate(event, &mut pointer), None);
        }
    }

    #[test]
    fn test_mouse_moves_pointer() {
        let mut pointer = None;
        let event = Event::Mouse(MouseEvent {
            kind: MouseEventKind::Moved,
            column: 12,
            row: 6,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(translate(event, &mut pointer), None);
        assert_eq!(pointer, Some(Point2D::new(12.0, 10.0)));
    }

    #[test]
    fn test_first_mouse_event_does_not_rotate() {
        let config = ViewerConfig::default().with_rotate_speed(0.03);
        let mut viewer = Viewer::new(Mesh::cube(2.0), config).unwrap();
        let mut platform = ReplayPlatform {
            batches: VecDeque::from(vec![vec![], vec![mouse_moved(100, 20)], vec![]]),
            ..Default::default()
        };

        viewer.run(&mut platform).unwrap();
        assert_eq!(viewer.frames(), 3);
        assert_eq!(viewer.state().orientation, Orientation::zero());

        // The next move rotates by its own travel only.
        let mut platform = ReplayPlatform {
            batches: VecDeque::from(vec![vec![mouse_moved(110, 20)]]),
            pointer: platform.pointer,
        };
        viewer.run(&mut platform).unwrap();
        assert!((viewer.state().orientation.y - 0.3).abs() < 1e-12);
        assert_eq!(viewer.state().orientation.x, 0.0);
    }

    #[test]
    fn test_resize_reaches_the_viewer() {
        let mut pointer = None;
        assert_eq!(
            translate(Event::Resize(40, 13), &mut pointer),
            Some(PlatformEvent::Resize {
                width: 40,
                height: 24
            })
        );

        let config = ViewerConfig::default().with_window_size(80, 48);
        let mut viewer = Viewer::new(Mesh::cube(2.0), config).unwrap();
        let mut platform = ReplayPlatform {
            batches: VecDeque::from(vec![vec![Event::Resize(40, 13)]]),
            ..Default::default()
        };
        viewer.run(&mut platform).unwrap();
        assert_eq!(
            (viewer.config().window_width, viewer.config().window_height),
            (40, 24)
        );
        assert_eq!(viewer.config().scale, 50.0);
    }

    #[test]
    fn test_guard_restores_terminal_on_early_return() {
        fn fail_inside(out: &mut Vec<u8>) -> io::Result<()> {
            let _guard = TerminalGuard { out };
            BrokenPipe.write_all(b"frame")?;
            Ok(())
        }

        let mut out = Vec::new();
        assert!(fail_inside(&mut out).is_err());
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\x1b[?1049l"), "alternate screen left: {text:?}");
        assert!(text.contains("\x1b[?25h"), "cursor shown: {text:?}");
    }

    #[test]
    fn test_guard_survives_broken_output() {
        drop(TerminalGuard { out: BrokenPipe });
    }
}
