//! Viewer protocol definitions for Shell <-> Render Module communication
//!
//! The render module is an external collaborator that draws the opened image.
//! The shell forwards pointer input to it verbatim and repaints whenever the
//! module asks for it. This crate defines the shared data structures and the
//! forwarding session.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Device wheel units per notch
pub const WHEEL_DELTA: i32 = 120;

bitflags! {
    /// Pressed mouse buttons, as the render module expects them
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct MouseButtons: u32 {
        const LEFT = 1;
        const RIGHT = 2;
        const MIDDLE = 4;
    }
}

/// Pointer input forwarded to the render module.
///
/// Coordinates are device pixels relative to the view's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Press { buttons: MouseButtons, x: i32, y: i32 },
    Move { buttons: MouseButtons, x: i32, y: i32 },
    Release { buttons: MouseButtons, x: i32, y: i32 },
    /// Signed wheel rotation in notches (positive away from the user)
    Wheel { notches: f64, x: i32, y: i32 },
}

impl PointerEvent {
    /// Wheel event from a raw device delta
    pub fn wheel(delta: i32, step: i32, x: i32, y: i32) -> Self {
        PointerEvent::Wheel {
            notches: wheel_notches(delta, step),
            x,
            y,
        }
    }

    /// Position of the pointer
    pub fn position(&self) -> (i32, i32) {
        match *self {
            PointerEvent::Press { x, y, .. }
            | PointerEvent::Move { x, y, .. }
            | PointerEvent::Release { x, y, .. }
            | PointerEvent::Wheel { x, y, .. } => (x, y),
        }
    }
}

/// Convert a device wheel delta to notches. A non-positive `step` falls back
/// to [`WHEEL_DELTA`].
pub fn wheel_notches(delta: i32, step: i32) -> f64 {
    let step = if step > 0 { step } else { WHEEL_DELTA };
    f64::from(delta) / f64::from(step)
}

/// Why a redraw was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RedrawReason {
    /// The window system asked for a paint
    Paint,
    /// The view changed size
    Resize,
    /// The module reported its view as invalid after an input event
    Invalidated,
}

/// Errors reported by a render module
#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Image not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Cannot open {}: {message}", path.display())]
    OpenFailed { path: PathBuf, message: String },

    #[error("No image is open")]
    NotOpen,
}

/// The render module as seen by the shell
pub trait RenderModule {
    /// Start a view on `image`
    fn open(&mut self, image: &Path) -> Result<(), ViewerError>;

    /// Paint the current view
    fn redraw(&mut self, reason: RedrawReason);

    /// Handle pointer input. Returns `true` when the view must be repainted.
    fn handle_pointer(&mut self, event: PointerEvent) -> bool;

    /// Release the view. Called once when the session ends.
    fn close(&mut self) {}
}

/// One opened image, forwarding shell events to a render module
pub struct ViewSession<M: RenderModule> {
    module: M,
    image: PathBuf,
    wheel_step: i32,
}

impl<M: RenderModule> ViewSession<M> {
    /// Open `image` in `module`
    pub fn open(mut module: M, image: impl Into<PathBuf>) -> Result<Self, ViewerError> {
        let image = image.into();
        if !image.is_file() {
            return Err(ViewerError::NotFound(image));
        }

        module.open(&image)?;
        tracing::info!("View opened: {}", image.display());

        Ok(Self {
            module,
            image,
            wheel_step: WHEEL_DELTA,
        })
    }

    /// Device wheel units per notch
    pub fn with_wheel_step(mut self, step: i32) -> Self {
        self.wheel_step = step;
        self
    }

    pub fn image(&self) -> &Path {
        &self.image
    }

    pub fn module(&self) -> &M {
        &self.module
    }

    pub fn paint(&mut self) {
        self.module.redraw(RedrawReason::Paint);
    }

    pub fn resize(&mut self) {
        self.module.redraw(RedrawReason::Resize);
    }

    pub fn mouse_down(&mut self, buttons: MouseButtons, x: i32, y: i32) -> bool {
        self.forward(PointerEvent::Press { buttons, x, y })
    }

    pub fn mouse_move(&mut self, buttons: MouseButtons, x: i32, y: i32) -> bool {
        self.forward(PointerEvent::Move { buttons, x, y })
    }

    pub fn mouse_up(&mut self, buttons: MouseButtons, x: i32, y: i32) -> bool {
        self.forward(PointerEvent::Release { buttons, x, y })
    }

    /// Forward a raw device wheel delta
    pub fn mouse_wheel(&mut self, delta: i32, x: i32, y: i32) -> bool {
        self.forward(PointerEvent::wheel(delta, self.wheel_step, x, y))
    }

    /// Forward an event and repaint if the module asks for it.
    /// Returns whether a repaint happened.
    pub fn forward(&mut self, event: PointerEvent) -> bool {
        let invalidated = self.module.handle_pointer(event);
        if invalidated {
            tracing::trace!("Repaint after {:?}", event);
            self.module.redraw(RedrawReason::Invalidated);
        }
        invalidated
    }
}

impl<M: RenderModule> Drop for ViewSession<M> {
    fn drop(&mut self) {
        self.module.close();
        tracing::debug!("View closed: {}", self.image.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::NamedTempFile;

    #[derive(Default)]
    struct Log {
        opened: Option<PathBuf>,
        events: Vec<PointerEvent>,
        redraws: Vec<RedrawReason>,
        closed: bool,
    }

    /// Asks for a repaint on button events only
    struct MockModule(Rc<RefCell<Log>>);

    impl RenderModule for MockModule {
        fn open(&mut self, image: &Path) -> Result<(), ViewerError> {
            self.0.borrow_mut().opened = Some(image.to_path_buf());
            Ok(())
        }

        fn redraw(&mut self, reason: RedrawReason) {
            self.0.borrow_mut().redraws.push(reason);
        }

        fn handle_pointer(&mut self, event: PointerEvent) -> bool {
            self.0.borrow_mut().events.push(event);
            !matches!(event, PointerEvent::Move { .. })
        }

        fn close(&mut self) {
            self.0.borrow_mut().closed = true;
        }
    }

    fn session() -> (NamedTempFile, Rc<RefCell<Log>>, ViewSession<MockModule>) {
        let image = NamedTempFile::new().unwrap();
        let log = Rc::new(RefCell::new(Log::default()));
        let session = ViewSession::open(MockModule(log.clone()), image.path()).unwrap();
        (image, log, session)
    }

    #[test]
    fn test_button_bits() {
        assert_eq!(MouseButtons::LEFT.bits(), 1);
        assert_eq!(MouseButtons::RIGHT.bits(), 2);
        assert_eq!(MouseButtons::MIDDLE.bits(), 4);
        assert_eq!((MouseButtons::LEFT | MouseButtons::MIDDLE).bits(), 5);
        assert_eq!(MouseButtons::from_bits_truncate(0xff), MouseButtons::all());
    }

    #[test]
    fn test_wheel_notches() {
        assert_eq!(wheel_notches(120, 120), 1.0);
        assert_eq!(wheel_notches(-240, 120), -2.0);
        assert_eq!(wheel_notches(60, 120), 0.5);
        assert_eq!(wheel_notches(120, 0), 1.0);
    }

    #[test]
    fn test_open_missing_image() {
        let log = Rc::new(RefCell::new(Log::default()));
        let result = ViewSession::open(MockModule(log.clone()), "/no/such/image.png");
        assert!(matches!(result, Err(ViewerError::NotFound(_))));
        assert!(log.borrow().opened.is_none());
    }

    #[test]
    fn test_repaint_only_when_invalidated() {
        let (image, log, mut session) = session();
        assert_eq!(log.borrow().opened.as_deref(), Some(image.path()));

        assert!(!session.mouse_move(MouseButtons::empty(), 3, 4));
        assert!(log.borrow().redraws.is_empty());

        assert!(session.mouse_down(MouseButtons::LEFT, 3, 4));
        assert!(session.mouse_wheel(-120, 5, 6));
        assert!(session.mouse_up(MouseButtons::LEFT, 5, 6));
        assert_eq!(log.borrow().redraws, [RedrawReason::Invalidated; 3]);
        assert_eq!(
            log.borrow().events[2],
            PointerEvent::Wheel { notches: -1.0, x: 5, y: 6 }
        );
        assert_eq!(
            log.borrow().events[3],
            PointerEvent::Release { buttons: MouseButtons::LEFT, x: 5, y: 6 }
        );
    }

    #[test]
    fn test_paint_and_resize_always_redraw() {
        let (_image, log, mut session) = session();
        session.paint();
        session.resize();
        assert_eq!(log.borrow().redraws, [RedrawReason::Paint, RedrawReason::Resize]);
    }

    #[test]
    fn test_drop_closes_module() {
        let (_image, log, session) = session();
        drop(session);
        assert!(log.borrow().closed);
    }
}
