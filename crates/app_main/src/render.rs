//! Text render module: describes the view on a terminal instead of drawing it

use app_fs::{classify_name, format_size};
use std::io::Write;
use std::path::{Path, PathBuf};
use view_proto::{MouseButtons, PointerEvent, RedrawReason, RenderModule, ViewerError};

const ZOOM_PER_NOTCH: f64 = 1.25;

/// Keeps the pan/zoom state a real module would and prints it on redraw
pub struct TextModule<W: Write> {
    out: W,
    image: Option<PathBuf>,
    size_text: String,
    zoom: f64,
    offset: (i32, i32),
    drag_from: Option<(i32, i32)>,
}

impl<W: Write> TextModule<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            image: None,
            size_text: String::new(),
            zoom: 1.0,
            offset: (0, 0),
            drag_from: None,
        }
    }
}

impl<W: Write> RenderModule for TextModule<W> {
    fn open(&mut self, image: &Path) -> Result<(), ViewerError> {
        let metadata = std::fs::metadata(image).map_err(|e| ViewerError::OpenFailed {
            path: image.to_path_buf(),
            message: e.to_string(),
        })?;

        self.size_text = format_size(metadata.len());
        self.image = Some(image.to_path_buf());
        Ok(())
    }

    fn redraw(&mut self, reason: RedrawReason) {
        let Some(image) = &self.image else {
            return;
        };

        let name = image
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let class = classify_name(&name, false);

        let result = writeln!(
            self.out,
            "[{:?}] {} ({}, {}) zoom {:.2}x offset {:?}",
            reason,
            image.display(),
            class.label(),
            self.size_text,
            self.zoom,
            self.offset
        );
        if let Err(e) = result {
            tracing::warn!("Redraw failed: {}", e);
        }
    }

    fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Press { buttons, x, y } if buttons.contains(MouseButtons::LEFT) => {
                self.drag_from = Some((x, y));
                false
            }
            PointerEvent::Move { buttons, x, y } if buttons.contains(MouseButtons::LEFT) => {
                let Some((fx, fy)) = self.drag_from else {
                    return false;
                };
                self.offset = (self.offset.0 + x - fx, self.offset.1 + y - fy);
                self.drag_from = Some((x, y));
                true
            }
            PointerEvent::Release { .. } => self.drag_from.take().is_some(),
            PointerEvent::Wheel { notches, .. } if notches != 0.0 => {
                self.zoom *= ZOOM_PER_NOTCH.powf(notches);
                true
            }
            _ => false,
        }
    }
}
