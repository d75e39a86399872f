use minifb::{Key, Window, WindowOptions};

use facewatch_core::shared::frame::{Frame, PixelFormat};

const TARGET_FPS: usize = 60;

/// Desktop preview window over `minifb`.
///
/// Renders whatever frame it is handed and reports when the user asked to
/// leave (window closed or Escape). It never pulls frames itself; the caller
/// polls the sink and decides what to show.
pub struct DisplayWindow {
    window: Window,
    buffer: Vec<u32>,
}

impl DisplayWindow {
    pub fn open(title: &str, width: usize, height: usize) -> Result<Self, minifb::Error> {
        let mut window = Window::new(title, width, height, WindowOptions::default())?;
        window.set_target_fps(TARGET_FPS);
        Ok(Self {
            window,
            buffer: Vec::with_capacity(width * height),
        })
    }

    /// True once the window was closed or Escape pressed.
    pub fn exit_requested(&self) -> bool {
        !self.window.is_open() || self.window.is_key_down(Key::Escape)
    }

    pub fn render(&mut self, frame: &Frame) -> Result<(), minifb::Error> {
        pack_0rgb(frame, &mut self.buffer);
        self.window
            .update_with_buffer(&self.buffer, frame.width() as usize, frame.height() as usize)
    }

    /// Pumps window events without changing the displayed image. Called on
    /// render ticks where the sink had nothing new.
    pub fn idle(&mut self) {
        self.window.update();
    }
}

/// Packs a frame into the 0RGB `u32` layout minifb expects.
fn pack_0rgb(frame: &Frame, buffer: &mut Vec<u32>) {
    buffer.clear();
    match frame.format() {
        PixelFormat::Rgb => buffer.extend(frame.data().chunks_exact(3).map(|px| {
            (u32::from(px[0]) << 16) | (u32::from(px[1]) << 8) | u32::from(px[2])
        })),
        PixelFormat::Gray => buffer.extend(frame.data().iter().map(|&v| {
            let v = u32::from(v);
            (v << 16) | (v << 8) | v
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_rgb_pixel_layout() {
        let frame = Frame::new(
            vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 10, 20, 30],
            4,
            1,
            PixelFormat::Rgb,
            0,
        );
        let mut buffer = Vec::new();
        pack_0rgb(&frame, &mut buffer);
        assert_eq!(buffer, vec![0x00FF0000, 0x0000FF00, 0x000000FF, 0x000A141E]);
    }

    #[test]
    fn test_pack_gray_replicates_channels() {
        let frame = Frame::new(vec![0, 128, 255], 3, 1, PixelFormat::Gray, 0);
        let mut buffer = Vec::new();
        pack_0rgb(&frame, &mut buffer);
        assert_eq!(buffer, vec![0x00000000, 0x00808080, 0x00FFFFFF]);
    }

    #[test]
    fn test_pack_reuses_the_buffer() {
        let mut buffer = vec![0xDEADBEEF; 100];
        let frame = Frame::new(vec![1, 2, 3], 1, 1, PixelFormat::Rgb, 0);
        pack_0rgb(&frame, &mut buffer);
        assert_eq!(buffer.len(), 1);
    }
}
