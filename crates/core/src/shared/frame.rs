/// Pixel layout of a [`Frame`] buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    /// 3 channels, row-major, tightly packed.
    Rgb,
    /// 1 channel intensity.
    Gray,
}

impl PixelFormat {
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Rgb => 3,
            PixelFormat::Gray => 1,
        }
    }
}

/// A single captured frame: contiguous pixel bytes in row-major order.
///
/// Frames are value-like: once produced they are cloned or consumed, never
/// shared mutably across pipeline stages. Format conversion happens at I/O
/// boundaries and in [`Frame::to_grayscale`]; everything else treats the
/// pixel data as opaque.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    format: PixelFormat,
    index: u64,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, format: PixelFormat, index: u64) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * format.channels(),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            format,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn channels(&self) -> usize {
        self.format.channels()
    }

    /// Sequence number assigned by the frame source.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Returns a single-channel copy of this frame using integer Rec. 601
    /// luma weights. A frame that is already grayscale converts by copy.
    pub fn to_grayscale(&self) -> Frame {
        let gray = match self.format {
            PixelFormat::Gray => self.data.clone(),
            PixelFormat::Rgb => self
                .data
                .chunks_exact(3)
                .map(|px| {
                    let r = px[0] as u32;
                    let g = px[1] as u32;
                    let b = px[2] as u32;
                    ((77 * r + 150 * g + 29 * b) >> 8) as u8
                })
                .collect(),
        };
        Frame::new(gray, self.width, self.height, PixelFormat::Gray, self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_and_accessors() {
        let data = vec![0u8; 12]; // 2x2x3
        let frame = Frame::new(data.clone(), 2, 2, PixelFormat::Rgb, 5);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.channels(), 3);
        assert_eq!(frame.index(), 5);
        assert_eq!(frame.data(), &data[..]);
    }

    #[test]
    fn test_clone_is_independent() {
        let frame = Frame::new(vec![100u8; 12], 2, 2, PixelFormat::Rgb, 0);
        let mut cloned = frame.clone();
        cloned.data_mut()[0] = 0;
        assert_eq!(frame.data()[0], 100);
        assert_eq!(cloned.data()[0], 0);
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height * channels")]
    fn test_mismatched_data_length_panics_in_debug() {
        Frame::new(vec![0u8; 10], 2, 2, PixelFormat::Rgb, 0);
    }

    #[test]
    fn test_grayscale_dimensions_and_format() {
        let frame = Frame::new(vec![0u8; 4 * 2 * 3], 4, 2, PixelFormat::Rgb, 7);
        let gray = frame.to_grayscale();
        assert_eq!(gray.format(), PixelFormat::Gray);
        assert_eq!(gray.channels(), 1);
        assert_eq!(gray.width(), 4);
        assert_eq!(gray.height(), 2);
        assert_eq!(gray.data().len(), 8);
        assert_eq!(gray.index(), 7);
    }

    #[test]
    fn test_grayscale_of_black_is_black() {
        let frame = Frame::new(vec![0u8; 12], 2, 2, PixelFormat::Rgb, 0);
        assert!(frame.to_grayscale().data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_grayscale_weights_green_heaviest() {
        let red = Frame::new(vec![255, 0, 0], 1, 1, PixelFormat::Rgb, 0);
        let green = Frame::new(vec![0, 255, 0], 1, 1, PixelFormat::Rgb, 0);
        let blue = Frame::new(vec![0, 0, 255], 1, 1, PixelFormat::Rgb, 0);
        let (r, g, b) = (
            red.to_grayscale().data()[0],
            green.to_grayscale().data()[0],
            blue.to_grayscale().data()[0],
        );
        assert!(g > r);
        assert!(r > b);
    }

    #[test]
    fn test_grayscale_of_white_is_near_white() {
        let frame = Frame::new(vec![255u8; 3], 1, 1, PixelFormat::Rgb, 0);
        let v = frame.to_grayscale().data()[0];
        assert!(v >= 254, "got {v}");
    }

    #[test]
    fn test_grayscale_of_gray_frame_is_copy() {
        let frame = Frame::new(vec![1, 2, 3, 4], 2, 2, PixelFormat::Gray, 3);
        let gray = frame.to_grayscale();
        assert_eq!(gray.data(), frame.data());
        assert_eq!(gray.index(), 3);
    }
}
