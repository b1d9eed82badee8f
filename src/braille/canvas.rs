/// Braille Unicode canvas for region outlines.
/// Each character cell holds a 2x4 dot grid, so the pixel resolution is
/// `width * 2` by `height * 4`. Patterns live at U+2800..=U+28FF.
#[derive(Clone)]
pub struct BrailleCanvas {
    width: usize,  // Characters
    height: usize, // Characters
    cells: Vec<u8>, // Dot bits per char, row-major
}

const BLANK: u32 = 0x2800;

impl BrailleCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0u8; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Set a dot. Layout per character:
    /// ```text
    /// (0,0) (1,0)   bits: 0x01 0x08
    /// (0,1) (1,1)   bits: 0x02 0x10
    /// (0,2) (1,2)   bits: 0x04 0x20
    /// (0,3) (1,3)   bits: 0x40 0x80
    /// ```
    pub fn set_pixel(&mut self, x: usize, y: usize) {
        let cx = x / 2;
        let cy = y / 4;

        if cx >= self.width || cy >= self.height {
            return;
        }

        let bit = match (x % 2, y % 4) {
            (0, 0) => 0x01,
            (1, 0) => 0x08,
            (0, 1) => 0x02,
            (1, 1) => 0x10,
            (0, 2) => 0x04,
            (1, 2) => 0x20,
            (0, 3) => 0x40,
            (1, 3) => 0x80,
            _ => 0,
        };

        self.cells[cy * self.width + cx] |= bit;
    }

    /// Set a dot using signed coordinates (ignores negative values)
    pub fn set_pixel_signed(&mut self, x: i32, y: i32) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize);
        }
    }

    /// Glyph at a character cell, `None` when no dot is set
    pub fn glyph(&self, cx: usize, cy: usize) -> Option<char> {
        if cx >= self.width || cy >= self.height {
            return None;
        }
        match self.cells[cy * self.width + cx] {
            0 => None,
            bits => char::from_u32(BLANK + bits as u32),
        }
    }

    #[cfg(test)]
    pub fn to_string(&self) -> String {
        (0..self.height)
            .map(|cy| {
                (0..self.width)
                    .map(|cx| self.glyph(cx, cy).unwrap_or('\u{2800}'))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
