#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Top-left position that centers `window` on `screen`, shifted by `offset`.
pub fn centered_origin(screen: Size, window: Size, offset: (i32, i32)) -> (i32, i32) {
    let x = screen.width as f64 / 2.0 - window.width as f64 / 2.0 + offset.0 as f64;
    let y = screen.height as f64 / 2.0 - window.height as f64 / 2.0 + offset.1 as f64;
    (x.round() as i32, y.round() as i32)
}
