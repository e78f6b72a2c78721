//! Software framebuffer the CRT pipeline composites into

/// 24-bit color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Source-over blend of `src` onto `self` with `alpha` in `0.0..=1.0`
    pub fn blend(self, src: Rgb, alpha: f32) -> Rgb {
        let a = alpha.clamp(0.0, 1.0);
        let mix = |dst: u8, src: u8| -> u8 {
            let v = f32::from(dst) + (f32::from(src) - f32::from(dst)) * a;
            v.round().clamp(0.0, 255.0) as u8
        };
        Rgb::new(mix(self.r, src.r), mix(self.g, src.g), mix(self.b, src.b))
    }

    /// Per-channel maximum
    pub fn max(self, other: Rgb) -> Rgb {
        Rgb::new(
            self.r.max(other.r),
            self.g.max(other.g),
            self.b.max(other.b),
        )
    }

    /// Add `amount` to every channel, saturating at white
    pub fn brighten(self, amount: u8) -> Rgb {
        Rgb::new(
            self.r.saturating_add(amount),
            self.g.saturating_add(amount),
            self.b.saturating_add(amount),
        )
    }

    /// Rec. 601 luma, handy for comparing brightness in tests and effects
    pub fn luma(self) -> f32 {
        0.299 * f32::from(self.r) + 0.587 * f32::from(self.g) + 0.114 * f32::from(self.b)
    }
}

/// An RGB image stored row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl Frame {
    /// Create a black frame
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb::BLACK; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Pixel at `(x, y)`, or `None` outside the frame
    pub fn get(&self, x: i32, y: i32) -> Option<Rgb> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Set a single pixel (clipped)
    pub fn set(&mut self, x: i32, y: i32, color: Rgb) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    /// Fill an axis-aligned rectangle (clipped)
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb) {
        self.for_each_in_rect(x, y, w, h, |px| *px = color);
    }

    /// Alpha-blend a single pixel (clipped)
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Rgb, alpha: f32) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = self.pixels[i].blend(color, alpha);
        }
    }

    /// Alpha-blend a rectangle (clipped)
    pub fn blend_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb, alpha: f32) {
        self.for_each_in_rect(x, y, w, h, |px| *px = px.blend(color, alpha));
    }

    /// Blend, but never darken any channel
    pub fn lighten_pixel(&mut self, x: i32, y: i32, color: Rgb, alpha: f32) {
        if let Some(i) = self.index(x, y) {
            let px = self.pixels[i];
            self.pixels[i] = px.max(px.blend(color, alpha));
        }
    }

    /// Blend a full-width row (ignored outside the frame)
    pub fn blend_row(&mut self, y: i32, color: Rgb, alpha: f32) {
        let width = self.width as i32;
        self.blend_rect(0, y, width, 1, color, alpha);
    }

    /// Lighten every pixel toward the matching pixel of `other`.
    ///
    /// Frames of a different size are ignored.
    pub fn lighten_from(&mut self, other: &Frame, alpha: f32) {
        if other.width != self.width || other.height != self.height {
            return;
        }
        for (px, src) in self.pixels.iter_mut().zip(&other.pixels) {
            *px = px.max(px.blend(*src, alpha));
        }
    }

    fn for_each_in_rect(&mut self, x: i32, y: i32, w: i32, h: i32, mut f: impl FnMut(&mut Rgb)) {
        let x0 = x.max(0) as usize;
        let y0 = y.max(0) as usize;
        let x1 = (x.saturating_add(w)).clamp(0, self.width as i32) as usize;
        let y1 = (y.saturating_add(h)).clamp(0, self.height as i32) as usize;
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        for row in y0..y1 {
            let start = row * self.width;
            for px in &mut self.pixels[start + x0..start + x1] {
                f(px);
            }
        }
    }
}
