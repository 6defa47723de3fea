//! Framebuffer for software rendering
//!
//! Primitives take screen-pixel coordinates that may lie anywhere, including
//! far off-screen. Every primitive clips its iteration range to the buffer
//! before stepping, and every write is bounds checked.

use std::path::Path;

use super::types::{Color, ScreenPoint};

/// Row-major buffer of packed RGBA8888 cells
pub struct Framebuffer {
    pixels: Vec<u32>,
    width: usize,
    height: usize,
}

/// One horizontal run of a filled triangle, both ends inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub y: i64,
    pub left: i64,
    pub right: i64,
}

/// Round half up, matching the projection's rounding
fn round_half_up(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height],
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Packed cells, row-major
    pub fn cells(&self) -> &[u32] {
        &self.pixels
    }

    /// Zero every cell (transparent black)
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color.pack());
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.contains_wide(x as i64, y as i64)
    }

    fn contains_wide(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as u64) < self.width as u64 && (y as u64) < self.height as u64
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Color> {
        if self.contains(x, y) {
            Some(Color::unpack(self.pixels[y as usize * self.width + x as usize]))
        } else {
            None
        }
    }

    /// Write one pixel. Off-screen coordinates are ignored.
    pub fn pixel(&mut self, x: i32, y: i32, color: Color) {
        self.plot(x as i64, y as i64, color.pack());
    }

    /// Write one pixel without a bounds check.
    ///
    /// # Safety
    /// `x < width` and `y < height` must hold.
    pub unsafe fn pixel_unchecked(&mut self, x: usize, y: usize, color: Color) {
        debug_assert!(x < self.width && y < self.height);
        *self.pixels.get_unchecked_mut(y * self.width + x) = color.pack();
    }

    fn plot(&mut self, x: i64, y: i64, cell: u32) {
        if self.contains_wide(x, y) {
            let idx = y as usize * self.width + x as usize;
            self.pixels[idx] = cell;
        }
    }

    /// Draw a line with a DDA: step one pixel along the major axis and
    /// accumulate the fractional minor-axis offset.
    ///
    /// Endpoints are swapped into ascending major-axis order first, so
    /// `line(a, b)` and `line(b, a)` write the same pixels. A line clipped at
    /// its start computes the first minor-axis value directly instead of
    /// accumulating to it, so it matches the unclipped line up to float
    /// rounding.
    pub fn line(&mut self, p0: ScreenPoint, p1: ScreenPoint, color: Color) {
        let cell = color.pack();

        if p0 == p1 {
            self.plot(p0.x as i64, p0.y as i64, cell);
            return;
        }

        let (x0, y0) = (p0.x as i64, p0.y as i64);
        let (x1, y1) = (p1.x as i64, p1.y as i64);

        if (x1 - x0).abs() > (y1 - y0).abs() {
            // x-major: every column gets exactly one pixel
            let ((x0, y0), (x1, y1)) = if x0 > x1 { ((x1, y1), (x0, y0)) } else { ((x0, y0), (x1, y1)) };
            let a = (y1 - y0) as f64 / (x1 - x0) as f64;

            let start = x0.max(0);
            let end = x1.min(self.width as i64 - 1);
            let mut y = y0 as f64 + a * (start - x0) as f64;
            for x in start..=end {
                self.plot(x, round_half_up(y), cell);
                y += a;
            }
        } else {
            // y-major
            let ((x0, y0), (x1, y1)) = if y0 > y1 { ((x1, y1), (x0, y0)) } else { ((x0, y0), (x1, y1)) };
            let a = (x1 - x0) as f64 / (y1 - y0) as f64;

            let start = y0.max(0);
            let end = y1.min(self.height as i64 - 1);
            let mut x = x0 as f64 + a * (start - y0) as f64;
            for y in start..=end {
                self.plot(round_half_up(x), y, cell);
                x += a;
            }
        }
    }

    pub fn triangle_wireframe(&mut self, p0: ScreenPoint, p1: ScreenPoint, p2: ScreenPoint, color: Color) {
        self.line(p0, p1, color);
        self.line(p1, p2, color);
        self.line(p2, p0, color);
    }

    /// Scanline fill. Row `y1` of the middle vertex is written by both the
    /// upper and the lower half. The long edge keeps stepping across the
    /// split, so the lower half sees it one row ahead and the two writes of
    /// row `y1` can differ in extent.
    pub fn triangle_filled(&mut self, p0: ScreenPoint, p1: ScreenPoint, p2: ScreenPoint, color: Color) {
        let cell = color.pack();
        let rows = (0, self.height as i64 - 1);
        let max_x = self.width as i64 - 1;

        for_each_span(p0, p1, p2, rows, |span| {
            let left = span.left.max(0);
            let right = span.right.min(max_x);
            if left > right {
                return;
            }
            let row = span.y as usize * self.width;
            self.pixels[row + left as usize..=row + right as usize].fill(cell);
        });
    }

    /// Serialize as [r, g, b, a] bytes per pixel, the layout the display
    /// texture expects.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|cell| cell.to_be_bytes()).collect()
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> image::ImageResult<()> {
        image::save_buffer(
            path,
            &self.to_rgba8(),
            self.width as u32,
            self.height as u32,
            image::ExtendedColorType::Rgba8,
        )
    }
}

/// Walk the rows of a filled triangle, calling `emit` for each run.
///
/// Vertices are sorted by ascending y with three conditional swaps (stable
/// for ties). The long edge p0->p2 is interpolated across both halves; the
/// short edge is p0->p1 for the upper half and p1->p2 for the lower half.
/// A zero-height half is skipped instead of dividing by zero. Only rows in
/// `rows` (inclusive) are emitted; x is left unclipped.
pub fn for_each_span(
    p0: ScreenPoint,
    p1: ScreenPoint,
    p2: ScreenPoint,
    rows: (i64, i64),
    mut emit: impl FnMut(Span),
) {
    let mut v = [
        (p0.x as i64, p0.y as i64),
        (p1.x as i64, p1.y as i64),
        (p2.x as i64, p2.y as i64),
    ];
    if v[1].1 < v[0].1 {
        v.swap(0, 1);
    }
    if v[2].1 < v[0].1 {
        v.swap(0, 2);
    }
    if v[2].1 < v[1].1 {
        v.swap(1, 2);
    }
    let [(x0, y0), (x1, y1), (x2, y2)] = v;

    if y0 == y2 {
        // All three on one row
        if y0 >= rows.0 && y0 <= rows.1 {
            emit(Span {
                y: y0,
                left: x0.min(x1).min(x2),
                right: x0.max(x1).max(x2),
            });
        }
        return;
    }

    let a_long = (x2 - x0) as f64 / (y2 - y0) as f64;
    let mut x_long = x0 as f64;

    if y1 > y0 {
        let a_short = (x1 - x0) as f64 / (y1 - y0) as f64;
        x_long = scan_half(y0, y1, x_long, a_long, x0 as f64, a_short, rows, &mut emit);
    }
    if y2 > y1 {
        let a_short = (x2 - x1) as f64 / (y2 - y1) as f64;
        scan_half(y1, y2, x_long, a_long, x1 as f64, a_short, rows, &mut emit);
    }
}

/// Emit rows `y_from..=y_to` between two interpolated edges. Returns the
/// long-edge accumulator after its last step, i.e. one row past `y_to`;
/// the lower half resumes from there.
#[allow(clippy::too_many_arguments)]
fn scan_half(
    y_from: i64,
    y_to: i64,
    x_long: f64,
    a_long: f64,
    x_short: f64,
    a_short: f64,
    rows: (i64, i64),
    emit: &mut impl FnMut(Span),
) -> f64 {
    let start = y_from.max(rows.0);
    let end = y_to.min(rows.1);

    let skipped = (start - y_from) as f64;
    let mut xl = x_long + a_long * skipped;
    let mut xs = x_short + a_short * skipped;
    for y in start..=end {
        let (left, right) = if xl > xs { (xs, xl) } else { (xl, xs) };
        emit(Span {
            y,
            left: round_half_up(left),
            right: round_half_up(right),
        });
        xl += a_long;
        xs += a_short;
    }

    if start == y_from && end == y_to {
        xl
    } else {
        x_long + a_long * (y_to - y_from + 1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const C: Color = Color::RED;

    fn pt(x: i32, y: i32) -> ScreenPoint {
        ScreenPoint::new(x, y)
    }

    fn written(fb: &Framebuffer) -> HashSet<(usize, usize)> {
        let mut set = HashSet::new();
        for (i, cell) in fb.cells().iter().enumerate() {
            if *cell != 0 {
                set.insert((i % fb.width(), i / fb.width()));
            }
        }
        set
    }

    fn spans(p0: ScreenPoint, p1: ScreenPoint, p2: ScreenPoint) -> Vec<Span> {
        let mut out = Vec::new();
        for_each_span(p0, p1, p2, (i64::MIN, i64::MAX), |s| out.push(s));
        out
    }

    #[test]
    fn test_buffer_size() {
        let fb = Framebuffer::new(7, 3);
        assert_eq!(fb.cells().len(), 21);
        assert_eq!(fb.to_rgba8().len(), 84);
    }

    #[test]
    fn test_pixel_offset_and_bytes() {
        let mut fb = Framebuffer::new(4, 4);
        fb.pixel(2, 1, Color::with_alpha(1, 2, 3, 4));
        assert_eq!(fb.cells()[6], 0x0102_0304);
        assert_eq!(&fb.to_rgba8()[24..28], &[1, 2, 3, 4]);
        assert_eq!(fb.get(2, 1), Some(Color::with_alpha(1, 2, 3, 4)));
    }

    #[test]
    fn test_pixel_offscreen_is_skipped() {
        let mut fb = Framebuffer::new(4, 4);
        fb.pixel(-1, 0, C);
        fb.pixel(4, 0, C);
        fb.pixel(0, 4, C);
        fb.pixel(i32::MAX, i32::MIN, C);
        assert!(written(&fb).is_empty());
        assert_eq!(fb.get(4, 0), None);
    }

    #[test]
    fn test_pixel_unchecked() {
        let mut fb = Framebuffer::new(4, 4);
        unsafe { fb.pixel_unchecked(3, 3, C) };
        assert_eq!(fb.get(3, 3), Some(C));
    }

    #[test]
    fn test_line_single_point() {
        let mut fb = Framebuffer::new(10, 10);
        fb.line(pt(3, 4), pt(3, 4), C);
        let set = written(&fb);
        assert_eq!(set.len(), 1);
        assert!(set.contains(&(3, 4)));
        assert_eq!(fb.get(3, 4), Some(C));
    }

    #[test]
    fn test_line_horizontal_major() {
        let mut fb = Framebuffer::new(20, 20);
        fb.line(pt(0, 0), pt(10, 5), C);
        let set = written(&fb);
        // one pixel per column
        assert_eq!(set.len(), 11);
        assert!(set.contains(&(0, 0)));
        assert!(set.contains(&(10, 5)));
        assert!(set.contains(&(4, 2)));
    }

    #[test]
    fn test_line_vertical_major() {
        let mut fb = Framebuffer::new(20, 20);
        fb.line(pt(2, 1), pt(5, 13), C);
        let set = written(&fb);
        assert_eq!(set.len(), 13);
        assert!(set.contains(&(2, 1)));
        assert!(set.contains(&(5, 13)));
    }

    #[test]
    fn test_line_endpoint_order_independent() {
        let pairs = [
            (pt(1, 1), pt(17, 6)),
            (pt(3, 18), pt(12, 0)),
            (pt(0, 9), pt(19, 2)),
            (pt(4, 4), pt(9, 9)),
            (pt(15, 2), pt(1, 7)),
            (pt(6, 0), pt(7, 19)),
        ];
        for (a, b) in pairs {
            let mut fwd = Framebuffer::new(20, 20);
            let mut rev = Framebuffer::new(20, 20);
            fwd.line(a, b, C);
            rev.line(b, a, C);
            assert_eq!(written(&fwd), written(&rev), "{:?} -> {:?}", a, b);
        }
    }

    #[test]
    fn test_line_clipped_matches_visible_part() {
        let mut clipped = Framebuffer::new(10, 10);
        clipped.line(pt(-20, -10), pt(30, 15), C);

        let mut reference = Framebuffer::new(60, 30);
        reference.line(pt(0, 0), pt(50, 25), C);

        let expected: HashSet<_> = written(&reference)
            .into_iter()
            .filter(|(x, y)| *x >= 20 && *x < 30 && *y >= 10 && *y < 20)
            .map(|(x, y)| (x - 20, y - 10))
            .collect();
        assert_eq!(written(&clipped), expected);
    }

    #[test]
    fn test_line_far_offscreen_terminates() {
        let mut fb = Framebuffer::new(8, 8);
        fb.line(pt(i32::MIN, 3), pt(i32::MAX, 3), C);
        assert_eq!(written(&fb).len(), 8);
    }

    #[test]
    fn test_wireframe_collinear_is_lines_only() {
        let mut fb = Framebuffer::new(20, 20);
        fb.triangle_wireframe(pt(0, 0), pt(5, 5), pt(10, 10), C);
        let set = written(&fb);
        assert_eq!(set.len(), 11);
        assert!(set.iter().all(|(x, y)| x == y));
    }

    #[test]
    fn test_wireframe_outline() {
        let mut fb = Framebuffer::new(20, 20);
        fb.triangle_wireframe(pt(0, 0), pt(10, 0), pt(0, 10), C);
        let set = written(&fb);
        assert!(set.contains(&(5, 0)));
        assert!(set.contains(&(0, 5)));
        assert!(set.contains(&(5, 5)));
        assert!(!set.contains(&(2, 2)));
    }

    #[test]
    fn test_filled_right_triangle_area() {
        let mut fb = Framebuffer::new(20, 20);
        fb.triangle_filled(pt(0, 0), pt(10, 0), pt(0, 10), C);
        let set = written(&fb);

        // Inclusive edges cover every lattice point of the closed triangle.
        // Pick's theorem: area 50, 30 boundary points -> 50 + 30/2 + 1.
        assert_eq!(set.len(), 66);
        assert!(set.iter().all(|(x, y)| *x <= 10 && *y <= 10));
        assert!(set.iter().all(|(x, y)| x + y <= 10));
    }

    #[test]
    fn test_filled_vertex_order_irrelevant() {
        let (a, b, c) = (pt(2, 1), pt(17, 8), pt(6, 18));
        let mut reference = Framebuffer::new(20, 20);
        reference.triangle_filled(a, b, c, C);
        for (p, q, r) in [(a, c, b), (b, a, c), (b, c, a), (c, a, b), (c, b, a)] {
            let mut fb = Framebuffer::new(20, 20);
            fb.triangle_filled(p, q, r, C);
            assert_eq!(written(&fb), written(&reference));
        }
    }

    #[test]
    fn test_filled_middle_row_scanned_twice() {
        let out = spans(pt(0, 0), pt(0, 4), pt(10, 10));
        // rows 0..=10 plus the repeated boundary row
        assert_eq!(out.len(), 12);

        let middle: Vec<_> = out.iter().filter(|s| s.y == 4).copied().collect();
        assert_eq!(middle, vec![Span { y: 4, left: 0, right: 4 }, Span { y: 4, left: 0, right: 5 }]);

        // the long edge stays one step ahead for the rest of the lower half
        assert_eq!(out[8], Span { y: 7, left: 5, right: 8 });
        assert_eq!(out[11], Span { y: 10, left: 10, right: 11 });

        let mut fb = Framebuffer::new(20, 20);
        fb.triangle_filled(pt(0, 0), pt(0, 4), pt(10, 10), C);
        let set = written(&fb);
        assert_eq!(set.len(), 38);
        for y in 4..=10 {
            assert!(set.contains(&(y + 1, y)), "row {}", y);
        }
    }

    #[test]
    fn test_filled_lower_half_continues_long_edge() {
        // upper half advances the long edge five times before the split
        let out = spans(pt(0, 0), pt(8, 4), pt(2, 10));
        let middle: Vec<_> = out.iter().filter(|s| s.y == 4).copied().collect();
        assert_eq!(middle, vec![Span { y: 4, left: 1, right: 8 }, Span { y: 4, left: 1, right: 8 }]);
        assert_eq!(out[11], Span { y: 10, left: 2, right: 2 });
    }

    #[test]
    fn test_filled_flat_top_and_bottom() {
        let top = spans(pt(0, 0), pt(6, 0), pt(3, 6));
        assert_eq!(top.len(), 7);
        assert_eq!(top[0], Span { y: 0, left: 0, right: 6 });
        assert_eq!(top[6], Span { y: 6, left: 3, right: 3 });

        let bottom = spans(pt(3, 0), pt(0, 6), pt(6, 6));
        assert_eq!(bottom.len(), 7);
        assert_eq!(bottom[0], Span { y: 0, left: 3, right: 3 });
        assert_eq!(bottom[6], Span { y: 6, left: 0, right: 6 });
    }

    #[test]
    fn test_filled_single_row_and_point() {
        assert_eq!(spans(pt(5, 2), pt(1, 2), pt(3, 2)), vec![Span { y: 2, left: 1, right: 5 }]);

        let mut fb = Framebuffer::new(4, 4);
        fb.triangle_filled(pt(1, 1), pt(1, 1), pt(1, 1), C);
        assert_eq!(written(&fb).len(), 1);
    }

    #[test]
    fn test_filled_clipped_to_buffer() {
        let mut fb = Framebuffer::new(8, 8);
        fb.triangle_filled(pt(-100, -100), pt(100, -100), pt(0, 100), C);
        // triangle covers the whole buffer
        assert_eq!(written(&fb).len(), 64);
    }

    #[test]
    fn test_filled_clipped_matches_visible_part() {
        let (a, b, c) = (pt(-7, -3), pt(13, 5), pt(2, 17));
        let mut clipped = Framebuffer::new(10, 10);
        clipped.triangle_filled(a, b, c, C);

        let shift = |p: ScreenPoint| pt(p.x + 20, p.y + 20);
        let mut reference = Framebuffer::new(60, 60);
        reference.triangle_filled(shift(a), shift(b), shift(c), C);

        let expected: HashSet<_> = written(&reference)
            .into_iter()
            .filter(|(x, y)| *x >= 20 && *x < 30 && *y >= 20 && *y < 30)
            .map(|(x, y)| (x - 20, y - 20))
            .collect();
        assert!(!expected.is_empty());
        assert_eq!(written(&clipped), expected);
    }

    #[test]
    fn test_clear_then_redraw_is_idempotent() {
        let mut fb = Framebuffer::new(16, 16);
        let draw = |fb: &mut Framebuffer| {
            fb.clear();
            fb.triangle_filled(pt(1, 1), pt(14, 3), pt(5, 15), Color::BLUE);
            fb.triangle_wireframe(pt(0, 15), pt(15, 0), pt(8, 8), Color::GREEN);
            fb.line(pt(0, 0), pt(15, 15), Color::WHITE);
        };
        draw(&mut fb);
        let first = fb.cells().to_vec();
        draw(&mut fb);
        assert_eq!(fb.cells(), &first[..]);
    }

    #[test]
    fn test_fill_and_clear() {
        let mut fb = Framebuffer::new(3, 3);
        fb.fill(Color::WHITE);
        assert!(fb.cells().iter().all(|c| *c == Color::WHITE.pack()));
        fb.clear();
        assert!(fb.cells().iter().all(|c| *c == 0));
    }
}
