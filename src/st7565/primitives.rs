//! Drawing primitives on top of [`Framebuffer::set_pixel`]
//!
//! Everything clips through `set_pixel`. `line` and `ellipse` also skip the
//! steps that cannot land on the buffer, so huge geometry stays cheap.

use embedded_graphics::pixelcolor::BinaryColor;

use crate::st7565::graphics::Framebuffer;

impl Framebuffer {
    /// Horizontal line of `w` pixels starting at `(x, y)`
    pub fn hline(&mut self, x: i32, y: i32, w: i32, color: BinaryColor) {
        self.fill_rect(x, y, w, 1, color);
    }

    /// Vertical line of `h` pixels starting at `(x, y)`
    pub fn vline(&mut self, x: i32, y: i32, h: i32, color: BinaryColor) {
        self.fill_rect(x, y, 1, h, color);
    }

    /// Solid rectangle, nothing is drawn for a non-positive width or height
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: BinaryColor) {
        if w <= 0 || h <= 0 {
            return;
        }
        // Only walk the part that can land on the buffer
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x.saturating_add(w).min(self.width() as i32);
        let y1 = y.saturating_add(h).min(self.height() as i32);
        for py in y0..y1 {
            for px in x0..x1 {
                self.set_pixel(px, py, color);
            }
        }
    }

    /// Line from `(x1, y1)` to `(x2, y2)`, both ends included (Bresenham)
    ///
    /// Steps whose major coordinate falls outside the buffer are skipped,
    /// so far off-screen endpoints cost no more than a line across the display.
    pub fn line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: BinaryColor) {
        let (mut x, mut y) = (i64::from(x1), i64::from(y1));
        let (mut dx, mut sx) = delta(x1, x2);
        let (mut dy, mut sy) = delta(y1, y2);

        let steep = dy > dx;
        if steep {
            core::mem::swap(&mut x, &mut y);
            core::mem::swap(&mut dx, &mut dy);
            core::mem::swap(&mut sx, &mut sy);
        }

        let limit = i64::from(if steep { self.height() } else { self.width() });
        let (first, end) = if sx > 0 {
            (-x, limit - x)
        } else {
            (x - limit + 1, x + 1)
        };
        let (first, end) = (first.max(0), end.min(dx));

        if first < end {
            // minor steps taken and error term after `first` major steps
            let (dx_w, dy_w, first_w) = (i128::from(dx), i128::from(dy), i128::from(first));
            let taken = ((2 * dy_w * first_w - dx_w).div_euclid(2 * dx_w) + 1).max(0);
            let mut e = (2 * dy_w - dx_w + 2 * dy_w * first_w - 2 * dx_w * taken) as i64;
            x += sx * first;
            y += sy * taken as i64;

            for _ in first..end {
                if steep {
                    self.plot(y, x, color);
                } else {
                    self.plot(x, y, color);
                }
                while e >= 0 {
                    y += sy;
                    e -= 2 * dx;
                }
                x += sx;
                e += 2 * dy;
            }
        }
        self.set_pixel(x2, y2, color);
    }

    /// Rectangle with its top-left corner at `(x, y)`, outline or filled
    ///
    /// The outline edges do not overlap, every border pixel is written once.
    pub fn rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: BinaryColor, fill: bool) {
        if w <= 0 || h <= 0 {
            return;
        }
        if fill || w <= 2 || h <= 2 {
            self.fill_rect(x, y, w, h, color);
            return;
        }
        self.hline(x, y, w, color);
        self.hline(x, y + h - 1, w, color);
        self.vline(x, y + 1, h - 2, color);
        self.vline(x + w - 1, y + 1, h - 2, color);
    }

    /// Ellipse centred on `(cx, cy)` with radii `xr` and `yr`, outline or filled
    ///
    /// Midpoint algorithm, one octant pair at a time. Each half stops once every
    /// remaining point is off the buffer.
    pub fn ellipse(&mut self, cx: i32, cy: i32, xr: i32, yr: i32, color: BinaryColor, fill: bool) {
        if xr < 0 || yr < 0 {
            return;
        }
        if xr == 0 && yr == 0 {
            self.set_pixel(cx, cy, color);
            return;
        }
        let (cx, cy, xr, yr) = (
            i128::from(cx),
            i128::from(cy),
            i128::from(xr),
            i128::from(yr),
        );
        let (width, height) = (i128::from(self.width()), i128::from(self.height()));
        if cx + xr < 0 || cx - xr >= width || cy + yr < 0 || cy - yr >= height {
            return;
        }
        let two_a_square = 2 * xr * xr;
        let two_b_square = 2 * yr * yr;

        // Flat part, stepping y
        let mut x = xr;
        let mut y = 0;
        let mut x_change = yr * yr * (1 - 2 * xr);
        let mut y_change = xr * xr;
        let mut error = 0;
        let mut stopping_x = two_b_square * xr;
        let mut stopping_y = 0;
        while stopping_x >= stopping_y && (cy - y >= 0 || cy + y < height) {
            self.ellipse_points(cx, cy, x, y, color, fill);
            y += 1;
            stopping_y += two_a_square;
            error += y_change;
            y_change += two_a_square;
            if 2 * error + x_change > 0 {
                x -= 1;
                stopping_x -= two_b_square;
                error += x_change;
                x_change += two_b_square;
            }
        }

        // Steep part, stepping x
        x = 0;
        y = yr;
        x_change = yr * yr;
        y_change = xr * xr * (1 - 2 * yr);
        error = 0;
        stopping_x = 0;
        stopping_y = two_a_square * yr;
        while stopping_x <= stopping_y && (cx - x >= 0 || cx + x < width) {
            self.ellipse_points(cx, cy, x, y, color, fill);
            x += 1;
            stopping_x += two_b_square;
            error += x_change;
            x_change += two_b_square;
            if 2 * error + y_change > 0 {
                y -= 1;
                stopping_y -= two_a_square;
                error += y_change;
                y_change += two_a_square;
            }
        }
    }

    fn ellipse_points(&mut self, cx: i128, cy: i128, x: i128, y: i128, color: BinaryColor, fill: bool) {
        if fill {
            self.span(cx - x, cx + x, cy - y, color);
            self.span(cx - x, cx + x, cy + y, color);
        } else {
            self.plot(cx + x, cy - y, color);
            self.plot(cx - x, cy - y, color);
            self.plot(cx - x, cy + y, color);
            self.plot(cx + x, cy + y, color);
        }
    }

    /// `set_pixel` for wide coordinates, anything beyond `i32` is off the buffer anyway
    fn plot<T: TryInto<i32>>(&mut self, x: T, y: T, color: BinaryColor) {
        if let (Ok(x), Ok(y)) = (x.try_into(), y.try_into()) {
            self.set_pixel(x, y, color);
        }
    }

    /// Row of pixels from `left` to `right` inclusive, clamped to the buffer
    fn span(&mut self, left: i128, right: i128, y: i128, color: BinaryColor) {
        let Ok(y) = i32::try_from(y) else {
            return;
        };
        let left = left.max(0);
        let right = right.min(i128::from(self.width()) - 1);
        if left <= right {
            self.hline(left as i32, y, (right - left + 1) as i32, color);
        }
    }
}

/// Distance and step direction from `a` to `b`
fn delta(a: i32, b: i32) -> (i64, i64) {
    let (a, b) = (i64::from(a), i64::from(b));
    if b > a {
        (b - a, 1)
    } else {
        (a - b, -1)
    }
}
