use crate::geometry::Point;

/// Iterator over the cells of a Bresenham line, both endpoints included.
pub struct BresenhamLineIter {
    x: i32,
    y: i32,
    end_x: i32,
    end_y: i32,
    dx: i32,
    dy: i32,
    sx: i32,
    sy: i32,
    err: i32,
    done: bool,
}

impl BresenhamLineIter {
    pub fn new(start_x: i32, start_y: i32, end_x: i32, end_y: i32) -> Self {
        let dx = (end_x - start_x).abs();
        let dy = -(end_y - start_y).abs();
        Self {
            x: start_x,
            y: start_y,
            end_x,
            end_y,
            dx,
            dy,
            sx: if start_x < end_x { 1 } else { -1 },
            sy: if start_y < end_y { 1 } else { -1 },
            err: dx + dy,
            done: false,
        }
    }

    pub fn between(start: Point, end: Point) -> Self {
        Self::new(start.x, start.y, end.x, end.y)
    }
}

impl Iterator for BresenhamLineIter {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.done {
            return None;
        }

        let current = Point::new(self.x, self.y);
        if self.x == self.end_x && self.y == self.end_y {
            self.done = true;
            return Some(current);
        }

        let e2 = 2 * self.err;
        if e2 >= self.dy {
            self.err += self.dy;
            self.x += self.sx;
        }
        if e2 <= self.dx {
            self.err += self.dx;
            self.y += self.sy;
        }

        Some(current)
    }
}
