/// Size of the terminal field. Row `0`/`max_y - 1` and column `0`/`max_x - 1`
/// are the border; everything in between is playable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub max_y: i32,
    pub max_x: i32,
}

impl Bounds {
    pub fn new(max_y: i32, max_x: i32) -> Self {
        Self { max_y, max_x }
    }

    pub fn from_terminal(cols: u16, rows: u16) -> Self {
        Self::new(i32::from(rows), i32::from(cols))
    }

    pub fn center(&self) -> (i32, i32) {
        (self.max_y / 2, self.max_x / 2)
    }

    /// Lowest row a paddle top may occupy.
    pub fn paddle_min_y(&self) -> i32 {
        1
    }

    /// Tallest paddle that fits between the top and bottom border.
    pub fn max_paddle_height(&self) -> i32 {
        (self.max_y - 2).max(1)
    }

    /// Highest row a paddle of height `h` may start at.
    pub fn paddle_max_y(&self, h: i32) -> i32 {
        self.max_y - 1 - h
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Paddle {
    pub y: i32,
    pub x: i32,
    pub h: i32,
}

impl Paddle {
    pub fn new(y: i32, x: i32, h: i32) -> Self {
        Self { y, x, h }
    }

    /// Vertically centered paddle at column `x`.
    pub fn centered(bounds: Bounds, x: i32, h: i32) -> Self {
        Self::new(bounds.max_y / 2 - h / 2, x, h)
    }

    pub fn covers_row(&self, row: i32) -> bool {
        row >= self.y && row < self.y + self.h
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ball {
    pub y: i32,
    pub x: i32,
    pub dy: i32,
    pub dx: i32,
}

impl Ball {
    pub fn new(y: i32, x: i32, dy: i32, dx: i32) -> Self {
        Self { y, x, dy, dx }
    }

    /// Ball at the field center heading down and toward `dx`.
    pub fn serve(bounds: Bounds, dx: i32) -> Self {
        let (y, x) = bounds.center();
        Self::new(y, x, 1, dx)
    }

    pub fn integrate(&mut self) {
        self.y += self.dy;
        self.x += self.dx;
    }
}
