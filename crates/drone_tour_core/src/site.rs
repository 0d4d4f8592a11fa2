use std::fmt;

/// Campus a site belongs to. Fixed when the site is created.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Region {
    /// Medical campus: both coordinates strictly negative.
    Restricted,
    /// Main campus: everything else, including both axes.
    Open,
}

/// Delivery site on the integer grid.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Site {
    pub x: i32,
    pub y: i32,
    region: Region,
}

impl Site {
    pub fn new(x: i32, y: i32) -> Self {
        let region = if x < 0 && y < 0 {
            Region::Restricted
        } else {
            Region::Open
        };
        Self { x, y, region }
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// On the negative half of an axis (origin included), the only place a
    /// route may cross between campuses.
    pub fn is_border(&self) -> bool {
        self.x <= 0 && self.y <= 0 && (self.x == 0 || self.y == 0)
    }

    pub fn squared_dist(&self, rhs: &Self) -> f64 {
        let dx = f64::from(self.x) - f64::from(rhs.x);
        let dy = f64::from(self.y) - f64::from(rhs.y);
        dx * dx + dy * dy
    }

    pub fn dist(&self, rhs: &Self) -> f64 {
        self.squared_dist(rhs).sqrt()
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.x, self.y)
    }
}
