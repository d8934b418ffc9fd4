//! Screen geometry in display pixels

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

/// Single pixel position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Point {
    pub x: u16,
    pub y: u16,
}

/// Rectangle given by two opposite corners, the form most commands take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Corners {
    pub x1: u16,
    pub y1: u16,
    pub x2: u16,
    pub y2: u16,
}

impl From<Rect> for Corners {
    fn from(rect: Rect) -> Self {
        Self {
            x1: rect.x,
            y1: rect.y,
            x2: rect.x2(),
            y2: rect.y2(),
        }
    }
}

impl Point {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge as sent on the wire (`x + width`)
    pub fn x2(&self) -> u16 {
        self.x.wrapping_add(self.width)
    }

    /// Bottom edge as sent on the wire (`y + height`)
    pub fn y2(&self) -> u16 {
        self.y.wrapping_add(self.height)
    }

    /// True if the rectangle has neither width nor height
    pub fn is_empty(&self) -> bool {
        self.width == 0 && self.height == 0
    }

    /// Center point, rounded towards the origin
    pub fn centroid(&self) -> Point {
        Point {
            x: self.x.wrapping_add(self.width / 2),
            y: self.y.wrapping_add(self.height / 2),
        }
    }

    /// Hit test, inclusive on all four edges
    ///
    /// A touch at exactly `(x + width, y + height)` is inside.
    pub fn contains(&self, point: Point) -> bool {
        let (px, py) = (u32::from(point.x), u32::from(point.y));
        let (x, y) = (u32::from(self.x), u32::from(self.y));

        px >= x
            && px <= x + u32::from(self.width)
            && py >= y
            && py <= y + u32::from(self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_inclusive_edges() {
        let rect = Rect::new(50, 0, 100, 100);

        assert!(rect.contains(Point::new(50, 0)));
        assert!(rect.contains(Point::new(150, 100)));
        assert!(rect.contains(Point::new(100, 50)));

        assert!(!rect.contains(Point::new(151, 100)));
        assert!(!rect.contains(Point::new(150, 101)));
        assert!(!rect.contains(Point::new(49, 50)));
    }

    #[test]
    fn test_contains_at_screen_limit() {
        let rect = Rect::new(u16::MAX - 1, 0, 10, 10);
        assert!(rect.contains(Point::new(u16::MAX, 5)));
    }

    #[test]
    fn test_centroid() {
        let rect = Rect::new(10, 20, 101, 40);
        assert_eq!(rect.centroid(), Point::new(60, 40));
    }

    #[test]
    fn test_corners_from_rect() {
        let corners = Corners::from(Rect::new(10, 20, 30, 40));
        assert_eq!(
            corners,
            Corners {
                x1: 10,
                y1: 20,
                x2: 40,
                y2: 60
            }
        );
    }

    #[test]
    fn test_is_empty() {
        assert!(Rect::default().is_empty());
        assert!(!Rect::new(0, 0, 1, 0).is_empty());
    }
}
