use glam::Vec2;

/// Axis-aligned bounding box. `pos` is the top-left corner; y grows downward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Open-interval overlap on x. Touching edges do not count.
    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        self.left() < other.right() && other.left() < self.right()
    }

    /// Open-interval overlap on y. Touching edges do not count.
    pub fn overlaps_y(&self, other: &Aabb) -> bool {
        self.top() < other.bottom() && other.top() < self.bottom()
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.overlaps_x(other) && self.overlaps_y(other)
    }

    /// Penetration of `self` into `other` when `self` is travelling along x in
    /// direction `dir` (+1 right, -1 left). `None` when `other` is not in the way.
    pub fn horizontal_penetration(&self, other: &Aabb, dir: f32) -> Option<f32> {
        if !self.overlaps_y(other) {
            return None;
        }
        if dir > 0.0 {
            (self.left() <= other.left() && self.right() > other.left())
                .then(|| self.right() - other.left())
        } else if dir < 0.0 {
            (other.left() <= self.left() && other.right() > self.left())
                .then(|| other.right() - self.left())
        } else {
            None
        }
    }
}

/// Linear velocity in pixels per tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct Velocity(pub Vec2);

/// Marker: body is resting against a surface in the direction gravity pulls.
pub struct Grounded;

/// Static terrain flags. Only `solid` terrain takes part in collision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Terrain {
    pub solid: bool,
    pub breakable: bool,
}

/// Marker: pushable, gravity-affected box.
pub struct Moveable;
