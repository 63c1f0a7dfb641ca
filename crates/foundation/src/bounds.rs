/// Longitude/latitude bounding box in degrees.
///
/// Used to fit the map view to a layer; never used for geometric analysis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LonLatBounds {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl LonLatBounds {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        LonLatBounds { min, max }
    }

    pub fn from_point(lon: f64, lat: f64) -> Self {
        LonLatBounds::new([lon, lat], [lon, lat])
    }

    pub fn extend(&mut self, lon: f64, lat: f64) {
        self.min[0] = self.min[0].min(lon);
        self.min[1] = self.min[1].min(lat);
        self.max[0] = self.max[0].max(lon);
        self.max[1] = self.max[1].max(lat);
    }

    pub fn union(self, other: Self) -> Self {
        let mut out = self;
        out.extend(other.min[0], other.min[1]);
        out.extend(other.max[0], other.max[1]);
        out
    }

    /// Grows the box by `ratio` of its span on every side.
    pub fn pad(self, ratio: f64) -> Self {
        let dx = (self.max[0] - self.min[0]) * ratio;
        let dy = (self.max[1] - self.min[1]) * ratio;
        LonLatBounds::new(
            [self.min[0] - dx, self.min[1] - dy],
            [self.max[0] + dx, self.max[1] + dy],
        )
    }

    pub fn is_valid(&self) -> bool {
        self.min.iter().chain(self.max.iter()).all(|v| v.is_finite())
            && self.min[0] <= self.max[0]
            && self.min[1] <= self.max[1]
    }
}
