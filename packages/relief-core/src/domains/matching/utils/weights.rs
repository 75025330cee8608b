/// Composite score weights
///
/// Skill fit dominates; proximity and availability share the middle;
/// track record breaks near-ties.
pub const COMPOSITE_WEIGHTS: Weights = Weights {
    skills: 0.40,
    location: 0.25,
    availability: 0.25,
    experience: 0.10,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub skills: f64,
    pub location: f64,
    pub availability: f64,
    pub experience: f64,
}

impl Weights {
    pub fn sum(&self) -> f64 {
        self.skills + self.location + self.availability + self.experience
    }

    /// Weighted sum of four sub-scores, each in [0, 100].
    pub fn combine(&self, skills: f64, location: f64, availability: f64, experience: f64) -> f64 {
        skills * self.skills
            + location * self.location
            + availability * self.availability
            + experience * self.experience
    }
}

impl Default for Weights {
    fn default() -> Self {
        COMPOSITE_WEIGHTS
    }
}
