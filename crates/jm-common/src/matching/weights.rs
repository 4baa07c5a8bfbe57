/// Points each component can contribute to the 0-100 score.
pub const DEFAULT_POINTS: Points = Points {
    skills: 40.0,
    experience: 25.0,
    location: 20.0,
    salary: 15.0,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Points {
    pub skills: f64,
    pub experience: f64,
    pub location: f64,
    pub salary: f64,
}

impl Default for Points {
    fn default() -> Self {
        DEFAULT_POINTS
    }
}

impl Points {
    pub fn sum(&self) -> f64 {
        self.skills + self.experience + self.location + self.salary
    }
}
