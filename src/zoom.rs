use std::{cmp::Ordering, fmt};

/// A zoom factor given as a fraction
#[derive(Clone, Copy, Debug)]
pub struct Ratio {
    /// The numerator
    num: u32,
    /// The denominator
    den: u32,
}

impl Ratio {
    /// Creates a new ratio
    ///
    /// # Parameters
    ///
    /// num: The numerator, must be positive
    ///
    /// den: The denominator, must be positive
    pub fn new(num: u32, den: u32) -> Self {
        if cfg!(debug_assertions) && (num == 0 || den == 0) {
            panic!("Zoom ratios must be positive: {}/{}", num, den);
        }

        Self {
            num,
            den,
        }
    }

    pub fn get_num(&self) -> u32 {
        self.num
    }

    pub fn get_den(&self) -> u32 {
        self.den
    }

    /// Retrieves the value of the fraction
    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Cross multiplies so fractions with different denominators can be compared exactly
    fn cross(&self, other: &Ratio) -> (u64, u64) {
        (self.num as u64 * other.den as u64, other.num as u64 * self.den as u64)
    }
}

impl PartialEq for Ratio {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = self.cross(other);
        a == b
    }
}

impl Eq for Ratio {}

impl PartialOrd for Ratio {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ratio {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = self.cross(other);
        a.cmp(&b)
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/// The table of zoom factors the view steps through, and the selected level
#[derive(Clone, Debug)]
pub struct ZoomLevels {
    /// All distinct ratios in ascending order
    ratios: Vec<Ratio>,
    /// The index of the current zoom
    level: usize,
}

impl ZoomLevels {
    /// Builds the table of all distinct fractions num/den with 1 <= num, den <= resolution,
    /// the current level is set to 1/1
    ///
    /// # Parameters
    ///
    /// resolution: The largest numerator and denominator
    pub fn generate(resolution: u32) -> Self {
        let mut ratios: Vec<Ratio> = Vec::new();

        for num in 1..=resolution.max(1) {
            for den in 1..=resolution.max(1) {
                let ratio = Ratio::new(num, den);
                if let Err(position) = ratios.binary_search(&ratio) {
                    ratios.insert(position, ratio);
                }
            }
        }

        log::debug!(
            "Generated {} zoom ratios: {}",
            ratios.len(),
            ratios.iter().map(|ratio| ratio.to_string()).collect::<Vec<_>>().join(" "),
        );

        let mut levels = Self {
            ratios,
            level: 0,
        };
        levels.level = levels.default_level();
        levels
    }

    /// The index of 1/1 in the table
    pub fn default_level(&self) -> usize {
        self.ratios.binary_search(&Ratio::new(1, 1)).unwrap_or(0)
    }

    /// Retrieves all ratios in ascending order
    pub fn ratios(&self) -> &[Ratio] {
        &self.ratios
    }

    pub fn len(&self) -> usize {
        self.ratios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratios.is_empty()
    }

    /// Retrieves the index of the current zoom
    pub fn get_level(&self) -> usize {
        self.level
    }

    /// Retrieves the current ratio
    pub fn get_ratio(&self) -> Ratio {
        self.ratios[self.level]
    }

    /// Retrieves the current zoom factor
    pub fn get_zoom(&self) -> f64 {
        self.get_ratio().to_f64()
    }

    /// Steps to the next larger zoom, returns false if already at the largest
    pub fn zoom_in(&mut self) -> bool {
        if self.level + 1 >= self.ratios.len() {
            return false;
        }
        self.level += 1;
        true
    }

    /// Steps to the next smaller zoom, the smallest ratio is never selected by stepping.
    /// Returns false if the level did not change.
    pub fn zoom_out(&mut self) -> bool {
        if self.level <= 1 {
            return false;
        }
        self.level -= 1;
        true
    }

    /// Goes back to 1/1, returns false if already there
    pub fn reset(&mut self) -> bool {
        let level = self.default_level();
        if level == self.level {
            return false;
        }
        self.level = level;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_and_distinct() {
        let levels = ZoomLevels::generate(4);
        let ratios = levels.ratios();

        assert!(ratios.windows(2).all(|pair| pair[0] < pair[1]));
        // 1/4 1/3 1/2 2/3 3/4 1 4/3 3/2 2 3 4
        assert_eq!(ratios.len(), 11);
        assert_eq!(ratios.iter().filter(|&&ratio| ratio == Ratio::new(1, 1)).count(), 1);
        assert_eq!(ratios[levels.default_level()], Ratio::new(2, 2));
        assert_eq!(levels.get_zoom(), 1.0);
    }

    #[test]
    fn equal_fractions_compare_equal() {
        assert_eq!(Ratio::new(2, 4), Ratio::new(1, 2));
        assert!(Ratio::new(2, 3) < Ratio::new(3, 4));
        assert_eq!(Ratio::new(3, 4).to_string(), "3/4");
    }

    #[test]
    fn stepping_is_clamped() {
        let mut levels = ZoomLevels::generate(2);
        // 1/2 1 2
        assert!(levels.zoom_in());
        assert_eq!(levels.get_zoom(), 2.0);
        assert!(!levels.zoom_in());

        assert!(levels.zoom_out());
        assert!(!levels.zoom_out());
        assert_eq!(levels.get_zoom(), 1.0);

        levels.zoom_in();
        assert!(levels.reset());
        assert!(!levels.reset());
    }
}
