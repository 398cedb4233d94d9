use std::collections::VecDeque;

/// Default number of bob positions kept in the trail
pub const DEFAULT_TRAIL_LENGTH: usize = 400;

/// Recent bob positions in world coordinates, oldest first
#[derive(Debug, Clone)]
pub struct Trail {
    points: VecDeque<[f64; 2]>,
    capacity: usize,
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        Trail {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a point, dropping the oldest once full
    pub fn push(&mut self, x: f64, y: f64) {
        if self.capacity == 0 {
            return;
        }
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back([x, y]);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Consecutive point pairs with their age fraction (0 oldest, 1 newest)
    pub fn segments(&self) -> impl Iterator<Item = ([f64; 2], [f64; 2], f64)> + '_ {
        let n = self.points.len();
        self.points
            .iter()
            .zip(self.points.iter().skip(1))
            .enumerate()
            .map(move |(i, (&a, &b))| (a, b, (i + 1) as f64 / n as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trail_keeps_only_newest_points() {
        let mut trail = Trail::new(3);
        for i in 0..5 {
            trail.push(i as f64, 0.0);
        }
        assert_eq!(trail.len(), 3);
        let first = trail.segments().next().unwrap();
        assert_eq!(first.0, [2.0, 0.0]);
    }

    #[test]
    fn segments_fade_from_old_to_new() {
        let mut trail = Trail::new(10);
        for i in 0..4 {
            trail.push(i as f64, i as f64);
        }
        let ages: Vec<f64> = trail.segments().map(|(_, _, age)| age).collect();
        assert_eq!(ages, vec![0.25, 0.5, 0.75]);
    }

    #[test]
    fn zero_capacity_trail_stays_empty() {
        let mut trail = Trail::new(0);
        trail.push(1.0, 1.0);
        assert!(trail.is_empty());
        assert_eq!(trail.segments().count(), 0);
    }

    #[test]
    fn clear_empties_the_trail() {
        let mut trail = Trail::new(DEFAULT_TRAIL_LENGTH);
        trail.push(0.0, 0.0);
        trail.push(1.0, 0.0);
        trail.clear();
        assert!(trail.is_empty());
    }
}
