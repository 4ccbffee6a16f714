//! Ring spawn scheduling: every spawn interval, a fresh 80% sample of the
//! catalogue flashes a ring.

use rand::seq::index;
use rand::Rng;

/// Accumulates frame time and re-samples the active ring set.
#[derive(Debug, Default)]
pub struct RingScheduler {
    delta: f64,
    active: Vec<usize>,
}

/// Number of points that ring per refresh: floor(4/5 of the catalogue).
pub fn sample_size(point_count: usize) -> usize {
    point_count * 4 / 5
}

impl RingScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds accumulated since the last refresh
    #[cfg(test)]
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Indices currently emitting a ring, ascending
    pub fn active(&self) -> &[usize] {
        &self.active
    }

    /// Advance by `dt` seconds. Returns the new selection when a refresh happened.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        dt: f64,
        point_count: usize,
        interval: f64,
        rng: &mut R,
    ) -> Option<&[usize]> {
        self.delta += dt;

        let degenerate = !(interval.is_finite() && interval > 0.0);
        if !degenerate && self.delta <= interval {
            return None;
        }

        let amount = sample_size(point_count);
        let mut picked = index::sample(rng, point_count, amount).into_vec();
        picked.sort_unstable();
        self.active = picked;

        self.delta = if degenerate { 0.0 } else { self.delta % interval };
        tracing::debug!(selected = self.active.len(), point_count, "ring selection refreshed");

        Some(self.active.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn sample_is_eighty_percent_floor() {
        assert_eq!(sample_size(10), 8);
        assert_eq!(sample_size(5), 4);
        assert_eq!(sample_size(1), 0);
        assert_eq!(sample_size(0), 0);
    }

    #[test]
    fn ten_points_select_eight_distinct() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut sched = RingScheduler::new();
        for _ in 0..20 {
            let picked = sched.tick(2.5, 10, 2.0, &mut rng).unwrap().to_vec();
            assert_eq!(picked.len(), 8);
            assert!(picked.windows(2).all(|w| w[0] < w[1]));
            assert!(picked.iter().all(|&i| i < 10));
        }
    }

    #[test]
    fn refresh_only_after_interval() {
        let mut rng = StdRng::from_entropy();
        let mut sched = RingScheduler::new();

        assert!(sched.tick(1.0, 5, 2.0, &mut rng).is_none());
        assert!(sched.active().is_empty());
        assert!(sched.tick(1.0, 5, 2.0, &mut rng).is_none());

        let picked = sched.tick(0.1, 5, 2.0, &mut rng).map(<[usize]>::len);
        assert_eq!(picked, Some(4));
        assert!((sched.delta() - 0.1).abs() < 1e-9);

        assert!(sched.tick(1.0, 5, 2.0, &mut rng).is_none());
        assert_eq!(sched.active().len(), 4);
    }

    #[test]
    fn empty_catalogue_selects_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut sched = RingScheduler::new();
        let picked = sched.tick(3.0, 0, 2.0, &mut rng).unwrap();
        assert!(picked.is_empty());
    }

    #[test]
    fn non_positive_interval_refreshes_every_tick() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut sched = RingScheduler::new();
        assert!(sched.tick(0.016, 10, 0.0, &mut rng).is_some());
        assert!(sched.tick(0.016, 10, -1.0, &mut rng).is_some());
        assert_eq!(sched.delta(), 0.0);
    }
}
