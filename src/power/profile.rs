//! Time-of-day demand factors and solar availability.

/// Base-load multiplier for a fractional hour of day.
///
/// Overnight trough, morning ramp, daytime plateau, evening peak:
/// `[0,6)` → 0.6, `[6,9)` → 0.8, `[9,17)` → 0.9, `[17,21)` → 1.0,
/// `[21,24)` → 0.7.
pub fn base_load_factor(hour: f32) -> f32 {
    if hour < 6.0 {
        0.6
    } else if hour < 9.0 {
        0.8
    } else if hour < 17.0 {
        0.9
    } else if hour < 21.0 {
        1.0
    } else {
        0.7
    }
}

/// Solar availability in `[0, 1]` for a fractional hour of day.
///
/// Half-sine between 06:00 and 18:00, zero otherwise.
pub fn solar_availability(hour: f32) -> f32 {
    if !(6.0..=18.0).contains(&hour) {
        return 0.0;
    }
    ((hour - 6.0) * std::f32::consts::PI / 12.0).sin().max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_factor_bands() {
        assert_eq!(base_load_factor(0.0), 0.6);
        assert_eq!(base_load_factor(5.9), 0.6);
        assert_eq!(base_load_factor(6.0), 0.8);
        assert_eq!(base_load_factor(9.0), 0.9);
        assert_eq!(base_load_factor(16.9), 0.9);
        assert_eq!(base_load_factor(17.0), 1.0);
        assert_eq!(base_load_factor(20.9), 1.0);
        assert_eq!(base_load_factor(21.0), 0.7);
        assert_eq!(base_load_factor(23.5), 0.7);
    }

    #[test]
    fn evening_peak_is_maximum() {
        for h in 0..24 {
            assert!(base_load_factor(h as f32) <= base_load_factor(18.0));
        }
    }

    #[test]
    fn solar_zero_at_night() {
        assert_eq!(solar_availability(0.0), 0.0);
        assert_eq!(solar_availability(5.9), 0.0);
        assert_eq!(solar_availability(18.1), 0.0);
        assert_eq!(solar_availability(23.0), 0.0);
    }

    #[test]
    fn solar_peaks_at_noon() {
        let noon = solar_availability(12.0);
        assert!((noon - 1.0).abs() < 1e-6);
        assert!(solar_availability(9.0) < noon);
        assert!(solar_availability(15.0) < noon);
        assert!((solar_availability(9.0) - solar_availability(15.0)).abs() < 1e-5);
    }

    #[test]
    fn solar_near_zero_at_dawn_and_dusk() {
        assert!(solar_availability(6.0) < 1e-6);
        assert!(solar_availability(18.0) < 1e-5);
    }
}
