/// `part / total` as a rounded percentage, 0 when `total` is 0.
pub fn percentage(part: i64, total: i64) -> i64 {
    if total == 0 {
        return 0;
    }
    (part as f64 / total as f64 * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_rounds_half_up() {
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(5, 5), 100);
    }

    #[test]
    fn test_percentage_of_nothing_is_zero() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(3, 0), 0);
    }
}
