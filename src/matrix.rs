/// Maps top-down (x, y) matrix coordinates to physical strip indices.
///
/// The strips are wired in a serpentine: even rows run left to right, odd
/// rows run right to left. The table is built once so the flush path is a
/// plain lookup.
pub struct MatrixMap {
    width: usize,
    height: usize,
    table: Vec<usize>,
}

impl MatrixMap {
    pub fn serpentine(width: usize, height: usize) -> MatrixMap {
        let mut table = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let strip_x = if y % 2 == 0 { x } else { width - 1 - x };
                table.push(y * width + strip_x);
            }
        }

        MatrixMap {
            width,
            height,
            table,
        }
    }

    /// Returns `None` for out-of-bounds coordinates so callers cannot
    /// accidentally alias bad input onto pixel 0.
    pub fn index_of(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }

        Some(self.table[y * self.width + x])
    }

    pub fn led_count(&self) -> usize {
        self.width * self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_bounds_is_rejected() {
        let map = MatrixMap::serpentine(22, 22);
        assert_eq!(map.index_of(22, 0), None);
        assert_eq!(map.index_of(0, 22), None);
        assert_eq!(map.index_of(usize::MAX, usize::MAX), None);
    }

    #[test]
    fn mapping_is_a_bijection() {
        let map = MatrixMap::serpentine(48, 32);
        let mut hits = vec![0usize; map.led_count()];
        for y in 0..32 {
            for x in 0..48 {
                let i = map.index_of(x, y).unwrap();
                assert!(i < map.led_count());
                hits[i] += 1;
            }
        }
        assert!(hits.iter().all(|&h| h == 1));
    }

    #[test]
    fn odd_rows_run_backwards() {
        let map = MatrixMap::serpentine(4, 3);
        assert_eq!(map.index_of(0, 0), Some(0));
        assert_eq!(map.index_of(3, 0), Some(3));
        assert_eq!(map.index_of(0, 1), Some(7));
        assert_eq!(map.index_of(3, 1), Some(4));
        assert_eq!(map.index_of(0, 2), Some(8));
    }
}
