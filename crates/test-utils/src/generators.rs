//! Test data generators for synthetic population rasters.
//!
//! These generators create predictable, verifiable sample patterns
//! that can be written out with [`crate::TestGeoTiff`].

/// Creates a test grid with predictable values.
///
/// Each cell value is calculated as: `col * 1000 + row`
///
/// # Returns
///
/// A `Vec<f32>` in row-major order (row 0 first, then row 1, etc.)
///
/// # Example
///
/// ```
/// use test_utils::create_test_grid;
///
/// let grid = create_test_grid(10, 5);
/// assert_eq!(grid.len(), 50); // 10 * 5
/// assert_eq!(grid[0], 0.0);   // col=0, row=0 -> 0*1000 + 0
/// assert_eq!(grid[1], 1000.0); // col=1, row=0 -> 1*1000 + 0
/// assert_eq!(grid[10], 1.0);  // col=0, row=1 -> 0*1000 + 1
/// ```
pub fn create_test_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((col * 1000 + row) as f32);
        }
    }
    data
}

/// Creates a grid filled with a constant value.
pub fn create_constant_grid(width: usize, height: usize, value: f32) -> Vec<f32> {
    vec![value; width * height]
}

/// Creates a zero grid with a handful of populated cells.
///
/// Mimics a GPW tile that is mostly ocean: every cell is 0 except the
/// `(col, row, value)` triples given.
pub fn create_sparse_grid(width: usize, height: usize, cells: &[(usize, usize, f32)]) -> Vec<f32> {
    let mut data = vec![0.0; width * height];
    for &(col, row, value) in cells {
        if col < width && row < height {
            data[row * width + col] = value;
        }
    }
    data
}

/// Copies the `(x_off, y_off, width, height)` window out of a row-major grid.
pub fn extract_window(
    data: &[f32],
    grid_width: usize,
    x_off: usize,
    y_off: usize,
    width: usize,
    height: usize,
) -> Vec<f32> {
    let mut out = Vec::with_capacity(width * height);
    for row in y_off..y_off + height {
        let start = row * grid_width + x_off;
        out.extend_from_slice(&data[start..start + width]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_grid_values() {
        let grid = create_test_grid(4, 3);
        assert_eq!(grid.len(), 12);
        assert_eq!(grid[4 * 2 + 3], 3002.0);
    }

    #[test]
    fn test_sparse_grid() {
        let grid = create_sparse_grid(5, 5, &[(1, 2, 7.5), (9, 9, 1.0)]);
        assert_eq!(grid.iter().filter(|v| **v != 0.0).count(), 1);
        assert_eq!(grid[2 * 5 + 1], 7.5);
    }

    #[test]
    fn test_extract_window() {
        let grid = create_test_grid(4, 4);
        let window = extract_window(&grid, 4, 2, 1, 2, 2);
        assert_eq!(window, vec![2001.0, 3001.0, 2002.0, 3002.0]);
    }

    #[test]
    fn test_constant_grid() {
        let grid = create_constant_grid(3, 2, 0.0);
        assert!(grid.iter().all(|v| *v == 0.0));
        assert_eq!(grid.len(), 6);
    }
}
