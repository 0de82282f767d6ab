//! Tests for grid sizing, layouts and row-major cell scanning

#[cfg(test)]
mod tests {
    use capmosaic::MosaicError;
    use capmosaic::spatial::grid::{GridLayout, GridSize, grid_cells};

    fn grid(pixels: u32) -> GridSize {
        GridSize::new(pixels).unwrap()
    }

    // Tests zero grid size is rejected
    // Verified by accepting zero
    #[test]
    fn test_grid_size_rejects_zero() {
        assert!(matches!(
            GridSize::new(0),
            Err(MosaicError::InvalidParameter {
                parameter: "grid_size",
                ..
            })
        ));
        assert_eq!(grid(1).get(), 1);
        assert_eq!(grid(50).to_string(), "50px");
    }

    // Tests inclusive counting rounds up and exclusive rounds down
    // Verified by swapping the division modes
    #[test]
    fn test_grid_cells_inclusive_and_exclusive() {
        assert_eq!(grid_cells(101, grid(50), true), 3);
        assert_eq!(grid_cells(101, grid(50), false), 2);
        assert_eq!(grid_cells(100, grid(50), true), 2);
        assert_eq!(grid_cells(100, grid(50), false), 2);
        assert_eq!(grid_cells(49, grid(50), true), 1);
        assert_eq!(grid_cells(49, grid(50), false), 0);
    }

    // Tests the 101x100 scenario at grid 50
    // Verified by using floor division for the preview
    #[test]
    fn test_partial_column_layouts() {
        let preview = GridLayout::preview(101, 100, grid(50));
        assert_eq!((preview.cols, preview.rows), (3, 2));
        assert_eq!(preview.cell_count(), 6);

        let high_res = GridLayout::high_res(101, 100, grid(50));
        assert_eq!((high_res.cols, high_res.rows), (2, 2));
        assert_eq!(high_res.cell_count(), 4);
    }

    // Tests cell counts follow ceil(W/G) * ceil(H/G) and floor never exceeds it
    // Verified by dropping the partial cell from the preview
    #[test]
    fn test_cell_count_formula() {
        for width in 1..40u32 {
            for height in 1..25u32 {
                for pixels in 1..12u32 {
                    let size = grid(pixels);
                    let preview = GridLayout::preview(width, height, size);
                    let high_res = GridLayout::high_res(width, height, size);

                    let expected = width.div_ceil(pixels) as usize * height.div_ceil(pixels) as usize;
                    assert_eq!(preview.cell_count(), expected);
                    assert_eq!(preview.cells().count(), expected);
                    assert_eq!(
                        high_res.cell_count(),
                        (width / pixels) as usize * (height / pixels) as usize
                    );
                    assert!(high_res.cell_count() <= preview.cell_count());
                }
            }
        }
    }

    // Tests cells come out top to bottom, left to right
    // Verified by swapping the loop nesting
    #[test]
    fn test_cells_row_major_order() {
        let layout = GridLayout::preview(101, 100, grid(50));
        let origins: Vec<_> = layout.cells().map(|cell| (cell.x, cell.y)).collect();
        assert_eq!(
            origins,
            vec![(0, 0), (50, 0), (100, 0), (0, 50), (50, 50), (100, 50)]
        );

        let indices: Vec<_> = layout.cells().map(|cell| (cell.row, cell.col)).collect();
        assert_eq!(indices.first(), Some(&(0, 0)));
        assert_eq!(indices.get(2), Some(&(0, 2)));
        assert_eq!(indices.get(3), Some(&(1, 0)));
    }

    // Tests edge cells shrink to the pixels that remain
    // Verified by always reporting the full grid size
    #[test]
    fn test_partial_cells_are_clipped() {
        let layout = GridLayout::preview(101, 75, grid(50));
        let cells: Vec<_> = layout.cells().collect();

        let last_in_first_row = cells.get(2).unwrap();
        assert_eq!((last_in_first_row.width, last_in_first_row.height), (1, 50));

        let corner = cells.last().unwrap();
        assert_eq!((corner.x, corner.y), (100, 50));
        assert_eq!((corner.width, corner.height), (1, 25));
    }

    // Tests an image smaller than one cell has no whole cells
    // Verified by counting partial cells in the high-res layout
    #[test]
    fn test_high_res_layout_empty_for_small_image() {
        let layout = GridLayout::high_res(30, 80, grid(50));
        assert!(layout.is_empty());
        assert_eq!(layout.cells().count(), 0);
        assert!(!GridLayout::preview(30, 80, grid(50)).is_empty());
    }
}
