//! Output scan
//!
//! Extractors fill their output one row (2D) or one y-slab (3D) at a time.
//! Rows only read the shared, fully built tables, so with the `rayon`
//! feature they are filled in parallel.

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Call `fill(y, row)` for every `row_len`-sized chunk of `data`.
pub(crate) fn for_each_row<F>(data: &mut [f64], row_len: usize, fill: F)
where
    F: Fn(usize, &mut [f64]) + Sync + Send,
{
    #[cfg(feature = "rayon")]
    {
        data.par_chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| fill(y, row));
    }
    #[cfg(not(feature = "rayon"))]
    {
        data.chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| fill(y, row));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_see_their_index() {
        let mut data = vec![0.0; 12];
        for_each_row(&mut data, 4, |y, row| row.fill(y as f64));
        assert_eq!(&data[..4], &[0.0; 4]);
        assert_eq!(&data[8..], &[2.0; 4]);
    }
}
