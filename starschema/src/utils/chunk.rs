use common::{Error, Result};

/// Splits `rows` into contiguous runs of at most `size` rows, keeping order.
/// Empty input gives no chunks; a zero `size` is rejected.
pub fn chunk_rows<T>(rows: Vec<T>, size: usize) -> Result<Vec<Vec<T>>> {
    if size == 0 {
        return Err(Error::InvalidInput(
            "Fact table chunk size must be positive".to_string(),
        ));
    }

    let mut chunks = Vec::with_capacity(rows.len().div_ceil(size));
    let mut rows = rows.into_iter().peekable();
    while rows.peek().is_some() {
        chunks.push(rows.by_ref().take(size).collect());
    }
    Ok(chunks)
}
