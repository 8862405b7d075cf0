pub mod arrow;
pub mod chunk;

pub use chunk::chunk_rows;
