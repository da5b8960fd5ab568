pub mod genes_csv;

pub use genes_csv::{read_genes_csv, write_genes_csv};
