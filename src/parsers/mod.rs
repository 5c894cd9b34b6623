pub mod dataset;

pub use dataset::{load_dataset, parse_delimited, parse_text_cell, InputFormat};
