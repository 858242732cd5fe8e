pub mod dataset_csv;

pub use dataset_csv::{read_dataset, read_dataset_with_config, DatasetReaderConfig};
