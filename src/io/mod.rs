pub mod excel_write;
pub mod tsv_read;
