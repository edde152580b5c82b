pub mod context_file;
