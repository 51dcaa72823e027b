//! Upload infrastructure - Where profile images are written

mod disk;

pub use disk::{stored_file_name, DiskImageStore};
