mod download_directory;
pub(crate) use download_directory::*;

mod remote_backend;
pub(crate) use remote_backend::*;
