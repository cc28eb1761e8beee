mod local;
mod stream;

pub use local::ensure_directory_exists;
pub use stream::ByteStream;
