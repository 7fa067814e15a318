pub mod camera;
mod encoded;
mod file;

pub use camera::{CameraFeed, CameraFrame};
pub use encoded::EncodedImage;
pub use file::load_image_file;
