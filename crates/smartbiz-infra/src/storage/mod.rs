//! Object storage backends.

pub mod cloudinary;
