pub mod goals;
pub mod home;
pub mod journal;
pub mod landing;
pub mod not_found;
pub mod profile;
pub mod reflect;
pub mod sessions;
pub mod topics;
