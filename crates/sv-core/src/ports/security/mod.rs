pub mod field_cipher;
pub mod secure_storage;
