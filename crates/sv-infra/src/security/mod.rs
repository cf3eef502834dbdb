mod field_cipher;
mod key_material;

pub use field_cipher::XChaChaFieldCipher;
pub use key_material::FieldKeyMaterial;
