//! Observable settings models.
//!
//! A settings model owns a [`ChangeNotifier`] and routes every field write through
//! it. The persistence engine subscribes to that notifier once the model has been
//! loaded, so any accepted mutation ends up scheduling a save.

mod encrypted_field;
mod handle;
mod notifier;
mod observable;

pub use encrypted_field::EncryptedField;
pub use handle::Settings;
pub use notifier::{ChangeNotifier, FieldChange};
pub use observable::ObservableModel;
