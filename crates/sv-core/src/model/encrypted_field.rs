use std::fmt;

/// A string field a settings type stores encrypted at rest.
///
/// Declared explicitly per type as a getter/setter pair; the setter should be the
/// model's notifying setter so the engine can suppress its own writes.
pub struct EncryptedField<T> {
    name: &'static str,
    get: fn(&T) -> &str,
    set: fn(&mut T, String) -> bool,
}

impl<T> EncryptedField<T> {
    pub fn new(name: &'static str, get: fn(&T) -> &str, set: fn(&mut T, String) -> bool) -> Self {
        Self { name, get, set }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get<'a>(&self, model: &'a T) -> &'a str {
        (self.get)(model)
    }

    pub fn set(&self, model: &mut T, value: String) -> bool {
        (self.set)(model, value)
    }
}

impl<T> Clone for EncryptedField<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for EncryptedField<T> {}

impl<T> fmt::Debug for EncryptedField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptedField")
            .field("name", &self.name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Credentials {
        api_key: String,
    }

    impl Credentials {
        fn api_key(&self) -> &str {
            &self.api_key
        }

        fn set_api_key(&mut self, value: String) -> bool {
            self.api_key = value;
            true
        }
    }

    #[test]
    fn accessors_route_to_declared_functions() {
        let field = EncryptedField::<Credentials>::new(
            "api_key",
            Credentials::api_key,
            Credentials::set_api_key,
        );
        let mut creds = Credentials::default();

        assert!(field.set(&mut creds, "secret".to_string()));
        assert_eq!(field.get(&creds), "secret");
        assert_eq!(field.name(), "api_key");
    }
}
