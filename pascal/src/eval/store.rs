use super::value::Value;
use crate::error::Error;
use crate::grammer::ast::Type;
use indexmap::IndexMap;

#[derive(Debug, Clone)]
struct Slot {
    value: Value,
    ty: Type,
    constant: bool,
}

/// Variables and constants of one run, keyed by lowercase name
#[derive(Debug, Clone, Default)]
pub struct Store {
    slots: IndexMap<String, Slot>,
}

impl Store {
    pub fn new() -> Self {
        Store::default()
    }

    pub fn declare(&mut self, name: &str, ty: Type) {
        let value = Value::default_of(ty);
        self.slots.insert(
            name.to_string(),
            Slot {
                value,
                ty,
                constant: false,
            },
        );
    }

    pub fn define_const(&mut self, name: &str, value: Value) {
        let ty = value.type_of();
        self.slots.insert(
            name.to_string(),
            Slot {
                value,
                ty,
                constant: true,
            },
        );
    }

    pub fn get(&self, name: &str) -> Result<&Value, Error> {
        self.slots
            .get(name)
            .map(|slot| &slot.value)
            .ok_or_else(|| Error::UnknownIdentifier(name.to_string()))
    }

    pub fn type_of(&self, name: &str) -> Result<Type, Error> {
        self.slots
            .get(name)
            .map(|slot| slot.ty)
            .ok_or_else(|| Error::UnknownIdentifier(name.to_string()))
    }

    /// Store `value`, converting it to the variable's declared type
    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), Error> {
        let slot = self
            .slots
            .get_mut(name)
            .ok_or_else(|| Error::UnknownIdentifier(name.to_string()))?;
        if slot.constant {
            return Err(Error::AssignToConstant(name.to_string()));
        }
        slot.value = value.coerce(slot.ty)?;
        Ok(())
    }

    /// Reset a variable to its type's default
    pub fn reset(&mut self, name: &str) -> Result<(), Error> {
        let ty = self.type_of(name)?;
        self.assign(name, Value::default_of(ty))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.slots.iter().map(|(name, slot)| (name, &slot.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_variable_has_default() {
        let mut store = Store::new();
        store.declare("x", Type::Integer);
        assert_eq!(store.get("x"), Ok(&Value::Integer(0)));
    }

    #[test]
    fn assign_promotes_to_real() {
        let mut store = Store::new();
        store.declare("r", Type::Real);
        store.assign("r", Value::Integer(2)).unwrap();
        assert_eq!(store.get("r"), Ok(&Value::Real(2.0)));
    }

    #[test]
    fn constant_is_read_only() {
        let mut store = Store::new();
        store.define_const("n", Value::Integer(5));
        assert_eq!(store.assign("n", Value::Integer(1)), Err(Error::AssignToConstant("n".into())));
    }

    #[test]
    fn unknown_identifier() {
        let store = Store::new();
        assert_eq!(store.get("y"), Err(Error::UnknownIdentifier("y".into())));
    }
}
