//! One-shot value slots.

use thiserror::Error;

/// Errors raised when a one-shot slot is wired incorrectly.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InjectionError {
    /// The slot was assigned a second time. Programmer error, fatal.
    #[error("One-shot value `{0}` was assigned twice")]
    Reassignment(&'static str),
    /// The slot was read before being assigned.
    #[error("One-shot value `{0}` was read before assignment")]
    Unset(&'static str),
}

/// A slot holding a value that is injected exactly once.
///
/// Used for wiring that happens after construction but must not happen
/// twice, such as the query context a pipeline hands to its render phase.
#[derive(Debug)]
pub struct Injected<T> {
    name: &'static str,
    value: Option<T>,
}

impl<T> Injected<T> {
    /// An empty slot; `name` identifies it in errors.
    pub fn new(name: &'static str) -> Self { Self { name, value: None } }

    /// Assign the value. Fails if the slot is already filled.
    pub fn set(&mut self, value: T) -> Result<(), InjectionError> {
        if self.value.is_some() {
            return Err(InjectionError::Reassignment(self.name));
        }
        self.value = Some(value);
        Ok(())
    }

    /// The injected value. Fails if the slot was never filled.
    pub fn get(&self) -> Result<&T, InjectionError> {
        self.value.as_ref().ok_or(InjectionError::Unset(self.name))
    }

    /// `true` once a value has been assigned.
    pub fn is_set(&self) -> bool { self.value.is_some() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigns_once_and_reads_back() {
        let mut slot = Injected::new("context");
        assert_eq!(slot.get(), Err(InjectionError::Unset("context")));
        slot.set(7).expect("first assignment succeeds");
        assert_eq!(slot.get(), Ok(&7));
    }

    #[test]
    fn rejects_second_assignment() {
        let mut slot = Injected::new("context");
        slot.set(1).expect("first assignment succeeds");
        assert_eq!(slot.set(2), Err(InjectionError::Reassignment("context")));
        assert_eq!(slot.get(), Ok(&1));
    }
}
