//! Confirmation gate for destructive operations (`drop_table`, `delete`)

use crate::error::Result;
use tracing::info;

/// Result of an operation that may be declined by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Completed(T),
    /// The user declined; nothing was executed
    Aborted,
}

impl<T> Outcome<T> {
    pub fn is_aborted(&self) -> bool {
        matches!(self, Outcome::Aborted)
    }

    pub fn completed(self) -> Option<T> {
        match self {
            Outcome::Completed(value) => Some(value),
            Outcome::Aborted => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Completed(value) => Outcome::Completed(f(value)),
            Outcome::Aborted => Outcome::Aborted,
        }
    }
}

/// Yes/no prompt supplied by the caller
pub trait Confirm {
    fn confirm(&mut self, operation: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, operation: &str) -> bool {
        self(operation)
    }
}

/// Approves every operation (scripts, tests)
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&mut self, _operation: &str) -> bool {
        true
    }
}

/// Declines every operation
pub struct NeverConfirm;

impl Confirm for NeverConfirm {
    fn confirm(&mut self, _operation: &str) -> bool {
        false
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ConfirmationGate;

impl ConfirmationGate {
    pub fn new() -> Self {
        Self
    }

    /// Ask `confirm` first; run `proceed` only on a positive answer
    pub fn guard<T, C, F>(&self, operation: &str, confirm: &mut C, proceed: F) -> Result<Outcome<T>>
    where
        C: Confirm + ?Sized,
        F: FnOnce() -> Result<T>,
    {
        if !confirm.confirm(operation) {
            info!(operation, "operation declined");
            return Ok(Outcome::Aborted);
        }
        proceed().map(Outcome::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;

    #[test]
    fn test_declined_never_proceeds() {
        let gate = ConfirmationGate::new();
        let mut ran = false;

        let outcome = gate
            .guard("drop_table", &mut NeverConfirm, || {
                ran = true;
                Ok(())
            })
            .unwrap();

        assert_eq!(outcome, Outcome::Aborted);
        assert!(!ran);
    }

    #[test]
    fn test_confirmed_proceeds() {
        let gate = ConfirmationGate::new();
        let mut asked = Vec::new();
        let mut prompt = |op: &str| {
            asked.push(op.to_string());
            true
        };

        let outcome = gate.guard("delete", &mut prompt, || Ok(3)).unwrap();
        assert_eq!(outcome, Outcome::Completed(3));
        assert_eq!(asked, vec!["delete"]);
    }

    #[test]
    fn test_errors_pass_through() {
        let gate = ConfirmationGate::new();
        let result: Result<Outcome<()>> = gate.guard("delete", &mut AlwaysConfirm, || {
            Err(DbError::TableNotFound("users".into()))
        });
        assert!(matches!(result, Err(DbError::TableNotFound(_))));
    }

    #[test]
    fn test_outcome_helpers() {
        assert_eq!(Outcome::Completed(2).map(|n| n * 2), Outcome::Completed(4));
        assert!(Outcome::<i32>::Aborted.is_aborted());
        assert_eq!(Outcome::<i32>::Aborted.completed(), None);
    }
}
