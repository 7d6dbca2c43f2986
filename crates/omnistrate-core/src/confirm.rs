/// Yes/no gate in front of a mutating request.
///
/// The CLI answers from the terminal; tests pass closures.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Answers yes without asking.
pub struct AlwaysYes;

impl Confirm for AlwaysYes {
    fn confirm(&mut self, _prompt: &str) -> bool {
        true
    }
}
