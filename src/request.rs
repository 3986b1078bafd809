//! The value routed through a chain.

use std::fmt;

/// An immutable request carrying a single integer payload.
///
/// Built by the caller, read by handlers through `&Request`, dropped after
/// dispatch. There is no way to change the payload once constructed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Request {
    value: i32,
}

impl Request {
    pub fn new(value: i32) -> Self {
        Self { value }
    }

    pub fn value(&self) -> i32 { self.value }
}

impl From<i32> for Request {
    fn from(value: i32) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_is_preserved() {
        let req = Request::new(-7);
        assert_eq!(req.value(), -7);
        assert_eq!(Request::from(12), Request::new(12));
    }

    #[test]
    fn displays_as_bare_payload() {
        assert_eq!(Request::new(19).to_string(), "19");
    }
}
